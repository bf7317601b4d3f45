use std::path::Path;

use thiserror::Error;

/// All failure modes of the archive engine and its collaborators.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{op}: {source}")]
    Io {
        op: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown codec: {0}")]
    UnknownCodec(String),

    #[error("codec {0} is not built into this binary")]
    CodecUnavailable(&'static str),

    #[error("{codec}: {detail}")]
    Codec { codec: &'static str, detail: String },

    #[error("hashing {path}: {source}")]
    HashIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("hash mismatch for {path}: expected {expected}, got {actual}")]
    HashMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("no stored payload for duplicate {0}")]
    MissingRepresentative(String),

    #[error("unsafe archive path {0:?}")]
    UnsafePath(String),

    #[error("invalid archive: {0}")]
    Invalid(String),

    #[error("worker pool is shut down")]
    PoolShutDown,

    #[error("worker pool: {0}")]
    Pool(String),
}

impl ArchiveError {
    /// I/O error with operation context, e.g. `"write trailer"`.
    pub fn io(op: impl Into<String>, source: std::io::Error) -> Self {
        ArchiveError::Io { op: op.into(), source }
    }

    /// I/O error naming the file the operation touched.
    pub fn io_path(op: &str, path: &Path, source: std::io::Error) -> Self {
        ArchiveError::Io { op: format!("{op} {}", path.display()), source }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
