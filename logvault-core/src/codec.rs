use std::io::{Read, Write};

use crate::error::{ArchiveError, Result};

/// Working buffer size on each side of a codec stream.
pub const STREAM_BUF: usize = 64 * 1024;

/// A streaming compressor/decompressor. Implementations consume the input
/// reader to EOF, emit a single self-delimiting frame, and never need an
/// external length hint.
pub trait Codec: Send + Sync {
    /// Compress `input` to EOF into `output` as one frame.
    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()>;

    /// Decode exactly one frame from `input` into `output`, stopping at the
    /// frame's end marker. Returns the number of plaintext bytes written.
    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64>;
}

/// On-disk codec identifier. The numeric values are stable across versions;
/// new codecs may only be appended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CodecTag {
    Brotli = 0,
    Zstd = 1,
    Zlib = 2,
}

impl CodecTag {
    /// Decode a raw tag value read from an archive.
    pub fn from_raw(v: u32) -> Option<CodecTag> {
        match v {
            0 => Some(CodecTag::Brotli),
            1 => Some(CodecTag::Zstd),
            2 => Some(CodecTag::Zlib),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CodecTag::Brotli => "brotli",
            CodecTag::Zstd => "zstd",
            CodecTag::Zlib => "zlib",
        }
    }

    /// Parse a codec name as accepted on the command line.
    pub fn parse(name: &str) -> Result<CodecTag> {
        match name {
            "brotli" => Ok(CodecTag::Brotli),
            "zstd" => Ok(CodecTag::Zstd),
            "zlib" => Ok(CodecTag::Zlib),
            other => Err(ArchiveError::UnknownCodec(other.to_string())),
        }
    }

    /// Codecs compiled into this build, in tag order.
    pub fn available() -> &'static [CodecTag] {
        const TAGS: &[CodecTag] = &[
            #[cfg(feature = "brotli")]
            CodecTag::Brotli,
            #[cfg(feature = "zstd")]
            CodecTag::Zstd,
            #[cfg(feature = "zlib")]
            CodecTag::Zlib,
        ];
        TAGS
    }

    /// The default codec: the first one compiled in.
    pub fn first_available() -> CodecTag {
        Self::available()[0]
    }
}

/// Create a fresh codec instance for `tag`. Fails if the codec was not
/// compiled into this build.
pub fn create(tag: CodecTag) -> Result<Box<dyn Codec>> {
    match tag {
        #[cfg(feature = "brotli")]
        CodecTag::Brotli => Ok(Box::new(crate::brotli_codec::BrotliCodec)),
        #[cfg(feature = "zstd")]
        CodecTag::Zstd => Ok(Box::new(crate::zstd_codec::ZstdCodec)),
        #[cfg(feature = "zlib")]
        CodecTag::Zlib => Ok(Box::new(crate::zlib_codec::ZlibCodec)),
        #[allow(unreachable_patterns)]
        _ => Err(ArchiveError::CodecUnavailable(tag.as_str())),
    }
}

/// Split library failures from plain stream I/O. The codec crates report
/// corrupt or truncated frames through `io::Error` with data-shaped kinds;
/// everything else is a real read/write failure on the archive streams.
pub(crate) fn classify(codec: &'static str, op: &str, e: std::io::Error) -> ArchiveError {
    use std::io::ErrorKind;
    match e.kind() {
        ErrorKind::InvalidInput | ErrorKind::InvalidData | ErrorKind::UnexpectedEof
        | ErrorKind::Other => ArchiveError::Codec { codec, detail: e.to_string() },
        _ => ArchiveError::io(format!("{codec} {op}"), e),
    }
}
