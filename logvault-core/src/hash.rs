use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{ArchiveError, Result};

/// Chunk size for streaming a file through the digest.
const HASH_CHUNK: usize = 8 * 1024;

/// SHA-256 of a file's full contents, streamed in 8 KiB chunks.
/// Returns the 64-character lowercase hex form.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut f = File::open(path)
        .map_err(|e| ArchiveError::HashIo { path: path.display().to_string(), source: e })?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_CHUNK];
    loop {
        let n = f
            .read(&mut buf)
            .map_err(|e| ArchiveError::HashIo { path: path.display().to_string(), source: e })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex(&hasher.finalize()))
}

/// SHA-256 of an in-memory buffer, one-shot. Must agree with `hash_file`
/// for identical bytes.
pub fn hash_bytes(data: &[u8]) -> String {
    hex(&Sha256::digest(data))
}

fn hex(bytes: &[u8]) -> String {
    const LUT: &[u8; 16] = b"0123456789abcdef";
    let mut s = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        s.push(LUT[(b >> 4) as usize] as char);
        s.push(LUT[(b & 0xF) as usize] as char);
    }
    s
}
