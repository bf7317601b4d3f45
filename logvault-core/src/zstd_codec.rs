use std::io::{BufReader, Read, Write};

use crate::codec::{classify, Codec, STREAM_BUF};
use crate::error::{ArchiveError, Result};

/// Zstandard codec at the library's default level, one frame per payload.
pub struct ZstdCodec;

impl Codec for ZstdCodec {
    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
        let src = BufReader::with_capacity(STREAM_BUF, input);
        let mut encoder = zstd::stream::read::Encoder::with_buffer(src, 0)
            .map_err(|e| classify("zstd", "compress", e))?;
        let mut buf = vec![0u8; STREAM_BUF];
        loop {
            let n = encoder
                .read(&mut buf)
                .map_err(|e| classify("zstd", "compress", e))?;
            if n == 0 {
                return Ok(());
            }
            output
                .write_all(&buf[..n])
                .map_err(|e| ArchiveError::io("zstd compress write", e))?;
        }
    }

    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64> {
        let src = BufReader::with_capacity(STREAM_BUF, input);
        let mut decoder = zstd::stream::read::Decoder::with_buffer(src)
            .map_err(|e| classify("zstd", "decompress", e))?
            .single_frame();
        let mut buf = vec![0u8; STREAM_BUF];
        let mut total = 0u64;
        loop {
            let n = decoder
                .read(&mut buf)
                .map_err(|e| classify("zstd", "decompress", e))?;
            if n == 0 {
                return Ok(total);
            }
            output
                .write_all(&buf[..n])
                .map_err(|e| ArchiveError::io("zstd decompress write", e))?;
            total += n as u64;
        }
    }
}
