use std::io::{BufReader, Read, Write};

use flate2::bufread::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;

use crate::codec::{classify, Codec, STREAM_BUF};
use crate::error::{ArchiveError, Result};

/// DEFLATE-family codec using the zlib container, so each payload is a
/// self-delimiting frame with its own checksum.
pub struct ZlibCodec;

impl Codec for ZlibCodec {
    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
        let src = BufReader::with_capacity(STREAM_BUF, input);
        let mut encoder = ZlibEncoder::new(src, Compression::default());
        let mut buf = vec![0u8; STREAM_BUF];
        loop {
            let n = encoder
                .read(&mut buf)
                .map_err(|e| classify("zlib", "compress", e))?;
            if n == 0 {
                return Ok(());
            }
            output
                .write_all(&buf[..n])
                .map_err(|e| ArchiveError::io("zlib compress write", e))?;
        }
    }

    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64> {
        let src = BufReader::with_capacity(STREAM_BUF, input);
        let mut decoder = ZlibDecoder::new(src);
        let mut buf = vec![0u8; STREAM_BUF];
        let mut total = 0u64;
        // The decoder returns Ok(0) once the frame's end marker is reached,
        // regardless of trailing archive bytes.
        loop {
            let n = decoder
                .read(&mut buf)
                .map_err(|e| classify("zlib", "decompress", e))?;
            if n == 0 {
                return Ok(total);
            }
            output
                .write_all(&buf[..n])
                .map_err(|e| ArchiveError::io("zlib decompress write", e))?;
            total += n as u64;
        }
    }
}
