use std::io::{Read, Write};

use brotli::{CompressorReader, Decompressor};

use crate::codec::{classify, Codec, STREAM_BUF};
use crate::error::{ArchiveError, Result};

// Library defaults: quality 11, 22-bit window.
const QUALITY: u32 = 11;
const LG_WINDOW: u32 = 22;

pub struct BrotliCodec;

impl Codec for BrotliCodec {
    fn compress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<()> {
        let mut encoder = CompressorReader::new(input, STREAM_BUF, QUALITY, LG_WINDOW);
        let mut buf = vec![0u8; STREAM_BUF];
        loop {
            let n = encoder
                .read(&mut buf)
                .map_err(|e| classify("brotli", "compress", e))?;
            if n == 0 {
                return Ok(());
            }
            output
                .write_all(&buf[..n])
                .map_err(|e| ArchiveError::io("brotli compress write", e))?;
        }
    }

    fn decompress(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64> {
        let mut decoder = Decompressor::new(input, STREAM_BUF);
        let mut buf = vec![0u8; STREAM_BUF];
        let mut total = 0u64;
        loop {
            let n = decoder
                .read(&mut buf)
                .map_err(|e| classify("brotli", "decompress", e))?;
            if n == 0 {
                return Ok(total);
            }
            output
                .write_all(&buf[..n])
                .map_err(|e| ArchiveError::io("brotli decompress write", e))?;
            total += n as u64;
        }
    }
}
