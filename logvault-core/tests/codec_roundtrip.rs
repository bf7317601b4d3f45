use std::io::Cursor;

use logvault_core::codec::{self, CodecTag};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn roundtrip(tag: CodecTag, data: &[u8]) {
    let codec = codec::create(tag).unwrap();
    let mut compressed = Vec::new();
    codec.compress(&mut Cursor::new(data), &mut compressed).unwrap();

    let mut plain = Vec::new();
    let n = codec
        .decompress(&mut Cursor::new(&compressed), &mut plain)
        .unwrap();
    assert_eq!(plain, data, "{} roundtrip changed the bytes", tag.as_str());
    assert_eq!(n, data.len() as u64, "{} byte count", tag.as_str());
}

#[test]
fn text_roundtrip_every_codec() {
    let data = b"Error: System failure\nWarning: Low memory\n".repeat(64);
    for &tag in CodecTag::available() {
        roundtrip(tag, &data);
    }
}

#[test]
fn random_roundtrip_every_codec() {
    let mut rng = StdRng::seed_from_u64(99);
    let data: Vec<u8> = (0..100 * 1024).map(|_| rng.gen()).collect();
    for &tag in CodecTag::available() {
        roundtrip(tag, &data);
    }
}

#[test]
fn single_byte_roundtrip_every_codec() {
    for &tag in CodecTag::available() {
        roundtrip(tag, b"x");
    }
}

#[test]
fn decoder_stops_at_frame_end() {
    // Two frames back to back; decoding from the front must yield only the
    // first payload even though more archive bytes follow.
    for &tag in CodecTag::available() {
        let codec = codec::create(tag).unwrap();
        let first = b"first payload, repeated a bit to compress ".repeat(20);
        let second = b"second payload".repeat(20);
        let mut stream = Vec::new();
        codec.compress(&mut Cursor::new(&first[..]), &mut stream).unwrap();
        codec.compress(&mut Cursor::new(&second[..]), &mut stream).unwrap();

        let mut plain = Vec::new();
        let n = codec.decompress(&mut Cursor::new(&stream), &mut plain).unwrap();
        assert_eq!(plain, first, "{}", tag.as_str());
        assert_eq!(n, first.len() as u64);
    }
}

#[test]
fn corrupt_frame_is_a_codec_error() {
    for &tag in CodecTag::available() {
        let codec = codec::create(tag).unwrap();
        let mut compressed = Vec::new();
        codec
            .compress(&mut Cursor::new(&b"some payload worth storing"[..]), &mut compressed)
            .unwrap();
        // Truncate mid-frame.
        compressed.truncate(compressed.len() / 2);
        let mut plain = Vec::new();
        assert!(
            codec.decompress(&mut Cursor::new(&compressed), &mut plain).is_err(),
            "{} accepted a truncated frame",
            tag.as_str()
        );
    }
}

#[test]
fn codec_names_are_stable() {
    assert_eq!(CodecTag::parse("brotli").unwrap(), CodecTag::Brotli);
    assert_eq!(CodecTag::parse("zstd").unwrap(), CodecTag::Zstd);
    assert_eq!(CodecTag::parse("zlib").unwrap(), CodecTag::Zlib);
    assert!(CodecTag::parse("lz4").is_err());
    assert_eq!(CodecTag::Brotli as u32, 0);
    assert_eq!(CodecTag::Zstd as u32, 1);
    assert_eq!(CodecTag::Zlib as u32, 2);
    assert_eq!(CodecTag::from_raw(3), None);
}
