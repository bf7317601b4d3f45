use std::fs::File;
use std::io::{Cursor, Seek, SeekFrom, Write};

use logvault_core::codec::CodecTag;
use logvault_core::framing::{
    self, FileRecord, MAX_PATH_BYTES, TRAILER_LEN,
};
use logvault_core::ArchiveError;

fn rep(offset: i64, hash_byte: u8, path: &str) -> FileRecord {
    FileRecord {
        data_offset: offset,
        hash: String::from_utf8(vec![hash_byte; 64]).unwrap(),
        relative_path: path.to_string(),
    }
}

fn dup(offset: i64, path: &str) -> FileRecord {
    FileRecord { data_offset: offset, hash: String::new(), relative_path: path.to_string() }
}

#[test]
fn metadata_write_read_roundtrip() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("archive.lv");
    let mut f = File::create(&path).unwrap();
    // Fake payload region.
    f.write_all(&[0u8; 128]).unwrap();
    f.seek(SeekFrom::End(0)).unwrap();

    let records = vec![
        rep(0, b'a', "logs/a.log"),
        dup(0, "logs/copy-of-a.log"),
        rep(64, b'b', "logs/b.log"),
    ];
    framing::write_metadata(&mut f, &records, CodecTag::Zlib).unwrap();
    drop(f);

    let mut f = File::open(&path).unwrap();
    let (trailer, reps, dups) = framing::read_metadata(&mut f).unwrap();
    assert_eq!(trailer.codec, CodecTag::Zlib);
    assert_eq!(trailer.representative_count, 2);
    assert_eq!(trailer.duplicate_count, 1);
    assert_eq!(trailer.metadata_offset, 128);

    assert_eq!(reps.len(), 2);
    assert_eq!(reps[0].relative_path, "logs/a.log");
    assert_eq!(reps[0].data_offset, 0);
    assert_eq!(reps[1].relative_path, "logs/b.log");
    assert_eq!(reps[1].data_offset, 64);

    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].relative_path, "logs/copy-of-a.log");
    assert_eq!(dups[0].data_offset, 0);
    assert!(dups[0].is_duplicate());
    assert!(dups[0].hash.is_empty());
}

#[test]
fn trailer_roundtrip_preserves_counts() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("t.lv");
    let mut f = File::create(&path).unwrap();
    framing::write_metadata(&mut f, &[], CodecTag::Brotli).unwrap();
    drop(f);

    let mut f = File::open(&path).unwrap();
    let trailer = framing::read_trailer(&mut f).unwrap();
    assert_eq!(trailer.codec, CodecTag::Brotli);
    assert_eq!(trailer.representative_count, 0);
    assert_eq!(trailer.duplicate_count, 0);
    assert_eq!(trailer.metadata_offset, 0);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), TRAILER_LEN);
}

#[test]
fn too_short_archive_is_invalid() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("short.lv");
    std::fs::write(&path, b"not an archive").unwrap();
    let mut f = File::open(&path).unwrap();
    assert!(matches!(framing::read_trailer(&mut f), Err(ArchiveError::Invalid(_))));
}

#[test]
fn trailer_claiming_records_without_bytes_fails() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("lying.lv");
    let mut f = File::create(&path).unwrap();
    framing::write_trailer(
        &mut f,
        &framing::Trailer {
            codec: CodecTag::Zlib,
            representative_count: 1,
            duplicate_count: 0,
            metadata_offset: 0,
        },
    )
    .unwrap();
    drop(f);

    let mut f = File::open(&path).unwrap();
    assert!(framing::read_metadata(&mut f).is_err());
}

#[test]
fn oversized_string_length_is_rejected() {
    let mut buf = Vec::new();
    framing::write_u64(&mut buf, MAX_PATH_BYTES + 1).unwrap();
    buf.extend_from_slice(&[0u8; 16]);
    let err = framing::read_str(&mut Cursor::new(&buf), MAX_PATH_BYTES).unwrap_err();
    assert!(matches!(err, ArchiveError::Invalid(_)));
}

#[test]
fn short_string_read_is_an_io_error() {
    let mut buf = Vec::new();
    framing::write_u64(&mut buf, 32).unwrap();
    buf.extend_from_slice(b"only-ten-b");
    let err = framing::read_str(&mut Cursor::new(&buf), MAX_PATH_BYTES).unwrap_err();
    assert!(matches!(err, ArchiveError::Io { .. }));
}

#[test]
fn primitive_roundtrip() {
    let mut buf = Vec::new();
    framing::write_u32(&mut buf, 0xDEAD_BEEF).unwrap();
    framing::write_u64(&mut buf, u64::MAX - 7).unwrap();
    framing::write_i64(&mut buf, -1).unwrap();
    framing::write_str(&mut buf, "d1/d2/c.txt").unwrap();

    let mut cur = Cursor::new(&buf);
    assert_eq!(framing::read_u32(&mut cur).unwrap(), 0xDEAD_BEEF);
    assert_eq!(framing::read_u64(&mut cur).unwrap(), u64::MAX - 7);
    assert_eq!(framing::read_i64(&mut cur).unwrap(), -1);
    assert_eq!(framing::read_str(&mut cur, MAX_PATH_BYTES).unwrap(), "d1/d2/c.txt");
}
