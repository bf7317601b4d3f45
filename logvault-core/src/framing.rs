//! Container framing: fixed-width primitives, metadata records, trailer.
//!
//! Integers are written in the host's byte order; archives are not portable
//! across endianness.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::codec::CodecTag;
use crate::error::{ArchiveError, Result};

/// Fixed trailer size: codec tag (u32) + three u64 fields.
pub const TRAILER_LEN: u64 = 4 + 8 * 3;

/// Bounds applied when reading metadata back, so a corrupt trailer cannot
/// drive unbounded allocation.
pub const MAX_RECORDS: u64 = 5_000_000;
pub const MAX_PATH_BYTES: u64 = 64 * 1024;

const HASH_HEX_LEN: u64 = 64;

/// One archived file.
///
/// A representative has `data_offset >= 0` and a non-empty `hash`; its
/// compressed payload starts at `data_offset`. A duplicate has an empty
/// `hash` and carries the offset of the representative payload it shares.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub data_offset: i64,
    pub hash: String,
    pub relative_path: String,
}

impl FileRecord {
    pub fn is_duplicate(&self) -> bool {
        self.hash.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Trailer {
    pub codec: CodecTag,
    pub representative_count: u64,
    pub duplicate_count: u64,
    pub metadata_offset: u64,
}

pub fn write_u32(w: &mut dyn Write, v: u32) -> Result<()> {
    w.write_all(&v.to_ne_bytes()).map_err(|e| ArchiveError::io("write u32", e))
}

pub fn write_u64(w: &mut dyn Write, v: u64) -> Result<()> {
    w.write_all(&v.to_ne_bytes()).map_err(|e| ArchiveError::io("write u64", e))
}

pub fn write_i64(w: &mut dyn Write, v: i64) -> Result<()> {
    w.write_all(&v.to_ne_bytes()).map_err(|e| ArchiveError::io("write i64", e))
}

pub fn read_u32(r: &mut dyn Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).map_err(|e| ArchiveError::io("read u32", e))?;
    Ok(u32::from_ne_bytes(buf))
}

pub fn read_u64(r: &mut dyn Read) -> Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf).map_err(|e| ArchiveError::io("read u64", e))?;
    Ok(u64::from_ne_bytes(buf))
}

pub fn read_i64(r: &mut dyn Read) -> Result<i64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf).map_err(|e| ArchiveError::io("read i64", e))?;
    Ok(i64::from_ne_bytes(buf))
}

/// Length-prefixed string: u64 byte count, then raw bytes.
pub fn write_str(w: &mut dyn Write, s: &str) -> Result<()> {
    write_u64(w, s.len() as u64)?;
    w.write_all(s.as_bytes()).map_err(|e| ArchiveError::io("write string", e))
}

pub fn read_str(r: &mut dyn Read, max: u64) -> Result<String> {
    let len = read_u64(r)?;
    if len > max {
        return Err(ArchiveError::Invalid(format!(
            "string length {len} exceeds limit {max}"
        )));
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf).map_err(|e| ArchiveError::io("read string", e))?;
    String::from_utf8(buf).map_err(|_| ArchiveError::Invalid("string is not UTF-8".into()))
}

pub fn write_tag(w: &mut dyn Write, tag: CodecTag) -> Result<()> {
    write_u32(w, tag as u32)
}

pub fn read_tag(r: &mut dyn Read) -> Result<CodecTag> {
    let v = read_u32(r)?;
    CodecTag::from_raw(v).ok_or_else(|| ArchiveError::Invalid(format!("unknown codec tag {v}")))
}

pub fn write_representative(w: &mut dyn Write, rec: &FileRecord) -> Result<()> {
    write_i64(w, rec.data_offset)?;
    write_str(w, &rec.hash)?;
    write_str(w, &rec.relative_path)
}

pub fn read_representative(r: &mut dyn Read) -> Result<FileRecord> {
    let data_offset = read_i64(r)?;
    if data_offset < 0 {
        return Err(ArchiveError::Invalid(format!(
            "negative payload offset {data_offset} in representative record"
        )));
    }
    let hash = read_str(r, HASH_HEX_LEN)?;
    if hash.len() as u64 != HASH_HEX_LEN {
        return Err(ArchiveError::Invalid(format!(
            "representative hash is {} chars, want {HASH_HEX_LEN}",
            hash.len()
        )));
    }
    let relative_path = read_str(r, MAX_PATH_BYTES)?;
    Ok(FileRecord { data_offset, hash, relative_path })
}

/// Duplicates serialize without a hash field; the offset links them to the
/// representative payload written earlier in the archive.
pub fn write_duplicate(w: &mut dyn Write, rec: &FileRecord) -> Result<()> {
    write_i64(w, rec.data_offset)?;
    write_str(w, &rec.relative_path)
}

pub fn read_duplicate(r: &mut dyn Read) -> Result<FileRecord> {
    let data_offset = read_i64(r)?;
    let relative_path = read_str(r, MAX_PATH_BYTES)?;
    Ok(FileRecord { data_offset, hash: String::new(), relative_path })
}

pub fn write_trailer(w: &mut dyn Write, t: &Trailer) -> Result<()> {
    write_tag(w, t.codec)?;
    write_u64(w, t.representative_count)?;
    write_u64(w, t.duplicate_count)?;
    write_u64(w, t.metadata_offset)
}

/// Read the fixed trailer at EOF and sanity-check it against the file size.
pub fn read_trailer(f: &mut File) -> Result<Trailer> {
    let flen = f.metadata().map_err(|e| ArchiveError::io("stat archive", e))?.len();
    if flen < TRAILER_LEN {
        return Err(ArchiveError::Invalid("archive shorter than trailer".into()));
    }
    f.seek(SeekFrom::End(-(TRAILER_LEN as i64)))
        .map_err(|e| ArchiveError::io("seek trailer", e))?;
    let codec = read_tag(f)?;
    let representative_count = read_u64(f)?;
    let duplicate_count = read_u64(f)?;
    let metadata_offset = read_u64(f)?;
    match representative_count.checked_add(duplicate_count) {
        Some(total) if total <= MAX_RECORDS => {}
        _ => {
            return Err(ArchiveError::Invalid(format!(
                "record count {representative_count}+{duplicate_count} exceeds limit {MAX_RECORDS}"
            )))
        }
    }
    if metadata_offset > flen - TRAILER_LEN {
        return Err(ArchiveError::Invalid(format!(
            "metadata offset {metadata_offset} past end of archive"
        )));
    }
    Ok(Trailer { codec, representative_count, duplicate_count, metadata_offset })
}

/// Serialize the metadata region and trailer at the archive's current end:
/// representative records first, then duplicates, then the trailer.
pub fn write_metadata(f: &mut File, records: &[FileRecord], codec: CodecTag) -> Result<()> {
    let metadata_offset = f
        .stream_position()
        .map_err(|e| ArchiveError::io("tell archive", e))?;
    let mut duplicates = 0u64;
    for rec in records.iter().filter(|r| !r.is_duplicate()) {
        write_representative(f, rec)?;
    }
    for rec in records.iter().filter(|r| r.is_duplicate()) {
        write_duplicate(f, rec)?;
        duplicates += 1;
    }
    write_trailer(
        f,
        &Trailer {
            codec,
            representative_count: records.len() as u64 - duplicates,
            duplicate_count: duplicates,
            metadata_offset,
        },
    )
}

/// Read back all metadata records, representatives first.
pub fn read_metadata(f: &mut File) -> Result<(Trailer, Vec<FileRecord>, Vec<FileRecord>)> {
    let trailer = read_trailer(f)?;
    f.seek(SeekFrom::Start(trailer.metadata_offset))
        .map_err(|e| ArchiveError::io("seek metadata", e))?;
    let mut representatives = Vec::with_capacity(trailer.representative_count as usize);
    for _ in 0..trailer.representative_count {
        representatives.push(read_representative(f)?);
    }
    let mut duplicates = Vec::with_capacity(trailer.duplicate_count as usize);
    for _ in 0..trailer.duplicate_count {
        duplicates.push(read_duplicate(f)?);
    }
    Ok((trailer, representatives, duplicates))
}
