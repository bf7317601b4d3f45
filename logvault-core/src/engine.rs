//! The archive engine: scan -> hash -> partition -> compress -> index for
//! archiving, and trailer -> partition -> decode -> link-duplicates for
//! extraction.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::codec::{self, Codec, CodecTag};
use crate::error::{ArchiveError, Result};
use crate::framing::{self, FileRecord};
use crate::hash;
use crate::path;
use crate::pool::WorkerPool;
use crate::report::Reporter;
use crate::scan;

#[derive(Debug, Clone, Copy)]
pub struct CompressOptions {
    pub codec: CodecTag,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions { codec: CodecTag::first_available() }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CompressReport {
    pub total_files: u64,
    pub unique_files: u64,
    pub duplicate_files: u64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ExtractReport {
    pub representatives: u64,
    pub duplicates: u64,
    pub failed: u64,
}

struct SourceFile {
    path: PathBuf,
    rel: String,
    hash: String,
}

#[derive(Default)]
struct HashMaps {
    path_to_hash: HashMap<String, String>,
    hash_to_first: HashMap<String, String>,
}

/// Archive every regular file under `root` into `archive_path`, storing each
/// distinct content once. Zero-length files are dropped entirely. Any error
/// is fatal and leaves a truncated archive behind.
pub fn compress(
    root: &Path,
    archive_path: &Path,
    opts: &CompressOptions,
    reporter: &dyn Reporter,
) -> Result<CompressReport> {
    let archive = File::create(archive_path)
        .map_err(|e| ArchiveError::io_path("create archive", archive_path, e))?;
    let files = scan::scan_tree(root, true)?;
    let pool = WorkerPool::global();

    // Fingerprint in parallel. Both maps fill under one mutex so the
    // first-path-seen entry always matches some path_to_hash entry.
    let maps = Mutex::new(HashMaps::default());
    pool.parallel_for_each(&files, |p| {
        // A file may have shrunk to zero since the scan; those drop out here.
        let len = fs::metadata(p).map_err(|e| ArchiveError::io_path("stat", p, e))?.len();
        if len == 0 {
            return Ok(());
        }
        let rel = path::rel_path_string(root, p)?;
        let digest = hash::hash_file(p)?;
        let mut m = maps.lock().expect("hash map lock");
        m.hash_to_first.entry(digest.clone()).or_insert_with(|| rel.clone());
        m.path_to_hash.insert(rel, digest);
        Ok(())
    })?;
    let maps = maps.into_inner().expect("hash map lock");

    // Partition: the first path seen for a hash is the representative of
    // its content class, every other path is a duplicate.
    let mut uniques: Vec<SourceFile> = Vec::new();
    let mut dups: Vec<SourceFile> = Vec::new();
    for p in &files {
        let rel = path::rel_path_string(root, p)?;
        let Some(digest) = maps.path_to_hash.get(&rel) else {
            continue;
        };
        let entry = SourceFile { path: p.clone(), rel: rel.clone(), hash: digest.clone() };
        if maps.hash_to_first.get(digest) == Some(&rel) {
            uniques.push(entry);
        } else {
            dups.push(entry);
        }
    }

    let codec = codec::create(opts.codec)?;
    let archive = Mutex::new(archive);
    let records: Mutex<Vec<FileRecord>> = Mutex::new(Vec::with_capacity(files.len()));
    let hash_to_offset: Mutex<HashMap<String, i64>> = Mutex::new(HashMap::new());

    // Stream each representative through the codec straight into the
    // archive. The archive mutex stays held for the whole stream: payloads
    // share one output file and must stay contiguous.
    pool.parallel_for_each(&uniques, |src| {
        let original =
            fs::metadata(&src.path).map_err(|e| ArchiveError::io_path("stat", &src.path, e))?.len();
        let data_offset;
        let stored;
        {
            let mut out = archive.lock().expect("archive lock");
            data_offset =
                out.stream_position().map_err(|e| ArchiveError::io("tell archive", e))?;
            let mut input = File::open(&src.path)
                .map_err(|e| ArchiveError::io_path("open", &src.path, e))?;
            codec.compress(&mut input, &mut *out)?;
            stored = out.stream_position().map_err(|e| ArchiveError::io("tell archive", e))?
                - data_offset;
        }
        hash_to_offset
            .lock()
            .expect("offset map lock")
            .insert(src.hash.clone(), data_offset as i64);
        records.lock().expect("metadata lock").push(FileRecord {
            data_offset: data_offset as i64,
            hash: src.hash.clone(),
            relative_path: src.rel.clone(),
        });
        reporter.compressed(&src.rel, original, stored);
        Ok(())
    })?;

    // All payloads are on disk now; link each duplicate to its
    // representative's offset.
    pool.parallel_for_each(&dups, |src| {
        let offset = hash_to_offset
            .lock()
            .expect("offset map lock")
            .get(&src.hash)
            .copied()
            .ok_or_else(|| ArchiveError::MissingRepresentative(src.rel.clone()))?;
        records.lock().expect("metadata lock").push(FileRecord {
            data_offset: offset,
            hash: String::new(),
            relative_path: src.rel.clone(),
        });
        reporter.duplicate(&src.rel);
        Ok(())
    })?;

    let mut out = archive.into_inner().expect("archive lock");
    let records = records.into_inner().expect("metadata lock");
    framing::write_metadata(&mut out, &records, opts.codec)?;

    let unique_files = uniques.len() as u64;
    let duplicate_files = dups.len() as u64;
    reporter.summary(unique_files + duplicate_files, unique_files, duplicate_files);
    Ok(CompressReport {
        total_files: unique_files + duplicate_files,
        unique_files,
        duplicate_files,
    })
}

/// Reconstruct the archived tree under `out_dir`, verifying every file's
/// hash. Trailer and metadata errors are fatal; per-file decode, hash and
/// linkage errors are reported and skipped.
pub fn extract(archive_path: &Path, out_dir: &Path, reporter: &dyn Reporter) -> Result<ExtractReport> {
    let mut archive = File::open(archive_path)
        .map_err(|e| ArchiveError::io_path("open archive", archive_path, e))?;
    let (trailer, representatives, duplicates) = framing::read_metadata(&mut archive)?;
    fs::create_dir_all(out_dir)
        .map_err(|e| ArchiveError::io_path("create output dir", out_dir, e))?;

    let codec = codec::create(trailer.codec)?;
    let pool = WorkerPool::global();
    let archive = Mutex::new(archive);
    // data offset -> (extracted path, hash); duplicates link through this.
    let extracted: Mutex<HashMap<i64, (PathBuf, String)>> = Mutex::new(HashMap::new());
    let failed = AtomicU64::new(0);

    let fail = |rel: &str, err: &ArchiveError, partial: Option<&Path>| {
        if let Some(p) = partial {
            let _ = fs::remove_file(p);
        }
        reporter.failed(rel, &err.to_string());
        failed.fetch_add(1, Ordering::Relaxed);
    };

    // Representatives first; duplicates can only be copied from files that
    // already exist on disk.
    pool.parallel_for_each(&representatives, |rec| {
        let target = match path::join_target(out_dir, &rec.relative_path) {
            Ok(t) => t,
            Err(e) => {
                fail(&rec.relative_path, &e, None);
                return Ok(());
            }
        };
        if let Err(e) = extract_representative(&archive, codec.as_ref(), rec, &target) {
            fail(&rec.relative_path, &e, Some(&target));
            return Ok(());
        }
        extracted
            .lock()
            .expect("output lock")
            .insert(rec.data_offset, (target, rec.hash.clone()));
        reporter.extracted(&rec.relative_path);
        Ok(())
    })?;

    pool.parallel_for_each(&duplicates, |rec| {
        let source = extracted.lock().expect("output lock").get(&rec.data_offset).cloned();
        let Some((source_path, digest)) = source else {
            fail(
                &rec.relative_path,
                &ArchiveError::MissingRepresentative(rec.relative_path.clone()),
                None,
            );
            return Ok(());
        };
        let target = match path::join_target(out_dir, &rec.relative_path) {
            Ok(t) => t,
            Err(e) => {
                fail(&rec.relative_path, &e, None);
                return Ok(());
            }
        };
        if let Err(e) = copy_duplicate(&source_path, &target, &digest, &rec.relative_path) {
            fail(&rec.relative_path, &e, Some(&target));
            return Ok(());
        }
        reporter.extracted(&rec.relative_path);
        Ok(())
    })?;

    let rep_count = representatives.len() as u64;
    let dup_count = duplicates.len() as u64;
    reporter.summary(rep_count + dup_count, rep_count, dup_count);
    Ok(ExtractReport {
        representatives: rep_count,
        duplicates: dup_count,
        failed: failed.load(Ordering::Relaxed),
    })
}

fn extract_representative(
    archive: &Mutex<File>,
    codec: &dyn Codec,
    rec: &FileRecord,
    target: &Path,
) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| ArchiveError::io_path("create dir", parent, e))?;
    }
    {
        let mut arc = archive.lock().expect("archive lock");
        arc.seek(SeekFrom::Start(rec.data_offset as u64))
            .map_err(|e| ArchiveError::io("seek payload", e))?;
        let mut out =
            File::create(target).map_err(|e| ArchiveError::io_path("create", target, e))?;
        codec.decompress(&mut *arc, &mut out)?;
    }
    let actual = hash::hash_file(target)?;
    if actual != rec.hash {
        return Err(ArchiveError::HashMismatch {
            path: rec.relative_path.clone(),
            expected: rec.hash.clone(),
            actual,
        });
    }
    Ok(())
}

fn copy_duplicate(source: &Path, target: &Path, expected: &str, rel: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| ArchiveError::io_path("create dir", parent, e))?;
    }
    fs::copy(source, target).map_err(|e| ArchiveError::io_path("copy to", target, e))?;
    let actual = hash::hash_file(target)?;
    if actual != expected {
        return Err(ArchiveError::HashMismatch {
            path: rel.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}
