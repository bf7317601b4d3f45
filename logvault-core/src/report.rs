/// Observer for per-file progress and final statistics. All methods default
/// to no-ops, so implementations report only what they care about; the
/// engine never depends on a reporter for correctness.
pub trait Reporter: Send + Sync {
    fn compressed(&self, _path: &str, _original: u64, _stored: u64) {}
    fn duplicate(&self, _path: &str) {}
    fn extracted(&self, _path: &str) {}
    fn failed(&self, _path: &str, _reason: &str) {}
    fn summary(&self, _total: u64, _unique: u64, _duplicates: u64) {}
}

/// Prints one line per file. `println!` locks stdout per call, so lines
/// from concurrent workers do not interleave.
#[derive(Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn compressed(&self, path: &str, original: u64, stored: u64) {
        println!("compressed: {path} ({original} -> {stored} bytes)");
    }

    fn duplicate(&self, path: &str) {
        println!("duplicate: {path}");
    }

    fn extracted(&self, path: &str) {
        println!("extracted: {path}");
    }

    fn failed(&self, path: &str, reason: &str) {
        eprintln!("error: {path}: {reason}");
    }

    fn summary(&self, total: u64, unique: u64, duplicates: u64) {
        println!("total: {total} files ({unique} unique, {duplicates} duplicate)");
    }
}

/// Reporter that swallows everything; used by tests.
#[derive(Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}
