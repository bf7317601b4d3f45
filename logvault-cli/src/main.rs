use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use logvault_core::codec::CodecTag;
use logvault_core::engine::{self, CompressOptions};
use logvault_core::report::ConsoleReporter;

#[derive(Parser)]
#[command(name = "logvault", version, about = "Deduplicating archiver for log trees")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create a deduplicated compressed archive from a directory tree
    Compress {
        /// Directory to archive
        src_dir: PathBuf,
        /// Archive file to create
        archive: PathBuf,
        /// Compression codec: brotli, zlib or zstd (default: first built in)
        #[arg(short = 'c', long = "compression")]
        compression: Option<String>,
        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract an archive into a directory
    Decompress {
        /// Directory to extract into
        dst_dir: PathBuf,
        /// Archive file to read
        archive: PathBuf,
        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Argument errors exit 1 like every other failure.
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(1);
    });
    match cli.cmd {
        Cmd::Compress { src_dir, archive, compression, json } => {
            let codec = match compression {
                Some(name) => CodecTag::parse(&name)?,
                None => CodecTag::first_available(),
            };
            let report =
                engine::compress(&src_dir, &archive, &CompressOptions { codec }, &ConsoleReporter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Cmd::Decompress { dst_dir, archive, json } => {
            let report = engine::extract(&archive, &dst_dir, &ConsoleReporter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }
    Ok(())
}
