use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bangrle::{compress_file, dump, expand_file, fixture, Summary};

#[derive(Parser)]
#[command(name = "rle")]
#[command(author, version, about = "Run-length encode and expand files in the !RLE format", long_about = None)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode FILE and write the result to FILE.rle
    #[command(visible_alias = "c")]
    Compress {
        file: PathBuf,
        /// Write to this path instead of FILE.rle
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Expand FILE, which must end in .rle, to FILE without the extension
    #[command(visible_alias = "x")]
    Expand {
        file: PathBuf,
        /// Write to this path instead of FILE minus .rle
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a hex dump of FILE
    #[command(visible_alias = "d")]
    Dump { file: PathBuf },
    /// Write a test file with known contents to FILE
    #[command(visible_alias = "g")]
    Generate { file: PathBuf },
}

fn report(verb: &str, summary: &Summary) {
    println!(
        "{} {} -> {} ({} -> {} bytes, ratio {:.2})",
        verb,
        summary.source.display(),
        summary.destination.display(),
        summary.bytes_in,
        summary.bytes_out,
        summary.ratio()
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Command::Compress { file, output } => {
            let summary = compress_file(&file, output.as_deref())
                .with_context(|| format!("Compression of {} failed", file.display()))?;
            report("Compressed", &summary);
        }
        Command::Expand { file, output } => {
            let summary = expand_file(&file, output.as_deref())
                .with_context(|| format!("Expansion of {} failed", file.display()))?;
            report("Expanded", &summary);
        }
        Command::Dump { file } => {
            let mut stdout = BufWriter::new(io::stdout().lock());
            dump::dump_file(&file, &mut stdout)
                .with_context(|| format!("Failed to dump {}", file.display()))?;
        }
        Command::Generate { file } => {
            let written = fixture::generate_file(&file)
                .with_context(|| format!("Failed to generate {}", file.display()))?;
            println!("Wrote {} test bytes to {}", written, file.display());
        }
    }

    Ok(())
}
