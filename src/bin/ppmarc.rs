use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dsi_progress_logger::{ProgressLog, ProgressLogger};
use log::info;
use ppm_arith::archive::{self, ArchiveConfig, ModelKind};
use ppm_arith::models::ContextGeometry;

#[derive(Parser, Debug)]
#[command(about = "Compress files with arithmetic coding of fixed-width words", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase the log verbosity (can be repeated).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file.
    Compress {
        #[clap(flatten)]
        files: Files,

        /// The width of the coded words, in bits (8 to 32).
        #[arg(short, long, default_value_t = 8)]
        word_bits: u16,

        /// The probability model.
        #[arg(short, long, value_enum, default_value_t = ModelKind::PpmD)]
        model: ModelKind,

        /// The weight an occurrence adds to its word with the plain model.
        #[arg(short, long, default_value_t = 16)]
        ratio: u64,

        /// The bits of each context cell with the PPM models.
        #[arg(long, default_value_t = 8)]
        cell_bits: u8,

        /// The number of previous words in the context with the PPM models.
        #[arg(long, default_value_t = 3)]
        cell_count: u8,
    },

    /// Decompress a file.
    Decompress {
        #[clap(flatten)]
        files: Files,

        /// The probability model the file was compressed with.
        #[arg(short, long, value_enum, default_value_t = ModelKind::PpmD)]
        model: ModelKind,
    },
}

#[derive(Args, Debug)]
struct Files {
    /// The file to read.
    input: PathBuf,

    /// The file to write.
    output: PathBuf,
}

/// Runs `job` with a progress logger counting words.
fn with_progress<T>(expected: Option<usize>, job: impl FnOnce(&mut dyn FnMut(u64)) -> T) -> T {
    let mut pl = ProgressLogger::default();
    pl.item_name("word").expected_updates(expected);
    pl.start("Coding words...");
    let result = job(&mut |_: u64| {
        pl.light_update();
    });
    pl.done();
    result
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();

    stderrlog::new()
        .verbosity(2 + cli.verbose as usize)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    match cli.command {
        Command::Compress {
            files,
            word_bits,
            model,
            ratio,
            cell_bits,
            cell_count,
        } => {
            let config = ArchiveConfig {
                word_bits,
                model,
                ratio,
                context: ContextGeometry::new(cell_bits, cell_count)?,
            };
            config.validate()?;

            let data = fs::read(&files.input)
                .with_context(|| format!("Could not read {}", files.input.display()))?;
            let expected = data.len() * 8 / word_bits as usize;
            let (packed, stats) =
                with_progress(Some(expected), |tick| archive::compress(&data, &config, Some(tick)))?;
            fs::write(&files.output, &packed)
                .with_context(|| format!("Could not write {}", files.output.display()))?;
            info!(
                "{} -> {} ({:.2}% of the input, {:.3} bits/word)",
                files.input.display(),
                files.output.display(),
                100.0 * stats.ratio(),
                stats.bits_per_word()
            );
        }
        Command::Decompress { files, model } => {
            let packed = fs::read(&files.input)
                .with_context(|| format!("Could not read {}", files.input.display()))?;
            let data = with_progress(None, |tick| archive::decompress(&packed, model, Some(tick)))?;
            fs::write(&files.output, &data)
                .with_context(|| format!("Could not write {}", files.output.display()))?;
            info!(
                "{} -> {} ({} bytes)",
                files.input.display(),
                files.output.display(),
                data.len()
            );
        }
    }

    Ok(())
}
