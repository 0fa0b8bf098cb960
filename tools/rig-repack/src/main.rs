//! rig-repack - rig container conversion tool
//!
//! Converts skeleton containers to editable tagged text, repacks edited text
//! into compact binary, and merges animation clips into skeleton containers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use rig_repack::{compact_from_text, extract_to_text, init_logging, merge_clip};

#[derive(Parser)]
#[command(name = "rig-repack")]
#[command(about = "Rig container conversion tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-encode a binary skeleton container as editable tagged text
    #[command(alias = "1")]
    Extract {
        /// Input skeleton container (tagged or packed binary)
        input: PathBuf,

        /// Output text container
        output: PathBuf,
    },

    /// Repack an edited text container as tagged binary, stripping skeletons
    #[command(alias = "2")]
    Compact {
        /// Input edited text container (skeleton and animation data)
        input: PathBuf,

        /// Output tagged binary container (animation data only)
        output: PathBuf,
    },

    /// Merge a clip into a skeleton container (packed, 8-byte pointers)
    ///
    /// Takes the clip at CLIP_INDEX and the binding at position 0 of the
    /// animation container; bindings are matched to clips positionally.
    #[command(alias = "3")]
    Merge {
        /// Input skeleton container
        skeleton: PathBuf,

        /// Input animation container
        animation: PathBuf,

        /// Index of the clip to merge
        clip_index: usize,

        /// Output packed binary container
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    init_logging();

    // Argument errors must exit 1, before any file is touched. Help and
    // version requests still exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract { input, output } => extract_to_text(&input, &output),
        Commands::Compact { input, output } => compact_from_text(&input, &output),
        Commands::Merge {
            skeleton,
            animation,
            clip_index,
            output,
        } => merge_clip(&skeleton, &animation, clip_index, &output),
    }
}
