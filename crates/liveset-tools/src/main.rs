use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use liveset::AudioFormat;

mod cui;

/// liveset command line tools
#[derive(Parser)]
#[command(
    name = "liveset",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the .als project in a folder to JSON and stage its bounced tracks
    Convert {
        /// Folder holding the .als file and the bounced audio
        #[arg(value_name = "FOLDER")]
        source: PathBuf,
        /// Output folder (defaults to the current directory)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
        /// Keep every track and skip audio matching/staging
        #[arg(long)]
        skip_audio: bool,
        /// Encoder used for transcoding
        #[arg(long, value_name = "PROGRAM", default_value = "ffmpeg")]
        encoder: String,
        /// Target audio format (wav or flac)
        #[arg(long, value_name = "FORMAT", default_value = "flac")]
        format: AudioFormat,
    },
    /// Show a summary table of the tracks in an .als file
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the flattened document tree of an .als file as JSON
    Dump {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Compare the tracks of two ableton_project.json files
    Diff {
        #[arg(value_name = "OLD")]
        old: PathBuf,
        #[arg(value_name = "NEW")]
        new: PathBuf,
    },
    /// Re-encode staged audio of every converted project under a folder
    Migrate {
        #[arg(value_name = "ROOT")]
        root: PathBuf,
        #[arg(long, value_name = "PROGRAM", default_value = "ffmpeg")]
        encoder: String,
        #[arg(long, value_name = "FORMAT", default_value = "flac")]
        format: AudioFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Convert {
            source,
            output,
            skip_audio,
            encoder,
            format,
        } => cui::convert::run(&source, output, skip_audio, &encoder, format)?,
        Commands::Info { file } => cui::info::run(&file)?,
        Commands::Dump { file } => cui::info::dump(&file)?,
        Commands::Diff { old, new } => cui::diff::run(&old, &new)?,
        Commands::Migrate {
            root,
            encoder,
            format,
        } => cui::migrate::run(&root, &encoder, format)?,
    }

    Ok(())
}
