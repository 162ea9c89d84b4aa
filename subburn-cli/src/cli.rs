// subburn-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Subburn: Subtitle burn-in video renderer",
    long_about = "Renders a video from an audio track and a subtitle track using ffmpeg via the subburn-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Renders a subtitle-burned video from an audio and subtitle track
    Render(RenderArgs),
    // Add other subcommands here later (e.g., probe)
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Audio track to render against
    #[arg(short = 'a', long = "audio", required = true, value_name = "AUDIO_FILE")]
    pub audio: PathBuf,

    /// Subtitle track to burn in (.srt)
    #[arg(short = 's', long = "subs", required = true, value_name = "SUBTITLE_FILE")]
    pub subtitles: PathBuf,

    /// Optional: Still image looped as the video background
    #[arg(short = 'b', long = "background", value_name = "IMAGE_FILE")]
    pub background: Option<PathBuf>,

    /// Optional: Font file used for the subtitle overlay
    #[arg(long = "font-file", value_name = "FONT_FILE")]
    pub font_file: Option<PathBuf>,

    /// Optional: Font family name (wins over the font file's name)
    #[arg(long = "font-name", value_name = "NAME")]
    pub font_name: Option<String>,

    /// Output path for the rendered video
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Optional: Scratch directory for transient job files
    /// Can also be set via the SUBBURN_SCRATCH_DIR environment variable.
    #[arg(long, value_name = "SCRATCH_DIR", env = "SUBBURN_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Optional: Wall-clock limit in seconds for the render invocation
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}
