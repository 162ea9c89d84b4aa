// subburn-cli/src/main.rs
//
// Command-line entry point for subburn. Stands in for the transport layer:
// reads the asset files into buffers, hands them to subburn-core, and writes
// the rendered video where the user asked.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use subburn_core::{AssetUpload, CoreConfig, RenderRequest, render};

mod cli;

use cli::{Cli, Commands, RenderArgs};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Render(args) => run_render(args),
    };

    if let Err(e) = result {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run_render(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let scratch_dir = args
        .scratch_dir
        .unwrap_or_else(|| std::env::temp_dir().join("subburn"));
    let mut config = CoreConfig::new(scratch_dir);
    if let Some(secs) = args.timeout {
        config.render_timeout = Duration::from_secs(secs);
    }
    config.validate()?;

    let request = RenderRequest {
        audio: read_upload(&args.audio)?,
        subtitles: read_upload(&args.subtitles)?,
        background: args.background.as_deref().map(read_upload).transpose()?,
        font_file: args.font_file.as_deref().map(read_upload).transpose()?,
        font_name: args.font_name,
    };

    let video = render(&config, request)?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&video.filename));
    fs::write(&output, &video.data)?;
    log::info!(
        "Wrote {} ({} bytes)",
        output.display(),
        video.data.len()
    );
    Ok(())
}

fn read_upload(path: &Path) -> Result<AssetUpload, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)
        .map_err(|e| format!("Failed to read '{}': {e}", path.display()))?;
    let filename = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    Ok(AssetUpload::new(bytes, filename))
}
