//! Interactions with the external encoding engine (ffmpeg/ffprobe).
//!
//! Everything that shells out lives here: the duration probe, the render
//! invocation, and the dependency check. The rest of the crate deals only in
//! structured values.

use crate::error::{CoreError, CoreResult, command_start_error};
use std::io;
use std::process::{Command, Stdio};

/// Contains ffmpeg argument serialization and render execution
pub mod ffmpeg;

/// Contains the ffprobe duration probe
pub mod ffprobe_executor;

pub use ffmpeg::{plan_args, run_render};
pub use ffprobe_executor::probe_duration;

/// Checks if a required external command is available and executable.
///
/// Runs `<cmd> -version` and discards the output; used to verify ffmpeg and
/// ffprobe are present before any job work begins.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(command_start_error(cmd_name, e))
        }
    }
}
