//! FFprobe integration for the audio duration probe.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Returns the playback duration of the given audio file in seconds.
///
/// The file must already be fully written to stable storage. A single probe
/// failure is fatal to the job; there is no retry.
pub fn probe_duration(input_path: &Path) -> CoreResult<f64> {
    log::debug!(
        "Running ffprobe (via crate) for duration on: {}",
        input_path.display()
    );
    match ffprobe(input_path) {
        Ok(metadata) => metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| {
                CoreError::Probe(format!(
                    "No duration in metadata for {}",
                    input_path.display()
                ))
            }),
        Err(err) => {
            log::error!(
                "ffprobe failed for duration on {}: {err:?}",
                input_path.display()
            );
            Err(map_ffprobe_error(err))
        }
    }
}

fn map_ffprobe_error(err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error("ffprobe", output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::Probe(format!("ffprobe output deserialization: {err}"))
        }
        _ => CoreError::Probe(format!("Unknown ffprobe error: {err:?}")),
    }
}
