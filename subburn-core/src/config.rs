//! Core configuration for the render pipeline.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;
use std::time::Duration;

/// Default wall-clock limit for a single ffmpeg render invocation.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(600);

/// Canvas size used for the synthetic color-field visual source.
pub const DEFAULT_CANVAS: (u32, u32) = (1280, 720);

/// Configuration for the core render pipeline.
///
/// Construct with [`CoreConfig::new`] and call [`CoreConfig::validate`]
/// before handing it to [`crate::render`].
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Root directory under which per-job scratch directories are created.
    pub scratch_dir: PathBuf,
    /// Shared directory for uploaded fonts. Written concurrently by in-flight
    /// jobs; every entry carries a job-id prefix so names never collide.
    pub fonts_dir: PathBuf,
    /// Wall-clock limit for one render invocation.
    pub render_timeout: Duration,
    /// Width and height of the color-field canvas.
    pub canvas: (u32, u32),
}

impl CoreConfig {
    /// Creates a configuration rooted at the given scratch directory.
    pub fn new(scratch_dir: PathBuf) -> Self {
        let fonts_dir = scratch_dir.join("fonts");
        Self {
            scratch_dir,
            fonts_dir,
            render_timeout: DEFAULT_RENDER_TIMEOUT,
            canvas: DEFAULT_CANVAS,
        }
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> CoreResult<()> {
        if self.canvas.0 == 0 || self.canvas.1 == 0 {
            return Err(CoreError::Other(format!(
                "Invalid canvas size: {}x{}",
                self.canvas.0, self.canvas.1
            )));
        }
        if self.render_timeout.is_zero() {
            return Err(CoreError::Other(
                "Render timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("subburn"))
    }
}
