//! Core library for the subburn subtitle burn-in render pipeline.
//!
//! Takes an audio track, a subtitle track, and optional visual assets
//! (background image, custom font) and produces a single rendered video with
//! the subtitles burned over a static color field or a looped still image,
//! bounded by the audio's duration. Encoding is delegated to ffmpeg; metadata
//! inspection to ffprobe.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use subburn_core::{AssetUpload, CoreConfig, RenderRequest, render};
//! use std::path::PathBuf;
//!
//! let config = CoreConfig::new(PathBuf::from("/tmp/subburn"));
//! config.validate().unwrap();
//!
//! let request = RenderRequest {
//!     audio: AssetUpload::new(std::fs::read("song.mp3").unwrap(), "song.mp3"),
//!     subtitles: AssetUpload::new(std::fs::read("lyrics.srt").unwrap(), "lyrics.srt"),
//!     background: None,
//!     font_file: None,
//!     font_name: None,
//! };
//!
//! let video = render(&config, request).unwrap();
//! std::fs::write(&video.filename, &video.data).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod pipeline;
pub mod planner;
pub mod store;

// Re-exports for public API
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use pipeline::{AssetUpload, DOWNLOAD_FILENAME, RenderRequest, RenderedVideo, render};
pub use planner::{CompositionPlan, RenderJob, SubtitleStyle, VisualSource, plan};
pub use store::{AssetRole, JobId, JobScratch};
