//! Composition planning.
//!
//! Pure decision logic: given a job's persisted assets and the probed audio
//! duration, produce an immutable [`CompositionPlan`] that fully determines
//! the engine invocation. No I/O happens here; serializing the plan into
//! ffmpeg syntax is the executor's job.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Fallback font family when no font file was uploaded and no name requested.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Fixed subtitle font size for every plan variant.
pub const SUBTITLE_FONT_SIZE: u32 = 24;

/// Fixed output policy: widely supported lossy codec, broadly compatible
/// chroma subsampling, and the fastest preset. Not user-configurable.
pub const VIDEO_CODEC: &str = "libx264";
pub const PIXEL_FORMAT: &str = "yuv420p";
pub const ENCODER_PRESET: &str = "ultrafast";

/// Assets of one render job, as persisted by the scratch store.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub audio_path: PathBuf,
    pub subtitle_path: PathBuf,
    pub background_path: Option<PathBuf>,
    /// Original filename of the uploaded font, if any. Used to derive the
    /// family name; the scratch copy itself carries a job-id prefix.
    pub font_file_name: Option<String>,
    /// Explicitly requested font family name. Wins over the filename.
    pub font_name: Option<String>,
}

/// The background video layer underlying the subtitle overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualSource {
    /// Synthetic flat color field rendered through the lavfi input mode.
    ColorField { spec: String },
    /// A still image held static and looped for the full audio duration.
    LoopedImage { path: PathBuf, duration: f64 },
}

/// Resolved subtitle overlay styling.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleStyle {
    /// Directory ffmpeg should scan for the uploaded font, when present.
    pub font_dir: Option<PathBuf>,
    pub font_family: String,
    pub font_size: u32,
}

/// Fixed output container/codec parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub video_codec: &'static str,
    pub pixel_format: &'static str,
    pub preset: &'static str,
    /// Stop at the shortest input so the output is bounded by the audio.
    pub finish_with_shortest: bool,
}

/// Immutable, fully-resolved description of one render invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionPlan {
    pub visual: VisualSource,
    pub audio_path: PathBuf,
    pub subtitle_path: PathBuf,
    pub style: SubtitleStyle,
    pub output: OutputSettings,
}

/// Builds the composition plan for a job. Deterministic given its inputs.
///
/// Fails with `InvalidDuration` for a non-positive or non-finite probed
/// duration, and defensively with `MissingAsset` if a required asset path is
/// empty (upstream validation should have rejected the request already).
pub fn plan(job: &RenderJob, duration: f64, config: &CoreConfig) -> CoreResult<CompositionPlan> {
    if job.audio_path.as_os_str().is_empty() {
        return Err(CoreError::MissingAsset("audio".to_string()));
    }
    if job.subtitle_path.as_os_str().is_empty() {
        return Err(CoreError::MissingAsset("subtitles".to_string()));
    }
    if !duration.is_finite() || duration <= 0.0 {
        return Err(CoreError::InvalidDuration(duration));
    }

    let visual = match &job.background_path {
        Some(path) => VisualSource::LoopedImage {
            path: path.clone(),
            duration,
        },
        None => VisualSource::ColorField {
            spec: format!(
                "color=black:s={}x{}:d={duration}",
                config.canvas.0, config.canvas.1
            ),
        },
    };

    let style = resolve_font(job, config);

    Ok(CompositionPlan {
        visual,
        audio_path: job.audio_path.clone(),
        subtitle_path: job.subtitle_path.clone(),
        style,
        output: OutputSettings {
            video_codec: VIDEO_CODEC,
            pixel_format: PIXEL_FORMAT,
            preset: ENCODER_PRESET,
            finish_with_shortest: true,
        },
    })
}

/// Resolves the subtitle font family and directory.
///
/// An explicit requested name wins; otherwise the family is derived from the
/// uploaded font's filename with its extension stripped; otherwise the fixed
/// default family with no fontsdir override.
fn resolve_font(job: &RenderJob, config: &CoreConfig) -> SubtitleStyle {
    let from_file = job.font_file_name.as_deref().map(|name| {
        Path::new(name)
            .file_stem()
            .map_or_else(|| name.to_string(), |s| s.to_string_lossy().into_owned())
    });

    let font_family = job
        .font_name
        .clone()
        .filter(|n| !n.is_empty())
        .or(from_file)
        .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string());

    let font_dir = job
        .font_file_name
        .as_ref()
        .map(|_| config.fonts_dir.clone());

    SubtitleStyle {
        font_dir,
        font_family,
        font_size: SUBTITLE_FONT_SIZE,
    }
}
