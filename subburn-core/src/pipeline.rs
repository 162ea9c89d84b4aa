//! Render job pipeline orchestration.
//!
//! Drives one job through its stages in order: persist assets, probe the
//! audio duration, plan the composition, run the engine, read back the
//! output. Any stage failure short-circuits the rest; scratch teardown runs
//! on every exit path, including delivery.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{check_dependency, probe_duration, run_render};
use crate::planner::{self, RenderJob};
use crate::store::{AssetRole, JobScratch};
use std::fs;

/// Suggested download filename for the rendered video.
pub const DOWNLOAD_FILENAME: &str = "lyric-video.mp4";

/// One uploaded file: raw bytes plus the original filename.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl AssetUpload {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }
}

/// The job request bundle handed over by the transport layer.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub audio: AssetUpload,
    pub subtitles: AssetUpload,
    pub background: Option<AssetUpload>,
    pub font_file: Option<AssetUpload>,
    pub font_name: Option<String>,
}

/// A successfully rendered video, read back into memory so the scratch
/// files can be reclaimed before the caller finishes with it.
#[derive(Debug, Clone)]
pub struct RenderedVideo {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Runs one render job end to end.
///
/// Synchronous and single-shot: no retries, no persistent job state. All
/// scratch paths allocated for the job are deleted before this returns,
/// whether it succeeds or fails.
pub fn render(config: &CoreConfig, request: RenderRequest) -> CoreResult<RenderedVideo> {
    if request.audio.bytes.is_empty() {
        return Err(CoreError::MissingAsset("audio".to_string()));
    }
    if request.subtitles.bytes.is_empty() {
        return Err(CoreError::MissingAsset("subtitles".to_string()));
    }

    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;

    let mut scratch = JobScratch::allocate(config)?;
    let job_id = scratch.id().clone();
    log::info!("Starting render job {job_id}");

    let outcome = run_stages(config, &mut scratch, &request);
    // Teardown on every path out of the pipeline; Drop covers panics.
    scratch.release_all();

    match outcome {
        Ok(video) => {
            log::info!(
                "Render job {job_id} delivered ({} bytes)",
                video.data.len()
            );
            Ok(video)
        }
        Err(e) => {
            log::error!("Render job {job_id} failed: {e}");
            Err(e)
        }
    }
}

fn run_stages(
    config: &CoreConfig,
    scratch: &mut JobScratch,
    request: &RenderRequest,
) -> CoreResult<RenderedVideo> {
    let audio_path = scratch.persist(AssetRole::Audio, &request.audio.bytes, &request.audio.filename)?;
    let subtitle_path = scratch.persist(
        AssetRole::Subtitles,
        &request.subtitles.bytes,
        &request.subtitles.filename,
    )?;
    let background_path = match &request.background {
        Some(upload) => Some(scratch.persist(AssetRole::Background, &upload.bytes, &upload.filename)?),
        None => None,
    };
    let font_file_name = match &request.font_file {
        Some(upload) => {
            scratch.persist(AssetRole::Font, &upload.bytes, &upload.filename)?;
            Some(upload.filename.clone())
        }
        None => None,
    };

    let job = RenderJob {
        audio_path: audio_path.clone(),
        subtitle_path,
        background_path,
        font_file_name,
        font_name: request.font_name.clone(),
    };

    let duration = probe_duration(&audio_path)?;
    log::info!("Job {}: probed audio duration {duration:.2}s", scratch.id());

    let plan = planner::plan(&job, duration, config)?;
    log::debug!("Job {}: composition plan {plan:?}", scratch.id());

    let output_path = scratch.reserve_output();
    run_render(&plan, &output_path, config.render_timeout)?;

    let data = fs::read(&output_path)?;
    Ok(RenderedVideo {
        filename: DOWNLOAD_FILENAME.to_string(),
        data,
    })
}
