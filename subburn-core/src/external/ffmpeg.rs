//! FFmpeg render execution.
//!
//! The single place a [`CompositionPlan`] is serialized into ffmpeg argument
//! and filter syntax, and the single place the engine is invoked for a
//! render. One invocation, one outcome; no retries.

use crate::error::{CoreError, CoreResult, command_start_error};
use crate::planner::{CompositionPlan, VisualSource};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Serializes a plan into the full ffmpeg argument list, excluding the
/// output path.
///
/// Input order matters and is fixed by the plan: visual source first, audio
/// second, subtitle file third. The overlay filter and shortest-input
/// truncation reference inputs positionally.
pub fn plan_args(plan: &CompositionPlan) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    match &plan.visual {
        VisualSource::ColorField { spec } => {
            args.extend(["-f", "lavfi", "-i"].map(String::from));
            args.push(spec.clone());
        }
        VisualSource::LoopedImage { path, duration } => {
            args.extend(["-loop", "1", "-t"].map(String::from));
            args.push(duration.to_string());
            args.push("-i".to_string());
            args.push(path.to_string_lossy().into_owned());
        }
    }

    args.push("-i".to_string());
    args.push(plan.audio_path.to_string_lossy().into_owned());
    args.push("-i".to_string());
    args.push(plan.subtitle_path.to_string_lossy().into_owned());

    args.push("-filter_complex".to_string());
    args.push(subtitle_filter(plan));

    args.extend(["-c:v", plan.output.video_codec].map(String::from));
    args.extend(["-pix_fmt", plan.output.pixel_format].map(String::from));
    args.extend(["-preset", plan.output.preset].map(String::from));
    if plan.output.finish_with_shortest {
        args.push("-shortest".to_string());
    }

    args
}

/// Builds the `subtitles=` overlay filter expression.
fn subtitle_filter(plan: &CompositionPlan) -> String {
    let mut filter = format!(
        "subtitles={}",
        escape_filter_value(&plan.subtitle_path.to_string_lossy())
    );
    if let Some(dir) = &plan.style.font_dir {
        filter.push_str(&format!(
            ":fontsdir={}",
            escape_filter_value(&dir.to_string_lossy())
        ));
    }
    filter.push_str(&format!(
        ":force_style='FontName={},FontSize={}'",
        escape_filter_value(&plan.style.font_family),
        plan.style.font_size
    ));
    filter
}

/// Escapes a value embedded in ffmpeg filter syntax.
fn escape_filter_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

/// Runs the render described by the plan, writing to `output_path`.
///
/// Invokes the engine exactly once. The engine's stderr diagnostics are
/// collected while streaming events; a non-success exit maps to
/// `RenderFailed` with that text attached verbatim. A watchdog force-kills
/// the engine when `timeout` elapses, surfacing `RenderTimeout`. Success
/// additionally requires a non-empty output file.
pub fn run_render(
    plan: &CompositionPlan,
    output_path: &Path,
    timeout: Duration,
) -> CoreResult<()> {
    let args = plan_args(plan);
    let mut cmd = FfmpegCommand::new();
    cmd.args(args.iter().map(String::as_str));
    cmd.overwrite();
    cmd.output(output_path.to_string_lossy().as_ref());
    log::debug!("Running render command: {cmd:?}");

    let mut child = cmd.spawn().map_err(|e| command_start_error("ffmpeg", e))?;
    let watchdog = RenderWatchdog::arm(child.as_inner().id(), timeout);

    let mut stderr = String::new();
    let events = match child.iter() {
        Ok(events) => events,
        Err(e) => {
            // Stand the watchdog down before touching the child so it cannot
            // mistake this failure for a timeout, then reap the process.
            watchdog.stand_down();
            let _ = child.kill();
            let _ = child.wait();
            return Err(CoreError::RenderFailed(format!(
                "Failed to read ffmpeg events: {e}"
            )));
        }
    };
    for event in events {
        match event {
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) => {
                log::debug!(target: "ffmpeg_log", "{line}");
                stderr.push_str(&line);
                stderr.push('\n');
            }
            FfmpegEvent::Error(line) => {
                log::debug!(target: "ffmpeg_log", "{line}");
                stderr.push_str(&line);
                stderr.push('\n');
            }
            FfmpegEvent::Progress(progress) => {
                log::debug!(target: "ffmpeg_log", "Render progress: time={}", progress.time);
            }
            _ => {}
        }
    }

    let status = child
        .wait()
        .map_err(|e| CoreError::Other(format!("Failed waiting for ffmpeg: {e}")))?;

    if watchdog.stand_down() {
        return Err(CoreError::RenderTimeout(timeout.as_secs()));
    }
    if !status.success() {
        return Err(CoreError::RenderFailed(format!(
            "FFmpeg exited with {status}. Stderr output:\n{}",
            stderr.trim()
        )));
    }
    match fs::metadata(output_path) {
        Ok(meta) if meta.len() > 0 => Ok(()),
        _ => Err(CoreError::RenderFailed(format!(
            "FFmpeg exited successfully but produced no output at {}",
            output_path.display()
        ))),
    }
}

/// Kills the engine if the render outlives its wall-clock budget.
///
/// The render path signals completion through [`RenderWatchdog::stand_down`];
/// only an expired budget sets the timed-out flag and fires the kill.
struct RenderWatchdog {
    done_tx: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
    timed_out: Arc<AtomicBool>,
}

impl RenderWatchdog {
    fn arm(pid: u32, timeout: Duration) -> Self {
        let timed_out = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&timed_out);
        let (done_tx, done_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            // Only an elapsed budget counts as a timeout; a dropped or
            // signalled channel means the render path is done with us.
            if done_rx.recv_timeout(timeout) == Err(mpsc::RecvTimeoutError::Timeout) {
                flag.store(true, Ordering::SeqCst);
                log::warn!(
                    "Render exceeded {}s budget, killing ffmpeg (pid {pid})",
                    timeout.as_secs()
                );
                kill_process(pid);
            }
        });
        Self {
            done_tx,
            handle,
            timed_out,
        }
    }

    /// Retires the watchdog and reports whether the budget expired.
    fn stand_down(self) -> bool {
        let _ = self.done_tx.send(());
        let _ = self.handle.join();
        self.timed_out.load(Ordering::SeqCst)
    }
}

#[cfg(unix)]
fn kill_process(pid: u32) {
    // ffmpeg catches SIGTERM and can linger flushing output; a timed-out job
    // gets SIGKILL.
    unsafe {
        libc::kill(pid as i32, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process(_pid: u32) {}
