use std::fs;
use std::process::Command;
use subburn_core::{AssetUpload, CoreConfig, CoreError, RenderRequest, render};
use tempfile::tempdir;

fn engine_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|cmd| {
        Command::new(cmd)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

fn request(audio: Vec<u8>, subs: Vec<u8>) -> RenderRequest {
    RenderRequest {
        audio: AssetUpload::new(audio, "song.mp3"),
        subtitles: AssetUpload::new(subs, "lyrics.srt"),
        background: None,
        font_file: None,
        font_name: None,
    }
}

fn sample_srt() -> Vec<u8> {
    b"1\n00:00:01,000 --> 00:00:03,000\nhello world\n".to_vec()
}

#[test]
fn empty_audio_is_rejected_before_any_work() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    let config = CoreConfig::new(root.path().to_path_buf());

    let result = render(&config, request(Vec::new(), sample_srt()));
    match result {
        Err(CoreError::MissingAsset(which)) => assert_eq!(which, "audio"),
        other => panic!("Expected MissingAsset, got {other:?}"),
    }

    // Rejected before allocation: no job directory was created.
    assert!(fs::read_dir(root.path()).map(|d| d.count()).unwrap_or(0) == 0);
    root.close()?;
    Ok(())
}

#[test]
fn empty_subtitles_are_rejected_before_any_work() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    let config = CoreConfig::new(root.path().to_path_buf());

    let result = render(&config, request(b"not-audio".to_vec(), Vec::new()));
    match result {
        Err(CoreError::MissingAsset(which)) => assert_eq!(which, "subtitles"),
        other => panic!("Expected MissingAsset, got {other:?}"),
    }

    root.close()?;
    Ok(())
}

#[test]
fn probe_failure_short_circuits_and_cleans_scratch() -> Result<(), Box<dyn std::error::Error>> {
    if !engine_available() {
        eprintln!("Skipping: ffmpeg/ffprobe not found on PATH");
        return Ok(());
    }

    let root = tempdir()?;
    let config = CoreConfig::new(root.path().to_path_buf());

    // Bytes that are not parseable audio: the probe fails, the planner and
    // the engine are never reached.
    let result = render(&config, request(b"definitely not audio".to_vec(), sample_srt()));
    match result {
        Err(CoreError::Probe(_)) | Err(CoreError::CommandFailed { .. }) => {}
        other => panic!("Expected a probe failure, got {other:?}"),
    }

    // Teardown ran: no job directories left under the scratch root.
    for entry in fs::read_dir(root.path())? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        assert!(
            !name.starts_with("job-"),
            "Scratch directory {name} survived the failed job"
        );
    }

    root.close()?;
    Ok(())
}

#[test]
fn renders_video_bounded_by_audio_duration() -> Result<(), Box<dyn std::error::Error>> {
    if !engine_available() {
        eprintln!("Skipping: ffmpeg/ffprobe not found on PATH");
        return Ok(());
    }

    let root = tempdir()?;
    let config = CoreConfig::new(root.path().to_path_buf());

    // Synthesize a 12.5s audio track with the engine itself. WAV keeps the
    // test independent of which encoders this ffmpeg build carries.
    let audio_path = root.path().join("tone.wav");
    let synth = Command::new("ffmpeg")
        .args(["-y", "-f", "lavfi", "-i", "sine=frequency=440:duration=12.5"])
        .arg(&audio_path)
        .output()?;
    assert!(synth.status.success(), "Failed to synthesize test audio");

    let request = RenderRequest {
        audio: AssetUpload::new(fs::read(&audio_path)?, "song.wav"),
        subtitles: AssetUpload::new(sample_srt(), "lyrics.srt"),
        background: None,
        font_file: None,
        font_name: None,
    };
    let video = render(&config, request)?;
    assert_eq!(video.filename, "lyric-video.mp4");
    assert!(!video.data.is_empty());

    // Shortest-input truncation bounds the output by the audio length.
    let check_path = root.path().join("delivered.mp4");
    fs::write(&check_path, &video.data)?;
    let duration = subburn_core::external::probe_duration(&check_path)?;
    assert!(
        (duration - 12.5).abs() < 1.0,
        "Output duration {duration} not within tolerance of 12.5s"
    );

    // All job-scoped scratch files were reclaimed after delivery.
    for entry in fs::read_dir(root.path())? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        assert!(
            !name.starts_with("job-"),
            "Scratch directory {name} survived the delivered job"
        );
    }

    root.close()?;
    Ok(())
}
