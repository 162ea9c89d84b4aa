use std::fs;
use subburn_core::{AssetRole, CoreConfig, JobScratch};
use tempfile::tempdir;

fn config_in(dir: &std::path::Path) -> CoreConfig {
    CoreConfig::new(dir.to_path_buf())
}

#[test]
fn persisted_paths_embed_job_id_and_role() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    let config = config_in(root.path());

    let mut scratch = JobScratch::allocate(&config)?;
    let id = scratch.id().to_string();

    let audio = scratch.persist(AssetRole::Audio, b"audio-bytes", "song.mp3")?;
    let subs = scratch.persist(AssetRole::Subtitles, b"1\n00:00:01,000", "lyrics.srt")?;

    let audio_name = audio.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(audio_name, format!("audio-{id}.mp3"));
    let subs_name = subs.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(subs_name, format!("subs-{id}.srt"));

    assert_eq!(fs::read(&audio)?, b"audio-bytes");
    assert!(audio.starts_with(scratch.dir()));

    scratch.release_all();
    root.close()?;
    Ok(())
}

#[test]
fn release_removes_everything_including_font_copy() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    let config = config_in(root.path());

    let mut scratch = JobScratch::allocate(&config)?;
    let audio = scratch.persist(AssetRole::Audio, b"a", "song.mp3")?;
    let font = scratch.persist(AssetRole::Font, b"f", "MyFont.ttf")?;
    let output = scratch.reserve_output();
    fs::write(&output, b"video")?;
    let dir = scratch.dir().to_path_buf();

    scratch.release_all();

    assert!(!audio.exists());
    assert!(!font.exists());
    assert!(!output.exists());
    assert!(!dir.exists());

    root.close()?;
    Ok(())
}

#[test]
fn release_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    let config = config_in(root.path());

    let mut scratch = JobScratch::allocate(&config)?;
    scratch.persist(AssetRole::Audio, b"a", "song.mp3")?;

    scratch.release_all();
    // Second release must not error and must not touch anything else.
    scratch.release_all();

    root.close()?;
    Ok(())
}

#[test]
fn release_tolerates_already_missing_files() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    let config = config_in(root.path());

    let mut scratch = JobScratch::allocate(&config)?;
    let audio = scratch.persist(AssetRole::Audio, b"a", "song.mp3")?;
    fs::remove_file(&audio)?;

    // Must not panic or error even though the file is gone.
    scratch.release_all();

    root.close()?;
    Ok(())
}

#[test]
fn concurrent_jobs_never_share_font_paths() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    let config = config_in(root.path());

    let mut job_a = JobScratch::allocate(&config)?;
    let mut job_b = JobScratch::allocate(&config)?;

    // Same original filename from two in-flight jobs.
    let font_a = job_a.persist(AssetRole::Font, b"font-a", "MyFont.ttf")?;
    let font_b = job_b.persist(AssetRole::Font, b"font-b", "MyFont.ttf")?;

    assert_ne!(font_a, font_b);
    assert_eq!(fs::read(&font_a)?, b"font-a");
    assert_eq!(fs::read(&font_b)?, b"font-b");

    // Releasing one job must not delete the other job's font.
    job_a.release_all();
    assert!(!font_a.exists());
    assert!(font_b.exists());

    job_b.release_all();
    root.close()?;
    Ok(())
}

#[test]
fn jobs_get_isolated_scratch_directories() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    let config = config_in(root.path());

    let mut job_a = JobScratch::allocate(&config)?;
    let mut job_b = JobScratch::allocate(&config)?;
    assert_ne!(job_a.dir(), job_b.dir());

    let audio_b = job_b.persist(AssetRole::Audio, b"b", "song.mp3")?;
    job_a.release_all();
    assert!(audio_b.exists());

    job_b.release_all();
    root.close()?;
    Ok(())
}

#[test]
fn drop_releases_scratch() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    let config = config_in(root.path());

    let audio = {
        let mut scratch = JobScratch::allocate(&config)?;
        scratch.persist(AssetRole::Audio, b"a", "song.mp3")?
    };
    assert!(!audio.exists());

    root.close()?;
    Ok(())
}
