//! Per-job scratch asset store.
//!
//! Each render job owns one scratch directory holding its uploaded assets and
//! its output file. The store records every path it issues and deletes all of
//! them on release, independent of how the job ended. Cleanup also runs via
//! `Drop`, so an early error return still reclaims the scratch space.

use crate::config::CoreConfig;
use crate::error::CoreResult;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide sequence number folded into job ids so that two jobs started
/// in the same millisecond still get distinct ids.
static JOB_SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for one render job.
///
/// Ids are `{epoch_millis}-{seq}`, unique within the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Allocates the next job id.
    pub fn next() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let seq = JOB_SEQ.fetch_add(1, Ordering::Relaxed);
        JobId(format!("{millis}-{seq}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of an uploaded or produced asset within a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRole {
    Audio,
    Subtitles,
    Background,
    Font,
}

impl AssetRole {
    /// Filename prefix used inside the scratch directory.
    fn prefix(self) -> &'static str {
        match self {
            AssetRole::Audio => "audio",
            AssetRole::Subtitles => "subs",
            AssetRole::Background => "bg",
            AssetRole::Font => "font",
        }
    }

    /// Extension used when the uploaded filename carries none.
    fn default_extension(self) -> &'static str {
        match self {
            AssetRole::Audio => "mp3",
            AssetRole::Subtitles => "srt",
            AssetRole::Background => "jpg",
            AssetRole::Font => "ttf",
        }
    }
}

/// Scratch directory and issued-path ledger for a single render job.
///
/// Allocate exactly once per job; release runs at most once and is safe to
/// call again. Paths are never shared across jobs: the directory name and
/// every filename embed the job id.
pub struct JobScratch {
    id: JobId,
    dir: PathBuf,
    fonts_dir: PathBuf,
    issued: Vec<PathBuf>,
    released: bool,
}

impl JobScratch {
    /// Creates the scratch directory for a new job.
    ///
    /// Directory creation is idempotent (`create_dir_all`) so concurrent jobs
    /// sharing the scratch root or fonts directory never race on setup.
    pub fn allocate(config: &CoreConfig) -> CoreResult<Self> {
        let id = JobId::next();
        let dir = config.scratch_dir.join(format!("job-{id}"));
        fs::create_dir_all(&dir)?;
        fs::create_dir_all(&config.fonts_dir)?;
        log::debug!("Allocated scratch directory {} for job {id}", dir.display());
        Ok(Self {
            id,
            dir,
            fonts_dir: config.fonts_dir.clone(),
            issued: Vec::new(),
            released: false,
        })
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes an asset buffer to its scratch path and records the path for
    /// teardown.
    ///
    /// Fonts land in the shared fonts directory under a job-id-prefixed name
    /// so concurrent jobs uploading a font with the same original filename
    /// never overwrite each other. Everything else lands in the job directory
    /// as `{role}-{id}.{ext}`.
    pub fn persist(
        &mut self,
        role: AssetRole,
        bytes: &[u8],
        suggested_name: &str,
    ) -> CoreResult<PathBuf> {
        let path = self.path_for(role, suggested_name);
        fs::write(&path, bytes)?;
        log::debug!(
            "Persisted {} asset ({} bytes) to {}",
            role.prefix(),
            bytes.len(),
            path.display()
        );
        self.issued.push(path.clone());
        Ok(path)
    }

    /// Reserves the output path for the rendered video and records it for
    /// teardown. The file itself is created by the encoding engine.
    pub fn reserve_output(&mut self) -> PathBuf {
        let path = self.dir.join(format!("video-{}.mp4", self.id));
        self.issued.push(path.clone());
        path
    }

    fn path_for(&self, role: AssetRole, suggested_name: &str) -> PathBuf {
        let original = Path::new(suggested_name)
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());

        if role == AssetRole::Font {
            let name = if original.is_empty() {
                format!("font.{}", role.default_extension())
            } else {
                original
            };
            return self.fonts_dir.join(format!("{}-{name}", self.id));
        }

        let extension = Path::new(&original)
            .extension()
            .map_or_else(|| role.default_extension().to_string(), |e| {
                e.to_string_lossy().into_owned()
            });
        self.dir
            .join(format!("{}-{}.{extension}", role.prefix(), self.id))
    }

    /// Deletes every path issued for this job, then the job directory itself.
    ///
    /// Deletion is best-effort per file: a missing file is not an error, and
    /// any other failure is logged without aborting the rest of the sweep.
    /// Calling this more than once is a no-op.
    pub fn release_all(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        for path in &self.issued {
            match fs::remove_file(path) {
                Ok(()) => log::debug!("Removed scratch file {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => log::warn!(
                    "Failed to remove scratch file {} for job {}: {e}",
                    path.display(),
                    self.id
                ),
            }
        }
        if let Err(e) = fs::remove_dir(&self.dir) {
            if e.kind() != ErrorKind::NotFound {
                log::warn!(
                    "Failed to remove scratch directory {} for job {}: {e}",
                    self.dir.display(),
                    self.id
                );
            }
        }
    }
}

impl Drop for JobScratch {
    fn drop(&mut self) {
        self.release_all();
    }
}
