//! Local fixture files
//!
//! The put and get probes need a file to upload from and a file to download
//! into. Every invocation gets its own run id, so fixture names never collide
//! with a concurrent invocation on the same host, and cleanup is a glob over
//! that run's names only.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{Error, Result};

/// Content written to every uploaded probe object
pub const FIXTURE_CONTENT: &[u8] = b"s3checker\ntest\n";

/// Common prefix of every fixture file name and remote probe key
pub const FIXTURE_PREFIX: &str = "s3checker";

static RUN_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Fixture paths and remote keys for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSet {
    dir: PathBuf,
    run_id: String,
}

impl FixtureSet {
    /// Create a fixture set in `dir` with a fresh run id
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let run_id = format!(
            "{}-{}-{}",
            std::process::id(),
            jiff::Timestamp::now().as_millisecond(),
            RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        );
        Self::with_run_id(dir, run_id)
    }

    /// Create a fixture set in the system temp directory
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    /// Create a fixture set with a fixed run id
    pub fn with_run_id(dir: impl Into<PathBuf>, run_id: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            run_id: run_id.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    fn local(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{FIXTURE_PREFIX}-{}-{name}.txt", self.run_id))
    }

    /// Upload source for the put probe
    pub fn put_source(&self) -> PathBuf {
        self.local("put")
    }

    /// Upload source for the object the get probe reads back
    pub fn get_source(&self) -> PathBuf {
        self.local("get-source")
    }

    /// Download sink for the get probe
    pub fn get_sink(&self) -> PathBuf {
        self.local("get")
    }

    /// Remote key written by the put probe
    pub fn put_key(&self) -> String {
        format!("{FIXTURE_PREFIX}-{}-put.txt", self.run_id)
    }

    /// Remote key written and read back by the get probe
    pub fn get_key(&self) -> String {
        format!("{FIXTURE_PREFIX}-{}-get.txt", self.run_id)
    }

    /// Glob pattern matching every local fixture of this run
    pub fn pattern(&self) -> String {
        let dir = glob::Pattern::escape(&self.dir.to_string_lossy());
        Path::new(&dir)
            .join(format!("{FIXTURE_PREFIX}-{}-*.txt", self.run_id))
            .to_string_lossy()
            .into_owned()
    }

    /// Write the fixed probe content to `path`
    pub async fn write_source(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, FIXTURE_CONTENT).await?;
        tracing::debug!(path = %path.display(), "Wrote fixture file");
        Ok(())
    }

    /// Remove every local file matching this run's pattern
    ///
    /// Keeps going past individual failures and reports all of them at the end.
    /// Returns the removed paths on success.
    pub fn cleanup(&self) -> Result<Vec<PathBuf>> {
        // A lossy pattern would match nothing and leave the fixtures behind
        if self.dir.to_str().is_none() {
            return Err(Error::Cleanup(format!(
                "{}: fixture directory is not valid UTF-8",
                self.dir.display()
            )));
        }

        let mut removed = Vec::new();
        let mut failures = Vec::new();

        for entry in glob::glob(&self.pattern())? {
            match entry {
                Ok(path) => match std::fs::remove_file(&path) {
                    Ok(()) => removed.push(path),
                    Err(e) => failures.push(format!("{}: {e}", path.display())),
                },
                Err(e) => failures.push(e.to_string()),
            }
        }

        tracing::debug!(count = removed.len(), "Removed fixture files");

        if failures.is_empty() {
            Ok(removed)
        } else {
            Err(Error::Cleanup(failures.join("; ")))
        }
    }
}
