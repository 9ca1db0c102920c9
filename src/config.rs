//! Session settings, fixed for the lifetime of one session.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bytes in one megabyte as used by the size ceiling.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_SIZE_CEILING_MB: u64 = 1;
pub const DEFAULT_STALE_CEILING: u64 = 5;

/// Settings for one tail session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// File being tailed.
    pub source: PathBuf,
    /// Wall-clock budget for the whole session.
    pub duration: Duration,
    /// Wait between polls.
    pub poll_interval: Duration,
    /// Offset, in bytes, at which a stale poll declares a rotation.
    pub size_ceiling: u64,
    /// Consecutive stale polls that declare a rotation.
    pub stale_ceiling: u64,
    /// Also declare a rotation when the file shrinks below the tracked offset.
    pub detect_truncation: bool,
}

impl SessionConfig {
    pub fn new<P: AsRef<Path>>(source: P) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            duration: Duration::ZERO,
            poll_interval: DEFAULT_POLL_INTERVAL,
            size_ceiling: DEFAULT_SIZE_CEILING_MB * BYTES_PER_MB,
            stale_ceiling: DEFAULT_STALE_CEILING,
            detect_truncation: false,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_size_ceiling_bytes(mut self, bytes: u64) -> Self {
        self.size_ceiling = bytes;
        self
    }

    /// Size ceiling in megabytes. Saturates rather than overflowing.
    pub fn with_size_ceiling_mb(self, megabytes: u64) -> Self {
        self.with_size_ceiling_bytes(megabytes.saturating_mul(BYTES_PER_MB))
    }

    pub fn with_stale_ceiling(mut self, polls: u64) -> Self {
        self.stale_ceiling = polls;
        self
    }

    pub fn with_truncation_detection(mut self, enabled: bool) -> Self {
        self.detect_truncation = enabled;
        self
    }

    /// Reject settings that cannot drive a session.
    pub fn validate(&self) -> Result<()> {
        if self.source.file_name().is_none() {
            return Err(Error::InvalidPath {
                message: format!("{} has no file name", self.source.display()),
            });
        }

        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig {
                message: "poll interval must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
