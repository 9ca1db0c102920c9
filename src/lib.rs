//! A log tailer that copies newly appended bytes out of a rotating log file.
//!
//! A session polls one source file at a fixed interval for a fixed duration.
//! Bytes past the tracked offset are appended to `result_<n>_<file name>` next
//! to the source, where `n` counts the rotations detected so far. Rotation is
//! inferred from polling alone: no filesystem notifications are used.
//!
//! # Example
//!
//! ```rust,no_run
//! use log_tailer::{SessionConfig, run_session};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::new("/var/log/app.log")
//!         .with_duration(Duration::from_secs(600))
//!         .with_poll_interval(Duration::from_secs(5));
//!
//!     let summary = run_session(config).await?;
//!     println!("captured {} bytes", summary.bytes_captured);
//!
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod reader;
mod session;
mod sink;
mod stream;

#[cfg(test)]
mod test_helpers;

pub use config::{
    BYTES_PER_MB, DEFAULT_POLL_INTERVAL, DEFAULT_SIZE_CEILING_MB, DEFAULT_STALE_CEILING,
    SessionConfig,
};
pub use error::{Error, Result};
pub use session::{RotationReason, SessionEvent, SessionState, SessionSummary, TailSession};
pub use sink::sink_path;
pub use stream::SessionStream;

use tokio_stream::Stream;

/// Runs a tail session to completion on the current task.
///
/// Returns once the session duration elapses, or with the first fatal I/O error.
pub async fn run_session(config: SessionConfig) -> Result<SessionSummary> {
    TailSession::new(config)?.run().await
}

/// Starts a tail session in the background and streams its progress.
///
/// # Example
///
/// ```rust,no_run
/// use log_tailer::{SessionConfig, SessionEvent, watch_session};
/// use std::time::Duration;
/// use tokio_stream::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = SessionConfig::new("app.log").with_duration(Duration::from_secs(60));
///     let mut events = watch_session(config)?;
///
///     while let Some(event) = events.next().await {
///         if let SessionEvent::Rotated { rotation, .. } = event? {
///             println!("now writing result_{}_app.log", rotation);
///         }
///     }
///
///     Ok(())
/// }
/// ```
pub fn watch_session(config: SessionConfig) -> Result<impl Stream<Item = Result<SessionEvent>>> {
    SessionStream::new(config)
}
