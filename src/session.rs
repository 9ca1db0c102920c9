//! The tail session controller: polling, rotation policy and session timing.
//!
//! A session repeatedly reads the source file from the tracked offset, decides
//! whether the producer rotated the file, and appends new bytes to the result
//! file for the current rotation count. Rotation is inferred, never observed:
//!
//! * a stale poll whose offset has reached the size ceiling,
//! * `stale_ceiling` consecutive stale polls,
//! * optionally, a file that has shrunk below the tracked offset.
//!
//! All state lives in [`SessionState`], owned by one [`TailSession`] and only
//! touched between polls.

use crate::config::SessionConfig;
use crate::error::Result;
use crate::reader::{PollResult, detect_file_truncation, read_from_offset};
use crate::sink::{append_to_sink, sink_path};
use std::fmt;
use std::future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Mutable position of a session. Starts at all zeros and is never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Bytes of the source already consumed.
    pub offset: u64,
    /// Rotations detected so far. Selects the result file.
    pub rotation: u64,
    /// Consecutive polls that saw no new bytes.
    pub stale_reads: u64,
}

/// Which heuristic declared a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationReason {
    SizeCeiling,
    StaleCeiling,
    Truncated,
}

impl fmt::Display for RotationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RotationReason::SizeCeiling => "offset reached size ceiling",
            RotationReason::StaleCeiling => "too many polls without new bytes",
            RotationReason::Truncated => "file shrank below offset",
        };
        f.write_str(reason)
    }
}

/// What a single poll did to the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PollOutcome {
    /// New bytes to forward to the current result file.
    Captured(Vec<u8>),
    /// Nothing new and no rotation.
    Stale,
    /// Nothing new and a rotation was declared.
    Rotated(RotationReason),
}

/// Rotation thresholds, copied out of the config so state transitions stay pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Thresholds {
    pub size_ceiling: u64,
    pub stale_ceiling: u64,
    pub detect_truncation: bool,
}

impl From<&SessionConfig> for Thresholds {
    fn from(config: &SessionConfig) -> Self {
        Self {
            size_ceiling: config.size_ceiling,
            stale_ceiling: config.stale_ceiling,
            detect_truncation: config.detect_truncation,
        }
    }
}

impl SessionState {
    /// Fold one poll result into the state.
    ///
    /// On new bytes the offset advances to the read's end offset and the stale
    /// count resets. On a stale poll the rotation checks run in order and at most
    /// one fires. The size check leaves the stale count alone.
    pub(crate) fn apply(&mut self, result: PollResult, thresholds: Thresholds) -> PollOutcome {
        if result.has_new_bytes(self.offset) {
            self.stale_reads = 0;
            self.offset = result.end_offset;
            return PollOutcome::Captured(result.bytes);
        }

        self.stale_reads += 1;

        if thresholds.detect_truncation && detect_file_truncation(result.file_len, self.offset) {
            self.offset = 0;
            self.stale_reads = 0;
            self.rotation += 1;
            PollOutcome::Rotated(RotationReason::Truncated)
        } else if self.offset >= thresholds.size_ceiling {
            self.offset = 0;
            self.rotation += 1;
            PollOutcome::Rotated(RotationReason::SizeCeiling)
        } else if self.stale_reads >= thresholds.stale_ceiling {
            self.offset = 0;
            self.stale_reads = 0;
            self.rotation += 1;
            PollOutcome::Rotated(RotationReason::StaleCeiling)
        } else {
            PollOutcome::Stale
        }
    }
}

/// A point far enough ahead to stand in for an interval too large to add to `now`.
fn far_future(now: Instant) -> Instant {
    now + Duration::from_secs(86400 * 365 * 30)
}

/// Totals reported when a session ends normally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub polls: u64,
    pub bytes_captured: u64,
    pub rotations: u64,
    pub final_offset: u64,
}

/// Progress narration for observers of a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// New bytes were appended to `sink`.
    Captured {
        bytes: u64,
        offset: u64,
        rotation: u64,
        sink: PathBuf,
        elapsed: Duration,
    },
    /// A poll saw no new bytes.
    Stale { offset: u64, stale_reads: u64 },
    /// A rotation was declared; the next poll reads from offset zero.
    Rotated {
        reason: RotationReason,
        rotation: u64,
    },
    /// The session deadline elapsed.
    Finished { summary: SessionSummary },
}

/// One bounded tailing run over a single source file.
pub struct TailSession {
    config: SessionConfig,
    state: SessionState,
    summary: SessionSummary,
    events: Option<mpsc::UnboundedSender<Result<SessionEvent>>>,
}

impl TailSession {
    /// Creates a session after validating `config`.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            state: SessionState::default(),
            summary: SessionSummary::default(),
            events: None,
        })
    }

    /// Forward progress events to `tx` in addition to logging them.
    pub(crate) fn with_events(mut self, tx: mpsc::UnboundedSender<Result<SessionEvent>>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run one poll iteration: read, evaluate, and write any new bytes.
    pub async fn poll_once(&mut self) -> Result<()> {
        tracing::info!(offset = self.state.offset, "polling source file");

        let result = read_from_offset(&self.config.source, self.state.offset).await?;
        let elapsed = result.elapsed;
        self.summary.polls += 1;

        match self.state.apply(result, Thresholds::from(&self.config)) {
            PollOutcome::Captured(bytes) => {
                let sink = sink_path(&self.config.source, self.state.rotation)?;
                tracing::info!(
                    bytes = bytes.len(),
                    cost_ms = elapsed.as_millis() as u64,
                    offset = self.state.offset,
                    sink = %sink.display(),
                    "read new bytes, offset updated"
                );

                // The offset is already advanced; a failed write loses these bytes.
                append_to_sink(&sink, &bytes).await?;

                self.summary.bytes_captured += bytes.len() as u64;
                self.emit(SessionEvent::Captured {
                    bytes: bytes.len() as u64,
                    offset: self.state.offset,
                    rotation: self.state.rotation,
                    sink,
                    elapsed,
                });
            }
            PollOutcome::Stale => {
                tracing::info!(
                    offset = self.state.offset,
                    stale_reads = self.state.stale_reads,
                    "no new bytes in file"
                );
                self.emit(SessionEvent::Stale {
                    offset: self.state.offset,
                    stale_reads: self.state.stale_reads,
                });
            }
            PollOutcome::Rotated(reason) => {
                tracing::info!(
                    %reason,
                    rotation = self.state.rotation,
                    "rotation detected, offset reset"
                );
                self.emit(SessionEvent::Rotated {
                    reason,
                    rotation: self.state.rotation,
                });
            }
        }

        Ok(())
    }

    /// Poll until the session duration elapses or a poll fails.
    pub async fn run(self) -> Result<SessionSummary> {
        self.run_until(future::pending()).await
    }

    /// Like [`TailSession::run`], but also stops once `shutdown` completes.
    pub(crate) async fn run_until<F>(mut self, shutdown: F) -> Result<SessionSummary>
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        let deadline = tokio::time::sleep(self.config.duration);
        tokio::pin!(deadline);
        tokio::pin!(shutdown);

        let first_tick = started
            .checked_add(self.config.poll_interval)
            .unwrap_or_else(|| far_future(started));
        let mut ticker = interval_at(first_tick, self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            source = %self.config.source.display(),
            duration_secs = self.config.duration.as_secs_f64(),
            interval_secs = self.config.poll_interval.as_secs_f64(),
            size_ceiling = self.config.size_ceiling,
            stale_ceiling = self.config.stale_ceiling,
            "tail session started"
        );

        loop {
            if let Err(e) = self.poll_once().await {
                tracing::error!(error = %e, "tail session failed");
                return Err(e);
            }

            tokio::select! {
                biased;
                _ = &mut deadline => break,
                _ = &mut shutdown => {
                    tracing::debug!("tail session shut down by observer");
                    break;
                }
                _ = ticker.tick() => continue,
            }
        }

        self.summary.rotations = self.state.rotation;
        self.summary.final_offset = self.state.offset;

        tracing::info!(
            polls = self.summary.polls,
            bytes = self.summary.bytes_captured,
            rotations = self.summary.rotations,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "tail session finished"
        );
        self.emit(SessionEvent::Finished {
            summary: self.summary,
        });

        Ok(self.summary)
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            // Observer may have gone away; the session keeps running regardless.
            let _ = tx.send(Ok(event));
        }
    }

    /// A handle for reporting the session's fatal error after `run` consumes it.
    pub(crate) fn reporter(&self) -> Option<mpsc::UnboundedSender<Result<SessionEvent>>> {
        self.events.clone()
    }
}
