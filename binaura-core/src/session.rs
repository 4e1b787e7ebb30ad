//! Session clock - times one listening session and keeps running totals

use crate::clock::Clock;
use crate::companion::SessionTimer;
use std::time::Duration;
use thiserror::Error;

/// Selectable session lengths in minutes
pub const SESSION_LENGTHS: [u32; 7] = [5, 10, 15, 20, 30, 45, 60];

pub const DEFAULT_SESSION_MINUTES: u32 = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("unsupported session length: {0} minutes")]
    UnsupportedLength(u32),
    #[error("cannot change length while a session is running")]
    Running,
}

/// Totals across completed sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total_sessions: u32,
    pub total_time: Duration,
}

/// Counts up while any activity is playing
pub struct SessionClock<C: Clock> {
    clock: C,
    length: Duration,
    started_at: Option<Duration>,
    stats: SessionStats,
}

impl<C: Clock> SessionClock<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            length: minutes(DEFAULT_SESSION_MINUTES),
            started_at: None,
            stats: SessionStats::default(),
        }
    }

    pub fn set_length_minutes(&mut self, length: u32) -> Result<(), SessionError> {
        if !SESSION_LENGTHS.contains(&length) {
            return Err(SessionError::UnsupportedLength(length));
        }
        if self.is_running() {
            return Err(SessionError::Running);
        }
        self.length = minutes(length);
        Ok(())
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at
            .map(|start| self.clock.now().saturating_sub(start))
            .unwrap_or_default()
    }

    pub fn remaining(&self) -> Duration {
        self.length.saturating_sub(self.elapsed())
    }

    /// 0.0 - 100.0
    pub fn progress_percent(&self) -> f32 {
        if self.length.is_zero() {
            return 0.0;
        }
        (self.elapsed().as_secs_f64() / self.length.as_secs_f64() * 100.0).min(100.0) as f32
    }

    /// Running session has reached its length
    pub fn is_expired(&self) -> bool {
        self.is_running() && self.elapsed() >= self.length
    }

    /// Remaining time as MM:SS
    pub fn remaining_label(&self) -> String {
        let secs = self.remaining().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}

impl<C: Clock> SessionTimer for SessionClock<C> {
    fn activity_started(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
            tracing::debug!(minutes = self.length.as_secs() / 60, "session started");
        }
    }

    fn activity_stopped(&mut self) {
        if self.started_at.is_none() {
            return;
        }
        let listened = self.elapsed().min(self.length);
        self.started_at = None;
        self.stats.total_sessions += 1;
        self.stats.total_time += listened;
        tracing::info!(
            secs = listened.as_secs(),
            total_sessions = self.stats.total_sessions,
            "session recorded"
        );
    }
}

fn minutes(m: u32) -> Duration {
    Duration::from_secs(u64::from(m) * 60)
}
