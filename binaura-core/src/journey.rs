//! Journeys - scripted sequences of frequency stages played unattended
//!
//! A `JourneyScheduler` owns at most one `JourneyRun`. The host calls
//! `tick` periodically (once a second is plenty); each tick resolves the
//! stage for the elapsed time by walking cumulative stage boundaries, so a
//! late or skipped tick never shifts later stages. Stage changes retune the
//! running oscillator pair; the pair is only stopped on completion or
//! cancellation.

use crate::catalog::{Band, CatalogError};
use binaura_audio::{ToneEngine, ToneError, ToneHandle};
use std::time::Duration;
use thiserror::Error;

/// Errors raised when starting a journey
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JourneyError {
    #[error("invalid journey preset: {0}")]
    InvalidPreset(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Audio(#[from] ToneError),
}

/// One step of a journey
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JourneyStage {
    pub band: Band,
    pub frequency_index: usize,
    pub duration: Duration,
}

impl JourneyStage {
    pub fn new(band: Band, frequency_index: usize, duration_secs: u64) -> Self {
        Self {
            band,
            frequency_index,
            duration: Duration::from_secs(duration_secs),
        }
    }

    /// Beat frequency this stage targets
    pub fn beat_hz(&self) -> Result<f32, CatalogError> {
        self.band.frequency(self.frequency_index).map(|f| f.hz)
    }
}

/// Immutable journey definition
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyPreset {
    pub name: String,
    pub description: String,
    pub stages: Vec<JourneyStage>,
}

impl JourneyPreset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        stages: Vec<JourneyStage>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            stages,
        }
    }

    /// Sum of all stage durations
    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    /// Check the preset can actually be played
    pub fn validate(&self) -> Result<(), JourneyError> {
        if self.stages.is_empty() {
            return Err(JourneyError::InvalidPreset(format!(
                "{} has no stages",
                self.name
            )));
        }
        for (i, stage) in self.stages.iter().enumerate() {
            if stage.duration.is_zero() {
                return Err(JourneyError::InvalidPreset(format!(
                    "{} stage {} has zero duration",
                    self.name, i
                )));
            }
            stage.beat_hz()?;
        }
        Ok(())
    }

    /// Stage index for a point in time, or `None` once the journey is over
    pub fn stage_at(&self, elapsed: Duration) -> Option<usize> {
        let mut boundary = Duration::ZERO;
        for (i, stage) in self.stages.iter().enumerate() {
            boundary += stage.duration;
            if elapsed < boundary {
                return Some(i);
            }
        }
        None
    }

    /// Whether `name` refers to this preset (case and separator insensitive)
    pub fn matches(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Journeys that ship with the engine
pub fn builtin_journeys() -> Vec<JourneyPreset> {
    vec![
        JourneyPreset::new(
            "unwind",
            "Ease from everyday awareness into meditation",
            vec![
                JourneyStage::new(Band::Alpha, 1, 300),
                JourneyStage::new(Band::Alpha, 0, 300),
                JourneyStage::new(Band::Theta, 2, 300),
                JourneyStage::new(Band::Theta, 1, 600),
            ],
        ),
        JourneyPreset::new(
            "deep-sleep",
            "Guide the mind down into restorative sleep",
            vec![
                JourneyStage::new(Band::Alpha, 0, 300),
                JourneyStage::new(Band::Theta, 1, 600),
                JourneyStage::new(Band::Theta, 0, 600),
                JourneyStage::new(Band::Delta, 2, 600),
                JourneyStage::new(Band::Delta, 1, 900),
                JourneyStage::new(Band::Delta, 0, 1200),
            ],
        ),
        JourneyPreset::new(
            "reprogram",
            "Theta session for affirmation work, returning to alert calm",
            vec![
                JourneyStage::new(Band::Alpha, 1, 300),
                JourneyStage::new(Band::Theta, 1, 900),
                JourneyStage::new(Band::Alpha, 1, 300),
            ],
        ),
    ]
}

/// Where a journey is relative to its script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JourneyStatus {
    #[default]
    NotStarted,
    Stage(usize),
    Completed,
    Cancelled,
}

/// Progress report for display
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyProgress {
    pub name: String,
    pub stage_index: usize,
    pub stage_count: usize,
    pub beat_hz: f32,
    pub elapsed: Duration,
    pub total: Duration,
    /// 0.0 - 100.0, relative to the total duration
    pub percent: f32,
}

/// Result of one scheduler tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No journey is running
    Idle,
    /// Still inside the same stage
    Running(JourneyProgress),
    /// Moved into a new stage; the pair was retuned
    Advanced { from: usize, progress: JourneyProgress },
    /// Script finished; the pair was stopped
    Completed(JourneyProgress),
}

/// A journey in progress
#[derive(Debug, Clone)]
pub struct JourneyRun {
    preset: JourneyPreset,
    current_stage: usize,
    started_at: Duration,
    handle: ToneHandle,
    carrier_hz: f32,
}

impl JourneyRun {
    pub fn preset(&self) -> &JourneyPreset {
        &self.preset
    }

    pub fn current_stage(&self) -> usize {
        self.current_stage
    }

    pub fn handle(&self) -> ToneHandle {
        self.handle
    }

    fn progress(&self, now: Duration) -> JourneyProgress {
        let total = self.preset.total_duration();
        let elapsed = now.saturating_sub(self.started_at).min(total);
        let percent = if total.is_zero() {
            100.0
        } else {
            (elapsed.as_secs_f64() / total.as_secs_f64() * 100.0).min(100.0) as f32
        };
        let stage = &self.preset.stages[self.current_stage];
        JourneyProgress {
            name: self.preset.name.clone(),
            stage_index: self.current_stage,
            stage_count: self.preset.stages.len(),
            beat_hz: stage.beat_hz().unwrap_or_default(),
            elapsed,
            total,
            percent,
        }
    }
}

/// Drives the tone engine through a journey's stages
///
/// Assumes the caller has already arbitrated exclusivity: nothing else is
/// using the tone engine when `start` is called.
#[derive(Debug, Default)]
pub struct JourneyScheduler {
    run: Option<JourneyRun>,
    status: JourneyStatus,
}

impl JourneyScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn status(&self) -> JourneyStatus {
        self.status
    }

    pub fn current(&self) -> Option<&JourneyRun> {
        self.run.as_ref()
    }

    /// Tone handle of the running journey
    pub fn handle(&self) -> Option<ToneHandle> {
        self.run.as_ref().map(|r| r.handle)
    }

    /// Start `preset` at stage 0
    pub fn start<E: ToneEngine>(
        &mut self,
        engine: &mut E,
        preset: JourneyPreset,
        carrier_hz: f32,
        volume: f32,
        now: Duration,
    ) -> Result<JourneyProgress, JourneyError> {
        preset.validate()?;

        if self.run.is_some() {
            tracing::warn!("journey started over a running journey");
            self.stop(engine);
        }

        let beat_hz = preset.stages[0].beat_hz()?;
        let handle = engine.start(carrier_hz, beat_hz, volume)?;

        tracing::info!(
            journey = %preset.name,
            stages = preset.stages.len(),
            total_secs = preset.total_duration().as_secs(),
            "journey started"
        );

        let run = JourneyRun {
            preset,
            current_stage: 0,
            started_at: now,
            handle,
            carrier_hz,
        };
        let progress = run.progress(now);
        self.run = Some(run);
        self.status = JourneyStatus::Stage(0);
        Ok(progress)
    }

    /// Advance the journey to `now`
    pub fn tick<E: ToneEngine>(&mut self, engine: &mut E, now: Duration) -> TickOutcome {
        let Some(run) = self.run.as_mut() else {
            return TickOutcome::Idle;
        };

        let elapsed = now.saturating_sub(run.started_at);
        let Some(stage_index) = run.preset.stage_at(elapsed) else {
            let mut progress = run.progress(now);
            progress.percent = 100.0;
            engine.stop(run.handle);
            tracing::info!(journey = %run.preset.name, "journey completed");
            self.run = None;
            self.status = JourneyStatus::Completed;
            return TickOutcome::Completed(progress);
        };

        if stage_index == run.current_stage {
            return TickOutcome::Running(run.progress(now));
        }

        let from = run.current_stage;
        let stage = run.preset.stages[stage_index];
        // Validated on start
        let beat_hz = stage.beat_hz().unwrap_or_default();
        engine.set_frequency(run.handle, run.carrier_hz, beat_hz);
        run.current_stage = stage_index;
        self.status = JourneyStatus::Stage(stage_index);

        tracing::debug!(
            journey = %run.preset.name,
            from,
            to = stage_index,
            beat_hz,
            "journey stage advanced"
        );

        TickOutcome::Advanced {
            from,
            progress: run.progress(now),
        }
    }

    /// Cancel the running journey. Returns whether one was running.
    pub fn stop<E: ToneEngine>(&mut self, engine: &mut E) -> bool {
        match self.run.take() {
            Some(run) => {
                engine.stop(run.handle);
                self.status = JourneyStatus::Cancelled;
                tracing::info!(journey = %run.preset.name, "journey cancelled");
                true
            }
            None => false,
        }
    }

    /// Progress at `now` without advancing anything
    pub fn progress(&self, now: Duration) -> Option<JourneyProgress> {
        self.run.as_ref().map(|r| r.progress(now))
    }
}
