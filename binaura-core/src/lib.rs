//! Playback logic for Binaura
//!
//! - Catalog: bands and their discrete beat frequencies
//! - Journey: timed stage scripts and the scheduler that plays them
//! - Controller: the single owner of the tone engine, one activity at a time
//! - Session: listening timer and totals
//! - Config: persisted preferences

mod catalog;
mod clock;
mod companion;
mod config;
mod controller;
#[cfg(test)]
mod fake;
mod journey;
mod mix;
mod session;

pub use catalog::{band_frequency, Band, BandFrequency, CatalogError, FrequencyBand};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use companion::{Companion, CompanionKind, SessionTimer};
pub use config::Config;
pub use controller::{
    PlaybackController, PlaybackError, PlaybackMode, PlaybackStatus, DEFAULT_CARRIER_HZ, DEFAULT_VOLUME,
};
pub use journey::{
    builtin_journeys, JourneyError, JourneyPreset, JourneyProgress, JourneyRun, JourneyScheduler, JourneyStage,
    JourneyStatus, TickOutcome,
};
pub use mix::{mix_preset, MixPreset, MIX_PRESETS};
pub use session::{SessionClock, SessionError, SessionStats, DEFAULT_SESSION_MINUTES, SESSION_LENGTHS};
