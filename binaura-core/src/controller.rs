//! Playback mode controller - one psychoacoustic activity at a time
//!
//! The controller is the only component that decides what the tone engine
//! is doing. A held frequency and a journey are mutually exclusive; every
//! transition stops the old activity before the new one starts, except a
//! held-to-held switch, which retunes the running pair in place.

use crate::catalog::{band_frequency, Band, CatalogError};
use crate::clock::{Clock, MonotonicClock};
use crate::companion::{Companion, CompanionKind, SessionTimer};
use crate::journey::{builtin_journeys, JourneyError, JourneyPreset, JourneyScheduler, TickOutcome};
use crate::mix::{mix_preset, MixPreset};
use binaura_audio::{ToneEngine, ToneError, ToneHandle};
use std::fmt;
use thiserror::Error;

/// Default carrier tone in Hz
pub const DEFAULT_CARRIER_HZ: f32 = 200.0;
/// Default binaural volume
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Errors surfaced to the UI layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// Recoverable: the user should retry on their next interaction
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
    #[error("no frequency {index} in band {band}")]
    InvalidIndex { band: Band, index: usize },
    #[error("invalid preset: {0}")]
    InvalidPreset(String),
    #[error("unknown mix preset: {0}")]
    UnknownMixPreset(String),
}

impl From<ToneError> for PlaybackError {
    fn from(err: ToneError) -> Self {
        match err {
            ToneError::AudioUnavailable(reason) => PlaybackError::AudioUnavailable(reason),
        }
    }
}

impl From<CatalogError> for PlaybackError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidIndex { band, index } => PlaybackError::InvalidIndex { band, index },
            CatalogError::UnknownBand(name) => PlaybackError::InvalidPreset(format!("unknown band: {}", name)),
        }
    }
}

impl From<JourneyError> for PlaybackError {
    fn from(err: JourneyError) -> Self {
        match err {
            JourneyError::InvalidPreset(reason) => PlaybackError::InvalidPreset(reason),
            JourneyError::Catalog(e) => e.into(),
            JourneyError::Audio(e) => e.into(),
        }
    }
}

/// What the engine is currently doing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlaybackMode {
    #[default]
    Idle,
    HeldFrequency { band: Band, index: usize },
    Journey { name: String },
}

impl PlaybackMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, PlaybackMode::Idle)
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackMode::Idle => f.write_str("idle"),
            PlaybackMode::HeldFrequency { band, index } => write!(f, "{} {}", band, index + 1),
            PlaybackMode::Journey { name } => write!(f, "journey {}", name),
        }
    }
}

/// Snapshot for display
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackStatus {
    pub mode: PlaybackMode,
    /// Beat frequency being played, if any
    pub current_frequency_hz: Option<f32>,
    /// (stage index, stage count) of the running journey
    pub stage: Option<(usize, usize)>,
    pub progress_percent: Option<f32>,
    pub volume: f32,
    pub carrier_hz: f32,
}

/// Top-level state machine over the tone engine and journey scheduler
pub struct PlaybackController<E: ToneEngine, C: Clock = MonotonicClock> {
    engine: E,
    clock: C,
    scheduler: JourneyScheduler,
    journeys: Vec<JourneyPreset>,
    mode: PlaybackMode,
    held: Option<ToneHandle>,
    carrier_hz: f32,
    volume: f32,
    timer: Option<Box<dyn SessionTimer>>,
    companions: Vec<Box<dyn Companion>>,
}

impl<E: ToneEngine, C: Clock> PlaybackController<E, C> {
    pub fn new(engine: E, clock: C) -> Self {
        Self {
            engine,
            clock,
            scheduler: JourneyScheduler::new(),
            journeys: builtin_journeys(),
            mode: PlaybackMode::Idle,
            held: None,
            carrier_hz: DEFAULT_CARRIER_HZ,
            volume: DEFAULT_VOLUME,
            timer: None,
            companions: Vec::new(),
        }
    }

    pub fn with_carrier(mut self, carrier_hz: f32) -> Self {
        self.carrier_hz = carrier_hz.max(1.0);
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn with_journeys(mut self, journeys: Vec<JourneyPreset>) -> Self {
        self.journeys = journeys;
        self
    }

    pub fn with_session_timer(mut self, timer: impl SessionTimer + 'static) -> Self {
        self.timer = Some(Box::new(timer));
        self
    }

    pub fn add_companion(&mut self, companion: impl Companion + 'static) {
        self.companions.push(Box::new(companion));
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn mode(&self) -> &PlaybackMode {
        &self.mode
    }

    pub fn journeys(&self) -> &[JourneyPreset] {
        &self.journeys
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn carrier_hz(&self) -> f32 {
        self.carrier_hz
    }

    /// Let the engine process audio-path notifications. Call from the host loop.
    ///
    /// If the output was lost under an active mode, the activity is dropped
    /// and the controller falls back to Idle; the next activation reopens it.
    pub fn poll_engine(&mut self) -> Result<(), PlaybackError> {
        self.engine.poll();
        if self.output_lost() {
            tracing::warn!(mode = %self.mode, "audio output lost");
            self.release_current();
            self.transition(PlaybackMode::Idle);
            return Err(PlaybackError::AudioUnavailable("audio output was lost".into()));
        }
        Ok(())
    }

    /// Hold one catalog frequency; the same one again turns it off
    pub fn activate_held_frequency(&mut self, band: Band, index: usize) -> Result<(), PlaybackError> {
        let beat_hz = band_frequency(band, index)?;

        let held_now = match self.mode {
            PlaybackMode::HeldFrequency { band, index } => Some((band, index)),
            _ => None,
        };

        if held_now == Some((band, index)) {
            tracing::debug!(%band, index, "held frequency toggled off");
            self.release_current();
            self.transition(PlaybackMode::Idle);
            return Ok(());
        }

        // Only a pair that is still sounding can be retuned in place
        if let Some(handle) = self.held.filter(|_| held_now.is_some() && self.engine.state().is_active) {
            self.engine.set_frequency(handle, self.carrier_hz, beat_hz);
            if self.engine.state().is_active {
                self.transition(PlaybackMode::HeldFrequency { band, index });
                tracing::debug!(%band, index, beat_hz, "held frequency retuned");
                return Ok(());
            }
        }

        self.release_current();
        match self.engine.start(self.carrier_hz, beat_hz, self.volume) {
            Ok(handle) => {
                self.held = Some(handle);
                self.transition(PlaybackMode::HeldFrequency { band, index });
                tracing::debug!(%band, index, beat_hz, "held frequency started");
                Ok(())
            }
            Err(e) => {
                self.transition(PlaybackMode::Idle);
                tracing::warn!("could not start tone: {}", e);
                Err(e.into())
            }
        }
    }

    /// Start a journey by name; the running journey's name again stops it
    pub fn activate_journey(&mut self, name: &str) -> Result<(), PlaybackError> {
        let preset = self
            .journeys
            .iter()
            .find(|j| j.matches(name))
            .cloned()
            .ok_or_else(|| PlaybackError::InvalidPreset(format!("unknown journey: {}", name)))?;

        if let PlaybackMode::Journey { name: current } = &self.mode {
            if preset.matches(current) {
                self.release_current();
                self.transition(PlaybackMode::Idle);
                return Ok(());
            }
        }

        self.release_current();
        let now = self.clock.now();
        let journey_name = preset.name.clone();
        match self
            .scheduler
            .start(&mut self.engine, preset, self.carrier_hz, self.volume, now)
        {
            Ok(_) => {
                self.transition(PlaybackMode::Journey { name: journey_name });
                Ok(())
            }
            Err(e) => {
                self.transition(PlaybackMode::Idle);
                tracing::warn!(journey = %journey_name, "could not start journey: {}", e);
                Err(e.into())
            }
        }
    }

    /// Stop every activity and fan the stop out to all collaborators
    pub fn stop_all(&mut self) {
        self.release_current();
        self.mode = PlaybackMode::Idle;

        if let Some(timer) = self.timer.as_mut() {
            timer.activity_stopped();
        }
        for companion in &mut self.companions {
            companion.stop();
        }
        tracing::info!("all playback stopped");
    }

    /// Advance a running journey. Call periodically from the host loop.
    pub fn tick(&mut self) -> TickOutcome {
        if !matches!(self.mode, PlaybackMode::Journey { .. }) {
            return TickOutcome::Idle;
        }
        if self.output_lost() {
            self.release_current();
            self.transition(PlaybackMode::Idle);
            return TickOutcome::Idle;
        }

        let now = self.clock.now();
        let outcome = self.scheduler.tick(&mut self.engine, now);
        if matches!(outcome, TickOutcome::Completed(_) | TickOutcome::Idle) {
            self.transition(PlaybackMode::Idle);
        }
        outcome
    }

    /// Set binaural volume (0.0 - 1.0); applied live when a tone is playing
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(handle) = self.active_handle() {
            self.engine.set_volume(handle, self.volume);
        }
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    /// Apply a named balance across binaural, music and voice levels
    pub fn apply_mix_preset(&mut self, name: &str) -> Result<&'static MixPreset, PlaybackError> {
        let preset = mix_preset(name).ok_or_else(|| PlaybackError::UnknownMixPreset(name.to_string()))?;

        self.set_volume(MixPreset::level(preset.binaural));
        for companion in &mut self.companions {
            let level = match companion.kind() {
                CompanionKind::Music => preset.music,
                CompanionKind::Voice => preset.voice,
            };
            companion.set_volume(MixPreset::level(level));
        }
        tracing::debug!(preset = preset.name, "mix preset applied");
        Ok(preset)
    }

    /// Beat frequency currently being played
    pub fn current_frequency_hz(&self) -> Option<f32> {
        match &self.mode {
            PlaybackMode::Idle => None,
            PlaybackMode::HeldFrequency { band, index } => band_frequency(*band, *index).ok(),
            PlaybackMode::Journey { .. } => self.scheduler.progress(self.clock.now()).map(|p| p.beat_hz),
        }
    }

    /// Journey progress in percent, if a journey is running
    pub fn progress_percent(&self) -> Option<f32> {
        self.scheduler.progress(self.clock.now()).map(|p| p.percent)
    }

    pub fn status(&self) -> PlaybackStatus {
        let progress = self.scheduler.progress(self.clock.now());
        PlaybackStatus {
            mode: self.mode.clone(),
            current_frequency_hz: self.current_frequency_hz(),
            stage: progress.as_ref().map(|p| (p.stage_index, p.stage_count)),
            progress_percent: progress.map(|p| p.percent),
            volume: self.volume,
            carrier_hz: self.carrier_hz,
        }
    }

    fn output_lost(&self) -> bool {
        self.mode.is_active() && !self.engine.state().is_active
    }

    fn active_handle(&self) -> Option<ToneHandle> {
        self.held.or_else(|| self.scheduler.handle())
    }

    /// Release whatever holds the tone engine, without notifications
    fn release_current(&mut self) {
        self.scheduler.stop(&mut self.engine);
        if let Some(handle) = self.held.take() {
            self.engine.stop(handle);
        }
    }

    /// Change mode and signal the session timer on idle/active edges
    fn transition(&mut self, next: PlaybackMode) {
        let was_active = self.mode.is_active();
        let is_active = next.is_active();
        self.mode = next;

        if let Some(timer) = self.timer.as_mut() {
            match (was_active, is_active) {
                (false, true) => timer.activity_started(),
                (true, false) => timer.activity_stopped(),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::fake::FakeTone;
    use crate::journey::JourneyStage;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Default)]
    struct TimerLog {
        started: usize,
        stopped: usize,
    }

    impl SessionTimer for TimerLog {
        fn activity_started(&mut self) {
            self.started += 1;
        }

        fn activity_stopped(&mut self) {
            self.stopped += 1;
        }
    }

    struct Player {
        kind: CompanionKind,
        stops: usize,
        volume: f32,
    }

    impl Player {
        fn new(kind: CompanionKind) -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self {
                kind,
                stops: 0,
                volume: 1.0,
            }))
        }
    }

    impl Companion for Player {
        fn kind(&self) -> CompanionKind {
            self.kind
        }

        fn stop(&mut self) {
            self.stops += 1;
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
    }

    fn short_journey() -> JourneyPreset {
        JourneyPreset::new(
            "short",
            "5/10/5",
            vec![
                JourneyStage::new(Band::Alpha, 1, 5),
                JourneyStage::new(Band::Theta, 1, 10),
                JourneyStage::new(Band::Delta, 1, 5),
            ],
        )
    }

    fn controller() -> (PlaybackController<FakeTone, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut journeys = builtin_journeys();
        journeys.push(short_journey());
        let controller = PlaybackController::new(FakeTone::new(), clock.clone()).with_journeys(journeys);
        (controller, clock)
    }

    fn assert_exclusive(c: &PlaybackController<FakeTone, ManualClock>) {
        let held = c.held.is_some();
        let journey = c.scheduler.is_running();
        assert!(!(held && journey), "held frequency and journey both active");
        match c.mode() {
            PlaybackMode::Idle => assert!(!held && !journey && c.engine().active().is_none()),
            PlaybackMode::HeldFrequency { .. } => assert!(held && !journey),
            PlaybackMode::Journey { .. } => assert!(journey && !held),
        }
    }

    enum Step {
        Hold(Band, usize),
        Journey(&'static str),
        StopAll,
    }

    #[test]
    fn test_mutual_exclusivity_over_sequence() {
        let (mut c, clock) = controller();
        let steps = [
            Step::Hold(Band::Theta, 0),
            Step::Journey("unwind"),
            Step::Hold(Band::Alpha, 2),
            Step::Hold(Band::Delta, 1),
            Step::Journey("deep-sleep"),
            Step::Journey("reprogram"),
            Step::Journey("reprogram"),
            Step::Hold(Band::Delta, 1),
            Step::Journey("short"),
            Step::Hold(Band::Delta, 1),
            Step::Hold(Band::Delta, 1),
            Step::StopAll,
        ];
        for step in steps {
            match step {
                Step::Hold(band, index) => c.activate_held_frequency(band, index).unwrap(),
                Step::Journey(name) => c.activate_journey(name).unwrap(),
                Step::StopAll => c.stop_all(),
            }
            clock.advance_secs(1);
            c.tick();
            assert_exclusive(&c);
        }
    }

    #[test]
    fn test_held_toggle_turns_off() {
        let (mut c, _) = controller();
        c.activate_held_frequency(Band::Alpha, 1).unwrap();
        assert_eq!(c.mode(), &PlaybackMode::HeldFrequency { band: Band::Alpha, index: 1 });

        c.activate_held_frequency(Band::Alpha, 1).unwrap();
        assert_eq!(c.mode(), &PlaybackMode::Idle);
        assert!(c.engine().active().is_none());
    }

    #[test]
    fn test_restart_builds_fresh_pair() {
        let (mut c, _) = controller();
        c.activate_held_frequency(Band::Theta, 1).unwrap();
        let first = c.engine().active().unwrap();
        c.stop_all();
        c.activate_held_frequency(Band::Theta, 1).unwrap();
        let second = c.engine().active().unwrap();

        assert_ne!(first, second);
        assert!(c.engine().is_dead(first));
        assert!(!c.engine().is_dead(second));
    }

    #[test]
    fn test_held_switch_retunes_live() {
        let (mut c, _) = controller();
        c.activate_held_frequency(Band::Theta, 0).unwrap();
        c.engine_mut().clear_calls();

        c.activate_held_frequency(Band::Alpha, 2).unwrap();

        assert_eq!(c.engine().retunes(), 1);
        assert_eq!(c.engine().starts(), 0);
        assert_eq!(c.engine().stops(), 0);
        assert_eq!(c.current_frequency_hz(), Some(12.0));
        assert_eq!(c.engine().state().beat_frequency_hz, 12.0);
    }

    #[test]
    fn test_held_stops_running_journey_first() {
        let (mut c, _) = controller();
        c.activate_journey("unwind").unwrap();
        let journey_handle = c.engine().active().unwrap();

        c.activate_held_frequency(Band::Delta, 0).unwrap();

        assert!(c.engine().is_dead(journey_handle));
        assert!(!c.scheduler.is_running());
        assert_eq!(c.mode(), &PlaybackMode::HeldFrequency { band: Band::Delta, index: 0 });
    }

    #[test]
    fn test_journey_toggle_and_switch() {
        let (mut c, _) = controller();
        c.activate_journey("Deep Sleep").unwrap();
        assert_eq!(c.mode(), &PlaybackMode::Journey { name: "deep-sleep".into() });

        c.activate_journey("unwind").unwrap();
        assert_eq!(c.mode(), &PlaybackMode::Journey { name: "unwind".into() });
        assert_eq!(c.engine().stops(), 1);

        c.activate_journey("UNWIND").unwrap();
        assert_eq!(c.mode(), &PlaybackMode::Idle);
        assert!(c.engine().active().is_none());
    }

    #[test]
    fn test_journey_runs_to_completion() {
        let (mut c, clock) = controller();
        c.activate_journey("short").unwrap();

        clock.advance_secs(4);
        c.tick();
        assert_eq!(c.status().stage, Some((0, 3)));

        clock.advance_secs(2);
        c.tick();
        assert_eq!(c.status().stage, Some((1, 3)));
        assert_eq!(c.current_frequency_hz(), Some(6.0));

        clock.advance_secs(10);
        c.tick();
        assert_eq!(c.status().stage, Some((2, 3)));

        clock.advance_secs(4);
        assert!(matches!(c.tick(), TickOutcome::Completed(_)));
        assert_eq!(c.mode(), &PlaybackMode::Idle);
        assert!(c.engine().active().is_none());
        assert_eq!(c.progress_percent(), None);
    }

    #[test]
    fn test_stop_all_when_idle() {
        let (mut c, _) = controller();
        c.stop_all();
        assert_eq!(c.mode(), &PlaybackMode::Idle);
        assert!(c.engine().calls.is_empty());
    }

    #[test]
    fn test_stop_all_fans_out() {
        let timer = Rc::new(RefCell::new(TimerLog::default()));
        let music = Player::new(CompanionKind::Music);
        let voice = Player::new(CompanionKind::Voice);
        let (c, _) = controller();
        let mut c = c.with_session_timer(timer.clone());
        c.add_companion(music.clone());
        c.add_companion(voice.clone());

        c.activate_journey("unwind").unwrap();
        c.stop_all();

        assert_eq!(timer.borrow().started, 1);
        assert_eq!(timer.borrow().stopped, 1);
        assert_eq!(music.borrow().stops, 1);
        assert_eq!(voice.borrow().stops, 1);
        assert!(c.engine().active().is_none());
    }

    #[test]
    fn test_timer_sees_only_idle_edges() {
        let timer = Rc::new(RefCell::new(TimerLog::default()));
        let (c, clock) = controller();
        let mut c = c.with_session_timer(timer.clone());

        c.activate_held_frequency(Band::Theta, 1).unwrap();
        c.activate_held_frequency(Band::Alpha, 1).unwrap();
        c.activate_journey("short").unwrap();
        assert_eq!(timer.borrow().started, 1);
        assert_eq!(timer.borrow().stopped, 0);

        clock.advance_secs(25);
        c.tick();
        assert_eq!(timer.borrow().stopped, 1);
    }

    #[test]
    fn test_audio_unavailable_returns_to_idle() {
        let (mut c, _) = controller();
        c.engine_mut().unavailable = true;

        let err = c.activate_held_frequency(Band::Alpha, 0).unwrap_err();
        assert!(matches!(err, PlaybackError::AudioUnavailable(_)));
        assert_eq!(c.mode(), &PlaybackMode::Idle);

        let err = c.activate_journey("unwind").unwrap_err();
        assert!(matches!(err, PlaybackError::AudioUnavailable(_)));
        assert_eq!(c.mode(), &PlaybackMode::Idle);

        // User taps again once audio is allowed
        c.engine_mut().unavailable = false;
        c.activate_held_frequency(Band::Alpha, 0).unwrap();
        assert!(c.mode().is_active());
    }

    #[test]
    fn test_audio_failure_after_stop_ends_activity() {
        let timer = Rc::new(RefCell::new(TimerLog::default()));
        let (c, _) = controller();
        let mut c = c.with_session_timer(timer.clone());

        c.activate_journey("unwind").unwrap();
        c.engine_mut().unavailable = true;
        assert!(c.activate_held_frequency(Band::Theta, 2).is_err());

        assert_eq!(c.mode(), &PlaybackMode::Idle);
        assert!(c.engine().active().is_none());
        assert_eq!(timer.borrow().stopped, 1);
    }

    #[test]
    fn test_lost_output_drops_to_idle() {
        let timer = Rc::new(RefCell::new(TimerLog::default()));
        let (c, _) = controller();
        let mut c = c.with_session_timer(timer.clone());

        c.activate_held_frequency(Band::Theta, 1).unwrap();
        assert_eq!(c.poll_engine(), Ok(()));

        c.engine_mut().lose_output();
        assert!(matches!(c.poll_engine(), Err(PlaybackError::AudioUnavailable(_))));
        assert_eq!(c.mode(), &PlaybackMode::Idle);
        assert_eq!(timer.borrow().stopped, 1);
        assert_eq!(c.poll_engine(), Ok(()));
    }

    #[test]
    fn test_held_switch_after_lost_output_restarts_pair() {
        let (mut c, _) = controller();
        c.activate_held_frequency(Band::Theta, 1).unwrap();
        c.engine_mut().lose_output();

        c.activate_held_frequency(Band::Alpha, 1).unwrap();

        assert_eq!(c.engine().retunes(), 0);
        assert_eq!(c.engine().starts(), 2);
        assert_eq!(c.engine().state().beat_frequency_hz, 10.0);
        assert_eq!(c.mode(), &PlaybackMode::HeldFrequency { band: Band::Alpha, index: 1 });
        assert_exclusive(&c);
    }

    #[test]
    fn test_journey_tick_after_lost_output() {
        let (mut c, clock) = controller();
        c.activate_journey("short").unwrap();
        c.engine_mut().lose_output();

        clock.advance_secs(6);
        assert!(matches!(c.tick(), TickOutcome::Idle));
        assert_eq!(c.mode(), &PlaybackMode::Idle);
        assert_eq!(c.engine().retunes(), 0);
        assert_exclusive(&c);
    }

    #[test]
    fn test_invalid_requests_leave_state_untouched() {
        let (mut c, _) = controller();
        c.activate_held_frequency(Band::Theta, 1).unwrap();
        c.engine_mut().clear_calls();

        assert_eq!(
            c.activate_held_frequency(Band::Theta, 3),
            Err(PlaybackError::InvalidIndex { band: Band::Theta, index: 3 })
        );
        assert!(matches!(c.activate_journey("nowhere"), Err(PlaybackError::InvalidPreset(_))));

        assert_eq!(c.mode(), &PlaybackMode::HeldFrequency { band: Band::Theta, index: 1 });
        assert!(c.engine().calls.is_empty());
    }

    #[test]
    fn test_volume_applies_live() {
        let (mut c, _) = controller();
        c.set_volume(0.8);
        assert!(c.engine().calls.is_empty());

        c.activate_held_frequency(Band::Alpha, 1).unwrap();
        assert_eq!(c.engine().state().volume, 0.8);

        c.adjust_volume(0.5);
        assert_eq!(c.volume(), 1.0);
        assert_eq!(c.engine().state().volume, 1.0);
    }

    #[test]
    fn test_mix_preset_sets_all_levels() {
        let music = Player::new(CompanionKind::Music);
        let voice = Player::new(CompanionKind::Voice);
        let (mut c, _) = controller();
        c.add_companion(music.clone());
        c.add_companion(voice.clone());

        c.activate_journey("deep-sleep").unwrap();
        let preset = c.apply_mix_preset("deep sleep").unwrap();

        assert_eq!(preset.binaural, 50);
        assert_eq!(c.volume(), 0.5);
        assert_eq!(c.engine().state().volume, 0.5);
        assert_eq!(music.borrow().volume, 0.4);
        assert_eq!(voice.borrow().volume, 0.0);
        assert!(matches!(c.apply_mix_preset("rave"), Err(PlaybackError::UnknownMixPreset(_))));
    }

    #[test]
    fn test_status_snapshot() {
        let (mut c, clock) = controller();
        assert_eq!(c.status().current_frequency_hz, None);

        c.activate_journey("short").unwrap();
        clock.advance(Duration::from_secs(10));
        c.tick();
        let status = c.status();
        assert_eq!(status.stage, Some((1, 3)));
        assert_eq!(status.current_frequency_hz, Some(6.0));
        assert_eq!(status.progress_percent, Some(50.0));
        assert_eq!(status.carrier_hz, DEFAULT_CARRIER_HZ);
    }
}
