//! Recording tone engine used by the tests

use binaura_audio::{ToneEngine, ToneError, ToneHandle, ToneState};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Start { handle: ToneHandle, beat_hz: f32 },
    Stop(ToneHandle),
    SetVolume(ToneHandle, f32),
    SetFrequency(ToneHandle, f32),
}

/// Tone engine double
///
/// Stopped handles are marked dead; starting while a pair is still running
/// panics, which catches any path that skips stop-before-start.
#[derive(Debug, Default)]
pub struct FakeTone {
    pub calls: Vec<Call>,
    pub unavailable: bool,
    active: Option<ToneHandle>,
    dead: HashSet<ToneHandle>,
    next_id: u64,
    state: ToneState,
}

impl FakeTone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<ToneHandle> {
        self.active
    }

    pub fn is_dead(&self, handle: ToneHandle) -> bool {
        self.dead.contains(&handle)
    }

    pub fn starts(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Start { .. })).count()
    }

    pub fn stops(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Stop(_))).count()
    }

    pub fn retunes(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::SetFrequency(..))).count()
    }

    /// Simulate the output device going away under a running pair
    pub fn lose_output(&mut self) {
        if let Some(handle) = self.active.take() {
            self.dead.insert(handle);
        }
        self.state = ToneState::default();
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl ToneEngine for FakeTone {
    fn prepare(&mut self) -> Result<(), ToneError> {
        if self.unavailable {
            return Err(ToneError::AudioUnavailable("no user gesture yet".into()));
        }
        Ok(())
    }

    fn start(&mut self, carrier_hz: f32, beat_hz: f32, volume: f32) -> Result<ToneHandle, ToneError> {
        self.prepare()?;
        assert!(self.active.is_none(), "start while a tone pair is still running");

        self.next_id += 1;
        let handle = ToneHandle::new(self.next_id);
        self.active = Some(handle);
        self.state = ToneState {
            is_active: true,
            carrier_frequency_hz: carrier_hz,
            beat_frequency_hz: beat_hz,
            volume,
        };
        self.calls.push(Call::Start { handle, beat_hz });
        Ok(handle)
    }

    fn stop(&mut self, handle: ToneHandle) {
        if self.active != Some(handle) {
            return;
        }
        self.active = None;
        self.dead.insert(handle);
        self.state = ToneState::default();
        self.calls.push(Call::Stop(handle));
    }

    fn set_volume(&mut self, handle: ToneHandle, volume: f32) {
        if self.active != Some(handle) {
            return;
        }
        self.state.volume = volume;
        self.calls.push(Call::SetVolume(handle, volume));
    }

    fn set_frequency(&mut self, handle: ToneHandle, carrier_hz: f32, beat_hz: f32) {
        assert!(!self.is_dead(handle), "retune of a released oscillator pair");
        if self.active != Some(handle) {
            return;
        }
        self.state.carrier_frequency_hz = carrier_hz;
        self.state.beat_frequency_hz = beat_hz;
        self.calls.push(Call::SetFrequency(handle, beat_hz));
    }

    fn state(&self) -> ToneState {
        self.state
    }
}
