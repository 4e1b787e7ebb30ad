//! Tone engine contract and its hardware implementation

use crate::engine::{ToneCommand, ToneEvent};
use crate::output::{OutputConfig, OutputStream};
use std::time::Instant;
use thiserror::Error;

/// Errors raised by a tone engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToneError {
    /// The audio path could not be created or resumed
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
}

/// Identity of one started tone
///
/// Every successful `start` yields a handle that has never been issued
/// before. Once the tone is stopped the handle is dead for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToneHandle(u64);

impl ToneHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The currently synthesized binaural signal
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToneState {
    pub is_active: bool,
    pub carrier_frequency_hz: f32,
    pub beat_frequency_hz: f32,
    pub volume: f32,
}

/// Dual-oscillator binaural synthesizer
pub trait ToneEngine {
    /// Bring the audio path up. Idempotent.
    fn prepare(&mut self) -> Result<(), ToneError> {
        Ok(())
    }

    /// Build a fresh oscillator pair and start it immediately
    fn start(&mut self, carrier_hz: f32, beat_hz: f32, volume: f32) -> Result<ToneHandle, ToneError>;

    /// Halt and release the pair. No-op for a handle that is already stopped.
    fn stop(&mut self, handle: ToneHandle);

    /// Change gain of a running pair. No-op if the handle is not active.
    fn set_volume(&mut self, handle: ToneHandle, volume: f32);

    /// Retune a running pair without restarting it. No-op if not active.
    fn set_frequency(&mut self, handle: ToneHandle, carrier_hz: f32, beat_hz: f32);

    /// Snapshot of the signal being produced
    fn state(&self) -> ToneState;

    /// Pick up notifications from the audio path. A lost output leaves the
    /// engine inactive.
    fn poll(&mut self) {}
}

/// Tone engine backed by the default audio output device
///
/// Owns the single output stream used for binaural synthesis. The stream is
/// opened lazily, on `prepare` or the first `start`. When the audio thread
/// refuses a command or the stream fails, the output is closed, which also
/// releases any running pair; the next `start` opens it again.
pub struct AudioTone {
    config: OutputConfig,
    output: Option<OutputStream>,
    active: Option<ToneHandle>,
    state: ToneState,
    next_id: u64,
    /// Frames rendered at the last snapshot that showed progress, and when
    rendered: (u64, Instant),
}

impl AudioTone {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            output: None,
            active: None,
            state: ToneState::default(),
            next_id: 1,
            rendered: (0, Instant::now()),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_output(output: OutputStream, config: OutputConfig) -> Self {
        Self {
            output: Some(output),
            ..Self::new(config)
        }
    }

    /// Whether the output device has been opened
    pub fn is_ready(&self) -> bool {
        self.output.as_ref().is_some_and(OutputStream::is_running)
    }

    /// Deliver a command, closing the output if the audio thread cannot take it
    fn send(&mut self, cmd: ToneCommand) -> bool {
        let Some(output) = &self.output else {
            return false;
        };
        match output.engine().send(cmd) {
            Ok(()) => true,
            Err(e) => {
                self.close_output(&format!("audio thread not accepting commands: {}", e));
                false
            }
        }
    }

    /// Drop the output stream. Its thread releases whatever voice it holds.
    fn close_output(&mut self, reason: &str) {
        tracing::warn!(active = ?self.active.map(|h| h.id()), "closing audio output: {}", reason);
        self.output = None;
        self.active = None;
        self.state = ToneState::default();
    }

    fn is_current(&self, handle: ToneHandle) -> bool {
        self.active == Some(handle)
    }
}

impl Default for AudioTone {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

impl ToneEngine for AudioTone {
    fn prepare(&mut self) -> Result<(), ToneError> {
        if self.is_ready() {
            return Ok(());
        }
        if self.output.is_some() {
            self.close_output("audio thread exited");
        }
        self.output = Some(OutputStream::open(&self.config)?);
        self.rendered = (0, Instant::now());
        Ok(())
    }

    fn start(&mut self, carrier_hz: f32, beat_hz: f32, volume: f32) -> Result<ToneHandle, ToneError> {
        self.prepare()?;

        if let Some(previous) = self.active {
            tracing::warn!(id = previous.id(), "start called with a tone still running");
            self.stop(previous);
        }

        let handle = ToneHandle::new(self.next_id);
        self.next_id += 1;

        let volume = volume.clamp(0.0, 1.0);
        let sent = self.send(ToneCommand::Start {
            id: handle.id(),
            carrier_hz,
            beat_hz,
            volume,
        });
        if !sent {
            return Err(ToneError::AudioUnavailable("audio engine is not accepting commands".into()));
        }

        self.active = Some(handle);
        self.state = ToneState {
            is_active: true,
            carrier_frequency_hz: carrier_hz,
            beat_frequency_hz: beat_hz,
            volume,
        };
        tracing::debug!(id = handle.id(), carrier_hz, beat_hz, "tone started");
        Ok(handle)
    }

    fn stop(&mut self, handle: ToneHandle) {
        if !self.is_current(handle) {
            return;
        }
        // An undelivered stop closes the output, which releases the pair too
        self.send(ToneCommand::Stop { id: handle.id() });
        self.active = None;
        self.state = ToneState::default();
        tracing::debug!(id = handle.id(), "tone stopped");
    }

    fn set_volume(&mut self, handle: ToneHandle, volume: f32) {
        if !self.is_current(handle) {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        if self.send(ToneCommand::SetVolume {
            id: handle.id(),
            volume,
        }) {
            self.state.volume = volume;
        }
    }

    fn set_frequency(&mut self, handle: ToneHandle, carrier_hz: f32, beat_hz: f32) {
        if !self.is_current(handle) {
            return;
        }
        if self.send(ToneCommand::SetFrequency {
            id: handle.id(),
            carrier_hz,
            beat_hz,
        }) {
            self.state.carrier_frequency_hz = carrier_hz;
            self.state.beat_frequency_hz = beat_hz;
        }
    }

    fn state(&self) -> ToneState {
        self.state
    }

    fn poll(&mut self) {
        let Some(output) = &self.output else {
            return;
        };

        let mut lost = None;
        while let Ok(event) = output.engine().event_rx.try_recv() {
            match event {
                ToneEvent::Error(message) => {
                    lost = Some(format!("output stream failed: {}", message));
                    break;
                }
                ToneEvent::StateUpdate { frames_rendered, .. } => {
                    let (frames, since) = self.rendered;
                    if frames_rendered > frames {
                        self.rendered = (frames_rendered, Instant::now());
                    } else if since.elapsed() >= self.config.stall_timeout {
                        lost = Some("output stream stopped rendering".to_string());
                        break;
                    }
                }
            }
        }

        if let Some(reason) = lost {
            self.close_output(&reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AudioEngine, EngineState};
    use crossbeam_channel::{Receiver, Sender};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Audio-thread side of a detached tone
    struct AudioSide {
        rx: Receiver<ToneCommand>,
        events: Sender<ToneEvent>,
        shutdown: Arc<AtomicBool>,
    }

    impl AudioSide {
        fn shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Relaxed)
        }

        fn snapshot(&self, frames_rendered: u64) {
            self.events
                .send(ToneEvent::StateUpdate {
                    active_id: None,
                    left_hz: 0.0,
                    right_hz: 0.0,
                    gain: 0.0,
                    frames_rendered,
                })
                .unwrap();
        }
    }

    fn detached_with(config: OutputConfig) -> (AudioTone, AudioSide) {
        let (cmd_tx, cmd_rx, evt_tx, evt_rx) = AudioEngine::create_channels();
        let shutdown = Arc::new(AtomicBool::new(false));
        let engine = AudioEngine::new(cmd_tx, evt_rx, shutdown.clone());
        let output = OutputStream::detached(engine, 48000);
        let side = AudioSide {
            rx: cmd_rx,
            events: evt_tx,
            shutdown,
        };
        (AudioTone::with_output(output, config), side)
    }

    fn detached_tone() -> (AudioTone, Receiver<ToneCommand>) {
        let (tone, side) = detached_with(OutputConfig::default());
        (tone, side.rx)
    }

    #[test]
    fn test_start_sends_fresh_pair() {
        let (mut tone, rx) = detached_tone();
        let handle = tone.start(200.0, 10.0, 0.3).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            ToneCommand::Start {
                id: handle.id(),
                carrier_hz: 200.0,
                beat_hz: 10.0,
                volume: 0.3,
            }
        );
        assert!(tone.state().is_active);
        assert_eq!(tone.state().beat_frequency_hz, 10.0);
    }

    #[test]
    fn test_restart_never_reuses_handle() {
        let (mut tone, _rx) = detached_tone();
        let first = tone.start(200.0, 10.0, 0.3).unwrap();
        tone.stop(first);
        let second = tone.start(200.0, 10.0, 0.3).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut tone, rx) = detached_tone();
        let handle = tone.start(200.0, 6.0, 0.3).unwrap();
        let _ = rx.try_recv();

        tone.stop(handle);
        tone.stop(handle);

        assert_eq!(rx.try_recv().unwrap(), ToneCommand::Stop { id: handle.id() });
        assert!(rx.try_recv().is_err());
        assert!(!tone.state().is_active);
    }

    #[test]
    fn test_dead_handle_ignored() {
        let (mut tone, rx) = detached_tone();
        let old = tone.start(200.0, 6.0, 0.3).unwrap();
        tone.stop(old);
        let _current = tone.start(200.0, 2.5, 0.3).unwrap();
        while rx.try_recv().is_ok() {}

        tone.set_frequency(old, 200.0, 12.0);
        tone.set_volume(old, 1.0);
        tone.stop(old);

        assert!(rx.try_recv().is_err());
        assert_eq!(tone.state().beat_frequency_hz, 2.5);
    }

    #[test]
    fn test_live_retune() {
        let (mut tone, rx) = detached_tone();
        let handle = tone.start(200.0, 6.0, 0.3).unwrap();
        let _ = rx.try_recv();

        tone.set_frequency(handle, 200.0, 12.0);
        assert_eq!(
            rx.try_recv().unwrap(),
            ToneCommand::SetFrequency {
                id: handle.id(),
                carrier_hz: 200.0,
                beat_hz: 12.0,
            }
        );
        assert_eq!(tone.state().beat_frequency_hz, 12.0);
    }

    #[test]
    fn test_volume_clamped() {
        let (mut tone, _rx) = detached_tone();
        let handle = tone.start(200.0, 6.0, 1.7).unwrap();
        assert_eq!(tone.state().volume, 1.0);
        tone.set_volume(handle, -0.5);
        assert_eq!(tone.state().volume, 0.0);
    }

    #[test]
    fn test_closed_channel_fails_start() {
        let (mut tone, rx) = detached_tone();
        drop(rx);
        assert!(matches!(
            tone.start(200.0, 6.0, 0.3),
            Err(ToneError::AudioUnavailable(_))
        ));
        assert!(!tone.state().is_active);
    }

    #[test]
    fn test_undelivered_stop_closes_output() {
        let (mut tone, side) = detached_with(OutputConfig::default());
        let handle = tone.start(200.0, 6.0, 0.3).unwrap();
        for _ in 0..255 {
            tone.set_volume(handle, 0.3);
        }
        assert!(tone.is_ready(), "queue is full but every command was taken");

        tone.stop(handle);

        // The stop never reached the audio thread, so the stream is told to shut down
        let mut audio = EngineState::new(48000);
        while let Ok(cmd) = side.rx.try_recv() {
            audio.handle_command(cmd);
        }
        assert_eq!(audio.active_id(), Some(handle.id()));
        assert!(side.shut_down());
        assert!(!tone.is_ready());
        assert!(!tone.state().is_active);
    }

    #[test]
    fn test_disconnected_retune_leaves_tone_inactive() {
        let (mut tone, side) = detached_with(OutputConfig::default());
        let handle = tone.start(200.0, 6.0, 0.3).unwrap();
        let AudioSide { rx, shutdown, .. } = side;
        drop(rx);

        tone.set_frequency(handle, 200.0, 12.0);

        assert!(!tone.state().is_active);
        assert_eq!(tone.state().beat_frequency_hz, 0.0);
        assert!(!tone.is_ready());
        assert!(shutdown.load(Ordering::Relaxed));
    }

    #[test]
    fn test_stream_error_closes_output() {
        let (mut tone, side) = detached_with(OutputConfig::default());
        tone.start(200.0, 6.0, 0.3).unwrap();

        side.events.send(ToneEvent::Error("device unplugged".into())).unwrap();
        tone.poll();

        assert!(!tone.state().is_active);
        assert!(!tone.is_ready());
        assert!(side.shut_down());
    }

    #[test]
    fn test_rendering_stream_stays_open() {
        let (mut tone, side) = detached_with(OutputConfig::default());
        tone.start(200.0, 6.0, 0.3).unwrap();

        side.snapshot(512);
        side.snapshot(1024);
        tone.poll();

        assert!(tone.is_ready());
        assert!(tone.state().is_active);
    }

    #[test]
    fn test_stalled_stream_closes_output() {
        let config = OutputConfig {
            stall_timeout: Duration::ZERO,
            ..OutputConfig::default()
        };
        let (mut tone, side) = detached_with(config);
        tone.start(200.0, 6.0, 0.3).unwrap();

        side.snapshot(0);
        tone.poll();

        assert!(!tone.is_ready());
        assert!(!tone.state().is_active);
    }
}
