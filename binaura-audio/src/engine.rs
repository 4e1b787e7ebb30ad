//! Audio engine - applies tone commands and renders the binaural voice

use crate::gain::soft_clip;
use crate::voice::BinauralVoice;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Commands sent to the audio engine
///
/// Every tone command carries the id of the tone it targets. Commands for a
/// tone that is no longer current are ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum ToneCommand {
    Start {
        id: u64,
        carrier_hz: f32,
        beat_hz: f32,
        volume: f32,
    },
    Stop {
        id: u64,
    },
    SetVolume {
        id: u64,
        volume: f32,
    },
    SetFrequency {
        id: u64,
        carrier_hz: f32,
        beat_hz: f32,
    },

    // System
    Shutdown,
}

/// Events sent from the audio engine
#[derive(Debug, Clone, PartialEq)]
pub enum ToneEvent {
    /// Periodic state snapshot
    StateUpdate {
        active_id: Option<u64>,
        left_hz: f32,
        right_hz: f32,
        gain: f32,
        /// Stereo frames rendered since the stream opened
        frames_rendered: u64,
    },
    /// Output stream failure
    Error(String),
}

/// Engine state (held on the audio side)
pub struct EngineState {
    voice: Option<BinauralVoice>,
    sample_rate: u32,
    frames_rendered: u64,
}

impl EngineState {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            voice: None,
            sample_rate,
            frames_rendered: 0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Id of the tone currently rendering
    pub fn active_id(&self) -> Option<u64> {
        self.voice.as_ref().map(BinauralVoice::id)
    }

    pub fn voice(&self) -> Option<&BinauralVoice> {
        self.voice.as_ref()
    }

    fn voice_for(&mut self, id: u64) -> Option<&mut BinauralVoice> {
        self.voice.as_mut().filter(|v| v.id() == id)
    }

    /// Process a command
    pub fn handle_command(&mut self, cmd: ToneCommand) {
        match cmd {
            ToneCommand::Start {
                id,
                carrier_hz,
                beat_hz,
                volume,
            } => {
                if let Some(old) = self.voice.take() {
                    tracing::warn!(old = old.id(), new = id, "tone started over a running tone");
                    old.stop();
                }
                self.voice = Some(BinauralVoice::new(
                    id,
                    carrier_hz,
                    beat_hz,
                    volume,
                    self.sample_rate,
                ));
            }
            ToneCommand::Stop { id } => {
                if self.active_id() == Some(id) {
                    if let Some(voice) = self.voice.take() {
                        voice.stop();
                    }
                }
            }
            ToneCommand::SetVolume { id, volume } => {
                if let Some(voice) = self.voice_for(id) {
                    voice.set_volume(volume);
                }
            }
            ToneCommand::SetFrequency {
                id,
                carrier_hz,
                beat_hz,
            } => {
                if let Some(voice) = self.voice_for(id) {
                    voice.retune(carrier_hz, beat_hz);
                }
            }
            ToneCommand::Shutdown => {} // Handled at higher level
        }
    }

    /// Generate current state for observers
    pub fn get_state(&self) -> ToneEvent {
        match &self.voice {
            Some(voice) => {
                let (left_hz, right_hz) = voice.ear_frequencies();
                ToneEvent::StateUpdate {
                    active_id: Some(voice.id()),
                    left_hz,
                    right_hz,
                    gain: voice.volume(),
                    frames_rendered: self.frames_rendered,
                }
            }
            None => ToneEvent::StateUpdate {
                active_id: None,
                left_hz: 0.0,
                right_hz: 0.0,
                gain: 0.0,
                frames_rendered: self.frames_rendered,
            },
        }
    }

    /// Render into an interleaved stereo output buffer
    pub fn process(&mut self, output: &mut [f32]) {
        output.fill(0.0);
        self.frames_rendered += (output.len() / 2) as u64;

        if let Some(voice) = self.voice.as_mut() {
            voice.render(output);
            for sample in output.iter_mut() {
                *sample = soft_clip(*sample);
            }
        }
    }
}

/// Handle to communicate with the audio engine
pub struct AudioEngine {
    /// Send commands to audio thread
    pub command_tx: Sender<ToneCommand>,
    /// Receive events from audio thread
    pub event_rx: Receiver<ToneEvent>,
    /// Shutdown flag
    shutdown: Arc<AtomicBool>,
}

impl AudioEngine {
    /// Create channels for engine communication
    pub fn create_channels() -> (
        Sender<ToneCommand>,
        Receiver<ToneCommand>,
        Sender<ToneEvent>,
        Receiver<ToneEvent>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(256);
        let (evt_tx, evt_rx) = bounded(256);
        (cmd_tx, cmd_rx, evt_tx, evt_rx)
    }

    /// Create a new engine handle
    pub fn new(
        command_tx: Sender<ToneCommand>,
        event_rx: Receiver<ToneEvent>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            command_tx,
            event_rx,
            shutdown,
        }
    }

    /// Send a command to the audio engine
    pub fn send(&self, cmd: ToneCommand) -> Result<(), TrySendError<ToneCommand>> {
        self.command_tx.try_send(cmd)
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let _ = self.command_tx.try_send(ToneCommand::Shutdown);
    }
}
