//! Tone engine for Binaura
//!
//! This crate provides the binaural synthesis path:
//! - Oscillator: single-use, phase-continuous sine source
//! - Panner / Gain: hard-panned ears into a smoothed output gain
//! - Voice: the oscillator pair that produces one binaural beat
//! - Engine: command-driven state rendered by the audio callback
//! - Tone: the `ToneEngine` contract and the device-backed `AudioTone`

mod engine;
mod gain;
mod oscillator;
mod output;
mod panner;
mod tone;
mod voice;

pub use engine::{AudioEngine, EngineState, ToneCommand, ToneEvent};
pub use gain::{soft_clip, GainStage};
pub use oscillator::Oscillator;
pub use output::{OutputConfig, OutputStream};
pub use panner::StereoPanner;
pub use tone::{AudioTone, ToneEngine, ToneError, ToneHandle, ToneState};
pub use voice::BinauralVoice;
