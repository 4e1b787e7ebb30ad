//! Output stream - owns the cpal stream on a dedicated thread
//!
//! cpal streams are not `Send` on every platform, so the stream is built,
//! played and dropped on its own thread. That thread also drains tone
//! commands into the shared `EngineState`. Readiness (or the reason the
//! device could not be opened) is reported back once through a one-shot
//! channel so the caller learns synchronously whether audio is available.

use crate::engine::{AudioEngine, EngineState, ToneCommand, ToneEvent};
use crate::tone::ToneError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Frames rendered per pass for devices that are not two-channel
const SCRATCH_FRAMES: usize = 4096;

/// Output stream settings
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// How long to wait for the device to come up before giving up
    pub ready_timeout: Duration,
    /// Interval between state snapshots sent to observers
    pub state_interval: Duration,
    /// How long the stream may go without rendering before it counts as lost
    pub stall_timeout: Duration,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_millis(2000),
            state_interval: Duration::from_millis(100),
            stall_timeout: Duration::from_millis(2000),
        }
    }
}

/// A running output stream and the handle used to drive it
pub struct OutputStream {
    engine: AudioEngine,
    thread: Option<JoinHandle<()>>,
    sample_rate: u32,
}

impl OutputStream {
    /// Open the default output device and start rendering silence
    pub fn open(config: &OutputConfig) -> Result<Self, ToneError> {
        let (cmd_tx, cmd_rx, evt_tx, evt_rx) = AudioEngine::create_channels();
        let (ready_tx, ready_rx) = bounded::<Result<u32, String>>(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_audio = shutdown.clone();
        let state_interval = config.state_interval;

        let thread = thread::Builder::new()
            .name("binaura-audio".into())
            .spawn(move || {
                run_audio_thread(cmd_rx, evt_tx, ready_tx, shutdown_audio, state_interval);
            })
            .map_err(|e| ToneError::AudioUnavailable(format!("failed to spawn audio thread: {}", e)))?;

        let engine = AudioEngine::new(cmd_tx, evt_rx, shutdown);

        match ready_rx.recv_timeout(config.ready_timeout) {
            Ok(Ok(sample_rate)) => {
                tracing::info!(sample_rate, "audio output ready");
                Ok(Self {
                    engine,
                    thread: Some(thread),
                    sample_rate,
                })
            }
            Ok(Err(reason)) => {
                let _ = thread.join();
                Err(ToneError::AudioUnavailable(reason))
            }
            Err(_) => {
                // Leave the thread to notice the flag on its own
                engine.shutdown();
                Err(ToneError::AudioUnavailable(
                    "audio device did not become ready in time".into(),
                ))
            }
        }
    }

    /// Wrap an engine handle that has no device behind it
    #[cfg(test)]
    pub(crate) fn detached(engine: AudioEngine, sample_rate: u32) -> Self {
        Self {
            engine,
            thread: None,
            sample_rate,
        }
    }

    pub fn engine(&self) -> &AudioEngine {
        &self.engine
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Whether the audio thread is still alive
    pub fn is_running(&self) -> bool {
        !self.engine.is_shutdown()
            && self
                .thread
                .as_ref()
                .map(|t| !t.is_finished())
                .unwrap_or(true)
    }
}

impl Drop for OutputStream {
    fn drop(&mut self) {
        self.engine.shutdown();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("audio thread panicked during shutdown");
            }
        }
    }
}

fn run_audio_thread(
    cmd_rx: Receiver<ToneCommand>,
    evt_tx: Sender<ToneEvent>,
    ready_tx: Sender<Result<u32, String>>,
    shutdown: Arc<AtomicBool>,
    state_interval: Duration,
) {
    // Get audio host and device
    let host = cpal::default_host();
    let device = match host.default_output_device() {
        Some(d) => d,
        None => {
            let _ = ready_tx.send(Err("no audio output device found".into()));
            return;
        }
    };

    let config = match device.default_output_config() {
        Ok(c) => c,
        Err(e) => {
            let _ = ready_tx.send(Err(format!("failed to get audio config: {}", e)));
            return;
        }
    };

    let sample_rate = config.sample_rate().0;
    let channels = (config.channels() as usize).max(1);

    let engine_state = Arc::new(Mutex::new(EngineState::new(sample_rate)));
    let engine_for_callback = engine_state.clone();

    // Allocated once; the callback never grows it
    let mut stereo_buffer = vec![0.0f32; SCRATCH_FRAMES * 2];

    let err_tx = evt_tx.clone();
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            // Never block the real-time thread; output silence on contention
            let Some(mut state) = engine_for_callback.try_lock() else {
                data.fill(0.0);
                return;
            };

            if channels == 2 {
                state.process(data);
                return;
            }

            for chunk in data.chunks_mut(SCRATCH_FRAMES * channels) {
                let frames = chunk.len() / channels;
                let stereo = &mut stereo_buffer[..frames * 2];
                state.process(stereo);

                for (frame, lr) in chunk.chunks_exact_mut(channels).zip(stereo.chunks_exact(2)) {
                    if channels == 1 {
                        frame[0] = (lr[0] + lr[1]) * 0.5;
                    } else {
                        frame.fill(0.0);
                        frame[0] = lr[0];
                        frame[1] = lr[1];
                    }
                }
            }
        },
        move |err| {
            tracing::error!("audio stream error: {}", err);
            let _ = err_tx.try_send(ToneEvent::Error(err.to_string()));
        },
        None,
    );

    let stream = match stream {
        Ok(s) => s,
        Err(e) => {
            let _ = ready_tx.send(Err(format!("failed to create audio stream: {}", e)));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(format!("failed to start audio: {}", e)));
        return;
    }

    let _ = ready_tx.send(Ok(sample_rate));

    let mut last_state_update = Instant::now();

    // Command processing loop
    while !shutdown.load(Ordering::Relaxed) {
        match cmd_rx.recv_timeout(Duration::from_millis(10)) {
            Ok(ToneCommand::Shutdown) => break,
            Ok(cmd) => engine_state.lock().handle_command(cmd),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if last_state_update.elapsed() >= state_interval {
            let _ = evt_tx.try_send(engine_state.lock().get_state());
            last_state_update = Instant::now();
        }
    }

    // Release the voice before the stream goes away
    let active = engine_state.lock().active_id();
    if let Some(id) = active {
        engine_state.lock().handle_command(ToneCommand::Stop { id });
    }
    drop(stream);
    tracing::debug!("audio thread exited");
}
