//! Command definitions for Binaura

use binaura_core::Band;

/// Input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Command,
    Help,
}

impl Mode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Command => "COMMAND",
            Mode::Help => "HELP",
        }
    }
}

/// Commands that can be dispatched from input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Playback
    HoldFrequency(Band, usize), // zero-based index within the band
    ToggleJourney(usize),       // zero-based position in the journey list
    JourneyByName(String),
    StopAll,

    // Levels
    SetVolume(f32),    // 0.0-1.0
    AdjustVolume(f32), // delta
    MixPreset(String),

    // Session
    SessionLength(u32), // minutes

    // UI
    ToggleHelp,

    // Mode changes
    EnterCommandMode,
    EnterNormalMode,

    // Application
    Quit,
    Cancel,

    // Command mode input that did not parse
    ExecuteCommand(String),
}
