//! Modal state machine for keyboard input

use crate::commands::{Command, Mode};
use binaura_core::Band;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Volume step for `-` / `=`
const VOLUME_STEP: f32 = 0.05;

/// Handles keyboard input and converts to commands
pub struct InputHandler {
    mode: Mode,
    command_buffer: String,
    /// Pending prefix key of a two-key sequence (e.g. t+2, j+1)
    sequence: Option<char>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            command_buffer: String::new(),
            sequence: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get current command buffer (for display)
    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    /// Prefix key waiting for its second key, if any
    pub fn pending_sequence(&self) -> Option<char> {
        self.sequence
    }

    /// Handle a key event and return a command if applicable
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        match self.mode {
            Mode::Normal => self.handle_normal_mode(key),
            Mode::Command => self.handle_command_mode(key),
            Mode::Help => self.handle_help_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }

        if let Some(prefix) = self.sequence.take() {
            if let KeyCode::Char(c) = key.code {
                if let Some(cmd) = Self::complete_sequence(prefix, c) {
                    return Some(cmd);
                }
            }
            // Not a valid second key: drop the prefix and treat the key normally
        }

        match key.code {
            KeyCode::Char(':') => {
                self.mode = Mode::Command;
                self.command_buffer.clear();
                Some(Command::EnterCommandMode)
            }
            KeyCode::Char('?') => {
                self.mode = Mode::Help;
                Some(Command::ToggleHelp)
            }

            // Band or journey prefix, completed by a digit
            KeyCode::Char(c @ ('d' | 't' | 'a' | 'j')) => {
                self.sequence = Some(c);
                None
            }

            KeyCode::Char(' ') | KeyCode::Char('x') => Some(Command::StopAll),

            KeyCode::Char('-') => Some(Command::AdjustVolume(-VOLUME_STEP)),
            KeyCode::Char('=') | KeyCode::Char('+') => Some(Command::AdjustVolume(VOLUME_STEP)),

            KeyCode::Esc => Some(Command::Cancel),

            _ => None,
        }
    }

    fn complete_sequence(prefix: char, key: char) -> Option<Command> {
        let digit = key.to_digit(10)? as usize;
        match prefix {
            'd' | 't' | 'a' if (1..=3).contains(&digit) => {
                let band = match prefix {
                    'd' => Band::Delta,
                    't' => Band::Theta,
                    _ => Band::Alpha,
                };
                Some(Command::HoldFrequency(band, digit - 1))
            }
            'j' if digit >= 1 => Some(Command::ToggleJourney(digit - 1)),
            _ => None,
        }
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter => {
                let cmd = self.parse_command();
                self.mode = if cmd == Some(Command::ToggleHelp) { Mode::Help } else { Mode::Normal };
                let buffer = std::mem::take(&mut self.command_buffer);
                cmd.or(Some(Command::ExecuteCommand(buffer)))
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.command_buffer.clear();
                Some(Command::EnterNormalMode)
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
                if self.command_buffer.is_empty() {
                    self.mode = Mode::Normal;
                    Some(Command::EnterNormalMode)
                } else {
                    None
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.push(c);
                None
            }
            _ => None,
        }
    }

    fn parse_command(&self) -> Option<Command> {
        let input = self.command_buffer.trim();

        match input {
            "q" | "quit" => return Some(Command::Quit),
            "stop" => return Some(Command::StopAll),
            "help" => return Some(Command::ToggleHelp),
            _ => {}
        }

        let (verb, rest) = input.split_once(' ')?;
        let rest = rest.trim();

        match verb {
            // freq <band> <1-3>
            "freq" | "f" => {
                let (band, position) = rest.split_once(' ')?;
                let band = band.parse::<Band>().ok()?;
                let position = position.trim().parse::<usize>().ok()?;
                if position == 0 {
                    return None;
                }
                Some(Command::HoldFrequency(band, position - 1))
            }
            // journey <number|name>
            "journey" | "j" => match rest.parse::<usize>() {
                Ok(0) => None,
                Ok(n) => Some(Command::ToggleJourney(n - 1)),
                Err(_) if !rest.is_empty() => Some(Command::JourneyByName(rest.to_string())),
                Err(_) => None,
            },
            // volume <0-100>
            "volume" | "vol" => {
                let percent = rest.trim_end_matches('%').parse::<f32>().ok()?;
                Some(Command::SetVolume((percent / 100.0).clamp(0.0, 1.0)))
            }
            "mix" if !rest.is_empty() => Some(Command::MixPreset(rest.to_string())),
            "session" => rest.parse::<u32>().ok().map(Command::SessionLength),
            _ => None,
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.mode = Mode::Normal;
                Some(Command::ToggleHelp)
            }
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
