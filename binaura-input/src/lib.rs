//! Modal keyboard input handling for Binaura

mod commands;
mod modal;

pub use commands::{Command, Mode};
pub use modal::InputHandler;
