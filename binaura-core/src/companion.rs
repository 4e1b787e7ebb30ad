//! Collaborators notified by the playback controller
//!
//! The controller never reaches into these components; it only signals
//! activity changes and calls their public stop / volume operations.

use std::cell::RefCell;
use std::rc::Rc;

/// Receives activity start/stop signals and keeps its own clock
pub trait SessionTimer {
    fn activity_started(&mut self);
    fn activity_stopped(&mut self);
}

/// Kind of independent audio path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionKind {
    Music,
    Voice,
}

/// Independently running audio component (music player, voice recorder)
pub trait Companion {
    fn kind(&self) -> CompanionKind;

    /// Stop playback on this component
    fn stop(&mut self);

    /// Set playback level (0.0 - 1.0)
    fn set_volume(&mut self, _volume: f32) {}
}

impl<T: SessionTimer> SessionTimer for Rc<RefCell<T>> {
    fn activity_started(&mut self) {
        self.borrow_mut().activity_started();
    }

    fn activity_stopped(&mut self) {
        self.borrow_mut().activity_stopped();
    }
}

impl<T: Companion> Companion for Rc<RefCell<T>> {
    fn kind(&self) -> CompanionKind {
        self.borrow().kind()
    }

    fn stop(&mut self) {
        self.borrow_mut().stop();
    }

    fn set_volume(&mut self, volume: f32) {
        self.borrow_mut().set_volume(volume);
    }
}
