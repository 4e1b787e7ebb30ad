//! Terminal UI for Binaura - widgets and theme

mod theme;
pub mod widgets;

pub use theme::{Theme, INDIGO};
pub use widgets::status_bar::HelpWidget;
pub use widgets::{JourneyListWidget, MessageType, SessionWidget, StatusBarWidget, ToneWidget};
