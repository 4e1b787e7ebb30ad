//! Status bar widget - mode indicator and command line

use crate::theme::Theme;
use binaura_input::Mode;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// How a status message should be coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Widget for displaying the status bar with mode and command input
pub struct StatusBarWidget<'a> {
    mode: Mode,
    command_buffer: &'a str,
    pending: Option<char>,
    message: Option<&'a str>,
    message_type: MessageType,
    theme: &'a Theme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(mode: Mode, command_buffer: &'a str, theme: &'a Theme) -> Self {
        Self {
            mode,
            command_buffer,
            pending: None,
            message: None,
            message_type: MessageType::Info,
            theme,
        }
    }

    pub fn message(mut self, msg: Option<&'a str>, msg_type: MessageType) -> Self {
        self.message = msg;
        self.message_type = msg_type;
        self
    }

    /// Prefix key waiting for its digit
    pub fn pending(mut self, key: Option<char>) -> Self {
        self.pending = key;
        self
    }

    fn mode_style(&self) -> Style {
        match self.mode {
            Mode::Normal | Mode::Help => self.theme.highlight(),
            Mode::Command => Style::from(self.theme.accent),
        }
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks = Layout::horizontal([
            Constraint::Length(10), // Mode indicator
            Constraint::Min(20),    // Command/message area
            Constraint::Length(24), // Help hint
        ])
        .split(area);

        let mode_line = Line::from(vec![
            Span::raw("["),
            Span::styled(self.mode.display_name(), self.mode_style()),
            Span::raw("]"),
        ]);
        Paragraph::new(mode_line).render(chunks[0], buf);

        let content = if self.mode == Mode::Command {
            Line::from(vec![
                Span::styled(":", Style::from(self.theme.accent)),
                Span::styled(self.command_buffer, self.theme.normal()),
                Span::styled("█", self.theme.highlight()),
            ])
        } else if let Some(key) = self.pending {
            Line::from(Span::styled(format!("{}…", key), Style::from(self.theme.accent)))
        } else if let Some(msg) = self.message {
            let msg_style = match self.message_type {
                MessageType::Info => self.theme.dim(),
                MessageType::Success => Style::from(self.theme.accent),
                MessageType::Warning => Style::default().fg(self.theme.warning),
                MessageType::Error => Style::default().fg(self.theme.danger),
            };
            Line::from(Span::styled(msg, msg_style))
        } else {
            Line::from(Span::styled("Ready. Press ? for help, : for commands", self.theme.dim()))
        };
        Paragraph::new(content).render(chunks[1], buf);

        let help = match self.mode {
            Mode::Normal => "t2:hold  j1:journey  ?",
            Mode::Command => "Enter:run  Esc:cancel",
            Mode::Help => "Esc:close help",
        };
        Paragraph::new(Line::from(Span::styled(help, self.theme.dim()))).render(chunks[2], buf);
    }
}

/// Help overlay widget
pub struct HelpWidget<'a> {
    theme: &'a Theme,
}

impl<'a> HelpWidget<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn help_lines() -> &'static [&'static str] {
        &[
            "╔══════════════════════════════════════════════════════╗",
            "║                 BINAURA - binaural beats             ║",
            "╠══════════════════════════════════════════════════════╣",
            "║ HOLD A FREQUENCY (same keys again to stop)           ║",
            "║   d + 1-3     delta  1.5 / 2.5 / 3.5 Hz   sleep      ║",
            "║   t + 1-3     theta  4.5 / 6.0 / 7.5 Hz   meditation ║",
            "║   a + 1-3     alpha  8.5 / 10  / 12  Hz   relaxation ║",
            "╠──────────────────────────────────────────────────────╣",
            "║ JOURNEYS                                             ║",
            "║   j + 1-9     start / stop a journey                 ║",
            "╠──────────────────────────────────────────────────────╣",
            "║ LEVELS                                               ║",
            "║   - / =       volume down / up 5%                    ║",
            "║   space / x   stop everything                        ║",
            "╠──────────────────────────────────────────────────────╣",
            "║ COMMANDS (:)                                         ║",
            "║   :freq <band> <1-3>   hold a frequency              ║",
            "║   :journey <name|n>    start / stop a journey        ║",
            "║   :volume <0-100>      binaural volume               ║",
            "║   :mix <name>          meditation / deep sleep /     ║",
            "║                        affirmation                   ║",
            "║   :session <minutes>   5 10 15 20 30 45 60           ║",
            "║   :stop                stop everything               ║",
            "║   :q                   quit                          ║",
            "╠══════════════════════════════════════════════════════╣",
            "║   Use stereo headphones.  Esc or ? closes help       ║",
            "║                Ctrl-Q quits Binaura                  ║",
            "╚══════════════════════════════════════════════════════╝",
        ]
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(self.theme.normal());
            }
        }

        let lines = Self::help_lines();
        let width = lines[0].chars().count() as u16;
        let start_x = area.x + area.width.saturating_sub(width) / 2;

        for (i, line) in lines.iter().take(area.height as usize).enumerate() {
            let y = area.y + i as u16;
            for (j, ch) in line.chars().enumerate() {
                let x = start_x + j as u16;
                if x >= area.x + area.width {
                    break;
                }
                let style = if matches!(ch, '║' | '╔' | '╗' | '╚' | '╝' | '═' | '╠' | '╣' | '─') {
                    self.theme.border()
                } else {
                    self.theme.normal()
                };
                buf[(x, y)].set_char(ch).set_style(style);
            }
        }
    }
}
