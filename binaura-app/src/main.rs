//! Binaura - binaural beat player
//!
//! Terminal front end: holds single frequencies or plays timed journeys
//! through stereo headphones.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Terminal,
};
use tracing_subscriber::EnvFilter;

use binaura_audio::{AudioTone, OutputConfig};
use binaura_core::{
    Config, MonotonicClock, PlaybackController, PlaybackError, PlaybackMode, SessionClock, TickOutcome,
    SESSION_LENGTHS,
};
use binaura_input::{Command, InputHandler, Mode};
use binaura_tui::{HelpWidget, JourneyListWidget, MessageType, SessionWidget, StatusBarWidget, Theme, ToneWidget};

/// Longest wait for input before the screen is redrawn
const FRAME: Duration = Duration::from_millis(250);

type Controller = PlaybackController<AudioTone, MonotonicClock>;

fn main() -> anyhow::Result<()> {
    init_logging();

    let mut config = Config::load();
    tracing::info!(?config, "starting binaura");

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut config);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if result.is_ok() {
        // Best effort, don't fail on config save error
        if let Err(e) = config.save() {
            tracing::warn!("could not save config: {}", e);
        }
    }
    result
}

/// Log to a file; the terminal belongs to the UI
fn init_logging() {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("binaura");
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("binaura.log")) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("binaura=info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

struct App {
    controller: Controller,
    session: Rc<RefCell<SessionClock<MonotonicClock>>>,
    input: InputHandler,
    theme: Theme,
    message: String,
    message_type: MessageType,
    show_help: bool,
    should_quit: bool,
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: &mut Config) -> anyhow::Result<()> {
    let clock = MonotonicClock::new();

    let session = Rc::new(RefCell::new(SessionClock::new(clock)));
    if let Err(e) = session.borrow_mut().set_length_minutes(config.session_minutes) {
        tracing::warn!("{}", e);
    }

    let output = OutputConfig {
        ready_timeout: config.ready_timeout(),
        ..OutputConfig::default()
    };
    let controller = PlaybackController::new(AudioTone::new(output), clock)
        .with_carrier(config.carrier_hz)
        .with_volume(config.volume)
        .with_session_timer(session.clone());

    let mut app = App {
        controller,
        session,
        input: InputHandler::new(),
        theme: Theme::default(),
        message: "Binaura | ? for help, t2 for deep meditation, j1 for a journey".to_string(),
        message_type: MessageType::Info,
        show_help: false,
        should_quit: false,
    };

    if let Some(name) = &config.mix_preset {
        if let Err(e) = app.controller.apply_mix_preset(name) {
            tracing::warn!("{}", e);
        }
    }

    let tick = config.tick_interval();
    let mut last_tick = Instant::now();

    while !app.should_quit {
        if let Err(e) = app.controller.poll_engine() {
            app.report(Err(e), String::new);
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            app.on_tick();
        }

        terminal.draw(|frame| render_ui(frame, &app))?;

        let timeout = tick.saturating_sub(last_tick.elapsed()).min(FRAME);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(cmd) = app.input.handle_key(key) {
                    app.dispatch(cmd);
                }
            }
        }
    }

    app.controller.stop_all();
    config.volume = app.controller.volume();
    config.session_minutes = (app.session.borrow().length().as_secs() / 60) as u32;
    Ok(())
}

impl App {
    fn set_message(&mut self, message: impl Into<String>, message_type: MessageType) {
        self.message = message.into();
        self.message_type = message_type;
    }

    fn on_tick(&mut self) {
        match self.controller.tick() {
            TickOutcome::Advanced { progress, .. } => {
                self.set_message(
                    format!(
                        "{}: stage {}/{} at {:.1} Hz",
                        progress.name,
                        progress.stage_index + 1,
                        progress.stage_count,
                        progress.beat_hz
                    ),
                    MessageType::Info,
                );
            }
            TickOutcome::Completed(progress) => {
                self.set_message(format!("Journey {} complete", progress.name), MessageType::Success);
            }
            TickOutcome::Running(_) | TickOutcome::Idle => {}
        }

        if self.session.borrow().is_expired() {
            self.controller.stop_all();
            self.set_message("Session complete", MessageType::Success);
        }
    }

    fn dispatch(&mut self, cmd: Command) {
        match cmd {
            Command::HoldFrequency(band, index) => {
                let result = self.controller.activate_held_frequency(band, index);
                self.report(result, || format!("{} {}", band, index + 1));
            }
            Command::ToggleJourney(position) => {
                let name = self.controller.journeys().get(position).map(|j| j.name.clone());
                match name {
                    Some(name) => {
                        let result = self.controller.activate_journey(&name);
                        self.report(result, || format!("journey {}", name));
                    }
                    None => self.set_message(format!("No journey {}", position + 1), MessageType::Warning),
                }
            }
            Command::JourneyByName(name) => {
                let result = self.controller.activate_journey(&name);
                self.report(result, || format!("journey {}", name));
            }
            Command::StopAll => {
                self.controller.stop_all();
                self.set_message("Stopped", MessageType::Info);
            }
            Command::SetVolume(volume) => {
                self.controller.set_volume(volume);
                self.show_volume();
            }
            Command::AdjustVolume(delta) => {
                self.controller.adjust_volume(delta);
                self.show_volume();
            }
            Command::MixPreset(name) => match self.controller.apply_mix_preset(&name) {
                Ok(preset) => self.set_message(
                    format!(
                        "Mix {}: music {}% binaural {}% voice {}%",
                        preset.name, preset.music, preset.binaural, preset.voice
                    ),
                    MessageType::Success,
                ),
                Err(e) => self.set_message(e.to_string(), MessageType::Warning),
            },
            Command::SessionLength(minutes) => {
                let result = self.session.borrow_mut().set_length_minutes(minutes);
                match result {
                    Ok(()) => self.set_message(format!("Session length {} minutes", minutes), MessageType::Success),
                    Err(e) => self.set_message(format!("{} (choose from {:?})", e, SESSION_LENGTHS), MessageType::Warning),
                }
            }
            Command::ToggleHelp => self.show_help = self.input.mode() == Mode::Help,
            Command::EnterCommandMode | Command::EnterNormalMode | Command::Cancel => {}
            Command::ExecuteCommand(text) => {
                self.set_message(format!("Unknown command: {}", text), MessageType::Error)
            }
            Command::Quit => self.should_quit = true,
        }
    }

    fn show_volume(&mut self) {
        let percent = self.controller.volume() * 100.0;
        self.set_message(format!("Volume {:.0}%", percent), MessageType::Info);
    }

    /// Turn a playback result into the status line
    fn report(&mut self, result: Result<(), PlaybackError>, what: impl FnOnce() -> String) {
        match result {
            Ok(()) if self.controller.mode().is_active() => {
                self.set_message(format!("Playing {}", what()), MessageType::Success)
            }
            Ok(()) => self.set_message("Stopped", MessageType::Info),
            Err(PlaybackError::AudioUnavailable(reason)) => self.set_message(
                format!("Audio unavailable ({}); press again to retry", reason),
                MessageType::Error,
            ),
            Err(e) => self.set_message(e.to_string(), MessageType::Warning),
        }
    }
}

fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let theme = &app.theme;

    // Clear with background
    frame.render_widget(Block::default().style(theme.normal()), area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Length(6), // Tone
        Constraint::Min(5),    // Journeys
        Constraint::Length(5), // Session
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], theme);

    let status = app.controller.status();
    frame.render_widget(ToneWidget::new(&status, theme), chunks[1]);

    let active = match app.controller.mode() {
        PlaybackMode::Journey { name } => Some(name.as_str()),
        _ => None,
    };
    frame.render_widget(
        JourneyListWidget::new(app.controller.journeys(), theme).active(active),
        chunks[2],
    );

    let session = app.session.borrow();
    frame.render_widget(SessionWidget::new(&*session, theme), chunks[3]);

    let status_bar = StatusBarWidget::new(app.input.mode(), app.input.command_buffer(), theme)
        .pending(app.input.pending_sequence())
        .message(Some(app.message.as_str()), app.message_type);
    frame.render_widget(status_bar, chunks[4]);

    if app.show_help {
        let help_area = centered_rect(58, 28, area);
        frame.render_widget(HelpWidget::new(theme), help_area);
    }
}

fn render_title(frame: &mut ratatui::Frame, area: Rect, theme: &Theme) {
    let title_text = " BINAURA ";
    let padding = (area.width as usize).saturating_sub(title_text.len()) / 2;
    let rest = (area.width as usize).saturating_sub(padding + title_text.len());
    let padded = format!("{:═<padding$}{}{:═<rest$}", "", title_text, "");

    frame.render_widget(Paragraph::new(Line::from(Span::styled(padded, theme.title()))), area);
}

/// Create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
