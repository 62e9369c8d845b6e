use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::snapshot_io::read_snapshot;
use crate::io::source::{SourceEvent, spawn_command_reader};
use crate::io::watcher::SnapshotWatcher;
use crate::model::BoardConfig;
use crate::ops::command::{Dispatch, dispatch};
use crate::view::{TaskList, Viewport};

use super::banner::Banner;
use super::render;
use super::theme::Theme;

/// Poll interval while something moves on screen
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Poll interval when the board is still
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

/// Main application state
pub struct App {
    pub list: TaskList,
    pub theme: Theme,
    pub banner: Option<Banner>,
    pub should_quit: bool,
    source_name: String,
    snapshot: Option<PathBuf>,
    banner_hold: Duration,
}

impl App {
    pub fn new(config: &BoardConfig) -> Self {
        App {
            list: TaskList::new(config),
            theme: Theme::from_config(&config.ui),
            banner: None,
            should_quit: false,
            source_name: config.source.name.clone(),
            snapshot: config.source.snapshot.clone(),
            banner_hold: Duration::from_secs(config.ui.banner_secs),
        }
    }

    pub fn show_banner(&mut self, message: impl Into<String>, now: Instant) {
        self.banner = Some(Banner::new(message, now, self.banner_hold));
    }

    /// Reload the board from the snapshot file
    pub fn resync(&mut self, now: Instant) {
        let Some(path) = self.snapshot.clone() else {
            log::debug!("resync requested but no snapshot is configured");
            return;
        };
        match read_snapshot(&path) {
            Ok(sections) => {
                log::debug!("resync: loaded {} sections", sections.len());
                self.list.load(&sections);
            }
            Err(e) => {
                log::warn!("{e}");
                self.show_banner(format!("Resync failed: {e}"), now);
            }
        }
    }

    pub fn handle_source_event(&mut self, event: SourceEvent, now: Instant) {
        match event {
            SourceEvent::Command(envelope) => {
                if dispatch(&mut self.list, envelope, &self.source_name) == Dispatch::Resync {
                    self.resync(now);
                }
            }
            SourceEvent::Malformed { line, error } => {
                log::warn!("skipping malformed command {line:?}: {error}");
            }
            SourceEvent::Disconnected(reason) => {
                log::warn!("{reason}");
                self.show_banner(format!("Connection Failed: {reason}"), now);
            }
            SourceEvent::SnapshotChanged => self.resync(now),
            SourceEvent::WatchError(e) => {
                log::warn!("snapshot watcher: {e}");
                self.show_banner(format!("Connection Failed: {e}"), now);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => self.should_quit = true,
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => self.should_quit = true,
            _ => {}
        }
    }

    /// Advance animations and expire the banner
    pub fn tick(&mut self, now: Instant) {
        self.list.frame(now);
        if self.banner.as_ref().is_some_and(|b| b.opacity(now).is_none()) {
            self.banner = None;
        }
    }

    pub fn poll_interval(&self, now: Instant) -> Duration {
        let fading = self.banner.as_ref().is_some_and(|b| b.is_fading(now));
        if self.list.wants_frame() || fading {
            FRAME_INTERVAL
        } else {
            IDLE_INTERVAL
        }
    }
}

/// Run the board until the user quits
pub fn run(config: &BoardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();
    let _reader = spawn_command_reader(&config.source.commands, tx.clone())?;

    let mut app = App::new(config);
    let now = Instant::now();

    // Kept alive for the whole session
    let _watcher = match &config.source.snapshot {
        Some(path) => match SnapshotWatcher::start(path, tx) {
            Ok(w) => Some(w),
            Err(e) => {
                log::warn!("could not watch {}: {e}", path.display());
                app.show_banner(format!("Connection Failed: {e}"), now);
                None
            }
        },
        None => None,
    };
    app.resync(now);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.list.destroy();
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &Receiver<SourceEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();
        for event in rx.try_iter() {
            app.handle_source_event(event, now);
        }

        let size = terminal.size()?;
        app.list.set_viewport(Viewport {
            width: size.width,
            height: render::board_height(size.height),
        });
        app.tick(now);

        terminal.draw(|frame| render::render(frame, app, now))?;

        if event::poll(app.poll_interval(now))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::command::parse_line;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn config_with_snapshot(path: Option<PathBuf>) -> BoardConfig {
        let mut config = BoardConfig::default();
        config.animation.enabled = false;
        config.source.snapshot = path;
        config
    }

    fn command(line: &str) -> SourceEvent {
        SourceEvent::Command(parse_line(line).unwrap())
    }

    #[test]
    fn test_clearall_reloads_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(
            &path,
            r#"{"u1":{"username":"Ann","tasks":[{"Name":"a"}]}}"#,
        )
        .unwrap();
        let mut app = App::new(&config_with_snapshot(Some(path)));
        let now = Instant::now();

        app.handle_source_event(
            command(r#"{"id":"u9","body":{"mode":"add","task":"local"}}"#),
            now,
        );
        assert_eq!(app.list.section_count(), 1);
        app.handle_source_event(command(r#"{"id":"u9","body":{"mode":"clearall"}}"#), now);
        let data = app.list.data();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].id, "u1");
        assert_eq!(data[0].title, "Ann");
    }

    #[test]
    fn test_bad_snapshot_shows_banner_and_keeps_model() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, "{ broken").unwrap();
        let mut app = App::new(&config_with_snapshot(Some(path)));
        let now = Instant::now();

        app.handle_source_event(
            command(r#"{"id":"u1","body":{"mode":"add","task":"keep"}}"#),
            now,
        );
        app.handle_source_event(SourceEvent::SnapshotChanged, now);
        assert_eq!(app.list.task_count(), 1);
        assert!(app.banner.as_ref().unwrap().message.starts_with("Resync failed"));
    }

    #[test]
    fn test_disconnect_banner_expires() {
        let mut app = App::new(&config_with_snapshot(None));
        let now = Instant::now();
        app.handle_source_event(SourceEvent::Disconnected("command stream closed".into()), now);
        assert_eq!(
            app.banner.as_ref().unwrap().message,
            "Connection Failed: command stream closed"
        );
        app.tick(now + Duration::from_secs(5));
        assert!(app.banner.is_some());
        assert_eq!(app.poll_interval(now + Duration::from_secs(5)), FRAME_INTERVAL);
        app.tick(now + Duration::from_millis(5400));
        assert!(app.banner.is_none());
        assert_eq!(app.poll_interval(now + Duration::from_secs(6)), IDLE_INTERVAL);
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = App::new(&config_with_snapshot(None));
            app.handle_key(key);
            assert!(app.should_quit);
        }
        let mut app = App::new(&config_with_snapshot(None));
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(!app.should_quit);
    }
}
