use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::task::JoinError;
use tracing::warn;

use crate::action::{Action, Direction};
use crate::config::{Config, parse_key};
use crate::system::SampleError;
use crate::system::collector::Collector;
use crate::system::process::{ProcessRow, SortKey, sort_rows};
use crate::system::snapshot::SystemSnapshot;
use crate::ui::theme::Theme;

const PAGE_SIZE: usize = 10;
const STATUS_MESSAGE_SECS: u64 = 3;
/// Floor for the refresh cadence; `/proc` walks are not free.
pub const MIN_REFRESH_MS: u64 = 100;

/// What joining a background `Collector::refresh` task yields.
pub type RefreshOutcome = Result<Result<SystemSnapshot, SampleError>, JoinError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub cycle_sort: KeyCode,
    pub refresh: KeyCode,
    pub cycle_theme: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            cycle_theme: parse_key(&kb.cycle_theme).unwrap_or(KeyCode::Char('t')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.cycle_sort), "Cycle sort column"),
            (key_label(self.refresh), "Refresh now"),
            (key_label(self.cycle_theme), "Cycle theme"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("↑↓".to_string(), "Move selection"));
        entries.push(("PgUp/PgDn".to_string(), "Page"));
        entries.push(("Home/End".to_string(), "First/last row"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        _ => "?".to_string(),
    }
}

pub struct App {
    pub running: bool,
    pub collector: Collector,
    pub snapshot: SystemSnapshot,
    /// Snapshot rows in display order.
    pub rows: Vec<ProcessRow>,
    pub selected_index: usize,
    pub input_mode: InputMode,
    pub sort_key: SortKey,
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
    pub max_rows: usize,
    /// Time between refresh requests, never below [`MIN_REFRESH_MS`].
    pub refresh_rate: Duration,
    pub sample_window: Duration,
    pub keybinds: ResolvedKeybinds,
    /// Set once at least one snapshot has been applied.
    pub loaded: bool,
    refresh_requested: bool,
}

impl App {
    /// The first snapshot is requested, not taken; the driver runs it off the
    /// render thread.
    pub fn new(config: &Config, collector: Collector) -> Self {
        App {
            running: true,
            collector,
            snapshot: SystemSnapshot::default(),
            rows: Vec::new(),
            selected_index: 0,
            input_mode: InputMode::Normal,
            sort_key: SortKey::from_str_config(&config.general.default_sort),
            theme: Theme::from_config(&config.colors.theme),
            status_message: None,
            max_rows: config.general.max_rows,
            refresh_rate: Duration::from_millis(config.general.refresh_rate_ms.max(MIN_REFRESH_MS)),
            sample_window: Duration::from_millis(config.sampling.interval_ms),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            loaded: false,
            refresh_requested: true,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: SystemSnapshot) {
        let selected_pid = self.selected_pid();

        self.rows = snapshot.processes.clone();
        sort_rows(&mut self.rows, self.sort_key);
        self.snapshot = snapshot;
        self.loaded = true;
        self.reselect(selected_pid);

        // Clear expired status messages
        if let Some((_, created)) = &self.status_message
            && created.elapsed().as_secs() >= STATUS_MESSAGE_SECS
        {
            self.status_message = None;
        }
    }

    /// Take the result of a background refresh task.
    ///
    /// On failure the previous snapshot stays on screen and the next tick
    /// retries. A panicked task counts as a failed cycle, not a fatal one.
    pub fn finish_refresh(&mut self, joined: RefreshOutcome) {
        match joined {
            Ok(Ok(snapshot)) => self.apply_snapshot(snapshot),
            Ok(Err(err)) => {
                warn!(error = %err, "refresh failed");
                self.refresh_failed(&err);
            }
            Err(join_err) => {
                warn!(error = %join_err, "refresh task aborted");
                self.set_status(format!("Refresh failed: {join_err}"));
            }
        }
    }

    fn refresh_failed(&mut self, err: &SampleError) {
        self.set_status(format!("Refresh failed: {err}"));
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Navigation keys are hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Top),
            KeyCode::End => return Action::Navigate(Direction::Bottom),
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.cycle_sort {
            return Action::CycleSortMode;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == kb.cycle_theme {
            return Action::CycleTheme;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::CycleSortMode => {
                let selected_pid = self.selected_pid();
                self.sort_key = self.sort_key.next();
                sort_rows(&mut self.rows, self.sort_key);
                self.reselect(selected_pid);
            }
            Action::CycleTheme => {
                self.theme = self.theme.next();
            }
            Action::Refresh => self.request_refresh(),
            Action::None => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let len = self.visible_rows().len();
        if len == 0 {
            return;
        }
        let last = len - 1;
        let current = self.selected_index.min(last);

        self.selected_index = match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => (current + 1).min(last),
            Direction::PageUp => current.saturating_sub(PAGE_SIZE),
            Direction::PageDown => (current + PAGE_SIZE).min(last),
            Direction::Top => 0,
            Direction::Bottom => last,
        };
    }

    /// Keep the cursor on the same pid across re-sorts and refreshes.
    fn reselect(&mut self, pid: Option<u32>) {
        let len = self.visible_rows().len();
        if let Some(pid) = pid
            && let Some(index) = self.visible_rows().iter().position(|r| r.pid == pid)
        {
            self.selected_index = index;
        } else if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn visible_rows(&self) -> &[ProcessRow] {
        if self.max_rows > 0 && self.rows.len() > self.max_rows {
            &self.rows[..self.max_rows]
        } else {
            &self.rows
        }
    }

    pub fn selected_row(&self) -> Option<&ProcessRow> {
        self.visible_rows().get(self.selected_index)
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.selected_row().map(|r| r.pid)
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }
}
