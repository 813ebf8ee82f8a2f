use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use sitelens_core::analyzer::{Analyzer, FetchOutcome, FetchTicket};
use sitelens_core::card::{Card, UrlOpener};
use sitelens_core::options::AnalyzerOptions;
use sitelens_core::view::AnalyzerView;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_HISTORY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Cards,
}

pub struct App {
    analyzer: Analyzer,
    cursor_position: usize,
    focus: Focus,
    selected_card: usize,
    history: Vec<String>,
    history_index: Option<usize>,
    temp_input: String,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            analyzer: Analyzer::new(options),
            cursor_position: 0,
            focus: Focus::Input,
            selected_card: 0,
            history: Vec::new(),
            history_index: None,
            temp_input: String::new(),
            status: None,
            should_quit: false,
        }
    }

    pub fn input(&self) -> &str {
        self.analyzer.query()
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected_card(&self) -> usize {
        self.selected_card
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn view(&self) -> AnalyzerView {
        self.analyzer.view()
    }

    /// Apply a key press. Returns a ticket when a fetch should be started.
    pub fn handle_key(&mut self, key: KeyEvent, opener: &dyn UrlOpener) -> Option<FetchTicket> {
        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return None;
        }
        if key.code == KeyCode::Tab {
            self.toggle_focus();
            return None;
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::Cards => {
                self.handle_cards_key(key, opener);
                None
            }
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<FetchTicket> {
        let mut input = self.analyzer.query().to_string();
        match key.code {
            KeyCode::Char(c) => {
                input.insert(self.cursor_position, c);
                self.cursor_position += c.len_utf8();
                self.reset_history_navigation();
            }
            KeyCode::Backspace => {
                if let Some(c) = input[..self.cursor_position].chars().next_back() {
                    self.cursor_position -= c.len_utf8();
                    input.remove(self.cursor_position);
                    self.reset_history_navigation();
                }
            }
            KeyCode::Left => {
                if let Some(c) = input[..self.cursor_position].chars().next_back() {
                    self.cursor_position -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = input[self.cursor_position..].chars().next() {
                    self.cursor_position += c.len_utf8();
                }
            }
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = input.len(),
            KeyCode::Up => {
                self.navigate_history_backward();
                return None;
            }
            KeyCode::Down => {
                self.navigate_history_forward();
                return None;
            }
            KeyCode::Enter => return self.submit(),
            _ => return None,
        }
        self.analyzer.set_query(input);
        None
    }

    fn handle_cards_key(&mut self, key: KeyEvent, opener: &dyn UrlOpener) {
        let count = self.view().cards().len();
        match key.code {
            KeyCode::Up => self.selected_card = self.selected_card.saturating_sub(1),
            KeyCode::Down => {
                if count > 0 {
                    self.selected_card = (self.selected_card + 1).min(count - 1);
                }
            }
            KeyCode::Home => self.selected_card = 0,
            KeyCode::End => self.selected_card = count.saturating_sub(1),
            KeyCode::Char('o') => self.open_selected(opener, false),
            KeyCode::Char('s') => self.open_selected(opener, true),
            _ => {}
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Cards,
            Focus::Cards => Focus::Input,
        };
    }

    fn submit(&mut self) -> Option<FetchTicket> {
        let query = self.analyzer.query().to_string();
        if !query.is_empty() {
            self.history.push(query);
            if self.history.len() > MAX_HISTORY {
                self.history.remove(0);
            }
        }
        self.reset_history_navigation();

        let ticket = self.analyzer.begin();
        self.selected_card = 0;
        self.status = ticket
            .as_ref()
            .map(|t| format!("Fetching {}", t.target()));
        ticket
    }

    /// Feed a finished fetch back into the analyzer.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) {
        if self.analyzer.complete(ticket, outcome) {
            let count = self.view().cards().len();
            self.status = Some(format!("{} item(s) from {}", count, ticket.target()));
        }
    }

    fn open_selected(&mut self, opener: &dyn UrlOpener, source: bool) {
        let view = self.view();
        let Some(props) = view.cards().get(self.selected_card) else {
            return;
        };
        let card = Card::new(props);
        let result = if source {
            card.open_source(opener)
        } else {
            card.open_content(opener)
        };

        let label = if source { "source" } else { "content" };
        self.status = Some(match result {
            Ok(true) => format!("Opened {} of '{}'", label, props.title),
            Ok(false) => format!("'{}' has no {} link", props.title, label),
            Err(e) => format!("Could not open {}: {}", label, e),
        });
    }

    fn reset_history_navigation(&mut self) {
        self.history_index = None;
        self.temp_input.clear();
    }

    fn set_input(&mut self, value: String) {
        self.cursor_position = value.len();
        self.analyzer.set_query(value);
    }

    pub fn navigate_history_backward(&mut self) {
        if self.history.is_empty() {
            return;
        }

        if self.history_index.is_none() {
            self.temp_input = self.analyzer.query().to_string();
        }

        let idx = match self.history_index {
            None => self.history.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };
        self.history_index = Some(idx);
        self.set_input(self.history[idx].clone());
    }

    pub fn navigate_history_forward(&mut self) {
        let Some(idx) = self.history_index else {
            return;
        };

        if idx + 1 >= self.history.len() {
            let restored = std::mem::take(&mut self.temp_input);
            self.history_index = None;
            self.set_input(restored);
        } else {
            self.history_index = Some(idx + 1);
            self.set_input(self.history[idx + 1].clone());
        }
    }

    pub fn history_file_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".sitelens_history")
    }

    pub fn load_history_from(&mut self, path: &Path) {
        if let Ok(content) = fs::read_to_string(path) {
            let mut lines: Vec<String> = content
                .lines()
                .filter(|line| !line.is_empty())
                .map(|s| s.to_string())
                .collect();

            if lines.len() > MAX_HISTORY {
                lines.drain(0..lines.len() - MAX_HISTORY);
            }

            self.history = lines;
        }
    }

    pub fn save_history_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.history.join("\n"))?;
        Ok(())
    }
}
