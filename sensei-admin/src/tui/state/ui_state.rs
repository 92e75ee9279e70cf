//! UI-related state management

use ratatui::widgets::TableState;

use crate::tui::types::ui::{AppMode, InputMode};

#[derive(Debug)]
pub struct UiState {
    pub mode: AppMode,
    pub input_mode: InputMode,
    pub should_quit: bool,

    /// Search box contents; committed to the list as they are typed
    pub search_input: String,
    pub table_state: TableState,

    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            mode: AppMode::NodeList,
            input_mode: InputMode::Normal,
            should_quit: false,
            search_input: String::new(),
            table_state: TableState::default(),
            status_message: None,
            error_message: None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Keep the selection on a valid row after the row count changes.
    pub fn clamp_selection(&mut self, row_count: usize) {
        let selected = match (self.table_state.selected(), row_count) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), n) => Some(i.min(n - 1)),
        };
        self.table_state.select(selected);
    }

    pub fn select_next(&mut self, row_count: usize) {
        if row_count == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 >= row_count => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn select_previous(&mut self, row_count: usize) {
        if row_count == 0 {
            return;
        }
        let previous = match self.table_state.selected() {
            Some(0) | None => row_count - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(previous));
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.error_message = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.status_message = None;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
