//! Main application state combining all state modules
//!
//! `App` owns the listing, the row action controller, the overlays and the
//! UI state. It is driven purely by [`Event`]s and answers with the
//! [`Effect`]s the runner must execute, which keeps the whole console
//! testable without a terminal or a network.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use super::clipboard::{Clipboard, ClipboardBoard};
use super::paged_list::{FetchDisposition, ListView, PagedSearchList};
use super::row_actions::{Activation, Overlays, RowActionController};
use super::ui_state::UiState;
use crate::tui::effects::Effect;
use crate::tui::events::Event;
use crate::tui::forms::Modal;
use crate::tui::types::row::{DisplayRow, RowAction};
use crate::tui::types::ui::{AppMode, InputMode};

pub struct App {
    pub list: PagedSearchList,
    pub actions: RowActionController,
    pub overlays: Overlays,
    pub copy_feedback: ClipboardBoard,
    pub ui_state: UiState,
    clipboard: Box<dyn Clipboard + Send>,
}

impl App {
    pub fn new(page_size: usize, clipboard: Box<dyn Clipboard + Send>) -> Self {
        Self {
            list: PagedSearchList::new(page_size),
            actions: RowActionController::default(),
            overlays: Overlays::default(),
            copy_feedback: ClipboardBoard::default(),
            ui_state: UiState::new(),
            clipboard,
        }
    }

    /// Effects to run when the console first opens.
    pub fn start(&mut self) -> Vec<Effect> {
        vec![Effect::FetchNodes(self.list.mount())]
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit
    }

    pub fn rows(&self) -> &[DisplayRow] {
        self.list.rows()
    }

    pub fn selected_row(&self) -> Option<&DisplayRow> {
        self.ui_state
            .selected()
            .and_then(|i| self.list.rows().get(i))
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        match event {
            Event::Key(key) => self.handle_key_event(key, now),
            Event::Tick => {
                self.copy_feedback.expire_all(now);
                Vec::new()
            }
            Event::Resize(..) => Vec::new(),
            Event::NodesFetched { ticket, result } => {
                if self.list.complete(ticket, result) == FetchDisposition::Applied {
                    let count = self.list.rows().len();
                    self.ui_state.clamp_selection(count);
                }
                Vec::new()
            }
            Event::CommandCompleted(completion) => self
                .actions
                .on_completed(completion, &mut self.overlays, &mut self.list)
                .into_iter()
                .collect(),
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.ui_state.should_quit = true;
            return Vec::new();
        }

        // Overlays capture input before the screen underneath
        if self.overlays.modal.is_showing() {
            return self.handle_modal_keys(key);
        }
        if self.overlays.confirm.is_open() {
            return self.handle_confirm_keys(key);
        }

        match self.ui_state.mode {
            AppMode::ChannelOpen(_) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.ui_state.mode = AppMode::NodeList;
                }
                Vec::new()
            }
            AppMode::NodeList => match self.ui_state.input_mode {
                InputMode::Editing => self.handle_search_keys(key),
                InputMode::Normal => self.handle_node_list_keys(key, now),
            },
        }
    }

    fn handle_node_list_keys(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        let count = self.list.rows().len();
        match key.code {
            KeyCode::Char('q') => {
                self.ui_state.should_quit = true;
                Vec::new()
            }
            KeyCode::Char('/') => {
                self.ui_state.input_mode = InputMode::Editing;
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui_state.select_previous(count);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.ui_state.select_next(count);
                Vec::new()
            }
            KeyCode::Right | KeyCode::Char('l') => self.page_change(true),
            KeyCode::Left | KeyCode::Char('h') => self.page_change(false),
            KeyCode::Char('r') => vec![Effect::FetchNodes(self.list.retry())],
            KeyCode::Char('c') => {
                self.copy_selected(now);
                Vec::new()
            }
            KeyCode::Char('s') => {
                let action = match self.selected_row().map(|r| r.available_actions()[0]) {
                    Some(action) => action,
                    None => return Vec::new(),
                };
                self.activate_selected(action)
            }
            KeyCode::Char('o') => self.activate_selected(RowAction::OpenChannel),
            _ => Vec::new(),
        }
    }

    fn handle_search_keys(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.ui_state.input_mode = InputMode::Normal;
                Vec::new()
            }
            KeyCode::Char(c) => {
                self.ui_state.search_input.push(c);
                self.apply_search()
            }
            KeyCode::Backspace => {
                self.ui_state.search_input.pop();
                self.apply_search()
            }
            _ => Vec::new(),
        }
    }

    fn handle_confirm_keys(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.overlays.confirm.toggle_selection();
                Vec::new()
            }
            KeyCode::Char('y') => self.confirm(),
            KeyCode::Enter if self.overlays.confirm.confirm_selected => self.confirm(),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('n') => {
                self.actions.dismiss(&mut self.overlays);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_modal_keys(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => {
                self.actions.cancel_start(&mut self.overlays);
                Vec::new()
            }
            KeyCode::Enter => match self.actions.submit_start(&mut self.overlays) {
                Ok(effect) => effect.into_iter().collect(),
                Err(e) => {
                    debug!("Start form rejected: {}", e);
                    Vec::new()
                }
            },
            KeyCode::Backspace => {
                if let Some(Modal::StartNode(form)) = self.overlays.modal.current_mut() {
                    form.pop_char();
                }
                Vec::new()
            }
            KeyCode::Char(c) => {
                if let Some(Modal::StartNode(form)) = self.overlays.modal.current_mut() {
                    form.push_char(c);
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Commit the search box to the listing.
    pub fn apply_search(&mut self) -> Vec<Effect> {
        let term = self.ui_state.search_input.clone();
        match self.list.set_search_term(term) {
            Some(ticket) => {
                self.ui_state.table_state.select(None);
                vec![Effect::FetchNodes(ticket)]
            }
            None => Vec::new(),
        }
    }

    fn page_change(&mut self, forward: bool) -> Vec<Effect> {
        let ticket = if forward {
            self.list.next_page()
        } else {
            self.list.prev_page()
        };
        match ticket {
            Some(ticket) => {
                self.ui_state.table_state.select(None);
                vec![Effect::FetchNodes(ticket)]
            }
            None => Vec::new(),
        }
    }

    /// Copy the selected row's full connection string.
    pub fn copy_selected(&mut self, now: Instant) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let pubkey = row.pubkey.clone();
        let text = row.full_connection_string();

        match self
            .copy_feedback
            .copy(self.clipboard.as_mut(), &pubkey, &text, now)
        {
            Ok(()) => self.ui_state.set_status(format!("Copied {}", text)),
            Err(e) => self.ui_state.set_error(e.to_string()),
        }
    }

    /// Activate `action` on the selected row.
    pub fn activate_selected(&mut self, action: RowAction) -> Vec<Effect> {
        let Some(row) = self.selected_row().cloned() else {
            return Vec::new();
        };

        match self.actions.activate(action, &row, &mut self.overlays) {
            Activation::Navigate(route) => {
                info!(path = %route.path(), "Opening channel");
                self.ui_state.mode = AppMode::ChannelOpen(route);
            }
            Activation::Ignored => {
                if self.actions.is_pending(&row.pubkey) {
                    self.ui_state
                        .set_status(format!("A command for {} is still running", row.alias));
                }
            }
            Activation::ConfirmationOpened | Activation::FormOpened => {}
        }
        Vec::new()
    }

    /// Accept the open confirmation.
    pub fn confirm(&mut self) -> Vec<Effect> {
        self.actions
            .confirm(&mut self.overlays)
            .into_iter()
            .collect()
    }

    pub fn view(&self) -> ListView<'_> {
        self.list.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::clipboard::MemoryClipboard;
    use sensei_admin_core::{NodePage, NodeRecord, NodeRole, NodeStatus, PaginationMeta};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn loaded_app() -> App {
        let mut app = App::new(5, Box::new(MemoryClipboard::default()));
        let Some(Effect::FetchNodes(ticket)) = app.start().pop() else {
            panic!("expected initial fetch");
        };
        let page = NodePage {
            nodes: vec![NodeRecord::new(
                "02aa",
                "alpha",
                "alice",
                NodeRole::Child,
                NodeStatus::Running,
                "127.0.0.1",
                9736,
            )],
            pagination: PaginationMeta {
                has_more: false,
                total: 1,
            },
        };
        app.handle_event(
            Event::NodesFetched {
                ticket,
                result: Ok(page),
            },
            Instant::now(),
        );
        app
    }

    #[test]
    fn test_fetch_selects_first_row() {
        let app = loaded_app();
        assert_eq!(app.selected_row().map(|r| r.alias.as_str()), Some("alpha"));
    }

    #[test]
    fn test_search_typing_fetches_per_keystroke() {
        let mut app = loaded_app();
        app.handle_event(key(KeyCode::Char('/')), Instant::now());

        let effects = app.handle_event(key(KeyCode::Char('b')), Instant::now());
        assert_eq!(effects.len(), 1);
        assert_eq!(app.list.search_term(), "b");

        app.handle_event(key(KeyCode::Esc), Instant::now());
        assert_eq!(app.ui_state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_stop_key_opens_confirmation_and_n_dismisses() {
        let mut app = loaded_app();
        app.handle_event(key(KeyCode::Char('s')), Instant::now());
        assert!(app.overlays.confirm.is_open());

        let effects = app.handle_event(key(KeyCode::Char('n')), Instant::now());
        assert!(effects.is_empty());
        assert!(!app.overlays.confirm.is_open());
    }

    #[test]
    fn test_enter_on_default_selection_cancels() {
        let mut app = loaded_app();
        app.handle_event(key(KeyCode::Char('s')), Instant::now());

        assert!(app.handle_event(key(KeyCode::Enter), Instant::now()).is_empty());
        assert!(!app.overlays.confirm.is_open());
    }

    #[test]
    fn test_open_channel_navigates_and_back() {
        let mut app = loaded_app();
        app.handle_event(key(KeyCode::Char('o')), Instant::now());
        assert!(matches!(app.ui_state.mode, AppMode::ChannelOpen(_)));

        app.handle_event(key(KeyCode::Esc), Instant::now());
        assert_eq!(app.ui_state.mode, AppMode::NodeList);
    }

    #[test]
    fn test_copy_key_sets_feedback() {
        let mut app = loaded_app();
        let now = Instant::now();
        app.handle_event(key(KeyCode::Char('c')), now);
        assert!(app.copy_feedback.is_copied("02aa", now));
    }
}
