//! State management for the TUI application
//!
//! Each component owns one small state machine; `App` wires them together.

pub mod app_state;
pub mod clipboard;
pub mod confirm;
pub mod modal;
pub mod paged_list;
pub mod row_actions;
pub mod ui_state;

pub use app_state::App;
