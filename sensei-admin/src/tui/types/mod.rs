//! Type definitions for the TUI application

pub mod row;
pub mod ui;

pub use row::{actions_for, ChannelOpenRoute, DisplayRow, RowAction};
pub use ui::{AppMode, Column, InputMode};
