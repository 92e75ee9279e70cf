//! UI-related types for the TUI

use super::row::ChannelOpenRoute;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    NodeList,
    /// The open-channel screen reached from a row's affordance
    ChannelOpen(ChannelOpenRoute),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    /// Typing into the search box
    Editing,
}

/// Columns of the node table, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Username,
    Alias,
    Role,
    ConnectionInfo,
    Status,
    Actions,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Username,
        Column::Alias,
        Column::Role,
        Column::ConnectionInfo,
        Column::Status,
        Column::Actions,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Username => "Username",
            Column::Alias => "Alias",
            Column::Role => "Role",
            Column::ConnectionInfo => "Connection Info",
            Column::Status => "Status",
            Column::Actions => "Actions",
        }
    }
}
