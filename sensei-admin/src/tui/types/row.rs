//! Display rows and the actions they expose

use sensei_admin_core::{NodeRole, NodeStatus};

/// Host used when building channel-open links; the console opens channels
/// from the node running next to the admin API.
pub const CHANNEL_OPEN_HOST: &str = "127.0.0.1";

/// Marker value of the synthetic actions column
pub const ACTIONS_MARKER: &str = "Action";

/// A node reshaped for display
///
/// Built fresh from the wire record on every fetch and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub pubkey: String,
    pub alias: String,
    pub username: String,
    pub role: NodeRole,
    pub status: NodeStatus,
    pub listen_addr: String,
    pub listen_port: u16,
    /// `truncated-pubkey@host:port`
    pub connection_info: String,
    pub actions: &'static str,
}

impl DisplayRow {
    pub fn role_label(&self) -> &'static str {
        self.role.label()
    }

    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    /// The untruncated `pubkey@listen_addr:listen_port` written to the clipboard.
    pub fn full_connection_string(&self) -> String {
        format!("{}@{}:{}", self.pubkey, self.listen_addr, self.listen_port)
    }

    pub fn available_actions(&self) -> [RowAction; 2] {
        actions_for(self.status)
    }
}

/// An affordance in the actions column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    Start,
    Stop,
    OpenChannel,
}

impl RowAction {
    pub fn icon(&self) -> &'static str {
        match self {
            RowAction::Start => "▶",
            RowAction::Stop => "■",
            RowAction::OpenChannel => "⊕",
        }
    }

    pub fn is_lifecycle(&self) -> bool {
        matches!(self, RowAction::Start | RowAction::Stop)
    }
}

/// Actions offered for a node in the given state.
pub fn actions_for(status: NodeStatus) -> [RowAction; 2] {
    match status {
        NodeStatus::Stopped => [RowAction::Start, RowAction::OpenChannel],
        NodeStatus::Running => [RowAction::Stop, RowAction::OpenChannel],
    }
}

/// Navigation target of the open-channel affordance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOpenRoute {
    pub pubkey: String,
    pub connection: String,
}

impl ChannelOpenRoute {
    pub fn for_row(row: &DisplayRow) -> Self {
        Self {
            pubkey: row.pubkey.clone(),
            connection: format!("{}@{}:{}", row.pubkey, CHANNEL_OPEN_HOST, row.listen_port),
        }
    }

    pub fn path(&self) -> String {
        format!("/admin/channels/open?connection={}", self.connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_follow_status() {
        assert_eq!(
            actions_for(NodeStatus::Stopped),
            [RowAction::Start, RowAction::OpenChannel]
        );
        assert_eq!(
            actions_for(NodeStatus::Running),
            [RowAction::Stop, RowAction::OpenChannel]
        );
    }
}
