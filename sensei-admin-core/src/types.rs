//! Node records and listing types shared by the console and its backends

use serde::{Deserialize, Serialize};
use std::fmt;

/// A managed node as reported by the control plane.
///
/// `role` and `status` are the raw integer codes from the admin API. They are
/// decoded into [`NodeRole`] and [`NodeStatus`] once, when the record is
/// turned into a display row; nothing else should branch on the codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub pubkey: String,
    pub alias: String,
    pub username: String,
    pub role: u8,
    pub status: u8,
    #[serde(alias = "listen_addr")]
    pub listen_addr: String,
    #[serde(alias = "listen_port")]
    pub listen_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl NodeRecord {
    pub fn new(
        pubkey: impl Into<String>,
        alias: impl Into<String>,
        username: impl Into<String>,
        role: NodeRole,
        status: NodeStatus,
        listen_addr: impl Into<String>,
        listen_port: u16,
    ) -> Self {
        Self {
            id: None,
            pubkey: pubkey.into(),
            alias: alias.into(),
            username: username.into(),
            role: role.code(),
            status: status.code(),
            listen_addr: listen_addr.into(),
            listen_port,
            network: None,
            created_at: None,
        }
    }

    /// Full, untruncated connection string: `pubkey@listen_addr:listen_port`.
    pub fn connection_string(&self) -> String {
        format!("{}@{}:{}", self.pubkey, self.listen_addr, self.listen_port)
    }
}

/// Role of a node within the fleet
///
/// The root node that owns the network graph is the `Sensei` node; every
/// other node routes through it and is a `Child`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Sensei,
    Child,
}

impl NodeRole {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => NodeRole::Sensei,
            _ => NodeRole::Child,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            NodeRole::Sensei => 0,
            NodeRole::Child => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeRole::Sensei => "Sensei",
            NodeRole::Child => "Child",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Run state of a node process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    Stopped,
    Running,
}

impl NodeStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => NodeStatus::Stopped,
            _ => NodeStatus::Running,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            NodeStatus::Stopped => 0,
            NodeStatus::Running => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeStatus::Stopped => "Stopped",
            NodeStatus::Running => "Running",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters of a single listing request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListNodesQuery {
    pub page: usize,
    #[serde(rename = "query")]
    pub search_term: String,
    pub take: usize,
}

impl ListNodesQuery {
    pub fn new(page: usize, search_term: impl Into<String>, take: usize) -> Self {
        Self {
            page,
            search_term: search_term.into(),
            take,
        }
    }
}

/// Pagination metadata returned with every listing page.
///
/// `total` reflects the store at fetch time only; the console never adjusts
/// it locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    #[serde(alias = "has_more")]
    pub has_more: bool,
    pub total: u64,
}

/// One page of the node listing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodePage {
    pub nodes: Vec<NodeRecord>,
    pub pagination: PaginationMeta,
}
