//! In-memory fleet used for demo mode and tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use crate::error::{AdminError, AdminResult};
use crate::repository::NodeRepository;
use crate::types::{ListNodesQuery, NodePage, NodeRecord, NodeRole, NodeStatus, PaginationMeta};

/// A [`NodeRepository`] over a vector of records.
///
/// Listing filters by a case-insensitive substring match on alias, username
/// or pubkey and pages with `page * take` offsets. Failures can be queued per
/// operation to exercise error paths.
#[derive(Default)]
pub struct MemoryNodeRepository {
    nodes: Mutex<Vec<NodeRecord>>,
    passphrases: Mutex<HashMap<String, String>>,
    list_failures: Mutex<VecDeque<String>>,
    stop_failures: Mutex<VecDeque<String>>,
    start_failures: Mutex<VecDeque<String>>,
    list_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    start_calls: AtomicUsize,
}

impl MemoryNodeRepository {
    pub fn new(nodes: Vec<NodeRecord>) -> Self {
        Self {
            nodes: Mutex::new(nodes),
            ..Self::default()
        }
    }

    /// A small fleet: one Sensei root node and a handful of children.
    pub fn demo() -> Self {
        let mut nodes = vec![NodeRecord::new(
            "03a1f2c4d5e6b7a8c9d0e1f2a3b4c5d6e7f8a9b0c1d2e3f4a5b6c7d8e9f0a1b2c3",
            "sensei-root",
            "admin",
            NodeRole::Sensei,
            NodeStatus::Running,
            "127.0.0.1",
            9735,
        )];

        let children = [
            ("alice", "alice-node", NodeStatus::Running),
            ("bob", "bob-node", NodeStatus::Stopped),
            ("carol", "carol-node", NodeStatus::Running),
            ("dave", "dave-node", NodeStatus::Stopped),
            ("erin", "erin-node", NodeStatus::Running),
            ("frank", "frank-node", NodeStatus::Stopped),
        ];

        for (i, (username, alias, status)) in children.iter().enumerate() {
            nodes.push(NodeRecord::new(
                format!("02{:064x}", (i as u128 + 1) * 0x1f2e3d4c5b6a7988),
                *alias,
                *username,
                NodeRole::Child,
                *status,
                "127.0.0.1",
                9736 + i as u16,
            ));
        }

        Self::new(nodes)
    }

    /// Require `passphrase` when starting `pubkey`.
    pub fn set_passphrase(&self, pubkey: impl Into<String>, passphrase: impl Into<String>) {
        self.passphrases.lock().insert(pubkey.into(), passphrase.into());
    }

    pub fn fail_next_list(&self, message: impl Into<String>) {
        self.list_failures.lock().push_back(message.into());
    }

    pub fn fail_next_stop(&self, message: impl Into<String>) {
        self.stop_failures.lock().push_back(message.into());
    }

    pub fn fail_next_start(&self, message: impl Into<String>) {
        self.start_failures.lock().push_back(message.into());
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn node(&self, pubkey: &str) -> Option<NodeRecord> {
        self.nodes.lock().iter().find(|n| n.pubkey == pubkey).cloned()
    }

    fn set_status(&self, pubkey: &str, status: NodeStatus) -> bool {
        let mut nodes = self.nodes.lock();
        match nodes.iter_mut().find(|n| n.pubkey == pubkey) {
            Some(node) => {
                node.status = status.code();
                true
            }
            None => false,
        }
    }
}

fn matches_search(node: &NodeRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    node.alias.to_lowercase().contains(&term)
        || node.username.to_lowercase().contains(&term)
        || node.pubkey.to_lowercase().contains(&term)
}

#[async_trait]
impl NodeRepository for MemoryNodeRepository {
    async fn list_nodes(&self, query: &ListNodesQuery) -> AdminResult<NodePage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.list_failures.lock().pop_front() {
            return Err(AdminError::fetch(message));
        }

        if query.take == 0 {
            return Err(AdminError::InvalidInput {
                field: "take".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let nodes = self.nodes.lock();
        let matching: Vec<&NodeRecord> = nodes
            .iter()
            .filter(|n| matches_search(n, &query.search_term))
            .collect();

        let total = matching.len();
        let start = query.page.saturating_mul(query.take);
        let page: Vec<NodeRecord> = matching
            .into_iter()
            .skip(start)
            .take(query.take)
            .cloned()
            .collect();
        let has_more = start + page.len() < total;

        debug!(
            page = query.page,
            take = query.take,
            search = %query.search_term,
            returned = page.len(),
            total,
            "Served node listing"
        );

        Ok(NodePage {
            nodes: page,
            pagination: PaginationMeta {
                has_more,
                total: total as u64,
            },
        })
    }

    async fn stop_node(&self, pubkey: &str) -> AdminResult<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.stop_failures.lock().pop_front() {
            return Err(AdminError::command("stop", pubkey, message));
        }

        // Unknown nodes are treated as already stopped.
        self.set_status(pubkey, NodeStatus::Stopped);
        Ok(())
    }

    async fn start_node(&self, pubkey: &str, passphrase: &str) -> AdminResult<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.start_failures.lock().pop_front() {
            return Err(AdminError::command("start", pubkey, message));
        }

        if let Some(expected) = self.passphrases.lock().get(pubkey) {
            if expected != passphrase {
                return Err(AdminError::command("start", pubkey, "invalid passphrase"));
            }
        }

        if self.set_status(pubkey, NodeStatus::Running) {
            Ok(())
        } else {
            Err(AdminError::command("start", pubkey, "node not found"))
        }
    }
}
