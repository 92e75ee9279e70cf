//! Query/command seam to the node control plane
//!
//! The console only ever talks to the fleet through [`NodeRepository`]. The
//! HTTP implementation speaks to a running Sensei admin API; the in-memory
//! implementation backs `--demo` mode and the test suites.

use async_trait::async_trait;
use crate::error::AdminResult;
use crate::types::{ListNodesQuery, NodePage};

#[async_trait]
pub trait NodeRepository: Send + Sync {
    /// Fetch one page of nodes matching the query's search term.
    async fn list_nodes(&self, query: &ListNodesQuery) -> AdminResult<NodePage>;

    /// Stop the node identified by `pubkey`.
    async fn stop_node(&self, pubkey: &str) -> AdminResult<()>;

    /// Start the node identified by `pubkey`, unlocking it with `passphrase`.
    async fn start_node(&self, pubkey: &str, passphrase: &str) -> AdminResult<()>;
}
