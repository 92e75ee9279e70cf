//! Core types and control-plane access for the Sensei fleet admin console

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod repository;
pub mod types;

pub use config::{AdminConfig, AdminConfigBuilder};
pub use error::{AdminError, AdminResult};
pub use http::HttpNodeRepository;
pub use memory::MemoryNodeRepository;
pub use repository::NodeRepository;
pub use types::{ListNodesQuery, NodePage, NodeRecord, NodeRole, NodeStatus, PaginationMeta};
