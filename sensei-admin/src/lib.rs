pub mod listing;
pub mod tui;

// Re-export commonly used types
pub use sensei_admin_core::{
    config::AdminConfig,
    error::{AdminError, AdminResult},
    repository::NodeRepository,
    HttpNodeRepository, MemoryNodeRepository,
};
