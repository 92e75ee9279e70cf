//! Form definitions for the TUI

pub mod start_node;

pub use start_node::{FormStatus, StartNodeForm, StartNodeSubmission};

/// Content that can occupy the modal slot
#[derive(Debug, Clone)]
pub enum Modal {
    StartNode(StartNodeForm),
}
