//! Side effects requested by the state machines, and their execution
//!
//! State transitions never touch the network. They return [`Effect`]s,
//! which are run against a [`NodeRepository`] and turned back into
//! [`Event`]s for the application to apply.

use std::fmt;
use std::sync::Arc;

use sensei_admin_core::{AdminResult, NodeRepository};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::tui::events::Event;
use crate::tui::state::paged_list::FetchTicket;

#[derive(Clone, PartialEq, Eq)]
pub enum Effect {
    FetchNodes(FetchTicket),
    StopNode {
        request_id: u64,
        pubkey: String,
    },
    StartNode {
        request_id: u64,
        pubkey: String,
        passphrase: String,
    },
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::FetchNodes(ticket) => f.debug_tuple("FetchNodes").field(ticket).finish(),
            Effect::StopNode { request_id, pubkey } => f
                .debug_struct("StopNode")
                .field("request_id", request_id)
                .field("pubkey", pubkey)
                .finish(),
            Effect::StartNode {
                request_id, pubkey, ..
            } => f
                .debug_struct("StartNode")
                .field("request_id", request_id)
                .field("pubkey", pubkey)
                .field("passphrase", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Stop,
    Start,
}

impl CommandKind {
    pub fn label(&self) -> &'static str {
        match self {
            CommandKind::Stop => "stop",
            CommandKind::Start => "start",
        }
    }
}

/// Outcome of a lifecycle command
#[derive(Debug)]
pub struct CommandCompletion {
    pub request_id: u64,
    pub kind: CommandKind,
    pub pubkey: String,
    pub result: AdminResult<()>,
}

/// Run one effect to completion.
pub async fn execute(repo: &dyn NodeRepository, effect: Effect) -> Event {
    match effect {
        Effect::FetchNodes(ticket) => {
            let result = repo.list_nodes(&ticket.key.to_query()).await;
            Event::NodesFetched { ticket, result }
        }
        Effect::StopNode { request_id, pubkey } => {
            let result = repo.stop_node(&pubkey).await;
            Event::CommandCompleted(CommandCompletion {
                request_id,
                kind: CommandKind::Stop,
                pubkey,
                result,
            })
        }
        Effect::StartNode {
            request_id,
            pubkey,
            passphrase,
        } => {
            let result = repo.start_node(&pubkey, &passphrase).await;
            Event::CommandCompleted(CommandCompletion {
                request_id,
                kind: CommandKind::Start,
                pubkey,
                result,
            })
        }
    }
}

/// Spawns effects on the runtime and delivers their events to the loop
pub struct EffectRunner {
    repo: Arc<dyn NodeRepository>,
    sender: mpsc::UnboundedSender<Event>,
}

impl EffectRunner {
    pub fn new(repo: Arc<dyn NodeRepository>, sender: mpsc::UnboundedSender<Event>) -> Self {
        Self { repo, sender }
    }

    pub fn spawn(&self, effect: Effect) {
        debug!(?effect, "Running effect");
        let repo = Arc::clone(&self.repo);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let event = execute(repo.as_ref(), effect).await;
            if sender.send(event).is_err() {
                warn!("Event loop closed before effect completed");
            }
        });
    }
}
