//! Confirmation gate for destructive actions
//!
//! One gate exists per application. Opening a new request while another is
//! showing replaces it; the replaced request is discarded and can no longer
//! be accepted or completed.

use tracing::{debug, info};

pub const STOP_NODE_TITLE: &str = "Are you sure you want to stop this node?";
pub const STOP_NODE_DESCRIPTION: &str = "A stopped node can no longer send, receive, or route payments.  The node will also no longer be monitoring the chain for misbehavior.";
pub const STOP_NODE_CTA: &str = "Yes, stop it";

/// The action a confirmation guards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    StopNode { pubkey: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub action: PendingAction,
}

impl ConfirmationRequest {
    pub fn stop_node(pubkey: impl Into<String>) -> Self {
        Self {
            title: STOP_NODE_TITLE.to_string(),
            description: STOP_NODE_DESCRIPTION.to_string(),
            cta_text: STOP_NODE_CTA.to_string(),
            action: PendingAction::StopNode {
                pubkey: pubkey.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Closed,
    Open {
        id: u64,
        request: ConfirmationRequest,
        /// Failure of the previous attempt, shown inside the dialog
        error: Option<String>,
    },
    /// Accepted; waiting for the command to finish
    Pending {
        id: u64,
        request: ConfirmationRequest,
    },
}

#[derive(Debug)]
pub struct ConfirmationGate {
    state: GateState,
    next_id: u64,
    /// Whether the confirm button (rather than cancel) is focused
    pub confirm_selected: bool,
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self {
            state: GateState::Closed,
            next_id: 0,
            confirm_selected: false,
        }
    }
}

impl ConfirmationGate {
    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, GateState::Closed)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, GateState::Pending { .. })
    }

    pub fn request(&self) -> Option<&ConfirmationRequest> {
        match &self.state {
            GateState::Closed => None,
            GateState::Open { request, .. } | GateState::Pending { request, .. } => Some(request),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            GateState::Open { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// Show `request`, discarding whatever was showing before.
    pub fn open(&mut self, request: ConfirmationRequest) -> u64 {
        if let Some(previous) = self.request() {
            debug!(action = ?previous.action, "Replacing open confirmation");
        }
        self.next_id += 1;
        self.state = GateState::Open {
            id: self.next_id,
            request,
            error: None,
        };
        self.confirm_selected = false;
        self.next_id
    }

    /// Accept the open request, handing back its action exactly once.
    pub fn accept(&mut self) -> Option<(u64, PendingAction)> {
        match std::mem::replace(&mut self.state, GateState::Closed) {
            GateState::Open { id, request, .. } => {
                info!(action = ?request.action, "Confirmation accepted");
                let action = request.action.clone();
                self.state = GateState::Pending { id, request };
                Some((id, action))
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Close without running the action. Ignored while a command is pending.
    pub fn dismiss(&mut self) -> bool {
        if matches!(self.state, GateState::Open { .. }) {
            self.state = GateState::Closed;
            true
        } else {
            false
        }
    }

    /// Record the outcome of the accepted action.
    ///
    /// Success closes the gate; failure reopens it with the error so the
    /// operator can retry or cancel. A result for a request that has since
    /// been replaced is ignored.
    pub fn complete(&mut self, id: u64, result: Result<(), String>) {
        let request = match &self.state {
            GateState::Pending { id: pending, request } if *pending == id => request.clone(),
            _ => {
                debug!(id, "Ignoring completion for a discarded confirmation");
                return;
            }
        };

        self.state = match result {
            Ok(()) => GateState::Closed,
            Err(message) => GateState::Open {
                id,
                request,
                error: Some(message),
            },
        };
    }

    pub fn toggle_selection(&mut self) {
        self.confirm_selected = !self.confirm_selected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_never_runs_action() {
        let mut gate = ConfirmationGate::default();
        gate.open(ConfirmationRequest::stop_node("02aa"));

        assert!(gate.dismiss());
        assert!(!gate.is_open());
        assert!(gate.accept().is_none());
    }

    #[test]
    fn test_accept_yields_action_once() {
        let mut gate = ConfirmationGate::default();
        gate.open(ConfirmationRequest::stop_node("02aa"));

        let (_, action) = gate.accept().unwrap();
        assert_eq!(
            action,
            PendingAction::StopNode {
                pubkey: "02aa".to_string()
            }
        );
        assert!(gate.accept().is_none());
        assert!(!gate.dismiss());
        assert!(gate.is_pending());
    }

    #[test]
    fn test_failure_reopens_with_error() {
        let mut gate = ConfirmationGate::default();
        gate.open(ConfirmationRequest::stop_node("02aa"));
        let (id, _) = gate.accept().unwrap();

        gate.complete(id, Err("node busy".to_string()));

        assert_eq!(gate.error(), Some("node busy"));
        assert!(gate.accept().is_some());
        gate.complete(id, Ok(()));
        assert!(!gate.is_open());
    }

    #[test]
    fn test_last_request_wins() {
        let mut gate = ConfirmationGate::default();
        let first = gate.open(ConfirmationRequest::stop_node("02aa"));
        gate.open(ConfirmationRequest::stop_node("02bb"));

        gate.complete(first, Ok(()));
        let (_, action) = gate.accept().unwrap();
        assert_eq!(
            action,
            PendingAction::StopNode {
                pubkey: "02bb".to_string()
            }
        );
    }

    #[test]
    fn test_stop_node_copy() {
        let request = ConfirmationRequest::stop_node("02aa");
        assert_eq!(request.title, "Are you sure you want to stop this node?");
        assert_eq!(request.cta_text, "Yes, stop it");
        assert!(request.description.contains("payments.  The node"));
    }
}
