//! Row lifecycle actions
//!
//! Turns an activated row affordance into the right overlay, tracks the
//! commands each row has in flight, and refreshes the listing only after a
//! command succeeds.

use std::collections::HashMap;

use sensei_admin_core::AdminResult;
use tracing::{info, warn};

use crate::tui::effects::{CommandCompletion, CommandKind, Effect};
use crate::tui::forms::{Modal, StartNodeForm};
use crate::tui::state::confirm::{ConfirmationGate, ConfirmationRequest, PendingAction};
use crate::tui::state::modal::ModalHost;
use crate::tui::state::paged_list::PagedSearchList;
use crate::tui::types::row::{ChannelOpenRoute, DisplayRow, RowAction};

/// The application-wide overlay slots
#[derive(Debug, Default)]
pub struct Overlays {
    pub confirm: ConfirmationGate,
    pub modal: ModalHost<Modal>,
}

/// Result of activating a row affordance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    ConfirmationOpened,
    FormOpened,
    Navigate(ChannelOpenRoute),
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingCommand {
    request_id: u64,
    kind: CommandKind,
}

#[derive(Debug, Default)]
pub struct RowActionController {
    pending: HashMap<String, PendingCommand>,
    row_errors: HashMap<String, String>,
    next_start_id: u64,
}

impl RowActionController {
    pub fn is_pending(&self, pubkey: &str) -> bool {
        self.pending.contains_key(pubkey)
    }

    pub fn row_error(&self, pubkey: &str) -> Option<&str> {
        self.row_errors.get(pubkey).map(String::as_str)
    }

    /// Activate `action` on `row`.
    ///
    /// Actions not offered for the row's status, and lifecycle actions on a
    /// row with a command already in flight, are ignored.
    pub fn activate(
        &mut self,
        action: RowAction,
        row: &DisplayRow,
        overlays: &mut Overlays,
    ) -> Activation {
        if !row.available_actions().contains(&action) {
            return Activation::Ignored;
        }
        if action.is_lifecycle() && self.is_pending(&row.pubkey) {
            return Activation::Ignored;
        }

        match action {
            RowAction::Stop => {
                overlays
                    .confirm
                    .open(ConfirmationRequest::stop_node(&row.pubkey));
                Activation::ConfirmationOpened
            }
            RowAction::Start => {
                overlays
                    .modal
                    .show(Modal::StartNode(StartNodeForm::new(&row.pubkey)));
                Activation::FormOpened
            }
            RowAction::OpenChannel => Activation::Navigate(ChannelOpenRoute::for_row(row)),
        }
    }

    /// Accept the open confirmation and emit its command.
    pub fn confirm(&mut self, overlays: &mut Overlays) -> Option<Effect> {
        let (request_id, action) = overlays.confirm.accept()?;
        match action {
            PendingAction::StopNode { pubkey } => {
                info!(pubkey = %pubkey, "Stopping node");
                self.pending.insert(
                    pubkey.clone(),
                    PendingCommand {
                        request_id,
                        kind: CommandKind::Stop,
                    },
                );
                Some(Effect::StopNode { request_id, pubkey })
            }
        }
    }

    pub fn dismiss(&mut self, overlays: &mut Overlays) -> bool {
        overlays.confirm.dismiss()
    }

    /// Submit the start form showing in the modal slot.
    ///
    /// Validation errors stay on the form and are returned to the caller.
    pub fn submit_start(&mut self, overlays: &mut Overlays) -> AdminResult<Option<Effect>> {
        let Some(Modal::StartNode(form)) = overlays.modal.current_mut() else {
            return Ok(None);
        };
        let submission = form.submit()?;

        self.next_start_id += 1;
        let request_id = self.next_start_id;
        info!(pubkey = %submission.pubkey, "Starting node");
        self.pending.insert(
            submission.pubkey.clone(),
            PendingCommand {
                request_id,
                kind: CommandKind::Start,
            },
        );
        Ok(Some(Effect::StartNode {
            request_id,
            pubkey: submission.pubkey,
            passphrase: submission.passphrase,
        }))
    }

    /// Close the start form unless its request is in flight.
    pub fn cancel_start(&mut self, overlays: &mut Overlays) -> bool {
        match overlays.modal.current() {
            Some(Modal::StartNode(form)) if !form.is_submitting() => {
                overlays.modal.hide();
                true
            }
            _ => false,
        }
    }

    /// Apply a finished command.
    ///
    /// Success clears the row's error, closes whatever overlay issued the
    /// command and invalidates the listing. Failure leaves the listing alone
    /// and surfaces the error on the row and in the overlay.
    pub fn on_completed(
        &mut self,
        completion: CommandCompletion,
        overlays: &mut Overlays,
        list: &mut PagedSearchList,
    ) -> Option<Effect> {
        let CommandCompletion {
            request_id,
            kind,
            pubkey,
            result,
        } = completion;

        let current = PendingCommand { request_id, kind };
        if self.pending.get(&pubkey) == Some(&current) {
            self.pending.remove(&pubkey);
        }

        match result {
            Ok(()) => {
                info!(pubkey = %pubkey, "Node {} succeeded", kind.label());
                self.row_errors.remove(&pubkey);
                match kind {
                    CommandKind::Stop => overlays.confirm.complete(request_id, Ok(())),
                    CommandKind::Start => {
                        if Self::start_form_for(overlays, &pubkey).is_some() {
                            overlays.modal.hide();
                        }
                    }
                }
                Some(Effect::FetchNodes(list.invalidate()))
            }
            Err(e) => {
                warn!(pubkey = %pubkey, "Node {} failed: {}", kind.label(), e);
                let message = e.to_string();
                self.row_errors.insert(pubkey.clone(), message.clone());
                match kind {
                    CommandKind::Stop => overlays.confirm.complete(request_id, Err(message)),
                    CommandKind::Start => {
                        if let Some(form) = Self::start_form_for(overlays, &pubkey) {
                            form.fail(message);
                        }
                    }
                }
                None
            }
        }
    }

    fn start_form_for<'a>(
        overlays: &'a mut Overlays,
        pubkey: &str,
    ) -> Option<&'a mut StartNodeForm> {
        match overlays.modal.current_mut() {
            Some(Modal::StartNode(form)) if form.pubkey == pubkey && form.is_submitting() => {
                Some(form)
            }
            _ => None,
        }
    }
}
