//! Start-node form

use sensei_admin_core::{AdminError, AdminResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Editing,
    Submitting,
}

/// Collects the passphrase needed to unlock and start a stopped node
///
/// The pubkey comes from the row the form was opened for and is not
/// editable.
#[derive(Debug, Clone)]
pub struct StartNodeForm {
    pub pubkey: String,
    pub passphrase: String,
    pub status: FormStatus,
    pub error: Option<String>,
}

/// A validated submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartNodeSubmission {
    pub pubkey: String,
    pub passphrase: String,
}

impl StartNodeForm {
    pub fn new(pubkey: impl Into<String>) -> Self {
        Self {
            pubkey: pubkey.into(),
            passphrase: String::new(),
            status: FormStatus::Editing,
            error: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    pub fn push_char(&mut self, c: char) {
        if !self.is_submitting() {
            self.passphrase.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.is_submitting() {
            self.passphrase.pop();
        }
    }

    pub fn masked_passphrase(&self) -> String {
        "•".repeat(self.passphrase.chars().count())
    }

    /// Validate and move to submitting.
    ///
    /// Validation failures are recorded on the form and also returned.
    pub fn submit(&mut self) -> AdminResult<StartNodeSubmission> {
        if self.is_submitting() {
            return Err(AdminError::InvalidInput {
                field: "passphrase".to_string(),
                message: "a start request is already in progress".to_string(),
            });
        }
        if self.passphrase.is_empty() {
            let message = "Passphrase is required".to_string();
            self.error = Some(message.clone());
            return Err(AdminError::InvalidInput {
                field: "passphrase".to_string(),
                message,
            });
        }

        self.status = FormStatus::Submitting;
        self.error = None;
        Ok(StartNodeSubmission {
            pubkey: self.pubkey.clone(),
            passphrase: self.passphrase.clone(),
        })
    }

    /// The start command failed; keep the form open with the error.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = FormStatus::Editing;
        self.error = Some(message.into());
    }
}
