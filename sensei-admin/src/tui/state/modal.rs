//! Single-slot host for modal content

/// Holds at most one modal at a time
///
/// Showing new content replaces the old; nothing closes the modal except an
/// explicit [`ModalHost::hide`].
#[derive(Debug)]
pub struct ModalHost<M> {
    content: Option<M>,
}

impl<M> Default for ModalHost<M> {
    fn default() -> Self {
        Self { content: None }
    }
}

impl<M> ModalHost<M> {
    /// Show `content`, returning whatever it replaced.
    pub fn show(&mut self, content: M) -> Option<M> {
        self.content.replace(content)
    }

    pub fn hide(&mut self) -> Option<M> {
        self.content.take()
    }

    pub fn is_showing(&self) -> bool {
        self.content.is_some()
    }

    pub fn current(&self) -> Option<&M> {
        self.content.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut M> {
        self.content.as_mut()
    }
}
