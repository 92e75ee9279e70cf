//! Copy-to-clipboard with a transient confirmation

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use crossterm::{execute, Command};
use sensei_admin_core::{AdminError, AdminResult};
use tracing::{debug, warn};

/// How long a row shows the copied confirmation
pub const COPIED_WINDOW: Duration = Duration::from_millis(1000);
pub const COPIED_LABEL: &str = "Copied!";

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> AdminResult<()>;
}

/// OSC 52 "set clipboard selection" escape
///
/// The terminal emulator owns the host clipboard, so this also works over
/// SSH. Terminals without OSC 52 support ignore the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetClipboard(pub String);

impl Command for SetClipboard {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b]52;c;{}\x07", STANDARD.encode(&self.0))
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "OSC 52 requires an ANSI terminal",
        ))
    }
}

/// Writes to the host clipboard through the terminal
#[derive(Debug, Default)]
pub struct TerminalClipboard;

impl Clipboard for TerminalClipboard {
    fn set_text(&mut self, text: &str) -> AdminResult<()> {
        execute!(io::stdout(), SetClipboard(text.to_string()))
            .map_err(|e| AdminError::clipboard(e.to_string()))
    }
}

/// In-process clipboard used by the CLI demo mode and tests
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    pub unavailable: bool,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> AdminResult<()> {
        if self.unavailable {
            return Err(AdminError::clipboard("no clipboard available"));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyState {
    #[default]
    Idle,
    Copied {
        until: Instant,
    },
}

/// Per-row copy state
///
/// Time is passed in rather than read, so the window can be driven from
/// the UI tick and from tests alike.
#[derive(Debug, Clone, Default)]
pub struct ClipboardFeedback {
    state: CopyState,
}

impl ClipboardFeedback {
    pub fn state(&self) -> CopyState {
        self.state
    }

    /// Copy `text` and open the confirmation window, restarting it if one
    /// is already showing. On failure the state is left untouched.
    pub fn trigger(
        &mut self,
        clipboard: &mut dyn Clipboard,
        text: &str,
        now: Instant,
    ) -> AdminResult<()> {
        clipboard.set_text(text)?;
        self.state = CopyState::Copied {
            until: now + COPIED_WINDOW,
        };
        Ok(())
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        matches!(self.state, CopyState::Copied { until } if now < until)
    }

    /// Return to idle once the window has passed. Returns whether the state
    /// changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.state {
            CopyState::Copied { until } if now >= until => {
                self.state = CopyState::Idle;
                true
            }
            _ => false,
        }
    }
}

/// Copy feedback for every row, keyed by pubkey
#[derive(Debug, Default)]
pub struct ClipboardBoard {
    rows: HashMap<String, ClipboardFeedback>,
}

impl ClipboardBoard {
    pub fn copy(
        &mut self,
        clipboard: &mut dyn Clipboard,
        pubkey: &str,
        text: &str,
        now: Instant,
    ) -> AdminResult<()> {
        let feedback = self.rows.entry(pubkey.to_string()).or_default();
        match feedback.trigger(clipboard, text, now) {
            Ok(()) => {
                debug!(pubkey, "Copied connection string");
                Ok(())
            }
            Err(e) => {
                warn!("Copy failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn is_copied(&self, pubkey: &str, now: Instant) -> bool {
        self.rows
            .get(pubkey)
            .map(|f| f.is_copied(now))
            .unwrap_or(false)
    }

    /// Expire every finished window; idle rows are forgotten.
    pub fn expire_all(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for feedback in self.rows.values_mut() {
            changed |= feedback.expire(now);
        }
        self.rows.retain(|_, f| f.state() != CopyState::Idle);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clipboard_writes_osc52() {
        let mut out = String::new();
        SetClipboard("02aa@127.0.0.1:9735".to_string())
            .write_ansi(&mut out)
            .unwrap();

        assert_eq!(out, "\x1b]52;c;MDJhYUAxMjcuMC4wLjE6OTczNQ==\x07");
    }

    #[test]
    fn test_copy_shows_label_for_one_second() {
        let mut clipboard = MemoryClipboard::default();
        let mut feedback = ClipboardFeedback::default();
        let t0 = Instant::now();

        feedback.trigger(&mut clipboard, "02aa@127.0.0.1:9735", t0).unwrap();

        assert_eq!(clipboard.contents.as_deref(), Some("02aa@127.0.0.1:9735"));
        assert!(feedback.is_copied(t0 + Duration::from_millis(999)));
        assert!(!feedback.expire(t0 + Duration::from_millis(999)));
        assert!(feedback.expire(t0 + Duration::from_millis(1000)));
        assert_eq!(feedback.state(), CopyState::Idle);
    }

    #[test]
    fn test_retrigger_restarts_window() {
        let mut clipboard = MemoryClipboard::default();
        let mut feedback = ClipboardFeedback::default();
        let t0 = Instant::now();

        feedback.trigger(&mut clipboard, "x", t0).unwrap();
        feedback
            .trigger(&mut clipboard, "x", t0 + Duration::from_millis(600))
            .unwrap();

        assert!(!feedback.expire(t0 + Duration::from_millis(1000)));
        assert!(feedback.is_copied(t0 + Duration::from_millis(1599)));
        assert!(feedback.expire(t0 + Duration::from_millis(1600)));
    }

    #[test]
    fn test_unavailable_clipboard_stays_idle() {
        let mut clipboard = MemoryClipboard {
            unavailable: true,
            ..Default::default()
        };
        let mut board = ClipboardBoard::default();
        let now = Instant::now();

        let err = board.copy(&mut clipboard, "02aa", "02aa@h:1", now).unwrap_err();

        assert!(matches!(err, AdminError::Clipboard { .. }));
        assert!(!board.is_copied("02aa", now));
    }

    #[test]
    fn test_board_tracks_rows_independently() {
        let mut clipboard = MemoryClipboard::default();
        let mut board = ClipboardBoard::default();
        let t0 = Instant::now();

        board.copy(&mut clipboard, "a", "a@h:1", t0).unwrap();
        board
            .copy(&mut clipboard, "b", "b@h:2", t0 + Duration::from_millis(500))
            .unwrap();

        let t1 = t0 + Duration::from_millis(1200);
        assert!(board.expire_all(t1));
        assert!(!board.is_copied("a", t1));
        assert!(board.is_copied("b", t1));
    }
}
