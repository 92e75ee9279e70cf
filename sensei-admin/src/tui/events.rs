use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use sensei_admin_core::{AdminError, AdminResult, NodePage};
use tokio::sync::mpsc;
use tracing::error;

use crate::tui::effects::CommandCompletion;
use crate::tui::state::paged_list::FetchTicket;

/// Events that drive the TUI application
///
/// Terminal input and ticks come from the input thread; listing and
/// command results come from spawned effects. All of them are applied in
/// order on the UI task.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    NodesFetched {
        ticket: FetchTicket,
        result: AdminResult<NodePage>,
    },
    CommandCompleted(CommandCompletion),
}

/// Event handler that merges terminal input, ticks and effect results
///
/// Terminal polling blocks, so it runs on a dedicated thread and forwards
/// into the same channel the effect runner writes to.
pub struct EventHandler {
    sender: mpsc::UnboundedSender<Event>,
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let input_sender = sender.clone();

        thread::spawn(move || {
            if let Err(e) = poll_terminal(input_sender, tick_rate) {
                error!("Terminal input stopped: {}", e);
            }
        });

        Self { sender, receiver }
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> AdminResult<Event> {
        self.receiver.recv().await.ok_or_else(|| AdminError::Internal {
            message: "Event channel closed".to_string(),
        })
    }

    /// Sender for events produced outside the input thread
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

fn poll_terminal(sender: mpsc::UnboundedSender<Event>, tick_rate: Duration) -> AdminResult<()> {
    let mut last_tick = Instant::now();

    loop {
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).map_err(|e| AdminError::Internal {
            message: format!("Failed to poll events: {}", e),
        })? {
            let forwarded = match event::read().map_err(|e| AdminError::Internal {
                message: format!("Failed to read event: {}", e),
            })? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    Some(Event::Key(key))
                }
                CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                _ => None,
            };
            if let Some(event) = forwarded {
                if sender.send(event).is_err() {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            if sender.send(Event::Tick).is_err() {
                return Ok(());
            }
        }
    }
}
