//! Messages exchanged with the UI shell.
//!
//! Outbound [`UiMessage`]s are one-way notifications. Inbound [`UiCommand`]s
//! are consumed by [`crate::session::Session::serve`]. Both travel over
//! unbounded `tokio::sync::mpsc` channels.

use std::fmt;

use tokio::sync::mpsc;

/// Status sent from a run to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiMessage {
    /// Whether the current selection contains at least one text node
    SelectionChanged { has_text: bool },
    /// Throttled progress update
    Progress { current: usize, total: usize },
    /// Transient user-visible notice
    Notice { text: String, timeout_ms: u64 },
    /// The session is over; `message` is the final summary, if any
    Close { message: Option<String> },
}

impl fmt::Display for UiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiMessage::SelectionChanged { has_text } => {
                write!(f, "selection has text: {has_text}")
            }
            UiMessage::Progress { current, total } => write!(f, "changed: {current}/{total}"),
            UiMessage::Notice { text, .. } => f.write_str(text),
            UiMessage::Close { message } => f.write_str(message.as_deref().unwrap_or("closed")),
        }
    }
}

/// Requests sent from the UI to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Run the re-style pass over the current selection
    Start { apply_tracking: bool },
    /// The host's selection changed; recompute the gating flag
    SelectionChanged,
    /// Close without running
    Cancel,
}

pub type UiSender = mpsc::UnboundedSender<UiMessage>;
pub type UiReceiver = mpsc::UnboundedReceiver<UiMessage>;
pub type CommandSender = mpsc::UnboundedSender<UiCommand>;
pub type CommandReceiver = mpsc::UnboundedReceiver<UiCommand>;

/// Send `msg`, ignoring a UI that has already gone away.
pub(crate) fn send(sink: &UiSender, msg: UiMessage) {
    if sink.send(msg).is_err() {
        log::debug!("UI channel closed, dropping message");
    }
}
