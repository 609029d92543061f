//! UI-facing session: selection gating, start command, close.
//!
//! A session announces whether the selection contains text, answers
//! selection-change notifications, and performs exactly one run when asked
//! to start. The run is a one-shot batch job, so the session always closes
//! afterwards: with the summary on success, or after an error notice.

use retrack_config::Config;
use retrack_fonts::FontLoader;

use crate::error::RestyleError;
use crate::messages::{self, CommandReceiver, UiCommand, UiMessage, UiSender};
use crate::run::{Restyler, RunCounters, RunOptions, RunSummary};
use crate::scene::Document;
use crate::walker::selection_has_text;

/// Notice shown when there is nothing to re-style.
pub const NO_SELECTION_NOTICE: &str = "Please select one or more layers";

pub struct Session<'a, D: Document, L: FontLoader> {
    doc: &'a mut D,
    loader: &'a L,
    options: RunOptions,
    notice_timeout_ms: u64,
    sink: UiSender,
    last_counters: RunCounters,
}

impl<'a, D: Document, L: FontLoader> Session<'a, D, L> {
    pub fn new(doc: &'a mut D, loader: &'a L, config: &Config, sink: UiSender) -> Self {
        Self {
            doc,
            loader,
            options: RunOptions::from_config(config),
            notice_timeout_ms: config.notice_timeout_ms,
            sink,
            last_counters: RunCounters::default(),
        }
    }

    /// Permissive check used for enabling the start control.
    pub fn selection_has_text(&self) -> bool {
        let roots = self.doc.selection();
        selection_has_text(&*self.doc, &roots)
    }

    pub fn announce_selection(&self) {
        let has_text = self.selection_has_text();
        log::debug!("Selection has text: {}", has_text);
        messages::send(&self.sink, UiMessage::SelectionChanged { has_text });
    }

    /// Counters of the last run started by this session.
    pub fn last_counters(&self) -> RunCounters {
        self.last_counters
    }

    fn notice(&self, text: impl Into<String>) {
        messages::send(
            &self.sink,
            UiMessage::Notice {
                text: text.into(),
                timeout_ms: self.notice_timeout_ms,
            },
        );
    }

    fn close(&self, message: Option<String>) {
        messages::send(&self.sink, UiMessage::Close { message });
    }

    /// Run once and close the session.
    pub async fn start(&mut self, apply_tracking: bool) -> Result<RunSummary, RestyleError> {
        let options = self.options.with_apply_tracking(apply_tracking);
        let mut restyler = Restyler::new(self.loader, options, self.sink.clone());
        let result = restyler.run(&mut *self.doc).await;
        self.last_counters = restyler.counters();

        match &result {
            Ok(summary) => self.close(Some(summary.to_string())),
            Err(RestyleError::NoSelection) => {
                self.notice(NO_SELECTION_NOTICE);
                self.close(None);
            }
            Err(e) => {
                self.notice(format!("Error: {e}"));
                self.close(None);
            }
        }
        result
    }

    /// Serve UI commands until the session closes.
    ///
    /// Returns the run result, or `None` if the session was cancelled or the
    /// command channel closed before a start command arrived.
    pub async fn serve(
        &mut self,
        mut commands: CommandReceiver,
    ) -> Option<Result<RunSummary, RestyleError>> {
        self.announce_selection();
        while let Some(command) = commands.recv().await {
            match command {
                UiCommand::SelectionChanged => self.announce_selection(),
                UiCommand::Start { apply_tracking } => {
                    return Some(self.start(apply_tracking).await);
                }
                UiCommand::Cancel => {
                    log::info!("Session cancelled");
                    self.close(None);
                    return None;
                }
            }
        }
        log::debug!("Command channel closed");
        None
    }
}
