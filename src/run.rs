//! Orchestration of one re-styling run.
//!
//! A run moves through `Idle → Scanning → Prewarming → Rewriting → Complete`
//! (or `Failed`). There are no retries and no cancellation once scanning
//! starts. All state lives in run-scoped values passed explicitly, so two
//! runs never share counters or cache entries.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use retrack_config::{Config, PrewarmScope};
use retrack_fonts::{FontCache, FontDescriptor, FontLoader};

use crate::error::RestyleError;
use crate::messages::UiSender;
use crate::progress::ProgressReporter;
use crate::rewriter::Rewriter;
use crate::scene::{CharRange, Document};
use crate::walker::{TreeWalker, WalkOptions, selection_has_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Scanning,
    Prewarming,
    Rewriting,
    Complete,
    Failed,
}

/// Counters for a single run; reset when a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunCounters {
    pub total_layers: usize,
    pub processed_layers: usize,
    pub changed_characters: usize,
    pub total_characters: usize,
}

/// Mutable state threaded through traversal and rewriting.
#[derive(Debug)]
pub struct RunContext {
    pub counters: RunCounters,
    pub reporter: ProgressReporter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub apply_tracking: bool,
    pub walk: WalkOptions,
    pub prewarm_scope: PrewarmScope,
    pub progress_interval: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            apply_tracking: config.apply_tracking,
            walk: WalkOptions {
                exclude_instance_children: config.exclude_instance_children,
            },
            prewarm_scope: config.prewarm_scope,
            progress_interval: config.progress_interval(),
        }
    }

    pub fn with_apply_tracking(mut self, apply: bool) -> Self {
        self.apply_tracking = apply;
        self
    }
}

/// What a successful run changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub layers_changed: usize,
    pub characters_changed: usize,
    pub total_characters: usize,
}

impl From<RunCounters> for RunSummary {
    fn from(counters: RunCounters) -> Self {
        Self {
            layers_changed: counters.processed_layers,
            characters_changed: counters.changed_characters,
            total_characters: counters.total_characters,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Number of layers changed: {}, characters changed: {}",
            self.layers_changed, self.characters_changed
        )
    }
}

/// Runs the scan / prewarm / rewrite pipeline against a document.
pub struct Restyler<'l, L: FontLoader> {
    loader: &'l L,
    options: RunOptions,
    sink: UiSender,
    state: RunState,
    counters: RunCounters,
    prewarm_loads: usize,
}

impl<'l, L: FontLoader> Restyler<'l, L> {
    pub fn new(loader: &'l L, options: RunOptions, sink: UiSender) -> Self {
        Self {
            loader,
            options,
            sink,
            state: RunState::Idle,
            counters: RunCounters::default(),
            prewarm_loads: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Counters of the most recent run, including a failed one.
    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    /// Loads issued by the most recent prewarm.
    pub fn prewarm_loads(&self) -> usize {
        self.prewarm_loads
    }

    fn transition(&mut self, next: RunState) {
        log::info!("Run state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Re-style every eligible text node under the document's selection.
    ///
    /// An empty or text-free selection fails with
    /// [`RestyleError::NoSelection`] before any font is loaded, leaving the
    /// run `Idle`.
    pub async fn run<D: Document>(&mut self, doc: &mut D) -> Result<RunSummary, RestyleError> {
        self.state = RunState::Idle;
        self.counters = RunCounters::default();
        self.prewarm_loads = 0;

        let roots = doc.selection();
        if roots.is_empty() || !selection_has_text(&*doc, &roots) {
            log::warn!("No eligible selection ({} nodes selected)", roots.len());
            return Err(RestyleError::NoSelection);
        }

        let mut ctx = RunContext {
            counters: RunCounters::default(),
            reporter: ProgressReporter::new(self.sink.clone(), self.options.progress_interval),
        };
        let result = self.run_pipeline(doc, &roots, &mut ctx).await;
        self.counters = ctx.counters;

        match result {
            Ok(()) => {
                self.transition(RunState::Complete);
                let summary = RunSummary::from(self.counters);
                log::info!("{}", summary);
                Ok(summary)
            }
            Err(e) => {
                self.transition(RunState::Failed);
                log::error!(
                    "Run failed after {} of {} characters: {}",
                    self.counters.changed_characters,
                    self.counters.total_characters,
                    e
                );
                Err(e)
            }
        }
    }

    async fn run_pipeline<D: Document>(
        &mut self,
        doc: &mut D,
        roots: &[D::NodeId],
        ctx: &mut RunContext,
    ) -> Result<(), RestyleError> {
        let walker = TreeWalker::new(self.options.walk);

        self.transition(RunState::Scanning);
        let targets = walker.text_nodes(&*doc, roots);
        ctx.counters.total_characters = targets
            .iter()
            .map(|&id| doc.characters(id).chars().count())
            .sum();
        log::info!(
            "Found {} text layers with {} characters",
            targets.len(),
            ctx.counters.total_characters
        );

        self.transition(RunState::Prewarming);
        let cache = FontCache::new(self.loader);
        let scan = match self.options.prewarm_scope {
            PrewarmScope::Document => doc.text_nodes(),
            PrewarmScope::Selection => targets,
        };
        let outcome = cache.warm(fonts_in_use(&*doc, &scan)).await;
        self.prewarm_loads = outcome.requested;
        if !outcome.failed.is_empty() {
            log::warn!(
                "{} of {} fonts failed to prewarm",
                outcome.failed.len(),
                outcome.requested
            );
        }

        self.transition(RunState::Rewriting);
        let rewriter = Rewriter::new(&cache, self.options.apply_tracking);
        walker
            .traverse(doc, roots, async |doc: &mut D, id: D::NodeId| {
                rewriter.rewrite(doc, id, &mut *ctx).await
            })
            .await
    }
}

/// Distinct fonts currently applied to the characters of `nodes`.
pub fn fonts_in_use<D: Document>(doc: &D, nodes: &[D::NodeId]) -> BTreeSet<FontDescriptor> {
    let mut fonts = BTreeSet::new();
    for &id in nodes {
        let len = doc.characters(id).chars().count();
        for index in 0..len {
            if let Some(font) = doc.font_name(id, CharRange::single(index)).uniform() {
                fonts.insert(font);
            }
        }
    }
    fonts
}
