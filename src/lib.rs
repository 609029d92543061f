// Library exports for testing and potential library use
//
// # Execution model
//
// A run is a single-threaded cooperative batch job. Host calls (font loads,
// text mutations) are awaited one at a time on a current-thread runtime;
// the only concurrency is the fan-out of font loads during prewarm, which
// is driven by `join_all` on the same task. No value crosses a thread, so
// run state is held in plain owned structs passed by `&mut`.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod app;
pub mod cli;
pub mod error;
pub mod messages;
pub mod progress;
pub mod rewriter;
pub mod run;
pub mod scene;
pub mod session;
pub mod walker;

pub use error::RestyleError;
pub use messages::{UiCommand, UiMessage};
pub use progress::ProgressReporter;
pub use rewriter::{CharacterPlan, Rewriter, plan_character};
pub use run::{Restyler, RunCounters, RunOptions, RunState, RunSummary};
pub use scene::{CharRange, Document, LetterSpacing, MemoryDocument, NodeKind, RangeValue};
pub use session::Session;
pub use walker::{TreeWalker, WalkOptions};
