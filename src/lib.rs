//! Orchestration core for an interactive scripting-language playground.
//!
//! A [`Playground`] keeps one authoritative source text, mirrors it into
//! whichever [`EditorAdapter`] is mounted, and hands it to an external
//! [`Evaluator`] when the visitor presses run. The result ends up in the
//! [`OutputViewer`], and the whole thing can be rendered to HTML via
//! [`PageRenderer`].

mod buffer;
pub(crate) mod config;
mod dispatch;
pub mod editor;
mod engine;
mod example;
mod highlight;
mod output;
mod page;
mod playground;

/// The version of snippet-playground
pub const SNIPPET_PLAYGROUND_VERSION: &str = env!("CARGO_PKG_VERSION");

pub use buffer::SourceBuffer;
pub use config::{Config, EvaluatorConfig};
pub use dispatch::{Dispatcher, ExecutionResult, ENGINE_NOT_READY};
pub use editor::{create_editor, EditorAdapter, EditorKind, RunRequest};
pub use engine::{Engine, EvaluationError, Evaluator, ProcessEvaluator};
pub use example::{Example, ExampleLibrary};
pub use highlight::{ClassHighlighter, Highlighter};
pub use output::OutputViewer;
pub use page::PageRenderer;
pub use playground::{PendingRun, Playground, RunPolicy, RunTicket};

pub(crate) use anyhow::{bail, Context, Result};
