use std::sync::Arc;

use serde::Deserialize;

use crate::{
	bail, create_editor, Config, Dispatcher, EditorAdapter, Engine, Evaluator, ExampleLibrary,
	ExecutionResult, OutputViewer, Result, SourceBuffer, ENGINE_NOT_READY,
};

/// What happens when run is pressed while a previous run hasn't finished
#[derive(Deserialize, PartialEq, Eq, Debug, Default, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum RunPolicy {
	/// Start the new run, the pending one's result is dropped when it arrives
	#[default]
	Supersede,
	/// Ignore the new run until the pending one completes
	IgnoreWhileRunning,
}

/// Identifies a started run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTicket(u64);

/// A run that has been started but whose result isn't known yet
#[derive(Debug)]
pub struct PendingRun {
	ticket: RunTicket,
	source: String,
}

impl PendingRun {
	pub fn ticket(&self) -> RunTicket {
		self.ticket
	}

	/// Snapshot of the source text taken when the run started
	pub fn source(&self) -> &str {
		&self.source
	}
}

/// Ties the example library, source buffer, editor, evaluator and output
/// together
///
/// There is one authoritative source text, the [`SourceBuffer`]. The mounted
/// editor mirrors it and keeps edits local until its run trigger fires.
pub struct Playground {
	library: Arc<ExampleLibrary>,
	buffer: SourceBuffer,
	editor: Option<Box<dyn EditorAdapter>>,
	dispatcher: Dispatcher,
	output: OutputViewer,

	policy: RunPolicy,
	next_ticket: u64,
	pending: Option<RunTicket>,
	selected: Option<usize>,
}

impl Playground {
	/// Create a playground showing the first example, without an editor
	pub fn new(library: Arc<ExampleLibrary>, engine: Engine) -> Self {
		let (buffer, selected) = match library.get(0) {
			Some(example) => (SourceBuffer::new(example.source_text()), Some(0)),
			None => (SourceBuffer::default(), None),
		};

		Self {
			library,
			buffer,
			editor: None,
			dispatcher: Dispatcher::new(engine),
			output: OutputViewer::default(),

			policy: RunPolicy::default(),
			next_ticket: 0,
			pending: None,
			selected,
		}
	}

	/// Create a playground as described by `config`, with its editor mounted
	pub fn from_config(config: &Config, library: Arc<ExampleLibrary>, engine: Engine) -> Self {
		let mut playground = Self::new(library, engine);
		playground.policy = config.run_policy;
		playground.output = OutputViewer::new(config.placeholder.clone());

		let editor = create_editor(config.editor, config, playground.buffer.text());
		playground.mount(editor);

		playground
	}

	#[must_use]
	pub fn with_policy(mut self, policy: RunPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn library(&self) -> &ExampleLibrary {
		&self.library
	}

	pub fn buffer(&self) -> &SourceBuffer {
		&self.buffer
	}

	pub fn output(&self) -> &OutputViewer {
		&self.output
	}

	/// The result of the latest applied run
	pub fn result(&self) -> Option<&ExecutionResult> {
		self.output.result()
	}

	/// Index of the example last loaded into the buffer, if any
	pub fn selected_example(&self) -> Option<usize> {
		self.selected
	}

	pub fn editor(&self) -> Option<&dyn EditorAdapter> {
		self.editor.as_deref()
	}

	pub fn editor_mut(&mut self) -> Option<&mut Box<dyn EditorAdapter>> {
		self.editor.as_mut()
	}

	/// Mount `editor`, returning the previously mounted one.
	///
	/// Unrun edits in the previous editor are kept in the buffer, and the new
	/// editor starts out showing the buffer.
	pub fn mount(&mut self, mut editor: Box<dyn EditorAdapter>) -> Option<Box<dyn EditorAdapter>> {
		let previous = self.unmount();

		log::debug!("Mounting {:?} editor", editor.kind());
		editor.display(self.buffer.text());
		self.editor = Some(editor);

		previous
	}

	/// Unmount the current editor, keeping its unrun edits in the buffer.
	pub fn unmount(&mut self) -> Option<Box<dyn EditorAdapter>> {
		let editor = self.editor.take()?;

		if editor.is_dirty() {
			log::debug!("Keeping edits of unmounted {:?} editor", editor.kind());
			self.buffer.replace(editor.text());
			self.selected = None;
		}

		Some(editor)
	}

	/// Load the example at `index` into the buffer and the editor.
	///
	/// Edits in the editor are discarded. Nothing runs.
	///
	/// # Errors
	///
	/// Fails if `index` is out of range.
	pub fn select_example(&mut self, index: usize) -> Result<()> {
		let Some(example) = self.library.get(index) else {
			log::error!(
				"Example {index} selected but the library only has {}",
				self.library.len()
			);
			bail!("No example at index {index}");
		};

		log::debug!("Selecting example {}", example.name());
		self.buffer.replace(example.source_text());
		self.selected = Some(index);

		if let Some(editor) = &mut self.editor {
			editor.display(self.buffer.text());
		}

		Ok(())
	}

	pub fn is_runnable(&self) -> bool {
		self.dispatcher.is_ready()
	}

	/// Whether a run has started and not completed yet
	pub fn is_running(&self) -> bool {
		self.pending.is_some()
	}

	/// Finish loading the evaluator, enabling runs
	pub fn load_engine<E, F>(&mut self, init: F)
	where
		E: Evaluator + 'static,
		F: FnOnce() -> Result<E>,
	{
		self.dispatcher.engine_mut().load(init);
	}

	/// Start a run of `candidate`, the text the editor currently holds.
	///
	/// Returns `None` if nothing was started: either the evaluator isn't ready
	/// (a failure result is shown and the buffer is left alone) or a run is
	/// pending and the policy ignores new runs.
	pub fn begin_run<T: Into<String>>(&mut self, candidate: T) -> Option<PendingRun> {
		if !self.dispatcher.is_ready() {
			log::debug!("Run requested before the evaluator is ready");
			self.output.show(ExecutionResult::failure(ENGINE_NOT_READY));
			return None;
		}

		if let Some(pending) = self.pending {
			match self.policy {
				RunPolicy::IgnoreWhileRunning => {
					log::debug!("Ignoring run, {pending:?} is still pending");
					return None;
				}
				RunPolicy::Supersede => log::debug!("Superseding {pending:?}"),
			}
		}

		let source = candidate.into();
		self.buffer.replace(source.as_str());

		let ticket = RunTicket(self.next_ticket);
		self.next_ticket += 1;
		self.pending = Some(ticket);

		log::debug!("Starting {ticket:?}");

		Some(PendingRun { ticket, source })
	}

	/// Evaluate a pending run, this is the part that may happen elsewhere.
	pub fn execute(&self, run: &PendingRun) -> ExecutionResult {
		self.dispatcher.execute(run.source())
	}

	/// Apply the result of the run identified by `ticket`.
	///
	/// Results of superseded runs are dropped, returns whether the result was
	/// applied.
	pub fn complete_run(&mut self, ticket: RunTicket, result: ExecutionResult) -> bool {
		if self.pending != Some(ticket) {
			log::warn!("Dropping result of stale {ticket:?}");
			return false;
		}

		log::debug!("Finished {ticket:?}, success: {}", result.is_success());
		self.pending = None;
		self.output.show(result);

		true
	}

	/// Run `candidate` to completion.
	///
	/// Returns the result now shown, which is a fresh success or failure unless
	/// the run was ignored because another one is pending.
	pub fn run<T: Into<String>>(&mut self, candidate: T) -> Option<&ExecutionResult> {
		if let Some(run) = self.begin_run(candidate) {
			let result = self.execute(&run);
			self.complete_run(run.ticket(), result);
		}

		self.output.result()
	}

	/// Fire the mounted editor's run trigger.
	///
	/// # Errors
	///
	/// Fails if no editor is mounted.
	pub fn run_from_editor(&mut self) -> Result<Option<&ExecutionResult>> {
		let Some(editor) = &self.editor else {
			log::error!("Run triggered without a mounted editor");
			bail!("No editor is mounted");
		};

		let request = editor.run_request();
		Ok(self.run(request.into_text()))
	}
}
