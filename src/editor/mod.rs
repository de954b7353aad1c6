//! Editor widgets the playground can mount
//!
//! The playground only ever talks to an [`EditorAdapter`]. Every widget keeps
//! its edits to itself until the run trigger asks for them, and throws them
//! away whenever the playground displays new text.

mod code_editor;
mod sandbox;
mod text_area;

pub use code_editor::CodeEditor;
pub use sandbox::SandboxEditor;
pub use text_area::TextArea;

use serde::{Deserialize, Serialize};

use crate::Config;

/// The available editor widgets
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Default, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
	/// A plain text area
	Text,
	/// A multi-line code editor with line numbers and whitespace formatting
	#[default]
	Code,
	/// A sandbox with multiple files in tabs
	Sandbox,
}

/// The latest editor text, handed to [`crate::Playground::run`] when the run
/// trigger fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
	text: String,
}

impl RunRequest {
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn into_text(self) -> String {
		self.text
	}
}

/// Capability shared by all editor widgets
pub trait EditorAdapter {
	fn kind(&self) -> EditorKind;

	/// Show `text`, discarding any local edits.
	///
	/// Used both for the initial value and for replacements when an example is
	/// selected.
	fn display(&mut self, text: &str);

	/// Replace the local text the way a user typing would.
	///
	/// The playground is not notified.
	fn edit(&mut self, text: &str);

	/// The text that would run if the run trigger fired now
	fn text(&self) -> &str;

	/// Whether the text was edited since it was last displayed
	fn is_dirty(&self) -> bool;

	/// HTML markup for the widget
	fn render(&self) -> String;

	/// Fire the run trigger
	fn run_request(&self) -> RunRequest {
		RunRequest {
			text: self.text().to_owned(),
		}
	}
}

/// Create the editor widget of the given kind, showing `text`.
pub fn create_editor(kind: EditorKind, config: &Config, text: &str) -> Box<dyn EditorAdapter> {
	let mut editor: Box<dyn EditorAdapter> = match kind {
		EditorKind::Text => Box::new(TextArea::new()),
		EditorKind::Code => Box::new(CodeEditor::new(&config.language, config.tab_width)),
		EditorKind::Sandbox => Box::new(SandboxEditor::new(format!("main.{}", config.extension))),
	};

	editor.display(text);
	editor
}

#[cfg(test)]
mod test {
	use super::{create_editor, EditorKind};
	use crate::Config;

	#[test]
	fn every_kind_honours_the_contract() {
		let config = Config::default();

		for kind in [EditorKind::Text, EditorKind::Code, EditorKind::Sandbox] {
			let mut editor = create_editor(kind, &config, "sum(5,2)");
			assert_eq!(editor.kind(), kind);
			assert_eq!(editor.text(), "sum(5,2)");
			assert!(!editor.is_dirty());

			editor.edit("sum(1,1)");
			assert!(editor.is_dirty());
			assert_eq!(editor.run_request().text(), "sum(1,1)");

			editor.display("fibonacci(10)");
			assert!(!editor.is_dirty());
			assert_eq!(editor.run_request().into_text(), "fibonacci(10)");
		}
	}
}
