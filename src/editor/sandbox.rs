use handlebars::html_escape;

use super::{EditorAdapter, EditorKind};
use crate::{bail, Result};

#[derive(Debug)]
struct SandboxFile {
	path: String,
	contents: String,
}

/// Multi-file editor with tabs
///
/// The entry file receives displayed text and is what runs, whichever tab is
/// active. Other files are scratch space and are dropped when new text is
/// displayed.
#[derive(Debug)]
pub struct SandboxEditor {
	files: Vec<SandboxFile>,
	active: usize,
	dirty: bool,
}

impl SandboxEditor {
	pub fn new<P: Into<String>>(entry: P) -> Self {
		Self {
			files: vec![SandboxFile {
				path: entry.into(),
				contents: String::new(),
			}],
			active: 0,
			dirty: false,
		}
	}

	fn entry(&self) -> &SandboxFile {
		&self.files[0]
	}

	fn position(&self, path: &str) -> Option<usize> {
		self.files.iter().position(|file| file.path == path)
	}

	pub fn entry_path(&self) -> &str {
		&self.entry().path
	}

	pub fn active_path(&self) -> &str {
		&self.files[self.active].path
	}

	pub fn tabs(&self) -> impl Iterator<Item = &str> {
		self.files.iter().map(|file| file.path.as_str())
	}

	/// Open a new tab holding `contents` and activate it.
	///
	/// # Errors
	///
	/// Fails if a tab with the same path is already open.
	pub fn open_file<P: Into<String>, C: Into<String>>(&mut self, path: P, contents: C) -> Result<()> {
		let path = path.into();
		if self.position(&path).is_some() {
			bail!("File {path} is already open");
		}

		self.files.push(SandboxFile {
			path,
			contents: contents.into(),
		});
		self.active = self.files.len() - 1;
		self.dirty = true;

		Ok(())
	}

	/// Activate the tab for `path`.
	///
	/// # Errors
	///
	/// Fails if no such tab is open.
	pub fn select_tab(&mut self, path: &str) -> Result<()> {
		let Some(index) = self.position(path) else {
			bail!("No open file {path}");
		};
		self.active = index;

		Ok(())
	}

	/// Close the tab for `path`, the entry file can't be closed.
	///
	/// # Errors
	///
	/// Fails if no such tab is open or if `path` is the entry file.
	pub fn close_tab(&mut self, path: &str) -> Result<()> {
		let Some(index) = self.position(path) else {
			bail!("No open file {path}");
		};
		if index == 0 {
			bail!("The entry file {path} can't be closed");
		}

		self.files.remove(index);
		if self.active >= index {
			self.active -= 1;
		}

		Ok(())
	}

	/// Replace the contents of the active tab.
	pub fn edit_active(&mut self, contents: &str) {
		contents.clone_into(&mut self.files[self.active].contents);
		self.dirty = true;
	}
}

impl EditorAdapter for SandboxEditor {
	fn kind(&self) -> EditorKind {
		EditorKind::Sandbox
	}

	fn display(&mut self, text: &str) {
		self.files.truncate(1);
		text.clone_into(&mut self.files[0].contents);
		self.active = 0;
		self.dirty = false;
	}

	fn edit(&mut self, text: &str) {
		text.clone_into(&mut self.files[0].contents);
		self.dirty = true;
	}

	fn text(&self) -> &str {
		&self.entry().contents
	}

	fn is_dirty(&self) -> bool {
		self.dirty
	}

	fn render(&self) -> String {
		let tabs: String = self
			.files
			.iter()
			.enumerate()
			.map(|(index, file)| {
				let class = if index == self.active { "tab active" } else { "tab" };
				format!(
					"<li class=\"{class}\" data-path=\"{0}\">{0}</li>",
					html_escape(&file.path)
				)
			})
			.collect();

		format!(
			r#"<div class="editor editor-sandbox"><ul class="tabs">{tabs}</ul><textarea spellcheck="false">{}</textarea></div>"#,
			html_escape(&self.files[self.active].contents)
		)
	}
}

#[cfg(test)]
mod test {
	use anyhow::Result;

	use super::SandboxEditor;
	use crate::EditorAdapter;

	#[test]
	fn entry_file_runs_regardless_of_active_tab() -> Result<()> {
		let mut editor = SandboxEditor::new("main.lp");
		editor.display("sum(5,2)");

		editor.open_file("notes.lp", "scratch")?;
		assert_eq!(editor.active_path(), "notes.lp");
		editor.edit_active("more scratch");

		assert_eq!(editor.text(), "sum(5,2)");

		editor.select_tab("main.lp")?;
		editor.edit_active("sum(1,1)");
		assert_eq!(editor.run_request().text(), "sum(1,1)");

		Ok(())
	}

	#[test]
	fn tab_management() -> Result<()> {
		let mut editor = SandboxEditor::new("main.lp");
		editor.open_file("a.lp", "")?;
		editor.open_file("b.lp", "")?;

		assert!(editor.open_file("a.lp", "").is_err());
		assert!(editor.select_tab("c.lp").is_err());
		assert!(editor.close_tab("main.lp").is_err());

		editor.close_tab("a.lp")?;
		assert_eq!(editor.active_path(), "b.lp");
		assert_eq!(editor.tabs().collect::<Vec<_>>(), vec!["main.lp", "b.lp"]);

		Ok(())
	}

	#[test]
	fn display_drops_scratch_files() -> Result<()> {
		let mut editor = SandboxEditor::new("main.lp");
		editor.open_file("a.lp", "x")?;
		editor.display("fibonacci(10)");

		assert_eq!(editor.tabs().count(), 1);
		assert_eq!(editor.active_path(), editor.entry_path());
		assert!(!editor.is_dirty());
		assert!(editor.render().contains("<li class=\"tab active\" data-path=\"main.lp\">main.lp</li>"));

		Ok(())
	}
}
