use handlebars::html_escape;

use super::{EditorAdapter, EditorKind};
use crate::{bail, Result};

/// Multi-line code editor
///
/// The text itself is kept verbatim, formatting (tab expansion, trailing
/// whitespace) only applies to the rendered lines.
#[derive(Debug)]
pub struct CodeEditor {
	language: String,
	tab_width: usize,
	value: String,
	dirty: bool,
}

impl CodeEditor {
	pub fn new<L: Into<String>>(language: L, tab_width: usize) -> Self {
		Self {
			language: language.into(),
			tab_width,
			value: String::new(),
			dirty: false,
		}
	}

	pub fn language(&self) -> &str {
		&self.language
	}

	fn format_line(&self, line: &str) -> String {
		line.replace('\t', &" ".repeat(self.tab_width))
			.trim_end()
			.to_owned()
	}

	fn lines(&self) -> Vec<String> {
		self.value.split('\n').map(ToOwned::to_owned).collect()
	}

	fn set_lines(&mut self, lines: &[String]) {
		self.value = lines.join("\n");
		self.dirty = true;
	}

	pub fn line_count(&self) -> usize {
		self.value.split('\n').count()
	}

	/// Replace the line at `index` (zero based).
	///
	/// # Errors
	///
	/// Fails if there is no line at `index`.
	pub fn replace_line(&mut self, index: usize, text: &str) -> Result<()> {
		let mut lines = self.lines();
		let Some(line) = lines.get_mut(index) else {
			bail!("Line {index} is out of range");
		};
		text.clone_into(line);

		self.set_lines(&lines);
		Ok(())
	}

	/// Insert a line before `index`, `index == line_count()` appends.
	///
	/// # Errors
	///
	/// Fails if `index` is past the end.
	pub fn insert_line(&mut self, index: usize, text: &str) -> Result<()> {
		let mut lines = self.lines();
		if index > lines.len() {
			bail!("Line {index} is out of range");
		}
		lines.insert(index, text.to_owned());

		self.set_lines(&lines);
		Ok(())
	}

	/// Remove the line at `index`.
	///
	/// # Errors
	///
	/// Fails if there is no line at `index`.
	pub fn remove_line(&mut self, index: usize) -> Result<()> {
		let mut lines = self.lines();
		if index >= lines.len() {
			bail!("Line {index} is out of range");
		}
		lines.remove(index);

		self.set_lines(&lines);
		Ok(())
	}
}

impl EditorAdapter for CodeEditor {
	fn kind(&self) -> EditorKind {
		EditorKind::Code
	}

	fn display(&mut self, text: &str) {
		text.clone_into(&mut self.value);
		self.dirty = false;
	}

	fn edit(&mut self, text: &str) {
		text.clone_into(&mut self.value);
		self.dirty = true;
	}

	fn text(&self) -> &str {
		&self.value
	}

	fn is_dirty(&self) -> bool {
		self.dirty
	}

	fn render(&self) -> String {
		let lines: String = self
			.value
			.split('\n')
			.enumerate()
			.map(|(index, line)| {
				format!(
					"<span class=\"line\" data-line=\"{}\">{}</span>\n",
					index + 1,
					html_escape(line)
				)
			})
			.collect();

		format!(
			r#"<div class="editor editor-code" data-language="{}"><pre><code>{lines}</code></pre></div>"#,
			html_escape(&self.language)
		)
	}
}

#[cfg(test)]
mod test {
	use anyhow::Result;

	use super::CodeEditor;
	use crate::EditorAdapter;

	#[test]
	fn formats_rendered_lines_only() {
		let source = "fn(n) {  \n\treturn n;\n}\n";
		let mut editor = CodeEditor::new("rust", 2);
		editor.display(source);

		assert_eq!(editor.text(), source);
		assert_eq!(editor.line_count(), 4);

		let rendered = editor.render();
		assert!(rendered.contains("<span class=\"line\" data-line=\"1\">fn(n) {</span>"));
		assert!(rendered.contains("<span class=\"line\" data-line=\"2\">  return n;</span>"));
	}

	#[test]
	fn string_literals_run_unchanged() {
		let mut editor = CodeEditor::new("rust", 4);
		editor.display("print(\"a\tb  \n\")");

		assert_eq!(editor.run_request().text(), "print(\"a\tb  \n\")");

		editor.edit("print(\"\t\")   ");
		assert_eq!(editor.text(), "print(\"\t\")   ");
	}

	#[test]
	fn line_edits() -> Result<()> {
		let mut editor = CodeEditor::new("rust", 4);
		editor.display("let a = 1;\na");

		editor.replace_line(1, "a + 1")?;
		editor.insert_line(0, "// sum")?;
		editor.insert_line(3, "\t")?;
		editor.remove_line(3)?;

		assert_eq!(editor.text(), "// sum\nlet a = 1;\na + 1");
		assert!(editor.is_dirty());

		assert!(editor.replace_line(10, "x").is_err());
		assert!(editor.insert_line(10, "x").is_err());
		assert!(editor.remove_line(3).is_err());

		Ok(())
	}

	#[test]
	fn renders_numbered_lines() {
		let mut editor = CodeEditor::new("rust", 4);
		editor.display("a\n<b>");

		assert_eq!(
			editor.render(),
			"<div class=\"editor editor-code\" data-language=\"rust\"><pre><code><span class=\"line\" data-line=\"1\">a</span>\n<span class=\"line\" data-line=\"2\">&lt;b&gt;</span>\n</code></pre></div>"
		);
	}
}
