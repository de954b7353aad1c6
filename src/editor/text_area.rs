use handlebars::html_escape;

use super::{EditorAdapter, EditorKind};

/// Plain text input
#[derive(Debug, Default)]
pub struct TextArea {
	value: String,
	dirty: bool,
}

impl TextArea {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append typed text at the end
	pub fn type_text(&mut self, text: &str) {
		self.value.push_str(text);
		self.dirty = true;
	}
}

impl EditorAdapter for TextArea {
	fn kind(&self) -> EditorKind {
		EditorKind::Text
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
		format!(
			r#"<textarea class="editor editor-text" spellcheck="false">{}</textarea>"#,
			html_escape(&self.value)
		)
	}
}

#[cfg(test)]
mod test {
	use super::TextArea;
	use crate::EditorAdapter;

	#[test]
	fn typing_appends() {
		let mut editor = TextArea::new();
		editor.display("1 +");
		editor.type_text(" 2");

		assert_eq!(editor.text(), "1 + 2");
		assert!(editor.is_dirty());
	}

	#[test]
	fn renders_escaped() {
		let mut editor = TextArea::new();
		editor.display("</textarea>");

		assert_eq!(
			editor.render(),
			r#"<textarea class="editor editor-text" spellcheck="false">&lt;/textarea&gt;</textarea>"#
		);
	}
}
