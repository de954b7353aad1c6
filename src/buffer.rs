/// The text currently being edited, independent of the editor widget
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
	text: String,
}

impl SourceBuffer {
	pub fn new<T: Into<String>>(text: T) -> Self {
		Self { text: text.into() }
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	/// Replace the entire text, there is no partial update.
	pub fn replace<T: Into<String>>(&mut self, text: T) {
		self.text = text.into();
	}
}
