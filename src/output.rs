use handlebars::html_escape;

use crate::ExecutionResult;

/// Shows the latest [`ExecutionResult`] as preformatted text
#[derive(Debug, Default)]
pub struct OutputViewer {
	placeholder: String,
	result: Option<ExecutionResult>,
}

impl OutputViewer {
	pub fn new<P: Into<String>>(placeholder: P) -> Self {
		Self {
			placeholder: placeholder.into(),
			result: None,
		}
	}

	/// Replace whatever was shown before
	pub fn show(&mut self, result: ExecutionResult) {
		self.result = Some(result);
	}

	pub fn result(&self) -> Option<&ExecutionResult> {
		self.result.as_ref()
	}

	/// The text as displayed, without any markup
	pub fn text(&self) -> &str {
		match &self.result {
			Some(result) => result.text(),
			None => &self.placeholder,
		}
	}

	pub fn render(&self) -> String {
		let class = match &self.result {
			Some(ExecutionResult::Success { .. }) => "output output-success",
			Some(ExecutionResult::Failure { .. }) => "output output-failure",
			None => "output output-empty",
		};

		format!(r#"<pre class="{class}">{}</pre>"#, html_escape(self.text()))
	}
}

#[cfg(test)]
mod test {
	use super::OutputViewer;
	use crate::ExecutionResult;

	#[test]
	fn placeholder_before_first_run() {
		let viewer = OutputViewer::new("Press run");

		assert_eq!(viewer.result(), None);
		assert_eq!(viewer.text(), "Press run");
		assert_eq!(viewer.render(), r#"<pre class="output output-empty">Press run</pre>"#);
	}

	#[test]
	fn output_is_not_interpreted() {
		let mut viewer = OutputViewer::default();
		viewer.show(ExecutionResult::success("<b>bold</b>\n"));

		assert_eq!(viewer.text(), "<b>bold</b>\n");
		assert_eq!(
			viewer.render(),
			"<pre class=\"output output-success\">&lt;b&gt;bold&lt;/b&gt;\n</pre>"
		);
	}

	#[test]
	fn failures_are_distinguished() {
		let mut viewer = OutputViewer::default();
		viewer.show(ExecutionResult::failure("unexpected end of input"));

		assert_eq!(
			viewer.render(),
			r#"<pre class="output output-failure">unexpected end of input</pre>"#
		);
	}
}
