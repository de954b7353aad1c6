use std::{collections::HashSet, fs};

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::{
	bail,
	highlight::{raw_markup, ClassHighlighter, Highlighter},
	Config, Context, Result,
};

/// A named snippet shown in the example gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
	name: String,
	source_text: String,
	rendered_markup: Option<String>,
}

impl Example {
	fn new(name: String, source_text: String) -> Self {
		Self {
			name,
			source_text,
			rendered_markup: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn source_text(&self) -> &str {
		&self.source_text
	}

	/// Highlighted markup, if highlighting ran and succeeded
	pub fn rendered_markup(&self) -> Option<&str> {
		self.rendered_markup.as_deref()
	}

	/// Markup to display, the raw source if it wasn't highlighted
	pub fn display_markup(&self) -> String {
		match &self.rendered_markup {
			Some(markup) => markup.clone(),
			None => raw_markup(&self.source_text),
		}
	}
}

/// Ordered, read-only catalog of [`Example`]s
///
/// The order is the display order. Once built the library never changes, the
/// only enrichment is [`ExampleLibrary::highlight`] which consumes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleLibrary {
	examples: Vec<Example>,
}

impl ExampleLibrary {
	/// Build a library from `(name, source)` pairs.
	///
	/// # Errors
	///
	/// Fails if a name is empty or used more than once.
	pub fn new<I, N, S>(entries: I) -> Result<Self>
	where
		I: IntoIterator<Item = (N, S)>,
		N: Into<String>,
		S: Into<String>,
	{
		let mut seen = HashSet::new();
		let mut examples = Vec::new();

		for (name, source_text) in entries {
			let name: String = name.into();

			if name.trim().is_empty() {
				bail!("Example #{} has an empty name", examples.len());
			}

			if !seen.insert(name.clone()) {
				bail!("Duplicate example name {name}");
			}

			examples.push(Example::new(name, source_text.into()));
		}

		Ok(Self { examples })
	}

	/// The examples shipped with the playground
	pub fn builtin() -> Self {
		Self {
			examples: vec![
				Example::new(
					"sum".to_owned(),
					"let sum = fn(a, b) {\n  return a + b;\n}\n\nsum(5, 2)".to_owned(),
				),
				Example::new(
					"fibonacci".to_owned(),
					"let fibonacci = fn(n) {\n  if (n < 2) {\n    return n;\n  }\n  \n  return fibonacci(n - 1) + fibonacci(n - 2);\n}\n\nfibonacci(10)".to_owned(),
				),
			],
		}
	}

	/// Read examples out of a markdown document
	///
	/// Every heading names an example, the first fenced or indented code block
	/// following it holds the source. Headings without a code block are
	/// skipped.
	///
	/// # Errors
	///
	/// Fails on the same conditions as [`ExampleLibrary::new`], or if a code
	/// block appears before any heading.
	pub fn from_markdown(markdown: &str) -> Result<Self> {
		let mut entries: Vec<(String, String)> = Vec::new();

		let mut heading: Option<String> = None;
		let mut in_heading = false;
		let mut code: Option<String> = None;

		for event in Parser::new(markdown) {
			match event {
				Event::Start(Tag::Heading { .. }) => {
					in_heading = true;
					heading = Some(String::new());
				}
				Event::End(TagEnd::Heading(_)) => in_heading = false,
				Event::Start(Tag::CodeBlock(kind)) => {
					if let CodeBlockKind::Fenced(language) = &kind {
						log::debug!("Found example code block tagged {language:?}");
					}
					code = Some(String::new());
				}
				Event::End(TagEnd::CodeBlock) => {
					let Some(source) = code.take() else { continue };

					match heading.take() {
						Some(name) => entries.push((name.trim().to_owned(), source)),
						None if entries.is_empty() => {
							bail!("Code block without a heading naming the example")
						}
						None => log::warn!("Ignoring code block without a heading"),
					}
				}
				Event::Text(text) | Event::Code(text) => {
					if let Some(source) = &mut code {
						source.push_str(&text);
					} else if in_heading {
						if let Some(heading) = &mut heading {
							heading.push_str(&text);
						}
					}
				}
				_ => {}
			}
		}

		// Code blocks always end with a newline, the snippets themselves don't
		let entries = entries.into_iter().map(|(name, mut source)| {
			if source.ends_with('\n') {
				source.pop();
			}
			(name, source)
		});

		Self::new(entries)
	}

	/// Load the library described by `config`
	///
	/// # Errors
	///
	/// Fails if the configured examples file can't be read or is invalid.
	pub fn from_config(config: &Config) -> Result<Self> {
		let library = match &config.examples {
			Some(path) => {
				let markdown = fs::read_to_string(path)
					.with_context(|| format!("Failed to read examples from {}", path.display()))?;
				Self::from_markdown(&markdown)
					.with_context(|| format!("Invalid examples in {}", path.display()))?
			}
			None => Self::builtin(),
		};

		if config.highlight {
			Ok(library.highlight(&ClassHighlighter::new(&config.theme), &config.language))
		} else {
			Ok(library)
		}
	}

	/// Pre-render every example that hasn't been rendered yet.
	///
	/// A failing highlighter leaves the example unrendered, it will be shown as
	/// raw source.
	#[must_use]
	pub fn highlight(mut self, highlighter: &dyn Highlighter, language: &str) -> Self {
		for example in &mut self.examples {
			if example.rendered_markup.is_some() {
				continue;
			}

			match highlighter.render(&example.source_text, language) {
				Ok(markup) => example.rendered_markup = Some(markup),
				Err(err) => {
					log::warn!("Failed to highlight example {}: {err}", example.name);
				}
			}
		}

		self
	}

	pub fn list(&self) -> &[Example] {
		&self.examples
	}

	pub fn get(&self, index: usize) -> Option<&Example> {
		self.examples.get(index)
	}

	pub fn len(&self) -> usize {
		self.examples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.examples.is_empty()
	}
}
