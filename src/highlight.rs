use handlebars::html_escape;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{bail, Result};

/// Turns source text into display markup
///
/// Highlighting is only ever applied to example snippets, never to output.
pub trait Highlighter {
	/// Render `source` written in `language` as HTML markup.
	///
	/// # Errors
	///
	/// Implementations return an error when they can't highlight the given
	/// language or source. Callers are expected to fall back to raw text.
	fn render(&self, source: &str, language: &str) -> Result<String>;
}

const RUST_KEYWORDS: &[&str] = &[
	"as", "break", "const", "continue", "else", "enum", "false", "fn", "for", "if", "impl", "in",
	"let", "loop", "match", "mod", "mut", "pub", "return", "self", "struct", "trait", "true",
	"type", "use", "where", "while",
];

// Group order matters: comments and strings swallow anything that looks like
// a keyword or number inside them.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
	Regex::new(
		r#"(?P<comment>//[^\n]*)|(?P<string>"(?:[^"\\]|\\.)*")|(?P<number>[0-9][0-9_]*(?:\.[0-9]+)?)|(?P<ident>[A-Za-z_][A-Za-z0-9_]*)"#,
	)
	.unwrap()
});

/// A small regex based highlighter emitting CSS classes
///
/// Supported language tags are `rust` (alias `rs`) and `text` (alias
/// `plain`), the latter only escapes the source.
pub struct ClassHighlighter {
	theme: String,
}

impl ClassHighlighter {
	pub fn new<T: Into<String>>(theme: T) -> Self {
		Self {
			theme: theme.into(),
		}
	}

	fn highlight_rust(source: &str) -> String {
		let mut markup = String::with_capacity(source.len() * 2);
		let mut last = 0;

		for captures in TOKEN.captures_iter(source) {
			let Some(token) = captures.get(0) else { continue };

			markup.push_str(&html_escape(&source[last..token.start()]));
			last = token.end();

			let class = if captures.name("comment").is_some() {
				Some("hl-comment")
			} else if captures.name("string").is_some() {
				Some("hl-string")
			} else if captures.name("number").is_some() {
				Some("hl-number")
			} else if RUST_KEYWORDS.contains(&token.as_str()) {
				Some("hl-keyword")
			} else {
				None
			};

			match class {
				Some(class) => markup.push_str(&format!(
					r#"<span class="{class}">{}</span>"#,
					html_escape(token.as_str())
				)),
				None => markup.push_str(&html_escape(token.as_str())),
			}
		}

		markup.push_str(&html_escape(&source[last..]));
		markup
	}
}

impl Highlighter for ClassHighlighter {
	fn render(&self, source: &str, language: &str) -> Result<String> {
		let code = match language {
			"rust" | "rs" => Self::highlight_rust(source),
			"text" | "plain" => html_escape(source),
			_ => bail!("Unsupported language {language}"),
		};

		Ok(format!(
			r#"<pre class="highlight {}"><code class="language-{}">{code}</code></pre>"#,
			html_escape(&self.theme),
			html_escape(language)
		))
	}
}

/// Markup for source text that wasn't highlighted
pub(crate) fn raw_markup(source: &str) -> String {
	format!("<pre><code>{}</code></pre>", html_escape(source))
}
