use handlebars::{html_escape, Handlebars};
use serde::Serialize;

use crate::{Config, Context, Playground, Result};

#[derive(Serialize)]
struct ExampleCard {
	index: usize,
	file_name: String,
	markup: String,
	selected: bool,
}

#[derive(Serialize)]
struct PageData {
	editor: String,
	output: String,
	runnable: bool,
	examples: Vec<ExampleCard>,
}

impl PageData {
	fn new(playground: &Playground, extension: &str) -> Self {
		let examples = playground
			.library()
			.list()
			.iter()
			.enumerate()
			.map(|(index, example)| ExampleCard {
				index,
				file_name: html_escape(&format!("{}.{extension}", example.name())),
				markup: example.display_markup(),
				selected: playground.selected_example() == Some(index),
			})
			.collect();

		Self {
			editor: playground
				.editor()
				.map(|editor| editor.render())
				.unwrap_or_default(),
			output: playground.output().render(),
			runnable: playground.is_runnable(),
			examples,
		}
	}
}

/// Renders a [`Playground`] to HTML
pub struct PageRenderer {
	handlebars: Handlebars<'static>,
	extension: String,
}

impl PageRenderer {
	/// Create a renderer using the configured template, or the built-in one.
	///
	/// # Errors
	///
	/// Fails if the configured template can't be read or doesn't compile.
	pub fn new(config: &Config) -> Result<Self> {
		let mut handlebars = Handlebars::new();

		// Everything passed in is markup that's already escaped
		handlebars.register_escape_fn(std::borrow::ToOwned::to_owned);

		match &config.template {
			Some(template_path) => handlebars
				.register_template_file("playground", template_path)
				.with_context(|| format!("Failed to load template {}", template_path.display()))?,
			None => handlebars
				.register_template_string("playground", include_str!("default_template.hbs"))?,
		}

		Ok(Self {
			handlebars,
			extension: config.extension.clone(),
		})
	}

	/// # Errors
	///
	/// Fails if the template fails to render.
	pub fn render(&self, playground: &Playground) -> Result<String> {
		let data = PageData::new(playground, &self.extension);

		self.handlebars
			.render("playground", &data)
			.context("Failed to render playground")
	}
}

#[cfg(test)]
mod test {
	use std::{fs, sync::Arc};

	use anyhow::Result;

	use super::PageRenderer;
	use crate::{Config, Engine, ExampleLibrary, Playground};

	#[test]
	fn renders_gallery_editor_and_output() -> Result<()> {
		let config = Config::default();
		let library = ExampleLibrary::builtin();
		let mut playground = Playground::from_config(&config, Arc::new(library), Engine::Loading);
		playground.run("1");

		let html = PageRenderer::new(&config)?.render(&playground)?;

		assert!(html.contains("sum.lp"));
		assert!(html.contains("fibonacci.lp"));
		assert!(html.contains(r#"class="example selected" data-index="0""#));
		assert!(html.contains("editor-code"));
		assert!(html.contains("output-failure"));
		assert!(html.contains(r#"data-action="run" disabled"#));

		Ok(())
	}

	#[test]
	fn custom_template() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let template = dir.path().join("page.hbs");
		fs::write(&template, "{{#each examples}}[{{file_name}}]{{/each}}")?;

		let config = Config::from_toml("template = \"page.hbs\"\nextension = \"ori\"", dir.path())?;
		let playground = Playground::new(Arc::new(ExampleLibrary::builtin()), Engine::Loading);

		assert_eq!(
			PageRenderer::new(&config)?.render(&playground)?,
			"[sum.ori][fibonacci.ori]"
		);

		Ok(())
	}
}
