use std::{
	fs,
	path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{Context, EditorKind, Result, RunPolicy};

/// Name of the configuration file looked up by [`Config::read`]
pub(crate) const CONFIG_FILE_NAME: &str = "playground.toml";

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct DeConfig {
	#[serde(default)]
	editor: EditorKind,
	language: Option<String>,
	theme: Option<String>,
	highlight: Option<bool>,
	extension: Option<String>,
	#[serde(default)]
	run_policy: RunPolicy,
	placeholder: Option<String>,
	examples: Option<PathBuf>,
	template: Option<PathBuf>,
	tab_width: Option<usize>,

	evaluator: Option<EvaluatorConfig>,
}

/// How to reach the external evaluator
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EvaluatorConfig {
	/// Program to execute, looked up in `PATH` if it isn't a path
	pub command: String,
	/// Extra arguments passed to the program
	#[serde(default)]
	pub args: Vec<String>,
}

/// Configuration for a playground
#[derive(Debug, Clone)]
pub struct Config {
	/// Editor widget mounted when the playground starts
	///
	/// Default value: [`EditorKind::Code`]
	pub editor: EditorKind,
	/// Language tag used for highlighting examples and by the code editor
	///
	/// Default value: `"rust"`
	pub language: String,
	/// Highlight theme, emitted as CSS class on highlighted examples
	///
	/// Default value: `"min-light"`
	pub theme: String,
	/// Whether examples are highlighted when the library is loaded
	///
	/// Default value: `true`
	pub highlight: bool,
	/// File extension shown for examples and used for the sandbox entry file
	///
	/// Default value: `"lp"`
	pub extension: String,
	/// What to do when run is pressed while a previous run is still pending
	///
	/// Default value: [`RunPolicy::Supersede`]
	pub run_policy: RunPolicy,
	/// Text shown in the output viewer before anything ran
	pub placeholder: String,
	/// Markdown file containing the examples, replacing the built-in ones
	pub examples: Option<PathBuf>,
	/// Handlebars template to render the page with
	pub template: Option<PathBuf>,
	/// Number of spaces a tab expands to in the code editor
	///
	/// Default value: `4`
	pub tab_width: usize,
	/// The evaluator, if any
	///
	/// Without an evaluator the playground never leaves the loading state.
	pub evaluator: Option<EvaluatorConfig>,

	pub(crate) root: PathBuf,
}

impl Config {
	/// Read the [`Config`] from the `playground.toml` file inside the given folder.
	///
	/// A missing file yields the default configuration.
	///
	/// # Errors
	///
	/// This function will return an error if reading the file fails or if it
	/// contains an invalid configuration.
	pub fn read<P: AsRef<Path>>(root: P) -> Result<Self> {
		let root = root.as_ref();
		let path = root.join(CONFIG_FILE_NAME);

		if !path.try_exists()? {
			log::debug!("No {} found in {}", CONFIG_FILE_NAME, root.display());
			return Ok(Self::from_de_config(DeConfig::default(), root));
		}

		let contents = fs::read_to_string(&path)
			.with_context(|| format!("Error reading {}", path.display()))?;

		Self::from_toml(&contents, root)
	}

	/// Parse a [`Config`] from TOML, resolving relative paths against `root`.
	///
	/// # Errors
	///
	/// This function fails if the TOML is invalid or contains unknown keys.
	pub fn from_toml<P: AsRef<Path>>(contents: &str, root: P) -> Result<Self> {
		let de_config: DeConfig =
			toml::from_str(contents).context("Failed to parse playground configuration")?;

		Ok(Self::from_de_config(de_config, root.as_ref()))
	}

	fn from_de_config(de_config: DeConfig, root: &Path) -> Self {
		let resolve = |path: PathBuf| {
			if path.is_absolute() {
				path
			} else {
				root.join(path)
			}
		};

		Config {
			editor: de_config.editor,
			language: de_config.language.unwrap_or("rust".to_owned()),
			theme: de_config.theme.unwrap_or("min-light".to_owned()),
			highlight: de_config.highlight.unwrap_or(true),
			extension: de_config.extension.unwrap_or("lp".to_owned()),
			run_policy: de_config.run_policy,
			placeholder: de_config.placeholder.unwrap_or_default(),
			examples: de_config.examples.map(resolve),
			template: de_config.template.map(resolve),
			tab_width: de_config.tab_width.unwrap_or(4),
			evaluator: de_config.evaluator,

			root: root.to_path_buf(),
		}
	}

	/// Folder the configuration was read from
	pub fn root(&self) -> &Path {
		&self.root
	}
}

impl Default for Config {
	fn default() -> Self {
		Self::from_de_config(DeConfig::default(), Path::new("."))
	}
}
