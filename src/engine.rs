use std::{
	fmt,
	io::{ErrorKind, Write},
	process::{Command, Stdio},
	thread,
};

use crate::{Config, EvaluatorConfig};

/// A failure reported by the evaluator
///
/// The message is the evaluator's own diagnostic and is shown as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
	message: String,
}

impl EvaluationError {
	pub fn new<M: Into<String>>(message: M) -> Self {
		Self {
			message: message.into(),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn into_message(self) -> String {
		self.message
	}
}

impl fmt::Display for EvaluationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)
	}
}

impl std::error::Error for EvaluationError {}

/// The external interpreter
pub trait Evaluator {
	/// Run `source` and return what it printed, or the interpreter's
	/// diagnostic.
	///
	/// # Errors
	///
	/// Returns an [`EvaluationError`] for anything the interpreter rejects,
	/// e.g. syntax or runtime errors.
	fn evaluate(&self, source: &str) -> Result<String, EvaluationError>;
}

impl<F> Evaluator for F
where
	F: Fn(&str) -> Result<String, EvaluationError>,
{
	fn evaluate(&self, source: &str) -> Result<String, EvaluationError> {
		self(source)
	}
}

/// The evaluator as a resource that may still be loading
#[derive(Default)]
pub enum Engine {
	#[default]
	Loading,
	Ready(Box<dyn Evaluator>),
}

impl Engine {
	pub fn ready<E: Evaluator + 'static>(evaluator: E) -> Self {
		Self::Ready(Box::new(evaluator))
	}

	/// The engine described by `config`, loading if no evaluator is configured
	pub fn from_config(config: &Config) -> Self {
		match &config.evaluator {
			Some(evaluator) => Self::ready(ProcessEvaluator::new(evaluator)),
			None => {
				log::debug!("No evaluator configured, engine stays loading");
				Self::Loading
			}
		}
	}

	/// Finish loading with the result of an initialization step.
	///
	/// A failed initialization is logged and leaves the engine loading.
	pub fn load<E, F>(&mut self, init: F)
	where
		E: Evaluator + 'static,
		F: FnOnce() -> anyhow::Result<E>,
	{
		match init() {
			Ok(evaluator) => {
				log::debug!("Evaluator loaded");
				*self = Self::ready(evaluator);
			}
			Err(err) => log::error!("Failed to load evaluator: {err:#}"),
		}
	}

	pub fn is_ready(&self) -> bool {
		matches!(self, Self::Ready(_))
	}

	pub fn evaluator(&self) -> Option<&dyn Evaluator> {
		match self {
			Self::Ready(evaluator) => Some(evaluator.as_ref()),
			Self::Loading => None,
		}
	}
}

impl fmt::Debug for Engine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Loading => f.write_str("Loading"),
			Self::Ready(_) => f.write_str("Ready"),
		}
	}
}

/// Evaluates by piping the source into an interpreter executable
///
/// Whatever the program writes to stdout is the output. A non-zero exit is a
/// failure, with stderr as the diagnostic.
#[derive(Debug, Clone)]
pub struct ProcessEvaluator {
	command: String,
	args: Vec<String>,
}

impl ProcessEvaluator {
	pub fn new(config: &EvaluatorConfig) -> Self {
		Self {
			command: config.command.clone(),
			args: config.args.clone(),
		}
	}
}

impl Evaluator for ProcessEvaluator {
	fn evaluate(&self, source: &str) -> Result<String, EvaluationError> {
		log::debug!("Running {} {:?}", self.command, self.args);

		let mut child = Command::new(&self.command)
			.args(&self.args)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(|err| EvaluationError::new(format!("Failed to run {}: {err}", self.command)))?;

		// Fed from its own thread so a child filling its stdout pipe can't
		// block us while we are still writing
		let writer = child.stdin.take().map(|mut stdin| {
			let source = source.to_owned();
			thread::spawn(move || match stdin.write_all(source.as_bytes()) {
				Err(err) if err.kind() != ErrorKind::BrokenPipe => Err(err),
				_ => Ok(()),
			})
		});

		let output = child
			.wait_with_output()
			.map_err(|err| EvaluationError::new(format!("Failed to wait for {}: {err}", self.command)))?;

		// The child may exit without reading everything, that's its business
		if let Some(writer) = writer {
			match writer.join() {
				Ok(Ok(())) => {}
				Ok(Err(err)) => log::warn!("Failed to write source to {}: {err}", self.command),
				Err(_) => log::warn!("Writing source to {} panicked", self.command),
			}
		}

		if output.status.success() {
			return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
		}

		let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
		if stderr.is_empty() {
			Err(EvaluationError::new(format!(
				"{} exited with {}",
				self.command, output.status
			)))
		} else {
			Err(EvaluationError::new(stderr))
		}
	}
}

#[cfg(test)]
mod test {
	use anyhow::bail;

	use super::{Engine, EvaluationError, Evaluator};

	fn echo(source: &str) -> Result<String, EvaluationError> {
		Ok(source.to_owned())
	}

	#[test]
	fn loading_until_loaded() {
		let mut engine = Engine::default();
		assert!(!engine.is_ready());
		assert!(engine.evaluator().is_none());

		engine.load(|| Ok(echo));
		assert!(engine.is_ready());
		assert_eq!(
			engine.evaluator().map(|e| e.evaluate("1")),
			Some(Ok("1".to_owned()))
		);
	}

	#[test]
	fn failed_load_stays_loading() {
		let mut engine = Engine::Loading;
		engine.load(|| -> anyhow::Result<fn(&str) -> Result<String, EvaluationError>> {
			bail!("no wasm for you")
		});

		assert!(!engine.is_ready());
	}

	#[test]
	fn error_displays_message_verbatim() {
		let err = EvaluationError::new("unexpected end of input");
		assert_eq!(err.to_string(), "unexpected end of input");
	}

	#[cfg(unix)]
	mod process {
		use std::{sync::mpsc, thread, time::Duration};

		use crate::{EvaluatorConfig, Evaluator, ProcessEvaluator};

		fn shell(script: &str) -> ProcessEvaluator {
			ProcessEvaluator::new(&EvaluatorConfig {
				command: "sh".to_owned(),
				args: vec!["-c".to_owned(), script.to_owned()],
			})
		}

		#[test]
		fn stdout_is_output() {
			assert_eq!(shell("cat").evaluate("Hello, world!\n"), Ok("Hello, world!\n".to_owned()));
		}

		#[test]
		fn stderr_is_diagnostic() {
			let err = shell("cat > /dev/null; printf 'unexpected end of input' >&2; exit 1")
				.evaluate("1 +")
				.unwrap_err();
			assert_eq!(err.message(), "unexpected end of input");
		}

		#[test]
		fn diagnostic_survives_unread_source() {
			let err = shell("printf 'unexpected end of input' >&2; exit 1")
				.evaluate(&"x".repeat(256 * 1024))
				.unwrap_err();
			assert_eq!(err.message(), "unexpected end of input");
		}

		#[test]
		fn large_output_does_not_block() {
			let source = "y".repeat(512 * 1024);
			let (sender, receiver) = mpsc::channel();

			let expected = source.clone();
			thread::spawn(move || {
				let _ = sender.send(shell("cat").evaluate(&source));
			});

			let result = receiver
				.recv_timeout(Duration::from_secs(10))
				.expect("evaluate should return without blocking on the pipes");
			assert_eq!(result, Ok(expected));
		}

		#[test]
		fn missing_program_is_failure() {
			let evaluator = ProcessEvaluator::new(&EvaluatorConfig {
				command: "definitely-not-an-interpreter".to_owned(),
				args: Vec::new(),
			});
			assert!(evaluator.evaluate("1").is_err());
		}
	}
}
