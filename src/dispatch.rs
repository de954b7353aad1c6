use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use crate::{Engine, Evaluator};

/// Failure message for runs attempted before the evaluator is loaded
pub const ENGINE_NOT_READY: &str = "The evaluator is not ready yet";

/// Outcome of a single run
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExecutionResult {
	Success { output: String },
	Failure { message: String },
}

impl ExecutionResult {
	pub fn success<O: Into<String>>(output: O) -> Self {
		Self::Success {
			output: output.into(),
		}
	}

	pub fn failure<M: Into<String>>(message: M) -> Self {
		Self::Failure {
			message: message.into(),
		}
	}

	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}

	/// The output on success, the message on failure
	pub fn text(&self) -> &str {
		match self {
			Self::Success { output } => output,
			Self::Failure { message } => message,
		}
	}
}

/// Calls the evaluator and turns whatever happens into an [`ExecutionResult`]
#[derive(Debug, Default)]
pub struct Dispatcher {
	engine: Engine,
}

impl Dispatcher {
	pub fn new(engine: Engine) -> Self {
		Self { engine }
	}

	pub fn engine(&self) -> &Engine {
		&self.engine
	}

	pub fn engine_mut(&mut self) -> &mut Engine {
		&mut self.engine
	}

	pub fn is_ready(&self) -> bool {
		self.engine.is_ready()
	}

	/// Evaluate `source` exactly once.
	///
	/// Evaluator diagnostics are passed through untouched. A panicking
	/// evaluator is reported as a failure as well.
	pub fn execute(&self, source: &str) -> ExecutionResult {
		let Some(evaluator) = self.engine.evaluator() else {
			log::debug!("Run requested while the evaluator is loading");
			return ExecutionResult::failure(ENGINE_NOT_READY);
		};

		match panic::catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(source))) {
			Ok(Ok(output)) => ExecutionResult::success(output),
			Ok(Err(err)) => ExecutionResult::failure(err.into_message()),
			Err(payload) => {
				let reason = payload
					.downcast_ref::<&str>()
					.map(|s| (*s).to_owned())
					.or_else(|| payload.downcast_ref::<String>().cloned())
					.unwrap_or_else(|| "unknown panic".to_owned());

				log::error!("Evaluator panicked: {reason}");
				ExecutionResult::failure(format!("The evaluator crashed: {reason}"))
			}
		}
	}
}

#[cfg(test)]
mod test {
	use anyhow::Result;

	use super::{Dispatcher, ExecutionResult, ENGINE_NOT_READY};
	use crate::{Engine, EvaluationError};

	fn dispatcher<F>(evaluator: F) -> Dispatcher
	where
		F: Fn(&str) -> Result<String, EvaluationError> + 'static,
	{
		Dispatcher::new(Engine::ready(evaluator))
	}

	#[test]
	fn success_and_failure() {
		let dispatcher = dispatcher(|source: &str| match source {
			"1 +" => Err(EvaluationError::new("unexpected end of input")),
			_ => Ok(format!("{source}\n")),
		});

		assert_eq!(dispatcher.execute("42"), ExecutionResult::success("42\n"));
		assert_eq!(
			dispatcher.execute("1 +"),
			ExecutionResult::failure("unexpected end of input")
		);
	}

	#[test]
	fn not_ready() {
		let dispatcher = Dispatcher::default();

		assert!(!dispatcher.is_ready());
		assert_eq!(dispatcher.execute("1"), ExecutionResult::failure(ENGINE_NOT_READY));
	}

	#[test]
	fn panics_become_failures() {
		let dispatcher = dispatcher(|_: &str| -> Result<String, EvaluationError> {
			panic!("stack overflow in user code")
		});

		let result = dispatcher.execute("loop()");
		assert!(!result.is_success());
		assert!(result.text().contains("stack overflow in user code"));
	}

	#[test]
	fn serializes_tagged() -> Result<()> {
		assert_eq!(
			serde_json::to_string(&ExecutionResult::success("7"))?,
			r#"{"kind":"success","output":"7"}"#
		);
		assert_eq!(
			serde_json::to_string(&ExecutionResult::failure("nope"))?,
			r#"{"kind":"failure","message":"nope"}"#
		);

		Ok(())
	}
}
