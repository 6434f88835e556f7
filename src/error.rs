use std::backtrace::Backtrace;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
	#[error("Invalid input at position {index}: {token:?} is not a number")]
	InvalidInput { index: usize, token: String },

	#[error("No numbers to process")]
	EmptyInput,

	#[error("Worker count must be at least 1")]
	InvalidWorkerCount,

	#[error("Failed to read numbers from {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Execution(#[from] ExecutionError),
}

pub type JobResult<T> = Result<T, JobError>;

/// Phase of a running job in which an execution failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	Computing,
	Consuming,
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Stage::Computing => f.write_str("computing"),
			Stage::Consuming => f.write_str("consuming"),
		}
	}
}

/// What went wrong inside an execution failure.
#[derive(Error, Debug)]
pub enum Cause {
	#[error("panicked: {0}")]
	Panic(String),

	#[error("output failed: {0}")]
	Output(#[from] std::io::Error),

	#[error("could not start job thread: {0}")]
	Spawn(std::io::Error),
}

/// Terminal failure of a job after validation passed.
///
/// Carries the stage, the wrapped cause and the stack captured where the
/// failure was observed. Captured regardless of `RUST_BACKTRACE`; for panics
/// that is the thread which caught the unwind.
#[derive(Error, Debug)]
#[error("Job failed while {stage}: {cause}")]
pub struct ExecutionError {
	pub stage: Stage,
	#[source]
	pub cause: Cause,
	pub trace: String,
}

impl ExecutionError {
	pub(crate) fn new(stage: Stage, cause: impl Into<Cause>) -> Self {
		Self {
			stage,
			cause: cause.into(),
			trace: Backtrace::force_capture().to_string(),
		}
	}

	pub(crate) fn from_panic(stage: Stage, payload: Box<dyn std::any::Any + Send>) -> Self {
		let message = if let Some(s) = payload.downcast_ref::<&str>() {
			(*s).to_string()
		} else if let Some(s) = payload.downcast_ref::<String>() {
			s.clone()
		} else {
			"unknown panic payload".to_string()
		};

		Self::new(stage, Cause::Panic(message))
	}
}
