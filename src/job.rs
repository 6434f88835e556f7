use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::consumer::Consumer;
use crate::error::{Cause, ExecutionError, JobError, JobResult, Stage};
use crate::number::NumericList;
use crate::partition::partition;
use crate::progress::ProgressSnapshot;
use crate::shared::{JobState, ResultSet, Shared};
use crate::validate::validate;
use crate::{worker, Config};

/// Output destination for result and summary lines.
pub type Sink = Box<dyn Write + Send>;

/// Outcome of a job that reached `Done`.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
	pub elapsed: Duration,
	pub error_count: usize,
	pub reported: ResultSet,
}

/// Read-only view of a job for observers. Never blocks the job.
#[derive(Debug, Clone)]
pub struct Monitor {
	shared: Arc<Shared>,
}

impl Monitor {
	#[inline]
	pub fn progress(&self) -> ProgressSnapshot {
		self.shared.progress()
	}

	#[inline]
	pub fn state(&self) -> JobState {
		self.shared.state()
	}

	#[inline]
	pub fn is_complete(&self) -> bool {
		self.state().is_terminal()
	}
}

/// One validate, partition, compute and consume run.
pub struct Job {
	config: Config<'static>,
	shared: Arc<Shared>,
}

impl Job {
	pub fn new(config: Config<'static>) -> Self {
		Self { config, shared: Arc::default() }
	}

	/// Observers may poll before, during and after the run.
	pub fn monitor(&self) -> Monitor {
		Monitor { shared: Arc::clone(&self.shared) }
	}

	/// Validates `tokens` synchronously, then runs the job in the background.
	pub fn start<S: AsRef<str>>(self, tokens: &[S], sink: impl Write + Send + 'static) -> JobResult<JobHandle> {
		self.shared.set_state(JobState::Validating);
		match validate(tokens) {
			Ok(numbers) => self.launch(numbers, Box::new(sink)),
			Err(err) => Err(self.reject(err)),
		}
	}

	/// Runs already typed input in the background.
	pub fn start_numbers(self, numbers: NumericList, sink: impl Write + Send + 'static) -> JobResult<JobHandle> {
		self.shared.set_state(JobState::Validating);
		self.launch(numbers, Box::new(sink))
	}

	fn reject(&self, err: JobError) -> JobError {
		tracing::warn!("rejected job: {err}");
		self.shared.set_state(JobState::Failed);
		err
	}

	fn launch(self, numbers: NumericList, sink: Sink) -> JobResult<JobHandle> {
		if self.config.thread_count == 0 {
			return Err(self.reject(JobError::InvalidWorkerCount));
		}
		if numbers.is_empty() {
			return Err(self.reject(JobError::EmptyInput));
		}

		self.shared.reset();
		let monitor = self.monitor();
		let shared = Arc::clone(&self.shared);

		let thread = thread::Builder::new()
			.name("squarer-job".into())
			.spawn(move || self.run(numbers, sink))
			.map_err(|e| {
				shared.set_state(JobState::Failed);
				ExecutionError::new(Stage::Computing, Cause::Spawn(e))
			})?;

		Ok(JobHandle { monitor, thread })
	}

	fn run(self, numbers: NumericList, mut sink: Sink) -> JobResult<JobSummary> {
		let start = Instant::now();
		tracing::info!(items = numbers.len(), workers = self.config.thread_count, "job started");

		let result = panic::catch_unwind(AssertUnwindSafe(|| self.execute(&numbers, &mut sink, start)))
			.unwrap_or_else(|payload| {
				let stage = match self.shared.state() {
					JobState::Consuming => Stage::Consuming,
					_ => Stage::Computing,
				};
				Err(ExecutionError::from_panic(stage, payload))
			});

		match result {
			Ok(summary) => {
				tracing::info!(elapsed = ?summary.elapsed, reported = summary.reported.len(), "job finished");
				self.shared.set_state(JobState::Done);
				Ok(summary)
			}
			Err(err) => {
				tracing::error!(stage = %err.stage, "job failed: {}", err.cause);
				self.shared.set_state(JobState::Failed);
				Err(err.into())
			}
		}
	}

	fn execute(&self, numbers: &NumericList, sink: &mut Sink, start: Instant) -> Result<JobSummary, ExecutionError> {
		self.shared.set_state(JobState::Partitioning);
		let chunks = partition(numbers.len(), self.config.thread_count);
		tracing::debug!(?chunks, "partitioned input");

		self.shared.set_state(JobState::Computing);
		worker::run(numbers.as_slice(), chunks, &self.shared)?;

		self.shared.set_state(JobState::Consuming);
		let reported = self.consumer().run(&self.shared, sink)?;

		let error_count = self.shared.progress().error_count;
		let elapsed = start.elapsed();
		write_summary(sink, error_count, elapsed).map_err(|e| ExecutionError::new(Stage::Consuming, e))?;

		Ok(JobSummary { elapsed, error_count, reported })
	}

	fn consumer(&self) -> Consumer<'static> {
		Consumer {
			item_delay: self.config.item_delay,
			#[cfg(feature = "progression")]
			progress_bar: self.config.progress_bar.then(|| self.config.bar_config.clone()),
			#[cfg(not(feature = "progression"))]
			_phantom: std::marker::PhantomData,
		}
	}
}

fn write_summary(sink: &mut impl Write, error_count: usize, elapsed: Duration) -> std::io::Result<()> {
	writeln!(sink, "Total: {error_count} errors.")?;
	writeln!(sink, "End of process.")?;
	writeln!(sink, "The script took {} seconds.", elapsed.as_secs())?;
	sink.flush()
}

/// A job running in the background.
pub struct JobHandle {
	monitor: Monitor,
	thread: JoinHandle<JobResult<JobSummary>>,
}

impl JobHandle {
	pub fn monitor(&self) -> Monitor {
		self.monitor.clone()
	}

	pub fn progress(&self) -> ProgressSnapshot {
		self.monitor.progress()
	}

	pub fn state(&self) -> JobState {
		self.monitor.state()
	}

	pub fn is_complete(&self) -> bool {
		self.monitor.is_complete()
	}

	/// Blocks until the job reaches `Done` or `Failed`.
	pub fn wait(self) -> JobResult<JobSummary> {
		self.thread.join().unwrap_or_else(|payload| {
			self.monitor.shared.set_state(JobState::Failed);
			Err(ExecutionError::from_panic(Stage::Consuming, payload).into())
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(thread_count: usize) -> Config<'static> {
		Config { thread_count, item_delay: Duration::ZERO, ..Default::default() }
	}

	#[test]
	fn it_should_reject_invalid_tokens_synchronously() {
		let job = Job::new(config(2));
		let monitor = job.monitor();

		let err = job.start(&["a", "2"], std::io::sink()).err().unwrap();
		assert!(matches!(err, JobError::InvalidInput { index: 0, .. }));
		assert_eq!(monitor.state(), JobState::Failed);
		assert_eq!(monitor.progress(), ProgressSnapshot::default());
	}

	#[test]
	fn it_should_reject_empty_input() {
		let empty: [&str; 0] = [];
		let err = Job::new(config(1)).start(&empty, std::io::sink()).err().unwrap();
		assert!(matches!(err, JobError::EmptyInput));
	}

	#[test]
	fn it_should_reject_zero_workers() {
		let err = Job::new(config(0)).start(&["1"], std::io::sink()).err().unwrap();
		assert!(matches!(err, JobError::InvalidWorkerCount));
	}

	#[test]
	fn it_should_be_idle_before_start() {
		let job = Job::new(config(1));
		assert_eq!(job.monitor().state(), JobState::Idle);
		assert!(!job.monitor().is_complete());
	}

	#[test]
	fn it_should_finish_and_report() {
		let handle = Job::new(config(1)).start(&["1", "2", "3", "4", "5"], std::io::sink()).unwrap();
		let monitor = handle.monitor();
		let summary = handle.wait().unwrap();

		assert_eq!(summary.error_count, 0);
		assert_eq!(summary.reported.len(), 5);
		assert!(monitor.is_complete());
		assert_eq!(monitor.state(), JobState::Done);
		assert_eq!(monitor.progress(), ProgressSnapshot { total: 5, partial: 5, error_count: 0 });
	}

	struct Exploding;

	impl Write for Exploding {
		fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
			panic!("sink exploded");
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn it_should_fail_when_the_job_thread_panics() {
		let handle = Job::new(config(1)).start(&["3"], Exploding).unwrap();
		let monitor = handle.monitor();

		match handle.wait() {
			Err(JobError::Execution(err)) => {
				assert_eq!(err.stage, Stage::Consuming);
				assert!(matches!(&err.cause, Cause::Panic(m) if m == "sink exploded"));
				assert!(!err.trace.is_empty());
			}
			Err(other) => panic!("unexpected error {other}"),
			Ok(summary) => panic!("job must fail, got {summary:?}"),
		}
		assert_eq!(monitor.state(), JobState::Failed);
		assert_eq!(monitor.progress().partial, 0);
	}
}
