//! State shared between the job, its workers and its observers.

use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;

use crate::number::ResultEntry;
use crate::progress::{ProgressSnapshot, ProgressTracker};

/// Results currently visible to the consumer.
pub type ResultSet = Vec<ResultEntry>;

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum JobState {
	Idle,
	Validating,
	Partitioning,
	Computing,
	Consuming,
	Done,
	Failed,
}

impl JobState {
	pub fn is_terminal(self) -> bool {
		matches!(self, JobState::Done | JobState::Failed)
	}

	fn from_u8(value: u8) -> Self {
		match value {
			0 => JobState::Idle,
			1 => JobState::Validating,
			2 => JobState::Partitioning,
			3 => JobState::Computing,
			4 => JobState::Consuming,
			5 => JobState::Done,
			_ => JobState::Failed,
		}
	}
}

/// One mutex guards the result set and every counter write.
#[derive(Debug)]
pub struct Shared {
	results: Mutex<ResultSet>,
	progress: ProgressTracker,
	state: AtomicU8,
}

impl Default for Shared {
	fn default() -> Self {
		Self {
			results: Mutex::new(Vec::new()),
			progress: ProgressTracker::default(),
			state: AtomicU8::new(JobState::Idle as u8),
		}
	}
}

impl Shared {
	pub fn progress(&self) -> ProgressSnapshot {
		self.progress.snapshot()
	}

	pub fn state(&self) -> JobState {
		JobState::from_u8(self.state.load(Ordering::Acquire))
	}

	pub(crate) fn set_state(&self, state: JobState) {
		tracing::debug!(?state, "job state");
		self.state.store(state as u8, Ordering::Release);
	}

	pub(crate) fn reset(&self) {
		let mut results = self.results.lock();
		results.clear();
		self.progress.reset(&results);
	}

	/// Replaces the visible results with `local` and sets `total` to its
	/// length. Concurrent publishers overwrite each other; the last one wins.
	pub(crate) fn publish(&self, local: ResultSet) {
		let mut results = self.results.lock();
		self.progress.set_total(local.len(), &results);
		*results = local;
	}

	/// Hands the visible results to the consumer.
	pub(crate) fn take_results(&self) -> ResultSet {
		std::mem::take(&mut *self.results.lock())
	}

	pub(crate) fn record_reported(&self) -> usize {
		let results = self.results.lock();
		self.progress.inc_partial(&results)
	}
}
