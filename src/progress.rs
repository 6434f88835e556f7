//! Progress counters shared between a running job and its observers.
//!
//! Writers only touch the counters while holding the job's result lock, which
//! the setters demand as a guard argument. Readers never lock: a snapshot is
//! three relaxed loads and may pair a fresh `partial` with a stale `total`.
//! Observers only need approximate progress, so that is accepted.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::MutexGuard;

use crate::shared::ResultSet;

#[derive(Debug, Default)]
pub struct ProgressTracker {
	total: AtomicUsize,
	partial: AtomicUsize,
	errors: AtomicUsize,
}

impl ProgressTracker {
	/// Lock-free read for observers.
	pub fn snapshot(&self) -> ProgressSnapshot {
		ProgressSnapshot {
			total: self.total.load(Ordering::Relaxed),
			partial: self.partial.load(Ordering::Relaxed),
			error_count: self.errors.load(Ordering::Relaxed),
		}
	}

	pub(crate) fn reset(&self, _guard: &MutexGuard<'_, ResultSet>) {
		self.total.store(0, Ordering::Relaxed);
		self.partial.store(0, Ordering::Relaxed);
		self.errors.store(0, Ordering::Relaxed);
	}

	/// Overwrites `total`; it is never accumulated across workers.
	pub(crate) fn set_total(&self, total: usize, _guard: &MutexGuard<'_, ResultSet>) {
		self.total.store(total, Ordering::Relaxed);
	}

	pub(crate) fn inc_partial(&self, _guard: &MutexGuard<'_, ResultSet>) -> usize {
		self.partial.fetch_add(1, Ordering::Relaxed) + 1
	}
}

/// Point-in-time copy of the progress counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
	pub total: usize,
	pub partial: usize,
	pub error_count: usize,
}

impl ProgressSnapshot {
	pub fn status(&self) -> Status {
		match (self.total, self.partial) {
			(0, 0) => Status::Idle,
			(total, 0) => Status::Counting { total },
			(total, partial) if total == partial => Status::Complete { total },
			(total, partial) => Status::Reporting {
				partial,
				total,
				percent: if total == 0 { 0 } else { partial * 100 / total },
			},
		}
	}
}

/// Human-facing classification of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	Idle,
	Counting { total: usize },
	Reporting { partial: usize, total: usize, percent: usize },
	Complete { total: usize },
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Status::Idle => f.write_str("Idle"),
			Status::Counting { total } => write!(f, "Counting: {total} stuff to the moment"),
			Status::Reporting { partial, total, percent } => write!(f, "{partial} from {total} stuff - {percent}%"),
			Status::Complete { total } => write!(f, "Analysis of {total} stuff complete"),
		}
	}
}
