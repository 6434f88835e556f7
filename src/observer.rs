//! Periodic progress polling on a separate thread.

use std::panic;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::job::Monitor;
use crate::progress::ProgressSnapshot;
use crate::shared::JobState;

/// Calls a callback with a fresh snapshot every `interval` until the job is
/// complete. The last call always sees the terminal state.
pub struct Poller {
	thread: JoinHandle<usize>,
}

impl Poller {
	pub fn spawn<F>(monitor: Monitor, interval: Duration, mut on_tick: F) -> std::io::Result<Self>
	where
		F: FnMut(ProgressSnapshot, JobState) + Send + 'static,
	{
		let thread = thread::Builder::new().name("squarer-poller".into()).spawn(move || {
			let mut ticks = 0;
			loop {
				// State first: a terminal state guarantees final counters.
				let state = monitor.state();
				on_tick(monitor.progress(), state);
				ticks += 1;

				if state.is_terminal() {
					return ticks;
				}
				thread::sleep(interval);
			}
		})?;

		Ok(Self { thread })
	}

	pub fn is_finished(&self) -> bool {
		self.thread.is_finished()
	}

	/// Waits for the final tick and returns how many ticks ran. A panic in
	/// the callback is resumed on the caller.
	pub fn join(self) -> usize {
		self.thread.join().unwrap_or_else(|payload| panic::resume_unwind(payload))
	}
}
