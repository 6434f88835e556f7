//! Squares numbers across a fixed set of worker threads while exposing
//! progress counters that observers can poll without blocking the job.
//!
//! ```no_run
//! use squarer::{Config, Job};
//!
//! let handle = Job::new(Config { thread_count: 2, ..Default::default() })
//! 	.start(&["1", "2", "3", "4"], std::io::stdout())
//! 	.unwrap();
//!
//! while !handle.is_complete() {
//! 	println!("{}", handle.progress().status());
//! 	std::thread::sleep(std::time::Duration::from_secs(1));
//! }
//!
//! let summary = handle.wait().unwrap();
//! assert_eq!(summary.error_count, 0);
//! ```

use std::time::Duration;

mod consumer;
pub mod error;
pub mod input;
pub mod job;
pub mod logging;
pub mod number;
pub mod observer;
pub mod partition;
pub mod progress;
pub mod shared;
pub mod validate;
pub mod worker;

pub use error::{JobError, JobResult};
pub use job::{Job, JobHandle, JobSummary, Monitor};
pub use number::{Number, NumericList, ResultEntry};
pub use progress::{ProgressSnapshot, Status};
pub use shared::JobState;

pub struct Config<'a> {
	pub thread_count: usize,
	/// Pause before each reported result.
	pub item_delay: Duration,
	#[cfg(feature = "progression")]
	pub progress_bar: bool,
	#[cfg(feature = "progression")]
	pub bar_config: progression::Config<'a>,
	#[cfg(not(feature = "progression"))]
	pub _phantom: std::marker::PhantomData<&'a ()>,
}

impl Config<'_> {
	/// One worker per available CPU.
	#[inline]
	pub fn all_cores() -> Self {
		Self { thread_count: num_cpus::get(), ..Default::default() }
	}
}

impl Default for Config<'_> {
	#[inline]
	fn default() -> Self {
		Self {
			thread_count: 1,
			item_delay: Duration::from_secs(1),
			#[cfg(feature = "progression")]
			progress_bar: false,
			#[cfg(feature = "progression")]
			bar_config: progression::Config::default(),
			#[cfg(not(feature = "progression"))]
			_phantom: std::marker::PhantomData,
		}
	}
}
