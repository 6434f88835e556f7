use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::error::{ExecutionError, Stage};
use crate::shared::{ResultSet, Shared};

/// Reports the results left after the workers joined, one line per entry.
pub(crate) struct Consumer<'a> {
	pub item_delay: Duration,
	#[cfg(feature = "progression")]
	pub progress_bar: Option<progression::Config<'a>>,
	#[cfg(not(feature = "progression"))]
	pub _phantom: std::marker::PhantomData<&'a ()>,
}

impl Consumer<'_> {
	/// Takes ownership of the visible results and reports them in order,
	/// pausing `item_delay` before each one. Returns what was reported.
	pub fn run<W: Write + ?Sized>(self, shared: &Shared, sink: &mut W) -> Result<ResultSet, ExecutionError> {
		let entries = shared.take_results();
		tracing::debug!(items = entries.len(), "consuming results");

		#[cfg(feature = "progression")]
		let bar = self.progress_bar.map(|config| progression::Bar::new(entries.len().try_into().unwrap_or(0), config));

		for entry in &entries {
			if !self.item_delay.is_zero() {
				thread::sleep(self.item_delay);
			}

			writeln!(sink, "{entry}").map_err(|e| ExecutionError::new(Stage::Consuming, e))?;
			shared.record_reported();

			#[cfg(feature = "progression")]
			if let Some(bar) = &bar {
				bar.inc(1);
			}
		}

		sink.flush().map_err(|e| ExecutionError::new(Stage::Consuming, e))?;
		Ok(entries)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::number::{Number, ResultEntry};

	fn consumer() -> Consumer<'static> {
		Consumer {
			item_delay: Duration::ZERO,
			#[cfg(feature = "progression")]
			progress_bar: None,
			#[cfg(not(feature = "progression"))]
			_phantom: std::marker::PhantomData,
		}
	}

	#[test]
	fn it_should_report_each_entry_once() {
		let shared = Shared::default();
		shared.publish((1..=3i64).map(|v| ResultEntry::compute(Number::from(v))).collect());

		let mut out = Vec::new();
		let reported = consumer().run(&shared, &mut out).unwrap();

		assert_eq!(reported.len(), 3);
		assert_eq!(String::from_utf8(out).unwrap(), "1 squared is 1\n2 squared is 4\n3 squared is 9\n");
		let progress = shared.progress();
		assert_eq!(progress.partial, 3);
		assert!(progress.partial <= progress.total);
	}

	struct Broken;

	impl Write for Broken {
		fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
			Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn it_should_fail_when_output_breaks() {
		let shared = Shared::default();
		shared.publish(vec![ResultEntry::compute(Number::from(2i64))]);

		let err = consumer().run(&shared, &mut Broken).unwrap_err();
		assert_eq!(err.stage, Stage::Consuming);
		assert_eq!(shared.progress().partial, 0);
	}
}
