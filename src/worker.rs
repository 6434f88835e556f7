use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crate::error::{ExecutionError, Stage};
use crate::number::{Number, ResultEntry};
use crate::partition::Chunk;
use crate::shared::{ResultSet, Shared};

/// Squares every number in `chunk`, in index order.
pub fn compute(numbers: &[Number], chunk: Chunk) -> ResultSet {
	numbers[chunk].iter().copied().map(ResultEntry::compute).collect()
}

/// Runs one scoped thread per chunk and waits for all of them.
///
/// Each worker publishes its own results over whatever is visible, so after
/// the join only one chunk's results (and its length as `total`) remain.
pub(crate) fn run(numbers: &[Number], chunks: Vec<Chunk>, shared: &Shared) -> Result<(), ExecutionError> {
	run_with(numbers, chunks, shared, compute)
}

fn run_with<F>(numbers: &[Number], chunks: Vec<Chunk>, shared: &Shared, work: F) -> Result<(), ExecutionError>
where
	F: Fn(&[Number], Chunk) -> ResultSet + Sync,
{
	thread::scope(|scope| {
		let work = &work;
		let handles: Vec<_> = chunks
			.into_iter()
			.enumerate()
			.map(|(id, chunk)| {
				scope.spawn(move || -> Result<(), ExecutionError> {
					// Caught on the worker thread so the trace shows its stack.
					let local = panic::catch_unwind(AssertUnwindSafe(|| work(numbers, chunk.clone())))
						.map_err(|payload| ExecutionError::from_panic(Stage::Computing, payload))?;
					tracing::debug!(worker = id, ?chunk, items = local.len(), "publishing results");
					shared.publish(local);
					Ok(())
				})
			})
			.collect();

		// Join everything before reporting so no worker outlives a failure.
		let mut failure = None;
		for handle in handles {
			let result = handle.join().unwrap_or_else(|payload| Err(ExecutionError::from_panic(Stage::Computing, payload)));
			if let Err(err) = result {
				failure.get_or_insert(err);
			}
		}

		failure.map_or(Ok(()), Err)
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::number::NumericList;
	use crate::partition::partition;

	#[test]
	fn it_should_square_its_chunk_in_order() {
		let list = NumericList::from(vec![1i64, 2, 3, 4, 5]);
		let local = compute(list.as_slice(), 1..4);
		let expected: Vec<_> = [2i64, 3, 4]
			.into_iter()
			.map(|v| ResultEntry { input: v.into(), squared: (v * v).into() })
			.collect();
		assert_eq!(local, expected);
	}

	#[test]
	fn it_should_keep_only_one_chunk_after_join() {
		let list = NumericList::from((1..=10i64).collect::<Vec<_>>());
		let shared = Shared::default();
		run(list.as_slice(), partition(list.len(), 3), &shared).unwrap();

		let chunks = partition(list.len(), 3);
		let visible = shared.take_results();
		let winner = chunks
			.into_iter()
			.find(|c| compute(list.as_slice(), c.clone()) == visible)
			.expect("visible results must match exactly one chunk");

		assert_eq!(shared.progress().total, winner.len());
		assert_ne!(shared.progress().total, list.len());
	}

	#[test]
	fn it_should_fail_computing_when_a_worker_panics() {
		let list = NumericList::from(vec![1i64, 2, 3, 4]);
		let shared = Shared::default();

		let err = run_with(list.as_slice(), partition(list.len(), 2), &shared, |numbers, chunk| {
			if chunk.start == 0 {
				panic!("bad chunk");
			}
			compute(numbers, chunk)
		})
		.unwrap_err();

		assert_eq!(err.stage, Stage::Computing);
		assert!(matches!(&err.cause, crate::error::Cause::Panic(m) if m == "bad chunk"));
		assert!(!err.trace.is_empty());
		// The healthy worker still published.
		assert_eq!(shared.progress().total, 2);
	}

	#[test]
	fn it_should_publish_everything_with_one_worker() {
		let list = NumericList::from(vec![3i64, 1, 2]);
		let shared = Shared::default();
		run(list.as_slice(), partition(3, 1), &shared).unwrap();
		assert_eq!(shared.progress().total, 3);
		assert_eq!(shared.take_results(), compute(list.as_slice(), 0..3));
	}
}
