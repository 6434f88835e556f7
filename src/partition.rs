use std::ops::Range;

/// Half-open index range handed to one worker.
pub type Chunk = Range<usize>;

/// Splits `0..len` into `workers` contiguous chunks.
///
/// Every chunk but the last holds `len / workers` items; the last one ends at
/// `len` and absorbs the remainder. With more workers than items the leading
/// chunks are empty.
pub fn partition(len: usize, workers: usize) -> Vec<Chunk> {
	assert!(workers > 0, "partition needs at least one worker");
	let part = len / workers;

	(0..workers)
		.map(|i| {
			let start = i * part;
			let end = if i + 1 == workers { len } else { start + part };
			start..end
		})
		.collect()
}
