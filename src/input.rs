//! Comma-separated number input, inline or from a file.

use std::fs;
use std::path::Path;

use crate::error::{JobError, JobResult};
use crate::number::NumericList;
use crate::validate::validate;

/// Splits `text` on commas, trims every token and validates the result.
///
/// Blank text yields an empty list rather than one empty token.
pub fn parse_numbers(text: &str) -> JobResult<NumericList> {
	let text = text.trim();
	if text.is_empty() {
		return Ok(NumericList::default());
	}

	let tokens: Vec<&str> = text.split(',').map(str::trim).collect();
	validate(&tokens)
}

pub fn read_numbers(path: impl AsRef<Path>) -> JobResult<NumericList> {
	let path = path.as_ref();
	let text = fs::read_to_string(path).map_err(|source| JobError::Read { path: path.to_path_buf(), source })?;
	tracing::debug!(path = %path.display(), bytes = text.len(), "read numbers file");
	parse_numbers(&text)
}
