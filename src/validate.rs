//! Precondition gate run before any worker is spawned.

use crate::error::{JobError, JobResult};
use crate::number::{Number, NumericList};

/// Parses a single token as an integer or a finite float.
pub fn parse_number(token: &str) -> Option<Number> {
	if let Ok(i) = token.parse::<i128>() {
		return Some(Number::Int(i));
	}

	token.parse::<f64>().ok().filter(|f| f.is_finite()).map(Number::Float)
}

/// Accepts `tokens` only if every one of them is numeric, in order.
///
/// The empty sequence is valid here; refusing to run an empty job is the
/// caller's decision.
pub fn validate<S: AsRef<str>>(tokens: &[S]) -> JobResult<NumericList> {
	tokens
		.iter()
		.enumerate()
		.map(|(index, token)| {
			let token = token.as_ref();
			parse_number(token).ok_or_else(|| JobError::InvalidInput { index, token: token.to_string() })
		})
		.collect::<JobResult<Vec<_>>>()
		.map(NumericList::from)
}
