use std::fmt;

/// A single numeric input value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
	Int(i128),
	Float(f64),
}

impl Number {
	/// Squares the value. Integer squares past `i128` fall back to floats,
	/// and floats may become infinite; neither case is reported.
	#[inline]
	pub fn squared(self) -> Number {
		match self {
			Number::Int(i) => i.checked_mul(i).map_or_else(|| Number::Float((i as f64) * (i as f64)), Number::Int),
			Number::Float(f) => Number::Float(f * f),
		}
	}
}

impl fmt::Display for Number {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Number::Int(i) => write!(f, "{i}"),
			// Debug keeps the trailing ".0" on whole floats.
			Number::Float(x) => write!(f, "{x:?}"),
		}
	}
}

impl From<i64> for Number {
	fn from(value: i64) -> Self {
		Number::Int(value.into())
	}
}

impl From<i128> for Number {
	fn from(value: i128) -> Self {
		Number::Int(value)
	}
}

impl From<f64> for Number {
	fn from(value: f64) -> Self {
		Number::Float(value)
	}
}

/// Ordered, already validated job input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericList(Vec<Number>);

impl NumericList {
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn as_slice(&self) -> &[Number] {
		&self.0
	}
}

impl<T: Into<Number>> FromIterator<T> for NumericList {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Number>> From<Vec<T>> for NumericList {
	fn from(values: Vec<T>) -> Self {
		values.into_iter().collect()
	}
}

/// An input value paired with its square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultEntry {
	pub input: Number,
	pub squared: Number,
}

impl ResultEntry {
	#[inline]
	pub fn compute(input: Number) -> Self {
		Self { input, squared: input.squared() }
	}
}

impl fmt::Display for ResultEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} squared is {}", self.input, self.squared)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn it_should_square() {
		assert_eq!(Number::Int(-7).squared(), Number::Int(49));
		assert_eq!(Number::Float(1.5).squared(), Number::Float(2.25));
	}

	#[test]
	fn it_should_not_fail_on_overflow() {
		let big = i128::from(i64::MAX);
		assert_eq!(Number::Int(big).squared(), Number::Int(big * big));
		assert!(matches!(Number::Int(i128::MAX).squared(), Number::Float(f) if f > 2.8e76 && f.is_finite()));
		assert!(matches!(Number::Int(i128::MIN).squared(), Number::Float(f) if f > 0.0));
		assert_eq!(Number::Float(f64::MAX).squared(), Number::Float(f64::INFINITY));
	}

	#[test]
	fn it_should_render_result_lines() {
		assert_eq!(ResultEntry::compute(5i64.into()).to_string(), "5 squared is 25");
		assert_eq!(ResultEntry::compute(2.0.into()).to_string(), "2.0 squared is 4.0");
	}
}
