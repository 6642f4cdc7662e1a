use serde::{Serialize, Deserialize};

/// A generic description of a range of versions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionBounds<T>
where T: std::cmp::Ord + std::clone::Clone,
{
	#[default] Any,
	Explicit(T),
	MinOnly(T),
	MaxOnly(T),
	MinMax(T, T),
}

impl<T> VersionBounds<T>
where T: std::cmp::Ord + std::clone::Clone,
{
	/// When all arguments are `None` will return `Any`.
	///
	/// It is an error to combine `explicit` with `min` or `max`.
	pub fn new(explicit: Option<T>, min: Option<T>, max: Option<T>) -> crate::Result<Self> {
		match (explicit, min, max) {
			(None, None, None) => Ok(VersionBounds::Any),
			(None, None, Some(max)) => Ok(VersionBounds::MaxOnly(max)),
			(None, Some(min), None) => Ok(VersionBounds::MinOnly(min)),
			(None, Some(min), Some(max)) => Ok(VersionBounds::MinMax(min, max)),
			(Some(e), None, None) => Ok(VersionBounds::Explicit(e)),
			_ => Err(crate::Error::Parse("bounds can't combine an explicit version with min or max".to_string())),
		}
	}

	pub fn is_version_within(&self, other: &T) -> bool {
		match self {
			VersionBounds::Any => true,
			VersionBounds::Explicit(v) => other == v,
			VersionBounds::MinOnly(min) => other >= min,
			VersionBounds::MaxOnly(max) => other <= max,
			VersionBounds::MinMax(min, max) => min <= other && other <= max,
		}
	}

	fn lower(&self) -> Option<&T> {
		match self {
			VersionBounds::MinOnly(min) | VersionBounds::MinMax(min, _) => Some(min),
			_ => None,
		}
	}

	fn upper(&self) -> Option<&T> {
		match self {
			VersionBounds::MaxOnly(max) | VersionBounds::MinMax(_, max) => Some(max),
			_ => None,
		}
	}

	/// The intersection of two bounds, `None` when they don't overlap.
	pub fn intersect(&self, other: &Self) -> Option<Self> {
		match (self, other) {
			(VersionBounds::Any, r) => Some(r.clone()),
			(l, VersionBounds::Any) => Some(l.clone()),
			(VersionBounds::Explicit(a), r) => r.is_version_within(a).then(|| VersionBounds::Explicit(a.clone())),
			(l, VersionBounds::Explicit(b)) => l.is_version_within(b).then(|| VersionBounds::Explicit(b.clone())),
			(l, r) => {
				let min = match (l.lower(), r.lower()) {
					(Some(a), Some(b)) => Some(std::cmp::max(a, b)),
					(a, b) => a.or(b),
				}.cloned();
				let max = match (l.upper(), r.upper()) {
					(Some(a), Some(b)) => Some(std::cmp::min(a, b)),
					(a, b) => a.or(b),
				}.cloned();
				match (min, max) {
					(None, None) => Some(VersionBounds::Any),
					(Some(min), None) => Some(VersionBounds::MinOnly(min)),
					(None, Some(max)) => Some(VersionBounds::MaxOnly(max)),
					(Some(min), Some(max)) if min <= max => Some(VersionBounds::MinMax(min, max)),
					_ => None,
				}
			}
		}
	}
}
