use serde::{Serialize, Deserialize, Serializer, Deserializer};

/// The version of a package.
///
/// # Format
/// Package versions follow a `[epoch:]version` format.
/// - `epoch` orders releases whose versioning scheme changed over time.
/// - `version` can be nearly any string, so ordering walks it as alternating
/// runs of digit and non-digit characters, comparing digit runs numerically.
///
/// Full semantic-version grammar is out of scope; this ordering exists so the
/// registry can pick "latest".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageVersion {
	epoch: i32,
	version: String,
}

impl PackageVersion {
	pub fn new(version: &str) -> crate::Result<Self> {
		let spl: Vec<&str> = version.splitn(2, ':').collect();
		if spl.len() == 2 {
			let epoch = spl[0].parse::<i32>()
				.map_err(|_| crate::Error::Parse(format!("invalid epoch in version \"{}\"", version)))?;
			Ok(PackageVersion { epoch, version: spl[1].to_string() })
		} else {
			Ok(PackageVersion { epoch: 0, version: spl[0].to_string() })
		}
	}
}

impl TryFrom<String> for PackageVersion {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl Ord for PackageVersion {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		match self.epoch.cmp(&other.epoch) {
			std::cmp::Ordering::Equal => {}
			ord => return ord,
		}

		let mut lhs = chunks(&self.version).into_iter();
		let mut rhs = chunks(&other.version).into_iter();
		loop {
			match (lhs.next(), rhs.next()) {
				(None, None) => return std::cmp::Ordering::Equal,
				(None, Some(_)) => return std::cmp::Ordering::Less,
				(Some(_), None) => return std::cmp::Ordering::Greater,
				(Some(l), Some(r)) => {
					/* Digit runs compare numerically, everything else lexically. */
					let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
						(Ok(a), Ok(b)) => a.cmp(&b),
						_ => l.cmp(r),
					};
					match ord {
						std::cmp::Ordering::Equal => continue,
						ord => return ord,
					}
				}
			}
		}
	}
}

impl PartialOrd for PackageVersion {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

/// Splits a version string into runs of digit and non-digit characters.
fn chunks(s: &str) -> Vec<&str> {
	let mut out = Vec::new();
	let mut start = 0;
	let mut in_digits = None;
	for (i, c) in s.char_indices() {
		let d = c.is_ascii_digit();
		if in_digits.map_or(false, |prev: bool| prev != d) {
			out.push(&s[start..i]);
			start = i;
		}
		in_digits = Some(d);
	}
	if start < s.len() {
		out.push(&s[start..]);
	}
	out
}

impl std::fmt::Display for PackageVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.epoch != 0 {
			write!(f, "{}:{}", self.epoch, self.version)
		} else {
			write!(f, "{}", self.version)
		}
	}
}

/* Versions read and write as plain strings so registry fixtures stay terse. */

impl Serialize for PackageVersion {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for PackageVersion {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		PackageVersion::new(&s).map_err(serde::de::Error::custom)
	}
}

pub type PackageVersionBounds = super::version_bounds::VersionBounds<PackageVersion>;
