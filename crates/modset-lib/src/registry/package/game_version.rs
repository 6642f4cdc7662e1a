//! Game build numbers and the compatibility windows packages declare against them.

use serde::{Serialize, Deserialize, Serializer, Deserializer};

use super::version_bounds::VersionBounds;

/// A concrete version of the game, `MAJOR.MINOR[.PATCH]`.
///
/// A missing patch component means "any patch of this major.minor pair", which
/// is why compatibility checks go through [`GameVersion::is_compatible_with()`]
/// or [`GameVersionBounds::is_version_compatible()`] instead of `Ord`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameVersion {
	major: u32,
	minor: u32,
	patch: Option<u32>,
}

impl GameVersion {
	pub fn new(s: impl AsRef<str>) -> crate::Result<Self> {
		use crate::Error::Parse;
		let s = s.as_ref();
		let components = s.split('.')
			.map(|c| c.parse::<u32>().map_err(|_| Parse(format!("invalid game version component in \"{}\"", s))))
			.collect::<crate::Result<Vec<_>>>()?;
		match components.as_slice() {
			[major, minor] => Ok(GameVersion { major: *major, minor: *minor, patch: None }),
			[major, minor, patch] => Ok(GameVersion { major: *major, minor: *minor, patch: Some(*patch) }),
			_ => Err(Parse(format!("unexpected number of game version components in \"{}\"", s))),
		}
	}

	/// Compatibility ignores a patch component missing on either side.
	pub fn is_compatible_with(&self, other: &GameVersion) -> bool {
		self.major == other.major && self.minor == other.minor
			&& match (self.patch, other.patch) {
				(Some(a), Some(b)) => a == b,
				_ => true,
			}
	}
}

/* Ord treats a missing patch as 0 so versions can participate in bounds;
 * use the compatibility checks rather than Ord when deciding what runs where. */
impl Ord for GameVersion {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		(self.major, self.minor, self.patch.unwrap_or(0))
			.cmp(&(other.major, other.minor, other.patch.unwrap_or(0)))
	}
}

impl PartialOrd for GameVersion {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::fmt::Display for GameVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.patch {
			Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
			None => write!(f, "{}.{}", self.major, self.minor),
		}
	}
}

impl Serialize for GameVersion {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for GameVersion {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		GameVersion::new(&s).map_err(serde::de::Error::custom)
	}
}

pub type GameVersionBounds = VersionBounds<GameVersion>;

impl GameVersionBounds {
	/// Whether a game version falls inside these bounds, treating missing
	/// patch components as wildcards at the edges.
	pub fn is_version_compatible(&self, v: &GameVersion) -> bool {
		fn at_least(v: &GameVersion, min: &GameVersion) -> bool {
			v.is_compatible_with(min) || v >= min
		}
		fn at_most(v: &GameVersion, max: &GameVersion) -> bool {
			v.is_compatible_with(max) || v <= max
		}

		match self {
			VersionBounds::Any => true,
			VersionBounds::Explicit(b) => b.is_compatible_with(v),
			VersionBounds::MinOnly(min) => at_least(v, min),
			VersionBounds::MaxOnly(max) => at_most(v, max),
			VersionBounds::MinMax(min, max) => at_least(v, min) && at_most(v, max),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn gv(s: &str) -> GameVersion { GameVersion::new(s).unwrap() }

	#[test] fn game_version_missing_patch_matches_any_patch() { assert!(gv("1.12").is_compatible_with(&gv("1.12.3"))) }
	#[test] fn game_version_different_minor_is_incompatible() { assert!(!gv("1.11.2").is_compatible_with(&gv("1.12.2"))) }
	#[test] fn game_version_max_bound_covers_later_patches() { assert!(VersionBounds::MaxOnly(gv("1.12")).is_version_compatible(&gv("1.12.3"))) }
	#[test] fn game_version_outside_max_bound_is_rejected() { assert!(!VersionBounds::MaxOnly(gv("1.11")).is_version_compatible(&gv("1.12.0"))) }
	#[test] fn game_version_one_component_is_an_error() { assert!(GameVersion::new("1").is_err()) }
}
