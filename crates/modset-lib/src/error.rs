//! Library error type.
//!
//! Planning outcomes are never errors: an unsatisfiable change set comes back
//! as conflict data inside a [`crate::changeset::Plan`]. This type only covers
//! constructing collaborators (registry import, version parsing).

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("validation error: {0}")]
	Validation(String),
}
