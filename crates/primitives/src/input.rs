use std::fmt;
use std::sync::Arc;

/// Errors produced when normalizing a document input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputKeyError {
	#[error("document input is empty")]
	Empty,
}

/// Normalized identity of a document input.
///
/// Two inputs naming the same document compare equal regardless of the URI
/// scheme prefix or path separator style the host reported them with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputKey(Arc<str>);

impl InputKey {
	/// Normalizes a host-reported path or `file://` URI.
	pub fn parse(raw: &str) -> Result<Self, InputKeyError> {
		let raw = raw.trim();
		let raw = raw.strip_prefix("file://").unwrap_or(raw);
		let mut normalized = raw.replace('\\', "/");
		while normalized.len() > 1 && normalized.ends_with('/') {
			normalized.pop();
		}
		if normalized.is_empty() {
			return Err(InputKeyError::Empty);
		}
		Ok(Self(normalized.into()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for InputKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Tag naming the editor implementation a view was opened with.
///
/// Used to reopen a buffer in the same kind of editor it was last seen in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditorType(Arc<str>);

impl EditorType {
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for EditorType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
