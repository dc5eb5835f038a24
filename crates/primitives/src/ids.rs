use std::fmt;

/// Handle to a realized editor part owned by the host.
///
/// Top-level views and the surfaces nested inside them share this handle
/// space. Handles are only compared, never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// Handle to a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

/// Reference to a top-level view that may not be realized yet.
///
/// The host knows about references long before the view behind them is
/// created (restored sessions, lazily loaded editor plugins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewRef(pub u64);

/// Handle to the text viewer underlying a plain surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(pub u64);

/// Stable identity of a logical buffer.
///
/// Buffer ids start at 1 and are never reused while a record holding them is
/// reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

impl fmt::Display for SurfaceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "surface:{}", self.0)
	}
}

impl fmt::Display for ViewRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ref:{}", self.0)
	}
}
