//! Buffer identity.
//!
//! A buffer is the logical identity of a document being edited, independent
//! of the surface currently showing it. Records are either reservations
//! (a top-level reference the host knows about but has not realized) or
//! concrete records found by the document input they show.

mod record;
mod table;

use tether_primitives::InputKey;

pub use record::{BufferRecord, NavigationTarget};
pub use table::BufferTable;

use crate::nesting::NestingPath;

/// Where a nested buffer sits inside its top-level container.
///
/// Records are found by input. The placement only separates sibling surfaces
/// of one container that show the same input, and lets a reopened container
/// recover the ids of those siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placement {
	/// Input of the top-level container.
	pub container: InputKey,
	/// Slot path from the container root.
	pub path: NestingPath,
}
