//! Container nesting descriptors.
//!
//! Each top-level view gets one root [`NestingInfo`]. Surfaces discovered
//! inside paged or aggregate containers get child descriptors created on
//! demand. The manager owns the roots; children are owned by their parent's
//! child map and point back up through weak links, so dropping a root drops
//! the whole subtree.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tether_primitives::{SurfaceId, SurfaceKind};

/// Position of a descriptor below its root, one child slot per level.
pub type NestingPath = SmallVec<[usize; 4]>;

struct NestingNode {
	surface: SurfaceId,
	top_level_surface: SurfaceId,
	/// Root only: whether the top-level view is a paged or aggregate container.
	container: bool,
	path: NestingPath,
	parent: Option<Weak<NestingNode>>,
	top_level: Weak<NestingNode>,
	children: Mutex<FxHashMap<SurfaceId, NestingInfo>>,
}

/// Handle to one level of container nesting below a top-level view.
#[derive(Clone)]
pub struct NestingInfo(Arc<NestingNode>);

impl NestingInfo {
	/// Creates the root descriptor of a top-level view.
	pub fn root(surface: SurfaceId, kind: &SurfaceKind) -> Self {
		Self(Arc::new_cyclic(|weak| NestingNode {
			surface,
			top_level_surface: surface,
			container: kind.is_container(),
			path: NestingPath::new(),
			parent: None,
			top_level: weak.clone(),
			children: Mutex::new(FxHashMap::default()),
		}))
	}

	/// Returns the child descriptor for `surface`, creating it at `slot` if
	/// this is the first time the child is seen.
	pub fn child(&self, surface: SurfaceId, slot: usize) -> NestingInfo {
		let mut children = self.0.children.lock();
		children
			.entry(surface)
			.or_insert_with(|| {
				let mut path = self.0.path.clone();
				path.push(slot);
				NestingInfo(Arc::new(NestingNode {
					surface,
					top_level_surface: self.0.top_level_surface,
					container: false,
					path,
					parent: Some(Arc::downgrade(&self.0)),
					top_level: self.0.top_level.clone(),
					children: Mutex::new(FxHashMap::default()),
				}))
			})
			.clone()
	}

	/// Returns an existing child descriptor.
	pub fn get_child(&self, surface: SurfaceId) -> Option<NestingInfo> {
		self.0.children.lock().get(&surface).cloned()
	}

	/// The surface this descriptor describes.
	pub fn surface(&self) -> SurfaceId {
		self.0.surface
	}

	pub fn top_level_surface(&self) -> SurfaceId {
		self.0.top_level_surface
	}

	/// Root descriptor, while the top-level view is still tracked.
	pub fn top_level(&self) -> Option<NestingInfo> {
		self.0.top_level.upgrade().map(NestingInfo)
	}

	pub fn parent(&self) -> Option<NestingInfo> {
		self.0.parent.as_ref().and_then(Weak::upgrade).map(NestingInfo)
	}

	/// True for a top-level view that is not a paged or aggregate container.
	pub fn is_simple(&self) -> bool {
		self.0.parent.is_none() && !self.0.container
	}

	/// True for any descriptor below a root.
	pub fn is_nested(&self) -> bool {
		self.0.parent.is_some()
	}

	/// Child slots from the root down to this descriptor. Empty for roots.
	pub fn path(&self) -> &NestingPath {
		&self.0.path
	}

	/// Searches this descriptor and its descendants for `surface`.
	pub fn find(&self, surface: SurfaceId) -> Option<NestingInfo> {
		if self.0.surface == surface {
			return Some(self.clone());
		}
		let children: Vec<NestingInfo> = self.0.children.lock().values().cloned().collect();
		children.iter().find_map(|child| child.find(surface))
	}

	pub fn child_count(&self) -> usize {
		self.0.children.lock().len()
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for NestingInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NestingInfo")
			.field("surface", &self.0.surface)
			.field("top_level", &self.0.top_level_surface)
			.field("path", &self.0.path)
			.field("simple", &self.is_simple())
			.finish()
	}
}
