//! Branch-local traversal guard.
//!
//! Hosts report container structures that are irregular: a page can list its
//! own container, or the same editor can appear under two pages. The guard is a
//! persistent list of visited surfaces. Marking returns a new guard sharing the
//! ancestors' marks, so a recursive call sees everything above it while its
//! siblings never see its marks.

use std::rc::Rc;

use tether_primitives::SurfaceId;

struct Mark {
	surface: SurfaceId,
	up: Option<Rc<Mark>>,
}

#[derive(Clone)]
pub struct TraversalGuard(Rc<Mark>);

impl TraversalGuard {
	/// Starts a traversal pass at `start`, which is marked.
	pub fn new(start: SurfaceId) -> Self {
		Self(Rc::new(Mark {
			surface: start,
			up: None,
		}))
	}

	/// Returns a guard that additionally contains `surface`.
	#[must_use]
	pub fn mark(&self, surface: SurfaceId) -> Self {
		Self(Rc::new(Mark {
			surface,
			up: Some(Rc::clone(&self.0)),
		}))
	}

	pub fn is_marked(&self, surface: SurfaceId) -> bool {
		self.marks().any(|marked| marked == surface)
	}

	/// Marked surfaces, innermost first.
	pub fn marks(&self) -> impl Iterator<Item = SurfaceId> + '_ {
		std::iter::successors(Some(&*self.0), |&mark| mark.up.as_deref()).map(|mark| mark.surface)
	}
}

impl std::fmt::Debug for TraversalGuard {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.marks()).finish()
	}
}
