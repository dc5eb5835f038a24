//! Per-window buffer and tab services.
//!
//! Every host window gets its own [`BufferService`] so each window keeps an
//! independent "current editor". Services are cheap handles; engines receive
//! one at construction and read the cursor through it.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tether_primitives::{BufferId, SurfaceId, WindowId};

use crate::nesting::NestingInfo;

/// The surface a window currently considers focused.
#[derive(Debug, Clone)]
pub struct CurrentEditor {
	pub surface: SurfaceId,
	pub nesting: NestingInfo,
	pub buffer: Option<BufferId>,
}

#[derive(Debug)]
struct ServiceState {
	window: WindowId,
	current: Option<CurrentEditor>,
	/// Number of times the cursor moved, for change detection by readers.
	revision: u64,
}

/// Shared handle to one window's current-buffer cursor.
#[derive(Debug, Clone)]
pub struct BufferService(Arc<RwLock<ServiceState>>);

impl BufferService {
	fn new(window: WindowId) -> Self {
		Self(Arc::new(RwLock::new(ServiceState {
			window,
			current: None,
			revision: 0,
		})))
	}

	pub fn window(&self) -> WindowId {
		self.0.read().window
	}

	pub fn current(&self) -> Option<CurrentEditor> {
		self.0.read().current.clone()
	}

	pub fn current_surface(&self) -> Option<SurfaceId> {
		self.0.read().current.as_ref().map(|current| current.surface)
	}

	pub fn current_buffer(&self) -> Option<BufferId> {
		self.0.read().current.as_ref().and_then(|current| current.buffer)
	}

	pub fn revision(&self) -> u64 {
		self.0.read().revision
	}

	pub(crate) fn set_current(&self, current: CurrentEditor) {
		let mut state = self.0.write();
		state.current = Some(current);
		state.revision += 1;
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

/// Lazily populated map of window services.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
	services: FxHashMap<WindowId, BufferService>,
}

impl ServiceRegistry {
	/// Returns the window's service, creating it on first use.
	pub fn ensure(&mut self, window: WindowId) -> BufferService {
		self.services
			.entry(window)
			.or_insert_with(|| BufferService::new(window))
			.clone()
	}

	pub fn get(&self, window: WindowId) -> Option<&BufferService> {
		self.services.get(&window)
	}

	/// Drops the service of a closed window.
	pub fn remove(&mut self, window: WindowId) -> Option<BufferService> {
		self.services.remove(&window)
	}

	pub fn len(&self) -> usize {
		self.services.len()
	}

	pub fn is_empty(&self) -> bool {
		self.services.is_empty()
	}
}
