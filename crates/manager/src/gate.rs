//! Activation gate.
//!
//! While the manager drives focus itself (opening a container, switching its
//! page) the host emits activation and page-change notifications reflecting
//! intermediate states. The gate is closed for that window so those
//! notifications are ignored. Closing is scoped: the returned guard reopens
//! the gate when dropped, including on early return through `?`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
pub struct ActivationGate {
	open: Arc<AtomicBool>,
}

impl Default for ActivationGate {
	fn default() -> Self {
		Self {
			open: Arc::new(AtomicBool::new(true)),
		}
	}
}

impl ActivationGate {
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether activation notifications should be handled.
	pub fn is_open(&self) -> bool {
		self.open.load(Ordering::Acquire)
	}

	/// Closes the gate until the returned guard is dropped.
	///
	/// Nested suppressions restore the state they found.
	#[must_use = "the gate reopens as soon as the guard is dropped"]
	pub fn suppress(&self) -> Suppressed {
		let was_open = self.open.swap(false, Ordering::AcqRel);
		Suppressed {
			open: Arc::clone(&self.open),
			was_open,
		}
	}
}

/// Scope during which the gate is closed.
#[derive(Debug)]
pub struct Suppressed {
	open: Arc<AtomicBool>,
	was_open: bool,
}

impl Drop for Suppressed {
	fn drop(&mut self) {
		self.open.store(self.was_open, Ordering::Release);
	}
}
