//! Current-buffer synchronization on activation.
//!
//! A container sets its window's cursor once, after all of its children have
//! been processed. Leaves only set it themselves when they are top-level.
//! External containers leave the cursor alone.

use tether_primitives::{SurfaceId, SurfaceKind};

use super::InterceptorManager;
use crate::engine::EngineFactory;
use crate::guard::TraversalGuard;
use crate::host::Host;
use crate::nesting::NestingInfo;
use crate::service::CurrentEditor;

impl<H: Host, F: EngineFactory> InterceptorManager<H, F> {
	pub(crate) fn activated(&mut self, surface: SurfaceId, nesting: &NestingInfo, guard: &TraversalGuard) {
		if self.interceptors.contains_key(&surface) {
			self.reactivate_leaf(surface, nesting);
			return;
		}

		let kind = self.host.kind(surface);
		if !kind.is_container() {
			if kind == SurfaceKind::Plain && nesting.is_simple() {
				self.set_current(nesting, surface);
			}
			return;
		}
		let children = match self.children(surface, &kind) {
			Ok(children) => children,
			Err(error) => {
				tracing::warn!(%surface, kind = kind.as_str(), %error, "failed to activate container");
				return;
			}
		};
		for &(slot, child) in &children {
			if guard.is_marked(child) {
				continue;
			}
			self.activated(child, &nesting.child(child, slot), &guard.mark(child));
		}

		let selected = match kind {
			SurfaceKind::Paged => self.host.active_page(surface).and_then(|index| {
				children
					.iter()
					.find_map(|&(slot, child)| (slot == index).then_some(child))
			}),
			SurfaceKind::Aggregate => self.host.active_inner(surface),
			SurfaceKind::Plain | SurfaceKind::External { .. } => None,
		};
		let Some(selected) = selected else {
			return;
		};
		if let Some(child) = self.child_descriptor(nesting, selected) {
			self.set_current(&child, selected);
		}
	}

	/// A leaf regaining focus.
	fn reactivate_leaf(&mut self, surface: SurfaceId, nesting: &NestingInfo) {
		let enabled = self.config.enabled;
		if let Some(interception) = self.interceptors.get_mut(&surface) {
			let engine = &mut interception.engine;
			if enabled && engine.start_normal_mode() {
				engine.clear_selection();
				if let Err(error) = engine.enter_default_mode() {
					tracing::warn!(%surface, %error, "failed to return to normal mode");
				}
			}
		}
		if nesting.is_simple() {
			self.set_current(nesting, surface);
		}
	}

	/// Moves the window cursor to `surface`, refreshing its buffer record.
	pub(crate) fn set_current(&mut self, nesting: &NestingInfo, surface: SurfaceId) {
		let buffer = self.register(nesting, surface, true);
		let Some(window) = self.host.window(surface) else {
			tracing::trace!(%surface, "current surface has no window");
			return;
		};
		tracing::trace!(%surface, ?buffer, ?window, "current editor changed");
		self.services.ensure(window).set_current(CurrentEditor {
			surface,
			nesting: nesting.clone(),
			buffer,
		});
	}
}
