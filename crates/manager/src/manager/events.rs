//! Host notification dispatch.

use tether_primitives::{SurfaceId, SurfaceKind, ViewRef};

use super::InterceptorManager;
use crate::engine::EngineFactory;
use crate::guard::TraversalGuard;
use crate::host::{Host, HostEvent};
use crate::nesting::NestingInfo;

impl<H: Host, F: EngineFactory> InterceptorManager<H, F> {
	/// Handles one host notification to completion.
	pub fn handle(&mut self, event: HostEvent) {
		tracing::trace!(?event, "host event");
		match event {
			HostEvent::Opened(reference) => self.part_opened(reference),
			HostEvent::Closed(reference) => self.part_closed(reference),
			HostEvent::Activated(reference) => self.part_activated(reference),
			HostEvent::InputChanged(reference) => self.input_changed(reference),
			HostEvent::PageChanged { provider, page } => self.page_changed(provider, page),
			HostEvent::InputReleased(input) => {
				let released = self.buffers.release_input(&input);
				if released > 0 {
					tracing::debug!(%input, released, "released buffers");
				}
			}
			HostEvent::ReferenceReleased(reference) => {
				if self.buffers.release_reference(reference) {
					tracing::debug!(%reference, "released reservation");
				}
			}
			HostEvent::WindowClosed(window) => {
				if self.services.remove(window).is_some() {
					tracing::debug!(?window, "dropped window service");
				}
			}
		}
	}

	/// Handles notifications the host queued while the manager was driving it.
	pub fn dispatch_pending(&mut self) {
		loop {
			let events = self.host.take_events();
			if events.is_empty() {
				break;
			}
			for event in events {
				self.handle(event);
			}
		}
	}

	fn part_opened(&mut self, reference: ViewRef) {
		let Some(surface) = self.host.resolve(reference) else {
			tracing::trace!(%reference, "opened reference does not resolve");
			return;
		};
		if self.top_levels.contains_key(&surface) {
			return;
		}
		self.open_top_level(surface);
	}

	fn part_closed(&mut self, reference: ViewRef) {
		let Some(surface) = self.host.resolve(reference) else {
			tracing::trace!(%reference, "closed reference does not resolve");
			return;
		};
		let Some(root) = self.top_levels.remove(&surface) else {
			return;
		};
		self.close(surface, &root, &TraversalGuard::new(surface));
	}

	fn part_activated(&mut self, reference: ViewRef) {
		if !self.gate.is_open() {
			tracing::trace!(%reference, "activation suppressed");
			return;
		}
		let Some(surface) = self.host.resolve(reference) else {
			return;
		};
		let Some(root) = self.top_levels.get(&surface).cloned() else {
			tracing::trace!(%surface, "activated surface is not tracked");
			return;
		};
		self.activated(surface, &root, &TraversalGuard::new(surface));
	}

	/// Rebuilds the tracking of a view whose document was swapped out.
	fn input_changed(&mut self, reference: ViewRef) {
		let Some(surface) = self.host.resolve(reference) else {
			return;
		};
		if let Some(old) = self.top_levels.remove(&surface) {
			self.close(surface, &old, &TraversalGuard::new(surface));
		}
		self.open_top_level(surface);
	}

	fn page_changed(&mut self, provider: SurfaceId, page: SurfaceId) {
		if !self.gate.is_open() {
			tracing::trace!(%provider, %page, "page change suppressed");
			return;
		}
		let Some(container) = self.descriptor_of(provider) else {
			tracing::trace!(%provider, "page change from untracked container");
			return;
		};
		let Some(child) = self.child_descriptor(&container, page) else {
			return;
		};
		self.activated(page, &child, &TraversalGuard::new(page));
		if self.host.kind(page) == SurfaceKind::Plain {
			self.set_current(&child, page);
		}
	}

	/// Finds the descriptor of a tracked surface, searching below every root.
	fn descriptor_of(&self, surface: SurfaceId) -> Option<NestingInfo> {
		if let Some(root) = self.top_levels.get(&surface) {
			return Some(root.clone());
		}
		self.top_levels.values().find_map(|root| root.find(surface))
	}
}
