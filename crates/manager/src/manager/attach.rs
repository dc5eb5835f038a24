//! Traversal on open and close.
//!
//! Every visited surface is registered before the manager looks at its kind,
//! so containers get a buffer identity as well as their leaves. Failures are
//! contained: a surface that cannot be intercepted, or a container that
//! cannot be enumerated, is logged and skipped while its siblings proceed.

use std::sync::Arc;

use tether_primitives::{SurfaceId, SurfaceKind};

use super::{Interception, InterceptorManager};
use crate::engine::{EngineContext, EngineFactory};
use crate::error::AttachError;
use crate::guard::TraversalGuard;
use crate::host::Host;
use crate::nesting::NestingInfo;

impl<H: Host, F: EngineFactory> InterceptorManager<H, F> {
	/// Attaches engines to every plain surface at or below `surface`.
	pub(crate) fn intercept(&mut self, surface: SurfaceId, nesting: &NestingInfo, guard: &TraversalGuard) {
		self.register(nesting, surface, false);

		let kind = self.host.kind(surface);
		match &kind {
			SurfaceKind::Plain => self.intercept_plain(surface, nesting),
			SurfaceKind::Paged | SurfaceKind::Aggregate => {
				let children = match self.children(surface, &kind) {
					Ok(children) => children,
					Err(error) => {
						tracing::warn!(%surface, kind = kind.as_str(), %error, "failed to enumerate container");
						return;
					}
				};
				for (slot, child) in children {
					if guard.is_marked(child) {
						continue;
					}
					self.intercept(child, &nesting.child(child, slot), &guard.mark(child));
				}
			}
			SurfaceKind::External { type_chain } => {
				self.intercept_extracted(surface, nesting, type_chain);
			}
		}
	}

	/// Detaches engines at or below `surface` and unbinds their buffers.
	pub(crate) fn close(&mut self, surface: SurfaceId, nesting: &NestingInfo, guard: &TraversalGuard) {
		self.release_leaf(surface);

		if let Some(extracted) = self.extracted.remove(&surface) {
			for leaf in extracted {
				self.release_leaf(leaf);
			}
		}

		let kind = self.host.kind(surface);
		if !kind.is_container() {
			return;
		}
		let children = match self.children(surface, &kind) {
			Ok(children) => children,
			Err(error) => {
				tracing::warn!(%surface, kind = kind.as_str(), %error, "failed to enumerate container while closing");
				return;
			}
		};
		for (slot, child) in children {
			if guard.is_marked(child) {
				continue;
			}
			self.close(child, &nesting.child(child, slot), &guard.mark(child));
		}
	}

	fn intercept_plain(&mut self, surface: SurfaceId, nesting: &NestingInfo) {
		if self.interceptors.contains_key(&surface) {
			return;
		}
		match self.attach_engine(surface, nesting) {
			Ok(true) => tracing::debug!(%surface, nested = nesting.is_nested(), "intercepted surface"),
			Ok(false) => tracing::trace!(%surface, "surface has no viewer yet"),
			Err(error) => tracing::warn!(%surface, %error, "failed to intercept surface"),
		}
	}

	fn intercept_extracted(&mut self, surface: SurfaceId, nesting: &NestingInfo, type_chain: &[Arc<str>]) {
		if !self.config.extractors {
			return;
		}
		let mut leaves = Vec::new();
		for extractor in self.extractors.matching(type_chain) {
			match extractor.extract(surface, nesting) {
				Ok(found) => leaves.extend(found),
				Err(error) => tracing::warn!(%surface, %error, "extractor failed"),
			}
		}
		if leaves.is_empty() {
			return;
		}
		for &leaf in &leaves {
			self.intercept_plain(leaf, nesting);
			self.register(nesting, leaf, false);
		}
		self.extracted.insert(surface, leaves);
	}

	/// Returns `Ok(false)` when the surface has no viewer yet.
	fn attach_engine(&mut self, surface: SurfaceId, nesting: &NestingInfo) -> Result<bool, AttachError> {
		let Some(viewer) = self.host.source_viewer(surface)? else {
			return Ok(false);
		};
		let window = self.host.window(surface).ok_or(AttachError::NoWindow(surface))?;
		let service = self.services.ensure(window);
		let engine = self.factory.create(EngineContext {
			surface,
			viewer,
			nesting,
			service: &service,
		})?;

		let handlers = engine.handlers().clone();
		self.host.wire(viewer, &handlers)?;
		self.host.add_history_listener(Arc::clone(&handlers.caret_undo));
		if let Some(registrar) = self.registrar.as_mut() {
			registrar.register_editor(surface, engine.adaptor());
		}
		self.interceptors.insert(
			surface,
			Interception {
				engine,
				nesting: nesting.clone(),
				viewer,
			},
		);
		Ok(true)
	}

	/// Unwires the engine of `surface`, if any, and drops its live binding.
	fn release_leaf(&mut self, surface: SurfaceId) {
		if let Some(interception) = self.interceptors.remove(&surface) {
			self.detach_engine(surface, &interception);
			if let Some(registrar) = self.registrar.as_mut() {
				registrar.unregister_editor(surface);
			}
		}
		self.buffers.unbind_surface(surface);
	}

	fn detach_engine(&mut self, surface: SurfaceId, interception: &Interception) {
		let handlers = interception.engine.handlers();
		match self.host.source_viewer(surface) {
			Ok(Some(_)) => {
				if let Err(error) = self.host.unwire(interception.viewer, handlers) {
					tracing::warn!(%surface, %error, "failed to unwire engine listeners");
				}
			}
			Ok(None) => tracing::trace!(%surface, "viewer already torn down"),
			Err(error) => tracing::warn!(%surface, %error, "viewer lookup failed while closing"),
		}
		self.host.remove_history_listener(&handlers.caret_undo);
		tracing::debug!(%surface, "detached engine");
	}
}
