//! Buffer to focus.

use tether_primitives::{BufferId, EditorType, InputKey, SurfaceId, SurfaceKind, ViewRef};

use super::InterceptorManager;
use crate::buffer::NavigationTarget;
use crate::engine::EngineFactory;
use crate::error::{ActivateError, NavigationError};
use crate::guard::TraversalGuard;
use crate::host::Host;
use crate::nesting::NestingPath;

impl<H: Host, F: EngineFactory> InterceptorManager<H, F> {
	/// Brings buffer `id` to the foreground, opening whatever views it needs.
	///
	/// Notifications the host emits while doing so are handled before this
	/// returns. A nested buffer whose page is already selected only refreshes
	/// the window cursor.
	pub fn activate(&mut self, id: BufferId) -> Result<(), ActivateError> {
		let record = self
			.buffers
			.get(id)
			.ok_or(NavigationError::UnknownBuffer(id))?;
		let target = record.target().inspect_err(|error| {
			tracing::error!(buffer = %id, %error, "buffer record is inconsistent");
		})?;

		match target {
			NavigationTarget::Reserved(reference) => self.activate_reserved(id, reference)?,
			NavigationTarget::TopLevel { input, editor_type } => {
				self.host
					.open_editor(&input, editor_type.as_ref())
					.map_err(|source| NavigationError::Open {
						buffer: id,
						input: input.clone(),
						editor_type: editor_type.clone(),
						source,
					})?;
				self.dispatch_pending();
			}
			NavigationTarget::Nested {
				input,
				parent_input,
				path,
				editor_type,
			} => self.activate_nested(id, &input, &parent_input, &path, editor_type.as_ref())?,
		}
		Ok(())
	}

	fn activate_reserved(&mut self, id: BufferId, reference: ViewRef) -> Result<(), NavigationError> {
		let realize_error = |source| NavigationError::Realize {
			buffer: id,
			reference,
			source,
		};
		let surface = self.host.realize(reference).map_err(realize_error)?;
		self.dispatch_pending();
		self.host.activate(surface).map_err(realize_error)?;
		self.dispatch_pending();
		Ok(())
	}

	fn activate_nested(
		&mut self,
		id: BufferId,
		input: &InputKey,
		parent_input: &InputKey,
		path: &NestingPath,
		editor_type: Option<&EditorType>,
	) -> Result<(), NavigationError> {
		let slot = path.first().copied();
		let container = {
			let _suppressed = self.gate.suppress();
			let container = self.focus_container(id, parent_input, editor_type)?;
			self.dispatch_pending();
			container
		};

		let root = match self.top_levels.get(&container).cloned() {
			Some(root) => root,
			None => self.open_top_level(container),
		};

		match self.host.kind(container) {
			SurfaceKind::Paged => {
				let Some(page) = self.page_showing(container, input, slot) else {
					return Err(NavigationError::InnerNotFound {
						buffer: id,
						input: input.clone(),
						container,
					});
				};
				if self.active_page_surface(container) == Some(page) {
					tracing::trace!(buffer = %id, %page, "page already selected");
					if let Some(child) = self.child_descriptor(&root, page) {
						self.set_current(&child, page);
					}
					return Ok(());
				}
				self.host
					.set_active_page(container, page)
					.map_err(|source| NavigationError::Page {
						buffer: id,
						container,
						source,
					})?;
				self.dispatch_pending();
			}
			SurfaceKind::Aggregate => {
				let inner = self.inner_showing(container, input, slot);
				let Some(inner) = inner else {
					tracing::debug!(buffer = %id, %input, %container, "no inner editor shows buffer");
					return Ok(());
				};
				self.host
					.activate_inner(container, inner)
					.map_err(|source| NavigationError::Page {
						buffer: id,
						container,
						source,
					})?;
				self.dispatch_pending();
				let Some(child) = self.child_descriptor(&root, inner) else {
					return Ok(());
				};
				self.activated(inner, &child, &TraversalGuard::new(inner));
				self.set_current(&child, inner);
			}
			kind @ (SurfaceKind::Plain | SurfaceKind::External { .. }) => {
				tracing::debug!(buffer = %id, %container, kind = kind.as_str(), "parent editor is not a container");
			}
		}
		Ok(())
	}

	/// Focuses the top-level view showing `parent_input`, reusing an open one.
	fn focus_container(
		&mut self,
		id: BufferId,
		parent_input: &InputKey,
		editor_type: Option<&EditorType>,
	) -> Result<SurfaceId, NavigationError> {
		let open_error = |source| NavigationError::Open {
			buffer: id,
			input: parent_input.clone(),
			editor_type: editor_type.cloned(),
			source,
		};
		let existing = self.host.find_editors(parent_input, editor_type).into_iter().next();
		match existing {
			Some(reference) => {
				let surface = self.host.realize(reference).map_err(open_error)?;
				self.host.activate(surface).map_err(open_error)?;
				Ok(surface)
			}
			None => self.host.open_editor(parent_input, editor_type).map_err(open_error),
		}
	}

	fn active_page_surface(&self, container: SurfaceId) -> Option<SurfaceId> {
		let index = self.host.active_page(container)?;
		self.host.page_at(container, index).ok().flatten()
	}

	/// The page showing `input`, preferring the one at `slot`.
	fn page_showing(&self, container: SurfaceId, input: &InputKey, slot: Option<usize>) -> Option<SurfaceId> {
		let at_slot = slot
			.and_then(|slot| self.host.page_at(container, slot).ok().flatten())
			.filter(|&page| self.shows(page, input));
		at_slot.or_else(|| self.host.find_pages(container, input).first().copied())
	}

	/// The inner surface showing `input`, preferring the one at `slot`.
	fn inner_showing(&self, container: SurfaceId, input: &InputKey, slot: Option<usize>) -> Option<SurfaceId> {
		let inner = self.host.inner_surfaces(container);
		let at_slot = slot
			.and_then(|slot| inner.get(slot).copied())
			.filter(|&surface| self.shows(surface, input));
		at_slot.or_else(|| inner.into_iter().find(|&surface| self.shows(surface, input)))
	}

	fn shows(&self, surface: SurfaceId, input: &InputKey) -> bool {
		self.host.input(surface).as_ref() == Some(input)
	}
}
