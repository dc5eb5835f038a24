use std::collections::BTreeSet;

use tether_primitives::{BufferId, EditorType, InputKey, SurfaceId, ViewRef, WindowId};

use super::Placement;
use crate::error::ActivateError;
use crate::nesting::NestingPath;

/// Durable identity of one logical buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferRecord {
	id: BufferId,
	/// Set while the record is a reservation for an unrealized view.
	reference: Option<ViewRef>,
	input: Option<InputKey>,
	/// Container and slot, for nested buffers.
	placement: Option<Placement>,
	editor_type: Option<EditorType>,
	/// Last surface that displayed this buffer. A handle only; it may be closed.
	last_seen: Option<SurfaceId>,
	seen_windows: BTreeSet<WindowId>,
}

/// Where [`crate::InterceptorManager::activate`] has to go for a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
	Reserved(ViewRef),
	TopLevel {
		input: InputKey,
		editor_type: Option<EditorType>,
	},
	Nested {
		input: InputKey,
		parent_input: InputKey,
		path: NestingPath,
		editor_type: Option<EditorType>,
	},
}

impl BufferRecord {
	pub(crate) fn reserved(
		id: BufferId,
		reference: ViewRef,
		editor_type: Option<EditorType>,
		window: Option<WindowId>,
	) -> Self {
		Self {
			id,
			reference: Some(reference),
			input: None,
			placement: None,
			editor_type,
			last_seen: None,
			seen_windows: window.into_iter().collect(),
		}
	}

	pub(crate) fn concrete(
		id: BufferId,
		input: InputKey,
		placement: Option<Placement>,
		editor_type: Option<EditorType>,
		surface: SurfaceId,
	) -> Self {
		Self {
			id,
			reference: None,
			input: Some(input),
			placement,
			editor_type,
			last_seen: Some(surface),
			seen_windows: BTreeSet::new(),
		}
	}

	pub fn id(&self) -> BufferId {
		self.id
	}

	pub fn reference(&self) -> Option<ViewRef> {
		self.reference
	}

	pub fn input(&self) -> Option<&InputKey> {
		self.input.as_ref()
	}

	/// Input of the top-level container, for nested buffers.
	pub fn parent_input(&self) -> Option<&InputKey> {
		self.placement.as_ref().map(|placement| &placement.container)
	}

	pub fn placement(&self) -> Option<&Placement> {
		self.placement.as_ref()
	}

	pub fn editor_type(&self) -> Option<&EditorType> {
		self.editor_type.as_ref()
	}

	pub fn last_seen(&self) -> Option<SurfaceId> {
		self.last_seen
	}

	pub fn seen_windows(&self) -> &BTreeSet<WindowId> {
		&self.seen_windows
	}

	pub fn is_reserved(&self) -> bool {
		self.reference.is_some()
	}

	pub fn is_nested(&self) -> bool {
		self.placement.is_some()
	}

	/// Whether the record is live in another surface of the container
	/// `placement` points into.
	pub(crate) fn bound_to_sibling(&self, surface: SurfaceId, placement: Option<&Placement>) -> bool {
		match (self.last_seen, placement, &self.placement) {
			(Some(seen), Some(ours), Some(theirs)) => seen != surface && ours.container == theirs.container,
			_ => false,
		}
	}

	/// Resolves how to bring this buffer to the foreground.
	///
	/// A record with neither a reservation nor an input cannot be produced by
	/// registration and is reported as [`ActivateError::Inconsistent`].
	pub fn target(&self) -> Result<NavigationTarget, ActivateError> {
		match (&self.reference, &self.input, &self.placement) {
			(Some(reference), _, _) => Ok(NavigationTarget::Reserved(*reference)),
			(None, Some(input), None) => Ok(NavigationTarget::TopLevel {
				input: input.clone(),
				editor_type: self.editor_type.clone(),
			}),
			(None, Some(input), Some(placement)) => Ok(NavigationTarget::Nested {
				input: input.clone(),
				parent_input: placement.container.clone(),
				path: placement.path.clone(),
				editor_type: self.editor_type.clone(),
			}),
			(None, None, _) => Err(ActivateError::Inconsistent(self.id)),
		}
	}

	/// Points the record at a new surface showing the same buffer.
	pub(crate) fn relocate(
		&mut self,
		placement: Option<Placement>,
		editor_type: Option<EditorType>,
		surface: SurfaceId,
	) {
		self.placement = placement;
		self.editor_type = editor_type;
		self.last_seen = Some(surface);
	}

	pub(crate) fn see_window(&mut self, window: WindowId) {
		self.seen_windows.insert(window);
	}

	pub(crate) fn absorb_windows(&mut self, windows: BTreeSet<WindowId>) {
		self.seen_windows.extend(windows);
	}

	pub(crate) fn take_windows(&mut self) -> BTreeSet<WindowId> {
		std::mem::take(&mut self.seen_windows)
	}

	/// Clears the live binding if `surface` is the one last seen.
	pub(crate) fn unbind(&mut self, surface: SurfaceId) -> bool {
		if self.last_seen == Some(surface) {
			self.last_seen = None;
			return true;
		}
		false
	}

	#[cfg(test)]
	pub(crate) fn blank(id: BufferId) -> Self {
		Self {
			id,
			reference: None,
			input: None,
			placement: None,
			editor_type: None,
			last_seen: None,
			seen_windows: BTreeSet::new(),
		}
	}
}
