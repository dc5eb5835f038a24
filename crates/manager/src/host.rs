//! Capability traits the host adaptation layer implements.
//!
//! The manager never inspects host objects directly. Everything it needs to
//! know about a surface, and every focus change it requests, goes through the
//! narrow traits below. [`Host`] is the union of all of them.

use tether_primitives::{EditorType, InputKey, SurfaceId, SurfaceKind, ViewRef, ViewerId, WindowId};

use crate::engine::{EngineHandlers, Opaque};
use crate::error::HostError;

/// Lifecycle notification delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
	Opened(ViewRef),
	Closed(ViewRef),
	Activated(ViewRef),
	InputChanged(ViewRef),
	PageChanged {
		provider: SurfaceId,
		page: SurfaceId,
	},
	/// The host has dropped its last reference to a document input.
	InputReleased(InputKey),
	/// A view reference was discarded before it was ever realized.
	ReferenceReleased(ViewRef),
	/// A workbench window closed; its buffer service is dropped.
	WindowClosed(WindowId),
}

/// Workbench-level queries and focus operations.
///
/// Focus operations (`realize`, `activate`, `open_editor`) may cause the host
/// to emit notifications. Those are queued and handed out by
/// [`Workbench::take_events`] instead of re-entering the manager.
pub trait Workbench {
	/// Resolves a reference to its surface without forcing it into existence.
	fn resolve(&self, reference: ViewRef) -> Option<SurfaceId>;

	/// Resolves a reference, creating the view if it has not been realized.
	fn realize(&mut self, reference: ViewRef) -> Result<SurfaceId, HostError>;

	/// Returns the workbench reference of a top-level surface.
	fn reference_of(&self, surface: SurfaceId) -> Option<ViewRef>;

	/// Editor type a reference was registered with.
	fn reference_type(&self, reference: ViewRef) -> Option<EditorType>;

	/// Window a reference lives in.
	fn reference_window(&self, reference: ViewRef) -> Option<WindowId>;

	fn kind(&self, surface: SurfaceId) -> SurfaceKind;

	/// Document input shown by a surface. Nested surfaces that are still
	/// initializing may not have one.
	fn input(&self, surface: SurfaceId) -> Option<InputKey>;

	/// Editor type of the site hosting the surface.
	fn editor_type(&self, surface: SurfaceId) -> Option<EditorType>;

	fn window(&self, surface: SurfaceId) -> Option<WindowId>;

	/// Brings a top-level surface to the front of its page.
	fn activate(&mut self, surface: SurfaceId) -> Result<(), HostError>;

	/// References of open editors matching both input and editor type.
	fn find_editors(&self, input: &InputKey, editor_type: Option<&EditorType>) -> Vec<ViewRef>;

	/// Opens and focuses an editor for `input`, reusing an open editor that
	/// matches both input and type.
	fn open_editor(
		&mut self,
		input: &InputKey,
		editor_type: Option<&EditorType>,
	) -> Result<SurfaceId, HostError>;

	/// Returns false once nothing in the host refers to `input` anymore.
	fn is_input_live(&self, input: &InputKey) -> bool;

	/// Returns false once a reference has been discarded.
	fn is_reference_live(&self, reference: ViewRef) -> bool;

	/// Drains notifications emitted by focus operations since the last call.
	fn take_events(&mut self) -> Vec<HostEvent>;
}

/// Access to tabbed multi-page containers.
pub trait PagedContainer {
	fn page_count(&self, container: SurfaceId) -> Result<usize, HostError>;

	/// Editor at page `index`. Pages that are not editors return `None`.
	fn page_at(&self, container: SurfaceId, index: usize) -> Result<Option<SurfaceId>, HostError>;

	/// Index of the selected page, if any.
	fn active_page(&self, container: SurfaceId) -> Option<usize>;

	/// Pages whose editor shows `input`.
	fn find_pages(&self, container: SurfaceId, input: &InputKey) -> Vec<SurfaceId>;

	fn set_active_page(&mut self, container: SurfaceId, page: SurfaceId) -> Result<(), HostError>;
}

/// Access to aggregate containers showing several inner editors.
pub trait AggregateContainer {
	fn inner_surfaces(&self, container: SurfaceId) -> Vec<SurfaceId>;

	fn active_inner(&self, container: SurfaceId) -> Option<SurfaceId>;

	fn activate_inner(&mut self, container: SurfaceId, inner: SurfaceId) -> Result<(), HostError>;
}

/// Listener wiring on text viewers and the global operation history.
pub trait ViewerWiring {
	/// Viewer behind a plain surface. `Ok(None)` while the surface is still
	/// initializing or after the host tore it down.
	fn source_viewer(&self, surface: SurfaceId) -> Result<Option<ViewerId>, HostError>;

	/// Installs the key interceptor ahead of other key listeners and adds the
	/// caret, mouse and selection listeners to the viewer and its widget.
	fn wire(&mut self, viewer: ViewerId, handlers: &EngineHandlers) -> Result<(), HostError>;

	fn unwire(&mut self, viewer: ViewerId, handlers: &EngineHandlers) -> Result<(), HostError>;

	fn add_history_listener(&mut self, listener: Opaque);

	fn remove_history_listener(&mut self, listener: &Opaque);
}

/// Everything the manager needs from the host.
pub trait Host: Workbench + PagedContainer + AggregateContainer + ViewerWiring {}

impl<T> Host for T where T: Workbench + PagedContainer + AggregateContainer + ViewerWiring {}
