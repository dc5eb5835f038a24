//! Seam to the interception engine.
//!
//! The engine itself (modal key handling, caret and selection feedback, undo
//! hooks) lives outside this crate. The manager only creates engines through an
//! [`EngineFactory`], wires their handler objects into the host and keeps them
//! alive for as long as their surface is open.

use std::any::Any;
use std::sync::Arc;

use tether_primitives::{SurfaceId, ViewerId};

use crate::error::EngineError;
use crate::nesting::NestingInfo;
use crate::service::BufferService;

/// Object handed through the manager without being inspected.
///
/// Host adapters downcast handlers to their own listener types.
pub type Opaque = Arc<dyn Any + Send + Sync>;

/// Listener objects an engine exposes for wiring.
#[derive(Clone)]
pub struct EngineHandlers {
	/// Prepended to the viewer's key listeners.
	pub key_interceptor: Opaque,
	/// Caret and mouse listener on the viewer widget.
	pub caret_position: Opaque,
	/// Operation history listener restoring caret position on undo.
	pub caret_undo: Opaque,
	/// Selection listener driving visual-mode feedback.
	pub selection_visual: Opaque,
}

impl std::fmt::Debug for EngineHandlers {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EngineHandlers").finish_non_exhaustive()
	}
}

/// One engine instance attached to one plain surface.
pub trait InterceptEngine {
	fn handlers(&self) -> &EngineHandlers;

	/// Editor adaptor forwarded to the [`EditorRegistrar`].
	fn adaptor(&self) -> Opaque;

	/// Whether the engine's configuration asks for normal mode whenever its
	/// surface is reactivated.
	fn start_normal_mode(&self) -> bool;

	fn clear_selection(&mut self);

	/// Switches to the default (non-insert) mode.
	fn enter_default_mode(&mut self) -> Result<(), EngineError>;
}

/// Inputs handed to [`EngineFactory::create`].
pub struct EngineContext<'a> {
	pub surface: SurfaceId,
	pub viewer: ViewerId,
	pub nesting: &'a NestingInfo,
	pub service: &'a BufferService,
}

pub trait EngineFactory {
	fn create(&mut self, cx: EngineContext<'_>) -> Result<Box<dyn InterceptEngine>, EngineError>;
}

/// Plugin-level collaborator tracking which editors carry an engine.
pub trait EditorRegistrar {
	fn register_editor(&mut self, surface: SurfaceId, adaptor: Opaque);

	fn unregister_editor(&mut self, surface: SurfaceId);
}
