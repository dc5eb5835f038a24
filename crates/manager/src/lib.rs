#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Surface tracking and interception management for a host workbench.
//!
//! The host exposes editor views as opaque handles that churn: the same
//! document can be closed and reopened under a new handle, nested inside a
//! tabbed or aggregate container, or known only as an unrealized reference.
//! This crate keeps the bookkeeping that sits between those handles and the
//! modal interception engine attached to every concrete text surface.
//!
//! # Main Types
//!
//! - [`InterceptorManager`] - receives [`HostEvent`]s, attaches engines and
//!   answers buffer queries
//! - [`NestingInfo`] - one node of the container tree below a top-level view
//! - [`BufferRecord`] - durable identity of a logical buffer
//! - [`BufferService`] - per-window current-buffer cursor
//!
//! # Architecture
//!
//! ```text
//! InterceptorManager
//! ├── top_levels: SurfaceId -> NestingInfo     // one tree per top-level view
//! ├── interceptors: SurfaceId -> Interception  // one engine per plain leaf
//! ├── buffers: BufferTable                     // identity arena
//! ├── services: WindowId -> BufferService      // current-buffer cursors
//! └── gate: ActivationGate                     // suppresses self-induced focus events
//! ```
//!
//! Everything runs on the host's UI thread. Host notifications are handled
//! one at a time; focus changes the manager drives itself are drained inline
//! with the activation gate closed.

/// Buffer identity records and the arena that owns them.
pub mod buffer;
/// Manager configuration loaded from TOML.
pub mod config;
/// Interception engine seam: factory, engine handle and plugin registrar.
pub mod engine;
/// Error types.
pub mod error;
/// Registry of extractors for container types the manager cannot traverse.
pub mod extract;
/// Scoped suppression of activation notifications.
pub mod gate;
/// Branch-local traversal guard.
pub mod guard;
/// Capability traits implemented by the host adaptation layer.
pub mod host;
mod manager;
/// Container nesting descriptors.
pub mod nesting;
/// Per-window buffer and tab services.
pub mod service;
#[cfg(test)]
mod testing;

pub use buffer::{BufferRecord, BufferTable, NavigationTarget, Placement};
pub use config::InterceptConfig;
pub use engine::{
	EditorRegistrar, EngineContext, EngineFactory, EngineHandlers, InterceptEngine, Opaque,
};
pub use error::{ActivateError, AttachError, ConfigError, EngineError, HostError, NavigationError};
pub use extract::{ExtractorRegistry, SurfaceExtractor};
pub use gate::ActivationGate;
pub use guard::TraversalGuard;
pub use host::{AggregateContainer, Host, HostEvent, PagedContainer, ViewerWiring, Workbench};
pub use manager::{Interception, InterceptorManager};
pub use nesting::NestingInfo;
pub use service::{BufferService, CurrentEditor, ServiceRegistry};
pub use tether_primitives::{
	BufferId, EditorType, InputKey, SurfaceId, SurfaceKind, ViewRef, ViewerId, WindowId,
};
