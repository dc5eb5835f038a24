//! Error types for host access, engine construction, navigation and config.
//!
//! Host and engine failures during attachment are logged and contained to the
//! surface that produced them. Only [`ActivateError`] ever reaches a caller.

use tether_primitives::{BufferId, EditorType, InputKey, SurfaceId, ViewRef};

/// Failure reported by the host adaptation layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
	/// A host accessor the adapter relies on is missing or not permitted.
	#[error("host accessor unavailable: {0}")]
	Unavailable(&'static str),
	/// The surface handle no longer refers to a live part.
	#[error("{0} is disposed")]
	Disposed(SurfaceId),
	/// The host declined the request.
	#[error("host refused: {0}")]
	Refused(String),
}

/// Failure raised by an interception engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
	#[error("engine construction failed: {0}")]
	Construction(String),
	#[error("mode change to '{mode}' failed: {reason}")]
	ModeChange { mode: &'static str, reason: String },
}

/// Reasons a plain surface ends up without an engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachError {
	#[error(transparent)]
	Host(#[from] HostError),
	#[error(transparent)]
	Engine(#[from] EngineError),
	#[error("{0} does not belong to any window")]
	NoWindow(SurfaceId),
}

/// Navigation to a buffer could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
	#[error("no buffer with id {0}")]
	UnknownBuffer(BufferId),
	#[error("failed to activate editor for reference {reference} (buffer {buffer})")]
	Realize {
		buffer: BufferId,
		reference: ViewRef,
		#[source]
		source: HostError,
	},
	#[error("failed to activate editor for input {input}, type {}", display_type(.editor_type))]
	Open {
		buffer: BufferId,
		input: InputKey,
		editor_type: Option<EditorType>,
		#[source]
		source: HostError,
	},
	#[error("failed to find inner editor for {input} in parent editor {container}")]
	InnerNotFound {
		buffer: BufferId,
		input: InputKey,
		container: SurfaceId,
	},
	#[error("failed to switch page of {container} for buffer {buffer}")]
	Page {
		buffer: BufferId,
		container: SurfaceId,
		#[source]
		source: HostError,
	},
}

/// Error returned by [`crate::InterceptorManager::activate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivateError {
	#[error(transparent)]
	Navigation(#[from] NavigationError),
	/// A record carries neither a reservation nor an input. Registration never
	/// produces such a record, so this indicates a bookkeeping bug.
	#[error("buffer {0} has no reservation and no editor input")]
	Inconsistent(BufferId),
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid config: {0}")]
	Parse(#[from] toml::de::Error),
}

fn display_type(editor_type: &Option<EditorType>) -> &str {
	editor_type.as_ref().map_or("<default>", EditorType::as_str)
}
