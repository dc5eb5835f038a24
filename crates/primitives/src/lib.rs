//! Handle and identity types shared between host adapters and the manager.
//!
//! Host objects are never held directly. Every editor part, window and viewer
//! the host hands out is represented by an opaque numeric handle, and document
//! inputs are represented by a normalized [`InputKey`].

/// Opaque numeric handles for host objects.
pub mod ids;
/// Document input identity and container type tags.
pub mod input;
/// Classification of surfaces into plain, paged, aggregate and external.
pub mod kind;

pub use ids::{BufferId, SurfaceId, ViewRef, ViewerId, WindowId};
pub use input::{EditorType, InputKey, InputKeyError};
pub use kind::SurfaceKind;
