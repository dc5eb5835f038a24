//! Buffer registration and identity resolution.

use tether_primitives::{BufferId, SurfaceId};

use super::InterceptorManager;
use crate::buffer::{BufferRecord, Placement};
use crate::engine::EngineFactory;
use crate::host::Host;
use crate::nesting::NestingInfo;

impl<H: Host, F: EngineFactory> InterceptorManager<H, F> {
	/// Assigns or recovers the buffer id of `surface`.
	///
	/// Idempotent per surface. Consumes the reservation of the surface's
	/// top-level reference, if one is still pending. An existing record for
	/// the input is repointed at `surface` when it has no live surface, or
	/// with `update_last_seen` when it was last seen elsewhere.
	pub(crate) fn register(
		&mut self,
		nesting: &NestingInfo,
		surface: SurfaceId,
		update_last_seen: bool,
	) -> Option<BufferId> {
		let Some(input) = self.host.input(surface) else {
			tracing::trace!(%surface, "surface has no input, skipping registration");
			return None;
		};
		let top = nesting.top_level_surface();

		let placement = if nesting.is_nested() {
			let Some(container) = self.host.input(top) else {
				tracing::trace!(%surface, top_level = %top, "container has no input, skipping registration");
				return None;
			};
			Some(Placement {
				container,
				path: nesting.path().clone(),
			})
		} else {
			None
		};

		let editor_type = self.host.editor_type(top);
		let window = self.host.window(surface);
		let reservation = self
			.host
			.reference_of(top)
			.and_then(|reference| self.buffers.take_reservation(reference));

		let existing = self
			.buffers
			.resolve(&input, surface, placement.as_ref())
			.and_then(|id| self.buffers.get_mut(id));
		if let Some(record) = existing {
			if let Some(mut reservation) = reservation {
				tracing::debug!(
					retired = %reservation.id(),
					kept = %record.id(),
					"reservation superseded by existing buffer"
				);
				record.absorb_windows(reservation.take_windows());
			}
			let unbound = record.last_seen().is_none();
			if unbound || (update_last_seen && record.last_seen() != Some(surface)) {
				tracing::trace!(buffer = %record.id(), %surface, nested = placement.is_some(), "buffer relocated");
				record.relocate(placement, editor_type, surface);
			}
			if let Some(window) = window {
				record.see_window(window);
			}
			return Some(record.id());
		}

		let id = match &reservation {
			Some(reservation) if placement.is_none() => reservation.id(),
			_ => self.buffers.mint(),
		};
		let mut record = BufferRecord::concrete(id, input, placement, editor_type, surface);
		if let Some(mut reservation) = reservation {
			record.absorb_windows(reservation.take_windows());
		}
		if let Some(window) = window {
			record.see_window(window);
		}
		tracing::debug!(buffer = %id, %surface, nested = nesting.is_nested(), "registered buffer");
		self.buffers.insert(record);
		Some(id)
	}
}
