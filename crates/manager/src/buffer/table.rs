use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tether_primitives::{BufferId, EditorType, InputKey, SurfaceId, ViewRef, WindowId};

use super::{BufferRecord, Placement};

/// Arena owning every buffer record.
///
/// Records are reclaimed only through [`BufferTable::release_input`],
/// [`BufferTable::release_reference`] or [`BufferTable::retain`]; closing a
/// surface never drops its record.
#[derive(Debug, Default)]
pub struct BufferTable {
	last_id: u64,
	records: BTreeMap<BufferId, BufferRecord>,
	/// Concrete records by input, ascending. More than one only for sibling
	/// surfaces of a container showing the same input.
	inputs: FxHashMap<InputKey, SmallVec<[BufferId; 1]>>,
	reserved: FxHashMap<ViewRef, BufferId>,
}

impl BufferTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocates the next buffer id.
	pub(crate) fn mint(&mut self) -> BufferId {
		self.last_id += 1;
		BufferId(self.last_id)
	}

	/// Reserves an id for a top-level reference. Idempotent per reference.
	pub fn reserve(
		&mut self,
		reference: ViewRef,
		editor_type: Option<EditorType>,
		window: Option<WindowId>,
	) -> BufferId {
		if let Some(&id) = self.reserved.get(&reference) {
			return id;
		}
		let id = self.mint();
		self.records
			.insert(id, BufferRecord::reserved(id, reference, editor_type, window));
		self.reserved.insert(reference, id);
		id
	}

	/// Removes and returns the reservation for `reference`, if any.
	pub(crate) fn take_reservation(&mut self, reference: ViewRef) -> Option<BufferRecord> {
		let id = self.reserved.remove(&reference)?;
		self.records.remove(&id)
	}

	pub fn reservation(&self, reference: ViewRef) -> Option<&BufferRecord> {
		self.reserved.get(&reference).and_then(|id| self.records.get(id))
	}

	pub fn get(&self, id: BufferId) -> Option<&BufferRecord> {
		self.records.get(&id)
	}

	pub(crate) fn get_mut(&mut self, id: BufferId) -> Option<&mut BufferRecord> {
		self.records.get_mut(&id)
	}

	/// Concrete records showing `input`, by ascending id.
	pub fn showing<'a>(&'a self, input: &InputKey) -> impl Iterator<Item = &'a BufferRecord> + use<'a> {
		self.inputs
			.get(input)
			.into_iter()
			.flatten()
			.filter_map(|id| self.records.get(id))
	}

	/// Finds the buffer for a document input, lowest id first.
	pub fn find_input(&self, input: &InputKey) -> Option<&BufferRecord> {
		self.showing(input).next()
	}

	/// Picks the record `surface` shares for `input`.
	///
	/// The record already bound to `surface` wins, then one last placed in the
	/// same slot of the same container. Otherwise any record showing `input`
	/// qualifies unless it is live in a sibling of the same container.
	pub(crate) fn resolve(
		&self,
		input: &InputKey,
		surface: SurfaceId,
		placement: Option<&Placement>,
	) -> Option<BufferId> {
		let candidates: SmallVec<[&BufferRecord; 2]> = self.showing(input).collect();
		candidates
			.iter()
			.find(|record| record.last_seen() == Some(surface))
			.or_else(|| {
				let placement = placement?;
				candidates
					.iter()
					.find(|record| record.placement() == Some(placement))
			})
			.or_else(|| {
				candidates
					.iter()
					.find(|record| !record.bound_to_sibling(surface, placement))
			})
			.map(|record| record.id())
	}

	pub(crate) fn insert(&mut self, record: BufferRecord) {
		let id = record.id();
		if let Some(input) = record.input() {
			let ids = self.inputs.entry(input.clone()).or_default();
			if let Err(at) = ids.binary_search(&id) {
				ids.insert(at, id);
			}
		}
		self.records.insert(id, record);
	}

	/// All records, reservations included, by ascending id.
	pub fn records(&self) -> impl Iterator<Item = &BufferRecord> {
		self.records.values()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Clears the live binding of every record last seen in `surface`.
	pub(crate) fn unbind_surface(&mut self, surface: SurfaceId) -> usize {
		let mut unbound = 0;
		for record in self.records.values_mut() {
			if record.unbind(surface) {
				unbound += 1;
			}
		}
		unbound
	}

	/// Drops every concrete record showing `input`, and every record nested
	/// in a container showing it.
	pub(crate) fn release_input(&mut self, input: &InputKey) -> usize {
		self.retain(|record| record.input() != Some(input) && record.parent_input() != Some(input))
	}

	/// Drops the reservation for `reference`.
	pub(crate) fn release_reference(&mut self, reference: ViewRef) -> bool {
		self.take_reservation(reference).is_some()
	}

	/// Keeps only records accepted by `keep`. Returns the number dropped.
	pub(crate) fn retain(&mut self, mut keep: impl FnMut(&BufferRecord) -> bool) -> usize {
		let before = self.records.len();
		self.records.retain(|_, record| keep(record));
		let records = &self.records;
		self.inputs.retain(|_, ids| {
			ids.retain(|id| records.contains_key(&*id));
			!ids.is_empty()
		});
		self.reserved.retain(|_, id| records.contains_key(id));
		before - self.records.len()
	}
}
