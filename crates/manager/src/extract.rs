//! Extractors for container types the manager cannot traverse natively.
//!
//! Plugins register an extractor against a container type name. A container
//! matches when that name appears anywhere in its type chain, so an extractor
//! registered for a base type also serves its subtypes.

use std::sync::Arc;

use tether_primitives::SurfaceId;

use crate::error::HostError;
use crate::nesting::NestingInfo;

/// Pulls plain surfaces out of one kind of container.
pub trait SurfaceExtractor {
	fn extract(&self, container: SurfaceId, nesting: &NestingInfo) -> Result<Vec<SurfaceId>, HostError>;
}

impl<F> SurfaceExtractor for F
where
	F: Fn(SurfaceId, &NestingInfo) -> Result<Vec<SurfaceId>, HostError>,
{
	fn extract(&self, container: SurfaceId, nesting: &NestingInfo) -> Result<Vec<SurfaceId>, HostError> {
		self(container, nesting)
	}
}

struct Entry {
	container_type: Arc<str>,
	extractor: Box<dyn SurfaceExtractor>,
}

#[derive(Default)]
pub struct ExtractorRegistry {
	entries: Vec<Entry>,
}

impl ExtractorRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(
		&mut self,
		container_type: impl Into<Arc<str>>,
		extractor: impl SurfaceExtractor + 'static,
	) {
		self.entries.push(Entry {
			container_type: container_type.into(),
			extractor: Box::new(extractor),
		});
	}

	/// Extractors applicable to a container with the given type chain, in
	/// registration order.
	pub fn matching<'a>(
		&'a self,
		type_chain: &'a [Arc<str>],
	) -> impl Iterator<Item = &'a dyn SurfaceExtractor> + 'a {
		self.entries
			.iter()
			.filter(|entry| type_chain.contains(&entry.container_type))
			.map(|entry| entry.extractor.as_ref())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl std::fmt::Debug for ExtractorRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list()
			.entries(self.entries.iter().map(|entry| &entry.container_type))
			.finish()
	}
}
