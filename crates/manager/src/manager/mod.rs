//! The interceptor manager.
//!
//! [`InterceptorManager`] is driven by [`HostEvent`]s. The implementation is
//! split by concern:
//!
//! - `attach`: traversal on open/close, engine wiring
//! - `register`: buffer id assignment and recovery
//! - `activation`: current-buffer synchronization on focus
//! - `navigate`: buffer to focus
//! - `events`: notification dispatch
//!
//! [`HostEvent`]: crate::host::HostEvent

mod activation;
mod attach;
mod events;
mod navigate;
mod register;

use rustc_hash::FxHashMap;
use tether_primitives::{
	BufferId, InputKey, SurfaceId, SurfaceKind, ViewRef, ViewerId, WindowId,
};

use crate::buffer::{BufferRecord, BufferTable};
use crate::config::InterceptConfig;
use crate::engine::{EditorRegistrar, EngineFactory, InterceptEngine};
use crate::error::HostError;
use crate::extract::ExtractorRegistry;
use crate::gate::ActivationGate;
use crate::guard::TraversalGuard;
use crate::host::Host;
use crate::nesting::NestingInfo;
use crate::service::{BufferService, ServiceRegistry};

/// An engine attached to one plain surface.
pub struct Interception {
	engine: Box<dyn InterceptEngine>,
	nesting: NestingInfo,
	viewer: ViewerId,
}

impl Interception {
	pub fn engine(&self) -> &dyn InterceptEngine {
		self.engine.as_ref()
	}

	pub fn nesting(&self) -> &NestingInfo {
		&self.nesting
	}

	pub fn viewer(&self) -> ViewerId {
		self.viewer
	}
}

impl std::fmt::Debug for Interception {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Interception")
			.field("nesting", &self.nesting)
			.field("viewer", &self.viewer)
			.finish_non_exhaustive()
	}
}

/// Tracks surfaces, attaches engines and owns buffer identity.
pub struct InterceptorManager<H, F> {
	host: H,
	factory: F,
	registrar: Option<Box<dyn EditorRegistrar>>,
	extractors: ExtractorRegistry,
	config: InterceptConfig,
	/// One buffer service per window.
	services: ServiceRegistry,
	/// Engines by plain surface.
	interceptors: FxHashMap<SurfaceId, Interception>,
	/// Nesting roots by top-level surface.
	top_levels: FxHashMap<SurfaceId, NestingInfo>,
	/// Surfaces pulled out of external containers, so closing the container
	/// can detach them.
	extracted: FxHashMap<SurfaceId, Vec<SurfaceId>>,
	gate: ActivationGate,
	buffers: BufferTable,
}

impl<H: Host, F: EngineFactory> InterceptorManager<H, F> {
	pub fn new(host: H, factory: F, config: InterceptConfig) -> Self {
		Self {
			host,
			factory,
			registrar: None,
			extractors: ExtractorRegistry::new(),
			config,
			services: ServiceRegistry::default(),
			interceptors: FxHashMap::default(),
			top_levels: FxHashMap::default(),
			extracted: FxHashMap::default(),
			gate: ActivationGate::new(),
			buffers: BufferTable::new(),
		}
	}

	/// Installs the collaborator notified whenever an engine is attached or
	/// its surface closes.
	#[must_use]
	pub fn with_registrar(mut self, registrar: impl EditorRegistrar + 'static) -> Self {
		self.registrar = Some(Box::new(registrar));
		self
	}

	pub fn extractors_mut(&mut self) -> &mut ExtractorRegistry {
		&mut self.extractors
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	pub fn factory(&self) -> &F {
		&self.factory
	}

	pub fn config(&self) -> &InterceptConfig {
		&self.config
	}

	/// Toggles interception globally without reloading configuration.
	pub fn set_enabled(&mut self, enabled: bool) {
		self.config.enabled = enabled;
	}

	pub fn gate(&self) -> &ActivationGate {
		&self.gate
	}

	pub fn interception(&self, surface: SurfaceId) -> Option<&Interception> {
		self.interceptors.get(&surface)
	}

	pub fn interceptors(&self) -> impl Iterator<Item = (SurfaceId, &Interception)> {
		self.interceptors
			.iter()
			.map(|(surface, interception)| (*surface, interception))
	}

	pub fn is_intercepted(&self, surface: SurfaceId) -> bool {
		self.interceptors.contains_key(&surface)
	}

	/// Nesting root of an open top-level view.
	pub fn top_level(&self, surface: SurfaceId) -> Option<&NestingInfo> {
		self.top_levels.get(&surface)
	}

	pub fn service(&self, window: WindowId) -> Option<&BufferService> {
		self.services.get(window)
	}

	/// Buffer showing `input`, lowest id first when siblings of one container
	/// show it separately.
	pub fn buffer(&self, input: &InputKey) -> Option<&BufferRecord> {
		self.buffers.find_input(input)
	}

	pub fn buffer_by_id(&self, id: BufferId) -> Option<&BufferRecord> {
		self.buffers.get(id)
	}

	/// All known buffers, reservations included, by ascending id.
	pub fn buffers(&self) -> impl Iterator<Item = &BufferRecord> {
		self.buffers.records()
	}

	pub fn buffer_table(&self) -> &BufferTable {
		&self.buffers
	}

	/// Reserves a buffer id for a top-level reference the host knows about
	/// but may not have realized yet.
	///
	/// A reference whose view is already open and registered returns the id
	/// of its existing record instead.
	pub fn reserve(&mut self, reference: ViewRef) -> BufferId {
		if let Some(existing) = self.registered_top_level(reference) {
			return existing;
		}
		let editor_type = self.host.reference_type(reference);
		let window = self.host.reference_window(reference);
		let id = self.buffers.reserve(reference, editor_type, window);
		tracing::trace!(%reference, buffer = %id, "reserved buffer id");
		id
	}

	/// Drops records the host no longer refers to.
	pub fn sweep(&mut self) -> usize {
		let host = &self.host;
		let dropped = self.buffers.retain(|record| match (record.reference(), record.input()) {
			(Some(reference), _) => host.is_reference_live(reference),
			(None, Some(input)) => host.is_input_live(input),
			(None, None) => false,
		});
		if dropped > 0 {
			tracing::debug!(dropped, "swept unreachable buffers");
		}
		dropped
	}

	fn registered_top_level(&self, reference: ViewRef) -> Option<BufferId> {
		let surface = self.host.resolve(reference)?;
		if !self.top_levels.contains_key(&surface) {
			return None;
		}
		let input = self.host.input(surface)?;
		self.buffers.resolve(&input, surface, None)
	}

	/// Children of a paged or aggregate container with their slot index.
	fn children(
		&self,
		container: SurfaceId,
		kind: &SurfaceKind,
	) -> Result<Vec<(usize, SurfaceId)>, HostError> {
		match kind {
			SurfaceKind::Paged => {
				let count = self.host.page_count(container)?;
				let mut pages = Vec::with_capacity(count);
				for index in 0..count {
					if let Some(page) = self.host.page_at(container, index)? {
						pages.push((index, page));
					}
				}
				Ok(pages)
			}
			SurfaceKind::Aggregate => Ok(self
				.host
				.inner_surfaces(container)
				.into_iter()
				.enumerate()
				.collect()),
			SurfaceKind::Plain | SurfaceKind::External { .. } => Ok(Vec::new()),
		}
	}

	/// Descriptor for `child` below `nesting`, looking up its slot in the
	/// container when the child has not been traversed yet.
	///
	/// `None` when the container does not list `child`.
	fn child_descriptor(&self, nesting: &NestingInfo, child: SurfaceId) -> Option<NestingInfo> {
		if let Some(existing) = nesting.get_child(child) {
			return Some(existing);
		}
		let container = nesting.surface();
		let kind = self.host.kind(container);
		let children = match self.children(container, &kind) {
			Ok(children) => children,
			Err(error) => {
				tracing::warn!(%container, %child, %error, "failed to locate child slot");
				return None;
			}
		};
		let Some(slot) = children
			.into_iter()
			.find_map(|(slot, surface)| (surface == child).then_some(slot))
		else {
			tracing::debug!(%container, %child, "container does not list child");
			return None;
		};
		Some(nesting.child(child, slot))
	}

	/// Tracks a newly opened top-level surface and intercepts everything below it.
	fn open_top_level(&mut self, surface: SurfaceId) -> NestingInfo {
		let root = NestingInfo::root(surface, &self.host.kind(surface));
		self.top_levels.insert(surface, root.clone());
		self.intercept(surface, &root, &TraversalGuard::new(surface));
		root
	}
}
