//! Scripted host and engine doubles shared by the manager tests.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use tether_primitives::{
	EditorType, InputKey, SurfaceId, SurfaceKind, ViewRef, ViewerId, WindowId,
};

use crate::config::InterceptConfig;
use crate::engine::{EditorRegistrar, EngineContext, EngineFactory, EngineHandlers, InterceptEngine, Opaque};
use crate::error::{EngineError, HostError};
use crate::host::{AggregateContainer, HostEvent, PagedContainer, ViewerWiring, Workbench};
use crate::manager::InterceptorManager;

pub(crate) const MAIN_WINDOW: WindowId = WindowId(1);

pub(crate) fn input(path: &str) -> InputKey {
	InputKey::parse(path).unwrap()
}

pub(crate) fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// One scripted surface.
#[derive(Debug, Clone)]
pub(crate) struct FakeSurface {
	pub kind: SurfaceKind,
	pub input: Option<InputKey>,
	pub editor_type: Option<EditorType>,
	pub window: Option<WindowId>,
	pub viewer: Option<ViewerId>,
	/// Paged containers: one slot per page, `None` for non-editor pages.
	pub pages: Vec<Option<SurfaceId>>,
	pub active_page: Option<usize>,
	/// Aggregate containers.
	pub inner: Vec<SurfaceId>,
	pub active_inner: Option<SurfaceId>,
	pub enumeration_fails: bool,
	pub viewer_fails: bool,
}

impl FakeSurface {
	fn new(kind: SurfaceKind, input: &str, editor_type: &str) -> Self {
		Self {
			kind,
			input: Some(self::input(input)),
			editor_type: Some(EditorType::new(editor_type)),
			window: Some(MAIN_WINDOW),
			viewer: None,
			pages: Vec::new(),
			active_page: None,
			inner: Vec::new(),
			active_inner: None,
			enumeration_fails: false,
			viewer_fails: false,
		}
	}
}

#[derive(Debug, Clone, Copy)]
struct Reference {
	surface: SurfaceId,
	realized: bool,
}

/// In-memory workbench that records every focus operation it is asked for.
#[derive(Debug, Default)]
pub(crate) struct FakeHost {
	surfaces: FxHashMap<SurfaceId, FakeSurface>,
	references: FxHashMap<ViewRef, Reference>,
	next_surface: u64,
	next_reference: u64,
	events: Vec<HostEvent>,
	failing_realize: FxHashSet<ViewRef>,
	failing_wire: FxHashSet<ViewerId>,
	/// Inputs `open_editor` can open when no editor shows them yet.
	openable: FxHashMap<InputKey, ViewRef>,
	dead_inputs: FxHashSet<InputKey>,
	pub activations: Vec<SurfaceId>,
	pub page_switches: Vec<(SurfaceId, SurfaceId)>,
	pub inner_activations: Vec<(SurfaceId, SurfaceId)>,
	pub opened: Vec<InputKey>,
	pub wired: FxHashMap<ViewerId, usize>,
	pub history_listeners: usize,
}

impl FakeHost {
	pub fn new() -> Self {
		Self::default()
	}

	fn add(&mut self, mut surface: FakeSurface) -> SurfaceId {
		self.next_surface += 1;
		let id = SurfaceId(self.next_surface);
		if surface.kind == SurfaceKind::Plain {
			surface.viewer = Some(ViewerId(id.0));
		}
		self.surfaces.insert(id, surface);
		id
	}

	pub fn plain(&mut self, input: &str) -> SurfaceId {
		self.add(FakeSurface::new(SurfaceKind::Plain, input, "text"))
	}

	pub fn paged(&mut self, input: &str, pages: &[SurfaceId]) -> SurfaceId {
		let mut surface = FakeSurface::new(SurfaceKind::Paged, input, "multipage");
		surface.pages = pages.iter().copied().map(Some).collect();
		surface.active_page = (!pages.is_empty()).then_some(0);
		self.add(surface)
	}

	pub fn aggregate(&mut self, input: &str, inner: &[SurfaceId]) -> SurfaceId {
		let mut surface = FakeSurface::new(SurfaceKind::Aggregate, input, "compare");
		surface.inner = inner.to_vec();
		surface.active_inner = inner.first().copied();
		self.add(surface)
	}

	pub fn external(&mut self, input: &str, type_chain: &[&str]) -> SurfaceId {
		let kind = SurfaceKind::external(type_chain.iter().copied());
		self.add(FakeSurface::new(kind, input, "form"))
	}

	pub fn surface_mut(&mut self, surface: SurfaceId) -> &mut FakeSurface {
		self.surfaces.get_mut(&surface).unwrap()
	}

	/// Top-level reference to an already realized view.
	pub fn open(&mut self, surface: SurfaceId) -> ViewRef {
		self.reference(surface, true)
	}

	/// Top-level reference the host has not realized yet.
	pub fn lazy(&mut self, surface: SurfaceId) -> ViewRef {
		self.reference(surface, false)
	}

	fn reference(&mut self, surface: SurfaceId, realized: bool) -> ViewRef {
		self.next_reference += 1;
		let reference = ViewRef(self.next_reference);
		self.references.insert(reference, Reference { surface, realized });
		reference
	}

	/// Lets `open_editor` open `input` by realizing `reference`.
	pub fn set_openable(&mut self, input: &str, reference: ViewRef) {
		self.openable.insert(self::input(input), reference);
	}

	pub fn fail_realize(&mut self, reference: ViewRef) {
		self.failing_realize.insert(reference);
	}

	pub fn fail_wire(&mut self, viewer: ViewerId) {
		self.failing_wire.insert(viewer);
	}

	/// Drops a reference as if its editor had been disposed.
	pub fn discard(&mut self, reference: ViewRef) {
		self.references.remove(&reference);
	}

	pub fn forget_input(&mut self, input: &str) {
		self.dead_inputs.insert(self::input(input));
	}

	pub fn reference_of_surface(&self, surface: SurfaceId) -> ViewRef {
		self.reference_of(surface).unwrap()
	}

	fn surface(&self, surface: SurfaceId) -> Option<&FakeSurface> {
		self.surfaces.get(&surface)
	}

	fn focus(&mut self, surface: SurfaceId) {
		self.activations.push(surface);
		if let Some(reference) = self.reference_of(surface) {
			self.events.push(HostEvent::Activated(reference));
		}
	}
}

impl Workbench for FakeHost {
	fn resolve(&self, reference: ViewRef) -> Option<SurfaceId> {
		self.references
			.get(&reference)
			.filter(|entry| entry.realized)
			.map(|entry| entry.surface)
	}

	fn realize(&mut self, reference: ViewRef) -> Result<SurfaceId, HostError> {
		if self.failing_realize.contains(&reference) {
			return Err(HostError::Refused(format!("cannot restore {reference}")));
		}
		let entry = self
			.references
			.get_mut(&reference)
			.ok_or(HostError::Unavailable("reference"))?;
		if !entry.realized {
			entry.realized = true;
			self.events.push(HostEvent::Opened(reference));
		}
		Ok(entry.surface)
	}

	fn reference_of(&self, surface: SurfaceId) -> Option<ViewRef> {
		self.references
			.iter()
			.filter(|(_, entry)| entry.surface == surface)
			.map(|(reference, _)| *reference)
			.min()
	}

	fn reference_type(&self, reference: ViewRef) -> Option<EditorType> {
		let entry = self.references.get(&reference)?;
		self.editor_type(entry.surface)
	}

	fn reference_window(&self, reference: ViewRef) -> Option<WindowId> {
		let entry = self.references.get(&reference)?;
		self.window(entry.surface)
	}

	fn kind(&self, surface: SurfaceId) -> SurfaceKind {
		self.surface(surface)
			.map_or(SurfaceKind::Plain, |surface| surface.kind.clone())
	}

	fn input(&self, surface: SurfaceId) -> Option<InputKey> {
		self.surface(surface)?.input.clone()
	}

	fn editor_type(&self, surface: SurfaceId) -> Option<EditorType> {
		self.surface(surface)?.editor_type.clone()
	}

	fn window(&self, surface: SurfaceId) -> Option<WindowId> {
		self.surface(surface)?.window
	}

	fn activate(&mut self, surface: SurfaceId) -> Result<(), HostError> {
		if !self.surfaces.contains_key(&surface) {
			return Err(HostError::Disposed(surface));
		}
		self.focus(surface);
		Ok(())
	}

	fn find_editors(&self, input: &InputKey, editor_type: Option<&EditorType>) -> Vec<ViewRef> {
		let mut found: Vec<ViewRef> = self
			.references
			.iter()
			.filter(|(_, entry)| entry.realized)
			.filter(|(_, entry)| self.input(entry.surface).as_ref() == Some(input))
			.filter(|(_, entry)| editor_type.is_none() || self.editor_type(entry.surface).as_ref() == editor_type)
			.map(|(reference, _)| *reference)
			.collect();
		found.sort();
		found
	}

	fn open_editor(
		&mut self,
		input: &InputKey,
		editor_type: Option<&EditorType>,
	) -> Result<SurfaceId, HostError> {
		self.opened.push(input.clone());
		if let Some(&reference) = self.find_editors(input, editor_type).first() {
			let surface = self.references[&reference].surface;
			self.focus(surface);
			return Ok(surface);
		}
		let reference = *self
			.openable
			.get(input)
			.ok_or_else(|| HostError::Refused(format!("no editor for {input}")))?;
		let surface = self.realize(reference)?;
		self.focus(surface);
		Ok(surface)
	}

	fn is_input_live(&self, input: &InputKey) -> bool {
		!self.dead_inputs.contains(input)
	}

	fn is_reference_live(&self, reference: ViewRef) -> bool {
		self.references.contains_key(&reference)
	}

	fn take_events(&mut self) -> Vec<HostEvent> {
		std::mem::take(&mut self.events)
	}
}

impl PagedContainer for FakeHost {
	fn page_count(&self, container: SurfaceId) -> Result<usize, HostError> {
		let surface = self.surface(container).ok_or(HostError::Disposed(container))?;
		if surface.enumeration_fails {
			return Err(HostError::Unavailable("page_count"));
		}
		Ok(surface.pages.len())
	}

	fn page_at(&self, container: SurfaceId, index: usize) -> Result<Option<SurfaceId>, HostError> {
		let surface = self.surface(container).ok_or(HostError::Disposed(container))?;
		Ok(surface.pages.get(index).copied().flatten())
	}

	fn active_page(&self, container: SurfaceId) -> Option<usize> {
		self.surface(container)?.active_page
	}

	fn find_pages(&self, container: SurfaceId, input: &InputKey) -> Vec<SurfaceId> {
		let Some(surface) = self.surface(container) else {
			return Vec::new();
		};
		surface
			.pages
			.iter()
			.flatten()
			.copied()
			.filter(|&page| self.input(page).as_ref() == Some(input))
			.collect()
	}

	fn set_active_page(&mut self, container: SurfaceId, page: SurfaceId) -> Result<(), HostError> {
		let surface = self
			.surfaces
			.get_mut(&container)
			.ok_or(HostError::Disposed(container))?;
		let index = surface
			.pages
			.iter()
			.position(|&slot| slot == Some(page))
			.ok_or_else(|| HostError::Refused(format!("{page} is not a page of {container}")))?;
		surface.active_page = Some(index);
		self.page_switches.push((container, page));
		self.events.push(HostEvent::PageChanged {
			provider: container,
			page,
		});
		Ok(())
	}
}

impl AggregateContainer for FakeHost {
	fn inner_surfaces(&self, container: SurfaceId) -> Vec<SurfaceId> {
		self.surface(container)
			.map(|surface| surface.inner.clone())
			.unwrap_or_default()
	}

	fn active_inner(&self, container: SurfaceId) -> Option<SurfaceId> {
		self.surface(container)?.active_inner
	}

	fn activate_inner(&mut self, container: SurfaceId, inner: SurfaceId) -> Result<(), HostError> {
		let surface = self
			.surfaces
			.get_mut(&container)
			.ok_or(HostError::Disposed(container))?;
		surface.active_inner = Some(inner);
		self.inner_activations.push((container, inner));
		Ok(())
	}
}

impl ViewerWiring for FakeHost {
	fn source_viewer(&self, surface: SurfaceId) -> Result<Option<ViewerId>, HostError> {
		let Some(entry) = self.surface(surface) else {
			return Ok(None);
		};
		if entry.viewer_fails {
			return Err(HostError::Disposed(surface));
		}
		Ok(entry.viewer)
	}

	fn wire(&mut self, viewer: ViewerId, _handlers: &EngineHandlers) -> Result<(), HostError> {
		if self.failing_wire.contains(&viewer) {
			return Err(HostError::Refused(format!("viewer {} rejected listeners", viewer.0)));
		}
		*self.wired.entry(viewer).or_default() += 1;
		Ok(())
	}

	fn unwire(&mut self, viewer: ViewerId, _handlers: &EngineHandlers) -> Result<(), HostError> {
		match self.wired.get_mut(&viewer) {
			Some(count) if *count > 1 => *count -= 1,
			Some(_) => {
				self.wired.remove(&viewer);
			}
			None => return Err(HostError::Refused("viewer was never wired".to_string())),
		}
		Ok(())
	}

	fn add_history_listener(&mut self, _listener: Opaque) {
		self.history_listeners += 1;
	}

	fn remove_history_listener(&mut self, _listener: &Opaque) {
		self.history_listeners = self.history_listeners.saturating_sub(1);
	}
}

#[derive(Debug, Default)]
pub(crate) struct LogState {
	pub created: Vec<SurfaceId>,
	pub cleared: Vec<SurfaceId>,
	pub mode_resets: Vec<SurfaceId>,
	pub registered: Vec<SurfaceId>,
	pub unregistered: Vec<SurfaceId>,
	/// Window of the service each engine was created with.
	pub services: Vec<WindowId>,
}

/// Shared record of what engines and the registrar were asked to do.
#[derive(Debug, Default, Clone)]
pub(crate) struct EngineLog(Arc<Mutex<LogState>>);

impl EngineLog {
	pub fn created(&self) -> Vec<SurfaceId> {
		self.0.lock().created.clone()
	}

	pub fn cleared(&self) -> Vec<SurfaceId> {
		self.0.lock().cleared.clone()
	}

	pub fn mode_resets(&self) -> Vec<SurfaceId> {
		self.0.lock().mode_resets.clone()
	}

	pub fn registered(&self) -> Vec<SurfaceId> {
		self.0.lock().registered.clone()
	}

	pub fn unregistered(&self) -> Vec<SurfaceId> {
		self.0.lock().unregistered.clone()
	}

	pub fn services(&self) -> Vec<WindowId> {
		self.0.lock().services.clone()
	}
}

struct FakeEngine {
	surface: SurfaceId,
	handlers: EngineHandlers,
	start_normal_mode: bool,
	log: EngineLog,
}

impl InterceptEngine for FakeEngine {
	fn handlers(&self) -> &EngineHandlers {
		&self.handlers
	}

	fn adaptor(&self) -> Opaque {
		Arc::new(self.surface)
	}

	fn start_normal_mode(&self) -> bool {
		self.start_normal_mode
	}

	fn clear_selection(&mut self) {
		self.log.0.lock().cleared.push(self.surface);
	}

	fn enter_default_mode(&mut self) -> Result<(), EngineError> {
		self.log.0.lock().mode_resets.push(self.surface);
		Ok(())
	}
}

#[derive(Debug, Default)]
pub(crate) struct FakeFactory {
	pub log: EngineLog,
	pub failing: FxHashSet<SurfaceId>,
	pub start_normal_mode: bool,
}

impl EngineFactory for FakeFactory {
	fn create(&mut self, cx: EngineContext<'_>) -> Result<Box<dyn InterceptEngine>, EngineError> {
		if self.failing.contains(&cx.surface) {
			return Err(EngineError::Construction(format!("no engine for {}", cx.surface)));
		}
		let mut log = self.log.0.lock();
		log.created.push(cx.surface);
		log.services.push(cx.service.window());
		drop(log);
		let handler = || -> Opaque { Arc::new(cx.viewer) };
		Ok(Box::new(FakeEngine {
			surface: cx.surface,
			handlers: EngineHandlers {
				key_interceptor: handler(),
				caret_position: handler(),
				caret_undo: handler(),
				selection_visual: handler(),
			},
			start_normal_mode: self.start_normal_mode,
			log: self.log.clone(),
		}))
	}
}

pub(crate) struct FakeRegistrar(EngineLog);

impl EditorRegistrar for FakeRegistrar {
	fn register_editor(&mut self, surface: SurfaceId, _adaptor: Opaque) {
		self.0.0.lock().registered.push(surface);
	}

	fn unregister_editor(&mut self, surface: SurfaceId) {
		self.0.0.lock().unregistered.push(surface);
	}
}

pub(crate) type TestManager = InterceptorManager<FakeHost, FakeFactory>;

/// Manager over `host` with default config, a registrar and a shared log.
pub(crate) fn manager(host: FakeHost) -> (TestManager, EngineLog) {
	manager_with(host, FakeFactory::default(), InterceptConfig::default())
}

pub(crate) fn manager_with(
	host: FakeHost,
	factory: FakeFactory,
	config: InterceptConfig,
) -> (TestManager, EngineLog) {
	init_tracing();
	let log = factory.log.clone();
	let manager = InterceptorManager::new(host, factory, config).with_registrar(FakeRegistrar(log.clone()));
	(manager, log)
}
