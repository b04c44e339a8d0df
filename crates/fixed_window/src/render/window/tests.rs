//! Lifecycle scenarios for the window manager against headless backends

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::core::config::{GpuApi, WindowConfig};
use crate::foundation::logging::{Level, MemorySink};

type Manager = SurfaceLifecycleManager<HeadlessHost, HeadlessDriver>;

fn manager() -> Manager {
    SurfaceLifecycleManager::new(HeadlessHost::new(), HeadlessDriver::new(), WindowConfig::default())
}

fn logged_manager() -> (Manager, MemorySink) {
    let sink = MemorySink::new();
    let manager = SurfaceLifecycleManager::with_logger(
        HeadlessHost::new(),
        HeadlessDriver::new(),
        WindowConfig::default(),
        sink.clone(),
    );
    (manager, sink)
}

fn assert_single_live_pair(manager: &Manager) {
    let driver = manager.driver();
    assert_eq!(driver.live_displays(), 1);
    assert_eq!(driver.live_surfaces(), 1);
    assert_eq!(driver.live_contexts(), 1);
}

fn assert_nothing_live(manager: &Manager) {
    let driver = manager.driver();
    assert_eq!(driver.live_displays(), 0);
    assert_eq!(driver.live_surfaces(), 0);
    assert_eq!(driver.live_contexts(), 0);
}

/// Viewport recording the size it pulls from the target
struct RecordingViewport {
    tag: &'static str,
    log: Rc<RefCell<Vec<(&'static str, u32, u32)>>>,
}

impl Viewport for RecordingViewport {
    fn update_dimensions(&mut self, target: &dyn RenderTarget) {
        self.log.borrow_mut().push((self.tag, target.width(), target.height()));
    }
}

/// Viewport that reports another mode change from inside its hook
struct ReentrantViewport {
    sender: ModeChangeSender,
    calls: usize,
}

impl Viewport for ReentrantViewport {
    fn update_dimensions(&mut self, _target: &dyn RenderTarget) {
        self.calls += 1;
        self.sender.post();
    }
}

#[test]
fn test_new_manager_is_closed_at_handheld_size() {
    let manager = manager();

    assert!(manager.is_closed());
    assert!(!manager.is_active());
    assert!(!manager.is_visible());
    assert_eq!((manager.width(), manager.height()), (1280, 720));
    assert!(!manager.surface().is_valid());
    assert_nothing_live(&manager);
}

#[test]
fn test_create_in_handheld_mode_ignores_requested_geometry() {
    let mut manager = manager();
    let mut params = MiscParams::new();
    params.insert("left".to_string(), "300".to_string());
    params.insert("gamma".to_string(), "true".to_string());

    manager.create("main", 800, 600, false, &params).unwrap();

    assert!(manager.is_active());
    assert!(manager.is_visible());
    assert!(!manager.is_closed());
    assert_eq!(manager.name(), "main");
    assert_eq!((manager.width(), manager.height()), (1280, 720));
    assert_eq!(manager.position(), (0, 0));
    assert!(manager.is_fullscreen());
    assert!(!manager.is_hw_gamma());
    assert!(!manager.is_external());
    assert_eq!(manager.crop(), Some(CropRect::from_origin(1280, 720)));
    assert_eq!(manager.host().window_dimensions(), Some((1280, 720)));
    assert_single_live_pair(&manager);
}

#[test]
fn test_create_binds_default_window_and_makes_context_current() {
    let mut manager = manager();
    manager.create("main", 0, 0, true, &MiscParams::new()).unwrap();

    let window = manager.native_window();
    assert!(window.is_valid());
    assert_eq!(manager.driver().surface_window(manager.surface()), Some(window));
    assert_eq!(manager.driver().current_context(), Some(manager.context()));
    let selected = manager.driver().config_attributes(manager.config()).unwrap();
    assert!(FramebufferAttributes::fixed(GpuApi::OpenGl).is_satisfied_by(&selected));
}

#[test]
fn test_create_when_docked_uses_docked_resolution() {
    let mut manager = SurfaceLifecycleManager::new(
        HeadlessHost::new().with_mode(OperationMode::Docked),
        HeadlessDriver::new(),
        WindowConfig::default(),
    );

    manager.create("main", 1280, 720, true, &MiscParams::new()).unwrap();

    assert_eq!((manager.width(), manager.height()), (1920, 1080));
    assert_eq!(manager.crop(), Some(CropRect::from_origin(1920, 1080)));
}

#[test]
fn test_repeated_create_keeps_exactly_one_live_pair() {
    let mut manager = manager();

    for _ in 0..5 {
        manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
        assert_single_live_pair(&manager);
    }
    assert_eq!(manager.driver().released_contexts().len(), 4);
}

#[test]
fn test_teardown_twice_is_harmless() {
    let (mut manager, sink) = logged_manager();
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();

    manager.destroy_surface();
    manager.driver_mut().clear_calls();
    manager.destroy_surface();

    assert!(manager.is_closed());
    assert!(!manager.is_active());
    assert!(!manager.is_visible());
    assert!(manager.driver().calls().is_empty());
    assert!(sink.messages_at(Level::Warn).is_empty());
    assert_nothing_live(&manager);
}

#[test]
fn test_teardown_n_times_matches_single_teardown() {
    let mut once = manager();
    once.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    once.destroy_surface();

    let mut many = manager();
    many.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    for _ in 0..10 {
        many.destroy_surface();
    }

    assert_eq!(once.driver().calls(), many.driver().calls());
    assert_eq!(
        (once.is_active(), once.is_visible(), once.is_closed(), once.width(), once.height()),
        (many.is_active(), many.is_visible(), many.is_closed(), many.width(), many.height())
    );
}

#[test]
fn test_teardown_order_and_resource_release() {
    let mut manager = manager();
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    let context = manager.context();
    manager.driver_mut().clear_calls();

    manager.destroy_surface();

    assert_eq!(
        manager.driver().calls(),
        &[
            DriverCall::MakeCurrent,
            DriverCall::ReleaseResources,
            DriverCall::DestroySurface,
            DriverCall::DestroyContext,
            DriverCall::TerminateDisplay,
        ]
    );
    assert_eq!(manager.driver().released_contexts(), &[context]);
    assert!(!manager.display().is_valid());
    assert!(!manager.context().is_valid());
    assert_eq!(manager.driver().current_context(), None);
}

#[test]
fn test_teardown_suppresses_driver_failures() {
    let (mut manager, sink) = logged_manager();
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    manager.driver_mut().fail_next(DriverCall::DestroySurface);

    manager.destroy_surface();

    assert!(manager.is_closed());
    assert!(!manager.surface().is_valid());
    assert_eq!(sink.messages_at(Level::Warn).len(), 1);
    assert_eq!(manager.driver().live_contexts(), 0);
    assert_eq!(manager.driver().live_displays(), 0);
}

#[test]
fn test_dock_transition_notifies_viewports_once_in_order() {
    let (mut manager, sink) = logged_manager();
    let log = Rc::new(RefCell::new(Vec::new()));
    let viewports: Vec<_> = ["scene", "hud", "debug"]
        .into_iter()
        .map(|tag| Rc::new(RefCell::new(RecordingViewport { tag, log: Rc::clone(&log) })))
        .collect();
    for viewport in &viewports {
        manager.add_viewport(viewport);
    }
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    let surface = manager.surface();
    log.borrow_mut().clear();

    manager.host_mut().dock();
    manager.handle_mode_change();

    assert_eq!((manager.width(), manager.height()), (1920, 1080));
    assert_eq!(manager.crop(), Some(CropRect::from_origin(1920, 1080)));
    assert_eq!(manager.host().last_crop(), Some(CropRect::from_origin(1920, 1080)));
    assert_eq!(
        *log.borrow(),
        vec![("scene", 1920, 1080), ("hud", 1920, 1080), ("debug", 1920, 1080)]
    );
    assert_eq!(manager.surface(), surface);
    assert_single_live_pair(&manager);
    assert!(sink.contains("Switched to docked mode."));
}

#[test]
fn test_mode_change_only_produces_known_resolutions() {
    let mut manager = manager();
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();

    for raw in [0, 1, 2, 1, 0x7F, 0, u32::MAX, 1] {
        manager.host_mut().set_raw_mode(raw);
        manager.handle_mode_change();
        let size = (manager.width(), manager.height());
        assert!(size == (1280, 720) || size == (1920, 1080), "raw {raw} gave {size:?}");
        assert_eq!(size == (1920, 1080), raw == OperationMode::RAW_DOCKED);
    }
}

#[test]
fn test_mode_change_while_closed_skips_crop() {
    let mut manager = manager();
    manager.host_mut().dock();

    manager.handle_mode_change();

    assert_eq!((manager.width(), manager.height()), (1920, 1080));
    assert_eq!(manager.crop(), None);
    assert_eq!(manager.host().crop_count(), 0);
    assert!(manager.is_closed());
}

#[test]
fn test_unsupported_operations_change_nothing() {
    let mut manager = manager();
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    let before = (
        manager.is_active(),
        manager.is_visible(),
        manager.is_closed(),
        manager.width(),
        manager.height(),
        manager.position(),
        manager.is_fullscreen(),
    );

    manager.reposition(100, 200);
    manager.resize(640, 480);
    manager.switch_full_screen(false);

    let after = (
        manager.is_active(),
        manager.is_visible(),
        manager.is_closed(),
        manager.width(),
        manager.height(),
        manager.position(),
        manager.is_fullscreen(),
    );
    assert_eq!(before, after);
}

#[test]
fn test_zero_matching_configs_leaves_manager_unchanged() {
    let mut manager = SurfaceLifecycleManager::new(
        HeadlessHost::new(),
        HeadlessDriver::with_configs(Vec::new()),
        WindowConfig::default(),
    );
    let window = manager.host_mut().default_window();

    let err = manager
        .notify_surface_created(window, ConfigHandle::INVALID)
        .unwrap_err();

    assert!(matches!(err, SurfaceError::ConfigSelection { .. }));
    assert!(manager.is_closed());
    assert!(!manager.is_active());
    assert!(!manager.native_window().is_valid());
    assert_eq!(manager.host().window_dimensions(), None);
    assert_eq!((manager.width(), manager.height()), (1280, 720));
    assert_nothing_live(&manager);
}

#[test]
fn test_zero_matching_configs_keeps_active_surface() {
    let mut manager = manager();
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    let (window, surface, context, display) = (
        manager.native_window(),
        manager.surface(),
        manager.context(),
        manager.display(),
    );
    manager.driver_mut().set_configs(Vec::new());

    let err = manager
        .notify_surface_created(window, ConfigHandle::INVALID)
        .unwrap_err();

    assert!(matches!(err, SurfaceError::ConfigSelection { .. }));
    assert!(manager.is_active());
    assert!(manager.is_visible());
    assert!(!manager.is_closed());
    assert_eq!(manager.native_window(), window);
    assert_eq!(manager.surface(), surface);
    assert_eq!(manager.context(), context);
    assert_eq!(manager.display(), display);
    assert_eq!(manager.driver().current_context(), Some(context));
    assert_single_live_pair(&manager);
}

#[test]
fn test_open_display_failure_on_reentry_keeps_active_surface() {
    let mut manager = manager();
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    let surface = manager.surface();
    let window = manager.native_window();
    manager.driver_mut().fail_next(DriverCall::OpenDisplay);

    let err = manager
        .notify_surface_created(window, ConfigHandle::INVALID)
        .unwrap_err();

    assert!(matches!(err, SurfaceError::DriverCall { call: DriverCall::OpenDisplay, .. }));
    assert!(manager.is_active());
    assert_eq!(manager.surface(), surface);
    assert_single_live_pair(&manager);
}

#[test]
fn test_api_mismatch_is_a_config_selection_failure() {
    let config = WindowConfig::default().with_gpu_api(GpuApi::OpenGlEs3);
    let mut manager = SurfaceLifecycleManager::new(
        HeadlessHost::new(),
        HeadlessDriver::with_configs(vec![FramebufferAttributes::fixed(GpuApi::OpenGl)]),
        config,
    );

    let err = manager.create("main", 0, 0, true, &MiscParams::new()).unwrap_err();
    assert!(matches!(err, SurfaceError::ConfigSelection { attributes } if attributes.renderable_type == RenderableType::OPENGL_ES3));
}

#[test]
fn test_driver_failure_during_bring_up_leaves_manager_closed() {
    for failing in [DriverCall::CreateSurface, DriverCall::CreateContext, DriverCall::MakeCurrent] {
        let (mut manager, sink) = logged_manager();
        manager.driver_mut().fail_next(failing);

        let err = manager.create("main", 800, 600, false, &MiscParams::new()).unwrap_err();

        assert!(matches!(err, SurfaceError::DriverCall { call, .. } if call == failing));
        assert!(manager.is_closed(), "{failing}");
        assert!(!manager.is_active());
        assert!(!manager.surface().is_valid());
        assert_nothing_live(&manager);
        assert!(!sink.messages_at(Level::Error).is_empty());

        manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
        assert_single_live_pair(&manager);
    }
}

#[test]
fn test_open_display_failure_is_reported() {
    let mut manager = manager();
    manager.driver_mut().fail_next(DriverCall::OpenDisplay);

    let err = manager.create("main", 800, 600, false, &MiscParams::new()).unwrap_err();

    assert!(matches!(err, SurfaceError::DriverCall { call: DriverCall::OpenDisplay, .. }));
    assert!(err.to_string().starts_with("open_display failed"));
    assert!(manager.is_closed());
}

#[test]
fn test_supplied_config_is_ignored() {
    let mut manager = manager();
    let window = manager.host_mut().default_window();

    manager
        .notify_surface_created(window, ConfigHandle::from_raw(0xDEAD))
        .unwrap();

    assert_ne!(manager.config(), ConfigHandle::from_raw(0xDEAD));
    assert!(manager.driver().config_attributes(manager.config()).is_some());
}

#[test]
fn test_bring_up_while_active_replaces_the_pair() {
    let mut manager = manager();
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    let first_surface = manager.surface();
    let window = manager.native_window();

    manager.notify_surface_created(window, ConfigHandle::INVALID).unwrap();

    assert_ne!(manager.surface(), first_surface);
    assert_single_live_pair(&manager);
}

#[test]
fn test_inbox_collapses_host_events_per_tick() {
    let mut manager = manager();
    let sender = manager.mode_change_sender();
    manager.host_mut().attach(sender);
    let log = Rc::new(RefCell::new(Vec::new()));
    let viewport = Rc::new(RefCell::new(RecordingViewport { tag: "scene", log: Rc::clone(&log) }));
    manager.add_viewport(&viewport);
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    log.borrow_mut().clear();

    assert!(!manager.pump_host_events());

    manager.host_mut().dock();
    manager.host_mut().undock();
    manager.host_mut().dock();
    assert_eq!((manager.width(), manager.height()), (1280, 720));

    assert!(manager.pump_host_events());
    assert!(!manager.pump_host_events());
    assert_eq!(*log.borrow(), vec![("scene", 1920, 1080)]);
}

#[test]
fn test_reentrant_post_from_viewport_is_deferred_to_next_tick() {
    let mut manager = manager();
    let viewport = Rc::new(RefCell::new(ReentrantViewport {
        sender: manager.mode_change_sender(),
        calls: 0,
    }));
    manager.add_viewport(&viewport);
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();
    assert_eq!(viewport.borrow().calls, 1);

    assert!(manager.pump_host_events());
    assert_eq!(viewport.borrow().calls, 2);
    assert!(manager.pump_host_events());
    assert_eq!(viewport.borrow().calls, 3);
}

#[test]
fn test_removed_and_dropped_viewports_are_not_notified() {
    let mut manager = manager();
    let log = Rc::new(RefCell::new(Vec::new()));
    let kept = Rc::new(RefCell::new(RecordingViewport { tag: "kept", log: Rc::clone(&log) }));
    let removed = Rc::new(RefCell::new(RecordingViewport { tag: "removed", log: Rc::clone(&log) }));
    let dropped = Rc::new(RefCell::new(RecordingViewport { tag: "dropped", log: Rc::clone(&log) }));
    manager.add_viewport(&kept);
    let removed_id = manager.add_viewport(&removed);
    manager.add_viewport(&dropped);

    assert!(manager.remove_viewport(removed_id));
    drop(dropped);
    manager.handle_mode_change();

    assert_eq!(*log.borrow(), vec![("kept", 1280, 720)]);
    assert_eq!(manager.viewport_count(), 1);
}

#[test]
fn test_handheld_transition_is_logged() {
    let (mut manager, sink) = logged_manager();
    manager.create("main", 800, 600, false, &MiscParams::new()).unwrap();

    assert_eq!(sink.messages_at(Level::Info), vec!["Switched to handheld mode.".to_string()]);
}
