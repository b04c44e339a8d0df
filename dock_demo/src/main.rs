//! Dock/undock demo
//!
//! Drives a window through a scripted sequence of operation mode changes using
//! the headless host and driver, then checks nothing leaked.
//!
//! ```text
//! dock_demo [script.toml|script.ron]
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use fixed_window::config::{Config, ConfigError};
use fixed_window::foundation::logging;
use fixed_window::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scripted mode switch
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduledMode {
    tick: u32,
    mode: OperationMode,
}

/// Demo run description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct DemoScript {
    window: WindowConfig,
    ticks: u32,
    mode_schedule: Vec<ScheduledMode>,
}

impl Default for DemoScript {
    fn default() -> Self {
        Self {
            window: WindowConfig::new("dock_demo").with_requested_size(800, 600),
            ticks: 8,
            mode_schedule: vec![
                ScheduledMode { tick: 2, mode: OperationMode::Docked },
                ScheduledMode { tick: 5, mode: OperationMode::Handheld },
                ScheduledMode { tick: 5, mode: OperationMode::Docked },
            ],
        }
    }
}

impl Config for DemoScript {}

#[derive(Error, Debug)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Leaked {displays} display(s), {surfaces} surface(s), {contexts} context(s)")]
    Leak {
        displays: usize,
        surfaces: usize,
        contexts: usize,
    },
}

/// Viewport that logs every size it is told about
struct LoggingViewport {
    label: &'static str,
    updates: u32,
}

impl Viewport for LoggingViewport {
    fn update_dimensions(&mut self, target: &dyn RenderTarget) {
        self.updates += 1;
        log::info!(
            "Viewport '{}' of '{}' now {}x{}",
            self.label,
            target.name(),
            target.width(),
            target.height()
        );
    }
}

fn run(script: &DemoScript) -> Result<(), DemoError> {
    let mut window = SurfaceLifecycleManager::new(HeadlessHost::new(), HeadlessDriver::new(), script.window.clone());
    let sender = window.mode_change_sender();
    window.host_mut().attach(sender);

    let scene = Rc::new(RefCell::new(LoggingViewport { label: "scene", updates: 0 }));
    let hud = Rc::new(RefCell::new(LoggingViewport { label: "hud", updates: 0 }));
    window.add_viewport(&scene);
    window.add_viewport(&hud);

    let config = &script.window;
    window.create(
        &config.name,
        config.requested_width,
        config.requested_height,
        config.fullscreen,
        &config.options,
    )?;
    log::info!("Window '{}' up at {}x{}", window.name(), window.width(), window.height());

    for tick in 0..script.ticks {
        for scheduled in script.mode_schedule.iter().filter(|s| s.tick == tick) {
            log::info!("Tick {tick}: host reports {:?}", scheduled.mode);
            window.host_mut().set_mode(scheduled.mode);
        }
        if window.pump_host_events() {
            log::info!("Tick {tick}: drawable is {}x{}", window.width(), window.height());
        }
    }

    // Rebuild once the way a suspend/resume cycle would
    window.create(&config.name, 0, 0, true, &MiscParams::new())?;
    window.destroy_surface();
    window.destroy_surface();

    log::info!(
        "Viewport updates: scene={}, hud={}",
        scene.borrow().updates,
        hud.borrow().updates
    );

    let driver = window.driver();
    let (displays, surfaces, contexts) = (driver.live_displays(), driver.live_surfaces(), driver.live_contexts());
    if displays + surfaces + contexts > 0 {
        return Err(DemoError::Leak { displays, surfaces, contexts });
    }
    Ok(())
}

fn load_script(path: Option<String>) -> Result<DemoScript, DemoError> {
    let script = match path {
        Some(path) => DemoScript::load_from_file(path)?,
        None => DemoScript::default(),
    };
    script.window.validate()?;
    Ok(script)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let script = load_script(std::env::args().nth(1))?;
    logging::init_with_level(&script.window.log_level);

    log::info!("Running dock demo for {} tick(s)", script.ticks);
    run(&script)?;
    log::info!("Dock demo finished cleanly");
    Ok(())
}
