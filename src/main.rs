// Haze Engine - Main Entry Point
// id Tech 3 style fog compositing on top of Bevy

use bevy::prelude::*;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::window::{PresentMode, WindowMode};
use anyhow::Context;

// Import core engine module
mod core;
// Import rendering module
mod rendering;
// Import editor module
mod editor;

use crate::core::HazeCorePlugin;
use crate::core::config::EngineConfig;
use crate::rendering::HazeRenderingPlugin;
use crate::editor::HazeEditorPlugin;

const CONFIG_PATH: &str = "haze.ron";

// Main engine application
fn main() -> anyhow::Result<()> {
    let config = EngineConfig::load_or_default(CONFIG_PATH)
        .with_context(|| format!("loading {CONFIG_PATH}"))?;

    let exit = App::new()
        // Core plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: config.window.title.clone(),
                resolution: (config.window.width, config.window.height).into(),
                mode: WindowMode::Windowed,
                present_mode: if config.window.vsync { PresentMode::AutoVsync } else { PresentMode::AutoNoVsync },
                resizable: true,
                ..default()
            }),
            ..default()
        }).set(LogPlugin {
            level: config.logging_level.into(),
            filter: "wgpu=error,naga=warn".to_string(),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin::default())

        // Engine modules
        .add_plugins(HazeCorePlugin { config })
        .add_plugins(HazeRenderingPlugin)
        .add_plugins(HazeEditorPlugin)

        // Start the engine
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("engine exited with code {code}"),
    }
}
