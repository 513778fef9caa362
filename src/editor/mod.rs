/// Haze Engine Editor Module
/// Developer overlay for inspecting and scripting fog at runtime

pub mod windows;
pub mod theme;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin};

use crate::rendering::fog::command::FogCommand;
use crate::rendering::fog::FogFrame;

use windows::*;
use theme::*;

/// Editor UI plugin
pub struct HazeEditorPlugin;

impl Plugin for HazeEditorPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<EditorSettings>()
            .init_resource::<FogConsoleState>()
            .add_systems(Startup, setup_editor)
            .add_systems(Update, toggle_fog_console)
            .add_systems(Update, update_editor_ui);
    }
}

/// Editor settings
#[derive(Resource)]
pub struct EditorSettings {
    pub theme: EditorTheme,
    pub toggle_key: KeyCode,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            theme: EditorTheme::default(),
            toggle_key: KeyCode::Backquote,
        }
    }
}

/// State of the fog console window.
#[derive(Resource)]
pub struct FogConsoleState {
    pub open: bool,
    pub input: String,
    pub history: Vec<ConsoleLine>,
}

impl Default for FogConsoleState {
    fn default() -> Self {
        Self {
            open: true,
            input: String::new(),
            history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleLine {
    Echo(String),
    Error(String),
}

const MAX_HISTORY: usize = 64;

impl FogConsoleState {
    /// Parses the pending input line and records the outcome in the history.
    pub fn submit(&mut self) -> Option<FogCommand> {
        let line = std::mem::take(&mut self.input);
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        self.history.push(ConsoleLine::Echo(line.to_string()));
        let result = match FogCommand::parse(line) {
            Ok(command) => Some(command),
            Err(err) => {
                self.history.push(ConsoleLine::Error(err.to_string()));
                None
            }
        };

        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
        result
    }
}

fn setup_editor() {
    info!("Setting up Haze Engine fog console");
}

fn toggle_fog_console(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    settings: Res<EditorSettings>,
    mut console: ResMut<FogConsoleState>,
) {
    if keyboard_input.just_pressed(settings.toggle_key) {
        console.open = !console.open;
    }
}

fn update_editor_ui(
    mut contexts: EguiContexts,
    settings: Res<EditorSettings>,
    frame: Res<FogFrame>,
    mut console: ResMut<FogConsoleState>,
    mut fog_commands: EventWriter<FogCommand>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    // Apply dark theme
    settings.theme.apply(ctx);

    if let Some(command) = show_fog_console(ctx, &mut console, &frame, &settings.theme) {
        fog_commands.send(command);
    }
}
