// Haze Engine Core Module
// Contains fundamental engine functionality and systems

pub mod config;
pub mod systems;
pub mod resources;

use bevy::prelude::*;

use config::*;
use systems::*;
use resources::*;

// Core plugin group
pub struct HazeCorePlugin {
    pub config: EngineConfig,
}

impl Plugin for HazeCorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .init_resource::<FrameClock>()
            .init_resource::<ViewParms>()
            .add_systems(Startup, setup_core_systems)
            .add_systems(PreUpdate, (sync_frame_clock, reset_view_parms));
    }
}

// Core systems
pub fn setup_core_systems(config: Res<EngineConfig>) {
    info!(
        "Setting up {} core systems (far clip {}, identity light {})",
        config.engine_name,
        config.rendering.far_clip,
        config.rendering.identity_light()
    );
}
