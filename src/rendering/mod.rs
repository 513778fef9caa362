/// Haze Engine 3D Rendering Module
/// Contains the view camera, demo scene and the fog subsystem

pub mod scene;
pub mod camera;
pub mod fog;

use bevy::prelude::*;
use scene::*;
use camera::*;
use fog::{FogPlugin, FogSystems};

pub struct HazeRenderingPlugin;

impl Plugin for HazeRenderingPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_plugins(FogPlugin)

            // Add scene systems
            .add_systems(Startup, setup_3d_scene)
            .add_systems(Update, sync_sky_dome_to_camera)

            // Add camera systems
            .add_systems(Startup, setup_camera)
            .add_systems(Update, apply_frame_fog.in_set(FogSystems::Apply));
    }
}
