// Haze Engine Core Resources
// Per-frame view state shared between the simulation and the renderer

use bevy::prelude::*;

// Re-export config resources for convenience
pub use crate::core::config::EngineConfig;

/// Simulation time of the frame being built, in milliseconds.
#[derive(Debug, Clone, Copy, Resource, Default)]
pub struct FrameClock {
    pub now_ms: i32,
    pub frame_count: u64,
}

/// View parameters finalized before the projection matrix is built.
#[derive(Debug, Clone, Copy, Resource)]
pub struct ViewParms {
    pub z_far: f32,
}

impl Default for ViewParms {
    fn default() -> Self {
        Self { z_far: EngineConfig::default().rendering.far_clip }
    }
}
