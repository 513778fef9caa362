/// Fog Transition Module
/// Per-frame blend of LAST towards TARGET into CURRENT

use super::definition::{FogDefinition, FogMode};
use super::registry::FogRegistry;

/// What a single tick did to CURRENT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FogTick {
    /// No transition in flight.
    Idle,
    /// Mid-transition at the given progress.
    Blended(f32),
    /// CURRENT was set to TARGET and the transition cleared.
    Settled,
}

/// Advances the active fog transition to `now_ms`.
///
/// Fogs using different equations cannot be blended, so a mode change snaps
/// straight to the target, as do zero-length windows. A LAST that was never
/// registered is blended from like any other fog.
pub fn advance(registry: &mut FogRegistry, now_ms: i32) -> FogTick {
    let target = *registry.target();
    let Some(window) = target.transition else {
        return FogTick::Idle;
    };
    let last = *registry.last();

    let snap = now_ms >= window.finish_ms
        || window.fade_ms() <= 0
        || last.mode != target.mode;

    if snap {
        let current = registry.current_mut();
        *current = target;
        current.transition = None;
        current.registered = true;
        registry.target_mut().transition = None;
        return FogTick::Settled;
    }

    let lerp_pos = window.lerp_pos(now_ms);
    *registry.current_mut() = FogDefinition::lerp(&last, &target, lerp_pos);
    FogTick::Blended(lerp_pos)
}

/// Pulls the far clip plane in to the end of an opaque distance fog. Never pushes it out.
pub fn clip_far_plane(current: &FogDefinition, z_far: f32) -> f32 {
    if current.registered && current.mode == FogMode::Linear && current.end < z_far {
        current.end
    } else {
        z_far
    }
}
