// Haze Engine Core Systems
// Clock and view bookkeeping run at the start of every frame

use bevy::prelude::*;
use crate::core::resources::*;

/// Copies the app clock into the millisecond frame clock.
pub fn sync_frame_clock(
    mut clock: ResMut<FrameClock>,
    time: Res<Time>,
) {
    clock.now_ms = time.elapsed().as_millis().min(i32::MAX as u128) as i32;
    clock.frame_count += 1;
}

/// Restores the procedural far clip; fog may shorten it later in the frame.
pub fn reset_view_parms(
    mut view: ResMut<ViewParms>,
    config: Res<EngineConfig>,
) {
    view.z_far = config.rendering.far_clip;
}
