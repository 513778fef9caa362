/// Global Fog Module
/// Scripted override of the world's outdoor fog with restore-to-baseline

use bevy::prelude::*;

/// Live parameters of the global fog as the renderer reads them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalFogParams {
    /// Unscaled RGB.
    pub color: Vec3,
    /// Light-scaled RGBA8, alpha always 255.
    pub color_int: u32,
    /// Distance at which the fog becomes fully opaque.
    pub depth_for_opaque: f32,
    /// Fog coordinate scale, the reciprocal of `depth_for_opaque` floored at 1.
    pub tc_scale: f32,
}

impl GlobalFogParams {
    fn from_vector(fog: Vec4, identity_light: f32) -> Self {
        let color = fog.truncate();
        Self {
            color,
            color_int: pack_color_bytes((color * identity_light).extend(1.0)),
            depth_for_opaque: fog.w,
            tc_scale: fog.w.max(1.0).recip(),
        }
    }

    fn as_vector(&self) -> Vec4 {
        self.color.extend(self.depth_for_opaque)
    }
}

/// Packs a normalized RGBA color into bytes, red in the lowest byte.
pub fn pack_color_bytes(color: Vec4) -> u32 {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    u32::from_le_bytes([byte(color.x), byte(color.y), byte(color.z), byte(color.w)])
}

/// In-flight fade of the global fog. Vectors are RGB plus depth-for-opaque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalFogTransition {
    pub start_ms: i32,
    pub end_ms: i32,
    pub start: Vec4,
    pub end: Vec4,
}

impl GlobalFogTransition {
    fn lerp_pos(&self, now_ms: i32) -> f32 {
        let fade = self.end_ms - self.start_ms;
        if fade == 0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) as f32 / fade as f32).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct GlobalFogOverride {
    live: GlobalFogParams,
    original: Vec4,
    transition: Option<GlobalFogTransition>,
}

impl GlobalFogOverride {
    /// Captures the map-authored baseline as given, so a restore returns it exactly.
    pub fn new(color: Vec3, depth_for_opaque: f32, identity_light: f32) -> Self {
        let original = color.extend(depth_for_opaque);
        Self {
            live: GlobalFogParams::from_vector(original, identity_light),
            original,
            transition: None,
        }
    }

    pub fn live(&self) -> &GlobalFogParams {
        &self.live
    }

    pub fn transition(&self) -> Option<&GlobalFogTransition> {
        self.transition.as_ref()
    }

    /// Overrides or restores the global fog, fading over `duration_ms` when positive.
    pub fn set_global_fog(
        &mut self,
        restore: bool,
        duration_ms: i32,
        color: Vec3,
        depth_for_opaque: f32,
        now_ms: i32,
        identity_light: f32,
    ) {
        let end = if restore {
            self.original
        } else {
            color.extend(depth_for_opaque.max(1.0))
        };

        if duration_ms > 0 {
            self.transition = Some(GlobalFogTransition {
                start_ms: now_ms,
                end_ms: now_ms.saturating_add(duration_ms),
                start: self.live.as_vector(),
                end,
            });
        } else {
            self.transition = None;
            self.live = GlobalFogParams::from_vector(end, identity_light);
        }
    }

    /// Advances the fade, snapping exactly to the end vector once it has elapsed.
    pub fn tick(&mut self, now_ms: i32, identity_light: f32) {
        let Some(transition) = self.transition else {
            return;
        };

        if now_ms < transition.end_ms {
            let fog = transition.start.lerp(transition.end, transition.lerp_pos(now_ms));
            self.live = GlobalFogParams::from_vector(fog, identity_light);
        } else {
            self.live = GlobalFogParams::from_vector(transition.end, identity_light);
            self.transition = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> GlobalFogOverride {
        GlobalFogOverride::new(Vec3::new(0.3, 0.4, 0.5), 4096.0, 1.0)
    }

    #[test]
    fn restore_round_trip_is_exact() {
        let mut fog = baseline();
        fog.set_global_fog(false, 0, Vec3::new(0.9, 0.0, 0.1), 256.0, 10, 1.0);
        assert_eq!(fog.live().color, Vec3::new(0.9, 0.0, 0.1));
        assert_eq!(fog.live().depth_for_opaque, 256.0);

        fog.set_global_fog(true, 0, Vec3::ZERO, 0.0, 10, 1.0);
        assert_eq!(fog.live().color, Vec3::new(0.3, 0.4, 0.5));
        assert_eq!(fog.live().depth_for_opaque, 4096.0);
        assert_eq!(fog.live().tc_scale, 1.0 / 4096.0);
        assert_eq!(fog.original, Vec4::new(0.3, 0.4, 0.5, 4096.0));
    }

    #[test]
    fn opaque_depth_is_floored() {
        let mut fog = baseline();
        fog.set_global_fog(false, 0, Vec3::ONE, 0.0, 0, 1.0);
        assert_eq!(fog.live().depth_for_opaque, 1.0);
        assert_eq!(fog.live().tc_scale, 1.0);
    }

    #[test]
    fn shallow_baseline_restores_exactly() {
        let mut fog = GlobalFogOverride::new(Vec3::splat(0.5), 0.25, 1.0);
        assert_eq!(fog.live().depth_for_opaque, 0.25);
        assert_eq!(fog.live().tc_scale, 1.0);

        fog.set_global_fog(false, 0, Vec3::ONE, 0.5, 0, 1.0);
        assert_eq!(fog.live().depth_for_opaque, 1.0);

        fog.set_global_fog(true, 0, Vec3::ZERO, 0.0, 0, 1.0);
        assert_eq!(fog.live().depth_for_opaque, 0.25);
        assert_eq!(fog.live().color, Vec3::splat(0.5));
        assert_eq!(fog.live().tc_scale, 1.0);
    }

    #[test]
    fn timed_fade_interpolates_then_snaps() {
        let mut fog = baseline();
        fog.set_global_fog(false, 1000, Vec3::new(0.3, 0.4, 1.5), 2048.0, 2000, 1.0);

        fog.tick(2000, 1.0);
        assert_eq!(fog.live().color, Vec3::new(0.3, 0.4, 0.5));

        fog.tick(2500, 1.0);
        assert!((fog.live().color.z - 1.0).abs() < 1e-5);
        assert!((fog.live().depth_for_opaque - 3072.0).abs() < 1e-3);
        assert!((fog.live().tc_scale - 1.0 / 3072.0).abs() < 1e-9);
        assert!(fog.transition().is_some());

        fog.tick(3000, 1.0);
        assert_eq!(fog.live().color, Vec3::new(0.3, 0.4, 1.5));
        assert_eq!(fog.live().depth_for_opaque, 2048.0);
        assert!(fog.transition().is_none());
    }

    #[test]
    fn timed_restore_fades_back_to_the_baseline() {
        let mut fog = baseline();
        fog.set_global_fog(false, 0, Vec3::ZERO, 100.0, 0, 1.0);
        fog.set_global_fog(true, 400, Vec3::ONE, 9999.0, 100, 1.0);

        fog.tick(300, 1.0);
        assert!((fog.live().depth_for_opaque - (100.0 + (4096.0 - 100.0) * 0.5)).abs() < 1e-2);

        fog.tick(500, 1.0);
        assert_eq!(fog.live().color, Vec3::new(0.3, 0.4, 0.5));
        assert_eq!(fog.live().depth_for_opaque, 4096.0);
    }

    #[test]
    fn snapping_cancels_a_running_fade() {
        let mut fog = baseline();
        fog.set_global_fog(false, 1000, Vec3::ONE, 50.0, 0, 1.0);
        fog.tick(500, 1.0);
        fog.set_global_fog(true, 0, Vec3::ZERO, 0.0, 500, 1.0);
        fog.tick(900, 1.0);

        assert!(fog.transition().is_none());
        assert_eq!(fog.live().color, Vec3::new(0.3, 0.4, 0.5));
    }

    #[test]
    fn packed_color_is_light_scaled() {
        let fog = GlobalFogOverride::new(Vec3::new(1.0, 0.5, 0.0), 512.0, 0.5);
        let bytes = fog.live().color_int.to_le_bytes();
        assert_eq!(bytes, [127, 63, 0, 255]);
        assert_eq!(fog.live().color, Vec3::new(1.0, 0.5, 0.0));
    }
}
