/// Fog Definition Module
/// Value types shared by the fog registry and both transition engines

use bevy::prelude::*;

/// Number of BSP fog volumes a map may declare.
pub const MAX_FOG_VOLUMES: usize = 16;

const NAMED_FOG_SLOTS: usize = 9;

/// Total size of the fog table (named slots plus BSP volumes).
pub const FOG_SLOT_COUNT: usize = NAMED_FOG_SLOTS + MAX_FOG_VOLUMES;

/// Identifies one entry of the fog table.
///
/// Script and console code address fogs by integer index; `from_index` is the
/// only way in from that side, so a bad index never reaches the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FogSlot {
    Sky,
    PortalView,
    Hud,
    Map,
    Water,
    Server,
    /// What the renderer reads this frame.
    Current,
    /// Snapshot of `Current` taken when a transition starts.
    Last,
    /// The fog being transitioned to.
    Target,
    /// A fog volume declared by the BSP.
    Volume(u8),
}

impl FogSlot {
    pub fn from_index(index: i32) -> Option<Self> {
        let slot = match index {
            1 => FogSlot::Sky,
            2 => FogSlot::PortalView,
            3 => FogSlot::Hud,
            4 => FogSlot::Map,
            5 => FogSlot::Water,
            6 => FogSlot::Server,
            7 => FogSlot::Current,
            8 => FogSlot::Last,
            9 => FogSlot::Target,
            n if n > NAMED_FOG_SLOTS as i32 => {
                let volume = (n - NAMED_FOG_SLOTS as i32 - 1) as usize;
                if volume >= MAX_FOG_VOLUMES {
                    return None;
                }
                FogSlot::Volume(volume as u8)
            }
            _ => return None,
        };
        Some(slot)
    }

    pub fn index(self) -> i32 {
        match self {
            FogSlot::Sky => 1,
            FogSlot::PortalView => 2,
            FogSlot::Hud => 3,
            FogSlot::Map => 4,
            FogSlot::Water => 5,
            FogSlot::Server => 6,
            FogSlot::Current => 7,
            FogSlot::Last => 8,
            FogSlot::Target => 9,
            FogSlot::Volume(n) => NAMED_FOG_SLOTS as i32 + 1 + n as i32,
        }
    }

    /// Position in the fog table. May be out of bounds for a hand-built `Volume`.
    pub(crate) fn table_index(self) -> usize {
        (self.index() - 1) as usize
    }

    /// Scratch registers owned by the transition engine.
    pub fn is_reserved(self) -> bool {
        matches!(self, FogSlot::Current | FogSlot::Last | FogSlot::Target)
    }

    pub fn label(self) -> String {
        match self {
            FogSlot::Sky => "sky".to_string(),
            FogSlot::PortalView => "portal view".to_string(),
            FogSlot::Hud => "hud".to_string(),
            FogSlot::Map => "map".to_string(),
            FogSlot::Water => "water".to_string(),
            FogSlot::Server => "server".to_string(),
            FogSlot::Current => "current".to_string(),
            FogSlot::Last => "last".to_string(),
            FogSlot::Target => "target".to_string(),
            FogSlot::Volume(n) => format!("volume {n}"),
        }
    }
}

/// Fog equation used by a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FogMode {
    /// Distance fog: clips geometry at `end` and hides the sky.
    #[default]
    Linear,
    /// Density fog: exponential falloff that blends into a visible sky.
    Exponential,
}

/// GPU quality hint passed along with the fog parameters. Script fogs always leave it to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FogHint {
    #[default]
    DontCare,
}

/// Time window of an in-flight fog transition, in simulation milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FogTransition {
    pub start_ms: i32,
    pub finish_ms: i32,
}

impl FogTransition {
    pub fn new(now_ms: i32, duration_ms: i32) -> Self {
        Self {
            start_ms: now_ms,
            finish_ms: now_ms.saturating_add(duration_ms.max(0)),
        }
    }

    pub fn fade_ms(&self) -> i32 {
        self.finish_ms - self.start_ms
    }

    /// Normalized progress at `now_ms`, clamped to [0, 1]. Zero-length windows are complete.
    pub fn lerp_pos(&self, now_ms: i32) -> f32 {
        let fade = self.fade_ms();
        if fade <= 0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) as f32 / fade as f32).clamp(0.0, 1.0)
    }
}

/// Static parameters of a fog as supplied by scripts or the BSP.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogParameters {
    pub near: f32,
    pub far: f32,
    pub color: Vec3,
    pub density: f32,
}

/// One fog slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogDefinition {
    /// Light-scaled RGB; alpha is 1 once registered.
    pub color: Vec4,
    pub start: f32,
    pub end: f32,
    pub mode: FogMode,
    pub density: f32,
    pub draw_sky: bool,
    pub clear_screen: bool,
    pub hint: FogHint,
    pub registered: bool,
    /// Only meaningful on the `Target` slot.
    pub transition: Option<FogTransition>,
}

impl Default for FogDefinition {
    fn default() -> Self {
        Self {
            color: Vec4::ZERO,
            start: 0.0,
            end: 0.0,
            mode: FogMode::Linear,
            density: 0.0,
            draw_sky: false,
            clear_screen: false,
            hint: FogHint::DontCare,
            registered: false,
            transition: None,
        }
    }
}

impl FogDefinition {
    /// Builds a registered fog from script parameters.
    ///
    /// A density of 1 or more selects distance fog, anything lower is density fog.
    pub fn from_parameters(params: &FogParameters, identity_light: f32) -> Self {
        let color = (params.color * identity_light).extend(1.0);
        let (mode, draw_sky, clear_screen, density) = if params.density >= 1.0 {
            (FogMode::Linear, false, true, 1.0)
        } else {
            (FogMode::Exponential, true, false, params.density)
        };

        Self {
            color,
            start: params.near,
            end: params.far,
            mode,
            density,
            draw_sky,
            clear_screen,
            hint: FogHint::DontCare,
            registered: true,
            transition: None,
        }
    }

    /// Blends geometry and color from `from` to `to`; everything else comes from `to`.
    pub fn lerp(from: &FogDefinition, to: &FogDefinition, t: f32) -> FogDefinition {
        FogDefinition {
            color: from.color.lerp(to.color, t),
            start: from.start + (to.start - from.start) * t,
            end: from.end + (to.end - from.end) * t,
            mode: to.mode,
            density: to.density,
            draw_sky: to.draw_sky,
            // either end needing a clear means the whole blend needs it, or the sky smears
            clear_screen: from.clear_screen || to.clear_screen,
            hint: to.hint,
            registered: true,
            transition: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_indices_map_both_ways() {
        for index in 1..=(FOG_SLOT_COUNT as i32) {
            let slot = FogSlot::from_index(index).expect("index inside the table");
            assert_eq!(slot.index(), index);
            assert_eq!(slot.table_index(), (index - 1) as usize);
        }
        assert_eq!(FogSlot::from_index(0), None);
        assert_eq!(FogSlot::from_index(-3), None);
        assert_eq!(FogSlot::from_index(FOG_SLOT_COUNT as i32 + 1), None);
        assert_eq!(FogSlot::from_index(10), Some(FogSlot::Volume(0)));
    }

    #[test]
    fn dense_parameters_make_distance_fog() {
        let params = FogParameters {
            near: 0.0,
            far: 800.0,
            color: Vec3::new(0.5, 0.5, 0.6),
            density: 1.0,
        };
        let fog = FogDefinition::from_parameters(&params, 1.0);
        assert_eq!(fog.mode, FogMode::Linear);
        assert!(!fog.draw_sky);
        assert!(fog.clear_screen);
        assert_eq!(fog.density, 1.0);
        assert_eq!(fog.color, Vec4::new(0.5, 0.5, 0.6, 1.0));
        assert!(fog.registered);
    }

    #[test]
    fn thin_parameters_make_density_fog() {
        let params = FogParameters {
            near: 16.0,
            far: 4096.0,
            color: Vec3::new(1.0, 0.5, 0.25),
            density: 0.0025,
        };
        let fog = FogDefinition::from_parameters(&params, 0.5);
        assert_eq!(fog.mode, FogMode::Exponential);
        assert!(fog.draw_sky);
        assert!(!fog.clear_screen);
        assert_eq!(fog.density, 0.0025);
        assert_eq!(fog.color, Vec4::new(0.5, 0.25, 0.125, 1.0));
    }

    #[test]
    fn lerp_pos_is_clamped() {
        let window = FogTransition::new(1000, 2000);
        assert_eq!(window.lerp_pos(500), 0.0);
        assert_eq!(window.lerp_pos(1000), 0.0);
        assert_eq!(window.lerp_pos(2000), 0.5);
        assert_eq!(window.lerp_pos(9000), 1.0);

        let mut previous = 0.0;
        for now in (900..3200).step_by(37) {
            let pos = window.lerp_pos(now);
            assert!(pos >= previous);
            previous = pos;
        }
    }

    #[test]
    fn negative_duration_is_a_zero_window() {
        let window = FogTransition::new(400, -50);
        assert_eq!(window.fade_ms(), 0);
        assert_eq!(window.lerp_pos(400), 1.0);
    }
}
