/// Fog Module
/// Level fog, scripted fog transitions and the global fog override.
///
/// Two state machines run side by side every frame. The generic one blends
/// the LAST slot towards TARGET into CURRENT whenever the active fog is
/// switched. The global one fades the outdoor fog between its map baseline
/// and scripted overrides. Commands only mutate state; the blends happen in
/// [`advance_fog`], and the result is published as a [`FogFrame`] for the
/// camera to consume.

pub mod command;
pub mod definition;
pub mod global;
pub mod registry;
pub mod transition;

use bevy::prelude::*;

use crate::core::config::EngineConfig;
use crate::core::resources::{FrameClock, ViewParms};

use command::{FogCommand, WorldFogLoaded};
use definition::{FogDefinition, FogMode, FogSlot};
use global::{GlobalFogOverride, GlobalFogParams};
use registry::FogRegistry;
use transition::FogTick;

/// Owns all fog state. There is exactly one per app.
#[derive(Resource, Debug, Clone, Default)]
pub struct FogSubsystem {
    pub registry: FogRegistry,
    pub global: Option<GlobalFogOverride>,
}

impl FogSubsystem {
    pub fn apply_command(&mut self, command: &FogCommand, now_ms: i32, identity_light: f32) {
        debug!("Fog command at {}ms: {:?}", now_ms, command);

        match *command {
            FogCommand::SetParameters { index, ref params } => {
                let Some(slot) = FogSlot::from_index(index) else {
                    debug!("Ignoring fog parameters for invalid index {}", index);
                    return;
                };
                self.registry.set_fog_parameters(slot, params, identity_light);
            }
            FogCommand::SwitchActive { index, duration_ms } => {
                let Some(slot) = FogSlot::from_index(index) else {
                    debug!("Ignoring fog switch to invalid index {}", index);
                    return;
                };
                self.registry.switch_active_fog(slot, duration_ms, now_ms);
            }
            FogCommand::SetGlobal { restore, duration_ms, color, depth_for_opaque } => {
                let Some(global) = self.global.as_mut() else {
                    debug!("Ignoring global fog change, the world has no global fog");
                    return;
                };
                global.set_global_fog(restore, duration_ms, color, depth_for_opaque, now_ms, identity_light);
            }
        }
    }

    /// Replaces all fog state with what the map declares.
    pub fn load_world(&mut self, world: &WorldFogLoaded, now_ms: i32, identity_light: f32) {
        self.registry.reset();
        for volume in &world.volumes {
            self.registry.set_fog_parameters(volume.slot, &volume.params, identity_light);
        }
        self.global = world
            .global
            .map(|baseline| GlobalFogOverride::new(baseline.color, baseline.depth_for_opaque, identity_light));
        if let Some(initial) = world.initial {
            self.registry.switch_active_fog(initial, 0, now_ms);
        }

        info!(
            "Loaded world fog: {} volumes, global fog {}, initial {:?}",
            world.volumes.len(),
            if self.global.is_some() { "present" } else { "absent" },
            world.initial
        );
    }

    /// Runs both transition engines and returns the adjusted far clip.
    pub fn advance(&mut self, now_ms: i32, identity_light: f32, z_far: f32) -> (FogTick, f32) {
        if let Some(global) = self.global.as_mut() {
            global.tick(now_ms, identity_light);
        }
        let tick = transition::advance(&mut self.registry, now_ms);
        (tick, transition::clip_far_plane(self.registry.current(), z_far))
    }
}

/// Read-only fog state for the renderer, rebuilt every frame.
#[derive(Resource, Debug, Clone, Copy)]
pub struct FogFrame {
    pub current: FogDefinition,
    pub active: Option<FogSlot>,
    pub global: Option<GlobalFogParams>,
    pub global_fading: bool,
    pub z_far: f32,
}

impl Default for FogFrame {
    fn default() -> Self {
        Self {
            current: FogDefinition::default(),
            active: None,
            global: None,
            global_fading: false,
            z_far: ViewParms::default().z_far,
        }
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FogSystems {
    Commands,
    Tick,
    Publish,
    Apply,
}

pub struct FogPlugin;

impl Plugin for FogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EngineConfig>()
            .init_resource::<FrameClock>()
            .init_resource::<ViewParms>()
            .init_resource::<FogSubsystem>()
            .init_resource::<FogFrame>()
            .add_event::<FogCommand>()
            .add_event::<WorldFogLoaded>()
            .configure_sets(
                Update,
                (FogSystems::Commands, FogSystems::Tick, FogSystems::Publish, FogSystems::Apply).chain(),
            )
            .add_systems(Update, apply_fog_commands.in_set(FogSystems::Commands))
            .add_systems(Update, advance_fog.in_set(FogSystems::Tick))
            .add_systems(Update, publish_fog_frame.in_set(FogSystems::Publish));
    }
}

pub fn apply_fog_commands(
    mut loads: EventReader<WorldFogLoaded>,
    mut commands: EventReader<FogCommand>,
    mut fog: ResMut<FogSubsystem>,
    clock: Res<FrameClock>,
    config: Res<EngineConfig>,
) {
    let identity_light = config.rendering.identity_light();
    for world in loads.read() {
        fog.load_world(world, clock.now_ms, identity_light);
    }
    for command in commands.read() {
        fog.apply_command(command, clock.now_ms, identity_light);
    }
}

pub fn advance_fog(
    mut fog: ResMut<FogSubsystem>,
    mut view: ResMut<ViewParms>,
    clock: Res<FrameClock>,
    config: Res<EngineConfig>,
) {
    let (tick, z_far) = fog.advance(clock.now_ms, config.rendering.identity_light(), view.z_far);
    match tick {
        FogTick::Idle => {}
        FogTick::Blended(lerp_pos) => trace!("Fog blend at {:.3}", lerp_pos),
        FogTick::Settled => debug!("Fog transition settled on {:?}", fog.registry.active()),
    }
    view.z_far = z_far;

    if config.rendering.fog_speeds {
        let current = fog.registry.current();
        match current.mode {
            FogMode::Linear => info!(
                "[frame {}] farclip fog - den: {:.1}  calc zFar: {:.1}  fog zfar: {:.1}",
                clock.frame_count, current.density, view.z_far, current.end
            ),
            FogMode::Exponential => info!(
                "[frame {}] density fog - den: {:.4}  calc zFar: {:.1}  fog zFar: {:.1}",
                clock.frame_count, current.density, view.z_far, current.end
            ),
        }
    }
}

pub fn publish_fog_frame(
    fog: Res<FogSubsystem>,
    view: Res<ViewParms>,
    mut frame: ResMut<FogFrame>,
) {
    *frame = FogFrame {
        current: *fog.registry.current(),
        active: fog.registry.active(),
        global: fog.global.as_ref().map(|global| *global.live()),
        global_fading: fog.global.as_ref().is_some_and(|global| global.transition().is_some()),
        z_far: view.z_far,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use command::{FogVolumeDecl, GlobalFogBaseline};
    use definition::FogParameters;

    fn fog_app() -> App {
        let mut app = App::new();
        app.add_plugins(FogPlugin);
        app
    }

    fn run_frame(app: &mut App, now_ms: i32, z_far: f32) {
        app.world_mut().resource_mut::<FrameClock>().now_ms = now_ms;
        app.world_mut().resource_mut::<ViewParms>().z_far = z_far;
        app.update();
    }

    fn demo_world() -> WorldFogLoaded {
        WorldFogLoaded {
            volumes: vec![FogVolumeDecl {
                slot: FogSlot::Map,
                params: FogParameters {
                    near: 0.0,
                    far: 1600.0,
                    color: Vec3::new(0.1, 0.1, 0.2),
                    density: 1.0,
                },
            }],
            global: Some(GlobalFogBaseline {
                color: Vec3::new(0.6, 0.6, 0.7),
                depth_for_opaque: 3000.0,
            }),
            initial: Some(FogSlot::Map),
        }
    }

    #[test]
    fn map_load_settles_on_the_initial_fog() {
        let mut app = fog_app();
        app.world_mut().send_event(demo_world());
        run_frame(&mut app, 0, 8192.0);

        let frame = *app.world().resource::<FogFrame>();
        assert_eq!(frame.current.end, 1600.0);
        assert_eq!(frame.current.mode, FogMode::Linear);
        assert_eq!(frame.z_far, 1600.0);
        assert_eq!(frame.active, Some(FogSlot::Map));
        let global = frame.global.expect("world declares a global fog");
        assert_eq!(global.color, Vec3::new(0.6, 0.6, 0.7));
        assert_eq!(global.depth_for_opaque, 3000.0);
    }

    #[test]
    fn scripted_switch_runs_across_frames() {
        let mut app = fog_app();
        app.world_mut().send_event(demo_world());
        run_frame(&mut app, 0, 8192.0);

        app.world_mut().send_event(FogCommand::SetParameters {
            index: 2,
            params: FogParameters {
                near: 0.0,
                far: 800.0,
                color: Vec3::new(0.5, 0.5, 0.6),
                density: 1.0,
            },
        });
        run_frame(&mut app, 500, 8192.0);

        let portal = *app
            .world()
            .resource::<FogSubsystem>()
            .registry
            .get(FogSlot::PortalView)
            .expect("slot 2 exists");
        assert_eq!(portal.mode, FogMode::Linear);
        assert!(!portal.draw_sky);
        assert!(portal.clear_screen);

        app.world_mut().send_event(FogCommand::SwitchActive { index: 2, duration_ms: 2000 });
        run_frame(&mut app, 1000, 8192.0);
        assert_eq!(app.world().resource::<FogFrame>().current.end, 1600.0);

        run_frame(&mut app, 2000, 8192.0);
        assert!((app.world().resource::<FogFrame>().current.end - 1200.0).abs() < 1e-3);
        assert!((app.world().resource::<FogFrame>().z_far - 1200.0).abs() < 1e-3);

        run_frame(&mut app, 3000, 8192.0);
        let fog = app.world().resource::<FogSubsystem>();
        assert_eq!(fog.registry.current().end, 800.0);
        assert!(fog.registry.target().transition.is_none());
        assert_eq!(fog.registry.active(), Some(FogSlot::PortalView));
    }

    #[test]
    fn invalid_commands_are_silently_dropped() {
        let mut app = fog_app();
        app.world_mut().send_event(FogCommand::SwitchActive { index: 77, duration_ms: 100 });
        app.world_mut().send_event(FogCommand::SwitchActive { index: 5, duration_ms: 100 });
        app.world_mut().send_event(FogCommand::SetGlobal {
            restore: true,
            duration_ms: 0,
            color: Vec3::ZERO,
            depth_for_opaque: 0.0,
        });
        run_frame(&mut app, 10, 4000.0);

        let frame = *app.world().resource::<FogFrame>();
        assert!(!frame.current.registered);
        assert!(frame.global.is_none());
        assert_eq!(frame.z_far, 4000.0);
    }

    #[test]
    fn global_override_runs_alongside_a_switch() {
        let mut app = fog_app();
        app.world_mut().send_event(demo_world());
        run_frame(&mut app, 0, 8192.0);

        app.world_mut().send_event(FogCommand::SetGlobal {
            restore: false,
            duration_ms: 1000,
            color: Vec3::ZERO,
            depth_for_opaque: 1000.0,
        });
        run_frame(&mut app, 1000, 8192.0);
        run_frame(&mut app, 1500, 8192.0);

        let global = app.world().resource::<FogFrame>().global.expect("global fog");
        assert!((global.depth_for_opaque - 2000.0).abs() < 1e-3);
        assert!((global.color.x - 0.3).abs() < 1e-5);
        assert!(app.world().resource::<FogFrame>().global_fading);

        app.world_mut().send_event(FogCommand::SetGlobal {
            restore: true,
            duration_ms: 0,
            color: Vec3::ZERO,
            depth_for_opaque: 0.0,
        });
        run_frame(&mut app, 1600, 8192.0);
        let global = app.world().resource::<FogFrame>().global.expect("global fog");
        assert_eq!(global.color, Vec3::new(0.6, 0.6, 0.7));
        assert_eq!(global.depth_for_opaque, 3000.0);
        assert_eq!(app.world().resource::<FogFrame>().current.end, 1600.0);
    }

    #[test]
    fn reloading_a_world_discards_old_fog() {
        let mut app = fog_app();
        app.world_mut().send_event(demo_world());
        run_frame(&mut app, 0, 8192.0);

        app.world_mut().send_event(WorldFogLoaded {
            volumes: Vec::new(),
            global: None,
            initial: None,
        });
        run_frame(&mut app, 100, 8192.0);

        let fog = app.world().resource::<FogSubsystem>();
        assert_eq!(fog.registry.active(), None);
        assert!(!fog.registry.get(FogSlot::Map).is_some_and(|map| map.registered));
        assert!(fog.global.is_none());
        assert_eq!(app.world().resource::<FogFrame>().z_far, 8192.0);
    }
}
