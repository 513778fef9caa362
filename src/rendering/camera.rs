/// Camera Module
/// Main view camera and the per-frame application of fog to it

use bevy::prelude::*;
use bevy::pbr::{FogFalloff, FogSettings};
use bevy::render::camera::ClearColorConfig;

use crate::rendering::fog::definition::{FogDefinition, FogMode};
use crate::rendering::fog::FogFrame;

#[derive(Component)]
pub struct HazeMainCamera;

/// Sky geometry hidden while a distance fog is active.
#[derive(Component)]
pub struct HazeSkyDome;

pub fn setup_camera(mut commands: Commands) {
    info!("Setting up camera system");

    commands.spawn((
        HazeMainCamera,
        Camera3dBundle {
            transform: Transform::from_xyz(0.0, 56.0, 480.0).looking_at(Vec3::new(0.0, 40.0, 0.0), Vec3::Y),
            ..default()
        },
        FogSettings::default(),
        Name::new("Main Camera"),
    ));
}

/// Bevy falloff equivalent of a fog slot.
pub fn fog_falloff(fog: &FogDefinition) -> FogFalloff {
    match fog.mode {
        FogMode::Linear => FogFalloff::Linear {
            start: fog.start,
            end: fog.end,
        },
        FogMode::Exponential => FogFalloff::Exponential {
            density: fog.density,
        },
    }
}

pub fn apply_frame_fog(
    frame: Res<FogFrame>,
    mut camera_query: Query<(&mut Camera, &mut Projection, &mut FogSettings), With<HazeMainCamera>>,
    mut sky_query: Query<&mut Visibility, With<HazeSkyDome>>,
) {
    let current = &frame.current;

    for (mut camera, mut projection, mut fog_settings) in &mut camera_query {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.far = frame.z_far;
        }

        if !current.registered {
            fog_settings.color = Color::NONE;
            camera.clear_color = ClearColorConfig::Default;
            continue;
        }

        let color = Color::srgba(current.color.x, current.color.y, current.color.z, current.color.w);
        fog_settings.color = color;
        fog_settings.falloff = fog_falloff(current);
        camera.clear_color = if current.clear_screen {
            ClearColorConfig::Custom(color)
        } else {
            ClearColorConfig::Default
        };
    }

    let sky_visibility = if current.registered && !current.draw_sky {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    };
    for mut visibility in &mut sky_query {
        *visibility = sky_visibility;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::fog::definition::FogParameters;

    fn consumer_app(frame: FogFrame) -> (App, Entity, Entity) {
        let mut app = App::new();
        app.insert_resource(frame);
        app.add_systems(Update, apply_frame_fog);
        let camera = app
            .world_mut()
            .spawn((HazeMainCamera, Camera::default(), Projection::default(), FogSettings::default()))
            .id();
        let sky = app.world_mut().spawn((HazeSkyDome, Visibility::Inherited)).id();
        (app, camera, sky)
    }

    #[test]
    fn distance_fog_clips_and_clears() {
        let current = FogDefinition::from_parameters(
            &FogParameters { near: 0.0, far: 500.0, color: Vec3::new(0.5, 0.5, 0.6), density: 1.0 },
            1.0,
        );
        let (mut app, camera, sky) = consumer_app(FogFrame { current, active: None, global: None, global_fading: false, z_far: 500.0 });
        app.update();

        let world = app.world();
        let Projection::Perspective(perspective) = world.get::<Projection>(camera).expect("projection") else {
            panic!("expected a perspective projection");
        };
        assert_eq!(perspective.far, 500.0);
        assert!(matches!(
            world.get::<FogSettings>(camera).expect("fog settings").falloff,
            FogFalloff::Linear { start, end } if start == 0.0 && end == 500.0
        ));
        assert!(matches!(
            world.get::<Camera>(camera).expect("camera").clear_color,
            ClearColorConfig::Custom(_)
        ));
        assert_eq!(*world.get::<Visibility>(sky).expect("sky"), Visibility::Hidden);
    }

    #[test]
    fn density_fog_keeps_the_sky() {
        let current = FogDefinition::from_parameters(
            &FogParameters { near: 0.0, far: 4000.0, color: Vec3::ONE, density: 0.002 },
            1.0,
        );
        let (mut app, camera, sky) = consumer_app(FogFrame { current, active: None, global: None, global_fading: false, z_far: 8192.0 });
        app.update();

        let world = app.world();
        assert!(matches!(
            world.get::<FogSettings>(camera).expect("fog settings").falloff,
            FogFalloff::Exponential { density } if density == 0.002
        ));
        assert!(matches!(
            world.get::<Camera>(camera).expect("camera").clear_color,
            ClearColorConfig::Default
        ));
        assert_eq!(*world.get::<Visibility>(sky).expect("sky"), Visibility::Inherited);
    }
}
