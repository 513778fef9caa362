/// 3D Scene Module
/// Demo level geometry and the fog it declares on load

use bevy::prelude::*;
use bevy::pbr::{NotShadowCaster, NotShadowReceiver};

use crate::rendering::camera::{HazeMainCamera, HazeSkyDome};
use crate::rendering::fog::command::{FogVolumeDecl, GlobalFogBaseline, WorldFogLoaded};
use crate::rendering::fog::definition::{FogParameters, FogSlot};

/// Fog lump of the built-in demo level.
pub fn demo_world_fog() -> WorldFogLoaded {
    WorldFogLoaded {
        volumes: vec![
            FogVolumeDecl {
                slot: FogSlot::Map,
                params: FogParameters {
                    near: 0.0,
                    far: 3000.0,
                    color: Vec3::new(0.45, 0.47, 0.55),
                    density: 1.0,
                },
            },
            FogVolumeDecl {
                slot: FogSlot::Sky,
                params: FogParameters {
                    near: 0.0,
                    far: 6000.0,
                    color: Vec3::new(0.62, 0.7, 0.82),
                    density: 0.0015,
                },
            },
            FogVolumeDecl {
                slot: FogSlot::Water,
                params: FogParameters {
                    near: 0.0,
                    far: 400.0,
                    color: Vec3::new(0.05, 0.2, 0.3),
                    density: 1.0,
                },
            },
        ],
        global: Some(GlobalFogBaseline {
            color: Vec3::new(0.6, 0.6, 0.68),
            depth_for_opaque: 4096.0,
        }),
        initial: Some(FogSlot::Map),
    }
}

pub fn setup_3d_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut world_fog: EventWriter<WorldFogLoaded>,
) {
    info!("Setting up demo level");

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Plane3d::default().mesh().size(8000.0, 8000.0)),
            material: materials.add(Color::srgb(0.3, 0.32, 0.28)),
            ..default()
        },
        Name::new("Ground"),
    ));

    let pillar_mesh = meshes.add(Cuboid::new(48.0, 160.0, 48.0));
    let pillar_material = materials.add(Color::srgb(0.55, 0.5, 0.45));
    for row in 0..12 {
        for side in [-1.0, 1.0] {
            commands.spawn((
                PbrBundle {
                    mesh: pillar_mesh.clone(),
                    material: pillar_material.clone(),
                    transform: Transform::from_xyz(side * 240.0, 80.0, -(row as f32) * 320.0),
                    ..default()
                },
                Name::new(format!("Pillar {row}")),
            ));
        }
    }

    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: 8000.0,
                ..default()
            },
            transform: Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
            ..default()
        },
        Name::new("Sun"),
    ));

    let sky_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.5, 0.65, 0.9),
        unlit: true,
        cull_mode: None,
        double_sided: true,
        fog_enabled: false,
        ..default()
    });
    commands.spawn((
        HazeSkyDome,
        NotShadowCaster,
        NotShadowReceiver,
        PbrBundle {
            mesh: meshes.add(Sphere::new(1.0).mesh().uv(48, 24)),
            material: sky_material,
            transform: Transform::from_scale(Vec3::splat(7000.0)),
            ..default()
        },
        Name::new("Sky Dome"),
    ));

    world_fog.send(demo_world_fog());
}

pub fn sync_sky_dome_to_camera(
    camera_query: Query<&Transform, (With<HazeMainCamera>, Without<HazeSkyDome>)>,
    mut sky_query: Query<&mut Transform, (With<HazeSkyDome>, Without<HazeMainCamera>)>,
) {
    let Ok(camera_transform) = camera_query.get_single() else {
        return;
    };
    for mut transform in &mut sky_query {
        transform.translation = camera_transform.translation;
    }
}
