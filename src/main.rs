use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

use skystrike::collision::CollisionPlugin;
use skystrike::config::GameConfig;
use skystrike::effects::EffectsPlugin;
use skystrike::enemy::EnemyPlugin;
use skystrike::player::PlayerPlugin;
use skystrike::rendering::RenderingPlugin;
use skystrike::session::SessionPlugin;

/// Configure Rapier: no gravity, everything moves on assigned velocities.
fn setup_physics_config(mut config: Query<&mut RapierConfiguration>) {
    for mut cfg in config.iter_mut() {
        cfg.gravity = Vec2::ZERO;
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Skystrike".into(),
                resolution: WindowResolution::new(600, 800),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Compiled defaults; load_game_config overwrites them from
        // assets/game.toml (if present) in the Startup schedule.
        .insert_resource(GameConfig::default())
        // pixels_per_meter(1.0) keeps world units 1:1 with collider units so
        // the tuned speeds and extents mean what they say.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
        .add_plugins((
            SessionPlugin,
            PlayerPlugin,
            EnemyPlugin,
            CollisionPlugin,
            EffectsPlugin,
            RenderingPlugin,
        ))
        .add_systems(Startup, setup_physics_config)
        .run();
}
