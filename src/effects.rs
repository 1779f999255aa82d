//! Transient destruction effects.
//!
//! Particles are plain sprite squares with a velocity and a lifetime. They
//! are spawned on every kill and on player death, moved by hand (no physics
//! body, no collider) and despawned when their lifetime runs out. They never
//! touch pools, score, or any other simulation state.

use crate::constants::{
    BURST_PARTICLE_COUNT, BURST_PARTICLE_LIFETIME, BURST_PARTICLE_SPEED, Z_PARTICLE,
};
use bevy::prelude::*;

/// A single burst fragment.
#[derive(Component, Debug)]
pub struct Particle {
    pub velocity: Vec2,
    pub age: f32,
    pub lifetime: f32,
}

/// Spawn a ring of fragments flying outward from `origin`.
pub fn spawn_explosion_burst(commands: &mut Commands, origin: Vec2) {
    for i in 0..BURST_PARTICLE_COUNT {
        let angle = std::f32::consts::TAU * (i as f32 / BURST_PARTICLE_COUNT as f32);
        commands.spawn((
            Particle {
                velocity: Vec2::from_angle(angle) * BURST_PARTICLE_SPEED,
                age: 0.0,
                lifetime: BURST_PARTICLE_LIFETIME,
            },
            Sprite::from_color(Color::srgb(1.0, 0.8, 0.3), Vec2::splat(4.0)),
            Transform::from_translation(origin.extend(Z_PARTICLE)),
        ));
    }
}

/// Advance every particle and despawn the expired ones.
pub fn particle_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Particle, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut particle, mut transform) in q.iter_mut() {
        particle.age += dt;
        if particle.age >= particle.lifetime {
            commands.entity(entity).despawn();
            continue;
        }
        let step = particle.velocity * dt;
        transform.translation.x += step.x;
        transform.translation.y += step.y;
    }
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        // Particles keep drifting on the game-over screen, so no state gate.
        app.add_systems(Update, particle_update_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_spawns_a_full_ring() {
        let mut world = World::new();
        let mut queue = bevy::ecs::world::CommandQueue::default();
        let mut commands = Commands::new(&mut queue, &world);
        spawn_explosion_burst(&mut commands, Vec2::new(10.0, -20.0));
        queue.apply(&mut world);

        let count = world.query::<&Particle>().iter(&world).count();
        assert_eq!(count, BURST_PARTICLE_COUNT as usize);
    }

    #[test]
    fn burst_velocities_point_outward_in_all_directions() {
        let mut world = World::new();
        let mut queue = bevy::ecs::world::CommandQueue::default();
        let mut commands = Commands::new(&mut queue, &world);
        spawn_explosion_burst(&mut commands, Vec2::ZERO);
        queue.apply(&mut world);

        let sum: Vec2 = world
            .query::<&Particle>()
            .iter(&world)
            .map(|p| p.velocity)
            .sum();
        // An even ring cancels out.
        assert!(sum.length() < 1e-3);
    }

    #[test]
    fn expired_particles_are_despawned() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Update, particle_update_system);

        app.world_mut().spawn((
            Particle {
                velocity: Vec2::X,
                age: 10.0, // already past its lifetime
                lifetime: 0.5,
            },
            Transform::default(),
        ));
        app.update();

        let count = app
            .world_mut()
            .query::<&Particle>()
            .iter(app.world())
            .count();
        assert_eq!(count, 0);
    }
}
