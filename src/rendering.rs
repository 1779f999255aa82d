//! Thin presentation layer: camera, sprites, HUD, and the game-over overlay.
//!
//! Nothing here feeds back into the simulation. Sprites are attached once
//! per arena slot (visibility toggling does the rest), and the HUD text only
//! refreshes when score or lives actually change.

use crate::player::{Player, PlayerLives, PlayerScore};
use crate::pool::{PoolKind, Pooled};
use crate::session::GameState;
use bevy::prelude::*;

// ── Markers ───────────────────────────────────────────────────────────────────

#[derive(Component)]
struct HudDisplay;

#[derive(Component)]
struct GameOverOverlay;

// ── Sprites ───────────────────────────────────────────────────────────────────

fn sprite_for(kind: PoolKind) -> Sprite {
    let (color, size) = match kind {
        PoolKind::PlayerBullet => (Color::srgb(0.95, 0.95, 0.5), Vec2::new(6.0, 16.0)),
        PoolKind::EnemyBullet => (Color::srgb(0.95, 0.55, 0.2), Vec2::new(6.0, 16.0)),
        PoolKind::BossBullet => (Color::srgb(0.95, 0.25, 0.25), Vec2::new(6.0, 16.0)),
        PoolKind::Enemy => (Color::srgb(0.85, 0.3, 0.3), Vec2::new(24.0, 24.0)),
        PoolKind::Elite => (Color::srgb(0.8, 0.35, 0.85), Vec2::new(32.0, 32.0)),
        PoolKind::Boss => (Color::srgb(0.6, 0.2, 0.7), Vec2::new(72.0, 52.0)),
    };
    Sprite::from_color(color, size)
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Attach a sprite to every freshly spawned arena slot and to the player.
fn attach_sprites_system(
    mut commands: Commands,
    q_slots: Query<(Entity, &Pooled), Added<Pooled>>,
    q_player: Query<Entity, Added<Player>>,
) {
    for (entity, pooled) in q_slots.iter() {
        commands.entity(entity).insert(sprite_for(pooled.kind));
    }
    for entity in q_player.iter() {
        commands
            .entity(entity)
            .insert(Sprite::from_color(Color::srgb(0.4, 0.9, 0.95), Vec2::new(24.0, 32.0)));
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            HudDisplay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Score: 0  Lives: 3"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.88, 0.45)),
            ));
        });
}

fn hud_display_system(
    score: Res<PlayerScore>,
    lives: Res<PlayerLives>,
    parent_query: Query<&Children, With<HudDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    if !score.is_changed() && !lives.is_changed() {
        return;
    }
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(format!(
                    "Score: {}  Lives: {}",
                    score.points,
                    lives.remaining.max(0)
                ));
            }
        }
    }
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn spawn_game_over_overlay(mut commands: Commands, score: Res<PlayerScore>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            GameOverOverlay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("GAME OVER"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.3, 0.3)),
            ));
            parent.spawn((
                Text::new(format!("Final score: {}", score.points)),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("Press R to restart"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
            ));
        });
}

fn despawn_game_over_overlay(
    mut commands: Commands,
    q_overlay: Query<Entity, With<GameOverOverlay>>,
) {
    for entity in q_overlay.iter() {
        commands.entity(entity).despawn();
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, setup_hud))
            .add_systems(Update, (attach_sprites_system, hud_display_system))
            .add_systems(OnEnter(GameState::GameOver), spawn_game_over_overlay)
            .add_systems(OnExit(GameState::GameOver), despawn_game_over_overlay);
    }
}
