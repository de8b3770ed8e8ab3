//! All sizes of asteroids: drift, tumble, and breaking apart when shot.
//!
//! The two larger sizes break into a pair of smaller, faster rocks when
//! destroyed; the smallest just disappears. Collision is plain
//! circle-vs-circle distance checks.

use bevy::prelude::*;

use super::{
    phase::{GamePhase, in_phase},
    registry::{EntityKind, LiveEntities},
    score::ScoreBoard,
    ship::{SHIP_RADIUS, Ship, ShipDestroyed},
    shot::{SHOT_RADIUS, Shot},
    spawner,
    state::SessionLayers,
};
use crate::{AppSystems, PausableSystems, audio::sound_effect, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Asteroid>();
    app.add_message::<AsteroidDestroyed>();

    app.add_systems(
        Update,
        (
            drift_asteroids
                .in_set(AppSystems::Update)
                .in_set(PausableSystems)
                .run_if(in_state(Screen::Gameplay)),
            (collide_shots_with_asteroids, collide_ship_with_asteroids)
                .after(drift_asteroids)
                .after(super::ship::move_ship)
                .after(super::shot::move_shots)
                .in_set(AppSystems::Update)
                .in_set(PausableSystems)
                .run_if(in_state(Screen::Gameplay).and(in_phase(GamePhase::Play))),
        ),
    );
}

/// How many fragments a breaking rock spawns.
const FRAGMENTS_PER_SPLIT: u32 = 2;

/// Fragments keep the parent's heading but speed up.
const FRAGMENT_SPEED_FACTOR: f32 = 1.5;

/// Per-axis scatter applied to fragment spawn positions.
const FRAGMENT_SCATTER: f32 = 12.0;

/// Message sent when an asteroid is destroyed by a shot.
#[derive(Message, Debug, Clone, Copy)]
pub struct AsteroidDestroyed {
    #[allow(dead_code)]
    pub size: AsteroidSize,
    #[allow(dead_code)]
    pub position: Vec2,
}

/// The three asteroid sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    /// Visual and collision radius.
    pub fn radius(self) -> f32 {
        match self {
            AsteroidSize::Large => 48.0,
            AsteroidSize::Medium => 26.0,
            AsteroidSize::Small => 14.0,
        }
    }

    /// Score for destroying a rock of this size. Smaller rocks are harder
    /// to hit and pay better.
    pub fn points(self) -> i64 {
        match self {
            AsteroidSize::Large => 20,
            AsteroidSize::Medium => 50,
            AsteroidSize::Small => 100,
        }
    }

    /// Drift speed multiplier; small rocks dart around a little faster.
    pub fn speed_factor(self) -> f32 {
        match self {
            AsteroidSize::Large => 1.0,
            AsteroidSize::Medium => 1.2,
            AsteroidSize::Small => 1.35,
        }
    }

    /// The size a destroyed rock of this size breaks into.
    pub fn split(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }

    /// Mesh vertex count; chunkier rocks get more corners.
    pub(super) fn sides(self) -> u32 {
        match self {
            AsteroidSize::Large => 9,
            AsteroidSize::Medium => 7,
            AsteroidSize::Small => 6,
        }
    }

    pub(super) fn color(self) -> Color {
        match self {
            AsteroidSize::Large => Color::srgb(0.45, 0.42, 0.40),
            AsteroidSize::Medium => Color::srgb(0.52, 0.50, 0.48),
            AsteroidSize::Small => Color::srgb(0.60, 0.58, 0.56),
        }
    }
}

/// Component marking an entity as an asteroid.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Asteroid {
    pub size: AsteroidSize,
    pub velocity: Vec2,
    /// Spin rate in radians per second.
    pub tumble: f32,
}

/// Move every rock along its drift and spin it.
fn drift_asteroids(time: Res<Time>, mut query: Query<(&mut Transform, &Asteroid)>) {
    let dt = time.delta_secs();
    for (mut transform, asteroid) in &mut query {
        transform.translation += (asteroid.velocity * dt).extend(0.0);
        transform.rotate_z(asteroid.tumble * dt);
    }
}

/// Resolve shot hits: destroy the shot, split or destroy the rock, score.
fn collide_shots_with_asteroids(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut live: ResMut<LiveEntities>,
    mut board: ResMut<ScoreBoard>,
    mut destroyed_events: MessageWriter<AsteroidDestroyed>,
    shot_query: Query<(Entity, &Transform), With<Shot>>,
    asteroid_query: Query<(Entity, &Transform, &Asteroid)>,
    layers: Res<SessionLayers>,
    asset_server: Res<AssetServer>,
) {
    // First pass: pair each shot with the first rock it overlaps.
    let mut hits: Vec<(Entity, Entity)> = Vec::new();
    for (shot_entity, shot_transform) in &shot_query {
        let shot_pos = shot_transform.translation.truncate();
        for (rock_entity, rock_transform, asteroid) in &asteroid_query {
            let rock_pos = rock_transform.translation.truncate();
            if shot_pos.distance(rock_pos) < SHOT_RADIUS + asteroid.size.radius() {
                hits.push((shot_entity, rock_entity));
                break;
            }
        }
    }

    // Second pass: resolve. The registry decides whether a rock is still
    // live, which keeps two shots sharing a rock on the same frame
    // consistent.
    for (shot_entity, rock_entity) in hits {
        live.remove_shot(&mut commands, shot_entity);

        if !live.remove_asteroid(rock_entity) {
            continue;
        }
        let Ok((_, rock_transform, asteroid)) = asteroid_query.get(rock_entity) else {
            continue;
        };
        let rock_pos = rock_transform.translation.truncate();

        board.add_points(asteroid.size.points());

        // Break the rock into faster fragments, if there is a smaller size
        // to break into.
        if let Some(fragment_size) = asteroid.size.split() {
            for _ in 0..FRAGMENTS_PER_SPLIT {
                let offset = spawner::random_scatter(FRAGMENT_SCATTER);
                let fragment = spawner::spawn_asteroid(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    fragment_size,
                    rock_transform.translation + offset.extend(0.0),
                    asteroid.velocity * FRAGMENT_SPEED_FACTOR,
                    asteroid.tumble,
                    Some(layers.playfield),
                );
                live.add_asteroid(fragment, EntityKind::Asteroid);
            }
        }

        commands.entity(rock_entity).despawn();
        let boom = asset_server.load("audio/sound_effects/explosion.ogg");
        commands.spawn(sound_effect(boom));

        destroyed_events.write(AsteroidDestroyed {
            size: asteroid.size,
            position: rock_pos,
        });
        info!(
            "Destroyed a {:?} asteroid (+{} points, total {})",
            asteroid.size,
            asteroid.size.points(),
            board.score()
        );
    }
}

/// Destroy the ship when a rock reaches it, unless spawn protection holds.
fn collide_ship_with_asteroids(
    mut commands: Commands,
    mut destroyed_events: MessageWriter<ShipDestroyed>,
    ship_query: Query<(Entity, &Transform, &Ship)>,
    asteroid_query: Query<(&Transform, &Asteroid)>,
    asset_server: Res<AssetServer>,
) {
    let Ok((ship_entity, ship_transform, ship)) = ship_query.single() else {
        return;
    };
    if ship.is_invulnerable() {
        return;
    }
    let ship_pos = ship_transform.translation.truncate();

    for (rock_transform, asteroid) in &asteroid_query {
        let rock_pos = rock_transform.translation.truncate();
        if ship_pos.distance(rock_pos) < SHIP_RADIUS + asteroid.size.radius() {
            commands.entity(ship_entity).despawn();
            let boom = asset_server.load("audio/sound_effects/explosion.ogg");
            commands.spawn(sound_effect(boom));

            destroyed_events.write(ShipDestroyed { position: ship_pos });
            info!("Ship destroyed by a {:?} asteroid", asteroid.size);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rocks_split_down_the_ladder() {
        assert_eq!(AsteroidSize::Large.split(), Some(AsteroidSize::Medium));
        assert_eq!(AsteroidSize::Medium.split(), Some(AsteroidSize::Small));
        assert_eq!(AsteroidSize::Small.split(), None);
    }

    #[test]
    fn smaller_rocks_pay_better() {
        assert!(AsteroidSize::Large.points() < AsteroidSize::Medium.points());
        assert!(AsteroidSize::Medium.points() < AsteroidSize::Small.points());
    }

    #[test]
    fn radii_shrink_down_the_ladder() {
        assert!(AsteroidSize::Large.radius() > AsteroidSize::Medium.radius());
        assert!(AsteroidSize::Medium.radius() > AsteroidSize::Small.radius());
    }
}
