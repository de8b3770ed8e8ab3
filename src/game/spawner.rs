//! Randomized entity production.
//!
//! Every live thing in the game is built here: rocks scattered around the
//! field, the player's ship, and the shots it fires. Positions, headings,
//! and tumble rates are uniform-random samples within the field bounds and
//! the configured caps.

use bevy::prelude::*;
use rand::Rng;

use super::{
    asteroid::{Asteroid, AsteroidSize},
    field::{FieldBounds, Wrapping},
    registry::{EntityKind, LiveEntities},
    ship::{SHIP_RADIUS, Ship},
    shot::{SHOT_RADIUS, Shot},
};

/// Spin a fresh rock can get, in degrees per second, either direction.
const MAX_TUMBLE_DEGREES: f32 = 60.0;

/// Per-axis drift cap in units per second, scaled by the level.
const DRIFT_SPEED_PER_LEVEL: f32 = 55.0;

/// Background rocks per size on the attract screen.
const ATTRACT_ROCKS_PER_SIZE: u32 = 10;

/// Rocks per size in a volley, scaled by the level.
const VOLLEY_ROCKS_PER_LEVEL: u32 = 3;

/// Z layers: rocks at the bottom, shots above them, the ship on top.
const ROCK_Z: f32 = 1.0;
const SHOT_Z: f32 = 4.0;
const SHIP_Z: f32 = 5.0;

/// Uniform-random position inside the field.
pub fn random_field_position(bounds: &FieldBounds) -> Vec2 {
    let mut rng = rand::rng();
    Vec2::new(
        rng.random_range(bounds.min.x..bounds.max.x),
        rng.random_range(bounds.min.y..bounds.max.y),
    )
}

/// Random drift velocity. Each axis is sampled independently, so the cap
/// applies per axis rather than to the magnitude.
pub fn random_drift(max_per_axis: f32) -> Vec2 {
    let mut rng = rand::rng();
    Vec2::new(
        rng.random_range(-max_per_axis..=max_per_axis),
        rng.random_range(-max_per_axis..=max_per_axis),
    )
}

/// Random spin up to the cap, either direction, in radians per second.
pub fn random_tumble() -> f32 {
    rand::rng()
        .random_range(-MAX_TUMBLE_DEGREES..=MAX_TUMBLE_DEGREES)
        .to_radians()
}

/// Random per-axis offset within the given range, for scattering fragments.
pub fn random_scatter(range: f32) -> Vec2 {
    let mut rng = rand::rng();
    Vec2::new(
        rng.random_range(-range..=range),
        rng.random_range(-range..=range),
    )
}

/// Per-axis drift cap for the given level.
pub fn level_speed(level: u32) -> f32 {
    DRIFT_SPEED_PER_LEVEL * level as f32
}

/// Spawn one asteroid and hand back its entity so the caller can register
/// it.
pub fn spawn_asteroid(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    size: AsteroidSize,
    position: Vec3,
    velocity: Vec2,
    tumble: f32,
    parent: Option<Entity>,
) -> Entity {
    let rock = commands
        .spawn((
            Name::new(format!("{size:?} Asteroid")),
            Asteroid {
                size,
                velocity,
                tumble,
            },
            EntityKind::Asteroid,
            Wrapping::with_radius(size.radius()),
            Transform::from_translation(position),
            Mesh2d(meshes.add(RegularPolygon::new(size.radius(), size.sides()))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(size.color()))),
        ))
        .id();
    if let Some(parent) = parent {
        commands.entity(parent).add_child(rock);
    }
    rock
}

/// Fill the attract screen with drifting background rocks.
///
/// These are just aesthetics while we wait for the player to hit SPACE, but
/// they live in the registry like any other rock so the cleanup path is the
/// same one the real game uses.
pub fn spawn_attract_field(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    live: &mut LiveEntities,
    bounds: &FieldBounds,
    parent: Entity,
) {
    let mut layer = 0.0;
    for size in [
        AsteroidSize::Large,
        AsteroidSize::Medium,
        AsteroidSize::Small,
    ] {
        for _ in 0..ATTRACT_ROCKS_PER_SIZE {
            // Stagger depths so overlapping rocks don't look funky.
            layer += 0.01;
            let position = random_field_position(bounds).extend(ROCK_Z + layer);
            let velocity = random_drift(level_speed(1) * size.speed_factor());
            let rock = spawn_asteroid(
                commands,
                meshes,
                materials,
                size,
                position,
                velocity,
                random_tumble(),
                Some(parent),
            );
            live.add_asteroid(rock, EntityKind::Asteroid);
        }
    }
    info!("Attract field spawned with {} rocks", live.asteroid_count());
}

/// Spawn the asteroid volley for the given level: three large and three
/// medium rocks per level.
pub fn spawn_volley(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    live: &mut LiveEntities,
    bounds: &FieldBounds,
    parent: Entity,
    level: u32,
) {
    let speed = level_speed(level);
    for size in [AsteroidSize::Large, AsteroidSize::Medium] {
        for _ in 0..(VOLLEY_ROCKS_PER_LEVEL * level) {
            let position = random_field_position(bounds).extend(ROCK_Z);
            let velocity = random_drift(speed * size.speed_factor());
            let rock = spawn_asteroid(
                commands,
                meshes,
                materials,
                size,
                position,
                velocity,
                random_tumble(),
                Some(parent),
            );
            live.add_asteroid(rock, EntityKind::Asteroid);
        }
    }
    info!(
        "Volley for level {level} spawned; {} rocks in play",
        live.asteroid_count()
    );
}

/// Spawn the player's ship at the field center, pointing up.
pub fn spawn_ship(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    parent: Entity,
) -> Entity {
    let ship = commands
        .spawn((
            Name::new("Ship"),
            Ship::fresh(),
            EntityKind::Ship,
            Wrapping::with_radius(SHIP_RADIUS),
            Transform::from_xyz(0.0, 0.0, SHIP_Z),
            Mesh2d(meshes.add(Triangle2d::new(
                Vec2::new(0.0, 18.0),
                Vec2::new(-12.0, -14.0),
                Vec2::new(12.0, -14.0),
            ))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgb(0.85, 0.90, 1.0)))),
        ))
        .id();
    commands.entity(parent).add_child(ship);
    info!("Ship spawned");
    ship
}

/// Spawn a shot already in flight.
pub fn spawn_shot(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    position: Vec2,
    velocity: Vec2,
) -> Entity {
    commands
        .spawn((
            Name::new("Shot"),
            Shot::new(velocity),
            EntityKind::Shot,
            Wrapping::with_radius(SHOT_RADIUS),
            Transform::from_translation(position.extend(SHOT_Z)),
            Mesh2d(meshes.add(Circle::new(SHOT_RADIUS))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgb(1.0, 0.95, 0.7)))),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use bevy::ecs::world::CommandQueue;

    use super::*;

    #[test]
    fn volleys_scale_with_the_level() {
        let mut world = World::new();
        let mut queue = CommandQueue::default();
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<ColorMaterial>::default();
        let mut live = LiveEntities::default();
        let bounds = FieldBounds::from_size(800.0, 600.0);
        let parent = world.spawn_empty().id();

        let mut commands = Commands::new(&mut queue, &world);
        spawn_volley(
            &mut commands,
            &mut meshes,
            &mut materials,
            &mut live,
            &bounds,
            parent,
            2,
        );
        queue.apply(&mut world);

        // Three large and three medium rocks per level.
        assert_eq!(live.asteroid_count(), 12);
    }

    #[test]
    fn drift_respects_the_per_axis_cap() {
        for _ in 0..100 {
            let v = random_drift(40.0);
            assert!(v.x.abs() <= 40.0 && v.y.abs() <= 40.0);
        }
    }

    #[test]
    fn field_positions_land_inside_the_field() {
        let bounds = FieldBounds::from_size(500.0, 300.0);
        for _ in 0..100 {
            let p = random_field_position(&bounds);
            assert!(p.x >= bounds.min.x && p.x <= bounds.max.x);
            assert!(p.y >= bounds.min.y && p.y <= bounds.max.y);
        }
    }
}
