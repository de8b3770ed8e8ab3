//! The player's ship: thrust, rotation, firing, and spawn protection.
//!
//! The ship only ever accelerates along its nose; turning is pure rotation
//! and does not otherwise affect its motion, which is what gives the game
//! its drifty feel.

use bevy::prelude::*;

use super::{
    phase::{GamePhase, in_phase},
    shot::FireShot,
};
use crate::{AppSystems, PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Ship>();
    app.add_message::<ShipDestroyed>();

    app.add_systems(
        Update,
        (
            tick_ship_timers.in_set(AppSystems::TickTimers),
            control_ship.in_set(AppSystems::RecordInput),
            (move_ship, flicker_ship).in_set(AppSystems::Update),
        )
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay).and(in_phase(GamePhase::Play))),
    );
}

/// Collision radius of the ship.
pub const SHIP_RADIUS: f32 = 14.0;

/// Acceleration along the nose while thrusting, in units per second squared.
const THRUST_ACCELERATION: f32 = 280.0;

/// Turn rate in radians per second.
const TURN_RATE: f32 = 3.2;

/// Speed cap so the ship stays controllable.
const MAX_SPEED: f32 = 420.0;

/// Seconds between shots while the fire key is held.
const FIRE_INTERVAL: f32 = 0.3;

/// Seconds of spawn protection after the ship appears.
const INVULNERABLE_TIME: f32 = 2.0;

/// How far ahead of the ship's center a shot appears.
const MUZZLE_OFFSET: f32 = 22.0;

/// Message sent when the ship is destroyed by a collision.
#[derive(Message, Debug, Clone, Copy)]
pub struct ShipDestroyed {
    #[allow(dead_code)]
    pub position: Vec2,
}

/// The player's ship.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct Ship {
    pub velocity: Vec2,
    /// Seconds until the next shot may fire.
    fire_cooldown: f32,
    /// Seconds of spawn protection remaining.
    invulnerable: f32,
}

impl Ship {
    /// A freshly spawned ship: motionless, trigger ready, briefly protected.
    pub fn fresh() -> Self {
        Self {
            velocity: Vec2::ZERO,
            fire_cooldown: 0.0,
            invulnerable: INVULNERABLE_TIME,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }
}

/// Wind down the fire cooldown and the spawn-protection window.
fn tick_ship_timers(time: Res<Time>, mut ship_query: Query<&mut Ship>) {
    let Ok(mut ship) = ship_query.single_mut() else {
        return;
    };
    let dt = time.delta_secs();
    ship.fire_cooldown = (ship.fire_cooldown - dt).max(0.0);
    ship.invulnerable = (ship.invulnerable - dt).max(0.0);
}

/// Read the held keys: rotate, thrust, fire.
fn control_ship(
    input: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut ship_query: Query<(&mut Transform, &mut Ship)>,
    mut fire_events: MessageWriter<FireShot>,
) {
    let Ok((mut transform, mut ship)) = ship_query.single_mut() else {
        return;
    };
    let dt = time.delta_secs();

    // Rotate CCW/CW without otherwise affecting motion.
    if input.pressed(KeyCode::KeyA) || input.pressed(KeyCode::ArrowLeft) {
        transform.rotate_z(TURN_RATE * dt);
    }
    if input.pressed(KeyCode::KeyD) || input.pressed(KeyCode::ArrowRight) {
        transform.rotate_z(-TURN_RATE * dt);
    }

    let facing = (transform.rotation * Vec3::Y).truncate();

    // Accelerate toward wherever the nose currently points.
    if input.pressed(KeyCode::KeyW) || input.pressed(KeyCode::ArrowUp) {
        ship.velocity = (ship.velocity + facing * THRUST_ACCELERATION * dt)
            .clamp_length_max(MAX_SPEED);
    }

    // Auto-fire while held, rate-limited by the cooldown.
    if input.pressed(KeyCode::Space) && ship.fire_cooldown <= 0.0 {
        ship.fire_cooldown = FIRE_INTERVAL;
        fire_events.write(FireShot {
            position: transform.translation.truncate() + facing * MUZZLE_OFFSET,
            direction: facing,
        });
    }
}

pub(super) fn move_ship(time: Res<Time>, mut ship_query: Query<(&mut Transform, &Ship)>) {
    let Ok((mut transform, ship)) = ship_query.single_mut() else {
        return;
    };
    transform.translation += (ship.velocity * time.delta_secs()).extend(0.0);
}

/// Make the ship flicker while spawn protection lasts.
fn flicker_ship(time: Res<Time>, mut ship_query: Query<(&Ship, &mut Visibility)>) {
    let Ok((ship, mut visibility)) = ship_query.single_mut() else {
        return;
    };
    *visibility = if ship.is_invulnerable() && (time.elapsed_secs() * 10.0) as u32 % 2 == 0 {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ships_are_protected_and_ready_to_fire() {
        let ship = Ship::fresh();
        assert!(ship.is_invulnerable());
        assert_eq!(ship.fire_cooldown, 0.0);
        assert_eq!(ship.velocity, Vec2::ZERO);
    }

    #[test]
    fn protection_expires() {
        let mut ship = Ship::fresh();
        ship.invulnerable = 0.0;
        assert!(!ship.is_invulnerable());
    }
}
