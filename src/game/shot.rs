//! Shots fired from the ship's nose.
//!
//! Shots wrap around the field like everything else, so each one carries a
//! lifespan and self-destructs when it runs out rather than drifting
//! forever.

use bevy::prelude::*;

use super::{
    phase::{GamePhase, in_phase},
    registry::{EntityKind, LiveEntities},
    spawner,
};
use crate::{AppSystems, PausableSystems, audio::sound_effect, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Shot>();
    app.add_message::<FireShot>();

    // Shots in flight keep flying and expiring whatever the phase; only
    // firing new ones is tied to active play.
    app.add_systems(
        Update,
        (
            expire_shots.in_set(AppSystems::TickTimers),
            spawn_shots
                .in_set(AppSystems::Update)
                .run_if(in_phase(GamePhase::Play)),
            move_shots.in_set(AppSystems::Update),
        )
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Flight speed in units per second.
const SHOT_SPEED: f32 = 480.0;

/// Seconds before a shot self-destructs.
const SHOT_LIFESPAN_SECS: f32 = 2.0;

/// Collision radius of a shot.
pub const SHOT_RADIUS: f32 = 3.0;

/// Message to fire a shot.
#[derive(Message, Debug, Clone)]
pub struct FireShot {
    pub position: Vec2,
    pub direction: Vec2,
}

/// Component marking an entity as a shot in flight.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct Shot {
    pub velocity: Vec2,
    /// Deadline timer; the shot is destroyed when it finishes.
    lifespan: Timer,
}

impl Shot {
    pub fn new(velocity: Vec2) -> Self {
        Self {
            velocity,
            lifespan: Timer::from_seconds(SHOT_LIFESPAN_SECS, TimerMode::Once),
        }
    }
}

/// Spawn a shot for each fire message and start tracking it.
fn spawn_shots(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut live: ResMut<LiveEntities>,
    mut fire_events: MessageReader<FireShot>,
    asset_server: Res<AssetServer>,
) {
    for event in fire_events.read() {
        let velocity = event.direction.normalize_or_zero() * SHOT_SPEED;
        let shot = spawner::spawn_shot(
            &mut commands,
            &mut meshes,
            &mut materials,
            event.position,
            velocity,
        );
        live.add_shot(shot, EntityKind::Shot);

        let fire_sound = asset_server.load("audio/sound_effects/fire.ogg");
        commands.spawn(sound_effect(fire_sound));
    }
}

pub(super) fn move_shots(time: Res<Time>, mut query: Query<(&mut Transform, &Shot)>) {
    let dt = time.delta_secs();
    for (mut transform, shot) in &mut query {
        transform.translation += (shot.velocity * dt).extend(0.0);
    }
}

/// Destroy shots whose lifespan has run out.
fn expire_shots(
    time: Res<Time>,
    mut commands: Commands,
    mut live: ResMut<LiveEntities>,
    mut query: Query<(Entity, &mut Shot)>,
) {
    for (entity, mut shot) in &mut query {
        shot.lifespan.tick(time.delta());
        if shot.lifespan.just_finished() {
            live.remove_shot(&mut commands, entity);
        }
    }
}
