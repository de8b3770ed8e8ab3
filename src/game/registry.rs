//! Bookkeeping for currently-live shots and asteroids.
//!
//! The registries exist for scoring and cleanup-on-reset. Membership stays
//! consistent with entity liveness: a handle leaves a registry in the same
//! operation that despawns the entity, so no dangling handles survive.

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<LiveEntities>();
    app.register_type::<EntityKind>();
}

/// Category carried by every spawned game entity.
///
/// Whether something "really is" an asteroid or a shot is decided by pattern
/// matching on this, nowhere else.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum EntityKind {
    Ship,
    Asteroid,
    Shot,
}

/// Resource tracking the live shots and asteroids.
///
/// Both collections are insertion-ordered and duplicate-tolerant.
#[derive(Resource, Debug, Default)]
pub struct LiveEntities {
    shots: Vec<Entity>,
    asteroids: Vec<Entity>,
}

impl LiveEntities {
    pub fn shot_count(&self) -> usize {
        self.shots.len()
    }

    pub fn asteroid_count(&self) -> usize {
        self.asteroids.len()
    }

    /// Track a new shot. Anything that is not a shot is logged and ignored.
    pub fn add_shot(&mut self, entity: Entity, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Shot => {
                self.shots.push(entity);
                true
            }
            other => {
                warn!("Refusing to track {entity} as a shot: it is a {other:?}.");
                false
            }
        }
    }

    /// Track a new asteroid. Anything that is not an asteroid is logged and
    /// ignored.
    pub fn add_asteroid(&mut self, entity: Entity, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Asteroid => {
                self.asteroids.push(entity);
                true
            }
            other => {
                warn!("Refusing to track {entity} as an asteroid: it is a {other:?}.");
                false
            }
        }
    }

    /// Stop tracking a shot and destroy it.
    ///
    /// Returns whether a removal occurred. The entity is despawned in the
    /// same operation that drops its registry entry.
    pub fn remove_shot(&mut self, commands: &mut Commands, entity: Entity) -> bool {
        let Some(index) = self.shots.iter().position(|&shot| shot == entity) else {
            return false;
        };
        self.shots.remove(index);
        commands.entity(entity).despawn();
        true
    }

    /// Stop tracking an asteroid.
    ///
    /// The collision response owns the asteroid's despawn (it may still need
    /// the asteroid's transform to spawn fragments), so this only drops the
    /// bookkeeping entry. Returns whether a removal occurred.
    pub fn remove_asteroid(&mut self, entity: Entity) -> bool {
        let Some(index) = self.asteroids.iter().position(|&rock| rock == entity) else {
            return false;
        };
        self.asteroids.remove(index);
        true
    }

    /// Destroy every tracked shot and clear the collection.
    pub fn remove_all_shots(&mut self, commands: &mut Commands) {
        for shot in self.shots.drain(..) {
            commands.entity(shot).despawn();
        }
    }

    /// Destroy every tracked asteroid and clear the collection.
    pub fn remove_all_asteroids(&mut self, commands: &mut Commands) {
        for asteroid in self.asteroids.drain(..) {
            commands.entity(asteroid).despawn();
        }
    }

    /// Forget everything without despawning.
    ///
    /// Used when the scene tears itself down (screen exit despawns the
    /// session root recursively), where a despawn here would be a double
    /// despawn.
    pub fn clear(&mut self) {
        self.shots.clear();
        self.asteroids.clear();
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::world::CommandQueue;

    use super::*;

    #[test]
    fn adds_check_the_category() {
        let mut world = World::new();
        let ship = world.spawn_empty().id();
        let shot = world.spawn_empty().id();
        let mut live = LiveEntities::default();

        assert!(!live.add_shot(ship, EntityKind::Ship));
        assert_eq!(live.shot_count(), 0);

        assert!(live.add_shot(shot, EntityKind::Shot));
        assert_eq!(live.shot_count(), 1);

        assert!(!live.add_asteroid(shot, EntityKind::Shot));
        assert_eq!(live.asteroid_count(), 0);
    }

    #[test]
    fn removing_a_tracked_shot_despawns_it() {
        let mut world = World::new();
        let mut queue = CommandQueue::default();
        let shot = world.spawn_empty().id();
        let mut live = LiveEntities::default();
        live.add_shot(shot, EntityKind::Shot);

        let mut commands = Commands::new(&mut queue, &world);
        assert!(live.remove_shot(&mut commands, shot));
        queue.apply(&mut world);

        assert_eq!(live.shot_count(), 0);
        assert!(world.get_entity(shot).is_err());
    }

    #[test]
    fn removing_an_entity_never_added_changes_nothing() {
        let mut world = World::new();
        let mut queue = CommandQueue::default();
        let tracked = world.spawn_empty().id();
        let stranger = world.spawn_empty().id();
        let mut live = LiveEntities::default();
        live.add_shot(tracked, EntityKind::Shot);

        let mut commands = Commands::new(&mut queue, &world);
        assert!(!live.remove_shot(&mut commands, stranger));
        queue.apply(&mut world);

        assert_eq!(live.shot_count(), 1);
        assert!(world.get_entity(stranger).is_ok());
    }

    #[test]
    fn asteroid_removal_reports_whether_anything_happened() {
        let mut world = World::new();
        let rock = world.spawn_empty().id();
        let other = world.spawn_empty().id();
        let mut live = LiveEntities::default();
        live.add_asteroid(rock, EntityKind::Asteroid);

        assert!(live.remove_asteroid(rock));
        assert!(!live.remove_asteroid(rock));
        assert!(!live.remove_asteroid(other));
        assert_eq!(live.asteroid_count(), 0);
    }

    #[test]
    fn remove_all_despawns_each_tracked_entity_and_clears() {
        let mut world = World::new();
        let mut queue = CommandQueue::default();
        let mut live = LiveEntities::default();
        let rocks: Vec<Entity> = (0..4).map(|_| world.spawn_empty().id()).collect();
        for &rock in &rocks {
            live.add_asteroid(rock, EntityKind::Asteroid);
        }

        let mut commands = Commands::new(&mut queue, &world);
        live.remove_all_asteroids(&mut commands);
        queue.apply(&mut world);

        assert_eq!(live.asteroid_count(), 0);
        for rock in rocks {
            assert!(world.get_entity(rock).is_err());
        }
    }

    #[test]
    fn clear_forgets_without_despawning() {
        let mut world = World::new();
        let shot = world.spawn_empty().id();
        let mut live = LiveEntities::default();
        live.add_shot(shot, EntityKind::Shot);

        live.clear();

        assert_eq!(live.shot_count(), 0);
        assert!(world.get_entity(shot).is_ok());
    }
}
