//! The playfield and screen wrapping.
//!
//! Objects that leave one edge of the field reappear at the opposite edge.
//! The field covers exactly what the camera can see, so an object has to be
//! fully off screen (position plus its half-extents) before it teleports to
//! just outside the far side.

use bevy::{prelude::*, window::PrimaryWindow};

use crate::{AppSystems, PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<FieldBounds>();
    app.register_type::<FieldBounds>();
    app.register_type::<Wrapping>();

    app.add_systems(
        Update,
        (
            track_window_size,
            wrap_entities.in_set(PausableSystems),
        )
            .chain()
            .in_set(AppSystems::Update)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Resource holding the world-space corners of the playfield.
///
/// Derived from the primary window; the camera sits at the origin with no
/// zoom, so window pixels map straight onto world units.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct FieldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for FieldBounds {
    fn default() -> Self {
        // Matches the default window until the real size is read.
        Self::from_size(1280.0, 720.0)
    }
}

impl FieldBounds {
    pub fn from_size(width: f32, height: f32) -> Self {
        let half = Vec2::new(width, height) / 2.0;
        Self { min: -half, max: half }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Wrap a position so an object fully past one edge reappears just
    /// outside the opposite edge. In-bounds positions come back unchanged.
    pub fn wrap(&self, position: Vec2, half_extents: Vec2) -> Vec2 {
        let mut wrapped = position;

        if position.x + half_extents.x < self.min.x {
            wrapped.x = self.max.x + half_extents.x;
        } else if position.x - half_extents.x > self.max.x {
            wrapped.x = self.min.x - half_extents.x;
        }

        if position.y + half_extents.y < self.min.y {
            wrapped.y = self.max.y + half_extents.y;
        } else if position.y - half_extents.y > self.max.y {
            wrapped.y = self.min.y - half_extents.y;
        }

        wrapped
    }
}

/// Component for entities that wrap at the field edges.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Wrapping {
    /// Half-extents of the entity's visual bounds.
    pub half_extents: Vec2,
}

impl Wrapping {
    pub fn with_radius(radius: f32) -> Self {
        Self {
            half_extents: Vec2::splat(radius),
        }
    }
}

/// Keep the field bounds in sync with the window.
fn track_window_size(
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut bounds: ResMut<FieldBounds>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let size = window.resolution.size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }

    let current = FieldBounds::from_size(size.x, size.y);
    if *bounds != current {
        *bounds = current;
        info!(
            "Playfield resized to {:.0}x{:.0}",
            bounds.width(),
            bounds.height()
        );
    }
}

/// Teleport anything that has fully left the field to the opposite edge.
fn wrap_entities(bounds: Res<FieldBounds>, mut query: Query<(&mut Transform, &Wrapping)>) {
    for (mut transform, wrapping) in &mut query {
        let position = transform.translation.truncate();
        let wrapped = bounds.wrap(position, wrapping.half_extents);
        if wrapped != position {
            transform.translation.x = wrapped.x;
            transform.translation.y = wrapped.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: FieldBounds = FieldBounds {
        min: Vec2::new(-400.0, -300.0),
        max: Vec2::new(400.0, 300.0),
    };

    #[test]
    fn in_bounds_positions_are_untouched() {
        let extents = Vec2::splat(10.0);
        let position = Vec2::new(120.0, -80.0);
        assert_eq!(BOUNDS.wrap(position, extents), position);
    }

    #[test]
    fn fully_off_the_left_edge_reenters_on_the_right() {
        let extents = Vec2::splat(10.0);
        let position = Vec2::new(-411.0, 0.0);
        let wrapped = BOUNDS.wrap(position, extents);
        assert_eq!(wrapped, Vec2::new(410.0, 0.0));
    }

    #[test]
    fn poking_past_an_edge_is_not_enough_to_wrap() {
        // Still partially visible: position is outside but the near edge of
        // the object is not.
        let extents = Vec2::splat(10.0);
        let position = Vec2::new(405.0, 0.0);
        assert_eq!(BOUNDS.wrap(position, extents), position);
    }

    #[test]
    fn corners_wrap_on_both_axes() {
        let extents = Vec2::splat(5.0);
        let position = Vec2::new(406.0, -306.0);
        let wrapped = BOUNDS.wrap(position, extents);
        assert_eq!(wrapped, Vec2::new(-405.0, 305.0));
    }
}
