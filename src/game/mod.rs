//! The main game module for the asteroid shooter.
//!
//! This module contains all the gameplay logic including:
//! - The validated game-phase gate (attract screen, play, volley win, death, game over)
//! - Live-entity registries for shots and asteroids
//! - Level-scaled scoring, lives, and volley progression
//! - Randomized asteroid spawning and splitting
//! - Ship control, shots, and screen wrapping

mod asteroid;
mod field;
mod highscore;
mod phase;
mod registry;
mod score;
mod ship;
mod shot;
mod spawner;
mod state;

use bevy::prelude::*;

pub use state::spawn_session;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        asteroid::plugin,
        field::plugin,
        highscore::plugin,
        phase::plugin,
        registry::plugin,
        score::plugin,
        ship::plugin,
        shot::plugin,
        state::plugin,
    ));
}
