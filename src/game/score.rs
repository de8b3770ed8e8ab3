//! Score, lives, and level bookkeeping for a play session.

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ScoreBoard>();
    app.register_type::<ScoreBoard>();
}

/// Ships the player starts a session with.
pub const STARTING_LIVES: u32 = 3;

/// Resource tracking the current session's score, lives, and level.
///
/// Only resets on a full session restart, not between volleys.
#[derive(Resource, Debug, Reflect)]
#[reflect(Resource)]
pub struct ScoreBoard {
    score: i64,
    pub lives: u32,
    pub level: u32,
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
        }
    }
}

impl ScoreBoard {
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Award (or dock) points, scaled by the current level.
    /// The score never drops below zero.
    pub fn add_points(&mut self, base: i64) {
        self.score = (self.score + base * i64::from(self.level)).max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_scale_with_the_level() {
        let mut board = ScoreBoard::default();
        board.level = 3;
        board.add_points(50);
        assert_eq!(board.score(), 150);
    }

    #[test]
    fn score_matches_the_accumulator_formula() {
        for base in [-250_i64, -1, 0, 1, 20, 100] {
            for level in [1_u32, 2, 5] {
                let mut board = ScoreBoard::default();
                board.level = level;
                board.add_points(400);
                let before = board.score();

                board.add_points(base);

                let expected = (before + base * i64::from(level)).max(0);
                assert_eq!(board.score(), expected, "base {base}, level {level}");
            }
        }
    }

    #[test]
    fn score_is_clamped_at_zero() {
        let mut board = ScoreBoard::default();
        board.add_points(-100);
        assert_eq!(board.score(), 0);

        board.add_points(30);
        board.add_points(-100);
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn fresh_sessions_start_with_three_ships_on_level_one() {
        let board = ScoreBoard::default();
        assert_eq!(board.score(), 0);
        assert_eq!(board.lives, STARTING_LIVES);
        assert_eq!(board.level, 1);
    }
}
