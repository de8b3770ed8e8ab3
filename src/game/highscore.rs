//! Top-10 score table, persisted as JSON in the user's data directory.
//!
//! Persistence is best-effort: any I/O or parse problem is logged and the
//! game carries on with whatever table it has in memory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(HighScores::load());
}

/// Entries kept in the table.
const TABLE_SIZE: usize = 10;

/// One finished session: the score it ended with and the level it reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: i64,
    pub level: u32,
}

impl ScoreEntry {
    pub fn new(score: i64, level: u32) -> Self {
        Self { score, level }
    }
}

/// The persistent score table, best first.
#[derive(Resource, Debug, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Slot a session's result into the table if it ranks. Zero scores never
    /// qualify; ties rank below the older entry. Returns whether the entry
    /// went in.
    pub fn add_score(&mut self, entry: ScoreEntry) -> bool {
        if entry.score == 0 {
            return false;
        }
        let rank = self.entries.partition_point(|e| e.score >= entry.score);
        if rank >= TABLE_SIZE {
            return false;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(TABLE_SIZE);
        true
    }

    fn file_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("asteroids").join("highscores.json"))
    }

    /// Read the table from disk, falling back to an empty one on any
    /// failure.
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            warn!("No data directory available; high scores will not persist");
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Ignoring unreadable high score table {path:?}: {e}");
                Self::default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("Failed to read high score table {path:?}: {e}");
                Self::default()
            }
        }
    }

    /// Write the table to disk. Failures are logged and otherwise ignored.
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            warn!("No data directory available; dropping high scores");
            return;
        };
        match self.write_to(&path) {
            Ok(()) => info!("Saved high scores to {path:?}"),
            Err(e) => warn!("Failed to save high scores to {path:?}: {e}"),
        }
    }

    fn write_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_rank_best_first() {
        let mut scores = HighScores::default();
        assert!(scores.add_score(ScoreEntry::new(100, 1)));
        assert!(scores.add_score(ScoreEntry::new(300, 2)));
        assert!(scores.add_score(ScoreEntry::new(200, 1)));

        let ordered: Vec<i64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![300, 200, 100]);
    }

    #[test]
    fn ties_rank_below_the_older_entry() {
        let mut scores = HighScores::default();
        scores.add_score(ScoreEntry::new(200, 1));
        scores.add_score(ScoreEntry::new(200, 7));

        assert_eq!(scores.entries[0].level, 1);
        assert_eq!(scores.entries[1].level, 7);
    }

    #[test]
    fn the_table_keeps_only_the_top_ten() {
        let mut scores = HighScores::default();
        for i in 1..=12 {
            scores.add_score(ScoreEntry::new(i * 10, 1));
        }
        assert_eq!(scores.entries.len(), TABLE_SIZE);
        assert_eq!(scores.entries[0].score, 120);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));
    }

    #[test]
    fn scores_below_the_table_are_turned_away() {
        let mut scores = HighScores::default();
        for i in 1..=10 {
            scores.add_score(ScoreEntry::new(i * 10 + 100, 1));
        }
        assert!(!scores.add_score(ScoreEntry::new(5, 1)));
        assert_eq!(scores.entries.len(), TABLE_SIZE);
    }

    #[test]
    fn zero_scores_never_qualify() {
        let mut scores = HighScores::default();
        assert!(!scores.add_score(ScoreEntry::new(0, 1)));
        assert!(scores.entries.is_empty());
    }
}
