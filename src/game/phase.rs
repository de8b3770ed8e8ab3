//! The validated game-phase gate.
//!
//! A play session moves through a small lifecycle: attract screen, active
//! play, volley cleared, ship lost, game over. The current phase can only be
//! replaced along one of the legal lifecycle edges; any other request is
//! refused, logged, and leaves the phase exactly as it was.

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PhaseGate>();
    app.register_type::<PhaseGate>();
    app.add_message::<PhaseChanged>();
}

/// Discrete lifecycle stage of a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum GamePhase {
    /// Attract screen: title text and drifting rocks, waiting for the player.
    #[default]
    Start,
    /// Actual game, while the ship and asteroids are alive.
    Play,
    /// All asteroids in the volley have been destroyed.
    Win,
    /// The last of the player's ships was destroyed.
    Die,
    /// Session ended: show "GAME OVER" until the player loops back to Start.
    Over,
}

/// Message written by a system whose transition request was accepted.
///
/// The gate itself notifies nobody. Whichever system made the request owns
/// telling the rest of the game about it.
#[derive(Message, Debug, Clone, Copy)]
pub struct PhaseChanged {
    #[allow(dead_code)]
    pub from: GamePhase,
    pub to: GamePhase,
}

/// Resource owning the session's single phase value.
///
/// All mutation goes through [`PhaseGate::request`].
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct PhaseGate {
    current: GamePhase,
}

impl PhaseGate {
    pub fn current(&self) -> GamePhase {
        self.current
    }

    /// Request a phase transition.
    ///
    /// Requesting the phase we are already in is a no-op. A request along a
    /// legal lifecycle edge replaces the phase and returns true. Everything
    /// else is refused: the refusal is logged, the phase is unchanged, and
    /// false is returned. Never panics.
    pub fn request(&mut self, next: GamePhase) -> bool {
        use GamePhase::*;

        if next == self.current {
            return true;
        }

        let allowed = matches!(
            (self.current, next),
            (Over, Start)
                | (Start, Play)
                | (Win, Play)
                | (Over, Play)
                | (Play, Win)
                | (Play, Die)
                | (Die, Over)
        );

        if allowed {
            self.current = next;
        } else {
            error!("Cannot change phase from {:?} to {:?}!", self.current, next);
        }
        allowed
    }
}

/// Run condition for systems that should only run during the given phase.
pub fn in_phase(phase: GamePhase) -> impl Fn(Res<PhaseGate>) -> bool {
    move |gate: Res<PhaseGate>| gate.current() == phase
}

#[cfg(test)]
mod tests {
    use super::*;
    use GamePhase::*;

    const ALL: [GamePhase; 5] = [Start, Play, Win, Die, Over];
    const EDGES: [(GamePhase, GamePhase); 7] = [
        (Over, Start),
        (Start, Play),
        (Win, Play),
        (Over, Play),
        (Play, Win),
        (Play, Die),
        (Die, Over),
    ];

    fn gate_at(phase: GamePhase) -> PhaseGate {
        let mut gate = PhaseGate::default();
        gate.current = phase;
        gate
    }

    #[test]
    fn sessions_begin_on_the_attract_screen() {
        assert_eq!(PhaseGate::default().current(), Start);
    }

    #[test]
    fn legal_edges_replace_the_phase() {
        for (from, to) in EDGES {
            let mut gate = gate_at(from);
            assert!(gate.request(to), "{from:?} -> {to:?} should be accepted");
            assert_eq!(gate.current(), to);
        }
    }

    #[test]
    fn requesting_the_current_phase_changes_nothing() {
        for phase in ALL {
            let mut gate = gate_at(phase);
            gate.request(phase);
            assert_eq!(gate.current(), phase);
        }
    }

    #[test]
    fn every_other_pair_is_refused() {
        for from in ALL {
            for to in ALL {
                if from == to || EDGES.contains(&(from, to)) {
                    continue;
                }
                let mut gate = gate_at(from);
                assert!(!gate.request(to), "{from:?} -> {to:?} should be refused");
                assert_eq!(gate.current(), from, "phase must survive {from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn game_over_loops_back_to_the_attract_screen() {
        let mut gate = gate_at(Over);
        assert!(gate.request(Start));
        assert_eq!(gate.current(), Start);
    }

    #[test]
    fn cannot_jump_to_the_attract_screen_mid_game() {
        let mut gate = gate_at(Play);
        assert!(!gate.request(Start));
        assert_eq!(gate.current(), Play);
    }
}
