//! Session flow: the phase machine driving attract mode, volleys, lives,
//! respawns, game over, and the HUD.
//!
//! Every phase transition in here goes through the gate, and every accepted
//! transition is announced with a [`PhaseChanged`] message by the system
//! that requested it.

use bevy::{prelude::*, ui::Val::*};

use super::{
    asteroid::AsteroidDestroyed,
    field::FieldBounds,
    highscore::{HighScores, ScoreEntry},
    phase::{GamePhase, PhaseChanged, PhaseGate, in_phase},
    registry::LiveEntities,
    score::ScoreBoard,
    ship::{Ship, ShipDestroyed},
    spawner,
};
use crate::{
    AppSystems, PausableSystems,
    screens::Screen,
    theme::{
        palette::{HEADER_TEXT, LABEL_TEXT},
        widget,
    },
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            (
                tick_respawn_countdown.run_if(in_phase(GamePhase::Play)),
                tick_game_over_countdown.run_if(in_phase(GamePhase::Die)),
            )
                .in_set(AppSystems::TickTimers),
            (
                // The attract-screen handler goes first: a restart keystroke
                // flips the phase to Start, and without this order the same
                // release would also begin play and skip the attract screen.
                begin_play_on_confirm.run_if(in_phase(GamePhase::Start)),
                restart_on_confirm.run_if(in_phase(GamePhase::Over)),
            )
                .chain()
                .in_set(AppSystems::RecordInput),
            (
                // Death resolves before volley advancement: when the final
                // ship loss and the last rock land on the same frame, the
                // session takes the Die edge rather than Win.
                (
                    handle_ship_destroyed,
                    advance_volley_when_cleared.run_if(in_phase(GamePhase::Play)),
                )
                    .chain(),
                start_next_volley.run_if(in_phase(GamePhase::Win)),
                show_game_over,
                update_hud,
            )
                .in_set(AppSystems::Update),
        )
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );

    app.add_systems(OnExit(Screen::Gameplay), teardown_session);
}

/// Time between losing a ship and fielding the next one.
const RESPAWN_TIME_SECS: f32 = 2.0;

/// Pause on the death of the last ship before the game-over text appears.
const GAME_OVER_DELAY_SECS: f32 = 2.0;

/// Container entities the session parents its spawns to, to keep the
/// hierarchy clean.
#[derive(Resource, Debug)]
pub struct SessionLayers {
    #[allow(dead_code)]
    pub root: Entity,
    pub playfield: Entity,
}

/// Countdown between losing a ship and the next one appearing.
#[derive(Resource, Debug)]
struct RespawnCountdown(Timer);

impl Default for RespawnCountdown {
    fn default() -> Self {
        Self(Timer::from_seconds(RESPAWN_TIME_SECS, TimerMode::Once))
    }
}

/// Countdown between the final death and the game-over text.
#[derive(Resource, Debug)]
struct GameOverCountdown(Timer);

impl Default for GameOverCountdown {
    fn default() -> Self {
        Self(Timer::from_seconds(GAME_OVER_DELAY_SECS, TimerMode::Once))
    }
}

/// Marker for the attract-screen title and prompt.
#[derive(Component)]
struct StartOverlay;

/// Marker for the game-over overlay.
#[derive(Component)]
struct GameOverOverlay;

/// Marker for the HUD score readout.
#[derive(Component)]
struct HudScore;

/// Marker for the HUD lives readout.
#[derive(Component)]
struct HudLives;

/// Set up a fresh play session when entering gameplay.
/// Called from `screens/gameplay.rs` on `OnEnter(Screen::Gameplay)`.
pub fn spawn_session(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut gate: ResMut<PhaseGate>,
    mut board: ResMut<ScoreBoard>,
    mut live: ResMut<LiveEntities>,
    bounds: Res<FieldBounds>,
) {
    // A session gets freshly constructed context: the gate back on the
    // attract screen, a zeroed scoreboard, empty registries. Whatever the
    // previous session left in these died with its root entity.
    *gate = PhaseGate::default();
    *board = ScoreBoard::default();
    live.clear();

    let root = commands
        .spawn((
            Name::new("Session"),
            Transform::default(),
            Visibility::default(),
            DespawnOnExit(Screen::Gameplay),
        ))
        .id();
    let playfield = commands
        .spawn((
            Name::new("Playfield"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();
    commands.entity(root).add_child(playfield);
    commands.insert_resource(SessionLayers { root, playfield });

    spawner::spawn_attract_field(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut live,
        &bounds,
        playfield,
    );
    spawn_start_overlay(&mut commands);
    spawn_hud(&mut commands);

    info!("Session ready; waiting on the attract screen");
}

/// The attract screen waits for SPACE: key down clears the field, key up
/// starts the volley.
fn begin_play_on_confirm(
    input: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut gate: ResMut<PhaseGate>,
    mut live: ResMut<LiveEntities>,
    mut changed: MessageWriter<PhaseChanged>,
    board: Res<ScoreBoard>,
    bounds: Res<FieldBounds>,
    layers: Res<SessionLayers>,
    overlay_query: Query<Entity, With<StartOverlay>>,
) {
    let pressed = input.just_pressed(KeyCode::Space);
    let released = input.just_released(KeyCode::Space);
    if !pressed && !released {
        return;
    }

    // Clear the background rocks and the title as soon as the key goes
    // down. Harmless to repeat if the release lands on a later frame.
    live.remove_all_asteroids(&mut commands);
    for overlay in &overlay_query {
        commands.entity(overlay).despawn();
    }

    // The release starts the actual game.
    if released {
        spawner::spawn_ship(&mut commands, &mut meshes, &mut materials, layers.playfield);
        spawner::spawn_volley(
            &mut commands,
            &mut meshes,
            &mut materials,
            &mut live,
            &bounds,
            layers.playfield,
            board.level,
        );
        if gate.request(GamePhase::Play) {
            changed.write(PhaseChanged {
                from: GamePhase::Start,
                to: GamePhase::Play,
            });
        }
    }
}

/// When the last rock of a volley dies, the volley is won.
fn advance_volley_when_cleared(
    mut destroyed_events: MessageReader<AsteroidDestroyed>,
    mut gate: ResMut<PhaseGate>,
    mut changed: MessageWriter<PhaseChanged>,
    live: Res<LiveEntities>,
) {
    if destroyed_events.is_empty() {
        return;
    }
    destroyed_events.clear();

    if live.asteroid_count() == 0 && gate.request(GamePhase::Win) {
        changed.write(PhaseChanged {
            from: GamePhase::Play,
            to: GamePhase::Win,
        });
    }
}

/// A won volley rolls straight into the next one, one level up.
fn start_next_volley(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut gate: ResMut<PhaseGate>,
    mut board: ResMut<ScoreBoard>,
    mut live: ResMut<LiveEntities>,
    mut changed: MessageWriter<PhaseChanged>,
    bounds: Res<FieldBounds>,
    layers: Res<SessionLayers>,
) {
    board.level += 1;
    info!("Volley cleared! Advancing to level {}", board.level);

    // Leftover shots don't carry into the new volley.
    live.remove_all_shots(&mut commands);

    spawner::spawn_volley(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut live,
        &bounds,
        layers.playfield,
        board.level,
    );
    if gate.request(GamePhase::Play) {
        changed.write(PhaseChanged {
            from: GamePhase::Win,
            to: GamePhase::Play,
        });
    }
}

/// Losing a ship costs a life; losing the last one ends the session.
fn handle_ship_destroyed(
    mut commands: Commands,
    mut destroyed_events: MessageReader<ShipDestroyed>,
    mut gate: ResMut<PhaseGate>,
    mut board: ResMut<ScoreBoard>,
    mut changed: MessageWriter<PhaseChanged>,
) {
    for _ in destroyed_events.read() {
        board.lives = board.lives.saturating_sub(1);

        if board.lives > 0 {
            info!("Ship lost; {} remaining", board.lives);
            commands.insert_resource(RespawnCountdown::default());
        } else if gate.request(GamePhase::Die) {
            changed.write(PhaseChanged {
                from: GamePhase::Play,
                to: GamePhase::Die,
            });
            commands.insert_resource(GameOverCountdown::default());
        }
    }
}

/// Field the next ship once the respawn countdown runs out.
fn tick_respawn_countdown(
    time: Res<Time>,
    countdown: Option<ResMut<RespawnCountdown>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    layers: Res<SessionLayers>,
) {
    let Some(mut countdown) = countdown else {
        return;
    };
    countdown.0.tick(time.delta());
    if countdown.0.just_finished() {
        spawner::spawn_ship(&mut commands, &mut meshes, &mut materials, layers.playfield);
        commands.remove_resource::<RespawnCountdown>();
    }
}

/// Let the wreck settle, then move from Die to Over.
fn tick_game_over_countdown(
    time: Res<Time>,
    countdown: Option<ResMut<GameOverCountdown>>,
    mut commands: Commands,
    mut gate: ResMut<PhaseGate>,
    mut changed: MessageWriter<PhaseChanged>,
) {
    let Some(mut countdown) = countdown else {
        return;
    };
    countdown.0.tick(time.delta());
    if countdown.0.just_finished() {
        if gate.request(GamePhase::Over) {
            changed.write(PhaseChanged {
                from: GamePhase::Die,
                to: GamePhase::Over,
            });
        }
        commands.remove_resource::<GameOverCountdown>();
    }
}

/// React to the session ending: record the score, show the overlay.
fn show_game_over(
    mut commands: Commands,
    mut changed: MessageReader<PhaseChanged>,
    mut high_scores: ResMut<HighScores>,
    board: Res<ScoreBoard>,
) {
    for event in changed.read() {
        if event.to != GamePhase::Over {
            continue;
        }
        info!("GAME OVER! Final score: {}", board.score());

        let entry = ScoreEntry::new(board.score(), board.level);
        if high_scores.add_score(entry) {
            info!("New high score!");
            high_scores.save();
        }

        commands.spawn((
            widget::ui_root("Game Over Overlay"),
            GameOverOverlay,
            GlobalZIndex(1),
            DespawnOnExit(Screen::Gameplay),
            children![
                (
                    Name::new("Game Over Title"),
                    Text("GAME OVER".to_string()),
                    TextFont::from_font_size(64.0),
                    TextColor(HEADER_TEXT),
                ),
                widget::label(format!("Final score: {}", board.score())),
                widget::label("Press SPACE to play again"),
            ],
        ));
    }
}

/// Loop from game over back to the attract screen, with everything reset.
fn restart_on_confirm(
    input: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut gate: ResMut<PhaseGate>,
    mut board: ResMut<ScoreBoard>,
    mut live: ResMut<LiveEntities>,
    mut changed: MessageWriter<PhaseChanged>,
    bounds: Res<FieldBounds>,
    layers: Res<SessionLayers>,
    overlay_query: Query<Entity, With<GameOverOverlay>>,
    ship_query: Query<Entity, With<Ship>>,
) {
    // Ordered after the attract screen's confirm handler, so one release
    // can't both restart and begin play in the same frame.
    if !input.just_released(KeyCode::Space) {
        return;
    }

    // Sweep the field: overlay, leftovers, bookkeeping.
    for overlay in &overlay_query {
        commands.entity(overlay).despawn();
    }
    for ship in &ship_query {
        commands.entity(ship).despawn();
    }
    live.remove_all_shots(&mut commands);
    live.remove_all_asteroids(&mut commands);

    // The score only resets here, on a full restart.
    *board = ScoreBoard::default();

    if gate.request(GamePhase::Start) {
        changed.write(PhaseChanged {
            from: GamePhase::Over,
            to: GamePhase::Start,
        });
    }

    spawner::spawn_attract_field(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut live,
        &bounds,
        layers.playfield,
    );
    spawn_start_overlay(&mut commands);
}

/// Keep the score and lives readouts current.
fn update_hud(
    board: Res<ScoreBoard>,
    mut score_query: Query<&mut Text, (With<HudScore>, Without<HudLives>)>,
    mut lives_query: Query<&mut Text, (With<HudLives>, Without<HudScore>)>,
) {
    if let Ok(mut text) = score_query.single_mut() {
        text.0 = format!("Score: {}", board.score());
    }
    if let Ok(mut text) = lives_query.single_mut() {
        let mut lives = String::from("Lives:");
        for _ in 0..board.lives {
            // Carets pass for little ships.
            lives.push_str(" ^");
        }
        text.0 = lives;
    }
}

fn spawn_start_overlay(commands: &mut Commands) {
    commands.spawn((
        widget::ui_root("Start Overlay"),
        StartOverlay,
        GlobalZIndex(1),
        DespawnOnExit(Screen::Gameplay),
        children![
            (
                Name::new("Game Title"),
                Text("ASTEROIDS".to_string()),
                TextFont::from_font_size(64.0),
                TextColor(HEADER_TEXT),
            ),
            widget::label("Press SPACE to begin"),
        ],
    ));
}

fn spawn_hud(commands: &mut Commands) {
    commands.spawn((
        Name::new("HUD"),
        Node {
            position_type: PositionType::Absolute,
            width: Percent(100.0),
            height: Percent(100.0),
            padding: UiRect::all(Px(12.0)),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::FlexStart,
            ..default()
        },
        Pickable::IGNORE,
        DespawnOnExit(Screen::Gameplay),
        children![
            (
                Name::new("Score Readout"),
                HudScore,
                Text("Score: 0".to_string()),
                TextFont::from_font_size(24.0),
                TextColor(LABEL_TEXT),
            ),
            (
                Name::new("Lives Readout"),
                HudLives,
                Text("Lives:".to_string()),
                TextFont::from_font_size(24.0),
                TextColor(LABEL_TEXT),
            ),
        ],
    ));
}

/// Forget session bookkeeping when gameplay is left; the scene itself dies
/// with the session root.
fn teardown_session(mut commands: Commands, mut live: ResMut<LiveEntities>) {
    live.clear();
    commands.remove_resource::<SessionLayers>();
    commands.remove_resource::<RespawnCountdown>();
    commands.remove_resource::<GameOverCountdown>();
}
