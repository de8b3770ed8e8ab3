//! The credits menu.

use bevy::{
    ecs::spawn::SpawnIter, input::common_conditions::input_just_pressed, prelude::*, ui::Val::*,
};

use crate::{menus::Menu, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Credits), spawn_credits_menu);
    app.add_systems(
        Update,
        go_back.run_if(in_state(Menu::Credits).and(input_just_pressed(KeyCode::Escape))),
    );
}

fn spawn_credits_menu(mut commands: Commands) {
    commands.spawn((
        widget::ui_root("Credits Menu"),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.05, 0.95)),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Credits),
        children![
            widget::header("Created by"),
            created_by(),
            widget::header("Built with"),
            built_with(),
            widget::button("Back", go_back_on_click),
        ],
    ));
}

fn created_by() -> impl Bundle {
    grid(vec![["Steve", "Everything else"]])
}

fn built_with() -> impl Bundle {
    grid(vec![["Bevy", "Engine and UI"], ["Rust", "All of the code"]])
}

fn grid(content: Vec<[&'static str; 2]>) -> impl Bundle {
    let content = content
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(i, text)| {
            (
                widget::label(text),
                Node {
                    justify_self: if i % 2 == 0 {
                        JustifySelf::End
                    } else {
                        JustifySelf::Start
                    },
                    ..default()
                },
            )
        })
        .collect::<Vec<_>>();

    (
        Name::new("Grid"),
        Node {
            display: Display::Grid,
            row_gap: Px(10.0),
            column_gap: Px(30.0),
            grid_template_columns: RepeatedGridTrack::px(2, 400.0),
            ..default()
        },
        Children::spawn(SpawnIter(content.into_iter())),
    )
}

fn go_back_on_click(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}

fn go_back(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}
