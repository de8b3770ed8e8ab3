//! The title screen that appears after the splash screen.

use bevy::prelude::*;

use crate::audio::music;
use crate::menus::Menu;
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Title), (open_main_menu, start_title_music));
    app.add_systems(OnExit(Screen::Title), close_menu);
}

fn open_main_menu(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Main);
}

fn close_menu(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::None);
}

fn start_title_music(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        Name::new("Title Music"),
        music(asset_server.load("audio/music/title.ogg")),
        DespawnOnExit(Screen::Title),
    ));
}
