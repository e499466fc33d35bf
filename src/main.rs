use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use tillfield::engine::EnginePlugin;
use tillfield::shared::*;
use tillfield::ui::UiPlugin;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Tillfield".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .add_plugins(EnginePlugin)
        .add_plugins(UiPlugin)
        .run();
}
