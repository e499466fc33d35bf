pub mod handoff;
pub mod render;

use bevy::prelude::*;

/// Windowed frontend. The handoff itself is part of the engine so headless
/// runs still build a `RenderSnapshot`.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(render::RenderPlugin);
    }
}
