pub mod movement;

use bevy::prelude::*;
use crate::config::GameConfig;
use crate::engine::EngineSet;
use crate::shared::*;

use movement::{update_movement, MotionTuning};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerCharacter>()
            .add_systems(OnExit(GameState::Loading), spawn_player)
            .add_systems(
                Update,
                move_player
                    .in_set(EngineSet::Movement)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn spawn_player(mut player: ResMut<PlayerCharacter>) {
    *player = PlayerCharacter::default();
    info!("[Player] Spawned at tile {:?}", FARM_SPAWN_TILE);
}

/// Applies held directions to the player and resolves against the active
/// map's obstacles.
pub fn move_player(
    time: Res<Time>,
    input: Res<ActionInput>,
    config: Res<GameConfig>,
    rects: Res<CollisionRects>,
    bounds: Res<WorldBounds>,
    mut player: ResMut<PlayerCharacter>,
) {
    let tuning = MotionTuning {
        speed: config.player_speed,
        ..default()
    };
    update_movement(
        &mut player,
        &input,
        time.delta_secs(),
        &rects.0,
        *bounds,
        &tuning,
    );
}
