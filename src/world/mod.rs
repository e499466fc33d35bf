//! World domain plugin.
//!
//! Responsible for:
//! - Building the active map (farm or house interior)
//! - Publishing its obstacles, interaction zones and bounds
//! - Swapping maps when a door transition reaches its midpoint

use bevy::prelude::*;

use crate::engine::EngineSet;
use crate::shared::*;
use crate::transition::advance_transition;

pub mod maps;
pub mod tiled;

use maps::{build_map, MapLayout};

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldMap>()
            .add_systems(OnExit(GameState::Loading), load_initial_map)
            .add_systems(
                Update,
                handle_map_transition
                    .in_set(EngineSet::Clock)
                    .after(advance_transition),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// The layout currently on screen. Renderers watch this for changes.
#[derive(Resource, Debug, Clone, Default)]
pub struct WorldMap {
    pub layout: MapLayout,
}

/// Replaces every per-map resource in one go.
pub fn apply_layout(
    layout: MapLayout,
    world_map: &mut WorldMap,
    active: &mut ActiveMap,
    rects: &mut CollisionRects,
    zones: &mut InteractionZones,
    bounds: &mut WorldBounds,
) {
    active.0 = layout.id;
    rects.0 = layout.rects.clone();
    zones.0 = layout.zones.clone();
    *bounds = layout.bounds();
    world_map.layout = layout;
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn load_initial_map(
    mut world_map: ResMut<WorldMap>,
    mut active: ResMut<ActiveMap>,
    mut rects: ResMut<CollisionRects>,
    mut zones: ResMut<InteractionZones>,
    mut bounds: ResMut<WorldBounds>,
) {
    apply_layout(
        build_map(MapId::Farm),
        &mut world_map,
        &mut active,
        &mut rects,
        &mut zones,
        &mut bounds,
    );
    info!(
        "[World] Loaded {:?}: {} obstacles, {} zones",
        active.0,
        rects.0.len(),
        zones.0.len()
    );
}

/// Swaps in the destination map and drops the player on the spawn tile.
pub fn handle_map_transition(
    mut events: EventReader<MapTransitionEvent>,
    mut world_map: ResMut<WorldMap>,
    mut active: ResMut<ActiveMap>,
    mut rects: ResMut<CollisionRects>,
    mut zones: ResMut<InteractionZones>,
    mut bounds: ResMut<WorldBounds>,
    mut player: ResMut<PlayerCharacter>,
) {
    for event in events.read() {
        apply_layout(
            build_map(event.to_map),
            &mut world_map,
            &mut active,
            &mut rects,
            &mut zones,
            &mut bounds,
        );

        player.position = tile_center(event.spawn_tile.0, event.spawn_tile.1);
        player.moving = false;
        player.frame = 0;
        player.frame_timer.reset();
        info!(
            "[World] Entered {:?} at tile {:?}",
            event.to_map, event.spawn_tile
        );
    }
}
