//! Farming domain: planting, watering, growth, harvest.
//!
//! The `GrowthRegistry` owns every plant. Systems here translate the
//! player's key presses into registry calls and keep growth ticking:
//!
//! - P plants at the tile under the player's feet (farm only), using a
//!   bought seed packet when one is on hand, otherwise a random kind
//! - Q waters the nearest unwatered plant and costs one unit of water
//! - H harvests the grown plant underfoot, or the nearest one in reach
//! - While the sky storms, every unwatered plant is watered each frame
//!
//! Timestamps come from `PlayTime`, and growth only runs while Playing, so
//! plants stand still with the clock while the shop is open.

use bevy::prelude::*;

use crate::calendar::{Clock, PlayTime};
use crate::config::GameConfig;
use crate::engine::EngineSet;
use crate::shared::*;

pub mod registry;

pub use registry::{GrowthRegistry, PlantEntity, PlantId};

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GrowthRegistry>()
            .add_systems(OnExit(GameState::Loading), start_registry)
            .add_systems(
                Update,
                (storm_watering, advance_growth)
                    .chain()
                    .in_set(EngineSet::Growth)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (plant_on_key, water_on_key, harvest_on_key)
                    .in_set(EngineSet::Interaction)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn start_registry(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(GrowthRegistry::new(
        config.plant_spacing,
        config.growth_duration_seconds,
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-frame growth
// ─────────────────────────────────────────────────────────────────────────────

/// Storm rain reaches every plant on the farm.
pub fn storm_watering(
    play_time: Res<PlayTime>,
    clock: Res<Clock>,
    mut registry: ResMut<GrowthRegistry>,
) {
    if clock.weather() != Weather::Storm {
        return;
    }
    let watered = registry.water_all_unwatered(play_time.elapsed_secs());
    if watered > 0 {
        info!("[Farming] Storm watered {} plant(s)", watered);
    }
}

pub fn advance_growth(play_time: Res<PlayTime>, mut registry: ResMut<GrowthRegistry>) {
    let matured = registry.update_growth(play_time.elapsed_secs());
    for id in matured {
        if let Some(plant) = registry.get(id) {
            debug!("[Farming] {} at {:?} is ready", plant.kind.name(), plant.tile());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Player actions
// ─────────────────────────────────────────────────────────────────────────────

fn plant_on_key(
    input: Res<ActionInput>,
    play_time: Res<PlayTime>,
    active_map: Res<ActiveMap>,
    player: Res<PlayerCharacter>,
    mut registry: ResMut<GrowthRegistry>,
    mut inventory: ResMut<InventoryState>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !input.plant {
        return;
    }
    if active_map.0 != MapId::Farm {
        toasts.send(ToastEvent::new("Nothing grows indoors"));
        return;
    }

    let spot = snap_to_tile(FeetHitbox::default().point(player.position));
    let seed = inventory.first_seed();
    let mut rng = rand::thread_rng();

    match registry.plant(spot, seed, play_time.elapsed_secs(), &mut rng) {
        Some(id) => {
            if let Some(kind) = seed {
                inventory.consume_seed(kind);
            }
            if let Some(plant) = registry.get(id) {
                info!("[Farming] Planted {} at tile {:?}", plant.kind.name(), plant.tile());
            }
        }
        None => {
            toasts.send(ToastEvent::new("Too close to another plant"));
        }
    }
}

fn water_on_key(
    input: Res<ActionInput>,
    play_time: Res<PlayTime>,
    config: Res<GameConfig>,
    player: Res<PlayerCharacter>,
    mut registry: ResMut<GrowthRegistry>,
    mut inventory: ResMut<InventoryState>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !input.water {
        return;
    }
    if inventory.water == 0 {
        toasts.send(ToastEvent::new("Watering can is empty. Refill at the well"));
        return;
    }

    let feet = FeetHitbox::default().point(player.position);
    if registry.water_nearest(feet, config.water_reach, play_time.elapsed_secs()) {
        inventory.use_water();
        info!("[Farming] Watered plant near {:?}; {} water left", world_to_tile(feet), inventory.water);
    } else {
        toasts.send(ToastEvent::new("Nothing nearby needs water"));
    }
}

fn harvest_on_key(
    input: Res<ActionInput>,
    config: Res<GameConfig>,
    player: Res<PlayerCharacter>,
    mut registry: ResMut<GrowthRegistry>,
    mut inventory: ResMut<InventoryState>,
    mut harvested: EventWriter<CropHarvestedEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !input.harvest {
        return;
    }

    let feet = FeetHitbox::default().point(player.position);
    let (tx, ty) = world_to_tile(feet);
    let target = registry
        .find_mature_at_tile(tx, ty)
        .or_else(|| registry.find_nearest_mature(feet, config.harvest_reach))
        .map(|p| (p.id, p.kind));

    let Some((id, kind)) = target else {
        toasts.send(ToastEvent::new("Nothing ready to harvest"));
        return;
    };

    if registry.remove_plant(id) {
        inventory.add_harvest(kind);
        harvested.send(CropHarvestedEvent { kind });
        toasts.send(ToastEvent::new(format!("Harvested {}", kind.name())));
        info!(
            "[Farming] Harvested {} ({} in bag)",
            kind.name(),
            inventory.harvested_count(kind)
        );
    }
}
