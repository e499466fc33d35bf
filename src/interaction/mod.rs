//! Interaction domain: the context-sensitive action key.
//!
//! On the frame E goes down, the player's feet tile is compared against the
//! active map's zones. The first zone within one orthogonal step wins, in
//! the order the world domain listed them, and its kind decides what
//! happens: ship crops, refill water, walk through a door, sleep, or open
//! the seed shop.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::economy::shipping::ship_all;
use crate::engine::EngineSet;
use crate::stamina::StaminaClock;
use crate::transition::{SceneTransition, TransitionAction};
use crate::shared::*;

/// First zone whose tile is the feet tile or one of its four orthogonal
/// neighbours. Diagonal neighbours are not adjacent.
pub fn resolve(feet: Vec2, zones: &[InteractionZone]) -> Option<&InteractionZone> {
    let (px, py) = world_to_tile(feet);
    zones.iter().find(|zone| {
        let (zx, zy) = zone.tile();
        (zx - px).abs() + (zy - py).abs() <= 1
    })
}

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            interact_on_key
                .in_set(EngineSet::Interaction)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub fn interact_on_key(
    input: Res<ActionInput>,
    time: Res<Time>,
    config: Res<GameConfig>,
    player: Res<PlayerCharacter>,
    zones: Res<InteractionZones>,
    mut inventory: ResMut<InventoryState>,
    mut stamina: ResMut<StaminaClock>,
    mut transition: ResMut<SceneTransition>,
    mut next_state: ResMut<NextState<GameState>>,
    mut gold_events: EventWriter<GoldChangeEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !input.interact {
        return;
    }

    let feet = FeetHitbox::default().point(player.position);
    let Some(zone) = resolve(feet, &zones.0) else {
        return;
    };
    let now = time.elapsed_secs_f64();

    match zone.kind {
        InteractionKind::Ship => {
            let report = ship_all(&mut inventory);
            if report.items == 0 {
                toasts.send(ToastEvent::new("Nothing to ship"));
                return;
            }
            info!("[Interaction] Shipped {} crop(s) for {} coins", report.items, report.total);
            gold_events.send(GoldChangeEvent {
                amount: report.total as i64,
                kind: GoldChangeKind::Shipment,
                reason: format!("Shipped {} crop(s)", report.items),
            });
        }
        InteractionKind::Well => {
            inventory.refill_water();
            toasts.send(ToastEvent::new(format!(
                "Watering can refilled ({}/{})",
                inventory.water, inventory.water_capacity
            )));
        }
        InteractionKind::EnterHouse => {
            transition.start(
                now,
                config.transition_seconds,
                TransitionAction::ChangeMap {
                    to_map: MapId::House,
                    spawn_tile: HOUSE_SPAWN_TILE,
                },
            );
        }
        InteractionKind::ExitHouse => {
            transition.start(
                now,
                config.transition_seconds,
                TransitionAction::ChangeMap {
                    to_map: MapId::Farm,
                    spawn_tile: FARM_DOOR_SPAWN_TILE,
                },
            );
        }
        InteractionKind::Bed => {
            stamina.begin_sleep();
            transition.start(now, config.transition_seconds, TransitionAction::Sleep);
            info!("[Interaction] Going to bed");
        }
        InteractionKind::Storefront => {
            next_state.set(GameState::Shop);
            info!("[Interaction] Opening seed shop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones() -> Vec<InteractionZone> {
        vec![
            InteractionZone::at_tile(5, 5, InteractionKind::Well),
            InteractionZone::at_tile(6, 5, InteractionKind::Ship),
            InteractionZone::at_tile(10, 10, InteractionKind::Bed),
        ]
    }

    #[test]
    fn test_same_tile_and_orthogonal_neighbours_are_adjacent() {
        let zones = zones();
        assert_eq!(resolve(tile_center(10, 10), &zones).map(|z| z.kind), Some(InteractionKind::Bed));
        assert_eq!(resolve(tile_center(10, 11), &zones).map(|z| z.kind), Some(InteractionKind::Bed));
        assert_eq!(resolve(tile_center(9, 10), &zones).map(|z| z.kind), Some(InteractionKind::Bed));
    }

    #[test]
    fn test_diagonal_is_not_adjacent() {
        let zones = zones();
        assert!(resolve(tile_center(11, 11), &zones).is_none());
        assert!(resolve(tile_center(9, 9), &zones).is_none());
    }

    #[test]
    fn test_first_zone_in_list_order_wins() {
        let zones = zones();
        // (6, 5) is the ship's own tile but also next to the well, which is listed first.
        assert_eq!(resolve(tile_center(5, 5), &zones).map(|z| z.kind), Some(InteractionKind::Well));
        assert_eq!(resolve(tile_center(6, 5), &zones).map(|z| z.kind), Some(InteractionKind::Well));

        let mut reversed = zones.clone();
        reversed.reverse();
        assert_eq!(resolve(tile_center(6, 5), &reversed).map(|z| z.kind), Some(InteractionKind::Ship));
        assert_eq!(resolve(tile_center(6, 6), &zones).map(|z| z.kind), Some(InteractionKind::Ship));
    }

    #[test]
    fn test_nothing_nearby() {
        assert!(resolve(tile_center(0, 0), &zones()).is_none());
        assert!(resolve(tile_center(0, 0), &[]).is_none());
    }
}
