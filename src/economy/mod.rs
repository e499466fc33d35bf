//! Economy domain: coins, shipping, the seed shop, harvest totals.
//!
//! Coin balances live on `InventoryState` and are changed at the point of
//! sale. Every change is then announced with a GoldChangeEvent, which this
//! domain logs, tallies and turns into a toast.

use bevy::prelude::*;
use crate::config::GameConfig;
use crate::engine::EngineSet;
use crate::shared::*;

pub mod gold;
pub mod shipping;
pub mod shop;
pub mod stats;

use gold::{record_gold_changes, EconomyStats};
use shop::{on_enter_shop, shop_buy, shop_close, shop_navigate, ShopState};
use stats::{track_crop_harvests, HarvestStats};

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InventoryState>()
            .init_resource::<EconomyStats>()
            .init_resource::<ShopState>()
            .init_resource::<HarvestStats>();

        app.add_systems(OnExit(GameState::Loading), start_inventory);

        app.add_systems(OnEnter(GameState::Shop), on_enter_shop);

        app.add_systems(
            Update,
            (shop_navigate, shop_buy, shop_close)
                .chain()
                .in_set(EngineSet::Interaction)
                .run_if(in_state(GameState::Shop)),
        );

        // Bookkeeping runs in every state so no event is missed.
        app.add_systems(
            Update,
            (record_gold_changes, track_crop_harvests).in_set(EngineSet::Handoff),
        );
    }
}

fn start_inventory(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(InventoryState::new(
        config.starting_coins,
        config.water_capacity,
    ));
    info!(
        "[Economy] Starting with {} coins, watering can holds {}",
        config.starting_coins, config.water_capacity
    );
}
