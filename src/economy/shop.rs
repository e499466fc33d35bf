use bevy::prelude::*;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Resources
// ─────────────────────────────────────────────────────────────────────────────

/// One seed packet on the storefront shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopItem {
    pub kind: PlantKind,
    pub price: u32,
}

/// The storefront's shelf and the highlighted row.
#[derive(Resource, Debug, Clone)]
pub struct ShopState {
    pub items: Vec<ShopItem>,
    pub selected: usize,
}

impl Default for ShopState {
    fn default() -> Self {
        Self {
            items: PlantKind::ALL
                .iter()
                .map(|kind| ShopItem {
                    kind: *kind,
                    price: kind.seed_price(),
                })
                .collect(),
            selected: 0,
        }
    }
}

impl ShopState {
    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn selected_item(&self) -> Option<ShopItem> {
        self.items.get(self.selected).copied()
    }
}

/// Buys one packet. Leaves the inventory untouched when coins are short.
pub fn try_purchase(item: ShopItem, inventory: &mut InventoryState) -> bool {
    if !inventory.spend(item.price) {
        return false;
    }
    inventory.add_seed(item.kind);
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems (GameState::Shop only)
// ─────────────────────────────────────────────────────────────────────────────

pub fn on_enter_shop(mut shop: ResMut<ShopState>, inventory: Res<InventoryState>) {
    shop.selected = 0;
    info!("[Economy] Seed shop open, {} coins on hand", inventory.coins);
}

pub fn shop_navigate(input: Res<ActionInput>, mut shop: ResMut<ShopState>) {
    if input.menu_down {
        shop.select_next();
    } else if input.menu_up {
        shop.select_prev();
    }
}

pub fn shop_buy(
    input: Res<ActionInput>,
    shop: Res<ShopState>,
    mut inventory: ResMut<InventoryState>,
    mut gold_events: EventWriter<GoldChangeEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !input.confirm {
        return;
    }
    let Some(item) = shop.selected_item() else {
        return;
    };

    if try_purchase(item, &mut inventory) {
        gold_events.send(GoldChangeEvent {
            amount: -(item.price as i64),
            kind: GoldChangeKind::Purchase,
            reason: format!("Bought {} seeds", item.kind.name()),
        });
    } else {
        toasts.send(ToastEvent::new("Not enough coins"));
        warn!(
            "[Economy] Cannot afford {} seeds ({}c, have {}c)",
            item.kind.name(),
            item.price,
            inventory.coins
        );
    }
}

pub fn shop_close(input: Res<ActionInput>, mut next_state: ResMut<NextState<GameState>>) {
    if input.cancel {
        next_state.set(GameState::Playing);
        info!("[Economy] Seed shop closed");
    }
}
