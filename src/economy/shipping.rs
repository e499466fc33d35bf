use crate::shared::*;

/// Outcome of emptying the bag into the shipping bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShipmentReport {
    pub items: u32,
    pub total: u32,
}

/// Coins the harvested crops would fetch right now.
pub fn calculate_shipment_value(inventory: &InventoryState) -> u32 {
    inventory
        .harvested
        .iter()
        .map(|(kind, count)| kind.sell_price().saturating_mul(*count))
        .fold(0u32, |acc, v| acc.saturating_add(v))
}

/// Sells every harvested crop at its fixed price, credits the coins and
/// zeroes the counts. Kinds stay present with a count of zero.
pub fn ship_all(inventory: &mut InventoryState) -> ShipmentReport {
    let report = ShipmentReport {
        items: inventory.harvested.values().sum(),
        total: calculate_shipment_value(inventory),
    };
    for count in inventory.harvested.values_mut() {
        *count = 0;
    }
    inventory.earn(report.total);
    report
}
