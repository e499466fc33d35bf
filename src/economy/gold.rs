use bevy::prelude::*;
use crate::shared::*;

/// Running totals for the bag panel and the session log.
#[derive(Resource, Debug, Clone, Default)]
pub struct EconomyStats {
    pub total_earned: u64,
    pub total_spent: u64,
    pub total_penalties: u64,
    pub total_transactions: u64,
}

impl EconomyStats {
    pub fn record(&mut self, amount: i64, kind: GoldChangeKind) {
        if amount >= 0 {
            self.total_earned = self.total_earned.saturating_add(amount as u64);
        } else if kind == GoldChangeKind::Penalty {
            self.total_penalties = self.total_penalties.saturating_add(amount.unsigned_abs());
        } else {
            self.total_spent = self.total_spent.saturating_add(amount.unsigned_abs());
        }
        self.total_transactions += 1;
    }
}

/// Logs every GoldChangeEvent, folds it into EconomyStats and surfaces it
/// as a toast. Coins themselves have already moved by the time the event
/// is sent; overspending is refused at the point of sale.
pub fn record_gold_changes(
    mut gold_events: EventReader<GoldChangeEvent>,
    inventory: Res<InventoryState>,
    mut stats: ResMut<EconomyStats>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for ev in gold_events.read() {
        stats.record(ev.amount, ev.kind);
        if ev.amount >= 0 {
            info!(
                "[Economy] Coins +{}: {}. New balance: {}",
                ev.amount, ev.reason, inventory.coins
            );
        } else {
            info!(
                "[Economy] Coins -{}: {}. New balance: {}",
                ev.amount.unsigned_abs(),
                ev.reason,
                inventory.coins
            );
        }
        toasts.send(ToastEvent::new(format!("{} ({})", ev.reason, format_coins(ev.amount))));
    }
}

/// Signed coin amount for display, e.g. "+1,234c" or "-20c".
pub fn format_coins(amount: i64) -> String {
    let digits: Vec<char> = amount.unsigned_abs().to_string().chars().collect();
    let mut result = String::from(if amount < 0 { "-" } else { "+" });
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }
    result.push('c');
    result
}
