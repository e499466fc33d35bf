use bevy::prelude::*;
use std::collections::HashMap;

use crate::shared::*;

/// Lifetime harvest counts per plant kind.
#[derive(Resource, Debug, Clone, Default)]
pub struct HarvestStats {
    pub crops: HashMap<PlantKind, u32>,
}

impl HarvestStats {
    pub fn total(&self) -> u32 {
        self.crops.values().sum()
    }
}

pub fn track_crop_harvests(
    mut events: EventReader<CropHarvestedEvent>,
    mut stats: ResMut<HarvestStats>,
) {
    for ev in events.read() {
        let count = stats.crops.entry(ev.kind).or_insert(0);
        *count += 1;
        debug!("[Economy] Lifetime {} harvested: {}", ev.kind.name(), count);
    }
}
