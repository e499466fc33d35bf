//! Planted entities and their watering-gated growth timers.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlantId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct PlantEntity {
    pub id: PlantId,
    /// Tile-snapped world position.
    pub position: Vec2,
    pub kind: PlantKind,
    pub planted_at: f64,
    pub watered: bool,
    pub watering_started_at: Option<f64>,
    pub grown: bool,
}

impl PlantEntity {
    pub fn tile(&self) -> (i32, i32) {
        world_to_tile(self.position)
    }

    /// Growth in `0.0..=1.0`; zero until watered.
    pub fn progress(&self, now: f64, growth_duration: f64) -> f32 {
        if self.grown {
            return 1.0;
        }
        match self.watering_started_at {
            Some(start) if growth_duration > 0.0 => {
                ((now - start) / growth_duration).clamp(0.0, 1.0) as f32
            }
            _ => 0.0,
        }
    }

    fn try_water(&mut self, now: f64) -> bool {
        if self.watered || self.grown {
            return false;
        }
        self.watered = true;
        self.watering_started_at = Some(now);
        true
    }
}

/// Owns every live plant. No two plants are ever closer than `spacing`
/// on both axes at once.
#[derive(Resource, Debug, Clone)]
pub struct GrowthRegistry {
    plants: Vec<PlantEntity>,
    next_id: u64,
    pub spacing: f32,
    pub growth_duration: f64,
}

impl Default for GrowthRegistry {
    fn default() -> Self {
        Self::new(30.0, 20.0)
    }
}

impl GrowthRegistry {
    pub fn new(spacing: f32, growth_duration: f64) -> Self {
        Self {
            plants: Vec::new(),
            next_id: 1,
            spacing,
            growth_duration,
        }
    }

    pub fn plants(&self) -> &[PlantEntity] {
        &self.plants
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn get(&self, id: PlantId) -> Option<&PlantEntity> {
        self.plants.iter().find(|p| p.id == id)
    }

    /// True when a plant at `position` would sit inside another plant's box.
    pub fn is_crowded(&self, position: Vec2) -> bool {
        self.plants.iter().any(|p| {
            (p.position.x - position.x).abs() < self.spacing
                && (p.position.y - position.y).abs() < self.spacing
        })
    }

    /// Places a plant at `position` (already snapped by the caller).
    /// Picks a uniformly random kind when `kind` is `None`.
    pub fn plant(
        &mut self,
        position: Vec2,
        kind: Option<PlantKind>,
        now: f64,
        rng: &mut impl Rng,
    ) -> Option<PlantId> {
        if self.is_crowded(position) {
            return None;
        }
        let kind = kind.unwrap_or_else(|| PlantKind::ALL[rng.gen_range(0..PlantKind::ALL.len())]);
        let id = PlantId(self.next_id);
        self.next_id += 1;
        self.plants.push(PlantEntity {
            id,
            position,
            kind,
            planted_at: now,
            watered: false,
            watering_started_at: None,
            grown: false,
        });
        Some(id)
    }

    /// Waters the unwatered plant on tile `(tile_x, tile_y)`.
    pub fn water(&mut self, tile_x: i32, tile_y: i32, now: f64) -> bool {
        self.plants
            .iter_mut()
            .find(|p| p.tile() == (tile_x, tile_y) && !p.watered && !p.grown)
            .is_some_and(|p| p.try_water(now))
    }

    /// Waters the closest unwatered plant within `max_dist` of `position`.
    pub fn water_nearest(&mut self, position: Vec2, max_dist: f32, now: f64) -> bool {
        let max_sq = max_dist * max_dist;
        self.plants
            .iter_mut()
            .filter(|p| !p.watered && !p.grown)
            .map(|p| (p.position.distance_squared(position), p))
            .filter(|(d, _)| *d <= max_sq)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .is_some_and(|(_, p)| p.try_water(now))
    }

    /// Waters every unwatered plant. Returns how many were watered.
    pub fn water_all_unwatered(&mut self, now: f64) -> usize {
        let mut watered = 0;
        for plant in self.plants.iter_mut() {
            if plant.try_water(now) {
                watered += 1;
            }
        }
        watered
    }

    /// Flips `grown` on every watered plant whose timer has elapsed.
    /// Returns the ids that matured this call.
    pub fn update_growth(&mut self, now: f64) -> Vec<PlantId> {
        let duration = self.growth_duration;
        let mut matured = Vec::new();
        for plant in self.plants.iter_mut().filter(|p| p.watered && !p.grown) {
            let Some(start) = plant.watering_started_at else {
                continue;
            };
            if now - start >= duration {
                plant.grown = true;
                matured.push(plant.id);
            }
        }
        matured
    }

    pub fn find_nearest_mature(&self, position: Vec2, max_dist: f32) -> Option<&PlantEntity> {
        let max_sq = max_dist * max_dist;
        self.plants
            .iter()
            .filter(|p| p.grown)
            .map(|p| (p.position.distance_squared(position), p))
            .filter(|(d, _)| *d <= max_sq)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p)
    }

    pub fn find_mature_at_tile(&self, tile_x: i32, tile_y: i32) -> Option<&PlantEntity> {
        self.plants
            .iter()
            .find(|p| p.grown && p.tile() == (tile_x, tile_y))
    }

    pub fn remove_plant(&mut self, id: PlantId) -> bool {
        let before = self.plants.len();
        self.plants.retain(|p| p.id != id);
        self.plants.len() != before
    }
}
