//! Shared components, resources, events, and states for Tillfield.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain's internals except through the
//! pure functions they export.
//!
//! World coordinates are pixels with the origin at the top-left of the
//! active map and y growing downward. The renderer flips y when it builds
//! transforms.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    /// Modal storefront. Captures all input until closed.
    Shop,
}

// ═══════════════════════════════════════════════════════════════════════
// CALENDAR
// ═══════════════════════════════════════════════════════════════════════

pub const DAYS_PER_SEASON: u32 = 10;
pub const SEASON_COUNT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Cloud,
    Storm,
}

impl Weather {
    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Cloud => "Cloudy",
            Weather::Storm => "Storm",
        }
    }
}

pub fn season_name(index: u32) -> &'static str {
    match index % SEASON_COUNT {
        0 => "Spring",
        1 => "Summer",
        2 => "Fall",
        _ => "Winter",
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Left,
    #[default]
    Down,
    Right,
}

impl Facing {
    /// Row of the walk cycle in a four-direction character sheet.
    pub fn sheet_row(self) -> usize {
        match self {
            Facing::Up => 0,
            Facing::Left => 1,
            Facing::Down => 2,
            Facing::Right => 3,
        }
    }
}

/// Seconds each walk frame is shown.
pub const WALK_FRAME_SECONDS: f32 = 0.15;

/// The single player character. Position is the sprite centre.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlayerCharacter {
    pub position: Vec2,
    pub facing: Facing,
    pub frame: usize,
    pub frame_timer: Timer,
    pub moving: bool,
}

impl Default for PlayerCharacter {
    fn default() -> Self {
        Self {
            position: tile_center(FARM_SPAWN_TILE.0, FARM_SPAWN_TILE.1),
            facing: Facing::Down,
            frame: 0,
            frame_timer: Timer::from_seconds(WALK_FRAME_SECONDS, TimerMode::Repeating),
            moving: false,
        }
    }
}

/// Narrow collision box at the bottom of the player sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeetHitbox {
    pub width: f32,
    pub height: f32,
}

impl Default for FeetHitbox {
    fn default() -> Self {
        Self {
            width: SPRITE_WIDTH * FEET_WIDTH_FRACTION,
            height: FEET_HEIGHT,
        }
    }
}

impl FeetHitbox {
    /// Box for a sprite centred at `position`, flush with its bottom edge.
    pub fn rect_at(&self, position: Vec2) -> CollisionRect {
        let bottom = position.y + SPRITE_HEIGHT * 0.5;
        CollisionRect::new(
            position.x - self.width * 0.5,
            bottom - self.height,
            self.width,
            self.height,
        )
    }

    /// Centre of the feet box; used for tile lookups.
    pub fn point(&self, position: Vec2) -> Vec2 {
        Vec2::new(position.x, position.y + SPRITE_HEIGHT * 0.5 - self.height * 0.5)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT: rebuilt every frame in PreUpdate by the input domain
// ═══════════════════════════════════════════════════════════════════════

/// Actions for this frame. Directions are held state; everything else is
/// true only on the frame its key went down.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ActionInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub plant: bool,
    pub harvest: bool,
    pub water: bool,
    pub interact: bool,
    pub toggle_bag: bool,
    pub face: Option<Facing>,
    pub menu_up: bool,
    pub menu_down: bool,
    pub confirm: bool,
    pub cancel: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// PLANTS & INVENTORY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlantKind {
    Carrot,
    Tomato,
    Corn,
    Pumpkin,
    Strawberry,
    Potato,
}

impl PlantKind {
    pub const ALL: [PlantKind; 6] = [
        PlantKind::Carrot,
        PlantKind::Tomato,
        PlantKind::Corn,
        PlantKind::Pumpkin,
        PlantKind::Strawberry,
        PlantKind::Potato,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlantKind::Carrot => "Carrot",
            PlantKind::Tomato => "Tomato",
            PlantKind::Corn => "Corn",
            PlantKind::Pumpkin => "Pumpkin",
            PlantKind::Strawberry => "Strawberry",
            PlantKind::Potato => "Potato",
        }
    }

    /// Coins paid per harvested crop at the shipping bin.
    pub fn sell_price(self) -> u32 {
        match self {
            PlantKind::Carrot => 8,
            PlantKind::Tomato => 12,
            PlantKind::Corn => 10,
            PlantKind::Pumpkin => 25,
            PlantKind::Strawberry => 18,
            PlantKind::Potato => 6,
        }
    }

    /// Cost of one seed packet at the storefront.
    pub fn seed_price(self) -> u32 {
        match self {
            PlantKind::Carrot => 4,
            PlantKind::Tomato => 6,
            PlantKind::Corn => 5,
            PlantKind::Pumpkin => 12,
            PlantKind::Strawberry => 9,
            PlantKind::Potato => 3,
        }
    }

    /// Placeholder tint used by the sprite-less renderer.
    pub fn color(self) -> Color {
        match self {
            PlantKind::Carrot => Color::srgb(0.95, 0.55, 0.15),
            PlantKind::Tomato => Color::srgb(0.85, 0.15, 0.15),
            PlantKind::Corn => Color::srgb(0.95, 0.85, 0.25),
            PlantKind::Pumpkin => Color::srgb(0.90, 0.45, 0.05),
            PlantKind::Strawberry => Color::srgb(0.95, 0.30, 0.45),
            PlantKind::Potato => Color::srgb(0.65, 0.50, 0.30),
        }
    }
}

/// Harvested crops, seed packets, coins and the watering can.
///
/// Every plant kind always has an entry in `harvested` and `seeds`.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct InventoryState {
    pub harvested: HashMap<PlantKind, u32>,
    pub seeds: HashMap<PlantKind, u32>,
    pub coins: u32,
    pub water: u32,
    pub water_capacity: u32,
}

impl Default for InventoryState {
    fn default() -> Self {
        Self::new(STARTING_COINS, WATER_CAPACITY)
    }
}

impl InventoryState {
    pub fn new(coins: u32, water_capacity: u32) -> Self {
        Self {
            harvested: PlantKind::ALL.iter().map(|k| (*k, 0)).collect(),
            seeds: PlantKind::ALL.iter().map(|k| (*k, 0)).collect(),
            coins,
            water: water_capacity,
            water_capacity,
        }
    }

    pub fn harvested_count(&self, kind: PlantKind) -> u32 {
        self.harvested.get(&kind).copied().unwrap_or(0)
    }

    pub fn seed_count(&self, kind: PlantKind) -> u32 {
        self.seeds.get(&kind).copied().unwrap_or(0)
    }

    pub fn add_harvest(&mut self, kind: PlantKind) {
        *self.harvested.entry(kind).or_insert(0) += 1;
    }

    pub fn add_seed(&mut self, kind: PlantKind) {
        *self.seeds.entry(kind).or_insert(0) += 1;
    }

    /// First kind with a seed packet on hand, in declaration order.
    pub fn first_seed(&self) -> Option<PlantKind> {
        PlantKind::ALL.iter().copied().find(|k| self.seed_count(*k) > 0)
    }

    pub fn consume_seed(&mut self, kind: PlantKind) -> bool {
        match self.seeds.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Returns false and leaves the balance untouched when short.
    pub fn spend(&mut self, amount: u32) -> bool {
        if self.coins < amount {
            return false;
        }
        self.coins -= amount;
        true
    }

    pub fn earn(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Removes up to `amount` coins, never going below zero.
    /// Returns how many coins were actually taken.
    pub fn apply_penalty(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.coins);
        self.coins -= taken;
        taken
    }

    pub fn use_water(&mut self) -> bool {
        if self.water == 0 {
            return false;
        }
        self.water -= 1;
        true
    }

    pub fn refill_water(&mut self) {
        self.water = self.water_capacity;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MapId {
    #[default]
    Farm,
    House,
}

/// Axis-aligned rectangle in world pixels. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl CollisionRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle covering `w` by `h` tiles starting at tile `(tx, ty)`.
    pub fn from_tiles(tx: i32, ty: i32, w: i32, h: i32) -> Self {
        Self::new(
            tx as f32 * TILE_SIZE,
            ty as f32 * TILE_SIZE,
            w as f32 * TILE_SIZE,
            h as f32 * TILE_SIZE,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &CollisionRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    Well,
    Ship,
    EnterHouse,
    ExitHouse,
    Bed,
    Storefront,
}

impl InteractionKind {
    pub fn prompt(self) -> &'static str {
        match self {
            InteractionKind::Well => "E: Refill water",
            InteractionKind::Ship => "E: Ship crops",
            InteractionKind::EnterHouse => "E: Enter house",
            InteractionKind::ExitHouse => "E: Go outside",
            InteractionKind::Bed => "E: Sleep",
            InteractionKind::Storefront => "E: Browse seeds",
        }
    }
}

/// One-tile rectangle tagged with what the action key does next to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionZone {
    pub rect: CollisionRect,
    pub kind: InteractionKind,
}

impl InteractionZone {
    pub fn at_tile(tx: i32, ty: i32, kind: InteractionKind) -> Self {
        Self {
            rect: CollisionRect::from_tiles(tx, ty, 1, 1),
            kind,
        }
    }

    pub fn tile(&self) -> (i32, i32) {
        world_to_tile(Vec2::new(self.rect.x, self.rect.y))
    }
}

/// Obstacles for the active map. Replaced wholesale on every map change.
#[derive(Resource, Debug, Clone, Default)]
pub struct CollisionRects(pub Vec<CollisionRect>);

/// Interaction zones for the active map, in dispatch priority order.
#[derive(Resource, Debug, Clone, Default)]
pub struct InteractionZones(pub Vec<InteractionZone>);

/// Playable area in pixels. A zero size disables the bounds clamp.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveMap(pub MapId);

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent when the clock rolls into a new day, by rollover or by sleep.
#[derive(Event, Debug, Clone)]
pub struct DayStartedEvent {
    pub day: u32,
    pub season_index: u32,
}

#[derive(Event, Debug, Clone)]
pub struct SeasonChangeEvent {
    pub season_index: u32,
}

/// Where a coin change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldChangeKind {
    Shipment,
    Purchase,
    Penalty,
}

/// Record of a coin change that has already been applied to the inventory.
#[derive(Event, Debug, Clone)]
pub struct GoldChangeEvent {
    pub amount: i64,
    pub kind: GoldChangeKind,
    pub reason: String,
}

#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

impl ToastEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration_secs: TOAST_SECONDS,
        }
    }
}

/// Applied at a transition midpoint: swap the active map and move the
/// player to the spawn tile.
#[derive(Event, Debug, Clone)]
pub struct MapTransitionEvent {
    pub to_map: MapId,
    pub spawn_tile: (i32, i32),
}

#[derive(Event, Debug, Clone)]
pub struct CropHarvestedEvent {
    pub kind: PlantKind,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 32.0;
pub const SPRITE_WIDTH: f32 = 32.0;
pub const SPRITE_HEIGHT: f32 = 32.0;
pub const FEET_WIDTH_FRACTION: f32 = 0.5;
pub const FEET_HEIGHT: f32 = 8.0;
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 544.0;
pub const STARTING_COINS: u32 = 50;
pub const WATER_CAPACITY: u32 = 10;
pub const TOAST_SECONDS: f32 = 2.5;
pub const FARM_SPAWN_TILE: (i32, i32) = (15, 10);
/// Where the player appears on the farm after leaving the house.
pub const FARM_DOOR_SPAWN_TILE: (i32, i32) = (24, 6);
/// Where the player appears inside the house after entering.
pub const HOUSE_SPAWN_TILE: (i32, i32) = (5, 6);
/// Beside the bed, where the player wakes after passing out.
pub const HOUSE_BED_SPAWN_TILE: (i32, i32) = (2, 2);

// ═══════════════════════════════════════════════════════════════════════
// GRID HELPERS
// ═══════════════════════════════════════════════════════════════════════

pub fn world_to_tile(pos: Vec2) -> (i32, i32) {
    (
        (pos.x / TILE_SIZE).floor() as i32,
        (pos.y / TILE_SIZE).floor() as i32,
    )
}

pub fn tile_center(tx: i32, ty: i32) -> Vec2 {
    Vec2::new(
        tx as f32 * TILE_SIZE + TILE_SIZE * 0.5,
        ty as f32 * TILE_SIZE + TILE_SIZE * 0.5,
    )
}

/// Snaps a world point to the centre of the tile containing it.
pub fn snap_to_tile(pos: Vec2) -> Vec2 {
    let (tx, ty) = world_to_tile(pos);
    tile_center(tx, ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_has_every_kind() {
        let inv = InventoryState::default();
        for kind in PlantKind::ALL {
            assert_eq!(inv.harvested_count(kind), 0);
            assert_eq!(inv.seed_count(kind), 0);
        }
        assert_eq!(inv.harvested.len(), 6);
    }

    #[test]
    fn test_spend_rejects_overspend_without_mutation() {
        let mut inv = InventoryState::new(10, 5);
        assert!(!inv.spend(11));
        assert_eq!(inv.coins, 10);
        assert!(inv.spend(10));
        assert_eq!(inv.coins, 0);
    }

    #[test]
    fn test_penalty_saturates_at_zero() {
        let mut inv = InventoryState::new(7, 5);
        assert_eq!(inv.apply_penalty(20), 7);
        assert_eq!(inv.coins, 0);
        assert_eq!(inv.apply_penalty(20), 0);
    }

    #[test]
    fn test_water_can_empties_and_refills() {
        let mut inv = InventoryState::new(0, 2);
        assert!(inv.use_water());
        assert!(inv.use_water());
        assert!(!inv.use_water());
        inv.refill_water();
        assert_eq!(inv.water, 2);
    }

    #[test]
    fn test_first_seed_follows_declaration_order() {
        let mut inv = InventoryState::default();
        assert_eq!(inv.first_seed(), None);
        inv.add_seed(PlantKind::Pumpkin);
        inv.add_seed(PlantKind::Corn);
        assert_eq!(inv.first_seed(), Some(PlantKind::Corn));
        assert!(inv.consume_seed(PlantKind::Corn));
        assert!(!inv.consume_seed(PlantKind::Corn));
        assert_eq!(inv.first_seed(), Some(PlantKind::Pumpkin));
    }

    #[test]
    fn test_rect_edges_touching_do_not_overlap() {
        let a = CollisionRect::new(0.0, 0.0, 10.0, 10.0);
        let b = CollisionRect::new(10.0, 0.0, 10.0, 10.0);
        let c = CollisionRect::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_feet_box_sits_on_sprite_bottom() {
        let feet = FeetHitbox::default();
        let rect = feet.rect_at(Vec2::new(100.0, 100.0));
        assert_eq!(rect, CollisionRect::new(92.0, 108.0, 16.0, 8.0));
        assert_eq!(feet.point(Vec2::new(100.0, 100.0)), Vec2::new(100.0, 112.0));
    }

    #[test]
    fn test_tile_snapping() {
        assert_eq!(world_to_tile(Vec2::new(31.9, 32.0)), (0, 1));
        assert_eq!(snap_to_tile(Vec2::new(40.0, 70.0)), Vec2::new(48.0, 80.0));
        assert_eq!(world_to_tile(Vec2::new(-1.0, 0.0)), (-1, 0));
    }
}
