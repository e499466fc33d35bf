//! Map data for the farm and the house interior.
//!
//! A layout is a ground grid for drawing plus the collision rectangles and
//! interaction zones the simulation uses. Zones are listed in dispatch
//! priority order.

use bevy::prelude::*;

use super::tiled::{parse_tiled_map, TiledMap};
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ground {
    #[default]
    Grass,
    Soil,
    Path,
    Water,
    Roof,
    Wall,
    Door,
    Floor,
    Furniture,
}

/// Everything needed to put one map on screen and into the simulation.
#[derive(Debug, Clone, Default)]
pub struct MapLayout {
    pub id: MapId,
    pub width: usize,
    pub height: usize,
    /// Row-major: ground[y * width + x]
    pub ground: Vec<Ground>,
    pub rects: Vec<CollisionRect>,
    pub zones: Vec<InteractionZone>,
}

impl MapLayout {
    fn blank(id: MapId, width: usize, height: usize, fill: Ground) -> Self {
        Self {
            id,
            width,
            height,
            ground: vec![fill; width * height],
            rects: Vec::new(),
            zones: Vec::new(),
        }
    }

    pub fn ground_at(&self, x: i32, y: i32) -> Option<Ground> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        self.ground.get(y as usize * self.width + x as usize).copied()
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds {
            width: self.width as f32 * TILE_SIZE,
            height: self.height as f32 * TILE_SIZE,
        }
    }

    fn fill(&mut self, x0: usize, y0: usize, w: usize, h: usize, kind: Ground) {
        for y in y0..(y0 + h).min(self.height) {
            for x in x0..(x0 + w).min(self.width) {
                self.ground[y * self.width + x] = kind;
            }
        }
    }

    /// Paints a block and makes it solid.
    fn block(&mut self, x0: usize, y0: usize, w: usize, h: usize, kind: Ground) {
        self.fill(x0, y0, w, h, kind);
        self.rects.push(CollisionRect::from_tiles(
            x0 as i32, y0 as i32, w as i32, h as i32,
        ));
    }
}

pub fn build_map(id: MapId) -> MapLayout {
    match id {
        MapId::Farm => farm_layout(),
        MapId::House => house_layout(),
    }
}

// ---------------------------------------------------------------------------
// Farm: 30x17, exactly one screen.
// Storefront top-left, well and shipping bin top-centre, house top-right,
// open field below, pond bottom-left.
// ---------------------------------------------------------------------------
pub const FARM_WIDTH: usize = 30;
pub const FARM_HEIGHT: usize = 17;

pub const STOREFRONT_DOOR_TILE: (i32, i32) = (5, 4);
pub const WELL_TILE: (i32, i32) = (12, 3);
pub const SHIP_BIN_TILE: (i32, i32) = (17, 3);
pub const HOUSE_DOOR_TILE: (i32, i32) = (24, 4);

fn farm_layout() -> MapLayout {
    let mut map = MapLayout::blank(MapId::Farm, FARM_WIDTH, FARM_HEIGHT, Ground::Grass);

    map.fill(8, 8, 20, 7, Ground::Soil);
    map.fill(5, 5, 1, 4, Ground::Path);
    map.fill(24, 5, 1, 3, Ground::Path);
    map.fill(5, 7, 20, 1, Ground::Path);

    // Storefront
    map.block(2, 1, 6, 2, Ground::Roof);
    map.block(2, 3, 6, 2, Ground::Wall);
    map.fill(STOREFRONT_DOOR_TILE.0 as usize, STOREFRONT_DOOR_TILE.1 as usize, 1, 1, Ground::Door);

    // House
    map.block(21, 1, 7, 2, Ground::Roof);
    map.block(21, 3, 7, 2, Ground::Wall);
    map.fill(HOUSE_DOOR_TILE.0 as usize, HOUSE_DOOR_TILE.1 as usize, 1, 1, Ground::Door);

    map.block(WELL_TILE.0 as usize, WELL_TILE.1 as usize, 1, 1, Ground::Water);
    map.block(SHIP_BIN_TILE.0 as usize, SHIP_BIN_TILE.1 as usize, 1, 1, Ground::Furniture);

    // Pond
    map.block(1, 11, 4, 4, Ground::Water);

    map.zones = vec![
        InteractionZone::at_tile(WELL_TILE.0, WELL_TILE.1, InteractionKind::Well),
        InteractionZone::at_tile(SHIP_BIN_TILE.0, SHIP_BIN_TILE.1, InteractionKind::Ship),
        InteractionZone::at_tile(
            STOREFRONT_DOOR_TILE.0,
            STOREFRONT_DOOR_TILE.1,
            InteractionKind::Storefront,
        ),
        InteractionZone::at_tile(HOUSE_DOOR_TILE.0, HOUSE_DOOR_TILE.1, InteractionKind::EnterHouse),
    ];
    map
}

// ---------------------------------------------------------------------------
// House interior: authored in Tiled, with a generated fallback.
// ---------------------------------------------------------------------------

const HOUSE_JSON: &str = include_str!("../../assets/maps/house.json");

fn house_layout() -> MapLayout {
    match parse_tiled_map(HOUSE_JSON) {
        Ok(tiled) => layout_from_tiled(MapId::House, &tiled),
        Err(e) => {
            warn!("[World] House map: {}; using generated interior", e);
            generated_house()
        }
    }
}

/// Ground comes from the topmost occupied layer of each cell. The interior
/// tileset is laid out floor, wall, door along its first row; anything from
/// a later tileset is furniture.
pub fn layout_from_tiled(id: MapId, tiled: &TiledMap) -> MapLayout {
    let mut map = MapLayout::blank(id, tiled.width, tiled.height, Ground::Wall);
    let layers: Vec<_> = tiled.tile_layers().filter(|l| l.visible).collect();

    for (i, cell) in map.ground.iter_mut().enumerate() {
        let top = layers
            .iter()
            .rev()
            .map(|layer| layer.data[i])
            .find(|gid| *gid != 0);
        *cell = match top.and_then(|gid| tiled.atlas_cell(gid)) {
            Some((0, 0, 0)) => Ground::Floor,
            Some((0, 2, 0)) => Ground::Door,
            Some((0, _, _)) | None => Ground::Wall,
            Some(_) => Ground::Furniture,
        };
    }

    map.rects = tiled.solid_rects();
    map.zones = tiled.interaction_zones();
    map
}

fn generated_house() -> MapLayout {
    let (w, h) = (10usize, 8usize);
    let mut map = MapLayout::blank(MapId::House, w, h, Ground::Floor);
    map.block(0, 0, w, 1, Ground::Wall);
    map.block(0, h - 1, w, 1, Ground::Wall);
    map.block(0, 1, 1, h - 2, Ground::Wall);
    map.block(w - 1, 1, 1, h - 2, Ground::Wall);
    map.fill(5, h - 1, 1, 1, Ground::Door);
    map.block(1, 1, 1, 2, Ground::Furniture);

    map.zones = vec![
        InteractionZone::at_tile(1, 2, InteractionKind::Bed),
        InteractionZone::at_tile(5, h as i32 - 1, InteractionKind::ExitHouse),
    ];
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_blocked(map: &MapLayout, tile: (i32, i32)) -> bool {
        let probe = CollisionRect::from_tiles(tile.0, tile.1, 1, 1);
        map.rects.iter().any(|r| r.overlaps(&probe))
    }

    #[test]
    fn test_farm_fills_the_screen() {
        let farm = build_map(MapId::Farm);
        assert_eq!(farm.bounds().width, SCREEN_WIDTH);
        assert_eq!(farm.bounds().height, SCREEN_HEIGHT);
        assert_eq!(farm.ground.len(), FARM_WIDTH * FARM_HEIGHT);
    }

    #[test]
    fn test_farm_spawn_tiles_are_open() {
        let farm = build_map(MapId::Farm);
        assert!(!is_blocked(&farm, FARM_SPAWN_TILE));
        assert!(!is_blocked(&farm, FARM_DOOR_SPAWN_TILE));
    }

    #[test]
    fn test_farm_zones_are_reachable_from_an_open_tile() {
        let farm = build_map(MapId::Farm);
        for zone in &farm.zones {
            let (x, y) = zone.tile();
            assert!(
                !is_blocked(&farm, (x, y + 1)),
                "{:?} has no open tile below it",
                zone.kind
            );
        }
    }

    #[test]
    fn test_house_loads_from_tiled() {
        let house = build_map(MapId::House);
        assert_eq!((house.width, house.height), (10, 8));
        assert!(!is_blocked(&house, HOUSE_SPAWN_TILE));
        let kinds: Vec<_> = house.zones.iter().map(|z| z.kind).collect();
        assert_eq!(kinds, vec![InteractionKind::Bed, InteractionKind::ExitHouse]);
        assert_eq!(house.ground_at(5, 7), Some(Ground::Door));
        assert_eq!(house.ground_at(1, 1), Some(Ground::Furniture));
        assert_eq!(house.ground_at(4, 4), Some(Ground::Floor));
        assert_eq!(house.ground_at(0, 0), Some(Ground::Wall));
        assert_eq!(house.ground_at(10, 0), None);
    }

    #[test]
    fn test_generated_house_matches_authored_zones() {
        let authored = build_map(MapId::House);
        let generated = generated_house();
        let tiles = |m: &MapLayout| m.zones.iter().map(|z| (z.kind, z.tile())).collect::<Vec<_>>();
        assert_eq!(tiles(&authored), tiles(&generated));
        assert!(!is_blocked(&generated, HOUSE_SPAWN_TILE));
    }
}
