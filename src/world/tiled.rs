//! Minimal reader for Tiled JSON maps.
//!
//! Only orthogonal tile layers with uncompressed `data` arrays are supported.
//! Layer names carry meaning: `Floor` marks walkable cells, and layers named
//! `interactWell`, `interactShip`, `interactBed` and `interactExit` mark the
//! tiles the action key responds to.

use serde::Deserialize;

use crate::shared::*;

/// Tiled stores flip/rotation flags in the top bits of each gid.
const GID_FLAG_MASK: u32 = 0x1FFF_FFFF;

pub const FLOOR_LAYER: &str = "Floor";

/// Zone layers, in the order their zones are reported.
const ZONE_LAYERS: [(&str, InteractionKind); 4] = [
    ("interactWell", InteractionKind::Well),
    ("interactShip", InteractionKind::Ship),
    ("interactBed", InteractionKind::Bed),
    ("interactExit", InteractionKind::ExitHouse),
];

#[derive(Debug, Clone, Deserialize)]
pub struct TiledMap {
    pub width: usize,
    pub height: usize,
    pub tilewidth: u32,
    pub tileheight: u32,
    pub layers: Vec<TiledLayer>,
    #[serde(default)]
    pub tilesets: Vec<TiledTileset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledLayer {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub data: Vec<u32>,
    #[serde(default = "visible_default")]
    pub visible: bool,
}

fn visible_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledTileset {
    pub firstgid: u32,
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub name: String,
}

/// Parses and sanity-checks a Tiled JSON document.
pub fn parse_tiled_map(json: &str) -> Result<TiledMap, String> {
    let map: TiledMap =
        serde_json::from_str(json).map_err(|e| format!("Invalid Tiled JSON: {}", e))?;

    if map.width == 0 || map.height == 0 {
        return Err(format!("Map has zero size ({}x{})", map.width, map.height));
    }
    if map.tilewidth as f32 != TILE_SIZE || map.tileheight as f32 != TILE_SIZE {
        return Err(format!(
            "Tile size {}x{} does not match the game grid ({})",
            map.tilewidth, map.tileheight, TILE_SIZE
        ));
    }
    let cells = map.width * map.height;
    for layer in map.tile_layers() {
        if layer.data.len() != cells {
            return Err(format!(
                "Layer '{}' has {} cells, expected {}",
                layer.name,
                layer.data.len(),
                cells
            ));
        }
    }
    Ok(map)
}

impl TiledMap {
    pub fn tile_layers(&self) -> impl Iterator<Item = &TiledLayer> {
        self.layers
            .iter()
            .filter(|layer| layer.kind.is_empty() || layer.kind == "tilelayer")
    }

    pub fn layer(&self, name: &str) -> Option<&TiledLayer> {
        self.tile_layers().find(|layer| layer.name == name)
    }

    /// Row-major occupancy of a layer. A missing layer is all false.
    pub fn layer_mask(&self, name: &str) -> Vec<bool> {
        match self.layer(name) {
            Some(layer) => layer
                .data
                .iter()
                .map(|gid| gid & GID_FLAG_MASK != 0)
                .collect(),
            None => vec![false; self.width * self.height],
        }
    }

    /// One-tile zones for every occupied cell of the `interact*` layers.
    pub fn interaction_zones(&self) -> Vec<InteractionZone> {
        let mut zones = Vec::new();
        for (name, kind) in ZONE_LAYERS {
            for (i, occupied) in self.layer_mask(name).into_iter().enumerate() {
                if occupied {
                    let (x, y) = self.cell_xy(i);
                    zones.push(InteractionZone::at_tile(x, y, kind));
                }
            }
        }
        zones
    }

    /// Collision rectangles for every cell not on the `Floor` layer.
    /// Horizontal runs on a row are merged into one rectangle.
    pub fn solid_rects(&self) -> Vec<CollisionRect> {
        let floor = self.layer_mask(FLOOR_LAYER);
        let mut rects = Vec::new();
        for y in 0..self.height {
            let mut x = 0;
            while x < self.width {
                if floor[y * self.width + x] {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < self.width && !floor[y * self.width + x] {
                    x += 1;
                }
                rects.push(CollisionRect::from_tiles(
                    start as i32,
                    y as i32,
                    (x - start) as i32,
                    1,
                ));
            }
        }
        rects
    }

    /// Resolves a gid to `(tileset index, column, row)` in that tileset's atlas.
    pub fn atlas_cell(&self, gid: u32) -> Option<(usize, u32, u32)> {
        let gid = gid & GID_FLAG_MASK;
        if gid == 0 {
            return None;
        }
        let (index, tileset) = self
            .tilesets
            .iter()
            .enumerate()
            .filter(|(_, ts)| ts.firstgid <= gid)
            .max_by_key(|(_, ts)| ts.firstgid)?;
        if tileset.columns == 0 {
            return None;
        }
        let local = gid - tileset.firstgid;
        Some((index, local % tileset.columns, local / tileset.columns))
    }

    fn cell_xy(&self, index: usize) -> (i32, i32) {
        ((index % self.width) as i32, (index / self.width) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "width": 4, "height": 3, "tilewidth": 32, "tileheight": 32,
        "layers": [
            { "name": "Floor", "type": "tilelayer",
              "data": [0,0,0,0, 0,1,1,0, 0,0,0,0] },
            { "name": "interactBed", "type": "tilelayer",
              "data": [0,0,0,0, 0,0,0,0, 0,0,5,0] },
            { "name": "interactExit", "type": "tilelayer",
              "data": [0,0,0,0, 2147483653,0,0,0, 0,0,0,0] },
            { "name": "Props", "type": "objectgroup" }
        ],
        "tilesets": [
            { "firstgid": 1, "columns": 4, "name": "interior" },
            { "firstgid": 17, "columns": 2, "name": "furniture" }
        ]
    }"#;

    #[test]
    fn test_layer_mask_and_missing_layer() {
        let map = parse_tiled_map(SMALL).unwrap();
        let floor = map.layer_mask("Floor");
        assert_eq!(floor.iter().filter(|f| **f).count(), 2);
        assert!(floor[5] && floor[6]);
        assert_eq!(map.layer_mask("Nope"), vec![false; 12]);
    }

    #[test]
    fn test_zones_follow_layer_order_and_ignore_flip_flags() {
        let map = parse_tiled_map(SMALL).unwrap();
        let zones = map.interaction_zones();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].kind, InteractionKind::Bed);
        assert_eq!(zones[0].tile(), (2, 2));
        assert_eq!(zones[1].kind, InteractionKind::ExitHouse);
        assert_eq!(zones[1].tile(), (0, 1));
    }

    #[test]
    fn test_solid_rects_merge_row_runs() {
        let map = parse_tiled_map(SMALL).unwrap();
        let rects = map.solid_rects();
        // Row 0: one run of 4. Row 1: two singles. Row 2: one run of 4.
        assert_eq!(rects.len(), 4);
        assert_eq!(rects[0], CollisionRect::from_tiles(0, 0, 4, 1));
        assert_eq!(rects[1], CollisionRect::from_tiles(0, 1, 1, 1));
        assert_eq!(rects[2], CollisionRect::from_tiles(3, 1, 1, 1));
        assert_eq!(rects[3], CollisionRect::from_tiles(0, 2, 4, 1));
    }

    #[test]
    fn test_atlas_cell_picks_owning_tileset() {
        let map = parse_tiled_map(SMALL).unwrap();
        assert_eq!(map.atlas_cell(0), None);
        assert_eq!(map.atlas_cell(1), Some((0, 0, 0)));
        assert_eq!(map.atlas_cell(6), Some((0, 1, 1)));
        assert_eq!(map.atlas_cell(17), Some((1, 0, 0)));
        assert_eq!(map.atlas_cell(20), Some((1, 1, 1)));
    }

    #[test]
    fn test_bad_documents_are_errors() {
        assert!(parse_tiled_map("not json").is_err());
        let short = SMALL.replace("0,0,0,0, 0,1,1,0, 0,0,0,0", "0,1");
        assert!(parse_tiled_map(&short).unwrap_err().contains("Floor"));
        let wrong_size = SMALL.replace("\"tilewidth\": 32", "\"tilewidth\": 16");
        assert!(parse_tiled_map(&wrong_size).is_err());
    }
}
