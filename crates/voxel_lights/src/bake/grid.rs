//! Tile grid
//!
//! The volume is cut into 4 vertical layers, each a `quadrant x quadrant` grid of tiles. The
//! layers share one index texture as a 2x2 tiling:
//!
//! ```text
//!   z ^
//!     | layer 1 | layer 3 |
//!     | layer 0 | layer 2 |
//!     +-------------------> x
//! ```
//!
//! Layer boxes are centered at `(layer - 1.5) * 0.5 * volume_height` above the volume center
//! with a vertical half extent of `volume_height / 4`, so together they cover the volume's
//! full `2 * volume_height` height.

use crate::core::{VolumeConfig, LAYER_COUNT};
use crate::foundation::math::Vec3;
use crate::spatial::AABB;

/// One cell of the bake grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Vertical layer, 0 (lowest) to 3
    pub layer: u32,
    /// Index along world Z
    pub row: u32,
    /// Index along world X
    pub col: u32,
}

impl Tile {
    /// Create a tile coordinate
    pub const fn new(layer: u32, row: u32, col: u32) -> Self {
        Self { layer, row, col }
    }
}

/// Geometry of the bake grid derived from a [`VolumeConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    center: Vec3,
    cell_size: f32,
    volume_height: f32,
    quadrant: u32,
}

impl TileGrid {
    /// Derive the grid for a volume
    pub fn new(config: &VolumeConfig) -> Self {
        Self {
            center: config.center,
            cell_size: config.cell_size,
            volume_height: config.volume_height,
            quadrant: config.quadrant_resolution(),
        }
    }

    /// Tiles per row/column of one layer
    pub const fn quadrant_resolution(&self) -> u32 {
        self.quadrant
    }

    /// Side length of the index texture
    pub const fn texture_side(&self) -> u32 {
        self.quadrant * 2
    }

    /// Total number of tiles over all layers
    pub const fn tile_count(&self) -> usize {
        (self.quadrant as usize) * (self.quadrant as usize) * (LAYER_COUNT as usize)
    }

    /// True if the tile lies inside the grid
    pub const fn contains(&self, tile: Tile) -> bool {
        tile.layer < LAYER_COUNT && tile.row < self.quadrant && tile.col < self.quadrant
    }

    /// Iterate every tile: layer-major, then column, then row
    pub fn tiles(&self) -> impl Iterator<Item = Tile> {
        let quadrant = self.quadrant;
        (0..LAYER_COUNT).flat_map(move |layer| {
            (0..quadrant).flat_map(move |col| (0..quadrant).map(move |row| Tile::new(layer, row, col)))
        })
    }

    /// Texel address `(x, z)` of a tile in the index texture
    pub const fn texel_address(&self, tile: Tile) -> (u32, u32) {
        let x = tile.col + (tile.layer / 2) * self.quadrant;
        let z = tile.row + (tile.layer % 2) * self.quadrant;
        (x, z)
    }

    /// Tile stored at texel `(x, z)`, or `None` outside the texture
    pub const fn tile_at(&self, x: u32, z: u32) -> Option<Tile> {
        let side = self.texture_side();
        if x >= side || z >= side {
            return None;
        }

        let layer = (x / self.quadrant) * 2 + z / self.quadrant;
        Some(Tile::new(layer, z % self.quadrant, x % self.quadrant))
    }

    /// Vertical offset of a layer's boxes from the volume center
    pub fn layer_offset(&self, layer: u32) -> f32 {
        (layer as f32 - 1.5) * 0.5 * self.volume_height
    }

    /// World-space center of a tile
    pub fn tile_center(&self, tile: Tile) -> Vec3 {
        let half_count = (self.quadrant / 2) as f32;
        let half_cell = self.cell_size * 0.5;

        self.center + Vec3::new(
            (tile.col as f32 - half_count) * self.cell_size + half_cell,
            self.layer_offset(tile.layer),
            (tile.row as f32 - half_count) * self.cell_size + half_cell,
        )
    }

    /// Half extent of every tile box
    pub fn tile_half_extent(&self) -> Vec3 {
        Vec3::new(self.cell_size * 0.5, self.volume_height * 0.25, self.cell_size * 0.5)
    }

    /// Overlap box of a tile
    pub fn tile_bounds(&self, tile: Tile) -> AABB {
        AABB::from_center_extents(self.tile_center(tile), self.tile_half_extent())
    }
}
