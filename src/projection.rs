// =============================================================================
// PROJECTION.RS — Grid ↔ screen coordinate mapping
//
// The diamond projection used everywhere in the engine:
// - Forward: integer grid cell → screen-space pixel position
// - Inverse: screen point → the grid cell whose diamond contains it
// =============================================================================

use glam::Vec2;

use crate::{TILE_HEIGHT, TILE_WIDTH};

/// Integer grid coordinates — the primary key of a map tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Project a grid cell to its screen-space position (the diamond center).
///
/// `x = (gy + gx) * TILE_WIDTH / 2`, `y = (gy - gx) * TILE_HEIGHT / 2`.
/// Pure and injective: no two cells share a screen position.
#[inline]
pub fn grid_to_screen(gx: i32, gy: i32) -> Vec2 {
    Vec2::new(
        (gy + gx) as f32 * (TILE_WIDTH / 2.0),
        (gy - gx) as f32 * (TILE_HEIGHT / 2.0),
    )
}

/// Inverse projection: the grid cell whose diamond region contains `pos`.
///
/// In half-tile units `u = x / (W/2)`, `v = y / (H/2)` the fractional grid
/// coordinates are `gx = (u - v) / 2`, `gy = (u + v) / 2`.  The screen-space
/// diamond of a cell maps to the unit square centered on its integer
/// coordinates in that space, so rounding each component to the nearest
/// integer picks the containing diamond — not merely the nearest center.
#[inline]
pub fn screen_to_grid(pos: Vec2) -> GridPos {
    let u = pos.x / (TILE_WIDTH / 2.0);
    let v = pos.y / (TILE_HEIGHT / 2.0);
    GridPos::new(
        ((u - v) / 2.0).round() as i32,
        ((u + v) / 2.0).round() as i32,
    )
}

/// Inverse projection clamped into a `grid_width × grid_height` map.
///
/// Used for pointer picking: any screen point, however far outside the map,
/// resolves to the nearest in-bounds cell rather than failing.
pub fn screen_to_grid_clamped(pos: Vec2, grid_width: u32, grid_height: u32) -> GridPos {
    let g = screen_to_grid(pos);
    GridPos::new(
        g.x.clamp(0, grid_width.max(1) as i32 - 1),
        g.y.clamp(0, grid_height.max(1) as i32 - 1),
    )
}
