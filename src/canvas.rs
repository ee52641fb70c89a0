use glam::Vec2;

use crate::assets::SheetId;
use crate::batch::RowBatch;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    /// Dark red-brown backdrop visible between and beyond the tile field.
    pub const BACKGROUND: Self = Self::rgba8(30, 10, 10, 255);

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ])
    }
}

// ── Sprite references ───────────────────────────────────────────────────────

/// One cell of a registered sprite sheet — what an object carries around.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpriteRef {
    pub sheet: SheetId,
    /// (column, row) inside the sheet grid.
    pub cell: (u32, u32),
}

impl SpriteRef {
    pub const fn new(sheet: SheetId, cell: (u32, u32)) -> Self {
        Self { sheet, cell }
    }

    /// Bind this reference to a screen position, producing a drawable quad.
    pub fn at(self, position: Vec2) -> SpriteInstance {
        SpriteInstance { sheet: self.sheet, cell: self.cell, position }
    }
}

/// A positioned sprite quad, ready to batch or draw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteInstance {
    pub sheet: SheetId,
    pub cell: (u32, u32),
    pub position: Vec2,
}

// ── Canvas ──────────────────────────────────────────────────────────────────

/// The renderer/window collaborator the core draws through.
///
/// The engine binding implements this over its graphics API; the core only
/// ever submits a background clear, whole row batches, and loose sprites for
/// dynamic objects.  Nothing here blocks or suspends.
pub trait Canvas {
    fn clear(&mut self, color: Color);
    /// Submit one prebuilt row batch as a single draw call.
    fn draw_batch(&mut self, batch: &RowBatch);
    /// Submit one loose sprite (dynamic objects, overlays).
    fn draw_sprite(&mut self, sprite: &SpriteInstance);
}
