use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::TILE_HEIGHT;
use crate::assets::SheetId;
use crate::canvas::SpriteInstance;
use crate::object::{ObjectArena, ObjectId};
use crate::projection::{GridPos, grid_to_screen};

// ── TileKind ────────────────────────────────────────────────────────────────

/// Terrain kinds.  Behavior differences are dispatched through the table
/// methods below instead of per-kind types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Grass,
    Dirt,
    Sand,
    Foxhole,
    Earthwork,
    EarthworkTop,
}

impl TileKind {
    /// (column, row) of this kind's art in the 10×10 terrain sheet.
    /// Earthworks reuse the dirt art; only their top block differs.
    pub fn sheet_cell(self) -> (u32, u32) {
        match self {
            TileKind::Dirt | TileKind::Earthwork => (0, 0),
            TileKind::Grass => (0, 1),
            TileKind::Sand => (0, 2),
            TileKind::EarthworkTop => (0, 3),
            TileKind::Foxhole => (0, 5),
        }
    }

    /// Offset from the tile position to where placed objects sit.  Foxholes
    /// sink their occupants half a tile into the ground.
    pub fn anchor_offset(self) -> Vec2 {
        match self {
            TileKind::Foxhole => Vec2::new(0.0, TILE_HEIGHT / 2.0),
            _ => Vec2::ZERO,
        }
    }

    /// The block kind this kind stacks on itself at construction time.
    pub fn stacked_top(self) -> Option<TileKind> {
        match self {
            TileKind::Earthwork => Some(TileKind::EarthworkTop),
            _ => None,
        }
    }
}

// ── Tile ────────────────────────────────────────────────────────────────────

/// One map cell: terrain kind, projected position, the objects standing on
/// it, and at most one block tile stacked a height unit above it.
#[derive(Debug)]
pub struct Tile {
    grid: GridPos,
    kind: TileKind,
    /// Projected row y before any height offset — batch key and depth.
    row_y: f32,
    /// Height offset: stack depth × `TILE_HEIGHT`.
    height: f32,
    /// Displayed position (`row_y` lifted by `height`).
    position: Vec2,
    objects: Vec<ObjectId>,
    block: Option<Box<Tile>>,
}

impl Tile {
    pub fn new(grid: GridPos, kind: TileKind) -> Self {
        let projected = grid_to_screen(grid.x, grid.y);
        let mut tile = Self {
            grid,
            kind,
            row_y: projected.y,
            height: 0.0,
            position: projected,
            objects: Vec::new(),
            block: None,
        };
        if let Some(top) = kind.stacked_top() {
            tile.attach_block(top);
        }
        tile
    }

    fn stacked(grid: GridPos, kind: TileKind, row_y: f32, height: f32) -> Self {
        let projected = grid_to_screen(grid.x, grid.y);
        Self {
            grid,
            kind,
            row_y,
            height,
            position: Vec2::new(projected.x, row_y - height),
            objects: Vec::new(),
            block: None,
        }
    }

    pub fn grid(&self) -> GridPos {
        self.grid
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Displayed screen position (the diamond center, lifted by height).
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Raw projected row — the key this tile batches under.
    pub fn row_y(&self) -> f32 {
        self.row_y
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn block(&self) -> Option<&Tile> {
        self.block.as_deref()
    }

    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    /// Stack a block tile one height unit above this one.  Exactly one
    /// stacking level exists; further calls are ignored.
    pub fn attach_block(&mut self, kind: TileKind) {
        if self.block.is_some() {
            return;
        }
        self.block = Some(Box::new(Tile::stacked(
            self.grid,
            kind,
            self.row_y,
            self.height + TILE_HEIGHT,
        )));
    }

    /// Screen point where objects placed on this tile are anchored.
    pub fn object_anchor(&self) -> Vec2 {
        self.position + self.kind.anchor_offset()
    }

    /// Place an object on this tile.  A stacked block intercepts the
    /// placement, so objects always land on the highest surface.
    pub fn add_object(&mut self, id: ObjectId, arena: &mut ObjectArena) {
        if let Some(block) = &mut self.block {
            block.add_object(id, arena);
            return;
        }
        self.objects.push(id);
        if let Some(obj) = arena.get_mut(id) {
            obj.place_at(self.object_anchor());
        }
    }

    /// Every sprite this tile contributes to its row batch, in paint order:
    /// the tile itself, the shadows of its objects, the objects, then the
    /// stacked block's sprites.
    pub fn sprites(&self, sheet: SheetId, arena: &ObjectArena) -> Vec<SpriteInstance> {
        let mut out = Vec::with_capacity(1 + self.objects.len() * 2);
        self.collect_sprites(sheet, arena, &mut out);
        out
    }

    fn collect_sprites(&self, sheet: SheetId, arena: &ObjectArena, out: &mut Vec<SpriteInstance>) {
        out.push(SpriteInstance {
            sheet,
            cell: self.kind.sheet_cell(),
            position: self.position,
        });
        for &id in &self.objects {
            if let Some(obj) = arena.get(id) {
                out.push(obj.shadow_instance());
            }
        }
        for &id in &self.objects {
            if let Some(obj) = arena.get(id) {
                out.push(obj.sprite_instance());
            }
        }
        if let Some(block) = &self.block {
            block.collect_sprites(sheet, arena, out);
        }
    }
}
