use std::time::Instant;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::SheetId;
use crate::batch::{BatchBuilder, RowBatches};
use crate::camera::Rect;
use crate::canvas::{Canvas, Color};
use crate::object::{ObjectArena, ObjectId};
use crate::projection::{GridPos, screen_to_grid};
use crate::tile::{Tile, TileKind};
use crate::{TILE_HEIGHT, TILE_WIDTH};

// ── Errors ──────────────────────────────────────────────────────────────────

/// Errors surfaced at map construction.  Everything after construction is
/// infallible or degrades (out-of-bounds lookups return `None`).
#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("map dimensions must be non-zero (got {width}×{height})")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("tile pool has no entry with a positive weight")]
    EmptyPool,
}

// ── Generation config ───────────────────────────────────────────────────────

/// One weighted entry of the random terrain pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub kind: TileKind,
    pub weight: u32,
}

/// Grid-position predicate for deterministic terrain overrides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridPattern {
    /// Rows where `gy % period == phase`.
    RowPeriodic { period: u32, phase: u32 },
    /// Columns where `gx % period == phase`.
    ColumnPeriodic { period: u32, phase: u32 },
}

impl GridPattern {
    pub fn matches(&self, pos: GridPos) -> bool {
        match *self {
            GridPattern::RowPeriodic { period, phase } => {
                period > 0 && pos.y.rem_euclid(period as i32) == phase as i32
            }
            GridPattern::ColumnPeriodic { period, phase } => {
                period > 0 && pos.x.rem_euclid(period as i32) == phase as i32
            }
        }
    }
}

/// A deterministic override applied after random sampling.  Rules are
/// applied in order, so a later rule wins wherever patterns overlap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub pattern: GridPattern,
    pub kind: TileKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    /// Weighted pool the base terrain is sampled from.
    pub pool: Vec<PoolEntry>,
    /// Ordered override rules, applied after sampling.
    pub overrides: Vec<OverrideRule>,
    /// RNG seed for reproducible maps.  `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for MapConfig {
    /// The classic battlefield: mostly grass with scattered foxholes, a
    /// foxhole trench every ninth row and an earthwork wall every seventh.
    fn default() -> Self {
        Self {
            width: 100,
            height: 50,
            pool: vec![
                PoolEntry { kind: TileKind::Grass, weight: 50 },
                PoolEntry { kind: TileKind::Foxhole, weight: 5 },
            ],
            overrides: vec![
                OverrideRule {
                    pattern: GridPattern::RowPeriodic { period: 9, phase: 2 },
                    kind: TileKind::Foxhole,
                },
                OverrideRule {
                    pattern: GridPattern::RowPeriodic { period: 7, phase: 5 },
                    kind: TileKind::Earthwork,
                },
            ],
            seed: None,
        }
    }
}

impl MapConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ── Map ─────────────────────────────────────────────────────────────────────

/// The tile grid.  Immutable after generation except for the per-tile
/// object lists; the batch set is rebuilt wholesale, never patched.
#[derive(Debug)]
pub struct Map {
    width: u32,
    height: u32,
    /// Row-major: `index = gy * width + gx`.
    tiles: Vec<Tile>,
    batches: Option<RowBatches>,
}

impl Map {
    /// Allocate and populate the grid: sample each cell from the weighted
    /// pool, then apply the override rules in order.
    pub fn generate(config: &MapConfig) -> Result<Self, MapError> {
        if config.width == 0 || config.height == 0 {
            return Err(MapError::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }
        let total: u32 = config.pool.iter().map(|e| e.weight).sum();
        if total == 0 {
            return Err(MapError::EmptyPool);
        }

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut tiles = Vec::with_capacity((config.width * config.height) as usize);
        for gy in 0..config.height as i32 {
            for gx in 0..config.width as i32 {
                let pos = GridPos::new(gx, gy);
                let mut kind = sample_kind(&config.pool, total, &mut rng);
                for rule in &config.overrides {
                    if rule.pattern.matches(pos) {
                        kind = rule.kind;
                    }
                }
                tiles.push(Tile::new(pos, kind));
            }
        }

        Ok(Self {
            width: config.width,
            height: config.height,
            tiles,
            batches: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Footprint of the whole grid in screen pixels, for camera centering.
    pub fn pixel_rect(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.width as f32 * TILE_WIDTH,
            self.height as f32 * TILE_HEIGHT,
        )
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// The tile at a grid cell; `None` out of bounds, never a panic.
    pub fn tile_at_grid(&self, gx: i32, gy: i32) -> Option<&Tile> {
        if gx < 0 || gy < 0 || gx >= self.width as i32 || gy >= self.height as i32 {
            return None;
        }
        self.tiles.get(gy as usize * self.width as usize + gx as usize)
    }

    pub fn tile_at_grid_mut(&mut self, gx: i32, gy: i32) -> Option<&mut Tile> {
        if gx < 0 || gy < 0 || gx >= self.width as i32 || gy >= self.height as i32 {
            return None;
        }
        self.tiles
            .get_mut(gy as usize * self.width as usize + gx as usize)
    }

    /// The tile whose diamond contains a screen point.
    pub fn tile_at_screen(&self, pos: Vec2) -> Option<&Tile> {
        let g = screen_to_grid(pos);
        self.tile_at_grid(g.x, g.y)
    }

    /// Place an object on the tile at `(gx, gy)`; the tile's stacked block
    /// intercepts when present.  Returns false out of bounds.
    pub fn add_object(&mut self, gx: i32, gy: i32, id: ObjectId, arena: &mut ObjectArena) -> bool {
        match self.tile_at_grid_mut(gx, gy) {
            Some(tile) => {
                tile.add_object(id, arena);
                true
            }
            None => false,
        }
    }

    /// Rebuild the static row batches from scratch.  Call once after all
    /// static content is placed; call again only to rebuild wholesale.
    pub fn build_batches(&mut self, arena: &ObjectArena, sheet: SheetId) {
        let start = Instant::now();
        let mut builder = BatchBuilder::new();
        for gy in 0..self.height as usize {
            let row = &self.tiles[gy * self.width as usize..][..self.width as usize];
            // Back-to-front inside the grid row: a higher grid x projects
            // higher on screen and must be painted first.
            for tile in row.iter().rev() {
                let row_key = tile.row_y() as i64;
                for sprite in tile.sprites(sheet, arena) {
                    builder.add(sprite, row_key);
                }
            }
        }
        let batches = builder.finalize();
        tracing::debug!(
            "batched {} rows ({} sprites) in {:?}",
            batches.len(),
            batches.sprite_count(),
            start.elapsed()
        );
        self.batches = Some(batches);
    }

    pub fn batches(&self) -> Option<&RowBatches> {
        self.batches.as_ref()
    }

    /// Draw the visible slice of the map.  Drawing before `build_batches`
    /// clears the backdrop and submits nothing — a blank frame, not a fault.
    pub fn draw(&self, viewport: &Rect, canvas: &mut impl Canvas) {
        canvas.clear(Color::BACKGROUND);
        let Some(batches) = &self.batches else {
            return;
        };
        for batch in batches.visible(viewport) {
            canvas.draw_batch(batch);
        }
    }
}

/// Cumulative-weight draw from the pool.  `total` is the precomputed weight
/// sum and must be non-zero.
fn sample_kind(pool: &[PoolEntry], total: u32, rng: &mut SmallRng) -> TileKind {
    let mut roll = rng.random_range(0..total);
    for entry in pool {
        if roll < entry.weight {
            return entry.kind;
        }
        roll -= entry.weight;
    }
    // roll < total = Σ weights, so the loop always returns; this line only
    // guards against a future refactor breaking that arithmetic.
    pool[pool.len() - 1].kind
}
