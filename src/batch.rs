use std::collections::BTreeMap;

use crate::TILE_HEIGHT;
use crate::camera::Rect;
use crate::canvas::SpriteInstance;

// ── RowBatch ────────────────────────────────────────────────────────────────

/// The sprites sharing one screen row, in insertion (paint) order.
/// Conceptually a single static draw call.
#[derive(Clone, Debug)]
pub struct RowBatch {
    row: i64,
    sprites: Vec<SpriteInstance>,
}

impl RowBatch {
    /// The raw screen-row key this batch was built under.
    pub fn row(&self) -> i64 {
        self.row
    }

    pub fn sprites(&self) -> &[SpriteInstance] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

// ── BatchBuilder / RowBatches ───────────────────────────────────────────────

/// Accumulates sprites into per-row batches.
///
/// `finalize` consumes the builder and yields the frozen [`RowBatches`] —
/// there is deliberately no way to mutate a batch afterwards.  Stale batch
/// sets are replaced by rebuilding the whole map, never patched in place.
#[derive(Debug, Default)]
pub struct BatchBuilder {
    rows: BTreeMap<i64, RowBatch>,
}

impl BatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sprite to the batch for `row`, creating the batch if this is
    /// the row's first sprite.
    pub fn add(&mut self, sprite: SpriteInstance, row: i64) {
        self.rows
            .entry(row)
            .or_insert_with(|| RowBatch { row, sprites: Vec::new() })
            .sprites
            .push(sprite);
    }

    /// Freeze the accumulated batches into their read-only render form.
    pub fn finalize(self) -> RowBatches {
        RowBatches { rows: self.rows }
    }
}

/// The immutable set of row batches, ordered by ascending row key.  Row
/// order is paint order: a larger screen y is nearer the viewer.
#[derive(Debug)]
pub struct RowBatches {
    rows: BTreeMap<i64, RowBatch>,
}

impl RowBatches {
    /// Number of rows (batches).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All batches back-to-front.
    pub fn iter(&self) -> impl Iterator<Item = &RowBatch> {
        self.rows.values()
    }

    /// The batches surviving the viewport cull, back-to-front.
    pub fn visible<'a>(&'a self, viewport: &'a Rect) -> impl Iterator<Item = &'a RowBatch> {
        self.rows
            .values()
            .filter(move |batch| row_in_view(batch.row as f32, viewport))
    }

    /// Total sprites across every batch.
    pub fn sprite_count(&self) -> usize {
        self.rows.values().map(|b| b.len()).sum()
    }
}

/// Strict viewport test for a batch row.  The asymmetric margin admits
/// sprites whose art extends one tile above their logical row (stacked
/// tops) or two tiles below it.  Rows at exactly the limits are culled.
#[inline]
pub fn row_in_view(row_y: f32, viewport: &Rect) -> bool {
    row_y > viewport.top() - TILE_HEIGHT && row_y < viewport.bottom() + 2.0 * TILE_HEIGHT
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::assets::{SheetLayout, SheetRegistry};
    use crate::canvas::SpriteRef;

    fn sprite(x: f32, y: f32) -> SpriteInstance {
        let mut registry = SheetRegistry::new();
        let sheet = registry.insert_layout(SheetLayout::new(10, 10, 34, 34));
        SpriteRef::new(sheet, (0, 0)).at(Vec2::new(x, y))
    }

    #[test]
    fn batches_keep_insertion_order_within_a_row() {
        let mut builder = BatchBuilder::new();
        builder.add(sprite(2.0, 8.0), 8);
        builder.add(sprite(1.0, 8.0), 8);
        builder.add(sprite(0.0, 8.0), 8);
        let batches = builder.finalize();

        let row: Vec<f32> = batches
            .iter()
            .flat_map(|b| b.sprites())
            .map(|s| s.position.x)
            .collect();
        assert_eq!(row, vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn rows_iterate_in_ascending_key_order() {
        let mut builder = BatchBuilder::new();
        builder.add(sprite(0.0, 16.0), 16);
        builder.add(sprite(0.0, -8.0), -8);
        builder.add(sprite(0.0, 0.0), 0);
        let batches = builder.finalize();

        let keys: Vec<i64> = batches.iter().map(|b| b.row()).collect();
        assert_eq!(keys, vec![-8, 0, 16]);
        assert_eq!(batches.sprite_count(), 3);
    }

    #[test]
    fn row_filter_is_strict_at_both_limits() {
        // top = 100, bottom = 200 → admitted range is (84, 232) exclusive.
        let view = Rect::new(0.0, 100.0, 100.0, 100.0);
        assert!(!row_in_view(84.0, &view));
        assert!(row_in_view(85.0, &view));
        assert!(row_in_view(231.0, &view));
        assert!(!row_in_view(232.0, &view));
    }

    #[test]
    fn visible_skips_rows_outside_the_viewport() {
        let mut builder = BatchBuilder::new();
        for row in [-64_i64, 0, 64, 128, 512] {
            builder.add(sprite(0.0, row as f32), row);
        }
        let batches = builder.finalize();

        let view = Rect::new(0.0, 0.0, 100.0, 100.0);
        let visible: Vec<i64> = batches.visible(&view).map(|b| b.row()).collect();
        // Admitted range is (-16, 132) exclusive.
        assert_eq!(visible, vec![0, 64, 128]);
    }
}
