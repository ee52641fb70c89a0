use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────────────

/// Asset registration failures — fatal at startup, nothing retries these.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load sprite sheet {path:?}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("sheet grid {cols}×{rows} does not divide image {width}×{height}")]
    GridMismatch {
        cols: u32,
        rows: u32,
        width: u32,
        height: u32,
    },
}

// ── SheetLayout ─────────────────────────────────────────────────────────────

/// Fixed-grid layout of a sprite sheet: `cols × rows` cells of
/// `cell_w × cell_h` pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    pub cols: u32,
    pub rows: u32,
    pub cell_w: u32,
    pub cell_h: u32,
}

impl SheetLayout {
    pub const fn new(cols: u32, rows: u32, cell_w: u32, cell_h: u32) -> Self {
        Self { cols, rows, cell_w, cell_h }
    }

    /// Derive the cell size from total image dimensions, rejecting images
    /// the grid does not divide evenly.
    pub fn from_image_size(
        cols: u32,
        rows: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, AssetError> {
        if cols == 0 || rows == 0 || width % cols != 0 || height % rows != 0 {
            return Err(AssetError::GridMismatch { cols, rows, width, height });
        }
        Ok(Self::new(cols, rows, width / cols, height / rows))
    }

    /// Top-left pixel of a cell inside the sheet image.
    pub fn cell_origin(&self, col: u32, row: u32) -> (u32, u32) {
        (col * self.cell_w, row * self.cell_h)
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        col < self.cols && row < self.rows
    }

    pub fn cell_count(&self) -> u32 {
        self.cols * self.rows
    }
}

// ── SheetRegistry ───────────────────────────────────────────────────────────

/// Handle to a sheet held by a [`SheetRegistry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SheetId(u32);

/// A registered sheet: its grid layout plus the decoded pixels the renderer
/// uploads.  Headless sheets (tests, servers) carry no pixels.
pub struct Sheet {
    pub layout: SheetLayout,
    pub image: Option<RgbaImage>,
}

/// Explicit sprite-sheet registry, passed in wherever sprites are assigned.
///
/// Each path is decoded exactly once; later loads of the same path return
/// the existing handle.  There is no process-wide sprite state.
#[derive(Default)]
pub struct SheetRegistry {
    sheets: Vec<Sheet>,
    by_path: HashMap<PathBuf, SheetId>,
}

impl SheetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a PNG sheet from disk with the given grid, or return the handle
    /// it was already registered under.
    pub fn load(&mut self, path: &Path, cols: u32, rows: u32) -> Result<SheetId, AssetError> {
        if let Some(&id) = self.by_path.get(path) {
            return Ok(id);
        }
        let img = image::open(path)
            .map_err(|source| AssetError::Load { path: path.to_owned(), source })?
            .to_rgba8();
        let layout = SheetLayout::from_image_size(cols, rows, img.width(), img.height())?;
        let id = self.push(Sheet { layout, image: Some(img) });
        self.by_path.insert(path.to_owned(), id);
        Ok(id)
    }

    /// Register every `.png` under `dir` (recursively) as a sheet with the
    /// same grid.  Files that fail to load are skipped with a warning, the
    /// way a missing sprite should degrade rather than abort discovery.
    pub fn load_folder(&mut self, dir: &Path, cols: u32, rows: u32) -> Vec<SheetId> {
        let mut ids = Vec::new();
        for entry in walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            match self.load(path, cols, rows) {
                Ok(id) => ids.push(id),
                Err(e) => tracing::warn!("skipping sheet {path:?}: {e}"),
            }
        }
        ids
    }

    /// Register a layout with no backing pixels, for headless use.
    pub fn insert_layout(&mut self, layout: SheetLayout) -> SheetId {
        self.push(Sheet { layout, image: None })
    }

    pub fn sheet(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    fn push(&mut self, sheet: Sheet) -> SheetId {
        let id = SheetId(self.sheets.len() as u32);
        self.sheets.push(sheet);
        id
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn layout_from_even_division() {
        let layout = SheetLayout::from_image_size(10, 10, 340, 340).unwrap();
        assert_eq!(layout.cell_w, 34);
        assert_eq!(layout.cell_h, 34);
        assert_eq!(layout.cell_count(), 100);
    }

    #[test]
    fn layout_rejects_uneven_grid() {
        assert!(SheetLayout::from_image_size(10, 10, 345, 340).is_err());
        assert!(SheetLayout::from_image_size(0, 10, 340, 340).is_err());
    }

    #[test]
    fn cell_origin_walks_the_grid() {
        let layout = SheetLayout::new(10, 10, 34, 34);
        assert_eq!(layout.cell_origin(0, 0), (0, 0));
        assert_eq!(layout.cell_origin(3, 2), (102, 68));
        assert!(layout.contains(9, 9));
        assert!(!layout.contains(10, 0));
    }

    #[test]
    fn registry_hands_out_distinct_handles() {
        let mut registry = SheetRegistry::new();
        let a = registry.insert_layout(SheetLayout::new(10, 10, 34, 34));
        let b = registry.insert_layout(SheetLayout::new(3, 3, 32, 32));
        assert_ne!(a, b);
        assert_eq!(registry.sheet(a).unwrap().layout.cols, 10);
        assert_eq!(registry.sheet(b).unwrap().layout.cols, 3);
        assert!(registry.sheet(a).unwrap().image.is_none());
    }

    #[test]
    fn load_decodes_each_path_exactly_once() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tiles.png");
        RgbaImage::new(340, 340).save(&path).expect("write sheet");

        let mut registry = SheetRegistry::new();
        let first = registry.load(&path, 10, 10).expect("first load");
        let second = registry.load(&path, 10, 10).expect("second load");
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.sheet(first).unwrap().layout.cell_w, 34);
    }

    #[test]
    fn load_folder_skips_unreadable_files() {
        let dir = TempDir::new().expect("tempdir");
        RgbaImage::new(64, 32)
            .save(dir.path().join("good.png"))
            .expect("write sheet");
        std::fs::write(dir.path().join("broken.png"), b"not a png").expect("write");
        std::fs::write(dir.path().join("notes.txt"), b"ignored").expect("write");

        let mut registry = SheetRegistry::new();
        let ids = registry.load_folder(dir.path(), 2, 1);
        assert_eq!(ids.len(), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.sheet(ids[0]).unwrap().layout.cell_w, 32);
    }
}
