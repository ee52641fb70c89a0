use glam::Vec2;

use crate::assets::SheetId;
use crate::camera::Camera;
use crate::canvas::{Canvas, SpriteRef};
use crate::input::{Direction, InputSnapshot};
use crate::map::{Map, MapConfig, MapError};
use crate::object::{ObjectArena, ObjectClass, ObjectId, WorldObject};
use crate::projection::{GridPos, screen_to_grid_clamped};

/// Camera pan speed while a direction is held, world px/s.
const PAN_SPEED: f32 = 300.0;
/// Zoom factor applied per wheel step.
const ZOOM_STEP: f32 = 1.25;

/// A generated map plus everything living on it: the object arena and the
/// camera.  The embedding engine drives one `update` and one `draw` per
/// frame; all work in both phases is synchronous and single-threaded.
pub struct World {
    pub map: Map,
    pub objects: ObjectArena,
    pub camera: Camera,
    tile_sheet: SheetId,
}

impl World {
    /// Generate the map and center the camera on its footprint.
    pub fn new(config: &MapConfig, tile_sheet: SheetId) -> Result<Self, MapError> {
        let map = Map::generate(config)?;
        let center = map.pixel_rect().center();
        Ok(Self {
            map,
            objects: ObjectArena::new(),
            camera: Camera::new(center.x, center.y),
            tile_sheet,
        })
    }

    /// Spawn a static object onto the tile at `(gx, gy)`.  It becomes part
    /// of the row batches on the next `build_batches`.  `None` out of
    /// bounds.
    pub fn place_static(
        &mut self,
        gx: i32,
        gy: i32,
        sprite: SpriteRef,
        shadow: SpriteRef,
    ) -> Option<ObjectId> {
        self.map.tile_at_grid(gx, gy)?;
        let id = self.objects.insert(WorldObject::new_static(sprite, shadow));
        self.map.add_object(gx, gy, id, &mut self.objects);
        Some(id)
    }

    /// Spawn a free-moving dynamic object at a screen-space ground anchor.
    pub fn spawn_dynamic(
        &mut self,
        anchor: Vec2,
        sprite: SpriteRef,
        shadow: SpriteRef,
    ) -> ObjectId {
        self.objects
            .insert(WorldObject::new_dynamic(anchor, sprite, shadow))
    }

    /// Freeze all static content into row batches.
    pub fn build_batches(&mut self) {
        self.map.build_batches(&self.objects, self.tile_sheet);
    }

    /// Per-frame update phase: camera pan/zoom from polled input, one
    /// physics tick per dynamic object, then the camera's zoom lerp.
    pub fn update(&mut self, input: &InputSnapshot, dt: f32) {
        let step = PAN_SPEED * dt;
        if input.holding(Direction::Left) {
            self.camera.pan(-step, 0.0);
        }
        if input.holding(Direction::Right) {
            self.camera.pan(step, 0.0);
        }
        if input.holding(Direction::Up) {
            self.camera.pan(0.0, -step);
        }
        if input.holding(Direction::Down) {
            self.camera.pan(0.0, step);
        }
        if input.wheel > 0.0 {
            self.camera.zoom_by(ZOOM_STEP);
        } else if input.wheel < 0.0 {
            self.camera.unzoom_by(ZOOM_STEP);
        }
        self.camera.tick(dt);

        for (_, obj) in self.objects.iter_mut() {
            if obj.class == ObjectClass::Dynamic {
                obj.update();
            }
        }
    }

    /// Per-frame render phase: culled static batches, then dynamic objects
    /// painter-sorted by depth, each shadow under its sprite.
    pub fn draw(&self, canvas: &mut impl Canvas, screen_w: f32, screen_h: f32) {
        let viewport = self.camera.viewport(screen_w, screen_h);
        self.map.draw(&viewport, canvas);

        let mut dynamic: Vec<(f32, ObjectId)> = self
            .objects
            .iter()
            .filter(|(_, o)| o.class == ObjectClass::Dynamic)
            .map(|(id, o)| (o.depth(), id))
            .collect();
        dynamic.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, id) in dynamic {
            if let Some(obj) = self.objects.get(id) {
                canvas.draw_sprite(&obj.shadow_instance());
                canvas.draw_sprite(&obj.sprite_instance());
            }
        }
    }

    /// Grid cell under a window-space pointer, clamped into the map.
    pub fn pick_tile(&self, mouse: Vec2, screen_w: f32, screen_h: f32) -> GridPos {
        let world = self.camera.screen_to_world(mouse, screen_w, screen_h);
        screen_to_grid_clamped(world, self.map.width(), self.map.height())
    }
}
