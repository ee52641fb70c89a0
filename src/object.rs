use glam::Vec2;

use crate::canvas::{SpriteInstance, SpriteRef};

/// Vertical acceleration applied to airborne objects, px/tick².
pub const GRAVITY: f32 = 0.4;

// ── ObjectId / ObjectArena ──────────────────────────────────────────────────

/// Handle into an [`ObjectArena`].  Tiles hold these instead of owning
/// objects, so one object can be looked up from either side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(u32);

/// Flat storage for every object in a world.  Objects are never removed in
/// the current design, so a plain vector index is a stable handle.
#[derive(Default)]
pub struct ObjectArena {
    objects: Vec<WorldObject>,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: WorldObject) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &WorldObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i as u32), o))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut WorldObject)> {
        self.objects
            .iter_mut()
            .enumerate()
            .map(|(i, o)| (ObjectId(i as u32), o))
    }
}

// ── WorldObject ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectClass {
    /// Anchored to a tile and baked into the static row batches.
    Static,
    /// Free-moving; updated and drawn every frame.
    Dynamic,
}

/// An entity placed in the world: a ground anchor in screen space, a height
/// above the ground plane, and the sprite/shadow pair it renders as.
///
/// Draw-order depth is `screen_y + z` — the ground row — so an object rises
/// without changing which row it sorts into, and its shadow stays put.
pub struct WorldObject {
    /// Ground position in screen space; the shadow is drawn here.
    pub anchor: Vec2,
    /// Height above the ground plane, in pixels.
    pub z: f32,
    /// Vertical velocity in px/tick; positive is up.
    pub vz: f32,
    pub class: ObjectClass,
    pub sprite: SpriteRef,
    pub shadow: SpriteRef,
}

impl WorldObject {
    /// A tile-anchored object.  Its anchor is set when a tile adopts it.
    pub fn new_static(sprite: SpriteRef, shadow: SpriteRef) -> Self {
        Self {
            anchor: Vec2::ZERO,
            z: 0.0,
            vz: 0.0,
            class: ObjectClass::Static,
            sprite,
            shadow,
        }
    }

    pub fn new_dynamic(anchor: Vec2, sprite: SpriteRef, shadow: SpriteRef) -> Self {
        Self {
            anchor,
            z: 0.0,
            vz: 0.0,
            class: ObjectClass::Dynamic,
            sprite,
            shadow,
        }
    }

    /// Re-anchor this object (tile placement).
    pub fn place_at(&mut self, anchor: Vec2) {
        self.anchor = anchor;
    }

    /// Displayed position: the anchor lifted by the current height.
    pub fn screen_position(&self) -> Vec2 {
        Vec2::new(self.anchor.x, self.anchor.y - self.z)
    }

    /// Painter's-algorithm depth.  Equals `screen_position().y + z`.
    pub fn depth(&self) -> f32 {
        self.anchor.y
    }

    /// Terminal state of the vertical physics: on the ground and at rest.
    pub fn is_grounded(&self) -> bool {
        self.z == 0.0 && self.vz == 0.0
    }

    /// Give the object an upward (positive) or downward kick, re-entering
    /// the airborne state.
    pub fn launch(&mut self, vz: f32) {
        self.vz = vz;
    }

    /// One vertical physics tick.  Grounded objects are untouched; airborne
    /// ones accelerate downward and land when the ground plane is crossed,
    /// at which point height snaps to zero and only then velocity resets.
    pub fn update(&mut self) {
        if self.is_grounded() {
            return;
        }
        self.vz -= GRAVITY;
        self.z += self.vz;
        if self.z <= 0.0 {
            self.z = 0.0;
            self.vz = 0.0;
        }
    }

    pub fn sprite_instance(&self) -> SpriteInstance {
        self.sprite.at(self.screen_position())
    }

    /// The drop shadow stays on the ground plane below the sprite.
    pub fn shadow_instance(&self) -> SpriteInstance {
        self.shadow.at(self.anchor)
    }
}
