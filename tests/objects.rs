use diorama::TILE_HEIGHT;
use diorama::assets::{SheetLayout, SheetRegistry};
use diorama::canvas::SpriteRef;
use diorama::map::{Map, MapConfig, PoolEntry};
use diorama::object::{GRAVITY, ObjectArena, ObjectClass, WorldObject};
use diorama::tile::TileKind;
use glam::Vec2;

fn sprites() -> (SpriteRef, SpriteRef) {
    let mut registry = SheetRegistry::new();
    let sheet = registry.insert_layout(SheetLayout::new(3, 3, 32, 32));
    (SpriteRef::new(sheet, (0, 0)), SpriteRef::new(sheet, (1, 0)))
}

fn uniform_map(kind: TileKind) -> Map {
    Map::generate(&MapConfig {
        width: 3,
        height: 3,
        pool: vec![PoolEntry { kind, weight: 1 }],
        overrides: Vec::new(),
        seed: Some(9),
    })
    .unwrap()
}

#[test]
fn falling_object_lands_within_bounded_ticks() {
    let (sprite, shadow) = sprites();
    let mut obj = WorldObject::new_dynamic(Vec2::new(0.0, 50.0), sprite, shadow);
    obj.z = 10.0;

    // Gravity alone closes 10px in well under 10 ticks; leave headroom.
    let mut landed = false;
    for _ in 0..32 {
        obj.update();
        if obj.is_grounded() {
            landed = true;
            break;
        }
    }
    assert!(landed, "object should land in a bounded number of ticks");
    assert_eq!(obj.z, 0.0);
    assert_eq!(obj.vz, 0.0, "velocity resets exactly on landing");

    obj.update();
    assert!(obj.vz >= 0.0, "velocity never goes negative after landing");
}

#[test]
fn gravity_decrements_velocity_per_tick() {
    let (sprite, shadow) = sprites();
    let mut obj = WorldObject::new_dynamic(Vec2::ZERO, sprite, shadow);
    obj.launch(2.0);
    obj.update();
    assert_eq!(obj.vz, 2.0 - GRAVITY);
    assert_eq!(obj.z, 2.0 - GRAVITY);
}

#[test]
fn grounded_objects_ignore_updates() {
    let (sprite, shadow) = sprites();
    let mut obj = WorldObject::new_dynamic(Vec2::new(3.0, 4.0), sprite, shadow);
    assert!(obj.is_grounded());
    for _ in 0..10 {
        obj.update();
    }
    assert_eq!(obj.z, 0.0);
    assert_eq!(obj.vz, 0.0);
    assert_eq!(obj.screen_position(), Vec2::new(3.0, 4.0));
}

#[test]
fn foxhole_placement_sinks_the_object() {
    let (sprite, shadow) = sprites();
    let mut grass = uniform_map(TileKind::Grass);
    let mut foxholes = uniform_map(TileKind::Foxhole);

    let mut arena = ObjectArena::new();
    let on_grass = arena.insert(WorldObject::new_static(sprite, shadow));
    let in_hole = arena.insert(WorldObject::new_static(sprite, shadow));

    grass.add_object(1, 1, on_grass, &mut arena);
    foxholes.add_object(1, 1, in_hole, &mut arena);

    let grass_anchor = arena.get(on_grass).unwrap().anchor;
    let hole_anchor = arena.get(in_hole).unwrap().anchor;
    assert_eq!(hole_anchor, grass_anchor + Vec2::new(0.0, TILE_HEIGHT / 2.0));
}

#[test]
fn earthwork_placement_lands_on_the_raised_block() {
    let (sprite, shadow) = sprites();
    let mut map = uniform_map(TileKind::Earthwork);
    let mut arena = ObjectArena::new();
    let id = arena.insert(WorldObject::new_static(sprite, shadow));
    map.add_object(1, 1, id, &mut arena);

    let base = map.tile_at_grid(1, 1).unwrap();
    assert!(base.objects().is_empty());
    let block = base.block().unwrap();
    assert_eq!(block.objects(), &[id]);
    assert_eq!(
        arena.get(id).unwrap().anchor.y,
        base.position().y - TILE_HEIGHT
    );
}

#[test]
fn object_classes_are_preserved() {
    let (sprite, shadow) = sprites();
    let fixed = WorldObject::new_static(sprite, shadow);
    let loose = WorldObject::new_dynamic(Vec2::ZERO, sprite, shadow);
    assert_eq!(fixed.class, ObjectClass::Static);
    assert_eq!(loose.class, ObjectClass::Dynamic);
}
