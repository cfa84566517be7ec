//! EntityGroup integration tests: layering, nesting and the stock entities
//! rendered through a recording surface.

use std::sync::{Arc, Mutex};

use layered2d::backend::{Color, DrawCall, FontSpec, ImageData, RecordingSurface};
use layered2d::engine::Engine;
use layered2d::entities::{
    Entity, EntityGroup, ImageEntity, LineEntity, Node, NodeHandle, TextCentering, TextEntity,
};
use layered2d::geometry::{Dimensions, Rect, Vector};

fn setup() -> (Engine, RecordingSurface) {
    let dims = Dimensions::new(1200.0, 675.0);
    (Engine::new("group test", dims), RecordingSurface::new(dims))
}

fn boxed(x: f64, y: f64) -> ImageEntity {
    let mut sprite = ImageEntity::rect(Color::WHITE, Dimensions::square(10.0));
    sprite.entity.move_to(Vector::new(x, y));
    sprite
}

fn image_dests(surface: &RecordingSurface) -> Vec<Rect> {
    surface
        .calls()
        .iter()
        .filter_map(|call| match call {
            DrawCall::Image { dest, .. } => Some(*dest),
            _ => None,
        })
        .collect()
}

#[test]
fn layers_render_bottom_to_top() {
    let (engine, mut surface) = setup();
    let group = EntityGroup::new();
    group.add(5, boxed(50.0, 0.0));
    group.add(-1, boxed(10.0, 0.0));
    group.add(0, boxed(20.0, 0.0));

    group.render(&mut surface, &engine).unwrap();

    let xs: Vec<f64> = image_dests(&surface).iter().map(|r| r.x()).collect();
    assert_eq!(xs, vec![10.0, 20.0, 50.0]);
}

#[test]
fn images_upload_once_across_frames() {
    let (engine, mut surface) = setup();
    let group = EntityGroup::new();
    group.add(0, boxed(0.0, 0.0));
    group.add(0, ImageEntity::circle(Color::WHITE, 8.0));

    for _ in 0..3 {
        surface.begin_frame();
        group.render(&mut surface, &engine).unwrap();
    }

    assert_eq!(surface.image_count(), 2);
    assert_eq!(image_dests(&surface).len(), 2);
}

#[test]
fn nested_group_offsets_accumulate() {
    let (engine, mut surface) = setup();

    let inner = EntityGroup::with_entity(Entity::new(Rect::new(30.0, 40.0, 0.0, 0.0)));
    let child_key = inner.add(0, boxed(1.0, 2.0));
    let inner = Arc::new(Mutex::new(inner));

    let outer = EntityGroup::with_entity(Entity::new(Rect::new(100.0, 200.0, 0.0, 0.0)));
    outer.add(0, NodeHandle::from_shared(Arc::clone(&inner)));

    outer.render(&mut surface, &engine).unwrap();

    assert_eq!(image_dests(&surface), vec![Rect::new(131.0, 242.0, 10.0, 10.0)]);

    // both levels are back in their own coordinate space
    let inner = inner.lock().unwrap();
    assert_eq!(inner.entity().bounds.pos, Vector::new(30.0, 40.0));
    let child = inner.get(0, &child_key).unwrap().entity();
    assert_eq!(child.bounds.pos, Vector::new(1.0, 2.0));
}

#[test]
fn centred_text_stays_centred_across_frames() {
    let (engine, mut surface) = setup();
    let group = EntityGroup::new();

    let mut title = TextEntity::new("hello", FontSpec::new("", 20.0), Color::WHITE);
    title.set_centering(TextCentering::BOTH);
    group.add(0, title);

    // "hello" at size 20 measures 60 x 20 on the recording surface
    let expected = DrawCall::Text {
        text: "hello".into(),
        baseline: Vector::new(570.0, 347.5),
        color: Color::WHITE,
    };
    for _ in 0..2 {
        surface.begin_frame();
        group.render(&mut surface, &engine).unwrap();
        assert_eq!(surface.calls(), &[expected.clone()]);
    }
}

#[test]
fn text_centres_inside_explicit_rect() {
    let (engine, mut surface) = setup();
    let mut label = TextEntity::new("ab", FontSpec::new("", 10.0), Color::WHITE);
    label.set_centered_in(Rect::from_size(100.0, 50.0));
    label.set_centering(TextCentering::HORIZONTAL);
    label.measure(&mut surface, &engine);

    // width = 2 * 10 * 0.6
    assert_eq!(label.entity.bounds.pos, Vector::new(44.0, 0.0));
    assert_eq!(label.entity.bounds.size, Dimensions::new(12.0, 10.0));
}

#[test]
fn line_entity_strokes_between_points() {
    let (engine, mut surface) = setup();
    let group = EntityGroup::with_entity(Entity::new(Rect::new(5.0, 5.0, 0.0, 0.0)));
    group.add(0, LineEntity::between(Vector::zero(), Vector::new(3.0, 4.0), 2.0, Color::WHITE));

    group.render(&mut surface, &engine).unwrap();

    match surface.calls() {
        [DrawCall::Line { from, to, style }] => {
            assert_eq!(*from, Vector::new(5.0, 5.0));
            assert!((to.x - 8.0).abs() < 1e-9 && (to.y - 9.0).abs() < 1e-9);
            assert_eq!(style.width, 2.0);
        }
        other => panic!("unexpected draw calls: {other:?}"),
    }
}

#[test]
fn empty_image_fails_render_and_keeps_bounds() {
    let (engine, mut surface) = setup();
    let group = EntityGroup::with_entity(Entity::new(Rect::new(10.0, 10.0, 0.0, 0.0)));
    let empty = ImageEntity::new(ImageData::filled(0, 0, Color::WHITE));
    let key = group.add(0, empty);

    assert!(group.render(&mut surface, &engine).is_err());
    assert_eq!(group.get(0, &key).unwrap().entity().bounds.pos, Vector::zero());
}

#[test]
fn typed_access_through_handles() {
    let group = EntityGroup::new();
    let key = group.add(2, boxed(0.0, 0.0));

    let handle = group.get(2, &key).unwrap();
    handle.with::<ImageEntity, _>(|sprite| sprite.entity.visible = false);
    assert!(!handle.entity().visible);
    assert!(handle.with::<TextEntity, _>(|_| ()).is_none());

    let locked = handle.lock();
    let node: &dyn Node = &*locked;
    assert!(node.downcast_ref::<ImageEntity>().is_some());
}

#[test]
fn removing_last_entry_drops_layer() {
    let group = EntityGroup::new();
    let a = group.add(1, boxed(0.0, 0.0));
    group.add(3, boxed(0.0, 0.0));
    assert_eq!(group.layers(), vec![1, 3]);

    assert!(group.remove(1, &a).is_some());
    assert_eq!(group.layers(), vec![3]);
    assert_eq!(group.len(), 1);
}
