//! Engine loop integration tests: the tick thread and the frame loop running
//! together on a headless host.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use layered2d::backend::{Color, DrawCall, HeadlessHost, ImageData};
use layered2d::engine::{Engine, active_engines};
use layered2d::entities::{
    Entity, FixedUpdate, ImageEntity, KeyInput, MouseInput, Node, NodeHandle,
};
use layered2d::error::EngineError;
use layered2d::events::{InputEvent, KeyEvent, MouseButton};
use layered2d::geometry::{Dimensions, Vector};
use layered2d::scene::Scene;

const SIZE: Dimensions = Dimensions::new(320.0, 240.0);

fn headless(frames: u64) -> HeadlessHost {
    HeadlessHost::new(SIZE)
        .with_frame_limit(frames)
        .with_frame_interval(Duration::from_millis(5))
}

fn is_registered(engine: &Engine) -> bool {
    active_engines().iter().any(|e| e.ptr_eq(engine))
}

/// Counts fixed updates.
#[derive(Default)]
struct Ticker {
    entity: Entity,
    ticks: u32,
}

impl FixedUpdate for Ticker {
    fn fixed_update(&mut self, _engine: &Engine) {
        self.ticks += 1;
    }
}

impl Node for Ticker {
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn as_fixed_update(&mut self) -> Option<&mut dyn FixedUpdate> {
        Some(self)
    }
}

/// Swaps to a named scene when a key is pressed.
struct SceneSwitch {
    entity: Entity,
    engine: Engine,
    next: &'static str,
}

impl KeyInput for SceneSwitch {
    fn key_down(&mut self, _key: &KeyEvent) {
        self.engine.queue_scene(Scene::new(self.next));
    }
}

impl Node for SceneSwitch {
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn as_key_input(&mut self) -> Option<&mut dyn KeyInput> {
        Some(self)
    }
}

/// Remembers the mouse events it saw.
#[derive(Default)]
struct Pointer {
    entity: Entity,
    seen: Vec<String>,
}

impl MouseInput for Pointer {
    fn mouse_down(&mut self, button: MouseButton, pos: Vector) {
        self.seen.push(format!("down {} {},{}", button.index(), pos.x, pos.y));
    }

    fn mouse_up(&mut self, button: MouseButton, _pos: Vector) {
        self.seen.push(format!("up {}", button.index()));
    }

    fn mouse_move(&mut self, pos: Vector) {
        self.seen.push(format!("move {},{}", pos.x, pos.y));
    }
}

impl Node for Pointer {
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn as_mouse_input(&mut self) -> Option<&mut dyn MouseInput> {
        Some(self)
    }
}

#[test]
fn headless_run_renders_and_titles_window() {
    let engine = Engine::new("loop", SIZE);
    let scene = Scene::new("main");
    scene.entities().add(0, ImageEntity::rect(Color::WHITE, Dimensions::square(8.0)));
    engine.set_scene(scene);

    let mut host = headless(4);
    engine.run(&mut host).unwrap();

    assert_eq!(host.frames_run(), 4);
    assert_eq!(host.title(), "loop - main");
    assert_eq!(host.surface().image_count(), 1);
    assert!(matches!(
        host.surface().calls(),
        [DrawCall::FillRect { color: Color::BLACK, .. }, DrawCall::Image { .. }]
    ));
}

#[test]
fn tick_thread_runs_while_host_loops() {
    let engine = Engine::new("ticking", SIZE);
    engine.set_max_tps(200);
    let ticker = Arc::new(Mutex::new(Ticker::default()));
    let scene = Scene::new("main");
    scene.entities().add(0, NodeHandle::from_shared(Arc::clone(&ticker)));
    engine.set_scene(scene);

    let mut host = headless(40);
    engine.run(&mut host).unwrap();

    let ticks = ticker.lock().unwrap().ticks;
    assert!(ticks > 0);

    // the tick thread has been joined: no further ticks happen
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(ticker.lock().unwrap().ticks, ticks);
}

#[test]
fn engine_is_registered_only_while_running() {
    let engine = Engine::new("registered", SIZE);
    let seen_while_running = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&seen_while_running);
    engine.set_scene(Scene::new("main").with_renderer(move |_, engine, _| {
        if is_registered(engine) {
            seen.store(true, Ordering::SeqCst);
        }
    }));

    assert!(!is_registered(&engine));
    engine.run(&mut headless(2)).unwrap();

    assert!(seen_while_running.load(Ordering::SeqCst));
    assert!(!is_registered(&engine));
}

#[test]
fn queued_scene_swaps_at_next_frame() {
    let engine = Engine::new("loop", SIZE);
    let scene = Scene::new("first");
    scene.entities().add(
        0,
        SceneSwitch {
            entity: Entity::default(),
            engine: engine.clone(),
            next: "second",
        },
    );
    engine.set_scene(scene);

    let mut host = headless(5);
    host.push_input(2, InputEvent::KeyDown(KeyEvent::named("Space")));
    engine.run(&mut host).unwrap();

    assert_eq!(engine.scene().unwrap().name(), "second");
    assert_eq!(host.title(), "loop - second");
}

#[test]
fn mouse_events_reach_every_listener() {
    let engine = Engine::new("mouse", SIZE);
    let pointer = Arc::new(Mutex::new(Pointer::default()));
    pointer.lock().unwrap().entity.visible = false;
    let scene = Scene::new("main");
    scene.entities().add(0, NodeHandle::from_shared(Arc::clone(&pointer)));
    engine.set_scene(scene);

    let mut host = headless(3);
    host.push_input(0, InputEvent::MouseMove { pos: Vector::new(5.0, 6.0) });
    host.push_input(
        1,
        InputEvent::MouseDown {
            button: MouseButton::Left,
            pos: Vector::new(5.0, 6.0),
        },
    );
    host.push_input(
        2,
        InputEvent::MouseUp {
            button: MouseButton::Left,
            pos: Vector::new(5.0, 6.0),
        },
    );
    engine.run(&mut host).unwrap();

    assert_eq!(
        pointer.lock().unwrap().seen,
        vec!["move 5,6", "down 1 5,6", "up 1"]
    );
}

#[test]
fn render_error_ends_run_and_cleans_up() {
    let engine = Engine::new("broken", SIZE);
    let scene = Scene::new("main");
    scene.entities().add(0, ImageEntity::new(ImageData::filled(0, 0, Color::WHITE)));
    engine.set_scene(scene);

    let mut host = HeadlessHost::new(SIZE);
    let result = engine.run(&mut host);

    assert!(matches!(result, Err(EngineError::Surface(_))));
    assert_eq!(host.frames_run(), 0);
    assert!(!is_registered(&engine));
}

#[test]
fn quit_from_tick_stops_unbounded_host() {
    let engine = Engine::new("quitter", SIZE);
    engine.set_scene(Scene::new("main").with_updater(|engine, _| engine.quit()));

    // no frame limit: only the quit request ends the loop
    let mut host = HeadlessHost::new(SIZE).with_frame_interval(Duration::from_millis(2));
    engine.run(&mut host).unwrap();

    assert!(!is_registered(&engine));
}

#[test]
fn hidden_cursor_applied_at_start() {
    let engine = Engine::new("cursor", SIZE);
    engine.set_hide_cursor(true);
    let mut host = headless(1);
    engine.run(&mut host).unwrap();
    assert!(!host.cursor_visible());
    assert_eq!(host.title(), "cursor");
}

#[test]
fn stats_overlay_is_drawn_last() {
    let engine = Engine::new("stats", SIZE);
    let scene = Scene::new("main");
    scene.entities().add(0, ImageEntity::rect(Color::WHITE, Dimensions::square(4.0)));
    scene.render_stats("", 12.0, Color::WHITE);
    engine.set_scene(scene);

    let mut host = headless(2);
    engine.run(&mut host).unwrap();

    match host.surface().calls().last() {
        Some(DrawCall::Text { text, .. }) => assert!(text.starts_with("FPS: ")),
        other => panic!("expected the stats text last, got {other:?}"),
    }
}

#[test]
fn rate_handlers_report_after_a_second() {
    let engine = Engine::new("rates", SIZE);
    engine.set_max_tps(100);
    let fps_calls = Arc::new(AtomicUsize::new(0));
    let last_tps = Arc::new(AtomicU32::new(0));
    {
        let fps_calls = Arc::clone(&fps_calls);
        engine.set_fps_handler(move |_, _| {
            fps_calls.fetch_add(1, Ordering::SeqCst);
        });
        let last_tps = Arc::clone(&last_tps);
        engine.set_tps_handler(move |_, tps| last_tps.store(tps, Ordering::SeqCst));
    }
    engine.set_scene(Scene::new("main"));

    // 10 ms per frame for 1.3 s
    let mut host = HeadlessHost::new(SIZE)
        .with_frame_limit(130)
        .with_frame_interval(Duration::from_millis(10));
    engine.run(&mut host).unwrap();

    assert!(fps_calls.load(Ordering::SeqCst) >= 1);
    assert!(last_tps.load(Ordering::SeqCst) > 0);
    assert_eq!(engine.tps(), last_tps.load(Ordering::SeqCst));
    assert!(engine.fps() > 0);
}

fn initialised_scene(name: String) -> Scene {
    Scene::new(name).with_initializer(|_, scene| {
        std::thread::sleep(Duration::from_millis(2));
        scene.set_resource("ready", true);
    })
}

#[test]
fn concurrent_swaps_never_expose_uninitialised_scene() {
    let engine = Engine::new("swapper", SIZE);
    engine.set_max_tps(500);
    let violated = Arc::new(AtomicBool::new(false));

    let check = {
        let violated = Arc::clone(&violated);
        move |scene: &Scene| {
            if scene.try_resource::<bool>("ready") != Some(true) {
                violated.store(true, Ordering::SeqCst);
            }
        }
    };
    let with_checks = |scene: Scene| {
        let on_tick = check.clone();
        let on_frame = check.clone();
        scene
            .with_updater(move |_, scene| on_tick(scene))
            .with_renderer(move |_, _, scene| on_frame(scene))
    };

    engine.set_scene(with_checks(initialised_scene("scene 0".into())));

    let runner = {
        let engine = engine.clone();
        std::thread::spawn(move || {
            let mut host = HeadlessHost::new(SIZE)
                .with_frame_limit(150)
                .with_frame_interval(Duration::from_millis(1));
            engine.run(&mut host)
        })
    };

    for i in 1..=25 {
        engine.set_scene(with_checks(initialised_scene(format!("scene {i}"))));
    }

    runner.join().unwrap().unwrap();
    assert!(!violated.load(Ordering::SeqCst));
}
