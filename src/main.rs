//! layered2d demo.
//!
//! Opens a window (or runs headless) with a few boxes bouncing off the
//! window edges and a disk that can be dragged with the left mouse button.
//! Boxes that hit the disk reverse direction. A new box is spawned every
//! couple of seconds up to a limit. Escape quits.
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features raylib
//! cargo run -- --headless --frames 300
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{error, info};

use layered2d::backend::{Color, HeadlessHost, Surface};
use layered2d::config::EngineConfig;
use layered2d::engine::Engine;
use layered2d::entities::{
    Collider, CollisionHandler, Constrain, ConstrainedHandler, Entity, FixedUpdate, ImageEntity,
    KeyInput, MouseInput, Node, Render,
};
use layered2d::error::EngineError;
use layered2d::events::{KeyEvent, MouseButton};
use layered2d::geometry::{ConstrainedSides, Dimensions, Rect, RectSide, Vector, VelocityVector};
use layered2d::scene::{Scene, Timer};

const BOX_SIZE: f64 = 40.0;
const MAX_BOXES: usize = 12;
const BOX_LAYER: i32 = 0;
const HANDLE_LAYER: i32 = 1;

#[derive(Parser, Debug)]
#[command(version, about = "Bouncing boxes on the layered2d engine")]
struct Cli {
    /// INI file to read settings from.
    #[arg(long, value_name = "PATH", default_value = "./layered2d.ini")]
    config: PathBuf,

    /// Run without a window.
    #[arg(long)]
    headless: bool,

    /// Frames to run before exiting when headless.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Override the configured tick rate.
    #[arg(long)]
    max_tps: Option<u32>,
}

/// Box that moves every tick and bounces off the window edges.
struct Bouncer {
    sprite: ImageEntity,
}

impl Bouncer {
    fn new(color: Color, pos: Vector, velocity: VelocityVector) -> Self {
        let mut sprite = ImageEntity::rect(color, Dimensions::square(BOX_SIZE));
        sprite.entity.move_to(pos);
        sprite.entity.velocity = velocity;
        Self { sprite }
    }
}

impl Render for Bouncer {
    fn render(&mut self, surface: &mut dyn Surface, engine: &Engine) -> Result<(), EngineError> {
        self.sprite.render(surface, engine)
    }
}

impl FixedUpdate for Bouncer {
    fn fixed_update(&mut self, engine: &Engine) {
        self.sprite.entity.advance(engine.max_tps());
    }
}

impl Constrain for Bouncer {
    fn constrain(&mut self, engine: &Engine) -> ConstrainedSides {
        self.sprite.entity.bounds.constrain(engine.bounds())
    }
}

impl ConstrainedHandler for Bouncer {
    fn on_constrained(&mut self, side: RectSide) {
        let velocity = &mut self.sprite.entity.velocity.vector;
        *velocity = match side {
            RectSide::Left | RectSide::Right => velocity.inverted_x(),
            RectSide::Top | RectSide::Bottom => velocity.inverted_y(),
        };
    }
}

impl Collider for Bouncer {
    fn collider(&self) -> Rect {
        self.sprite.entity.bounds
    }
}

impl CollisionHandler for Bouncer {
    fn collided_with(&mut self, other: &mut dyn Node) {
        if other.downcast_ref::<DragHandle>().is_none() {
            return;
        }
        let entity = &mut self.sprite.entity;
        entity.velocity.vector = entity.velocity.vector.inverted();
        entity.push(entity.velocity.vector);
    }
}

impl Node for Bouncer {
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.sprite.entity
    }

    fn as_render(&mut self) -> Option<&mut dyn Render> {
        Some(self)
    }

    fn as_fixed_update(&mut self) -> Option<&mut dyn FixedUpdate> {
        Some(self)
    }

    fn as_constrain(&mut self) -> Option<&mut dyn Constrain> {
        Some(self)
    }

    fn as_constrained_handler(&mut self) -> Option<&mut dyn ConstrainedHandler> {
        Some(self)
    }

    fn as_collider(&self) -> Option<&dyn Collider> {
        Some(self)
    }

    fn as_collision_handler(&mut self) -> Option<&mut dyn CollisionHandler> {
        Some(self)
    }
}

/// Disk that follows the mouse while the left button is held on it.
struct DragHandle {
    sprite: ImageEntity,
    grab_offset: Option<Vector>,
}

impl Render for DragHandle {
    fn render(&mut self, surface: &mut dyn Surface, engine: &Engine) -> Result<(), EngineError> {
        self.sprite.render(surface, engine)
    }
}

impl MouseInput for DragHandle {
    fn mouse_down(&mut self, button: MouseButton, pos: Vector) {
        if button == MouseButton::Left && self.sprite.entity.bounds.contains(pos) {
            self.grab_offset = Some(pos - self.sprite.entity.bounds.pos);
        }
    }

    fn mouse_up(&mut self, button: MouseButton, _pos: Vector) {
        if button == MouseButton::Left {
            self.grab_offset = None;
        }
    }

    fn mouse_move(&mut self, pos: Vector) {
        if let Some(offset) = self.grab_offset {
            self.sprite.entity.move_to(pos - offset);
        }
    }
}

impl Collider for DragHandle {
    fn collider(&self) -> Rect {
        self.sprite.entity.bounds
    }
}

impl Node for DragHandle {
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.sprite.entity
    }

    fn as_render(&mut self) -> Option<&mut dyn Render> {
        Some(self)
    }

    fn as_mouse_input(&mut self) -> Option<&mut dyn MouseInput> {
        Some(self)
    }

    fn as_collider(&self) -> Option<&dyn Collider> {
        Some(self)
    }
}

/// Invisible node that quits the engine on Escape.
#[derive(Default)]
struct QuitKey {
    entity: Entity,
}

impl KeyInput for QuitKey {
    fn key_down(&mut self, key: &KeyEvent) {
        if key.name.eq_ignore_ascii_case("escape") {
            if let Some(engine) = layered2d::engine::active_engine() {
                info!("escape pressed, quitting");
                engine.quit();
            }
        }
    }
}

impl Node for QuitKey {
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn as_key_input(&mut self) -> Option<&mut dyn KeyInput> {
        Some(self)
    }
}

fn random_color() -> Color {
    Color::rgb(fastrand::u8(64..=255), fastrand::u8(64..=255), fastrand::u8(64..=255))
}

fn spawn_box(engine: &Engine, scene: &Scene) {
    let bounds = engine.bounds();
    let area = Rect::new(0.0, 0.0, bounds.width() - BOX_SIZE, bounds.height() - BOX_SIZE);
    let velocity = if fastrand::bool() {
        VelocityVector::per_tick(10.0, 0.0)
    } else {
        VelocityVector::per_tick(0.0, 10.0)
    };
    scene.entities().add(
        BOX_LAYER,
        Bouncer::new(random_color(), Vector::random_within(area), velocity),
    );
}

fn build_scene(engine: &Engine, config: &EngineConfig) -> Scene {
    let scene = Scene::new("bounce").with_initializer(|engine, scene| {
        scene.entities().clear();

        scene.entities().add(
            BOX_LAYER,
            Bouncer::new(
                Color::rgb(220, 60, 60),
                Vector::new(100.0, 100.0),
                VelocityVector::per_tick(10.0, 0.0),
            ),
        );
        scene.entities().add(
            BOX_LAYER,
            Bouncer::new(
                Color::rgb(60, 200, 90),
                Vector::new(300.0, 50.0),
                VelocityVector::per_tick(0.0, 10.0),
            ),
        );

        let mut disk = ImageEntity::circle(Color::WHITE, 30.0);
        disk.entity.move_to(engine.bounds().center());
        scene.entities().add_named(
            "handle",
            HANDLE_LAYER,
            DragHandle {
                sprite: disk,
                grab_offset: None,
            },
        );
        scene.entities().add_named("quit", HANDLE_LAYER, QuitKey::default());

        scene.add_timer(
            "spawn",
            Timer::wall_clock(2.0, |engine, scene| {
                if scene.entities().len() < MAX_BOXES + 2 {
                    spawn_box(engine, scene);
                } else {
                    scene.remove_timer("spawn");
                }
            }),
        );
    });

    if config.stats_enabled {
        scene.render_stats(config.stats_font.clone(), config.stats_size, config.stats_color);
    }
    info!("built scene '{}' for engine '{}'", scene.name(), engine.name());
    scene
}

fn run(cli: &Cli) -> Result<(), EngineError> {
    let mut config = EngineConfig::load_or_default(&cli.config)?;
    if let Some(tps) = cli.max_tps {
        config.max_tps = tps;
    }

    let engine = Engine::from_config(&config);
    engine.set_tps_handler(|engine, tps| {
        if let Some(scene) = engine.scene() {
            log::trace!("scene '{}' at {tps} TPS", scene.name());
        }
    });
    engine.set_scene(build_scene(&engine, &config));

    #[cfg(feature = "raylib")]
    if !cli.headless {
        let mut host = layered2d::backend::RaylibHost::open(&config.title, engine.dimensions(), 60);
        return engine.run(&mut host);
    }
    #[cfg(not(feature = "raylib"))]
    if !cli.headless {
        info!("built without the raylib feature; running headless");
    }

    let mut host = HeadlessHost::new(engine.dimensions())
        .with_frame_limit(cli.frames)
        .with_frame_interval(Duration::from_millis(16));
    engine.run(&mut host)?;
    info!("ran {} frames headless", host.frames_run());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("{err}");
        std::process::exit(1);
    }
}
