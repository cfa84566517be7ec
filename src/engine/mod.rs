//! The engine: two loops over one active scene.
//!
//! [`Engine::run`] starts the fixed-rate tick thread and then hands the
//! calling thread to a [`WindowHost`]'s main loop, which renders frames.
//! Both loops reach the active scene through their own lock. A scene swap
//! ([`Engine::set_scene`]) takes both, so neither loop is ever mid-pass over
//! a scene being replaced, and a new scene's initializer has finished before
//! either loop sees it.
//!
//! Because the passes run under those locks, code called from inside a pass
//! (entity callbacks, scene hooks, timers, input handlers) must request a
//! swap with [`Engine::queue_scene`], which takes effect at the start of the
//! next frame.
//!
//! Submodules:
//! - [`registry`] – process-wide list of running engines

mod frame;
pub mod registry;
mod stats;
mod tickloop;

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use log::{debug, error, info, warn};

use crate::backend::host::WindowHost;
use crate::backend::surface::Surface;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::input::InputEvent;
use crate::geometry::{Dimensions, Rect, Vector};
use crate::scene::Scene;

use frame::FrameDriver;

pub use registry::{active_engine, active_engines, active_scene, active_scenes};

const DEFAULT_MAX_TPS: u32 = 60;

/// Called about once per second with the measured frame rate.
pub trait FpsUpdateHandler: Send + Sync {
    fn on_fps_updated(&self, engine: &Engine, fps: u32);
}

/// Called about once per second with the measured tick rate.
pub trait TpsUpdateHandler: Send + Sync {
    fn on_tps_updated(&self, engine: &Engine, tps: u32);
}

impl<F> FpsUpdateHandler for F
where
    F: Fn(&Engine, u32) + Send + Sync,
{
    fn on_fps_updated(&self, engine: &Engine, fps: u32) {
        self(engine, fps)
    }
}

impl<F> TpsUpdateHandler for F
where
    F: Fn(&Engine, u32) + Send + Sync,
{
    fn on_tps_updated(&self, engine: &Engine, tps: u32) {
        self(engine, tps)
    }
}

type Slot = Option<Arc<Scene>>;

struct EngineShared {
    name: String,
    dimensions: Dimensions,

    max_tps: AtomicU32,
    fps: AtomicU32,
    tps: AtomicU32,
    hide_cursor: AtomicBool,
    quit: AtomicBool,

    /// Held by the tick thread for the length of a tick.
    tick_slot: Mutex<Slot>,
    /// Held by the render thread for the length of a frame.
    render_slot: Mutex<Slot>,
    /// Readable from inside either pass.
    current: RwLock<Slot>,
    queued: Mutex<Slot>,
    pending_title: Mutex<Option<String>>,

    fps_handler: RwLock<Option<Arc<dyn FpsUpdateHandler>>>,
    tps_handler: RwLock<Option<Arc<dyn TpsUpdateHandler>>>,
}

/// Cheaply cloneable handle to an engine.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<EngineShared>,
}

fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Engine {
    pub fn new(name: impl Into<String>, dimensions: Dimensions) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                name: name.into(),
                dimensions,
                max_tps: AtomicU32::new(DEFAULT_MAX_TPS),
                fps: AtomicU32::new(0),
                tps: AtomicU32::new(0),
                hide_cursor: AtomicBool::new(false),
                quit: AtomicBool::new(false),
                tick_slot: Mutex::new(None),
                render_slot: Mutex::new(None),
                current: RwLock::new(None),
                queued: Mutex::new(None),
                pending_title: Mutex::new(None),
                fps_handler: RwLock::new(None),
                tps_handler: RwLock::new(None),
            }),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let engine = Self::new(config.title.clone(), config.dimensions());
        engine.set_max_tps(config.max_tps);
        engine.set_hide_cursor(config.hide_cursor);
        engine
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn dimensions(&self) -> Dimensions {
        self.shared.dimensions
    }

    /// The drawing area as a rect at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_parts(Vector::ZERO, self.shared.dimensions)
    }

    /// Target tick rate; also the rate velocities are integrated at.
    pub fn max_tps(&self) -> u32 {
        self.shared.max_tps.load(Ordering::Relaxed)
    }

    /// Takes effect from the next tick. Zero is ignored.
    pub fn set_max_tps(&self, tps: u32) {
        if tps == 0 {
            warn!("ignoring max_tps of 0");
            return;
        }
        self.shared.max_tps.store(tps, Ordering::Relaxed);
    }

    /// Frames rendered during the last full second.
    pub fn fps(&self) -> u32 {
        self.shared.fps.load(Ordering::Relaxed)
    }

    /// Ticks completed during the last full second.
    pub fn tps(&self) -> u32 {
        self.shared.tps.load(Ordering::Relaxed)
    }

    pub fn hide_cursor(&self) -> bool {
        self.shared.hide_cursor.load(Ordering::Relaxed)
    }

    /// Applied when [`Engine::run`] starts.
    pub fn set_hide_cursor(&self, hide: bool) {
        self.shared.hide_cursor.store(hide, Ordering::Relaxed);
    }

    pub fn set_fps_handler<F>(&self, handler: F)
    where
        F: Fn(&Engine, u32) + Send + Sync + 'static,
    {
        *self
            .shared
            .fps_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
    }

    pub fn set_tps_handler<F>(&self, handler: F)
    where
        F: Fn(&Engine, u32) + Send + Sync + 'static,
    {
        *self
            .shared
            .tps_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
    }

    /// The active scene, if one has been set.
    pub fn scene(&self) -> Option<Arc<Scene>> {
        self.shared
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make `scene` the active scene.
    ///
    /// Waits for any tick or frame in progress to finish, clears the
    /// outgoing scene's resources, runs the new scene's initializer, and
    /// only then publishes the new scene to [`Engine::scene`] and the loops.
    /// While the initializer runs, [`Engine::scene`] returns `None`. Must not be
    /// called from inside a tick or frame; use [`Engine::queue_scene`] there.
    pub fn set_scene(&self, scene: impl Into<Arc<Scene>>) {
        let scene = scene.into();
        let mut tick = lock(&self.shared.tick_slot);
        let mut render = lock(&self.shared.render_slot);

        if let Some(old) = tick.take() {
            debug!("clearing resources of scene '{}'", old.name());
            old.clear_resources();
        }
        *render = None;

        *self
            .shared
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        scene.initialize(self);
        *self
            .shared
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&scene));

        *lock(&self.shared.pending_title) = Some(format!("{} - {}", self.name(), scene.name()));
        info!("engine '{}' switched to scene '{}'", self.name(), scene.name());

        *tick = Some(Arc::clone(&scene));
        *render = Some(scene);
    }

    /// Swap to `scene` at the start of the next frame. Safe to call from
    /// anywhere, including entity callbacks.
    pub fn queue_scene(&self, scene: impl Into<Arc<Scene>>) {
        *lock(&self.shared.queued) = Some(scene.into());
    }

    /// Ask the host loop to stop after the current frame.
    pub fn quit(&self) {
        self.shared.quit.store(true, Ordering::Relaxed);
    }

    pub fn ptr_eq(&self, other: &Engine) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Run one simulation tick on the active scene.
    ///
    /// The tick thread calls this; it is public so a simulation can also be
    /// stepped by hand, for example in tests.
    pub fn tick(&self) {
        let slot = lock(&self.shared.tick_slot);
        if let Some(scene) = slot.as_ref() {
            scene.perform_fixed_update(self);
        }
    }

    /// Run the engine on `host` until its window closes or [`Engine::quit`]
    /// is called.
    ///
    /// The tick thread is stopped and joined, and the engine removed from
    /// the registry, on every exit path including a panic in the host loop.
    /// A render error ends the loop and is returned.
    pub fn run(&self, host: &mut dyn WindowHost) -> Result<(), EngineError> {
        self.shared.quit.store(false, Ordering::Relaxed);
        registry::register(self);

        host.set_cursor_visible(!self.hide_cursor());
        match self.take_pending_title() {
            Some(title) => host.set_title(&title),
            None => host.set_title(self.name()),
        }

        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        let tick_thread = match tickloop::spawn(self.clone(), stop_rx) {
            Ok(handle) => handle,
            Err(err) => {
                registry::unregister(self);
                return Err(EngineError::Host(format!("failed to start tick thread: {err}")));
            }
        };
        let _running = RunningGuard {
            engine: self,
            stop: stop_tx,
            tick_thread: Some(tick_thread),
        };

        info!(
            "engine '{}' running at {}x{}, {} TPS",
            self.name(),
            self.shared.dimensions.width,
            self.shared.dimensions.height,
            self.max_tps()
        );

        let mut driver = FrameDriver::new(self.clone());
        host.main_loop(&mut driver)
    }

    pub(crate) fn render_frame(&self, surface: &mut dyn Surface) -> Result<(), EngineError> {
        let slot = lock(&self.shared.render_slot);
        if let Some(scene) = slot.as_ref() {
            scene.perform_render(surface, self)?;
            scene.perform_update(self);
        }
        Ok(())
    }

    pub(crate) fn dispatch_input(&self, event: &InputEvent) {
        let slot = lock(&self.shared.render_slot);
        if let Some(scene) = slot.as_ref() {
            scene.notify(event);
        }
    }

    pub(crate) fn apply_queued_scene(&self) {
        let queued = lock(&self.shared.queued).take();
        if let Some(scene) = queued {
            self.set_scene(scene);
        }
    }

    pub(crate) fn take_pending_title(&self) -> Option<String> {
        lock(&self.shared.pending_title).take()
    }

    pub(crate) fn quit_requested(&self) -> bool {
        self.shared.quit.load(Ordering::Relaxed)
    }

    pub(crate) fn report_fps(&self, fps: u32) {
        self.shared.fps.store(fps, Ordering::Relaxed);
        debug!("fps: {fps}");
        let handler = self
            .shared
            .fps_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler.on_fps_updated(self, fps);
        }
    }

    pub(crate) fn report_tps(&self, tps: u32) {
        self.shared.tps.store(tps, Ordering::Relaxed);
        let target = self.max_tps();
        if u64::from(tps) * 10 < u64::from(target) * 9 {
            warn!("tick rate degraded: {tps} of {target} TPS");
        } else {
            debug!("tps: {tps}");
        }
        let handler = self
            .shared
            .tps_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler.on_tps_updated(self, tps);
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.shared.name)
            .field("dimensions", &self.shared.dimensions)
            .field("max_tps", &self.max_tps())
            .finish_non_exhaustive()
    }
}

/// Stops the tick thread and unregisters the engine when `run` exits.
struct RunningGuard<'a> {
    engine: &'a Engine,
    stop: Sender<()>,
    tick_thread: Option<JoinHandle<()>>,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        let _ = self.stop.send(());
        let panicked = self
            .tick_thread
            .take()
            .is_some_and(|handle| handle.join().is_err());
        if panicked {
            error!("tick thread of engine '{}' panicked", self.engine.name());
        }
        registry::unregister(self.engine);
        info!("engine '{}' stopped", self.engine.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_bounds_and_defaults() {
        let engine = Engine::new("pong", Dimensions::new(1200.0, 675.0));
        assert_eq!(engine.bounds(), Rect::new(0.0, 0.0, 1200.0, 675.0));
        assert_eq!(engine.max_tps(), 60);
        assert_eq!((engine.fps(), engine.tps()), (0, 0));
        assert!(engine.scene().is_none());
    }

    #[test]
    fn test_zero_max_tps_ignored() {
        let engine = Engine::new("e", Dimensions::square(10.0));
        engine.set_max_tps(0);
        assert_eq!(engine.max_tps(), 60);
        engine.set_max_tps(120);
        assert_eq!(engine.max_tps(), 120);
    }

    #[test]
    fn test_set_scene_initializes_and_clears_previous() {
        let engine = Engine::new("game", Dimensions::square(10.0));
        let inits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&inits);
        let first = Arc::new(Scene::new("menu").with_initializer(move |engine, scene| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert!(engine.scene().is_none());
            scene.set_resource("ready", true);
        }));
        first.set_resource("score", 1_u32);

        engine.set_scene(Arc::clone(&first));
        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert_eq!(engine.scene().unwrap().resource::<bool>("ready"), Some(true));
        assert_eq!(engine.take_pending_title().as_deref(), Some("game - menu"));
        assert_eq!(first.resource::<u32>("score"), Some(1));

        engine.set_scene(Scene::new("level"));
        assert_eq!(first.try_resource::<u32>("score"), None);
        assert_eq!(engine.scene().unwrap().name(), "level");
    }

    #[test]
    fn test_scene_not_visible_until_initialized() {
        use std::time::Duration;

        let engine = Engine::new("game", Dimensions::square(10.0));
        let done = Arc::new(AtomicBool::new(false));
        let watcher = {
            let engine = engine.clone();
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                let mut unready = 0;
                while !done.load(Ordering::SeqCst) {
                    if let Some(scene) = engine.scene() {
                        if scene.try_resource::<bool>("ready") != Some(true) {
                            unready += 1;
                        }
                    }
                }
                unready
            })
        };

        engine.set_scene(Scene::new("slow").with_initializer(|_, scene| {
            std::thread::sleep(Duration::from_millis(50));
            scene.set_resource("ready", true);
        }));
        std::thread::sleep(Duration::from_millis(10));
        done.store(true, Ordering::SeqCst);

        assert_eq!(watcher.join().unwrap(), 0);
        assert_eq!(engine.scene().unwrap().name(), "slow");
    }

    #[test]
    fn test_queued_scene_applies_on_next_frame() {
        let engine = Engine::new("game", Dimensions::square(10.0));
        engine.set_scene(Scene::new("a"));
        engine.queue_scene(Scene::new("b"));
        assert_eq!(engine.scene().unwrap().name(), "a");
        engine.apply_queued_scene();
        assert_eq!(engine.scene().unwrap().name(), "b");
    }

    #[test]
    fn test_rate_reports_reach_handlers() {
        let engine = Engine::new("e", Dimensions::square(10.0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (fps_seen, tps_seen) = (Arc::clone(&seen), Arc::clone(&seen));
        engine.set_fps_handler(move |_, fps| fps_seen.lock().unwrap().push(("fps", fps)));
        engine.set_tps_handler(move |_, tps| tps_seen.lock().unwrap().push(("tps", tps)));

        engine.report_fps(58);
        engine.report_tps(30);

        assert_eq!(engine.fps(), 58);
        assert_eq!(engine.tps(), 30);
        assert_eq!(*seen.lock().unwrap(), vec![("fps", 58), ("tps", 30)]);
    }
}
