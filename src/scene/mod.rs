//! Scenes: one level or screen of a game.
//!
//! A [`Scene`] owns an [`EntityGroup`], a resource map and named timers,
//! and drives its entities through the per-tick and per-frame passes:
//!
//! - tick ([`Scene::perform_fixed_update`]): timers, constraints, fixed
//!   updates, collisions, then the updater hook
//! - frame ([`Scene::perform_update`] and [`Scene::perform_render`]):
//!   per-frame updates, then the pre-render hook, entities, render hook and
//!   stats overlay
//!
//! Scenes are shared between the tick thread and the render thread as
//! `Arc<Scene>`, so every method takes `&self`.
//!
//! Submodules:
//! - [`hooks`] – scene hook traits
//! - [`resources`] – [`ResourceMap`]
//! - [`timer`] – [`Timer`]

pub mod hooks;
pub mod resources;
pub mod timer;

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::backend::surface::{Color, FontSpec, Surface};
use crate::engine::Engine;
use crate::entities::{EntityGroup, Render, TextEntity};
use crate::error::EngineError;
use crate::events::input::{InputEvent, KeyEvent, MouseButton};
use crate::geometry::Vector;

pub use hooks::{SceneInitializer, ScenePreRenderer, SceneRenderer, SceneUpdater};
pub use resources::ResourceMap;
pub use timer::{Timer, TimerTrigger};

pub struct Scene {
    name: String,
    entities: EntityGroup,
    resources: Mutex<ResourceMap>,
    timers: Mutex<FxHashMap<String, Timer>>,
    stats: Mutex<Option<TextEntity>>,

    initializer: Option<Box<dyn SceneInitializer>>,
    pre_renderer: Option<Box<dyn ScenePreRenderer>>,
    renderer: Option<Box<dyn SceneRenderer>>,
    updater: Option<Box<dyn SceneUpdater>>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: EntityGroup::new(),
            resources: Mutex::default(),
            timers: Mutex::default(),
            stats: Mutex::new(None),
            initializer: None,
            pre_renderer: None,
            renderer: None,
            updater: None,
        }
    }

    pub fn with_initializer<F>(self, f: F) -> Self
    where
        F: Fn(&Engine, &Scene) + Send + Sync + 'static,
    {
        self.with_initializer_hook(f)
    }

    pub fn with_initializer_hook(mut self, hook: impl SceneInitializer + 'static) -> Self {
        self.initializer = Some(Box::new(hook));
        self
    }

    pub fn with_pre_renderer<F>(self, f: F) -> Self
    where
        F: Fn(&mut dyn Surface, &Engine, &Scene) + Send + Sync + 'static,
    {
        self.with_pre_renderer_hook(f)
    }

    pub fn with_pre_renderer_hook(mut self, hook: impl ScenePreRenderer + 'static) -> Self {
        self.pre_renderer = Some(Box::new(hook));
        self
    }

    pub fn with_renderer<F>(self, f: F) -> Self
    where
        F: Fn(&mut dyn Surface, &Engine, &Scene) + Send + Sync + 'static,
    {
        self.with_renderer_hook(f)
    }

    pub fn with_renderer_hook(mut self, hook: impl SceneRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(hook));
        self
    }

    pub fn with_updater<F>(self, f: F) -> Self
    where
        F: Fn(&Engine, &Scene) + Send + Sync + 'static,
    {
        self.with_updater_hook(f)
    }

    pub fn with_updater_hook(mut self, hook: impl SceneUpdater + 'static) -> Self {
        self.updater = Some(Box::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entities(&self) -> &EntityGroup {
        &self.entities
    }

    // Resources

    pub fn set_resource<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.lock_resources().set(key, value);
    }

    /// Clone out the resource under `key`.
    ///
    /// # Panics
    ///
    /// When the stored value is not a `T` (caller contract violation).
    pub fn resource<T: Any + Clone>(&self, key: &str) -> Option<T> {
        let value = self.lock_resources().get::<T>(key);
        if value.is_none() {
            warn!("scene '{}': resource '{key}' is not set", self.name);
        }
        value
    }

    /// Like [`Scene::resource`] but returns `None` on a type mismatch.
    pub fn try_resource<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.lock_resources().try_get::<T>(key).cloned()
    }

    /// Run `f` on the resource under `key` if it exists and is a `T`.
    pub fn with_resource_mut<T: Any, R>(&self, key: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.lock_resources().get_mut::<T>(key).map(f)
    }

    pub fn remove_resource(&self, key: &str) -> bool {
        self.lock_resources().remove(key)
    }

    pub fn clear_resources(&self) {
        self.lock_resources().clear();
    }

    // Timers

    /// Add or replace the timer called `name`.
    pub fn add_timer(&self, name: impl Into<String>, timer: Timer) {
        self.lock_timers().insert(name.into(), timer);
    }

    pub fn remove_timer(&self, name: &str) -> bool {
        self.lock_timers().remove(name).is_some()
    }

    pub fn has_timer(&self, name: &str) -> bool {
        self.lock_timers().contains_key(name)
    }

    // Stats overlay

    /// Draw an "FPS: n, TPS: n" line on top of everything else.
    pub fn render_stats(&self, font: impl Into<String>, size: f64, color: Color) {
        let text = TextEntity::new("FPS: 0, TPS: 0", FontSpec::new(font, size), color);
        *self.lock_stats() = Some(text);
    }

    pub fn stop_rendering_stats(&self) {
        *self.lock_stats() = None;
    }

    pub fn is_rendering_stats(&self) -> bool {
        self.lock_stats().is_some()
    }

    /// Current stats line, if the overlay is on.
    pub fn stats_text(&self) -> Option<String> {
        self.lock_stats().as_ref().map(|t| t.text().to_string())
    }

    // Passes

    pub(crate) fn initialize(&self, engine: &Engine) {
        if let Some(init) = &self.initializer {
            debug!("initializing scene '{}'", self.name);
            init.initialize(engine, self);
        }
    }

    /// One simulation tick.
    pub fn perform_fixed_update(&self, engine: &Engine) {
        self.notify_timers(engine);

        self.entities.iterate(|handle| {
            let mut node = handle.lock();
            let Some(constrain) = node.as_constrain() else {
                return;
            };
            let sides = constrain.constrain(engine);
            if let Some(handler) = node.as_constrained_handler() {
                for side in sides {
                    handler.on_constrained(side);
                }
            }
        });

        self.entities.iterate(|handle| {
            if let Some(update) = handle.lock().as_fixed_update() {
                update.fixed_update(engine);
            }
        });

        self.detect_collisions();

        if let Some(updater) = &self.updater {
            updater.update(engine, self);
        }
    }

    /// Per-frame bookkeeping, run after each render.
    pub fn perform_update(&self, engine: &Engine) {
        self.entities.update(engine);

        self.entities.iterate(|handle| {
            if let Some(update) = handle.lock().as_update() {
                update.update(engine);
            }
        });

        if let Some(stats) = self.lock_stats().as_mut() {
            stats.set_text(format!("FPS: {}, TPS: {}", engine.fps(), engine.tps()));
        }
    }

    pub fn perform_render(&self, surface: &mut dyn Surface, engine: &Engine) -> Result<(), EngineError> {
        if let Some(pre) = &self.pre_renderer {
            pre.pre_render(surface, engine, self);
        }

        self.entities.render(surface, engine)?;

        if let Some(renderer) = &self.renderer {
            renderer.render(surface, engine, self);
        }

        if let Some(stats) = self.lock_stats().as_mut() {
            stats.render(surface, engine)?;
        }
        Ok(())
    }

    fn notify_timers(&self, engine: &Engine) {
        let tps = engine.tps();
        let fired: Vec<Arc<dyn TimerTrigger>> = self
            .lock_timers()
            .values_mut()
            .filter_map(|timer| timer.tick(tps))
            .collect();
        // Triggers run unlocked so they may add or remove timers.
        for trigger in fired {
            trigger.on_triggered(engine, self);
        }
    }

    /// Every node that handles collisions and has a collider is checked
    /// against every other node with a collider. O(n²) per tick.
    fn detect_collisions(&self) {
        self.entities.iterate(|a| {
            {
                let mut node = a.lock();
                if node.as_collider().is_none() || node.as_collision_handler().is_none() {
                    return;
                }
            }

            self.entities.iterate(|b| {
                if a.ptr_eq(b) {
                    return;
                }
                let mut other = b.lock();
                let Some(other_rect) = other.as_collider().map(|c| c.collider()) else {
                    return;
                };

                let mut node = a.lock();
                let Some(rect) = node.as_collider().map(|c| c.collider()) else {
                    return;
                };
                if !rect.intersects_with(&other_rect) {
                    return;
                }
                if let Some(handler) = node.as_collision_handler() {
                    handler.collided_with(&mut *other);
                }
            });
        });
    }

    // Input

    /// Route a host input event to the matching `notify_*` method.
    pub fn notify(&self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.notify_key_down(key),
            InputEvent::KeyUp(key) => self.notify_key_up(key),
            InputEvent::KeyChar(ch) => self.notify_key_char(*ch),
            InputEvent::MouseDown { button, pos } => self.notify_mouse_down(*button, *pos),
            InputEvent::MouseUp { button, pos } => self.notify_mouse_up(*button, *pos),
            InputEvent::MouseMove { pos } => self.notify_mouse_move(*pos),
        }
    }

    pub fn notify_key_down(&self, key: &KeyEvent) {
        self.entities.iterate(|handle| {
            if let Some(input) = handle.lock().as_key_input() {
                input.key_down(key);
            }
        });
    }

    pub fn notify_key_up(&self, key: &KeyEvent) {
        self.entities.iterate(|handle| {
            if let Some(input) = handle.lock().as_key_input() {
                input.key_up(key);
            }
        });
    }

    pub fn notify_key_char(&self, ch: char) {
        self.entities.iterate(|handle| {
            if let Some(input) = handle.lock().as_key_input() {
                input.key_char(ch);
            }
        });
    }

    pub fn notify_mouse_down(&self, button: MouseButton, pos: Vector) {
        self.entities.iterate(|handle| {
            if let Some(input) = handle.lock().as_mouse_input() {
                input.mouse_down(button, pos);
            }
        });
    }

    pub fn notify_mouse_up(&self, button: MouseButton, pos: Vector) {
        self.entities.iterate(|handle| {
            if let Some(input) = handle.lock().as_mouse_input() {
                input.mouse_up(button, pos);
            }
        });
    }

    pub fn notify_mouse_move(&self, pos: Vector) {
        self.entities.iterate(|handle| {
            if let Some(input) = handle.lock().as_mouse_input() {
                input.mouse_move(pos);
            }
        });
    }

    fn lock_resources(&self) -> MutexGuard<'_, ResourceMap> {
        self.resources.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_timers(&self) -> MutexGuard<'_, FxHashMap<String, Timer>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_stats(&self) -> MutexGuard<'_, Option<TextEntity>> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .finish_non_exhaustive()
    }
}
