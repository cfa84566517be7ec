//! Scene-level hooks.
//!
//! Each hook is a trait with a blanket impl for closures of the matching
//! shape, so `Scene::with_updater(|engine, scene| ...)` works as well as a
//! struct implementing [`SceneUpdater`].

use crate::backend::surface::Surface;
use crate::engine::Engine;

use super::Scene;

/// Runs each time the scene becomes the engine's active scene.
pub trait SceneInitializer: Send + Sync {
    fn initialize(&self, engine: &Engine, scene: &Scene);
}

/// Draws before the scene's entities.
pub trait ScenePreRenderer: Send + Sync {
    fn pre_render(&self, surface: &mut dyn Surface, engine: &Engine, scene: &Scene);
}

/// Draws after the scene's entities, below the stats overlay.
pub trait SceneRenderer: Send + Sync {
    fn render(&self, surface: &mut dyn Surface, engine: &Engine, scene: &Scene);
}

/// Runs at the end of every simulation tick.
pub trait SceneUpdater: Send + Sync {
    fn update(&self, engine: &Engine, scene: &Scene);
}

impl<F> SceneInitializer for F
where
    F: Fn(&Engine, &Scene) + Send + Sync,
{
    fn initialize(&self, engine: &Engine, scene: &Scene) {
        self(engine, scene)
    }
}

impl<F> ScenePreRenderer for F
where
    F: Fn(&mut dyn Surface, &Engine, &Scene) + Send + Sync,
{
    fn pre_render(&self, surface: &mut dyn Surface, engine: &Engine, scene: &Scene) {
        self(surface, engine, scene)
    }
}

impl<F> SceneRenderer for F
where
    F: Fn(&mut dyn Surface, &Engine, &Scene) + Send + Sync,
{
    fn render(&self, surface: &mut dyn Surface, engine: &Engine, scene: &Scene) {
        self(surface, engine, scene)
    }
}

impl<F> SceneUpdater for F
where
    F: Fn(&Engine, &Scene) + Send + Sync,
{
    fn update(&self, engine: &Engine, scene: &Scene) {
        self(engine, scene)
    }
}
