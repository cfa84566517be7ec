//! Process-wide list of running engines.
//!
//! [`Engine::run`](super::Engine::run) adds the engine on entry and removes
//! it on return. The accessors here are a convenience for code that has no
//! engine handle at hand; passing the handle explicitly is preferred.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::scene::Scene;

use super::Engine;

static RUNNING: Mutex<Vec<Engine>> = Mutex::new(Vec::new());

fn running() -> MutexGuard<'static, Vec<Engine>> {
    RUNNING.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn register(engine: &Engine) {
    let mut engines = running();
    if !engines.iter().any(|e| e.ptr_eq(engine)) {
        engines.push(engine.clone());
    }
}

pub(crate) fn unregister(engine: &Engine) {
    running().retain(|e| !e.ptr_eq(engine));
}

/// Every engine currently inside [`Engine::run`].
pub fn active_engines() -> Vec<Engine> {
    running().clone()
}

/// The single running engine, or `None` when none is running.
///
/// # Panics
///
/// When more than one engine is running. Use [`active_engines`] then.
pub fn active_engine() -> Option<Engine> {
    let engines = running();
    match engines.as_slice() {
        [] => None,
        [engine] => Some(engine.clone()),
        _ => panic!(
            "caller contract violation: {} engines are running, use active_engines()",
            engines.len()
        ),
    }
}

/// Active scene of the single running engine.
///
/// # Panics
///
/// When more than one engine is running.
pub fn active_scene() -> Option<Arc<Scene>> {
    active_engine()?.scene()
}

/// Active scenes of every running engine that has one.
pub fn active_scenes() -> Vec<Arc<Scene>> {
    active_engines().iter().filter_map(Engine::scene).collect()
}
