//! Layered entity container.
//!
//! An [`EntityGroup`] stores nodes under `(layer, key)`. Traversal visits
//! layers in ascending order; order inside a layer is unspecified.
//!
//! Traversal copies one layer's handles at a time and releases the lock
//! before visiting them, so a visit may add or remove entries of the same
//! group. Such changes may or may not be seen by the traversal in progress.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use log::trace;
use rustc_hash::FxHashMap;

use crate::backend::surface::Surface;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::geometry::Vector;

use super::capability::{Node, NodeHandle, Render, Update};
use super::entity::Entity;

type Layers = BTreeMap<i32, FxHashMap<String, NodeHandle>>;

#[derive(Default)]
pub struct EntityGroup {
    entity: Mutex<Entity>,
    layers: RwLock<Layers>,
}

impl EntityGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group whose own entity starts as `entity`. Its position offsets every
    /// child while rendering.
    pub fn with_entity(entity: Entity) -> Self {
        Self {
            entity: Mutex::new(entity),
            layers: RwLock::default(),
        }
    }

    /// Copy of the group's own entity.
    pub fn entity(&self) -> Entity {
        *self.lock_entity()
    }

    pub fn with_entity_mut<R>(&self, f: impl FnOnce(&mut Entity) -> R) -> R {
        f(&mut self.lock_entity())
    }

    /// Insert under a freshly generated key and return the key.
    pub fn add(&self, layer: i32, node: impl Into<NodeHandle>) -> String {
        let node = node.into();
        let mut layers = self.write_layers();
        let entries = layers.entry(layer).or_default();
        let mut key = generate_key();
        while entries.contains_key(&key) {
            key = generate_key();
        }
        entries.insert(key.clone(), node);
        trace!("added {key} to layer {layer}");
        key
    }

    /// Insert under `key`, replacing whatever was stored there.
    pub fn add_named(&self, key: impl Into<String>, layer: i32, node: impl Into<NodeHandle>) {
        self.write_layers()
            .entry(layer)
            .or_default()
            .insert(key.into(), node.into());
    }

    pub fn get(&self, layer: i32, key: &str) -> Option<NodeHandle> {
        self.read_layers().get(&layer)?.get(key).cloned()
    }

    /// Remove and return the entry, if present. Empty layers are dropped.
    pub fn remove(&self, layer: i32, key: &str) -> Option<NodeHandle> {
        let mut layers = self.write_layers();
        let entries = layers.get_mut(&layer)?;
        let removed = entries.remove(key);
        if entries.is_empty() {
            layers.remove(&layer);
        }
        removed
    }

    pub fn clear(&self) {
        self.write_layers().clear();
    }

    pub fn len(&self) -> usize {
        self.read_layers().values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Layers that currently hold at least one entity, ascending.
    pub fn layers(&self) -> Vec<i32> {
        self.read_layers().keys().copied().collect()
    }

    /// Visit every entity, layer by layer in ascending order.
    pub fn iterate(&self, mut visit: impl FnMut(&NodeHandle)) {
        let _ = self.try_iterate(|node| {
            visit(node);
            Ok::<(), Infallible>(())
        });
    }

    /// Like [`EntityGroup::iterate`] but stops at the first error.
    pub fn try_iterate<E>(
        &self,
        mut visit: impl FnMut(&NodeHandle) -> Result<(), E>,
    ) -> Result<(), E> {
        for layer in self.layers() {
            let snapshot: Vec<NodeHandle> = match self.read_layers().get(&layer) {
                Some(entries) => entries.values().cloned().collect(),
                None => continue,
            };
            for node in &snapshot {
                visit(node)?;
            }
        }
        Ok(())
    }

    /// Render every visible child that can render, shifted by this group's
    /// position. The shift is undone afterwards, also when a child's render
    /// fails or panics.
    pub fn render(&self, surface: &mut dyn Surface, engine: &Engine) -> Result<(), EngineError> {
        let offset = self.entity().bounds.pos;
        self.try_iterate(|handle| {
            let mut node = handle.lock();
            if !node.entity_mut().visible || node.as_render().is_none() {
                return Ok(());
            }

            let mut shifted = OffsetRestore::apply(&mut *node, offset);
            if let Some(render) = shifted.node.as_render() {
                render.render(surface, engine)?;
            }
            Ok(())
        })
    }

    /// Advance the group's own entity. Children are advanced by the scene.
    pub fn update(&self, engine: &Engine) {
        self.lock_entity().advance(engine.max_tps());
    }

    fn lock_entity(&self) -> std::sync::MutexGuard<'_, Entity> {
        self.entity.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_layers(&self) -> RwLockReadGuard<'_, Layers> {
        self.layers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_layers(&self) -> RwLockWriteGuard<'_, Layers> {
        self.layers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Node for EntityGroup {
    fn entity_mut(&mut self) -> &mut Entity {
        self.entity.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn as_render(&mut self) -> Option<&mut dyn Render> {
        Some(self)
    }

    fn as_update(&mut self) -> Option<&mut dyn Update> {
        Some(self)
    }
}

impl Render for EntityGroup {
    fn render(&mut self, surface: &mut dyn Surface, engine: &Engine) -> Result<(), EngineError> {
        EntityGroup::render(self, surface, engine)
    }
}

impl Update for EntityGroup {
    fn update(&mut self, engine: &Engine) {
        EntityGroup::update(self, engine)
    }
}

/// Shifts a node's bounds by an offset and takes the offset back off on
/// drop. Moves the node makes of itself while shifted (text centring, for
/// one) are kept.
struct OffsetRestore<'a> {
    node: &'a mut (dyn Node + 'static),
    offset: Vector,
}

impl<'a> OffsetRestore<'a> {
    fn apply(node: &'a mut (dyn Node + 'static), offset: Vector) -> Self {
        node.entity_mut().bounds.pos += offset;
        Self { node, offset }
    }
}

impl Drop for OffsetRestore<'_> {
    fn drop(&mut self) {
        let bounds = &mut self.node.entity_mut().bounds;
        bounds.pos = bounds.pos - self.offset;
    }
}

/// `entity_<unix nanos>.<random hex>`
fn generate_key() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("entity_{nanos}.{:x}", fastrand::u64(..))
}
