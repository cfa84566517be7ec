//! Entity capabilities and the shared node handle.
//!
//! Every object stored in a scene implements [`Node`]. What the scene does
//! with it each tick and frame depends on which capabilities it exposes:
//! each `as_*` query returns `Some` when the node implements that
//! capability. Dispatch never inspects fields; it only asks these queries.
//!
//! ```ignore
//! struct Ball { entity: Entity }
//!
//! impl FixedUpdate for Ball {
//!     fn fixed_update(&mut self, engine: &Engine) {
//!         self.entity.advance(engine.max_tps());
//!     }
//! }
//!
//! impl Node for Ball {
//!     fn entity_mut(&mut self) -> &mut Entity { &mut self.entity }
//!     fn as_fixed_update(&mut self) -> Option<&mut dyn FixedUpdate> { Some(self) }
//! }
//! ```

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::backend::surface::Surface;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::events::input::{KeyEvent, MouseButton};
use crate::geometry::{ConstrainedSides, Rect, RectSide, Vector};

use super::entity::Entity;

/// Draws itself once per frame.
pub trait Render {
    fn render(&mut self, surface: &mut dyn Surface, engine: &Engine) -> Result<(), EngineError>;
}

/// Runs once per rendered frame.
pub trait Update {
    fn update(&mut self, engine: &Engine);
}

/// Runs once per simulation tick.
pub trait FixedUpdate {
    fn fixed_update(&mut self, engine: &Engine);
}

/// Clamps itself against some bound each tick, reporting the sides clamped.
pub trait Constrain {
    fn constrain(&mut self, engine: &Engine) -> ConstrainedSides;
}

/// Told about every side [`Constrain::constrain`] had to clamp.
pub trait ConstrainedHandler {
    fn on_constrained(&mut self, side: RectSide);
}

/// Has a rect other entities can collide with.
pub trait Collider {
    fn collider(&self) -> Rect;
}

/// Told when its collider overlaps another node's collider.
pub trait CollisionHandler {
    fn collided_with(&mut self, other: &mut dyn Node);
}

pub trait KeyInput {
    fn key_down(&mut self, _key: &KeyEvent) {}
    fn key_up(&mut self, _key: &KeyEvent) {}
    fn key_char(&mut self, _ch: char) {}
}

/// Mouse notifications. Every implementor receives every event, whether or
/// not the cursor is over it.
pub trait MouseInput {
    fn mouse_down(&mut self, _button: MouseButton, _pos: Vector) {}
    fn mouse_up(&mut self, _button: MouseButton, _pos: Vector) {}
    fn mouse_move(&mut self, _pos: Vector) {}
}

/// Upcast to [`Any`] for downcasting trait objects to their concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An object that can live in an [`EntityGroup`](super::group::EntityGroup).
pub trait Node: AsAny + Send {
    fn entity_mut(&mut self) -> &mut Entity;

    fn as_render(&mut self) -> Option<&mut dyn Render> {
        None
    }

    fn as_update(&mut self) -> Option<&mut dyn Update> {
        None
    }

    fn as_fixed_update(&mut self) -> Option<&mut dyn FixedUpdate> {
        None
    }

    fn as_constrain(&mut self) -> Option<&mut dyn Constrain> {
        None
    }

    fn as_constrained_handler(&mut self) -> Option<&mut dyn ConstrainedHandler> {
        None
    }

    fn as_collider(&self) -> Option<&dyn Collider> {
        None
    }

    fn as_collision_handler(&mut self) -> Option<&mut dyn CollisionHandler> {
        None
    }

    fn as_key_input(&mut self) -> Option<&mut dyn KeyInput> {
        None
    }

    fn as_mouse_input(&mut self) -> Option<&mut dyn MouseInput> {
        None
    }
}

impl dyn Node + '_ {
    pub fn downcast_ref<T: Node + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Node + 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Shared, lockable reference to a node.
///
/// Groups store these; callers may keep clones (or the typed `Arc` passed to
/// [`NodeHandle::from_shared`]) to reach the node after adding it.
#[derive(Clone)]
pub struct NodeHandle(Arc<Mutex<dyn Node>>);

impl NodeHandle {
    pub fn new<T: Node + 'static>(node: T) -> Self {
        Self(Arc::new(Mutex::new(node)))
    }

    /// Wrap a node the caller keeps a typed handle to.
    pub fn from_shared<T: Node + 'static>(node: Arc<Mutex<T>>) -> Self {
        Self(node)
    }

    /// Lock the node. A poisoned lock is recovered, since a panic inside a
    /// callback leaves the node's data structurally intact.
    pub fn lock(&self) -> MutexGuard<'_, dyn Node + 'static> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ptr_eq(&self, other: &NodeHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    /// Run `f` on the node if it is a `T`.
    pub fn with<T: Node + 'static, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.lock();
        guard.downcast_mut::<T>().map(f)
    }

    /// Copy of the node's base entity.
    pub fn entity(&self) -> Entity {
        *self.lock().entity_mut()
    }
}

impl<T: Node + 'static> From<T> for NodeHandle {
    fn from(node: T) -> Self {
        NodeHandle::new(node)
    }
}

impl std::fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NodeHandle")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}
