//! layered2d: a small real-time 2D engine.
//!
//! A fixed-rate simulation thread and a render loop share one active
//! [`Scene`](scene::Scene). Scenes keep their objects in layered
//! [`EntityGroup`](entities::EntityGroup)s and drive them through opt-in
//! capabilities (render, update, fixed update, constrain, collide, input).
//!
//! Modules:
//! - [`backend`] – drawing surface and window host abstractions
//! - [`config`] – INI-backed engine configuration
//! - [`engine`] – tick thread, render loop driver and running-engine registry
//! - [`entities`] – entity state, capabilities, groups and stock entities
//! - [`error`] – the crate error type
//! - [`events`] – input events
//! - [`geometry`] – vectors, rects, dimensions and velocities
//! - [`scene`] – scenes, timers, hooks and resources

pub mod backend;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod events;
pub mod geometry;
pub mod scene;

pub use engine::Engine;
pub use error::EngineError;
pub use scene::Scene;
