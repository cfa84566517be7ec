//! Entities and the capability model.
//!
//! Submodules:
//! - [`entity`] – base state (bounds, visibility, velocity)
//! - [`capability`] – the [`Node`] trait, capability traits and [`NodeHandle`]
//! - [`group`] – [`EntityGroup`], the layered container scenes are built on
//! - [`image`], [`text`], [`line`] – drawable entity types

pub mod capability;
pub mod entity;
pub mod group;
pub mod image;
pub mod line;
pub mod text;

pub use capability::{
    AsAny, Collider, CollisionHandler, Constrain, ConstrainedHandler, FixedUpdate, KeyInput,
    MouseInput, Node, NodeHandle, Render, Update,
};
pub use entity::Entity;
pub use group::EntityGroup;
pub use image::ImageEntity;
pub use line::LineEntity;
pub use text::{TextCentering, TextEntity, TextStyle};
