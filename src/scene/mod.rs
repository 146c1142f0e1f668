//! Scene graph: record types, the builder, and its reconciliation passes.

pub mod builder;
pub mod records;

pub use builder::build_scene;
pub use records::{Camera, ClassId, GameObject, Light, SceneGraph, Transform};
