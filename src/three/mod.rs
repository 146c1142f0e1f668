//! three.js JSON document types and the exporter.

pub mod document;
pub mod export;

pub use document::{
    BoxGeometry, Metadata, ObjectKind, PhongMaterial, SceneDocument, SceneObject, SceneRoot,
};
pub use export::export_scene;
