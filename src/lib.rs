//! # unity2three
//!
//! Converts Unity scene files (`.unity`) into the three.js JSON "Object"
//! scene format (version 4.5), loadable with `THREE.ObjectLoader`.
//!
//! The conversion is a strict three-stage pipeline:
//!
//! - [`yaml`] - Reader for the Unity flavor of YAML (multi-document,
//!   tag-and-anchor annotated mappings)
//! - [`scene`] - Scene graph builder (records keyed by integer handle,
//!   hierarchy reconciliation, component linking)
//! - [`three`] - three.js JSON document types and the exporter
//! - [`util`] - Errors, result alias, identifier generation
//!
//! ## Example
//!
//! ```ignore
//! let json = unity2three::convert_file("Assets/Scenes/Main.unity")?;
//! std::fs::write("Build/Main.unity.json", json)?;
//! ```

pub mod util;
pub mod yaml;
pub mod scene;
pub mod three;

use std::path::Path;

pub use util::{Error, Result};
pub use util::ids::{IdProvider, UuidProvider};

/// Convert Unity scene text to pretty-printed three.js JSON.
///
/// Output identifiers are fresh v4 uuids, so repeated conversions of the
/// same text differ in their `uuid` fields and nothing else.
pub fn convert_scene(source: &str) -> Result<String> {
    convert_scene_with_ids(source, &UuidProvider)
}

/// Convert with a caller-supplied identifier provider.
pub fn convert_scene_with_ids(source: &str, ids: &dyn IdProvider) -> Result<String> {
    let documents = yaml::parse_documents(source)?;
    let graph = scene::build_scene(&documents)?;
    let doc = three::export_scene(&graph, ids);
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Read a scene file and convert it.
///
/// A nonexistent path is reported as [`Error::FileNotFound`]; the caller
/// decides where the produced JSON text is persisted.
pub fn convert_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    convert_scene(&source)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::util::ids::{IdProvider, UuidProvider};
    pub use crate::yaml::{parse_documents, Document, Node};
    pub use crate::scene::{build_scene, SceneGraph};
    pub use crate::three::{export_scene, SceneDocument};
    pub use crate::{convert_file, convert_scene, convert_scene_with_ids};
}
