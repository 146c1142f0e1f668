//! three.js "Object" JSON document types (format 4.5).
//!
//! The shape matches what `THREE.ObjectLoader` parses: a metadata block,
//! shared geometry/material tables referenced by uuid, and a `Scene`
//! object tree.

use serde::Serialize;

/// Document format version understood by `THREE.ObjectLoader`.
pub const FORMAT_VERSION: f64 = 4.5;

/// Generator name stamped into the metadata block.
pub const GENERATOR: &str = "SceneExporter";

#[derive(Clone, Debug, Serialize)]
pub struct Metadata {
    pub version: f64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub generator: &'static str,
}

impl Metadata {
    /// Metadata block of an "Object" document.
    pub fn object() -> Self {
        Self {
            version: FORMAT_VERSION,
            kind: "Object",
            generator: GENERATOR,
        }
    }
}

/// The unit box shared by every exported node.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxGeometry {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub width_segments: u32,
    pub height_segments: u32,
    pub depth_segments: u32,
}

impl BoxGeometry {
    pub fn unit(uuid: String) -> Self {
        Self {
            uuid,
            kind: "BoxGeometry",
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            width_segments: 1,
            height_segments: 1,
            depth_segments: 1,
        }
    }
}

/// The white phong material shared by every exported node.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhongMaterial {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub color: u32,
    pub reflectivity: f64,
    pub refraction_ratio: f64,
    pub flat_shading: bool,
    pub vertex_colors: bool,
    pub shininess: f64,
}

impl PhongMaterial {
    pub fn standard(uuid: String) -> Self {
        Self {
            uuid,
            kind: "MeshPhongMaterial",
            color: 0xFFFFFF,
            reflectivity: 1.0,
            refraction_ratio: 0.98,
            flat_shading: false,
            vertex_colors: false,
            shininess: 30.0,
        }
    }
}

/// Output node type, chosen by component priority: camera over light
/// over plain mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    Mesh,
    PerspectiveCamera,
    DirectionalLight,
}

/// One node of the exported scene tree.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Local matrix, column-major; present only when the source entity
    /// has a transform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f32; 16]>,
    pub fov: f32,
    pub geometry: String,
    pub material: String,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub children: Vec<SceneObject>,
}

/// Root object of the exported document.
#[derive(Clone, Debug, Serialize)]
pub struct SceneRoot {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub children: Vec<SceneObject>,
}

/// Complete exported document.
#[derive(Clone, Debug, Serialize)]
pub struct SceneDocument {
    pub metadata: Metadata,
    pub geometries: Vec<BoxGeometry>,
    pub materials: Vec<PhongMaterial>,
    pub object: SceneRoot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_key_names() {
        let geometry = BoxGeometry::unit("g".to_string());
        let json = serde_json::to_string(&geometry).unwrap();
        assert!(json.contains("\"type\":\"BoxGeometry\""));
        assert!(json.contains("\"widthSegments\":1"));

        let material = PhongMaterial::standard("m".to_string());
        let json = serde_json::to_string(&material).unwrap();
        assert!(json.contains("\"refractionRatio\":0.98"));
        assert!(json.contains("\"flatShading\":false"));
        assert!(json.contains("\"color\":16777215"));
    }

    #[test]
    fn test_matrix_omitted_when_absent() {
        let node = SceneObject {
            uuid: "u".to_string(),
            kind: ObjectKind::Mesh,
            matrix: None,
            fov: 0.0,
            geometry: "g".to_string(),
            material: "m".to_string(),
            cast_shadow: false,
            receive_shadow: false,
            children: Vec::new(),
        };
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("matrix"));
        assert!(json.contains("\"castShadow\":false"));
        assert!(json.contains("\"type\":\"Mesh\""));
    }
}
