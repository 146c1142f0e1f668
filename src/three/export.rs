//! Exporter: scene graph in, three.js document out.

use glam::{EulerRot, Mat4, Quat, Vec3};
use log::info;

use crate::scene::{GameObject, SceneGraph, Transform};
use crate::util::ids::IdProvider;

use super::document::{
    BoxGeometry, Metadata, ObjectKind, PhongMaterial, SceneDocument, SceneObject, SceneRoot,
};

/// Project a scene graph into a three.js document.
///
/// Entities are emitted in document order. The resource table is fixed:
/// one unit box and one phong material, referenced from every node.
/// Deterministic except for the identifiers drawn from `ids`.
pub fn export_scene(graph: &SceneGraph, ids: &dyn IdProvider) -> SceneDocument {
    let geometry = BoxGeometry::unit(ids.fresh());
    let material = PhongMaterial::standard(ids.fresh());

    let mut children = Vec::with_capacity(graph.game_objects.len());
    for go in graph.game_objects.values() {
        children.push(project_object(go, &geometry.uuid, &material.uuid, ids));
    }

    info!("exported {} scene objects", children.len());

    SceneDocument {
        metadata: Metadata::object(),
        geometries: vec![geometry],
        materials: vec![material],
        object: SceneRoot {
            uuid: ids.fresh(),
            kind: "Scene",
            children,
        },
    }
}

/// Projection rule for one entity.
///
/// Type priority is camera, then light, then mesh. One child entry is
/// synthesized per handle in the transform's child list; each reuses the
/// parent's own matrix and none is expanded further, so the tree is one
/// synthetic level deep regardless of the source hierarchy.
fn project_object(
    go: &GameObject,
    geometry: &str,
    material: &str,
    ids: &dyn IdProvider,
) -> SceneObject {
    let kind = if go.camera.is_some() {
        ObjectKind::PerspectiveCamera
    } else if go.light.is_some() {
        ObjectKind::DirectionalLight
    } else {
        ObjectKind::Mesh
    };
    let matrix = go.transform.as_ref().map(local_matrix);
    let lit = go.light.is_some();

    let children = match &go.transform {
        Some(tf) => tf
            .children
            .iter()
            .map(|_| SceneObject {
                uuid: ids.fresh(),
                kind: ObjectKind::Mesh,
                matrix,
                fov: 0.0,
                geometry: geometry.to_string(),
                material: material.to_string(),
                cast_shadow: false,
                receive_shadow: false,
                children: Vec::new(),
            })
            .collect(),
        None => Vec::new(),
    };

    SceneObject {
        uuid: ids.fresh(),
        kind,
        matrix,
        fov: go.camera.map(|c| c.field_of_view).unwrap_or(0.0),
        geometry: geometry.to_string(),
        material: material.to_string(),
        cast_shadow: lit,
        receive_shadow: lit,
        children,
    }
}

/// Local TRS matrix in the target's column-major 16-float layout.
///
/// Stored rotations are radians while the Euler composition consumes
/// degrees, so each component is converted first (Y-X-Z application
/// order). Element 14 (row 2, column 3) changes sign to bridge the two
/// handedness conventions; a zero must stay +0 so it serializes as `0`.
pub fn local_matrix(tf: &Transform) -> [f32; 16] {
    let degrees = Vec3::new(
        tf.rotation.x.to_degrees(),
        tf.rotation.y.to_degrees(),
        tf.rotation.z.to_degrees(),
    );
    let rotation = Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    );
    let mut m = Mat4::from_scale_rotation_translation(tf.scale, rotation, tf.position)
        .to_cols_array();
    if m[14] != 0.0 {
        m[14] = -m[14];
    }
    m
}
