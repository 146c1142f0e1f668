//! Scene graph construction from decoded documents.

use glam::Vec3;
use log::debug;

use crate::util::Result;
use crate::yaml::{Document, Node};

use super::records::{Camera, ClassId, GameObject, Light, SceneGraph, Transform};

/// Build one scene graph from a decoded document set.
///
/// Documents with a recognized class id are decoded into records keyed by
/// anchor, then two post-passes run: hierarchy reconciliation and
/// component linking. Re-running on the same document set yields an
/// identical graph. The first field-level decode failure aborts the whole
/// build; no partial graph is returned.
pub fn build_scene(documents: &[Document]) -> Result<SceneGraph> {
    let mut graph = SceneGraph::default();

    for doc in documents {
        let Some(class) = ClassId::from_code(doc.class_id) else {
            continue;
        };
        let Some(entries) = doc.root.as_mapping() else {
            continue;
        };
        for (_, body) in entries {
            match class {
                ClassId::GameObject => register_game_object(&mut graph, doc.anchor, body)?,
                ClassId::Transform => register_transform(&mut graph, doc.anchor, body)?,
                ClassId::Camera => register_camera(&mut graph, doc.anchor, body)?,
                ClassId::Light => register_light(&mut graph, doc.anchor, body)?,
                // Renderer components carry no data this converter models.
                ClassId::MeshRenderer | ClassId::MeshFilter => {}
            }
        }
    }

    reconcile_hierarchy(&mut graph);
    link_components(&mut graph);

    debug!(
        "scene graph: {} objects, {} transforms, {} cameras, {} lights",
        graph.game_objects.len(),
        graph.transforms.len(),
        graph.cameras.len(),
        graph.lights.len()
    );

    Ok(graph)
}

fn register_game_object(graph: &mut SceneGraph, anchor: i64, body: &Node) -> Result<()> {
    let name = body
        .expect("m_Name", anchor)?
        .as_scalar()
        .unwrap_or_default()
        .to_string();
    graph.game_objects.insert(anchor, GameObject::new(anchor, name));
    Ok(())
}

fn register_transform(graph: &mut SceneGraph, anchor: i64, body: &Node) -> Result<()> {
    let position = decode_vec3(body, "m_LocalPosition", anchor)?;
    let rotation = decode_vec3(body, "m_LocalRotation", anchor)?;
    let scale = decode_vec3(body, "m_LocalScale", anchor)?;
    let game_object = decode_reference(body, "m_GameObject", anchor)?;

    // fileID 0 is the format's null reference; an empty reference mapping
    // means the same thing.
    let parent = match body.expect("m_Father", anchor)?.get("fileID") {
        None => None,
        Some(node) => match node.scalar_i64("m_Father.fileID", anchor)? {
            0 => None,
            handle => Some(handle),
        },
    };

    let children = decode_child_list(body, anchor)?;

    graph.transforms.insert(
        anchor,
        Transform { position, rotation, scale, game_object, parent, children },
    );
    Ok(())
}

fn register_camera(graph: &mut SceneGraph, anchor: i64, body: &Node) -> Result<()> {
    let field_of_view = body
        .expect("field of view", anchor)?
        .scalar_f32("field of view", anchor)?;
    let game_object = decode_reference(body, "m_GameObject", anchor)?;
    graph.cameras.insert(anchor, Camera { field_of_view, game_object });
    Ok(())
}

fn register_light(graph: &mut SceneGraph, anchor: i64, body: &Node) -> Result<()> {
    let game_object = decode_reference(body, "m_GameObject", anchor)?;
    graph.lights.insert(anchor, Light { game_object });
    Ok(())
}

/// Decode an `{x, y, z}` float triple under `key`.
fn decode_vec3(body: &Node, key: &str, anchor: i64) -> Result<Vec3> {
    let node = body.expect(key, anchor)?;
    let mut out = [0.0f32; 3];
    for (slot, axis) in out.iter_mut().zip(["x", "y", "z"]) {
        let field = format!("{key}.{axis}");
        *slot = node.expect(axis, anchor)?.scalar_f32(&field, anchor)?;
    }
    Ok(Vec3::from_array(out))
}

/// Decode a required `{fileID: n}` reference under `key`.
fn decode_reference(body: &Node, key: &str, anchor: i64) -> Result<i64> {
    let field = format!("{key}.fileID");
    body.expect(key, anchor)?
        .expect("fileID", anchor)?
        .scalar_i64(&field, anchor)
}

/// Decode the declared child list. The key may be absent, the list may be
/// an empty flow sequence, items without a fileID are skipped, and a
/// fileID of 0 is the null reference.
fn decode_child_list(body: &Node, anchor: i64) -> Result<Vec<i64>> {
    let mut children = Vec::new();
    if let Some(items) = body.get("m_Children").and_then(Node::as_sequence) {
        for item in items {
            let Some(node) = item.get("fileID") else {
                continue;
            };
            let handle = node.scalar_i64("m_Children.fileID", anchor)?;
            if handle != 0 {
                children.push(handle);
            }
        }
    }
    Ok(children)
}

/// Merge the declared child lists with the reverse parent relation.
///
/// A transform naming parent P contributes its owning handle to P's child
/// list unless already present. Declared lists may be stale or partial in
/// real documents; after this pass every parent edge has a matching child
/// entry regardless of which direction the source declared.
fn reconcile_hierarchy(graph: &mut SceneGraph) {
    let edges: Vec<(i64, i64)> = graph
        .transforms
        .values()
        .filter_map(|tf| tf.parent.map(|parent| (parent, tf.game_object)))
        .collect();
    for (parent, owner) in edges {
        if let Some(parent_tf) = graph.transforms.get_mut(&parent) {
            if !parent_tf.children.contains(&owner) {
                parent_tf.children.push(owner);
            }
        }
    }
}

/// Attach camera/light/transform records to their owning objects.
///
/// A record whose owner is not in the entity arena is dropped silently;
/// exported subsets routinely reference objects outside the set.
fn link_components(graph: &mut SceneGraph) {
    let cameras: Vec<Camera> = graph.cameras.values().copied().collect();
    for camera in cameras {
        if let Some(go) = graph.game_objects.get_mut(&camera.game_object) {
            go.camera = Some(camera);
        }
    }

    let lights: Vec<Light> = graph.lights.values().copied().collect();
    for light in lights {
        if let Some(go) = graph.game_objects.get_mut(&light.game_object) {
            go.light = Some(light);
        }
    }

    let transforms: Vec<Transform> = graph.transforms.values().cloned().collect();
    for transform in transforms {
        if let Some(go) = graph.game_objects.get_mut(&transform.game_object) {
            go.transform = Some(transform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Error;
    use crate::yaml::parse_documents;

    const PROLOGUE: &str = "%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n";

    fn build(body: &str) -> Result<SceneGraph> {
        let source = format!("{PROLOGUE}{body}");
        build_scene(&parse_documents(&source)?)
    }

    fn transform_doc(anchor: i64, owner: i64, father: i64, children: &[i64]) -> String {
        let mut doc = format!(
            "--- !u!4 &{anchor}\nTransform:\n  m_GameObject: {{fileID: {owner}}}\n  \
             m_LocalRotation: {{x: 0, y: 0, z: 0, w: 1}}\n  \
             m_LocalPosition: {{x: 0, y: 0, z: 0}}\n  m_LocalScale: {{x: 1, y: 1, z: 1}}\n"
        );
        if children.is_empty() {
            doc.push_str("  m_Children: []\n");
        } else {
            doc.push_str("  m_Children:\n");
            for child in children {
                doc.push_str(&format!("  - {{fileID: {child}}}\n"));
            }
        }
        doc.push_str(&format!("  m_Father: {{fileID: {father}}}\n"));
        doc
    }

    #[test]
    fn test_register_game_object() {
        let graph = build("--- !u!1 &100\nGameObject:\n  m_Name: Main Camera\n").unwrap();
        let go = &graph.game_objects[&100];
        assert_eq!(go.handle, 100);
        assert_eq!(go.name, "Main Camera");
        assert!(go.transform.is_none() && go.camera.is_none() && go.light.is_none());
    }

    #[test]
    fn test_game_object_without_name_fails() {
        let err = build("--- !u!1 &100\nGameObject:\n  m_Layer: 0\n").unwrap_err();
        match err {
            Error::MissingField { field, handle } => {
                assert_eq!(field, "m_Name");
                assert_eq!(handle, 100);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_transform_decode() {
        let source = "--- !u!4 &400\nTransform:\n  m_GameObject: {fileID: 100}\n  \
                      m_LocalRotation: {x: 0.1, y: 0.2, z: 0.3, w: 0.9}\n  \
                      m_LocalPosition: {x: 1, y: 2, z: -10}\n  \
                      m_LocalScale: {x: 1, y: 1, z: 1}\n  \
                      m_Children:\n  - {fileID: 401}\n  - {fileID: 0}\n  \
                      m_Father: {fileID: 0}\n";
        let graph = build(source).unwrap();
        let tf = &graph.transforms[&400];
        assert_eq!(tf.position, Vec3::new(1.0, 2.0, -10.0));
        assert_eq!(tf.rotation, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(tf.game_object, 100);
        assert_eq!(tf.parent, None);
        // The literal-zero null reference is skipped.
        assert_eq!(tf.children, [401]);
    }

    #[test]
    fn test_camera_and_light_decode() {
        let source = "--- !u!20 &200\nCamera:\n  m_GameObject: {fileID: 100}\n  field of view: 60\n\
                      --- !u!108 &300\nLight:\n  m_GameObject: {fileID: 101}\n  m_Intensity: 1\n";
        let graph = build(source).unwrap();
        assert_eq!(graph.cameras[&200].field_of_view, 60.0);
        assert_eq!(graph.cameras[&200].game_object, 100);
        assert_eq!(graph.lights[&300].game_object, 101);
    }

    #[test]
    fn test_unrecognized_class_skipped() {
        let graph = build("--- !u!104 &2\nRenderSettings:\n  m_Fog: 0\n").unwrap();
        assert!(graph.game_objects.is_empty());
    }

    #[test]
    fn test_renderer_components_ignored() {
        let source = "--- !u!23 &500\nMeshRenderer:\n  m_GameObject: {fileID: 100}\n\
                      --- !u!33 &600\nMeshFilter:\n  m_GameObject: {fileID: 100}\n";
        let graph = build(source).unwrap();
        assert!(graph.game_objects.is_empty());
        assert!(graph.transforms.is_empty());
    }

    #[test]
    fn test_reconcile_adds_reverse_edge() {
        // Child 401 (owned by 101) declares parent 400, but 400 declares
        // no children at all.
        let source = format!(
            "{}{}",
            transform_doc(400, 100, 0, &[]),
            transform_doc(401, 101, 400, &[])
        );
        let graph = build(&source).unwrap();
        assert_eq!(graph.transforms[&400].children, [101]);
    }

    #[test]
    fn test_reconcile_does_not_duplicate_declared_edge() {
        // 400 already declares child 101 (the entity handle the reverse
        // pass would contribute).
        let source = format!(
            "{}{}",
            transform_doc(400, 100, 0, &[101]),
            transform_doc(401, 101, 400, &[])
        );
        let graph = build(&source).unwrap();
        assert_eq!(graph.transforms[&400].children, [101]);
    }

    #[test]
    fn test_reconcile_closure_holds_for_every_edge() {
        let source = format!(
            "{}{}{}",
            transform_doc(400, 100, 0, &[]),
            transform_doc(401, 101, 400, &[]),
            transform_doc(402, 102, 400, &[])
        );
        let graph = build(&source).unwrap();
        for tf in graph.transforms.values() {
            if let Some(parent) = tf.parent {
                assert!(graph.transforms[&parent].children.contains(&tf.game_object));
            }
        }
    }

    #[test]
    fn test_link_components() {
        let source = format!(
            "--- !u!1 &100\nGameObject:\n  m_Name: Rig\n\
             --- !u!20 &200\nCamera:\n  m_GameObject: {{fileID: 100}}\n  field of view: 75\n\
             {}",
            transform_doc(400, 100, 0, &[])
        );
        let graph = build(&source).unwrap();
        let go = &graph.game_objects[&100];
        assert_eq!(go.camera.unwrap().field_of_view, 75.0);
        assert!(go.transform.is_some());
        assert!(go.light.is_none());
    }

    #[test]
    fn test_dangling_component_dropped_silently() {
        let source = "--- !u!1 &100\nGameObject:\n  m_Name: Cube\n\
                      --- !u!20 &200\nCamera:\n  m_GameObject: {fileID: 999}\n  field of view: 60\n";
        let graph = build(source).unwrap();
        // Build completes; no entity is marked as having a camera.
        assert!(graph.game_objects[&100].camera.is_none());
        assert_eq!(graph.cameras.len(), 1);
    }

    #[test]
    fn test_malformed_rotation_names_handle() {
        let source = "--- !u!4 &400\nTransform:\n  m_GameObject: {fileID: 100}\n  \
                      m_LocalRotation: {x: banana, y: 0, z: 0}\n  \
                      m_LocalPosition: {x: 0, y: 0, z: 0}\n  \
                      m_LocalScale: {x: 1, y: 1, z: 1}\n  m_Father: {fileID: 0}\n";
        let err = build(source).unwrap_err();
        match err {
            Error::FieldParse { field, handle, value } => {
                assert_eq!(field, "m_LocalRotation.x");
                assert_eq!(handle, 400);
                assert_eq!(value, "banana");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let source = format!(
            "{PROLOGUE}--- !u!1 &100\nGameObject:\n  m_Name: Root\n\
             --- !u!1 &101\nGameObject:\n  m_Name: Child\n\
             --- !u!108 &300\nLight:\n  m_GameObject: {{fileID: 101}}\n\
             {}{}",
            transform_doc(400, 100, 0, &[]),
            transform_doc(401, 101, 400, &[])
        );
        let docs = parse_documents(&source).unwrap();
        let first = build_scene(&docs).unwrap();
        let second = build_scene(&docs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_entities_keep_document_order() {
        let source = "--- !u!1 &3\nGameObject:\n  m_Name: C\n\
                      --- !u!1 &1\nGameObject:\n  m_Name: A\n\
                      --- !u!1 &2\nGameObject:\n  m_Name: B\n";
        let graph = build(source).unwrap();
        let names: Vec<&str> = graph.game_objects.values().map(|go| go.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }
}
