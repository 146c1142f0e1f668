//! Scene graph records.
//!
//! Records reference each other exclusively by integer handle (the
//! document anchor / fileID); no native references cross record
//! boundaries. The arenas are insertion-ordered so entity iteration
//! follows document order.

use glam::Vec3;
use indexmap::IndexMap;

/// Numeric class codes of the serialized object kinds this converter
/// recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassId {
    GameObject = 1,
    Transform = 4,
    Camera = 20,
    MeshRenderer = 23,
    MeshFilter = 33,
    Light = 108,
}

impl ClassId {
    /// Map a tag's numeric suffix to a known class.
    ///
    /// Unknown codes are not an error; the format carries many component
    /// kinds this converter does not model.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::GameObject),
            4 => Some(Self::Transform),
            20 => Some(Self::Camera),
            23 => Some(Self::MeshRenderer),
            33 => Some(Self::MeshFilter),
            108 => Some(Self::Light),
            _ => None,
        }
    }
}

/// One scene object: display name plus the components linked to it.
///
/// Created once per GameObject document; the components are attached by
/// the link pass, at most one of each kind.
#[derive(Clone, Debug, PartialEq)]
pub struct GameObject {
    pub handle: i64,
    pub name: String,
    pub transform: Option<Transform>,
    pub camera: Option<Camera>,
    pub light: Option<Light>,
}

impl GameObject {
    pub fn new(handle: i64, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
            transform: None,
            camera: None,
            light: None,
        }
    }
}

/// Local TRS state and hierarchy edges of one transform component.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles, radians as stored in the source.
    pub rotation: Vec3,
    pub scale: Vec3,
    /// Handle of the owning game object.
    pub game_object: i64,
    /// Parent transform handle; `None` for roots (fileID 0 in the source).
    pub parent: Option<i64>,
    /// Declared child handles; after reconciliation the canonical
    /// bidirectional list.
    pub children: Vec<i64>,
}

/// Camera component: field of view in degrees plus the owning handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub field_of_view: f32,
    pub game_object: i64,
}

/// Light component. Only the owning handle is modeled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub game_object: i64,
}

/// All records of one converted document set, keyed by handle.
#[derive(Debug, Default, PartialEq)]
pub struct SceneGraph {
    pub game_objects: IndexMap<i64, GameObject>,
    pub transforms: IndexMap<i64, Transform>,
    pub cameras: IndexMap<i64, Camera>,
    pub lights: IndexMap<i64, Light>,
}
