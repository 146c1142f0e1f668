//! Decoded node tree for Unity scene documents.
//!
//! A document body decodes into a tree of [`Node`]s: ordered mappings,
//! sequences and string scalars. Mappings keep their source order and are
//! searched by linear scan, which is the right shape for the handful of
//! keys Unity writes per node.

use crate::util::{Error, Result};

/// Ordered (key, value) pairs of a decoded mapping.
pub type MappingEntries = Vec<(String, Node)>;

/// One decoded node of a scene document.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Ordered key/value pairs, keys unique in well-formed input.
    Mapping(MappingEntries),
    /// Ordered list of nodes.
    Sequence(Vec<Node>),
    /// Raw scalar text, quotes already stripped.
    Scalar(String),
}

impl Node {
    /// Empty mapping.
    pub fn empty_mapping() -> Self {
        Node::Mapping(MappingEntries::new())
    }

    /// Scalar text, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Mapping entries, if this is a mapping.
    pub fn as_mapping(&self) -> Option<&[(String, Node)]> {
        match self {
            Node::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Sequence items, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a mapping child by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Look up a required mapping child, reporting the owning handle on failure.
    pub fn expect(&self, key: &str, handle: i64) -> Result<&Node> {
        self.get(key)
            .ok_or_else(|| Error::missing_field(key, handle))
    }

    /// Decode this node as an `f32` scalar.
    ///
    /// `field` and `handle` name the offending location in the error.
    pub fn scalar_f32(&self, field: &str, handle: i64) -> Result<f32> {
        let raw = self
            .as_scalar()
            .ok_or_else(|| Error::field_parse(field, handle, self.describe()))?;
        raw.trim()
            .parse::<f32>()
            .map_err(|_| Error::field_parse(field, handle, raw))
    }

    /// Decode this node as an `i64` scalar.
    pub fn scalar_i64(&self, field: &str, handle: i64) -> Result<i64> {
        let raw = self
            .as_scalar()
            .ok_or_else(|| Error::field_parse(field, handle, self.describe()))?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| Error::field_parse(field, handle, raw))
    }

    fn describe(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "<mapping>",
            Node::Sequence(_) => "<sequence>",
            Node::Scalar(_) => "<scalar>",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::Mapping(vec![
            ("x".to_string(), Node::Scalar("1.5".to_string())),
            ("y".to_string(), Node::Scalar("oops".to_string())),
            ("items".to_string(), Node::Sequence(vec![Node::Scalar("0".to_string())])),
        ])
    }

    #[test]
    fn test_get_preserves_order() {
        let node = sample();
        let keys: Vec<&str> = node
            .as_mapping()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["x", "y", "items"]);
        assert!(node.get("x").is_some());
        assert!(node.get("z").is_none());
    }

    #[test]
    fn test_expect_names_handle() {
        let node = sample();
        let err = node.expect("missing", 77).unwrap_err();
        assert!(matches!(err, Error::MissingField { handle: 77, .. }));
    }

    #[test]
    fn test_scalar_f32() {
        let node = sample();
        assert_eq!(node.get("x").unwrap().scalar_f32("x", 1).unwrap(), 1.5);

        let err = node.get("y").unwrap().scalar_f32("y", 9).unwrap_err();
        match err {
            Error::FieldParse { handle, value, .. } => {
                assert_eq!(handle, 9);
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scalar_on_non_scalar() {
        let node = sample();
        let err = node.get("items").unwrap().scalar_i64("items", 3).unwrap_err();
        assert!(matches!(err, Error::FieldParse { .. }));
    }
}
