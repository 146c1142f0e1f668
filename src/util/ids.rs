//! Identifier generation for exported scene objects.
//!
//! The exporter stamps every output node, geometry and material with a
//! fresh unique string. Generation sits behind a small capability trait so
//! tests can substitute a deterministic provider.

use uuid::Uuid;

/// Capability: produce a fresh unique identifier string.
///
/// Implementations must be safe to call repeatedly and from concurrent
/// export invocations; no ordering is guaranteed between identifiers.
pub trait IdProvider: Sync {
    fn fresh(&self) -> String;
}

/// Default provider backed by random v4 uuids.
///
/// Identifiers are NOT stable across repeated exports of the same scene.
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn fresh(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
