//! Packager registry - lookup of backend specs by kind.
//!
//! Registry construction never fails: every built-in backend is
//! registered up front.

use std::collections::BTreeMap;

use crate::packagers::capabilities::{BackendSpec, PackagerKind};
use crate::packagers::spec_for;

/// Registry of packager backends.
pub struct PackagerRegistry {
    backends: BTreeMap<PackagerKind, &'static BackendSpec>,
}

impl PackagerRegistry {
    /// Create a registry with all built-in backends.
    pub fn new() -> Self {
        let mut registry = PackagerRegistry {
            backends: BTreeMap::new(),
        };
        for kind in PackagerKind::ALL {
            registry.register(spec_for(kind));
        }
        registry
    }

    /// An empty registry; backends are added with [`register`](Self::register).
    pub fn empty() -> Self {
        PackagerRegistry {
            backends: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, spec: &'static BackendSpec) {
        self.backends.insert(spec.kind, spec);
    }

    /// Get a backend by kind.
    pub fn get(&self, kind: PackagerKind) -> Option<&'static BackendSpec> {
        self.backends.get(&kind).copied()
    }

    /// All registered backends, ordered by kind.
    pub fn all(&self) -> impl Iterator<Item = &'static BackendSpec> + '_ {
        self.backends.values().copied()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn contains(&self, kind: PackagerKind) -> bool {
        self.backends.contains_key(&kind)
    }
}

impl Default for PackagerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_backends() {
        let registry = PackagerRegistry::new();
        assert_eq!(registry.len(), PackagerKind::ALL.len());
        for kind in PackagerKind::ALL {
            assert!(registry.contains(kind));
        }
    }

    #[test]
    fn test_empty_registry() {
        let mut registry = PackagerRegistry::empty();
        assert!(registry.get(PackagerKind::Macports).is_none());
        registry.register(spec_for(PackagerKind::Macports));
        assert_eq!(
            registry.get(PackagerKind::Macports).map(|s| s.repository_name),
            Some("macports")
        );
    }
}
