//! Class-loading context
//!
//! The [`TypeCatalog`] maps class names to [`TypeDescriptor`]s. Definitions
//! that only carry a class name are typed by loading through it.

use crate::types::{TypeDescriptor, factory_capability, factory_support};
use crate::{Result, WiringError};
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// Loads type metadata by class name
pub trait TypeLoader: Send + Sync {
    /// Load the descriptor registered under `class_name`.
    ///
    /// Fails with [`WiringError::ClassResolution`] when the class is unknown.
    fn load_type(&self, class_name: &str) -> Result<Arc<TypeDescriptor>>;
}

/// Concurrent registry of type descriptors keyed by class name.
///
/// Comes pre-populated with the `WiringFactory` capability and the
/// `WiringFactorySupport` base.
pub struct TypeCatalog {
    types: DashMap<String, Arc<TypeDescriptor>, RandomState>,
}

impl TypeCatalog {
    /// Create a catalog holding the well-known descriptors
    pub fn new() -> Self {
        let catalog = Self {
            types: DashMap::with_capacity_and_hasher_and_shard_amount(16, RandomState::new(), 8),
        };
        catalog.register(Arc::clone(factory_capability()));
        catalog.register(Arc::clone(factory_support()));
        catalog
    }

    /// Register a descriptor under its class name, returning the one it replaced
    pub fn register(&self, descriptor: Arc<TypeDescriptor>) -> Option<Arc<TypeDescriptor>> {
        let class_name = descriptor.class_name().to_owned();

        #[cfg(feature = "logging")]
        trace!(
            target: "wiring_factory",
            class = class_name.as_str(),
            params = descriptor.params().len(),
            supertypes = descriptor.supertypes().len(),
            "Registering type descriptor"
        );

        self.types.insert(class_name, descriptor)
    }

    /// Look up a descriptor without raising an error
    #[inline]
    pub fn get(&self, class_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(class_name).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether a class is known
    #[inline]
    pub fn contains(&self, class_name: &str) -> bool {
        self.types.contains_key(class_name)
    }

    /// Number of known classes, the well-known ones included
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false: the well-known descriptors are present
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All known class names, sorted
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }
}

impl TypeLoader for TypeCatalog {
    fn load_type(&self, class_name: &str) -> Result<Arc<TypeDescriptor>> {
        self.get(class_name).ok_or_else(|| WiringError::ClassResolution {
            class_name: class_name.to_owned(),
        })
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeCatalog")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FACTORY_CAPABILITY_CLASS, FACTORY_SUPPORT_CLASS, TypeArg};

    struct Report;
    struct ReportFactory;

    #[test]
    fn test_well_known_preloaded() {
        let catalog = TypeCatalog::new();
        assert!(catalog.contains(FACTORY_CAPABILITY_CLASS));
        assert!(catalog.contains(FACTORY_SUPPORT_CLASS));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_register_and_load() {
        let catalog = TypeCatalog::new();
        let descriptor = TypeDescriptor::class::<ReportFactory>()
            .extends(factory_support(), [TypeArg::of::<Report>()])
            .build();
        let class_name = descriptor.class_name().to_owned();

        assert!(catalog.register(descriptor).is_none());

        let loaded = catalog.load_type(&class_name).unwrap();
        assert_eq!(loaded.class_name(), class_name);
        assert!(catalog.class_names().contains(&class_name));
    }

    #[test]
    fn test_unknown_class() {
        let catalog = TypeCatalog::new();
        let err = catalog.load_type("reports::Missing").unwrap_err();
        assert!(matches!(err, WiringError::ClassResolution { class_name } if class_name == "reports::Missing"));
    }

    #[test]
    fn test_replace() {
        let catalog = TypeCatalog::new();
        catalog.register(TypeDescriptor::generic("reports::Base").build());
        let previous = catalog.register(TypeDescriptor::generic("reports::Base").param("R").build());
        assert!(previous.is_some());
        assert_eq!(catalog.get("reports::Base").unwrap().params().len(), 1);
    }
}
