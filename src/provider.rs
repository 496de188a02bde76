//! Injectable types and instance providers
//!
//! An [`InstanceProvider`] is the construction recipe attached to a
//! definition: either a pre-built instance or a supplier closure that builds
//! one from the container. Providers are type-erased so definitions of any
//! type live in one registry, but each one remembers the [`TypeKey`] it
//! produces.

use crate::types::TypeKey;
use crate::wiring::{self, Wireable};
use crate::{Container, Result};
use std::any::Any;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// Marker trait for types that can be managed by the container.
///
/// This is automatically implemented for all types that are `Send + Sync + 'static`.
pub trait Injectable: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Injectable for T {}

/// A type-erased component instance
pub type AnyInstance = Arc<dyn Any + Send + Sync>;

/// Type-erased supplier function
type SupplierFn = Arc<dyn Fn(&Container) -> Result<AnyInstance> + Send + Sync>;

#[derive(Clone)]
enum ProviderKind {
    /// Pre-built instance, shared on every request
    Instance(AnyInstance),
    /// Builds an instance from the container
    Supplier(SupplierFn),
}

/// Construction recipe of a definition
#[derive(Clone)]
pub struct InstanceProvider {
    kind: ProviderKind,
    produces: TypeKey,
}

impl InstanceProvider {
    /// Provide an existing value
    #[inline]
    pub fn instance<T: Injectable>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Provide an existing shared value
    #[inline]
    pub fn from_arc<T: Injectable>(value: Arc<T>) -> Self {
        Self {
            kind: ProviderKind::Instance(value as AnyInstance),
            produces: TypeKey::of::<T>(),
        }
    }

    /// Provide values built by `supplier`
    #[inline]
    pub fn supplier<T: Injectable, F>(supplier: F) -> Self
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            kind: ProviderKind::Supplier(Arc::new(move |container| {
                supplier(container).map(|value| Arc::new(value) as AnyInstance)
            })),
            produces: TypeKey::of::<T>(),
        }
    }

    /// Provide values built by `supplier`, then injected and post-constructed
    /// the same way a factory-made instance is
    pub fn wired<T: Wireable, F>(supplier: F) -> Self
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        Self::supplier(move |container: &Container| {
            let mut value = supplier(container)?;
            wiring::complete(&mut value, container)?;
            Ok(value)
        })
    }

    /// The type this provider produces
    #[inline]
    pub fn produces(&self) -> TypeKey {
        self.produces
    }

    /// Whether this provider hands out a pre-built instance
    #[inline]
    pub fn is_instance(&self) -> bool {
        matches!(self.kind, ProviderKind::Instance(_))
    }

    /// Produce an instance
    pub(crate) fn provide(&self, container: &Container) -> Result<AnyInstance> {
        match &self.kind {
            ProviderKind::Instance(instance) => Ok(Arc::clone(instance)),
            ProviderKind::Supplier(supplier) => {
                #[cfg(feature = "logging")]
                trace!(
                    target: "wiring_factory",
                    component = self.produces.name(),
                    "Running supplier"
                );

                supplier(container)
            }
        }
    }
}

impl std::fmt::Debug for InstanceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ProviderKind::Instance(_) => "instance",
            ProviderKind::Supplier(_) => "supplier",
        };
        f.debug_struct("InstanceProvider")
            .field("kind", &kind)
            .field("produces", &self.produces.name())
            .finish()
    }
}
