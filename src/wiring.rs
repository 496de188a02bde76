//! Wiring of instances the container did not construct
//!
//! A factory builds its product by hand and hands it to
//! [`WiringBridge::wire`], which runs the container's injection pass on it:
//! every dependency slot is filled (by name first, by type second) and the
//! post-construct hook runs, exactly as for a container-built component.

use crate::container::WeakContainer;
#[cfg(feature = "logging")]
use crate::naming::derive_name;
use crate::provider::AnyInstance;
use crate::types::TypeKey;
use crate::{Injectable, Result, WiringError};
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

// =============================================================================
// Resolver
// =============================================================================

/// Type-erased resolution engine used by injection
pub trait Resolver: Send + Sync {
    /// Instance of the component `name`, which must produce `expected`
    fn find_named(&self, name: &str, expected: TypeKey) -> Result<AnyInstance>;

    /// Instance of the only component producing `expected`
    fn find_by_type(&self, expected: TypeKey) -> Result<AnyInstance>;

    /// Whether a component named `name` exists
    fn has_named(&self, name: &str) -> bool;
}

/// Typed helpers over [`Resolver`]
pub trait ResolverExt: Resolver {
    /// Resolve the only component of type `T`
    fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
        let key = TypeKey::of::<T>();
        downcast(self.find_by_type(key)?, key.name().to_owned())
    }

    /// Resolve the component `name`, which must be a `T`
    fn resolve_named<T: Injectable>(&self, name: &str) -> Result<Arc<T>> {
        downcast(self.find_named(name, TypeKey::of::<T>())?, name.to_owned())
    }

    /// Resolve a dependency slot called `field`: the component named like
    /// the field if there is one, otherwise the only component of type `T`
    fn resolve_for_field<T: Injectable>(&self, field: &str) -> Result<Arc<T>> {
        if self.has_named(field) {
            self.resolve_named::<T>(field)
        } else {
            self.resolve::<T>()
        }
    }

    /// Like [`resolve_for_field`](Self::resolve_for_field), but a missing
    /// component yields `None`
    fn try_resolve_for_field<T: Injectable>(&self, field: &str) -> Result<Option<Arc<T>>> {
        not_found_as_none(self.resolve_for_field::<T>(field))
    }
}

impl<R: Resolver + ?Sized> ResolverExt for R {}

/// Turn a missing-component error into `None`, keeping every other error
#[inline]
pub fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

fn downcast<T: Injectable>(instance: AnyInstance, name: String) -> Result<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| WiringError::TypeMismatch {
            name,
            expected: std::any::type_name::<T>(),
            actual: "another type".to_owned(),
        })
}

// =============================================================================
// Wireable
// =============================================================================

/// A type whose dependencies the container can fill after construction.
///
/// Usually derived with `#[derive(Wire)]`.
pub trait Wireable: Injectable {
    /// Fill every dependency slot from `resolver`
    fn inject(&mut self, resolver: &dyn Resolver) -> Result<()>;

    /// Runs once all dependencies are injected
    fn post_construct(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Inject the dependencies of `instance` and run its post-construct hook.
///
/// Shared by the bridge and by container-built [`Wireable`] components, so
/// both end in the same state.
pub(crate) fn complete<T: Wireable>(instance: &mut T, resolver: &dyn Resolver) -> Result<()> {
    instance
        .inject(resolver)
        .map_err(WiringError::injection::<T>)?;
    instance
        .post_construct()
        .map_err(WiringError::injection::<T>)
}

/// Dependency slot, empty until the owning instance is wired.
///
/// Dereferences to the injected component.
///
/// # Panics
///
/// Dereferencing an unwired slot panics. Use [`get`](Self::get) or
/// [`require`](Self::require) to check.
pub struct Autowired<T: ?Sized> {
    slot: Option<Arc<T>>,
}

impl<T: ?Sized> Autowired<T> {
    /// Empty slot
    #[inline]
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Fill the slot, replacing any previous value
    #[inline]
    pub fn inject(&mut self, value: Arc<T>) {
        self.slot = Some(value);
    }

    /// The injected component, if wired
    #[inline]
    pub fn get(&self) -> Option<&Arc<T>> {
        self.slot.as_ref()
    }

    /// Whether the slot is filled
    #[inline]
    pub fn is_wired(&self) -> bool {
        self.slot.is_some()
    }

    /// The injected component, or [`WiringError::NotWired`] naming the
    /// `field` of `Owner` this slot belongs to
    #[inline]
    pub fn require<Owner: 'static>(&self, field: &'static str) -> Result<&Arc<T>> {
        self.slot
            .as_ref()
            .ok_or_else(|| WiringError::not_wired::<Owner>(field))
    }
}

impl<T: ?Sized> Default for Autowired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Autowired<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: ?Sized> std::ops::Deref for Autowired<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.slot {
            Some(value) => value,
            None => panic!(
                "Autowired<{}> read before the instance was wired",
                std::any::type_name::<T>()
            ),
        }
    }
}

impl<T: ?Sized + std::fmt::Debug> std::fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.slot {
            Some(value) => f.debug_tuple("Autowired").field(value).finish(),
            None => f.write_str("Autowired(<unwired>)"),
        }
    }
}

// =============================================================================
// WiringBridge
// =============================================================================

/// Handle factories use to wire the instances they build.
///
/// Holds a weak reference to the container, so factories living inside the
/// container do not keep it alive. Cloning is cheap; calls are independent
/// and may run concurrently.
#[derive(Clone)]
pub struct WiringBridge {
    container: WeakContainer,
}

impl WiringBridge {
    pub(crate) fn new(container: WeakContainer) -> Self {
        Self { container }
    }

    /// Inject the dependencies of `instance`, run its post-construct hook
    /// and return it.
    ///
    /// Errors are wrapped in [`WiringError::Injection`].
    pub fn wire<T: Wireable>(&self, mut instance: T) -> Result<T> {
        let container = self
            .container
            .upgrade()
            .ok_or(WiringError::ContainerDropped)?;

        #[cfg(feature = "logging")]
        let component = {
            let product = TypeKey::of::<T>();
            let component = container
                .product_name(&product)
                .map(str::to_owned)
                .unwrap_or_else(|| derive_name(&product));
            trace!(
                target: "wiring_factory",
                component = component.as_str(),
                product = product.name(),
                registered = container.contains(&component),
                "Wiring factory-made instance"
            );
            component
        };

        complete(&mut instance, &container)?;

        #[cfg(feature = "logging")]
        debug!(
            target: "wiring_factory",
            component = component.as_str(),
            "Factory-made instance wired"
        );

        Ok(instance)
    }

    /// Whether the container is still alive
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.container.upgrade().is_some()
    }
}

impl std::fmt::Debug for WiringBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WiringBridge")
            .field("attached", &self.is_attached())
            .finish()
    }
}
