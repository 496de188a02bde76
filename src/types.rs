//! Runtime type metadata
//!
//! Rust has no runtime reflection over generics, so the inheritance
//! information the resolver needs is declared explicitly as
//! [`TypeDescriptor`] values. A descriptor describes one *class*: its name,
//! the concrete Rust type behind it (if any), its generic parameters and the
//! supertypes it extends, each with the type arguments it binds.
//!
//! # Example
//!
//! ```rust
//! use wiring_factory::{factory_support, TypeArg, TypeDescriptor};
//!
//! struct Invoice;
//! struct InvoiceFactory;
//!
//! // abstract base fixing nothing yet
//! let base = TypeDescriptor::generic("billing::DocumentFactory")
//!     .param("D")
//!     .extends(factory_support(), [TypeArg::var("D")])
//!     .build();
//!
//! // concrete factory binding the parameter one level up
//! let factory = TypeDescriptor::class::<InvoiceFactory>()
//!     .extends(&base, [TypeArg::of::<Invoice>()])
//!     .build();
//!
//! assert_eq!(factory.supertypes().len(), 1);
//! ```

use once_cell::sync::Lazy;
use std::any::TypeId;
use std::sync::Arc;

/// Class name of the `WiringFactory<T>` capability
pub const FACTORY_CAPABILITY_CLASS: &str = "wiring_factory::WiringFactory";

/// Class name of the `WiringFactorySupport<T>` base
pub const FACTORY_SUPPORT_CLASS: &str = "wiring_factory::WiringFactorySupport";

// =============================================================================
// TypeKey
// =============================================================================

/// Identity of a concrete Rust type.
///
/// Equality and hashing use the `TypeId` only; the name is carried for
/// naming and diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key of `T`
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId`
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type name as reported by `std::any::type_name`
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The last path segment of the type name, generic arguments stripped.
    ///
    /// `my_app::orders::OrderProcessor` becomes `OrderProcessor`,
    /// `alloc::vec::Vec<u8>` becomes `Vec`.
    pub fn simple_name(&self) -> &'static str {
        simple_name(self.name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for TypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) fn simple_name(type_name: &str) -> &str {
    let path = match type_name.find('<') {
        Some(generics) => &type_name[..generics],
        None => type_name,
    };
    match path.rfind("::") {
        Some(sep) => &path[sep + 2..],
        None => path,
    }
}

// =============================================================================
// Type arguments and supertypes
// =============================================================================

/// A type argument bound at a supertype reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArg {
    /// A concrete runtime type
    Concrete(TypeKey),
    /// A type variable of the declaring class
    Var(String),
}

impl TypeArg {
    /// Concrete argument `T`
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Concrete(TypeKey::of::<T>())
    }

    /// Type variable argument
    #[inline]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// The concrete type, if bound
    #[inline]
    pub fn concrete(&self) -> Option<TypeKey> {
        match self {
            Self::Concrete(key) => Some(*key),
            Self::Var(_) => None,
        }
    }
}

/// A reference to a supertype together with the arguments bound to its
/// generic parameters, in declaration order
#[derive(Debug, Clone)]
pub struct Supertype {
    descriptor: Arc<TypeDescriptor>,
    args: Vec<TypeArg>,
}

impl Supertype {
    /// The supertype's descriptor
    #[inline]
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// The bound arguments
    #[inline]
    pub fn args(&self) -> &[TypeArg] {
        &self.args
    }
}

// =============================================================================
// TypeDescriptor
// =============================================================================

/// Reflection metadata for one class
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    class_name: String,
    runtime: Option<TypeKey>,
    params: Vec<String>,
    supertypes: Vec<Supertype>,
}

impl TypeDescriptor {
    /// Start describing the concrete Rust type `T`.
    ///
    /// The class name is `std::any::type_name::<T>()`.
    pub fn class<T: ?Sized + 'static>() -> DescriptorBuilder {
        let key = TypeKey::of::<T>();
        DescriptorBuilder {
            descriptor: TypeDescriptor {
                class_name: key.name().to_owned(),
                runtime: Some(key),
                params: Vec::new(),
                supertypes: Vec::new(),
            },
        }
    }

    /// Start describing a class with no runtime type of its own, such as an
    /// abstract generic base or a capability trait
    pub fn generic(class_name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            descriptor: TypeDescriptor {
                class_name: class_name.into(),
                runtime: None,
                params: Vec::new(),
                supertypes: Vec::new(),
            },
        }
    }

    /// The class name
    #[inline]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The concrete runtime type, if this class has one
    #[inline]
    pub fn runtime_type(&self) -> Option<TypeKey> {
        self.runtime
    }

    /// Declared generic parameters
    #[inline]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Direct supertypes in declaration order
    #[inline]
    pub fn supertypes(&self) -> &[Supertype] {
        &self.supertypes
    }

    /// Whether this is the `WiringFactory<T>` capability itself
    #[inline]
    pub fn is_factory_capability(&self) -> bool {
        self.class_name == FACTORY_CAPABILITY_CLASS
    }

    /// Whether the capability is reachable from this class, regardless of
    /// whether its product type can be resolved
    pub fn is_factory(&self) -> bool {
        self.is_factory_capability()
            || self
                .supertypes
                .iter()
                .any(|sup| sup.descriptor.is_factory())
    }
}

/// Builder for [`TypeDescriptor`]
#[derive(Debug)]
pub struct DescriptorBuilder {
    descriptor: TypeDescriptor,
}

impl DescriptorBuilder {
    /// Declare a generic parameter
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.descriptor.params.push(name.into());
        self
    }

    /// Extend `parent`, binding its parameters to `args` in order.
    ///
    /// Parameters left without an argument stay unbound.
    pub fn extends(
        mut self,
        parent: &Arc<TypeDescriptor>,
        args: impl IntoIterator<Item = TypeArg>,
    ) -> Self {
        self.descriptor.supertypes.push(Supertype {
            descriptor: Arc::clone(parent),
            args: args.into_iter().collect(),
        });
        self
    }

    /// Finish the descriptor
    pub fn build(self) -> Arc<TypeDescriptor> {
        Arc::new(self.descriptor)
    }
}

// =============================================================================
// Well-known descriptors
// =============================================================================

static FACTORY_CAPABILITY: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| {
    TypeDescriptor::generic(FACTORY_CAPABILITY_CLASS)
        .param("T")
        .build()
});

static FACTORY_SUPPORT: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| {
    TypeDescriptor::generic(FACTORY_SUPPORT_CLASS)
        .param("T")
        .extends(&FACTORY_CAPABILITY, [TypeArg::var("T")])
        .build()
});

/// Descriptor of the `WiringFactory<T>` capability
pub fn factory_capability() -> &'static Arc<TypeDescriptor> {
    &FACTORY_CAPABILITY
}

/// Descriptor of the `WiringFactorySupport<T>` base, which implements the
/// capability once for all factories extending it
pub fn factory_support() -> &'static Arc<TypeDescriptor> {
    &FACTORY_SUPPORT
}

#[cfg(test)]
mod tests {
    use super::*;

    mod orders {
        pub struct OrderProcessor;
        pub struct Batch<T>(#[allow(dead_code)] T);
    }

    #[test]
    fn test_type_key_identity() {
        let a = TypeKey::of::<orders::OrderProcessor>();
        let b = TypeKey::of::<orders::OrderProcessor>();
        assert_eq!(a, b);
        assert_ne!(a, TypeKey::of::<String>());
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(
            TypeKey::of::<orders::OrderProcessor>().simple_name(),
            "OrderProcessor"
        );
        assert_eq!(
            TypeKey::of::<orders::Batch<orders::OrderProcessor>>().simple_name(),
            "Batch"
        );
        assert_eq!(simple_name("Plain"), "Plain");
    }

    #[test]
    fn test_builder() {
        let base = TypeDescriptor::generic("orders::Base")
            .param("P")
            .extends(factory_support(), [TypeArg::var("P")])
            .build();

        let concrete = TypeDescriptor::class::<orders::OrderProcessor>()
            .extends(&base, [TypeArg::of::<String>()])
            .build();

        assert_eq!(base.params(), ["P".to_string()]);
        assert!(base.runtime_type().is_none());
        assert_eq!(
            concrete.runtime_type(),
            Some(TypeKey::of::<orders::OrderProcessor>())
        );
        assert_eq!(concrete.supertypes()[0].args()[0], TypeArg::of::<String>());
        assert!(concrete.is_factory());
    }

    #[test]
    fn test_well_known() {
        assert!(factory_capability().is_factory_capability());
        assert!(!factory_support().is_factory_capability());
        assert!(factory_support().is_factory());
        assert_eq!(factory_support().class_name(), FACTORY_SUPPORT_CLASS);

        let plain = TypeDescriptor::class::<String>().build();
        assert!(!plain.is_factory());
    }
}
