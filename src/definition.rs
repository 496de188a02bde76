//! Component definitions
//!
//! A [`ComponentDefinition`] describes how one named component is scoped,
//! typed and constructed. Definitions are collected during assembly and
//! frozen into the container afterwards.

use crate::provider::InstanceProvider;
use crate::types::{TypeDescriptor, TypeKey};
use crate::wiring::Wireable;
use crate::{Container, Injectable, Result};
use std::sync::Arc;

/// Component scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// One instance, created once and shared
    #[default]
    Singleton,
    /// A new instance for every request, never cached
    Prototype,
}

/// How the container fills a component's dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Autowire {
    /// Dependencies are wired by the provider itself
    #[default]
    No,
    /// Through constructor arguments
    Constructor,
    /// By matching dependency names to component names
    ByName,
    /// By matching dependency types to component types
    ByType,
}

/// How a definition came to be
#[derive(Debug, Clone)]
pub enum DefinitionSource {
    /// A pre-built instance was registered
    Instance,
    /// A factory method produces the component. `declared` is the static
    /// type metadata of its return type, when known.
    FactoryMethod {
        declared: Option<Arc<TypeDescriptor>>,
    },
    /// Only a class name was given; its type is loaded from the catalog
    ClassName,
    /// Synthesized for the products of the factory component `factory`
    Synthesized { factory: String },
}

/// Definition of one named component
#[derive(Debug, Clone)]
pub struct ComponentDefinition {
    target: Option<TypeKey>,
    class_name: Option<String>,
    scope: Scope,
    lazy: bool,
    autowire: Autowire,
    source: DefinitionSource,
    provider: Option<InstanceProvider>,
}

impl ComponentDefinition {
    fn with_provider(provider: InstanceProvider, source: DefinitionSource) -> Self {
        let target = provider.produces();
        Self {
            target: Some(target),
            class_name: Some(target.name().to_owned()),
            scope: Scope::Singleton,
            lazy: false,
            autowire: Autowire::No,
            source,
            provider: Some(provider),
        }
    }

    /// Eager singleton holding `value`
    pub fn instance<T: Injectable>(value: T) -> Self {
        Self::with_provider(InstanceProvider::instance(value), DefinitionSource::Instance)
    }

    /// Singleton built by a factory method without static type metadata
    pub fn factory_method<T: Injectable, F>(supplier: F) -> Self
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        Self::with_provider(
            InstanceProvider::supplier(supplier),
            DefinitionSource::FactoryMethod { declared: None },
        )
    }

    /// Singleton built by `supplier`, then injected and post-constructed
    /// like a factory-made instance
    pub fn wired<T: Wireable, F>(supplier: F) -> Self
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        Self::with_provider(
            InstanceProvider::wired(supplier),
            DefinitionSource::FactoryMethod { declared: None },
        )
        .with_autowire(Autowire::ByName)
    }

    /// Singleton declared by class name; the provider builds it
    pub fn of_class(class_name: impl Into<String>, provider: InstanceProvider) -> Self {
        let mut definition = Self::with_provider(provider, DefinitionSource::ClassName);
        definition.class_name = Some(class_name.into());
        definition
    }

    /// Set the scope
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Set laziness
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Set the autowiring strategy
    pub fn with_autowire(mut self, autowire: Autowire) -> Self {
        self.autowire = autowire;
        self
    }

    /// Attach static type metadata. The definition becomes a factory-method
    /// definition.
    pub fn with_declared_type(mut self, declared: Arc<TypeDescriptor>) -> Self {
        self.source = DefinitionSource::FactoryMethod {
            declared: Some(declared),
        };
        self
    }

    /// Override the class name
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// The produced type, when known
    #[inline]
    pub fn target(&self) -> Option<TypeKey> {
        self.target
    }

    /// The class name, when known
    #[inline]
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    #[inline]
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    #[inline]
    pub fn autowire(&self) -> Autowire {
        self.autowire
    }

    #[inline]
    pub fn source(&self) -> &DefinitionSource {
        &self.source
    }

    /// Static type metadata, available without loading anything
    pub fn declared_type(&self) -> Option<&Arc<TypeDescriptor>> {
        match &self.source {
            DefinitionSource::FactoryMethod { declared } => declared.as_ref(),
            _ => None,
        }
    }

    /// Whether this definition was synthesized for a factory's products
    #[inline]
    pub fn is_synthesized(&self) -> bool {
        matches!(self.source, DefinitionSource::Synthesized { .. })
    }

    #[inline]
    pub(crate) fn provider(&self) -> Option<&InstanceProvider> {
        self.provider.as_ref()
    }
}

/// Definition for the products of the factory named `factory`: prototype,
/// lazy, constructor-autowired, typed `product`.
///
/// ```rust
/// use wiring_factory::{synthesize, Autowire, Scope, TypeKey};
///
/// struct Receipt;
///
/// let definition = synthesize(TypeKey::of::<Receipt>(), "receiptFactory");
/// assert_eq!(definition.scope(), Scope::Prototype);
/// assert!(definition.is_lazy());
/// assert_eq!(definition.autowire(), Autowire::Constructor);
/// ```
pub fn synthesize(product: TypeKey, factory: &str) -> ComponentDefinition {
    ComponentDefinition {
        target: Some(product),
        class_name: Some(product.name().to_owned()),
        scope: Scope::Prototype,
        lazy: true,
        autowire: Autowire::Constructor,
        source: DefinitionSource::Synthesized {
            factory: factory.to_owned(),
        },
        provider: None,
    }
}
