//! Container assembly and resolution
//!
//! A [`ContainerBuilder`] collects named component definitions. Building it
//! runs the factory scan, freezes the definitions and creates the eager
//! singletons. The resulting [`Container`] is immutable: singletons are
//! created at most once, prototypes on every request.

use crate::catalog::TypeCatalog;
use crate::config::AssemblyOptions;
use crate::definition::{ComponentDefinition, DefinitionSource, Scope};
use crate::factory::WiringFactory;
use crate::provider::{AnyInstance, InstanceProvider};
use crate::registry::{DefinitionMap, DefinitionRegistry, DefinitionSnapshot};
use crate::scanner::{RegistryScanner, ScanReport};
use crate::types::{TypeDescriptor, TypeKey};
use crate::wiring::{Resolver, ResolverExt, Wireable, WiringBridge};
use crate::{Injectable, Result, WiringError};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Weak};

#[cfg(feature = "logging")]
use tracing::{debug, trace};

// =============================================================================
// Builder
// =============================================================================

/// Assembly context of a [`Container`].
///
/// # Examples
///
/// ```rust
/// use wiring_factory::ContainerBuilder;
///
/// struct Database { url: String }
///
/// let mut builder = ContainerBuilder::new();
/// builder.singleton("database", Database { url: "postgres://localhost".into() })?;
/// let container = builder.build()?;
///
/// let db = container.get::<Database>()?;
/// assert_eq!(db.url, "postgres://localhost");
/// # Ok::<(), wiring_factory::WiringError>(())
/// ```
pub struct ContainerBuilder {
    definitions: DefinitionMap,
    catalog: Arc<TypeCatalog>,
    options: AssemblyOptions,
}

impl ContainerBuilder {
    /// Create an empty builder with default options and a fresh catalog
    #[inline]
    pub fn new() -> Self {
        Self::with_options(AssemblyOptions::default())
    }

    /// Create an empty builder with `options`
    pub fn with_options(options: AssemblyOptions) -> Self {
        Self {
            definitions: DefinitionMap::new(),
            catalog: Arc::new(TypeCatalog::new()),
            options,
        }
    }

    /// Use a shared type catalog for class-name lookups
    pub fn with_catalog(mut self, catalog: Arc<TypeCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// The catalog class names are loaded from
    #[inline]
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    #[inline]
    pub fn options(&self) -> AssemblyOptions {
        self.options
    }

    // =========================================================================
    // Registration Methods
    // =========================================================================

    /// Register an eager singleton holding `instance`
    pub fn singleton<T: Injectable>(&mut self, name: impl Into<String>, instance: T) -> Result<&mut Self> {
        self.register(name, ComponentDefinition::instance(instance))
    }

    /// Register a singleton built by `supplier` on first access
    pub fn lazy<T: Injectable, F>(&mut self, name: impl Into<String>, supplier: F) -> Result<&mut Self>
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.register(
            name,
            ComponentDefinition::factory_method(supplier).with_lazy(true),
        )
    }

    /// Register a prototype: `supplier` runs on every request
    pub fn prototype<T: Injectable, F>(&mut self, name: impl Into<String>, supplier: F) -> Result<&mut Self>
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.register(
            name,
            ComponentDefinition::factory_method(supplier)
                .with_scope(Scope::Prototype)
                .with_lazy(true),
        )
    }

    /// Register a wiring factory built by `supplier`.
    ///
    /// The definition carries the static type metadata of `F`, so the scan
    /// recognizes it without consulting the catalog.
    pub fn factory<F: WiringFactory, S>(&mut self, name: impl Into<String>, supplier: S) -> Result<&mut Self>
    where
        S: Fn(&Container) -> Result<F> + Send + Sync + 'static,
    {
        self.register(
            name,
            ComponentDefinition::factory_method(supplier)
                .with_declared_type(TypeDescriptor::of_factory::<F>()),
        )
    }

    /// Like [`factory`](Self::factory), but the factory is only built on
    /// first access. Its products are still registered during assembly.
    pub fn lazy_factory<F: WiringFactory, S>(&mut self, name: impl Into<String>, supplier: S) -> Result<&mut Self>
    where
        S: Fn(&Container) -> Result<F> + Send + Sync + 'static,
    {
        self.register(
            name,
            ComponentDefinition::factory_method(supplier)
                .with_declared_type(TypeDescriptor::of_factory::<F>())
                .with_lazy(true),
        )
    }

    /// Register an eager singleton built by `supplier`, then injected and
    /// post-constructed exactly like a factory-made instance
    pub fn wired<T: Wireable, F>(&mut self, name: impl Into<String>, supplier: F) -> Result<&mut Self>
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.register(name, ComponentDefinition::wired(supplier))
    }

    /// Register a prototype built by `supplier` on every request, then
    /// injected and post-constructed
    pub fn wired_prototype<T: Wireable, F>(&mut self, name: impl Into<String>, supplier: F) -> Result<&mut Self>
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.register(
            name,
            ComponentDefinition::wired(supplier)
                .with_scope(Scope::Prototype)
                .with_lazy(true),
        )
    }

    /// Register a singleton known by `class_name`.
    ///
    /// Its type metadata is looked up in the catalog during the scan; a
    /// class the catalog does not know is simply not a factory.
    pub fn component<T: Injectable, F>(
        &mut self,
        name: impl Into<String>,
        class_name: impl Into<String>,
        supplier: F,
    ) -> Result<&mut Self>
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.register(
            name,
            ComponentDefinition::of_class(class_name, InstanceProvider::supplier(supplier)),
        )
    }

    /// Register a prepared definition
    pub fn register(&mut self, name: impl Into<String>, definition: ComponentDefinition) -> Result<&mut Self> {
        let name = name.into();

        #[cfg(feature = "logging")]
        debug!(
            target: "wiring_factory",
            component = name.as_str(),
            scope = ?definition.scope(),
            lazy = definition.is_lazy(),
            component_count = self.definitions.len() + 1,
            "Registering component"
        );

        self.definitions.register_definition(name, definition)?;
        Ok(self)
    }

    /// Whether `name` is taken
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_definition(name)
    }

    /// Number of registered definitions
    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    // =========================================================================
    // Assembly
    // =========================================================================

    /// Finish assembly.
    ///
    /// Registers product definitions for every factory (unless disabled),
    /// freezes the definitions and creates the eager singletons. Any error
    /// aborts assembly and no container is produced.
    pub fn build(self) -> Result<Container> {
        let Self {
            mut definitions,
            catalog,
            options,
        } = self;

        #[cfg(feature = "logging")]
        debug!(
            target: "wiring_factory",
            component_count = definitions.len(),
            scan_factories = options.scans_factories(),
            "Assembling container"
        );

        let report = if options.scans_factories() {
            RegistryScanner::new(catalog.as_ref()).scan(&mut definitions)?
        } else {
            ScanReport::default()
        };

        let snapshot = definitions.freeze();
        let singletons = (0..snapshot.len()).map(|_| OnceCell::new()).collect();

        let container = Container {
            inner: Arc::new(ContainerInner {
                snapshot,
                singletons,
                catalog,
                report,
            }),
        };

        if options.creates_eager_singletons() {
            container.create_eager_singletons()?;
        }

        #[cfg(feature = "logging")]
        debug!(
            target: "wiring_factory",
            component_count = container.len(),
            products = container.inner.report.products.len(),
            "Container assembled"
        );

        Ok(container)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("component_count", &self.definitions.len())
            .field("catalog_size", &self.catalog.len())
            .field("options", &self.options)
            .finish()
    }
}

// =============================================================================
// Container
// =============================================================================

struct ContainerInner {
    snapshot: DefinitionSnapshot,
    /// One cell per definition, only used for singletons
    singletons: Vec<OnceCell<AnyInstance>>,
    catalog: Arc<TypeCatalog>,
    report: ScanReport,
}

/// Assembled, immutable container.
///
/// Cloning is cheap and shares the same components.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

/// Non-owning handle to a container
#[derive(Clone)]
pub(crate) struct WeakContainer(Weak<ContainerInner>);

impl WeakContainer {
    #[inline]
    pub(crate) fn upgrade(&self) -> Option<Container> {
        self.0.upgrade().map(|inner| Container { inner })
    }
}

impl Container {
    // =========================================================================
    // Resolution Methods
    // =========================================================================

    /// Resolve the only component of type `T`.
    ///
    /// Fails with [`WiringError::Ambiguous`] if several components produce `T`.
    #[inline]
    pub fn get<T: Injectable>(&self) -> Result<Arc<T>> {
        self.resolve::<T>()
    }

    /// Resolve the component registered under `name`
    #[inline]
    pub fn get_named<T: Injectable>(&self, name: &str) -> Result<Arc<T>> {
        self.resolve_named::<T>(name)
    }

    /// Like [`get`](Self::get), returning `None` on any failure
    #[inline]
    pub fn try_get<T: Injectable>(&self) -> Option<Arc<T>> {
        self.get::<T>().ok()
    }

    /// Whether a component is registered under `name`
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.snapshot.index_of(name).is_some()
    }

    /// The definition registered under `name`
    #[inline]
    pub fn definition(&self, name: &str) -> Option<&ComponentDefinition> {
        self.inner.snapshot.get(name)
    }

    /// All component names in registration order, synthesized products last
    pub fn definition_names(&self) -> Vec<&str> {
        self.inner.snapshot.names()
    }

    /// Names of the components producing `T`
    pub fn names_for_type<T: Injectable>(&self) -> Vec<&str> {
        self.names_at(self.inner.snapshot.indices_of_type(&TypeKey::of::<T>().id()))
    }

    /// Bridge for wiring instances built outside the container
    #[inline]
    pub fn bridge(&self) -> WiringBridge {
        WiringBridge::new(WeakContainer(Arc::downgrade(&self.inner)))
    }

    /// Product definitions registered by the factory scan
    #[inline]
    pub fn scan_report(&self) -> &ScanReport {
        &self.inner.report
    }

    #[inline]
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.inner.catalog
    }

    /// Number of definitions
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.snapshot.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.snapshot.is_empty()
    }

    /// Name of the synthesized product definition for `product`
    pub(crate) fn product_name(&self, product: &TypeKey) -> Option<&str> {
        self.inner
            .report
            .products
            .iter()
            .find(|p| p.product == *product)
            .map(|p| p.name.as_str())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn names_at(&self, indices: &[usize]) -> Vec<&str> {
        indices
            .iter()
            .filter_map(|&index| self.inner.snapshot.entry(index).map(|(name, _)| name))
            .collect()
    }

    fn create_eager_singletons(&self) -> Result<()> {
        let eager: Vec<usize> = self
            .inner
            .snapshot
            .iter()
            .enumerate()
            .filter(|(_, (_, definition))| {
                definition.scope() == Scope::Singleton
                    && !definition.is_lazy()
                    && definition.provider().is_some()
            })
            .map(|(index, _)| index)
            .collect();

        #[cfg(feature = "logging")]
        debug!(
            target: "wiring_factory",
            count = eager.len(),
            "Creating eager singletons"
        );

        for index in eager {
            self.instance_at(index)?;
        }
        Ok(())
    }

    fn instance_at(&self, index: usize) -> Result<AnyInstance> {
        let (name, definition) = self
            .inner
            .snapshot
            .entry(index)
            .ok_or_else(|| WiringError::not_found(format!("#{index}")))?;

        let Some(provider) = definition.provider() else {
            return Err(missing_provider(name, definition));
        };

        match definition.scope() {
            Scope::Singleton => self.inner.singletons[index]
                .get_or_try_init(|| {
                    #[cfg(feature = "logging")]
                    trace!(
                        target: "wiring_factory",
                        component = name,
                        "Creating singleton"
                    );

                    provider.provide(self)
                })
                .map(Arc::clone),
            Scope::Prototype => {
                #[cfg(feature = "logging")]
                trace!(
                    target: "wiring_factory",
                    component = name,
                    "Creating prototype instance"
                );

                provider.provide(self)
            }
        }
    }
}

fn missing_provider(name: &str, definition: &ComponentDefinition) -> WiringError {
    match definition.source() {
        DefinitionSource::Synthesized { factory } => WiringError::creation_failed(
            name,
            format!("instances are built by the factory `{factory}`, request it instead"),
        ),
        _ => WiringError::creation_failed(name, "the definition has no provider"),
    }
}

impl Resolver for Container {
    fn find_named(&self, name: &str, expected: TypeKey) -> Result<AnyInstance> {
        let snapshot = &self.inner.snapshot;
        let index = snapshot
            .index_of(name)
            .ok_or_else(|| WiringError::not_found(name))?;

        let target = snapshot.entry(index).and_then(|(_, definition)| definition.target());
        if target != Some(expected) {
            return Err(WiringError::TypeMismatch {
                name: name.to_owned(),
                expected: expected.name(),
                actual: target.map_or("an untyped component", |t| t.name()).to_owned(),
            });
        }

        #[cfg(feature = "logging")]
        trace!(
            target: "wiring_factory",
            component = name,
            "Resolving by name"
        );

        self.instance_at(index)
    }

    fn find_by_type(&self, expected: TypeKey) -> Result<AnyInstance> {
        let indices = self.inner.snapshot.indices_of_type(&expected.id());

        #[cfg(feature = "logging")]
        trace!(
            target: "wiring_factory",
            component_type = expected.name(),
            candidates = indices.len(),
            "Resolving by type"
        );

        match indices {
            [] => Err(WiringError::NotFoundByType {
                type_name: expected.name(),
            }),
            [index] => self.instance_at(*index),
            _ => Err(WiringError::Ambiguous {
                type_name: expected.name(),
                candidates: self.names_at(indices).into_iter().map(str::to_owned).collect(),
            }),
        }
    }

    #[inline]
    fn has_named(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("component_count", &self.len())
            .field("products", &self.inner.report.products.len())
            .finish()
    }
}
