//! Assembly-time discovery of factories
//!
//! The [`RegistryScanner`] walks every definition of a registry once,
//! classifies it as a factory or not, and registers a synthesized prototype
//! definition for the product type of each factory it finds.
//!
//! How a definition gets typed depends on how it was declared:
//!
//! - factory-method definitions with static metadata use that metadata only;
//! - every other definition is typed by loading its class name through the
//!   [`TypeLoader`]. A class the loader does not know is not a factory.
//!
//! The scan is all-or-nothing: product definitions are registered only after
//! every factory has been resolved and every derived name checked.

use crate::catalog::TypeLoader;
use crate::definition::synthesize;
use crate::naming::derive_name;
use crate::registry::DefinitionRegistry;
use crate::resolver::{FactoryKind, resolve_product};
use crate::types::{TypeDescriptor, TypeKey};
use crate::{Result, WiringError};
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// One product definition registered by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedProduct {
    /// Name of the factory definition
    pub factory: String,
    /// Name the product definition was registered under
    pub name: String,
    /// Product type
    pub product: TypeKey,
}

/// Outcome of a scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Number of definitions inspected
    pub inspected: usize,
    /// Product definitions registered, in factory registration order
    pub products: Vec<SynthesizedProduct>,
}

impl ScanReport {
    /// Name of the product definition created for `factory`
    pub fn product_of(&self, factory: &str) -> Option<&SynthesizedProduct> {
        self.products.iter().find(|p| p.factory == factory)
    }
}

/// Discovers factory definitions and registers their product definitions
pub struct RegistryScanner<'a> {
    loader: &'a dyn TypeLoader,
}

impl<'a> RegistryScanner<'a> {
    /// Create a scanner loading class names through `loader`
    #[inline]
    pub fn new(loader: &'a dyn TypeLoader) -> Self {
        Self { loader }
    }

    /// Type metadata of the definition `name`, if it can be found
    fn discover_type(
        &self,
        registry: &dyn DefinitionRegistry,
        name: &str,
    ) -> Option<Arc<TypeDescriptor>> {
        if let Some(declared) = registry.declared_type(name) {
            return Some(declared);
        }

        let class_name = registry.class_name(name)?;
        match self.loader.load_type(&class_name) {
            Ok(descriptor) => Some(descriptor),
            Err(_err) => {
                #[cfg(feature = "logging")]
                trace!(
                    target: "wiring_factory",
                    component = name,
                    class = class_name.as_str(),
                    error = %_err,
                    "Class not in catalog, not a factory"
                );
                None
            }
        }
    }

    /// Classify the definition `name`
    pub fn classify(&self, registry: &dyn DefinitionRegistry, name: &str) -> Result<FactoryKind> {
        match self.discover_type(registry, name) {
            Some(descriptor) => resolve_product(&descriptor),
            None => Ok(FactoryKind::NotAFactory),
        }
    }

    /// Scan `registry` and register one product definition per factory.
    ///
    /// Fails with [`WiringError::TypeResolution`] for factories whose product
    /// type stays generic and with [`WiringError::DuplicateDefinition`] when a
    /// derived name is taken, by an existing definition or by the product of
    /// an earlier factory. On failure the registry is left untouched.
    pub fn scan(&self, registry: &mut dyn DefinitionRegistry) -> Result<ScanReport> {
        let names = registry.definition_names();

        #[cfg(feature = "logging")]
        debug!(
            target: "wiring_factory",
            definitions = names.len(),
            "Scanning definitions for wiring factories"
        );

        let mut products: Vec<SynthesizedProduct> = Vec::new();

        for factory in &names {
            let FactoryKind::Factory { product } = self.classify(&*registry, factory)? else {
                continue;
            };

            let name = derive_name(&product);
            let taken = registry.contains_definition(&name)
                || products.iter().any(|earlier| earlier.name == name);
            if taken {
                return Err(WiringError::DuplicateDefinition {
                    name,
                    factory: factory.clone(),
                });
            }

            #[cfg(feature = "logging")]
            trace!(
                target: "wiring_factory",
                factory = factory.as_str(),
                product = product.name(),
                name = name.as_str(),
                "Found wiring factory"
            );

            products.push(SynthesizedProduct {
                factory: factory.clone(),
                name,
                product,
            });
        }

        for synthesized in &products {
            #[cfg(feature = "logging")]
            debug!(
                target: "wiring_factory",
                component = synthesized.name.as_str(),
                factory = synthesized.factory.as_str(),
                "Registering factory product"
            );

            registry.register_definition(
                synthesized.name.clone(),
                synthesize(synthesized.product, &synthesized.factory),
            )?;
        }

        Ok(ScanReport {
            inspected: names.len(),
            products,
        })
    }
}
