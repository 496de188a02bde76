//! Factory capability
//!
//! A wiring factory is a container component that builds instances of its
//! product type by hand, usually from runtime arguments, and hands each one
//! to its [`WiringBridge`] so the container injects it.
//!
//! Factories are discovered while the container is assembled and a lazy
//! prototype definition is registered for their product type, so the
//! container knows the type exists without ever building it itself.
//!
//! ## Example
//!
//! ```rust
//! use wiring_factory::{
//!     Autowired, ContainerBuilder, Resolver, ResolverExt, Result, WiringBridge,
//!     WiringFactory, WiringFactorySupport, Wireable,
//! };
//!
//! struct Greeting {
//!     text: String,
//!     punctuation: Autowired<char>,
//! }
//!
//! impl Wireable for Greeting {
//!     fn inject(&mut self, resolver: &dyn Resolver) -> Result<()> {
//!         self.punctuation.inject(resolver.resolve_for_field("punctuation")?);
//!         Ok(())
//!     }
//! }
//!
//! struct GreetingFactory {
//!     support: WiringFactorySupport<Greeting>,
//! }
//!
//! impl WiringFactory for GreetingFactory {
//!     type Product = Greeting;
//!
//!     fn bridge(&self) -> &WiringBridge {
//!         self.support.bridge()
//!     }
//! }
//!
//! impl GreetingFactory {
//!     fn make(&self, name: &str) -> Result<Greeting> {
//!         self.wire(Greeting {
//!             text: format!("Hello {name}"),
//!             punctuation: Autowired::new(),
//!         })
//!     }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.singleton("punctuation", '!')?;
//! builder.factory("greetingFactory", |container| {
//!     Ok(GreetingFactory {
//!         support: WiringFactorySupport::from_container(container),
//!     })
//! })?;
//! let container = builder.build()?;
//!
//! let factory = container.get_named::<GreetingFactory>("greetingFactory")?;
//! let greeting = factory.make("world")?;
//! assert_eq!(format!("{}{}", greeting.text, *greeting.punctuation), "Hello world!");
//! assert!(container.contains("greeting"));
//! # Ok::<(), wiring_factory::WiringError>(())
//! ```

use crate::types::{factory_capability, TypeArg, TypeDescriptor};
use crate::wiring::{WiringBridge, Wireable};
use crate::{Container, Injectable, Result};
use std::marker::PhantomData;
use std::sync::Arc;

/// A component that builds and wires instances of [`Product`](Self::Product)
pub trait WiringFactory: Injectable {
    /// The type this factory produces
    type Product: Wireable;

    /// The bridge used to wire products
    fn bridge(&self) -> &WiringBridge;

    /// Inject the dependencies of `product` and run its post-construct hook
    fn wire(&self, product: Self::Product) -> Result<Self::Product> {
        self.bridge().wire(product)
    }
}

/// Reusable base for factories of `T`.
///
/// Holds the bridge; embed it and forward [`WiringFactory::bridge`] to it.
pub struct WiringFactorySupport<T> {
    bridge: WiringBridge,
    _product: PhantomData<fn() -> T>,
}

impl<T: Wireable> WiringFactorySupport<T> {
    /// Support over an existing bridge
    #[inline]
    pub fn new(bridge: WiringBridge) -> Self {
        Self {
            bridge,
            _product: PhantomData,
        }
    }

    /// Support wired to `container`
    #[inline]
    pub fn from_container(container: &Container) -> Self {
        Self::new(container.bridge())
    }

    /// Wire `product`
    #[inline]
    pub fn wire(&self, product: T) -> Result<T> {
        self.bridge.wire(product)
    }

    #[inline]
    pub fn bridge(&self) -> &WiringBridge {
        &self.bridge
    }
}

impl<T> Clone for WiringFactorySupport<T> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge.clone(),
            _product: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for WiringFactorySupport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WiringFactorySupport")
            .field("product", &std::any::type_name::<T>())
            .field("bridge", &self.bridge)
            .finish()
    }
}

impl<T: Wireable> WiringFactory for WiringFactorySupport<T> {
    type Product = T;

    #[inline]
    fn bridge(&self) -> &WiringBridge {
        &self.bridge
    }
}

impl TypeDescriptor {
    /// Static descriptor of the factory type `F`: `F : WiringFactory<F::Product>`
    pub fn of_factory<F: WiringFactory>() -> Arc<TypeDescriptor> {
        TypeDescriptor::class::<F>()
            .extends(factory_capability(), [TypeArg::of::<F::Product>()])
            .build()
    }
}
