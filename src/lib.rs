//! # wiring-factory - Container-wired instances built by hand
//!
//! Some components need runtime arguments the container cannot supply, so
//! application code has to call `new` itself. Those instances still want
//! their other dependencies injected and their post-construct hook run.
//!
//! A *wiring factory* is a container component that builds such instances
//! and passes each one through its [`WiringBridge`], which runs the
//! container's injection pass on it. While the container is assembled every
//! factory is discovered, its product type is resolved through its generic
//! supertypes, and a lazy prototype definition for the product is registered
//! under the product's lower-camel name.
//!
//! ## Features
//!
//! - **Product discovery** - From static factory metadata or from class
//!   names looked up in a [`TypeCatalog`]
//! - **Generic resolution** - Product types bound anywhere up the supertype
//!   chain, through renamed and reordered parameters
//! - **All-or-nothing assembly** - Name collisions and unresolvable
//!   factories abort the build and leave nothing half-registered
//! - **Name-first injection** - Field name, then type, like the container
//! - **`#[derive(Wire)]`** - Generated [`Wireable`] impls
//! - **Observable** - Optional tracing integration with JSON or pretty output
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Mutex;
//! use wiring_factory::{
//!     Autowired, ContainerBuilder, Wire, WiringBridge, WiringFactory, WiringFactorySupport,
//! };
//!
//! #[derive(Wire)]
//! #[wire(post_construct = "record")]
//! struct Shipment {
//!     #[inject]
//!     log: Autowired<Mutex<Vec<String>>>,
//!     parcel: String,
//! }
//!
//! impl Shipment {
//!     fn record(&mut self) -> wiring_factory::Result<()> {
//!         self.log.lock().unwrap().push(self.parcel.clone());
//!         Ok(())
//!     }
//! }
//!
//! struct ShipmentFactory {
//!     support: WiringFactorySupport<Shipment>,
//! }
//!
//! impl WiringFactory for ShipmentFactory {
//!     type Product = Shipment;
//!
//!     fn bridge(&self) -> &WiringBridge {
//!         self.support.bridge()
//!     }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.singleton("log", Mutex::new(Vec::<String>::new()))?;
//! builder.factory("shipmentFactory", |c| {
//!     Ok(ShipmentFactory { support: WiringFactorySupport::from_container(c) })
//! })?;
//! let container = builder.build()?;
//!
//! // registered by the factory scan
//! assert!(container.definition("shipment").unwrap().is_synthesized());
//!
//! let factory = container.get::<ShipmentFactory>()?;
//! let shipment = factory.wire(Shipment { log: Autowired::new(), parcel: "books".into() })?;
//! assert_eq!(shipment.parcel, "books");
//! assert_eq!(*container.get::<Mutex<Vec<String>>>()?.lock().unwrap(), ["books"]);
//! # Ok::<(), wiring_factory::WiringError>(())
//! ```
//!
//! ## Class-name discovery
//!
//! Components registered by class name are typed through the catalog:
//!
//! ```rust
//! use wiring_factory::{
//!     factory_support, ContainerBuilder, Resolver, Result, TypeArg, TypeDescriptor,
//!     Wireable, WiringBridge, WiringFactory,
//! };
//!
//! struct Label;
//! impl Wireable for Label {
//!     fn inject(&mut self, _: &dyn Resolver) -> Result<()> { Ok(()) }
//! }
//!
//! struct LabelPrinter { bridge: WiringBridge }
//! impl WiringFactory for LabelPrinter {
//!     type Product = Label;
//!     fn bridge(&self) -> &WiringBridge { &self.bridge }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.catalog().register(
//!     TypeDescriptor::generic("shop::LabelPrinter")
//!         .extends(factory_support(), [TypeArg::of::<Label>()])
//!         .build(),
//! );
//! builder.component("labelPrinter", "shop::LabelPrinter", |c| {
//!     Ok(LabelPrinter { bridge: c.bridge() })
//! })?;
//! let container = builder.build()?;
//! assert!(container.contains("label"));
//! # Ok::<(), wiring_factory::WiringError>(())
//! ```

extern crate self as wiring_factory;

mod catalog;
mod config;
mod container;
mod definition;
mod error;
mod factory;
#[cfg(feature = "logging")]
pub mod logging;
mod naming;
mod provider;
mod registry;
mod resolver;
mod scanner;
mod types;
mod wiring;

pub use catalog::*;
pub use config::*;
pub use container::*;
pub use definition::*;
pub use error::*;
pub use factory::*;
pub use naming::*;
pub use provider::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
pub use types::*;
pub use wiring::*;

#[cfg(feature = "derive")]
pub use wiring_factory_derive::Wire;

// Re-export tracing macros for convenience when logging feature is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

pub use std::sync::Arc;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Autowired, Container, ContainerBuilder, Injectable, Resolver, ResolverExt, Result,
        Wireable, WiringBridge, WiringError, WiringFactory, WiringFactorySupport,
    };
    #[cfg(feature = "derive")]
    pub use crate::Wire;
    pub use std::sync::Arc;
}
