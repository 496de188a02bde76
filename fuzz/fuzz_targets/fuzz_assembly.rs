#![no_main]

//! Fuzz target for container assembly
//!
//! Registers arbitrary mixes of plain components and factories under
//! arbitrary names, then checks that a failed build reports a name clash
//! and a successful one registered exactly one product per factory.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wiring_factory::{
    ContainerBuilder, Resolver, Result, WiringBridge, WiringError, WiringFactory,
    WiringFactorySupport, Wireable,
};

struct Widget;

impl Wireable for Widget {
    fn inject(&mut self, _resolver: &dyn Resolver) -> Result<()> {
        Ok(())
    }
}

struct WidgetFactory {
    support: WiringFactorySupport<Widget>,
}

impl WiringFactory for WidgetFactory {
    type Product = Widget;

    fn bridge(&self) -> &WiringBridge {
        self.support.bridge()
    }
}

#[derive(Debug, Arbitrary)]
enum Registration {
    Value(String, u32),
    Factory(String),
}

fuzz_target!(|registrations: Vec<Registration>| {
    let mut builder = ContainerBuilder::new();
    let mut factories = 0;

    for registration in registrations.iter().take(32) {
        let added = match registration {
            Registration::Value(name, value) => builder.singleton(name.clone(), *value).is_ok(),
            Registration::Factory(name) => builder
                .factory(name.clone(), |c| {
                    Ok(WidgetFactory {
                        support: WiringFactorySupport::from_container(c),
                    })
                })
                .is_ok(),
        };
        if added && matches!(registration, Registration::Factory(_)) {
            factories += 1;
        }
    }

    let registered = builder.len();
    match builder.build() {
        Ok(container) => {
            assert!(factories <= 1);
            assert_eq!(container.scan_report().products.len(), factories);
            assert_eq!(container.len(), registered + factories);
        }
        Err(WiringError::DuplicateDefinition { name, .. }) => assert_eq!(name, "widget"),
        Err(other) => panic!("unexpected assembly error: {other}"),
    }
});
