#![no_main]

//! Fuzz target for product type resolution and name derivation
//!
//! Builds arbitrary supertype chains over the factory capability and checks
//! that resolution never panics and is deterministic.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;
use wiring_factory::{
    derive_name_from_type_name, factory_capability, factory_support, resolve_product, TypeArg,
    TypeDescriptor, WiringError,
};

struct ProductA;
struct ProductB;

#[derive(Debug, Arbitrary)]
enum Arg {
    ProductA,
    ProductB,
    Var(u8),
}

#[derive(Debug, Arbitrary)]
struct Level {
    params: u8,
    /// Which earlier level to extend; 0 is the capability, 1 the support base
    parent: u8,
    args: Vec<Arg>,
}

#[derive(Debug, Arbitrary)]
struct Input {
    levels: Vec<Level>,
    type_name: String,
}

fn var(index: u8) -> String {
    format!("T{}", index % 4)
}

fuzz_target!(|input: Input| {
    let mut built: Vec<Arc<TypeDescriptor>> = vec![
        Arc::clone(factory_capability()),
        Arc::clone(factory_support()),
    ];

    for (i, level) in input.levels.iter().take(16).enumerate() {
        let parent = &built[level.parent as usize % built.len()];
        let mut builder = TypeDescriptor::generic(format!("fuzz::Level{i}"));
        for p in 0..level.params % 4 {
            builder = builder.param(var(p));
        }
        let args = level.args.iter().take(4).map(|arg| match arg {
            Arg::ProductA => TypeArg::of::<ProductA>(),
            Arg::ProductB => TypeArg::of::<ProductB>(),
            Arg::Var(v) => TypeArg::var(var(*v)),
        });
        let descriptor = builder.extends(parent, args).build();
        built.push(descriptor);
    }

    for descriptor in &built {
        let first = resolve_product(descriptor);
        let second = resolve_product(descriptor);
        match (&first, &second) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(WiringError::TypeResolution { .. }), Err(WiringError::TypeResolution { .. })) => {}
            _ => panic!("non-deterministic resolution: {first:?} vs {second:?}"),
        }
        if !descriptor.is_factory() {
            assert!(matches!(first, Ok(kind) if kind.product().is_none()));
        }
    }

    let name = derive_name_from_type_name(&input.type_name);
    assert_eq!(name, derive_name_from_type_name(&input.type_name));
});
