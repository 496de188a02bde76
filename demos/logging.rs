//! Example demonstrating logging during assembly and wiring
//!
//! Run with pretty logging (development):
//! ```bash
//! cargo run --example logging --features logging-pretty
//! ```
//!
//! Run with JSON logging (production):
//! ```bash
//! cargo run --example logging --features logging-pretty,logging-json
//! ```
//!
//! `RUST_LOG=wiring_factory=trace` shows per-resolution detail.

use wiring_factory::{
    Autowired, ContainerBuilder, TypeArg, TypeDescriptor, Wire, WiringBridge, WiringFactory,
    factory_support,
};

#[allow(dead_code)]
struct Database {
    url: String,
}

#[allow(dead_code)]
#[derive(Wire)]
struct Session {
    #[inject]
    database: Autowired<Database>,
    user: String,
}

struct SessionFactory {
    bridge: WiringBridge,
}

impl WiringFactory for SessionFactory {
    type Product = Session;

    fn bridge(&self) -> &WiringBridge {
        &self.bridge
    }
}

fn main() {
    wiring_factory::logging::init();

    println!("=== Wiring Factory Logging Demo ===\n");

    let mut builder = ContainerBuilder::new();

    // Known to the container only by class name (logs: "Registering component")
    builder.catalog().register(
        TypeDescriptor::generic("app::SessionFactory")
            .extends(factory_support(), [TypeArg::of::<Session>()])
            .build(),
    );

    let registered = builder
        .singleton("database", Database { url: "postgres://localhost/app".into() })
        .and_then(|b| {
            b.component("sessionFactory", "app::SessionFactory", |c| {
                Ok(SessionFactory { bridge: c.bridge() })
            })
        })
        // Unknown to the catalog: skipped by the scan (logs at TRACE)
        .and_then(|b| b.singleton("legacy", String::from("not a factory")));
    if let Err(err) = registered {
        eprintln!("registration failed: {err}");
        return;
    }

    // logs: "Assembling container", "Registering factory product", "Container assembled"
    let container = match builder.build() {
        Ok(container) => container,
        Err(err) => {
            eprintln!("assembly failed: {err}");
            return;
        }
    };

    // logs: "Wiring factory-made instance", "Factory-made instance wired"
    let session = container
        .get::<SessionFactory>()
        .and_then(|factory| factory.wire(Session { database: Autowired::new(), user: "ada".into() }));
    match session {
        Ok(session) => println!("\nSession for {} wired", session.user),
        Err(err) => eprintln!("wiring failed: {err}"),
    }

    println!("\n=== Demo Complete ===");
}
