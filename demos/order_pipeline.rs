//! Example: factories building orders from runtime input
//!
//! Run with:
//!   cargo run --example order_pipeline --features derive

use std::sync::Mutex;
use wiring_factory::{
    Autowired, ContainerBuilder, Result, Wire, WiringBridge, WiringFactory, WiringFactorySupport,
};

struct TaxTable {
    rate_percent: u32,
}

struct Warehouse {
    name: String,
}

#[derive(Default)]
struct AuditLog {
    lines: Mutex<Vec<String>>,
}

// Built by hand from a customer request, wired by the container
#[derive(Wire)]
#[wire(post_construct = "audit")]
struct Order {
    #[inject]
    tax_table: Autowired<TaxTable>,
    #[inject(name = "primaryWarehouse")]
    warehouse: Autowired<Warehouse>,
    #[inject(by_type)]
    log: Autowired<AuditLog>,
    customer: String,
    net_cents: u32,
}

impl Order {
    fn total_cents(&self) -> u32 {
        self.net_cents + self.net_cents * self.tax_table.rate_percent / 100
    }

    fn audit(&mut self) -> Result<()> {
        let line = format!(
            "{} ships from {} for {} cents",
            self.customer,
            self.warehouse.name,
            self.total_cents()
        );
        if let Ok(mut lines) = self.log.lines.lock() {
            lines.push(line);
        }
        Ok(())
    }
}

struct OrderFactory {
    support: WiringFactorySupport<Order>,
}

impl WiringFactory for OrderFactory {
    type Product = Order;

    fn bridge(&self) -> &WiringBridge {
        self.support.bridge()
    }
}

impl OrderFactory {
    fn place(&self, customer: &str, net_cents: u32) -> Result<Order> {
        self.wire(Order {
            tax_table: Autowired::new(),
            warehouse: Autowired::new(),
            log: Autowired::new(),
            customer: customer.to_owned(),
            net_cents,
        })
    }
}

fn main() -> Result<()> {
    println!("=== Order Pipeline Demo ===\n");

    let mut builder = ContainerBuilder::new();
    builder
        .singleton("taxTable", TaxTable { rate_percent: 20 })?
        .singleton("primaryWarehouse", Warehouse { name: "Rotterdam".into() })?
        .singleton("backupWarehouse", Warehouse { name: "Antwerp".into() })?
        .singleton("auditLog", AuditLog::default())?
        .factory("orderFactory", |c| {
            Ok(OrderFactory {
                support: WiringFactorySupport::from_container(c),
            })
        })?;
    let container = builder.build()?;

    println!("Registered components:");
    for name in container.definition_names() {
        let synthesized = container
            .definition(name)
            .is_some_and(|definition| definition.is_synthesized());
        println!("  {name}{}", if synthesized { " (factory product)" } else { "" });
    }

    let factory = container.get::<OrderFactory>()?;
    for (customer, net) in [("ada", 1_000), ("grace", 2_500)] {
        let order = factory.place(customer, net)?;
        println!("\nPlaced order for {}: {} cents", order.customer, order.total_cents());
    }

    // The product itself is only built by its factory
    if let Err(err) = container.get::<Order>() {
        println!("\nResolving Order directly: {err}");
    }

    let log = container.get::<AuditLog>()?;
    println!("\nAudit log:");
    if let Ok(lines) = log.lines.lock() {
        for line in lines.iter() {
            println!("  {line}");
        }
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
