//! Factory-made instances wired by an assembled container

use std::sync::{Arc, Mutex};
use std::thread;
use wiring_factory::{
    factory_support, Autowire, Autowired, Container, ContainerBuilder, Scope, TypeArg,
    TypeDescriptor, TypeKey, Wire, WiringBridge, WiringError, WiringFactory, WiringFactorySupport,
};

#[derive(Wire)]
#[wire(post_construct = "set_result")]
struct BeanA {
    #[inject]
    result: Autowired<Mutex<String>>,
    value: String,
}

impl BeanA {
    fn new(value: impl Into<String>) -> Self {
        Self {
            result: Autowired::new(),
            value: value.into(),
        }
    }

    fn set_result(&mut self) -> wiring_factory::Result<()> {
        *self.result.require::<Self>("result")?.lock().unwrap() = self.value.clone();
        Ok(())
    }
}

struct BeanAFactory {
    support: WiringFactorySupport<BeanA>,
    other_bean: Arc<String>,
}

impl WiringFactory for BeanAFactory {
    type Product = BeanA;

    fn bridge(&self) -> &WiringBridge {
        self.support.bridge()
    }
}

impl BeanAFactory {
    fn from_container(container: &Container) -> wiring_factory::Result<Self> {
        Ok(Self {
            support: WiringFactorySupport::from_container(container),
            other_bean: container.get_named("otherBean")?,
        })
    }

    fn make(&self, value: &str) -> wiring_factory::Result<BeanA> {
        assert_eq!(self.other_bean.as_str(), "something");
        self.wire(BeanA::new(value))
    }
}

fn parent_config() -> ContainerBuilder {
    let mut builder = ContainerBuilder::new();
    builder
        .singleton("result", Mutex::new(String::from("before")))
        .unwrap();
    builder
        .singleton("otherBean", String::from("something"))
        .unwrap();
    builder
}

fn result_of(container: &Container) -> String {
    container
        .get_named::<Mutex<String>>("result")
        .unwrap()
        .lock()
        .unwrap()
        .clone()
}

fn assert_before_after_again(container: &Container) {
    assert_eq!(result_of(container), "before");

    let factory = container.get_named::<BeanAFactory>("beanAFactory").unwrap();

    let bean = factory.make("after").unwrap();
    assert_eq!(bean.value, "after");
    assert_eq!(result_of(container), "after");

    factory.make("again").unwrap();
    assert_eq!(result_of(container), "again");
}

fn bean_a_factory_descriptor(class_name: &str) -> Arc<TypeDescriptor> {
    TypeDescriptor::generic(class_name)
        .extends(factory_support(), [TypeArg::of::<BeanA>()])
        .build()
}

#[test]
fn static_registration_wires_products() {
    let mut builder = parent_config();
    builder
        .factory("beanAFactory", BeanAFactory::from_container)
        .unwrap();
    let container = builder.build().unwrap();

    assert_before_after_again(&container);
}

#[test]
fn products_share_dependencies_but_not_constructor_state() {
    let mut builder = parent_config();
    builder
        .factory("beanAFactory", BeanAFactory::from_container)
        .unwrap();
    let container = builder.build().unwrap();
    assert!(container.definition("beanA").unwrap().is_synthesized());

    let factory = container.get::<BeanAFactory>().unwrap();
    let x = factory.make("x").unwrap();
    let y = factory.make("y").unwrap();

    assert_eq!(x.value, "x");
    assert_eq!(y.value, "y");
    assert!(Arc::ptr_eq(x.result.get().unwrap(), y.result.get().unwrap()));

    *container
        .get_named::<Mutex<String>>("result")
        .unwrap()
        .lock()
        .unwrap() = String::from("changed");
    assert_eq!(x.result.lock().unwrap().as_str(), "changed");
    assert_eq!(y.result.lock().unwrap().as_str(), "changed");
    assert_eq!(x.value, "x");
}

#[test]
fn class_name_registration_wires_products() {
    let mut builder = parent_config();
    builder
        .catalog()
        .register(bean_a_factory_descriptor("sfs::BeanAFactory"));
    builder
        .component("beanAFactory", "sfs::BeanAFactory", BeanAFactory::from_container)
        .unwrap();
    let container = builder.build().unwrap();

    assert_before_after_again(&container);
}

#[test]
fn both_registration_styles_synthesize_the_same_definition() {
    let mut by_type = parent_config();
    by_type
        .factory("beanAFactory", BeanAFactory::from_container)
        .unwrap();
    let by_type = by_type.build().unwrap();

    let mut by_name = parent_config();
    by_name
        .catalog()
        .register(bean_a_factory_descriptor("sfs::BeanAFactory"));
    by_name
        .component("beanAFactory", "sfs::BeanAFactory", BeanAFactory::from_container)
        .unwrap();
    let by_name = by_name.build().unwrap();

    let a = by_type.definition("beanA").unwrap();
    let b = by_name.definition("beanA").unwrap();
    for definition in [a, b] {
        assert_eq!(definition.target(), Some(TypeKey::of::<BeanA>()));
        assert_eq!(definition.scope(), Scope::Prototype);
        assert!(definition.is_lazy());
        assert_eq!(definition.autowire(), Autowire::Constructor);
        assert_eq!(definition.class_name(), Some(std::any::type_name::<BeanA>()));
    }
    assert_eq!(by_type.definition_names(), by_name.definition_names());
}

#[test]
fn subclass_of_factory_found_through_catalog() {
    let mut builder = parent_config();
    let base = bean_a_factory_descriptor("sfs::BeanAFactory");
    let special = TypeDescriptor::generic("sfs::SpecialBeanAFactory")
        .extends(&base, [])
        .build();
    builder.catalog().register(base);
    builder.catalog().register(special);
    builder
        .component(
            "beanAFactory",
            "sfs::SpecialBeanAFactory",
            BeanAFactory::from_container,
        )
        .unwrap();
    let container = builder.build().unwrap();

    assert!(container.definition("beanA").unwrap().is_synthesized());
    assert_before_after_again(&container);
}

#[test]
fn generic_base_registered_directly_fails_assembly() {
    let mut builder = parent_config();
    builder.catalog().register(
        TypeDescriptor::generic("sfs::AnyFactory")
            .param("T")
            .extends(factory_support(), [TypeArg::var("T")])
            .build(),
    );
    builder
        .component("anyFactory", "sfs::AnyFactory", BeanAFactory::from_container)
        .unwrap();

    match builder.build() {
        Err(WiringError::TypeResolution { factory, variable }) => {
            assert_eq!(factory, "sfs::AnyFactory");
            assert_eq!(variable, "T");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn existing_product_name_fails_assembly() {
    let mut builder = parent_config();
    builder.singleton("beanA", 1u8).unwrap();
    builder
        .factory("beanAFactory", BeanAFactory::from_container)
        .unwrap();

    let err = builder.build().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("`beanA`"));
    assert!(message.contains("`beanAFactory`"));
}

#[test]
fn unknown_class_name_is_not_a_factory() {
    let mut builder = parent_config();
    builder
        .component("beanAFactory", "sfs::Unloadable", BeanAFactory::from_container)
        .unwrap();
    let container = builder.build().unwrap();

    assert!(!container.contains("beanA"));
    assert!(container.scan_report().products.is_empty());
    // still usable as a plain component
    assert_before_after_again(&container);
}

#[test]
fn scan_can_be_disabled() {
    let mut builder = ContainerBuilder::with_options(
        wiring_factory::AssemblyOptions::new().scan_factories(false),
    );
    builder
        .singleton("result", Mutex::new(String::from("before")))
        .unwrap();
    builder
        .singleton("otherBean", String::from("something"))
        .unwrap();
    builder
        .factory("beanAFactory", BeanAFactory::from_container)
        .unwrap();
    let container = builder.build().unwrap();

    assert!(!container.contains("beanA"));
    assert_before_after_again(&container);
}

#[test]
fn lazy_configuration_still_discovers_factory() {
    let mut builder = ContainerBuilder::new();
    builder
        .lazy("result", |_| Ok(Mutex::new(String::from("before"))))
        .unwrap();
    builder
        .lazy("otherBean", |_| Ok(String::from("something")))
        .unwrap();
    builder
        .lazy_factory("beanAFactory", BeanAFactory::from_container)
        .unwrap();
    let container = builder.build().unwrap();

    assert!(container.definition("beanA").unwrap().is_synthesized());
    let factory = container.get::<BeanAFactory>().unwrap();
    assert_eq!(result_of(&container), "before");

    let first = factory.make("after").unwrap();
    assert_eq!(result_of(&container), "after");
    assert_eq!(first.result.lock().unwrap().as_str(), "after");

    let second = factory.make("again").unwrap();
    assert_eq!(result_of(&container), "again");
    assert_eq!(first.result.lock().unwrap().as_str(), "again");
    assert_eq!(second.result.lock().unwrap().as_str(), "again");
}

#[derive(Wire)]
struct Stamp {
    #[inject(by_type)]
    journal: Autowired<Mutex<Vec<u32>>>,
    serial: u32,
}

struct StampFactory {
    support: WiringFactorySupport<Stamp>,
}

impl WiringFactory for StampFactory {
    type Product = Stamp;

    fn bridge(&self) -> &WiringBridge {
        self.support.bridge()
    }
}

#[test]
fn concurrent_wiring() {
    let mut builder = ContainerBuilder::new();
    builder
        .singleton("journal", Mutex::new(Vec::<u32>::new()))
        .unwrap();
    builder
        .factory("stampFactory", |c| {
            Ok(StampFactory {
                support: WiringFactorySupport::from_container(c),
            })
        })
        .unwrap();
    let container = builder.build().unwrap();
    let factory = container.get::<StampFactory>().unwrap();

    let handles: Vec<_> = (0..8u32)
        .map(|worker| {
            let factory = Arc::clone(&factory);
            thread::spawn(move || {
                for i in 0..50 {
                    let stamp = factory
                        .wire(Stamp {
                            journal: Autowired::new(),
                            serial: worker * 100 + i,
                        })
                        .unwrap();
                    stamp.journal.lock().unwrap().push(stamp.serial);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let journal = container.get::<Mutex<Vec<u32>>>().unwrap();
    let mut serials = journal.lock().unwrap().clone();
    serials.sort_unstable();
    serials.dedup();
    assert_eq!(serials.len(), 400);
}

#[test]
fn wiring_after_container_dropped() {
    let mut builder = parent_config();
    builder
        .factory("beanAFactory", BeanAFactory::from_container)
        .unwrap();
    let container = builder.build().unwrap();
    let factory = container.get::<BeanAFactory>().unwrap();
    drop(container);

    assert!(matches!(
        factory.make("late"),
        Err(WiringError::ContainerDropped)
    ));
}
