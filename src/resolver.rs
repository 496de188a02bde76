//! Product type resolution
//!
//! Given a factory's descriptor, find where the `WiringFactory<T>`
//! capability is bound in its supertype graph and substitute the type
//! variables accumulated on the way down to a concrete `T`.
//!
//! ```rust
//! use wiring_factory::{factory_support, resolve_product, FactoryKind, TypeArg, TypeDescriptor, TypeKey};
//!
//! struct Ticket;
//! struct TicketFactory;
//! struct PriorityTicketFactory;
//!
//! let direct = TypeDescriptor::class::<TicketFactory>()
//!     .extends(factory_support(), [TypeArg::of::<Ticket>()])
//!     .build();
//!
//! // subclass of a concrete factory: nothing to re-declare
//! let subclass = TypeDescriptor::class::<PriorityTicketFactory>()
//!     .extends(&direct, [])
//!     .build();
//!
//! let expected = FactoryKind::Factory { product: TypeKey::of::<Ticket>() };
//! assert_eq!(resolve_product(&direct).unwrap(), expected);
//! assert_eq!(resolve_product(&subclass).unwrap(), expected);
//! ```

use crate::naming::derive_name;
use crate::types::{TypeArg, TypeDescriptor, TypeKey};
use crate::{Result, WiringError};

/// Classification of a type with respect to the factory capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryKind {
    /// The capability is not reachable from the type
    NotAFactory,
    /// The type manufactures `product`
    Factory { product: TypeKey },
}

impl FactoryKind {
    /// The product type, if this is a factory
    #[inline]
    pub fn product(&self) -> Option<TypeKey> {
        match self {
            Self::NotAFactory => None,
            Self::Factory { product } => Some(*product),
        }
    }
}

/// Type variable bindings of one level of the walk
type Bindings<'a> = Vec<(&'a str, TypeArg)>;

/// Resolve the product type manufactured by `factory`.
///
/// Returns [`FactoryKind::NotAFactory`] for types that never reach the
/// capability and [`WiringError::TypeResolution`] when they do but the
/// product type stays a type variable.
pub fn resolve_product(factory: &TypeDescriptor) -> Result<FactoryKind> {
    // the factory's own parameters are unbound
    let bindings: Bindings<'_> = Vec::new();

    match find_capability_arg(factory, &bindings) {
        None => Ok(FactoryKind::NotAFactory),
        Some(TypeArg::Concrete(product)) => Ok(FactoryKind::Factory { product }),
        Some(TypeArg::Var(variable)) => Err(WiringError::TypeResolution {
            factory: factory.class_name().to_owned(),
            variable,
        }),
    }
}

/// Product type of `factory`, `None` when it is not a factory
pub fn product_type_of(factory: &TypeDescriptor) -> Result<Option<TypeKey>> {
    resolve_product(factory).map(|kind| kind.product())
}

/// Derived component name of the product of `factory`, `None` when it is
/// not a factory
pub fn product_name_of(factory: &TypeDescriptor) -> Result<Option<String>> {
    Ok(product_type_of(factory)?.map(|product| derive_name(&product)))
}

/// Depth-first search in declaration order. The first path reaching the
/// capability wins.
fn find_capability_arg(ty: &TypeDescriptor, bindings: &Bindings<'_>) -> Option<TypeArg> {
    if ty.is_factory_capability() {
        let param = ty.params().first().map(String::as_str).unwrap_or("T");
        return Some(substitute(&TypeArg::var(param), bindings));
    }

    for supertype in ty.supertypes() {
        let parent = supertype.descriptor();
        let parent_bindings: Bindings<'_> = parent
            .params()
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let bound = match supertype.args().get(index) {
                    Some(arg) => substitute(arg, bindings),
                    None => TypeArg::var(param.as_str()),
                };
                (param.as_str(), bound)
            })
            .collect();

        if let Some(found) = find_capability_arg(parent, &parent_bindings) {
            return Some(found);
        }
    }

    None
}

fn substitute(arg: &TypeArg, bindings: &Bindings<'_>) -> TypeArg {
    match arg {
        TypeArg::Concrete(_) => arg.clone(),
        TypeArg::Var(name) => bindings
            .iter()
            .find(|(param, _)| *param == name.as_str())
            .map(|(_, bound)| bound.clone())
            .unwrap_or_else(|| arg.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{factory_capability, factory_support};
    use std::sync::Arc;

    struct BeanA;
    struct BeanB;

    // extends WiringFactorySupport<BeanA>
    struct BeanAFactory1;
    // implements WiringFactory<BeanA>
    struct BeanAFactory2;
    // extends BeanAFactory1
    struct BeanAFactory3;

    struct NotAFactory;

    fn factory1() -> Arc<TypeDescriptor> {
        TypeDescriptor::class::<BeanAFactory1>()
            .extends(factory_support(), [TypeArg::of::<BeanA>()])
            .build()
    }

    #[test]
    fn test_support_base() {
        let kind = resolve_product(&factory1()).unwrap();
        assert_eq!(kind.product(), Some(TypeKey::of::<BeanA>()));
    }

    #[test]
    fn test_direct_capability() {
        let factory = TypeDescriptor::class::<BeanAFactory2>()
            .extends(factory_capability(), [TypeArg::of::<BeanA>()])
            .build();
        assert_eq!(
            product_type_of(&factory).unwrap(),
            Some(TypeKey::of::<BeanA>())
        );
    }

    #[test]
    fn test_subclass_of_concrete_factory() {
        let factory = TypeDescriptor::class::<BeanAFactory3>()
            .extends(&factory1(), [])
            .build();
        assert_eq!(product_name_of(&factory).unwrap().as_deref(), Some("beanA"));
    }

    #[test]
    fn test_not_a_factory() {
        let plain = TypeDescriptor::class::<NotAFactory>().build();
        assert_eq!(resolve_product(&plain).unwrap(), FactoryKind::NotAFactory);
        assert_eq!(product_name_of(&plain).unwrap(), None);
    }

    #[test]
    fn test_bound_several_levels_up() {
        // Level1<X> : WiringFactorySupport<X>
        // Level2<Y> : Level1<Y>
        // Level3    : Level2<BeanB>
        // Level4    : Level3
        let level1 = TypeDescriptor::generic("levels::Level1")
            .param("X")
            .extends(factory_support(), [TypeArg::var("X")])
            .build();
        let level2 = TypeDescriptor::generic("levels::Level2")
            .param("Y")
            .extends(&level1, [TypeArg::var("Y")])
            .build();
        let level3 = TypeDescriptor::generic("levels::Level3")
            .extends(&level2, [TypeArg::of::<BeanB>()])
            .build();
        let level4 = TypeDescriptor::class::<BeanAFactory3>()
            .extends(&level3, [])
            .build();

        assert_eq!(
            product_type_of(&level4).unwrap(),
            Some(TypeKey::of::<BeanB>())
        );
    }

    #[test]
    fn test_reordered_parameters() {
        // Pair<K, V> : WiringFactorySupport<V>
        // Swapped<A, B> : Pair<B, A>
        // Fixed : Swapped<BeanA, BeanB>  => Pair<BeanB, BeanA> => BeanA
        let pair = TypeDescriptor::generic("pairs::Pair")
            .param("K")
            .param("V")
            .extends(factory_support(), [TypeArg::var("V")])
            .build();
        let swapped = TypeDescriptor::generic("pairs::Swapped")
            .param("A")
            .param("B")
            .extends(&pair, [TypeArg::var("B"), TypeArg::var("A")])
            .build();
        let fixed = TypeDescriptor::class::<BeanAFactory1>()
            .extends(&swapped, [TypeArg::of::<BeanA>(), TypeArg::of::<BeanB>()])
            .build();

        assert_eq!(product_type_of(&fixed).unwrap(), Some(TypeKey::of::<BeanA>()));
    }

    #[test]
    fn test_same_variable_name_at_each_level() {
        // the T of each level is a different variable
        let outer = TypeDescriptor::generic("shadow::Outer")
            .param("T")
            .param("U")
            .extends(factory_support(), [TypeArg::var("U")])
            .build();
        let inner = TypeDescriptor::generic("shadow::Inner")
            .param("T")
            .extends(&outer, [TypeArg::of::<BeanB>(), TypeArg::var("T")])
            .build();
        let fixed = TypeDescriptor::class::<BeanAFactory2>()
            .extends(&inner, [TypeArg::of::<BeanA>()])
            .build();

        assert_eq!(product_type_of(&fixed).unwrap(), Some(TypeKey::of::<BeanA>()));
    }

    #[test]
    fn test_through_capability_interface() {
        // Source<P> : WiringFactory<P>
        // Marker
        // Factory : Marker, Source<BeanB>
        let source = TypeDescriptor::generic("caps::Source")
            .param("P")
            .extends(factory_capability(), [TypeArg::var("P")])
            .build();
        let marker = TypeDescriptor::generic("caps::Marker").build();
        let factory = TypeDescriptor::class::<BeanAFactory2>()
            .extends(&marker, [])
            .extends(&source, [TypeArg::of::<BeanB>()])
            .build();

        assert_eq!(product_type_of(&factory).unwrap(), Some(TypeKey::of::<BeanB>()));
    }

    #[test]
    fn test_generic_base_registered_directly() {
        let err = resolve_product(factory_support()).unwrap_err();
        match err {
            WiringError::TypeResolution { factory, variable } => {
                assert_eq!(factory, crate::types::FACTORY_SUPPORT_CLASS);
                assert_eq!(variable, "T");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unbound_intermediate() {
        // Open<Q> : WiringFactorySupport<Q>, Leaf : Open (raw)
        let open = TypeDescriptor::generic("raw::Open")
            .param("Q")
            .extends(factory_support(), [TypeArg::var("Q")])
            .build();
        let leaf = TypeDescriptor::class::<BeanAFactory1>()
            .extends(&open, [])
            .build();

        let err = resolve_product(&leaf).unwrap_err();
        assert!(matches!(err, WiringError::TypeResolution { variable, .. } if variable == "Q"));
    }

    #[test]
    fn test_referentially_transparent() {
        let factory = factory1();
        let first = resolve_product(&factory).unwrap();
        let second = resolve_product(&factory).unwrap();
        assert_eq!(first, second);
    }
}
