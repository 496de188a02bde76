//! Canonical component names

use crate::types::{TypeKey, simple_name};

/// Canonical component name of a type: its simple name with the first
/// character lower-cased.
///
/// ```rust
/// use wiring_factory::{derive_name, TypeKey};
///
/// mod billing {
///     pub struct OrderProcessor;
/// }
///
/// assert_eq!(derive_name(&TypeKey::of::<billing::OrderProcessor>()), "orderProcessor");
/// ```
pub fn derive_name(ty: &TypeKey) -> String {
    lower_camel(ty.simple_name())
}

/// Canonical component name for a raw type or class name
pub fn derive_name_from_type_name(type_name: &str) -> String {
    lower_camel(simple_name(type_name))
}

/// Upper camel case to lower camel case. Only the leading character changes,
/// so acronyms keep their remaining capitals (`HTTPClient` -> `hTTPClient`).
fn lower_camel(simple: &str) -> String {
    let mut chars = simple.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
