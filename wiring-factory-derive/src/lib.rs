//! Derive macro for wiring-factory
//!
//! `#[derive(Wire)]` implements `wiring_factory::Wireable` for a struct with
//! named fields, so instances built by a factory can be handed to the
//! container for injection.
//!
//! # Example
//!
//! ```rust,ignore
//! use wiring_factory::{Autowired, Wire};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Wire)]
//! #[wire(post_construct = "publish")]
//! struct Report {
//!     // component named `sink`, or the only `Mutex<String>`
//!     #[inject]
//!     sink: Autowired<Mutex<String>>,
//!     #[inject(name = "reportTitle")]
//!     title: Autowired<String>,
//!     #[inject(by_type)]
//!     clock: Autowired<Clock>,
//!     #[inject(optional)]
//!     cache: Option<Arc<Cache>>,
//!     // left alone
//!     body: String,
//! }
//!
//! impl Report {
//!     fn publish(&mut self) -> wiring_factory::Result<()> {
//!         *self.sink.lock().unwrap() = self.body.clone();
//!         Ok(())
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, LitStr, Type};

/// Derive `wiring_factory::Wireable`.
///
/// # Field attributes
///
/// - `#[inject]` - The component named like the field, otherwise the only
///   component of the slot's type.
/// - `#[inject(name = "...")]` - The component with this name.
/// - `#[inject(by_type)]` - The only component of the slot's type.
/// - `#[inject(optional)]` - Combine with any of the above; a missing
///   component leaves the slot empty instead of failing.
///
/// Injected fields must be `Autowired<T>`, or `Option<Arc<T>>` when optional.
///
/// # Struct attributes
///
/// - `#[wire(post_construct = "method")]` - Call `self.method()` after
///   injection. The method takes `&mut self` and returns
///   `wiring_factory::Result<()>`.
#[proc_macro_derive(Wire, attributes(inject, wire))]
pub fn derive_wire(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Wire can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Wire can only be derived for structs",
            ));
        }
    };

    let mut statements = Vec::new();
    for field in fields {
        let Some(inject) = parse_inject_attr(&field.attrs)? else {
            continue;
        };
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        statements.push(injection_statement(field_name, &field.ty, &inject)?);
    }

    let unused_resolver = statements.is_empty().then(|| quote! { let _ = resolver; });

    let post_construct = parse_post_construct(&input.attrs)?.map(|method| {
        quote! {
            fn post_construct(&mut self) -> ::wiring_factory::Result<()> {
                self.#method()
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::wiring_factory::Wireable for #name #ty_generics #where_clause {
            fn inject(
                &mut self,
                resolver: &dyn ::wiring_factory::Resolver,
            ) -> ::wiring_factory::Result<()> {
                #[allow(unused_imports)]
                use ::wiring_factory::ResolverExt as _;
                #unused_resolver
                #(#statements)*
                Ok(())
            }

            #post_construct
        }
    })
}

// =============================================================================
// Attributes
// =============================================================================

/// How a slot finds its component
enum Lookup {
    /// Name of the field first, type second
    Field,
    Named(LitStr),
    ByType,
}

struct InjectAttr {
    lookup: Lookup,
    optional: bool,
}

fn parse_inject_attr(attrs: &[Attribute]) -> syn::Result<Option<InjectAttr>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("inject")) else {
        return Ok(None);
    };

    let mut parsed = InjectAttr {
        lookup: Lookup::Field,
        optional: false,
    };
    if attr.meta.require_path_only().is_ok() {
        return Ok(Some(parsed));
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("optional") {
            parsed.optional = true;
            return Ok(());
        }
        if !matches!(parsed.lookup, Lookup::Field) {
            return Err(meta.error("`name` and `by_type` are mutually exclusive"));
        }
        if meta.path.is_ident("by_type") {
            parsed.lookup = Lookup::ByType;
            Ok(())
        } else if meta.path.is_ident("name") {
            parsed.lookup = Lookup::Named(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("expected `name = \"...\"`, `by_type` or `optional`"))
        }
    })?;

    Ok(Some(parsed))
}

fn parse_post_construct(attrs: &[Attribute]) -> syn::Result<Option<Ident>> {
    let mut method = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("wire")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("post_construct") {
                let name: LitStr = meta.value()?.parse()?;
                method = Some(name.parse::<Ident>()?);
                Ok(())
            } else {
                Err(meta.error("expected `post_construct = \"method\"`"))
            }
        })?;
    }
    Ok(method)
}

// =============================================================================
// Code generation
// =============================================================================

fn injection_statement(
    field_name: &Ident,
    field_type: &Type,
    inject: &InjectAttr,
) -> syn::Result<proc_macro2::TokenStream> {
    let field_str = field_name.to_string();

    let (slot, inner) = if let Some(inner) = generic_arg_of(field_type, "Autowired") {
        (Slot::Autowired, inner)
    } else if let Some(inner) = generic_arg_of(field_type, "Option")
        .and_then(|option| generic_arg_of(option, "Arc"))
    {
        (Slot::OptionArc, inner)
    } else {
        return Err(syn::Error::new_spanned(
            field_type,
            "Fields marked with #[inject] must have type Autowired<T> or Option<Arc<T>>",
        ));
    };

    if matches!(slot, Slot::OptionArc) && !inject.optional {
        return Err(syn::Error::new_spanned(
            field_type,
            "Option<Arc<T>> fields must be marked #[inject(optional)]",
        ));
    }

    let lookup = match &inject.lookup {
        Lookup::Field => quote! { resolver.resolve_for_field::<#inner>(#field_str) },
        Lookup::Named(name) => quote! { resolver.resolve_named::<#inner>(#name) },
        Lookup::ByType => quote! { resolver.resolve::<#inner>() },
    };

    Ok(match (slot, inject.optional) {
        (Slot::Autowired, false) => quote! {
            self.#field_name.inject(#lookup?);
        },
        (Slot::Autowired, true) => quote! {
            if let ::std::option::Option::Some(component) =
                ::wiring_factory::not_found_as_none(#lookup)?
            {
                self.#field_name.inject(component);
            }
        },
        (Slot::OptionArc, _) => quote! {
            self.#field_name = ::wiring_factory::not_found_as_none(#lookup)?;
        },
    })
}

enum Slot {
    Autowired,
    OptionArc,
}

/// `T` from `Wrapper<T>`, matching on the last path segment
fn generic_arg_of<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
