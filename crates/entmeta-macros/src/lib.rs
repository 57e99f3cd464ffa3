//! Procedural macros for entmeta.
//!
//! `entmeta-macros` is the **compile-time registration layer**. It turns Rust
//! structs and enums into described types by generating a static
//! `TypeDescriptor` and the instance-access glue the introspection stages
//! need.
//!
//! - **Entities**: `#[derive(Entity)]` produces `Reflect`, `Entity` and
//!   `ToValue` implementations: members, accessors, annotations and the
//!   supertype link.
//! - **Enumerations**: `#[derive(Enumeration)]` produces `Reflect`,
//!   `Enumeration` and `ToValue` implementations for unit-only enums.
//!
//! These macros are used by application crates via the `entmeta` facade.
//! Generated code refers to `::entmeta_core`, so that crate must be a
//! dependency of the deriving crate.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;

mod parse;
mod validate;

use parse::{AccessorDef, AnnotationDef, EntityDef, EnumDef, FieldDef, parse_entity, parse_enumeration};

/// Derive macro for the `Entity` trait.
///
/// This macro generates implementations for:
/// - `Reflect`: a static `TypeDescriptor` with members, accessors and annotations
/// - `Entity`: accessor invocation and direct member reads, delegating to the
///   `parent` field for anything declared by a supertype
/// - `ToValue`: an entity held by another entity reads as its identifier
///
/// # Struct attributes
///
/// - `#[entmeta(name = "...")]` - Override the descriptor name (defaults to the struct name)
/// - `#[entmeta(abstract)]` - Describe an abstract class
/// - `#[entmeta(extends = Path)]` - Set the supertype; requires a `parent` field of that type
/// - `#[entmeta(annotation = "Kind")]` - Add a type-level annotation
/// - `#[entmeta(annotation(kind = "Table", name = "orders"))]` - Annotation with attributes
/// - `#[entmeta(accessor(method = "get_x", returns = T, id, fallible, annotation = "..."))]` -
///   Declare a read accessor backed by an inherent method; `fallible` methods return
///   `Result<T, E>`
///
/// # Field attributes
///
/// - `#[entmeta(id)]` - Mark the identifier member
/// - `#[entmeta(parent)]` - Embedded supertype state
/// - `#[entmeta(skip)]` - Leave the field out of the descriptor
/// - `#[entmeta(sealed)]` - Refuse reflective reads of this member
/// - `#[entmeta(annotation = "Kind")]` - Add a member annotation
///
/// `pub` fields are public members; all other fields are private.
///
/// # Example
///
/// ```ignore
/// use entmeta::{Entity, Reflect};
///
/// #[derive(Entity)]
/// #[entmeta(abstract)]
/// struct Auditable {
///     #[entmeta(id)]
///     id: i64,
/// }
///
/// #[derive(Entity)]
/// #[entmeta(extends = Auditable, annotation(kind = "Table", name = "orders"))]
/// #[entmeta(accessor(method = "get_total", returns = f64))]
/// struct Order {
///     #[entmeta(parent)]
///     audit: Auditable,
///     pub customer: String,
///     total: f64,
/// }
///
/// impl Order {
///     fn get_total(&self) -> f64 {
///         self.total
///     }
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entmeta))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    // Parse the struct and its attributes
    let entity = match parse_entity(&input) {
        Ok(e) => e,
        Err(e) => return e.to_compile_error().into(),
    };

    if let Err(e) = validate::validate_entity(&entity) {
        return e.to_compile_error().into();
    }

    generate_entity_impl(&entity).into()
}

/// Generate the `Reflect`, `Entity` and `ToValue` implementations.
fn generate_entity_impl(entity: &EntityDef) -> TokenStream2 {
    let ident = &entity.ident;

    let descriptor = generate_descriptor(entity);
    let invoke_body = generate_invoke_accessor(entity);
    let read_body = generate_read_member(entity);
    let parent_check = generate_parent_check(entity);

    quote! {
        impl ::entmeta_core::Reflect for #ident {
            const TYPE: &'static ::entmeta_core::TypeDescriptor = #descriptor;
        }

        impl ::entmeta_core::Entity for #ident {
            fn entity_type(&self) -> &'static ::entmeta_core::TypeDescriptor {
                <Self as ::entmeta_core::Reflect>::TYPE
            }

            fn invoke_accessor(
                &self,
                method: &str,
            ) -> ::core::result::Result<::entmeta_core::Value, ::entmeta_core::BoxError> {
                #invoke_body
            }

            fn read_member(
                &self,
                declaring_type: &::entmeta_core::TypeDescriptor,
                member: &str,
            ) -> ::core::option::Option<::entmeta_core::Value> {
                #read_body
            }
        }

        impl ::entmeta_core::ToValue for #ident {
            fn to_value(&self) -> ::entmeta_core::Value {
                ::entmeta_core::entity::reference_value(self)
            }
        }

        #parent_check
    }
}

fn annotation_tokens(annotation: &AnnotationDef) -> TokenStream2 {
    let kind = &annotation.kind;
    let keys = annotation.attributes.iter().map(|(k, _)| k);
    let values = annotation.attributes.iter().map(|(_, v)| v);
    quote! {
        ::entmeta_core::Annotation {
            kind: ::entmeta_core::AnnotationKind(#kind),
            attributes: &[#((#keys, #values)),*],
        }
    }
}

fn annotation_list(annotations: &[AnnotationDef]) -> TokenStream2 {
    let items = annotations.iter().map(annotation_tokens);
    quote! { &[#(#items),*] }
}

fn member_tokens(field: &FieldDef, annotations: &syn::Ident) -> TokenStream2 {
    let name = field.name.unraw().to_string();
    let ty = &field.ty;
    let visibility = if field.sealed {
        quote! { ::entmeta_core::Visibility::Sealed }
    } else if field.public {
        quote! { ::entmeta_core::Visibility::Public }
    } else {
        quote! { ::entmeta_core::Visibility::Private }
    };

    quote! {
        ::entmeta_core::Member::new(#name, ::entmeta_core::reflect::<#ty>)
            .visibility(#visibility)
            .annotations(#annotations)
    }
}

fn accessor_tokens(accessor: &AccessorDef, annotations: &syn::Ident) -> TokenStream2 {
    let method = accessor.method.unraw().to_string();
    let returns = &accessor.returns;
    quote! {
        ::entmeta_core::Accessor::new(#method, ::entmeta_core::reflect::<#returns>)
            .annotations(#annotations)
    }
}

/// Build the descriptor expression.
///
/// Every slice gets its own const item inside the initializer block so the
/// whole descriptor is plain `'static` data.
fn generate_descriptor(entity: &EntityDef) -> TokenStream2 {
    let type_name = &entity.type_name;
    let constructor = if entity.is_abstract {
        quote! { abstract_class }
    } else {
        quote! { class }
    };

    let members = entity.member_fields();
    let member_annotation_idents: Vec<syn::Ident> = (0..members.len())
        .map(|i| quote::format_ident!("MEMBER_ANNOTATIONS_{}", i))
        .collect();
    let member_annotation_lists = members
        .iter()
        .map(|field| annotation_list(&field.all_annotations()));
    let member_items = members
        .iter()
        .zip(&member_annotation_idents)
        .map(|(field, annotations)| member_tokens(field, annotations));

    let accessor_annotation_idents: Vec<syn::Ident> = (0..entity.accessors.len())
        .map(|i| quote::format_ident!("ACCESSOR_ANNOTATIONS_{}", i))
        .collect();
    let accessor_annotation_lists = entity
        .accessors
        .iter()
        .map(|accessor| annotation_list(&accessor.annotations));
    let accessor_items = entity
        .accessors
        .iter()
        .zip(&accessor_annotation_idents)
        .map(|(accessor, annotations)| accessor_tokens(accessor, annotations));

    let type_annotations = annotation_list(&entity.annotations);

    let extends = entity.extends.as_ref().map(|path| {
        quote! { .extends(<#path as ::entmeta_core::Reflect>::TYPE) }
    });

    quote! {
        {
            #(
                const #member_annotation_idents: &[::entmeta_core::Annotation] =
                    #member_annotation_lists;
            )*
            #(
                const #accessor_annotation_idents: &[::entmeta_core::Annotation] =
                    #accessor_annotation_lists;
            )*
            const MEMBERS: &[::entmeta_core::Member] = &[#(#member_items),*];
            const ACCESSORS: &[::entmeta_core::Accessor] = &[#(#accessor_items),*];
            const ANNOTATIONS: &[::entmeta_core::Annotation] = #type_annotations;

            &::entmeta_core::TypeDescriptor::#constructor(#type_name)
                #extends
                .members(MEMBERS)
                .accessors(ACCESSORS)
                .annotations(ANNOTATIONS)
        }
    }
}

fn generate_invoke_accessor(entity: &EntityDef) -> TokenStream2 {
    let arms = entity.accessors.iter().map(|accessor| {
        let method = &accessor.method;
        let name = method.unraw().to_string();
        if accessor.fallible {
            quote! {
                #name => self
                    .#method()
                    .map(|value| ::entmeta_core::ToValue::to_value(&value))
                    .map_err(::core::convert::Into::into)
            }
        } else {
            quote! {
                #name => ::core::result::Result::Ok(::entmeta_core::ToValue::to_value(&self.#method()))
            }
        }
    });

    let fallback = match entity.parent_field() {
        Some(parent) => {
            let field = &parent.name;
            quote! {
                ::entmeta_core::Entity::invoke_accessor(&self.#field, method).map_err(|err| {
                    ::entmeta_core::UnknownAccessor::reattribute(
                        err,
                        <Self as ::entmeta_core::Reflect>::TYPE.name,
                    )
                })
            }
        }
        None => quote! {
            ::core::result::Result::Err(::entmeta_core::UnknownAccessor::boxed(
                <Self as ::entmeta_core::Reflect>::TYPE.name,
                method,
            ))
        },
    };

    quote! {
        match method {
            #(#arms,)*
            _ => #fallback,
        }
    }
}

fn generate_read_member(entity: &EntityDef) -> TokenStream2 {
    let arms = entity.member_fields().into_iter().map(|field| {
        let ident = &field.name;
        let name = ident.unraw().to_string();
        quote! {
            #name => ::core::option::Option::Some(::entmeta_core::ToValue::to_value(&self.#ident))
        }
    });

    let inherited = match entity.parent_field() {
        Some(parent) => {
            let field = &parent.name;
            quote! { ::entmeta_core::Entity::read_member(&self.#field, declaring_type, member) }
        }
        None => quote! { ::core::option::Option::None },
    };

    quote! {
        if declaring_type != <Self as ::entmeta_core::Reflect>::TYPE {
            return #inherited;
        }
        match member {
            #(#arms,)*
            _ => ::core::option::Option::None,
        }
    }
}

/// Assert at compile time that the `parent` field has the `extends` type.
fn generate_parent_check(entity: &EntityDef) -> TokenStream2 {
    let (Some(path), Some(parent)) = (&entity.extends, entity.parent_field()) else {
        return TokenStream2::new();
    };
    let ident = &entity.ident;
    let field = &parent.name;
    quote! {
        const _: fn(&#ident) -> &#path = |entity| &entity.#field;
    }
}

/// Derive macro for the `Enumeration` trait.
///
/// Case names default to the variant identifier as written; override one with
/// `#[entmeta(rename = "...")]` and the descriptor name with
/// `#[entmeta(name = "...")]`.
///
/// # Example
///
/// ```ignore
/// use entmeta::Enumeration;
///
/// #[derive(Enumeration)]
/// enum Status {
///     OPEN,
///     CLOSED,
///     #[entmeta(rename = "ON_HOLD")]
///     OnHold,
/// }
/// ```
#[proc_macro_derive(Enumeration, attributes(entmeta))]
pub fn derive_enumeration(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let def = match parse_enumeration(&input) {
        Ok(d) => d,
        Err(e) => return e.to_compile_error().into(),
    };

    if let Err(e) = validate::validate_enumeration(&def) {
        return e.to_compile_error().into();
    }

    generate_enumeration_impl(&def).into()
}

fn generate_enumeration_impl(def: &EnumDef) -> TokenStream2 {
    let ident = &def.ident;
    let type_name = &def.type_name;
    let variant_idents: Vec<_> = def.variants.iter().map(|(v, _)| v).collect();
    let case_names: Vec<_> = def.variants.iter().map(|(_, name)| name.as_str()).collect();

    quote! {
        impl ::entmeta_core::Reflect for #ident {
            const TYPE: &'static ::entmeta_core::TypeDescriptor = {
                const VARIANTS: &[&str] = &[#(#case_names),*];
                &::entmeta_core::TypeDescriptor::enumeration(#type_name, VARIANTS)
            };
        }

        impl ::entmeta_core::Enumeration for #ident {
            fn variant_name(&self) -> &'static str {
                match self {
                    #(Self::#variant_idents => #case_names,)*
                }
            }

            fn from_variant_name(name: &str) -> ::core::option::Option<Self> {
                match name {
                    #(#case_names => ::core::option::Option::Some(Self::#variant_idents),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::entmeta_core::ToValue for #ident {
            fn to_value(&self) -> ::entmeta_core::Value {
                ::entmeta_core::Value::Enum {
                    enum_type: <Self as ::entmeta_core::Reflect>::TYPE.name.to_string(),
                    variant: ::entmeta_core::Enumeration::variant_name(self).to_string(),
                }
            }
        }
    }
}
