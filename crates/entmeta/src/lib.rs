//! entmeta - entity metadata introspection.
//!
//! entmeta answers the questions a persistence layer asks about mapped types
//! without knowing them in advance:
//!
//! - Which member (or accessor) is the identifier, and what is its value?
//! - Which annotation of a given kind applies to a type or its ancestors?
//! - Which concrete collection can stand in for an abstract one?
//! - How does a raw string become a typed value of a given target type?
//!
//! # Quick Start
//!
//! ```ignore
//! use entmeta::prelude::*;
//!
//! #[derive(Entity)]
//! #[entmeta(abstract)]
//! struct Persistent {
//!     #[entmeta(id)]
//!     id: i64,
//! }
//!
//! #[derive(Entity)]
//! #[entmeta(extends = Persistent, annotation(kind = "Table", name = "customers"))]
//! struct Customer {
//!     #[entmeta(parent)]
//!     base: Persistent,
//!     pub name: String,
//! }
//!
//! let customer = Customer {
//!     base: Persistent { id: 7 },
//!     name: "Ada".to_string(),
//! };
//!
//! assert_eq!(resolve_identifier_value(&customer)?, Value::BigInt(7));
//! assert_eq!(resolve_identifier_type(Customer::TYPE)?, types::I64);
//!
//! let table = find_annotation(Some(Customer::TYPE), Some(AnnotationKind::TABLE));
//! assert_eq!(table.and_then(|t| t.attribute("name")), Some("customers"));
//!
//! assert_eq!(coerce("42", Some(resolve_identifier_type(Customer::TYPE)?))?, Value::BigInt(42));
//! ```
//!
//! # Features
//!
//! - **Static metadata**: descriptors are `'static` data built at compile time
//! - **No runtime registry**: every operation is a pure function of its inputs
//! - **Typed coercion**: integers, floats, big numbers, dates, UUIDs and enumerations

// Re-export all public types from sub-crates
pub use entmeta_core::{
    Accessor, AccessError, AccessErrorKind, Annotation, AnnotationKind, BooleanParsing, BoxError,
    CoerceConfig, Coercer, DeclaredMember, EnumFallback, Error, InvocationError, Member,
    NoIdentifierError, ParseError, Property, Reflect, Result, ScalarType, ToValue, TypeDescriptor,
    TypeKind, TypeRef, UnknownAccessor, Value, Visibility, reflect,
};

// Traits (the derive macros of the same names are re-exported below)
pub use entmeta_core::{Entity, Enumeration};

// Operations
pub use entmeta_core::{
    coerce, concrete_collection_for, enumerate_members, find_annotation, identifier_fields,
    is_collection, locate_identifier_field, member_for_property, properties, property_for_member,
    property_name, resolve_identifier_type, resolve_identifier_value,
};

// Built-in descriptors
pub use entmeta_core::{collection, types};

// Derive macros
pub use entmeta_macros::{Entity, Enumeration};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use entmeta::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AnnotationKind, CoerceConfig, Coercer, Entity, Enumeration, Error, Reflect, Result,
        ToValue, TypeDescriptor, Value, coerce, collection, concrete_collection_for,
        enumerate_members, find_annotation, locate_identifier_field, resolve_identifier_type,
        resolve_identifier_value, types,
    };
}
