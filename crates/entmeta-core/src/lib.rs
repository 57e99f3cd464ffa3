//! Core types and operations for entmeta.
//!
//! This crate provides the reflective model of mapped entities and the
//! stages that work on it:
//!
//! - `TypeDescriptor` for static type metadata (members, accessors, annotations)
//! - `Entity` trait for reading identifier values out of live instances
//! - Member enumeration, annotation lookup and property discovery
//! - Identifier location and resolution
//! - Abstract-to-concrete collection resolution
//! - String-to-value coercion

pub mod coerce;
pub mod collection;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod identifier;
pub mod introspect;
pub mod member;
pub mod types;
pub mod value;

pub use coerce::{BooleanParsing, CoerceConfig, Coercer, EnumFallback, coerce};
pub use collection::{concrete_collection_for, is_collection};
pub use descriptor::{TypeDescriptor, TypeKind};
pub use entity::{Entity, Enumeration, UnknownAccessor};
pub use error::{
    AccessError, AccessErrorKind, BoxError, Error, InvocationError, NoIdentifierError, ParseError,
    Result,
};
pub use identifier::{
    identifier_fields, locate_identifier_field, resolve_identifier_type, resolve_identifier_value,
};
pub use introspect::{
    enumerate_members, find_annotation, member_for_property, properties, property_for_member,
    property_name,
};
pub use member::{
    Accessor, Annotation, AnnotationKind, DeclaredMember, Member, Property, TypeRef, Visibility,
};
pub use types::{Reflect, ScalarType, reflect};
pub use value::{ToValue, Value};
