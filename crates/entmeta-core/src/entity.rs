//! Instance-level access to entities.
//!
//! [`Entity`] is the narrow seam between the introspection stages and live
//! objects: the stages only ever see descriptors, and reach into an instance
//! through these two calls. It is typically derived using `#[derive(Entity)]`
//! from `entmeta-macros`.

use std::fmt;

use crate::descriptor::TypeDescriptor;
use crate::error::BoxError;
use crate::identifier::resolve_identifier_value;
use crate::types::Reflect;
use crate::value::Value;

/// Trait for instances whose identifier can be resolved.
///
/// # Example
///
/// ```ignore
/// use entmeta::Entity;
///
/// #[derive(Entity)]
/// #[entmeta(extends = Auditable)]
/// struct Order {
///     #[entmeta(parent)]
///     audit: Auditable,
///     #[entmeta(id)]
///     number: i64,
///     customer: String,
/// }
/// ```
pub trait Entity {
    /// The runtime type of this instance.
    fn entity_type(&self) -> &'static TypeDescriptor;

    /// Invoke the read accessor named `method`.
    ///
    /// Errors raised by the accessor itself are returned unchanged; the
    /// caller wraps them.
    fn invoke_accessor(&self, method: &str) -> Result<Value, BoxError>;

    /// Read the raw slot of a member, bypassing accessors.
    ///
    /// `declaring_type` is the type that declares the member, which may be an
    /// ancestor of [`entity_type`](Entity::entity_type). Returns `None` when
    /// the instance has no such slot.
    fn read_member(&self, declaring_type: &TypeDescriptor, member: &str) -> Option<Value>;
}

impl<T: Entity + ?Sized> Entity for &T {
    fn entity_type(&self) -> &'static TypeDescriptor {
        (**self).entity_type()
    }

    fn invoke_accessor(&self, method: &str) -> Result<Value, BoxError> {
        (**self).invoke_accessor(method)
    }

    fn read_member(&self, declaring_type: &TypeDescriptor, member: &str) -> Option<Value> {
        (**self).read_member(declaring_type, member)
    }
}

impl<T: Entity + ?Sized> Entity for Box<T> {
    fn entity_type(&self) -> &'static TypeDescriptor {
        (**self).entity_type()
    }

    fn invoke_accessor(&self, method: &str) -> Result<Value, BoxError> {
        (**self).invoke_accessor(method)
    }

    fn read_member(&self, declaring_type: &TypeDescriptor, member: &str) -> Option<Value> {
        (**self).read_member(declaring_type, member)
    }
}

/// The value of an entity held by another entity: its resolved identifier.
///
/// Generated `ToValue` implementations call this. An entity whose identifier
/// cannot be resolved reads as [`Value::Null`].
pub fn reference_value<E: Entity + ?Sized>(entity: &E) -> Value {
    resolve_identifier_value(entity).unwrap_or_else(|err| {
        tracing::debug!(
            entity = entity.entity_type().name,
            error = %err,
            "Referenced entity has no readable identifier; using null"
        );
        Value::Null
    })
}

/// Enumerations that can be resolved by case name.
pub trait Enumeration: Reflect + Sized {
    /// The case name of this value.
    fn variant_name(&self) -> &'static str;

    /// Look up a case by exact name.
    fn from_variant_name(name: &str) -> Option<Self>;
}

/// Returned by generated [`Entity::invoke_accessor`] implementations when no
/// accessor with the requested name exists anywhere in the chain.
#[derive(Debug, Clone)]
pub struct UnknownAccessor {
    pub type_name: &'static str,
    pub method: String,
}

impl fmt::Display for UnknownAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' has no accessor named '{}'", self.type_name, self.method)
    }
}

impl std::error::Error for UnknownAccessor {}

impl UnknownAccessor {
    /// Box this error for return from [`Entity::invoke_accessor`].
    pub fn boxed(type_name: &'static str, method: &str) -> BoxError {
        Box::new(Self {
            type_name,
            method: method.to_string(),
        })
    }

    /// Report an accessor missing from a supertype against `type_name`.
    ///
    /// Generated code calls this after delegating to the parent, so the error
    /// names the instance's own type. Other errors pass through unchanged.
    pub fn reattribute(err: BoxError, type_name: &'static str) -> BoxError {
        match err.downcast::<Self>() {
            Ok(mut unknown) => {
                unknown.type_name = type_name;
                unknown as BoxError
            }
            Err(other) => other,
        }
    }
}
