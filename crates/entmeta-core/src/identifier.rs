//! Identifier location and resolution.
//!
//! The identifier of an entity is found with a fixed precedence:
//!
//! 1. an accessor carrying the [`AnnotationKind::ID`] marker,
//! 2. a marked member read through its accessor (property of the same name),
//! 3. a marked member read directly.
//!
//! Accessor markers win even when a marked member exists on a more-derived
//! type.

use crate::descriptor::TypeDescriptor;
use crate::entity::Entity;
use crate::error::{AccessError, AccessErrorKind, Error, InvocationError, Result};
use crate::introspect::{enumerate_members, properties, property_for_member};
use crate::member::{AnnotationKind, DeclaredMember, Property, Visibility};
use crate::value::Value;

/// Every member in the ancestor chain carrying the identifier marker,
/// most-derived first.
pub fn identifier_fields(ty: &TypeDescriptor) -> Vec<DeclaredMember<'_>> {
    enumerate_members(Some(ty))
        .into_iter()
        .filter(|member| member.has_annotation(AnnotationKind::ID))
        .collect()
}

/// The first member carrying the identifier marker.
///
/// When several members are marked the most-derived one wins and a warning
/// is logged.
pub fn locate_identifier_field(ty: Option<&TypeDescriptor>) -> Option<DeclaredMember<'_>> {
    let ty = ty?;
    let marked = identifier_fields(ty);

    if marked.len() > 1 {
        let names: Vec<String> = marked
            .iter()
            .map(|m| format!("{}.{}", m.declaring_type.name, m.name))
            .collect();
        tracing::warn!(
            entity = ty.name,
            candidates = ?names,
            "Multiple identifier members; using the most-derived"
        );
    }

    marked.into_iter().next()
}

fn marked_accessor<'a>(props: &[Property<'a>]) -> Option<Property<'a>> {
    props
        .iter()
        .copied()
        .find(|property| property.accessor.is_identifier())
}

fn invoke<E: Entity + ?Sized>(entity: &E, property: &Property<'_>) -> Result<Value> {
    let ty = entity.entity_type();
    entity
        .invoke_accessor(property.accessor.method)
        .map_err(|source| {
            tracing::debug!(
                entity = ty.name,
                accessor = property.accessor.method,
                error = %source,
                "Identifier accessor failed"
            );
            Error::Invocation(InvocationError {
                type_name: ty.name,
                accessor: property.accessor.method,
                source,
            })
        })
}

fn read_directly<E: Entity + ?Sized>(entity: &E, member: &DeclaredMember<'_>) -> Result<Value> {
    let ty = entity.entity_type();
    let access_error = |kind| {
        Error::Access(AccessError {
            kind,
            type_name: ty.name,
            declaring_type: member.declaring_type.name,
            member: member.name,
        })
    };

    match member.visibility {
        Visibility::Sealed => return Err(access_error(AccessErrorKind::Policy)),
        Visibility::Private => tracing::debug!(
            entity = ty.name,
            member = member.name,
            "Overriding private visibility for direct read"
        ),
        Visibility::Public => {}
    }

    entity
        .read_member(member.declaring_type, member.name)
        .ok_or_else(|| access_error(AccessErrorKind::Unreadable))
}

/// Read the identifier value of `entity`.
///
/// # Errors
///
/// - [`Error::NoIdentifier`] when nothing in the chain is marked
/// - [`Error::Invocation`] when the chosen accessor fails
/// - [`Error::Access`] when a direct member read is refused
#[tracing::instrument(level = "trace", skip_all, fields(entity = entity.entity_type().name))]
pub fn resolve_identifier_value<E: Entity + ?Sized>(entity: &E) -> Result<Value> {
    let ty = entity.entity_type();
    let props = properties(ty);

    if let Some(property) = marked_accessor(&props) {
        tracing::trace!(accessor = property.accessor.method, "Identifier via marked accessor");
        return invoke(entity, &property);
    }

    let member = locate_identifier_field(Some(ty)).ok_or_else(|| Error::no_identifier(ty.name))?;

    if let Some(property) = property_for_member(&member, &props) {
        tracing::trace!(
            member = member.name,
            accessor = property.accessor.method,
            "Identifier via member accessor"
        );
        return invoke(entity, &property);
    }

    tracing::trace!(member = member.name, "Identifier via direct member read");
    read_directly(entity, &member)
}

/// The declared type of the identifier of `ty`.
///
/// Uses the same precedence as [`resolve_identifier_value`] but needs no
/// instance, so the only failure is [`Error::NoIdentifier`].
#[tracing::instrument(level = "trace", skip_all, fields(entity = ty.name))]
pub fn resolve_identifier_type(ty: &TypeDescriptor) -> Result<&'static TypeDescriptor> {
    let props = properties(ty);

    if let Some(property) = marked_accessor(&props) {
        return Ok(property.accessor.return_type());
    }

    let member = locate_identifier_field(Some(ty)).ok_or_else(|| Error::no_identifier(ty.name))?;

    Ok(match property_for_member(&member, &props) {
        Some(property) => property.accessor.return_type(),
        None => member.declared_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::UnknownAccessor;
    use crate::error::BoxError;
    use crate::member::{Accessor, Annotation, Member};
    use crate::types;

    const ID_MARKERS: &[Annotation] = &[Annotation::ID];

    // Root { id: i64 (marked, private) } <- Account { name } <- Premium { tier }
    const ROOT_MEMBERS: &[Member] = &[Member::new("id", || types::I64).annotations(ID_MARKERS)];
    const ROOT: &TypeDescriptor = &TypeDescriptor::abstract_class("Root").members(ROOT_MEMBERS);
    const ACCOUNT_MEMBERS: &[Member] = &[Member::new("name", || types::TEXT)];
    const ACCOUNT: &TypeDescriptor = &TypeDescriptor::abstract_class("Account")
        .extends(ROOT)
        .members(ACCOUNT_MEMBERS);
    const PREMIUM_MEMBERS: &[Member] = &[Member::new("tier", || types::I32)];
    const PREMIUM: &TypeDescriptor = &TypeDescriptor::class("Premium")
        .extends(ACCOUNT)
        .members(PREMIUM_MEMBERS);

    struct Premium {
        id: Option<i64>,
    }

    impl Entity for Premium {
        fn entity_type(&self) -> &'static TypeDescriptor {
            PREMIUM
        }

        fn invoke_accessor(&self, method: &str) -> std::result::Result<Value, BoxError> {
            Err(UnknownAccessor::boxed(PREMIUM.name, method))
        }

        fn read_member(&self, declaring_type: &TypeDescriptor, member: &str) -> Option<Value> {
            if declaring_type == ROOT && member == "id" {
                return self.id.map(Value::from);
            }
            None
        }
    }

    // Ticket { code (marked, sealed) }, with a getter-marked subtype
    const TICKET_MEMBERS: &[Member] = &[Member::new("code", || types::TEXT)
        .annotations(ID_MARKERS)
        .visibility(Visibility::Sealed)];
    const TICKET: &TypeDescriptor = &TypeDescriptor::class("Ticket").members(TICKET_MEMBERS);

    const TRACKED_MEMBERS: &[Member] = &[Member::new("serial", || types::UUID)];
    const TRACKED_ACCESSORS: &[Accessor] = &[
        Accessor::new("get_serial", || types::UUID).annotations(ID_MARKERS),
        Accessor::new("get_code", || types::TEXT),
    ];
    const TRACKED: &TypeDescriptor = &TypeDescriptor::class("TrackedTicket")
        .extends(TICKET)
        .members(TRACKED_MEMBERS)
        .accessors(TRACKED_ACCESSORS);

    struct Ticket;

    impl Entity for Ticket {
        fn entity_type(&self) -> &'static TypeDescriptor {
            TICKET
        }

        fn invoke_accessor(&self, method: &str) -> std::result::Result<Value, BoxError> {
            Err(UnknownAccessor::boxed(TICKET.name, method))
        }

        fn read_member(&self, _: &TypeDescriptor, _: &str) -> Option<Value> {
            Some(Value::from("T-1"))
        }
    }

    struct Tracked {
        fail: bool,
    }

    impl Entity for Tracked {
        fn entity_type(&self) -> &'static TypeDescriptor {
            TRACKED
        }

        fn invoke_accessor(&self, method: &str) -> std::result::Result<Value, BoxError> {
            match method {
                "get_serial" if self.fail => Err("serial not assigned".into()),
                "get_serial" => Ok(Value::from("serial-7")),
                "get_code" => Ok(Value::from("T-2")),
                _ => Err(UnknownAccessor::boxed(TRACKED.name, method)),
            }
        }

        fn read_member(&self, _: &TypeDescriptor, _: &str) -> Option<Value> {
            None
        }
    }

    const PLAIN: &TypeDescriptor = &TypeDescriptor::class("Plain").members(ACCOUNT_MEMBERS);

    struct Plain;

    impl Entity for Plain {
        fn entity_type(&self) -> &'static TypeDescriptor {
            PLAIN
        }

        fn invoke_accessor(&self, method: &str) -> std::result::Result<Value, BoxError> {
            Err(UnknownAccessor::boxed(PLAIN.name, method))
        }

        fn read_member(&self, _: &TypeDescriptor, _: &str) -> Option<Value> {
            Some(Value::from("plain"))
        }
    }

    #[test]
    fn locates_marker_on_root_ancestor() {
        let found = locate_identifier_field(Some(PREMIUM)).unwrap();
        assert_eq!(found.name, "id");
        assert_eq!(found.declaring_type, ROOT);
        assert!(locate_identifier_field(None).is_none());
        assert!(locate_identifier_field(Some(PLAIN)).is_none());
    }

    #[test]
    fn resolves_private_member_directly() {
        let value = resolve_identifier_value(&Premium { id: Some(42) }).unwrap();
        assert_eq!(value, Value::BigInt(42));
        assert_eq!(resolve_identifier_type(PREMIUM).unwrap(), types::I64);
    }

    #[test]
    fn missing_slot_is_unreadable() {
        let err = resolve_identifier_value(&Premium { id: None }).unwrap_err();
        match err {
            Error::Access(e) => {
                assert_eq!(e.kind, AccessErrorKind::Unreadable);
                assert_eq!(e.declaring_type, "Root");
                assert_eq!(e.type_name, "Premium");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sealed_member_is_refused() {
        let err = resolve_identifier_value(&Ticket).unwrap_err();
        assert!(matches!(
            err,
            Error::Access(AccessError {
                kind: AccessErrorKind::Policy,
                ..
            })
        ));
        // the type is still known without an instance
        assert_eq!(resolve_identifier_type(TICKET).unwrap(), types::TEXT);
    }

    #[test]
    fn marked_accessor_beats_marked_member() {
        let value = resolve_identifier_value(&Tracked { fail: false }).unwrap();
        assert_eq!(value, Value::from("serial-7"));
        assert_eq!(resolve_identifier_type(TRACKED).unwrap(), types::UUID);
    }

    #[test]
    fn accessor_failure_is_wrapped_with_cause() {
        use std::error::Error as _;

        let err = resolve_identifier_value(&Tracked { fail: true }).unwrap_err();
        assert!(err.is_invocation_error());
        assert_eq!(err.source().unwrap().to_string(), "serial not assigned");
    }

    #[test]
    fn no_marker_anywhere() {
        let err = resolve_identifier_value(&Plain).unwrap_err();
        assert!(err.is_no_identifier());
        assert!(resolve_identifier_type(PLAIN).unwrap_err().is_no_identifier());
    }

    #[test]
    fn resolution_is_repeatable() {
        let entity = Premium { id: Some(9) };
        let first = resolve_identifier_value(&entity).unwrap();
        let second = resolve_identifier_value(&entity).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn several_markers_most_derived_wins() {
        const BOTH_MEMBERS: &[Member] = &[Member::new("code", || types::TEXT).annotations(ID_MARKERS)];
        const BOTH: &TypeDescriptor = &TypeDescriptor::class("Both")
            .extends(ROOT)
            .members(BOTH_MEMBERS);

        let all = identifier_fields(BOTH);
        assert_eq!(all.len(), 2);
        let chosen = locate_identifier_field(Some(BOTH)).unwrap();
        assert_eq!((chosen.declaring_type.name, chosen.name), ("Both", "code"));
    }
}
