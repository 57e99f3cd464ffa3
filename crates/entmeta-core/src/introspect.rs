//! Member enumeration, annotation lookup and property discovery.
//!
//! Every function here walks an explicit ancestor list
//! ([`TypeDescriptor::lineage`]) so results are always ordered
//! most-derived type first.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::descriptor::TypeDescriptor;
use crate::member::{Annotation, AnnotationKind, DeclaredMember, Member, Property};
use crate::types::ScalarType;

/// Enumerate every non-static member visible on `ty`.
///
/// The type's own members come first (in declaration order), then each
/// ancestor's, up to the root. `None` yields an empty list.
pub fn enumerate_members(ty: Option<&TypeDescriptor>) -> Vec<DeclaredMember<'_>> {
    let Some(ty) = ty else {
        return Vec::new();
    };

    ty.lineage()
        .into_iter()
        .flat_map(|declaring_type| {
            declaring_type
                .members
                .iter()
                .map(move |member| DeclaredMember {
                    declaring_type,
                    member,
                })
        })
        .filter(|declared| !declared.is_static)
        .collect()
}

/// Find a type-level annotation of `kind` on `ty` or its nearest ancestor.
///
/// The most-derived declaration wins. Absent type or kind yields `None`.
pub fn find_annotation(
    ty: Option<&TypeDescriptor>,
    kind: Option<AnnotationKind>,
) -> Option<&'static Annotation> {
    let (ty, kind) = (ty?, kind?);
    ty.lineage()
        .into_iter()
        .find_map(|candidate| candidate.annotation(kind))
}

fn accessor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:get_(?P<get>[A-Za-z0-9_]+)|is_(?P<is>[A-Za-z0-9_]+))$")
            .expect("accessor naming pattern is a valid regex")
    })
}

/// Derive the property name an accessor method exposes.
///
/// - `get_<name>` reads `<name>`
/// - `is_<name>` reads `<name>` when the accessor returns `bool`
/// - anything else reads a property of the same name as the method
pub fn property_name(method: &'static str, return_type: &TypeDescriptor) -> &'static str {
    if let Some(captures) = accessor_pattern().captures(method) {
        if let Some(name) = captures.name("get") {
            return &method[name.range()];
        }
        if let Some(name) = captures.name("is") {
            if return_type.scalar() == Some(ScalarType::Bool) {
                return &method[name.range()];
            }
        }
    }
    method
}

/// Discover the read properties of `ty`, bean style.
///
/// Accessors are visited most-derived first; an accessor whose property was
/// already claimed by a more-derived type is overridden and dropped, along
/// with its annotations.
pub fn properties(ty: &TypeDescriptor) -> Vec<Property<'_>> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for declaring_type in ty.lineage() {
        for accessor in declaring_type.accessors {
            let name = accessor.property_name();
            if seen.insert(name) {
                found.push(Property {
                    name,
                    declaring_type,
                    accessor,
                });
            } else {
                tracing::trace!(
                    entity = ty.name,
                    property = name,
                    overridden_in = declaring_type.name,
                    "Accessor overridden by a more-derived type"
                );
            }
        }
    }

    found
}

/// The property whose name matches `member`, if any.
pub fn property_for_member<'a>(member: &Member, properties: &[Property<'a>]) -> Option<Property<'a>> {
    properties
        .iter()
        .copied()
        .find(|property| property.name == member.name)
}

/// The member backing `property` on `ty`, if any.
pub fn member_for_property<'a>(
    property: &Property<'_>,
    ty: Option<&'a TypeDescriptor>,
) -> Option<DeclaredMember<'a>> {
    enumerate_members(ty)
        .into_iter()
        .find(|member| member.name == property.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::{Accessor, Visibility};
    use crate::types;

    const AUDITED: AnnotationKind = AnnotationKind("Audited");
    const ROOT_TABLE_ATTRS: &[(&str, &str)] = &[("name", "root")];
    const LEAF_TABLE_ATTRS: &[(&str, &str)] = &[("name", "leaf")];

    const ROOT_ANNOTATIONS: &[Annotation] = &[
        Annotation::with_attributes(AnnotationKind::TABLE, ROOT_TABLE_ATTRS),
        Annotation::marker(AUDITED),
    ];
    const ROOT_MEMBERS: &[Member] = &[
        Member::new("created", || types::DATE),
        Member::new("REGISTRY", || types::TEXT).static_member(true),
    ];
    const ROOT_ACCESSORS: &[Accessor] = &[
        Accessor::new("get_created", || types::DATE),
        Accessor::new("label", || types::TEXT),
    ];
    const ROOT: &TypeDescriptor = &TypeDescriptor::abstract_class("Root")
        .members(ROOT_MEMBERS)
        .accessors(ROOT_ACCESSORS)
        .annotations(ROOT_ANNOTATIONS);

    const MIDDLE_MEMBERS: &[Member] = &[Member::new("owner", || types::TEXT)];
    const MIDDLE: &TypeDescriptor = &TypeDescriptor::abstract_class("Middle")
        .extends(ROOT)
        .members(MIDDLE_MEMBERS);

    const LEAF_ANNOTATIONS: &[Annotation] = &[Annotation::with_attributes(
        AnnotationKind::TABLE,
        LEAF_TABLE_ATTRS,
    )];
    const LEAF_MEMBERS: &[Member] = &[
        Member::new("name", || types::TEXT).visibility(Visibility::Public),
        Member::new("active", || types::BOOL),
        Member::new("COUNT", || types::I32).static_member(true),
    ];
    const LEAF_ACCESSORS: &[Accessor] = &[
        Accessor::new("label", || types::TEXT),
        Accessor::new("is_active", || types::BOOL),
    ];
    const LEAF: &TypeDescriptor = &TypeDescriptor::class("Leaf")
        .extends(MIDDLE)
        .members(LEAF_MEMBERS)
        .accessors(LEAF_ACCESSORS)
        .annotations(LEAF_ANNOTATIONS);

    fn member_names(ty: Option<&TypeDescriptor>) -> Vec<&'static str> {
        enumerate_members(ty).iter().map(|m| m.member.name).collect()
    }

    #[test]
    fn enumerate_members_walks_chain_leaves_first() {
        assert_eq!(member_names(Some(LEAF)), ["name", "active", "owner", "created"]);
        assert_eq!(member_names(Some(MIDDLE)), ["owner", "created"]);
    }

    #[test]
    fn enumerate_members_records_declaring_type() {
        let members = enumerate_members(Some(LEAF));
        let declaring: Vec<&str> = members.iter().map(|m| m.declaring_type.name).collect();
        assert_eq!(declaring, ["Leaf", "Leaf", "Middle", "Root"]);
    }

    #[test]
    fn enumerate_members_skips_statics_and_handles_absence() {
        assert!(member_names(None).is_empty());
        let names = member_names(Some(ROOT));
        assert_eq!(names, ["created"]);
    }

    #[test]
    fn find_annotation_prefers_most_derived() {
        let table = find_annotation(Some(LEAF), Some(AnnotationKind::TABLE)).unwrap();
        assert_eq!(table.attribute("name"), Some("leaf"));

        let table = find_annotation(Some(MIDDLE), Some(AnnotationKind::TABLE)).unwrap();
        assert_eq!(table.attribute("name"), Some("root"));

        assert!(find_annotation(Some(LEAF), Some(AUDITED)).is_some());
    }

    #[test]
    fn find_annotation_absent_inputs() {
        assert!(find_annotation(None, Some(AnnotationKind::TABLE)).is_none());
        assert!(find_annotation(Some(LEAF), None).is_none());
        assert!(find_annotation(Some(LEAF), Some(AnnotationKind::ENTITY)).is_none());
    }

    #[test]
    fn properties_apply_overrides() {
        let props = properties(LEAF);
        let summary: Vec<(&str, &str)> = props
            .iter()
            .map(|p| (p.name, p.declaring_type.name))
            .collect();
        assert_eq!(
            summary,
            [("label", "Leaf"), ("active", "Leaf"), ("created", "Root")]
        );
    }

    #[test]
    fn property_and_member_lookups() {
        let props = properties(LEAF);
        let members = enumerate_members(Some(LEAF));

        let active = members.iter().find(|m| m.name == "active").unwrap();
        let property = property_for_member(active, &props).unwrap();
        assert_eq!(property.accessor.method, "is_active");

        let owner = members.iter().find(|m| m.name == "owner").unwrap();
        assert!(property_for_member(owner, &props).is_none());

        let created = props.iter().find(|p| p.name == "created").unwrap();
        let backing = member_for_property(created, Some(LEAF)).unwrap();
        assert_eq!(backing.declaring_type.name, "Root");

        let label = props.iter().find(|p| p.name == "label").unwrap();
        assert!(member_for_property(label, Some(LEAF)).is_none());
        assert!(member_for_property(label, None).is_none());
    }

    #[test]
    fn property_name_rules() {
        assert_eq!(property_name("get_id", types::I64), "id");
        assert_eq!(property_name("get_", types::I64), "get_");
        assert_eq!(property_name("is_open", types::BOOL), "open");
        assert_eq!(property_name("is_open", types::I32), "is_open");
        assert_eq!(property_name("code", types::TEXT), "code");
    }
}
