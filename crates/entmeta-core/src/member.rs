//! Member, accessor and annotation definitions.

use std::fmt;
use std::ops::Deref;

use crate::descriptor::TypeDescriptor;
use crate::introspect;

/// Deferred reference to a descriptor.
///
/// Members and accessors hold their type behind a function pointer so that a
/// descriptor may mention itself, directly or through another entity.
pub type TypeRef = fn() -> &'static TypeDescriptor;

/// Identifies a kind of annotation (marker tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationKind(pub &'static str);

impl AnnotationKind {
    /// Marks the entity's primary identifier.
    pub const ID: Self = Self("Id");
    /// Marks a type as a mapped entity.
    pub const ENTITY: Self = Self("Entity");
    /// Names the backing table of an entity.
    pub const TABLE: Self = Self("Table");
    /// Marks a member that is not persisted.
    pub const TRANSIENT: Self = Self("Transient");

    pub const fn name(self) -> &'static str {
        self.0
    }
}

/// An annotation attached to a type, member or accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation {
    pub kind: AnnotationKind,
    /// Key/value attributes (e.g. `("name", "orders")` on a table annotation)
    pub attributes: &'static [(&'static str, &'static str)],
}

impl Annotation {
    /// The identifier marker.
    pub const ID: Self = Self::marker(AnnotationKind::ID);

    /// Create an annotation with no attributes.
    pub const fn marker(kind: AnnotationKind) -> Self {
        Self {
            kind,
            attributes: &[],
        }
    }

    /// Create an annotation with attributes.
    pub const fn with_attributes(
        kind: AnnotationKind,
        attributes: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { kind, attributes }
    }

    /// Get an attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&'static str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

fn find_in(annotations: &'static [Annotation], kind: AnnotationKind) -> Option<&'static Annotation> {
    annotations.iter().find(|annotation| annotation.kind == kind)
}

/// Visibility of a data member to direct (non-accessor) reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Readable without any override.
    Public,
    /// Hidden by default; direct reads override the restriction.
    #[default]
    Private,
    /// The host refuses reflective reads outright.
    Sealed,
}

/// Metadata about a data member (field).
#[derive(Clone, Copy)]
pub struct Member {
    /// Member name
    pub name: &'static str,
    declared_type: TypeRef,
    /// Static members belong to the type, not to instances
    pub is_static: bool,
    pub visibility: Visibility,
    pub annotations: &'static [Annotation],
}

impl Member {
    /// Create a non-static, private member with no annotations.
    pub const fn new(name: &'static str, declared_type: TypeRef) -> Self {
        Self {
            name,
            declared_type,
            is_static: false,
            visibility: Visibility::Private,
            annotations: &[],
        }
    }

    /// Set the static flag.
    pub const fn static_member(mut self, value: bool) -> Self {
        self.is_static = value;
        self
    }

    /// Set visibility.
    pub const fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set annotations.
    pub const fn annotations(mut self, annotations: &'static [Annotation]) -> Self {
        self.annotations = annotations;
        self
    }

    /// Declared type of the member.
    pub fn declared_type(&self) -> &'static TypeDescriptor {
        (self.declared_type)()
    }

    pub fn annotation(&self, kind: AnnotationKind) -> Option<&'static Annotation> {
        find_in(self.annotations, kind)
    }

    pub fn has_annotation(&self, kind: AnnotationKind) -> bool {
        self.annotation(kind).is_some()
    }

    /// Whether this member carries the identifier marker.
    pub fn is_identifier(&self) -> bool {
        self.has_annotation(AnnotationKind::ID)
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type().name)
            .field("is_static", &self.is_static)
            .field("visibility", &self.visibility)
            .field("annotations", &self.annotations)
            .finish()
    }
}

/// A read accessor (getter).
///
/// The property it exposes is derived from the method name, see
/// [`introspect::property_name`].
#[derive(Clone, Copy)]
pub struct Accessor {
    /// Method name, e.g. `id`, `get_code` or `is_active`
    pub method: &'static str,
    return_type: TypeRef,
    /// Annotations on the method itself, independent of the backing member
    pub annotations: &'static [Annotation],
}

impl Accessor {
    pub const fn new(method: &'static str, return_type: TypeRef) -> Self {
        Self {
            method,
            return_type,
            annotations: &[],
        }
    }

    /// Set annotations.
    pub const fn annotations(mut self, annotations: &'static [Annotation]) -> Self {
        self.annotations = annotations;
        self
    }

    /// Declared return type.
    pub fn return_type(&self) -> &'static TypeDescriptor {
        (self.return_type)()
    }

    /// Name of the property this accessor reads.
    pub fn property_name(&self) -> &'static str {
        introspect::property_name(self.method, self.return_type())
    }

    pub fn annotation(&self, kind: AnnotationKind) -> Option<&'static Annotation> {
        find_in(self.annotations, kind)
    }

    pub fn has_annotation(&self, kind: AnnotationKind) -> bool {
        self.annotation(kind).is_some()
    }

    /// Whether the accessor itself carries the identifier marker.
    pub fn is_identifier(&self) -> bool {
        self.has_annotation(AnnotationKind::ID)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("method", &self.method)
            .field("return_type", &self.return_type().name)
            .field("annotations", &self.annotations)
            .finish()
    }
}

/// A member together with the type that declares it.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredMember<'a> {
    pub declaring_type: &'a TypeDescriptor,
    pub member: &'a Member,
}

impl Deref for DeclaredMember<'_> {
    type Target = Member;

    fn deref(&self) -> &Member {
        self.member
    }
}

impl PartialEq for DeclaredMember<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type == other.declaring_type && self.member.name == other.member.name
    }
}

impl Eq for DeclaredMember<'_> {}

/// A bean-style read property: an accessor as seen from a concrete type,
/// after overrides have been applied.
#[derive(Debug, Clone, Copy)]
pub struct Property<'a> {
    /// Property name
    pub name: &'static str,
    /// The type whose accessor won (the most-derived declaration)
    pub declaring_type: &'a TypeDescriptor,
    pub accessor: &'a Accessor,
}
