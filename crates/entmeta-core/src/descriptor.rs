//! Type descriptors.
//!
//! A [`TypeDescriptor`] is the reflective handle every stage works on. It is
//! plain `'static` data assembled with `const fn` builders, either by hand or by
//! `#[derive(Entity)]` / `#[derive(Enumeration)]` from `entmeta-macros`.
//!
//! # Example
//!
//! ```
//! use entmeta_core::{Annotation, Member, TypeDescriptor, types};
//!
//! const ID_MARKERS: &[Annotation] = &[Annotation::ID];
//! const BASE_MEMBERS: &[Member] = &[Member::new("id", || types::I64).annotations(ID_MARKERS)];
//! const BASE: &TypeDescriptor = &TypeDescriptor::abstract_class("Base").members(BASE_MEMBERS);
//! const ORDER: &TypeDescriptor = &TypeDescriptor::class("Order").extends(BASE);
//!
//! assert_eq!(ORDER.lineage().len(), 2);
//! assert!(ORDER.is_subtype_of(BASE));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::member::{Accessor, Annotation, AnnotationKind, Member};
use crate::types::ScalarType;

/// What sort of type a descriptor stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Instantiable class
    Class,
    /// Class that cannot be instantiated directly
    AbstractClass,
    /// Pure interface (trait-like contract)
    Interface,
    /// Built-in value type understood by the coercer
    Scalar(ScalarType),
    /// Closed set of named cases
    Enumeration,
}

/// Reflective description of a type.
///
/// Identity is the type name: two descriptors with the same `name` compare
/// equal even if they live at different addresses.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    /// Unique type name
    pub name: &'static str,
    /// Kind of type
    pub kind: TypeKind,
    /// Immediate superclass, if any
    pub superclass: Option<&'static TypeDescriptor>,
    /// Implemented interfaces (for an interface: the interfaces it extends)
    pub interfaces: &'static [&'static TypeDescriptor],
    /// Data members declared directly on this type, in declaration order
    pub members: &'static [Member],
    /// Read accessors declared directly on this type, in declaration order
    pub accessors: &'static [Accessor],
    /// Type-level annotations
    pub annotations: &'static [Annotation],
    /// Case names, only meaningful for [`TypeKind::Enumeration`]
    pub variants: &'static [&'static str],
}

impl TypeDescriptor {
    /// Create a descriptor with no supertypes, members, accessors or annotations.
    pub const fn new(name: &'static str, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            superclass: None,
            interfaces: &[],
            members: &[],
            accessors: &[],
            annotations: &[],
            variants: &[],
        }
    }

    /// Create a concrete class descriptor.
    pub const fn class(name: &'static str) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// Create an abstract class descriptor.
    pub const fn abstract_class(name: &'static str) -> Self {
        Self::new(name, TypeKind::AbstractClass)
    }

    /// Create an interface descriptor.
    pub const fn interface(name: &'static str) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    /// Create a built-in scalar descriptor.
    pub const fn scalar_type(name: &'static str, scalar: ScalarType) -> Self {
        Self::new(name, TypeKind::Scalar(scalar))
    }

    /// Create an enumeration descriptor with the given case names.
    pub const fn enumeration(name: &'static str, variants: &'static [&'static str]) -> Self {
        let mut descriptor = Self::new(name, TypeKind::Enumeration);
        descriptor.variants = variants;
        descriptor
    }

    /// Set the immediate superclass.
    pub const fn extends(mut self, superclass: &'static TypeDescriptor) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Set the implemented (or, for interfaces, extended) interfaces.
    pub const fn implements(mut self, interfaces: &'static [&'static TypeDescriptor]) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// Set the directly declared members.
    pub const fn members(mut self, members: &'static [Member]) -> Self {
        self.members = members;
        self
    }

    /// Set the directly declared accessors.
    pub const fn accessors(mut self, accessors: &'static [Accessor]) -> Self {
        self.accessors = accessors;
        self
    }

    /// Set the type-level annotations.
    pub const fn annotations(mut self, annotations: &'static [Annotation]) -> Self {
        self.annotations = annotations;
        self
    }

    /// The type itself followed by every ancestor, root last.
    pub fn lineage(&self) -> Vec<&TypeDescriptor> {
        let mut chain = vec![self];
        let mut current = self.superclass;
        while let Some(ancestor) = current {
            chain.push(ancestor);
            current = ancestor.superclass;
        }
        chain
    }

    /// Whether a value of this type can stand in for `other`.
    ///
    /// True when the types are the same, or `other` is reachable through
    /// superclass or interface links.
    pub fn is_subtype_of(&self, other: &TypeDescriptor) -> bool {
        let mut pending = vec![self];
        while let Some(ty) = pending.pop() {
            if ty == other {
                return true;
            }
            if let Some(parent) = ty.superclass {
                pending.push(parent);
            }
            for interface in ty.interfaces {
                pending.push(*interface);
            }
        }
        false
    }

    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }

    pub const fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::AbstractClass)
    }

    /// Neither an interface nor an abstract class.
    pub const fn is_concrete(&self) -> bool {
        !self.is_interface() && !self.is_abstract()
    }

    pub const fn is_enumeration(&self) -> bool {
        matches!(self.kind, TypeKind::Enumeration)
    }

    /// The scalar type, when this describes one.
    pub const fn scalar(&self) -> Option<ScalarType> {
        match self.kind {
            TypeKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Look up an enumeration case by exact (case-sensitive) name.
    pub fn variant(&self, name: &str) -> Option<&'static str> {
        self.variants.iter().copied().find(|variant| *variant == name)
    }

    /// A member declared directly on this type (ancestors are not searched).
    pub fn declared_member(&self, name: &str) -> Option<&'static Member> {
        self.members.iter().find(|member| member.name == name)
    }

    /// An accessor declared directly on this type (ancestors are not searched).
    pub fn declared_accessor(&self, method: &str) -> Option<&'static Accessor> {
        self.accessors.iter().find(|accessor| accessor.method == method)
    }

    /// A type-level annotation declared directly on this type.
    pub fn annotation(&self, kind: AnnotationKind) -> Option<&'static Annotation> {
        self.annotations
            .iter()
            .find(|annotation| annotation.kind == kind)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interfaces: Vec<&str> = self.interfaces.iter().map(|i| i.name).collect();
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("superclass", &self.superclass.map(|s| s.name))
            .field("interfaces", &interfaces)
            .field("members", &self.members)
            .field("accessors", &self.accessors)
            .field("annotations", &self.annotations)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;

    const ROOT: &TypeDescriptor = &TypeDescriptor::abstract_class("Root");
    const MIDDLE: &TypeDescriptor = &TypeDescriptor::abstract_class("Middle").extends(ROOT);
    const LEAF: &TypeDescriptor = &TypeDescriptor::class("Leaf").extends(MIDDLE);

    const NAMED: &TypeDescriptor = &TypeDescriptor::interface("Named");
    const LABELLED_SUPERTYPES: &[&TypeDescriptor] = &[NAMED];
    const LABELLED: &TypeDescriptor =
        &TypeDescriptor::interface("Labelled").implements(LABELLED_SUPERTYPES);
    const TAG_INTERFACES: &[&TypeDescriptor] = &[LABELLED];
    const TAG: &TypeDescriptor = &TypeDescriptor::class("Tag")
        .extends(ROOT)
        .implements(TAG_INTERFACES);

    #[test]
    fn lineage_is_most_derived_first() {
        let names: Vec<&str> = LEAF.lineage().iter().map(|t| t.name).collect();
        assert_eq!(names, ["Leaf", "Middle", "Root"]);
        assert_eq!(ROOT.lineage().len(), 1);
    }

    #[test]
    fn subtype_follows_superclasses_and_interfaces() {
        assert!(LEAF.is_subtype_of(LEAF));
        assert!(LEAF.is_subtype_of(ROOT));
        assert!(!ROOT.is_subtype_of(LEAF));
        assert!(TAG.is_subtype_of(NAMED));
        assert!(TAG.is_subtype_of(ROOT));
        assert!(!LEAF.is_subtype_of(NAMED));
    }

    #[test]
    fn kinds_and_concreteness() {
        assert!(LEAF.is_concrete());
        assert!(!MIDDLE.is_concrete());
        assert!(!NAMED.is_concrete());
        assert!(types::I32.is_concrete());
        assert_eq!(types::I32.scalar(), Some(ScalarType::I32));
        assert_eq!(LEAF.scalar(), None);
    }

    #[test]
    fn scalar_constructor_and_getter_agree() {
        const SCORE: &TypeDescriptor = &TypeDescriptor::scalar_type("Score", ScalarType::F64);
        assert_eq!(SCORE.kind, TypeKind::Scalar(ScalarType::F64));
        assert_eq!(SCORE.scalar(), Some(ScalarType::F64));
        assert!(SCORE.is_concrete());
    }

    #[test]
    fn equality_is_by_name() {
        let copy = TypeDescriptor::class("Leaf");
        assert_eq!(&copy, LEAF);
        assert_ne!(LEAF, MIDDLE);
    }

    #[test]
    fn variants_match_exactly() {
        const COLOR: &TypeDescriptor = &TypeDescriptor::enumeration("Color", &["RED", "GREEN"]);
        assert!(COLOR.is_enumeration());
        assert_eq!(COLOR.variant("RED"), Some("RED"));
        assert_eq!(COLOR.variant("red"), None);
    }
}
