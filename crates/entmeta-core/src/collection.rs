//! Built-in collection descriptors and abstract-to-concrete resolution.
//!
//! The hierarchy mirrors the usual collection contracts:
//!
//! ```text
//! COLLECTION
//! ├── LIST ──────────── VEC, VEC_DEQUE
//! ├── SET
//! │   └── SORTED_SET ── BTREE_SET
//! │   HASH_SET ─────────┘ (SET)
//! ├── QUEUE
//! │   └── DEQUE ─────── VEC_DEQUE, LINKED_LIST
//! └── ABSTRACT_COLLECTION (abstract class)
//! ```

use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};

use crate::descriptor::TypeDescriptor;
use crate::types::Reflect;

pub const COLLECTION: &TypeDescriptor = &TypeDescriptor::interface("Collection");

const COLLECTION_SUPERTYPES: &[&TypeDescriptor] = &[COLLECTION];

pub const LIST: &TypeDescriptor = &TypeDescriptor::interface("List").implements(COLLECTION_SUPERTYPES);
pub const SET: &TypeDescriptor = &TypeDescriptor::interface("Set").implements(COLLECTION_SUPERTYPES);
pub const QUEUE: &TypeDescriptor =
    &TypeDescriptor::interface("Queue").implements(COLLECTION_SUPERTYPES);

const SET_SUPERTYPES: &[&TypeDescriptor] = &[SET];
const QUEUE_SUPERTYPES: &[&TypeDescriptor] = &[QUEUE];

pub const SORTED_SET: &TypeDescriptor =
    &TypeDescriptor::interface("SortedSet").implements(SET_SUPERTYPES);
pub const DEQUE: &TypeDescriptor = &TypeDescriptor::interface("Deque").implements(QUEUE_SUPERTYPES);

/// Skeletal base class for custom collections.
pub const ABSTRACT_COLLECTION: &TypeDescriptor =
    &TypeDescriptor::abstract_class("AbstractCollection").implements(COLLECTION_SUPERTYPES);

const LIST_SUPERTYPES: &[&TypeDescriptor] = &[LIST];
const LIST_DEQUE_SUPERTYPES: &[&TypeDescriptor] = &[LIST, DEQUE];
const DEQUE_SUPERTYPES: &[&TypeDescriptor] = &[DEQUE];
const SORTED_SET_SUPERTYPES: &[&TypeDescriptor] = &[SORTED_SET];

/// Growable array-backed list.
pub const VEC: &TypeDescriptor = &TypeDescriptor::class("Vec").implements(LIST_SUPERTYPES);
pub const VEC_DEQUE: &TypeDescriptor =
    &TypeDescriptor::class("VecDeque").implements(LIST_DEQUE_SUPERTYPES);
pub const LINKED_LIST: &TypeDescriptor =
    &TypeDescriptor::class("LinkedList").implements(DEQUE_SUPERTYPES);
pub const HASH_SET: &TypeDescriptor = &TypeDescriptor::class("HashSet").implements(SET_SUPERTYPES);
pub const BTREE_SET: &TypeDescriptor =
    &TypeDescriptor::class("BTreeSet").implements(SORTED_SET_SUPERTYPES);

/// Whether `ty` is some kind of collection.
pub fn is_collection(ty: &TypeDescriptor) -> bool {
    ty.is_subtype_of(COLLECTION)
}

/// Pick a concrete collection type that can be instantiated in place of `ty`.
///
/// Non-collections yield `None`; concrete collections are returned as is.
/// Abstract set types resolve to [`HASH_SET`], abstract list types to
/// [`VEC`], and any other abstract collection to [`HASH_SET`].
pub fn concrete_collection_for(ty: &TypeDescriptor) -> Option<&TypeDescriptor> {
    if !is_collection(ty) {
        return None;
    }
    if ty.is_concrete() {
        return Some(ty);
    }

    let concrete = if ty.is_subtype_of(SET) {
        HASH_SET
    } else if ty.is_subtype_of(LIST) {
        VEC
    } else {
        HASH_SET
    };

    tracing::trace!(
        requested = ty.name,
        concrete = concrete.name,
        "Resolved abstract collection"
    );
    Some(concrete)
}

impl<T> Reflect for Vec<T> {
    const TYPE: &'static TypeDescriptor = VEC;
}

impl<T> Reflect for VecDeque<T> {
    const TYPE: &'static TypeDescriptor = VEC_DEQUE;
}

impl<T> Reflect for LinkedList<T> {
    const TYPE: &'static TypeDescriptor = LINKED_LIST;
}

impl<T, S> Reflect for HashSet<T, S> {
    const TYPE: &'static TypeDescriptor = HASH_SET;
}

impl<T> Reflect for BTreeSet<T> {
    const TYPE: &'static TypeDescriptor = BTREE_SET;
}
