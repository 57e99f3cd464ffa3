//! Built-in scalar types and their mapping from Rust types.

use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use uuid::Uuid;

use crate::descriptor::TypeDescriptor;

/// Scalar types understood by the value coercer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,

    // Fixed-width integers
    I8,
    I16,
    I32,
    I64,

    // Floating point
    F32,
    F64,

    // Arbitrary precision
    BigInteger,
    Decimal,

    /// Instant, written as epoch milliseconds in raw input
    Date,

    Uuid,

    Text,
}

impl ScalarType {
    /// Name used for the built-in descriptor and in parse errors.
    pub const fn type_name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::BigInteger => "BigInt",
            ScalarType::Decimal => "Decimal",
            ScalarType::Date => "DateTime<Utc>",
            ScalarType::Uuid => "Uuid",
            ScalarType::Text => "String",
        }
    }

    /// Check if this type is an integer of any width.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            ScalarType::I8
                | ScalarType::I16
                | ScalarType::I32
                | ScalarType::I64
                | ScalarType::BigInteger
        )
    }

    /// Check if this type is numeric.
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, ScalarType::F32 | ScalarType::F64 | ScalarType::Decimal)
    }
}

pub const BOOL: &TypeDescriptor = &TypeDescriptor::scalar_type("bool", ScalarType::Bool);
pub const I8: &TypeDescriptor = &TypeDescriptor::scalar_type("i8", ScalarType::I8);
pub const I16: &TypeDescriptor = &TypeDescriptor::scalar_type("i16", ScalarType::I16);
pub const I32: &TypeDescriptor = &TypeDescriptor::scalar_type("i32", ScalarType::I32);
pub const I64: &TypeDescriptor = &TypeDescriptor::scalar_type("i64", ScalarType::I64);
pub const F32: &TypeDescriptor = &TypeDescriptor::scalar_type("f32", ScalarType::F32);
pub const F64: &TypeDescriptor = &TypeDescriptor::scalar_type("f64", ScalarType::F64);
pub const BIG_INTEGER: &TypeDescriptor =
    &TypeDescriptor::scalar_type("BigInt", ScalarType::BigInteger);
pub const DECIMAL: &TypeDescriptor = &TypeDescriptor::scalar_type("Decimal", ScalarType::Decimal);
pub const DATE: &TypeDescriptor = &TypeDescriptor::scalar_type("DateTime<Utc>", ScalarType::Date);
pub const UUID: &TypeDescriptor = &TypeDescriptor::scalar_type("Uuid", ScalarType::Uuid);
pub const TEXT: &TypeDescriptor = &TypeDescriptor::scalar_type("String", ScalarType::Text);

/// Trait for Rust types that have a type descriptor.
///
/// `#[derive(Entity)]` and `#[derive(Enumeration)]` implement this for user
/// types; member declared types are taken from it.
pub trait Reflect {
    /// The descriptor for this Rust type.
    const TYPE: &'static TypeDescriptor;
}

/// The descriptor of `T`, as a [`TypeRef`](crate::member::TypeRef).
///
/// Generated members and accessors point at this instead of `T::TYPE` so the
/// descriptor is only looked up when read.
pub fn reflect<T: Reflect + ?Sized>() -> &'static TypeDescriptor {
    T::TYPE
}

impl Reflect for bool {
    const TYPE: &'static TypeDescriptor = BOOL;
}

impl Reflect for i8 {
    const TYPE: &'static TypeDescriptor = I8;
}

impl Reflect for i16 {
    const TYPE: &'static TypeDescriptor = I16;
}

impl Reflect for i32 {
    const TYPE: &'static TypeDescriptor = I32;
}

impl Reflect for i64 {
    const TYPE: &'static TypeDescriptor = I64;
}

impl Reflect for f32 {
    const TYPE: &'static TypeDescriptor = F32;
}

impl Reflect for f64 {
    const TYPE: &'static TypeDescriptor = F64;
}

impl Reflect for BigInt {
    const TYPE: &'static TypeDescriptor = BIG_INTEGER;
}

impl Reflect for DateTime<Utc> {
    const TYPE: &'static TypeDescriptor = DATE;
}

impl Reflect for Uuid {
    const TYPE: &'static TypeDescriptor = UUID;
}

impl Reflect for String {
    const TYPE: &'static TypeDescriptor = TEXT;
}

impl<T: Reflect> Reflect for Option<T> {
    const TYPE: &'static TypeDescriptor = T::TYPE;
}

impl<T: Reflect> Reflect for Box<T> {
    const TYPE: &'static TypeDescriptor = T::TYPE;
}
