//! Conversion of raw strings into typed values.
//!
//! Dispatch is on the target descriptor: scalars parse, enumerations match a
//! case name exactly, and anything else passes the raw string through.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::DateTime;
use num_bigint::BigInt;
use regex::Regex;
use uuid::Uuid;

use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::error::{Error, Result};
use crate::types::ScalarType;
use crate::value::Value;

/// What to do when no enumeration case matches the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumFallback {
    /// Return the raw string as [`Value::Text`] and log a warning.
    #[default]
    Passthrough,
    /// Fail with [`Error::Parse`].
    Reject,
}

/// How booleans are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanParsing {
    /// `true` or `false` in any case; anything else is a parse error.
    #[default]
    Strict,
    /// `true` in any case is true, everything else is false.
    Lenient,
}

/// Coercion configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoerceConfig {
    pub enum_fallback: EnumFallback,
    pub booleans: BooleanParsing,
}

impl CoerceConfig {
    /// Create the default configuration.
    pub const fn new() -> Self {
        Self {
            enum_fallback: EnumFallback::Passthrough,
            booleans: BooleanParsing::Strict,
        }
    }

    /// Set the unmatched-enum behavior.
    pub const fn enum_fallback(mut self, fallback: EnumFallback) -> Self {
        self.enum_fallback = fallback;
        self
    }

    /// Set the boolean parsing mode.
    pub const fn booleans(mut self, booleans: BooleanParsing) -> Self {
        self.booleans = booleans;
        self
    }
}

/// Coerces raw strings using a fixed [`CoerceConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Coercer {
    config: CoerceConfig,
}

impl Coercer {
    pub const fn new(config: CoerceConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &CoerceConfig {
        &self.config
    }

    /// Convert `raw` to a value of type `target`.
    ///
    /// An absent target returns the raw string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when `raw` is not valid for a scalar target,
    /// or does not name a case of an enumeration target under
    /// [`EnumFallback::Reject`].
    pub fn coerce(&self, raw: &str, target: Option<&TypeDescriptor>) -> Result<Value> {
        let Some(target) = target else {
            return Ok(Value::Text(raw.to_string()));
        };

        match target.kind {
            TypeKind::Scalar(scalar) => self.coerce_scalar(raw, scalar),
            TypeKind::Enumeration => self.coerce_enum(raw, target),
            TypeKind::Class | TypeKind::AbstractClass | TypeKind::Interface => {
                tracing::trace!(target_type = target.name, "No coercion for target; passing through");
                Ok(Value::Text(raw.to_string()))
            }
        }
    }

    fn coerce_scalar(&self, raw: &str, scalar: ScalarType) -> Result<Value> {
        let target = scalar.type_name();
        match scalar {
            ScalarType::Bool => self.parse_bool(raw).map(Value::Bool),
            ScalarType::I8 => parse_with::<i8>(raw, target).map(Value::TinyInt),
            ScalarType::I16 => parse_with::<i16>(raw, target).map(Value::SmallInt),
            ScalarType::I32 => parse_with::<i32>(raw, target).map(Value::Int),
            ScalarType::I64 => parse_with::<i64>(raw, target).map(Value::BigInt),
            ScalarType::F32 => parse_float::<f32>(raw, target).map(Value::Float),
            ScalarType::F64 => parse_float::<f64>(raw, target).map(Value::Double),
            ScalarType::BigInteger => parse_big_integer(raw).map(Value::BigInteger),
            ScalarType::Decimal => parse_decimal(raw).map(Value::Decimal),
            ScalarType::Date => {
                let millis = parse_with::<i64>(raw, target)?;
                DateTime::from_timestamp_millis(millis)
                    .map(Value::Date)
                    .ok_or_else(|| Error::parse(raw, target, Some("instant out of range".into())))
            }
            ScalarType::Uuid => parse_uuid(raw).map(Value::Uuid),
            ScalarType::Text => Ok(Value::Text(raw.to_string())),
        }
    }

    fn parse_bool(&self, raw: &str) -> Result<bool> {
        if raw.eq_ignore_ascii_case("true") {
            return Ok(true);
        }
        match self.config.booleans {
            BooleanParsing::Lenient => Ok(false),
            BooleanParsing::Strict if raw.eq_ignore_ascii_case("false") => Ok(false),
            BooleanParsing::Strict => Err(Error::parse(
                raw,
                ScalarType::Bool.type_name(),
                Some("expected 'true' or 'false'".into()),
            )),
        }
    }

    fn coerce_enum(&self, raw: &str, target: &TypeDescriptor) -> Result<Value> {
        if let Some(variant) = target.variant(raw) {
            return Ok(Value::Enum {
                enum_type: target.name.to_string(),
                variant: variant.to_string(),
            });
        }

        match self.config.enum_fallback {
            EnumFallback::Passthrough => {
                tracing::warn!(
                    target_type = target.name,
                    input = raw,
                    "No enum case matches; passing raw string through"
                );
                Ok(Value::Text(raw.to_string()))
            }
            EnumFallback::Reject => Err(Error::parse(
                raw,
                target.name,
                Some(format!("not a case of {}", target.name).into()),
            )),
        }
    }
}

/// Coerce with the default configuration.
///
/// # Example
///
/// ```
/// use entmeta_core::{coerce, types, Value};
///
/// assert_eq!(coerce("42", Some(types::I32)).unwrap(), Value::Int(42));
/// assert_eq!(coerce("42", None).unwrap(), Value::Text("42".into()));
/// assert!(coerce("forty-two", Some(types::I32)).is_err());
/// ```
pub fn coerce(raw: &str, target: Option<&TypeDescriptor>) -> Result<Value> {
    Coercer::new(CoerceConfig::new()).coerce(raw, target)
}

fn parse_with<T>(raw: &str, target: &'static str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .map_err(|e| Error::parse(raw, target, Some(Box::new(e))))
}

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?\d+$").expect("integer pattern is a valid regex"))
}

/// `BigInt::from_str` also takes `_` separators; only plain digits are accepted.
fn parse_big_integer(raw: &str) -> Result<BigInt> {
    let target = ScalarType::BigInteger.type_name();
    if !integer_pattern().is_match(raw) {
        return Err(Error::parse(raw, target, Some("not an integer literal".into())));
    }
    parse_with::<BigInt>(raw, target)
}

fn float_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?|[+-]?Infinity|NaN)$")
            .expect("float literal pattern is a valid regex")
    })
}

/// Non-finite values are spelled `Infinity` and `NaN` exactly.
fn parse_float<T>(raw: &str, target: &'static str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if !float_pattern().is_match(raw) {
        return Err(Error::parse(raw, target, Some("not a floating-point literal".into())));
    }
    parse_with::<T>(raw, target)
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$")
            .expect("decimal literal pattern is a valid regex")
    })
}

fn parse_decimal(raw: &str) -> Result<String> {
    if decimal_pattern().is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(Error::parse(
            raw,
            ScalarType::Decimal.type_name(),
            Some("not a decimal literal".into()),
        ))
    }
}

const HYPHENATED_UUID_LEN: usize = 36;

fn parse_uuid(raw: &str) -> Result<Uuid> {
    let target = ScalarType::Uuid.type_name();
    if raw.len() != HYPHENATED_UUID_LEN {
        return Err(Error::parse(
            raw,
            target,
            Some("expected the hyphenated 8-4-4-4-12 form".into()),
        ));
    }
    Uuid::parse_str(raw).map_err(|e| Error::parse(raw, target, Some(Box::new(e))))
}
