//! Error types for entmeta operations.

use std::fmt;

/// Boxed error raised by a host accessor or a value parser.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type for all entmeta operations.
#[derive(Debug)]
pub enum Error {
    /// No member or accessor in the ancestor chain carries the identifier marker
    NoIdentifier(NoIdentifierError),
    /// Direct member access was rejected by the host
    Access(AccessError),
    /// An accessor matched but invoking it failed
    Invocation(InvocationError),
    /// Raw input could not be coerced to the target type
    Parse(ParseError),
}

#[derive(Debug, Clone)]
pub struct NoIdentifierError {
    pub type_name: &'static str,
}

#[derive(Debug, Clone)]
pub struct AccessError {
    pub kind: AccessErrorKind,
    /// The type the member was read through
    pub type_name: &'static str,
    /// The member's declaring type
    pub declaring_type: &'static str,
    pub member: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessErrorKind {
    /// The member is sealed; reflective reads are refused regardless of visibility
    Policy,
    /// The instance exposes no readable slot for the member
    Unreadable,
}

#[derive(Debug)]
pub struct InvocationError {
    pub type_name: &'static str,
    pub accessor: &'static str,
    pub source: BoxError,
}

#[derive(Debug)]
pub struct ParseError {
    /// The offending raw input
    pub input: String,
    /// Name of the target type
    pub target: &'static str,
    pub source: Option<BoxError>,
}

impl Error {
    /// Create a [`Error::NoIdentifier`] for the given type.
    pub fn no_identifier(type_name: &'static str) -> Self {
        Error::NoIdentifier(NoIdentifierError { type_name })
    }

    /// Create a [`Error::Parse`] carrying the input, target and cause.
    pub fn parse(
        input: impl Into<String>,
        target: &'static str,
        source: Option<BoxError>,
    ) -> Self {
        Error::Parse(ParseError {
            input: input.into(),
            target,
            source,
        })
    }

    /// Is this an identifier lookup failure?
    pub fn is_no_identifier(&self) -> bool {
        matches!(self, Error::NoIdentifier(_))
    }

    /// Is this a coercion failure?
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// Is this a rejected direct member read?
    pub fn is_access_error(&self) -> bool {
        matches!(self, Error::Access(_))
    }

    /// Is this a failed accessor invocation?
    pub fn is_invocation_error(&self) -> bool {
        matches!(self, Error::Invocation(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoIdentifier(e) => write!(f, "Identifier error: {}", e),
            Error::Access(e) => write!(f, "Access error: {}", e),
            Error::Invocation(e) => write!(f, "Invocation error: {}", e),
            Error::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Invocation(e) => Some(&*e.source as &(dyn std::error::Error + 'static)),
            Error::Parse(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for NoIdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no identifier marker found on accessors or members of '{}'",
            self.type_name
        )
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AccessErrorKind::Policy => write!(
                f,
                "member '{}.{}' is sealed against reflective reads (via '{}')",
                self.declaring_type, self.member, self.type_name
            ),
            AccessErrorKind::Unreadable => write!(
                f,
                "member '{}.{}' has no readable slot on '{}'",
                self.declaring_type, self.member, self.type_name
            ),
        }
    }
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accessor '{}::{}' failed: {}",
            self.type_name, self.accessor, self.source
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(
                f,
                "cannot coerce '{}' to {}: {}",
                self.input, self.target, source
            )
        } else {
            write!(f, "cannot coerce '{}' to {}", self.input, self.target)
        }
    }
}

impl From<NoIdentifierError> for Error {
    fn from(err: NoIdentifierError) -> Self {
        Error::NoIdentifier(err)
    }
}

impl From<AccessError> for Error {
    fn from(err: AccessError) -> Self {
        Error::Access(err)
    }
}

impl From<InvocationError> for Error {
    fn from(err: InvocationError) -> Self {
        Error::Invocation(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

/// Result type alias for entmeta operations.
pub type Result<T> = std::result::Result<T, Error>;
