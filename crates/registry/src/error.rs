//! Error types for registry dispatch, casting, and the encodable codec.

/// All errors a value-level cast can produce.
///
/// Casting is all-or-nothing: any variant here means no partial result
/// escaped the failing call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CastError {
    /// The casted value does not support element-wise access.
    #[error("{value} is not an iterable")]
    NotIterable { value: String },

    /// Some element failed its own recursive cast. Carries the original
    /// value, the target type, and the inner failure.
    #[error("cannot cast {value} to {target}: {source}")]
    ElementCastFailed {
        value: String,
        target: String,
        #[source]
        source: Box<CastError>,
    },

    /// The value itself cannot be represented in the target type.
    #[error("cannot cast {value} to {target}: {reason}")]
    Incompatible {
        value: String,
        target: String,
        reason: String,
    },

    /// A tuple cast received the wrong number of elements.
    #[error("cannot cast {value} to {target}: expected {expected} elements, got {got}")]
    ArityMismatch {
        value: String,
        target: String,
        expected: usize,
        got: usize,
    },

    /// No adapter is registered for the target's origin tag.
    #[error("no adapter registered for origin '{origin}'")]
    UnknownOrigin { origin: String },

    /// Type nesting recursed past the dispatch depth limit.
    #[error("type nesting exceeds the depth limit of {limit}")]
    DepthExceeded { limit: usize },
}

/// Errors surfaced while encoding a value to the transport tree or
/// decoding one back. Adapters do not intercept or transform delegate
/// failures; they propagate verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// A decode input did not have the shape a previous encode produces.
    #[error("malformed encodable tree: expected {expected}, got {got}")]
    MalformedTree { expected: String, got: String },

    /// An encode or summarize input did not satisfy its declared type.
    #[error("value does not satisfy its declared type: expected {expected}, got {got}")]
    UnexpectedValue { expected: String, got: String },

    /// No adapter is registered for the origin tag.
    #[error("no adapter registered for origin '{origin}'")]
    UnknownOrigin { origin: String },

    /// Type nesting recursed past the dispatch depth limit.
    #[error("type nesting exceeds the depth limit of {limit}")]
    DepthExceeded { limit: usize },
}
