//! Error types shared by host descriptors and the interop engine

/// Result type for interop operations
pub type InteropResult<T> = Result<T, InteropError>;

/// Interop error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InteropError {
    /// Invalid startup configuration (duplicate coercion rule, bad target type, bad config file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A script value cannot be turned into the requested host value
    #[error("{0}")]
    Value(String),

    /// Caller misuse of an internal surface (e.g. a dispatch index from another table)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Type mismatch during argument or return conversion
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual value kind
        got: String,
    },

    /// Wrong number of arguments
    #[error("Argument error: {0}")]
    Argument(String),

    /// No member with this name on the host type
    #[error("{type_name} has no member named '{name}'")]
    NoSuchMember {
        /// Host type name
        type_name: String,
        /// Requested member name
        name: String,
    },

    /// No public constructor with the exact signature
    #[error("{type_name} has no constructor ({signature})")]
    NoSuchConstructor {
        /// Host type name
        type_name: String,
        /// Rendered parameter list
        signature: String,
    },

    /// A member exists but none of its overloads accepts the arguments
    #[error("No overload of {type_name}.{name} accepts {arg_count} argument(s)")]
    NoMatchingOverload {
        /// Host type name
        type_name: String,
        /// Method name
        name: String,
        /// Number of arguments supplied
        arg_count: usize,
    },

    /// Write to a final field with no bean setter
    #[error("Property '{name}' of {type_name} is read-only")]
    ReadOnlyProperty {
        /// Host type name
        type_name: String,
        /// Property name
        name: String,
    },

    /// Failure raised by host code, passed through unmodified
    #[error("{0}")]
    Host(String),
}

impl From<String> for InteropError {
    fn from(s: String) -> Self {
        InteropError::Host(s)
    }
}

impl From<&str> for InteropError {
    fn from(s: &str) -> Self {
        InteropError::Host(s.to_string())
    }
}
