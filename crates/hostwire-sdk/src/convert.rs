//! Conversions between `HostValue` and Rust primitives.
//!
//! Method bodies receive arguments already converted to their declared
//! parameter types, so extraction inside a body is a plain match. These
//! traits keep that boilerplate short:
//!
//! ```ignore
//! MethodDescriptor::new("add", HostType::int(), |_, args| {
//!     let a = i32::from_host(&args[0])?;
//!     let b = i32::from_host(&args[1])?;
//!     Ok((a + b).to_host())
//! })
//! .with_params([HostType::int(), HostType::int()])
//! ```

use crate::error::InteropError;
use crate::value::HostValue;

/// Convert from HostValue to Rust type.
pub trait FromHost: Sized {
    /// Convert from HostValue, returning an error if the kind doesn't match.
    fn from_host(value: &HostValue) -> Result<Self, InteropError>;
}

/// Convert from Rust type to HostValue.
pub trait ToHost {
    /// Convert to HostValue.
    fn to_host(self) -> HostValue;
}

fn mismatch(expected: &str, value: &HostValue) -> InteropError {
    InteropError::TypeMismatch {
        expected: expected.to_string(),
        got: value.kind_name().to_string(),
    }
}

impl FromHost for i32 {
    fn from_host(value: &HostValue) -> Result<Self, InteropError> {
        value.as_i32().ok_or_else(|| mismatch("int", value))
    }
}

impl ToHost for i32 {
    fn to_host(self) -> HostValue {
        HostValue::Int(self as i64)
    }
}

impl FromHost for i64 {
    fn from_host(value: &HostValue) -> Result<Self, InteropError> {
        value.as_i64().ok_or_else(|| mismatch("long", value))
    }
}

impl ToHost for i64 {
    fn to_host(self) -> HostValue {
        HostValue::Int(self)
    }
}

impl FromHost for f64 {
    fn from_host(value: &HostValue) -> Result<Self, InteropError> {
        value.as_f64().ok_or_else(|| mismatch("double", value))
    }
}

impl ToHost for f64 {
    fn to_host(self) -> HostValue {
        HostValue::Number(self)
    }
}

impl FromHost for bool {
    fn from_host(value: &HostValue) -> Result<Self, InteropError> {
        value.as_bool().ok_or_else(|| mismatch("boolean", value))
    }
}

impl ToHost for bool {
    fn to_host(self) -> HostValue {
        HostValue::Bool(self)
    }
}

impl FromHost for String {
    fn from_host(value: &HostValue) -> Result<Self, InteropError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("String", value))
    }
}

impl ToHost for String {
    fn to_host(self) -> HostValue {
        HostValue::String(self.into())
    }
}

impl ToHost for &str {
    fn to_host(self) -> HostValue {
        HostValue::String(self.into())
    }
}

// Unit type (for void methods)
impl ToHost for () {
    fn to_host(self) -> HostValue {
        HostValue::Null
    }
}

impl<T: ToHost> ToHost for Option<T> {
    fn to_host(self) -> HostValue {
        match self {
            Some(value) => value.to_host(),
            None => HostValue::Null,
        }
    }
}
