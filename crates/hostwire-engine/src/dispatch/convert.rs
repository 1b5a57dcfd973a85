//! Per-parameter argument conversions and return normalisation
//!
//! Chosen once per dispatch entry from the declared types, then applied on
//! every call without looking at the types again.

use hostwire_sdk::{HostType, HostValue, InteropError, InteropResult};

/// How one argument is prepared for the host body
#[derive(Debug, Clone)]
pub(crate) enum ArgConversion {
    /// Root object type: anything goes
    Any,
    Boolean,
    Int,
    Long,
    Double,
    /// Reference type: null or a conforming value
    Reference(HostType),
}

impl ArgConversion {
    pub(crate) fn for_param(ty: &HostType) -> Self {
        if ty.is_object() {
            ArgConversion::Any
        } else if *ty == HostType::boolean() {
            ArgConversion::Boolean
        } else if *ty == HostType::int() {
            ArgConversion::Int
        } else if *ty == HostType::long() {
            ArgConversion::Long
        } else if *ty == HostType::double() {
            ArgConversion::Double
        } else {
            ArgConversion::Reference(ty.clone())
        }
    }

    pub(crate) fn apply(&self, value: &HostValue) -> InteropResult<HostValue> {
        let converted = match self {
            ArgConversion::Any => Some(value.clone()),
            ArgConversion::Boolean => value.as_bool().map(HostValue::Bool),
            ArgConversion::Int => value.as_i32().map(|i| HostValue::Int(i as i64)),
            ArgConversion::Long => value.as_i64().map(HostValue::Int),
            ArgConversion::Double => value.as_f64().map(HostValue::Number),
            ArgConversion::Reference(ty) => value.conforms_to(ty).then(|| value.clone()),
        };
        converted.ok_or_else(|| InteropError::TypeMismatch {
            expected: self.expected().to_string(),
            got: value.kind_name().to_string(),
        })
    }

    fn expected(&self) -> &str {
        match self {
            ArgConversion::Any => "Object",
            ArgConversion::Boolean => "boolean",
            ArgConversion::Int => "int",
            ArgConversion::Long => "long",
            ArgConversion::Double => "double",
            ArgConversion::Reference(ty) => ty.name(),
        }
    }
}

/// How a host result is handed back to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReturnConversion {
    Void,
    Integral,
    Double,
    Value,
}

impl ReturnConversion {
    pub(crate) fn for_return(ty: &HostType) -> Self {
        if ty.is_void() {
            ReturnConversion::Void
        } else if *ty == HostType::int() || *ty == HostType::long() {
            ReturnConversion::Integral
        } else if *ty == HostType::double() {
            ReturnConversion::Double
        } else {
            ReturnConversion::Value
        }
    }

    pub(crate) fn apply(self, value: HostValue) -> HostValue {
        match self {
            ReturnConversion::Void => HostValue::Null,
            ReturnConversion::Integral => match value.as_i64() {
                Some(i) => HostValue::Int(i),
                None => value,
            },
            ReturnConversion::Double => match value.as_f64() {
                Some(f) => HostValue::Number(f),
                None => value,
            },
            ReturnConversion::Value => value,
        }
    }
}
