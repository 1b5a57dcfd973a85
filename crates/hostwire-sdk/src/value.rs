//! Dynamic values crossing the script/host boundary
//!
//! Script code only ever sees these variants. Host code receives them as
//! method arguments and returns them as results; the engine converts between
//! them and the declared parameter/return types of host members.
//!
//! ```text
//! Null            script null / undefined, host void
//! Bool            boolean
//! Int(i64)        int / long
//! Number(f64)     double (and non-integral script numbers)
//! String          text, shared
//! Enum            an enumerant of a host enumeration type
//! Object          any other host instance (type handle + opaque payload)
//! ```

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::types::{HostType, TypeDescriptor};

/// Dynamic value passed between script code and host members.
#[derive(Clone, PartialEq, Default)]
pub enum HostValue {
    /// Null / void
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer (covers both `int` and `long`)
    Int(i64),
    /// Floating point number
    Number(f64),
    /// Text
    String(Arc<str>),
    /// Enumerant
    Enum(EnumValue),
    /// Host object instance
    Object(HostObject),
}

impl HostValue {
    /// Create a null value
    #[inline]
    pub const fn null() -> Self {
        HostValue::Null
    }

    /// Create a string value
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        HostValue::String(s.into())
    }

    /// Wrap a Rust value as a host object of type `ty`
    pub fn object<T: Any + Send + Sync>(ty: &HostType, value: T) -> Self {
        HostValue::Object(HostObject::new(ty, value))
    }

    /// Check if this is null
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, HostValue::String(_))
    }

    /// Check if this is an integer or floating point number
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, HostValue::Int(_) | HostValue::Number(_))
    }

    /// Get as bool if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an integer or an integral number
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HostValue::Int(i) => Some(*i),
            HostValue::Number(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    /// Get as i32 if this is an integer in i32 range
    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|i| i32::try_from(i).ok())
    }

    /// Get as f64 (integers widen)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HostValue::Int(i) => Some(*i as f64),
            HostValue::Number(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string slice if this is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as enumerant
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            HostValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Get as host object
    pub fn as_object(&self) -> Option<&HostObject> {
        match self {
            HostValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Host type of an object or enumerant value
    pub fn host_type(&self) -> Option<HostType> {
        match self {
            HostValue::Object(o) => Some(o.host_type().clone()),
            HostValue::Enum(e) => e.host_type(),
            _ => None,
        }
    }

    /// Short name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            HostValue::Null => "null",
            HostValue::Bool(_) => "boolean",
            HostValue::Int(_) => "int",
            HostValue::Number(_) => "number",
            HostValue::String(_) => "string",
            HostValue::Enum(_) => "enum",
            HostValue::Object(_) => "object",
        }
    }

    /// Whether this value can be passed as `ty` without a coercion rule.
    ///
    /// Integral script numbers are accepted for `int` and `long`; integers
    /// widen to `double`. Null is accepted by every reference type.
    pub fn conforms_to(&self, ty: &HostType) -> bool {
        if ty.is_object() {
            return true;
        }
        match self {
            HostValue::Null => ty.is_nullable(),
            HostValue::Bool(_) => *ty == HostType::boolean(),
            HostValue::Int(i) => {
                (*ty == HostType::int() && i32::try_from(*i).is_ok())
                    || *ty == HostType::long()
                    || *ty == HostType::double()
            }
            HostValue::Number(_) => {
                *ty == HostType::double()
                    || (*ty == HostType::int() && self.as_i32().is_some())
                    || (*ty == HostType::long() && self.as_i64().is_some())
            }
            HostValue::String(_) => *ty == HostType::string(),
            HostValue::Enum(e) => e
                .host_type()
                .map(|et| ty.is_assignable_from(&et))
                .unwrap_or(false),
            HostValue::Object(o) => ty.is_assignable_from(o.host_type()),
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Null => write!(f, "null"),
            HostValue::Bool(b) => write!(f, "{}", b),
            HostValue::Int(i) => write!(f, "{}", i),
            HostValue::Number(n) => write!(f, "{}", n),
            HostValue::String(s) => write!(f, "{:?}", s),
            HostValue::Enum(e) => write!(f, "{:?}", e),
            HostValue::Object(o) => write!(f, "{:?}", o),
        }
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Bool(b)
    }
}

impl From<i32> for HostValue {
    fn from(i: i32) -> Self {
        HostValue::Int(i as i64)
    }
}

impl From<i64> for HostValue {
    fn from(i: i64) -> Self {
        HostValue::Int(i)
    }
}

impl From<f64> for HostValue {
    fn from(f: f64) -> Self {
        HostValue::Number(f)
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::String(s.into())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::String(s.into())
    }
}

// ============================================================================
// Enumerants
// ============================================================================

/// One constant of a host enumeration type.
///
/// Holds a weak link to its declaring type: the type owns its constant list,
/// and types are never dropped while the process uses them.
#[derive(Clone)]
pub struct EnumValue {
    owner: Weak<TypeDescriptor>,
    ordinal: u32,
    name: Arc<str>,
}

impl EnumValue {
    pub(crate) fn new(owner: Weak<TypeDescriptor>, ordinal: u32, name: Arc<str>) -> Self {
        Self {
            owner,
            ordinal,
            name,
        }
    }

    /// Position in the declaring type's constant list
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaring enumeration type
    pub fn host_type(&self) -> Option<HostType> {
        self.owner.upgrade().map(HostType::from_descriptor)
    }

    /// Whether this enumerant was declared by `ty`
    pub fn belongs_to(&self, ty: &HostType) -> bool {
        std::ptr::eq(self.owner.as_ptr(), ty.descriptor() as *const TypeDescriptor)
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal && Weak::ptr_eq(&self.owner, &other.owner)
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.ordinal)
    }
}

// ============================================================================
// Host objects
// ============================================================================

/// A host instance: its type handle plus an opaque shared payload.
///
/// Mutable host state lives behind interior mutability inside the payload.
#[derive(Clone)]
pub struct HostObject {
    ty: HostType,
    data: Arc<dyn Any + Send + Sync>,
}

impl HostObject {
    /// Wrap a Rust value
    pub fn new<T: Any + Send + Sync>(ty: &HostType, value: T) -> Self {
        Self {
            ty: ty.clone(),
            data: Arc::new(value),
        }
    }

    /// Runtime type of this instance
    pub fn host_type(&self) -> &HostType {
        &self.ty
    }

    /// Borrow the payload as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Whether both handles refer to the same instance
    pub fn same_instance(&self, other: &HostObject) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:p}", self.ty.name(), Arc::as_ptr(&self.data))
    }
}
