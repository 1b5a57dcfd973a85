//! Hostwire SDK - host type descriptors and dynamic values
//!
//! This crate provides what a host-type author needs to expose a Rust type to
//! script code without depending on the interop engine: the dynamic value
//! model, type handles, member descriptors and the shared error type.
//!
//! # Example
//!
//! ```ignore
//! use hostwire_sdk::{FieldDescriptor, HostType, HostValue, MethodDescriptor, TypeBuilder};
//!
//! let point = TypeBuilder::class("geom.Point")
//!     .field(FieldDescriptor::new("x", HostType::double(), |_| Ok(HostValue::Number(0.0))))
//!     .method(MethodDescriptor::new("length", HostType::double(), |_, _| Ok(1.0.into())))
//!     .build();
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod convert;
pub mod error;
pub mod types;
pub mod value;

pub use builder::TypeBuilder;
pub use convert::{FromHost, ToHost};
pub use error::{InteropError, InteropResult};
pub use types::{
    ConstructorBody, ConstructorDescriptor, FieldDescriptor, FieldGetter, FieldSetter, HostType,
    MethodBody, MethodDescriptor, Modifiers, TypeDescriptor, TypeKind,
};
pub use value::{EnumValue, HostObject, HostValue};
