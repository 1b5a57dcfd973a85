//! Fluent construction of host type descriptors
//!
//! ```ignore
//! let named = TypeBuilder::interface("demo.Named")
//!     .method(MethodDescriptor::new("getName", HostType::string(), |_, _| Ok("".into())))
//!     .build();
//!
//! let dog = TypeBuilder::class("demo.Dog")
//!     .implements(&named)
//!     .field(FieldDescriptor::new("legs", HostType::int(), |_| Ok(4.into())).as_final())
//!     .constructor(ConstructorDescriptor::new(|ty, _| Ok(HostValue::object(ty, ()))))
//!     .build();
//! ```

use std::sync::Arc;

use crate::types::{
    ConstructorDescriptor, FieldDescriptor, HostType, MethodDescriptor, TypeDescriptor, TypeKind,
};
use crate::value::EnumValue;

/// Builder for a [`HostType`]
pub struct TypeBuilder {
    name: String,
    kind: TypeKind,
    superclass: Option<HostType>,
    interfaces: Vec<HostType>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
    constants: Vec<String>,
    remap_prefix: Option<String>,
}

impl TypeBuilder {
    fn new(name: impl Into<String>, kind: TypeKind, superclass: Option<HostType>) -> Self {
        Self {
            name: name.into(),
            kind,
            superclass,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            constants: Vec::new(),
            remap_prefix: None,
        }
    }

    /// Start a class extending the root type
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class, Some(HostType::object()))
    }

    /// Start an interface
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface, None)
    }

    /// Start an enumeration
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Enum, Some(HostType::object()))
    }

    /// Set the superclass (ignored for interfaces)
    pub fn extends(mut self, parent: &HostType) -> Self {
        debug_assert!(!parent.is_interface(), "cannot extend an interface");
        if self.kind != TypeKind::Interface {
            self.superclass = Some(parent.clone());
        }
        self
    }

    /// Add an implemented (or, for interfaces, extended) interface
    pub fn implements(mut self, iface: &HostType) -> Self {
        self.interfaces.push(iface.clone());
        self
    }

    /// Declare a field
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a method
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Declare a constructor
    pub fn constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Append an enumeration constant (ordinal = declaration position)
    pub fn constant(mut self, name: impl Into<String>) -> Self {
        self.constants.push(name.into());
        self
    }

    /// Strip `prefix` from member names when exposing them to scripts
    pub fn remap_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.remap_prefix = Some(prefix.into());
        self
    }

    /// Finish the descriptor
    pub fn build(self) -> HostType {
        let descriptor = Arc::new_cyclic(|owner| {
            let constants = self
                .constants
                .into_iter()
                .enumerate()
                .map(|(ordinal, name)| EnumValue::new(owner.clone(), ordinal as u32, name.into()))
                .collect();

            TypeDescriptor {
                name: self.name,
                kind: self.kind,
                superclass: self.superclass,
                interfaces: self.interfaces,
                component: None,
                fields: self.fields,
                methods: self.methods,
                constructors: self.constructors,
                constants,
                remap_prefix: self.remap_prefix,
            }
        });
        HostType::from_descriptor(descriptor)
    }
}
