//! Host type handles and member descriptors
//!
//! A host type is described once, up front, by a [`TypeDescriptor`]: its kind,
//! superclass, implemented interfaces and declared fields, methods,
//! constructors and enumeration constants. The engine never scans anything;
//! it reads descriptors.
//!
//! [`HostType`] is the handle everything else uses. It is a cheap clone of an
//! `Arc<TypeDescriptor>` and compares/hashes by identity, so two separately
//! built descriptors with the same name are different types.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{InteropError, InteropResult};
use crate::value::{EnumValue, HostValue};

// ============================================================================
// Callables
// ============================================================================

/// Direct invocable behind a method: `(receiver, args) -> result`.
///
/// Arguments arrive already converted to the declared parameter types.
/// Static methods ignore the receiver.
pub type MethodBody =
    Arc<dyn Fn(&HostValue, &[HostValue]) -> InteropResult<HostValue> + Send + Sync>;

/// Field read accessor
pub type FieldGetter = Arc<dyn Fn(&HostValue) -> InteropResult<HostValue> + Send + Sync>;

/// Field write accessor
pub type FieldSetter = Arc<dyn Fn(&HostValue, HostValue) -> InteropResult<()> + Send + Sync>;

/// Constructor invocable: `(constructed type, args) -> new instance`
pub type ConstructorBody =
    Arc<dyn Fn(&HostType, &[HostValue]) -> InteropResult<HostValue> + Send + Sync>;

// ============================================================================
// Type kind & modifiers
// ============================================================================

/// Kind of a host type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Concrete or abstract class
    Class,
    /// Interface (no superclass)
    Interface,
    /// Enumeration with an ordered constant list
    Enum,
    /// Array of a component type
    Array,
    /// Primitive value type (boolean, int, long, double, void)
    Primitive,
}

/// Member modifier flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers(u16);

impl Modifiers {
    /// No modifiers (package-private instance member)
    pub const NONE: Self = Self(0x00);
    /// Publicly visible
    pub const PUBLIC: Self = Self(0x01);
    /// Static member
    pub const STATIC: Self = Self(0x02);
    /// Final (fields: not writable)
    pub const FINAL: Self = Self(0x04);
    /// Transient field, never exposed
    pub const TRANSIENT: Self = Self(0x08);
    /// Native-bridge stub, never exposed
    pub const NATIVE: Self = Self(0x10);

    /// Create from raw bits
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Check if all flags of `other` are set
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of flags
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove flags
    pub const fn difference(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::PUBLIC
    }
}

// ============================================================================
// Member descriptors
// ============================================================================

/// A declared field
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    ty: HostType,
    modifiers: Modifiers,
    hidden: bool,
    getter: FieldGetter,
    setter: Option<FieldSetter>,
}

impl FieldDescriptor {
    /// Create a public, read-only field
    pub fn new<G>(name: impl Into<String>, ty: HostType, getter: G) -> Self
    where
        G: Fn(&HostValue) -> InteropResult<HostValue> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::PUBLIC,
            hidden: false,
            getter: Arc::new(getter),
            setter: None,
        }
    }

    /// Attach a write accessor
    pub fn with_setter<S>(mut self, setter: S) -> Self
    where
        S: Fn(&HostValue, HostValue) -> InteropResult<()> + Send + Sync + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }

    /// Mark as final
    pub fn as_final(mut self) -> Self {
        self.modifiers = self.modifiers.union(Modifiers::FINAL);
        self
    }

    /// Mark as transient
    pub fn as_transient(mut self) -> Self {
        self.modifiers = self.modifiers.union(Modifiers::TRANSIENT);
        self
    }

    /// Mark as static
    pub fn as_static(mut self) -> Self {
        self.modifiers = self.modifiers.union(Modifiers::STATIC);
        self
    }

    /// Remove public visibility
    pub fn as_private(mut self) -> Self {
        self.modifiers = self.modifiers.difference(Modifiers::PUBLIC);
        self
    }

    /// Hide from script code
    pub fn as_hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn ty(&self) -> &HostType {
        &self.ty
    }

    /// Modifier flags
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether the field carries the exclusion marker
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether writes are rejected
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifiers::FINAL) || self.setter.is_none()
    }

    /// Read the field from `receiver`
    pub fn get(&self, receiver: &HostValue) -> InteropResult<HostValue> {
        (self.getter)(receiver)
    }

    /// Write the field on `receiver`
    pub fn set(&self, receiver: &HostValue, value: HostValue) -> InteropResult<()> {
        match &self.setter {
            Some(setter) if !self.modifiers.contains(Modifiers::FINAL) => setter(receiver, value),
            _ => Err(InteropError::Internal(format!(
                "field '{}' is not writable",
                self.name
            ))),
        }
    }
}

/// A declared method
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    params: Arc<[HostType]>,
    return_type: HostType,
    modifiers: Modifiers,
    hidden: bool,
    body: MethodBody,
}

impl MethodDescriptor {
    /// Create a public instance method with no parameters
    pub fn new<F>(name: impl Into<String>, return_type: HostType, body: F) -> Self
    where
        F: Fn(&HostValue, &[HostValue]) -> InteropResult<HostValue> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: Arc::from(Vec::new()),
            return_type,
            modifiers: Modifiers::PUBLIC,
            hidden: false,
            body: Arc::new(body),
        }
    }

    /// Set the parameter types
    pub fn with_params(mut self, params: impl IntoIterator<Item = HostType>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Mark as static
    pub fn as_static(mut self) -> Self {
        self.modifiers = self.modifiers.union(Modifiers::STATIC);
        self
    }

    /// Mark as a native-bridge stub
    pub fn as_native(mut self) -> Self {
        self.modifiers = self.modifiers.union(Modifiers::NATIVE);
        self
    }

    /// Remove public visibility
    pub fn as_private(mut self) -> Self {
        self.modifiers = self.modifiers.difference(Modifiers::PUBLIC);
        self
    }

    /// Hide from script code
    pub fn as_hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered parameter types
    pub fn params(&self) -> &Arc<[HostType]> {
        &self.params
    }

    /// Declared return type
    pub fn return_type(&self) -> &HostType {
        &self.return_type
    }

    /// Modifier flags
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether the method carries the exclusion marker
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Direct invocable
    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    /// Call the body directly, without argument conversion
    pub fn invoke(&self, receiver: &HostValue, args: &[HostValue]) -> InteropResult<HostValue> {
        (self.body)(receiver, args)
    }
}

/// A declared constructor
#[derive(Clone)]
pub struct ConstructorDescriptor {
    params: Arc<[HostType]>,
    modifiers: Modifiers,
    hidden: bool,
    body: ConstructorBody,
}

impl ConstructorDescriptor {
    /// Create a public constructor with no parameters
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&HostType, &[HostValue]) -> InteropResult<HostValue> + Send + Sync + 'static,
    {
        Self {
            params: Arc::from(Vec::new()),
            modifiers: Modifiers::PUBLIC,
            hidden: false,
            body: Arc::new(body),
        }
    }

    /// Set the parameter types
    pub fn with_params(mut self, params: impl IntoIterator<Item = HostType>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Remove public visibility
    pub fn as_private(mut self) -> Self {
        self.modifiers = self.modifiers.difference(Modifiers::PUBLIC);
        self
    }

    /// Hide from script code
    pub fn as_hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Ordered parameter types
    pub fn params(&self) -> &Arc<[HostType]> {
        &self.params
    }

    /// Modifier flags
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether the constructor carries the exclusion marker
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Create a new instance of `ty`
    pub fn invoke(&self, ty: &HostType, args: &[HostValue]) -> InteropResult<HostValue> {
        (self.body)(ty, args)
    }
}

// ============================================================================
// Type descriptor
// ============================================================================

/// Complete static description of one host type
pub struct TypeDescriptor {
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) superclass: Option<HostType>,
    pub(crate) interfaces: Vec<HostType>,
    pub(crate) component: Option<HostType>,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) methods: Vec<MethodDescriptor>,
    pub(crate) constructors: Vec<ConstructorDescriptor>,
    pub(crate) constants: Vec<EnumValue>,
    pub(crate) remap_prefix: Option<String>,
}

impl TypeDescriptor {
    pub(crate) fn bare(name: &str, kind: TypeKind, superclass: Option<HostType>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            superclass,
            interfaces: Vec::new(),
            component: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            constants: Vec::new(),
            remap_prefix: None,
        }
    }
}

// ============================================================================
// HostType
// ============================================================================

static OBJECT: Lazy<HostType> = Lazy::new(|| HostType::builtin("Object", TypeKind::Class, None));
static VOID: Lazy<HostType> = Lazy::new(|| HostType::builtin("void", TypeKind::Primitive, None));
static BOOLEAN: Lazy<HostType> =
    Lazy::new(|| HostType::builtin("boolean", TypeKind::Primitive, None));
static INT: Lazy<HostType> = Lazy::new(|| HostType::builtin("int", TypeKind::Primitive, None));
static LONG: Lazy<HostType> = Lazy::new(|| HostType::builtin("long", TypeKind::Primitive, None));
static DOUBLE: Lazy<HostType> =
    Lazy::new(|| HostType::builtin("double", TypeKind::Primitive, None));
static STRING: Lazy<HostType> =
    Lazy::new(|| HostType::builtin("String", TypeKind::Class, Some(HostType::object())));

/// Identity handle for a host type
#[derive(Clone)]
pub struct HostType(Arc<TypeDescriptor>);

impl HostType {
    fn builtin(name: &str, kind: TypeKind, superclass: Option<HostType>) -> Self {
        HostType(Arc::new(TypeDescriptor::bare(name, kind, superclass)))
    }

    pub(crate) fn from_descriptor(descriptor: Arc<TypeDescriptor>) -> Self {
        HostType(descriptor)
    }

    /// The universal root type
    pub fn object() -> Self {
        OBJECT.clone()
    }

    /// `void`
    pub fn void() -> Self {
        VOID.clone()
    }

    /// `boolean`
    pub fn boolean() -> Self {
        BOOLEAN.clone()
    }

    /// `int`
    pub fn int() -> Self {
        INT.clone()
    }

    /// `long`
    pub fn long() -> Self {
        LONG.clone()
    }

    /// `double`
    pub fn double() -> Self {
        DOUBLE.clone()
    }

    /// `String`
    pub fn string() -> Self {
        STRING.clone()
    }

    /// Array of `component`
    pub fn array_of(component: &HostType) -> Self {
        let mut descriptor = TypeDescriptor::bare(
            &format!("{}[]", component.name()),
            TypeKind::Array,
            Some(HostType::object()),
        );
        descriptor.component = Some(component.clone());
        HostType(Arc::new(descriptor))
    }

    /// Underlying descriptor
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.0
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Type kind
    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    /// Direct superclass (None for the root, interfaces and primitives)
    pub fn superclass(&self) -> Option<&HostType> {
        self.0.superclass.as_ref()
    }

    /// Directly implemented interfaces, in declaration order
    pub fn interfaces(&self) -> &[HostType] {
        &self.0.interfaces
    }

    /// Component type of an array
    pub fn component(&self) -> Option<&HostType> {
        self.0.component.as_ref()
    }

    /// Declared fields
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.0.fields
    }

    /// Declared methods
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.0.methods
    }

    /// Declared constructors
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.0.constructors
    }

    /// Enumeration constants in ordinal order (empty for non-enums)
    pub fn enum_constants(&self) -> &[EnumValue] {
        &self.0.constants
    }

    /// Member-name prefix stripped when exposing members to scripts
    pub fn remap_prefix(&self) -> Option<&str> {
        self.0.remap_prefix.as_deref()
    }

    /// Whether this is the universal root type
    pub fn is_object(&self) -> bool {
        Arc::ptr_eq(&self.0, &OBJECT.0)
    }

    /// Whether this is `void`
    pub fn is_void(&self) -> bool {
        Arc::ptr_eq(&self.0, &VOID.0)
    }

    /// Whether this is a primitive kind
    pub fn is_primitive(&self) -> bool {
        self.0.kind == TypeKind::Primitive
    }

    /// Whether this is an array kind
    pub fn is_array(&self) -> bool {
        self.0.kind == TypeKind::Array
    }

    /// Whether this is an enumeration kind
    pub fn is_enum(&self) -> bool {
        self.0.kind == TypeKind::Enum
    }

    /// Whether this is an interface
    pub fn is_interface(&self) -> bool {
        self.0.kind == TypeKind::Interface
    }

    /// Whether null is a valid value of this type
    pub fn is_nullable(&self) -> bool {
        !self.is_primitive()
    }

    /// Whether a value of type `other` can be used where `self` is expected.
    ///
    /// Follows the superclass chain and transitively implemented interfaces.
    /// Primitives widen `int -> long -> double`.
    pub fn is_assignable_from(&self, other: &HostType) -> bool {
        if self == other {
            return true;
        }
        if self.is_primitive() || other.is_primitive() {
            return (*self == HostType::long() && *other == HostType::int())
                || (*self == HostType::double()
                    && (*other == HostType::int() || *other == HostType::long()));
        }
        if self.is_object() {
            return true;
        }

        let mut pending = vec![other.clone()];
        while let Some(current) = pending.pop() {
            if current == *self {
                return true;
            }
            pending.extend(current.interfaces().iter().cloned());
            if let Some(parent) = current.superclass() {
                pending.push(parent.clone());
            }
        }
        false
    }
}

impl PartialEq for HostType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for HostType {}

impl Hash for HostType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}
