//! Unified member records
//!
//! A [`Member`] is everything a host type exposes under one script name: at
//! most one field, a set of method overloads keyed by [`SignatureKey`], and
//! optional bean accessors synthesized from `getX`/`isX`/`setX` methods.
//!
//! Bindings point into the declaring type's descriptor by index, so a member
//! record is small and cloning one never copies host callables.

use std::sync::Arc;

use hostwire_sdk::{
    ConstructorDescriptor, FieldDescriptor, HostType, HostValue, InteropResult, MethodDescriptor,
    Modifiers,
};

use crate::signature::SignatureKey;

/// A field exposed under a member name
#[derive(Clone)]
pub struct FieldBinding {
    declaring: HostType,
    index: usize,
}

impl FieldBinding {
    pub(crate) fn new(declaring: HostType, index: usize) -> Self {
        Self { declaring, index }
    }

    /// Type that declares the field
    pub fn declaring(&self) -> &HostType {
        &self.declaring
    }

    /// Field descriptor
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.declaring.fields()[self.index]
    }

    /// Declared field type
    pub fn ty(&self) -> &HostType {
        self.descriptor().ty()
    }

    /// Whether writes are rejected
    pub fn is_final(&self) -> bool {
        self.descriptor().is_final()
    }

    /// Read from `receiver`
    pub fn get(&self, receiver: &HostValue) -> InteropResult<HostValue> {
        self.descriptor().get(receiver)
    }

    /// Write to `receiver`
    pub fn set(&self, receiver: &HostValue, value: HostValue) -> InteropResult<()> {
        self.descriptor().set(receiver, value)
    }
}

/// One invocable method bound to its signature
#[derive(Clone)]
pub struct Overload {
    name: Arc<str>,
    declaring: HostType,
    index: usize,
    signature: SignatureKey,
    hidden: bool,
}

impl Overload {
    pub(crate) fn new(name: Arc<str>, declaring: HostType, index: usize) -> Self {
        let method = &declaring.methods()[index];
        let signature = SignatureKey::from_shared(method.params().clone());
        let hidden = method.is_hidden();
        Self {
            name,
            declaring,
            index,
            signature,
            hidden,
        }
    }

    /// Exposed (remapped) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type that declares the method
    pub fn declaring(&self) -> &HostType {
        &self.declaring
    }

    /// Method descriptor
    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.declaring.methods()[self.index]
    }

    /// Parameter signature
    pub fn signature(&self) -> &SignatureKey {
        &self.signature
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.signature.arity()
    }

    /// Declared return type
    pub fn return_type(&self) -> &HostType {
        self.descriptor().return_type()
    }

    /// Whether the method carries the exclusion marker
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the method is declared static
    pub fn is_static(&self) -> bool {
        self.descriptor().modifiers().contains(Modifiers::STATIC)
    }

    /// Direct, uncached call. Arguments must already match the parameter types.
    pub fn invoke(&self, receiver: &HostValue, args: &[HostValue]) -> InteropResult<HostValue> {
        self.descriptor().invoke(receiver, args)
    }
}

/// A public constructor
#[derive(Clone)]
pub struct Constructor {
    declaring: HostType,
    index: usize,
}

impl Constructor {
    pub(crate) fn new(declaring: HostType, index: usize) -> Self {
        Self { declaring, index }
    }

    /// Type constructed
    pub fn declaring(&self) -> &HostType {
        &self.declaring
    }

    /// Constructor descriptor
    pub fn descriptor(&self) -> &ConstructorDescriptor {
        &self.declaring.constructors()[self.index]
    }

    /// Parameter signature
    pub fn signature(&self) -> SignatureKey {
        SignatureKey::from_shared(self.descriptor().params().clone())
    }

    /// Create an instance
    pub fn invoke(&self, args: &[HostValue]) -> InteropResult<HostValue> {
        self.descriptor().invoke(&self.declaring, args)
    }
}

/// Everything a host type exposes under one name
#[derive(Clone)]
pub struct Member {
    name: String,
    field: Option<FieldBinding>,
    overloads: Vec<Overload>,
    getter: Option<Overload>,
    setter: Option<Overload>,
}

impl Member {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: None,
            overloads: Vec::new(),
            getter: None,
            setter: None,
        }
    }

    /// Exposed name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field binding, if a field is exposed under this name
    pub fn field(&self) -> Option<&FieldBinding> {
        self.field.as_ref()
    }

    /// Visible overloads, in first-seen order
    pub fn overloads(&self) -> impl Iterator<Item = &Overload> {
        self.overloads.iter().filter(|o| !o.hidden)
    }

    /// Visible overload with exactly this signature
    pub fn overload(&self, signature: &SignatureKey) -> Option<&Overload> {
        self.overloads().find(|o| o.signature == *signature)
    }

    /// Whether any visible overload exists
    pub fn has_overloads(&self) -> bool {
        self.overloads().next().is_some()
    }

    /// Bean getter
    pub fn getter(&self) -> Option<&Overload> {
        self.getter.as_ref()
    }

    /// Bean setter
    pub fn setter(&self) -> Option<&Overload> {
        self.setter.as_ref()
    }

    /// Whether this member is a bean alias
    pub fn is_bean(&self) -> bool {
        self.getter.is_some() || self.setter.is_some()
    }

    /// Whether nothing visible is exposed under this name
    pub fn is_empty(&self) -> bool {
        self.field.is_none() && !self.is_bean() && !self.has_overloads()
    }

    /// All overloads including hidden ones
    #[cfg(test)]
    pub(crate) fn all_overloads(&self) -> &[Overload] {
        &self.overloads
    }

    pub(crate) fn bind_field(&mut self, field: FieldBinding) {
        if self.field.is_none() {
            self.field = Some(field);
        }
    }

    /// Add an overload unless its signature is already present.
    pub(crate) fn add_overload(&mut self, overload: Overload) -> bool {
        if self.overloads.iter().any(|o| o.signature == overload.signature) {
            return false;
        }
        self.overloads.push(overload);
        true
    }

    pub(crate) fn bind_getter(&mut self, getter: Overload) {
        if self.getter.is_none() {
            self.getter = Some(getter);
        }
    }

    pub(crate) fn bind_setter(&mut self, setter: Overload) {
        if self.setter.is_none() {
            self.setter = Some(setter);
        }
    }

    /// Fold `other` into this member. Slots already filled are kept.
    pub(crate) fn merge(&mut self, other: &Member) {
        if let Some(field) = &other.field {
            self.bind_field(field.clone());
        }
        for overload in &other.overloads {
            self.add_overload(overload.clone());
        }
        if let Some(getter) = &other.getter {
            self.bind_getter(getter.clone());
        }
        if let Some(setter) = &other.setter {
            self.bind_setter(setter.clone());
        }
    }
}

impl std::fmt::Debug for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("field", &self.field.as_ref().map(|b| b.declaring().name().to_string()))
            .field(
                "overloads",
                &self.overloads().map(|o| o.signature().clone()).collect::<Vec<_>>(),
            )
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .finish()
    }
}

/// Accessor role detected from a method name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BeanRole {
    Getter,
    Setter,
}

/// Detect `getX()` / `isX()` / `setX(v)` and return the alias `x`.
///
/// `getX` needs zero parameters and a non-void return, `isX` zero parameters
/// and a boolean return, `setX` exactly one parameter. X must start with an
/// uppercase character.
pub(crate) fn bean_alias(name: &str, method: &MethodDescriptor) -> Option<(String, BeanRole)> {
    let arity = method.params().len();
    let returns = method.return_type();

    if arity == 0 && !returns.is_void() {
        if let Some(alias) = name.strip_prefix("get").and_then(decapitalize) {
            return Some((alias, BeanRole::Getter));
        }
    }
    if arity == 1 {
        if let Some(alias) = name.strip_prefix("set").and_then(decapitalize) {
            return Some((alias, BeanRole::Setter));
        }
    }
    if arity == 0 && *returns == HostType::boolean() {
        if let Some(alias) = name.strip_prefix("is").and_then(decapitalize) {
            return Some((alias, BeanRole::Getter));
        }
    }
    None
}

fn decapitalize(rest: &str) -> Option<String> {
    let mut chars = rest.chars();
    let first = chars.next().filter(|c| c.is_uppercase())?;
    let mut alias: String = first.to_lowercase().collect();
    alias.push_str(chars.as_str());
    Some(alias)
}
