//! Value coercion registry
//!
//! Maps a host target type to a rule that converts an incoming script value
//! into a value of that type. A rule pairs a validator, deciding whether it
//! applies to a given candidate value, with a factory producing the
//! converted value.
//!
//! Rules are registered during startup and read afterwards. Enumeration
//! types need no registration: their [`EnumCoercion`] is derived on first
//! lookup and cached for the life of the registry.

mod enum_coercion;

pub use enum_coercion::EnumCoercion;

use std::sync::Arc;

use dashmap::DashMap;
use hostwire_sdk::{HostType, HostValue, InteropError, InteropResult};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Converts a script value into a value of the target type
pub trait CoercionFactory: Send + Sync {
    /// Produce the converted value
    fn wrap(&self, value: &HostValue, target: &HostType) -> InteropResult<HostValue>;
}

impl<F> CoercionFactory for F
where
    F: Fn(&HostValue, &HostType) -> InteropResult<HostValue> + Send + Sync,
{
    fn wrap(&self, value: &HostValue, target: &HostType) -> InteropResult<HostValue> {
        self(value, target)
    }
}

/// Decides whether a rule applies to `(candidate, target)`
pub type CoercionValidator = Arc<dyn Fn(&HostValue, &HostType) -> bool + Send + Sync>;

/// A registered coercion rule
pub struct CoercionRule {
    target: HostType,
    validator: CoercionValidator,
    factory: Arc<dyn CoercionFactory>,
}

impl CoercionRule {
    /// Target type
    pub fn target(&self) -> &HostType {
        &self.target
    }

    /// Whether the rule applies to `value`
    pub fn accepts(&self, value: &HostValue) -> bool {
        (self.validator)(value, &self.target)
    }

    /// Conversion factory
    pub fn factory(&self) -> &Arc<dyn CoercionFactory> {
        &self.factory
    }
}

/// Target type -> coercion rule
pub struct CoercionRegistry {
    rules: RwLock<FxHashMap<HostType, Arc<CoercionRule>>>,
    enums: DashMap<HostType, Arc<EnumCoercion>>,
    strict_enums: bool,
}

impl CoercionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(FxHashMap::default()),
            enums: DashMap::new(),
            strict_enums: false,
        }
    }

    /// Make derived enum coercions strict
    pub fn with_strict_enums(mut self, strict: bool) -> Self {
        self.strict_enums = strict;
        self
    }

    /// Register a rule that applies to every candidate value
    pub fn register<F>(&self, target: &HostType, factory: F) -> InteropResult<()>
    where
        F: Fn(&HostValue, &HostType) -> InteropResult<HostValue> + Send + Sync + 'static,
    {
        self.register_validated(target, |_, _| true, factory)
    }

    /// Register a rule guarded by `validator`.
    ///
    /// Fails for the root object type, for array types and for a target
    /// that already has a rule; the existing rule stays active.
    pub fn register_validated<V, F>(
        &self,
        target: &HostType,
        validator: V,
        factory: F,
    ) -> InteropResult<()>
    where
        V: Fn(&HostValue, &HostType) -> bool + Send + Sync + 'static,
        F: Fn(&HostValue, &HostType) -> InteropResult<HostValue> + Send + Sync + 'static,
    {
        self.insert(target, Arc::new(validator), Arc::new(factory))
    }

    /// Register a pre-built factory (for example a shared [`EnumCoercion`])
    pub fn register_factory(
        &self,
        target: &HostType,
        factory: Arc<dyn CoercionFactory>,
    ) -> InteropResult<()> {
        self.insert(target, Arc::new(|_: &HostValue, _: &HostType| true), factory)
    }

    fn insert(
        &self,
        target: &HostType,
        validator: CoercionValidator,
        factory: Arc<dyn CoercionFactory>,
    ) -> InteropResult<()> {
        if target.is_object() {
            return Err(InteropError::Configuration(
                "You can't register a coercion for Object!".to_string(),
            ));
        }
        if target.is_array() {
            return Err(InteropError::Configuration(format!(
                "You can't register a coercion for an array type ({})!",
                target
            )));
        }

        let mut rules = self.rules.write();
        if rules.contains_key(target) {
            tracing::warn!(target = %target, "rejected duplicate coercion registration");
            return Err(InteropError::Configuration(format!(
                "Coercion for {} is already registered!",
                target
            )));
        }
        rules.insert(
            target.clone(),
            Arc::new(CoercionRule {
                target: target.clone(),
                validator,
                factory,
            }),
        );
        Ok(())
    }

    /// Factory that converts `value` to `target`, if any applies.
    ///
    /// An explicit rule is used only when its validator accepts the value.
    /// Without a rule, enumeration targets get a derived [`EnumCoercion`].
    pub fn lookup(&self, value: &HostValue, target: &HostType) -> Option<Arc<dyn CoercionFactory>> {
        if target.is_object() {
            return None;
        }
        let rule = self.rules.read().get(target).cloned();
        if let Some(rule) = rule {
            return rule.accepts(value).then(|| rule.factory.clone());
        }
        if target.is_enum() {
            return Some(self.enum_coercion(target)? as Arc<dyn CoercionFactory>);
        }
        None
    }

    /// Whether [`lookup`](Self::lookup) would return a factory
    pub fn has_rule(&self, value: &HostValue, target: &HostType) -> bool {
        if target.is_object() {
            return false;
        }
        let rule = self.rules.read().get(target).cloned();
        match rule {
            Some(rule) => rule.accepts(value),
            None => target.is_enum(),
        }
    }

    /// Cached enum coercion for `ty`, derived on first request
    pub fn enum_coercion(&self, ty: &HostType) -> Option<Arc<EnumCoercion>> {
        if !ty.is_enum() {
            return None;
        }
        if let Some(existing) = self.enums.get(ty) {
            return Some(existing.value().clone());
        }
        let strict = self.strict_enums;
        Some(
            self.enums
                .entry(ty.clone())
                .or_insert_with(|| Arc::new(EnumCoercion::build(ty).strict(strict)))
                .value()
                .clone(),
        )
    }

    /// Convert `value` to `target` through the applicable rule
    pub fn coerce(&self, value: &HostValue, target: &HostType) -> Option<InteropResult<HostValue>> {
        self.lookup(value, target)
            .map(|factory| factory.wrap(value, target))
    }

    /// Number of explicit rules
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Whether no explicit rule is registered
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }

    /// Drop every explicit rule and derived enum coercion
    pub fn clear(&self) {
        self.rules.write().clear();
        self.enums.clear();
    }
}

impl Default for CoercionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
