//! Interpreter-facing bridge
//!
//! [`HostBridge`] is the one object an interpreter holds to reach host
//! objects. It owns the catalog, the coercion registry and the dispatch
//! cache, and turns lookup misses into [`InteropError`] variants scripts
//! can report.

use std::sync::Arc;

use hostwire_sdk::{HostType, HostValue, InteropError, InteropResult};

use crate::catalog::{Member, Overload, TypeCatalog};
use crate::coercion::CoercionRegistry;
use crate::config::InteropConfig;
use crate::dispatch::convert::{ArgConversion, ReturnConversion};
use crate::dispatch::DispatchCache;
use crate::remap::{ChainRemapper, NoopRemapper, PrefixRemapper, Remapper};
use crate::signature::SignatureKey;

/// Property access, method calls and construction on host objects
pub struct HostBridge {
    config: InteropConfig,
    catalog: TypeCatalog,
    coercions: CoercionRegistry,
    dispatch: DispatchCache,
}

impl HostBridge {
    /// Create a bridge. `remapper` is consulted before the configured
    /// prefix stripping.
    pub fn new(config: InteropConfig, remapper: Arc<dyn Remapper>) -> Self {
        let chain = ChainRemapper::new().then(remapper).then(Arc::new(
            PrefixRemapper::with_prefixes(config.remap.strip_prefixes.iter().cloned()),
        ));
        let catalog = TypeCatalog::new(Arc::new(chain))
            .with_bean_properties(config.interop.bean_properties);
        let coercions =
            CoercionRegistry::new().with_strict_enums(config.interop.strict_enum_coercion);

        tracing::debug!(
            fast_dispatch = config.interop.fast_dispatch,
            bean_properties = config.interop.bean_properties,
            strict_enum_coercion = config.interop.strict_enum_coercion,
            "host bridge initialized"
        );
        Self {
            config,
            catalog,
            coercions,
            dispatch: DispatchCache::new(),
        }
    }

    /// Bridge without a custom remapper
    pub fn with_config(config: InteropConfig) -> Self {
        Self::new(config, Arc::new(NoopRemapper))
    }

    /// Active configuration
    pub fn config(&self) -> &InteropConfig {
        &self.config
    }

    /// Member catalog
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Coercion registry, for startup registration
    pub fn coercions(&self) -> &CoercionRegistry {
        &self.coercions
    }

    /// Dispatch tables
    pub fn dispatch(&self) -> &DispatchCache {
        &self.dispatch
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Read a field, else a bean getter
    pub fn get_property(&self, receiver: &HostValue, name: &str) -> InteropResult<HostValue> {
        let ty = receiver_type(receiver)?;
        let member = self.member(&ty, name)?;

        if let Some(field) = member.field() {
            let value = field.get(receiver)?;
            return Ok(ReturnConversion::for_return(field.ty()).apply(value));
        }
        if let Some(getter) = member.getter() {
            return self.call_overload(&ty, getter, receiver, &[]);
        }
        Err(no_such_member(&ty, name))
    }

    /// Write a non-final field, else call a bean setter.
    ///
    /// The value is coerced to the field or setter parameter type.
    pub fn set_property(
        &self,
        receiver: &HostValue,
        name: &str,
        value: HostValue,
    ) -> InteropResult<()> {
        let ty = receiver_type(receiver)?;
        let member = self.member(&ty, name)?;

        if let Some(field) = member.field().filter(|f| !f.is_final()) {
            let value = self.coerce_arg(&value, field.ty())?;
            return field.set(receiver, value);
        }
        if let Some(setter) = member.setter() {
            let param = setter.signature().params().first().ok_or_else(|| {
                InteropError::Internal(format!("setter {} takes no parameter", setter.name()))
            })?;
            let value = self.coerce_arg(&value, param)?;
            self.call_overload(&ty, setter, receiver, &[value])?;
            return Ok(());
        }
        Err(InteropError::ReadOnlyProperty {
            type_name: ty.name().to_string(),
            name: name.to_string(),
        })
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Call an instance method.
    ///
    /// Picks the first visible overload whose arity matches and whose every
    /// parameter accepts its argument, directly or through a coercion rule.
    pub fn call_method(
        &self,
        receiver: &HostValue,
        name: &str,
        args: &[HostValue],
    ) -> InteropResult<HostValue> {
        let ty = receiver_type(receiver)?;
        self.call_on(&ty, receiver, name, args, false)
    }

    /// Call a static method of `ty`; instance overloads are never selected
    pub fn call_static(
        &self,
        ty: &HostType,
        name: &str,
        args: &[HostValue],
    ) -> InteropResult<HostValue> {
        self.call_on(ty, &HostValue::Null, name, args, true)
    }

    fn call_on(
        &self,
        ty: &HostType,
        receiver: &HostValue,
        name: &str,
        args: &[HostValue],
        static_only: bool,
    ) -> InteropResult<HostValue> {
        let member = self.member(ty, name)?;
        if !member.has_overloads() {
            return Err(no_such_member(ty, name));
        }

        let overload = member
            .overloads()
            .find(|o| {
                (!static_only || o.is_static())
                    && o.arity() == args.len()
                    && o.signature()
                        .params()
                        .iter()
                        .zip(args)
                        .all(|(param, arg)| self.accepts(arg, param))
            })
            .ok_or_else(|| InteropError::NoMatchingOverload {
                type_name: ty.name().to_string(),
                name: name.to_string(),
                arg_count: args.len(),
            })?;

        let coerced = self.coerce_args(overload.signature().params(), args)?;
        self.call_overload(ty, overload, receiver, &coerced)
    }

    fn call_overload(
        &self,
        ty: &HostType,
        overload: &Overload,
        receiver: &HostValue,
        args: &[HostValue],
    ) -> InteropResult<HostValue> {
        if self.config.interop.fast_dispatch {
            let table = self.dispatch.table(&self.catalog, ty);
            if let Some(index) =
                table.get_index_by_types(overload.name(), overload.signature().params())
            {
                return table.invoke(receiver, index, args);
            }
        }

        let converted = overload
            .signature()
            .params()
            .iter()
            .zip(args)
            .map(|(param, arg)| ArgConversion::for_param(param).apply(arg))
            .collect::<InteropResult<Vec<_>>>()?;
        let result = overload.invoke(receiver, &converted)?;
        Ok(ReturnConversion::for_return(overload.return_type()).apply(result))
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create an instance through the constructor with exactly `signature`
    pub fn construct(
        &self,
        ty: &HostType,
        signature: &SignatureKey,
        args: &[HostValue],
    ) -> InteropResult<HostValue> {
        let constructor = self.catalog.constructor_of(ty, signature).ok_or_else(|| {
            InteropError::NoSuchConstructor {
                type_name: ty.name().to_string(),
                signature: signature.to_string(),
            }
        })?;
        if args.len() != signature.arity() {
            return Err(InteropError::Argument(format!(
                "{}({}) expects {} argument(s), got {}",
                ty,
                signature,
                signature.arity(),
                args.len()
            )));
        }

        let coerced = self.coerce_args(signature.params(), args)?;
        constructor.invoke(&coerced)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn member(&self, ty: &HostType, name: &str) -> InteropResult<Arc<Member>> {
        self.catalog
            .member_of(ty, name)
            .ok_or_else(|| no_such_member(ty, name))
    }

    fn accepts(&self, value: &HostValue, param: &HostType) -> bool {
        value.conforms_to(param) || self.coercions.has_rule(value, param)
    }

    fn coerce_arg(&self, value: &HostValue, param: &HostType) -> InteropResult<HostValue> {
        if value.conforms_to(param) {
            return ArgConversion::for_param(param).apply(value);
        }
        match self.coercions.lookup(value, param) {
            Some(factory) => factory.wrap(value, param),
            None => Err(InteropError::TypeMismatch {
                expected: param.name().to_string(),
                got: value.kind_name().to_string(),
            }),
        }
    }

    fn coerce_args(&self, params: &[HostType], args: &[HostValue]) -> InteropResult<Vec<HostValue>> {
        params
            .iter()
            .zip(args)
            .map(|(param, arg)| self.coerce_arg(arg, param))
            .collect()
    }
}

impl Default for HostBridge {
    fn default() -> Self {
        Self::with_config(InteropConfig::default())
    }
}

fn receiver_type(receiver: &HostValue) -> InteropResult<HostType> {
    receiver.host_type().ok_or_else(|| InteropError::TypeMismatch {
        expected: "host object".to_string(),
        got: receiver.kind_name().to_string(),
    })
}

fn no_such_member(ty: &HostType, name: &str) -> InteropError {
    InteropError::NoSuchMember {
        type_name: ty.name().to_string(),
        name: name.to_string(),
    }
}
