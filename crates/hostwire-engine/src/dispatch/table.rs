//! Per-type dispatch table
//!
//! Built once from the catalog: every visible method reachable from the type,
//! in lineage order and then declaration order. Each entry gets a routine
//! that owns the host body plus its precomputed argument and return
//! conversions, so a call is an index into a `Vec` followed by the body.

use std::sync::Arc;

use hostwire_sdk::{HostType, HostValue, InteropError, InteropResult};
use rustc_hash::FxHashSet;

use super::convert::{ArgConversion, ReturnConversion};
use crate::catalog::{Overload, TypeCatalog};
use crate::signature::SignatureKey;

type Routine = Box<dyn Fn(&HostValue, &[HostValue]) -> InteropResult<HostValue> + Send + Sync>;

/// Descriptor of one invocable slot
#[derive(Debug, Clone)]
pub struct DispatchEntry {
    name: Arc<str>,
    signature: SignatureKey,
    return_type: HostType,
    declaring: HostType,
}

impl DispatchEntry {
    /// Exposed method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered parameter types
    pub fn params(&self) -> &[HostType] {
        self.signature.params()
    }

    /// Parameter signature
    pub fn signature(&self) -> &SignatureKey {
        &self.signature
    }

    /// Declared return type
    pub fn return_type(&self) -> &HostType {
        &self.return_type
    }

    /// Type that declares the method
    pub fn declaring(&self) -> &HostType {
        &self.declaring
    }
}

/// Indexed invocation table for one host type
pub struct DispatchTable {
    ty: HostType,
    entries: Vec<DispatchEntry>,
    routines: Vec<Routine>,
}

impl DispatchTable {
    /// Build the table for `ty` from the catalog.
    ///
    /// A method whose name and parameter list were already emitted by a type
    /// earlier in the lineage is overridden and skipped.
    pub fn build(catalog: &TypeCatalog, ty: &HostType) -> Self {
        let entry = catalog.of(ty);
        let mut seen: FxHashSet<(Arc<str>, SignatureKey)> = FxHashSet::default();
        let mut entries = Vec::new();
        let mut routines = Vec::new();

        for ancestor in catalog.lineage(&entry) {
            for overload in catalog.declared_methods(ancestor) {
                if overload.is_hidden() {
                    continue;
                }
                let name: Arc<str> = Arc::from(overload.name());
                if !seen.insert((name.clone(), overload.signature().clone())) {
                    continue;
                }
                routines.push(synthesize(overload));
                entries.push(DispatchEntry {
                    name,
                    signature: overload.signature().clone(),
                    return_type: overload.return_type().clone(),
                    declaring: overload.declaring().clone(),
                });
            }
        }

        tracing::debug!(ty = %ty, entries = entries.len(), "built dispatch table");
        Self {
            ty: ty.clone(),
            entries,
            routines,
        }
    }

    /// Host type this table dispatches for
    pub fn host_type(&self) -> &HostType {
        &self.ty
    }

    /// Entries in index order
    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    /// Entry at `index`
    pub fn entry(&self, index: usize) -> Option<&DispatchEntry> {
        self.entries.get(index)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the type exposes no methods
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry named `name`
    pub fn get_index(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| &*e.name == name)
    }

    /// First entry named `name` with exactly these parameter types
    pub fn get_index_by_types(&self, name: &str, params: &[HostType]) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| &*e.name == name && e.params() == params)
    }

    /// First entry named `name` taking `arity` parameters
    pub fn get_index_by_arity(&self, name: &str, arity: usize) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| &*e.name == name && e.signature.arity() == arity)
    }

    /// Call the entry at `index`.
    ///
    /// An out-of-range index is a caller bug: indices only ever come from
    /// this table.
    pub fn invoke(
        &self,
        receiver: &HostValue,
        index: usize,
        args: &[HostValue],
    ) -> InteropResult<HostValue> {
        let routine = self.routines.get(index).ok_or_else(|| {
            InteropError::Internal(format!(
                "Invalid dispatch index {} for {} ({} entries)",
                index,
                self.ty,
                self.routines.len()
            ))
        })?;
        tracing::trace!(ty = %self.ty, index, name = %self.entries[index].name, "dispatch");
        routine(receiver, args)
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("type", &self.ty)
            .field("count", &self.entries.len())
            .finish()
    }
}

fn synthesize(overload: &Overload) -> Routine {
    let method = overload.descriptor();
    let body = method.body().clone();
    let conversions: Box<[ArgConversion]> =
        method.params().iter().map(ArgConversion::for_param).collect();
    let ret = ReturnConversion::for_return(method.return_type());
    let label = format!("{}.{}", overload.declaring(), overload.name());

    Box::new(move |receiver: &HostValue, args: &[HostValue]| {
        if args.len() != conversions.len() {
            return Err(InteropError::Argument(format!(
                "{} expects {} argument(s), got {}",
                label,
                conversions.len(),
                args.len()
            )));
        }
        let converted = conversions
            .iter()
            .zip(args)
            .map(|(conversion, arg)| conversion.apply(arg))
            .collect::<InteropResult<Vec<_>>>()?;
        body(receiver, &converted).map(|value| ret.apply(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostwire_sdk::{MethodDescriptor, TypeBuilder};

    fn counter() -> HostType {
        TypeBuilder::class("demo.Counter")
            .method(
                MethodDescriptor::new("add", HostType::long(), |_, args| {
                    Ok(HostValue::Int(args[0].as_i64().unwrap_or(0) + 1))
                })
                .with_params([HostType::long()]),
            )
            .method(
                MethodDescriptor::new("add", HostType::double(), |_, args| {
                    Ok(HostValue::Number(args[0].as_f64().unwrap_or(0.0) + args[1].as_f64().unwrap_or(0.0)))
                })
                .with_params([HostType::double(), HostType::double()]),
            )
            .method(MethodDescriptor::new("reset", HostType::void(), |_, _| Ok(HostValue::Int(99))))
            .method(
                MethodDescriptor::new("secret", HostType::int(), |_, _| Ok(HostValue::Int(0)))
                    .as_hidden(),
            )
            .build()
    }

    #[test]
    fn test_index_lookup() {
        let catalog = TypeCatalog::default();
        let table = DispatchTable::build(&catalog, &counter());

        assert_eq!(table.len(), 3);
        assert_eq!(table.get_index("add"), Some(0));
        assert_eq!(table.get_index_by_arity("add", 2), Some(1));
        assert_eq!(
            table.get_index_by_types("add", &[HostType::long()]),
            Some(0)
        );
        assert_eq!(table.get_index_by_types("add", &[HostType::int()]), None);
        assert_eq!(table.get_index("reset"), Some(2));
        assert_eq!(table.get_index("secret"), None);
    }

    #[test]
    fn test_invoke_converts_arguments_and_results() {
        let catalog = TypeCatalog::default();
        let table = DispatchTable::build(&catalog, &counter());

        let add = table.get_index_by_arity("add", 1).unwrap();
        assert_eq!(
            table.invoke(&HostValue::Null, add, &[HostValue::Number(41.0)]).unwrap(),
            HostValue::Int(42)
        );

        let add2 = table.get_index_by_arity("add", 2).unwrap();
        assert_eq!(
            table
                .invoke(&HostValue::Null, add2, &[HostValue::Int(1), HostValue::Int(2)])
                .unwrap(),
            HostValue::Number(3.0)
        );

        let reset = table.get_index("reset").unwrap();
        assert!(table.invoke(&HostValue::Null, reset, &[]).unwrap().is_null());
    }

    #[test]
    fn test_invoke_errors() {
        let catalog = TypeCatalog::default();
        let table = DispatchTable::build(&catalog, &counter());

        assert!(matches!(
            table.invoke(&HostValue::Null, 17, &[]),
            Err(InteropError::Internal(_))
        ));
        assert!(matches!(
            table.invoke(&HostValue::Null, 0, &[]),
            Err(InteropError::Argument(_))
        ));
        assert!(matches!(
            table.invoke(&HostValue::Null, 0, &["one".into()]),
            Err(InteropError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_overrides_are_skipped() {
        let catalog = TypeCatalog::default();
        let base = TypeBuilder::class("demo.Base")
            .method(MethodDescriptor::new("id", HostType::int(), |_, _| Ok(HostValue::Int(1))))
            .method(MethodDescriptor::new("base", HostType::int(), |_, _| Ok(HostValue::Int(2))))
            .build();
        let derived = TypeBuilder::class("demo.Derived")
            .extends(&base)
            .method(MethodDescriptor::new("id", HostType::int(), |_, _| Ok(HostValue::Int(10))))
            .build();

        let table = DispatchTable::build(&catalog, &derived);
        let names: Vec<&str> = table.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["id", "base"]);
        assert_eq!(table.entries()[0].declaring(), &derived);

        let id = table.get_index("id").unwrap();
        assert_eq!(table.invoke(&HostValue::Null, id, &[]).unwrap(), HostValue::Int(10));
    }
}
