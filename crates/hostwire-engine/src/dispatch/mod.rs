//! Fast dispatch
//!
//! [`DispatchCache`] owns one [`DispatchTable`] per host type. A table is
//! built on first request behind that type's own `OnceCell`: concurrent
//! first callers block until the single build finishes, then every caller
//! shares the same immutable table.

pub(crate) mod convert;
mod table;

pub use table::{DispatchEntry, DispatchTable};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use hostwire_sdk::{HostType, HostValue, InteropResult};
use once_cell::sync::OnceCell;

use crate::catalog::TypeCatalog;

/// Per-type dispatch tables, built once and never evicted
#[derive(Default)]
pub struct DispatchCache {
    tables: DashMap<HostType, Arc<OnceCell<Arc<DispatchTable>>>>,
    builds: AtomicUsize,
}

impl DispatchCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for `ty`, building it on first request
    pub fn table(&self, catalog: &TypeCatalog, ty: &HostType) -> Arc<DispatchTable> {
        // Clone the cell out so the shard lock is not held during the build
        let cell = match self.tables.get(ty) {
            Some(cell) => cell.value().clone(),
            None => self
                .tables
                .entry(ty.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value()
                .clone(),
        };
        cell.get_or_init(|| {
            self.builds.fetch_add(1, Ordering::Relaxed);
            Arc::new(DispatchTable::build(catalog, ty))
        })
        .clone()
    }

    /// Invoke entry `index` of `ty`'s table
    pub fn invoke(
        &self,
        catalog: &TypeCatalog,
        ty: &HostType,
        receiver: &HostValue,
        index: usize,
        args: &[HostValue],
    ) -> InteropResult<HostValue> {
        self.table(catalog, ty).invoke(receiver, index, args)
    }

    /// Whether `ty`'s table has been built
    pub fn is_built(&self, ty: &HostType) -> bool {
        self.tables
            .get(ty)
            .map(|cell| cell.get().is_some())
            .unwrap_or(false)
    }

    /// Number of tables built so far
    pub fn built_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostwire_sdk::{MethodDescriptor, TypeBuilder};

    #[test]
    fn test_table_is_built_once() {
        let catalog = TypeCatalog::default();
        let cache = DispatchCache::new();
        let ty = TypeBuilder::class("demo.Once")
            .method(MethodDescriptor::new("ping", HostType::string(), |_, _| Ok("pong".into())))
            .build();

        assert!(!cache.is_built(&ty));
        let a = cache.table(&catalog, &ty);
        let b = cache.table(&catalog, &ty);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(cache.is_built(&ty));
        assert_eq!(cache.built_count(), 1);

        let ping = a.get_index("ping").unwrap();
        assert_eq!(
            cache.invoke(&catalog, &ty, &HostValue::Null, ping, &[]).unwrap(),
            HostValue::from("pong")
        );
    }
}
