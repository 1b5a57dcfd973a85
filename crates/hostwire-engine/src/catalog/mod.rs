//! Per-host-type member catalog
//!
//! [`TypeCatalog`] caches one [`CatalogEntry`] per host type. Each entry lazily
//! computes, exactly once and then publishes immutably:
//!
//! - its parent entry (superclass), `None` at the root type;
//! - its own members, built from the type's declared public fields and
//!   methods, with exposed names taken from the [`Remapper`] and bean aliases
//!   synthesized from accessor naming conventions;
//! - its lineage: self, then implemented interfaces (transitively) and the
//!   superclass chain, breadth first, each type once;
//! - its merged member table: the own members of every type in the lineage
//!   folded into fresh [`Member`] records, first-seen wins per slot;
//! - its constructor index, keyed by exact [`SignatureKey`].
//!
//! Concurrent first use may race on an entry's cell; `OnceCell` guarantees a
//! single published value and every computation here is deterministic.

mod member;

pub use member::{Constructor, FieldBinding, Member, Overload};

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use hostwire_sdk::{HostType, Modifiers};
use once_cell::sync::OnceCell;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::remap::{self, NoopRemapper, Remapper};
use crate::signature::SignatureKey;
use member::{bean_alias, BeanRole};

/// Members declared directly on one type
struct OwnMembers {
    members: FxHashMap<String, Member>,
    /// Every public, non-native method in declaration order (hidden included)
    methods: Vec<Overload>,
}

/// Cached reflection data for one host type
pub struct CatalogEntry {
    ty: HostType,
    parent: OnceCell<Option<Arc<CatalogEntry>>>,
    own: OnceCell<OwnMembers>,
    lineage: OnceCell<Vec<Arc<CatalogEntry>>>,
    actual: OnceCell<FxHashMap<String, Arc<Member>>>,
    constructors: OnceCell<FxHashMap<SignatureKey, Constructor>>,
}

impl CatalogEntry {
    fn new(ty: HostType) -> Self {
        Self {
            ty,
            parent: OnceCell::new(),
            own: OnceCell::new(),
            lineage: OnceCell::new(),
            actual: OnceCell::new(),
            constructors: OnceCell::new(),
        }
    }

    /// Host type this entry describes
    pub fn host_type(&self) -> &HostType {
        &self.ty
    }
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("type", &self.ty)
            .field("own_built", &self.own.get().is_some())
            .field("actual_built", &self.actual.get().is_some())
            .finish()
    }
}

/// Registry of catalog entries, one per host type, never evicted
pub struct TypeCatalog {
    entries: DashMap<HostType, Arc<CatalogEntry>>,
    remapper: Arc<dyn Remapper>,
    bean_properties: bool,
}

impl TypeCatalog {
    /// Create a catalog using `remapper` for exposed names
    pub fn new(remapper: Arc<dyn Remapper>) -> Self {
        Self {
            entries: DashMap::new(),
            remapper,
            bean_properties: true,
        }
    }

    /// Enable or disable bean alias synthesis (enabled by default)
    pub fn with_bean_properties(mut self, enabled: bool) -> Self {
        self.bean_properties = enabled;
        self
    }

    /// Entry for `ty`, created on first request
    pub fn of(&self, ty: &HostType) -> Arc<CatalogEntry> {
        if let Some(entry) = self.entries.get(ty) {
            return entry.value().clone();
        }
        self.entries
            .entry(ty.clone())
            .or_insert_with(|| Arc::new(CatalogEntry::new(ty.clone())))
            .value()
            .clone()
    }

    /// Superclass entry, or `None` at the root
    pub fn parent(&self, entry: &CatalogEntry) -> Option<Arc<CatalogEntry>> {
        entry
            .parent
            .get_or_init(|| entry.ty.superclass().map(|s| self.of(s)))
            .clone()
    }

    /// Members declared directly on the entry's type
    pub fn own_members<'e>(&self, entry: &'e CatalogEntry) -> &'e FxHashMap<String, Member> {
        &self.own(entry).members
    }

    fn own<'e>(&self, entry: &'e CatalogEntry) -> &'e OwnMembers {
        entry.own.get_or_init(|| self.scan(&entry.ty))
    }

    /// Visible methods declared directly on the type, in declaration order
    pub(crate) fn declared_methods<'e>(&self, entry: &'e CatalogEntry) -> &'e [Overload] {
        &self.own(entry).methods
    }

    fn scan(&self, ty: &HostType) -> OwnMembers {
        let mut members: FxHashMap<String, Member> = FxHashMap::default();
        let mut methods = Vec::new();

        for (index, field) in ty.fields().iter().enumerate() {
            let modifiers = field.modifiers();
            if !modifiers.contains(Modifiers::PUBLIC)
                || modifiers.contains(Modifiers::TRANSIENT)
                || field.is_hidden()
            {
                continue;
            }
            let name = remap::field_name(self.remapper.as_ref(), ty, field.name());
            members
                .entry(name.clone())
                .or_insert_with(|| Member::new(name))
                .bind_field(FieldBinding::new(ty.clone(), index));
        }

        for (index, method) in ty.methods().iter().enumerate() {
            let modifiers = method.modifiers();
            if !modifiers.contains(Modifiers::PUBLIC) || modifiers.contains(Modifiers::NATIVE) {
                continue;
            }
            let name = remap::method_name(self.remapper.as_ref(), ty, method.name());
            let overload = Overload::new(Arc::from(name.as_str()), ty.clone(), index);
            methods.push(overload.clone());

            let hidden = overload.is_hidden();
            members
                .entry(name.clone())
                .or_insert_with(|| Member::new(name.clone()))
                .add_overload(overload.clone());

            if hidden || !self.bean_properties {
                continue;
            }
            if let Some((alias, role)) = bean_alias(&name, method) {
                let member = members
                    .entry(alias.clone())
                    .or_insert_with(|| Member::new(alias));
                match role {
                    BeanRole::Getter => member.bind_getter(overload),
                    BeanRole::Setter => member.bind_setter(overload),
                }
            }
        }

        tracing::debug!(
            ty = %ty,
            members = members.len(),
            methods = methods.len(),
            "built own member table"
        );
        OwnMembers { members, methods }
    }

    /// Breadth-first traversal order used for merging: self, then interfaces
    /// and superclass of each visited type. Each type appears once.
    pub fn lineage<'e>(&self, entry: &'e CatalogEntry) -> &'e [Arc<CatalogEntry>] {
        entry.lineage.get_or_init(|| {
            let mut order = Vec::new();
            let mut seen: FxHashSet<HostType> = FxHashSet::default();
            let mut queue = VecDeque::new();
            queue.push_back(self.of(&entry.ty));

            while let Some(current) = queue.pop_front() {
                if !seen.insert(current.ty.clone()) {
                    continue;
                }
                for iface in current.ty.interfaces() {
                    queue.push_back(self.of(iface));
                }
                if let Some(parent) = self.parent(&current) {
                    queue.push_back(parent);
                }
                order.push(current);
            }
            order
        })
    }

    /// Merged member table across the whole lineage
    pub fn actual_members<'e>(
        &self,
        entry: &'e CatalogEntry,
    ) -> &'e FxHashMap<String, Arc<Member>> {
        entry.actual.get_or_init(|| {
            let mut merged: FxHashMap<String, Member> = FxHashMap::default();
            for ancestor in self.lineage(entry) {
                for (name, member) in self.own_members(ancestor) {
                    merged
                        .entry(name.clone())
                        .or_insert_with(|| Member::new(name.clone()))
                        .merge(member);
                }
            }

            tracing::debug!(
                ty = %entry.ty,
                members = merged.len(),
                lineage = self.lineage(entry).len(),
                "built merged member table"
            );
            merged
                .into_iter()
                .map(|(name, member)| (name, Arc::new(member)))
                .collect()
        })
    }

    /// Look up a visible member by exposed name
    pub fn member(&self, entry: &CatalogEntry, name: &str) -> Option<Arc<Member>> {
        self.actual_members(entry)
            .get(name)
            .filter(|m| !m.is_empty())
            .cloned()
    }

    /// Look up a visible member of `ty` by exposed name
    pub fn member_of(&self, ty: &HostType, name: &str) -> Option<Arc<Member>> {
        self.member(&self.of(ty), name)
    }

    /// Exposed member names, sorted
    pub fn member_names(&self, entry: &CatalogEntry) -> Vec<String> {
        let mut names: Vec<String> = self
            .actual_members(entry)
            .values()
            .filter(|m| !m.is_empty())
            .map(|m| m.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Public, non-hidden constructor with exactly `signature`
    pub fn constructor(&self, entry: &CatalogEntry, signature: &SignatureKey) -> Option<Constructor> {
        entry
            .constructors
            .get_or_init(|| {
                let mut index = FxHashMap::default();
                for (i, ctor) in entry.ty.constructors().iter().enumerate() {
                    if !ctor.modifiers().contains(Modifiers::PUBLIC) || ctor.is_hidden() {
                        continue;
                    }
                    index
                        .entry(SignatureKey::from_shared(ctor.params().clone()))
                        .or_insert_with(|| Constructor::new(entry.ty.clone(), i));
                }
                tracing::debug!(ty = %entry.ty, constructors = index.len(), "built constructor index");
                index
            })
            .get(signature)
            .cloned()
    }

    /// Public, non-hidden constructor of `ty` with exactly `signature`
    pub fn constructor_of(&self, ty: &HostType, signature: &SignatureKey) -> Option<Constructor> {
        self.constructor(&self.of(ty), signature)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry has been created yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new(Arc::new(NoopRemapper))
    }
}
