//! Script-facing member names
//!
//! A host build may declare members under unstable names (generated,
//! obfuscated, or prefixed to avoid clashes). A [`Remapper`] supplies the
//! stable name scripts use. `None` means "keep the declared name".

use std::sync::Arc;

use hostwire_sdk::HostType;

/// Supplies stable script-facing names for declared members
pub trait Remapper: Send + Sync {
    /// Script name for field `name` declared on `ty`
    fn remap_field(&self, ty: &HostType, name: &str) -> Option<String> {
        let _ = (ty, name);
        None
    }

    /// Script name for method `name` declared on `ty`
    fn remap_method(&self, ty: &HostType, name: &str) -> Option<String> {
        let _ = (ty, name);
        None
    }
}

/// Resolve a field's exposed name, falling back to the declared name
pub fn field_name(remapper: &dyn Remapper, ty: &HostType, name: &str) -> String {
    remapper
        .remap_field(ty, name)
        .unwrap_or_else(|| name.to_string())
}

/// Resolve a method's exposed name, falling back to the declared name
pub fn method_name(remapper: &dyn Remapper, ty: &HostType, name: &str) -> String {
    remapper
        .remap_method(ty, name)
        .unwrap_or_else(|| name.to_string())
}

/// Never remaps
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRemapper;

impl Remapper for NoopRemapper {}

/// Strips a name prefix.
///
/// The type's own declared prefix (see `TypeBuilder::remap_prefix`) is tried
/// first, then each globally configured prefix in order. A member whose name
/// is exactly the prefix is left alone.
#[derive(Debug, Default, Clone)]
pub struct PrefixRemapper {
    prefixes: Vec<String>,
}

impl PrefixRemapper {
    /// Remapper honouring only per-type prefixes
    pub fn new() -> Self {
        Self::default()
    }

    /// Remapper with additional global prefixes
    pub fn with_prefixes(prefixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            prefixes: prefixes.into_iter().filter(|p| !p.is_empty()).collect(),
        }
    }

    fn strip(&self, ty: &HostType, name: &str) -> Option<String> {
        ty.remap_prefix()
            .into_iter()
            .chain(self.prefixes.iter().map(String::as_str))
            .find_map(|prefix| {
                name.strip_prefix(prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(str::to_string)
            })
    }
}

impl Remapper for PrefixRemapper {
    fn remap_field(&self, ty: &HostType, name: &str) -> Option<String> {
        self.strip(ty, name)
    }

    fn remap_method(&self, ty: &HostType, name: &str) -> Option<String> {
        self.strip(ty, name)
    }
}

/// Consults remappers in order; the first mapping wins
#[derive(Default, Clone)]
pub struct ChainRemapper {
    links: Vec<Arc<dyn Remapper>>,
}

impl ChainRemapper {
    /// Empty chain (remaps nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a remapper
    pub fn then(mut self, remapper: Arc<dyn Remapper>) -> Self {
        self.links.push(remapper);
        self
    }
}

impl Remapper for ChainRemapper {
    fn remap_field(&self, ty: &HostType, name: &str) -> Option<String> {
        self.links.iter().find_map(|r| r.remap_field(ty, name))
    }

    fn remap_method(&self, ty: &HostType, name: &str) -> Option<String> {
        self.links.iter().find_map(|r| r.remap_method(ty, name))
    }
}
