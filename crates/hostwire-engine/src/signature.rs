//! Overload identity: an exact, ordered parameter-type list

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use hostwire_sdk::HostType;

/// Ordered parameter types identifying one overload or constructor.
///
/// Two keys are equal only when every position names the same host type;
/// there is no widening or promotion.
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureKey {
    params: Arc<[HostType]>,
}

impl SignatureKey {
    /// Key for a parameter list
    pub fn new(params: impl IntoIterator<Item = HostType>) -> Self {
        Self {
            params: params.into_iter().collect(),
        }
    }

    /// Key sharing an existing parameter slice
    pub fn from_shared(params: Arc<[HostType]>) -> Self {
        Self { params }
    }

    /// Key for a zero-parameter member
    pub fn empty() -> Self {
        Self::new([])
    }

    /// Parameter types
    pub fn params(&self) -> &[HostType] {
        &self.params
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Hash for SignatureKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.params.len().hash(state);
        for param in self.params.iter() {
            param.hash(state);
        }
    }
}

impl fmt::Debug for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self)
    }
}

impl fmt::Display for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(param.name())?;
        }
        Ok(())
    }
}
