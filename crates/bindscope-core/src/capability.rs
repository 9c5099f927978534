//! Structural capabilities detected from a type's method set

use crate::types::Signature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A protocol the host-side wrapper of a type may implement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Has a textual representation: `String() string`
    Stringer,
    /// Usable as an error value: `Error() string`
    Error,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::Stringer, Capability::Error];

    /// Name of the method whose shape reveals this capability
    pub fn method_name(self) -> &'static str {
        match self {
            Capability::Stringer => "String",
            Capability::Error => "Error",
        }
    }

    /// Signature-only check, ignoring the receiver
    pub fn matches(self, name: &str, sig: &Signature) -> bool {
        match self {
            Capability::Stringer | Capability::Error => {
                name == self.method_name()
                    && sig.params.is_empty()
                    && sig.results.len() == 1
                    && sig.results[0].ty.is_string()
            }
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Stringer => write!(f, "stringer"),
            Capability::Error => write!(f, "error"),
        }
    }
}

/// Growable set of detected capabilities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, capability: Capability) -> bool {
        self.0.insert(capability)
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
