//! Variant sets: the named configuration dimensions that, together with a
//! test ID, form the identity of a tracked regression.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const VARIANT_NETWORK: &str = "Network";
pub const VARIANT_UPGRADE: &str = "Upgrade";
pub const VARIANT_PLATFORM: &str = "Platform";
pub const VARIANT_ARCH: &str = "Arch";
pub const VARIANT_VARIANT: &str = "Variant";

/// The dimensions a hand-curated intentional regression is keyed on.
pub const IDENTITY_DIMENSIONS: [&str; 4] =
    [VARIANT_NETWORK, VARIANT_UPGRADE, VARIANT_ARCH, VARIANT_PLATFORM];

/// One persisted key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariantPair {
    pub key: String,
    pub value: String,
}

/// Unordered set of dimension name → value. Keys are unique.
///
/// Backed by a `BTreeMap` so iteration, display and persistence order are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantSet(BTreeMap<String, String>);

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value for `key`, or the empty string when the dimension is absent.
    pub fn value_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when every pair in `query` is present with an equal value here.
    /// A dimension missing on this side compares as the empty string.
    pub fn matches(&self, query: &VariantSet) -> bool {
        query
            .iter()
            .all(|(key, value)| self.value_or_empty(key) == value)
    }

    /// Restrict to the given dimensions, dropping everything else.
    pub fn project(&self, keys: &[&str]) -> VariantSet {
        keys.iter()
            .filter_map(|k| self.get(k).map(|v| ((*k).to_string(), v.to_string())))
            .collect()
    }

    /// Flat list form used by the ledger.
    pub fn to_pairs(&self) -> Vec<VariantPair> {
        self.0
            .iter()
            .map(|(key, value)| VariantPair {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }

    /// Rebuild from the flat list form. A repeated key keeps its last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = VariantPair>,
    {
        pairs.into_iter().map(|p| (p.key, p.value)).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariantSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for VariantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, "}}")
    }
}
