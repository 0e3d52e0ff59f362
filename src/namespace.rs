//! Namespace handling for replacement values.
//!
//! A value such as `biomesoplenty:fir` carries its own namespace, while a
//! bare value such as `oak` falls back to the configured default.

use crate::constants::DEFAULT_NAMESPACE;

/// Namespace information derived from a single replacement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceInfo {
    /// Value without its namespace prefix, e.g. `oak`.
    pub name: String,
    /// Namespace including the trailing separator, e.g. `minecraft:`.
    pub full: String,
    /// Namespace usable inside identifiers, e.g. `biomesoplenty_`.
    /// Empty for the vanilla `minecraft:` namespace.
    pub safe: String,
}

impl NamespaceInfo {
    /// Namespace-qualified value, e.g. `minecraft:oak`.
    pub fn full_value(&self) -> String {
        format!("{}{}", self.full, self.name)
    }
}

/// Converts a full namespace (`ns:`) into its identifier-safe form.
///
/// The vanilla namespace maps to an empty string so that generated ids
/// stay unprefixed.
pub fn safe_namespace(full_ns: &str) -> String {
    if full_ns == DEFAULT_NAMESPACE {
        String::new()
    } else {
        full_ns.replace(':', "_")
    }
}

/// Splits `value` into its bare name and namespace.
///
/// The split happens on the first `:` only; values without a separator use
/// `default_namespace`.
pub fn resolve(value: &str, default_namespace: &str) -> NamespaceInfo {
    match value.split_once(':') {
        Some((ns, name)) => NamespaceInfo {
            name: name.to_string(),
            full: format!("{ns}:"),
            safe: format!("{ns}_"),
        },
        None => NamespaceInfo {
            name: value.to_string(),
            full: default_namespace.to_string(),
            safe: safe_namespace(default_namespace),
        },
    }
}
