//! Placeholder substitution.
//!
//! Replacement happens in three stages over the accumulating text:
//! namespace resolution, basic placeholder substitution and the `extra`
//! override tables of each active rule.

use crate::combination::Combination;
use crate::config::{Config, ReplacementRule};
use crate::constants::{MODID, MODID_SAFE, WILDCARD_KEY};
use crate::namespace::{self, NamespaceInfo};
use indexmap::IndexMap;

/// Specificity of an `extra` table key, from least to most specific.
/// A more specific tier wins when two tiers replace the same substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Wildcard,
    Name,
    FullValue,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchTier::Wildcard => write!(f, "wildcard"),
            MatchTier::Name => write!(f, "name match"),
            MatchTier::FullValue => write!(f, "full value match"),
        }
    }
}

/// Applies combinations to template text using the rules of a [`Config`].
///
/// The engine keeps no state between calls: the same content, combination
/// and configuration always produce the same output.
#[derive(Debug, Clone, Copy)]
pub struct ReplacementEngine<'a> {
    config: &'a Config,
}

impl<'a> ReplacementEngine<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Substitutes `combination` into `content`.
    ///
    /// When `explain` is given, a line is appended for every replacement
    /// that actually changed something. `extra` entries with an empty `old`
    /// string are ignored.
    pub fn apply(
        &self,
        content: &str,
        combination: &Combination,
        mut explain: Option<&mut Vec<String>>,
    ) -> String {
        let info = self.resolve_namespaces(combination);
        let result = self.apply_basic(content, &info, explain.as_deref_mut());
        self.apply_extra(result, &info, explain)
    }

    fn resolve_namespaces(&self, combination: &Combination) -> IndexMap<String, NamespaceInfo> {
        combination
            .iter()
            .map(|(r#type, value)| {
                (r#type.clone(), namespace::resolve(value, &self.config.default_namespace))
            })
            .collect()
    }

    fn apply_basic(
        &self,
        content: &str,
        info: &IndexMap<String, NamespaceInfo>,
        mut explain: Option<&mut Vec<String>>,
    ) -> String {
        let modid = info
            .first()
            .map(|(_, ns)| ns.full.as_str())
            .unwrap_or(&self.config.default_namespace);
        let modid_safe = namespace::safe_namespace(modid);

        // `{modid}` already carries its separator, so `{modid}:` must not double it.
        let mut result = if modid.ends_with(':') {
            content.replace(&format!("{}:", placeholder(MODID)), modid)
        } else {
            content.to_string()
        };
        result = result
            .replace(&placeholder(MODID), modid)
            .replace(&placeholder(MODID_SAFE), &modid_safe);

        for (r#type, ns) in info {
            let token = placeholder(r#type);
            if !result.contains(&token) {
                continue;
            }
            if let Some(log) = explain.as_deref_mut() {
                log.push(format!("replaced {} => {}", token, ns.name));
            }
            result = result.replace(&token, &ns.name);
        }
        result
    }

    fn apply_extra(
        &self,
        content: String,
        info: &IndexMap<String, NamespaceInfo>,
        mut explain: Option<&mut Vec<String>>,
    ) -> String {
        let mut result = content;
        for rule in self.config.active_rules() {
            let Some(ns) = info.get(&rule.r#type) else {
                continue;
            };
            let full_value = ns.full_value();
            let table = merge_tiers(rule, &ns.name, &full_value);
            for (old, entry) in table {
                if old.is_empty() || !result.contains(old) {
                    continue;
                }
                if let Some(log) = explain.as_deref_mut() {
                    log.push(format!("{} [{}]: {} => {}", entry.tier, entry.key, old, entry.new));
                }
                result = result.replace(old, entry.new);
            }
        }
        result
    }
}

/// A substitution chosen for one `old` substring.
struct OverrideEntry<'r> {
    new: &'r str,
    tier: MatchTier,
    key: &'r str,
}

/// Collects the `extra` tables matching `name` and `full_value` into a
/// single ordered table.
///
/// Tables are visited from least to most specific. A more specific table
/// overrides the replacement of an `old` substring already present but keeps
/// its position, so substitutions still run in first-declared order.
fn merge_tiers<'r>(
    rule: &'r ReplacementRule,
    name: &'r str,
    full_value: &'r str,
) -> IndexMap<&'r str, OverrideEntry<'r>> {
    let tiers = [
        (MatchTier::Wildcard, WILDCARD_KEY),
        (MatchTier::Name, name),
        (MatchTier::FullValue, full_value),
    ];
    let mut merged = IndexMap::new();
    for (tier, key) in tiers {
        let Some((key, table)) = rule.extra.get_key_value(key) else {
            continue;
        };
        for (old, new) in table {
            merged.insert(old.as_str(), OverrideEntry { new: new.as_str(), tier, key: key.as_str() });
        }
    }
    merged
}

/// Wraps a placeholder name in braces.
pub fn placeholder(name: &str) -> String {
    format!("{{{name}}}")
}
