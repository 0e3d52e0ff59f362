//! Cartesian-product enumeration of replacement values.

use crate::config::ReplacementRule;
use indexmap::{IndexMap, IndexSet};

/// One assignment of a concrete value to every placeholder type of a template.
/// Iteration order follows the rule order the combination was generated from.
pub type Combination = IndexMap<String, String>;

/// Enumerates every combination of values for the rules whose type is in `needed_types`.
///
/// Rules keep the order the caller supplies them in; the first rule varies
/// slowest and the last one fastest. Returns nothing when no rule matches or
/// when any matched rule has no values.
pub fn generate<'a, I>(rules: I, needed_types: &IndexSet<String>) -> Vec<Combination>
where
    I: IntoIterator<Item = &'a ReplacementRule>,
{
    let matched: Vec<&ReplacementRule> =
        rules.into_iter().filter(|rule| needed_types.contains(&rule.r#type)).collect();
    if matched.is_empty() || matched.iter().any(|rule| rule.values.is_empty()) {
        return Vec::new();
    }

    let mut combinations = Vec::with_capacity(count(&matched));
    let mut indices = vec![0usize; matched.len()];
    loop {
        combinations.push(
            matched
                .iter()
                .zip(&indices)
                .map(|(rule, &i)| (rule.r#type.clone(), rule.values[i].clone()))
                .collect(),
        );

        // Advance the odometer from the rightmost position.
        let mut position = matched.len();
        loop {
            if position == 0 {
                return combinations;
            }
            position -= 1;
            indices[position] += 1;
            if indices[position] < matched[position].values.len() {
                break;
            }
            indices[position] = 0;
        }
    }
}

/// Number of combinations the given rules produce.
pub fn count(rules: &[&ReplacementRule]) -> usize {
    if rules.is_empty() {
        return 0;
    }
    rules.iter().map(|rule| rule.values.len()).product()
}
