//! Folding several mapping sources into one new instance.

use indexmap::IndexMap;

use crate::{Entries, Mapping, Value};

/// Folds `sources`, then `overrides`, into one new mapping.
///
/// Entries are applied strictly left to right, so later sources win over
/// earlier ones and overrides win over every source. The result is built by
/// the first source's own pairs-constructor ([`Entries::rebuild`]): merging
/// into a frozen first source yields a frozen mapping of its class, and the
/// first source is never modified. Without sources the result is a base
/// [`Mapping`], empty when there are no overrides either.
///
/// # Examples
///
/// ```
/// use attrmap::{Value, frozen, mapping, merge};
///
/// let result = merge(&[&frozen!(x = 1), &mapping!(y = 2)], &[("z", Value::from(3))]);
/// assert_eq!(result.as_frozen(), Some(&frozen!(x = 1, y = 2, z = 3)));
///
/// assert_eq!(merge(&[], &[]).into_mapping(), Some(mapping!()));
/// ```
pub fn merge(sources: &[&dyn Entries], overrides: &[(&str, Value)]) -> Value {
    let mut folded: IndexMap<String, Value> = IndexMap::new();
    for source in sources {
        folded.extend(source.entries());
    }
    folded.extend(
        overrides
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone())),
    );

    tracing::trace!(
        sources = sources.len(),
        overrides = overrides.len(),
        keys = folded.len(),
        "merged mapping sources"
    );

    match sources.first() {
        Some(first) => first.rebuild(folded.into_iter().collect()),
        None => Value::Mapping(Mapping::from_pairs(folded)),
    }
}
