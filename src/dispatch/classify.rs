//! Decides, from the shape of a bundle alone, how many calls to issue and
//! with which parameter string each.
//!
//! Group entries are classified by a fixed priority chain. Later rules are
//! more general and must not shadow earlier ones:
//!
//! 1. no usable element (all null or empty) -> no call
//! 2. exactly one zip token plus one sibling -> one call, zip first
//! 3. every element shares an `id=`, `q=` or `zip=` prefix -> one call each
//! 4. anything else -> one call with all elements joined by `&`

use crate::bundle::{BundleEntry, ParameterBundle};
use itertools::Itertools;

const ZIP_PREFIX: &str = "zip=";
const LIST_PREFIXES: [&str; 3] = ["id=", "q=", ZIP_PREFIX];

/// The query-parameter strings to request, one per remote call, in order.
pub fn plan_calls(bundle: &ParameterBundle) -> Vec<String> {
    match bundle {
        ParameterBundle::Scalar(parameter) if parameter.trim().is_empty() => Vec::new(),
        ParameterBundle::Scalar(parameter) => vec![parameter.clone()],
        ParameterBundle::List(entries) => entries.iter().flat_map(plan_entry).collect(),
    }
}

fn plan_entry(entry: &BundleEntry) -> Vec<String> {
    match entry {
        BundleEntry::Fragment(Some(parameter)) if !parameter.is_empty() => vec![parameter.clone()],
        BundleEntry::Fragment(_) => Vec::new(),
        BundleEntry::Group(elements) => plan_group(elements),
    }
}

fn plan_group(elements: &[Option<String>]) -> Vec<String> {
    let present: Vec<&str> = elements
        .iter()
        .filter_map(|element| element.as_deref())
        .filter(|element| !element.is_empty())
        .collect();

    if present.is_empty() {
        return Vec::new();
    }
    if let Some(parameter) = zip_pair(&present) {
        return vec![parameter];
    }
    if shares_list_prefix(&present) {
        return present.iter().map(|element| element.to_string()).collect();
    }
    vec![present.iter().join("&")]
}

/// Zip and country code are positionally ambiguous in the filter tree; the
/// API wants the zip first.
fn zip_pair(present: &[&str]) -> Option<String> {
    let (zips, siblings): (Vec<&str>, Vec<&str>) = present
        .iter()
        .copied()
        .partition(|element| element.starts_with(ZIP_PREFIX));
    match (zips.as_slice(), siblings.as_slice()) {
        ([zip], [sibling]) => Some(format!("{}{}", zip, sibling)),
        _ => None,
    }
}

fn shares_list_prefix(present: &[&str]) -> bool {
    LIST_PREFIXES
        .iter()
        .any(|prefix| present.iter().all(|element| element.starts_with(prefix)))
}
