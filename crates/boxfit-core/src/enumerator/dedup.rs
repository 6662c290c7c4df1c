use crate::types::ProductGroup;
use std::collections::HashSet;

/// Canonical signature of a group: `"{id}x{qty}"` tokens joined with `-`.
///
/// Tokens are sorted as strings, so `"10x1"` orders before `"1x1"`.
pub fn group_key(group: &ProductGroup) -> String {
    let mut tokens: Vec<String> = group
        .items
        .iter()
        .map(|item| format!("{}x{}", item.product.id, item.quantity))
        .collect();
    tokens.sort();
    tokens.join("-")
}

/// Keeps the first group seen for each key, preserving order.
pub(super) fn dedup_groups(groups: Vec<ProductGroup>) -> Vec<ProductGroup> {
    let mut seen = HashSet::new();
    groups
        .into_iter()
        .filter(|group| seen.insert(group_key(group)))
        .collect()
}
