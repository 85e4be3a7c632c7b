use std::collections::BTreeSet;

/// Directory names present on disk but absent from the in-memory set.
/// Pure diff; the store decides what to do with the result (delete), so
/// the policy is testable without touching a filesystem.
pub fn stale_entries(desired: &BTreeSet<String>, actual: &[String]) -> Vec<String> {
    actual
        .iter()
        .filter(|name| !desired.contains(*name))
        .cloned()
        .collect()
}
