/// Placeholder written into `city` / `address` when the value has not been resolved yet
pub const UNKNOWN: &str = "Unknown";

/// Returns true when a field still holds the "not yet resolved" placeholder.
///
/// Only an exact match counts. A missing field, an empty string or any other
/// text is treated as already correct and is never selected for enrichment.
pub fn is_unresolved(value: Option<&str>) -> bool {
    value == Some(UNKNOWN)
}
