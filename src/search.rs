//! Free-text list filtering.

/// True when `query` is blank or any of `fields` contains it,
/// ignoring case.
pub fn matches_query(query: &str, fields: &[&str]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}
