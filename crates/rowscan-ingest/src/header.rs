//! Header name normalization.

/// Trims whitespace and a leading UTF-8 byte order mark from a header name.
pub fn normalize_header(value: &str) -> String {
    value.trim().trim_start_matches('\u{feff}').trim().to_string()
}

/// Returns the names that occur more than once, compared case-insensitively.
pub(crate) fn duplicate_names(names: &[String]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    let mut duplicates = Vec::new();
    for name in names {
        if !seen.insert(name.to_lowercase()) && !duplicates.contains(&name.as_str()) {
            duplicates.push(name.as_str());
        }
    }
    duplicates
}
