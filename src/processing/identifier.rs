//! Kebab-case identifiers derived from recipe names.

/// Derive a stable identifier from a recipe name.
///
/// Lowercases the name, drops every character other than `a-z`, `0-9`, whitespace and `-`,
/// then joins the remaining whitespace-separated words with single hyphens.
///
/// The result only contains `[a-z0-9-]`, so deriving again returns it unchanged.
pub fn derive_id(name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}
