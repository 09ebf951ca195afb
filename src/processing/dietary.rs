//! Dietary tags and protein recategorization.

use super::identifier::derive_id;

/// Columns whose `yes`/`no`/`optional` value maps to `contains-<x>` / `<x>-free` / `<x>-optional`.
pub const TRI_STATE_COLUMNS: [&str; 2] = ["Gluten", "Dairy"];

/// Columns that only contribute a `contains-<x>` tag, when `yes`.
pub const PRESENCE_COLUMNS: [&str; 10] = [
    "Eggs",
    "Tree Nuts",
    "Peanuts",
    "Almonds",
    "Cashews",
    "Coconut",
    "Soy",
    "Shellfish",
    "Sesame",
    "Pork",
];

/// Value of a boolean-like dietary column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Yes,
    No,
    Optional,
    /// Anything else that was entered (a note, a typo).
    Other,
}

impl Presence {
    /// Parse trimmed, case-insensitive text. Missing values default to `no`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("no") => Self::No,
            Some("yes") => Self::Yes,
            Some("optional") => Self::Optional,
            Some(_) => Self::Other,
        }
    }
}

/// Refine a `meatless` protein using the Eggs and Dairy columns.
///
/// - both `no` -> `Vegan`
/// - both `optional` -> `Vegan optional`
/// - otherwise -> `Meatless`
///
/// Non-meatless proteins are returned trimmed and otherwise untouched.
pub fn recategorize_protein(protein: &str, eggs: Presence, dairy: Presence) -> String {
    let protein = protein.trim();
    if !protein.eq_ignore_ascii_case("meatless") {
        return protein.to_string();
    }
    match (eggs, dairy) {
        (Presence::No, Presence::No) => "Vegan".to_string(),
        (Presence::Optional, Presence::Optional) => "Vegan optional".to_string(),
        _ => "Meatless".to_string(),
    }
}

/// Derive dietary tags for one row.
///
/// `value_of` returns the raw text of a column (or `None` when the column is absent or blank);
/// `protein` is the already recategorized protein, if any.
///
/// A blank tri-state column yields no tag, even though [`Presence::parse`] reads it as `no`.
pub fn dietary_tags<F>(value_of: F, protein: Option<&str>) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut tags: Vec<String> = Vec::new();

    for column in TRI_STATE_COLUMNS {
        let Some(raw) = value_of(column) else { continue };
        let slug = derive_id(column);
        let tag = match Presence::parse(Some(&raw)) {
            Presence::Yes => format!("contains-{slug}"),
            Presence::No if !raw.trim().is_empty() => format!("{slug}-free"),
            Presence::Optional => format!("{slug}-optional"),
            _ => continue,
        };
        tags.push(tag);
    }

    for column in PRESENCE_COLUMNS {
        if Presence::parse(value_of(column).as_deref()) == Presence::Yes {
            tags.push(format!("contains-{}", derive_id(column)));
        }
    }

    if let Some(p) = protein {
        let slug = derive_id(p);
        if !slug.is_empty() && !tags.contains(&slug) {
            tags.push(slug);
        }
    }

    tags
}
