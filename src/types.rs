//! Core data model types.
//!
//! The normalizer produces a [`MealData`] (meal type -> ordered [`RecipeRecord`]s), and the prep
//! extractor produces [`PrepInstructions`]. Both serialize to the JSON shapes consumed by the
//! meal planner front end.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Image path used for every record until real photos are uploaded.
pub const DEFAULT_IMAGE: &str = "/api/placeholder/200/200";

/// Meal category. Each category lives on its own workbook sheet.
///
/// Ordering follows the planner's display order, which is also the key order of
/// [`MealData`] in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Prep,
}

impl MealType {
    /// All meal types in display order.
    pub const ALL: [MealType; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Prep];

    /// The meal types converted by default (the Prep sheet is opt-in).
    pub const MEALS: [MealType; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];

    /// Sheet name holding this category in the workbook.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Prep => "Prep",
        }
    }

    /// Lowercase key used in JSON output.
    pub fn key(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Prep => "prep",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MealType {
    type Err = String;

    /// Parse either the sheet name or the JSON key (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown meal type '{s}' (expected breakfast/lunch/dinner/prep)"))
    }
}

/// One normalized meal entry derived from a spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    /// Kebab-case identifier derived from [`Self::name`].
    pub id: String,
    /// Trimmed display name.
    pub name: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub calories: i64,
    pub prep_time: String,
    pub servings: String,
    pub season: String,
    /// Protein category after meatless recategorization (`Vegan`, `Vegan optional`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    pub dietary_tags: Vec<String>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<i64>,
}

impl RecipeRecord {
    /// Returns true if `tag` is among the record's dietary tags.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.dietary_tags.iter().any(|t| t == tag)
    }
}

/// Normalized records grouped by meal type.
///
/// Serializes as `{"MEAL_DATA": {"breakfast": [...], "lunch": [...], ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealData {
    #[serde(rename = "MEAL_DATA")]
    pub meals: BTreeMap<MealType, Vec<RecipeRecord>>,
}

impl MealData {
    /// Create an empty mapping with one (empty) list per requested meal type.
    pub fn new(meal_types: &[MealType]) -> Self {
        Self {
            meals: meal_types.iter().map(|&m| (m, Vec::new())).collect(),
        }
    }

    /// Records for `meal_type`, in sheet row order. Empty if the type was not requested.
    pub fn records(&self, meal_type: MealType) -> &[RecipeRecord] {
        self.meals.get(&meal_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append records for `meal_type`.
    pub fn extend(&mut self, meal_type: MealType, records: impl IntoIterator<Item = RecipeRecord>) {
        self.meals.entry(meal_type).or_default().extend(records);
    }

    /// Total number of records across all meal types.
    pub fn record_count(&self) -> usize {
        self.meals.values().map(Vec::len).sum()
    }
}

/// Shopping list and prep steps for one serving size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingInstructions {
    pub shopping_list: Vec<String>,
    pub prep: Vec<String>,
}

impl ServingInstructions {
    pub fn is_empty(&self) -> bool {
        self.shopping_list.is_empty() && self.prep.is_empty()
    }
}

/// Per-recipe prep data extracted from the Prep sheet, keyed by recipe name then serving size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepInstructions {
    pub instructions: BTreeMap<String, BTreeMap<u32, ServingInstructions>>,
    pub bagging_checklists: BTreeMap<String, BTreeMap<u32, Vec<String>>>,
}

impl PrepInstructions {
    /// Number of distinct recipes with instructions or a bagging checklist.
    pub fn recipe_count(&self) -> usize {
        let mut names: Vec<&String> = self
            .instructions
            .keys()
            .chain(self.bagging_checklists.keys())
            .collect();
        names.sort();
        names.dedup();
        names.len()
    }
}
