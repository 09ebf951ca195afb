//! `recipe-index` turns the recipe workbook (one sheet per meal) into the JSON meal data used by
//! the meal planner, and keeps recipe identifiers stable across edits of that workbook.
//!
//! ## What it does
//!
//! - **Normalize** ([`processing::normalize_workbook`]): read the Breakfast, Lunch and Dinner
//!   sheets (optionally Prep), coerce each row into a [`types::RecipeRecord`] and group them by
//!   [`types::MealType`]. Rows without a recipe name or without usable calories are dropped.
//! - **Assign IDs** ([`processing::assign_workbook_ids`]): write a copy of the workbook with a
//!   leading `Recipe ID` column. Repeated names share one identifier; `"<name> GF"` variants get
//!   `<name-id>-gf`.
//! - **Prep instructions** ([`processing::extract_prep_instructions`]): per-serving shopping
//!   lists, prep steps and bagging checklists from the Prep sheet.
//!
//! Any format `calamine` reads is accepted as input (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`).
//!
//! ## Quick example
//!
//! ```no_run
//! use recipe_index::processing::{normalize_workbook, NormalizeOptions};
//! use recipe_index::types::MealType;
//!
//! # fn main() -> Result<(), recipe_index::ConversionError> {
//! let data = normalize_workbook("RecipeIndex.xlsx", &NormalizeOptions::default())?;
//! for rec in data.records(MealType::Breakfast) {
//!     println!("{} {} kcal {:?}", rec.id, rec.calories, rec.dietary_tags);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure policy
//!
//! Bad rows and missing sheets are skipped and reported to an optional
//! [`ingestion::ConversionObserver`]; only whole-file problems (unreadable input, unwritable
//! output) return a [`ConversionError`].
//!
//! ## Modules
//!
//! - [`ingestion`]: workbook reading and observers
//! - [`processing`]: normalizer, ID assigner, prep extractor and their building blocks
//! - [`export`]: JSON and `.xlsx` writers
//! - [`types`]: output data model
//! - [`error`]: error type

pub mod error;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{ConversionError, ConversionResult};
