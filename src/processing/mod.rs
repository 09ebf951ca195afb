//! Recipe transformations.
//!
//! - [`normalize`]: meal sheets -> [`crate::types::MealData`] (the Row Normalizer)
//! - [`assign`]: stable recipe identifiers written back into a workbook (the ID Assigner)
//! - [`prep`]: Prep sheet -> per-serving instructions
//!
//! The building blocks are public too: [`derive_id`], the lenient [`coerce`] helpers, and the
//! [`dietary`] tag rules.
//!
//! ## Example: normalize a workbook and write JSON
//!
//! ```no_run
//! use recipe_index::export::write_meal_data;
//! use recipe_index::processing::{normalize_workbook, NormalizeOptions};
//!
//! # fn main() -> Result<(), recipe_index::ConversionError> {
//! let data = normalize_workbook("RecipeIndex.xlsx", &NormalizeOptions::default())?;
//! write_meal_data(&data, "meal_data.json")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: identifiers
//!
//! ```rust
//! use recipe_index::processing::{derive_id, IdAssigner};
//!
//! assert_eq!(derive_id("Oatmeal Bowl"), "oatmeal-bowl");
//!
//! let mut ids = IdAssigner::new();
//! assert_eq!(ids.assign(Some("Mac & Cheese")), "mac-cheese");
//! assert_eq!(ids.assign(Some("Mac & Cheese GF")), "mac-cheese-gf");
//! assert_eq!(ids.assign(None), "");
//! ```

pub mod assign;
pub mod coerce;
pub mod dietary;
pub mod identifier;
pub mod normalize;
pub mod prep;

pub use assign::{assign_workbook_ids, AssignOptions, AssignmentReport, IdAssigner, SheetAssignment};
pub use dietary::{dietary_tags, recategorize_protein, Presence};
pub use identifier::derive_id;
pub use normalize::{normalize_row, normalize_workbook, NormalizeOptions, RowSkip};
pub use prep::{extract_prep_instructions, PrepOptions};
