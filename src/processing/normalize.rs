//! Row Normalizer: meal sheets -> [`MealData`].
//!
//! Each requested meal type is read from the sheet of the same name. Rows without a recipe
//! name or without usable calories are dropped one by one; a sheet that is missing or has no
//! name column is skipped as a whole. Only a workbook that cannot be opened fails the run.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use calamine::Data;
use thiserror::Error;

use crate::error::{ConversionError, ConversionResult};
use crate::ingestion::observability::Reporter;
use crate::ingestion::{
    cell_display, ConversionObserver, ConversionSeverity, Operation, RecipeWorkbook, RunStats, SheetRow,
    SheetStats, SheetTable,
};
use crate::types::{MealData, MealType, RecipeRecord, DEFAULT_IMAGE};

use super::coerce::{cell_to_int, cell_to_text, cell_to_text_or};
use super::dietary::{dietary_tags, recategorize_protein, Presence};
use super::identifier::derive_id;

/// Header names read by the normalizer.
pub mod columns {
    pub const RECIPE_NAME: &str = "Recipe Prep";
    pub const CALORIES: &str = "Calories";
    pub const PREP_TIME: &str = "Prep Time";
    pub const SERVINGS: &str = "Servings";
    pub const SEASON: &str = "Season";
    pub const SODIUM: &str = "Sodium";
    pub const CARBS: &str = "Carbs";
    pub const PROTEIN: &str = "Protein";
    pub const EGGS: &str = "Eggs";
    pub const DAIRY: &str = "Dairy";
}

/// Season used when the Season cell is blank.
pub const DEFAULT_SEASON: &str = "Classic";

/// Options controlling [`normalize_workbook`].
///
/// Use [`Default`] for the standard Breakfast/Lunch/Dinner conversion.
#[derive(Clone)]
pub struct NormalizeOptions {
    /// Meal types to convert, in output order. Each maps to the sheet of the same name.
    pub meal_types: Vec<MealType>,
    /// Header of the recipe name column.
    pub name_column: String,
    /// Image path written into every record.
    pub image: String,
    /// Optional observer for skipped sheets/rows and the run outcome.
    pub observer: Option<Arc<dyn ConversionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ConversionSeverity,
}

impl NormalizeOptions {
    /// Also convert the Prep sheet.
    pub fn with_prep(mut self) -> Self {
        if !self.meal_types.contains(&MealType::Prep) {
            self.meal_types.push(MealType::Prep);
        }
        self
    }
}

impl fmt::Debug for NormalizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizeOptions")
            .field("meal_types", &self.meal_types)
            .field("name_column", &self.name_column)
            .field("image", &self.image)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            meal_types: MealType::MEALS.to_vec(),
            name_column: columns::RECIPE_NAME.to_string(),
            image: DEFAULT_IMAGE.to_string(),
            observer: None,
            alert_at_or_above: ConversionSeverity::Critical,
        }
    }
}

/// Why a single row was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowSkip {
    /// Every cell is empty.
    #[error("blank row")]
    Blank,
    /// The name cell is empty or not text.
    #[error("missing recipe name")]
    MissingName,
    /// Calories are required; the cell was empty, a placeholder, or not a number.
    #[error("recipe '{name}' has no usable calories (raw='{raw}')")]
    MissingCalories { name: String, raw: String },
}

/// Convert every requested meal sheet of the workbook at `path`.
///
/// Missing or malformed sheets are skipped (reported via `on_sheet_skipped`); bad rows are
/// skipped (reported via `on_row_skipped`). Every requested meal type gets a key in the
/// output, possibly with an empty list.
///
/// ```no_run
/// use recipe_index::processing::{normalize_workbook, NormalizeOptions};
/// use recipe_index::types::MealType;
///
/// # fn main() -> Result<(), recipe_index::ConversionError> {
/// let data = normalize_workbook("RecipeIndex.xlsx", &NormalizeOptions::default())?;
/// println!("breakfasts={}", data.records(MealType::Breakfast).len());
/// # Ok(())
/// # }
/// ```
pub fn normalize_workbook(path: impl AsRef<Path>, options: &NormalizeOptions) -> ConversionResult<MealData> {
    let path = path.as_ref();
    let reporter = Reporter::new(
        path,
        Operation::Normalize,
        options.observer.as_ref(),
        options.alert_at_or_above,
    );
    let result = normalize_with(path, options, &reporter);
    reporter
        .finish(result, |(data, sheets)| RunStats {
            sheets: *sheets,
            records: data.record_count(),
        })
        .map(|(data, _)| data)
}

fn normalize_with(
    path: &Path,
    options: &NormalizeOptions,
    reporter: &Reporter<'_>,
) -> ConversionResult<(MealData, usize)> {
    let mut workbook = RecipeWorkbook::open(path)?;
    let mut data = MealData::new(&options.meal_types);
    let mut sheets = 0;

    for &meal_type in &options.meal_types {
        let sheet_name = meal_type.sheet_name();
        let table = match workbook.sheet(sheet_name) {
            Ok(table) => table,
            Err(e @ (ConversionError::SheetMissing { .. } | ConversionError::Excel(_))) => {
                reporter.sheet_skipped(sheet_name, &e.to_string());
                continue;
            }
            Err(e) => return Err(e),
        };
        if let Err(e) = table.require_column(&options.name_column) {
            reporter.sheet_skipped(sheet_name, &e.to_string());
            continue;
        }

        let (records, stats) = normalize_sheet(&table, meal_type, options, reporter);
        reporter.sheet_processed(sheet_name, stats);
        data.extend(meal_type, records);
        sheets += 1;
    }

    Ok((data, sheets))
}

fn normalize_sheet(
    table: &SheetTable,
    meal_type: MealType,
    options: &NormalizeOptions,
    reporter: &Reporter<'_>,
) -> (Vec<RecipeRecord>, SheetStats) {
    let mut records = Vec::new();
    let mut stats = SheetStats::default();

    for row in table.data_rows() {
        match normalize_row(&row, meal_type, options) {
            Ok(record) => {
                stats.rows_read += 1;
                stats.rows_emitted += 1;
                records.push(record);
            }
            Err(RowSkip::Blank) => {}
            Err(skip) => {
                stats.rows_read += 1;
                stats.rows_skipped += 1;
                reporter.row_skipped(table.name(), row.number(), &skip.to_string());
            }
        }
    }

    (records, stats)
}

/// Build one [`RecipeRecord`] from a data row, or say why the row is dropped.
pub fn normalize_row(
    row: &SheetRow<'_>,
    meal_type: MealType,
    options: &NormalizeOptions,
) -> Result<RecipeRecord, RowSkip> {
    if row.is_blank() {
        return Err(RowSkip::Blank);
    }

    let name = match row.get(&options.name_column) {
        Some(Data::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return Err(RowSkip::MissingName),
    };

    let calories_cell = row.get(columns::CALORIES);
    let Some(calories) = cell_to_int(calories_cell) else {
        return Err(RowSkip::MissingCalories {
            name,
            raw: calories_cell.map(cell_display).unwrap_or_default(),
        });
    };

    let text = |column: &str| cell_to_text(row.get(column));
    let protein = text(columns::PROTEIN).map(|p| {
        recategorize_protein(
            &p,
            Presence::parse(text(columns::EGGS).as_deref()),
            Presence::parse(text(columns::DAIRY).as_deref()),
        )
    });
    let dietary_tags = dietary_tags(&text, protein.as_deref());

    Ok(RecipeRecord {
        id: derive_id(&name),
        name,
        meal_type,
        calories,
        prep_time: cell_to_text_or(row.get(columns::PREP_TIME), ""),
        servings: cell_to_text_or(row.get(columns::SERVINGS), ""),
        season: cell_to_text_or(row.get(columns::SEASON), DEFAULT_SEASON),
        protein,
        dietary_tags,
        image: options.image.clone(),
        sodium: cell_to_int(row.get(columns::SODIUM)),
        carbs: cell_to_int(row.get(columns::CARBS)),
    })
}
