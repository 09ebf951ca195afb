//! Prep sheet -> per-serving shopping lists, prep steps and bagging checklists.
//!
//! Layout of the Prep sheet (spreadsheet columns, data from row 2):
//!
//! | serving size | shopping list | prep | bagging checklist |
//! |--------------|---------------|------|-------------------|
//! | 4            | B             | C    | D                 |
//! | 6            | E             | F    | G                 |
//! | 8            | H             | I    | J                 |
//! | 12           | K             | L    | M                 |
//!
//! Column A holds the recipe name. Multi-line cells become lists, one entry per non-blank line.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use calamine::{Data, Range};

use crate::error::ConversionResult;
use crate::ingestion::observability::Reporter;
use crate::ingestion::{
    cell_display, ConversionObserver, ConversionSeverity, Operation, RecipeWorkbook, RunStats, SheetStats,
};
use crate::types::{MealType, PrepInstructions, ServingInstructions};

/// Column group for one serving size (0-based spreadsheet column indices).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServingColumns {
    pub servings: u32,
    pub shopping_list: u32,
    pub prep: u32,
    pub bagging_checklist: u32,
}

/// B..M, three columns per serving size.
pub const SERVING_COLUMNS: [ServingColumns; 4] = [
    ServingColumns { servings: 4, shopping_list: 1, prep: 2, bagging_checklist: 3 },
    ServingColumns { servings: 6, shopping_list: 4, prep: 5, bagging_checklist: 6 },
    ServingColumns { servings: 8, shopping_list: 7, prep: 8, bagging_checklist: 9 },
    ServingColumns { servings: 12, shopping_list: 10, prep: 11, bagging_checklist: 12 },
];

const NAME_COLUMN: u32 = 0;
const FIRST_DATA_ROW: u32 = 1;

/// Options controlling [`extract_prep_instructions`].
#[derive(Clone)]
pub struct PrepOptions {
    /// Sheet to read.
    pub sheet: String,
    /// Optional observer for skipped rows and the run outcome.
    pub observer: Option<Arc<dyn ConversionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ConversionSeverity,
}

impl fmt::Debug for PrepOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrepOptions")
            .field("sheet", &self.sheet)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PrepOptions {
    fn default() -> Self {
        Self {
            sheet: MealType::Prep.sheet_name().to_string(),
            observer: None,
            alert_at_or_above: ConversionSeverity::Critical,
        }
    }
}

/// Extract prep data from the Prep sheet of the workbook at `path`.
///
/// Unlike the normalizer, a missing Prep sheet fails the run: there is nothing else to read.
pub fn extract_prep_instructions(
    path: impl AsRef<Path>,
    options: &PrepOptions,
) -> ConversionResult<PrepInstructions> {
    let path = path.as_ref();
    let reporter = Reporter::new(
        path,
        Operation::PrepInstructions,
        options.observer.as_ref(),
        options.alert_at_or_above,
    );
    let result = RecipeWorkbook::open(path)
        .and_then(|mut wb| wb.sheet(&options.sheet))
        .map(|table| {
            let (prep, stats) = extract_from_range(table.range(), &options.sheet, &reporter);
            reporter.sheet_processed(&options.sheet, stats);
            prep
        });
    reporter.finish(result, |prep| RunStats {
        sheets: 1,
        records: prep.recipe_count(),
    })
}

fn extract_from_range(range: &Range<Data>, sheet: &str, reporter: &Reporter<'_>) -> (PrepInstructions, SheetStats) {
    let mut out = PrepInstructions::default();
    let mut stats = SheetStats::default();
    let Some((_, (last_row, _))) = range.start().zip(range.end()) else {
        return (out, stats);
    };

    for row in FIRST_DATA_ROW..=last_row {
        let text = |col: u32| range.get_value((row, col)).map(cell_display).unwrap_or_default();
        let name = text(NAME_COLUMN).trim().to_string();
        if name.is_empty() {
            continue;
        }
        stats.rows_read += 1;

        if text(SERVING_COLUMNS[0].shopping_list).to_lowercase().contains("servings") {
            stats.rows_skipped += 1;
            reporter.row_skipped(sheet, row as usize + 1, "serving-size header row");
            continue;
        }

        let (instructions, bagging) = extract_row(&text);
        if instructions.is_empty() && bagging.is_empty() {
            stats.rows_skipped += 1;
            reporter.row_skipped(sheet, row as usize + 1, "no prep data for any serving size");
            continue;
        }
        stats.rows_emitted += 1;
        if !instructions.is_empty() {
            out.instructions.insert(name.clone(), instructions);
        }
        if !bagging.is_empty() {
            out.bagging_checklists.insert(name, bagging);
        }
    }

    (out, stats)
}

type RowPrep = (BTreeMap<u32, ServingInstructions>, BTreeMap<u32, Vec<String>>);

/// Split one row's serving-size columns. Serving sizes without any data are left out.
fn extract_row(text: &dyn Fn(u32) -> String) -> RowPrep {
    let mut instructions = BTreeMap::new();
    let mut bagging = BTreeMap::new();
    for cols in SERVING_COLUMNS {
        let serving = ServingInstructions {
            shopping_list: split_lines(&text(cols.shopping_list)),
            prep: split_lines(&text(cols.prep)),
        };
        if !serving.is_empty() {
            instructions.insert(cols.servings, serving);
        }
        let checklist = split_lines(&text(cols.bagging_checklist));
        if !checklist.is_empty() {
            bagging.insert(cols.servings, checklist);
        }
    }
    (instructions, bagging)
}

/// Normalize line endings and return the trimmed, non-blank lines.
pub fn split_lines(cell: &str) -> Vec<String> {
    cell.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
