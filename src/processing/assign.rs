//! ID Assigner: give every recipe row a stable identifier and write it back into the workbook.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use calamine::Data;

use crate::error::{ConversionError, ConversionResult};
use crate::export::WorkbookWriter;
use crate::ingestion::observability::Reporter;
use crate::ingestion::{
    cell_display, ConversionObserver, ConversionSeverity, Operation, RecipeWorkbook, RunStats, SheetStats,
    SheetTable,
};
use crate::types::MealType;

use super::identifier::derive_id;
use super::normalize::columns;

/// Marker at the end of a gluten-free variant's name (`"Pancakes GF"`).
pub const GF_SUFFIX: &str = "GF";

/// Header of the inserted identifier column.
pub const ID_COLUMN: &str = "Recipe ID";

/// Assigns identifiers to recipe names for one run.
///
/// The first identifier handed out for a name is reused for every later occurrence, across
/// sheets.
#[derive(Debug, Clone, Default)]
pub struct IdAssigner {
    ids: HashMap<String, String>,
    order: Vec<String>,
}

impl IdAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier for `name`, assigning one if the name is new.
    ///
    /// - blank/missing names get `""` and are not recorded
    /// - `"<base> GF"` becomes `<base-id>-gf` when `<base>` already has an identifier,
    ///   otherwise the full name is derived as usual
    pub fn assign(&mut self, name: Option<&str>) -> String {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return String::new();
        };
        if let Some(id) = self.ids.get(name) {
            return id.clone();
        }

        let id = match gf_base(name).and_then(|base| self.ids.get(base)) {
            Some(base_id) => format!("{base_id}-gf"),
            None => derive_id(name),
        };
        self.ids.insert(name.to_string(), id.clone());
        self.order.push(name.to_string());
        id
    }

    /// Previously assigned identifier for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(name, id)` pairs in first-seen order.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.ids.get(name).map(|id| (name.as_str(), id.as_str())))
    }
}

/// Base name of a gluten-free variant, if `name` carries the suffix marker.
fn gf_base(name: &str) -> Option<&str> {
    let base = name
        .strip_suffix(GF_SUFFIX)?
        .trim_end_matches(|c: char| c.is_whitespace() || c == '-' || c == '(');
    (!base.is_empty()).then_some(base)
}

/// Options controlling [`assign_workbook_ids`].
#[derive(Clone)]
pub struct AssignOptions {
    /// Sheets assigned first, in this order. Other sheets with a name column follow in
    /// workbook order.
    pub sheet_order: Vec<String>,
    /// Header of the recipe name column.
    pub name_column: String,
    /// Header written above the inserted identifier column.
    pub id_column: String,
    /// Optional observer for skipped sheets and the run outcome.
    pub observer: Option<Arc<dyn ConversionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ConversionSeverity,
}

impl fmt::Debug for AssignOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssignOptions")
            .field("sheet_order", &self.sheet_order)
            .field("name_column", &self.name_column)
            .field("id_column", &self.id_column)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for AssignOptions {
    fn default() -> Self {
        let sheet_order = [MealType::Prep, MealType::Breakfast, MealType::Lunch, MealType::Dinner]
            .iter()
            .map(|m| m.sheet_name().to_string())
            .collect();
        Self {
            sheet_order,
            name_column: columns::RECIPE_NAME.to_string(),
            id_column: ID_COLUMN.to_string(),
            observer: None,
            alert_at_or_above: ConversionSeverity::Critical,
        }
    }
}

/// Per-sheet outcome of an assignment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetAssignment {
    pub sheet: String,
    /// Data rows that received an identifier cell (blank names included).
    pub rows: usize,
    /// Rows with a non-empty identifier.
    pub assigned: usize,
}

/// Result of [`assign_workbook_ids`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentReport {
    /// Sheets that got an identifier column, in processing order.
    pub sheets: Vec<SheetAssignment>,
    /// `(name, id)` pairs in first-seen order.
    pub assignments: Vec<(String, String)>,
}

/// Read `input`, assign identifiers, and write every sheet to `output` with the identifier
/// column inserted first on sheets that have a recipe name column.
pub fn assign_workbook_ids(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &AssignOptions,
) -> ConversionResult<AssignmentReport> {
    let input = input.as_ref();
    let reporter = Reporter::new(
        input,
        Operation::AssignIds,
        options.observer.as_ref(),
        options.alert_at_or_above,
    );
    let result = assign_with(input, output.as_ref(), options, &reporter);
    reporter.finish(result, |report| RunStats {
        sheets: report.sheets.len(),
        records: report.assignments.len(),
    })
}

fn assign_with(
    input: &Path,
    output: &Path,
    options: &AssignOptions,
    reporter: &Reporter<'_>,
) -> ConversionResult<AssignmentReport> {
    let mut workbook = RecipeWorkbook::open(input)?;
    let mut tables = Vec::new();
    for name in workbook.sheet_names() {
        match workbook.sheet(&name) {
            Ok(table) => tables.push(table),
            // An unreadable sheet is left out of the output workbook.
            Err(e @ ConversionError::Excel(_)) => reporter.sheet_skipped(&name, &e.to_string()),
            Err(e) => return Err(e),
        }
    }

    let mut assigner = IdAssigner::new();
    let mut ids: HashMap<&str, Vec<String>> = HashMap::new();
    let mut sheets = Vec::new();

    for table in processing_order(&tables, &options.sheet_order) {
        if let Err(e) = table.require_column(&options.name_column) {
            reporter.sheet_skipped(table.name(), &e.to_string());
            continue;
        }
        let sheet_ids = assign_sheet(&mut assigner, table, &options.name_column);
        let assignment = SheetAssignment {
            sheet: table.name().to_string(),
            rows: sheet_ids.len(),
            assigned: sheet_ids.iter().filter(|id| !id.is_empty()).count(),
        };
        reporter.sheet_processed(table.name(), SheetStats::from(&assignment));
        sheets.push(assignment);
        ids.insert(table.name(), sheet_ids);
    }

    let mut writer = WorkbookWriter::new();
    for table in &tables {
        match ids.get(table.name()) {
            Some(sheet_ids) => writer.write_with_leading_column(table, &options.id_column, sheet_ids)?,
            None => writer.write_copy(table)?,
        }
    }
    writer.save(output)?;

    Ok(AssignmentReport {
        sheets,
        assignments: assigner
            .assignments()
            .map(|(name, id)| (name.to_string(), id.to_string()))
            .collect(),
    })
}

/// Configured sheets first (those present), then the rest in workbook order.
fn processing_order<'t>(tables: &'t [SheetTable], preferred: &[String]) -> Vec<&'t SheetTable> {
    let mut ordered: Vec<&SheetTable> = preferred
        .iter()
        .filter_map(|name| tables.iter().find(|t| t.name() == name))
        .collect();
    for table in tables {
        if !preferred.iter().any(|name| name == table.name()) {
            ordered.push(table);
        }
    }
    ordered
}

/// One identifier per data row, aligned with [`SheetTable::data_rows`].
fn assign_sheet(assigner: &mut IdAssigner, table: &SheetTable, name_column: &str) -> Vec<String> {
    table
        .data_rows()
        .map(|row| {
            let name = match row.get(name_column) {
                Some(Data::Empty) | Some(Data::Error(_)) | None => None,
                Some(cell) => Some(cell_display(cell)),
            };
            assigner.assign(name.as_deref())
        })
        .collect()
}

impl From<&SheetAssignment> for SheetStats {
    fn from(s: &SheetAssignment) -> Self {
        SheetStats {
            rows_read: s.rows,
            rows_emitted: s.assigned,
            rows_skipped: s.rows - s.assigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_reuse_first_identifier() {
        let mut a = IdAssigner::new();
        assert_eq!(a.assign(Some("Oatmeal Bowl")), "oatmeal-bowl");
        assert_eq!(a.assign(Some("  Oatmeal Bowl ")), "oatmeal-bowl");
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn gf_variant_extends_base_identifier() {
        let mut a = IdAssigner::new();
        a.assign(Some("Mac & Cheese"));
        assert_eq!(a.assign(Some("Mac & Cheese GF")), "mac-cheese-gf");
        assert_eq!(a.assign(Some("Mac & Cheese - GF")), "mac-cheese-gf");
        assert_eq!(a.get("Mac & Cheese GF"), Some("mac-cheese-gf"));
    }

    #[test]
    fn gf_variant_without_base_derives_from_full_name() {
        let mut a = IdAssigner::new();
        assert_eq!(a.assign(Some("Banana Bread GF")), "banana-bread-gf");
        // base assigned later does not rewrite the variant
        assert_eq!(a.assign(Some("Banana Bread")), "banana-bread");
        assert_eq!(a.assign(Some("Banana Bread GF")), "banana-bread-gf");
    }

    #[test]
    fn gf_base_uses_the_base_identifier_not_a_rederivation() {
        let mut a = IdAssigner::new();
        a.ids.insert("Chili".to_string(), "house-chili".to_string());
        a.order.push("Chili".to_string());
        assert_eq!(a.assign(Some("Chili GF")), "house-chili-gf");
    }

    #[test]
    fn blank_names_get_empty_identifier() {
        let mut a = IdAssigner::new();
        assert_eq!(a.assign(None), "");
        assert_eq!(a.assign(Some("   ")), "");
        assert!(a.is_empty());
    }

    #[test]
    fn gf_suffix_alone_is_a_plain_name() {
        assert_eq!(gf_base("GF"), None);
        assert_eq!(gf_base("Pancakes GF"), Some("Pancakes"));
        assert_eq!(gf_base("Pancakes (GF"), Some("Pancakes"));
        assert_eq!(gf_base("Pancakes"), None);
    }

    #[test]
    fn assignments_preserve_first_seen_order() {
        let mut a = IdAssigner::new();
        for n in ["Waffles", "Chili", "Waffles", "Chili GF"] {
            a.assign(Some(n));
        }
        let pairs: Vec<_> = a.assignments().collect();
        assert_eq!(
            pairs,
            vec![("Waffles", "waffles"), ("Chili", "chili"), ("Chili GF", "chili-gf")]
        );
    }
}
