//! Workbook access on top of `calamine`.
//!
//! [`RecipeWorkbook`] opens any spreadsheet format calamine understands; [`SheetTable`] wraps one
//! sheet's cell range and locates its header row so rows can be read by column name.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};

use crate::error::{ConversionError, ConversionResult};

/// An open input workbook.
pub struct RecipeWorkbook {
    sheets: Sheets<BufReader<File>>,
}

impl RecipeWorkbook {
    /// Open a workbook (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`).
    ///
    /// A missing or unreadable file is an error; callers treat it as fatal.
    pub fn open(path: impl AsRef<Path>) -> ConversionResult<Self> {
        let path = path.as_ref();
        // calamine wraps a missing file in a format error; surface it as plain I/O.
        std::fs::metadata(path)?;
        let sheets = open_workbook_auto(path)?;
        Ok(Self { sheets })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names().to_vec()
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.sheet_names().iter().any(|s| s == name)
    }

    /// Load a sheet by exact name.
    pub fn sheet(&mut self, name: &str) -> ConversionResult<SheetTable> {
        if !self.has_sheet(name) {
            return Err(ConversionError::SheetMissing {
                sheet: name.to_string(),
            });
        }
        let range = self.sheets.worksheet_range(name)?;
        Ok(SheetTable::new(name, range))
    }
}

/// One sheet's cells plus its detected header row.
///
/// The header row is the first row containing any non-empty cell. Column lookups compare
/// trimmed header text exactly.
#[derive(Debug, Clone)]
pub struct SheetTable {
    name: String,
    range: Range<Data>,
    header_row: Option<usize>,
    headers: Vec<String>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, range: Range<Data>) -> Self {
        let mut header_row = None;
        let mut headers = Vec::new();
        for (idx0, row) in range.rows().enumerate() {
            if row.iter().any(|c| !matches!(c, Data::Empty)) {
                header_row = Some(idx0);
                headers = row.iter().map(|c| cell_display(c).trim().to_string()).collect();
                break;
            }
        }
        Self {
            name: name.into(),
            range,
            header_row,
            headers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> &Range<Data> {
        &self.range
    }

    /// Absolute (row, column) of the range's top-left cell.
    pub fn origin(&self) -> (u32, u32) {
        self.range.start().unwrap_or((0, 0))
    }

    /// Index of the header row relative to [`Self::range`], if the sheet has any content.
    pub fn header_row(&self) -> Option<usize> {
        self.header_row
    }

    /// Column index (relative to [`Self::range`]) of the header named `column`.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Like [`Self::column_index`], but reports why the column cannot be used.
    pub fn require_column(&self, column: &str) -> ConversionResult<usize> {
        if self.header_row.is_none() {
            return Err(ConversionError::SchemaMismatch {
                message: format!(
                    "sheet '{}': sheet has no non-empty rows (no header row found)",
                    self.name
                ),
            });
        }
        self.column_index(column)
            .ok_or_else(|| ConversionError::SchemaMismatch {
                message: format!(
                    "sheet '{}': missing required column '{column}'. headers={:?}",
                    self.name, self.headers
                ),
            })
    }

    /// Rows below the header row, in sheet order. Empty if the sheet has no header.
    pub fn data_rows(&self) -> impl Iterator<Item = SheetRow<'_>> + '_ {
        let first_data = self.header_row.map(|h| h + 1).unwrap_or(usize::MAX);
        let origin_row = self.origin().0 as usize;
        self.range
            .rows()
            .enumerate()
            .skip(first_data)
            .map(move |(idx0, cells)| SheetRow {
                table: self,
                // Report 1-based row number (Excel-like).
                number: origin_row + idx0 + 1,
                cells,
            })
    }
}

/// A data row of a [`SheetTable`], addressable by header name.
#[derive(Debug, Clone, Copy)]
pub struct SheetRow<'a> {
    table: &'a SheetTable,
    number: usize,
    cells: &'a [Data],
}

impl<'a> SheetRow<'a> {
    /// 1-based spreadsheet row number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Cell under header `column`. `None` if the sheet has no such column.
    pub fn get(&self, column: &str) -> Option<&'a Data> {
        let idx = self.table.column_index(column)?;
        self.cells.get(idx)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| matches!(c, Data::Empty))
    }
}

/// Render a cell as text. Whole-number floats print without a fractional part.
pub fn cell_display(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Beyond 2^53 a float no longer holds every integer exactly.
            if f.fract() == 0.0 && f.abs() < 9.0e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(d) => d.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_render_without_fraction() {
        assert_eq!(cell_display(&Data::Float(350.0)), "350");
        assert_eq!(cell_display(&Data::Float(-2.0)), "-2");
        assert_eq!(cell_display(&Data::Float(2.5)), "2.5");
    }

    #[test]
    fn huge_floats_do_not_saturate() {
        assert_eq!(cell_display(&Data::Float(1e20)), 1e20_f64.to_string());
        assert_ne!(cell_display(&Data::Float(1e20)), i64::MAX.to_string());
    }

    #[test]
    fn header_row_is_first_non_empty_row() {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((1, 0), Data::String(" Recipe Prep ".to_string()));
        range.set_value((1, 1), Data::String("Calories".to_string()));
        range.set_value((2, 0), Data::String("Granola".to_string()));
        let table = SheetTable::new("Breakfast", range);

        assert_eq!(table.header_row(), Some(1));
        assert_eq!(table.column_index("Recipe Prep"), Some(0));
        let rows: Vec<_> = table.data_rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].number(), 3);
        assert!(table.require_column("Servings").is_err());
    }
}
