//! Output writers: pretty JSON files and `.xlsx` workbooks rebuilt from read sheets.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use calamine::Data;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Serialize;

use crate::error::{ConversionError, ConversionResult};
use crate::ingestion::SheetTable;
use crate::types::{MealData, PrepInstructions};

/// Serialize `value` as two-space-indented JSON into `path` (created or truncated).
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> ConversionResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.flush()?;
    Ok(())
}

/// Write normalizer output (`{"MEAL_DATA": {...}}`).
pub fn write_meal_data(data: &MealData, path: impl AsRef<Path>) -> ConversionResult<()> {
    write_json(data, path)
}

/// Write prep extractor output.
pub fn write_prep_instructions(prep: &PrepInstructions, path: impl AsRef<Path>) -> ConversionResult<()> {
    write_json(prep, path)
}

/// Builds an output workbook sheet by sheet from [`SheetTable`]s.
///
/// Cells keep their absolute positions; date cells keep a date number format.
pub struct WorkbookWriter {
    workbook: Workbook,
    datetime: Format,
}

impl Default for WorkbookWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookWriter {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }

    /// Copy a sheet unchanged.
    pub fn write_copy(&mut self, table: &SheetTable) -> ConversionResult<()> {
        let ws = self.workbook.add_worksheet();
        ws.set_name(table.name())?;

        let (row0, col0) = table.origin();
        for (r, cells) in table.range().rows().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                write_cell(ws, row0 + r as u32, column(col0 + c as u32)?, cell, &self.datetime)?;
            }
        }
        Ok(())
    }

    /// Copy a sheet with a new first column: `header` on the header row, then `values[i]` on
    /// the i-th data row. Empty values leave the cell blank. Existing columns shift right by one.
    pub fn write_with_leading_column(
        &mut self,
        table: &SheetTable,
        header: &str,
        values: &[String],
    ) -> ConversionResult<()> {
        let header_row = table.header_row().ok_or_else(|| ConversionError::SchemaMismatch {
            message: format!("sheet '{}': no header row to extend", table.name()),
        })?;
        let ws = self.workbook.add_worksheet();
        ws.set_name(table.name())?;

        let (row0, col0) = table.origin();
        let lead = column(col0)?;
        for (r, cells) in table.range().rows().enumerate() {
            let row = row0 + r as u32;
            if r == header_row {
                ws.write_string(row, lead, header)?;
            } else if r > header_row {
                if let Some(value) = values.get(r - header_row - 1).filter(|v| !v.is_empty()) {
                    ws.write_string(row, lead, value.as_str())?;
                }
            }
            for (c, cell) in cells.iter().enumerate() {
                write_cell(ws, row, column(col0 + c as u32 + 1)?, cell, &self.datetime)?;
            }
        }
        Ok(())
    }

    /// Save the workbook to `path`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> ConversionResult<()> {
        self.workbook.save(path.as_ref())?;
        Ok(())
    }
}

fn column(col: u32) -> ConversionResult<u16> {
    u16::try_from(col).map_err(|_| ConversionError::SchemaMismatch {
        message: format!("column index {col} is beyond the xlsx column limit"),
    })
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, cell: &Data, datetime: &Format) -> ConversionResult<()> {
    match cell {
        Data::Empty => {}
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            ws.write_string(row, col, s.as_str())?;
        }
        Data::Int(i) => {
            ws.write_number(row, col, *i as f64)?;
        }
        Data::Float(f) => {
            ws.write_number(row, col, *f)?;
        }
        Data::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
        Data::DateTime(d) => {
            ws.write_number_with_format(row, col, d.as_f64(), datetime)?;
        }
        Data::Error(e) => {
            ws.write_string(row, col, e.to_string())?;
        }
    }
    Ok(())
}
