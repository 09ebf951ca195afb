use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use calamine::{open_workbook_auto, Data, Reader};
use recipe_index::ingestion::{ConversionContext, ConversionObserver};
use recipe_index::processing::{assign_workbook_ids, AssignOptions};
use rust_xlsxwriter::Workbook;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("recipe-index-{name}-{nanos}.xlsx"))
}

fn write_named_sheet(wb: &mut Workbook, sheet: &str, names: &[&str]) {
    let ws = wb.add_worksheet();
    ws.set_name(sheet).unwrap();
    ws.write_string(0, 0, "Recipe Prep").unwrap();
    ws.write_string(0, 1, "Calories").unwrap();
    for (i, name) in names.iter().enumerate() {
        let row = i as u32 + 1;
        if !name.is_empty() {
            ws.write_string(row, 0, *name).unwrap();
        }
        ws.write_number(row, 1, 100.0 * (i + 1) as f64).unwrap();
    }
}

/// Workbook order differs from processing order on purpose: Breakfast comes before Prep.
fn write_index_xlsx(path: &PathBuf) {
    let mut wb = Workbook::new();
    write_named_sheet(&mut wb, "Breakfast", &["Pancakes GF", "Oatmeal Bowl", ""]);
    write_named_sheet(&mut wb, "Prep", &["Pancakes", "Oatmeal Bowl"]);
    write_named_sheet(&mut wb, "Dinner", &["Chili", "Chili GF", "Fresh Salad GF"]);
    let notes = wb.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "Remember to restock rice").unwrap();
    notes.write_boolean(1, 1, true).unwrap();
    wb.save(path).unwrap();
}

fn sheet_rows(path: &PathBuf, sheet: &str) -> Vec<Vec<Data>> {
    let mut wb = open_workbook_auto(path).unwrap();
    let range = wb.worksheet_range(sheet).unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}

fn s(v: &str) -> Data {
    Data::String(v.to_string())
}

#[test]
fn assign_ids_inserts_leading_column_and_reuses_ids() {
    let input = tmp_file("index");
    let output = tmp_file("index-with-ids");
    write_index_xlsx(&input);

    let report = assign_workbook_ids(&input, &output, &AssignOptions::default()).unwrap();

    // Prep is processed first, so "Pancakes GF" on Breakfast finds its base.
    let breakfast = sheet_rows(&output, "Breakfast");
    assert_eq!(breakfast[0], vec![s("Recipe ID"), s("Recipe Prep"), s("Calories")]);
    assert_eq!(breakfast[1][0], s("pancakes-gf"));
    assert_eq!(breakfast[1][1], s("Pancakes GF"));
    assert_eq!(breakfast[1][2], Data::Float(100.0));
    assert_eq!(breakfast[2][0], s("oatmeal-bowl"));
    // blank name keeps its row, with an empty identifier
    assert_eq!(breakfast[3][0], Data::Empty);
    assert_eq!(breakfast[3][2], Data::Float(300.0));

    let dinner = sheet_rows(&output, "Dinner");
    assert_eq!(dinner[2][0], s("chili-gf"));
    assert_eq!(dinner[3][0], s("fresh-salad-gf"));

    let sheets: Vec<&str> = report.sheets.iter().map(|s| s.sheet.as_str()).collect();
    assert_eq!(sheets, vec!["Prep", "Breakfast", "Dinner"]);
    assert_eq!(report.sheets[1].rows, 3);
    assert_eq!(report.sheets[1].assigned, 2);
    assert_eq!(report.assignments[0], ("Pancakes".to_string(), "pancakes".to_string()));

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn assign_ids_copies_other_sheets_unchanged_in_workbook_order() {
    let input = tmp_file("index-notes");
    let output = tmp_file("index-notes-out");
    write_index_xlsx(&input);

    assign_workbook_ids(&input, &output, &AssignOptions::default()).unwrap();

    let wb = open_workbook_auto(&output).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Breakfast", "Prep", "Dinner", "Notes"]);

    let notes = sheet_rows(&output, "Notes");
    assert_eq!(notes[0][0], s("Remember to restock rice"));
    assert_eq!(notes[1][1], Data::Bool(true));

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn assign_ids_fails_on_missing_input() {
    let input = tmp_file("missing");
    let output = tmp_file("missing-out");
    assert!(assign_workbook_ids(&input, &output, &AssignOptions::default()).is_err());
    assert!(!output.exists());
}

#[derive(Default)]
struct SkippedSheets(Mutex<Vec<String>>);

impl ConversionObserver for SkippedSheets {
    fn on_sheet_skipped(&self, _ctx: &ConversionContext, sheet: &str, _reason: &str) {
        self.0.lock().unwrap().push(sheet.to_string());
    }
}

/// Rewrite `path` with the XML of `entry` cut off right before its first `</v>`.
fn truncate_zip_entry(path: &PathBuf, entry: &str) {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let name = file.name().to_string();
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).unwrap();
        if name == entry {
            let text = String::from_utf8(bytes).unwrap();
            let cut = text.find("</v>").unwrap();
            bytes = text[..cut].as_bytes().to_vec();
        }
        entries.push((name, bytes));
    }
    drop(archive);

    let mut writer = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, bytes) in entries {
        writer.start_file(name, options).unwrap();
        writer.write_all(&bytes).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn assign_ids_skips_unreadable_sheet_and_writes_the_rest() {
    let input = tmp_file("corrupt-notes");
    let output = tmp_file("corrupt-notes-with-ids");
    let mut wb = Workbook::new();
    write_named_sheet(&mut wb, "Breakfast", &["Oatmeal Bowl"]);
    let notes = wb.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_number(0, 0, 42.0).unwrap();
    wb.save(&input).unwrap();
    truncate_zip_entry(&input, "xl/worksheets/sheet2.xml");

    let observer = Arc::new(SkippedSheets::default());
    let options = AssignOptions {
        observer: Some(observer.clone()),
        ..Default::default()
    };
    let report = assign_workbook_ids(&input, &output, &options).unwrap();

    assert_eq!(report.assignments, vec![("Oatmeal Bowl".to_string(), "oatmeal-bowl".to_string())]);
    assert_eq!(*observer.0.lock().unwrap(), vec!["Notes"]);

    let written = open_workbook_auto(&output).unwrap();
    assert_eq!(written.sheet_names(), vec!["Breakfast".to_string()]);
    assert_eq!(sheet_rows(&output, "Breakfast")[1][0], s("oatmeal-bowl"));

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}
