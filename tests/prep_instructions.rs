use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use recipe_index::export::write_prep_instructions;
use recipe_index::processing::{extract_prep_instructions, PrepOptions};
use recipe_index::ConversionError;
use rust_xlsxwriter::Workbook;

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("recipe-index-{name}-{nanos}.{ext}"))
}

fn write_prep_xlsx(path: &PathBuf) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Prep").unwrap();

    ws.write_string(0, 0, "Recipe").unwrap();
    ws.write_string(0, 1, "4 person").unwrap();
    // sub-header row: column B mentions servings
    ws.write_string(1, 0, "Serving sizes").unwrap();
    ws.write_string(1, 1, "Shopping list (4 servings)").unwrap();
    // Chili: 4 and 8 servings filled in
    ws.write_string(2, 0, " Chili ").unwrap();
    ws.write_string(2, 1, "2 lb beef\n1 can beans\n").unwrap();
    ws.write_string(2, 2, "Brown beef\nAdd beans").unwrap();
    ws.write_string(2, 3, "Bag 1: spices").unwrap();
    ws.write_string(2, 7, "4 lb beef").unwrap();
    // Row with a name but no data
    ws.write_string(3, 0, "Empty Recipe").unwrap();
    // Bagging checklist only, 12 servings (column M)
    ws.write_string(4, 0, "Salad").unwrap();
    ws.write_string(4, 12, "Bag greens\nBag dressing").unwrap();
    wb.save(path).unwrap();
}

#[test]
fn prep_extracts_serving_sizes_with_data() {
    let path = tmp_file("prep", "xlsx");
    write_prep_xlsx(&path);

    let prep = extract_prep_instructions(&path, &PrepOptions::default()).unwrap();

    let chili = &prep.instructions["Chili"];
    assert_eq!(chili.keys().copied().collect::<Vec<_>>(), vec![4, 8]);
    assert_eq!(chili[&4].shopping_list, vec!["2 lb beef", "1 can beans"]);
    assert_eq!(chili[&4].prep, vec!["Brown beef", "Add beans"]);
    assert_eq!(chili[&8].shopping_list, vec!["4 lb beef"]);
    assert!(chili[&8].prep.is_empty());
    assert_eq!(prep.bagging_checklists["Chili"][&4], vec!["Bag 1: spices"]);

    assert!(!prep.instructions.contains_key("Salad"));
    assert_eq!(prep.bagging_checklists["Salad"][&12], vec!["Bag greens", "Bag dressing"]);

    assert!(!prep.instructions.contains_key("Serving sizes"));
    assert!(!prep.instructions.contains_key("Empty Recipe"));
    assert_eq!(prep.recipe_count(), 2);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn prep_json_uses_camel_case_and_string_serving_keys() {
    let xlsx = tmp_file("prep-json", "xlsx");
    let json = tmp_file("prep-json", "json");
    write_prep_xlsx(&xlsx);

    let prep = extract_prep_instructions(&xlsx, &PrepOptions::default()).unwrap();
    write_prep_instructions(&prep, &json).unwrap();

    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(v["instructions"]["Chili"]["4"]["shoppingList"][1], "1 can beans");
    assert_eq!(v["baggingChecklists"]["Salad"]["12"][0], "Bag greens");

    let _ = std::fs::remove_file(&xlsx);
    let _ = std::fs::remove_file(&json);
}

#[test]
fn prep_requires_prep_sheet() {
    let path = tmp_file("no-prep", "xlsx");
    let mut wb = Workbook::new();
    wb.add_worksheet().set_name("Breakfast").unwrap();
    wb.save(&path).unwrap();

    let err = extract_prep_instructions(&path, &PrepOptions::default()).unwrap_err();
    assert!(matches!(err, ConversionError::SheetMissing { ref sheet } if sheet == "Prep"));

    let _ = std::fs::remove_file(&path);
}
