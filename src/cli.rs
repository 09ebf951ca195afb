//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use recipe_index::types::MealType;

#[derive(Parser)]
#[command(
    name = "recipe-index",
    version,
    about = "Convert the recipe workbook into meal data JSON and keep recipe IDs stable",
    long_about = "Convert the recipe workbook into meal data JSON and keep recipe IDs stable.\n\n\
                  Each command reads one workbook and writes one output file. Missing sheets and \
                  unusable rows are skipped and logged; an unreadable workbook fails the run."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Also append conversion events to this file.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize the meal sheets into a meal data JSON file.
    Convert(ConvertArgs),

    /// Write a copy of the workbook with a leading "Recipe ID" column.
    AssignIds(AssignArgs),

    /// Extract per-serving prep instructions from the Prep sheet.
    Prep(PrepArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Input workbook.
    #[arg(long, short, value_name = "WORKBOOK", default_value = "RecipeIndex.xlsx")]
    pub input: PathBuf,

    /// Output JSON file.
    #[arg(long, short, value_name = "JSON", default_value = "meal_data.json")]
    pub output: PathBuf,

    /// Meal sheet to convert; repeat for several. Defaults to breakfast, lunch and dinner.
    #[arg(long = "meal-type", value_name = "TYPE")]
    pub meal_types: Vec<MealType>,

    /// Also convert the Prep sheet.
    #[arg(long = "include-prep")]
    pub include_prep: bool,

    /// Header of the recipe name column.
    #[arg(long = "name-column", value_name = "HEADER", default_value = "Recipe Prep")]
    pub name_column: String,
}

#[derive(Args)]
pub struct AssignArgs {
    /// Input workbook.
    #[arg(long, short, value_name = "WORKBOOK", default_value = "Recipe Index.xlsx")]
    pub input: PathBuf,

    /// Output workbook (always written as .xlsx).
    #[arg(long, short, value_name = "WORKBOOK", default_value = "Recipe Index with IDs.xlsx")]
    pub output: PathBuf,

    /// Number of name -> ID pairs to print after the run.
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub sample: usize,
}

#[derive(Args)]
pub struct PrepArgs {
    /// Input workbook.
    #[arg(long, short, value_name = "WORKBOOK", default_value = "RecipeIndex.xlsx")]
    pub input: PathBuf,

    /// Output JSON file.
    #[arg(long, short, value_name = "JSON", default_value = "prep_instructions.json")]
    pub output: PathBuf,
}
