//! Recipe workbook converter CLI.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use recipe_index::export::{write_meal_data, write_prep_instructions};
use recipe_index::ingestion::{CompositeObserver, ConversionObserver, FileObserver, TracingObserver};
use recipe_index::processing::{
    assign_workbook_ids, extract_prep_instructions, normalize_workbook, AssignOptions, NormalizeOptions,
    PrepOptions,
};

mod cli;
mod logging;

use crate::cli::{AssignArgs, Cli, Command, ConvertArgs, PrepArgs};
use crate::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(cli.verbosity.tracing_level_filter(), !cli.verbosity.is_present()) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }

    let observer = observer_for(cli.log_file.as_deref());
    let result = match &cli.command {
        Command::Convert(args) => run_convert(args, observer),
        Command::AssignIds(args) => run_assign(args, observer),
        Command::Prep(args) => run_prep(args, observer),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn observer_for(log_file: Option<&Path>) -> Arc<dyn ConversionObserver> {
    let tracing: Arc<dyn ConversionObserver> = Arc::new(TracingObserver);
    match log_file {
        Some(path) => {
            let file: Arc<dyn ConversionObserver> = Arc::new(FileObserver::new(path));
            Arc::new(CompositeObserver::new(vec![tracing, file]))
        }
        None => tracing,
    }
}

fn run_convert(args: &ConvertArgs, observer: Arc<dyn ConversionObserver>) -> anyhow::Result<()> {
    let mut options = NormalizeOptions {
        name_column: args.name_column.clone(),
        observer: Some(observer),
        ..Default::default()
    };
    if !args.meal_types.is_empty() {
        options.meal_types = args.meal_types.clone();
    }
    if args.include_prep {
        options = options.with_prep();
    }

    let data = normalize_workbook(&args.input, &options)
        .with_context(|| format!("failed to convert {}", args.input.display()))?;
    write_meal_data(&data, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    for (meal_type, records) in &data.meals {
        println!("{meal_type}: {} recipes", records.len());
    }
    println!("Converted {} recipes to {}", data.record_count(), args.output.display());
    Ok(())
}

fn run_assign(args: &AssignArgs, observer: Arc<dyn ConversionObserver>) -> anyhow::Result<()> {
    let options = AssignOptions {
        observer: Some(observer),
        ..Default::default()
    };
    let report = assign_workbook_ids(&args.input, &args.output, &options)
        .with_context(|| format!("failed to assign recipe IDs for {}", args.input.display()))?;

    for sheet in &report.sheets {
        println!("Processed {} sheet - {} recipes", sheet.sheet, sheet.rows);
    }
    println!("\nUpdated workbook saved as: {}", args.output.display());
    if args.sample > 0 && !report.assignments.is_empty() {
        println!("\nSample of Recipe ID mappings:");
        for (name, id) in report.assignments.iter().take(args.sample) {
            println!("{name} -> {id}");
        }
    }
    Ok(())
}

fn run_prep(args: &PrepArgs, observer: Arc<dyn ConversionObserver>) -> anyhow::Result<()> {
    let options = PrepOptions {
        observer: Some(observer),
        ..Default::default()
    };
    let prep = extract_prep_instructions(&args.input, &options)
        .with_context(|| format!("failed to read prep instructions from {}", args.input.display()))?;
    write_prep_instructions(&prep, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "Extracted prep data for {} recipes to {}",
        prep.recipe_count(),
        args.output.display()
    );
    Ok(())
}
