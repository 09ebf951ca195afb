//! Workbook reading and run observability.
//!
//! - [`workbook`]: open a workbook and read sheets by header name
//! - [`observability`]: the [`ConversionObserver`] callback interface and stock observers

pub mod observability;
pub mod workbook;

pub use observability::{
    CompositeObserver, ConversionContext, ConversionObserver, ConversionSeverity, FileObserver, Operation,
    RunStats, SheetStats, TracingObserver,
};
pub use workbook::{cell_display, RecipeWorkbook, SheetRow, SheetTable};
