use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ConversionError, ConversionResult};

/// Which batch operation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Row Normalizer: workbook -> meal data JSON.
    Normalize,
    /// ID Assigner: workbook -> workbook with a `Recipe ID` column.
    AssignIds,
    /// Prep sheet -> per-serving instructions JSON.
    PrepInstructions,
}

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConversionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

impl ConversionSeverity {
    /// Classify a fatal error. Anything that is really a filesystem problem is `Critical`.
    pub fn for_error(e: &ConversionError) -> Self {
        match e {
            ConversionError::Io(_) => Self::Critical,
            ConversionError::Excel(calamine::Error::Io(_)) => Self::Critical,
            ConversionError::Xlsx(rust_xlsxwriter::XlsxError::IoError(_)) => Self::Critical,
            ConversionError::Json(err) if err.is_io() => Self::Critical,
            ConversionError::Excel(_)
            | ConversionError::Xlsx(_)
            | ConversionError::Json(_)
            | ConversionError::SheetMissing { .. }
            | ConversionError::SchemaMismatch { .. } => Self::Error,
        }
    }
}

/// Context about a conversion run.
#[derive(Debug, Clone)]
pub struct ConversionContext {
    /// The input workbook.
    pub path: PathBuf,
    pub operation: Operation,
}

/// Per-sheet counts reported once a sheet has been processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetStats {
    /// Data rows below the header row.
    pub rows_read: usize,
    /// Records (or identifiers) produced.
    pub rows_emitted: usize,
    /// Rows dropped individually.
    pub rows_skipped: usize,
}

/// Counts reported when a run succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub sheets: usize,
    pub records: usize,
}

/// Observer interface for conversion events.
///
/// Non-fatal problems (a skipped sheet or row) and the run's final outcome are reported here.
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ConversionObserver: Send + Sync {
    /// Called after a sheet has been fully processed.
    fn on_sheet_processed(&self, _ctx: &ConversionContext, _sheet: &str, _stats: SheetStats) {}

    /// Called when a sheet is absent or has the wrong shape and is skipped.
    fn on_sheet_skipped(&self, _ctx: &ConversionContext, _sheet: &str, _reason: &str) {}

    /// Called when a single row is dropped. `row` is the 1-based spreadsheet row.
    fn on_row_skipped(&self, _ctx: &ConversionContext, _sheet: &str, _row: usize, _reason: &str) {}

    /// Called when the run succeeds.
    fn on_success(&self, _ctx: &ConversionContext, _stats: RunStats) {}

    /// Called when the run fails.
    fn on_failure(&self, _ctx: &ConversionContext, _severity: ConversionSeverity, _error: &ConversionError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ConversionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ConversionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ConversionObserver for CompositeObserver {
    fn on_sheet_processed(&self, ctx: &ConversionContext, sheet: &str, stats: SheetStats) {
        for o in &self.observers {
            o.on_sheet_processed(ctx, sheet, stats);
        }
    }

    fn on_sheet_skipped(&self, ctx: &ConversionContext, sheet: &str, reason: &str) {
        for o in &self.observers {
            o.on_sheet_skipped(ctx, sheet, reason);
        }
    }

    fn on_row_skipped(&self, ctx: &ConversionContext, sheet: &str, row: usize, reason: &str) {
        for o in &self.observers {
            o.on_row_skipped(ctx, sheet, row, reason);
        }
    }

    fn on_success(&self, ctx: &ConversionContext, stats: RunStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards events to `tracing`: skipped sheets at `warn`, skipped rows at `debug`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ConversionObserver for TracingObserver {
    fn on_sheet_processed(&self, ctx: &ConversionContext, sheet: &str, stats: SheetStats) {
        tracing::info!(
            operation = ?ctx.operation,
            sheet,
            rows_read = stats.rows_read,
            rows_emitted = stats.rows_emitted,
            rows_skipped = stats.rows_skipped,
            "sheet processed"
        );
    }

    fn on_sheet_skipped(&self, ctx: &ConversionContext, sheet: &str, reason: &str) {
        tracing::warn!(operation = ?ctx.operation, sheet, reason, "sheet skipped");
    }

    fn on_row_skipped(&self, ctx: &ConversionContext, sheet: &str, row: usize, reason: &str) {
        tracing::debug!(operation = ?ctx.operation, sheet, row, reason, "row skipped");
    }

    fn on_success(&self, ctx: &ConversionContext, stats: RunStats) {
        tracing::info!(
            operation = ?ctx.operation,
            path = %ctx.path.display(),
            sheets = stats.sheets,
            records = stats.records,
            "conversion finished"
        );
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        tracing::error!(
            operation = ?ctx.operation,
            path = %ctx.path.display(),
            ?severity,
            %error,
            "conversion failed"
        );
    }
}

/// Appends conversion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ConversionObserver for FileObserver {
    fn on_sheet_processed(&self, ctx: &ConversionContext, sheet: &str, stats: SheetStats) {
        self.append_line(&format!(
            "{} sheet operation={:?} sheet={sheet} read={} emitted={} skipped={}",
            unix_ts(),
            ctx.operation,
            stats.rows_read,
            stats.rows_emitted,
            stats.rows_skipped
        ));
    }

    fn on_sheet_skipped(&self, ctx: &ConversionContext, sheet: &str, reason: &str) {
        self.append_line(&format!(
            "{} skip-sheet operation={:?} sheet={sheet} reason={reason}",
            unix_ts(),
            ctx.operation
        ));
    }

    fn on_row_skipped(&self, ctx: &ConversionContext, sheet: &str, row: usize, reason: &str) {
        self.append_line(&format!(
            "{} skip-row operation={:?} sheet={sheet} row={row} reason={reason}",
            unix_ts(),
            ctx.operation
        ));
    }

    fn on_success(&self, ctx: &ConversionContext, stats: RunStats) {
        self.append_line(&format!(
            "{} ok operation={:?} path={} sheets={} records={}",
            unix_ts(),
            ctx.operation,
            ctx.path.display(),
            stats.sheets,
            stats.records
        ));
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        self.append_line(&format!(
            "{} fail severity={:?} operation={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.operation,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} operation={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.operation,
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Routes a run's events to an optional observer.
pub(crate) struct Reporter<'a> {
    ctx: ConversionContext,
    observer: Option<&'a dyn ConversionObserver>,
    alert_at_or_above: ConversionSeverity,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(
        path: &Path,
        operation: Operation,
        observer: Option<&'a Arc<dyn ConversionObserver>>,
        alert_at_or_above: ConversionSeverity,
    ) -> Self {
        Self {
            ctx: ConversionContext {
                path: path.to_path_buf(),
                operation,
            },
            observer: observer.map(|o| &**o),
            alert_at_or_above,
        }
    }

    pub(crate) fn sheet_processed(&self, sheet: &str, stats: SheetStats) {
        if let Some(obs) = self.observer {
            obs.on_sheet_processed(&self.ctx, sheet, stats);
        }
    }

    /// Without an observer the skip still goes to `tracing`.
    pub(crate) fn sheet_skipped(&self, sheet: &str, reason: &str) {
        match self.observer {
            Some(obs) => obs.on_sheet_skipped(&self.ctx, sheet, reason),
            None => TracingObserver.on_sheet_skipped(&self.ctx, sheet, reason),
        }
    }

    pub(crate) fn row_skipped(&self, sheet: &str, row: usize, reason: &str) {
        if let Some(obs) = self.observer {
            obs.on_row_skipped(&self.ctx, sheet, row, reason);
        }
    }

    /// Report the run outcome and hand the result back unchanged.
    pub(crate) fn finish<T>(
        &self,
        result: ConversionResult<T>,
        stats: impl FnOnce(&T) -> RunStats,
    ) -> ConversionResult<T> {
        if let Some(obs) = self.observer {
            match &result {
                Ok(value) => obs.on_success(&self.ctx, stats(value)),
                Err(e) => {
                    let sev = ConversionSeverity::for_error(e);
                    obs.on_failure(&self.ctx, sev, e);
                    if sev >= self.alert_at_or_above {
                        obs.on_alert(&self.ctx, sev, e);
                    }
                }
            }
        }
        result
    }
}
