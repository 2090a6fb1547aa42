//! End-to-end term pipeline: fetch → build → classify → team sort → CSV.
//!
//! [`run_term`] handles one year/term. [`run_batch`] loops over several, one
//! after another, under an explicit [`BatchPolicy`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info, instrument, warn};

use coursecatalog_crawler::ListingSource;
use coursecatalog_shared::{AcademicTerm, CatalogError, CourseRecord, Result};

use crate::classifier::{Rejection, Verdict, classify};
use crate::export::{DEFAULT_HEADER, write_csv};
use crate::record::build_candidate;
use crate::team::sort_as_team;

/// Outcome of a successful single-term run.
#[derive(Debug, Clone)]
pub struct TermReport {
    pub term: AcademicTerm,
    /// Path of the CSV file written.
    pub path: PathBuf,
    /// Rows found on the listing page.
    pub rows: usize,
    /// Records written.
    pub accepted: usize,
    pub rejected_graduate: usize,
    pub rejected_elective: usize,
    pub elapsed: std::time::Duration,
}

/// What a batch does when one term fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Log the failure, record it, move on to the next term.
    #[default]
    Continue,
    /// Stop at the first failure and return its error.
    Abort,
}

/// Outcome of a batch run under [`BatchPolicy::Continue`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<TermReport>,
    pub failed: Vec<(AcademicTerm, CatalogError)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase of a term.
    fn phase(&self, term: &AcademicTerm, name: &str);
    /// Called after a term's CSV has been written.
    fn term_done(&self, report: &TermReport);
    /// Called when a term fails.
    fn term_failed(&self, term: &AcademicTerm, err: &CatalogError);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _term: &AcademicTerm, _name: &str) {}
    fn term_done(&self, _report: &TermReport) {}
    fn term_failed(&self, _term: &AcademicTerm, _err: &CatalogError) {}
}

/// Accepted records in source order, plus rejection counts.
#[derive(Debug, Default)]
struct Collected {
    records: Vec<CourseRecord>,
    graduate: usize,
    elective: usize,
}

/// Build a candidate for every row and keep the ones the classifier accepts.
fn collect_records(rows: &[coursecatalog_crawler::RawRow]) -> Collected {
    let mut out = Collected::default();
    for row in rows {
        let record = build_candidate(row);
        match classify(&record) {
            Verdict::Accept => out.records.push(record),
            Verdict::Reject(Rejection::Graduate) => out.graduate += 1,
            Verdict::Reject(Rejection::Elective) => out.elective += 1,
        }
    }
    out
}

/// Run one year/term: fetch, extract, sort and write `<output_dir>/<file_name>`.
#[instrument(skip_all, fields(term = %term))]
pub async fn run_term<S: ListingSource>(
    source: &S,
    term: &AcademicTerm,
    output_dir: &Path,
    progress: &dyn ProgressReporter,
) -> Result<TermReport> {
    let start = Instant::now();

    progress.phase(term, "Fetching listing");
    let rows = source.fetch_rows(term).await?;

    progress.phase(term, "Extracting records");
    let collected = collect_records(&rows);
    info!(
        rows = rows.len(),
        accepted = collected.records.len(),
        graduate = collected.graduate,
        elective = collected.elective,
        "records classified"
    );

    progress.phase(term, "Sorting");
    let sorted = sort_as_team(collected.records);

    progress.phase(term, "Writing CSV");
    let path = output_dir.join(term.file_name());
    write_csv(&path, &sorted, &DEFAULT_HEADER)?;

    let report = TermReport {
        term: *term,
        path,
        rows: rows.len(),
        accepted: sorted.len(),
        rejected_graduate: collected.graduate,
        rejected_elective: collected.elective,
        elapsed: start.elapsed(),
    };

    progress.term_done(&report);
    info!(
        path = %report.path.display(),
        accepted = report.accepted,
        elapsed_ms = report.elapsed.as_millis(),
        "term complete"
    );

    Ok(report)
}

/// Run every term in `terms` in order.
///
/// Each term is written before the next one is fetched, so a later failure
/// never touches files already produced.
#[instrument(skip_all, fields(terms = terms.len(), ?policy))]
pub async fn run_batch<S: ListingSource>(
    source: &S,
    terms: &[AcademicTerm],
    output_dir: &Path,
    policy: BatchPolicy,
    progress: &dyn ProgressReporter,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for term in terms {
        match run_term(source, term, output_dir, progress).await {
            Ok(done) => report.completed.push(done),
            Err(e) => {
                error!(
                    term = %term,
                    status = e.status_code(),
                    error = %e,
                    "term failed"
                );
                progress.term_failed(term, &e);

                match policy {
                    BatchPolicy::Abort => return Err(e),
                    BatchPolicy::Continue => report.failed.push((*term, e)),
                }
            }
        }
    }

    if !report.is_clean() {
        warn!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            "batch finished with failures"
        );
    } else {
        info!(completed = report.completed.len(), "batch complete");
    }

    Ok(report)
}
