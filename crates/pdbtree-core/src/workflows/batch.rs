use super::parse::parse_path;
use crate::core::models::document::PdbDocument;
use crate::engine::config::ParseConfig;
use crate::engine::error::PdbError;
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Outcome of parsing one file of a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub result: Result<PdbDocument, PdbError>,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Parses every path in parallel on the current rayon pool.
///
/// Each file is independent: a failure is kept in its [`BatchItem`] and never
/// aborts the rest. Results come back in input order.
#[instrument(skip_all, name = "batch_workflow", fields(files = paths.len()))]
pub fn parse_paths(
    paths: &[PathBuf],
    config: &ParseConfig,
    reporter: &ProgressReporter,
) -> Vec<BatchItem> {
    reporter.report(Progress::PhaseStart { name: "Parsing" });
    reporter.report(Progress::TaskStart {
        total_steps: paths.len() as u64,
    });

    let items: Vec<BatchItem> = paths
        .par_iter()
        .map(|path| {
            let result = parse_path(path, config);
            if let Err(e) = &result {
                warn!(path = %path.display(), error = %e, "Failed to parse file");
            }
            reporter.report(Progress::FileDone {
                path: path.clone(),
                ok: result.is_ok(),
            });
            reporter.report(Progress::TaskIncrement);
            BatchItem {
                path: path.clone(),
                result,
            }
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let failed = items.iter().filter(|item| !item.is_ok()).count();
    info!(
        "Batch complete: {} parsed, {} failed.",
        items.len() - failed,
        failed
    );
    items
}
