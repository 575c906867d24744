use crate::cli::BatchArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pdbtree::engine::progress::ProgressReporter;
use pdbtree::workflows::batch::{BatchItem, parse_paths};
use std::path::Path;
use tracing::info;

/// One line per input: status, path and either counts or the error.
pub fn render_report(items: &[BatchItem]) -> String {
    items
        .iter()
        .map(|item| match &item.result {
            Ok(document) => format!(
                "OK    {}  models={} atoms={} anomalies={}",
                item.path.display(),
                document.models().len(),
                document.models().iter().map(|m| m.atoms().count()).sum::<usize>(),
                document.anomalies().len()
            ),
            Err(e) => format!("FAIL  {}  {}", item.path.display(), e),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn run(args: BatchArgs, config_path: Option<&Path>) -> Result<()> {
    let resolved = config::resolve(config_path, &args.parse, None)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Parsing {} files...", args.inputs.len());
    let items = parse_paths(&args.inputs, &resolved.parse, &reporter);
    println!("{}", render_report(&items));

    let failed = progress_handler.failed();
    if failed > 0 {
        return Err(CliError::BatchFailures {
            failed,
            total: items.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ParseOptions;
    use std::fs;

    const ATOM: &str =
        "ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00  0.00           N\n";

    #[test]
    fn all_good_inputs_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let inputs: Vec<_> = (0..3)
            .map(|i| {
                let path = dir.path().join(format!("{i}.pdb"));
                fs::write(&path, ATOM).unwrap();
                path
            })
            .collect();
        let args = BatchArgs {
            inputs,
            parse: ParseOptions::default(),
        };
        assert!(run(args, None).is_ok());
    }

    #[test]
    fn failures_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.pdb");
        fs::write(&good, ATOM).unwrap();
        let args = BatchArgs {
            inputs: vec![good, dir.path().join("missing.pdb")],
            parse: ParseOptions::default(),
        };
        assert!(matches!(
            run(args, None),
            Err(CliError::BatchFailures {
                failed: 1,
                total: 2
            })
        ));
    }

    #[test]
    fn report_lists_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.pdb");
        fs::write(&good, ATOM).unwrap();
        let paths = vec![good, dir.path().join("missing.pdb")];
        let items = parse_paths(
            &paths,
            &pdbtree::engine::config::ParseConfig::default(),
            &ProgressReporter::new(),
        );
        let report = render_report(&items);
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("OK    "));
        assert!(lines[0].ends_with("models=1 atoms=1 anomalies=0"));
        assert!(lines[1].starts_with("FAIL  "));
    }
}
