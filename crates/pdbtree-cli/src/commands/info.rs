use crate::cli::InfoArgs;
use crate::config;
use crate::error::Result;
use pdbtree::core::models::document::PdbDocument;
use pdbtree::workflows::parse::parse_path;
use std::fmt::Write;
use std::path::Path;
use tracing::info;

pub fn run(args: InfoArgs, config_path: Option<&Path>) -> Result<()> {
    let resolved = config::resolve(config_path, &args.parse, None)?;

    info!("Parsing {:?}", &args.input);
    let document = parse_path(&args.input, &resolved.parse)?;

    print!("{}", render_summary(&document, args.anomalies));
    Ok(())
}

/// Human-readable overview of a parsed document.
pub fn render_summary(document: &PdbDocument, list_anomalies: bool) -> String {
    let header = document.header();
    let mut out = String::new();

    let _ = writeln!(out, "{}", document);
    if let Some(classification) = header.classification() {
        let _ = writeln!(out, "Classification: {}", classification);
    }
    if let Some(date) = header.deposition_date() {
        let _ = writeln!(out, "Deposited:      {}", date.format("%Y-%m-%d"));
    }
    if let Some(link) = header.obsolete() {
        let _ = writeln!(out, "Obsolete:       replaced by {}", link.codes.join(", "));
    }
    if let Some(title) = header.title() {
        let _ = writeln!(out, "Title:          {}", title);
    }
    if let Some(caveat) = header.caveat() {
        let _ = writeln!(out, "Caveat:         {}", caveat);
    }
    if !header.experimental_techniques().is_empty() {
        let _ = writeln!(
            out,
            "Technique:      {}",
            header.experimental_techniques().join("; ")
        );
    }
    if !header.authors().is_empty() {
        let _ = writeln!(out, "Authors:        {}", header.authors().join(", "));
    }
    if let Some(crystal) = header.crystal() {
        let cell = [crystal.a, crystal.b, crystal.c, crystal.alpha, crystal.beta, crystal.gamma]
            .iter()
            .map(|v| v.map_or_else(|| "?".to_string(), |v| format!("{:.3}", v)))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            out,
            "Cell:           {} {}",
            cell,
            crystal.space_group.as_deref().unwrap_or("")
        );
    }

    let transforms = header.transforms();
    if !transforms.is_empty() {
        let present: Vec<&str> = [
            transforms.origx.map(|_| "ORIGX"),
            transforms.scale.map(|_| "SCALE"),
        ]
        .into_iter()
        .flatten()
        .collect();
        let _ = writeln!(
            out,
            "Transforms:     {}{} NCS operators",
            present.iter().map(|p| format!("{}, ", p)).collect::<String>(),
            transforms.ncs.len()
        );
    }

    match header.model_count() {
        Some(declared) => {
            let _ = writeln!(
                out,
                "Models:         {} (declared {})",
                document.models().len(),
                declared
            );
        }
        None => {
            let _ = writeln!(out, "Models:         {}", document.models().len());
        }
    }
    for model in document.models() {
        let _ = writeln!(
            out,
            "  Model {}: {} chains, {} residues, {} molecules, {} atoms, {} complexes",
            model.model_id,
            model.chains().len(),
            model.residue_count(),
            model.molecules().len(),
            model.atoms().count(),
            model.complexes().len()
        );
        for complex in model.complexes() {
            let _ = writeln!(
                out,
                "    Complex {} ({}): chains {}",
                complex.complex_id,
                complex.complex_name,
                complex.chain_ids.join(", ")
            );
        }
    }

    let _ = writeln!(out, "Connections:    {}", document.connections().len());
    let _ = writeln!(out, "Anomalies:      {}", document.anomalies().len());
    if list_anomalies {
        for anomaly in document.anomalies() {
            let _ = writeln!(out, "  - {}", anomaly);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdbtree::engine::config::ParseConfig;
    use pdbtree::workflows::parse::parse_str;

    const PDB: &str = "\
HEADER    OXYGEN TRANSPORT                        21-AUG-17   1ABC
TITLE     HEMOGLOBIN
COMPND    MOL_ID: 1;
COMPND   2 MOLECULE: COMPLEX1;
COMPND   3 CHAIN: A, B;
ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  MET A   1      11.639   6.071  -5.147  1.00  0.00           C
ATOM      3  N   GLY B   1      13.104   7.134  -6.504  1.00  0.00           N
ATOM      4  N   MET A   2      12.104   6.134  -6.504  1.00  0.00           N
CONECT    1    2
END
";

    #[test]
    fn summary_lists_header_and_counts() {
        let document = parse_str(PDB, &ParseConfig::default()).unwrap();
        let summary = render_summary(&document, false);
        assert!(summary.starts_with("<Pdb (1ABC)>\n"));
        assert!(summary.contains("Classification: OXYGEN TRANSPORT\n"));
        assert!(summary.contains("Deposited:      2017-08-21\n"));
        assert!(summary.contains("Title:          HEMOGLOBIN\n"));
        assert!(summary.contains("Models:         1\n"));
        assert!(summary.contains("Connections:    1\n"));
        assert!(summary.contains("Anomalies:      1\n"));
        assert!(!summary.contains("  - "));
    }

    #[test]
    fn summary_shows_title_section_annotations() {
        let text = "\
HEADER    OXYGEN TRANSPORT                        21-AUG-17   1ABC
OBSLTE     31-JAN-18 1ABC      2ABC
CAVEAT     1ABC    CHIRALITY ERRORS
NUMMDL    1
SCALE1      0.019231  0.000000  0.000000        0.00000
SCALE2      0.000000  0.017065  0.000000        0.00000
SCALE3      0.000000  0.000000  0.016155        0.00000
ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00  0.00           N
";
        let document = parse_str(text, &ParseConfig::default()).unwrap();
        let summary = render_summary(&document, false);
        assert!(summary.contains("Obsolete:       replaced by 2ABC\n"));
        assert!(summary.contains("Caveat:         CHIRALITY ERRORS\n"));
        assert!(summary.contains("Transforms:     SCALE, 0 NCS operators\n"));
        assert!(summary.contains("Models:         1 (declared 1)\n"));
        assert!(summary.contains("Anomalies:      0\n"));
    }

    #[test]
    fn summary_can_list_anomalies() {
        let document = parse_str(PDB, &ParseConfig::default()).unwrap();
        let summary = render_summary(&document, true);
        assert!(summary.contains("  - model 1: chain 'A' is split into non-contiguous runs\n"));
    }
}
