use crate::cli::AtomsArgs;
use crate::config;
use crate::error::{CliError, Result};
use pdbtree::core::models::atom::Atom;
use pdbtree::core::models::document::PdbDocument;
use pdbtree::core::models::model::Model;
use pdbtree::core::models::residue::Residue;
use pdbtree::workflows::parse::parse_path;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One CSV row per atom.
#[derive(Debug, Serialize, PartialEq)]
pub struct AtomRow<'a> {
    pub model: i32,
    pub record: &'static str,
    pub serial: i32,
    pub name: &'a str,
    pub alt_loc: Option<char>,
    pub residue_name: &'a str,
    pub chain_id: &'a str,
    pub residue_number: Option<i32>,
    pub insert_code: &'a str,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub occupancy: f64,
    pub temperature_factor: Option<f64>,
    pub element: &'a str,
    pub charge: i32,
}

impl<'a> AtomRow<'a> {
    fn new(model: &Model, residue: &'a Residue, atom: &'a Atom) -> Self {
        Self {
            model: model.model_id,
            record: atom.kind.keyword(),
            serial: atom.id,
            name: &atom.name,
            alt_loc: atom.alt_loc,
            residue_name: &residue.name,
            chain_id: &residue.chain_id,
            residue_number: residue.residue_number,
            insert_code: &residue.insert_code,
            x: atom.position.x,
            y: atom.position.y,
            z: atom.position.z,
            occupancy: atom.occupancy,
            temperature_factor: atom.temperature_factor,
            element: &atom.element,
            charge: atom.charge,
        }
    }
}

/// Flattens the selected models: chain residues first, then small molecules.
pub fn atom_rows(document: &PdbDocument, model_id: Option<i32>) -> Vec<AtomRow<'_>> {
    let mut rows = Vec::new();
    for model in document
        .models()
        .iter()
        .filter(|m| model_id.is_none_or(|id| m.model_id == id))
    {
        let residues = model
            .chains()
            .iter()
            .flat_map(|chain| chain.residues())
            .chain(model.molecules());
        for residue in residues {
            rows.extend(
                residue
                    .atoms()
                    .iter()
                    .map(|atom| AtomRow::new(model, residue, atom)),
            );
        }
    }
    rows
}

pub fn run(args: AtomsArgs, config_path: Option<&Path>) -> Result<()> {
    let resolved = config::resolve(config_path, &args.parse, None)?;
    let document = parse_path(&args.input, &resolved.parse)?;

    if let Some(id) = args.model {
        if document.model_by_id(id).is_none() {
            return Err(CliError::Argument(format!(
                "model {} not found in {}",
                id,
                args.input.display()
            )));
        }
    }

    let rows = atom_rows(&document, args.model);
    let mut writer = csv::Writer::from_path(&args.output)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Wrote {} atoms to {:?}", rows.len(), &args.output);
    println!("✓ {} atoms written to: {}", rows.len(), args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ParseOptions;
    use pdbtree::engine::config::ParseConfig;
    use pdbtree::workflows::parse::parse_str;
    use std::fs;

    const TWO_MODELS: &str = "\
MODEL        1
ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00  0.00           N
HETATM    2 FE   HEM A 201      15.000  15.000  15.000  1.00 10.00          FE2+
ENDMDL
MODEL        2
ATOM      1  N   MET A   1      12.104   6.134  -6.504  1.00  0.00           N
ENDMDL
END
";

    #[test]
    fn rows_cover_residues_and_molecules() {
        let document = parse_str(TWO_MODELS, &ParseConfig::default()).unwrap();
        let rows = atom_rows(&document, None);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].record, "ATOM");
        assert_eq!(rows[0].residue_name, "MET");
        assert_eq!(rows[1].record, "HETATM");
        assert_eq!(rows[1].element, "FE");
        assert_eq!(rows[1].charge, 2);
        assert_eq!(rows[2].model, 2);
    }

    #[test]
    fn rows_can_be_limited_to_one_model() {
        let document = parse_str(TWO_MODELS, &ParseConfig::default()).unwrap();
        let rows = atom_rows(&document, Some(2));
        assert_eq!(rows.len(), 1);
        assert!((rows[0].x - 12.104).abs() < 1e-9);
    }

    #[test]
    fn run_writes_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdb");
        let output = dir.path().join("atoms.csv");
        fs::write(&input, TWO_MODELS).unwrap();

        run(
            AtomsArgs {
                input,
                output: output.clone(),
                model: Some(1),
                parse: ParseOptions::default(),
            },
            None,
        )
        .unwrap();

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "model");
        assert_eq!(&headers[2], "serial");
        assert_eq!(reader.records().count(), 2);
    }

    #[test]
    fn unknown_model_is_an_argument_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdb");
        fs::write(&input, TWO_MODELS).unwrap();

        let result = run(
            AtomsArgs {
                input,
                output: dir.path().join("atoms.csv"),
                model: Some(9),
                parse: ParseOptions::default(),
            },
            None,
        );
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
