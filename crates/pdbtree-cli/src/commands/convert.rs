use crate::cli::{ConvertArgs, OutputFormat};
use crate::config;
use crate::error::{CliError, Result};
use pdbtree::core::io::pdb::PdbFile;
use pdbtree::core::io::traits::MolecularFile;
use pdbtree::engine::config::ParseConfig;
use pdbtree::workflows::parse::{parse_path, parse_path_to_dict};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

pub fn run(args: ConvertArgs, config_path: Option<&Path>) -> Result<()> {
    let resolved = config::resolve(config_path, &args.parse, args.format)?;

    info!(
        "Converting {:?} to {:?} as {:?}",
        &args.input, &args.output, resolved.output_format
    );
    match resolved.output_format {
        OutputFormat::Pdb => write_pdb(&args.input, &args.output, &resolved.parse)?,
        OutputFormat::Json => write_json(&args.input, &args.output, &resolved.parse)?,
    }

    println!("✓ Written to: {}", args.output.display());
    Ok(())
}

fn write_pdb(input: &Path, output: &Path, config: &ParseConfig) -> Result<()> {
    let document = parse_path(input, config)?;
    PdbFile::write_to_path(&document, output).map_err(|source| CliError::FileWriting {
        path: output.to_path_buf(),
        source,
    })
}

fn write_json(input: &Path, output: &Path, config: &ParseConfig) -> Result<()> {
    let dict = parse_path_to_dict(input, config)?;
    let mut writer = BufWriter::new(File::create(output)?);
    serde_json::to_writer_pretty(&mut writer, &dict)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ParseOptions;
    use pdbtree::engine::error::PdbError;
    use std::fs;

    const PDB: &str = "\
HEADER    OXYGEN TRANSPORT                        21-AUG-17   1ABC
ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00  0.00           N
HETATM    2 FE   HEM A 201      15.000  15.000  15.000  1.00 10.00          FE2+
END
";

    fn args(dir: &Path, output: &str, format: Option<OutputFormat>) -> ConvertArgs {
        let input = dir.join("in.pdb");
        fs::write(&input, PDB).unwrap();
        ConvertArgs {
            input,
            output: dir.join(output),
            format,
            parse: ParseOptions::default(),
        }
    }

    #[test]
    fn converts_to_pdb_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), "out.pdb", None);
        let output = args.output.clone();
        run(args, None).unwrap();

        let written = fs::read_to_string(output).unwrap();
        assert!(written.starts_with("HEADER    OXYGEN TRANSPORT"));
        assert!(written
            .lines()
            .any(|l| l.starts_with("HETATM    2") && l.contains("HEM A 201")));
        assert!(written.trim_end().ends_with("END"));
    }

    #[test]
    fn converts_to_json_dict() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), "out.json", Some(OutputFormat::Json));
        let output = args.output.clone();
        run(args, None).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(value["code"], "1ABC");
        assert_eq!(value["models"][0]["model_id"], 1);
        assert_eq!(value["models"][0]["molecules"][0]["name"], "HEM");
        assert_eq!(value["models"][0]["molecules"][0]["atoms"][0]["charge"], 2);
    }

    #[test]
    fn config_file_selects_format() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("pdbtree.toml");
        fs::write(&config_path, "[output]\nformat = \"json\"\n").unwrap();
        let args = args(dir.path(), "out.txt", None);
        let output = args.output.clone();
        run(args, Some(&config_path)).unwrap();

        let written = fs::read_to_string(output).unwrap();
        assert!(written.trim_start().starts_with('{'));
    }

    #[test]
    fn write_failure_names_the_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), "out.pdb", None);
        args.output = dir.path().join("missing").join("out.pdb");
        let expected = args.output.clone();
        let err = run(args, None).unwrap_err();
        assert!(err.to_string().starts_with("Failed to write file"));
        match err {
            CliError::FileWriting { path, .. } => assert_eq!(path, expected),
            other => panic!("expected FileWriting, got {:?}", other),
        }
    }

    #[test]
    fn json_output_honours_the_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), "out.json", Some(OutputFormat::Json));
        args.parse.max_input_bytes = Some(16);
        let output = args.output.clone();
        assert!(matches!(
            run(args, None),
            Err(CliError::Pdb(PdbError::InputTooLarge { limit: 16, .. }))
        ));
        assert!(!output.exists());
    }
}
