use super::annotations::{
    decode_caveat, decode_entry_link, decode_journal, decode_model_annotations,
    decode_model_count, decode_revisions, decode_split_codes, encode_entry_link, encode_journal,
    encode_revisions, encode_split_codes,
};
use super::dict::{ModelDict, PdbDict};
use super::lines::{get_line, get_lines, merge_records, split_lines, Record};
use super::records::{
    atom_line_to_record, decode_compounds, decode_cryst1, decode_header_line,
    decode_model_serial, encode_connection, encode_cryst1, format_pdb_date, merge_connections,
    record_to_atom_line, split_list, AtomRecord, Compound, FieldError,
};
use super::traits::MolecularFile;
use super::transforms::{
    decode_matrix_row, decode_transform, encode_ncs_operator, encode_transform,
    group_ncs_operators, Transform, Transforms, ORIGX_RECORDS, SCALE_RECORDS,
};
use crate::core::diagnostics::Anomaly;
use crate::core::models::document::{Header, PdbDocument};
use crate::core::models::residue::Residue;
use crate::engine::assembler::assemble;
use crate::engine::error::PdbError;
use crate::engine::grouping::{atoms_to_chains, atoms_to_residues, split_group_anomalies};
use std::io::{BufRead, Write};
use tracing::warn;

/// Text columns available after the keyword and continuation counter.
const CONTINUATION_WIDTH: usize = 69;

/// Offset of the payload in header-section records (column 11).
const HEADER_TEXT_OFFSET: usize = 10;

/// Text columns of a CAVEAT comment (20-79).
const CAVEAT_WIDTH: usize = 60;

fn malformed(record: &'static str) -> impl Fn(FieldError) -> Anomaly {
    move |error| Anomaly::malformed(record, error)
}

fn merged_text(records: &[Record<'_>]) -> Option<String> {
    let text = merge_records(records, HEADER_TEXT_OFFSET, " ");
    (!text.is_empty()).then_some(text)
}

/// Fills the header fields of `dict` from the header-section records.
///
/// Records that are absent leave their fields empty. Malformed dates and
/// numbers are recorded on `dict.anomalies`.
pub fn extract_header<S: AsRef<str>>(dict: &mut PdbDict, lines: &[S]) {
    if let Some(record) = get_line("HEADER", lines) {
        let (header, errors) = decode_header_line(record.line());
        dict.classification = header.classification;
        dict.deposition_date = header.deposition_date;
        dict.code = header.code;
        dict.anomalies.extend(errors.into_iter().map(malformed("HEADER")));
    }

    let (obsolete, errors) = decode_entry_link(&get_lines("OBSLTE", lines));
    dict.obsolete = obsolete;
    dict.anomalies.extend(errors.into_iter().map(malformed("OBSLTE")));

    dict.title = merged_text(&get_lines("TITLE", lines));
    dict.split_codes = decode_split_codes(&get_lines("SPLIT", lines));
    dict.caveat = decode_caveat(&get_lines("CAVEAT", lines));
    dict.keywords = merged_text(&get_lines("KEYWDS", lines))
        .map_or_else(Vec::new, |text| split_list(&text, ','));
    dict.experimental_techniques = merged_text(&get_lines("EXPDTA", lines))
        .map_or_else(Vec::new, |text| split_list(&text, ';'));
    dict.authors = merged_text(&get_lines("AUTHOR", lines))
        .map_or_else(Vec::new, |text| split_list(&text, ','));

    let (compounds, errors) = decode_compounds(&get_lines("COMPND", lines));
    dict.compounds = compounds;
    dict.anomalies.extend(errors.into_iter().map(malformed("COMPND")));

    if let Some(record) = get_line("NUMMDL", lines) {
        let (count, errors) = decode_model_count(record.line());
        dict.model_count = count;
        dict.anomalies.extend(errors.into_iter().map(malformed("NUMMDL")));
    }
    dict.model_annotations = decode_model_annotations(&get_lines("MDLTYP", lines));

    let (revisions, errors) = decode_revisions(&get_lines("REVDAT", lines));
    dict.revisions = revisions;
    dict.anomalies.extend(errors.into_iter().map(malformed("REVDAT")));

    let (supersedes, errors) = decode_entry_link(&get_lines("SPRSDE", lines));
    dict.supersedes = supersedes;
    dict.anomalies.extend(errors.into_iter().map(malformed("SPRSDE")));

    let (journal, errors) = decode_journal(&get_lines("JRNL", lines));
    dict.journal = journal;
    dict.anomalies.extend(errors.into_iter().map(malformed("JRNL")));

    if let Some(record) = get_line("CRYST1", lines) {
        let (crystal, errors) = decode_cryst1(record.line());
        dict.crystal = Some(crystal);
        dict.anomalies.extend(errors.into_iter().map(malformed("CRYST1")));
    }

    dict.transforms = extract_transforms(lines, &mut dict.anomalies);
}

fn incomplete(record: String, rows: usize) -> Anomaly {
    warn!(record = %record, rows, "Ignoring incomplete transformation matrix");
    Anomaly::IncompleteTransform { record, rows }
}

/// Decodes a three-line matrix record; a partial one is reported and dropped.
fn extract_transform<S: AsRef<str>>(
    record: &'static str,
    keywords: [&'static str; 3],
    lines: &[S],
    anomalies: &mut Vec<Anomaly>,
) -> Option<Transform> {
    let rows: Vec<&str> = keywords
        .iter()
        .filter_map(|&keyword| get_line(keyword, lines))
        .map(|found| found.line())
        .collect();
    match rows[..] {
        [] => None,
        [first, second, third] => {
            let (transform, errors) = decode_transform([first, second, third]);
            anomalies.extend(errors.into_iter().map(malformed(record)));
            Some(transform)
        }
        _ => {
            anomalies.push(incomplete(record.to_string(), rows.len()));
            None
        }
    }
}

fn extract_transforms<S: AsRef<str>>(lines: &[S], anomalies: &mut Vec<Anomaly>) -> Transforms {
    let origx = extract_transform("ORIGX", ORIGX_RECORDS, lines, anomalies);
    let scale = extract_transform("SCALE", SCALE_RECORDS, lines, anomalies);

    let mut rows = Vec::new();
    for found in get_lines("MTRIX", lines) {
        if let Some((row, errors)) = decode_matrix_row(found.line()) {
            anomalies.extend(errors.into_iter().map(malformed("MTRIX")));
            rows.push(row);
        }
    }
    let (ncs, partial) = group_ncs_operators(&rows);
    for (serial, found) in partial {
        anomalies.push(incomplete(format!("MTRIX {}", serial), found));
    }

    Transforms { origx, scale, ncs }
}

fn is_coordinate_line(line: &str) -> bool {
    line.starts_with("ATOM") || line.starts_with("HETATM")
}

fn decode_atoms<S: AsRef<str>>(
    keyword: &'static str,
    lines: &[S],
    anomalies: &mut Vec<Anomaly>,
) -> Vec<AtomRecord> {
    lines
        .iter()
        .map(|line| {
            let (record, errors) = atom_line_to_record(line.as_ref());
            anomalies.extend(errors.into_iter().map(malformed(keyword)));
            record
        })
        .collect()
}

/// Decodes and groups the coordinate records of one model.
///
/// ATOM records become chains of residues and HETATM records become small
/// molecules. Returned anomalies cover malformed fields and split groups.
pub fn lines_to_model<S: AsRef<str>>(
    model_id: i32,
    atom_lines: &[S],
    hetatm_lines: &[S],
) -> (ModelDict, Vec<Anomaly>) {
    let mut anomalies = Vec::new();
    let atoms = decode_atoms("ATOM", atom_lines, &mut anomalies);
    let hetatms = decode_atoms("HETATM", hetatm_lines, &mut anomalies);
    anomalies.extend(split_group_anomalies(model_id, &atoms, &hetatms));

    let model = ModelDict {
        model_id,
        molecules: atoms_to_residues(&hetatms),
        chains: atoms_to_chains(&atoms),
    };
    (model, anomalies)
}

fn push_model(dict: &mut PdbDict, model_id: i32, block: &[&str]) {
    let atom_lines: Vec<&str> = get_lines("ATOM", block).iter().map(Record::line).collect();
    let hetatm_lines: Vec<&str> = get_lines("HETATM", block).iter().map(Record::line).collect();
    let (model, anomalies) = lines_to_model(model_id, &atom_lines, &hetatm_lines);
    dict.models.push(model);
    dict.anomalies.extend(anomalies);
}

/// Fills the models and bond table of `dict` from the coordinate section.
///
/// MODEL records split the lines into blocks; without any MODEL record the
/// whole file is one model with id 1. Coordinate records before the first
/// MODEL record belong to no model and are reported, not kept. A model count
/// already read by [`extract_header`] is checked against the models found.
pub fn extract_structure<S: AsRef<str>>(dict: &mut PdbDict, lines: &[S]) {
    let lines: Vec<&str> = lines.iter().map(<S as AsRef<str>>::as_ref).collect();
    let model_starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.starts_with("MODEL"))
        .map(|(idx, _)| idx)
        .collect();

    match model_starts.first() {
        None => push_model(dict, 1, &lines),
        Some(&first) => {
            let orphans = lines[..first].iter().filter(|l| is_coordinate_line(l)).count();
            if orphans > 0 {
                warn!(count = orphans, "Coordinate records found before the first MODEL record");
                dict.anomalies.push(Anomaly::OrphanRecords { count: orphans });
            }
            for (idx, &start) in model_starts.iter().enumerate() {
                let end = model_starts.get(idx + 1).copied().unwrap_or(lines.len());
                let (serial, errors) = decode_model_serial(lines[start]);
                dict.anomalies.extend(errors.into_iter().map(malformed("MODEL")));
                let model_id = serial.unwrap_or(idx as i32 + 1);
                push_model(dict, model_id, &lines[start + 1..end]);
            }
        }
    }

    let conect_lines: Vec<&str> = get_lines("CONECT", &lines)
        .iter()
        .map(Record::line)
        .collect();
    let (connections, errors) = merge_connections(&conect_lines);
    dict.connections = connections;
    dict.anomalies.extend(errors.into_iter().map(malformed("CONECT")));

    if let Some(declared) = dict.model_count {
        let found = dict.models.len();
        if usize::try_from(declared).ok() != Some(found) {
            warn!(declared, found, "NUMMDL disagrees with the MODEL records");
            dict.anomalies.push(Anomaly::ModelCountMismatch { declared, found });
        }
    }
}

/// Parses PDB text into its intermediate dict representation.
pub fn pdb_string_to_dict(text: &str) -> PdbDict {
    let lines = split_lines(text);
    let mut dict = PdbDict::default();
    extract_header(&mut dict, &lines);
    extract_structure(&mut dict, &lines);
    dict
}

/// Greedily packs words into chunks of at most `width` characters.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Lays chunks out as a record and its numbered continuation lines.
fn continuation_records(keyword: &str, chunks: &[String]) -> Vec<String> {
    chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| match idx {
            0 => format!("{:<6}    {}", keyword, chunk),
            n => format!("{:<6}  {:>2} {}", keyword, n + 1, chunk),
        })
        .collect()
}

fn compound_chunks(compounds: &[Compound]) -> Vec<String> {
    let mut tokens = Vec::new();
    for compound in compounds {
        if let Some(mol_id) = compound.mol_id {
            tokens.push(format!("MOL_ID: {};", mol_id));
        }
        if let Some(molecule) = &compound.molecule {
            tokens.push(format!("MOLECULE: {};", molecule));
        }
        if !compound.chains.is_empty() {
            tokens.push(format!("CHAIN: {};", compound.chains.join(", ")));
        }
        for (key, value) in &compound.properties {
            tokens.push(format!("{}: {};", key, value));
        }
    }
    tokens
        .iter()
        .flat_map(|token| wrap_words(token, CONTINUATION_WIDTH))
        .collect()
}

fn header_records(header: &Header) -> Vec<String> {
    let mut records = Vec::new();
    if header.classification().is_some()
        || header.deposition_date().is_some()
        || header.code().is_some()
    {
        let line = format!(
            "HEADER    {:<40}{:<9}   {}",
            header.classification().unwrap_or(""),
            header.deposition_date().map(format_pdb_date).unwrap_or_default(),
            header.code().unwrap_or(""),
        );
        records.push(line.trim_end().to_string());
    }
    if let Some(link) = header.obsolete() {
        records.extend(encode_entry_link("OBSLTE", link));
    }
    if let Some(title) = header.title() {
        records.extend(continuation_records("TITLE", &wrap_words(title, CONTINUATION_WIDTH)));
    }
    records.extend(encode_split_codes(header.split_codes()));
    if let Some(caveat) = header.caveat() {
        let code = header.code().unwrap_or("");
        let chunks = wrap_words(caveat, CAVEAT_WIDTH);
        records.extend(chunks.iter().enumerate().map(|(idx, chunk)| match idx {
            0 => format!("CAVEAT     {:<4}    {}", code, chunk),
            n => format!("CAVEAT  {:>2} {:<4}    {}", n + 1, code, chunk),
        }));
    }
    records.extend(continuation_records("COMPND", &compound_chunks(header.compounds())));
    let lists = [
        ("KEYWDS", header.keywords().join(", ")),
        ("EXPDTA", header.experimental_techniques().join("; ")),
    ];
    for (keyword, text) in lists {
        records.extend(continuation_records(keyword, &wrap_words(&text, CONTINUATION_WIDTH)));
    }
    if let Some(count) = header.model_count() {
        records.push(format!("NUMMDL    {:<4}", count).trim_end().to_string());
    }
    let annotations = header.model_annotations().join("; ");
    records.extend(continuation_records("MDLTYP", &wrap_words(&annotations, CONTINUATION_WIDTH)));
    let authors = header.authors().join(",");
    records.extend(continuation_records("AUTHOR", &wrap_words(&authors, CONTINUATION_WIDTH)));
    records.extend(encode_revisions(header.revisions()));
    if let Some(link) = header.supersedes() {
        records.extend(encode_entry_link("SPRSDE", link));
    }
    if let Some(journal) = header.journal() {
        records.extend(encode_journal(journal, wrap_words));
    }
    if let Some(crystal) = header.crystal() {
        records.push(encode_cryst1(crystal).trim_end().to_string());
    }
    let transforms = header.transforms();
    if let Some(origx) = &transforms.origx {
        records.extend(encode_transform(ORIGX_RECORDS, origx));
    }
    if let Some(scale) = &transforms.scale {
        records.extend(encode_transform(SCALE_RECORDS, scale));
    }
    for operator in &transforms.ncs {
        records.extend(encode_ncs_operator(operator));
    }
    records
}

fn write_residue(writer: &mut impl Write, residue: &Residue) -> std::io::Result<()> {
    for atom in residue.atoms() {
        let record = atom.to_record(
            &residue.name,
            &residue.chain_id,
            residue.residue_number,
            &residue.insert_code,
        );
        writeln!(writer, "{}", record_to_atom_line(atom.kind.keyword(), &record))?;
    }
    Ok(())
}

/// Reader and writer for the PDB text format.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Document = PdbDocument;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Document, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes)?;
        Ok(assemble(pdb_string_to_dict(&text)))
    }

    fn write_to(document: &Self::Document, writer: &mut impl Write) -> Result<(), Self::Error> {
        for record in header_records(document.header()) {
            writeln!(writer, "{}", record)?;
        }

        let models = document.models();
        let framed = models.len() > 1 || models.iter().any(|m| m.model_id != 1);
        for model in models {
            if framed {
                writeln!(writer, "MODEL     {:>4}", model.model_id)?;
            }
            for residue in model.chains().iter().flat_map(|c| c.residues()) {
                write_residue(writer, residue)?;
            }
            for molecule in model.molecules() {
                write_residue(writer, molecule)?;
            }
            if framed {
                writeln!(writer, "ENDMDL")?;
            }
        }

        for connection in document.connections() {
            for line in encode_connection(connection) {
                writeln!(writer, "{}", line)?;
            }
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}
