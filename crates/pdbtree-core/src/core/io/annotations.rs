//! Title-section records that describe the entry rather than its contents.
//!
//! OBSLTE and SPRSDE link the entry to other PDB codes, SPLIT lists the entries a
//! large structure was divided into, CAVEAT, NUMMDL and MDLTYP annotate the
//! coordinates, REVDAT carries the modification history and JRNL the primary
//! citation. Decoders follow the conventions of [`super::records`]: absent
//! columns are `None` or empty, malformed ones are reported and defaulted.

use super::lines::{columns, merge_records, Record};
use super::records::{FieldError, FieldReader, format_pdb_date, split_list};
use chrono::NaiveDate;
use serde::Serialize;

/// Columns of the related-entry codes on OBSLTE and SPRSDE lines.
const LINK_CODE_COLUMNS: [(usize, usize); 8] = [
    (32, 35),
    (37, 40),
    (42, 45),
    (47, 50),
    (52, 55),
    (57, 60),
    (62, 65),
    (67, 70),
];

/// Codes per SPLIT line, starting at column 12 and five columns apart.
const SPLIT_CODES_PER_LINE: usize = 14;

/// Record names per REVDAT line.
const REVDAT_RECORDS_PER_LINE: usize = 4;

/// Offset of the text after a JRNL sub-record tag and its continuation (column 20).
const JRNL_TEXT_OFFSET: usize = 19;

/// Width of the publication name on a JRNL REF line (columns 20-47).
const PUBLICATION_WIDTH: usize = 28;

/// Offset of the CAVEAT comment (column 20).
const CAVEAT_TEXT_OFFSET: usize = 19;

/// Offset of the MDLTYP text (column 11).
const MDLTYP_TEXT_OFFSET: usize = 10;

/// Another entry this one is linked to by OBSLTE or SPRSDE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryLink {
    /// Date the link took effect.
    pub date: Option<NaiveDate>,
    /// The code of this entry as printed on the record.
    pub code: Option<String>,
    /// Replacement codes for OBSLTE, superseded codes for SPRSDE.
    pub codes: Vec<String>,
}

/// Decodes an OBSLTE or SPRSDE record group.
///
/// The date (12-20) and code (22-25) come from the first line; related codes
/// are collected from every line. Returns `None` when no line is present.
pub fn decode_entry_link(records: &[Record<'_>]) -> (Option<EntryLink>, Vec<FieldError>) {
    let Some(first) = records.first() else {
        return (None, Vec::new());
    };
    let mut reader = FieldReader::new(first.line());
    let date = reader.date(12, 20);
    let code = reader.text(22, 25);
    let codes = records
        .iter()
        .flat_map(|record| {
            LINK_CODE_COLUMNS
                .iter()
                .map(move |&(start, end)| columns(record.line(), start, end))
        })
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect();
    (Some(EntryLink { date, code, codes }), reader.finish())
}

pub fn encode_entry_link(keyword: &str, link: &EntryLink) -> Vec<String> {
    let chunks: Vec<&[String]> = if link.codes.is_empty() {
        vec![link.codes.as_slice()]
    } else {
        link.codes.chunks(LINK_CODE_COLUMNS.len()).collect()
    };
    chunks
        .iter()
        .enumerate()
        .map(|(idx, codes)| {
            let continuation = match idx {
                0 => "  ".to_string(),
                n => format!("{:>2}", n + 1),
            };
            let line = format!(
                "{:<6}  {} {:<9} {:<4}      {}",
                keyword,
                continuation,
                link.date.map(format_pdb_date).unwrap_or_default(),
                link.code.as_deref().unwrap_or(""),
                codes.iter().map(|c| format!("{:<4}", c)).collect::<Vec<_>>().join(" "),
            );
            line.trim_end().to_string()
        })
        .collect()
}

/// Collects the entry codes listed on SPLIT lines.
pub fn decode_split_codes(records: &[Record<'_>]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| {
            (0..SPLIT_CODES_PER_LINE).map(move |slot| {
                let start = 12 + slot * 5;
                columns(record.line(), start, start + 3)
            })
        })
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn encode_split_codes(codes: &[String]) -> Vec<String> {
    codes
        .chunks(SPLIT_CODES_PER_LINE)
        .enumerate()
        .map(|(idx, chunk)| {
            let continuation = match idx {
                0 => "  ".to_string(),
                n => format!("{:>2}", n + 1),
            };
            let codes: Vec<String> = chunk.iter().map(|c| format!("{:<4}", c)).collect();
            format!("SPLIT   {} {}", continuation, codes.join(" "))
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Joins the CAVEAT comment text; the entry code in columns 12-15 is dropped.
pub fn decode_caveat(records: &[Record<'_>]) -> Option<String> {
    let text = merge_records(records, CAVEAT_TEXT_OFFSET, " ");
    (!text.is_empty()).then_some(text)
}

/// Decodes the declared model count from NUMMDL columns 11-14.
pub fn decode_model_count(line: &str) -> (Option<i32>, Vec<FieldError>) {
    let mut reader = FieldReader::new(line);
    let count = reader.int(11, 14);
    (count, reader.finish())
}

/// Splits the merged MDLTYP text into its `;`-separated annotations.
pub fn decode_model_annotations(records: &[Record<'_>]) -> Vec<String> {
    split_list(&merge_records(records, MDLTYP_TEXT_OFFSET, " "), ';')
}

/// One modification of the entry, from a REVDAT record group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Revision {
    /// Modification number from columns 8-10.
    pub number: Option<i32>,
    pub date: Option<NaiveDate>,
    /// Identifier of the modification, usually the entry code.
    pub code: Option<String>,
    /// Modification type: 0 for the initial release, 1 for later changes.
    pub kind: Option<i32>,
    /// Names of the records that changed.
    pub records: Vec<String>,
}

fn revdat_records(line: &str) -> impl Iterator<Item = String> + '_ {
    (0..REVDAT_RECORDS_PER_LINE)
        .map(move |slot| {
            let start = 40 + slot * 7;
            columns(line, start, start + 5)
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Decodes REVDAT lines into revisions, in file order.
///
/// Consecutive lines with the same modification number are one revision: the
/// first line supplies the date, code and type, every line adds record names.
pub fn decode_revisions(records: &[Record<'_>]) -> (Vec<Revision>, Vec<FieldError>) {
    let mut revisions: Vec<Revision> = Vec::new();
    let mut errors = Vec::new();

    for record in records {
        let line = record.line();
        let mut reader = FieldReader::new(line);
        let number = reader.int(8, 10);
        let continued = reader.raw(11, 12).parse::<u32>().is_ok_and(|n| n > 1);

        match revisions.last_mut() {
            Some(last) if continued && last.number == number => {
                last.records.extend(revdat_records(line));
            }
            _ => {
                revisions.push(Revision {
                    number,
                    date: reader.date(14, 22),
                    code: reader.text(24, 27),
                    kind: reader.int(32, 32),
                    records: revdat_records(line).collect(),
                });
            }
        }
        errors.extend(reader.finish());
    }
    (revisions, errors)
}

pub fn encode_revisions(revisions: &[Revision]) -> Vec<String> {
    let mut lines = Vec::new();
    for revision in revisions {
        let number = revision.number.map(|n| n.to_string()).unwrap_or_default();
        let chunks: Vec<&[String]> = if revision.records.is_empty() {
            vec![revision.records.as_slice()]
        } else {
            revision.records.chunks(REVDAT_RECORDS_PER_LINE).collect()
        };
        for (idx, names) in chunks.iter().enumerate() {
            let names: Vec<String> = names.iter().map(|n| format!("{:<6}", n)).collect();
            let line = if idx == 0 {
                format!(
                    "REVDAT {:>3}   {:<9} {:<4}    {:1}       {}",
                    number,
                    revision.date.map(format_pdb_date).unwrap_or_default(),
                    revision.code.as_deref().unwrap_or(""),
                    revision.kind.map(|k| k.to_string()).unwrap_or_default(),
                    names.join(" "),
                )
            } else {
                format!("REVDAT {:>3}{:>2}{:27}{}", number, idx + 1, "", names.join(" "))
            };
            lines.push(line.trim_end().to_string());
        }
    }
    lines
}

/// Publication fields of the JRNL REF sub-record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JournalReference {
    /// Journal name, or `TO BE PUBLISHED`.
    pub publication: String,
    pub volume: Option<String>,
    pub page: Option<String>,
    pub year: Option<i32>,
}

/// The primary citation of the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Journal {
    pub authors: Vec<String>,
    pub title: Option<String>,
    pub editors: Vec<String>,
    pub reference: Option<JournalReference>,
    pub publisher: Option<String>,
    /// Raw REFN text, e.g. `ISSN 0027-8424`.
    pub refn: Option<String>,
    pub pubmed_id: Option<i64>,
    pub doi: Option<String>,
}

fn jrnl_text(records: &[Record<'_>], tag: &str) -> Option<String> {
    let lines: Vec<Record<'_>> = records
        .iter()
        .filter(|record| columns(record.line(), 13, 16) == tag)
        .copied()
        .collect();
    let text = merge_records(&lines, JRNL_TEXT_OFFSET, " ");
    (!text.is_empty()).then_some(text)
}

/// Decodes the JRNL sub-records into a [`Journal`].
///
/// Returns `None` without any JRNL line. Sub-records are matched on columns
/// 13-16 and their continuation lines joined with a space.
pub fn decode_journal(records: &[Record<'_>]) -> (Option<Journal>, Vec<FieldError>) {
    if records.is_empty() {
        return (None, Vec::new());
    }
    let mut errors = Vec::new();

    let reference = records
        .iter()
        .filter(|record| columns(record.line(), 13, 16) == "REF")
        .fold(None::<JournalReference>, |acc, record| {
            let mut reader = FieldReader::new(record.line());
            let name = reader.raw(20, 47);
            let reference = match acc {
                Some(mut reference) => {
                    if !name.is_empty() {
                        reference.publication.push(' ');
                        reference.publication.push_str(name);
                    }
                    reference
                }
                None => JournalReference {
                    publication: name.to_string(),
                    volume: reader.text(52, 55),
                    page: reader.text(57, 61),
                    year: reader.int(63, 66),
                },
            };
            errors.extend(reader.finish());
            Some(reference)
        });

    let pubmed_id = jrnl_text(records, "PMID").and_then(|text| {
        text.parse()
            .map_err(|_| {
                errors.push(FieldError::InvalidInt {
                    columns: "20-79".into(),
                    value: text.clone(),
                })
            })
            .ok()
    });

    let journal = Journal {
        authors: jrnl_text(records, "AUTH").map_or_else(Vec::new, |t| split_list(&t, ',')),
        title: jrnl_text(records, "TITL"),
        editors: jrnl_text(records, "EDIT").map_or_else(Vec::new, |t| split_list(&t, ',')),
        reference,
        publisher: jrnl_text(records, "PUBL"),
        refn: jrnl_text(records, "REFN"),
        pubmed_id,
        doi: jrnl_text(records, "DOI"),
    };
    (Some(journal), errors)
}

fn jrnl_lines(tag: &str, chunks: &[String]) -> Vec<String> {
    chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| match idx {
            0 => format!("JRNL        {:<4}   {}", tag, chunk),
            n => format!("JRNL        {:<4}{:>2} {}", tag, n + 1, chunk),
        })
        .collect()
}

/// Encodes a [`Journal`]; `wrap` packs text into lines of at most the given width.
pub fn encode_journal(journal: &Journal, wrap: impl Fn(&str, usize) -> Vec<String>) -> Vec<String> {
    const WIDTH: usize = 59;
    let mut lines = Vec::new();
    if !journal.authors.is_empty() {
        lines.extend(jrnl_lines("AUTH", &wrap(&journal.authors.join(","), WIDTH)));
    }
    if let Some(title) = &journal.title {
        lines.extend(jrnl_lines("TITL", &wrap(title, WIDTH)));
    }
    if !journal.editors.is_empty() {
        lines.extend(jrnl_lines("EDIT", &wrap(&journal.editors.join(","), WIDTH)));
    }
    if let Some(reference) = &journal.reference {
        let names = wrap(&reference.publication, PUBLICATION_WIDTH);
        let line = format!(
            "JRNL        REF    {:<28}    {:>4} {:>5} {:>4}",
            names.first().map_or("", String::as_str),
            reference.volume.as_deref().unwrap_or(""),
            reference.page.as_deref().unwrap_or(""),
            reference.year.map(|y| y.to_string()).unwrap_or_default(),
        );
        lines.push(line.trim_end().to_string());
        lines.extend(
            names
                .iter()
                .enumerate()
                .skip(1)
                .map(|(idx, name)| format!("JRNL        REF {:>2} {}", idx + 1, name)),
        );
    }
    if let Some(publisher) = &journal.publisher {
        lines.extend(jrnl_lines("PUBL", &wrap(publisher, WIDTH)));
    }
    for (tag, value) in [
        ("REFN", journal.refn.clone()),
        ("PMID", journal.pubmed_id.map(|id| id.to_string())),
        ("DOI", journal.doi.clone()),
    ] {
        if let Some(value) = value {
            lines.push(format!("JRNL        {:<4}   {}", tag, value));
        }
    }
    lines
}
