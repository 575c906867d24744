use super::model::Model;
use super::topology::Connection;
use crate::core::diagnostics::Anomaly;
use crate::core::io::annotations::{EntryLink, Journal, Revision};
use crate::core::io::records::{Compound, Crystal};
use crate::core::io::transforms::Transforms;
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Longest classification that fits in HEADER columns 11-50.
pub const MAX_CLASSIFICATION_LEN: usize = 40;
/// Length of a PDB identifier code.
pub const CODE_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum HeaderError {
    #[error("Classification is {len} characters long (maximum {MAX_CLASSIFICATION_LEN})")]
    ClassificationTooLong { len: usize },
    #[error("PDB code '{0}' must be exactly {CODE_LEN} characters")]
    InvalidCode(String),
    #[error("Related entry code '{0}' must be exactly {CODE_LEN} characters")]
    InvalidRelatedCode(String),
    #[error("Model count must be positive, got {0}")]
    InvalidModelCount(i32),
}

/// File-level metadata: everything before the coordinate section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    classification: Option<String>,
    deposition_date: Option<NaiveDate>,
    code: Option<String>,
    obsolete: Option<EntryLink>,
    title: Option<String>,
    split_codes: Vec<String>,
    caveat: Option<String>,
    keywords: Vec<String>,
    experimental_techniques: Vec<String>,
    model_count: Option<i32>,
    model_annotations: Vec<String>,
    authors: Vec<String>,
    revisions: Vec<Revision>,
    supersedes: Option<EntryLink>,
    journal: Option<Journal>,
    compounds: Vec<Compound>,
    crystal: Option<Crystal>,
    transforms: Transforms,
}

impl Header {
    pub fn builder() -> HeaderBuilder {
        HeaderBuilder::default()
    }

    pub fn classification(&self) -> Option<&str> {
        self.classification.as_deref()
    }

    pub fn deposition_date(&self) -> Option<NaiveDate> {
        self.deposition_date
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn experimental_techniques(&self) -> &[String] {
        &self.experimental_techniques
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    pub fn crystal(&self) -> Option<&Crystal> {
        self.crystal.as_ref()
    }

    /// True when an OBSLTE record withdrew this entry.
    pub fn is_obsolete(&self) -> bool {
        self.obsolete.is_some()
    }

    pub fn obsolete(&self) -> Option<&EntryLink> {
        self.obsolete.as_ref()
    }

    pub fn split_codes(&self) -> &[String] {
        &self.split_codes
    }

    pub fn caveat(&self) -> Option<&str> {
        self.caveat.as_deref()
    }

    /// Model count declared by NUMMDL, if any.
    pub fn model_count(&self) -> Option<i32> {
        self.model_count
    }

    pub fn model_annotations(&self) -> &[String] {
        &self.model_annotations
    }

    /// Modification history, in file order (newest first in well-formed files).
    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    pub fn supersedes(&self) -> Option<&EntryLink> {
        self.supersedes.as_ref()
    }

    pub fn journal(&self) -> Option<&Journal> {
        self.journal.as_ref()
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    fn related_codes(&self) -> impl Iterator<Item = &String> {
        self.obsolete
            .iter()
            .chain(&self.supersedes)
            .flat_map(|link| &link.codes)
            .chain(&self.split_codes)
    }
}

/// Builds a validated [`Header`].
///
/// Only the classification and code are constrained; every other field is
/// accepted as given.
#[derive(Default)]
pub struct HeaderBuilder {
    header: Header,
}

impl HeaderBuilder {
    pub fn classification(mut self, classification: impl Into<String>) -> Self {
        self.header.classification = Some(classification.into());
        self
    }
    pub fn deposition_date(mut self, date: NaiveDate) -> Self {
        self.header.deposition_date = Some(date);
        self
    }
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.header.code = Some(code.into());
        self
    }
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.header.title = Some(title.into());
        self
    }
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.header.keywords = keywords;
        self
    }
    pub fn experimental_techniques(mut self, techniques: Vec<String>) -> Self {
        self.header.experimental_techniques = techniques;
        self
    }
    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.header.authors = authors;
        self
    }
    pub fn compounds(mut self, compounds: Vec<Compound>) -> Self {
        self.header.compounds = compounds;
        self
    }
    pub fn crystal(mut self, crystal: Crystal) -> Self {
        self.header.crystal = Some(crystal);
        self
    }
    pub fn obsolete(mut self, link: EntryLink) -> Self {
        self.header.obsolete = Some(link);
        self
    }
    pub fn split_codes(mut self, codes: Vec<String>) -> Self {
        self.header.split_codes = codes;
        self
    }
    pub fn caveat(mut self, caveat: impl Into<String>) -> Self {
        self.header.caveat = Some(caveat.into());
        self
    }
    pub fn model_count(mut self, count: i32) -> Self {
        self.header.model_count = Some(count);
        self
    }
    pub fn model_annotations(mut self, annotations: Vec<String>) -> Self {
        self.header.model_annotations = annotations;
        self
    }
    pub fn revisions(mut self, revisions: Vec<Revision>) -> Self {
        self.header.revisions = revisions;
        self
    }
    pub fn supersedes(mut self, link: EntryLink) -> Self {
        self.header.supersedes = Some(link);
        self
    }
    pub fn journal(mut self, journal: Journal) -> Self {
        self.header.journal = Some(journal);
        self
    }
    pub fn transforms(mut self, transforms: Transforms) -> Self {
        self.header.transforms = transforms;
        self
    }

    fn check(&self) -> Result<(), HeaderError> {
        let header = &self.header;
        if let Some(classification) = &header.classification {
            let len = classification.chars().count();
            if len > MAX_CLASSIFICATION_LEN {
                return Err(HeaderError::ClassificationTooLong { len });
            }
        }
        if let Some(code) = &header.code {
            if code.chars().count() != CODE_LEN {
                return Err(HeaderError::InvalidCode(code.clone()));
            }
        }
        if let Some(code) = header.related_codes().find(|c| c.chars().count() != CODE_LEN) {
            return Err(HeaderError::InvalidRelatedCode(code.clone()));
        }
        match header.model_count {
            Some(count) if count < 1 => Err(HeaderError::InvalidModelCount(count)),
            _ => Ok(()),
        }
    }

    /// Removes the value that `error` was raised for.
    fn drop_invalid(&mut self, error: &HeaderError) {
        let header = &mut self.header;
        match error {
            HeaderError::ClassificationTooLong { .. } => header.classification = None,
            HeaderError::InvalidCode(_) => header.code = None,
            HeaderError::InvalidRelatedCode(bad) => {
                for link in header.obsolete.iter_mut().chain(header.supersedes.iter_mut()) {
                    link.codes.retain(|c| c != bad);
                }
                header.split_codes.retain(|c| c != bad);
            }
            HeaderError::InvalidModelCount(_) => header.model_count = None,
        }
    }

    /// Validates and returns the header.
    ///
    /// # Errors
    ///
    /// Returns the first [`HeaderError`] found: a classification over
    /// [`MAX_CLASSIFICATION_LEN`] characters, an entry or related code that is
    /// not exactly [`CODE_LEN`] characters, or a model count below one.
    pub fn build(self) -> Result<Header, HeaderError> {
        self.check()?;
        Ok(self.header)
    }

    /// Like [`HeaderBuilder::build`], but drops each invalid value and keeps going.
    ///
    /// Returns the header and the errors for every dropped value, in the order
    /// they were found.
    pub fn build_lossy(mut self) -> (Header, Vec<HeaderError>) {
        let mut errors = Vec::new();
        while let Err(error) = self.check() {
            self.drop_invalid(&error);
            errors.push(error);
        }
        (self.header, errors)
    }
}

/// A fully assembled PDB file.
///
/// Immutable once built: the header, the models in file order, the merged bond
/// table and every data-quality finding from the parse.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdbDocument {
    header: Header,
    models: Vec<Model>,
    connections: Vec<Connection>,
    anomalies: Vec<Anomaly>,
}

impl PdbDocument {
    pub(crate) fn new(
        header: Header,
        models: Vec<Model>,
        connections: Vec<Connection>,
        anomalies: Vec<Anomaly>,
    ) -> Self {
        Self {
            header,
            models,
            connections,
            anomalies,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// The first model, which is the one most callers want.
    pub fn model(&self) -> Option<&Model> {
        self.models.first()
    }

    pub fn model_by_id(&self, model_id: i32) -> Option<&Model> {
        self.models.iter().find(|m| m.model_id == model_id)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// The bond table entry whose source is `atom_id`.
    pub fn connection(&self, atom_id: i32) -> Option<&Connection> {
        self.connections.iter().find(|c| c.atom == atom_id)
    }

    /// Serials bonded to `atom_id` in either direction, without duplicates.
    ///
    /// Partners listed on the atom's own CONECT entry come first, followed by
    /// atoms whose entries reference it.
    pub fn bonded_atoms(&self, atom_id: i32) -> Vec<i32> {
        let mut bonded: Vec<i32> = Vec::new();
        let declared = self.connection(atom_id).into_iter().flat_map(|c| c.bond_to.iter().copied());
        let referencing = self
            .connections
            .iter()
            .filter(|c| c.is_bonded_to(atom_id))
            .map(|c| c.atom);
        for serial in declared.chain(referencing) {
            if serial != atom_id && !bonded.contains(&serial) {
                bonded.push(serial);
            }
        }
        bonded
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }
}

impl fmt::Display for PdbDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Pdb ({})>", self.header.code().unwrap_or("????"))
    }
}
