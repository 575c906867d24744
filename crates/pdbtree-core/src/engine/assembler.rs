use crate::core::diagnostics::Anomaly;
use crate::core::io::dict::{ModelDict, PdbDict};
use crate::core::io::records::Compound;
use crate::core::models::atom::AtomKind;
use crate::core::models::chain::Chain;
use crate::core::models::complex::Complex;
use crate::core::models::document::{Header, PdbDocument};
use crate::core::models::model::Model;
use crate::core::models::residue::Residue;
use tracing::{debug, warn};

/// Turns a filled [`PdbDict`] into an immutable [`PdbDocument`].
///
/// Total over every dict the extractors can produce: header values that fail
/// validation are dropped and recorded as anomalies instead of failing the parse.
pub fn assemble(dict: PdbDict) -> PdbDocument {
    let PdbDict {
        classification,
        deposition_date,
        code,
        obsolete,
        title,
        split_codes,
        caveat,
        compounds,
        keywords,
        experimental_techniques,
        model_count,
        model_annotations,
        authors,
        revisions,
        supersedes,
        journal,
        crystal,
        transforms,
        models,
        connections,
        mut anomalies,
    } = dict;

    let models: Vec<Model> = models
        .iter()
        .map(|model| build_model(model, &compounds))
        .collect();

    let mut builder = Header::builder()
        .split_codes(split_codes)
        .keywords(keywords)
        .experimental_techniques(experimental_techniques)
        .model_annotations(model_annotations)
        .authors(authors)
        .revisions(revisions)
        .compounds(compounds)
        .transforms(transforms);
    if let Some(classification) = classification {
        builder = builder.classification(classification);
    }
    if let Some(date) = deposition_date {
        builder = builder.deposition_date(date);
    }
    if let Some(code) = code {
        builder = builder.code(code);
    }
    if let Some(link) = obsolete {
        builder = builder.obsolete(link);
    }
    if let Some(title) = title {
        builder = builder.title(title);
    }
    if let Some(caveat) = caveat {
        builder = builder.caveat(caveat);
    }
    if let Some(count) = model_count {
        builder = builder.model_count(count);
    }
    if let Some(link) = supersedes {
        builder = builder.supersedes(link);
    }
    if let Some(journal) = journal {
        builder = builder.journal(journal);
    }
    if let Some(crystal) = crystal {
        builder = builder.crystal(crystal);
    }

    let (header, errors) = builder.build_lossy();
    for error in errors {
        warn!("Dropping header value: {}", error);
        anomalies.push(Anomaly::InvalidHeader {
            reason: error.to_string(),
        });
    }

    debug!(
        models = models.len(),
        connections = connections.len(),
        anomalies = anomalies.len(),
        "Assembled document"
    );
    PdbDocument::new(header, models, connections, anomalies)
}

fn build_model(dict: &ModelDict, compounds: &[Compound]) -> Model {
    let mut model = Model::new(dict.model_id);
    model.chains = dict.chains.iter().map(Chain::from_group).collect();
    model.molecules = dict
        .molecules
        .iter()
        .map(|m| Residue::from_group(m, AtomKind::Hetero))
        .collect();
    model.complexes = build_complexes(&model, compounds);
    model
}

/// Builds one complex per compound whose declared chains occur in `model`.
///
/// Complex ids are the 1-based position of the compound, so the same compound
/// has the same id in every model.
pub fn build_complexes(model: &Model, compounds: &[Compound]) -> Vec<Complex> {
    let present = model.chain_ids();
    compounds
        .iter()
        .enumerate()
        .filter_map(|(idx, compound)| {
            let members: Vec<String> = compound
                .chains
                .iter()
                .filter(|id| present.contains(&id.as_str()))
                .cloned()
                .collect();
            (!members.is_empty()).then(|| {
                Complex::new(
                    &(idx + 1).to_string(),
                    compound.molecule.as_deref().unwrap_or(""),
                    members,
                )
            })
        })
        .collect()
}
