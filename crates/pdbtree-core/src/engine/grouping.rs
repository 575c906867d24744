use crate::core::diagnostics::{Anomaly, GroupLevel};
use crate::core::io::dict::{ChainDict, ResidueDict};
use crate::core::io::records::AtomRecord;
use std::collections::HashSet;
use tracing::warn;

/// Splits `items` into maximal runs of adjacent items with equal keys.
///
/// Runs are emitted in input order and concatenating them reproduces the input.
/// A key that reappears after a different key starts a new run rather than
/// rejoining the earlier one.
pub fn group_adjacent<T, K, F>(items: &[T], key: F) -> Vec<Vec<T>>
where
    T: Clone,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut current: Option<K> = None;
    for item in items {
        let item_key = key(item);
        let continues_run = current.as_ref().is_some_and(|k| *k == item_key);
        match groups.last_mut() {
            Some(group) if continues_run => group.push(item.clone()),
            _ => {
                groups.push(vec![item.clone()]);
                current = Some(item_key);
            }
        }
    }
    groups
}

/// Keys that occur in more than one run, each reported once in order of the
/// run that revealed the split.
pub fn non_contiguous_keys<T, F>(items: &[T], key: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    let mut closed: HashSet<&str> = HashSet::new();
    let mut reported: Vec<String> = Vec::new();
    let mut current: Option<&str> = None;
    for item in items {
        let item_key = key(item);
        if current == Some(item_key) {
            continue;
        }
        if let Some(previous) = current {
            closed.insert(previous);
        }
        if closed.contains(item_key) && !reported.iter().any(|r| r == item_key) {
            reported.push(item_key.to_string());
        }
        current = Some(item_key);
    }
    reported
}

/// Groups atom records into residues (or small molecules) by full id.
///
/// Each group is named after its first atom's residue name.
pub fn atoms_to_residues(atoms: &[AtomRecord]) -> Vec<ResidueDict> {
    group_adjacent(atoms, |a| a.full_id.clone())
        .into_iter()
        .map(|atoms| ResidueDict {
            id: atoms[0].full_id.clone(),
            name: atoms[0].residue_name.clone().unwrap_or_default(),
            atoms,
        })
        .collect()
}

/// Groups atom records into chains by chain id, then each chain into residues.
pub fn atoms_to_chains(atoms: &[AtomRecord]) -> Vec<ChainDict> {
    group_adjacent(atoms, |a| a.chain_id.clone())
        .into_iter()
        .map(|run| ChainDict {
            chain_id: run[0].chain_id.clone(),
            residues: atoms_to_residues(&run),
        })
        .collect()
}

/// Scans one model's coordinate records for keys the grouper had to split.
///
/// Chains and residues are checked on the ATOM records, molecules on the HETATM
/// records. Every finding is logged and returned as an anomaly.
pub fn split_group_anomalies(
    model_id: i32,
    atoms: &[AtomRecord],
    hetatms: &[AtomRecord],
) -> Vec<Anomaly> {
    let checks = [
        (GroupLevel::Chain, non_contiguous_keys(atoms, |a| a.chain_id.as_str())),
        (GroupLevel::Residue, non_contiguous_keys(atoms, |a| a.full_id.as_str())),
        (GroupLevel::Molecule, non_contiguous_keys(hetatms, |a| a.full_id.as_str())),
    ];
    checks
        .into_iter()
        .flat_map(|(level, keys)| {
            keys.into_iter().map(move |key| {
                warn!(model_id, %level, key = key.as_str(), "Non-contiguous group split into siblings");
                Anomaly::NonContiguousGroup {
                    model_id,
                    level,
                    key,
                }
            })
        })
        .collect()
}
