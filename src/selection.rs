//! Catalog-level helpers: ordering halos by priority and translating between
//! catalog IDs and the index-based overlap table.

use crate::error::FinderError;
use crate::overlap::Relations;
use std::collections::HashMap;

/// Permutation that orders halos by descending mass. Ties keep catalog order
/// and NaN masses sort last.
pub fn priority_order(masses: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..masses.len()).collect();
    order.sort_by(|&a, &b| match (masses[a].is_nan(), masses[b].is_nan()) {
        (false, false) => masses[b].total_cmp(&masses[a]),
        (nan_a, nan_b) => nan_a.cmp(&nan_b),
    });
    order
}

/// Gathers `values[order[i]]` for every `i`.
pub fn permute<T: Copy>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| values[i]).collect()
}

/// Maps catalog IDs to their position in the halo arrays.
#[derive(Clone, Debug, Default)]
pub struct IdIndex {
    map: HashMap<i64, usize>,
}

impl IdIndex {
    /// Later duplicates of an ID win.
    pub fn new(ids: &[i64]) -> Self {
        let map = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self { map }
    }

    pub fn find(&self, id: i64) -> Option<usize> {
        self.map.get(&id).copied()
    }

    pub fn get(&self, id: i64) -> Result<usize, FinderError> {
        self.find(id).ok_or(FinderError::UnknownId(id))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Looks up `id` and checks that its halo has a row in `relations`.
fn halo_row(relations: &Relations, index: &IdIndex, id: i64) -> Result<usize, FinderError> {
    let i = index.get(id)?;
    if i >= relations.len() {
        return Err(FinderError::UnknownId(id));
    }
    Ok(i)
}

/// For each requested ID, whether that halo overlaps a higher-priority halo.
pub fn subhalo_flags(
    relations: &Relations,
    index: &IdIndex,
    ids: &[i64],
) -> Result<Vec<bool>, FinderError> {
    ids.iter()
        .map(|&id| halo_row(relations, index, id).map(|i| relations.is_subhalo(i)))
        .collect()
}

/// One row of a host/member listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostMember {
    pub id: i64,
    pub host_id: i64,
}

/// Lists every requested host followed by the IDs of its subhalos, each row
/// tagged with the host's ID. `catalog_ids` must have one entry per halo in
/// `relations`.
pub fn expand_subhalo_ids(
    relations: &Relations,
    catalog_ids: &[i64],
    index: &IdIndex,
    host_ids: &[i64],
) -> Result<Vec<HostMember>, FinderError> {
    if catalog_ids.len() != relations.len() {
        return Err(FinderError::LengthMismatch {
            expected: relations.len(),
            got: catalog_ids.len(),
        });
    }
    let mut rows = Vec::with_capacity(host_ids.len());
    for &host_id in host_ids {
        let h = halo_row(relations, index, host_id)?;
        rows.push(HostMember {
            id: host_id,
            host_id,
        });
        rows.extend(relations.subhalos(h).iter().map(|&s| HostMember {
            id: catalog_ids[s],
            host_id,
        }));
    }
    Ok(rows)
}

/// Keeps the IDs whose flag is false, i.e. drops subhalos.
pub fn filter_hosts(ids: &[i64], is_sub: &[bool]) -> Vec<i64> {
    ids.iter()
        .zip(is_sub)
        .filter(|&(_, &sub)| !sub)
        .map(|(&id, _)| id)
        .collect()
}
