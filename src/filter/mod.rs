//! Cascading filter engine.
//!
//! The dashboard sidebar filters in a fixed order: free-text search, then
//! contracting party, executive unit, coordinator, site, and finally the
//! training type. The engine is hierarchical by contract, not as an
//! optimization: the option list offered for each dimension is computed
//! from the records that survived every *earlier* stage, so narrowing
//! "contracting party" narrows what the "executive unit" selector offers.
//!
//! Pure functions throughout; nothing is cached between calls.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::models::Record;

// =============================================================================
// Selection
// =============================================================================

/// Transient, UI-driven filter state.
///
/// For the four identity dimensions, `None` means "all selected" (the UI
/// defaults every option on) while `Some(set)` restricts to exactly that
/// set - including `Some(vec![])`, which matches nothing. The training-type
/// dimension keeps the source's asymmetric default: its set starts empty
/// and an empty set passes everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelection {
    /// Free-text term matched as a substring of each record's search key.
    pub search: String,
    pub contracting_parties: Option<Vec<String>>,
    pub executive_units: Option<Vec<String>>,
    pub coordinators: Option<Vec<String>>,
    pub sites: Option<Vec<String>>,
    pub training_types: Vec<String>,
}

// =============================================================================
// Options & Outcome
// =============================================================================

/// Candidate option lists per dimension, computed cascading.
///
/// Each list is sorted and deduplicated, and reflects the records that
/// survived all stages *before* that dimension.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub contracting_parties: Vec<String>,
    pub executive_units: Vec<String>,
    pub coordinators: Vec<String>,
    pub sites: Vec<String>,
    pub training_types: Vec<String>,
}

/// Result of applying a [`FilterSelection`].
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Records surviving every stage, in input order.
    pub records: Vec<Record>,
    /// Cascading option lists for the next interaction.
    pub options: FilterOptions,
}

// =============================================================================
// Engine
// =============================================================================

/// Apply a selection to a record set.
pub fn apply(records: &[Record], selection: &FilterSelection) -> FilterOutcome {
    let mut survivors: Vec<&Record> = records.iter().collect();
    let mut options = FilterOptions::default();

    // Stage 1: free-text search (identity pass when the term is empty)
    if !selection.search.trim().is_empty() {
        let term = selection.search.trim().to_uppercase();
        survivors.retain(|r| r.search_key.contains(&term));
    }

    // Stages 2-5: identity dimensions, each narrowing the next one's domain
    options.contracting_parties = distinct_sorted(&survivors, |r| &r.contracting_party);
    retain_in_set(&mut survivors, &selection.contracting_parties, |r| {
        &r.contracting_party
    });

    options.executive_units = distinct_sorted(&survivors, |r| &r.executive_unit);
    retain_in_set(&mut survivors, &selection.executive_units, |r| {
        &r.executive_unit
    });

    options.coordinators = distinct_sorted(&survivors, |r| &r.coordinator);
    retain_in_set(&mut survivors, &selection.coordinators, |r| &r.coordinator);

    options.sites = distinct_sorted(&survivors, |r| &r.site);
    retain_in_set(&mut survivors, &selection.sites, |r| &r.site);

    // Stage 6: training type - empty set means "no filter"
    options.training_types = distinct_sorted(&survivors, |r| &r.training_type);
    if !selection.training_types.is_empty() {
        let set: HashSet<&str> = selection.training_types.iter().map(String::as_str).collect();
        survivors.retain(|r| set.contains(r.training_type.as_str()));
    }

    FilterOutcome {
        records: survivors.into_iter().cloned().collect(),
        options,
    }
}

fn distinct_sorted<F>(records: &[&Record], field: F) -> Vec<String>
where
    F: Fn(&Record) -> &str,
{
    records
        .iter()
        .map(|r| field(r).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn retain_in_set<F>(survivors: &mut Vec<&Record>, include: &Option<Vec<String>>, field: F)
where
    F: Fn(&Record) -> &str,
{
    if let Some(values) = include {
        let set: HashSet<&str> = values.iter().map(String::as_str).collect();
        survivors.retain(|r| set.contains(field(r)));
    }
}
