//! Aggregation engine: KPIs and rankings over a (filtered) record set.
//!
//! Every function here is stateless and total: an empty record set yields
//! zeros and sentinels, never an error. The dashboard calls these on every
//! filter interaction, so they all work on a borrowed slice.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Record};

/// Notional market value of one internally delivered training session.
///
/// Each internal substitute counts as this much saving.
pub const SAVING_UNIT_RATE: f64 = 200.00;

/// Sentinel group label when no data backs a ranking.
pub const NO_DATA_LABEL: &str = "N/A";

// =============================================================================
// Group Field
// =============================================================================

/// Dimension used for group-by rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum GroupField {
    Coordinator,
    Site,
    ExecutiveUnit,
    ContractingParty,
    TrainingType,
}

impl GroupField {
    /// Extract this dimension's value from a record.
    pub fn value<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Self::Coordinator => &record.coordinator,
            Self::Site => &record.site,
            Self::ExecutiveUnit => &record.executive_unit,
            Self::ContractingParty => &record.contracting_party,
            Self::TrainingType => &record.training_type,
        }
    }
}

// =============================================================================
// Scalar KPIs
// =============================================================================

/// Sum of costs over external-cost records; 0 on empty input.
pub fn total_external_cost(records: &[Record]) -> f64 {
    records
        .iter()
        .filter(|r| r.category == Category::ExternalCost)
        .map(|r| r.cost)
        .sum()
}

/// Count of internal-substitute records.
pub fn internal_count(records: &[Record]) -> usize {
    records
        .iter()
        .filter(|r| r.category == Category::InternalSubstitute)
        .count()
}

/// Saving generated by internally delivered trainings.
pub fn savings_estimate(internal_count: usize) -> f64 {
    internal_count as f64 * SAVING_UNIT_RATE
}

/// Total number of (valid) records.
pub fn total_record_count(records: &[Record]) -> usize {
    records.len()
}

// =============================================================================
// Group Totals & Rankings
// =============================================================================

/// One (group, value) pair of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTotal {
    pub group: String,
    pub value: f64,
}

/// Group records by a field, preserving first-encounter order.
fn group_by<'a>(records: &'a [Record], field: GroupField) -> Vec<(String, Vec<&'a Record>)> {
    let mut groups: Vec<(String, Vec<&Record>)> = Vec::new();
    for record in records {
        let key = field.value(record);
        match groups.iter_mut().find(|(g, _)| g == key) {
            Some((_, members)) => members.push(record),
            None => groups.push((key.to_string(), vec![record])),
        }
    }
    groups
}

/// The single group with the largest external-cost sum.
///
/// Returns the `(N/A, 0.0)` sentinel when no external-cost records exist.
/// Ties break toward the first-encountered group: grouping accumulates in
/// first-encounter order and only a strictly larger sum displaces the
/// current leader.
pub fn top_spender(records: &[Record], field: GroupField) -> GroupTotal {
    let externals: Vec<Record> = records
        .iter()
        .filter(|r| r.category == Category::ExternalCost)
        .cloned()
        .collect();

    let mut best = GroupTotal {
        group: NO_DATA_LABEL.to_string(),
        value: 0.0,
    };
    for (group, members) in group_by(&externals, field) {
        let sum: f64 = members.iter().map(|r| r.cost).sum();
        if sum > best.value {
            best = GroupTotal { group, value: sum };
        }
    }
    best
}

/// Rank groups by a derived value, ascending, keeping only the top `n`.
///
/// Ascending order is the display contract: the frontend draws these as
/// horizontal bars from the bottom up, largest on top.
pub fn rank_top<F>(records: &[Record], field: GroupField, n: usize, value_fn: F) -> Vec<GroupTotal>
where
    F: Fn(&[&Record]) -> f64,
{
    let mut totals: Vec<GroupTotal> = group_by(records, field)
        .into_iter()
        .map(|(group, members)| GroupTotal {
            value: value_fn(&members),
            group,
        })
        .collect();

    totals.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal));
    if totals.len() > n {
        totals.drain(..totals.len() - n);
    }
    totals
}

/// Top-`n` groups by external-cost sum, ascending.
pub fn rank_external_cost(records: &[Record], field: GroupField, n: usize) -> Vec<GroupTotal> {
    let externals: Vec<Record> = records
        .iter()
        .filter(|r| r.category == Category::ExternalCost)
        .cloned()
        .collect();
    rank_top(&externals, field, n, |members| {
        members.iter().map(|r| r.cost).sum()
    })
}

/// Top-`n` groups by internal-substitute saving, ascending.
pub fn rank_internal_savings(records: &[Record], field: GroupField, n: usize) -> Vec<GroupTotal> {
    let internals: Vec<Record> = records
        .iter()
        .filter(|r| r.category == Category::InternalSubstitute)
        .cloned()
        .collect();
    rank_top(&internals, field, n, |members| {
        savings_estimate(members.len())
    })
}

// =============================================================================
// Category Breakdown
// =============================================================================

/// One (group, category) count of the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub group: String,
    pub category: Category,
    pub count: usize,
}

/// Per-(group, category) record counts, restricted to the ten groups with
/// the highest total count. Groups come out in descending total order.
pub fn category_breakdown(records: &[Record], field: GroupField) -> Vec<BreakdownEntry> {
    let mut groups = group_by(records, field);
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    groups.truncate(10);

    let mut entries = Vec::new();
    for (group, members) in groups {
        for category in [Category::ExternalCost, Category::InternalSubstitute] {
            let count = members.iter().filter(|r| r.category == category).count();
            if count > 0 {
                entries.push(BreakdownEntry {
                    group: group.clone(),
                    category,
                    count,
                });
            }
        }
    }
    entries
}

/// The `n` largest individual external costs, descending (audit view).
pub fn top_costs(records: &[Record], n: usize) -> Vec<Record> {
    let mut externals: Vec<Record> = records
        .iter()
        .filter(|r| r.category == Category::ExternalCost)
        .cloned()
        .collect();
    externals.sort_by(|a, b| b.cost.partial_cmp(&a.cost).unwrap_or(std::cmp::Ordering::Equal));
    externals.truncate(n);
    externals
}

// =============================================================================
// Summary
// =============================================================================

/// The KPI block shown at the top of the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_external_cost: f64,
    pub total_records: usize,
    pub internal_count: usize,
    pub savings_estimate: f64,
    pub top_spender: GroupTotal,
}

impl Summary {
    /// Compute all KPIs in one pass over a filtered record set.
    pub fn compute(records: &[Record], field: GroupField) -> Self {
        let internal = internal_count(records);
        Self {
            total_external_cost: total_external_cost(records),
            total_records: total_record_count(records),
            internal_count: internal,
            savings_estimate: savings_estimate(internal),
            top_spender: top_spender(records, field),
        }
    }
}
