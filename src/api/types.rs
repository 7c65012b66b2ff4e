//! REST API types for the dashboard frontend.
//!
//! Responses carry both raw numeric values and pre-formatted Brazilian
//! currency strings, so the frontend never re-implements the locale rule.

use serde::{Deserialize, Serialize};

use crate::currency::format_brl;
use crate::filter::{apply, FilterOptions, FilterSelection};
use crate::metrics::{
    category_breakdown, rank_external_cost, rank_internal_savings, BreakdownEntry, GroupField,
    GroupTotal, Summary,
};
use crate::models::Record;

/// Body of `POST /api/filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardRequest {
    /// Filter selection; defaults to the identity filter.
    pub selection: FilterSelection,
    /// Grouping dimension for rankings and the breakdown.
    pub group_by: GroupField,
    /// How many groups each ranking keeps.
    pub top: usize,
}

impl Default for DashboardRequest {
    fn default() -> Self {
        Self {
            selection: FilterSelection::default(),
            group_by: GroupField::Coordinator,
            top: 10,
        }
    }
}

/// A ranked (group, amount) pair with its display string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTotalView {
    pub group: String,
    pub value: f64,
    pub formatted: String,
}

impl From<GroupTotal> for GroupTotalView {
    fn from(total: GroupTotal) -> Self {
        Self {
            formatted: format_brl(total.value),
            group: total.group,
            value: total.value,
        }
    }
}

/// The dashboard's KPI header block, display-ready.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub total_external_cost: f64,
    pub total_external_cost_formatted: String,
    pub total_records: usize,
    pub internal_count: usize,
    pub savings_estimate: f64,
    pub savings_estimate_formatted: String,
    pub top_spender: GroupTotalView,
}

impl From<Summary> for SummaryView {
    fn from(summary: Summary) -> Self {
        Self {
            total_external_cost_formatted: format_brl(summary.total_external_cost),
            total_external_cost: summary.total_external_cost,
            total_records: summary.total_records,
            internal_count: summary.internal_count,
            savings_estimate_formatted: format_brl(summary.savings_estimate),
            savings_estimate: summary.savings_estimate,
            top_spender: summary.top_spender.into(),
        }
    }
}

/// Response of `POST /api/filter`: everything one dashboard render needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Records surviving the filter cascade.
    pub records: Vec<Record>,
    /// Cascading option lists for the sidebar selectors.
    pub options: FilterOptions,
    /// KPI header block.
    pub summary: SummaryView,
    /// Top groups by external cost, ascending (bar-chart order).
    pub external_ranking: Vec<GroupTotalView>,
    /// Top groups by internal saving, ascending.
    pub savings_ranking: Vec<GroupTotalView>,
    /// Per-(group, category) counts for the efficiency chart.
    pub breakdown: Vec<BreakdownEntry>,
}

impl DashboardResponse {
    /// Filter the record set and compute every display value.
    pub fn compute(records: &[Record], request: &DashboardRequest) -> Self {
        let outcome = apply(records, &request.selection);
        let filtered = &outcome.records;

        let summary = Summary::compute(filtered, request.group_by);
        let external_ranking = rank_external_cost(filtered, request.group_by, request.top)
            .into_iter()
            .map(GroupTotalView::from)
            .collect();
        let savings_ranking = rank_internal_savings(filtered, request.group_by, request.top)
            .into_iter()
            .map(GroupTotalView::from)
            .collect();
        let breakdown = category_breakdown(filtered, request.group_by);

        Self {
            records: outcome.records,
            options: outcome.options,
            summary: summary.into(),
            external_ranking,
            savings_ranking,
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn record(coordinator: &str, category: Category, cost: f64) -> Record {
        Record {
            contracting_party: "Acme".into(),
            site: "Obra".into(),
            coordinator: coordinator.into(),
            executive_unit: "GE".into(),
            training_type: "NR 10".into(),
            cost,
            category,
            search_key: format!("NR 10 OBRA {} GE ACME", coordinator.to_uppercase()),
        }
    }

    #[test]
    fn test_compute_default_request() {
        let records = vec![
            record("Carlos", Category::ExternalCost, 100.0),
            record("Ana", Category::ExternalCost, 300.0),
            record("Carlos", Category::InternalSubstitute, 0.0),
        ];
        let response = DashboardResponse::compute(&records, &DashboardRequest::default());

        assert_eq!(response.records.len(), 3);
        assert_eq!(response.summary.total_external_cost, 400.0);
        assert_eq!(response.summary.total_external_cost_formatted, "R$ 400,00");
        assert_eq!(response.summary.savings_estimate_formatted, "R$ 200,00");
        assert_eq!(response.summary.top_spender.group, "Ana");
        // Ascending ranking, largest last
        assert_eq!(response.external_ranking.last().unwrap().group, "Ana");
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let req: DashboardRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.group_by, GroupField::Coordinator);
        assert_eq!(req.top, 10);
        assert!(req.selection.search.is_empty());

        let req: DashboardRequest = serde_json::from_str(
            r#"{"groupBy":"site","top":5,"selection":{"search":"NR 10"}}"#,
        )
        .unwrap();
        assert_eq!(req.group_by, GroupField::Site);
        assert_eq!(req.top, 5);
        assert_eq!(req.selection.search, "NR 10");
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let records = vec![record("Carlos", Category::ExternalCost, 1234.5)];
        let response = DashboardResponse::compute(&records, &DashboardRequest::default());
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("externalRanking").is_some());
        assert_eq!(
            json["summary"]["totalExternalCostFormatted"],
            "R$ 1.234,50"
        );
    }
}
