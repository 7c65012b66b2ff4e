//! # QSSMA Backend - training cost classification and KPI engine
//!
//! Backend for a cost/savings dashboard over normative safety trainings
//! (NRs). It turns a wide per-contract × per-training-type spreadsheet of
//! heterogeneous cells (Brazilian currency strings, numbers, "INTERNO"
//! markers, N/A noise) into a clean record set and serves filtered KPIs.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌────────────┐    ┌─────────────┐
//! │ CSV file │───▶│ Normalizer │───▶│ Classifier │───▶│ Record set  │
//! │ (BR/ISO) │    │ (melt)     │    │ + builder  │    │ (immutable) │
//! └──────────┘    └────────────┘    └────────────┘    └──────┬──────┘
//!                                                           │
//!                              ┌────────────┐    ┌──────────▼──────┐
//!                              │  Metrics   │◀───│  Filter engine  │
//!                              │ (KPIs)     │    │  (cascading)    │
//!                              └────────────┘    └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qssma::{load_file, DashboardRequest, DashboardResponse};
//!
//! let dataset = load_file("treinamentos.csv")?;
//! let view = DashboardResponse::compute(&dataset.records, &DashboardRequest::default());
//! println!("Total: {}", view.summary.total_external_cost_formatted);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Two-tier error types (load-fatal vs. excluded cells)
//! - [`models`] - Domain models (CellValue, Classification, Record)
//! - [`parser`] - CSV parsing with encoding/delimiter auto-detection
//! - [`etl`] - Normalizer, classifier, record builder, load pipeline
//! - [`filter`] - Cascading filter engine
//! - [`metrics`] - KPI aggregations and rankings
//! - [`currency`] - Brazilian-locale currency formatting
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// ETL
pub mod etl;

// Filtering & aggregation
pub mod filter;
pub mod metrics;

// Formatting
pub mod currency;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{LoadError, LoadResult, ServerError, ServerResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Category, CellValue, Classification, LongRow, Record};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_content,
    parse_file_auto, ParseResult, RawTable,
};

// =============================================================================
// Re-exports - ETL
// =============================================================================

pub use etl::{
    build, classify, load_bytes, load_file, normalize, normalize_training_label, Dataset,
    LoadInfo, NormalizedMatrix, IDENTITY_COLUMNS,
};

// =============================================================================
// Re-exports - Filter Engine
// =============================================================================

pub use filter::{apply, FilterOptions, FilterOutcome, FilterSelection};

// =============================================================================
// Re-exports - Metrics
// =============================================================================

pub use metrics::{
    category_breakdown, internal_count, rank_external_cost, rank_internal_savings, rank_top,
    savings_estimate, top_costs, top_spender, total_external_cost, total_record_count,
    BreakdownEntry, GroupField, GroupTotal, Summary, NO_DATA_LABEL, SAVING_UNIT_RATE,
};

// =============================================================================
// Re-exports - Currency
// =============================================================================

pub use currency::format_brl;

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{DashboardRequest, DashboardResponse, GroupTotalView, SummaryView};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
