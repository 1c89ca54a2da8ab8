//! Stateless services implementing the reporting engine.
//!
//! Every computation here is a pure function of its arguments: nothing is cached
//! between calls and inputs are never written back to.

pub mod aggregation_service;
pub mod calendar;
pub mod classifier;
pub mod group_service;
pub mod grouping_service;
pub mod import_service;
pub mod ordering;
pub mod rule_service;
pub mod summary_service;

pub use aggregation_service::{AggregationService, ReportInput};
pub use classifier::{classify_category, CategoryClassifier, CategoryRef};
pub use group_service::GroupService;
pub use grouping_service::{GroupingService, PeriodMode};
pub use import_service::ImportService;
pub use ordering::{move_adjacent, reorder};
pub use rule_service::RuleService;
pub use summary_service::SummaryService;

use crate::errors::DashboardError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] DashboardError),
    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests;
