//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use statix_core::BatchOutcome;
use statix_core::ExtractionPlan;
use statix_core::IngestionJob;
use statix_core::IngestionResult;

use crate::records::StaticContent;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a finished ingestion
    fn format_ingestion_result(
        &self,
        record: &StaticContent,
        result: &IngestionResult,
    ) -> Result<()>;

    /// Format the progress of a step-wise ingestion after one batch
    fn format_step(&self, job: &IngestionJob, outcome: Option<&BatchOutcome>) -> Result<()>;

    /// Format an extraction plan
    fn format_plan(&self, record_id: &str, plan: &ExtractionPlan, long: bool) -> Result<()>;

    /// Format success message
    fn format_success(&self, operation: &str, message: &str) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// Reports `data` together with an error summary.
    pub fn failure(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}
