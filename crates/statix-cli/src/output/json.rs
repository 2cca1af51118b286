//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use statix_core::BatchFailure;
use statix_core::BatchOutcome;
use statix_core::ExtractionBatch;
use statix_core::ExtractionPlan;
use statix_core::IngestionJob;
use statix_core::IngestionResult;
use std::io::Write;
use std::io::{self};

use crate::records::StaticContent;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct IngestionOutput<'a> {
    record_id: &'a str,
    name: &'a str,
    base_uri: Option<&'a str>,
    url: Option<&'a str>,
    #[serde(flatten)]
    result: &'a IngestionResult,
}

impl OutputFormatter for JsonFormatter {
    fn format_ingestion_result(
        &self,
        record: &StaticContent,
        result: &IngestionResult,
    ) -> Result<()> {
        let data = IngestionOutput {
            record_id: &record.id,
            name: &record.name,
            base_uri: record.base_uri.as_deref(),
            url: record.url.as_deref(),
            result,
        };

        let output = if result.success {
            JsonOutput::success("ingest", data)
        } else {
            let error = format!("{} batch(es) failed", result.failures.len());
            JsonOutput::failure("ingest", data, error)
        };
        Self::output(&output)
    }

    fn format_step(&self, job: &IngestionJob, outcome: Option<&BatchOutcome>) -> Result<()> {
        #[derive(Serialize)]
        struct StepOutput<'a> {
            record_id: &'a str,
            address: &'a str,
            batches_completed: usize,
            total_batches: usize,
            progress: f64,
            message: &'a str,
            batch: Option<&'a BatchOutcome>,
            failures: &'a [BatchFailure],
        }

        let context = job.context();
        let data = StepOutput {
            record_id: job.record_id(),
            address: job.plan().address().as_str(),
            batches_completed: context.batches_completed,
            total_batches: context.total_batches,
            progress: context.progress,
            message: &context.message,
            batch: outcome,
            failures: &context.failures,
        };

        Self::output(&JsonOutput::success("step", data))
    }

    fn format_plan(&self, record_id: &str, plan: &ExtractionPlan, long: bool) -> Result<()> {
        #[derive(Serialize)]
        struct PlanOutput<'a> {
            record_id: &'a str,
            address: &'a str,
            entry_point: &'a str,
            entry_url: String,
            member_count: usize,
            total_batches: usize,
            #[serde(skip_serializing_if = "Option::is_none")]
            batches: Option<&'a [ExtractionBatch]>,
        }

        let data = PlanOutput {
            record_id,
            address: plan.address().as_str(),
            entry_point: plan.entry_point(),
            entry_url: plan.entry_url(),
            member_count: plan.member_count(),
            total_batches: plan.total_batches(),
            batches: long.then(|| plan.batches()),
        };

        Self::output(&JsonOutput::success("plan", data))
    }

    fn format_success(&self, operation: &str, message: &str) -> Result<()> {
        #[derive(Serialize)]
        struct SuccessData<'a> {
            message: &'a str,
        }

        Self::output(&JsonOutput::success(operation, SuccessData { message }))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let output = JsonOutput::success("warning", WarningData { message });
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use statix_core::ContentAddress;

    #[test]
    fn test_failure_envelope() {
        let output = JsonOutput::failure("ingest", 3, "1 batch(es) failed");
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["operation"], "ingest");
        assert_eq!(json["status"], "error");
        assert_eq!(json["data"], 3);
        assert_eq!(json["error"], "1 batch(es) failed");
    }

    #[test]
    fn test_success_envelope_omits_error() {
        let output = JsonOutput::success("retire", "done");
        let json = serde_json::to_string(&output).unwrap();

        assert!(json.contains("\"status\":\"success\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_ingestion_output_flattens_result() {
        let address = ContentAddress::compute("7", &["index.html"]);
        let result = IngestionResult {
            entry_point: "index.html".to_string(),
            entry_url: format!("{address}/index.html"),
            address,
            members_requested: 1,
            members_extracted: 1,
            bytes_written: 6,
            failures: Vec::new(),
            success: true,
            warnings: Vec::new(),
        };
        let data = IngestionOutput {
            record_id: "7",
            name: "Home",
            base_uri: None,
            url: None,
            result: &result,
        };

        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(json["record_id"], "7");
        assert_eq!(json["members_extracted"], 1);
        assert_eq!(json["success"], true);
    }
}
