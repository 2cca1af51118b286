//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use statix_core::BatchOutcome;
use statix_core::ExtractionPlan;
use statix_core::IngestionJob;
use statix_core::IngestionResult;

use crate::records::StaticContent;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_percent(fraction: f64) -> String {
        format!("{:.0}%", fraction * 100.0)
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn heading(&self, ok: bool, text: &str) {
        if !self.use_colors {
            self.line(text);
        } else if ok {
            self.line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            self.line(&format!("{} {text}", style("✗").red().bold()));
        }
    }

    fn section(&self, title: &str, items: impl IntoIterator<Item = String>) {
        self.line("");
        if self.use_colors {
            self.line(&format!("{}", style(title).yellow().bold()));
        } else {
            self.line(title);
        }
        for item in items {
            self.line(&format!("  - {item}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_ingestion_result(
        &self,
        record: &StaticContent,
        result: &IngestionResult,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if result.success {
            self.heading(true, "Ingestion complete");
        } else {
            self.heading(false, "Ingestion failed; record left unchanged");
        }

        self.line(&format!("  Record:      {} ({})", record.id, record.name));
        self.line(&format!("  Address:     {}", result.address));
        self.line(&format!("  Entry URL:   {}", result.entry_url));
        self.line(&format!(
            "  Files:       {} of {}",
            result.members_extracted, result.members_requested
        ));
        self.line(&format!(
            "  Total size:  {}",
            Self::format_size(result.bytes_written)
        ));

        if self.verbose {
            if let Some(base_uri) = &record.base_uri {
                self.line(&format!("  Stored at:   {base_uri}"));
            }
        }

        if !result.failures.is_empty() {
            self.section(
                "Failed batches:",
                result.failures.iter().map(ToString::to_string),
            );
        }

        if result.missing_entry_point() {
            self.format_warning("archive has no entry-point document; the URL points at the content directory");
        }

        if result.has_warnings() {
            self.section("Warnings:", result.warnings.iter().cloned());
        }

        Ok(())
    }

    fn format_step(&self, job: &IngestionJob, outcome: Option<&BatchOutcome>) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let total = job.plan().total_batches();
        match outcome {
            Some(outcome) => match &outcome.failure {
                None => self.heading(
                    true,
                    &format!(
                        "Batch {}/{total}: {} files extracted",
                        outcome.batch_index + 1,
                        outcome.extracted.len()
                    ),
                ),
                Some(failure) => self.heading(false, &format!("Failed {failure}")),
            },
            None => self.heading(true, "No batches left to run"),
        }

        self.line(&format!(
            "  Progress:    {} ({}/{total} batches)",
            Self::format_percent(job.context().progress),
            job.context().batches_completed
        ));

        if self.verbose {
            if let Some(outcome) = outcome {
                for member in &outcome.extracted {
                    self.line(&format!("    {member}"));
                }
            }
        }

        Ok(())
    }

    fn format_plan(&self, record_id: &str, plan: &ExtractionPlan, long: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let entry = if plan.entry_point().is_empty() {
            "(none)"
        } else {
            plan.entry_point()
        };

        self.line(&format!("Plan for record {record_id}"));
        self.line(&format!("  Address:     {}", plan.address()));
        self.line(&format!("  Entry point: {entry}"));
        self.line(&format!("  Entry URL:   {}", plan.entry_url()));
        self.line(&format!("  Members:     {}", plan.member_count()));
        self.line(&format!("  Batches:     {}", plan.total_batches()));

        if long {
            for batch in plan.batches() {
                self.line("");
                self.line(&format!(
                    "Batch {} ({} members)",
                    batch.index + 1,
                    batch.len()
                ));
                for member in &batch.members {
                    self.line(&format!("  {member}"));
                }
            }
        }

        Ok(())
    }

    fn format_success(&self, _operation: &str, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.heading(true, message);
        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            self.line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            self.line(&format!("WARNING: {message}"));
        }
    }
}
