//! Plan command implementation.

use crate::cli::PlanArgs;
use crate::error::add_hints;
use crate::error::ensure_zip_extension;
use crate::output::OutputFormatter;
use crate::settings;
use anyhow::Result;
use statix_core::ContentAddress;
use statix_core::ExtractionPlan;
use statix_core::ZipReader;
use statix_core::formats::ArchiveReader;
use std::path::Path;

pub fn execute(
    args: &PlanArgs,
    config_path: Option<&Path>,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    ensure_zip_extension(&args.archive)?;
    let config = settings::load(config_path, &args.options)?;
    let archive = add_hints(ZipReader::open(&args.archive))?;

    let members = archive.members();
    let address = ContentAddress::compute(&args.record, members);
    let plan = add_hints(ExtractionPlan::with_config(address, members, &config))?;

    formatter.format_plan(&args.record, &plan, args.long)
}
