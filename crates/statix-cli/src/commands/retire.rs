//! Retire command implementation.

use super::absolute;
use crate::cli::RetireArgs;
use crate::error::add_hints;
use crate::output::OutputFormatter;
use anyhow::Result;
use statix_core::ContentStore;

pub fn execute(args: &RetireArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let root = absolute(&args.root)?;
    let path = absolute(&args.path)?;

    add_hints(ContentStore::new(&root).retire(&path))?;

    formatter.format_success("retire", &format!("Retired {}", path.display()))
}
