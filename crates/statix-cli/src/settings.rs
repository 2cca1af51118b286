//! Ingestion settings from the optional TOML file plus command-line overrides.
//!
//! ```toml
//! [ingest]
//! batch_size = 25
//! entry_sentinel = "index.html"
//! ```

use crate::cli::PlanOptions;
use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use statix_core::IngestConfig;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    ingest: IngestConfig,
}

/// Loads the ingestion configuration, applying `options` on top of the file.
pub fn load(config_path: Option<&Path>, options: &PlanOptions) -> Result<IngestConfig> {
    let mut config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            parse(&text)
                .with_context(|| format!("invalid config file '{}'", path.display()))?
        }
        None => IngestConfig::default(),
    };

    if let Some(batch_size) = options.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(entry) = &options.entry {
        config.entry_sentinel.clone_from(entry);
    }

    Ok(config)
}

fn parse(text: &str) -> Result<IngestConfig> {
    let file: SettingsFile = toml::from_str(text)?;
    Ok(file.ingest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn no_overrides() -> PlanOptions {
        PlanOptions {
            batch_size: None,
            entry: None,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load(None, &no_overrides()).unwrap();
        assert_eq!(config, IngestConfig::default());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = parse("[ingest]\nbatch_size = 25\n").unwrap();
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.entry_sentinel, "index.html");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(parse("[ingest]\nbatchsize = 25\n").is_err());
        assert!(parse("[extract]\nbatch_size = 25\n").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        fs::write(temp.path(), "[ingest]\nbatch_size = 25\nentry_sentinel = \"home.html\"\n")
            .unwrap();
        let options = PlanOptions {
            batch_size: Some(3),
            entry: None,
        };

        let config = load(Some(temp.path()), &options).unwrap();

        assert_eq!(config.batch_size, 3);
        assert_eq!(config.entry_sentinel, "home.html");
    }
}
