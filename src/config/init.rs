use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::schema::Config;
use crate::scoring::{Preset, ScoringConfig};

const HEADER: &str = "\
# journal-screen configuration
#
# scoring.rules replaces the built-in rule table. Patterns are regular
# expressions matched case-insensitively anywhere in the text; every match
# adds its weight. Risk weights must be positive, protective weights negative.
# Remove the rules section and set `preset: minimal|extended` to go back to a
# built-in table.
";

/// Render the starter config: the extended preset written out as custom rules.
pub fn starter_config_yaml() -> Result<String> {
    let config = Config {
        scoring: Some(ScoringConfig::expanded(Preset::Extended)),
    };
    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
    Ok(format!("{}\n{}", HEADER, yaml))
}

/// Write the starter config to `path`.
///
/// Refuses to replace an existing file unless `force` is set. The write is
/// atomic, so an existing config is never left half-written.
pub fn write_starter_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let yaml = starter_config_yaml()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}
