//! Configuration file handling
//!
//! An optional JSON file supplies defaults for the session settings.
//! Every key is optional:
//!
//! ```json
//! {
//!   "timing": true,
//!   "autocommit": true,
//!   "quiet": false,
//!   "lc_fold": true,
//!   "null_display": "NULL",
//!   "alignment": "aligned",
//!   "border": "minimal",
//!   "plan": "off",
//!   "histcontrol": "ignoreboth",
//!   "history_file": "~/.fbsql_history"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FbsqlError, Result};
use crate::output::{Alignment, BorderStyle};
use crate::settings::{HistControl, PlanDisplay, Settings};

/// Default configuration file name in the user's home directory
pub const CONFIG_FILE_NAME: &str = ".fbsqlrc.json";

/// Raw file contents, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub timing: Option<bool>,
    pub autocommit: Option<bool>,
    pub quiet: Option<bool>,
    pub lc_fold: Option<bool>,
    pub null_display: Option<String>,
    pub alignment: Option<String>,
    pub border: Option<String>,
    pub plan: Option<String>,
    pub histcontrol: Option<String>,
    pub history_file: Option<String>,
}

impl ConfigFile {
    /// Load a configuration file.
    ///
    /// With `path` unset the default file is tried and silently skipped
    /// when absent; an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (expand_tilde(p), true),
            None => match dirs::home_dir() {
                Some(home) => (home.join(CONFIG_FILE_NAME), false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(FbsqlError::Config(format!(
                    "configuration file \"{}\" not found",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading configuration");

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            FbsqlError::Config(format!("failed to read \"{}\": {}", path.display(), e))
        })?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| FbsqlError::Config(format!("invalid configuration: {}", e)))
    }

    /// Apply the file's values over `settings`, rejecting invalid values
    pub fn apply(&self, settings: &mut Settings) -> Result<()> {
        if let Some(timing) = self.timing {
            settings.timing = timing;
        }
        if let Some(autocommit) = self.autocommit {
            settings.autocommit = autocommit;
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(lc_fold) = self.lc_fold {
            settings.format.fold_labels = lc_fold;
        }
        if let Some(null_display) = &self.null_display {
            settings.format.null_display = null_display.clone();
        }
        if let Some(alignment) = &self.alignment {
            settings.format.alignment = parse_key::<Alignment>("alignment", alignment)?;
        }
        if let Some(border) = &self.border {
            settings.format.border = parse_key::<BorderStyle>("border", border)?;
        }
        if let Some(plan) = &self.plan {
            settings.plan_display = parse_key::<PlanDisplay>("plan", plan)?;
        }
        if let Some(histcontrol) = &self.histcontrol {
            settings.histcontrol = parse_key::<HistControl>("histcontrol", histcontrol)?;
        }
        if let Some(history_file) = &self.history_file {
            settings.history_file = Some(expand_tilde(Path::new(history_file)));
        }
        Ok(())
    }
}

fn parse_key<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse::<T>()
        .map_err(|e| FbsqlError::Config(format!("{}: {}", key, e)))
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_apply_overrides_defaults() {
        let config = ConfigFile::parse(
            r#"{"timing": false, "border": "classic", "plan": "only", "null_display": "-"}"#,
        )
        .unwrap();
        let mut settings = Settings::default();
        config.apply(&mut settings).unwrap();

        assert!(!settings.timing);
        assert_eq!(settings.format.border, BorderStyle::Classic);
        assert_eq!(settings.plan_display, PlanDisplay::Only);
        assert_eq!(settings.format.null_display, "-");
        assert!(settings.autocommit);
    }

    #[test]
    fn test_invalid_value_names_key() {
        let config = ConfigFile::parse(r#"{"alignment": "diagonal"}"#).unwrap();
        let err = config.apply(&mut Settings::default()).unwrap_err();

        assert!(err.to_string().contains("alignment"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ConfigFile::parse(r#"{"colour": true}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"histcontrol": "ignoredups"}}"#).unwrap();

        let config = ConfigFile::load(Some(file.path())).unwrap();
        assert_eq!(config.histcontrol.as_deref(), Some("ignoredups"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");

        assert!(ConfigFile::load(Some(&path)).is_err());
    }
}
