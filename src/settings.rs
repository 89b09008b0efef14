//! Session settings

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::output::FormatOptions;

/// History file name in the user's home directory
pub const HISTORY_FILE_NAME: &str = ".fbsql_history";

/// Whether to print the execution plan alongside query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanDisplay {
    #[default]
    Off,
    On,
    /// Print the plan but not the rows
    Only,
}

impl PlanDisplay {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanDisplay::Off => "off",
            PlanDisplay::On => "on",
            PlanDisplay::Only => "only",
        }
    }
}

impl fmt::Display for PlanDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanDisplay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(PlanDisplay::Off),
            "on" => Ok(PlanDisplay::On),
            "only" => Ok(PlanDisplay::Only),
            _ => Err("allowed options are on, off, only".to_string()),
        }
    }
}

/// History de-duplication policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistControl {
    None,
    /// Drop entries starting with whitespace
    IgnoreSpace,
    /// Drop entries equal to the previous one
    IgnoreDups,
    #[default]
    IgnoreBoth,
}

impl HistControl {
    pub fn ignore_space(&self) -> bool {
        matches!(self, HistControl::IgnoreSpace | HistControl::IgnoreBoth)
    }

    pub fn ignore_dups(&self) -> bool {
        matches!(self, HistControl::IgnoreDups | HistControl::IgnoreBoth)
    }
}

impl FromStr for HistControl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(HistControl::None),
            "ignorespace" => Ok(HistControl::IgnoreSpace),
            "ignoredups" => Ok(HistControl::IgnoreDups),
            "ignoreboth" => Ok(HistControl::IgnoreBoth),
            _ => Err("allowed values are none, ignorespace, ignoredups, ignoreboth".to_string()),
        }
    }
}

/// Everything a user can toggle during a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub format: FormatOptions,
    pub timing: bool,
    pub quiet: bool,
    /// Print internally generated catalog queries before running them
    pub echo_hidden: bool,
    pub autocommit: bool,
    pub plan_display: PlanDisplay,
    pub histcontrol: HistControl,
    /// `None` disables history persistence
    pub history_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: FormatOptions::default(),
            timing: true,
            quiet: false,
            echo_hidden: false,
            autocommit: true,
            plan_display: PlanDisplay::Off,
            histcontrol: HistControl::IgnoreBoth,
            history_file: default_history_file(),
        }
    }
}

/// `~/.fbsql_history`, if the home directory can be resolved
pub fn default_history_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HISTORY_FILE_NAME))
}
