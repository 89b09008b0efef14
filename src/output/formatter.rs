//! Output formatting options

use std::fmt;
use std::str::FromStr;

/// How cells are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Nothing,
    Unaligned,
    Aligned,
    Wrapped,
    Html,
}

impl Alignment {
    /// Values accepted by `\format alignment`
    pub const SETTABLE: &'static [&'static str] = &["unaligned", "aligned"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Nothing => "nothing",
            Alignment::Unaligned => "unaligned",
            Alignment::Aligned => "aligned",
            Alignment::Wrapped => "wrapped",
            Alignment::Html => "html",
        }
    }

    pub fn is_aligned(&self) -> bool {
        matches!(self, Alignment::Aligned)
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unaligned" => Ok(Alignment::Unaligned),
            "aligned" => Ok(Alignment::Aligned),
            _ => Err(format!(
                "allowed formats are {}",
                Alignment::SETTABLE.join(", ")
            )),
        }
    }
}

/// Named border style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Minimal,
    Classic,
    /// Accepted for compatibility; renders like `Classic`
    Box,
}

impl BorderStyle {
    pub const SETTABLE: &'static [&'static str] = &["minimal", "classic"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::Minimal => "minimal",
            BorderStyle::Classic => "classic",
            BorderStyle::Box => "box",
        }
    }

    /// Glyph set used to draw this style
    pub fn format(&self) -> BorderFormat {
        match self {
            BorderStyle::Minimal => BorderFormat {
                name: "minimal",
                divider: "|",
                junction: "+",
                underline: '-',
                padding: true,
            },
            BorderStyle::Classic | BorderStyle::Box => BorderFormat {
                name: "classic",
                divider: " ",
                junction: " ",
                underline: '=',
                padding: false,
            },
        }
    }
}

impl fmt::Display for BorderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BorderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(BorderStyle::Minimal),
            "classic" => Ok(BorderStyle::Classic),
            "box" => Ok(BorderStyle::Box),
            _ => Err(format!(
                "allowed formats are {}",
                BorderStyle::SETTABLE.join(", ")
            )),
        }
    }
}

/// Glyphs for one border style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderFormat {
    pub name: &'static str,
    pub divider: &'static str,
    pub junction: &'static str,
    pub underline: char,
    /// One space either side of each aligned cell
    pub padding: bool,
}

/// Everything the table renderer needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub alignment: Alignment,
    pub border: BorderStyle,
    pub null_display: String,
    /// Optional title centered above the table
    pub header: Option<String>,
    /// Fold all-uppercase column labels to lowercase
    pub fold_labels: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            alignment: Alignment::Aligned,
            border: BorderStyle::Minimal,
            null_display: "NULL".to_string(),
            header: None,
            fold_labels: true,
        }
    }
}

impl FormatOptions {
    /// Copy of these options with a title
    pub fn titled(&self, header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
            ..self.clone()
        }
    }
}
