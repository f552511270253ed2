use std::str::FromStr;

pub const TABLE_START_MARKER: &str =
    "Lp. CPV Nazwa materiału Symbol Jm Ilość w Jm Cena Wartość Zap. Zakład";
pub const VALUE_IN_WORDS_MARKER: &str = "Wartość słownie:";
pub const PAGE_FOOTER_MARKER: &str = "Strona ";
pub const ADMIN_LINE_PREFIX: &str = "Na podst. zap.:";

/// What to do with a table line that cannot be attached to any row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityMode {
    BestEffort,
    Strict,
    SkipAmbiguous,
}

impl FromStr for QualityMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "best-effort" | "best_effort" => Ok(Self::BestEffort),
            "skip" | "skip-ambiguous" => Ok(Self::SkipAmbiguous),
            other => Err(format!(
                "unknown quality mode '{other}', expected strict, best-effort or skip"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}', expected csv or json")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// Every record column, values exactly as tokenized.
    Records,
    /// Spreadsheet layout with numeric columns converted to numbers.
    Report,
}

impl FromStr for OutputLayout {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "records" => Ok(Self::Records),
            "report" => Ok(Self::Report),
            other => Err(format!(
                "unknown output layout '{other}', expected records or report"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub start_marker: String,
    /// Tried in order; the first one found after the start marker wins.
    pub end_markers: Vec<String>,
    pub admin_prefix: String,
    pub quality_mode: QualityMode,
}

impl ParseOptions {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.start_marker.trim().is_empty() {
            return Err("start marker cannot be empty".to_string());
        }
        if self.end_markers.is_empty() {
            return Err("at least one end marker is required".to_string());
        }
        if self.end_markers.iter().any(|marker| marker.is_empty()) {
            return Err("end markers cannot be empty".to_string());
        }
        if self.admin_prefix.trim().is_empty() {
            return Err("administrative line prefix cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start_marker: TABLE_START_MARKER.to_string(),
            end_markers: vec![
                VALUE_IN_WORDS_MARKER.to_string(),
                PAGE_FOOTER_MARKER.to_string(),
            ],
            admin_prefix: ADMIN_LINE_PREFIX.to_string(),
            quality_mode: QualityMode::Strict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub format: OutputFormat,
    pub layout: OutputLayout,
    pub delimiter: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            layout: OutputLayout::Records,
            delimiter: b',',
        }
    }
}
