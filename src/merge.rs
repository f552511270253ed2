use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::model::RowCounter;
use crate::options::QualityMode;
use crate::warning::{ExtractWarning, WarningCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MergeOutcome {
    pub(crate) rows: Vec<String>,
    pub(crate) counter: RowCounter,
    pub(crate) warnings: Vec<ExtractWarning>,
}

fn is_row_anchor(line: &str, counter: RowCounter) -> bool {
    line.trim()
        .strip_prefix(counter.next_item().to_string().as_str())
        .is_some_and(|rest| rest.starts_with(' '))
}

/// Glues physical lines that wrapped during text extraction back into
/// logical table rows.
///
/// A line opens a new row only when it starts with the next expected item
/// number followed by a space. Everything else is appended verbatim to the
/// previous row, except administrative lines which are dropped.
pub(crate) fn merge_wrapped_rows<'a, I>(
    lines: I,
    counter: RowCounter,
    page: u32,
    admin_prefix: &str,
    mode: QualityMode,
) -> Result<MergeOutcome, ExtractError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counter = counter;
    let mut rows: Vec<String> = Vec::new();
    let mut warnings = Vec::new();

    for line in lines {
        if is_row_anchor(line, counter) {
            counter = counter.advance();
            rows.push(line.to_string());
            continue;
        }

        if line.trim_start().starts_with(admin_prefix) {
            debug!(page, line, "dropping administrative line");
            continue;
        }

        if let Some(previous) = rows.last_mut() {
            previous.push_str(line);
            continue;
        }

        let orphan = line.trim();
        if orphan.is_empty() {
            continue;
        }

        match mode {
            QualityMode::Strict => {
                return Err(ExtractError::MalformedAnchor {
                    page,
                    expected: counter.next_item(),
                    line: orphan.to_string(),
                });
            }
            QualityMode::BestEffort => {
                warn!(page, line = orphan, "table starts without an item number");
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::MalformedAnchor,
                        format!("kept line without item number as its own row: '{orphan}'"),
                    )
                    .with_page(page),
                );
                rows.push(line.to_string());
            }
            QualityMode::SkipAmbiguous => {
                warn!(page, line = orphan, "skipping line without item number");
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::MalformedAnchor,
                        format!("skipped line without item number: '{orphan}'"),
                    )
                    .with_page(page),
                );
            }
        }
    }

    Ok(MergeOutcome {
        rows,
        counter,
        warnings,
    })
}
