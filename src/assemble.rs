use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::header::extract_metadata;
use crate::merge::merge_wrapped_rows;
use crate::model::{DocumentOutput, PageText, Record, RowCounter, RowFields};
use crate::normalize::normalize_line;
use crate::options::ParseOptions;
use crate::segment::locate_segment;
use crate::tokenize::{REQUIRED_TOKENS, tokenize_line};
use crate::warning::{ExtractWarning, WarningCode};

/// Turns the pages of one purchase order into records.
///
/// The first page carries the order header, the last page only the order
/// summary, so table rows are read from every page but the last. Item
/// numbering continues across pages.
pub fn assemble_document(
    pages: &[PageText],
    options: &ParseOptions,
) -> Result<DocumentOutput, ExtractError> {
    options.validate().map_err(ExtractError::InvalidOption)?;

    let Some((_, table_pages)) = pages.split_last() else {
        return Err(ExtractError::NoPages);
    };
    let metadata = extract_metadata(&pages[0].text)?;

    let mut counter = RowCounter::default();
    let mut rows: Vec<RowFields> = Vec::new();
    let mut warnings = Vec::new();

    for page in table_pages {
        let Some(segment) = locate_segment(&page.text, &options.start_marker, &options.end_markers)
        else {
            debug!(page = page.page_number, "no item table on page");
            warnings.push(
                ExtractWarning::new(WarningCode::MissingSegment, "no item table found on page")
                    .with_page(page.page_number),
            );
            continue;
        };

        let outcome = merge_wrapped_rows(
            segment.lines(),
            counter,
            page.page_number,
            &options.admin_prefix,
            options.quality_mode,
        )?;
        debug!(
            page = page.page_number,
            rows = outcome.rows.len(),
            last_item = outcome.counter.value(),
            "merged table rows"
        );
        counter = outcome.counter;
        warnings.extend(outcome.warnings);

        for line in outcome.rows {
            if line.contains(options.admin_prefix.as_str()) {
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::AdministrativeLine,
                        "row contains an administrative note and was left out",
                    )
                    .with_page(page.page_number),
                );
                continue;
            }

            let normalized = normalize_line(&line);
            let fields = tokenize_line(&normalized);
            if normalized.split_whitespace().count() < REQUIRED_TOKENS {
                warn!(page = page.page_number, row = %fields.lp, "row has missing columns");
                let mut warning = ExtractWarning::new(
                    WarningCode::ShortLine,
                    format!("row has missing columns: '{}'", normalized.trim()),
                )
                .with_page(page.page_number);
                if let Ok(row) = fields.lp.parse::<u32>() {
                    warning = warning.with_row(row);
                }
                warnings.push(warning);
            }
            rows.push(fields);
        }
    }

    if rows.is_empty() {
        warnings.push(ExtractWarning::new(
            WarningCode::NoRowsDetected,
            "no order rows were detected in the document",
        ));
    }

    let records = rows
        .into_iter()
        .map(|row| Record {
            row,
            metadata: metadata.clone(),
        })
        .collect();

    Ok(DocumentOutput {
        records,
        counter,
        warnings,
    })
}

/// Assembles several independent documents and concatenates their records
/// in input order. Each document gets its own item numbering.
pub fn assemble_documents(
    documents: &[Vec<PageText>],
    options: &ParseOptions,
) -> Result<DocumentOutput, ExtractError> {
    let mut combined = DocumentOutput {
        records: Vec::new(),
        counter: RowCounter::default(),
        warnings: Vec::new(),
    };

    for pages in documents {
        let output = assemble_document(pages, options)?;
        combined.counter = output.counter;
        combined.records.extend(output.records);
        combined.warnings.extend(output.warnings);
    }

    Ok(combined)
}
