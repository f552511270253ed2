mod assemble;
mod csv_out;
mod error;
mod header;
mod merge;
mod model;
mod normalize;
mod options;
mod pdf_reader;
mod segment;
mod tokenize;
mod warning;

use std::path::Path;

use tracing::{debug, info};

use crate::csv_out::{write_records, write_records_to_string};
use crate::pdf_reader::{read_document, read_pdf_pages_from_bytes};

pub use assemble::{assemble_document, assemble_documents};
pub use csv_out::{
    OrderTotal, RECORD_HEADERS, REPORT_HEADERS, SUMMARY_HEADERS, summarize_orders, write_summary,
};
pub use error::ExtractError;
pub use model::{
    DocumentMetadata, DocumentOutput, PageText, Record, RowCounter, RowFields, parse_decimal,
};
pub use options::{
    ADMIN_LINE_PREFIX, OutputFormat, OutputLayout, PAGE_FOOTER_MARKER, ParseOptions, QualityMode,
    TABLE_START_MARKER, VALUE_IN_WORDS_MARKER, WriteOptions,
};
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    pub document_count: usize,
    pub row_count: usize,
    pub totals: Vec<OrderTotal>,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractionReport {
    fn from_records(
        document_count: usize,
        records: &[Record],
        warnings: Vec<ExtractWarning>,
    ) -> Self {
        Self {
            document_count,
            row_count: records.len(),
            totals: summarize_orders(records),
            warnings,
        }
    }
}

fn validate_write_options(options: &WriteOptions) -> Result<(), ExtractError> {
    if matches!(options.delimiter, b'"' | b'\n' | b'\r') || !options.delimiter.is_ascii() {
        return Err(ExtractError::InvalidOption(format!(
            "delimiter {:?} cannot separate CSV fields",
            char::from(options.delimiter)
        )));
    }
    Ok(())
}

/// Reads one purchase order (PDF, or a form-feed separated text dump) and
/// assembles its records.
pub fn parse_document(
    input: &Path,
    options: &ParseOptions,
) -> Result<DocumentOutput, ExtractError> {
    let in_document = |source| ExtractError::Document {
        path: input.to_path_buf(),
        source: Box::new(source),
    };

    let pages = read_document(input).map_err(in_document)?;
    debug!(input = %input.display(), pages = pages.len(), "read document");
    assemble_document(&pages, options).map_err(in_document)
}

/// Processes every input as an independent purchase order and writes the
/// concatenated records to `output`.
pub fn extract_orders<P>(
    inputs: &[P],
    output: &Path,
    parse_options: &ParseOptions,
    write_options: &WriteOptions,
) -> Result<ExtractionReport, ExtractError>
where
    P: AsRef<Path>,
{
    validate_write_options(write_options)?;
    if inputs.is_empty() {
        return Err(ExtractError::InvalidOption(
            "at least one input document is required".to_string(),
        ));
    }

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    for input in inputs {
        let document = parse_document(input.as_ref(), parse_options)?;
        records.extend(document.records);
        warnings.extend(document.warnings);
    }

    write_records(output, &records, write_options)?;
    info!(
        documents = inputs.len(),
        rows = records.len(),
        output = %output.display(),
        "wrote order records"
    );

    Ok(ExtractionReport::from_records(inputs.len(), &records, warnings))
}

pub fn extract_pdf_bytes_to_string(
    input_pdf: &[u8],
    parse_options: &ParseOptions,
    write_options: &WriteOptions,
) -> Result<(String, ExtractionReport), ExtractError> {
    validate_write_options(write_options)?;

    let pages = read_pdf_pages_from_bytes(input_pdf)?;
    let document = assemble_document(&pages, parse_options)?;
    let rendered = write_records_to_string(&document.records, write_options)?;

    Ok((
        rendered,
        ExtractionReport::from_records(1, &document.records, document.warnings),
    ))
}
