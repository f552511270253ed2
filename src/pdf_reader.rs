use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use encoding_rs::{UTF_16BE, WINDOWS_1250};
use lopdf::Document;
use lopdf::Object;
use lopdf::content::Content;
use regex::Regex;
use tracing::debug;

use crate::error::ExtractError;
use crate::model::PageText;

static ITEM_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,4} \S").expect("hardcoded item row regex is valid"));

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d,\d{2}\b").expect("hardcoded amount regex is valid"));

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split('\u{000C}')
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }
    pages
}

fn looks_decoding_broken(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();

    replacement * 8 > total || control * 5 > total
}

fn is_central_european(encoding: &str) -> bool {
    let lower = encoding.to_ascii_lowercase();
    lower.contains("1250") || lower.contains("latin2") || lower.contains("iso-8859-2")
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    if let Some(name) = encoding
        && is_central_european(name)
    {
        let (text, _, had_errors) = WINDOWS_1250.decode(bytes);
        if !had_errors {
            return text.into_owned();
        }
    }

    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    let utf16_hint = encoding.is_some_and(|name| {
        let lower = name.to_ascii_lowercase();
        lower.contains("utf16") || lower.contains("ucs2") || lower.contains("identity-h")
    });
    if utf16_hint || bytes.starts_with(&[0xFE, 0xFF]) {
        let bytes = bytes.strip_prefix(&[0xFE, 0xFF]).unwrap_or(bytes);
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    let (text, _, had_errors) = WINDOWS_1250.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Scores a candidate page text by how much it looks like an order table:
/// rows starting with an item number and comma decimal amounts.
fn extraction_quality_score(text: &str) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let mut non_empty_lines = 0_i64;
    let mut item_rows = 0_i64;
    let mut amount_lines = 0_i64;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        non_empty_lines += 1;
        if ITEM_ROW_RE.is_match(line) {
            item_rows += 1;
        }
        if AMOUNT_RE.is_match(line) {
            amount_lines += 1;
        }
    }

    let broken_penalty = if looks_decoding_broken(text) { 800 } else { 0 };
    item_rows * 40 + amount_lines * 15 + non_empty_lines - broken_penalty
}

fn choose_best_text(candidates: Vec<String>) -> String {
    candidates
        .into_iter()
        .max_by_key(|text| extraction_quality_score(text))
        .unwrap_or_default()
}

fn extract_text_from_page_content(document: &Document, page_id: lopdf::ObjectId) -> Option<String> {
    fn collect_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    text.push_str(&decode_pdf_bytes(encoding, bytes));
                }
                Object::Array(items) => {
                    collect_text(text, encoding, items);
                }
                Object::Integer(value) => {
                    if *value < -100 {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }
    }

    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                if let Some(font_name) = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                {
                    current_encoding = encodings.get(font_name).copied();
                }
            }
            "Tj" | "TJ" | "'" | "\"" => {
                collect_text(&mut current, current_encoding, &operation.operands);
            }
            "T*" | "Td" | "TD" | "ET" => {
                if !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }

    if !current.trim().is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Runs `pdf-extract`, which panics on some fonts and encodings it does not
/// know. A panic is reported like any other extraction failure.
fn run_pdf_extract<F>(extract: F) -> Result<String, String>
where
    F: FnOnce() -> Result<String, pdf_extract::OutputError>,
{
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(extract)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(error)) => Err(error.to_string()),
        Err(_) => Err("pdf-extract panicked on this document".to_string()),
    }
}

/// Picks the best text per page from three extractors: `pdf-extract`'s
/// form-feed separated output, a walk over the content stream and `lopdf`'s
/// own extractor. Fails when no extractor finds text on any page.
fn collect_pages(
    document: &Document,
    pdf_extract_text: Result<String, String>,
) -> Result<Vec<PageText>, ExtractError> {
    let pages_map = document.get_pages();
    if pages_map.is_empty() {
        return Err(ExtractError::NoPages);
    }

    let pdf_extract_error = pdf_extract_text.as_ref().err().cloned();
    if let Some(error) = &pdf_extract_error {
        debug!(%error, "pdf-extract failed, using lopdf text only");
    }
    let pdf_extract_pages = pdf_extract_text
        .ok()
        .map(|text| split_text_into_pages(&text))
        .filter(|pages| pages.len() == pages_map.len());

    let mut pages = Vec::with_capacity(pages_map.len());
    for (index, (page_no, page_id)) in pages_map.iter().enumerate() {
        let mut candidates = Vec::new();
        if let Some(text) = pdf_extract_pages
            .as_ref()
            .and_then(|split| split.get(index).cloned())
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }
        if let Some(text) = extract_text_from_page_content(document, *page_id) {
            candidates.push(text);
        }
        if let Some(text) = document
            .extract_text(&[*page_no])
            .ok()
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }

        debug!(page = *page_no, candidates = candidates.len(), "extracted page text");
        pages.push(PageText {
            page_number: *page_no,
            text: choose_best_text(candidates),
        });
    }

    if pages.iter().all(|page| page.text.trim().is_empty()) {
        return Err(ExtractError::PdfExtract(pdf_extract_error.unwrap_or_else(|| {
            "no extractable text on any page".to_string()
        })));
    }

    Ok(pages)
}

pub(crate) fn read_pdf_pages(input_pdf: &Path) -> Result<Vec<PageText>, ExtractError> {
    let document = Document::load(input_pdf)?;
    let text = run_pdf_extract(|| pdf_extract::extract_text(input_pdf));
    collect_pages(&document, text)
}

pub(crate) fn read_pdf_pages_from_bytes(input_pdf: &[u8]) -> Result<Vec<PageText>, ExtractError> {
    let document = Document::load_mem(input_pdf)?;
    let text = run_pdf_extract(|| pdf_extract::extract_text_from_mem(input_pdf));
    collect_pages(&document, text)
}

/// Reads a plain-text dump of a document whose pages are separated by form
/// feeds, the layout `pdftotext` produces.
pub(crate) fn read_text_pages(input: &Path) -> Result<Vec<PageText>, ExtractError> {
    let raw = std::fs::read_to_string(input)?;
    let pages = split_text_into_pages(&raw)
        .into_iter()
        .zip(1_u32..)
        .map(|(text, page_number)| PageText { page_number, text })
        .collect::<Vec<_>>();

    if pages.is_empty() {
        return Err(ExtractError::NoPages);
    }
    Ok(pages)
}

pub(crate) fn read_document(input: &Path) -> Result<Vec<PageText>, ExtractError> {
    let is_pdf = input
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        read_pdf_pages(input)
    } else {
        read_text_pages(input)
    }
}
