use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;
use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::model::{Record, parse_decimal};
use crate::options::{OutputFormat, OutputLayout, WriteOptions};

pub static RECORD_HEADERS: [&str; 15] = [
    "Lp.",
    "Zakład",
    "CPV",
    "Nazwa materiału",
    "Symbol",
    "Jm",
    "Ilość w Jm",
    "Cena",
    "Wartość",
    "Umowa",
    "Aukcja",
    "Data zamowienia",
    "Nr zamowienia",
    "Realizacja od",
    "Realizacja do",
];

pub static REPORT_HEADERS: [&str; 13] = [
    "Lp.",
    "Umowa",
    "Aukcja",
    "Data zamowienia",
    "Nr zamowienia",
    "Nr pozycji",
    "Lokalizacja",
    "Nazwa",
    "Liczba sztuk",
    "Cena sprzedazy netto",
    "Wartosc sprzedazy netto",
    "Realizacja od",
    "Realizacja do",
];

pub static SUMMARY_HEADERS: [&str; 2] = ["Nr. zamowienia", "Suma"];

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotal {
    pub order_number: String,
    pub total: f64,
}

fn record_row(record: &Record) -> Vec<String> {
    let row = &record.row;
    let metadata = &record.metadata;
    [
        &row.lp,
        &row.plant,
        &row.cpv,
        &row.name,
        &row.symbol,
        &row.unit,
        &row.quantity,
        &row.price,
        &row.value,
        &metadata.contract,
        &metadata.auction,
        &metadata.order_date,
        &metadata.order_number,
        &metadata.period_start,
        &metadata.period_end,
    ]
    .into_iter()
    .cloned()
    .collect()
}

fn number_cell(value: &str) -> String {
    parse_decimal(value).map_or_else(String::new, |number| number.to_string())
}

fn report_row(record: &Record) -> Vec<String> {
    let row = &record.row;
    let metadata = &record.metadata;
    vec![
        row.lp.clone(),
        metadata.contract.clone(),
        metadata.auction.clone(),
        metadata.order_date.clone(),
        metadata.order_number.clone(),
        row.lp.clone(),
        row.plant.clone(),
        row.name.clone(),
        number_cell(&row.quantity),
        number_cell(&row.price),
        number_cell(&row.value),
        metadata.period_start.clone(),
        metadata.period_end.clone(),
    ]
}

fn layout_rows(
    records: &[Record],
    layout: OutputLayout,
) -> (&'static [&'static str], Vec<Vec<String>>) {
    match layout {
        OutputLayout::Records => (
            RECORD_HEADERS.as_slice(),
            records.iter().map(record_row).collect(),
        ),
        OutputLayout::Report => (
            REPORT_HEADERS.as_slice(),
            records.iter().map(report_row).collect(),
        ),
    }
}

/// Totals the line values of every order, skipping values that are not
/// numbers. Orders come out sorted by order number.
#[must_use]
pub fn summarize_orders(records: &[Record]) -> Vec<OrderTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        let total = totals.entry(record.metadata.order_number.as_str()).or_insert(0.0);
        if let Some(value) = parse_decimal(&record.row.value) {
            *total += value;
        }
    }

    totals
        .into_iter()
        .map(|(order_number, total)| OrderTotal {
            order_number: order_number.to_string(),
            total,
        })
        .collect()
}

fn write_table<W: Write>(
    writer: W,
    headers: &[&str],
    rows: &[Vec<String>],
    delimiter: u8,
) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write>(
    mut writer: W,
    records: &[Record],
    layout: OutputLayout,
) -> Result<(), ExtractError> {
    match layout {
        OutputLayout::Records => serde_json::to_writer_pretty(&mut writer, records)?,
        OutputLayout::Report => {
            let (headers, rows) = layout_rows(records, layout);
            let objects = rows
                .into_iter()
                .map(|row| {
                    headers
                        .iter()
                        .map(|header| (*header).to_string())
                        .zip(row.into_iter().map(Value::String))
                        .collect::<Map<String, Value>>()
                })
                .collect::<Vec<_>>();
            serde_json::to_writer_pretty(&mut writer, &objects)?;
        }
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn render<W: Write>(
    writer: W,
    records: &[Record],
    options: &WriteOptions,
) -> Result<(), ExtractError> {
    match options.format {
        OutputFormat::Csv => {
            let (headers, rows) = layout_rows(records, options.layout);
            write_table(writer, headers, &rows, options.delimiter)
        }
        OutputFormat::Json => write_json(writer, records, options.layout),
    }
}

pub(crate) fn write_records(
    path: &Path,
    records: &[Record],
    options: &WriteOptions,
) -> Result<(), ExtractError> {
    let file = File::create(path)?;
    render(BufWriter::new(file), records, options)
}

pub(crate) fn write_records_to_string(
    records: &[Record],
    options: &WriteOptions,
) -> Result<String, ExtractError> {
    let mut bytes = Vec::new();
    render(&mut bytes, records, options)?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 output: {error}")))
}

pub fn write_summary(
    path: &Path,
    totals: &[OrderTotal],
    delimiter: u8,
) -> Result<(), ExtractError> {
    let rows = totals
        .iter()
        .map(|total| vec![total.order_number.clone(), total.total.to_string()])
        .collect::<Vec<_>>();
    write_table(
        BufWriter::new(File::create(path)?),
        &SUMMARY_HEADERS,
        &rows,
        delimiter,
    )
}
