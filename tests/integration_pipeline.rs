mod common;

use std::process::Command;

use orders_ocr::{
    ExtractError, ExtractWarningCode, OutputLayout, ParseOptions, QualityMode, WriteOptions,
    extract_orders, extract_pdf_bytes_to_string, parse_document,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn two_page_order() -> Vec<String> {
    vec![
        format!(
            "{}{}",
            common::HEADER,
            common::table_page(
                &[
                    "1 Rękawice nitrylowe RN-200 para 150 3,20 1 480,00 18424000-7 ZG1",
                    "2 Taśma izolacyjna TI-19 szt 20 4,10 82,00 31651000-5 ZG1",
                    "Na podst. zap.: 55/2024",
                    "3 Kabel YDY ",
                    "3x2,5 KAB-325 m 10 5,00 50,00 44321000-6 ZG2",
                ],
                "Strona 1 z 3",
            )
        ),
        common::table_page(
            &["4 Klej montażowy K-1 szt 2 4,50 9,00 24910000-6 ZG2"],
            "Wartość słownie: tysiąc sześćset dwadzieścia jeden\nStrona 2 z 3",
        ),
        "Razem netto: 1 621,00\nStrona 3 z 3".to_string(),
    ]
}

fn pdf_order_pages() -> Vec<Vec<&'static str>> {
    vec![
        common::HEADER.lines().collect(),
        vec![
            common::TABLE_HEADER,
            "1 Rękawice nitrylowe RN-200 para 150 3,20 1 480,00 18424000-7 ZG1",
            "2 Taśma izolacyjna TI-19 szt 20 4,10 82,00 31651000-5 ZG1",
            "Wartość słownie: tysiąc pięćset sześćdziesiąt dwa",
            "Strona 2 z 3",
        ],
        vec!["Razem netto: 1 562,00", "Strona 3 z 3"],
    ]
}

#[test]
fn parses_windows_1250_pdf() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("order.pdf");
    common::create_test_pdf(&input, &pdf_order_pages()).expect("PDF fixture should be created");

    let document =
        parse_document(&input, &ParseOptions::default()).expect("PDF should parse");

    assert_eq!(document.records.len(), 2);
    assert_eq!(document.records[0].row.name, "Rękawice nitrylowe");
    assert_eq!(document.records[0].row.value, "1480,00");
    assert_eq!(document.records[1].row.cpv, "31651000-5");
    assert_eq!(document.records[1].metadata.order_number, "ZS/0458/24");
    assert_eq!(document.records[1].metadata.auction, "AU/2024/117");
    assert_eq!(
        document
            .warnings
            .iter()
            .map(|warning| (warning.code, warning.page))
            .collect::<Vec<_>>(),
        vec![(ExtractWarningCode::MissingSegment, Some(1))]
    );
}

#[test]
fn renders_pdf_bytes_to_csv_string() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("order.pdf");
    common::create_test_pdf(&input, &pdf_order_pages()).expect("PDF fixture should be created");
    let bytes = std::fs::read(&input).expect("PDF should be readable");

    let (csv, report) = extract_pdf_bytes_to_string(
        &bytes,
        &ParseOptions::default(),
        &WriteOptions::default(),
    )
    .expect("PDF bytes should convert");

    assert_eq!(report.document_count, 1);
    assert_eq!(report.row_count, 2);
    assert!((report.totals[0].total - 1562.0).abs() < 1e-9);
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("Taśma izolacyjna"), "{csv}");
}

#[test]
fn pdf_without_text_is_rejected() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("blank.pdf");
    common::create_test_pdf(&input, &[vec![], vec![]]).expect("PDF fixture should be created");

    let err = parse_document(&input, &ParseOptions::default())
        .expect_err("blank PDF should fail");

    match err {
        ExtractError::Document { source, .. } => {
            assert!(matches!(*source, ExtractError::PdfExtract(_)), "{source}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn parses_multi_page_order_dump() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("order.txt");
    common::write_order_dump(&input, &two_page_order()).expect("fixture should be written");

    let document =
        parse_document(&input, &ParseOptions::default()).expect("document should parse");

    assert_eq!(document.counter.value(), 4);
    let names = document
        .records
        .iter()
        .map(|record| record.row.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "Rękawice nitrylowe",
            "Taśma izolacyjna",
            "Kabel YDY 3x2,5",
            "Klej montażowy"
        ]
    );
    assert_eq!(document.records[0].row.value, "1480,00");
    assert_eq!(document.records[3].row.plant, "ZG2");
    assert!(
        document
            .records
            .iter()
            .all(|record| record.metadata.contract == "4021"
                && record.metadata.period_end == "30.04.2024")
    );
    assert!(document.warnings.is_empty(), "{:?}", document.warnings);
}

#[test]
fn writes_concatenated_csv_for_several_orders() {
    let dir = tempdir().expect("tempdir should be created");
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    let output = dir.path().join("orders.csv");
    common::write_order_dump(&first, &two_page_order()).expect("fixture should be written");
    let other = two_page_order()
        .into_iter()
        .map(|page| page.replace("ZS/0458/24", "ZS/0459/24"))
        .collect::<Vec<_>>();
    common::write_order_dump(&second, &other).expect("fixture should be written");

    let report = extract_orders(
        &[&first, &second],
        &output,
        &ParseOptions::default(),
        &WriteOptions::default(),
    )
    .expect("extraction should succeed");

    assert_eq!(report.document_count, 2);
    assert_eq!(report.row_count, 8);
    assert_eq!(report.totals.len(), 2);
    assert_eq!(report.totals[0].order_number, "ZS/0458/24");
    assert!((report.totals[0].total - 1621.0).abs() < 1e-9);

    let csv = std::fs::read_to_string(&output).expect("CSV should be readable");
    assert!(csv.starts_with("Lp.,Zakład,CPV,Nazwa materiału"), "{csv}");
    assert_eq!(csv.lines().count(), 9);
    assert!(csv.contains("ZS/0459/24"));
}

#[test]
fn report_layout_uses_spreadsheet_columns() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("order.txt");
    let output = dir.path().join("report.csv");
    common::write_order_dump(&input, &two_page_order()).expect("fixture should be written");

    let options = WriteOptions {
        layout: OutputLayout::Report,
        delimiter: b';',
        ..WriteOptions::default()
    };
    extract_orders(&[&input], &output, &ParseOptions::default(), &options)
        .expect("extraction should succeed");

    let csv = std::fs::read_to_string(&output).expect("CSV should be readable");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some(
            "Lp.;Umowa;Aukcja;Data zamowienia;Nr zamowienia;Nr pozycji;Lokalizacja;Nazwa;Liczba sztuk;Cena sprzedazy netto;Wartosc sprzedazy netto;Realizacja od;Realizacja do"
        )
    );
    assert_eq!(
        lines.next(),
        Some(
            "1;4021;AU/2024/117;12.03.2024;ZS/0458/24;1;ZG1;Rękawice nitrylowe;150;3.2;1480;15.03.2024;30.04.2024"
        )
    );
}

#[test]
fn missing_order_date_yields_no_records() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("broken.txt");
    let output = dir.path().join("broken.csv");
    let pages = two_page_order()
        .into_iter()
        .map(|page| page.replace("Z dnia: 12.03.2024", "Z dnia: --"))
        .collect::<Vec<_>>();
    common::write_order_dump(&input, &pages).expect("fixture should be written");

    let err = extract_orders(
        &[&input],
        &output,
        &ParseOptions::default(),
        &WriteOptions::default(),
    )
    .expect_err("missing header field should fail");

    match err {
        ExtractError::Document { source, .. } => assert!(matches!(
            *source,
            ExtractError::MissingMetadata {
                field: "order date"
            }
        )),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn skip_mode_reports_orphan_lines() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("orphan.txt");
    let mut pages = two_page_order();
    pages[1] = common::table_page(
        &[
            "ciąg dalszy z poprzedniej strony",
            "4 Klej montażowy K-1 szt 2 4,50 9,00 24910000-6 ZG2",
        ],
        "Strona 2 z 3",
    );
    common::write_order_dump(&input, &pages).expect("fixture should be written");

    let strict = parse_document(&input, &ParseOptions::default());
    assert!(strict.is_err());

    let options = ParseOptions {
        quality_mode: QualityMode::SkipAmbiguous,
        ..ParseOptions::default()
    };
    let document = parse_document(&input, &options).expect("skip mode should parse");
    assert_eq!(document.records.len(), 4);
    assert_eq!(document.warnings[0].code, ExtractWarningCode::MalformedAnchor);
    assert_eq!(document.warnings[0].page, Some(2));
}

#[test]
fn cli_writes_output_and_summary() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("order.txt");
    let output = dir.path().join("orders.json");
    let summary = dir.path().join("totals.csv");
    common::write_order_dump(&input, &two_page_order()).expect("fixture should be written");

    let status = Command::new(env!("CARGO_BIN_EXE_orders2csv"))
        .args(["extract", "--format", "json", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--summary")
        .arg(&summary)
        .status()
        .expect("CLI should run");
    assert_eq!(status.code(), Some(0));

    let json = std::fs::read_to_string(&output).expect("JSON should be readable");
    let records: Vec<serde_json::Value> = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(records.len(), 4);
    assert_eq!(records[2]["Nazwa materiału"], "Kabel YDY 3x2,5");

    let totals = std::fs::read_to_string(&summary).expect("summary should be readable");
    assert_eq!(
        totals.lines().collect::<Vec<_>>(),
        vec!["Nr. zamowienia,Suma", "ZS/0458/24,1621"]
    );
}

#[test]
fn cli_exits_with_code_2_when_no_rows() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("single.txt");
    let output = dir.path().join("single.csv");
    common::write_order_dump(&input, &[common::HEADER.to_string()])
        .expect("fixture should be written");

    let status = Command::new(env!("CARGO_BIN_EXE_orders2csv"))
        .args(["extract", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(2));
}

#[test]
fn cli_exits_with_code_1_on_bad_header() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("bad.txt");
    let output = dir.path().join("bad.csv");
    common::write_order_dump(&input, &["no header".to_string(), "end".to_string()])
        .expect("fixture should be written");

    let status = Command::new(env!("CARGO_BIN_EXE_orders2csv"))
        .args(["extract", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(1));
}
