use std::path::Path;

use encoding_rs::WINDOWS_1250;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

pub const HEADER: &str = "ZAMÓWIENIE DOSTAWY\n\
    Warunki płatności: AUKCJA 4021 AU/2024/117\n\
    Z dnia: 12.03.2024 Nr ZS/0458/24 Oświadczamy, że akceptujemy warunki\n\
    Termin realizacji od 15.03.2024 do 30.04.2024\n";

pub const TABLE_HEADER: &str =
    "Lp. CPV Nazwa materiału Symbol Jm Ilość w Jm Cena Wartość Zap. Zakład";

/// Page text with the column header line, the given table lines and a footer.
pub fn table_page(lines: &[&str], footer: &str) -> String {
    format!("{TABLE_HEADER}\n{}\n{footer}\n", lines.join("\n"))
}

/// Writes the pages as a text dump, one form feed between pages.
pub fn write_order_dump(path: &Path, pages: &[String]) -> std::io::Result<()> {
    std::fs::write(path, pages.join("\u{000C}"))
}

/// Builds a PDF with one text line per entry. Strings are stored as
/// Windows-1250 bytes under a font whose encoding says so, the way Polish
/// office software exports them.
pub fn create_test_pdf(path: &Path, pages: &[Vec<&str>]) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "CP1250",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();

    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 9.into()]),
            Operation::new("TL", vec![12.into()]),
            Operation::new("Td", vec![30.into(), 800.into()]),
        ];

        for (index, line) in lines.iter().enumerate() {
            let (bytes, _, had_errors) = WINDOWS_1250.encode(line);
            if had_errors {
                return Err(format!("line is not representable in Windows-1250: {line}").into());
            }
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(bytes.into_owned())],
            ));
            if index + 1 < lines.len() {
                operations.push(Operation::new("T*", vec![]));
            }
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)?;
    Ok(())
}
