//! Paginated document output (A4 portrait, built-in Helvetica)

use chrono::NaiveDateTime;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

use super::footer_line;
use super::format::format_cell;
use crate::error::{ReportError, ReportResult};
use crate::report::{TabularResult, column_key};

const FORMAT: &str = "pdf";

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const ROW_HEIGHT: f32 = 16.0;
const TABLE_TOP: f32 = 735.0;
const TABLE_BOTTOM: f32 = 60.0;
const CELL_FONT_SIZE: f32 = 8.0;

/// Rows that fit under the header row on one page
const ROWS_PER_PAGE: usize = ((TABLE_TOP - TABLE_BOTTOM) / ROW_HEIGHT) as usize - 1;

// 1e40af and f3f4f6
const HEADER_FILL: [f32; 3] = [0.118, 0.251, 0.686];
const STRIPE_FILL: [f32; 3] = [0.953, 0.957, 0.965];

/// Text in the single-byte encoding the standard fonts expect. Spanish
/// letters all live in the Latin-1 range.
fn pdf_text(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| if (c as u32) < 0x100 { c as u32 as u8 } else { b'?' })
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

/// Cut text so it roughly fits the given width
fn fit(text: &str, width: f32, font_size: f32) -> String {
    let max_chars = (width / (font_size * 0.5)).max(1.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(2)).collect();
    cut.push_str("..");
    cut
}

/// Operation list for one page
struct PageBuilder {
    ops: Vec<Operation>,
}

impl PageBuilder {
    fn new() -> Self {
        Self { ops: Vec::new() }
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new("Tj", vec![pdf_text(text)]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn fill_color(&mut self, [r, g, b]: [f32; 3]) {
        self.ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]));
        self.ops.push(Operation::new("f", vec![]));
    }

    fn table_row(&mut self, cells: &[String], y: f32, column_width: f32, font: &str) {
        for (i, cell) in cells.iter().enumerate() {
            let x = MARGIN + 4.0 + column_width * i as f32;
            self.text(font, CELL_FONT_SIZE, x, y + 5.0, &fit(cell, column_width - 6.0, CELL_FONT_SIZE));
        }
    }

    fn encode(self, title: &str) -> ReportResult<Vec<u8>> {
        Content { operations: self.ops }
            .encode()
            .map_err(|e| ReportError::render(title, FORMAT, e))
    }
}

/// One or more pages for a single result
fn result_pages(
    result: &TabularResult,
    position: Option<(usize, usize)>,
    currency: &str,
    generated_at: NaiveDateTime,
) -> ReportResult<Vec<Vec<u8>>> {
    let columns = result.columns();
    let keys: Vec<String> = columns.iter().map(|c| column_key(c)).collect();
    let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / columns.len().max(1) as f32;

    let body: Vec<Vec<String>> = result
        .rows()
        .iter()
        .map(|row| {
            keys.iter()
                .map(|key| row.get(key).map(|value| format_cell(key, value, currency)).unwrap_or_default())
                .collect()
        })
        .collect();

    let chunks: Vec<&[Vec<String>]> = if body.is_empty() {
        vec![&[]]
    } else {
        body.chunks(ROWS_PER_PAGE).collect()
    };
    let page_count = chunks.len();

    let mut pages = Vec::with_capacity(page_count);
    for (page_index, chunk) in chunks.into_iter().enumerate() {
        let mut page = PageBuilder::new();

        page.fill_color([0.0, 0.0, 0.0]);
        let mut title = result.title().to_string();
        if page_index > 0 {
            title.push_str(" (continuación)");
        }
        page.text("F2", 16.0, MARGIN, PAGE_HEIGHT - 50.0, &title);
        if !result.subtitle().is_empty() {
            page.text("F1", 10.0, MARGIN, PAGE_HEIGHT - 68.0, result.subtitle());
        }
        if let Some((k, n)) = position {
            page.text("F1", 9.0, MARGIN, PAGE_HEIGHT - 84.0, &format!("Reporte {} de {}", k, n));
        }

        page.fill_color(HEADER_FILL);
        page.rect(MARGIN, TABLE_TOP - ROW_HEIGHT, PAGE_WIDTH - 2.0 * MARGIN, ROW_HEIGHT);
        page.fill_color([1.0, 1.0, 1.0]);
        page.table_row(columns, TABLE_TOP - ROW_HEIGHT, column_width, "F2");

        if chunk.is_empty() {
            page.fill_color([0.4, 0.4, 0.4]);
            page.text("F1", 10.0, MARGIN + 4.0, TABLE_TOP - 2.0 * ROW_HEIGHT + 4.0, "No hay datos para mostrar");
        }
        for (i, cells) in chunk.iter().enumerate() {
            let y = TABLE_TOP - ROW_HEIGHT * (i + 2) as f32;
            if i % 2 == 1 {
                page.fill_color(STRIPE_FILL);
                page.rect(MARGIN, y, PAGE_WIDTH - 2.0 * MARGIN, ROW_HEIGHT);
            }
            page.fill_color([0.0, 0.0, 0.0]);
            page.table_row(cells, y, column_width, "F1");
        }

        page.fill_color([0.4, 0.4, 0.4]);
        let mut footer = footer_line(generated_at, result.total_records());
        if page_count > 1 {
            footer.push_str(&format!(" | Página {} de {}", page_index + 1, page_count));
        }
        page.text("F1", 8.0, MARGIN, 30.0, &footer);

        pages.push(page.encode(result.title())?);
    }

    Ok(pages)
}

/// Render every result into one document, each starting on a fresh page
pub(super) fn render_pdf(
    results: &[TabularResult],
    currency: &str,
    generated_at: NaiveDateTime,
) -> ReportResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let total = results.len();
    let mut kids: Vec<ObjectId> = Vec::new();
    for (index, result) in results.iter().enumerate() {
        let position = (total > 1).then_some((index + 1, total));
        for content in result_pages(result, position, currency, generated_at)? {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id);
        }
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "Count" => kids.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let title = results.first().map(|r| r.title()).unwrap_or_default();
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ReportError::render(title, FORMAT, e))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CellValue, Row};
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    fn result(title: &str, row_count: usize) -> TabularResult {
        let columns = ["Producto", "Total Ventas"];
        let rows = (0..row_count)
            .map(|i| {
                Row::from_columns(
                    &columns,
                    vec![format!("Producto {}", i).into(), CellValue::Decimal(rust_decimal::Decimal::new(1_050, 2))],
                )
            })
            .collect();
        TabularResult::new(title, "Periodo: 01/09/2026 - 30/09/2026", columns.iter().map(|c| c.to_string()).collect(), rows)
            .unwrap()
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    /// Every string shown on each page, in page order
    fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => Some(bytes.iter().map(|&b| b as char).collect()),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    fn has(page: &[String], text: &str) -> bool {
        page.iter().any(|shown| shown == text)
    }

    #[test]
    fn test_single_result_single_page() {
        let bytes = render_pdf(&[result("Reporte de Ventas por Producto", 3)], "Bs", generated_at()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_page_shows_title_header_and_footer() {
        let bytes = render_pdf(&[result("Reporte de Ventas por Producto", 3)], "Bs", generated_at()).unwrap();
        let pages = page_texts(&bytes);
        let page = &pages[0];

        assert!(has(page, "Reporte de Ventas por Producto"));
        assert!(has(page, "Periodo: 01/09/2026 - 30/09/2026"));
        assert!(has(page, "Producto") && has(page, "Total Ventas"));
        assert!(has(page, "Bs 10.50"));
        assert!(has(page, "Generado el 19/10/2026 a las 10:00 | Total de registros: 3"));
        assert!(!page.iter().any(|shown| shown.starts_with("Reporte 1 de")));
    }

    #[test]
    fn test_several_results_are_numbered() {
        let bytes = render_pdf(&[result("Uno", 1), result("Dos", 1), result("Tres", 1)], "Bs", generated_at()).unwrap();
        let pages = page_texts(&bytes);

        assert_eq!(pages.len(), 3);
        for (i, (page, title)) in pages.iter().zip(["Uno", "Dos", "Tres"]).enumerate() {
            assert!(has(page, title));
            assert!(has(page, &format!("Reporte {} de 3", i + 1)));
        }
    }

    #[test]
    fn test_continuation_page_repeats_header() {
        let rows = ROWS_PER_PAGE + 1;
        let bytes = render_pdf(&[result("Reporte", rows)], "Bs", generated_at()).unwrap();
        let pages = page_texts(&bytes);

        assert!(has(&pages[0], "Reporte"));
        assert!(has(&pages[0], &format!("Generado el 19/10/2026 a las 10:00 | Total de registros: {} | Página 1 de 2", rows)));

        let second = &pages[1];
        assert!(has(second, "Reporte (continuación)"));
        assert!(has(second, "Producto") && has(second, "Total Ventas"));
        assert!(has(second, &format!("Producto {}", ROWS_PER_PAGE)));
        assert!(!has(second, "Producto 0"));
        assert!(has(second, &format!("Generado el 19/10/2026 a las 10:00 | Total de registros: {} | Página 2 de 2", rows)));
    }

    #[test]
    fn test_empty_result_still_renders_a_page() {
        let bytes = render_pdf(&[result("Reporte de Ventas por Producto", 0)], "Bs", generated_at()).unwrap();
        assert_eq!(page_count(&bytes), 1);
        assert!(has(&page_texts(&bytes)[0], "No hay datos para mostrar"));
    }

    #[test]
    fn test_long_result_continues_on_new_pages() {
        let bytes = render_pdf(&[result("Reporte", ROWS_PER_PAGE + 1)], "Bs", generated_at()).unwrap();
        assert_eq!(page_count(&bytes), 2);
    }

    #[test]
    fn test_each_result_starts_a_page() {
        let bytes = render_pdf(&[result("Uno", 2), result("Dos", 2), result("Tres", 0)], "Bs", generated_at()).unwrap();
        assert_eq!(page_count(&bytes), 3);
    }

    #[test]
    fn test_fit_truncates_long_text() {
        assert_eq!(fit("Mouse", 100.0, 8.0), "Mouse");
        assert_eq!(fit("Audífonos Inalámbricos de Alta Gama", 40.0, 8.0), "Audífono..");
    }

    #[test]
    fn test_pdf_text_uses_latin1_bytes() {
        let Object::String(bytes, _) = pdf_text("Sí") else {
            panic!("expected a string object");
        };
        assert_eq!(bytes, vec![b'S', 0xED]);

        let Object::String(bytes, _) = pdf_text("€") else {
            panic!("expected a string object");
        };
        assert_eq!(bytes, vec![b'?']);
    }
}
