//! Workbook output, one sheet per result

use std::collections::HashSet;

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use super::footer_line;
use super::format::{format_cell, is_money_key};
use crate::error::{ReportError, ReportResult};
use crate::report::{CellValue, TabularResult, column_key};

const FORMAT: &str = "spreadsheet";

/// Longest sheet name the format accepts
const SHEET_NAME_LIMIT: usize = 31;
const MAX_COLUMN_WIDTH: usize = 50;
const HEADER_ROW: u32 = 4;
const INTEGER_FORMAT: &str = "#,##0";
const DECIMAL_FORMAT: &str = "#,##0.00";

/// Sheet name derived from a report title: forbidden characters removed,
/// truncated, and made unique within the workbook.
fn sheet_name(title: &str, taken: &mut HashSet<String>) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').trim();
    let base = if cleaned.is_empty() { "Reporte" } else { cleaned };

    let mut candidate: String = base.chars().take(SHEET_NAME_LIMIT).collect();
    let mut suffix = 2;
    while taken.contains(&candidate.to_lowercase()) {
        let tag = format!(" ({})", suffix);
        let room = SHEET_NAME_LIMIT - tag.chars().count();
        candidate = format!("{}{}", base.chars().take(room).collect::<String>().trim_end(), tag);
        suffix += 1;
    }
    taken.insert(candidate.to_lowercase());
    candidate
}

struct Formats {
    title: Format,
    subtitle: Format,
    header: Format,
    text: [Format; 2],
    integer: [Format; 2],
    decimal: [Format; 2],
    money: [Format; 2],
}

impl Formats {
    fn new(currency: &str) -> Self {
        let stripe = |format: Format, odd: bool| {
            let format = format.set_border(FormatBorder::Thin);
            if odd { format.set_background_color(Color::RGB(0xF3F4F6)) } else { format }
        };
        let money_format = format!("\"{} \"#,##0.00", currency.replace('"', ""));

        Self {
            title: Format::new().set_bold().set_font_size(14),
            subtitle: Format::new().set_italic().set_font_color(Color::RGB(0x4B5563)),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x1E40AF))
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            text: [false, true].map(|odd| stripe(Format::new(), odd)),
            integer: [false, true].map(|odd| stripe(Format::new().set_num_format(INTEGER_FORMAT), odd)),
            decimal: [false, true].map(|odd| stripe(Format::new().set_num_format(DECIMAL_FORMAT), odd)),
            money: [false, true].map(|odd| stripe(Format::new().set_num_format(&money_format), odd)),
        }
    }

    /// Number format for a numeric cell, `None` for anything written as text
    fn numeric(&self, key: &str, value: &CellValue, stripe: usize) -> Option<&Format> {
        match value {
            CellValue::Integer(_) => Some(&self.integer[stripe]),
            CellValue::Decimal(_) if is_money_key(key) => Some(&self.money[stripe]),
            CellValue::Decimal(_) => Some(&self.decimal[stripe]),
            _ => None,
        }
    }
}

fn write_sheet(
    worksheet: &mut Worksheet,
    result: &TabularResult,
    formats: &Formats,
    currency: &str,
    generated_at: NaiveDateTime,
) -> Result<(), XlsxError> {
    worksheet.write_string_with_format(0, 0, result.title(), &formats.title)?;
    worksheet.write_string_with_format(1, 0, result.subtitle(), &formats.subtitle)?;
    worksheet.write_string(2, 0, footer_line(generated_at, result.total_records()))?;

    let columns = result.columns();
    let keys: Vec<String> = columns.iter().map(|c| column_key(c)).collect();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();

    for (col, column) in columns.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, col as u16, column, &formats.header)?;
    }

    if result.rows().is_empty() {
        worksheet.write_string(HEADER_ROW + 1, 0, "No hay datos para mostrar")?;
    }

    for (index, row) in result.rows().iter().enumerate() {
        let sheet_row = HEADER_ROW + 1 + index as u32;
        let stripe = index % 2;
        for (col, key) in keys.iter().enumerate() {
            let col_num = col as u16;
            let Some(value) = row.get(key) else {
                continue;
            };
            widths[col] = widths[col].max(format_cell(key, value, currency).chars().count());

            match value {
                CellValue::Integer(number) => {
                    if let Some(format) = formats.numeric(key, value, stripe) {
                        worksheet.write_number_with_format(sheet_row, col_num, *number as f64, format)?;
                    }
                }
                CellValue::Decimal(number) => {
                    if let Some(format) = formats.numeric(key, value, stripe) {
                        worksheet.write_number_with_format(sheet_row, col_num, number.to_f64().unwrap_or_default(), format)?;
                    }
                }
                CellValue::Bool(flag) => {
                    worksheet.write_boolean_with_format(sheet_row, col_num, *flag, &formats.text[stripe])?;
                }
                CellValue::Text(_) | CellValue::Date(_) => {
                    worksheet.write_string_with_format(
                        sheet_row,
                        col_num,
                        format_cell(key, value, currency),
                        &formats.text[stripe],
                    )?;
                }
            }
        }
    }

    for (col, width) in widths.into_iter().enumerate() {
        worksheet.set_column_width(col as u16, (width + 2).min(MAX_COLUMN_WIDTH) as f64)?;
    }
    Ok(())
}

pub(super) fn render_workbook(
    results: &[TabularResult],
    currency: &str,
    generated_at: NaiveDateTime,
) -> ReportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let formats = Formats::new(currency);
    let mut taken = HashSet::new();

    for result in results {
        let failed = |e: XlsxError| ReportError::render(result.title(), FORMAT, e);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(result.title(), &mut taken)).map_err(failed)?;
        write_sheet(worksheet, result, &formats, currency, generated_at).map_err(failed)?;
    }

    let title = results.first().map(|r| r.title()).unwrap_or_default();
    workbook
        .save_to_buffer()
        .map_err(|e| ReportError::render(title, FORMAT, e))
}
