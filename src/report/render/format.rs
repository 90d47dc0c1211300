use rust_decimal::Decimal;

use crate::report::CellValue;

/// Key fragments that mark a column as money
const MONEY_MARKERS: &[&str] = &["total", "monto", "precio", "vendido"];

pub fn is_money_key(key: &str) -> bool {
    MONEY_MARKERS.iter().any(|marker| key.contains(marker))
}

/// "1234567.5" -> "1,234,567.50"
pub fn group_thousands(value: Decimal) -> String {
    let mut value = value.round_dp(2);
    value.rescale(2);
    let text = value.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((&text, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Display text for a cell stored under `key`
pub fn format_cell(key: &str, value: &CellValue, currency: &str) -> String {
    match value {
        CellValue::Text(text) => text.clone(),
        CellValue::Integer(number) => number.to_string(),
        CellValue::Decimal(number) if is_money_key(key) => {
            format!("{} {}", currency, group_thousands(*number))
        }
        CellValue::Decimal(number) => group_thousands(*number),
        CellValue::Date(date) => date.format("%d/%m/%Y").to_string(),
        CellValue::Bool(true) => "Sí".to_string(),
        CellValue::Bool(false) => "No".to_string(),
    }
}
