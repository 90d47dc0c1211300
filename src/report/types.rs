//! Format-agnostic tabular results

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ReportError, ReportResult};
use crate::nlp::text::fold_accents;

/// Connective words dropped when turning a display column into a row key
const CONNECTIVES: &[&str] = &["de", "del", "la"];

/// Row key for a display column: "Cantidad de Ventas" -> "cantidad_ventas",
/// "Categoría" -> "categoria".
///
/// Both the query builder and the renderers resolve cells through this, so a
/// column can never drift from the key its values are stored under.
pub fn column_key(column: &str) -> String {
    let lowered = column.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|word| !CONNECTIVES.contains(word))
        .collect();
    fold_accents(&words.join("_"))
}

/// A single typed cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Bool(bool),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Decimal(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// One result row keyed by normalized column keys
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, CellValue>);

impl Row {
    /// Pair each display column with its value, in column order
    pub fn from_columns(columns: &[&str], values: Vec<CellValue>) -> Self {
        Row(columns
            .iter()
            .map(|column| column_key(column))
            .zip(values)
            .collect())
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.0.get(key)
    }

    /// Value under a display column, resolved through [`column_key`]
    pub fn cell(&self, column: &str) -> Option<&CellValue> {
        self.0.get(&column_key(column))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Output of one aggregation, consumed unchanged by every renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabularResult {
    title: String,
    subtitle: String,
    columns: Vec<String>,
    rows: Vec<Row>,
    total_records: usize,
}

impl TabularResult {
    /// Build a result, checking that every row carries exactly the keys its
    /// columns normalize to.
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Row>,
    ) -> ReportResult<Self> {
        let title = title.into();
        let expected: BTreeSet<String> = columns.iter().map(|c| column_key(c)).collect();
        if expected.len() != columns.len() {
            return Err(ReportError::MalformedRows {
                title,
                message: "two columns normalize to the same key".to_string(),
            });
        }

        for (index, row) in rows.iter().enumerate() {
            let actual: BTreeSet<String> = row.keys().map(str::to_string).collect();
            if actual != expected {
                let missing: Vec<_> = expected.difference(&actual).cloned().collect();
                let extra: Vec<_> = actual.difference(&expected).cloned().collect();
                return Err(ReportError::MalformedRows {
                    title,
                    message: format!("row {} missing {:?}, unexpected {:?}", index + 1, missing, extra),
                });
            }
        }

        let total_records = rows.len();
        Ok(Self {
            title,
            subtitle: subtitle.into(),
            columns,
            rows,
            total_records,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_key() {
        assert_eq!(column_key("Cliente"), "cliente");
        assert_eq!(column_key("Total Gastado"), "total_gastado");
        assert_eq!(column_key("Cantidad de Ventas"), "cantidad_ventas");
        assert_eq!(column_key("Categoría"), "categoria");
        assert_eq!(column_key("Fecha de la Venta"), "fecha_venta");
        assert_eq!(column_key("Precio del Producto"), "precio_producto");
    }

    #[test]
    fn test_column_key_decomposed_accents() {
        assert_eq!(column_key("Categori\u{301}a"), column_key("Categoría"));
        assert_eq!(column_key("Ti\u{301}tulo de la Venta"), "titulo_venta");
    }

    #[test]
    fn test_row_resolves_display_columns() {
        let row = Row::from_columns(&["Producto", "Cantidad Vendida"], vec!["Mouse".into(), 3i64.into()]);
        assert_eq!(row.cell("Producto"), Some(&CellValue::Text("Mouse".to_string())));
        assert_eq!(row.get("cantidad_vendida"), Some(&CellValue::Integer(3)));
    }

    #[test]
    fn test_total_records_matches_rows() {
        let columns = vec!["Cliente".to_string(), "Total Gastado".to_string()];
        let rows = vec![
            Row::from_columns(&["Cliente", "Total Gastado"], vec!["Ana".into(), Decimal::new(1000, 2).into()]),
            Row::from_columns(&["Cliente", "Total Gastado"], vec!["Bruno".into(), Decimal::new(500, 2).into()]),
        ];
        let result = TabularResult::new("Reporte de Clientes", "", columns, rows).unwrap();
        assert_eq!(result.total_records(), 2);
        assert_eq!(result.total_records(), result.rows().len());
    }

    #[test]
    fn test_rows_with_wrong_keys_are_rejected() {
        let columns = vec!["Cliente".to_string(), "Total Gastado".to_string()];
        let rows = vec![Row::from_columns(&["Cliente"], vec!["Ana".into()])];
        let err = TabularResult::new("Reporte de Clientes", "", columns, rows).unwrap_err();
        assert_eq!(err.category(), "render");
        assert!(err.to_string().contains("total_gastado"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let columns = vec!["Total Vendido".to_string()];
        let rows = vec![Row::from_columns(&["Total Vendido"], vec![Decimal::new(225500, 2).into()])];
        let result = TabularResult::new("Reporte General de Ventas", "Periodo", columns, rows).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalRecords"], 1);
        assert_eq!(json["rows"][0]["total_vendido"], "2255.00");
    }
}
