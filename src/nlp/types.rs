//! Types and structures for report specifications inferred from free text

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;

/// The kind of report being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportType {
    Sales,
    Products,
    Customers,
    Revenue,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Sales => "sales",
            ReportType::Products => "products",
            ReportType::Customers => "customers",
            ReportType::Revenue => "revenue",
        }
    }

    /// Label used in artifact file names and interpretation previews
    pub fn label(&self) -> &'static str {
        match self {
            ReportType::Sales => "ventas",
            ReportType::Products => "productos",
            ReportType::Customers => "clientes",
            ReportType::Revenue => "ingresos",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sales" | "ventas" | "venta" => Ok(ReportType::Sales),
            "products" | "productos" | "producto" => Ok(ReportType::Products),
            "customers" | "clientes" | "cliente" => Ok(ReportType::Customers),
            "revenue" | "ingresos" | "ingreso" => Ok(ReportType::Revenue),
            _ => Err(ReportError::Unsupported {
                kind: "report type",
                value: s.to_string(),
            }),
        }
    }
}

/// The axis transactional data is aggregated by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Grouping {
    None,
    Product,
    Customer,
    Category,
    Date,
}

impl Grouping {
    /// Grouping applied when the command names none
    pub fn default_for(report_type: ReportType) -> Self {
        match report_type {
            ReportType::Sales => Grouping::Date,
            _ => Grouping::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grouping::None => "none",
            Grouping::Product => "product",
            Grouping::Customer => "customer",
            Grouping::Category => "category",
            Grouping::Date => "date",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grouping::None => "ninguno",
            Grouping::Product => "producto",
            Grouping::Customer => "cliente",
            Grouping::Category => "categoría",
            Grouping::Date => "fecha",
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output artifact kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    Pdf,
    Spreadsheet,
    Onscreen,
    StructuredData,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Spreadsheet => "spreadsheet",
            OutputFormat::Onscreen => "onscreen",
            OutputFormat::StructuredData => "structuredData",
        }
    }

    /// File extension for binary artifacts, `None` for in-memory outputs
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Pdf => Some("pdf"),
            OutputFormat::Spreadsheet => Some("xlsx"),
            OutputFormat::Onscreen | OutputFormat::StructuredData => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "spreadsheet" | "excel" | "xlsx" | "xls" => Ok(OutputFormat::Spreadsheet),
            "onscreen" | "screen" | "pantalla" => Ok(OutputFormat::Onscreen),
            "structureddata" | "structured" | "json" => Ok(OutputFormat::StructuredData),
            _ => Err(ReportError::Unsupported {
                kind: "output format",
                value: s.to_string(),
            }),
        }
    }
}

/// Direction applied to the primary metric of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// What a ranking is ranked on: units sold ("más vendidos") or money
/// ("mayores ingresos")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMetric {
    Units,
    Amount,
}

impl SortMetric {
    pub fn label(&self) -> &'static str {
        match self {
            SortMetric::Units => "unidades vendidas",
            SortMetric::Amount => "monto",
        }
    }
}

/// Catalog price band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Cheap,
    Premium,
}

/// Auxiliary filters extracted independently of the main dimensions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    /// Top-N truncation, always positive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    /// Metric the sort order applies to; rankings without one use units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_tier: Option<PriceTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_sale: Option<bool>,
}

/// A resolved date range plus a human readable label.
///
/// Both bounds are `None` when the command carried no temporal phrase; the
/// aggregation step then substitutes the default range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub description: String,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            description: description.into(),
        }
    }

    /// A period with no bounds, waiting for the caller's default
    pub fn unresolved() -> Self {
        Self {
            start: None,
            end: None,
            description: String::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// "01/09/2026 - 30/09/2026 (Mes de Septiembre 2026)"
    pub fn label(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) => format!(
                "{} - {} ({})",
                start.format("%d/%m/%Y"),
                end.format("%d/%m/%Y"),
                self.description
            ),
            _ => "sin periodo".to_string(),
        }
    }
}

/// Structured intent derived from one free-text request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSpecification {
    pub report_type: ReportType,
    pub period: Period,
    pub grouping: Grouping,
    pub output_format: OutputFormat,
    pub filters: ReportFilters,
    /// Input segment that produced this specification
    pub raw_text: String,
}

impl ReportSpecification {
    /// Human readable lines describing how the command was interpreted
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Tipo de reporte: {}", self.report_type.label().to_uppercase()),
            format!("Formato de salida: {}", self.output_format.as_str().to_uppercase()),
        ];

        if self.period.is_resolved() {
            lines.push(format!("Periodo: {}", self.period.label()));
        } else {
            lines.push("Periodo: no indicado (se usará el último mes)".to_string());
        }

        if self.grouping != Grouping::None {
            lines.push(format!("Agrupado por: {}", self.grouping.label()));
        }
        if let Some(limit) = self.filters.limit {
            lines.push(format!("Límite: {}", limit));
        }
        let metric = self.filters.sort_by.map(|m| format!(" por {}", m.label())).unwrap_or_default();
        match self.filters.sort_order {
            Some(SortOrder::Descending) => lines.push(format!("Orden: descendente{}", metric)),
            Some(SortOrder::Ascending) => lines.push(format!("Orden: ascendente{}", metric)),
            None => {}
        }
        match self.filters.price_tier {
            Some(PriceTier::Cheap) => lines.push("Precio: económico".to_string()),
            Some(PriceTier::Premium) => lines.push("Precio: premium".to_string()),
            None => {}
        }
        if self.filters.on_sale == Some(true) {
            lines.push("Solo productos en oferta".to_string());
        }

        lines
    }
}
