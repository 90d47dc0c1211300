//! Output renderers
//!
//! Every renderer consumes the same [`TabularResult`]s. On-screen and
//! structured output pass results through untouched, PDF and spreadsheet
//! produce document bytes.

pub mod format;
mod pdf;
mod spreadsheet;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::error::{ReportError, ReportResult};
use crate::nlp::OutputFormat;
use crate::report::TabularResult;

pub use format::format_cell;

/// Results handed back unchanged: one result alone, several with their count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultPayload {
    Single(TabularResult),
    Multiple { count: usize, reports: Vec<TabularResult> },
}

impl ResultPayload {
    fn from_results(results: &[TabularResult]) -> Self {
        match results {
            [single] => ResultPayload::Single(single.clone()),
            many => ResultPayload::Multiple {
                count: many.len(),
                reports: many.to_vec(),
            },
        }
    }

    pub fn reports(&self) -> Vec<&TabularResult> {
        match self {
            ResultPayload::Single(result) => vec![result],
            ResultPayload::Multiple { reports, .. } => reports.iter().collect(),
        }
    }
}

/// Rendered output of one request
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    OnScreen(ResultPayload),
    Structured(ResultPayload),
    Pdf(Vec<u8>),
    Spreadsheet(Vec<u8>),
}

impl Artifact {
    /// Document bytes, for the binary formats
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Artifact::Pdf(bytes) | Artifact::Spreadsheet(bytes) => Some(bytes),
            Artifact::OnScreen(_) | Artifact::Structured(_) => None,
        }
    }
}

pub struct Renderer {
    currency: String,
    generated_at: NaiveDateTime,
}

impl Renderer {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            generated_at: Local::now().naive_local(),
        }
    }

    /// Fix the timestamp printed in document footers
    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn render(&self, results: &[TabularResult], format: OutputFormat) -> ReportResult<Artifact> {
        if results.is_empty() {
            return Err(ReportError::render("", format.as_str(), "no results to render"));
        }

        let artifact = match format {
            OutputFormat::Onscreen => Artifact::OnScreen(ResultPayload::from_results(results)),
            OutputFormat::StructuredData => Artifact::Structured(ResultPayload::from_results(results)),
            OutputFormat::Pdf => Artifact::Pdf(pdf::render_pdf(results, &self.currency, self.generated_at)?),
            OutputFormat::Spreadsheet => {
                Artifact::Spreadsheet(spreadsheet::render_workbook(results, &self.currency, self.generated_at)?)
            }
        };
        Ok(artifact)
    }
}

/// "Generado el 19/10/2026 a las 10:30 | Total de registros: 4"
fn footer_line(generated_at: NaiveDateTime, total_records: usize) -> String {
    format!(
        "Generado el {} | Total de registros: {}",
        generated_at.format("%d/%m/%Y a las %H:%M"),
        total_records
    )
}
