//! One command in, one artifact out
//!
//! interpret -> settle shared defaults -> aggregate -> audit -> render -> write

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::db::runs::{attach_artifact, record_run};
use crate::error::ReportResult;
use crate::nlp::{self, Grouping, OutputFormat, ReportSpecification, ReportType, TemporalResolver};
use crate::report::{Artifact, PriceTiers, QueryBuilder, Renderer, TabularResult};

/// Settings the pipeline needs from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub currency_symbol: String,
    pub output_dir: PathBuf,
    /// Row cap for on-screen reports without an explicit limit, 0 disables it
    pub onscreen_limit: usize,
    pub price_tiers: PriceTiers,
    pub requested_by: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "Bs".to_string(),
            output_dir: PathBuf::from("."),
            onscreen_limit: 100,
            price_tiers: PriceTiers::default(),
            requested_by: "local".to_string(),
        }
    }
}

/// A command plus the caller's explicit overrides
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub text: String,
    pub format: Option<OutputFormat>,
    pub report_type: Option<ReportType>,
}

impl ReportRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: Option<OutputFormat>) -> Self {
        self.format = format;
        self
    }

    pub fn with_report_type(mut self, report_type: Option<ReportType>) -> Self {
        self.report_type = report_type;
        self
    }
}

#[derive(Debug)]
pub struct ReportOutcome {
    pub specifications: Vec<ReportSpecification>,
    pub results: Vec<TabularResult>,
    pub artifact: Artifact,
    /// Where the document was written, for the binary formats
    pub artifact_path: Option<PathBuf>,
    /// Audit entries created, empty when the audit write failed
    pub run_ids: Vec<i64>,
}

pub struct ReportPipeline<'a> {
    conn: &'a Connection,
    settings: &'a PipelineSettings,
    now: NaiveDateTime,
}

impl<'a> ReportPipeline<'a> {
    /// `now` drives both period resolution and the audit timestamps
    pub fn new(conn: &'a Connection, settings: &'a PipelineSettings, now: NaiveDateTime) -> Self {
        Self { conn, settings, now }
    }

    fn resolver(&self) -> TemporalResolver {
        TemporalResolver::with_today(self.now.date())
    }

    /// Interpret a command into the specifications that would be executed,
    /// without touching the data source.
    ///
    /// All segments of one command share a single output format: the
    /// override, else the first explicit one, else on-screen. Segments with no
    /// period take the first period a sibling named, else the default month.
    pub fn interpret(&self, request: &ReportRequest) -> ReportResult<Vec<ReportSpecification>> {
        let resolver = self.resolver();
        let mut specs = nlp::interpret(&request.text, resolver)?;

        let format = request
            .format
            .or_else(|| {
                specs
                    .iter()
                    .map(|spec| spec.output_format)
                    .find(|format| *format != OutputFormat::Onscreen)
            })
            .unwrap_or(OutputFormat::Onscreen);
        let shared_period = specs
            .iter()
            .find(|spec| spec.period.is_resolved())
            .map(|spec| spec.period.clone())
            .unwrap_or_else(|| resolver.resolve(&request.text));
        let onscreen_limit = Some(self.settings.onscreen_limit).filter(|limit| *limit > 0);

        for spec in &mut specs {
            spec.output_format = format;
            if let Some(report_type) = request.report_type {
                if spec.grouping == Grouping::default_for(spec.report_type) {
                    spec.grouping = Grouping::default_for(report_type);
                }
                spec.report_type = report_type;
            }
            if !spec.period.is_resolved() {
                spec.period = shared_period.clone();
            }
            if format == OutputFormat::Onscreen && spec.filters.limit.is_none() {
                spec.filters.limit = onscreen_limit;
            }
            debug!(?spec, "settled specification");
        }

        Ok(specs)
    }

    /// Run a command end to end
    pub fn run(&self, request: &ReportRequest) -> ReportResult<ReportOutcome> {
        let specs = self.interpret(request)?;
        let format = specs
            .first()
            .map(|spec| spec.output_format)
            .unwrap_or(OutputFormat::Onscreen);

        let builder = QueryBuilder::new(self.conn, self.resolver()).with_price_tiers(self.settings.price_tiers);
        let results = specs
            .iter()
            .map(|spec| builder.build(spec))
            .collect::<ReportResult<Vec<_>>>()?;

        let run_ids = self.record_runs(&specs, &results);

        let artifact = Renderer::new(&self.settings.currency_symbol)
            .with_generated_at(self.now)
            .render(&results, format)?;

        let artifact_path = match (artifact.bytes(), format.extension()) {
            (Some(bytes), Some(extension)) => {
                let path = self.settings.output_dir.join(artifact_file_name(&specs, &results, extension));
                write_artifact(&path, bytes)?;
                self.attach_runs(&run_ids, &artifact_reference(&path, bytes));
                Some(path)
            }
            _ => None,
        };

        info!(
            reports = results.len(),
            format = format.as_str(),
            path = ?artifact_path,
            "report generated"
        );

        Ok(ReportOutcome {
            specifications: specs,
            results,
            artifact,
            artifact_path,
            run_ids,
        })
    }

    /// Best effort: a failed audit write never fails the request
    fn record_runs(&self, specs: &[ReportSpecification], results: &[TabularResult]) -> Vec<i64> {
        let mut ids = Vec::with_capacity(specs.len());
        for (spec, result) in specs.iter().zip(results) {
            match record_run(self.conn, &self.settings.requested_by, spec, result, self.now) {
                Ok(id) => ids.push(id),
                Err(e) => warn!(error = %e, title = result.title(), "could not record report run"),
            }
        }
        ids
    }

    fn attach_runs(&self, run_ids: &[i64], artifact_ref: &str) {
        for id in run_ids {
            if let Err(e) = attach_artifact(self.conn, *id, artifact_ref) {
                warn!(error = %e, run_id = id, "could not attach artifact to report run");
            }
        }
    }
}

/// "Reporte de Ventas por Producto" -> "Reporte_de_Ventas_por_Producto"
fn title_slug(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// File name for a document: `reporte_<type>_<Title>.<ext>` for one report,
/// `reporte_multiple_<N>_reportes.<ext>` for several.
pub fn artifact_file_name(specs: &[ReportSpecification], results: &[TabularResult], extension: &str) -> String {
    match (specs, results) {
        ([spec], [result]) => format!(
            "reporte_{}_{}.{}",
            spec.report_type.label(),
            title_slug(result.title()),
            extension
        ),
        _ => format!("reporte_multiple_{}_reportes.{}", results.len(), extension),
    }
}

fn write_artifact(path: &Path, bytes: &[u8]) -> ReportResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Path plus content digest, stored on the audit entry
fn artifact_reference(path: &Path, bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{}#sha256:{:x}", path.display(), hasher.finalize())
}
