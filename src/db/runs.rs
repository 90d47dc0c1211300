//! Audit records for executed reports
//!
//! A run is written once per executed specification. The only later change
//! allowed is attaching the rendered artifact reference, and only once.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Row, params};

use crate::error::ReportResult;
use crate::nlp::ReportSpecification;
use crate::report::TabularResult;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRun {
    pub id: i64,
    pub requested_by: String,
    pub raw_text: String,
    pub report_type: String,
    pub grouping: String,
    pub output_format: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub period_description: String,
    pub filters_json: String,
    pub result_json: String,
    pub total_records: i64,
    pub artifact_ref: Option<String>,
    pub created_at: NaiveDateTime,
}

impl ReportRun {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ReportRun {
            id: row.get("id")?,
            requested_by: row.get("requested_by")?,
            raw_text: row.get("raw_text")?,
            report_type: row.get("report_type")?,
            grouping: row.get("grouping")?,
            output_format: row.get("output_format")?,
            period_start: row.get("period_start")?,
            period_end: row.get("period_end")?,
            period_description: row.get("period_description")?,
            filters_json: row.get("filters_json")?,
            result_json: row.get("result_json")?,
            total_records: row.get("total_records")?,
            artifact_ref: row.get("artifact_ref")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Store the specification as executed together with its result
pub fn record_run(
    conn: &Connection,
    requested_by: &str,
    spec: &ReportSpecification,
    result: &TabularResult,
    created_at: NaiveDateTime,
) -> ReportResult<i64> {
    let filters_json = serde_json::to_string(&spec.filters)?;
    let result_json = serde_json::to_string(result)?;

    conn.execute(
        "INSERT INTO report_runs (
            requested_by, raw_text, report_type, grouping, output_format,
            period_start, period_end, period_description,
            filters_json, result_json, total_records, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            requested_by,
            spec.raw_text,
            spec.report_type.as_str(),
            spec.grouping.as_str(),
            spec.output_format.as_str(),
            spec.period.start,
            spec.period.end,
            spec.period.description,
            filters_json,
            result_json,
            result.total_records() as i64,
            created_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Attach the artifact reference to a run. Returns false when the run does
/// not exist or already carries a reference.
pub fn attach_artifact(conn: &Connection, run_id: i64, artifact_ref: &str) -> ReportResult<bool> {
    let updated = conn.execute(
        "UPDATE report_runs SET artifact_ref = ?1 WHERE id = ?2 AND artifact_ref IS NULL",
        params![artifact_ref, run_id],
    )?;
    Ok(updated == 1)
}

/// Most recent runs of one identity, newest first
pub fn list_runs(conn: &Connection, requested_by: &str, limit: usize) -> ReportResult<Vec<ReportRun>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM report_runs
         WHERE requested_by = ?1
         ORDER BY created_at DESC, id DESC
         LIMIT ?2",
    )?;
    let runs = stmt
        .query_map(params![requested_by, limit as i64], ReportRun::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(runs)
}
