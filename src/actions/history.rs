use rusqlite::Connection;

use crate::{
    actions::display::{
        DisplayTable,
        print_bold,
        print_table,
        print_yellow,
    },
    args::parser::HistoryCommand,
    db::runs::{
        ReportRun,
        list_runs,
    },
    error::ReportResult,
    report::PipelineSettings,
};

const HEADERS: &[&str] = &["#", "Fecha", "Tipo", "Formato", "Periodo", "Registros", "Solicitud", "Archivo"];

fn history_table(runs: &[ReportRun]) -> DisplayTable {
    let rows = runs
        .iter()
        .map(|run| {
            let period = match (run.period_start, run.period_end) {
                (Some(start), Some(end)) => format!("{} - {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y")),
                _ => run.period_description.clone(),
            };
            // the digest is for auditing, the path is what a reader needs
            let artifact = run
                .artifact_ref
                .as_deref()
                .map(|reference| reference.split("#sha256:").next().unwrap_or(reference).to_string())
                .unwrap_or_default();
            vec![
                run.id.to_string(),
                run.created_at.format("%d/%m/%Y %H:%M").to_string(),
                run.report_type.clone(),
                run.output_format.clone(),
                period,
                run.total_records.to_string(),
                run.raw_text.clone(),
                artifact,
            ]
        })
        .collect();

    DisplayTable {
        headers: HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
        numeric: HEADERS.iter().map(|h| matches!(*h, "#" | "Registros")).collect(),
    }
}

pub fn handle_history(conn: &Connection, settings: &PipelineSettings, cmd: &HistoryCommand) -> ReportResult<()> {
    let runs = list_runs(conn, &settings.requested_by, cmd.limit)?;
    if runs.is_empty() {
        print_yellow(&format!("No hay reportes registrados para {}", settings.requested_by));
        return Ok(());
    }

    print_bold(&format!("Historial de reportes de {}", settings.requested_by));
    print_table(&history_table(&runs));
    Ok(())
}
