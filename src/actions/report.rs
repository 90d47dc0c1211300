use chrono::Local;
use rusqlite::Connection;

use crate::{
    actions::display::{
        print_bold,
        print_green,
        print_result,
        print_specification,
        print_yellow,
    },
    args::parser::{
        GenerateCommand,
        InterpretCommand,
    },
    db::seed::seed_demo_data,
    error::ReportResult,
    report::{
        Artifact,
        PipelineSettings,
        ReportPipeline,
        ReportRequest,
    },
};

pub fn handle_generate(conn: &Connection, settings: &PipelineSettings, cmd: &GenerateCommand) -> ReportResult<()> {
    let mut settings = settings.clone();
    if let Some(output) = &cmd.output {
        settings.output_dir = output.into();
    }

    let request = ReportRequest::new(cmd.text.join(" "))
        .with_format(cmd.format)
        .with_report_type(cmd.report_type);
    let outcome = ReportPipeline::new(conn, &settings, Local::now().naive_local()).run(&request)?;

    match &outcome.artifact {
        Artifact::OnScreen(payload) => {
            let reports = payload.reports();
            for (index, result) in reports.iter().enumerate() {
                if reports.len() > 1 {
                    print_yellow(&format!("Reporte {} de {}", index + 1, reports.len()));
                }
                print_result(result, &settings.currency_symbol);
                println!();
            }
        }
        Artifact::Structured(payload) => {
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
        Artifact::Pdf(_) | Artifact::Spreadsheet(_) => {
            if let Some(path) = &outcome.artifact_path {
                print_green(&format!("Reporte generado: {}", path.display()));
            }
            for result in &outcome.results {
                println!("  {} ({} registros)", result.title(), result.total_records());
            }
        }
    }

    if outcome.run_ids.len() < outcome.results.len() {
        print_yellow("Aviso: el reporte no quedó registrado en el historial");
    }
    Ok(())
}

pub fn handle_interpret(conn: &Connection, settings: &PipelineSettings, cmd: &InterpretCommand) -> ReportResult<()> {
    let request = ReportRequest::new(cmd.text.join(" "));
    let specs = ReportPipeline::new(conn, settings, Local::now().naive_local()).interpret(&request)?;

    for (index, spec) in specs.iter().enumerate() {
        print_bold(&format!("Reporte {} de {}", index + 1, specs.len()));
        print_specification(spec);
    }
    Ok(())
}

pub fn handle_seed(conn: &Connection) -> ReportResult<()> {
    let created = seed_demo_data(conn, Local::now().date_naive())?;
    if created == 0 {
        print_yellow("La base de datos ya tiene productos, no se agregaron datos de demostración");
    } else {
        print_green(&format!("Se crearon {} pedidos de demostración", created));
    }
    Ok(())
}
