use rusqlite::Connection;

use crate::{
    actions::{
        history,
        report,
    },
    args::parser::{
        Action,
        CliArgs,
        GenerateCommand,
    },
    error::ReportResult,
    report::PipelineSettings,
};

pub fn handle_commands(conn: &Connection, settings: &PipelineSettings, args: CliArgs) -> ReportResult<()> {
    if let Some(action) = args.arguments {
        return match action {
            Action::Generate(cmd) => report::handle_generate(conn, settings, &cmd),
            Action::Interpret(cmd) => report::handle_interpret(conn, settings, &cmd),
            Action::History(cmd) => history::handle_history(conn, settings, &cmd),
            Action::Seed => report::handle_seed(conn),
        };
    }

    if args.raw_input.is_empty() {
        print_usage();
        return Ok(());
    }

    // Free text is a plain generate request
    let cmd = GenerateCommand {
        text: args.raw_input,
        format: None,
        report_type: None,
        output: None,
    };
    report::handle_generate(conn, settings, &cmd)
}

fn print_usage() {
    println!("reportly - reportes de ventas, productos, clientes e ingresos en lenguaje natural");
    println!();
    println!("Ejemplos:");
    println!("  reportly ventas del mes de septiembre agrupado por producto en pdf");
    println!("  reportly top 5 clientes por gasto");
    println!("  reportly ventas por categoría y también productos más vendidos");
    println!();
    println!("Comandos:");
    println!("  reportly generate <texto> [-f formato] [-t tipo] [-o carpeta]");
    println!("  reportly interpret <texto>   muestra cómo se entiende el pedido");
    println!("  reportly history [-l N]      reportes generados anteriormente");
    println!("  reportly seed                carga datos de demostración");
    println!("  -h, --help                   ayuda detallada");
}
