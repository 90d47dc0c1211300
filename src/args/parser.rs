use clap::{
    Args,
    Parser,
    Subcommand,
};

use crate::nlp::{OutputFormat, ReportType};

/// generate sales, product, customer and revenue reports from plain language
///
/// e.g. reportly ventas de septiembre agrupado por producto en pdf
///
/// data is stored at ~/.local/share/reportly/reportly.db,
/// or where defined in config at ~/.config/reportly/config.json
#[derive(Debug, Parser)]
#[command(author, version, args_conflicts_with_subcommands = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub arguments: Option<Action>,
    /// report request in plain language, same as 'generate'
    #[arg(trailing_var_arg = true)]
    pub raw_input: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    /// generate one or more reports from a request
    Generate(GenerateCommand),
    /// show how a request is interpreted without running it
    Interpret(InterpretCommand),
    /// list previously generated reports
    History(HistoryCommand),
    /// fill an empty database with demo data
    Seed,
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// report request, e.g. "top 5 clientes por gasto"
    #[arg(required = true, num_args = 1.., value_parser = syntax_helper)]
    pub text: Vec<String>,
    /// output format, overrides the one named in the request,
    /// accept pdf|excel|json|pantalla and their english names
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<OutputFormat>,
    /// report type, overrides the one named in the request,
    /// accept ventas|productos|clientes|ingresos and their english names
    #[arg(short = 't', long = "type", value_parser = parse_report_type)]
    pub report_type: Option<ReportType>,
    /// directory for pdf and spreadsheet files, overrides the config
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Debug, Args)]
pub struct InterpretCommand {
    /// report request to interpret
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// limit the amount of entries returned
    #[arg(short, long, default_value_t = 20, value_parser = validate_limit)]
    pub limit: usize,
}

fn syntax_helper(s: &str) -> Result<String, String> {
    if s == "help" {
        return Err("Do you mean --help instead of help".to_string());
    }
    Ok(s.to_string())
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse().map_err(|e: crate::error::ReportError| e.to_string())
}

fn parse_report_type(s: &str) -> Result<ReportType, String> {
    s.parse().map_err(|e: crate::error::ReportError| e.to_string())
}

fn validate_limit(s: &str) -> Result<usize, String> {
    let limit: usize = s.parse().map_err(|_| "Must be a number".to_string())?;
    if limit < 1 {
        return Err("Limit cannot be less than 1".to_string());
    }
    if limit > 65536 {
        return Err("Limit cannot exceed 65536".to_string());
    }
    Ok(limit)
}
