use crate::{
    actions::display::table::{DisplayTable, print_table},
    nlp::ReportSpecification,
    report::TabularResult,
};

pub fn print_bold(text: &str) {
    println!("\x1b[1m{}\x1b[0m", text);
}

pub fn print_red(text: &str) {
    println!("\x1b[91m{}\x1b[0m", text);
}

pub fn print_green(text: &str) {
    println!("\x1b[92m{}\x1b[0m", text);
}

pub fn print_yellow(text: &str) {
    println!("\x1b[93m{}\x1b[0m", text);
}

// title, subtitle, table, then the record count
pub fn print_result(result: &TabularResult, currency: &str) {
    print_bold(result.title());
    if !result.subtitle().is_empty() {
        println!("{}", result.subtitle());
    }
    if result.rows().is_empty() {
        print_yellow("No hay datos para mostrar");
    } else {
        print_table(&DisplayTable::from_result(result, currency));
    }
    println!("Total de registros: {}", result.total_records());
}

pub fn print_specification(spec: &ReportSpecification) {
    println!("  Solicitud: \"{}\"", spec.raw_text);
    for line in spec.describe() {
        println!("  {}", line);
    }
}
