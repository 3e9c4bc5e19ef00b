//! Print every row of an exported workbook, tab-separated.
//!
//! Usage: dump_export <file.xlsx> [sheet]

use calamine::{open_workbook_auto, DataType, Reader};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: dump_export <file.xlsx> [sheet]");
        return ExitCode::from(2);
    };
    match dump(&path, args.next().as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn dump(path: &str, sheet: Option<&str>) -> Result<(), String> {
    let mut workbook = open_workbook_auto(path).map_err(|e| format!("Could not open Excel file: {}", e))?;
    let sheet_name = match sheet {
        Some(s) => s.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or("Workbook has no sheets.")?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Sheet not found: {}", e))?;
    println!("# {} ({} rows x {} cols)", sheet_name, range.height(), range.width());
    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(|c| c.as_string().unwrap_or_default()).collect();
        println!("{}", cells.join("\t"));
    }
    Ok(())
}
