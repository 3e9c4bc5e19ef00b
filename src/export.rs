use crate::error::ExportError;
use crate::fields::{label_for, FieldSelection};
use crate::normalize::{resolve, Resolved};
use crate::types::{ExportArtifact, ResultEntry};
use chrono::NaiveDate;
use regex::Regex;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(format!("Unknown export format '{}' (expected json, csv or xlsx)", other)),
        }
    }
}

pub const SHEET_NAME: &str = "Extracted Data";
const MIN_COLUMN_WIDTH: usize = 15;

/// `extracted_data_<YYYY-MM-DD>`
pub fn default_base_name(today: NaiveDate) -> String {
    format!("extracted_data_{}", today.format("%Y-%m-%d"))
}

fn unsafe_name_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1F]"#).expect("file name regex"))
}

/// Output file name: user base name (or the dated default when blank) plus extension.
pub fn export_file_name(user_input: Option<&str>, format: ExportFormat, today: NaiveDate) -> String {
    let ext = format.extension();
    let base = user_input.map(str::trim).filter(|s| !s.is_empty());
    let base = match base {
        Some(name) => {
            let cleaned = unsafe_name_chars().replace_all(name, "_").to_string();
            let suffix = format!(".{}", ext);
            if cleaned.to_ascii_lowercase().ends_with(&suffix) && cleaned.len() > suffix.len() {
                cleaned[..cleaned.len() - suffix.len()].to_string()
            } else {
                cleaned
            }
        }
        None => default_base_name(today),
    };
    format!("{}.{}", base, ext)
}

/// One export request: format, target name, and snapshots of what to write.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub format: ExportFormat,
    pub file_name: String,
    pub selection: FieldSelection,
    pub entries: Vec<ResultEntry>,
}

impl ExportJob {
    pub fn run(self) -> Result<ExportArtifact, ExportError> {
        let bytes = match self.format {
            ExportFormat::Json => to_json(&self.entries, &self.selection)?.into_bytes(),
            ExportFormat::Csv => to_csv(&self.entries, &self.selection).into_bytes(),
            ExportFormat::Xlsx => to_xlsx(&self.entries, &self.selection)?,
        };
        tracing::info!(
            file = %self.file_name,
            format = self.format.extension(),
            rows = self.entries.len(),
            bytes = bytes.len(),
            "export serialized"
        );
        Ok(ExportArtifact {
            file_name: self.file_name,
            bytes,
        })
    }
}

/// Array of `{ "fileName": ..., <field>: ... }`, two-space indented.
pub fn to_json(entries: &[ResultEntry], selection: &FieldSelection) -> Result<String, ExportError> {
    let rows: Vec<Value> = entries
        .iter()
        .map(|entry| {
            let mut obj = Map::new();
            obj.insert("fileName".to_string(), Value::String(entry.file_name.clone()));
            for field in resolve(&entry.result, selection) {
                for (key, value) in field.json_members() {
                    obj.insert(key, value);
                }
            }
            Value::Object(obj)
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

fn csv_cell(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Long layout: one `"file","field","value"` row per file and selected field.
pub fn to_csv(entries: &[ResultEntry], selection: &FieldSelection) -> String {
    let mut out = String::from("File Name,Field,Value\n");
    for entry in entries {
        for field in resolve(&entry.result, selection) {
            for (label, value) in field.csv_rows() {
                out.push_str(&csv_cell(&entry.file_name));
                out.push(',');
                out.push_str(&csv_cell(&label));
                out.push(',');
                out.push_str(&csv_cell(&value));
                out.push('\n');
            }
        }
    }
    out
}

/// Drop characters that corrupt sheet XML (control chars except tab, newline, CR).
fn sanitize_cell(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            let u = c as u32;
            c == '\t' || c == '\n' || c == '\r' || !(u < 0x20 || u == 0x7F || u == 0xFFFE || u == 0xFFFF)
        })
        .collect()
}

fn write_text_cell_safe(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &str,
    format: &Format,
) -> Result<(), XlsxError> {
    let cleaned = sanitize_cell(text);
    if cleaned.is_empty() {
        return Ok(());
    }
    worksheet.write_string_with_format(row, col, &cleaned, format).map(|_| ())
}

pub fn sheet_headers(selection: &FieldSelection) -> Vec<String> {
    std::iter::once("File Name".to_string())
        .chain(selection.iter().map(|id| label_for(id).to_string()))
        .collect()
}

/// Header length plus two, never narrower than 15.
fn column_width(header: &str) -> f64 {
    (header.chars().count() + 2).max(MIN_COLUMN_WIDTH) as f64
}

/// Wide layout: `File Name` plus one column per selected field, one row per file.
pub fn to_xlsx(entries: &[ResultEntry], selection: &FieldSelection) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0x2563EB))
            .set_font_color(Color::RGB(0xFFFFFF));
        let text_format = Format::new();
        let number_format = Format::new().set_align(FormatAlign::Right);

        let headers = sheet_headers(selection);
        for (col, header) in headers.iter().enumerate() {
            worksheet.set_column_width(col as u16, column_width(header))?;
            write_text_cell_safe(worksheet, 0, col as u16, header, &header_format)?;
        }

        for (row_idx, entry) in entries.iter().enumerate() {
            let row = (row_idx + 1) as u32;
            write_text_cell_safe(worksheet, row, 0, &entry.file_name, &text_format)?;
            for (i, field) in resolve(&entry.result, selection).iter().enumerate() {
                let col = (i + 1) as u16;
                match &field.value {
                    Resolved::Value(Some(Value::Number(n))) if n.as_f64().is_some() => {
                        let num = n.as_f64().unwrap_or_default();
                        worksheet.write_number_with_format(row, col, num, &number_format)?;
                    }
                    _ => write_text_cell_safe(worksheet, row, col, &field.sheet_cell(), &text_format)?,
                }
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
    }
    Ok(workbook.save_to_buffer()?)
}

/// Write into `dir` without overwriting: `name.ext`, then `name_2.ext`, `name_3.ext`, ...
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let candidate = Path::new(&artifact.file_name);
    let stem = candidate
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export")
        .to_string();
    let ext = candidate.extension().and_then(|s| s.to_str()).map(str::to_string);
    let name_for = |counter: u32| {
        let base = if counter < 2 {
            stem.clone()
        } else {
            format!("{}_{}", stem, counter)
        };
        match &ext {
            Some(ext) => format!("{}.{}", base, ext),
            None => base,
        }
    };

    let mut counter = 1u32;
    let (path, mut file) = loop {
        let path = dir.join(name_for(counter));
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => break (path, file),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => counter += 1,
            Err(source) => return Err(ExportError::Io { path, source }),
        }
    };
    file.write_all(&artifact.bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "export written");
    Ok(path)
}
