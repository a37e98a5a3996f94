use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use csv::{ReaderBuilder, Trim};

use crate::domain::error::{AppError, Result};
use crate::domain::source::{CellValue, SheetTable};

/// Row/column access to a spreadsheet-like file.
pub trait TabularSource {
    fn sheet_names(&self) -> Vec<String>;

    /// Read one sheet. The first row becomes the header row.
    fn read_sheet(&mut self, name: &str) -> Result<SheetTable>;
}

/// Open a tabular source, picking the adapter from the file extension.
pub fn open_tabular_source(path: &Path) -> Result<Box<dyn TabularSource>> {
    if !path.is_file() {
        return Err(AppError::SourceNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Box::new(WorkbookSource::open(path)?)),
        "csv" => Ok(Box::new(CsvSource::open(path)?)),
        other => Err(AppError::ValidationError(format!(
            "Unsupported tabular source format '{}' ({})",
            other,
            path.display()
        ))),
    }
}

/// Spreadsheet workbook read through calamine.
pub struct WorkbookSource {
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookSource {
    pub fn open(path: &Path) -> Result<Self> {
        let workbook = open_workbook_auto(path).map_err(|e| {
            AppError::ParseError(format!(
                "Failed to open workbook {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self { workbook })
    }
}

impl TabularSource for WorkbookSource {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable> {
        let range = self.workbook.worksheet_range(name).map_err(|e| {
            AppError::ParseError(format!("Failed to read sheet '{}': {}", name, e))
        })?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|row| {
                row.iter()
                    .map(|cell| convert_cell(cell).as_text().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        let rows: Vec<Vec<CellValue>> = rows
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();

        Ok(SheetTable {
            name: name.to_string(),
            headers,
            rows,
        })
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(v) => CellValue::Int(*v),
        Data::Float(v) => CellValue::Float(*v),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

/// Delimited text file exposed as a single sheet named after the file stem.
pub struct CsvSource {
    sheet_name: String,
    records: Vec<Vec<String>>,
}

impl CsvSource {
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| {
                AppError::IoError(format!("Failed to open CSV {}: {}", path.display(), e))
            })?;

        let mut records = Vec::new();
        // Byte records so non-UTF-8 exports still load, with lossy text.
        for (index, result) in reader.byte_records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            records.push(
                record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect(),
            );
        }

        let sheet_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("data")
            .to_string();

        Ok(Self {
            sheet_name,
            records,
        })
    }
}

impl TabularSource for CsvSource {
    fn sheet_names(&self) -> Vec<String> {
        vec![self.sheet_name.clone()]
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable> {
        if name != self.sheet_name {
            return Err(AppError::NotFound(format!("CSV sheet '{}'", name)));
        }

        let mut rows = self.records.iter();
        let headers = rows.next().cloned().unwrap_or_default();
        let rows: Vec<Vec<CellValue>> = rows
            .map(|record| {
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(field.clone())
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(SheetTable {
            name: self.sheet_name.clone(),
            headers,
            rows,
        })
    }
}
