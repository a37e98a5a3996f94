use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Where the active record set came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataSource {
    Primary { path: PathBuf },
    Alternate { path: PathBuf, sheet: String },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Primary { path } => write!(f, "primary ({})", path.display()),
            DataSource::Alternate { path, sheet } => {
                write!(f, "alternate ({}, sheet '{}')", path.display(), sheet)
            }
        }
    }
}

/// One cell of a tabular source, before it is mapped onto a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text form. Blank cells yield `None`.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Int(v) => v.to_string(),
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => format!("{}", *v as i64),
            CellValue::Float(v) => v.to_string(),
            CellValue::Bool(b) => b.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            CellValue::Int(v) => u64::try_from(*v).ok(),
            CellValue::Float(v) => super::kol::count_from_f64(*v),
            CellValue::Text(s) => super::kol::count_from_str(s),
            CellValue::Empty | CellValue::Bool(_) => None,
        }
    }
}

/// A single sheet read from a tabular source: first row as headers.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}
