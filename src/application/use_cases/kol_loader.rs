use std::path::Path;

use tracing::{debug, info, warn};

use crate::application::use_cases::kol_columns::{map_headers, select_sheet, CanonicalField};
use crate::domain::error::{AppError, Result};
use crate::domain::kol::Kol;
use crate::domain::source::{CellValue, DataSource, SheetTable};
use crate::infrastructure::sources::{open_tabular_source, read_kol_json, TabularSource};

/// Records produced by a load, tagged with the source that supplied them.
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    pub records: Vec<Kol>,
    pub source: DataSource,
    /// Why the alternate source was requested but not used.
    pub fallback_reason: Option<String>,
}

/// Outcome of the alternate stage. Anything but `Loaded` falls through to
/// the primary source.
#[derive(Debug)]
pub enum AlternateAttempt {
    Loaded { records: Vec<Kol>, sheet: String },
    Skipped(String),
    Incompatible(String),
    Failed(AppError),
}

/// Load the roster from the alternate tabular source when requested and
/// usable, else from the primary JSON source.
///
/// Only a failing primary source is an error.
pub fn load_records(
    primary: &Path,
    alternate: Option<&Path>,
    use_alternate: bool,
) -> Result<LoadedRecords> {
    let attempt = match alternate {
        _ if !use_alternate => AlternateAttempt::Skipped("alternate source disabled".to_string()),
        None => AlternateAttempt::Skipped("no alternate source configured".to_string()),
        Some(path) if !path.is_file() => AlternateAttempt::Skipped(format!(
            "alternate source {} not found",
            path.display()
        )),
        Some(path) => match open_tabular_source(path) {
            Ok(mut source) => read_alternate(source.as_mut()),
            Err(err) => AlternateAttempt::Failed(err),
        },
    };

    let fallback_reason = match attempt {
        AlternateAttempt::Loaded { records, sheet } => {
            // Loaded implies the path was present.
            let path = alternate.map(Path::to_path_buf).unwrap_or_default();
            info!(
                path = %path.display(),
                sheet = %sheet,
                records = records.len(),
                "Loaded KOL roster from alternate source"
            );
            return Ok(LoadedRecords {
                records,
                source: DataSource::Alternate { path, sheet },
                fallback_reason: None,
            });
        }
        AlternateAttempt::Skipped(reason) if !use_alternate => {
            debug!(reason = %reason, "Using primary source");
            None
        }
        AlternateAttempt::Skipped(reason) | AlternateAttempt::Incompatible(reason) => {
            warn!(reason = %reason, "Alternate source unusable, falling back to primary");
            Some(reason)
        }
        AlternateAttempt::Failed(err) => {
            warn!(error = %err, "Alternate source failed, falling back to primary");
            Some(err.to_string())
        }
    };

    let records = read_kol_json(primary)?;
    info!(
        path = %primary.display(),
        records = records.len(),
        "Loaded KOL roster from primary source"
    );

    Ok(LoadedRecords {
        records,
        source: DataSource::Primary {
            path: primary.to_path_buf(),
        },
        fallback_reason,
    })
}

/// Locate the data sheet, map its headers and convert every row.
pub fn read_alternate(source: &mut dyn TabularSource) -> AlternateAttempt {
    let names = source.sheet_names();
    let Some(sheet) = select_sheet(&names).map(str::to_string) else {
        return AlternateAttempt::Incompatible("workbook has no sheets".to_string());
    };

    let table = match source.read_sheet(&sheet) {
        Ok(table) => table,
        Err(err) => return AlternateAttempt::Failed(err),
    };

    match records_from_table(&table) {
        Some(records) => AlternateAttempt::Loaded { records, sheet },
        None => AlternateAttempt::Incompatible(format!(
            "sheet '{}' has no recognizable columns ({} headers)",
            table.name,
            table.headers.len()
        )),
    }
}

/// Convert a sheet into records. `None` when no header maps to a field.
pub fn records_from_table(table: &SheetTable) -> Option<Vec<Kol>> {
    let mapping = map_headers(&table.headers);
    if mapping.is_empty() {
        return None;
    }
    debug!(sheet = %table.name, mapped_columns = mapping.len(), "Mapped sheet headers");

    let records = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.iter().all(CellValue::is_blank))
        .map(|(idx, row)| record_from_row(idx + 1, row, &mapping))
        .collect();
    Some(records)
}

fn record_from_row(
    position: usize,
    row: &[CellValue],
    mapping: &[(usize, CanonicalField)],
) -> Kol {
    let mut kol = Kol::with_id(String::new());

    for &(column, field) in mapping {
        let cell = row.get(column).unwrap_or(&CellValue::Empty);
        if field.is_numeric() {
            let value = cell.as_count();
            match field {
                CanonicalField::PublicationsCount => kol.publications_count = value,
                CanonicalField::HIndex => kol.h_index = value,
                CanonicalField::Citations => kol.citations = value,
                _ => {}
            }
            continue;
        }

        let text = cell.as_text();
        match field {
            CanonicalField::Id => kol.id = text.unwrap_or_default(),
            CanonicalField::Name => kol.name = text.unwrap_or_default(),
            CanonicalField::Affiliation => kol.affiliation = text.unwrap_or_default(),
            CanonicalField::Country => kol.country = text.unwrap_or_default(),
            CanonicalField::City => kol.city = text,
            CanonicalField::ExpertiseArea => kol.expertise_area = text.unwrap_or_default(),
            _ => {}
        }
    }

    if kol.id.is_empty() {
        kol.id = position.to_string();
    }
    kol
}
