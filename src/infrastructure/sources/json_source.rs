use std::fs;
use std::path::Path;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::kol::Kol;

/// Read the structured roster: a JSON array of field-keyed objects.
pub fn read_kol_json(path: &Path) -> Result<Vec<Kol>> {
    if !path.is_file() {
        return Err(AppError::SourceNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let raw: JsonValue = serde_json::from_str(&content).map_err(|e| {
        AppError::ParseError(format!("Invalid JSON in {}: {}", path.display(), e))
    })?;

    let entries = raw.as_array().ok_or_else(|| {
        AppError::ParseError(format!(
            "Expected a JSON array of records in {}",
            path.display()
        ))
    })?;

    let kols = entries
        .iter()
        .enumerate()
        .map(|(idx, value)| Kol::from_json_value(idx, value))
        .collect::<Result<Vec<_>>>()?;

    debug!(path = %path.display(), records = kols.len(), "Read structured roster");
    Ok(kols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_array_of_records() {
        let file = write_temp(
            r#"[
                {"id": "1", "name": "A", "country": "Japan", "publicationsCount": 3},
                {"id": "2", "name": "B", "country": "Peru", "hIndex": "7"}
            ]"#,
        );
        let kols = read_kol_json(file.path()).unwrap();
        assert_eq!(kols.len(), 2);
        assert_eq!(kols[0].publications_count, Some(3));
        assert_eq!(kols[1].h_index, Some(7));
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let err = read_kol_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, AppError::SourceNotFound(_)));
    }

    #[test]
    fn test_non_array_is_parse_error() {
        let file = write_temp(r#"{"id": "1"}"#);
        let err = read_kol_json(file.path()).unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let file = write_temp("[{\"id\": ");
        assert!(matches!(
            read_kol_json(file.path()).unwrap_err(),
            AppError::ParseError(_)
        ));
    }
}
