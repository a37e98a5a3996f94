use std::sync::{Arc, Mutex};

use tracing::{error, warn};

use crate::application::use_cases::kol_catalog::KolCatalog;
use crate::application::use_cases::kol_loader::load_records;
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{add_log, LogEntry};

/// Load the roster once, before the server accepts traffic.
///
/// A missing or unreadable primary source is fatal; everything else about
/// the alternate source degrades to the primary one.
pub fn build_catalog(config: &AppConfig, logs: &Arc<Mutex<Vec<LogEntry>>>) -> Result<KolCatalog> {
    let loaded = load_records(
        &config.data_file,
        config.alternate_source(),
        config.use_excel,
    )
    .map_err(|err| {
        error!(
            error = %err,
            data_file = %config.data_file.display(),
            "Failed to load KOL roster"
        );
        add_log(
            logs,
            "ERROR",
            "Loader",
            &format!("Failed to load KOL roster: {}", err),
        );
        err
    })?;

    if let Some(reason) = &loaded.fallback_reason {
        warn!(reason = %reason, "Serving primary roster instead of alternate source");
        add_log(
            logs,
            "WARN",
            "Loader",
            &format!("Alternate source not used: {}", reason),
        );
    }

    add_log(
        logs,
        "INFO",
        "Loader",
        &format!(
            "Loaded {} KOL record(s) from {}",
            loaded.records.len(),
            loaded.source
        ),
    );

    Ok(KolCatalog::from(loaded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::Builder;

    #[test]
    fn test_build_catalog_logs_fallback() {
        let mut primary = Builder::new().suffix(".json").tempfile().unwrap();
        primary
            .write_all(br#"[{"id": "1", "name": "A", "country": "Chile"}]"#)
            .unwrap();

        let config = AppConfig {
            data_file: primary.path().to_path_buf(),
            excel_file: Some(PathBuf::from("/nowhere/kols.xlsx")),
            use_excel: true,
            ..AppConfig::default()
        };
        let logs = Arc::new(Mutex::new(Vec::new()));

        let catalog = build_catalog(&config, &logs).unwrap();
        assert_eq!(catalog.len(), 1);

        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].level, "WARN");
        assert!(logs[1].message.starts_with("Loaded 1 KOL record(s)"));
    }

    #[test]
    fn test_build_catalog_fails_without_primary() {
        let config = AppConfig {
            data_file: PathBuf::from("/nowhere/kols.json"),
            ..AppConfig::default()
        };
        let logs = Arc::new(Mutex::new(Vec::new()));

        let err = build_catalog(&config, &logs).unwrap_err();
        assert!(matches!(err, AppError::SourceNotFound(_)));
        assert_eq!(logs.lock().unwrap()[0].level, "ERROR");
    }

    #[test]
    fn test_bundled_roster_loads() {
        let config = AppConfig {
            data_file: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/kols.json"),
            ..AppConfig::default()
        };
        let logs = Arc::new(Mutex::new(Vec::new()));

        let catalog = build_catalog(&config, &logs).unwrap();
        let stats = catalog.stats();
        assert_eq!(stats.total_kols, 12);
        assert_eq!(stats.data_quality_issues.len(), 6);
        assert_eq!(stats.top10_countries_by_kol_count[0].country, "Japan");
    }
}
