use crate::application::use_cases::kol_loader::LoadedRecords;
use crate::application::use_cases::kol_query::{KolPage, KolQuery};
use crate::application::use_cases::kol_stats::compute_stats;
use crate::domain::error::Result;
use crate::domain::kol::Kol;
use crate::domain::source::DataSource;
use crate::domain::stats::KolStats;

/// Immutable snapshot of the roster, built once at startup and shared with
/// every request handler.
#[derive(Debug, Clone)]
pub struct KolCatalog {
    records: Vec<Kol>,
    source: DataSource,
}

impl KolCatalog {
    pub fn new(records: Vec<Kol>, source: DataSource) -> Self {
        Self { records, source }
    }

    pub fn all(&self) -> &[Kol] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// First record with this id. Duplicates are reported by `stats`, not resolved here.
    pub fn find_by_id(&self, id: &str) -> Option<&Kol> {
        self.records.iter().find(|kol| kol.id == id)
    }

    pub fn stats(&self) -> KolStats {
        compute_stats(&self.records)
    }

    pub fn query(&self, query: &KolQuery) -> Result<KolPage> {
        query.apply(&self.records)
    }
}

impl From<LoadedRecords> for KolCatalog {
    fn from(loaded: LoadedRecords) -> Self {
        Self::new(loaded.records, loaded.source)
    }
}
