pub mod use_cases;

pub use use_cases::kol_catalog::KolCatalog;
pub use use_cases::kol_loader::{load_records, LoadedRecords};
pub use use_cases::kol_query::{KolPage, KolQuery};
