// ============================================================
// DATA SOURCE ADAPTERS
// ============================================================
// File readers for the structured JSON roster and tabular
// (spreadsheet / CSV) alternates. No mapping logic lives here.

mod json_source;
mod tabular;

pub use json_source::read_kol_json;
pub use tabular::{open_tabular_source, CsvSource, TabularSource, WorkbookSource};
