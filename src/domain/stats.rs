use serde::Serialize;

/// Country with the number of KOLs recorded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub count: usize,
}

/// KOL with the highest citations-to-publications ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactLeader {
    pub id: String,
    pub name: String,
    pub ratio: f64,
    pub citations: u64,
    pub publications_count: u64,
}

/// Aggregate statistics over the loaded dataset.
///
/// Field names stay snake_case: the dashboard reads them as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KolStats {
    pub total_kols: usize,
    pub unique_countries: usize,
    pub total_publications: u64,
    pub avg_h_index: f64,
    pub top10_countries_by_kol_count: Vec<CountryCount>,
    /// `None` when no record has both citations and a positive publication count.
    pub highest_citations_per_publication_kol: Option<ImpactLeader>,
    pub data_quality_issues: Vec<String>,
}
