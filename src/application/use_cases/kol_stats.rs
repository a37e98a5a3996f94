use std::collections::{HashMap, HashSet};

use crate::domain::kol::Kol;
use crate::domain::stats::{CountryCount, ImpactLeader, KolStats};

pub const TOP_COUNTRY_LIMIT: usize = 10;
pub const UNKNOWN_COUNTRY: &str = "Unknown";
pub const NO_ISSUES_MESSAGE: &str = "No significant data quality issues detected";
pub const NO_DATA_MESSAGE: &str = "No data loaded";

/// Compute the aggregate report for a record set. Pure and deterministic.
pub fn compute_stats(kols: &[Kol]) -> KolStats {
    if kols.is_empty() {
        return empty_stats();
    }

    let unique_countries = kols
        .iter()
        .map(|kol| kol.country.as_str())
        .filter(|country| !country.trim().is_empty())
        .collect::<HashSet<_>>()
        .len();

    let total_publications = kols
        .iter()
        .filter_map(|kol| kol.publications_count)
        .fold(0u64, u64::saturating_add);

    KolStats {
        total_kols: kols.len(),
        unique_countries,
        total_publications,
        avg_h_index: round2(average_h_index(kols)),
        top10_countries_by_kol_count: top_countries(kols, TOP_COUNTRY_LIMIT),
        highest_citations_per_publication_kol: highest_impact(kols),
        data_quality_issues: data_quality_issues(kols),
    }
}

/// Mean over records that carry an h-index; `0.0` when none do.
pub fn average_h_index(kols: &[Kol]) -> f64 {
    let (sum, count) = kols
        .iter()
        .filter_map(|kol| kol.h_index)
        .fold((0u128, 0usize), |(sum, count), h| (sum + u128::from(h), count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Countries ranked by KOL count. Ties keep first-seen order; blank
/// countries are grouped under `Unknown`.
pub fn top_countries(kols: &[Kol], limit: usize) -> Vec<CountryCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CountryCount> = Vec::new();

    for kol in kols {
        let country = kol.country.trim();
        let label = if country.is_empty() {
            UNKNOWN_COUNTRY
        } else {
            kol.country.as_str()
        };
        match positions.get(label) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(label, counts.len());
                counts.push(CountryCount {
                    country: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Record with the highest citations-per-publication ratio; the earliest
/// record wins an exact tie.
pub fn highest_impact(kols: &[Kol]) -> Option<ImpactLeader> {
    let mut best: Option<(&Kol, f64)> = None;
    for kol in kols {
        let Some(ratio) = kol.citation_ratio() else {
            continue;
        };
        match best {
            Some((_, best_ratio)) if ratio <= best_ratio => {}
            _ => best = Some((kol, ratio)),
        }
    }

    best.map(|(kol, ratio)| ImpactLeader {
        id: kol.id.clone(),
        name: kol.name.clone(),
        ratio: round2(ratio),
        citations: kol.citations.unwrap_or_default(),
        publications_count: kol.publications_count.unwrap_or_default(),
    })
}

/// Run every detector in listing order. One summary line per firing detector.
pub fn data_quality_issues(kols: &[Kol]) -> Vec<String> {
    let missing_publications = count_where(kols, |kol| kol.publications_count.is_none());
    let missing_citations = count_where(kols, |kol| kol.citations.is_none());
    let missing_h_index = count_where(kols, |kol| kol.h_index.is_none());
    let suspicious_zero = count_where(kols, |kol| {
        kol.publications_count == Some(0) && kol.h_index.unwrap_or(0) > 0
    });
    let blank_identity = count_where(kols, |kol| {
        kol.name.trim().is_empty() || kol.country.trim().is_empty()
    });
    let distinct_ids = kols
        .iter()
        .map(|kol| kol.id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let duplicate_ids = kols.len() - distinct_ids;

    let mut issues = Vec::new();
    if missing_publications > 0 {
        issues.push(format!(
            "{} KOL(s) with missing publications count",
            missing_publications
        ));
    }
    if missing_citations > 0 {
        issues.push(format!("{} KOL(s) with missing citations", missing_citations));
    }
    if missing_h_index > 0 {
        issues.push(format!("{} KOL(s) with missing h-index", missing_h_index));
    }
    if suspicious_zero > 0 {
        issues.push(format!(
            "{} KOL(s) with 0 publications but positive h-index",
            suspicious_zero
        ));
    }
    if blank_identity > 0 {
        issues.push(format!("{} KOL(s) with empty name or country", blank_identity));
    }
    if duplicate_ids > 0 {
        issues.push(format!("{} duplicate KOL ID(s) found", duplicate_ids));
    }

    if issues.is_empty() {
        issues.push(NO_ISSUES_MESSAGE.to_string());
    }
    issues
}

fn count_where(kols: &[Kol], pred: impl Fn(&Kol) -> bool) -> usize {
    kols.iter().filter(|&kol| pred(kol)).count()
}

fn empty_stats() -> KolStats {
    KolStats {
        total_kols: 0,
        unique_countries: 0,
        total_publications: 0,
        avg_h_index: 0.0,
        top10_countries_by_kol_count: Vec::new(),
        highest_citations_per_publication_kol: None,
        data_quality_issues: vec![NO_DATA_MESSAGE.to_string()],
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
