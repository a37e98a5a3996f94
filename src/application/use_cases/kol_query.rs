use std::cmp::Ordering;

use serde::Deserialize;

use crate::domain::error::{AppError, Result};
use crate::domain::kol::Kol;

/// Filters, sorting and pagination layered over the loaded roster.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KolQuery {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub expertise: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, alias = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KolPage {
    /// Matches before pagination.
    pub total: usize,
    pub items: Vec<Kol>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Affiliation,
    Country,
    City,
    ExpertiseArea,
    PublicationsCount,
    HIndex,
    Citations,
}

impl SortField {
    pub fn parse(raw: &str) -> Result<Self> {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "name" => Ok(SortField::Name),
            "affiliation" => Ok(SortField::Affiliation),
            "country" => Ok(SortField::Country),
            "city" => Ok(SortField::City),
            "expertisearea" | "expertise" => Ok(SortField::ExpertiseArea),
            "publicationscount" | "publications" => Ok(SortField::PublicationsCount),
            "hindex" => Ok(SortField::HIndex),
            "citations" => Ok(SortField::Citations),
            _ => Err(AppError::ValidationError(format!(
                "Unknown sort field '{}'",
                raw
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(AppError::ValidationError(format!(
                "Unknown sort order '{}'",
                raw
            ))),
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl KolQuery {
    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.expertise.is_none()
            && self.search.is_none()
            && self.sort_by.is_none()
            && self.order.is_none()
            && self.offset.is_none()
            && self.limit.is_none()
    }

    pub fn apply(&self, kols: &[Kol]) -> Result<KolPage> {
        let sort = self.sort_by.as_deref().map(SortField::parse).transpose()?;
        let order = self
            .order
            .as_deref()
            .map(SortOrder::parse)
            .transpose()?
            .unwrap_or_default();

        let country = non_blank(&self.country);
        let expertise = non_blank(&self.expertise);
        let search = non_blank(&self.search).map(|s| s.to_lowercase());

        let mut matched: Vec<&Kol> = kols
            .iter()
            .filter(|kol| {
                country.map_or(true, |c| kol.country.trim().eq_ignore_ascii_case(c))
            })
            .filter(|kol| {
                expertise.map_or(true, |e| kol.expertise_area.trim().eq_ignore_ascii_case(e))
            })
            .filter(|kol| {
                search.as_deref().map_or(true, |needle| {
                    kol.name.to_lowercase().contains(needle)
                        || kol.affiliation.to_lowercase().contains(needle)
                })
            })
            .collect();

        if let Some(field) = sort {
            matched.sort_by(|a, b| compare(a, b, field, order));
        }

        let total = matched.len();
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        let items = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(KolPage { total, items })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn compare(a: &Kol, b: &Kol, field: SortField, order: SortOrder) -> Ordering {
    let text = |x: &str, y: &str| order.apply(x.to_lowercase().cmp(&y.to_lowercase()));
    match field {
        SortField::Name => text(&a.name, &b.name),
        SortField::Affiliation => text(&a.affiliation, &b.affiliation),
        SortField::Country => text(&a.country, &b.country),
        SortField::ExpertiseArea => text(&a.expertise_area, &b.expertise_area),
        SortField::City => compare_nullable(
            a.city.as_deref().map(str::to_lowercase),
            b.city.as_deref().map(str::to_lowercase),
            order,
        ),
        SortField::PublicationsCount => {
            compare_nullable(a.publications_count, b.publications_count, order)
        }
        SortField::HIndex => compare_nullable(a.h_index, b.h_index, order),
        SortField::Citations => compare_nullable(a.citations, b.citations, order),
    }
}

/// Nulls sort last in both directions.
fn compare_nullable<T: Ord>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => order.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Kol> {
        let entries = [
            ("1", "Dr. Aiko Tanaka", "Kyoto University", "Japan", "Oncology", Some(120), Some(30)),
            ("2", "Dr. Lucas Silva", "Hospital Sirio-Libanes", "Brazil", "Cardiology", None, Some(12)),
            ("3", "Dr. Hana Sato", "Osaka University", "japan", "Cardiology", Some(45), None),
            ("4", "Dr. Emma Weber", "Charite", "Germany", "Oncology", Some(80), Some(25)),
        ];
        entries
            .iter()
            .map(|(id, name, affiliation, country, expertise, pubs, h)| Kol {
                name: name.to_string(),
                affiliation: affiliation.to_string(),
                country: country.to_string(),
                expertise_area: expertise.to_string(),
                publications_count: *pubs,
                h_index: *h,
                ..Kol::with_id(*id)
            })
            .collect()
    }

    fn ids(page: &KolPage) -> Vec<&str> {
        page.items.iter().map(|k| k.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let query = KolQuery::default();
        assert!(query.is_empty());
        let page = query.apply(&roster()).unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(ids(&page), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_filter_by_country_is_case_insensitive() {
        let query = KolQuery {
            country: Some("JAPAN".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&roster()).unwrap()), vec!["1", "3"]);
    }

    #[test]
    fn test_search_matches_name_or_affiliation() {
        let query = KolQuery {
            search: Some("university".into()),
            expertise: Some("cardiology".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&roster()).unwrap()), vec!["3"]);
    }

    #[test]
    fn test_sort_desc_keeps_nulls_last() {
        let query = KolQuery {
            sort_by: Some("publicationsCount".into()),
            order: Some("desc".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&roster()).unwrap()), vec!["1", "4", "3", "2"]);

        let query = KolQuery {
            sort_by: Some("h_index".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&roster()).unwrap()), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_pagination_reports_total_before_paging() {
        let query = KolQuery {
            sort_by: Some("name".into()),
            offset: Some(1),
            limit: Some(2),
            ..Default::default()
        };
        let page = query.apply(&roster()).unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(ids(&page), vec!["4", "3"]);
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        let query = KolQuery {
            sort_by: Some("shoe_size".into()),
            ..Default::default()
        };
        assert!(matches!(
            query.apply(&roster()),
            Err(AppError::ValidationError(_))
        ));
    }
}
