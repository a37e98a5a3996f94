// Header synonym table for spreadsheet ingestion.
//
// Keep the aliases here as data: the loader only consults `detect_field`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Id,
    Name,
    Affiliation,
    Country,
    City,
    ExpertiseArea,
    PublicationsCount,
    HIndex,
    Citations,
}

impl CanonicalField {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            CanonicalField::PublicationsCount | CanonicalField::HIndex | CanonicalField::Citations
        )
    }
}

// NOTE: aliases are written in normalized form (lowercase, separators -> '_').
pub const COLUMN_ALIASES: &[(&str, CanonicalField)] = &[
    ("id", CanonicalField::Id),
    ("kol_id", CanonicalField::Id),
    ("identifier", CanonicalField::Id),
    ("name", CanonicalField::Name),
    ("full_name", CanonicalField::Name),
    ("kol_name", CanonicalField::Name),
    ("doctor_name", CanonicalField::Name),
    ("affiliation", CanonicalField::Affiliation),
    ("institution", CanonicalField::Affiliation),
    ("organization", CanonicalField::Affiliation),
    ("hospital", CanonicalField::Affiliation),
    ("university", CanonicalField::Affiliation),
    ("country", CanonicalField::Country),
    ("nation", CanonicalField::Country),
    ("city", CanonicalField::City),
    ("location", CanonicalField::City),
    ("expertise_area", CanonicalField::ExpertiseArea),
    ("expertise", CanonicalField::ExpertiseArea),
    ("specialization", CanonicalField::ExpertiseArea),
    ("specialty", CanonicalField::ExpertiseArea),
    ("field", CanonicalField::ExpertiseArea),
    ("publications_count", CanonicalField::PublicationsCount),
    ("publications", CanonicalField::PublicationsCount),
    ("num_publications", CanonicalField::PublicationsCount),
    ("publication_count", CanonicalField::PublicationsCount),
    ("h_index", CanonicalField::HIndex),
    ("citations", CanonicalField::Citations),
    ("total_citations", CanonicalField::Citations),
    ("citation_count", CanonicalField::Citations),
];

/// Sheet names that most likely hold the roster, in preference order.
pub const PREFERRED_SHEET_NAMES: &[&str] = &["kol", "kols", "data", "doctors"];

/// Name spreadsheet tools give the first sheet of a new workbook.
pub const DEFAULT_SHEET_NAME: &str = "sheet1";

/// Lowercase and collapse whitespace, `-` and `_` runs into a single `_`.
pub fn normalize_header(s: &str) -> String {
    s.trim()
        .trim_matches('"')
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn compact(normalized: &str) -> String {
    normalized.replace('_', "")
}

pub fn detect_field(header: &str) -> Option<CanonicalField> {
    let normalized = normalize_header(header);
    if normalized.is_empty() {
        return None;
    }
    if let Some((_, field)) = COLUMN_ALIASES.iter().find(|(alias, _)| *alias == normalized) {
        return Some(*field);
    }
    // "hIndex", "PublicationsCount" and friends carry no separators.
    let compacted = compact(&normalized);
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| compact(alias) == compacted)
        .map(|(_, field)| *field)
}

/// Map each header position to a canonical field. The first column wins
/// when two headers resolve to the same field.
pub fn map_headers(headers: &[String]) -> Vec<(usize, CanonicalField)> {
    let mut mapping: Vec<(usize, CanonicalField)> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if let Some(field) = detect_field(header) {
            if mapping.iter().all(|(_, seen)| *seen != field) {
                mapping.push((idx, field));
            }
        }
    }
    mapping
}

/// Pick the sheet most likely to hold data: preferred names first, then the
/// default first-sheet name, then whatever comes first.
pub fn select_sheet(sheet_names: &[String]) -> Option<&str> {
    for preferred in PREFERRED_SHEET_NAMES {
        if let Some(name) = sheet_names
            .iter()
            .find(|name| name.trim().eq_ignore_ascii_case(preferred))
        {
            return Some(name.as_str());
        }
    }
    if let Some(name) = sheet_names
        .iter()
        .find(|name| name.trim().eq_ignore_ascii_case(DEFAULT_SHEET_NAME))
    {
        return Some(name.as_str());
    }
    sheet_names.first().map(|name| name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Full   Name "), "full_name");
        assert_eq!(normalize_header("h-index"), "h_index");
        assert_eq!(normalize_header("Publications__Count"), "publications_count");
    }

    #[test]
    fn test_detect_field_synonyms() {
        assert_eq!(detect_field("Name"), Some(CanonicalField::Name));
        assert_eq!(detect_field("KOL Name"), Some(CanonicalField::Name));
        assert_eq!(detect_field("Full Name"), Some(CanonicalField::Name));
        assert_eq!(detect_field("Publications"), Some(CanonicalField::PublicationsCount));
        assert_eq!(
            detect_field("Publications Count"),
            Some(CanonicalField::PublicationsCount)
        );
        assert_eq!(detect_field("H-Index"), Some(CanonicalField::HIndex));
        assert_eq!(detect_field("Total Citations"), Some(CanonicalField::Citations));
        assert_eq!(detect_field("Specialty"), Some(CanonicalField::ExpertiseArea));
    }

    #[test]
    fn test_detect_field_without_separators() {
        assert_eq!(detect_field("hIndex"), Some(CanonicalField::HIndex));
        assert_eq!(detect_field("expertiseArea"), Some(CanonicalField::ExpertiseArea));
        assert_eq!(
            detect_field("publicationsCount"),
            Some(CanonicalField::PublicationsCount)
        );
    }

    #[test]
    fn test_unknown_headers_are_ignored() {
        assert_eq!(detect_field("Favourite Colour"), None);
        assert_eq!(detect_field(""), None);
    }

    #[test]
    fn test_map_headers_keeps_first_duplicate() {
        let headers = vec![
            "Name".to_string(),
            "Notes".to_string(),
            "KOL Name".to_string(),
            "Country".to_string(),
        ];
        assert_eq!(
            map_headers(&headers),
            vec![(0, CanonicalField::Name), (3, CanonicalField::Country)]
        );
    }

    #[test]
    fn test_select_sheet_preference_order() {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(select_sheet(&names(&["Summary", "DATA", "KOL"])), Some("KOL"));
        assert_eq!(select_sheet(&names(&["Summary", "Data"])), Some("Data"));
        assert_eq!(select_sheet(&names(&["Summary", "Sheet1"])), Some("Sheet1"));
        assert_eq!(select_sheet(&names(&["Summary", "Notes"])), Some("Summary"));
        assert_eq!(select_sheet(&[]), None);
    }
}
