// ============================================================
// KOL RECORD
// ============================================================
// Canonical Key Opinion Leader record plus the lenient coercions
// used by every source adapter.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use super::error::{AppError, Result};

/// One Key Opinion Leader entry.
///
/// Metrics are `None` when the source had no usable value. They are never
/// coerced to zero so aggregates can tell "missing" from "zero".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kol {
    pub id: String,
    pub name: String,
    pub affiliation: String,
    pub country: String,
    pub city: Option<String>,
    pub expertise_area: String,
    pub publications_count: Option<u64>,
    pub h_index: Option<u64>,
    pub citations: Option<u64>,
}

impl Kol {
    /// Empty record carrying only an identifier. Adapters fill in the rest.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            affiliation: String::new(),
            country: String::new(),
            city: None,
            expertise_area: String::new(),
            publications_count: None,
            h_index: None,
            citations: None,
        }
    }

    /// Build a record from one element of the structured JSON source.
    ///
    /// Missing or mistyped string fields default to `""`, unusable metrics
    /// default to `None`. Only a non-object element is rejected.
    pub fn from_json_value(index: usize, value: &JsonValue) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            AppError::ParseError(format!(
                "Record #{} is not a JSON object (found {})",
                index + 1,
                json_type_name(value)
            ))
        })?;

        Ok(Self {
            id: string_field(object, "id"),
            name: string_field(object, "name"),
            affiliation: string_field(object, "affiliation"),
            country: string_field(object, "country"),
            city: optional_string_field(object, "city"),
            expertise_area: string_field(object, "expertiseArea"),
            publications_count: object.get("publicationsCount").and_then(count_from_json),
            h_index: object.get("hIndex").and_then(count_from_json),
            citations: object.get("citations").and_then(count_from_json),
        })
    }

    /// `citations / publicationsCount`, when both are usable and publications > 0.
    pub fn citation_ratio(&self) -> Option<f64> {
        match (self.citations, self.publications_count) {
            (Some(citations), Some(publications)) if publications > 0 => {
                Some(citations as f64 / publications as f64)
            }
            _ => None,
        }
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn string_field(object: &Map<String, JsonValue>, key: &str) -> String {
    optional_string_field(object, key).unwrap_or_default()
}

fn optional_string_field(object: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match object.get(key)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce a JSON value into a non-negative count.
pub fn count_from_json(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => {
            if let Some(v) = n.as_u64() {
                Some(v)
            } else {
                n.as_f64().and_then(count_from_f64)
            }
        }
        JsonValue::String(s) => count_from_str(s),
        _ => None,
    }
}

/// Truncating float coercion. Negative or non-finite input yields `None`.
pub fn count_from_f64(value: f64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 || value > u64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as u64)
}

/// Parse a count from text such as `"42"`, `" 12.0 "` or `"1,234"`.
pub fn count_from_str(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned = trimmed.replace(',', "");
    if let Ok(v) = cleaned.parse::<u64>() {
        return Some(v);
    }
    cleaned.parse::<f64>().ok().and_then(count_from_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_value_full_record() {
        let value = json!({
            "id": "7",
            "name": "Dr. Aiko Tanaka",
            "affiliation": "Kyoto University Hospital",
            "country": "Japan",
            "city": "Kyoto",
            "expertiseArea": "Oncology",
            "publicationsCount": 120,
            "hIndex": 35,
            "citations": 4800
        });

        let kol = Kol::from_json_value(0, &value).unwrap();
        assert_eq!(kol.id, "7");
        assert_eq!(kol.city.as_deref(), Some("Kyoto"));
        assert_eq!(kol.expertise_area, "Oncology");
        assert_eq!(kol.publications_count, Some(120));
        assert_eq!(kol.h_index, Some(35));
        assert_eq!(kol.citations, Some(4800));
    }

    #[test]
    fn test_from_json_value_defaults_missing_fields() {
        let kol = Kol::from_json_value(0, &json!({ "id": 3 })).unwrap();
        assert_eq!(kol.id, "3");
        assert_eq!(kol.name, "");
        assert_eq!(kol.country, "");
        assert_eq!(kol.city, None);
        assert_eq!(kol.publications_count, None);
    }

    #[test]
    fn test_from_json_value_rejects_placeholders_in_metrics() {
        let value = json!({
            "id": "1",
            "name": "X",
            "publicationsCount": "N/A",
            "hIndex": -4,
            "citations": null
        });
        let kol = Kol::from_json_value(0, &value).unwrap();
        assert_eq!(kol.publications_count, None);
        assert_eq!(kol.h_index, None);
        assert_eq!(kol.citations, None);
    }

    #[test]
    fn test_from_json_value_rejects_non_object() {
        let err = Kol::from_json_value(4, &json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("Record #5"));
    }

    #[test]
    fn test_count_coercions() {
        assert_eq!(count_from_json(&json!(12.9)), Some(12));
        assert_eq!(count_from_json(&json!("1,234")), Some(1234));
        assert_eq!(count_from_json(&json!(" 8 ")), Some(8));
        assert_eq!(count_from_json(&json!(true)), None);
        assert_eq!(count_from_str("-3"), None);
        assert_eq!(count_from_f64(f64::NAN), None);
    }

    #[test]
    fn test_citation_ratio_requires_publications() {
        let mut kol = Kol::with_id("1");
        kol.citations = Some(100);
        kol.publications_count = Some(0);
        assert_eq!(kol.citation_ratio(), None);

        kol.publications_count = Some(4);
        assert_eq!(kol.citation_ratio(), Some(25.0));
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(Kol::with_id("9")).unwrap();
        assert!(value.get("expertiseArea").is_some());
        assert!(value.get("publicationsCount").is_some());
        assert!(value.get("hIndex").is_some());
    }
}
