use regex::Regex;

use crate::record::ArtworkRecord;
use crate::sparql::RawRow;

/// One raw result row viewed through the variables the queries actually bind,
/// populated by explicit key lookup. Label variables default to empty string
/// when the binding is missing; truly optional variables stay None.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowBindings {
    pub painter: String,
    pub painting: String,
    pub museum: String,
    pub country: Option<String>,
    pub coords: Option<String>,
    pub article: Option<String>,
}

impl RowBindings {
    pub fn from_raw(row: &RawRow) -> Self {
        let label = |name: &str| {
            row.get(name)
                .map(|v| v.value.clone())
                .unwrap_or_default()
        };
        RowBindings {
            painter: label("painterLabel"),
            painting: label("paintingLabel"),
            museum: label("museumLabel"),
            country: row.get("countryLabel").map(|v| v.value.clone()),
            coords: row.get("coords").map(|v| v.value.clone()),
            article: row.get("article").map(|v| v.value.clone()),
        }
    }
}

/// True for labels the endpoint failed to translate: a bare entity ID such as
/// "Q12345" (a leading Q, the rest digits and hyphens).
pub fn is_untranslated_id(label: &str) -> bool {
    match label.strip_prefix('Q') {
        Some(rest) => {
            let digits: String = rest.chars().filter(|c| *c != '-').collect();
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn usable_label(label: &str) -> bool {
    !label.is_empty() && !is_untranslated_id(label)
}

/// Maps raw result rows into canonical artwork records.
pub struct Normalizer {
    point_regex: Regex,
}

impl Normalizer {
    pub fn new() -> Self {
        Normalizer {
            // WKT-style coordinate literal: Point(<lon> <lat>), longitude first.
            point_regex: Regex::new(r"^Point\(([-\d.]+)\s+([-\d.]+)\)").unwrap(),
        }
    }

    /// Parse a Point(lon lat) literal into (lat, lon). Malformed syntax,
    /// non-numeric tokens, and out-of-range values all degrade to
    /// (None, None); geometry is optional data, never a hard failure.
    pub fn parse_coordinates(&self, coords: &str) -> (Option<f64>, Option<f64>) {
        let caps = match self.point_regex.captures(coords) {
            Some(c) => c,
            None => return (None, None),
        };
        let lon: f64 = match caps[1].parse() {
            Ok(v) => v,
            Err(_) => return (None, None),
        };
        let lat: f64 = match caps[2].parse() {
            Ok(v) => v,
            Err(_) => return (None, None),
        };
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return (None, None);
        }
        (Some(lat), Some(lon))
    }

    /// Map one raw row to a record. None rejects the row in full: the painter,
    /// painting, or museum label was empty or an untranslated entity ID.
    pub fn normalize(&self, row: &RawRow) -> Option<ArtworkRecord> {
        let bindings = RowBindings::from_raw(row);

        if !usable_label(&bindings.painter)
            || !usable_label(&bindings.painting)
            || !usable_label(&bindings.museum)
        {
            return None;
        }

        let (lat, lon) = match bindings.coords.as_deref() {
            Some(coords) => self.parse_coordinates(coords),
            None => (None, None),
        };

        Some(ArtworkRecord {
            painter: bindings.painter,
            painting: bindings.painting,
            museum: bindings.museum,
            city: "Unknown".to_string(),
            country: bindings.country.unwrap_or_else(|| "Unknown".to_string()),
            lat,
            lon,
            wikipedia_url: bindings.article.unwrap_or_default(),
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::SparqlValue;

    fn raw_row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    SparqlValue {
                        value: v.to_string(),
                    },
                )
            })
            .collect()
    }

    fn full_row() -> RawRow {
        raw_row(&[
            ("painterLabel", "Claude Monet"),
            ("paintingLabel", "Water Lilies"),
            ("museumLabel", "Musée de l'Orangerie"),
            ("countryLabel", "France"),
            ("coords", "Point(2.3226 48.8638)"),
            ("article", "https://en.wikipedia.org/wiki/Claude_Monet"),
        ])
    }

    #[test]
    fn detects_untranslated_ids() {
        assert!(is_untranslated_id("Q12345"));
        assert!(is_untranslated_id("Q1-2"));
        assert!(!is_untranslated_id("Q"));
        assert!(!is_untranslated_id("Queen Victoria"));
        assert!(!is_untranslated_id("Monet"));
        assert!(!is_untranslated_id(""));
    }

    #[test]
    fn parses_point_with_swapped_axes() {
        let normalizer = Normalizer::new();
        // Longitude comes first in the literal.
        let (lat, lon) = normalizer.parse_coordinates("Point(2.3226 48.8638)");
        assert_eq!(lat, Some(48.8638));
        assert_eq!(lon, Some(2.3226));
    }

    #[test]
    fn parses_negative_coordinates() {
        let normalizer = Normalizer::new();
        let (lat, lon) = normalizer.parse_coordinates("Point(-73.9632 40.7794)");
        assert_eq!(lat, Some(40.7794));
        assert_eq!(lon, Some(-73.9632));
    }

    #[test]
    fn malformed_geometry_degrades_to_absent() {
        let normalizer = Normalizer::new();
        for bad in [
            "",
            "Point()",
            "Point(2.33)",
            "POINT(2.33 48.86)",
            "Point(abc def)",
            "2.33 48.86",
        ] {
            assert_eq!(normalizer.parse_coordinates(bad), (None, None), "{:?}", bad);
        }
    }

    #[test]
    fn out_of_range_coordinates_degrade_to_absent() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.parse_coordinates("Point(200.0 10.0)"), (None, None));
        assert_eq!(normalizer.parse_coordinates("Point(10.0 95.0)"), (None, None));
    }

    #[test]
    fn normalizes_a_full_row() {
        let record = Normalizer::new().normalize(&full_row()).unwrap();
        assert_eq!(record.painter, "Claude Monet");
        assert_eq!(record.painting, "Water Lilies");
        assert_eq!(record.museum, "Musée de l'Orangerie");
        assert_eq!(record.city, "Unknown");
        assert_eq!(record.country, "France");
        assert_eq!(record.lat, Some(48.8638));
        assert_eq!(record.lon, Some(2.3226));
        assert_eq!(
            record.wikipedia_url,
            "https://en.wikipedia.org/wiki/Claude_Monet"
        );
    }

    #[test]
    fn rejects_untranslated_labels() {
        let normalizer = Normalizer::new();

        let mut row = full_row();
        row.insert(
            "painterLabel".to_string(),
            SparqlValue {
                value: "Q296".to_string(),
            },
        );
        assert!(normalizer.normalize(&row).is_none());

        let mut row = full_row();
        row.insert(
            "museumLabel".to_string(),
            SparqlValue {
                value: "Q190804".to_string(),
            },
        );
        assert!(normalizer.normalize(&row).is_none());
    }

    #[test]
    fn rejects_missing_labels() {
        let normalizer = Normalizer::new();
        let row = raw_row(&[("painterLabel", "Claude Monet")]);
        assert!(normalizer.normalize(&row).is_none());
    }

    #[test]
    fn defaults_for_optional_bindings() {
        let row = raw_row(&[
            ("painterLabel", "Claude Monet"),
            ("paintingLabel", "Water Lilies"),
            ("museumLabel", "Musée de l'Orangerie"),
        ]);
        let record = Normalizer::new().normalize(&row).unwrap();
        assert_eq!(record.country, "Unknown");
        assert_eq!(record.lat, None);
        assert_eq!(record.lon, None);
        assert_eq!(record.wikipedia_url, "");
    }

    #[test]
    fn bindings_use_explicit_lookups() {
        let bindings = RowBindings::from_raw(&full_row());
        assert_eq!(bindings.painter, "Claude Monet");
        assert_eq!(bindings.country.as_deref(), Some("France"));
        assert_eq!(bindings.coords.as_deref(), Some("Point(2.3226 48.8638)"));

        let empty = RowBindings::from_raw(&RawRow::new());
        assert_eq!(empty.painter, "");
        assert_eq!(empty.country, None);
    }
}
