//! SPARQL templates for the two harvesting strategies.
//!
//! Wikidata shorthand used below: P800 notable work, P106 occupation,
//! P170 creator, P31 instance of, P195 collection, P625 coordinate location,
//! P17 country; Q1028181 painter, Q3305213 painting, Q33506 museum.

/// Strategy 1: paintings that are notable works (P800) of painters, with the
/// holding museum's coordinates, country, and the painter's Wikipedia article.
pub fn notable_works(offset: u32, limit: u32) -> String {
    format!(
        r#"SELECT DISTINCT ?painterLabel ?paintingLabel ?museumLabel ?countryLabel ?coords ?article WHERE {{
  ?painter wdt:P800 ?painting .
  ?painter wdt:P106 wd:Q1028181 .
  ?painting wdt:P31 wd:Q3305213 .
  ?painting wdt:P195 ?museum .
  ?museum wdt:P31 wd:Q33506 .
  OPTIONAL {{ ?museum wdt:P625 ?coords . }}
  OPTIONAL {{ ?museum wdt:P17 ?country . }}
  OPTIONAL {{
    ?article schema:about ?painter ;
             schema:isPartOf <https://en.wikipedia.org/> .
  }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en" . }}
}}
OFFSET {offset}
LIMIT {limit}"#
    )
}

/// Strategy 2: paintings in museum collections queried directly via the
/// creator relation (P170), with no reliance on notable-work links.
pub fn collection_sample(offset: u32, limit: u32) -> String {
    format!(
        r#"SELECT DISTINCT ?painterLabel ?paintingLabel ?museumLabel ?countryLabel ?coords ?article WHERE {{
  ?painting wdt:P170 ?painter .
  ?painter wdt:P106 wd:Q1028181 .
  ?painting wdt:P31 wd:Q3305213 .
  ?painting wdt:P195 ?museum .
  ?museum wdt:P31 wd:Q33506 .
  OPTIONAL {{ ?museum wdt:P625 ?coords . }}
  OPTIONAL {{ ?museum wdt:P17 ?country . }}
  OPTIONAL {{
    ?article schema:about ?painter ;
             schema:isPartOf <https://en.wikipedia.org/> .
  }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en" . }}
}}
OFFSET {offset}
LIMIT {limit}"#
    )
}
