use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// One harvested artwork. Never mutated after creation; corrections happen by
/// re-running the harvest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    pub painter: String,
    pub painting: String,
    pub museum: String,
    /// Not populated by the current query strategies.
    pub city: String,
    pub country: String,
    /// Present only when the upstream geometry parsed successfully.
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Empty string when no reference was found; never null. Defaults on
    /// deserialization so snapshots written without the column still load.
    #[serde(default)]
    pub wikipedia_url: String,
}

impl ArtworkRecord {
    /// Deduplication identity: the (painter, painting, museum) triple.
    pub fn identity_key(&self) -> (&str, &str, &str) {
        (&self.painter, &self.painting, &self.museum)
    }

    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// Records from one museum location, with parallel per-record lists the map
/// renderer consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct MuseumGroup {
    pub museum: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub painters: Vec<String>,
    pub paintings: Vec<String>,
    pub wikipedia_urls: Vec<String>,
}

impl MuseumGroup {
    pub fn len(&self) -> usize {
        self.painters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.painters.is_empty()
    }
}

/// The immutable outcome of one harvest run: an ordered record collection
/// with the full eight-column schema on every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<ArtworkRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ArtworkRecord>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[ArtworkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn unique_painters(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.painter.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn unique_museums(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.museum.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Percentage of records carrying parsed coordinates. 0.0 on the empty
    /// dataset.
    pub fn coordinate_coverage(&self) -> f64 {
        self.coverage(|r| r.has_coordinates())
    }

    /// Percentage of records carrying a reference link. 0.0 on the empty
    /// dataset.
    pub fn reference_coverage(&self) -> f64 {
        self.coverage(|r| !r.wikipedia_url.is_empty())
    }

    fn coverage<F: Fn(&ArtworkRecord) -> bool>(&self, pred: F) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let matching = self.records.iter().filter(|r| pred(r)).count();
        100.0 * matching as f64 / self.records.len() as f64
    }

    /// Group coordinate-bearing records by (museum, country, lat, lon) into
    /// parallel painter/painting/reference lists, largest group first.
    /// Records without coordinates cannot be placed on a map and are skipped.
    pub fn museum_groups(&self) -> Vec<MuseumGroup> {
        let mut index: HashMap<(String, String, u64, u64), usize> = HashMap::new();
        let mut groups: Vec<MuseumGroup> = Vec::new();

        for record in &self.records {
            let (lat, lon) = match (record.lat, record.lon) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => continue,
            };
            let key = (
                record.museum.clone(),
                record.country.clone(),
                lat.to_bits(),
                lon.to_bits(),
            );
            let idx = *index.entry(key).or_insert_with(|| {
                groups.push(MuseumGroup {
                    museum: record.museum.clone(),
                    country: record.country.clone(),
                    lat,
                    lon,
                    painters: Vec::new(),
                    paintings: Vec::new(),
                    wikipedia_urls: Vec::new(),
                });
                groups.len() - 1
            });
            groups[idx].painters.push(record.painter.clone());
            groups[idx].paintings.push(record.painting.clone());
            groups[idx].wikipedia_urls.push(record.wikipedia_url.clone());
        }

        groups.sort_by(|a, b| b.len().cmp(&a.len()));
        groups
    }
}

/// Collapse the record set to unique (painter, painting, museum) triples,
/// keeping the first record per key in accumulation order. Pure function;
/// retained records keep their field values untouched.
pub fn dedupe(records: Vec<ArtworkRecord>) -> Dataset {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    let mut unique = Vec::new();

    for record in records {
        let key = (
            record.painter.clone(),
            record.painting.clone(),
            record.museum.clone(),
        );
        if seen.insert(key) {
            unique.push(record);
        }
    }

    Dataset::new(unique)
}
