use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};
use crate::index::ObjectIndex;
use crate::record::AnnotationRecord;
use crate::source::AnnotationSource;

/// Area below which an annotated region is considered negligible and left
/// out of the index.
pub const DEFAULT_MIN_AREA: f64 = 6000.0;

/// Builds an [`ObjectIndex`] from a scan of annotation records.
///
/// A file is registered at most once per name, however many same-named
/// objects it holds; names and per-name file lists come out sorted, so two
/// builds over the same snapshot produce identical output.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    min_area: Option<f64>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            min_area: Some(DEFAULT_MIN_AREA),
        }
    }

    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = Some(min_area);
        self
    }

    /// Keep negligibly small objects too.
    pub fn without_area_filter(mut self) -> Self {
        self.min_area = None;
        self
    }

    pub fn build<S: AnnotationSource>(&self, source: &S) -> Result<ObjectIndex> {
        self.build_from_records(&source.records()?)
    }

    pub fn build_from_records(&self, records: &[AnnotationRecord]) -> Result<ObjectIndex> {
        let mut entries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for record in records {
            for object in &record.objects {
                match object.polygon.area() {
                    Ok(area) => {
                        if let Some(min_area) = self.min_area {
                            if area <= min_area {
                                debug!(
                                    file = %record.file,
                                    name = %object.name,
                                    area,
                                    "dropping negligibly small object"
                                );
                                continue;
                            }
                        }
                    }
                    Err(err) => {
                        warn!(
                            file = %record.file,
                            name = %object.name,
                            %err,
                            "skipping malformed outline"
                        );
                        continue;
                    }
                }

                entries
                    .entry(object.name.clone())
                    .or_default()
                    .insert(record.file.clone());
            }
        }

        if entries.is_empty() {
            return Err(CatalogError::EmptyDataset);
        }

        info!(names = entries.len(), records = records.len(), "annotation scan indexed");
        Ok(ObjectIndex::from_entries(entries))
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LabeledObject;
    use cutout::{Polygon, Vertex};

    fn square(side: i32) -> Polygon {
        Polygon::new(vec![
            Vertex::new(0, 0),
            Vertex::new(side, 0),
            Vertex::new(side, side),
            Vertex::new(0, side),
        ])
    }

    fn record(file: &str, objects: Vec<(&str, Polygon)>) -> AnnotationRecord {
        AnnotationRecord {
            file: file.into(),
            image: String::new(),
            objects: objects
                .into_iter()
                .map(|(name, polygon)| LabeledObject {
                    name: name.into(),
                    polygon,
                })
                .collect(),
        }
    }

    #[test]
    fn area_filter_drops_small_objects_and_groups_the_rest() {
        // Areas: pebble ~ 10, the two dogs ~ 200 each.
        let pebble = Polygon::new(vec![
            Vertex::new(0, 0),
            Vertex::new(5, 0),
            Vertex::new(5, 2),
            Vertex::new(0, 2),
        ]);
        let dog = Polygon::new(vec![
            Vertex::new(0, 0),
            Vertex::new(20, 0),
            Vertex::new(20, 10),
            Vertex::new(0, 10),
        ]);

        let records = vec![
            record("stones.json", vec![("pebble", pebble)]),
            record("park.json", vec![("dog", dog.clone())]),
            record("beach.json", vec![("dog", dog)]),
        ];

        let index = IndexBuilder::new()
            .with_min_area(50.0)
            .build_from_records(&records)
            .unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("dog"), ["beach.json", "park.json"]);
        assert!(index.lookup("pebble").is_empty());
    }

    #[test]
    fn duplicate_names_in_one_file_register_the_file_once() {
        let records = vec![record(
            "street.json",
            vec![("car", square(100)), ("car", square(120))],
        )];

        let index = IndexBuilder::new()
            .without_area_filter()
            .build_from_records(&records)
            .unwrap();

        assert_eq!(index.lookup("car"), ["street.json"]);
    }

    #[test]
    fn malformed_outlines_are_skipped_not_fatal() {
        let records = vec![record(
            "mixed.json",
            vec![
                ("ghost", Polygon::new(vec![Vertex::new(0, 0)])),
                ("house", square(200)),
            ],
        )];

        let index = IndexBuilder::new().build_from_records(&records).unwrap();
        assert_eq!(index.lookup("house"), ["mixed.json"]);
        assert!(index.lookup("ghost").is_empty());
    }

    #[test]
    fn empty_survivor_set_is_an_error() {
        let records = vec![record("tiny.json", vec![("ant", square(2))])];
        assert!(matches!(
            IndexBuilder::new().build_from_records(&records),
            Err(CatalogError::EmptyDataset)
        ));
    }

    #[test]
    fn default_threshold_matches_the_reference_filter() {
        // 80x80 = 6400 survives the 6000 default, 70x70 = 4900 does not.
        let records = vec![record(
            "yard.json",
            vec![("shed", square(80)), ("bush", square(70))],
        )];

        let index = IndexBuilder::new().build_from_records(&records).unwrap();
        assert_eq!(index.lookup("shed"), ["yard.json"]);
        assert!(index.lookup("bush").is_empty());
    }
}
