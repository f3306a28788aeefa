use std::collections::BTreeSet;

use cutout::Polygon;
use serde::{Deserialize, Serialize};

/// One labeled outline inside an annotation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledObject {
    pub name: String,
    pub polygon: Polygon,
}

/// Parsed form of one annotation file: which file it came from, which image
/// it describes, and the labeled outlines found in it. The on-disk format
/// is the concern of whatever [`AnnotationSource`](crate::AnnotationSource)
/// produced the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Identifier of the annotation file, unique within a dataset.
    #[serde(default)]
    pub file: String,
    /// Source image path; empty when derivable from `file`.
    #[serde(default)]
    pub image: String,
    pub objects: Vec<LabeledObject>,
}

impl AnnotationRecord {
    /// Distinct object names present in the record.
    pub fn distinct_names(&self) -> BTreeSet<&str> {
        self.objects.iter().map(|o| o.name.as_str()).collect()
    }

    /// All outlines labeled with the given name (a scene may hold several
    /// same-named objects).
    pub fn objects_named<'a>(&'a self, name: &str) -> Vec<&'a LabeledObject> {
        self.objects.iter().filter(|o| o.name == name).collect()
    }

    /// Source image path, defaulting to the annotation filename with a
    /// `.jpg` extension when the record does not name one.
    pub fn image_file(&self) -> String {
        if !self.image.is_empty() {
            return self.image.clone();
        }
        match self.file.rsplit_once('.') {
            Some((stem, _)) => format!("{stem}.jpg"),
            None => format!("{}.jpg", self.file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutout::Vertex;

    fn record() -> AnnotationRecord {
        let polygon = Polygon::new(vec![
            Vertex::new(0, 0),
            Vertex::new(4, 0),
            Vertex::new(4, 4),
        ]);
        AnnotationRecord {
            file: "scene_01.json".into(),
            image: String::new(),
            objects: vec![
                LabeledObject {
                    name: "dog".into(),
                    polygon: polygon.clone(),
                },
                LabeledObject {
                    name: "dog".into(),
                    polygon: polygon.clone(),
                },
                LabeledObject {
                    name: "tree".into(),
                    polygon,
                },
            ],
        }
    }

    #[test]
    fn distinct_names_deduplicate() {
        let record = record();
        let names: Vec<&str> = record.distinct_names().into_iter().collect();
        assert_eq!(names, vec!["dog", "tree"]);
    }

    #[test]
    fn objects_named_returns_every_match() {
        assert_eq!(record().objects_named("dog").len(), 2);
        assert!(record().objects_named("cat").is_empty());
    }

    #[test]
    fn image_file_falls_back_to_jpg_sibling() {
        assert_eq!(record().image_file(), "scene_01.jpg");

        let mut explicit = record();
        explicit.image = "photos/scene_01.png".into();
        assert_eq!(explicit.image_file(), "photos/scene_01.png");
    }
}
