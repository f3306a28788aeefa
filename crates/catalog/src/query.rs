use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::record::AnnotationRecord;

/// How to pick one annotation file out of several candidates for a name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SelectionStrategy {
    /// Uniformly random pick.
    #[default]
    Random,
    /// The least cluttered scene: the file whose record holds the fewest
    /// distinct object names, ties broken by sorted file order.
    FewestCooccurringObjects,
}

/// Distinct-object count per annotation file, derived from parsed records.
pub fn distinct_object_counts(records: &[AnnotationRecord]) -> HashMap<String, usize> {
    records
        .iter()
        .map(|record| (record.file.clone(), record.distinct_names().len()))
        .collect()
}

/// Picks one candidate file, or `None` when `files` is empty.
///
/// Files missing from `counts` are treated as maximally cluttered so a file
/// with known contents always wins over an unknown one.
pub fn select_candidate<R: Rng>(
    files: &[String],
    strategy: SelectionStrategy,
    counts: &HashMap<String, usize>,
    rng: &mut R,
) -> Option<String> {
    match strategy {
        SelectionStrategy::Random => files.choose(rng).cloned(),
        SelectionStrategy::FewestCooccurringObjects => {
            let mut sorted: Vec<&String> = files.iter().collect();
            sorted.sort();
            sorted
                .into_iter()
                .min_by_key(|file| counts.get(*file).copied().unwrap_or(usize::MAX))
                .cloned()
        }
    }
}
