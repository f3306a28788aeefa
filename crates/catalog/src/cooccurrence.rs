use serde::{Deserialize, Serialize};

/// Probability below which a companion estimate is ignored.
pub const DEFAULT_PROBABILITY_THRESHOLD: f64 = 0.10;

/// Most names rendered for one query, the query itself included.
pub const MAX_COMPANIONS: usize = 5;

/// One answer from the remote co-occurrence estimator: a candidate name and
/// the probability, in [0, 1], of it appearing in a scene with the query.
/// The estimator call itself lives outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooccurrenceEstimate {
    pub name: String,
    pub probability: f64,
}

/// Filters estimator answers down to the names worth rendering next to the
/// query: those strictly above `threshold`, capped at [`MAX_COMPANIONS`]
/// including the query itself. The query always comes first.
pub fn companions(
    query: &str,
    estimates: &[CooccurrenceEstimate],
    threshold: f64,
) -> Vec<String> {
    let mut names = vec![query.to_string()];
    for estimate in estimates {
        if estimate.probability > threshold {
            names.push(estimate.name.clone());
        }
    }
    names.truncate(MAX_COMPANIONS);
    names
}
