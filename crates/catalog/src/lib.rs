//! # Annotation Catalog Library
//!
//! Scans a dataset of parsed annotation records, filters out negligibly
//! small objects by polygon area, and builds a deterministic, persistable
//! name-to-files index over the rest. Queries resolve an object name to the
//! annotation files containing it and can pick a single candidate, either
//! at random or preferring the least cluttered scene.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use catalog::{IndexBuilder, JsonDirectorySource, ObjectIndex};
//!
//! let source = JsonDirectorySource::new("data");
//! let index = IndexBuilder::new().build(&source)?;
//! index.save("data/index.json")?;
//!
//! let reloaded = ObjectIndex::load("data/index.json")?;
//! for file in reloaded.lookup("dog") {
//!     println!("{file}");
//! }
//! # Ok::<(), catalog::CatalogError>(())
//! ```

pub mod builder;
pub mod cooccurrence;
pub mod error;
pub mod index;
pub mod query;
pub mod record;
pub mod source;

pub use builder::{DEFAULT_MIN_AREA, IndexBuilder};
pub use cooccurrence::{
    CooccurrenceEstimate, DEFAULT_PROBABILITY_THRESHOLD, MAX_COMPANIONS, companions,
};
pub use error::{CatalogError, Result};
pub use index::ObjectIndex;
pub use query::{SelectionStrategy, distinct_object_counts, select_candidate};
pub use record::{AnnotationRecord, LabeledObject};
pub use source::{AnnotationSource, JsonDirectorySource};
