#![forbid(unsafe_code)]

pub mod catalog;
pub mod derive;
pub mod error;
pub mod model;
pub mod stats;
pub mod time;

pub use catalog::{Catalog, CatalogError};
pub use derive::{DerivedState, derive_states};
pub use error::Error;
pub use stats::{AcademicStatistics, attempt_average, compute_statistics};
pub use time::Clock;
