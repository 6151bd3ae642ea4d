//! Stream utilities

mod coalesce;

pub use coalesce::{Coalesce, CoalesceExt};
