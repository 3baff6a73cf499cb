pub mod dataset;
pub mod export;
pub mod extract;
pub mod groups;
pub mod ingest;
pub mod log;
pub mod monthly;
pub mod remote;
pub mod selection;

pub use dataset::{Dataset, LoadStats, Source};
pub use groups::{GroupKey, Groups};
pub use selection::Selection;
