pub mod column;
pub mod raw_event;
pub mod record;

pub use column::{Column, ColumnSpec};
pub use raw_event::RawEvent;
pub use record::NormalizedRecord;
