pub mod record;
pub mod report;

pub use record::{Record, RecordId, RecordStatus};
pub use report::ProcessingReport;
