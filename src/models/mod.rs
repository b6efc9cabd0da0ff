pub mod options;
pub mod plan;
pub mod report;

pub use options::ExtractionOptions;
pub use plan::{Batch, FileList, PartitionPlan};
pub use report::{
    FileCounts, FileOutcome, FileResult, OutputCollision, RunReport, WorkerOutcome, WorkerRecord,
    WorkerStatus,
};
