/*!
 * Queue adapter around the correction engine.
 *
 * - `job`: event parsing and fail-closed validation
 * - `object_store`: caption object addressing and storage
 * - `results`: result records and the channels that carry them
 * - `runner`: end-to-end job execution
 */

pub mod job;
pub mod object_store;
pub mod results;
pub mod runner;

// Re-export main types
pub use job::{EventFields, Job, fold_frame_rate};
pub use object_store::{LocalObjectStore, ObjectStore, ObjectUrl, output_object_key};
pub use results::{JsonLinesResultSink, ResultRecord, ResultSink, ResultStatus, WebhookResultSink};
pub use runner::{JobRunner, ProcessedJob};
