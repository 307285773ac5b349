/*!
 * # sccfix - SCC caption timing correction
 *
 * A Rust library for repairing the timing of Scenarist Closed Caption (SCC)
 * files so they line up with the video they belong to.
 *
 * ## Features
 *
 * - Deduce an SCC file's frame rate from its timecodes
 * - Detect and repair common timing defects:
 *   - Vestigial 58/59-minute header entries ahead of a one-hour program
 *   - Captions authored against a one-hour origin
 *   - Caption/video frame rate mismatches (23.976, 24, 25, 29.97, 30)
 *   - Drop-frame / non-drop-frame mismatches at 29.97
 * - Preserve everything in the file except the timecode fields
 * - Queue adapter: event parsing, object storage and result records
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: SMPTE timecode arithmetic and frame rates
 * - `caption_document`: SCC line model
 * - `correction`: the pure correction engine:
 *   - `correction::deduction`: frame rate deduction
 *   - `correction::detectors`: defect predicates
 *   - `correction::correctors`: document rewrites
 *   - `correction::orchestrator`: ordered application of corrections
 * - `adapter`: queue events, object storage, result channels and the job runner
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod adapter;
pub mod app_config;
pub mod caption_document;
pub mod correction;
pub mod errors;
pub mod file_utils;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use caption_document::{CaptionDocument, CaptionLine, CaptionRecord};
pub use correction::{Correction, CorrectionContext, CorrectionOutcome, correct};
pub use errors::{AppError, CorrectionError, ResultChannelError, StorageError};
pub use timecode::{FrameRate, Timecode};
