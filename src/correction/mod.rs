/*!
 * Caption correction engine.
 *
 * This module is organized into submodules:
 * - `deduction`: caption frame rate and drop-frame deduction
 * - `context`: the immutable per-job `CorrectionContext`
 * - `detectors`: pure defect predicates and the supported-window check
 * - `correctors`: the four document rewrites
 * - `orchestrator`: ordered application of the applicable correctors
 *
 * The engine performs no I/O; storage and reporting live in `adapter`.
 */

pub mod context;
pub mod correctors;
pub mod deduction;
pub mod detectors;
pub mod orchestrator;

// Re-export main types
pub use context::CorrectionContext;
pub use deduction::{RateDeduction, deduce_scc_frame_rate, is_non_drop_frame};
pub use detectors::{Defect, detect};
pub use orchestrator::{Correction, CorrectionOutcome, correct, plan};
