/*!
 * Defect detectors.
 *
 * Pure predicates over a `CorrectionContext`. Threshold checks compare
 * positions rate-agnostically against whole-minute boundaries.
 */

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::errors::CorrectionError;
use crate::timecode::Timecode;

use super::context::CorrectionContext;

/// Defect classes the engine knows how to repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Defect {
    /// Stray entries at minutes 58/59 of hour 0 ahead of a one-hour program
    VestigialHeader,
    /// Captions authored against a one-hour origin
    HourOrigin,
    /// Caption rate differs from the video rate
    FrameRateMismatch,
    /// Caption drop-frame mode differs from the video's
    DropFrameMismatch,
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Defect::VestigialHeader => "vestigial 58/59-minute header",
            Defect::HourOrigin => "one-hour timecode origin",
            Defect::FrameRateMismatch => "frame rate mismatch",
            Defect::DropFrameMismatch => "drop-frame mismatch",
        };
        write!(f, "{}", label)
    }
}

/// Fail fast when either start lies outside the 0-2 hour correction window
pub fn check_supported_window(ctx: &CorrectionContext) -> Result<(), CorrectionError> {
    let scc_start = &ctx.scc_starting_timecode;
    let video_start = &ctx.video_starting_timecode;

    if scc_start.compare(&Timecode::boundary(2, 0)) != Ordering::Less {
        return Err(CorrectionError::OutOfSpec(format!(
            "SCC starts at {}, at or beyond two hours",
            scc_start
        )));
    }
    if video_start.compare(&Timecode::boundary(1, 0)) == Ordering::Greater {
        return Err(CorrectionError::OutOfSpec(format!(
            "video starts at {}, beyond one hour",
            video_start
        )));
    }
    Ok(())
}

/// SCC start in [00:58:00:00, 01:00:00:00) against a video starting at exactly one hour
pub fn needs_vestigial_header_removal(ctx: &CorrectionContext) -> bool {
    let scc_start = &ctx.scc_starting_timecode;
    scc_start.compare(&Timecode::boundary(0, 58)) != Ordering::Less
        && scc_start.compare(&Timecode::boundary(1, 0)) == Ordering::Less
        && ctx.video_starting_timecode.compare(&Timecode::boundary(1, 0)) == Ordering::Equal
}

/// SCC start at or after one hour
pub fn needs_hour_shift(ctx: &CorrectionContext) -> bool {
    ctx.scc_starting_timecode.compare(&Timecode::boundary(1, 0)) != Ordering::Less
}

pub fn needs_frame_rate_conversion(ctx: &CorrectionContext) -> bool {
    ctx.scc_frame_rate != ctx.video_frame_rate
}

pub fn needs_drop_frame_conversion(ctx: &CorrectionContext) -> bool {
    ctx.scc_drop_frame != ctx.video_drop_frame
}

/// Every defect that applies, in check order
pub fn detect(ctx: &CorrectionContext) -> Vec<Defect> {
    let checks: [(Defect, fn(&CorrectionContext) -> bool); 4] = [
        (Defect::VestigialHeader, needs_vestigial_header_removal),
        (Defect::HourOrigin, needs_hour_shift),
        (Defect::FrameRateMismatch, needs_frame_rate_conversion),
        (Defect::DropFrameMismatch, needs_drop_frame_conversion),
    ];

    checks
        .iter()
        .filter(|(_, check)| check(ctx))
        .map(|(defect, _)| *defect)
        .collect()
}
