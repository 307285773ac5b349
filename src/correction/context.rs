/*!
 * Per-job correction context.
 *
 * Derived once from the job's metadata and the caption text, then shared
 * read-only by every detector and corrector.
 */

use crate::errors::CorrectionError;
use crate::timecode::{FrameRate, Timecode};

use super::deduction::{RateDeduction, deduce_scc_frame_rate, is_non_drop_frame};

/// Immutable attributes of the caption file and its video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionContext {
    /// First caption timecode as reported by media metadata
    pub scc_starting_timecode: Timecode,
    /// First video frame timecode
    pub video_starting_timecode: Timecode,
    /// Deduced caption rate
    pub scc_frame_rate: FrameRate,
    /// Caption drop-frame mode, from the starting timecode separator
    pub scc_drop_frame: bool,
    pub video_frame_rate: FrameRate,
    pub video_drop_frame: bool,
}

impl CorrectionContext {
    /// Deduce caption attributes and build the context.
    ///
    /// Returns the rate deduction alongside so callers can surface its confidence.
    pub fn deduce(
        scc_start: &str,
        video_start: &str,
        video_frame_rate: FrameRate,
        scc_text: &str,
    ) -> Result<(Self, RateDeduction), CorrectionError> {
        let scc_non_drop = is_non_drop_frame(scc_start);
        let deduction = deduce_scc_frame_rate(scc_non_drop, scc_text.lines())?;

        let scc_starting_timecode = Timecode::parse(scc_start, deduction.frame_rate)?;
        let video_starting_timecode = Timecode::parse(video_start, video_frame_rate)?;

        let context = Self {
            scc_starting_timecode,
            video_starting_timecode,
            scc_frame_rate: deduction.frame_rate,
            scc_drop_frame: scc_starting_timecode.is_drop_frame(),
            video_frame_rate,
            video_drop_frame: video_starting_timecode.is_drop_frame(),
        };

        Ok((context, deduction))
    }

    /// Build a context from already-known attributes
    pub fn new(scc_starting_timecode: Timecode, video_starting_timecode: Timecode) -> Self {
        Self {
            scc_starting_timecode,
            video_starting_timecode,
            scc_frame_rate: scc_starting_timecode.frame_rate(),
            scc_drop_frame: scc_starting_timecode.is_drop_frame(),
            video_frame_rate: video_starting_timecode.frame_rate(),
            video_drop_frame: video_starting_timecode.is_drop_frame(),
        }
    }
}
