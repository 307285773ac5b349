/*!
 * Caption attribute deduction.
 *
 * SCC files carry no frame-rate metadata. The drop-frame separator pins a
 * file to 29.97; otherwise the highest frame field seen bounds the rate from
 * below. A sparse file that never reaches the top frame numbers can look
 * slower than it is, so such deductions are flagged as low confidence.
 */

use log::{debug, warn};

use crate::caption_document::leading_timecode;
use crate::errors::CorrectionError;
use crate::timecode::FrameRate;

/// Rates a non-drop SCC file is assumed to be timed at, slowest first
const CANDIDATE_RATES: [FrameRate; 3] = [FrameRate::Fps23_976, FrameRate::Fps25, FrameRate::Fps29_97];

/// Outcome of frame-rate deduction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDeduction {
    /// Deduced caption rate
    pub frame_rate: FrameRate,
    /// Highest frame field seen, if any caption line was found
    pub max_frame: Option<u32>,
    /// Number of caption timecodes inspected
    pub timecodes_seen: usize,
    /// False when a faster candidate rate would explain the file equally well
    pub confident: bool,
}

/// True iff the separator before the frame field is `:`
pub fn is_non_drop_frame(timecode: &str) -> bool {
    timecode.chars().rev().find(|c| *c == ':' || *c == ';') == Some(':')
}

/// Deduce the rate an SCC file was authored at.
///
/// Drop-frame files are 29.97 without further inspection. Otherwise the
/// lowest candidate whose frame ceiling exceeds the highest observed frame
/// field wins.
pub fn deduce_scc_frame_rate<'a, I>(is_non_drop_frame: bool, lines: I) -> Result<RateDeduction, CorrectionError>
where
    I: IntoIterator<Item = &'a str>,
{
    if !is_non_drop_frame {
        debug!("Drop-frame separator present, SCC frame rate is 29.97");
        return Ok(RateDeduction {
            frame_rate: FrameRate::Fps29_97,
            max_frame: None,
            timecodes_seen: 0,
            confident: true,
        });
    }

    let mut max_frame: Option<u32> = None;
    let mut timecodes_seen = 0;
    for line in lines {
        let Some(timecode) = leading_timecode(line) else {
            continue;
        };
        timecodes_seen += 1;
        let frame = timecode[timecode.len() - 2..].parse::<u32>().unwrap_or_default();
        max_frame = Some(max_frame.map_or(frame, |max| max.max(frame)));
    }

    let observed = max_frame.unwrap_or(0);
    let frame_rate = CANDIDATE_RATES
        .iter()
        .copied()
        .find(|rate| rate.nominal_fps() > observed)
        .ok_or_else(|| {
            CorrectionError::Format(format!(
                "frame field {:02} exceeds every supported frame rate",
                observed
            ))
        })?;

    let confident = frame_rate == FrameRate::Fps29_97 || max_frame == Some(frame_rate.nominal_fps() - 1);

    if confident {
        debug!(
            "SCC frame rate is likely {} (max frame {:02} over {} timecodes)",
            frame_rate, observed, timecodes_seen
        );
    } else {
        warn!(
            "SCC frame rate deduced as {} with low confidence: highest frame seen is {:02} over {} timecodes",
            frame_rate, observed, timecodes_seen
        );
    }

    Ok(RateDeduction {
        frame_rate,
        max_frame,
        timecodes_seen,
        confident,
    })
}
