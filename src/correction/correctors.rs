/*!
 * Caption correctors.
 *
 * Each corrector reads a document in its current encoding and returns the
 * rewritten document plus the filename suffix describing the change. They
 * are pure: no I/O, identical inputs give identical output.
 */

use crate::caption_document::{CaptionDocument, CaptionLine};
use crate::errors::CorrectionError;
use crate::timecode::{FrameRate, Timecode, TimecodeFields};

use super::context::CorrectionContext;

/// A corrected document and the filename suffix for the change
pub type Corrected = (CaptionDocument, String);

/// Minutes of hour 0 that hold vestigial header entries
const VESTIGIAL_MINUTES: [u32; 2] = [58, 59];

/// Origin of the timeline a document currently sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Captions are still positioned against the video start
    VideoStart,
    /// A re-origin step moved the first program frame to `00:00:00:00`
    Zero,
}

impl Anchor {
    /// The anchor as a timecode in the given encoding
    fn timecode(self, ctx: &CorrectionContext, frame_rate: FrameRate, drop_frame: bool) -> Result<Timecode, CorrectionError> {
        match self {
            Anchor::VideoStart => ctx.video_starting_timecode.retimed(frame_rate, drop_frame),
            Anchor::Zero => Ok(Timecode::from_frames(0, frame_rate, drop_frame)),
        }
    }
}

/// Drop entries in minutes 58/59 of hour 0 and move everything else back one hour.
///
/// A dropped entry takes its following blank separator line with it.
pub fn remove_vestigial_header(doc: &CaptionDocument, _ctx: &CorrectionContext) -> Result<Corrected, CorrectionError> {
    let mut lines = Vec::with_capacity(doc.lines.len());
    let mut iter = doc.lines.iter().peekable();

    while let Some(line) = iter.next() {
        match line {
            CaptionLine::Caption(record) => {
                let fields = record.timecode.fields();
                if fields.hours == 0 && VESTIGIAL_MINUTES.contains(&fields.minutes) {
                    if matches!(iter.peek(), Some(CaptionLine::Blank(_))) {
                        iter.next();
                    }
                    continue;
                }

                let one_hour = record.timecode.frames_per_hour() as i64;
                let shifted = record.timecode.checked_offset(-one_hour).ok_or_else(|| {
                    CorrectionError::OutOfSpec(format!(
                        "caption at {} precedes the one-hour program start",
                        record.timecode
                    ))
                })?;
                lines.push(CaptionLine::Caption(record.with_timecode(shifted)));
            }
            other => lines.push(other.clone()),
        }
    }

    Ok((doc.derive(lines, doc.frame_rate, doc.drop_frame), "_58_59_removed".to_string()))
}

/// Move a one-hour caption origin back to zero.
///
/// The shift origin is the video start when it is itself at least one hour
/// and not after the caption start, otherwise exactly one hour. The origin
/// lands on `00:00:00:00`; in one-based frame numbers every entry becomes
/// `n - (origin - 1)`.
pub fn shift_hour_origin(doc: &CaptionDocument, ctx: &CorrectionContext) -> Result<Corrected, CorrectionError> {
    let video_start = &ctx.video_starting_timecode;
    let use_video_start = video_start.compare(&Timecode::boundary(1, 0)).is_ge()
        && video_start.compare(&ctx.scc_starting_timecode).is_le();

    let origin = if use_video_start {
        video_start.retimed(doc.frame_rate, doc.drop_frame)?
    } else {
        one_hour(doc.frame_rate, doc.drop_frame)?
    };

    let origin_offset = origin.frame_number() as i64 - 1;
    let shifted = doc.map_timecodes(doc.frame_rate, doc.drop_frame, |tc| {
        tc.checked_offset(-origin_offset).ok_or_else(|| {
            CorrectionError::OutOfSpec(format!("caption at {} precedes the shift origin {}", tc, origin))
        })
    })?;

    Ok((shifted, "_hour_shifted".to_string()))
}

/// Retime captions from their rate to the video rate.
///
/// Positions are taken relative to the anchor (read at the caption rate),
/// scaled by the exact rate ratio rounding up, and re-anchored at the video
/// rate. Output is non-drop-frame.
pub fn convert_frame_rate(doc: &CaptionDocument, ctx: &CorrectionContext, anchor: Anchor) -> Result<Corrected, CorrectionError> {
    let target_rate = ctx.video_frame_rate;
    let pre_delta = anchor.timecode(ctx, doc.frame_rate, doc.drop_frame)?;
    let post_delta = anchor.timecode(ctx, target_rate, false)?;
    let (numerator, denominator) = doc.frame_rate.conversion_ratio(target_rate);

    let converted = doc.map_timecodes(target_rate, false, |tc| {
        let relative = offset_from(tc, &pre_delta)?;
        let scaled = ceil_div(relative * numerator, denominator);
        Ok(Timecode::from_frames(post_delta.to_frames() + scaled, target_rate, false))
    })?;

    let suffix = format!(
        "_{}_to_{}",
        doc.frame_rate.filename_token(doc.drop_frame),
        target_rate.filename_token(false)
    );
    Ok((converted, suffix))
}

/// Switch 29.97 captions between drop-frame and non-drop-frame rendering.
///
/// Same anchoring as `convert_frame_rate`, without scaling.
pub fn convert_drop_frame(doc: &CaptionDocument, ctx: &CorrectionContext, anchor: Anchor) -> Result<Corrected, CorrectionError> {
    if doc.frame_rate != FrameRate::Fps29_97 {
        return Err(CorrectionError::OutOfSpec(format!(
            "drop-frame conversion needs 29.97 captions, found {}",
            doc.frame_rate
        )));
    }

    let to_drop_frame = ctx.video_drop_frame;
    let pre_delta = anchor.timecode(ctx, FrameRate::Fps29_97, doc.drop_frame)?;
    let post_delta = anchor.timecode(ctx, FrameRate::Fps29_97, to_drop_frame)?;

    let converted = doc.map_timecodes(FrameRate::Fps29_97, to_drop_frame, |tc| {
        let relative = offset_from(tc, &pre_delta)?;
        Ok(Timecode::from_frames(post_delta.to_frames() + relative, FrameRate::Fps29_97, to_drop_frame))
    })?;

    let suffix = if to_drop_frame { "_ndf_to_df" } else { "_df_to_ndf" };
    Ok((converted, suffix.to_string()))
}

fn one_hour(frame_rate: FrameRate, drop_frame: bool) -> Result<Timecode, CorrectionError> {
    Timecode::from_fields(
        TimecodeFields {
            hours: 1,
            minutes: 0,
            seconds: 0,
            frames: 0,
        },
        frame_rate,
        drop_frame,
    )
}

/// Frames from the anchor to a caption; a caption on the anchor is at 0
fn offset_from(tc: &Timecode, anchor: &Timecode) -> Result<u64, CorrectionError> {
    u64::try_from(tc.subtract(anchor)).map_err(|_| {
        CorrectionError::OutOfSpec(format!("caption at {} precedes the timeline origin {}", tc, anchor))
    })
}

/// Integer division rounding up; converted captions never move earlier
fn ceil_div(value: u64, divisor: u64) -> u64 {
    value.div_ceil(divisor)
}
