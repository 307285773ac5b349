/*!
 * Correction orchestrator.
 *
 * Runs the defect checks in a fixed order and folds the applicable
 * correctors over the document:
 * 1. Vestigial-header removal or hour shift (alternatives)
 * 2. Frame-rate conversion
 * 3. Drop-frame conversion, when the document's mode still differs from the video's
 */

use log::{info, warn};
use serde::Serialize;
use std::fmt;

use crate::caption_document::CaptionDocument;
use crate::errors::CorrectionError;

use super::context::CorrectionContext;
use super::correctors::{self, Anchor, Corrected};
use super::detectors::{self, Defect};

/// One step of a correction plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Correction {
    VestigialHeaderRemoval,
    HourShift,
    FrameRateConversion,
    DropFrameConversion,
}

impl Correction {
    fn apply(self, doc: &CaptionDocument, ctx: &CorrectionContext, anchor: Anchor) -> Result<Corrected, CorrectionError> {
        match self {
            Correction::VestigialHeaderRemoval => correctors::remove_vestigial_header(doc, ctx),
            Correction::HourShift => correctors::shift_hour_origin(doc, ctx),
            Correction::FrameRateConversion => correctors::convert_frame_rate(doc, ctx, anchor),
            Correction::DropFrameConversion => correctors::convert_drop_frame(doc, ctx, anchor),
        }
    }

    /// Timeline origin of the document once this step has run
    fn anchor_after(self, anchor: Anchor) -> Anchor {
        match self {
            Correction::VestigialHeaderRemoval | Correction::HourShift => Anchor::Zero,
            Correction::FrameRateConversion | Correction::DropFrameConversion => anchor,
        }
    }

    fn describe(self, before: &CaptionDocument, after: &CaptionDocument) -> String {
        match self {
            Correction::VestigialHeaderRemoval => {
                "58/59-minute header removed and SCC timecode converted to 0-hour".to_string()
            }
            Correction::HourShift => "SCC timecode converted to 0-hour".to_string(),
            Correction::FrameRateConversion => format!(
                "SCC frame rate converted from {} to {}",
                before.frame_rate, after.frame_rate
            ),
            Correction::DropFrameConversion if after.drop_frame => {
                "SCC converted from Non-Drop Frame to Drop Frame".to_string()
            }
            Correction::DropFrameConversion => {
                "SCC converted from Drop Frame to Non-Drop Frame".to_string()
            }
        }
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Correction::VestigialHeaderRemoval => "vestigial header removal",
            Correction::HourShift => "hour shift",
            Correction::FrameRateConversion => "frame rate conversion",
            Correction::DropFrameConversion => "drop-frame conversion",
        };
        write!(f, "{}", label)
    }
}

/// Result of a successful correction run
#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    /// Output filename with every applied suffix
    pub filename: String,
    /// Corrected document
    pub document: CaptionDocument,
    /// Corrections in application order
    pub applied: Vec<Correction>,
}

impl CorrectionOutcome {
    pub fn text(&self) -> String {
        self.document.to_text()
    }
}

/// Decide which corrections to run, in order.
///
/// Fails with `OutOfSpec` outside the supported window and with
/// `NoCorrectionNeeded` when no defect applies.
pub fn plan(ctx: &CorrectionContext) -> Result<Vec<Correction>, CorrectionError> {
    detectors::check_supported_window(ctx)?;

    let defects = detectors::detect(ctx);
    if defects.is_empty() {
        return Err(CorrectionError::NoCorrectionNeeded(
            "SCC file passes checks. Either nothing is wrong with it, or it has problems beyond the scope of this tool"
                .to_string(),
        ));
    }

    let mut steps = Vec::with_capacity(3);
    if defects.contains(&Defect::VestigialHeader) {
        steps.push(Correction::VestigialHeaderRemoval);
    } else if defects.contains(&Defect::HourOrigin) {
        steps.push(Correction::HourShift);
    }

    let converts_rate = defects.contains(&Defect::FrameRateMismatch);
    if converts_rate {
        steps.push(Correction::FrameRateConversion);
    }

    // rate conversion renders non-drop-frame
    let drop_frame_after = if converts_rate { false } else { ctx.scc_drop_frame };
    if drop_frame_after != ctx.video_drop_frame {
        steps.push(Correction::DropFrameConversion);
    }

    Ok(steps)
}

/// Correct one SCC file.
///
/// The window and defect checks run before the text is parsed.
pub fn correct(scc_filename: &str, scc_text: &str, ctx: &CorrectionContext) -> Result<CorrectionOutcome, CorrectionError> {
    let steps = plan(ctx)?;

    let original = CaptionDocument::parse(scc_text, ctx.scc_frame_rate, ctx.scc_drop_frame)?;
    if !original.is_chronological() {
        warn!("SCC timecodes in {} are not in chronological order", scc_filename);
    }

    let (stem, extension) = split_scc_extension(scc_filename);

    let corrected = steps.iter().try_fold(
        None::<(CaptionDocument, String, Anchor)>,
        |accumulated, step| -> Result<_, CorrectionError> {
            let (doc, name, anchor) = match &accumulated {
                Some((doc, name, anchor)) => (doc, name.as_str(), *anchor),
                None => (&original, stem, Anchor::VideoStart),
            };
            let (next_doc, suffix) = step.apply(doc, ctx, anchor)?;
            info!("{}.", step.describe(doc, &next_doc));
            Ok(Some((next_doc, format!("{}{}", name, suffix), step.anchor_after(anchor))))
        },
    )?;

    let (document, name, _) = corrected.ok_or_else(|| {
        CorrectionError::NoCorrectionNeeded("no applicable correction".to_string())
    })?;

    let filename = format!("{}{}", name, extension);
    info!("Adjusted filename: {}", filename);

    Ok(CorrectionOutcome {
        filename,
        document,
        applied: steps,
    })
}

/// Split off a trailing `.scc` (any case); names without one get `.scc` appended
fn split_scc_extension(filename: &str) -> (&str, &str) {
    let split_at = filename.len().saturating_sub(4);
    match filename.get(split_at..) {
        Some(ext) if ext.eq_ignore_ascii_case(".scc") => (&filename[..split_at], ext),
        _ => (filename, ".scc"),
    }
}
