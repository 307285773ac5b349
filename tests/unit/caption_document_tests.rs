/*!
 * Tests for the SCC document model
 */

use sccfix::caption_document::{CaptionDocument, CaptionLine, leading_timecode};
use sccfix::timecode::FrameRate;
use crate::common;

#[test]
fn test_parse_withHeaderAndComments_shouldPassThroughUnchanged() {
    let text = "Scenarist_SCC V1.0\n\n// authored externally\n00:00:01:00 9420\n\n";
    let doc = CaptionDocument::parse(text, FrameRate::Fps25, false).unwrap();

    assert!(matches!(&doc.lines[2], CaptionLine::Other(line) if line == "// authored externally"));
    assert_eq!(doc.records().count(), 1);
    assert_eq!(doc.to_text(), text);
}

#[test]
fn test_parse_withWhitespaceOnlyLine_shouldKeepItVerbatim() {
    let text = "00:00:01:00 9420\n  \n00:00:02:00 9420";
    let doc = CaptionDocument::parse(text, FrameRate::Fps24, false).unwrap();

    assert!(matches!(&doc.lines[1], CaptionLine::Blank(line) if line == "  "));
    assert_eq!(doc.to_text(), text);
}

#[test]
fn test_mapTimecodes_shouldRetagDocumentEncoding() {
    let text = common::scc_text(&["00:00:01:00", "00:00:02:00"]);
    let doc = CaptionDocument::parse(&text, FrameRate::Fps29_97, false).unwrap();

    let df = doc
        .map_timecodes(FrameRate::Fps29_97, true, |tc| {
            Ok(sccfix::timecode::Timecode::from_frames(tc.to_frames(), FrameRate::Fps29_97, true))
        })
        .unwrap();

    assert!(df.drop_frame);
    assert_eq!(common::timecodes_of(&df.to_text()), vec!["00:00:01;00", "00:00:02;00"]);
}

#[test]
fn test_leadingTimecode_shouldRequireSeparatingWhitespace() {
    assert_eq!(leading_timecode("01:00:00;00 9420"), Some("01:00:00;00"));
    assert_eq!(leading_timecode("01:00:00:00\t9420"), Some("01:00:00:00"));
    assert_eq!(leading_timecode("01:00:00:009420"), None);
    assert_eq!(leading_timecode("Scenarist_SCC V1.0"), None);
}

#[test]
fn test_parse_withEmptyText_shouldRenderEmpty() {
    let doc = CaptionDocument::parse("", FrameRate::Fps25, false).unwrap();
    assert!(doc.lines.is_empty());
    assert_eq!(doc.to_text(), "");
    assert!(doc.is_chronological());
}
