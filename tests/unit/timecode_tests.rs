/*!
 * Tests for SMPTE timecode arithmetic
 */

use std::cmp::Ordering;
use sccfix::errors::CorrectionError;
use sccfix::timecode::{FrameRate, Timecode};

/// Frame counts spread over the first two hours, including minute edges
fn sample_frame_counts() -> Vec<u64> {
    let mut counts: Vec<u64> = (0..4000).collect();
    counts.extend((0..200).map(|i| i * 1_079));
    counts.extend([17_981, 17_982, 17_983, 107_891, 107_892, 215_783]);
    counts
}

#[test]
fn test_fromFrames_toFrames_withEveryRateAndMode_shouldRoundTrip() {
    for rate in FrameRate::ALL {
        for drop_frame in [false, true] {
            for n in sample_frame_counts() {
                let tc = Timecode::from_frames(n, rate, drop_frame);
                assert_eq!(tc.to_frames(), n, "{} df={} n={}", rate, drop_frame, n);
            }
        }
    }
}

#[test]
fn test_render_parse_withEveryRateAndMode_shouldRoundTrip() {
    for rate in FrameRate::ALL {
        for drop_frame in [false, true] {
            for n in sample_frame_counts() {
                let rendered = Timecode::from_frames(n, rate, drop_frame).to_string();
                let parsed = Timecode::parse(&rendered, rate).unwrap();
                assert_eq!(parsed.to_string(), rendered);
                assert_eq!(parsed.to_frames(), n);
            }
        }
    }
}

#[test]
fn test_fromFrames_withDropFrame_shouldNeverRenderSkippedNumbers() {
    for n in 0..(2 * 107_892) {
        let fields = Timecode::from_frames(n, FrameRate::Fps29_97, true).fields();
        if fields.seconds == 0 && fields.minutes % 10 != 0 {
            assert!(fields.frames >= 2, "frame {} rendered as {:?}", n, fields);
        }
    }
}

#[test]
fn test_dropFrame_atMinuteBoundary_shouldSkipTwoNumbers() {
    let before = Timecode::parse("00:00:59;29", FrameRate::Fps29_97).unwrap();
    assert_eq!(before.add(1).to_string(), "00:01:00;02");

    let tenth = Timecode::parse("00:09:59;29", FrameRate::Fps29_97).unwrap();
    assert_eq!(tenth.add(1).to_string(), "00:10:00;00");
}

#[test]
fn test_parse_withSkippedDropFrameNumber_shouldFail() {
    let result = Timecode::parse("00:01:00;00", FrameRate::Fps29_97);
    assert!(matches!(result, Err(CorrectionError::Format(_))));
}

#[test]
fn test_parse_withDropSeparatorAtOtherRate_shouldFail() {
    for rate in [FrameRate::Fps23_976, FrameRate::Fps24, FrameRate::Fps25, FrameRate::Fps30] {
        assert!(matches!(
            Timecode::parse("00:00:01;00", rate),
            Err(CorrectionError::Format(_))
        ));
    }
}

#[test]
fn test_parse_withOutOfRangeFields_shouldFail() {
    for bad in ["24:00:00:00", "00:60:00:00", "00:00:60:00", "00:00:00:25", "0:00:00:00", "00:00:00.00"] {
        assert!(Timecode::parse(bad, FrameRate::Fps25).is_err(), "{}", bad);
    }
    assert!(Timecode::parse("00:00:00:24", FrameRate::Fps25).is_ok());
}

#[test]
fn test_subtract_withEqualTimecodes_shouldBeZero() {
    let a = Timecode::parse("01:00:00:00", FrameRate::Fps24).unwrap();
    assert_eq!(a.subtract(&a), 0);

    let b = a.add(48);
    assert_eq!(b.subtract(&a), 48);
    assert_eq!(a.subtract(&b), -48);
}

#[test]
fn test_compare_acrossRates_shouldUseNominalTime() {
    let hour_df = Timecode::parse("01:00:00;00", FrameRate::Fps29_97).unwrap();
    let hour_pal = Timecode::parse("01:00:00:00", FrameRate::Fps25).unwrap();
    let hour_film = Timecode::parse("01:00:00:00", FrameRate::Fps23_976).unwrap();

    assert_eq!(hour_df.compare(&Timecode::boundary(1, 0)), Ordering::Equal);
    assert_eq!(hour_pal.compare(&hour_film), Ordering::Equal);
    assert_eq!(hour_pal.add(1).compare(&hour_df), Ordering::Greater);

    let late_header = Timecode::parse("00:59:59:24", FrameRate::Fps25).unwrap();
    assert_eq!(late_header.compare(&Timecode::boundary(1, 0)), Ordering::Less);
}

#[test]
fn test_retimed_shouldKeepDigits() {
    let start = Timecode::parse("00:10:00;00", FrameRate::Fps29_97).unwrap();
    let pal = start.retimed(FrameRate::Fps25, false).unwrap();
    assert_eq!(pal.to_string(), "00:10:00:00");
    assert_eq!(pal.to_frames(), 15_000);

    let frames_high = Timecode::parse("00:00:00:27", FrameRate::Fps30).unwrap();
    assert!(frames_high.retimed(FrameRate::Fps25, false).is_err());
}

#[test]
fn test_framesPerHour_shouldMatchRenderedHour() {
    for rate in FrameRate::ALL {
        for drop_frame in [false, true] {
            let hour = Timecode::from_frames(0, rate, drop_frame);
            let rendered = Timecode::from_frames(hour.frames_per_hour(), rate, drop_frame).to_string();
            assert!(rendered.starts_with("01:00:00"), "{} df={} -> {}", rate, drop_frame, rendered);
        }
    }
}

#[test]
fn test_conversionRatio_shouldUseExactNtscFractions() {
    assert_eq!(FrameRate::Fps25.conversion_ratio(FrameRate::Fps29_97), (30_000, 25_025));
    assert_eq!(FrameRate::Fps29_97.conversion_ratio(FrameRate::Fps23_976), (24_000 * 1001, 1001 * 30_000));
}
