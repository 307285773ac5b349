/*!
 * Tests for queue event parsing and job validation
 */

use sccfix::adapter::{EventFields, Job, output_object_key};
use sccfix::errors::CorrectionError;
use sccfix::timecode::FrameRate;
use crate::common;

fn valid_event(rate: &str) -> String {
    common::event_json(
        "vs-1001",
        "s3://media-bucket/captions/show_25.scc",
        "s3://media-bucket/corrected/",
        "01:00:00:00",
        "00:00:00:00",
        rate,
    )
}

#[test]
fn test_job_fromEvent_withValidEvent_shouldKeepFieldsVerbatim() {
    let job = Job::from_event(&valid_event("25")).unwrap();

    assert_eq!(job.job_id, "vs-1001");
    assert_eq!(job.source_url, "s3://media-bucket/captions/show_25.scc");
    assert_eq!(job.output_url, "s3://media-bucket/corrected/");
    assert_eq!(job.video_frame_rate, FrameRate::Fps25);
}

#[test]
fn test_job_fromEvent_withHighDeliveryRates_shouldFold() {
    assert_eq!(Job::from_event(&valid_event("50")).unwrap().video_frame_rate, FrameRate::Fps25);
    assert_eq!(Job::from_event(&valid_event("60")).unwrap().video_frame_rate, FrameRate::Fps30);
    assert_eq!(Job::from_event(&valid_event("59.94")).unwrap().video_frame_rate, FrameRate::Fps29_97);
    assert_eq!(Job::from_event(&valid_event("23.98")).unwrap().video_frame_rate, FrameRate::Fps23_976);
}

#[test]
fn test_eventFields_withNumericValue_shouldNormaliseToString() {
    let text = serde_json::json!({
        "Records": [{"body": {"field": [
            {"key": "mi_time_code_frame_rate", "value": 29.97},
            {"key": "vs_job_id", "value": "\"quoted\""}
        ]}}]
    })
    .to_string();

    let fields = EventFields::from_json(&text).unwrap();
    assert_eq!(fields.get("mi_time_code_frame_rate"), Some("29.97"));
    assert_eq!(fields.job_id(), Some("quoted"));
}

#[test]
fn test_eventFields_withoutRecords_shouldFailValidation() {
    let result = EventFields::from_json(r#"{"body": {}}"#);
    assert!(matches!(result, Err(CorrectionError::Validation(_))));

    let result = EventFields::from_json("not json");
    assert!(matches!(result, Err(CorrectionError::Validation(_))));
}

#[test]
fn test_job_fromEvent_withMalformedTimecode_shouldFailValidation() {
    let text = common::event_json("j", "s3://b/a.scc", "s3://b/out/", "1:00:00:00", "00:00:00:00", "25");
    assert!(matches!(Job::from_event(&text), Err(CorrectionError::Validation(_))));
}

#[test]
fn test_job_fromEvent_withOutOfRangeVideoStart_shouldFailValidation() {
    let cases = [
        ("00:99:00:40", "25"),
        ("00:00:00:25", "25"),
        ("00:00:00:24", "23.976"),
        ("00:01:00;01", "29.97"),
    ];

    for (video_start, rate) in cases {
        let text = common::event_json("j", "s3://b/a.scc", "s3://b/out/", "01:00:00:00", video_start, rate);
        match Job::from_event(&text) {
            Err(CorrectionError::Validation(msg)) => assert!(msg.contains("mi_time_code_first_frame"), "{}", msg),
            other => panic!("{} at {} gave {:?}", video_start, rate, other),
        }
    }
}

#[test]
fn test_job_fromEvent_withUppercaseExtension_shouldAccept() {
    let text = common::event_json("j", "s3://b/A.SCC", "s3://b/out/", "00:00:00:00", "00:00:00:00", "24");
    assert!(Job::from_event(&text).is_ok());
}

#[test]
fn test_outputObjectKey_withSourceBucketPrefix_shouldAppendFilename() {
    let key = output_object_key("s3://media-bucket/corrected/", "media-bucket", "show_25_hour_shifted.scc").unwrap();
    assert_eq!(key, "corrected/show_25_hour_shifted.scc");
}
