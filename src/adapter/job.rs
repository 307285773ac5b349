/*!
 * Queue event parsing and job validation.
 *
 * Upstream messages look like
 * `{"Records":[{"body":{"field":[{"key":K,"value":V},...]}}]}`.
 * The body may arrive JSON-encoded as a string, and every string value is
 * itself tried as JSON, so `"25"` and `25` are equivalent.
 */

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::CorrectionError;
use crate::timecode::{FrameRate, Timecode};

pub const KEY_JOB_ID: &str = "vs_job_id";
pub const KEY_SOURCE_URL: &str = "s3_url";
pub const KEY_OUTPUT_URL: &str = "output_s3_url";
pub const KEY_SCC_START: &str = "mi_text_time_code_first_frame";
pub const KEY_VIDEO_START: &str = "mi_time_code_first_frame";
pub const KEY_VIDEO_RATE: &str = "mi_time_code_frame_rate";

// Required keys and the message reported when each is missing
const REQUIRED_KEYS: [(&str, &str); 6] = [
    (KEY_JOB_ID, "No vs_job_id found in event body"),
    (KEY_SOURCE_URL, "No input s3 url found in event body"),
    (KEY_OUTPUT_URL, "No output s3 url found in event body"),
    (KEY_SCC_START, "No SCC starting timecode found in event body"),
    (KEY_VIDEO_START, "No video starting timecode found in event body"),
    (KEY_VIDEO_RATE, "No video frame rate found in event body"),
];

/// Rates accepted after folding
const ACCEPTED_RATES: [&str; 6] = ["23.976", "23.98", "24", "25", "29.97", "30"];

static START_TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2}[:;]\d{2}$").unwrap()
});

static NTSC_30_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^29\.9").unwrap());
static NTSC_24_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^23\.9").unwrap());

/// Fold a delivered video rate onto its SMPTE timecode equivalent.
///
/// Timecode tops out at 30 frames, so 50/60 fps video is counted like its
/// half-rate counterpart.
pub fn fold_frame_rate(value: &str) -> String {
    let value = value.trim();
    match value {
        "50" => "25".to_string(),
        "60" => "30".to_string(),
        "59.94" => "29.97".to_string(),
        _ if NTSC_30_REGEX.is_match(value) => "29.97".to_string(),
        _ if NTSC_24_REGEX.is_match(value) => "23.976".to_string(),
        _ => value.to_string(),
    }
}

/// Key/value fields of one queue event, values normalised to strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFields {
    fields: BTreeMap<String, String>,
}

impl EventFields {
    /// Parse the raw event text
    pub fn from_json(text: &str) -> Result<Self, CorrectionError> {
        let event: Value = serde_json::from_str(text)
            .map_err(|e| CorrectionError::Validation(format!("event is not valid JSON: {}", e)))?;
        Self::from_value(&event)
    }

    /// Extract the fields of the first record of an event
    pub fn from_value(event: &Value) -> Result<Self, CorrectionError> {
        // the whole event may itself be a JSON-encoded string
        let event = decode_embedded(event)?;

        let body = event
            .get("Records")
            .and_then(|records| records.get(0))
            .and_then(|record| record.get("body"))
            .ok_or_else(|| CorrectionError::Validation("event has no Records[0].body".to_string()))?;
        let body = decode_embedded(body)?;

        let mut fields = BTreeMap::new();
        let entries = body.get("field").and_then(Value::as_array).cloned().unwrap_or_default();
        for entry in entries {
            let Some(key) = entry.get("key").and_then(Value::as_str) else {
                continue;
            };
            let Some(value) = entry.get("value").map(normalise_value) else {
                continue;
            };
            let value = if key == KEY_VIDEO_RATE { fold_frame_rate(&value) } else { value };
            fields.insert(key.to_string(), value);
        }

        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Job id, when the event carries one, for failure reporting
    pub fn job_id(&self) -> Option<&str> {
        self.get(KEY_JOB_ID)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EventFields {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let fields = iter
            .into_iter()
            .map(|(key, value)| {
                let key = key.into();
                let value = value.into();
                let value = if key == KEY_VIDEO_RATE { fold_frame_rate(&value) } else { value };
                (key, value)
            })
            .collect();
        Self { fields }
    }
}

fn decode_embedded(value: &Value) -> Result<Value, CorrectionError> {
    match value {
        Value::String(text) => serde_json::from_str(text)
            .map_err(|e| CorrectionError::Validation(format!("embedded event body is not valid JSON: {}", e))),
        other => Ok(other.clone()),
    }
}

fn normalise_value(value: &Value) -> String {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::String(inner)) => inner,
            Ok(Value::Number(number)) => number.to_string(),
            _ => text.clone(),
        },
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

/// A validated correction job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Opaque upstream id, echoed back verbatim
    pub job_id: String,
    /// Source caption object
    pub source_url: String,
    /// Destination prefix
    pub output_url: String,
    pub scc_starting_timecode: String,
    pub video_starting_timecode: String,
    /// Video rate after folding
    pub video_frame_rate: FrameRate,
}

impl Job {
    /// Parse and validate raw event text
    pub fn from_event(text: &str) -> Result<Self, CorrectionError> {
        Self::from_fields(&EventFields::from_json(text)?)
    }

    /// Validate extracted fields. Fails closed on anything missing or malformed.
    pub fn from_fields(fields: &EventFields) -> Result<Self, CorrectionError> {
        for (key, message) in REQUIRED_KEYS {
            if fields.get(key).is_none() {
                return Err(CorrectionError::Validation(message.to_string()));
            }
        }
        let field = |key: &str| fields.get(key).unwrap_or_default().to_string();

        let source_url = field(KEY_SOURCE_URL);
        let is_scc = source_url
            .get(source_url.len().saturating_sub(3)..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("scc"));
        if !is_scc {
            return Err(CorrectionError::Validation(format!("Input file not an scc: {}", source_url)));
        }

        let video_starting_timecode = field(KEY_VIDEO_START);
        if !START_TIMECODE_REGEX.is_match(&video_starting_timecode) {
            return Err(CorrectionError::Validation(format!(
                "video {} not formatted correctly: {}",
                KEY_VIDEO_START, video_starting_timecode
            )));
        }

        let scc_starting_timecode = field(KEY_SCC_START);
        if !START_TIMECODE_REGEX.is_match(&scc_starting_timecode) {
            return Err(CorrectionError::Validation(format!(
                "scc {} not formatted correctly: {}",
                KEY_SCC_START, scc_starting_timecode
            )));
        }

        let rate = field(KEY_VIDEO_RATE);
        if !ACCEPTED_RATES.contains(&rate.as_str()) {
            return Err(CorrectionError::Validation(format!(
                "video {} an unexpected number: {}",
                KEY_VIDEO_RATE, rate
            )));
        }
        let video_frame_rate: FrameRate = rate.parse()?;

        if video_starting_timecode.contains(';') && !video_frame_rate.supports_drop_frame() {
            return Err(CorrectionError::Validation(format!(
                "drop-frame video timecode {} at {} fps",
                video_starting_timecode, video_frame_rate
            )));
        }
        Timecode::parse(&video_starting_timecode, video_frame_rate).map_err(|e| {
            CorrectionError::Validation(format!("video {} out of range: {}", KEY_VIDEO_START, e))
        })?;

        Ok(Self {
            job_id: field(KEY_JOB_ID),
            source_url,
            output_url: field(KEY_OUTPUT_URL),
            scc_starting_timecode,
            video_starting_timecode,
            video_frame_rate,
        })
    }

    pub fn log_summary(&self) {
        info!("{} provided as vs job id.", self.job_id);
        info!("{} provided as input file path.", self.source_url);
        info!("{} provided as the output file path.", self.output_url);
        info!("{} provided as scc starting timecode.", self.scc_starting_timecode);
        info!("{} provided as video starting timecode.", self.video_starting_timecode);
        info!("{} provided as video frame rate.", self.video_frame_rate);
    }
}
