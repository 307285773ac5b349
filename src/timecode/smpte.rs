/*!
 * SMPTE timecode values.
 *
 * A `Timecode` is a frame count at a given rate and drop-frame mode. Frame
 * count 0 renders as `00:00:00:00`. Drop-frame renderings skip frame numbers
 * 00 and 01 at the start of every minute that is not a multiple of ten.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

use super::frame_rate::FrameRate;
use crate::errors::CorrectionError;

// @const: HH:MM:SS[:;]FF
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})([:;])(\d{2})$").unwrap()
});

/// Frame numbers skipped per dropping minute at 29.97
const DROPPED_PER_MINUTE: u64 = 2;

/// Real frames in a ten-minute drop-frame block: 10 * 1800 - 9 * 2
const DF_FRAMES_PER_TEN_MINUTES: u64 = 17_982;

/// Real frames in a dropping minute: 1800 - 2
const DF_FRAMES_PER_MINUTE: u64 = 1_798;

/// Broken-down `HH:MM:SS:FF` fields of a timecode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimecodeFields {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl TimecodeFields {
    fn whole_seconds(&self) -> u64 {
        self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64
    }
}

/// An immutable SMPTE timecode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timecode {
    frame_count: u64,
    frame_rate: FrameRate,
    drop_frame: bool,
}

impl Timecode {
    /// Build a timecode from a frame count. Drop-frame is ignored for rates without it.
    pub fn from_frames(frame_count: u64, frame_rate: FrameRate, drop_frame: bool) -> Self {
        Self {
            frame_count,
            frame_rate,
            drop_frame: drop_frame && frame_rate.supports_drop_frame(),
        }
    }

    /// Parse `HH:MM:SS:FF` (non-drop) or `HH:MM:SS;FF` (drop-frame).
    ///
    /// The separator before the frame field decides the drop-frame mode; a `;`
    /// is only accepted at 29.97.
    pub fn parse(s: &str, frame_rate: FrameRate) -> Result<Self, CorrectionError> {
        let caps = TIMECODE_REGEX.captures(s).ok_or_else(|| {
            CorrectionError::Format(format!("'{}' is not a HH:MM:SS:FF timecode", s))
        })?;

        // Two ASCII digits each, so these cannot fail
        let field = |i: usize| caps[i].parse::<u32>().unwrap_or_default();
        let drop_frame = &caps[4] == ";";

        if drop_frame && !frame_rate.supports_drop_frame() {
            return Err(CorrectionError::Format(format!(
                "'{}' uses a drop-frame separator at {} fps",
                s, frame_rate
            )));
        }

        Self::from_fields(
            TimecodeFields {
                hours: field(1),
                minutes: field(2),
                seconds: field(3),
                frames: field(5),
            },
            frame_rate,
            drop_frame,
        )
        .map_err(|e| match e {
            CorrectionError::Format(msg) => CorrectionError::Format(format!("'{}': {}", s, msg)),
            other => other,
        })
    }

    /// Build a timecode from its fields, validating each range.
    pub fn from_fields(
        fields: TimecodeFields,
        frame_rate: FrameRate,
        drop_frame: bool,
    ) -> Result<Self, CorrectionError> {
        let drop_frame = drop_frame && frame_rate.supports_drop_frame();
        let fps = frame_rate.nominal_fps();

        if fields.hours >= 24 {
            return Err(CorrectionError::Format(format!("hours {} out of range", fields.hours)));
        }
        if fields.minutes >= 60 {
            return Err(CorrectionError::Format(format!("minutes {} out of range", fields.minutes)));
        }
        if fields.seconds >= 60 {
            return Err(CorrectionError::Format(format!("seconds {} out of range", fields.seconds)));
        }
        if fields.frames >= fps {
            return Err(CorrectionError::Format(format!(
                "frame {} out of range at {} fps",
                fields.frames, frame_rate
            )));
        }
        if drop_frame && is_dropped_frame_number(&fields) {
            return Err(CorrectionError::Format(format!(
                "frame {:02} does not exist in drop-frame minute {:02}",
                fields.frames, fields.minutes
            )));
        }

        let nominal = fields.whole_seconds() * fps as u64 + fields.frames as u64;
        let frame_count = if drop_frame {
            let total_minutes = fields.hours as u64 * 60 + fields.minutes as u64;
            nominal - DROPPED_PER_MINUTE * (total_minutes - total_minutes / 10)
        } else {
            nominal
        };

        Ok(Self {
            frame_count,
            frame_rate,
            drop_frame,
        })
    }

    /// A whole-minute wall-clock boundary, for rate-agnostic threshold checks
    pub fn boundary(hours: u32, minutes: u32) -> Self {
        let seconds = (hours as u64 * 60 + minutes as u64) * 60;
        Self::from_frames(seconds * 30, FrameRate::Fps30, false)
    }

    /// Zero-based frame count; `00:00:00:00` is frame 0
    pub fn to_frames(&self) -> u64 {
        self.frame_count
    }

    /// One-based frame number, counting `00:00:00:00` as frame 1
    pub fn frame_number(&self) -> u64 {
        self.frame_count + 1
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    pub fn is_drop_frame(&self) -> bool {
        self.drop_frame
    }

    /// Frames spanned by one hour of this timecode's rendering
    pub fn frames_per_hour(&self) -> u64 {
        if self.drop_frame {
            6 * DF_FRAMES_PER_TEN_MINUTES
        } else {
            3600 * self.frame_rate.nominal_fps() as u64
        }
    }

    /// Broken-down fields of the rendered form
    pub fn fields(&self) -> TimecodeFields {
        let fps = self.frame_rate.nominal_fps() as u64;
        let nominal = if self.drop_frame {
            drop_frame_to_nominal(self.frame_count)
        } else {
            self.frame_count
        };

        let total_seconds = nominal / fps;
        TimecodeFields {
            hours: (total_seconds / 3600) as u32,
            minutes: ((total_seconds / 60) % 60) as u32,
            seconds: (total_seconds % 60) as u32,
            frames: (nominal % fps) as u32,
        }
    }

    /// Move forward by `delta_frames`
    pub fn add(&self, delta_frames: u64) -> Self {
        Self {
            frame_count: self.frame_count + delta_frames,
            ..*self
        }
    }

    /// Move by a signed offset; `None` when the result would precede frame 0
    pub fn checked_offset(&self, delta_frames: i64) -> Option<Self> {
        let frame_count = self.frame_count.checked_add_signed(delta_frames)?;
        Some(Self {
            frame_count,
            ..*self
        })
    }

    /// Frame delta `self - other`. Equal timecodes yield zero.
    pub fn subtract(&self, other: &Timecode) -> i64 {
        self.frame_count as i64 - other.frame_count as i64
    }

    /// Re-read the same `HH:MM:SS:FF` digits at another rate and mode
    pub fn retimed(&self, frame_rate: FrameRate, drop_frame: bool) -> Result<Self, CorrectionError> {
        Self::from_fields(self.fields(), frame_rate, drop_frame).map_err(|e| match e {
            CorrectionError::Format(msg) => CorrectionError::Format(format!(
                "{} cannot be expressed at {} fps: {}",
                self, frame_rate, msg
            )),
            other => other,
        })
    }

    /// Order two timecodes by position.
    ///
    /// Same-rate timecodes compare by rendered position; across rates the
    /// positions are compared as elapsed nominal time, so `23.976` lines up
    /// with `24` and `29.97` with `30`.
    pub fn compare(&self, other: &Timecode) -> Ordering {
        let ours = self.fields();
        let theirs = other.fields();
        let our_fps = self.frame_rate.nominal_fps() as u64;
        let their_fps = other.frame_rate.nominal_fps() as u64;

        let our_position = (ours.whole_seconds() * our_fps + ours.frames as u64) * their_fps;
        let their_position = (theirs.whole_seconds() * their_fps + theirs.frames as u64) * our_fps;
        our_position.cmp(&their_position)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields();
        let separator = if self.drop_frame { ';' } else { ':' };
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:02}",
            fields.hours, fields.minutes, fields.seconds, separator, fields.frames
        )
    }
}

/// Frame numbers 00 and 01 of second 0 do not exist outside every tenth minute
fn is_dropped_frame_number(fields: &TimecodeFields) -> bool {
    fields.seconds == 0 && fields.minutes % 10 != 0 && (fields.frames as u64) < DROPPED_PER_MINUTE
}

/// Map a real 29.97 frame count onto the nominal 30 fps count it renders as
fn drop_frame_to_nominal(frame_count: u64) -> u64 {
    let ten_minute_blocks = frame_count / DF_FRAMES_PER_TEN_MINUTES;
    let remainder = frame_count % DF_FRAMES_PER_TEN_MINUTES;
    let skipped_in_blocks = 9 * DROPPED_PER_MINUTE * ten_minute_blocks;

    let skipped_in_remainder = if remainder < DROPPED_PER_MINUTE {
        0
    } else {
        DROPPED_PER_MINUTE * ((remainder - DROPPED_PER_MINUTE) / DF_FRAMES_PER_MINUTE)
    };

    frame_count + skipped_in_blocks + skipped_in_remainder
}
