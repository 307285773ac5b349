/*!
 * Frame rates that SMPTE timecode can be expressed in.
 *
 * Higher delivery rates (50, 59.94, 60) share timecode with their half-speed
 * counterparts and are folded down before they reach this type.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CorrectionError;

/// Supported timecode frame rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameRate {
    /// 23.976 fps (24000/1001)
    #[serde(rename = "23.976")]
    Fps23_976,
    /// 24 fps
    #[serde(rename = "24")]
    Fps24,
    /// 25 fps
    #[serde(rename = "25")]
    Fps25,
    /// 29.97 fps (30000/1001), the only rate with a drop-frame form
    #[serde(rename = "29.97")]
    Fps29_97,
    /// 30 fps
    #[serde(rename = "30")]
    Fps30,
}

impl FrameRate {
    /// Every supported rate, slowest first
    pub const ALL: [FrameRate; 5] = [
        FrameRate::Fps23_976,
        FrameRate::Fps24,
        FrameRate::Fps25,
        FrameRate::Fps29_97,
        FrameRate::Fps30,
    ];

    /// Exact rate as (numerator, denominator)
    pub fn as_rational(self) -> (u64, u64) {
        match self {
            Self::Fps23_976 => (24000, 1001),
            Self::Fps24 => (24, 1),
            Self::Fps25 => (25, 1),
            Self::Fps29_97 => (30000, 1001),
            Self::Fps30 => (30, 1),
        }
    }

    /// Integer frames per timecode second; frame fields range over `0..nominal_fps`
    pub fn nominal_fps(self) -> u32 {
        match self {
            Self::Fps23_976 | Self::Fps24 => 24,
            Self::Fps25 => 25,
            Self::Fps29_97 | Self::Fps30 => 30,
        }
    }

    pub fn as_f64(self) -> f64 {
        let (num, den) = self.as_rational();
        num as f64 / den as f64
    }

    /// Whether a drop-frame rendering exists for this rate
    pub fn supports_drop_frame(self) -> bool {
        matches!(self, Self::Fps29_97)
    }

    /// Label as delivered in media metadata
    pub fn label(self) -> &'static str {
        match self {
            Self::Fps23_976 => "23.976",
            Self::Fps24 => "24",
            Self::Fps25 => "25",
            Self::Fps29_97 => "29.97",
            Self::Fps30 => "30",
        }
    }

    /// Token used in corrected filenames, e.g. `23976` or `2997ndf`
    pub fn filename_token(self, drop_frame: bool) -> String {
        match self {
            Self::Fps29_97 if drop_frame => "2997df".to_string(),
            Self::Fps29_97 => "2997ndf".to_string(),
            other => other.label().replace('.', ""),
        }
    }

    /// Ratio `to / self` as an exact fraction (numerator, denominator)
    pub fn conversion_ratio(self, to: FrameRate) -> (u64, u64) {
        let (from_num, from_den) = self.as_rational();
        let (to_num, to_den) = to.as_rational();
        (to_num * from_den, to_den * from_num)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for FrameRate {
    type Err = CorrectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "23.976" | "23.98" => Ok(Self::Fps23_976),
            "24" => Ok(Self::Fps24),
            "25" => Ok(Self::Fps25),
            "29.97" => Ok(Self::Fps29_97),
            "30" => Ok(Self::Fps30),
            other => Err(CorrectionError::Validation(format!(
                "unexpected frame rate: {}",
                other
            ))),
        }
    }
}
