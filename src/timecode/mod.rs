/*!
 * SMPTE timecode model.
 *
 * - `frame_rate`: the supported timecode rates and exact NTSC ratios
 * - `smpte`: the `Timecode` value type with drop-frame arithmetic
 */

pub mod frame_rate;
pub mod smpte;

// Re-export main types
pub use frame_rate::FrameRate;
pub use smpte::{Timecode, TimecodeFields};
