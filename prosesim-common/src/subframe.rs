//! Subframe calendar over the LTE hyperframe
//!
//! The air-interface clock counts 1024 frames of 10 subframes each, then
//! wraps. A subframe lasts 1 ms, so one full hyperframe covers 10.24 s.
//! All resource-pool period math runs on the absolute subframe index in
//! `0..10240`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subframes per radio frame (1 ms each).
pub const SUBFRAMES_PER_FRAME: u32 = 10;

/// Frames before the system frame number wraps.
pub const FRAMES_PER_HYPERFRAME: u32 = 1024;

/// Total subframes in a hyperframe.
pub const HYPERFRAME_SUBFRAMES: u32 = SUBFRAMES_PER_FRAME * FRAMES_PER_HYPERFRAME;

/// A (frame, subframe) position on the wrapping air-interface calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SubframeInfo {
    /// Frame number in `0..1024`
    pub frame_no: u32,
    /// Subframe number in `0..10`
    pub subframe_no: u32,
}

impl SubframeInfo {
    /// Creates a subframe position, normalizing out-of-range components.
    pub fn new(frame_no: u32, subframe_no: u32) -> Self {
        Self::from_absolute(
            SUBFRAMES_PER_FRAME * (frame_no % FRAMES_PER_HYPERFRAME) + subframe_no,
        )
    }

    /// Creates a subframe position from an absolute subframe index.
    pub fn from_absolute(subframe: u32) -> Self {
        let subframe = subframe % HYPERFRAME_SUBFRAMES;
        Self {
            frame_no: subframe / SUBFRAMES_PER_FRAME,
            subframe_no: subframe % SUBFRAMES_PER_FRAME,
        }
    }

    /// Absolute subframe index in `0..10240`.
    pub fn absolute(&self) -> u32 {
        SUBFRAMES_PER_FRAME * (self.frame_no % FRAMES_PER_HYPERFRAME)
            + self.subframe_no % SUBFRAMES_PER_FRAME
    }

    /// Position advanced by `n` subframes, wrapping at the hyperframe.
    pub fn advanced_by(&self, n: u32) -> Self {
        Self::from_absolute((self.absolute() + n % HYPERFRAME_SUBFRAMES) % HYPERFRAME_SUBFRAMES)
    }
}

impl PartialOrd for SubframeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SubframeInfo {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.absolute().cmp(&other.absolute())
    }
}

impl fmt::Display for SubframeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.frame_no, self.subframe_no)
    }
}
