//! Period arithmetic on the wrapping 10240-subframe timeline.

use prosesim_common::{SubframeInfo, HYPERFRAME_SUBFRAMES};

/// Absolute start, in subframes, of the period containing `current`.
///
/// The result can be negative when the offset places the first period start
/// after `current`; callers translate back through [`SubframeInfo`] which
/// only sees the wrapped non-negative case.
pub(crate) fn period_start_abs(offset: u32, period: u32, current: &SubframeInfo) -> i64 {
    let subframe = current.absolute() as i64;
    let offset = offset as i64;
    let period = period as i64;
    let current_period = (subframe - offset).div_euclid(period);
    offset + current_period * period
}

/// Start of the period containing `current`.
pub(crate) fn current_period_start(
    offset: u32,
    period: u32,
    current: &SubframeInfo,
) -> SubframeInfo {
    let start = period_start_abs(offset, period, current);
    SubframeInfo::from_absolute(start.rem_euclid(HYPERFRAME_SUBFRAMES as i64) as u32)
}

/// Start of the period after the one containing `current`.
///
/// When the current period is the last one fitting in the hyperframe the next
/// period wraps back to the first period of the timeline.
pub(crate) fn next_period_start(offset: u32, period: u32, current: &SubframeInfo) -> SubframeInfo {
    let subframe = current.absolute() as i64;
    let offset_i = offset as i64;
    let period_i = period as i64;
    let mut current_period = (subframe - offset_i).div_euclid(period_i);
    if current_period == (HYPERFRAME_SUBFRAMES as i64) / period_i {
        current_period = -1;
    }
    let start = offset_i + (current_period + 1) * period_i;
    SubframeInfo::from_absolute(start.rem_euclid(HYPERFRAME_SUBFRAMES as i64) as u32)
}
