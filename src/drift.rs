//! Frame-drift correction across capture-date boundaries.
//!
//! Per-chunk frame counts measured from the media drift from what elapsed
//! wall-clock time predicts (dropped frames, encoder rounding, restart
//! gaps). At every boundary between two capture-date groups the drift is
//! reconciled: the wall-clock-expected frame total for the earlier group
//! replaces the possibly-drifted sum of measured chunk durations.

use tracing::debug;

use crate::error::{PreinitError, Result};
use crate::video::CaptureToken;

/// Wall-clock-expected frame total between two capture timestamps.
///
/// The boundary must be chronological: a zero or negative time difference
/// means the chunks were not sorted by capture time, and correcting across
/// such a boundary would produce a nonsensical count.
pub fn expected_total_frames(
    start: &CaptureToken,
    end: &CaptureToken,
    frame_rate: u32,
) -> Result<i64> {
    let start_ts = start.timestamp()?;
    let end_ts = end.timestamp()?;

    let time_diff_seconds = (end_ts - start_ts).num_seconds();
    if time_diff_seconds <= 0 {
        return Err(PreinitError::NonChronologicalBoundary {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    Ok(time_diff_seconds * frame_rate as i64)
}

/// Corrected frame count for the chunk ending a capture-date group.
///
/// `initial_frame` is that chunk's own raw frame count;
/// `observed_total_frame` is the sum of raw frame counts over all chunks
/// sharing the group's capture date. The correction shifts the chunk's
/// count by the group's drift against the wall clock, so the group as a
/// whole accounts for exactly the wall-clock-implied frame budget.
pub fn corrected_frame_count(
    start: &CaptureToken,
    end: &CaptureToken,
    initial_frame: i64,
    observed_total_frame: i64,
    frame_rate: u32,
) -> Result<i64> {
    let expected = expected_total_frames(start, end, frame_rate)?;
    let frame_drift = expected - observed_total_frame;

    debug!(
        "Boundary {} -> {}: expected {} frames, observed {}, drift {}",
        start, end, expected, observed_total_frame, frame_drift
    );

    Ok(initial_frame + frame_drift)
}
