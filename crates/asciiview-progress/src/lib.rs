#![warn(missing_docs)]
//! # asciiview-progress
//!
//! ## Purpose
//! Simulates a progress bar for long-running export requests.
//!
//! ## Responsibilities
//! - Estimate export duration from frame count and export kind.
//! - Advance a visual percentage toward a hard pre-completion cap.
//! - Snap to 100 only when the real request resolves.
//!
//! ## Data flow
//! Coordinator starts a simulator next to the export request; periodic
//! [`ProgressSimulator::poll`] calls update the displayed percentage;
//! [`ProgressSimulator::complete`] / [`ProgressSimulator::fail`] settle it.
//!
//! ## Ownership and lifetimes
//! The simulator is plain owned state fed absolute `now_ms` values.
//!
//! ## Error model
//! Zero estimates are rejected as [`ProgressError`]; the simulator itself
//! cannot fail afterwards.
//!
//! Estimated progress is cosmetic and authoritative completion is separate:
//! the estimate never implies real percent-complete semantics. A request
//! resolving slower than estimated stalls the bar at the cap; one resolving
//! faster jumps it to 100.

use asciiview_core::ExportKind;
use thiserror::Error;

/// Hard percentage cap before the real request resolves.
pub const PRE_COMPLETION_CAP: u8 = 98;

/// Estimated server time per frame for MP4 export.
pub const VIDEO_MS_PER_FRAME: u64 = 200;

/// Estimated server time per frame for GIF export.
pub const GIF_MS_PER_FRAME: u64 = 150;

/// Estimated server time per frame for the frames ZIP export.
pub const FRAMES_MS_PER_FRAME: u64 = 60;

/// Flat estimate for single-image PNG exports.
pub const PNG_FLAT_MS: u64 = 3_000;

/// Heuristic export duration estimate in milliseconds.
///
/// Per-frame constants differ by export kind because the server renders MP4
/// frames through a rasterizer while the frames ZIP only writes text.
pub fn estimate_export_ms(kind: ExportKind, frame_count: u64) -> u64 {
    let estimate = match kind {
        ExportKind::StaticPng | ExportKind::FramePng => PNG_FLAT_MS,
        ExportKind::Video => frame_count.saturating_mul(VIDEO_MS_PER_FRAME),
        ExportKind::Gif => frame_count.saturating_mul(GIF_MS_PER_FRAME),
        ExportKind::Frames => frame_count.saturating_mul(FRAMES_MS_PER_FRAME),
    };
    estimate.max(1)
}

/// Simulator phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    /// Advancing toward the pre-completion cap.
    Running,
    /// Real request resolved successfully; percent is exactly 100.
    Completed,
    /// Real request failed; the bar is cleared.
    Failed,
}

/// Time-estimated progress bar decoupled from real server progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSimulator {
    started_at_ms: u64,
    step_ms: u64,
    percent: u8,
    phase: ProgressPhase,
}

impl ProgressSimulator {
    /// Starts a simulator for an export estimated to take `estimated_ms`.
    ///
    /// Percent advances in 1% steps spaced `estimated_ms / 98` apart.
    ///
    /// # Errors
    /// Returns [`ProgressError::ZeroEstimate`] when `estimated_ms == 0`.
    pub fn start(now_ms: u64, estimated_ms: u64) -> Result<Self, ProgressError> {
        if estimated_ms == 0 {
            return Err(ProgressError::ZeroEstimate);
        }

        Ok(Self {
            started_at_ms: now_ms,
            step_ms: (estimated_ms / u64::from(PRE_COMPLETION_CAP)).max(1),
            percent: 0,
            phase: ProgressPhase::Running,
        })
    }

    /// Recomputes the displayed percentage for `now_ms`.
    ///
    /// While running, the value never exceeds [`PRE_COMPLETION_CAP`] no
    /// matter how much time has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> u8 {
        if self.phase == ProgressPhase::Running {
            let elapsed = now_ms.saturating_sub(self.started_at_ms);
            let steps = elapsed / self.step_ms;
            self.percent = steps.min(u64::from(PRE_COMPLETION_CAP)) as u8;
        }
        self.percent
    }

    /// Marks the real request as resolved; percent snaps to exactly 100.
    pub fn complete(&mut self) {
        self.phase = ProgressPhase::Completed;
        self.percent = 100;
    }

    /// Marks the real request as failed; the bar is cleared.
    pub fn fail(&mut self) {
        self.phase = ProgressPhase::Failed;
        self.percent = 0;
    }

    /// Returns the current displayed percentage.
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Returns the current phase.
    pub fn phase(&self) -> ProgressPhase {
        self.phase
    }
}

/// Progress simulator construction errors.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// Estimates must be strictly positive.
    #[error("estimated duration must be greater than zero")]
    ZeroEstimate,
}

#[cfg(test)]
mod tests {
    //! Unit tests for the estimate cap and completion snap.

    use super::*;

    #[test]
    fn poll_never_reaches_one_hundred_before_completion() {
        let mut simulator = ProgressSimulator::start(0, 9_800).expect("simulator should start");
        assert_eq!(simulator.poll(4_900), 49);
        assert_eq!(simulator.poll(9_800), PRE_COMPLETION_CAP);

        // Long overrun stalls at the cap instead of implying completion.
        assert_eq!(simulator.poll(1_000_000), PRE_COMPLETION_CAP);
    }

    #[test]
    fn completion_snaps_to_exactly_one_hundred() {
        let mut simulator = ProgressSimulator::start(0, 9_800).expect("simulator should start");
        simulator.poll(100);
        simulator.complete();
        assert_eq!(simulator.percent(), 100);

        // Late polls must not regress the settled value.
        assert_eq!(simulator.poll(200), 100);
    }

    #[test]
    fn estimates_differ_by_export_kind() {
        assert_eq!(estimate_export_ms(ExportKind::Video, 100), 20_000);
        assert_eq!(estimate_export_ms(ExportKind::Gif, 100), 15_000);
        assert_eq!(estimate_export_ms(ExportKind::Frames, 100), 6_000);
        assert_eq!(estimate_export_ms(ExportKind::StaticPng, 100), PNG_FLAT_MS);
    }
}
