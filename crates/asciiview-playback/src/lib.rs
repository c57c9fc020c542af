#![warn(missing_docs)]
//! # asciiview-playback
//!
//! ## Purpose
//! Implements the video playback state machine, the debounced re-conversion
//! primitive, and the single in-flight conversion guard.
//!
//! ## Responsibilities
//! - Model play/pause/stop/scrub transitions and fixed-rate tick advances.
//! - Guarantee timer disarming on every non-playing exit path.
//! - Collapse bursts of parameter input into one deferred conversion.
//! - Enforce at most one outstanding conversion at any instant.
//!
//! ## Data flow
//! Coordinator events drive [`PlaybackController`]; each tick yields a
//! [`TickOutcome`] that the coordinator turns into a frame fetch. Ticks are
//! fire-and-forget relative to the fetch: the schedule never waits on a
//! response.
//!
//! ## Ownership and lifetimes
//! All types are plain owned state fed absolute `now_ms` values, so the
//! machine is testable without a wall clock or a live display surface.
//!
//! ## Error model
//! Descriptors with non-positive fps or negative duration are rejected as
//! [`PlaybackError`] at construction; transitions themselves cannot fail.

use thiserror::Error;

/// Default quiet period for parameter-change debouncing.
pub const DEBOUNCE_QUIET_MS: u64 = 300;

/// Resident playback states. Scrubbing is an event, not a state: it pauses
/// active playback and issues exactly one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No playback; cursor at zero.
    Stopped,
    /// Timer armed; ticks advance the cursor.
    Playing,
    /// Timer disarmed; cursor retained.
    Paused,
}

/// Result of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Cursor advanced; fetch the frame at this time.
    FetchFrame(f64),
    /// Cursor crossed the duration; playback stopped, cursor reset to zero,
    /// and the caller re-fetches the frame at time zero.
    Finished,
    /// Tick arrived while not playing (stale timer); nothing to do.
    Ignored,
}

/// Pure playback controller for one loaded video.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackController {
    fps: f64,
    duration_secs: f64,
    state: PlaybackState,
    current_time: f64,
    timer_armed: bool,
}

impl PlaybackController {
    /// Creates a controller for a loaded video.
    ///
    /// # Errors
    /// Returns [`PlaybackError::InvalidFps`] when `fps <= 0` and
    /// [`PlaybackError::InvalidDuration`] when `duration_secs < 0`.
    pub fn new(fps: f64, duration_secs: f64) -> Result<Self, PlaybackError> {
        if !(fps > 0.0) || !fps.is_finite() {
            return Err(PlaybackError::InvalidFps { fps });
        }
        if duration_secs < 0.0 || !duration_secs.is_finite() {
            return Err(PlaybackError::InvalidDuration { duration_secs });
        }

        Ok(Self {
            fps,
            duration_secs,
            state: PlaybackState::Stopped,
            current_time: 0.0,
            timer_armed: false,
        })
    }

    /// Returns the current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Returns the cursor position in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Returns the video duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Returns `true` while the recurring timer should be firing.
    pub fn timer_armed(&self) -> bool {
        self.timer_armed
    }

    /// Returns the tick interval in milliseconds (`1000 / fps`).
    pub fn frame_interval_ms(&self) -> u64 {
        let interval = (1_000.0 / self.fps).round();
        (interval as u64).max(1)
    }

    /// Starts playback.
    ///
    /// # Returns
    /// `true` when the transition happened and a timer must be armed;
    /// `false` when already playing (the action is a no-op).
    pub fn play(&mut self) -> bool {
        if self.state == PlaybackState::Playing {
            return false;
        }

        self.state = PlaybackState::Playing;
        self.timer_armed = true;
        true
    }

    /// Pauses playback, disarming the timer and retaining the cursor.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
        self.timer_armed = false;
    }

    /// Stops playback, disarming the timer and resetting the cursor to zero.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.timer_armed = false;
        self.current_time = 0.0;
    }

    /// Advances the cursor by one frame interval.
    ///
    /// Reaching or crossing the duration transitions to `Stopped` with the
    /// cursor reset to zero; the caller then re-fetches the frame at zero.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != PlaybackState::Playing {
            return TickOutcome::Ignored;
        }

        self.current_time += 1.0 / self.fps;
        if self.current_time >= self.duration_secs {
            self.stop();
            return TickOutcome::Finished;
        }

        TickOutcome::FetchFrame(self.current_time)
    }

    /// Seeks to a manual timeline position.
    ///
    /// Active playback is paused first; the returned value is the clamped
    /// time the caller must fetch exactly once.
    pub fn scrub(&mut self, time_sec: f64) -> f64 {
        if self.state == PlaybackState::Playing {
            self.pause();
        }

        let clamped = time_sec.clamp(0.0, self.duration_secs);
        self.current_time = clamped;
        clamped
    }
}

/// Computes deterministic wall-clock tick timestamps for a fixed interval.
///
/// # Returns
/// Vector of `count` timestamps starting at `start_ms` with `interval_ms`
/// spacing.
pub fn scheduled_tick_times(interval_ms: u64, start_ms: u64, count: usize) -> Vec<u64> {
    (0..count)
        .map(|index| start_ms.saturating_add(interval_ms.saturating_mul(index as u64)))
        .collect()
}

/// Single in-flight conversion guard.
///
/// There is no request queue and no sequencing: a request arriving while one
/// is outstanding is dropped, so the displayed frame may silently lag the
/// timer under slow network conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionGuard {
    in_flight: bool,
}

impl ConversionGuard {
    /// Creates an idle guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to claim the in-flight slot.
    ///
    /// # Returns
    /// `true` when the caller now owns the slot; `false` when a conversion
    /// is already outstanding and the new request must be dropped.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Releases the slot once the outstanding request resolved either way.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    /// Returns `true` while a conversion is outstanding.
    pub fn is_converting(&self) -> bool {
        self.in_flight
    }
}

/// Reusable debounced-invocation primitive.
///
/// Input events call [`Debouncer::poke`]; the pending action fires exactly
/// once per burst after the quiet period elapses with no further input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    quiet_ms: u64,
    last_poke_ms: Option<u64>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            last_poke_ms: None,
        }
    }

    /// Records one input event at `now_ms`, restarting the quiet window.
    pub fn poke(&mut self, now_ms: u64) {
        self.last_poke_ms = Some(now_ms);
    }

    /// Returns `true` exactly once when the quiet period has elapsed.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.last_poke_ms {
            Some(last) if now_ms.saturating_sub(last) >= self.quiet_ms => {
                self.last_poke_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` while an input burst is waiting out its quiet period.
    pub fn is_pending(&self) -> bool {
        self.last_poke_ms.is_some()
    }

    /// Drops any pending burst without firing.
    pub fn cancel(&mut self) {
        self.last_poke_ms = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_QUIET_MS)
    }
}

/// Playback construction errors.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Frame rate must be strictly positive and finite.
    #[error("invalid fps: {fps}")]
    InvalidFps {
        /// Rejected frame rate.
        fps: f64,
    },
    /// Duration must be non-negative and finite.
    #[error("invalid duration: {duration_secs}")]
    InvalidDuration {
        /// Rejected duration in seconds.
        duration_secs: f64,
    },
}

#[cfg(test)]
mod tests {
    //! Unit tests for transitions, guard, and debounce behavior.

    use super::*;

    #[test]
    fn play_is_a_noop_while_playing() {
        let mut controller = PlaybackController::new(25.0, 4.0).expect("controller should build");
        assert!(controller.play());
        assert!(!controller.play());
        assert!(controller.timer_armed());
    }

    #[test]
    fn pause_disarms_and_retains_cursor() {
        let mut controller = PlaybackController::new(10.0, 4.0).expect("controller should build");
        controller.play();
        controller.tick();
        controller.pause();

        assert_eq!(controller.state(), PlaybackState::Paused);
        assert!(!controller.timer_armed());
        assert!(controller.current_time() > 0.0);
    }

    #[test]
    fn scrub_pauses_then_clamps() {
        let mut controller = PlaybackController::new(10.0, 4.0).expect("controller should build");
        controller.play();

        let time = controller.scrub(9.5);
        assert_eq!(time, 4.0);
        assert_eq!(controller.state(), PlaybackState::Paused);
        assert!(!controller.timer_armed());
    }

    #[test]
    fn guard_drops_overlapping_requests() {
        let mut guard = ConversionGuard::new();
        assert!(guard.try_begin());
        assert!(!guard.try_begin());
        guard.finish();
        assert!(guard.try_begin());
    }

    #[test]
    fn debouncer_fires_once_after_quiet_period() {
        let mut debouncer = Debouncer::new(300);
        debouncer.poke(0);
        debouncer.poke(100);
        debouncer.poke(250);

        assert!(!debouncer.fire(400));
        assert!(debouncer.fire(550));
        assert!(!debouncer.fire(900));
    }
}
