//! Handoff to a display loop: a cooperative frame ticker and a single-slot
//! holder for the current vehicle.
//!
//! Neither spawns threads. The display owns its timer and calls
//! [`FrameTicker::advance`] from it; loads run wherever the caller likes and
//! publish through [`SpriteSlot`].

use core::time::Duration;

use crate::geometry::FRAME_COUNT;

/// Default delay between frames of the rotation loop.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(120);

/// Converts elapsed time into a looping frame index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameTicker {
    interval: Duration,
    frame_count: usize,
    pending: Duration,
    frame: usize,
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::new(FRAME_COUNT)
    }
}

impl FrameTicker {
    /// Ticker over `frame_count` frames at [`DEFAULT_FRAME_INTERVAL`].
    pub fn new(frame_count: usize) -> Self {
        Self {
            interval: DEFAULT_FRAME_INTERVAL,
            frame_count,
            pending: Duration::ZERO,
            frame: 0,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Account for `elapsed` time and return the frame to show.
    ///
    /// Time that does not fill a whole interval carries over to the next call.
    /// A zero interval or an empty sequence never advances.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if self.frame_count == 0 || self.interval.is_zero() {
            return self.frame;
        }
        let total = self.pending.as_nanos() + elapsed.as_nanos();
        let step = self.interval.as_nanos();
        let steps = total / step;
        let rem = total % step;
        // rem < interval, which fits in u64 nanoseconds
        self.pending = Duration::from_nanos(rem as u64);
        self.frame = ((self.frame as u128 + steps) % self.frame_count as u128) as usize;
        self.frame
    }

    /// Back to frame 0 with no carried time.
    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
        self.frame = 0;
    }
}

#[cfg(feature = "std")]
pub use slot::SpriteSlot;

#[cfg(feature = "std")]
mod slot {
    use std::sync::{Arc, PoisonError, RwLock};

    use log::debug;

    use crate::error::SrfError;
    use crate::slice::VehicleSpriteSet;

    /// Holds at most one loaded vehicle.
    ///
    /// Readers take an `Arc` snapshot and keep drawing it even if a new set
    /// is published meanwhile. Publishing swaps the whole set; frames of a
    /// published set are never touched.
    #[derive(Debug, Default)]
    pub struct SpriteSlot {
        current: RwLock<Option<Arc<VehicleSpriteSet>>>,
    }

    impl SpriteSlot {
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of the current set, if one has been loaded.
        pub fn current(&self) -> Option<Arc<VehicleSpriteSet>> {
            self.current
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Publish `set`, returning the one it replaces.
        pub fn replace(&self, set: VehicleSpriteSet) -> Option<Arc<VehicleSpriteSet>> {
            let set = Arc::new(set);
            debug!(
                "publishing vehicle sprites ({}px / {}px)",
                set.geometry().size_3d,
                set.geometry().size_2d
            );
            self.current
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .replace(set)
        }

        /// Publish the result of a load if it succeeded.
        ///
        /// On failure the previously published set stays in place and the
        /// error is handed back for the caller to report.
        pub fn load(
            &self,
            result: Result<VehicleSpriteSet, SrfError>,
        ) -> Result<Arc<VehicleSpriteSet>, SrfError> {
            let set = Arc::new(result?);
            *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&set));
            Ok(set)
        }

        /// Drop the current set.
        pub fn clear(&self) -> Option<Arc<VehicleSpriteSet>> {
            self.current
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
        }
    }
}
