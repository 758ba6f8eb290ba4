//! Simulation tick detection.
//!
//! Paintings advance their ripple once per simulation tick, but the renderer
//! may draw a painting more than once per tick (or skip ticks while paused).
//! [`UpdateCounter`] mirrors the area's update counter and reports whether a
//! new tick has happened since the last snapshot refresh.
//!
//! # Example
//!
//! ```ignore
//! use ripplepaint::time::UpdateCounter;
//!
//! let mut counter = UpdateCounter::new();
//!
//! // On area load:
//! counter.rearm(area_counter);
//!
//! // Once per rendered frame, before drawing any painting:
//! counter.advance(area_counter);
//! if counter.ticked() {
//!     // ripple time moves forward
//! }
//! ```

/// The last two values of the area update counter seen by the painting system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounter {
    /// Counter value at the previous refresh.
    last: u32,
    /// Counter value at the latest refresh.
    current: u32,
}

impl UpdateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arm outside of rendering (area load, node init).
    ///
    /// The pair is set so that the next tick check reports a new tick.
    pub fn rearm(&mut self, area_counter: u32) {
        self.last = area_counter.wrapping_sub(1);
        self.current = area_counter;
    }

    /// Record the area counter for a rendered frame.
    pub fn advance(&mut self, area_counter: u32) {
        self.last = self.current;
        self.current = area_counter;
    }

    /// Whether the simulation ticked between the last two refreshes.
    #[inline]
    pub fn ticked(&self) -> bool {
        self.last != self.current
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub fn last(&self) -> u32 {
        self.last
    }
}
