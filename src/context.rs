//! Per-frame state shared by every painting.
//!
//! There is exactly one [`RippleContext`] per [`crate::Simulation`]. It holds
//! the player snapshot taken once per frame, the update counter, and the
//! handle of the one painting allowed to ripple.

use glam::Vec3;

use crate::mover::MoverStatus;
use crate::time::UpdateCounter;

/// Addresses a painting: its group and its slot in that group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaintingHandle {
    pub group: usize,
    pub slot: usize,
}

impl PaintingHandle {
    pub const fn new(group: usize, slot: usize) -> Self {
        Self { group, slot }
    }
}

/// The player's floor and position, refreshed once per rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerSnapshot {
    /// Surface type under the player, `None` when out of bounds.
    pub floor_type: Option<i16>,
    pub position: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct RippleContext {
    /// The painting currently rippling, across every group.
    pub rippling: Option<PaintingHandle>,
    pub counter: UpdateCounter,
    pub player: PlayerSnapshot,
    /// Player height when the last ripple started.
    pub entry_height: f32,
    /// Last status published by a moving painting.
    pub mover_status: MoverStatus,
}

impl RippleContext {
    pub fn new() -> Self {
        Self::default()
    }
}
