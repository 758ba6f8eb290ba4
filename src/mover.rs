//! Paintings that slide to a new position once a level milestone is reached.
//!
//! The moving painting starts at `front_x`. When the progress store reports
//! the unlock, it slides toward `back_x` by `speed` units per render and sets
//! a persistent "moved back" flag on arrival, so later visits spawn it at the
//! back directly.

use serde::{Deserialize, Serialize};

/// Where a moving painting starts, where it ends, and how fast it slides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoverConfig {
    pub front_x: f32,
    pub back_x: f32,
    /// Units per rendered frame.
    pub speed: f32,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self { front_x: 3456.0, back_x: 5529.6, speed: 20.0 }
    }
}

/// Save-file flags consulted by moving paintings.
pub trait ProgressFlags {
    /// The milestone that releases the painting has been reached.
    fn unlocked(&self) -> bool;
    /// The painting already finished moving in an earlier visit.
    fn moved_back(&self) -> bool;
    fn set_moved_back(&mut self);
}

/// In-memory [`ProgressFlags`], for tests and the demo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryFlags {
    pub unlocked: bool,
    pub moved_back: bool,
}

impl ProgressFlags for MemoryFlags {
    fn unlocked(&self) -> bool {
        self.unlocked
    }

    fn moved_back(&self) -> bool {
        self.moved_back
    }

    fn set_moved_back(&mut self) {
        self.moved_back = true;
    }
}

/// Warp status published by the moving painting.
///
/// Bit 1 is "unlocked", bit 0 is "moved back". Warps only look at bit 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoverStatus {
    #[default]
    Front,
    Moving,
    Back,
}

impl MoverStatus {
    pub const UNLOCKED: u8 = 0b10;
    pub const BACK: u8 = 0b01;

    pub fn bits(self) -> u8 {
        match self {
            MoverStatus::Front => 0,
            MoverStatus::Moving => Self::UNLOCKED,
            MoverStatus::Back => Self::UNLOCKED | Self::BACK,
        }
    }
}

/// Move the painting's `x` for one render.
///
/// Returns the new status, or `None` when the flags are in a state that
/// leaves both position and status untouched (moved back without unlock).
pub fn move_painting(x: &mut f32, config: &MoverConfig, flags: &mut dyn ProgressFlags) -> Option<MoverStatus> {
    match (flags.unlocked(), flags.moved_back()) {
        (false, false) => {
            *x = config.front_x;
            Some(MoverStatus::Front)
        }
        (true, false) => {
            *x += config.speed;
            if *x >= config.back_x {
                *x = config.back_x;
                flags.set_moved_back();
            }
            Some(MoverStatus::Moving)
        }
        (true, true) => {
            *x = config.back_x;
            Some(MoverStatus::Back)
        }
        (false, true) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_stays_at_front() {
        let config = MoverConfig::default();
        let mut flags = MemoryFlags::default();
        let mut x = 0.0;
        assert_eq!(move_painting(&mut x, &config, &mut flags), Some(MoverStatus::Front));
        assert_eq!(x, config.front_x);
    }

    #[test]
    fn test_unlocked_slides_and_sets_flag() {
        let config = MoverConfig { front_x: 0.0, back_x: 50.0, speed: 20.0 };
        let mut flags = MemoryFlags { unlocked: true, moved_back: false };
        let mut x = 0.0;

        assert_eq!(move_painting(&mut x, &config, &mut flags), Some(MoverStatus::Moving));
        assert_eq!(x, 20.0);
        move_painting(&mut x, &config, &mut flags);
        assert_eq!(x, 40.0);
        assert!(!flags.moved_back);

        move_painting(&mut x, &config, &mut flags);
        assert_eq!(x, 50.0);
        assert!(flags.moved_back);

        assert_eq!(move_painting(&mut x, &config, &mut flags), Some(MoverStatus::Back));
        assert_eq!(x, 50.0);
    }

    #[test]
    fn test_back_without_unlock_is_untouched() {
        let config = MoverConfig::default();
        let mut flags = MemoryFlags { unlocked: false, moved_back: true };
        let mut x = 123.0;
        assert_eq!(move_painting(&mut x, &config, &mut flags), None);
        assert_eq!(x, 123.0);
    }

    #[test]
    fn test_status_bits() {
        assert_eq!(MoverStatus::Front.bits(), 0);
        assert_eq!(MoverStatus::Moving.bits(), 0b10);
        assert_eq!(MoverStatus::Back.bits(), 0b11);
    }
}
