//! Detection of the special floor regions in front of each painting.
//!
//! The floor in front of a painting is made of six special surfaces: three
//! "ripple" triangles (left, middle, right) that start a passive ripple and
//! three "enter" triangles that start the entry ripple. Their surface type
//! codes are derived from the painting id, so the player's current floor
//! type alone says which region, if any, they stand on.

use glam::Vec3;
use std::ops::{BitAnd, BitOr, BitXor};

/// Surface type of the first ripple-left floor (painting id 0).
pub const SURFACE_PAINTING_WOBBLE_LEFT: i16 = 0x00A6;
pub const SURFACE_PAINTING_WOBBLE_MIDDLE: i16 = 0x00A7;
pub const SURFACE_PAINTING_WOBBLE_RIGHT: i16 = 0x00A8;
/// Surface type of the first enter-left floor (painting id 0).
pub const SURFACE_PAINTING_WARP_LEFT: i16 = 0x00D3;
pub const SURFACE_PAINTING_WARP_MIDDLE: i16 = 0x00D4;
pub const SURFACE_PAINTING_WARP_RIGHT: i16 = 0x00D5;

/// Bitmask of the six special floor regions. At most one bit is set per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RegionMask(pub u8);

impl RegionMask {
    pub const NONE: Self = Self(0);
    pub const RIPPLE_LEFT: Self = Self(0x20);
    pub const RIPPLE_MIDDLE: Self = Self(0x10);
    pub const RIPPLE_RIGHT: Self = Self(0x08);
    pub const ENTER_LEFT: Self = Self(0x04);
    pub const ENTER_MIDDLE: Self = Self(0x02);
    pub const ENTER_RIGHT: Self = Self(0x01);

    pub const RIPPLE_ANY: Self = Self(0x38);
    pub const ENTER_ANY: Self = Self(0x07);

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether any bit of `other` is set in `self`.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn touches_ripple(self) -> bool {
        self.intersects(Self::RIPPLE_ANY)
    }

    #[inline]
    pub fn touches_enter(self) -> bool {
        self.intersects(Self::ENTER_ANY)
    }

    /// Which third of the painting the set region is in: 1, 2 or 3 quarters
    /// across. `None` if no region is set.
    pub fn quarter(self) -> Option<u8> {
        // ripple regions take priority over enter regions
        const ORDER: [(RegionMask, u8); 6] = [
            (RegionMask::RIPPLE_LEFT, 1),
            (RegionMask::RIPPLE_MIDDLE, 2),
            (RegionMask::RIPPLE_RIGHT, 3),
            (RegionMask::ENTER_LEFT, 1),
            (RegionMask::ENTER_MIDDLE, 2),
            (RegionMask::ENTER_RIGHT, 3),
        ];
        ORDER.iter().find(|(bit, _)| self.intersects(*bit)).map(|&(_, q)| q)
    }
}

impl BitOr for RegionMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for RegionMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitXor for RegionMask {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

/// Largest painting id whose surface codes fit an `i16`.
pub const MAX_PAINTING_ID: i16 = (i16::MAX - SURFACE_PAINTING_WARP_RIGHT) / 3;

/// The six surface codes belonging to painting `id`, with their region bit.
///
/// `None` for ids outside `0..=MAX_PAINTING_ID`.
pub fn region_codes(id: i16) -> Option<[(i16, RegionMask); 6]> {
    if !(0..=MAX_PAINTING_ID).contains(&id) {
        return None;
    }
    let base = id * 3;
    Some([
        (base + SURFACE_PAINTING_WOBBLE_LEFT, RegionMask::RIPPLE_LEFT),
        (base + SURFACE_PAINTING_WOBBLE_MIDDLE, RegionMask::RIPPLE_MIDDLE),
        (base + SURFACE_PAINTING_WOBBLE_RIGHT, RegionMask::RIPPLE_RIGHT),
        (base + SURFACE_PAINTING_WARP_LEFT, RegionMask::ENTER_LEFT),
        (base + SURFACE_PAINTING_WARP_MIDDLE, RegionMask::ENTER_MIDDLE),
        (base + SURFACE_PAINTING_WARP_RIGHT, RegionMask::ENTER_RIGHT),
    ])
}

/// Region of painting `id` the player stands on, given their floor type.
pub fn region_for_floor(id: i16, floor_type: Option<i16>) -> RegionMask {
    let Some(floor_type) = floor_type else {
        return RegionMask::NONE;
    };
    region_codes(id)
        .into_iter()
        .flatten()
        .filter(|(code, _)| *code == floor_type)
        .fold(RegionMask::NONE, |mask, (_, bit)| mask | bit)
}

/// Per-painting edge detection for floor regions and "player below".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FloorTracker {
    pub last_floor: RegionMask,
    pub curr_floor: RegionMask,
    /// Regions the player stepped onto this frame.
    pub floor_entered: RegionMask,
    pub was_below: bool,
    pub is_below: bool,
    /// The player dropped below the painting's plane this frame.
    pub went_below: bool,
}

impl FloorTracker {
    /// Advance one frame.
    ///
    /// `region` is the region the player currently stands on; `below` is
    /// whether they are under the painting's plane.
    pub fn update(&mut self, region: RegionMask, below: bool) {
        self.last_floor = self.curr_floor;
        self.curr_floor = region;
        self.floor_entered = (self.last_floor ^ self.curr_floor) & self.curr_floor;

        self.was_below = self.is_below;
        self.is_below = below;
        self.went_below = !self.was_below && self.is_below;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A floor surface found under a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Surface {
    /// Surface type code.
    pub kind: i16,
    /// Collision-table id of the surface.
    pub id: u32,
}

/// The collision system, as far as paintings need it.
pub trait FloorQuery {
    /// The floor directly under `point`, if there is one.
    fn find_floor(&self, point: Vec3) -> Option<Surface>;
}

impl<F> FloorQuery for F
where
    F: Fn(Vec3) -> Option<Surface>,
{
    fn find_floor(&self, point: Vec3) -> Option<Surface> {
        self(point)
    }
}
