//! The painting entity: placement, textures, ripple presets and ripple state.
//!
//! Paintings are built once per level (usually from [`crate::config`]) and
//! live for the whole level. Only the ripple state, the floor tracker and a
//! moving painting's `x` change afterwards.
//!
//! # Example
//!
//! ```ignore
//! let bob = Painting::new(0, 614.0)
//!     .with_position(Vec3::new(-5222.4, 409.6, -153.6))
//!     .with_rotation([0.0, 90.0])
//!     .with_trigger(RippleTrigger::Proximity)
//!     .with_presets(
//!         RippleParams::new(20.0, 0.9608, 0.24, 40.0),
//!         RippleParams::new(80.0, 0.9524, 0.14, 30.0),
//!     );
//! ```

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::context::PlayerSnapshot;
use crate::field::{RippleParams, RippleSlots};
use crate::floor::{region_for_floor, FloorTracker};
use crate::mover::MoverConfig;
use crate::textures::{TextureImage, TextureKind, TextureMap};

/// Where a painting is in its ripple cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RippleState {
    #[default]
    Idle,
    /// Passive ripple, started from a ripple floor.
    Ripple,
    /// Entry ripple, started by the player entering.
    Entered,
}

/// What starts a painting's ripple and what ends it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RippleTrigger {
    /// Ripples on contact and decays back to idle.
    #[default]
    Proximity,
    /// Ripples as soon as possible and settles into a passive ripple.
    Continuous,
}

/// Wall paintings have zero pitch; everything else lies on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Wall,
    Floor,
}

/// Source of the ripple origin's x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginX {
    /// The quarter of the painting nearest the floor region just entered.
    NearestQuarter,
    PlayerX,
    Middle,
}

/// Source of the ripple origin's y coordinate. Floor paintings use the
/// world z axis as their face y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginY {
    PlayerY,
    PlayerZ,
    Middle,
}

#[derive(Debug, Clone)]
pub struct Painting {
    /// Selects this painting's floor surface codes.
    pub id: i16,
    pub position: Vec3,
    /// Pitch and yaw in degrees.
    pub rotation: [f32; 2],
    /// Edge length in world units.
    pub size: f32,

    pub textures: Vec<TextureImage>,
    /// One map per texture.
    pub texture_maps: Vec<TextureMap>,
    pub texture_kind: TextureKind,
    pub alpha: u8,
    /// Authored list drawn while idle.
    pub normal_list: String,
    /// Authored list drawn before the rippling regions.
    pub ripple_list: String,

    pub trigger: RippleTrigger,
    pub mover: Option<MoverConfig>,

    pub ripple: RippleSlots,
    pub state: RippleState,
    /// Ticks since the ripple started.
    ///
    /// Stays `f32`: a continuous painting that never resets stops advancing
    /// at 2^24 ticks (about six and a half days at 30 ticks per second) and
    /// its ripple freezes. Long-running hosts should expect this.
    pub ripple_timer: f32,
    pub ripple_origin: Vec2,
    pub floor: FloorTracker,
}

impl Painting {
    /// A flat, opaque, idle wall painting at the origin.
    pub fn new(id: i16, size: f32) -> Self {
        Self {
            id,
            position: Vec3::ZERO,
            rotation: [0.0, 0.0],
            size,
            textures: Vec::new(),
            texture_maps: Vec::new(),
            texture_kind: TextureKind::Image,
            alpha: 0xFF,
            normal_list: String::new(),
            ripple_list: String::new(),
            trigger: RippleTrigger::Proximity,
            mover: None,
            ripple: RippleSlots::new(RippleParams::cleared(), RippleParams::cleared()),
            state: RippleState::Idle,
            ripple_timer: 0.0,
            ripple_origin: Vec2::ZERO,
            floor: FloorTracker::default(),
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: [f32; 2]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the images and their texture maps, paired by index.
    pub fn with_textures(mut self, textures: Vec<TextureImage>, maps: Vec<TextureMap>) -> Self {
        self.textures = textures;
        self.texture_maps = maps;
        self
    }

    pub fn with_texture_kind(mut self, kind: TextureKind) -> Self {
        self.texture_kind = kind;
        self
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_lists(mut self, normal: impl Into<String>, ripple: impl Into<String>) -> Self {
        self.normal_list = normal.into();
        self.ripple_list = ripple.into();
        self
    }

    pub fn with_trigger(mut self, trigger: RippleTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_presets(mut self, passive: RippleParams, entry: RippleParams) -> Self {
        self.ripple = RippleSlots::new(passive, entry);
        self
    }

    pub fn with_mover(mut self, mover: MoverConfig) -> Self {
        self.position.x = mover.front_x;
        self.mover = Some(mover);
        self
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        // pitch is compared in whole degrees
        if self.rotation[0] as i16 == 0 {
            Orientation::Wall
        } else {
            Orientation::Floor
        }
    }

    #[inline]
    pub fn is_rippling(&self) -> bool {
        self.state != RippleState::Idle
    }

    /// Run floor and below-plane edge detection against this frame's snapshot.
    pub fn update_floors(&mut self, player: &PlayerSnapshot) {
        let region = region_for_floor(self.id, player.floor_type);
        let below = player.position.y < self.position.y;
        self.floor.update(region, below);
    }

    /// Hard reset to idle, clearing every transient value.
    ///
    /// The caller also clears the context's rippling handle.
    pub fn reset(&mut self) {
        self.floor.reset();
        self.state = RippleState::Idle;
        self.ripple.clear();
        self.ripple_timer = 0.0;
        self.ripple_origin = Vec2::ZERO;
        if let Some(mover) = &self.mover {
            self.position.x = mover.front_x;
        }
    }

    /// Quarter of the face nearest the region the player just stepped on.
    ///
    /// Zero when no region was entered this frame.
    pub fn nearest_quarter(&self) -> f32 {
        match self.floor.floor_entered.quarter() {
            Some(1) => self.size / 4.0,
            Some(2) => self.size / 2.0,
            Some(3) => self.size * 3.0 / 4.0,
            _ => 0.0,
        }
    }

    /// Player x relative to the painting, bounded to the face.
    pub fn player_x(&self, player: &PlayerSnapshot) -> f32 {
        (player.position.x - self.position.x).clamp(0.0, self.size)
    }

    /// Player y relative to the painting, raised 50 units toward their
    /// center of mass and bounded to the face.
    pub fn player_y(&self, player: &PlayerSnapshot) -> f32 {
        (player.position.y - self.position.y + 50.0).clamp(0.0, self.size)
    }

    /// Player depth in front of a floor painting, bounded to the face.
    pub fn player_z(&self, player: &PlayerSnapshot) -> f32 {
        (self.position.z - player.position.z).clamp(0.0, self.size)
    }

    pub fn origin_x(&self, source: OriginX, player: &PlayerSnapshot) -> f32 {
        match source {
            OriginX::NearestQuarter => self.nearest_quarter(),
            OriginX::PlayerX => self.player_x(player),
            OriginX::Middle => self.size / 2.0,
        }
    }

    pub fn origin_y(&self, source: OriginY, player: &PlayerSnapshot) -> f32 {
        match source {
            OriginY::PlayerY => self.player_y(player),
            OriginY::PlayerZ => self.player_z(player),
            OriginY::Middle => self.size / 2.0,
        }
    }
}
