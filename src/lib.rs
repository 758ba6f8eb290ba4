//! # ripplepaint - Rippling Painting Engine
//!
//! Paintings that ripple like water when the player walks up to them or
//! jumps in, for a 3D platformer renderer.
//!
//! The engine owns the ripple simulation and geometry. It emits an
//! immediate-mode [`DisplayList`] per painting per frame and leaves drawing,
//! collision and save data to the host.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ripplepaint::prelude::*;
//!
//! let mut sim = LevelConfig::load("castle.json")?.build("assets")?;
//! let mut flags = MemoryFlags::default();
//! let mut node = PaintingNode::new(0, 0);
//!
//! // every frame
//! sim.update_snapshot(CallContext::Render, area_counter, player_pos, &collision);
//! if let Some(list) = sim.draw(CallContext::Render, &mut node, &mut flags) {
//!     renderer.execute(&list);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Ripple Field
//!
//! A ripple is a cosine ring expanding from an origin on the painting face
//! ([`field`]). Its magnitude decays once per simulation tick.
//!
//! ### States
//!
//! Each painting is [`RippleState::Idle`], [`RippleState::Ripple`] (a passive
//! ripple) or [`RippleState::Entered`] (the player jumped in). Transitions
//! are driven by six special floor regions in front of the painting
//! ([`floor`], [`trigger`]).
//!
//! | Trigger | Starts | Ends |
//! |---------|--------|------|
//! | [`RippleTrigger::Proximity`] | stepping on a region | decays back to idle |
//! | [`RippleTrigger::Continuous`] | as soon as the room is entered | settles into a passive ripple |
//!
//! ### Groups
//!
//! Paintings are organised in [`PaintingGroup`]s. Starting a ripple on one
//! painting stops every other painting in its group, and only one painting
//! in the whole simulation is tracked as rippling.
//!
//! ## Per-frame Order
//!
//! 1. [`Simulation::update_snapshot`] captures the player's floor and position.
//! 2. [`Simulation::draw`] per painting node: move, set layer, draw (idle
//!    paintings emit their static list; the rippling one regenerates its mesh
//!    and normals and decays), then update floors and triggers.
//!
//! The drawn frame therefore always shows the state from before that frame's
//! trigger update.

pub mod commands;
pub mod config;
pub mod context;
pub mod deform;
pub mod error;
pub mod field;
pub mod floor;
pub mod group;
pub mod mesh;
pub mod mover;
pub mod normals;
pub mod painting;
pub mod render;
mod simulation;
pub mod textures;
pub mod time;
pub mod trigger;
pub mod vertex;

pub use bytemuck;
pub use commands::{BuiltinList, Command, DisplayList, ListRef, TexelFormat};
pub use config::{GroupConfig, LevelConfig, MeshConfig, PaintingConfig, TextureMapSource, TextureSource};
pub use context::{PaintingHandle, PlayerSnapshot, RippleContext};
pub use error::{ConfigError, MeshError, TextureError};
pub use field::{RippleParams, RippleSlots};
pub use floor::{FloorQuery, RegionMask, Surface};
pub use glam::{Mat4, Vec2, Vec3};
pub use group::PaintingGroup;
pub use mesh::{BaseMesh, MeshTables, MeshVertex, NeighborTable};
pub use mover::{MemoryFlags, MoverConfig, MoverStatus, ProgressFlags};
pub use painting::{Orientation, Painting, RippleState, RippleTrigger};
pub use simulation::{CallContext, DrawLayer, PaintingNode, Simulation};
pub use textures::{TexMapping, TextureImage, TextureKind, TextureMap};
pub use vertex::PaintingVertex;

/// Edge length of the base mesh. Paintings of any other size are scaled.
pub const PAINTING_SIZE: f32 = 614.0;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use ripplepaint::prelude::*;
/// ```
pub mod prelude {
    pub use crate::commands::{Command, DisplayList};
    pub use crate::config::LevelConfig;
    pub use crate::field::RippleParams;
    pub use crate::floor::{FloorQuery, Surface};
    pub use crate::group::PaintingGroup;
    pub use crate::mesh::MeshTables;
    pub use crate::mover::{MemoryFlags, MoverConfig, ProgressFlags};
    pub use crate::painting::{Painting, RippleState, RippleTrigger};
    pub use crate::simulation::{CallContext, PaintingNode, Simulation};
    pub use crate::textures::{TextureImage, TextureKind};
    pub use crate::{Vec2, Vec3};
}
