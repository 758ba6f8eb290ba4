//! Simulation builder and per-frame dispatcher.
//!
//! The host renderer drives a [`Simulation`] through two entry points:
//!
//! 1. [`Simulation::update_snapshot`] once per frame, before any painting
//!    is drawn, to capture the player's floor and position.
//! 2. [`Simulation::draw`] once per painting node, which returns the
//!    painting's commands and then advances its state machine.

use glam::Vec3;
use log::{trace, warn};

use crate::commands::DisplayList;
use crate::context::{PaintingHandle, PlayerSnapshot, RippleContext};
use crate::floor::FloorQuery;
use crate::group::PaintingGroup;
use crate::mesh::MeshTables;
use crate::mover::{move_painting, MoverStatus, ProgressFlags};
use crate::painting::Painting;
use crate::render::display_painting;
use crate::trigger;

/// Why the host is calling into the painting system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallContext {
    /// Node created or area (re)loaded.
    Init,
    /// Node unloaded.
    Unload,
    /// A normal rendered frame.
    Render,
}

/// Render layer of a painting node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawLayer {
    #[default]
    Opaque,
    Transparent,
}

impl DrawLayer {
    pub fn for_alpha(alpha: u8) -> Self {
        match alpha {
            0xFF => DrawLayer::Opaque,
            _ => DrawLayer::Transparent,
        }
    }
}

/// The scene-graph node that draws one painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintingNode {
    /// `(group << 8) | slot`.
    pub parameter: u16,
    pub layer: DrawLayer,
}

impl PaintingNode {
    pub fn new(group: u8, slot: u8) -> Self {
        Self { parameter: ((group as u16) << 8) | slot as u16, layer: DrawLayer::Opaque }
    }

    #[inline]
    pub fn group(&self) -> usize {
        ((self.parameter >> 8) & 0xFF) as usize
    }

    #[inline]
    pub fn slot(&self) -> usize {
        (self.parameter & 0xFF) as usize
    }

    #[inline]
    pub fn handle(&self) -> PaintingHandle {
        PaintingHandle::new(self.group(), self.slot())
    }
}

/// All painting groups of a level plus the shared mesh and frame context.
///
/// Use method chaining to configure.
#[derive(Debug, Clone)]
pub struct Simulation {
    tables: MeshTables,
    groups: Vec<PaintingGroup>,
    context: RippleContext,
}

impl Simulation {
    /// Create a simulation drawing every painting with `tables`.
    pub fn new(tables: MeshTables) -> Self {
        Self { tables, groups: Vec::new(), context: RippleContext::new() }
    }

    /// Add a group. Groups are numbered in the order they are added.
    pub fn with_group(mut self, group: PaintingGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn tables(&self) -> &MeshTables {
        &self.tables
    }

    pub fn groups(&self) -> &[PaintingGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&PaintingGroup> {
        self.groups.get(index)
    }

    pub fn group_mut(&mut self, index: usize) -> Option<&mut PaintingGroup> {
        self.groups.get_mut(index)
    }

    pub fn painting(&self, handle: PaintingHandle) -> Option<&Painting> {
        self.groups.get(handle.group)?.get(handle.slot)
    }

    pub fn painting_mut(&mut self, handle: PaintingHandle) -> Option<&mut Painting> {
        self.groups.get_mut(handle.group)?.get_mut(handle.slot)
    }

    pub fn context(&self) -> &RippleContext {
        &self.context
    }

    /// The painting currently rippling, if any.
    pub fn rippling(&self) -> Option<&Painting> {
        self.painting(self.context.rippling?)
    }

    pub fn mover_status(&self) -> MoverStatus {
        self.context.mover_status
    }

    /// One scene-graph node per painting, in group then slot order.
    ///
    /// Node parameters address 256 groups of 256 slots; paintings beyond
    /// that are skipped with a warning.
    pub fn nodes(&self) -> Vec<PaintingNode> {
        let mut nodes = Vec::new();
        for (g, group) in self.groups.iter().enumerate() {
            let Ok(g) = u8::try_from(g) else {
                warn!("group {} ('{}') is not addressable by a node, skipping it", g, group.name());
                continue;
            };
            for s in 0..group.len() {
                let Ok(s) = u8::try_from(s) else {
                    warn!("group '{}': {} paintings past slot 255 are not addressable", group.name(), group.len() - s);
                    break;
                };
                nodes.push(PaintingNode::new(g, s));
            }
        }
        nodes
    }

    /// Refresh the frame snapshot.
    ///
    /// Outside of rendering this only re-arms the update counter so the
    /// next rendered frame counts as a new tick.
    pub fn update_snapshot(
        &mut self,
        call: CallContext,
        area_counter: u32,
        player_pos: Vec3,
        floors: &impl FloorQuery,
    ) {
        if call != CallContext::Render {
            self.context.counter.rearm(area_counter);
            return;
        }

        self.context.counter.advance(area_counter);
        let floor = floors.find_floor(player_pos);
        self.context.player = PlayerSnapshot { floor_type: floor.map(|s| s.kind), position: player_pos };
        trace!(
            "snapshot: counter {} floor {:?} player {:?}",
            area_counter,
            self.context.player.floor_type,
            player_pos
        );
    }

    /// Draw the painting addressed by `node`, then update it.
    ///
    /// Returns `None` when the node's slot holds no painting, or when the
    /// call is not a render (the painting is reset instead).
    pub fn draw(
        &mut self,
        call: CallContext,
        node: &mut PaintingNode,
        flags: &mut dyn ProgressFlags,
    ) -> Option<DisplayList> {
        let handle = node.handle();
        let Some(group) = self.groups.get_mut(handle.group) else {
            warn!("draw for missing painting group {}", handle.group);
            return None;
        };
        let Some(painting) = group.get_mut(handle.slot) else {
            warn!("draw for missing painting {}/{}", handle.group, handle.slot);
            return None;
        };

        if call != CallContext::Render {
            painting.reset();
            self.context.rippling = None;
            return None;
        }

        if let Some(mover) = painting.mover {
            if let Some(status) = move_painting(&mut painting.position.x, &mover, flags) {
                self.context.mover_status = status;
            }
        }

        node.layer = DrawLayer::for_alpha(painting.alpha);

        // draw before updating
        let list = display_painting(painting, &self.tables, &mut self.context);

        painting.update_floors(&self.context.player);
        trigger::update_painting(group, handle, &mut self.context);

        Some(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::Surface;
    use crate::mover::{MemoryFlags, MoverConfig};
    use crate::painting::RippleState;
    use crate::test_support::test_painting;

    fn no_floor(_: Vec3) -> Option<Surface> {
        None
    }

    fn sim() -> Simulation {
        Simulation::new(MeshTables::grid(4)).with_group(
            PaintingGroup::new("castle")
                .with_painting(test_painting(0))
                .with_painting(test_painting(1).with_alpha(0x80)),
        )
    }

    #[test]
    fn test_nodes_cover_every_painting() {
        let sim = sim().with_group(PaintingGroup::new("hall").with_painting(test_painting(0)));
        let params: Vec<u16> = sim.nodes().iter().map(|n| n.parameter).collect();
        assert_eq!(params, vec![0x0000, 0x0001, 0x0100]);
    }

    #[test]
    fn test_nodes_stop_at_slot_limit() {
        let mut big = PaintingGroup::new("gallery");
        for id in 0..300 {
            big.push(test_painting(id));
        }
        let sim = Simulation::new(MeshTables::grid(1)).with_group(big);
        let nodes = sim.nodes();
        assert_eq!(nodes.len(), 256);
        assert_eq!(nodes.last().map(|n| n.slot()), Some(255));
        assert!(nodes.iter().all(|n| n.group() == 0));

        let mut sim = Simulation::new(MeshTables::grid(1));
        for _ in 0..258 {
            sim = sim.with_group(PaintingGroup::new("g").with_painting(test_painting(0)));
        }
        let nodes = sim.nodes();
        assert_eq!(nodes.len(), 256);
        assert_eq!(nodes.last().map(|n| n.group()), Some(255));
    }

    #[test]
    fn test_node_parameter() {
        let node = PaintingNode::new(1, 14);
        assert_eq!(node.parameter, 0x010E);
        assert_eq!(node.group(), 1);
        assert_eq!(node.slot(), 14);
    }

    #[test]
    fn test_draw_missing_painting() {
        let mut sim = sim();
        let mut flags = MemoryFlags::default();
        let mut node = PaintingNode::new(0, 5);
        assert!(sim.draw(CallContext::Render, &mut node, &mut flags).is_none());
        let mut node = PaintingNode::new(3, 0);
        assert!(sim.draw(CallContext::Render, &mut node, &mut flags).is_none());
    }

    #[test]
    fn test_draw_sets_layer() {
        let mut sim = sim();
        let mut flags = MemoryFlags::default();
        let mut node = PaintingNode::new(0, 1);
        assert!(sim.draw(CallContext::Render, &mut node, &mut flags).is_some());
        assert_eq!(node.layer, DrawLayer::Transparent);

        let mut node = PaintingNode { layer: DrawLayer::Transparent, ..PaintingNode::new(0, 0) };
        sim.draw(CallContext::Render, &mut node, &mut flags);
        assert_eq!(node.layer, DrawLayer::Opaque);
    }

    #[test]
    fn test_non_render_draw_resets() {
        let mut sim = sim();
        let handle = PaintingHandle::new(0, 0);
        if let Some(p) = sim.painting_mut(handle) {
            p.state = RippleState::Entered;
            p.ripple_timer = 9.0;
        }
        sim.context.rippling = Some(handle);

        let mut node = PaintingNode::new(0, 0);
        let out = sim.draw(CallContext::Init, &mut node, &mut MemoryFlags::default());
        assert!(out.is_none());
        assert!(sim.rippling().is_none());
        let painting = sim.painting(handle).unwrap();
        assert_eq!(painting.state, RippleState::Idle);
        assert_eq!(painting.ripple_timer, 0.0);
    }

    #[test]
    fn test_snapshot_only_on_render() {
        let mut sim = sim();
        let floor = |_: Vec3| Some(Surface { kind: 0xA6, id: 3 });
        sim.update_snapshot(CallContext::Init, 10, Vec3::ONE, &floor);
        assert_eq!(sim.context().player, PlayerSnapshot::default());
        assert!(sim.context().counter.ticked());

        sim.update_snapshot(CallContext::Render, 11, Vec3::ONE, &floor);
        assert_eq!(sim.context().player.floor_type, Some(0xA6));
        assert_eq!(sim.context().player.position, Vec3::ONE);

        sim.update_snapshot(CallContext::Render, 11, Vec3::ZERO, &no_floor);
        assert_eq!(sim.context().player.floor_type, None);
        assert!(!sim.context().counter.ticked());
    }

    #[test]
    fn test_mover_runs_before_draw() {
        let mover = MoverConfig { front_x: 0.0, back_x: 100.0, speed: 60.0 };
        let mut sim = Simulation::new(MeshTables::grid(2))
            .with_group(PaintingGroup::new("castle").with_painting(test_painting(0).with_mover(mover)));
        let mut flags = MemoryFlags { unlocked: true, moved_back: false };
        let mut node = PaintingNode::new(0, 0);
        let handle = node.handle();

        sim.draw(CallContext::Render, &mut node, &mut flags);
        assert_eq!(sim.painting(handle).map(|p| p.position.x), Some(60.0));
        assert_eq!(sim.mover_status(), MoverStatus::Moving);

        sim.draw(CallContext::Render, &mut node, &mut flags);
        assert_eq!(sim.painting(handle).map(|p| p.position.x), Some(100.0));
        assert!(flags.moved_back);

        sim.draw(CallContext::Render, &mut node, &mut flags);
        assert_eq!(sim.mover_status(), MoverStatus::Back);

        sim.draw(CallContext::Unload, &mut node, &mut flags);
        assert_eq!(sim.painting(handle).map(|p| p.position.x), Some(0.0));
    }
}
