//! Integration scenarios for the painting simulation.
//!
//! These drive a [`Simulation`] the way a host renderer does: one snapshot
//! refresh per frame, then one draw per painting node.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ripplepaint::prelude::*;
use ripplepaint::trigger::update_ripple_state;
use ripplepaint::{BuiltinList, ListRef, PaintingHandle, RippleContext};

const ENTER_LEFT: i16 = 0xD3;
const ENTER_MIDDLE: i16 = 0xD4;
const RIPPLE_LEFT: i16 = 0xA6;
const PLAIN: i16 = 0x0001;

fn passive() -> RippleParams {
    RippleParams::new(20.0, 0.9608, 0.24, 40.0)
}

fn entry() -> RippleParams {
    RippleParams::new(80.0, 0.9524, 0.14, 30.0)
}

fn painting(id: i16) -> Painting {
    let tables = MeshTables::grid(4);
    let maps = ripplepaint::TextureMap::planar_bands(&tables.mesh, 1, 32, 32);
    Painting::new(id, 614.0)
        .with_textures(vec![TextureImage::solid(32, 32, [255; 4]).unwrap()], maps)
        .with_lists("normal", "ripple")
        .with_presets(passive(), entry())
}

fn single(painting: Painting) -> Simulation {
    Simulation::new(MeshTables::grid(4)).with_group(PaintingGroup::new("test").with_painting(painting))
}

/// Drives frames with an increasing area counter.
struct Host {
    sim: Simulation,
    flags: MemoryFlags,
    counter: u32,
}

impl Host {
    fn new(sim: Simulation) -> Self {
        let mut host = Self { sim, flags: MemoryFlags::default(), counter: 0 };
        host.sim.update_snapshot(CallContext::Init, 0, Vec3::ZERO, &|_: Vec3| -> Option<Surface> { None });
        host
    }

    /// Run one frame and return each node's output, in node order.
    fn frame(&mut self, player: Vec3, floor: i16, nodes: &[PaintingNode]) -> Vec<Option<DisplayList>> {
        self.counter += 1;
        let floors = move |_: Vec3| Some(Surface { kind: floor, id: 0 });
        self.sim.update_snapshot(CallContext::Render, self.counter, player, &floors);
        nodes
            .iter()
            .map(|node| {
                let mut node = *node;
                self.sim.draw(CallContext::Render, &mut node, &mut self.flags)
            })
            .collect()
    }

    fn painting(&self, group: usize, slot: usize) -> &Painting {
        self.sim.painting(PaintingHandle::new(group, slot)).unwrap()
    }
}

fn is_rippling_list(list: &DisplayList) -> bool {
    list.iter()
        .any(|c| *c == Command::CallList(ListRef::Builtin(BuiltinList::RipplingBegin)))
}

// ============================================================================
// Trigger Scenarios
// ============================================================================

#[test]
fn test_enter_left_starts_entry_ripple() {
    let mut host = Host::new(single(painting(0)));
    let node = [PaintingNode::new(0, 0)];

    host.frame(Vec3::new(153.0, 100.0, 80.0), PLAIN, &node);
    assert_eq!(host.painting(0, 0).state, RippleState::Idle);

    host.frame(Vec3::new(153.0, 100.0, 80.0), ENTER_LEFT, &node);
    let p = host.painting(0, 0);
    assert_eq!(p.state, RippleState::Entered);
    assert_eq!(p.ripple_timer, 0.0);
    assert_eq!(p.ripple_origin, Vec2::new(153.5, 150.0));
    assert_eq!(p.ripple.current.magnitude, 80.0);
    assert_eq!(p.ripple.current.dispersion, 40.0);
    assert_eq!(host.sim.context().rippling, Some(PaintingHandle::new(0, 0)));
    assert_eq!(host.sim.context().entry_height, 100.0);
}

#[test]
fn test_standing_still_does_not_retrigger() {
    let mut host = Host::new(single(painting(0)));
    let node = [PaintingNode::new(0, 0)];

    host.frame(Vec3::new(300.0, 0.0, 80.0), RIPPLE_LEFT, &node);
    assert_eq!(host.painting(0, 0).state, RippleState::Ripple);

    for _ in 0..5 {
        host.frame(Vec3::new(300.0, 0.0, 80.0), RIPPLE_LEFT, &node);
    }
    // the timer kept running, so nothing restarted the ripple
    assert_eq!(host.painting(0, 0).ripple_timer, 5.0);
}

#[test]
fn test_floor_painting_enters_on_drop() {
    let floor_painting = painting(0).with_rotation([270.0, 0.0]).with_position(Vec3::new(0.0, 0.0, 614.0));
    let mut host = Host::new(single(floor_painting));
    let node = [PaintingNode::new(0, 0)];

    // standing on the enter floor above the plane does nothing
    host.frame(Vec3::new(100.0, 20.0, 500.0), ENTER_MIDDLE, &node);
    assert_eq!(host.painting(0, 0).state, RippleState::Idle);

    host.frame(Vec3::new(100.0, -20.0, 500.0), ENTER_MIDDLE, &node);
    let p = host.painting(0, 0);
    assert_eq!(p.state, RippleState::Entered);
    assert_eq!(p.ripple_origin, Vec2::new(100.0, 114.0));
}

// ============================================================================
// Draw Ordering
// ============================================================================

#[test]
fn test_ripple_shows_one_frame_late() {
    let mut host = Host::new(single(painting(0)));
    let node = [PaintingNode::new(0, 0)];

    let first = host.frame(Vec3::new(153.0, 100.0, 80.0), ENTER_LEFT, &node);
    let first = first[0].as_ref().unwrap();
    assert!(!is_rippling_list(first));
    assert!(first.iter().any(|c| *c == Command::CallList(ListRef::Authored("normal".into()))));
    assert_eq!(host.painting(0, 0).state, RippleState::Entered);

    let second = host.frame(Vec3::new(153.0, 100.0, 80.0), ENTER_LEFT, &node);
    assert!(is_rippling_list(second[0].as_ref().unwrap()));

    // the decay step ran after the geometry was emitted
    let p = host.painting(0, 0);
    assert_eq!(p.ripple_timer, 1.0);
    assert_eq!(p.ripple.current.magnitude, 80.0 * 0.9524);
}

#[test]
fn test_missing_slot_draws_nothing() {
    let mut host = Host::new(single(painting(0)));
    host.frame(Vec3::ZERO, ENTER_LEFT, &[PaintingNode::new(0, 0)]);
    let before = host.painting(0, 0).clone();

    let out = host.frame(Vec3::ZERO, PLAIN, &[PaintingNode::new(0, 7), PaintingNode::new(2, 0)]);
    assert!(out.iter().all(Option::is_none));
    let after = host.painting(0, 0);
    assert_eq!(after.state, before.state);
    assert_eq!(after.ripple_timer, before.ripple_timer);
}

#[test]
fn test_unload_resets_rippling_painting() {
    let mut host = Host::new(single(painting(0)));
    let mut node = PaintingNode::new(0, 0);
    host.frame(Vec3::ZERO, ENTER_LEFT, &[node]);
    assert!(host.sim.rippling().is_some());

    assert!(host.sim.draw(CallContext::Unload, &mut node, &mut host.flags).is_none());
    assert!(host.sim.rippling().is_none());
    assert_eq!(host.painting(0, 0).state, RippleState::Idle);
    assert_eq!(host.painting(0, 0).ripple.current, RippleParams::cleared());
}

// ============================================================================
// Decay
// ============================================================================

fn expected_ticks(m0: f64, decay: f64) -> u32 {
    ((1.0 / m0).ln() / decay.ln()).ceil() as u32
}

#[test]
fn test_proximity_decay_tick_count() {
    let mut painting = painting(0);
    painting.state = RippleState::Ripple;
    painting.ripple.start_passive();
    let mut ctx = RippleContext::new();

    let mut ticks = 0;
    while painting.state != RippleState::Idle {
        ticks += 1;
        ctx.counter.advance(ticks);
        update_ripple_state(&mut painting, &mut ctx);
        assert!(ticks < 1000);
    }
    assert_eq!(ticks, expected_ticks(20.0, 0.9608));
}

#[test]
fn test_entry_ripple_dies_out_in_simulation() {
    let mut host = Host::new(single(painting(0)));
    let node = [PaintingNode::new(0, 0)];
    host.frame(Vec3::new(153.0, 100.0, 80.0), ENTER_LEFT, &node);

    let ticks = expected_ticks(80.0, 0.9524);
    for _ in 0..ticks - 1 {
        host.frame(Vec3::new(153.0, 100.0, 80.0), PLAIN, &node);
    }
    assert_eq!(host.painting(0, 0).state, RippleState::Entered);

    host.frame(Vec3::new(153.0, 100.0, 80.0), PLAIN, &node);
    assert_eq!(host.painting(0, 0).state, RippleState::Idle);
    assert!(host.sim.rippling().is_none());
}

#[test]
fn test_continuous_entry_settles_to_passive() {
    let wall = painting(0)
        .with_trigger(RippleTrigger::Continuous)
        .with_presets(RippleParams::new(10.0, 1.0, 0.1, 25.0), RippleParams::new(30.0, 0.9, 0.05, 5.0));
    let mut host = Host::new(single(wall));
    let node = [PaintingNode::new(0, 0)];

    host.frame(Vec3::new(460.0, 0.0, 80.0), ENTER_LEFT, &node);
    assert_eq!(host.painting(0, 0).state, RippleState::Entered);

    let ticks = expected_ticks(30.0 / 10.0, 0.9);
    for _ in 0..ticks {
        host.frame(Vec3::new(460.0, 0.0, 80.0), PLAIN, &node);
    }
    let p = host.painting(0, 0);
    assert_eq!(p.state, RippleState::Ripple);
    assert_eq!(p.ripple.current, p.ripple.passive);
    assert_eq!(p.ripple.current.dispersion, 25.0);

    for _ in 0..200 {
        host.frame(Vec3::new(460.0, 0.0, 80.0), PLAIN, &node);
    }
    assert_eq!(host.painting(0, 0).state, RippleState::Ripple);
    assert!(host.sim.rippling().is_some());
}

// ============================================================================
// Group Invariant
// ============================================================================

#[test]
fn test_one_rippling_painting_per_group() {
    let mut group = PaintingGroup::new("castle");
    for id in 0..4 {
        let trigger = if id % 2 == 0 { RippleTrigger::Proximity } else { RippleTrigger::Continuous };
        group.push(painting(id).with_trigger(trigger));
    }
    let nodes: Vec<PaintingNode> = (0..4).map(|s| PaintingNode::new(0, s)).collect();
    let mut host = Host::new(Simulation::new(MeshTables::grid(4)).with_group(group));
    let mut rng = StdRng::seed_from_u64(0x5EED);

    for _ in 0..2000 {
        let floor = if rng.gen_bool(0.3) {
            PLAIN
        } else {
            let id: i16 = rng.gen_range(0..4);
            let base = if rng.gen_bool(0.5) { RIPPLE_LEFT } else { ENTER_LEFT };
            base + id * 3 + rng.gen_range(0..3)
        };
        let player = Vec3::new(rng.gen_range(0.0..614.0), rng.gen_range(-50.0..614.0), 80.0);
        host.frame(player, floor, &nodes);

        let group = host.sim.group(0).unwrap();
        assert!(group.rippling_count() <= 1);
        match host.sim.context().rippling {
            Some(handle) => {
                assert!(host.sim.painting(handle).unwrap().is_rippling());
                assert_eq!(group.rippling_count(), 1);
            }
            None => assert_eq!(group.rippling_count(), 0),
        }
    }
}

#[test]
fn test_starting_ripple_stops_sibling() {
    let group = PaintingGroup::new("castle").with_painting(painting(0)).with_painting(painting(1));
    let nodes = [PaintingNode::new(0, 0), PaintingNode::new(0, 1)];
    let mut host = Host::new(Simulation::new(MeshTables::grid(4)).with_group(group));

    host.frame(Vec3::ZERO, RIPPLE_LEFT, &nodes);
    assert_eq!(host.painting(0, 0).state, RippleState::Ripple);

    host.frame(Vec3::ZERO, RIPPLE_LEFT + 3, &nodes);
    assert_eq!(host.painting(0, 0).state, RippleState::Idle);
    assert_eq!(host.painting(0, 1).state, RippleState::Ripple);
    assert_eq!(host.sim.context().rippling, Some(PaintingHandle::new(0, 1)));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_level_from_json() {
    let json = r#"{
        "name": "json",
        "mesh": { "kind": "grid", "divisions": 6 },
        "groups": [{
            "name": "inside",
            "paintings": [
                {
                    "id": 0,
                    "textures": [
                        { "kind": "solid", "rgba": [255, 0, 0, 255], "width": 32, "height": 16 },
                        { "kind": "solid", "rgba": [0, 0, 255, 255], "width": 32, "height": 16 }
                    ],
                    "normal_list": "bob_normal",
                    "ripple_list": "bob_ripple"
                },
                {
                    "id": 1,
                    "position": [1000.0, 0.0, 0.0],
                    "textures": [{ "kind": "solid", "rgba": [9, 9, 9, 255], "width": 8, "height": 8 }],
                    "texture_kind": "env_map",
                    "trigger": "continuous",
                    "alpha": 180
                }
            ]
        }]
    }"#;
    let sim = LevelConfig::from_json_str(json).unwrap().build(".").unwrap();
    let mut host = Host::new(sim);
    let nodes = [PaintingNode::new(0, 0), PaintingNode::new(0, 1)];

    host.frame(Vec3::new(100.0, 0.0, 80.0), ENTER_LEFT, &nodes);
    let out = host.frame(Vec3::new(100.0, 0.0, 80.0), PLAIN, &nodes);

    let rippling = out[0].as_ref().unwrap();
    assert!(is_rippling_list(rippling));
    assert_eq!(rippling.triangle_count(), host.sim.tables().mesh.triangle_count());
    assert_eq!(
        rippling.iter().filter(|c| matches!(c, Command::LoadBlockTexture { .. })).count(),
        2
    );
    assert!(!is_rippling_list(out[1].as_ref().unwrap()));
}
