//! The ripple trigger state machine.
//!
//! Every rendered frame, after a painting is drawn, its floor tracker is
//! updated and the strategy for its (orientation, trigger) pair decides
//! whether a ripple starts. Strategies only run for idle and rippling
//! paintings; an entered painting waits for its ripple to decay.
//!
//! | Orientation | Trigger | Idle | Ripple |
//! |-------------|---------|------|--------|
//! | Wall | Proximity | ripple floor ⇒ RIPPLE, enter floor ⇒ ENTERED | enter floor ⇒ ENTERED |
//! | Wall | Continuous | ripple floor ⇒ centered RIPPLE, enter floor ⇒ ENTERED | enter floor ⇒ ENTERED, timer kept |
//! | Floor | Proximity | ripple floor ⇒ RIPPLE, dropped below on enter floor ⇒ ENTERED | dropped below on enter floor ⇒ ENTERED |
//! | Floor | Continuous | ripple floor ⇒ centered RIPPLE, on enter floor ⇒ ENTERED | dropped below on enter floor ⇒ ENTERED, timer kept |
//!
//! Wall paintings take their origin from the nearest quarter and the player's
//! height; floor paintings from the player's x and z.
//!
//! Decay runs separately ([`update_ripple_state`]), from inside the rippling
//! render, so the state a frame displays is always the state from before
//! that frame's trigger update.

use glam::Vec2;
use log::debug;

use crate::context::{PaintingHandle, RippleContext};
use crate::group::PaintingGroup;
use crate::painting::{Orientation, OriginX, OriginY, Painting, RippleState, RippleTrigger};

/// A requested state change, with where its ripple starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// `Ripple` or `Entered`.
    pub state: RippleState,
    pub x: OriginX,
    pub y: OriginY,
    pub reset_timer: bool,
}

impl Transition {
    const fn new(state: RippleState, x: OriginX, y: OriginY, reset_timer: bool) -> Self {
        Self { state, x, y, reset_timer }
    }
}

/// Decides the transition for one painting this frame.
pub type TriggerFn = fn(&Painting) -> Option<Transition>;

/// Strategy for a painting's (orientation, trigger) pair.
pub fn strategy(orientation: Orientation, trigger: RippleTrigger) -> TriggerFn {
    match (orientation, trigger) {
        (Orientation::Wall, RippleTrigger::Proximity) => wall_proximity,
        (Orientation::Wall, RippleTrigger::Continuous) => wall_continuous,
        (Orientation::Floor, RippleTrigger::Proximity) => floor_proximity,
        (Orientation::Floor, RippleTrigger::Continuous) => floor_continuous,
    }
}

/// Transition `painting` wants this frame, if any.
pub fn evaluate(painting: &Painting) -> Option<Transition> {
    strategy(painting.orientation(), painting.trigger)(painting)
}

fn wall_proximity(painting: &Painting) -> Option<Transition> {
    let entered = painting.floor.floor_entered;
    let ripple = Transition::new(RippleState::Ripple, OriginX::NearestQuarter, OriginY::PlayerY, true);
    let enter = Transition::new(RippleState::Entered, OriginX::NearestQuarter, OriginY::PlayerY, true);

    match painting.state {
        RippleState::Idle if entered.touches_ripple() => Some(ripple),
        RippleState::Idle | RippleState::Ripple if entered.touches_enter() => Some(enter),
        _ => None,
    }
}

fn wall_continuous(painting: &Painting) -> Option<Transition> {
    let entered = painting.floor.floor_entered;

    match painting.state {
        RippleState::Idle if entered.touches_ripple() => {
            Some(Transition::new(RippleState::Ripple, OriginX::Middle, OriginY::Middle, true))
        }
        RippleState::Idle if entered.touches_enter() => Some(Transition::new(
            RippleState::Entered,
            OriginX::NearestQuarter,
            OriginY::PlayerY,
            true,
        )),
        RippleState::Ripple if entered.touches_enter() => Some(Transition::new(
            RippleState::Entered,
            OriginX::NearestQuarter,
            OriginY::PlayerY,
            false,
        )),
        _ => None,
    }
}

fn floor_proximity(painting: &Painting) -> Option<Transition> {
    let floor = &painting.floor;
    let dropped_in = floor.went_below && floor.curr_floor.touches_enter();
    let ripple = Transition::new(RippleState::Ripple, OriginX::PlayerX, OriginY::PlayerZ, true);
    let enter = Transition::new(RippleState::Entered, OriginX::PlayerX, OriginY::PlayerZ, true);

    match painting.state {
        RippleState::Idle if floor.floor_entered.touches_ripple() => Some(ripple),
        RippleState::Idle | RippleState::Ripple if dropped_in => Some(enter),
        _ => None,
    }
}

fn floor_continuous(painting: &Painting) -> Option<Transition> {
    let floor = &painting.floor;

    match painting.state {
        RippleState::Idle if floor.floor_entered.touches_ripple() => {
            Some(Transition::new(RippleState::Ripple, OriginX::Middle, OriginY::Middle, true))
        }
        // standing on the enter floor is enough while idle
        RippleState::Idle if floor.curr_floor.touches_enter() => {
            Some(Transition::new(RippleState::Entered, OriginX::PlayerX, OriginY::PlayerZ, true))
        }
        RippleState::Ripple if floor.went_below && floor.curr_floor.touches_enter() => {
            Some(Transition::new(RippleState::Entered, OriginX::PlayerX, OriginY::PlayerZ, false))
        }
        _ => None,
    }
}

/// Start the ripple described by `transition` on the painting at `handle`.
///
/// Siblings in the group are stopped first, then the matching preset is
/// loaded, the origin placed, and the painting becomes the context's
/// rippling painting.
pub fn apply_transition(
    group: &mut PaintingGroup,
    handle: PaintingHandle,
    transition: Transition,
    ctx: &mut RippleContext,
) {
    let Some(id) = group.get(handle.slot).map(|p| p.id) else {
        return;
    };
    group.stop_others(id);

    let Some(painting) = group.get_mut(handle.slot) else {
        return;
    };

    match transition.state {
        RippleState::Ripple => painting.ripple.start_passive(),
        RippleState::Entered => painting.ripple.start_entry(),
        RippleState::Idle => {}
    }

    let player = ctx.player;
    painting.state = transition.state;
    painting.ripple_origin = Vec2::new(
        painting.origin_x(transition.x, &player),
        painting.origin_y(transition.y, &player),
    );
    ctx.entry_height = player.position.y;
    if transition.reset_timer {
        painting.ripple_timer = 0.0;
    }
    ctx.rippling = Some(handle);

    debug!(
        "painting {}/{} -> {:?} at ({:.1}, {:.1}), magnitude {:.1}",
        handle.group,
        handle.slot,
        painting.state,
        painting.ripple_origin.x,
        painting.ripple_origin.y,
        painting.ripple.current.magnitude,
    );
}

/// Evaluate and apply the trigger strategy for the painting at `handle`.
///
/// Returns the transition taken, if any.
pub fn update_painting(
    group: &mut PaintingGroup,
    handle: PaintingHandle,
    ctx: &mut RippleContext,
) -> Option<Transition> {
    let transition = evaluate(group.get(handle.slot)?)?;
    apply_transition(group, handle, transition, ctx);
    Some(transition)
}

/// Advance the rippling painting's decay by one step.
///
/// On a new simulation tick the magnitude decays and the timer advances.
/// The stop checks run on every call, ticked or not.
pub fn update_ripple_state(painting: &mut Painting, ctx: &mut RippleContext) {
    if ctx.counter.ticked() {
        painting.ripple.current.magnitude *= painting.ripple.current.decay;
        painting.ripple_timer += 1.0;
    }

    match painting.trigger {
        RippleTrigger::Proximity => {
            if painting.ripple.current.magnitude <= 1.0 {
                if painting.state != RippleState::Idle {
                    debug!("painting {} ripple died out after {} ticks", painting.id, painting.ripple_timer);
                }
                painting.state = RippleState::Idle;
                ctx.rippling = None;
            }
        }
        RippleTrigger::Continuous => {
            if painting.state == RippleState::Entered
                && painting.ripple.current.magnitude <= painting.ripple.passive.magnitude
            {
                debug!("painting {} settled into its passive ripple", painting.id);
                painting.state = RippleState::Ripple;
                painting.ripple.start_passive();
            }
        }
    }
}
