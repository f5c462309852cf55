//! Per-frame simulation tick
//!
//! One call per host frame. Velocities are per tick at the nominal rate;
//! the host frame time only drives the timer clock.

use super::collision::resolve_collisions;
use super::craft::FireOutcome;
use super::state::{SimulationState, TimerAction};

/// Intents for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
    /// Trigger held. The craft only fires again after a tick without it.
    pub fire: bool,
    /// The trigger went down since the last tick. Set once per physical
    /// press, so a tap that starts and ends between two ticks still fires.
    pub fire_pressed: bool,
}

/// Advance the simulation by one tick.
///
/// `frame_ms` is the wall-clock time since the previous tick (see
/// [`super::clock::FrameClock`]).
pub fn tick(state: &mut SimulationState, input: &TickInput, frame_ms: f64) {
    state.events.clear();

    // A wreck is visible for exactly one tick
    state.retire_wreck();

    if state.is_game_over() {
        return;
    }

    if frame_ms.is_finite() && frame_ms > 0.0 {
        state.clock_ms += frame_ms;
    }
    state.time_ticks += 1;

    for action in state.take_due_timers() {
        match action {
            TimerAction::Respawn => state.respawn_craft(),
            TimerAction::EndInvulnerability => state.end_invulnerability(),
        }
    }

    let (width, height) = (state.width, state.height);
    if state.craft_phase.is_flying() {
        if let Some(craft) = state.craft.as_mut() {
            craft.steer(
                input.turn_left,
                input.turn_right,
                input.thrust,
                state.config.turn_rate(),
            );
            // A fresh press implies a release we never saw
            if input.fire_pressed {
                craft.release_trigger();
            }
            if (input.fire || input.fire_pressed)
                && craft.fire(&state.config) == FireOutcome::BurstReset
            {
                log::debug!("Projectile cap reached, burst reset");
            }
            if !input.fire {
                craft.release_trigger();
            }
            craft.update(&state.config, width, height);
            state.trigger_locked = craft.fire_locked;
        }
    } else if !input.fire {
        state.trigger_locked = false;
    }

    for obstacle in &mut state.obstacles {
        obstacle.advance(width, height);
    }

    resolve_collisions(state);
    state.refill_if_cleared();
}
