//! Craft motion, weapons and the damage/respawn state machine
//!
//! Phase flow:
//! `Flying` --hit--> `Exploding` --next tick--> `Respawning`
//! --respawn timer--> `Invulnerable` --grace timer--> `Flying`

use super::state::{Craft, CraftPhase, Projectile, SimEvent, SimulationState, TimerAction};
use crate::config::{CapPolicy, SimConfig};
use crate::{heading_vector, normalize_heading, wrap_to_arena};

/// Result of pulling the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A new projectile left the nose
    Fired,
    /// Trigger not released since the last shot
    Locked,
    /// At the cap: every active projectile was cleared
    BurstReset,
    /// At the cap: shot ignored
    Rejected,
}

impl Craft {
    /// Apply turn/thrust intents. Opposing turn inputs cancel out.
    pub fn steer(&mut self, turn_left: bool, turn_right: bool, thrust: bool, turn_rate: f32) {
        self.angular_vel = match (turn_left, turn_right) {
            (true, false) => -turn_rate,
            (false, true) => turn_rate,
            _ => 0.0,
        };
        self.thrusting = thrust;
    }

    /// Advance one tick: rotate, accelerate or coast, move, wrap, then move shots
    pub fn update(&mut self, config: &SimConfig, width: f32, height: f32) {
        self.body.heading = normalize_heading(self.body.heading + self.angular_vel);

        if self.thrusting {
            self.thrust += heading_vector(self.body.heading) * config.ship_thrust / config.tick_rate.sqrt();
        } else {
            // Exponential decay toward zero, never past it
            self.thrust -= self.thrust * config.friction / config.tick_rate;
        }

        self.body.pos += self.thrust;
        self.body.pos = wrap_to_arena(self.body.pos, self.body.radius, width, height);

        self.projectiles.retain_mut(|shot| shot.advance(width, height));
    }

    /// Fire from the nose unless the trigger is locked or the cap is reached
    pub fn fire(&mut self, config: &SimConfig) -> FireOutcome {
        if self.fire_locked {
            return FireOutcome::Locked;
        }
        self.fire_locked = true;

        if self.projectiles.len() >= config.laser_max {
            return match config.cap_policy {
                CapPolicy::BurstReset => {
                    self.projectiles.clear();
                    FireOutcome::BurstReset
                }
                CapPolicy::Reject => FireOutcome::Rejected,
            };
        }

        let vel = heading_vector(self.body.heading) * config.laser_speed / config.tick_rate;
        self.projectiles
            .push(Projectile::new(self.nose(), vel, config.laser_distance));
        FireOutcome::Fired
    }

    /// Re-arm the trigger
    pub fn release_trigger(&mut self) {
        self.fire_locked = false;
    }
}

impl SimulationState {
    /// `Flying -> Exploding`. Ignored in any other phase.
    pub(crate) fn destroy_craft(&mut self) {
        if self.craft_phase != CraftPhase::Flying {
            return;
        }
        let Some(craft) = self.craft.as_mut() else {
            return;
        };
        if craft.invulnerable {
            return;
        }

        craft.destroyed = true;
        craft.thrusting = false;
        craft.thrust = glam::Vec2::ZERO;
        let position = craft.pos();
        let radius = craft.radius();

        self.craft_phase = CraftPhase::Exploding;
        self.lives = self.lives.saturating_sub(1);
        self.push_event(SimEvent::CraftDestroyed { position, radius });
        log::info!("Craft destroyed at ({:.0}, {:.0}), {} lives left", position.x, position.y, self.lives);

        if self.lives == 0 {
            log::info!("Game over, final score {}", self.score);
            self.push_event(SimEvent::GameOver { score: self.score });
            return;
        }

        // One outstanding respawn at a time
        if !self.is_scheduled(TimerAction::Respawn) {
            self.schedule(self.config.respawn_delay_ms, TimerAction::Respawn);
        }
    }

    /// `Exploding -> Respawning`: the wreck and its shots leave play
    pub(crate) fn retire_wreck(&mut self) {
        if self.craft_phase == CraftPhase::Exploding {
            self.craft = None;
            self.craft_phase = CraftPhase::Respawning;
        }
    }

    /// `Respawning -> Invulnerable`: a fresh craft at the arena center
    pub(crate) fn respawn_craft(&mut self) {
        if self.craft_phase != CraftPhase::Respawning || self.is_game_over() {
            log::warn!("Ignoring respawn in phase {:?}", self.craft_phase);
            return;
        }

        let center = self.arena_center();
        // A trigger held through the explosion stays locked
        self.craft = Some(Craft {
            fire_locked: self.trigger_locked,
            ..Craft::respawned(center, self.config.ship_radius)
        });
        self.craft_phase = CraftPhase::Invulnerable;

        self.cancel(TimerAction::EndInvulnerability);
        self.schedule(self.config.invulnerability_ms, TimerAction::EndInvulnerability);
        self.push_event(SimEvent::CraftRespawned { position: center });
        log::info!("Craft respawned");
    }

    /// `Invulnerable -> Flying`
    pub(crate) fn end_invulnerability(&mut self) {
        if self.craft_phase != CraftPhase::Invulnerable {
            return;
        }
        if let Some(craft) = self.craft.as_mut() {
            craft.invulnerable = false;
        }
        self.craft_phase = CraftPhase::Flying;
        self.push_event(SimEvent::InvulnerabilityEnded);
        log::debug!("Invulnerability ended");
    }
}
