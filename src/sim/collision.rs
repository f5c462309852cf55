//! Collision detection and response
//!
//! Everything is a circle here: projectiles are points, obstacles and the
//! craft use their bounding radius. The pass runs once per tick after all
//! movement, in three stages: projectile vs obstacle, obstacle vs obstacle,
//! craft vs obstacle.

use glam::Vec2;

use super::state::{Craft, CraftPhase, Obstacle, SimulationState};
use crate::{circle_separation, distance};

/// What the collision pass did this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub obstacles_destroyed: usize,
    pub fragments_spawned: usize,
    pub deflected_pairs: usize,
    pub craft_hit: bool,
}

/// A projectile hits when it is inside the obstacle's bounding circle
#[inline]
pub fn projectile_hits(shot_pos: Vec2, obstacle: &Obstacle) -> bool {
    distance(shot_pos, obstacle.pos()) < obstacle.radius()
}

/// Craft and obstacle bounding circles overlap
#[inline]
pub fn craft_overlaps(craft: &Craft, obstacle: &Obstacle) -> bool {
    distance(craft.pos(), obstacle.pos()) < craft.radius() + obstacle.radius()
}

/// Non-physical "soft bounce" for overlapping obstacles.
///
/// Damps the current velocity and adds a unit push derived from the
/// obstacle's own heading. No mass, no momentum conservation.
#[inline]
pub fn soft_bounce(vel: Vec2, heading: f32, tick_rate: f32) -> Vec2 {
    vel / (tick_rate / 2.0) + Vec2::new((-heading).sin(), (-heading).cos())
}

/// Run every collision stage once
pub fn resolve_collisions(state: &mut SimulationState) -> CollisionReport {
    let mut report = CollisionReport::default();
    resolve_projectile_hits(state, &mut report);
    deflect_overlapping_obstacles(state, &mut report);
    check_craft_collision(state, &mut report);
    report
}

/// Shots vs obstacles.
///
/// Obstacles are walked in reverse so removal never shifts an index still
/// to be visited; fragments land past the walked range and wait for the
/// next tick. Each obstacle takes at most one shot.
fn resolve_projectile_hits(state: &mut SimulationState, report: &mut CollisionReport) {
    let mut shots = match state.craft.as_mut() {
        Some(craft) if !craft.projectiles.is_empty() => std::mem::take(&mut craft.projectiles),
        _ => return,
    };

    let field_len = state.obstacles.len();
    for idx in (0..field_len).rev() {
        let obstacle = &state.obstacles[idx];
        let Some(shot_idx) = shots.iter().rposition(|s| projectile_hits(s.pos, obstacle)) else {
            continue;
        };
        shots.remove(shot_idx);
        report.fragments_spawned += state.fragment(idx);
        report.obstacles_destroyed += 1;
    }

    if let Some(craft) = state.craft.as_mut() {
        craft.projectiles = shots;
    }
}

/// Obstacle pairs. Skipped entirely while the craft is invulnerable.
fn deflect_overlapping_obstacles(state: &mut SimulationState, report: &mut CollisionReport) {
    if state.craft.as_ref().is_some_and(|c| c.invulnerable) {
        return;
    }

    let tick_rate = state.config.tick_rate;
    let count = state.obstacles.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let (left, right) = state.obstacles.split_at_mut(j);
            let a = &mut left[i];
            let b = &mut right[0];
            if circle_separation(a.pos(), a.radius(), b.pos(), b.radius()) >= 0.0 {
                continue;
            }
            a.vel = soft_bounce(a.vel, a.body.heading, tick_rate);
            b.vel = soft_bounce(b.vel, b.body.heading, tick_rate);
            report.deflected_pairs += 1;
        }
    }
}

/// Craft vs obstacles. The first overlap is enough.
fn check_craft_collision(state: &mut SimulationState, report: &mut CollisionReport) {
    if state.craft_phase != CraftPhase::Flying {
        return;
    }
    let hit = match state.craft.as_ref() {
        Some(craft) if !craft.invulnerable => state.obstacles.iter().any(|o| craft_overlaps(craft, o)),
        _ => false,
    };
    if hit {
        state.destroy_craft();
        report.craft_hit = true;
    }
}
