//! Rock Drift - simulation core for a drifting-rocks arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (craft, projectiles, obstacles, collisions, timers)
//! - `config`: Data-driven tuning loaded from JSON
//! - `input`: Key bindings to per-tick intents
//!
//! Rendering, audio and persistence live outside this crate. A host feeds
//! a [`sim::TickInput`] into [`sim::tick`] once per display frame and paints
//! whatever the resulting [`sim::SimulationState`] holds.

pub mod config;
pub mod input;
pub mod sim;

pub use config::{CapPolicy, ConfigError, SimConfig};
pub use input::InputState;

use glam::Vec2;

/// Simulation constants (defaults for [`SimConfig`])
pub mod consts {
    /// Nominal logical tick rate (ticks per second)
    pub const TICK_RATE: f32 = 60.0;
    /// Nominal wall-clock duration of one tick in milliseconds
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Longest frame the clock will accept before clamping
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Craft defaults
    pub const SHIP_RADIUS: f32 = 30.0;
    /// Acceleration, px/sec^2
    pub const SHIP_THRUST: f32 = 2.0;
    /// 0 = no friction, 1 = full friction
    pub const FRICTION: f32 = 0.5;
    pub const TURN_DEG_PER_SEC: f32 = 360.0;
    /// Nose sits this many radii ahead of the craft center
    pub const NOSE_FACTOR: f32 = 4.0 / 3.0;

    /// Projectile defaults
    pub const LASER_SPEED: f32 = 500.0;
    pub const LASER_MAX: usize = 20;
    /// Max travel as a fraction of arena width
    pub const LASER_DISTANCE: f32 = 0.6;

    /// Obstacle defaults
    pub const OBSTACLE_MIN_RADIUS: u32 = 50;
    pub const OBSTACLE_MAX_RADIUS: u32 = 100;
    pub const OBSTACLE_MIN_SPEED: u32 = 15;
    pub const OBSTACLE_MAX_SPEED: u32 = 30;
    /// Each of the two vertex-count draws comes from `[2, 8)`
    pub const VERTEX_DRAW_MIN: u32 = 2;
    pub const VERTEX_DRAW_MAX: u32 = 8;
    /// Obstacles smaller than this vanish instead of splitting
    pub const FRAGMENT_MIN_RADIUS: f32 = 15.0;
    pub const INITIAL_OBSTACLES: usize = 5;
    /// Spawn buffer around the craft, in craft radii
    pub const SPAWN_BUFFER_FACTOR: f32 = 6.0;
    /// Extra push applied to a candidate that lands inside the buffer
    pub const SPAWN_PUSH: f32 = 20.0;

    /// Session defaults
    pub const STARTING_LIVES: u32 = 5;
    pub const RESPAWN_DELAY_MS: f64 = 1000.0;
    pub const INVULNERABILITY_MS: f64 = 3000.0;
}

/// Convert degrees to radians
#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    degrees / 180.0 * std::f32::consts::PI
}

/// Euclidean distance between two points
#[inline]
pub fn distance(p1: Vec2, p2: Vec2) -> f32 {
    (p2 - p1).length()
}

/// Gap between two circles.
///
/// Positive means the circles are apart, zero or negative means they touch
/// or overlap.
#[inline]
pub fn circle_separation(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> f32 {
    distance(c1, c2) - (r1 + r2)
}

/// Normalize a heading to [0, 2π)
#[inline]
pub fn normalize_heading(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit vector along a heading in screen space (Y grows downward, so "up" is -sin)
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), -heading.sin())
}

/// Teleport a circle that has fully left the arena to just outside the opposite edge
pub fn wrap_to_arena(pos: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    let mut wrapped = pos;
    if pos.x < -radius {
        wrapped.x = width + radius;
    } else if pos.x > width + radius {
        wrapped.x = -radius;
    }
    if pos.y < -radius {
        wrapped.y = height + radius;
    } else if pos.y > height + radius {
        wrapped.y = -radius;
    }
    wrapped
}

/// Point wrap used for projectiles: leaving one edge re-enters at the other
pub fn wrap_point(pos: Vec2, width: f32, height: f32) -> Vec2 {
    let mut wrapped = pos;
    if pos.x < 0.0 {
        wrapped.x = width;
    } else if pos.x > width {
        wrapped.x = 0.0;
    }
    if pos.y < 0.0 {
        wrapped.y = height;
    } else if pos.y > height {
        wrapped.y = 0.0;
    }
    wrapped
}
