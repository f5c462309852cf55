//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only, so a seed plus an input script replays exactly
//! - Stable iteration order (entities are plain `Vec`s)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod craft;
pub mod field;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::{CollisionReport, craft_overlaps, projectile_hits, resolve_collisions, soft_bounce};
pub use craft::FireOutcome;
pub use field::{FRAGMENT_COUNT, spawn_obstacle};
pub use state::{
    Craft, CraftPhase, Obstacle, Positioned, Projectile, ScheduledEvent, SimEvent, SimulationState,
    TimerAction,
};
pub use tick::{TickInput, tick};
