//! Simulation state and entity types
//!
//! Everything the tick driver mutates lives in [`SimulationState`]. The
//! presentation layer only reads it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SimConfig, validate_arena};
use crate::{heading_vector, wrap_point, wrap_to_arena};

/// Craft lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftPhase {
    /// Normal flight, collisions are lethal
    Flying,
    /// Flight with collisions ignored (after a respawn)
    Invulnerable,
    /// Hit this tick; the wreck is retired at the start of the next one
    Exploding,
    /// No craft in play, waiting on the respawn timer
    Respawning,
}

impl CraftPhase {
    /// Phases in which the craft moves and obeys intents
    pub fn is_flying(&self) -> bool {
        matches!(self, CraftPhase::Flying | CraftPhase::Invulnerable)
    }
}

/// Position, size and facing shared by the craft and obstacles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Positioned {
    pub pos: Vec2,
    pub radius: f32,
    /// Radians
    pub heading: f32,
}

impl Positioned {
    /// Panics on a non-finite or non-positive radius
    pub fn new(pos: Vec2, radius: f32, heading: f32) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "entity radius must be positive and finite, got {radius}"
        );
        Self {
            pos,
            radius,
            heading,
        }
    }
}

/// A shot fired by the craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Distance covered so far
    pub traveled: f32,
    /// Max travel as a fraction of arena width
    pub max_fraction: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, max_fraction: f32) -> Self {
        Self {
            pos,
            vel,
            traveled: 0.0,
            max_fraction,
        }
    }

    /// Move one tick. Returns false once the shot has outlived its range.
    pub fn advance(&mut self, width: f32, height: f32) -> bool {
        self.pos += self.vel;
        self.traveled += self.vel.length();
        self.pos = wrap_point(self.pos, width, height);
        !self.expired(width)
    }

    /// Range is measured against the current arena width
    pub fn expired(&self, width: f32) -> bool {
        self.traveled > self.max_fraction * width
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craft {
    pub body: Positioned,
    /// Radians per tick, signed (0 = not turning)
    pub angular_vel: f32,
    /// Accumulated velocity, persists across ticks
    pub thrust: Vec2,
    pub thrusting: bool,
    pub invulnerable: bool,
    pub destroyed: bool,
    /// Set by a shot, cleared when the trigger is released
    pub fire_locked: bool,
    pub projectiles: Vec<Projectile>,
}

impl Craft {
    /// A fresh craft at `pos`, at rest, facing up
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            body: Positioned::new(pos, radius, std::f32::consts::FRAC_PI_2),
            angular_vel: 0.0,
            thrust: Vec2::ZERO,
            thrusting: false,
            invulnerable: false,
            destroyed: false,
            fire_locked: false,
            projectiles: Vec::new(),
        }
    }

    /// Replacement craft, protected for the grace window
    pub fn respawned(pos: Vec2, radius: f32) -> Self {
        Self {
            invulnerable: true,
            ..Self::new(pos, radius)
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.body.heading
    }

    /// Where shots leave the hull
    pub fn nose(&self) -> Vec2 {
        let reach = crate::consts::NOSE_FACTOR * self.body.radius;
        self.body.pos + heading_vector(self.body.heading) * reach
    }
}

/// A drifting destructible polygon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Positioned,
    /// Pixels per tick
    pub vel: Vec2,
    /// Number of silhouette vertices (always `offsets.len()`)
    pub vertex_count: usize,
    /// 0 = round, 1 = very spiky
    pub jaggedness: f32,
    /// Per-vertex radius multipliers, each in [1 - jaggedness, 1 + jaggedness]
    pub offsets: Vec<f32>,
}

impl Obstacle {
    pub fn new(body: Positioned, vel: Vec2, jaggedness: f32, offsets: Vec<f32>) -> Self {
        debug_assert!((0.0..=1.0).contains(&jaggedness));
        Self {
            body,
            vel,
            vertex_count: offsets.len(),
            jaggedness,
            offsets,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius
    }

    /// Drift one tick and wrap at the arena edges
    pub fn advance(&mut self, width: f32, height: f32) {
        self.body.pos += self.vel;
        self.body.pos = wrap_to_arena(self.body.pos, self.body.radius, width, height);
    }

    /// Silhouette points for drawing
    pub fn vertices(&self) -> Vec<Vec2> {
        let step = std::f32::consts::TAU / self.vertex_count.max(1) as f32;
        self.offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                let theta = self.body.heading + i as f32 * step;
                self.body.pos + Vec2::new(theta.cos(), theta.sin()) * offset * self.body.radius
            })
            .collect()
    }
}

/// Things the presentation layer may want to react to (one tick's worth)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    ObstacleDestroyed { position: Vec2, radius: f32 },
    CraftDestroyed { position: Vec2, radius: f32 },
    CraftRespawned { position: Vec2 },
    InvulnerabilityEnded,
    /// Every obstacle was destroyed and the field was refilled
    FieldCleared,
    /// Last life lost
    GameOver { score: f64 },
}

/// Deferred state changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    Respawn,
    EndInvulnerability,
}

/// A timer entry, drained by the tick driver once `clock_ms >= due_at_ms`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub due_at_ms: f64,
    pub action: TimerAction,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct SimulationState {
    pub config: SimConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<Obstacle>,
    /// `None` while respawning
    pub craft: Option<Craft>,
    pub craft_phase: CraftPhase,
    /// Sum of the radii of every destroyed obstacle
    pub score: f64,
    pub lives: u32,
    /// Simulated wall-clock time in milliseconds
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending timers (unordered; drained by due time)
    pub(crate) timers: Vec<ScheduledEvent>,
    /// Events raised during the most recent tick
    pub(crate) events: Vec<SimEvent>,
    /// Trigger lock carried across the respawn gap
    pub(crate) trigger_locked: bool,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
}

impl SimulationState {
    /// Start a session: craft at center, field populated
    pub fn new(config: SimConfig, width: f32, height: f32, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_arena(width, height)?;

        let center = Vec2::new(width / 2.0, height / 2.0);
        let craft = Craft::new(center, config.ship_radius);
        let initial = config.initial_obstacles;

        let mut state = Self {
            lives: config.starting_lives,
            config,
            seed,
            width,
            height,
            obstacles: Vec::new(),
            craft: Some(craft),
            craft_phase: CraftPhase::Flying,
            score: 0.0,
            clock_ms: 0.0,
            time_ticks: 0,
            timers: Vec::new(),
            events: Vec::new(),
            trigger_locked: false,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.populate(initial);

        log::info!(
            "Session started: arena {}x{}, seed {}, {} lives",
            width,
            height,
            seed,
            state.lives
        );
        Ok(state)
    }

    pub fn craft(&self) -> Option<&Craft> {
        self.craft.as_ref()
    }

    pub fn craft_phase(&self) -> CraftPhase {
        self.craft_phase
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Live projectiles (empty while no craft is in play)
    pub fn projectiles(&self) -> &[Projectile] {
        self.craft.as_ref().map(|c| c.projectiles.as_slice()).unwrap_or(&[])
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Events raised by the most recent tick
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Out of lives; the host decides what happens next
    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    pub fn arena_center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Host viewport changed. Entities now outside the arena wrap on the next tick.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        if let Err(err) = validate_arena(width, height) {
            log::warn!("Rejected resize to {}x{}", width, height);
            return Err(err);
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub(crate) fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Queue `action` to run `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: f64, action: TimerAction) {
        let due_at_ms = self.clock_ms + delay_ms;
        log::debug!("Scheduled {:?} at {:.0}ms", action, due_at_ms);
        self.timers.push(ScheduledEvent { due_at_ms, action });
    }

    /// Drop every pending timer with this action
    pub fn cancel(&mut self, action: TimerAction) {
        self.timers.retain(|t| t.action != action);
    }

    pub fn is_scheduled(&self, action: TimerAction) -> bool {
        self.timers.iter().any(|t| t.action == action)
    }

    pub fn pending_timers(&self) -> &[ScheduledEvent] {
        &self.timers
    }

    /// Remove and return every timer due at the current clock, earliest first
    pub(crate) fn take_due_timers(&mut self) -> Vec<TimerAction> {
        let now = self.clock_ms;
        let mut due: Vec<ScheduledEvent> = Vec::new();
        self.timers.retain(|t| {
            if t.due_at_ms <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_at_ms.total_cmp(&b.due_at_ms));
        due.into_iter().map(|t| t.action).collect()
    }
}
