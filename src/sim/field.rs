//! Obstacle field: spawning, population and fragmentation

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Obstacle, Positioned, SimEvent, SimulationState};
use crate::consts::*;
use crate::distance;

/// Children produced when a large enough obstacle is shot
pub const FRAGMENT_COUNT: usize = 2;

/// Build an obstacle with a random heading, drift and silhouette
pub fn spawn_obstacle<R: Rng>(rng: &mut R, pos: Vec2, radius: f32, tick_rate: f32) -> Obstacle {
    let heading = rng.random_range(0.0..TAU);
    let vertex_count = (rng.random_range(VERTEX_DRAW_MIN..VERTEX_DRAW_MAX)
        + rng.random_range(VERTEX_DRAW_MIN..VERTEX_DRAW_MAX)) as usize;
    let jaggedness = random_jaggedness(rng);
    let vel = Vec2::new(random_drift(rng, tick_rate), random_drift(rng, tick_rate));

    let low = 1.0 - jaggedness;
    let high = 1.0 + jaggedness;
    let offsets = (0..vertex_count)
        .map(|_| (rng.random::<f32>() * jaggedness * 2.0 + low).clamp(low, high))
        .collect();

    Obstacle::new(Positioned::new(pos, radius, heading), vel, jaggedness, offsets)
}

/// Random value in [0, 1] kept to 4 decimal places
fn random_jaggedness<R: Rng>(rng: &mut R) -> f32 {
    (rng.random::<f32>() * 10_000.0).round() / 10_000.0
}

/// One velocity component: [15, 30) px/s scaled to a tick, random sign
fn random_drift<R: Rng>(rng: &mut R, tick_rate: f32) -> f32 {
    let speed = rng.random_range(OBSTACLE_MIN_SPEED..OBSTACLE_MAX_SPEED) as f32 / tick_rate;
    if rng.random_bool(0.5) { speed } else { -speed }
}

impl SimulationState {
    /// Replace the field with `count` fresh obstacles.
    ///
    /// Candidates that land inside the craft's buffer zone are pushed away
    /// by the craft's offset rather than re-rolled, so a rare overlap can
    /// still happen.
    pub fn populate(&mut self, count: usize) {
        self.obstacles.clear();
        let buffer = self
            .craft
            .as_ref()
            .map(|c| (c.pos(), c.radius(), c.radius() * self.config.spawn_buffer_factor));

        for _ in 0..count {
            let mut pos = Vec2::new(
                self.rng.random_range(0.0..self.width),
                self.rng.random_range(0.0..self.height),
            );
            let radius = self.rng.random_range(OBSTACLE_MIN_RADIUS..OBSTACLE_MAX_RADIUS) as f32;

            if let Some((craft_pos, craft_r, zone)) = buffer {
                if distance(craft_pos, pos) <= zone {
                    pos = Vec2::new(
                        self.rng.random_range(0.0..self.width) + craft_pos.x + craft_r + SPAWN_PUSH,
                        self.rng.random_range(0.0..self.height) + craft_pos.y + craft_r + SPAWN_PUSH,
                    );
                }
            }

            let obstacle = spawn_obstacle(&mut self.rng, pos, radius, self.config.tick_rate);
            self.obstacles.push(obstacle);
        }

        log::info!("Populated field with {} obstacles", count);
    }

    /// Destroy the obstacle at `index`, credit its radius and split it if big enough.
    ///
    /// Children are appended to the end of the field. Returns how many were spawned.
    pub fn fragment(&mut self, index: usize) -> usize {
        let parent = self.obstacles.remove(index);
        let pos = parent.pos();
        let radius = parent.radius();

        self.score += radius as f64;
        self.push_event(SimEvent::ObstacleDestroyed {
            position: pos,
            radius,
        });

        if radius < self.config.fragment_min_radius {
            log::debug!("Obstacle r={} destroyed", radius);
            return 0;
        }

        let tick_rate = self.config.tick_rate;
        for _ in 0..FRAGMENT_COUNT {
            let child = spawn_obstacle(&mut self.rng, pos, radius / 2.0, tick_rate);
            self.obstacles.push(child);
        }
        log::debug!("Obstacle r={} split into {} x r={}", radius, FRAGMENT_COUNT, radius / 2.0);
        FRAGMENT_COUNT
    }

    /// True once every obstacle has been destroyed
    pub fn is_cleared(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Start a new field when the last obstacle goes (if configured)
    pub(crate) fn refill_if_cleared(&mut self) -> bool {
        if !self.config.refill_when_cleared || !self.is_cleared() {
            return false;
        }
        let count = self.config.initial_obstacles;
        if count == 0 {
            return false;
        }
        self.populate(count);
        self.push_event(SimEvent::FieldCleared);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn empty_state() -> SimulationState {
        let config = SimConfig {
            initial_obstacles: 0,
            refill_when_cleared: false,
            ..Default::default()
        };
        SimulationState::new(config, 800.0, 600.0, 42).expect("valid state")
    }

    fn still_obstacle(state: &mut SimulationState, pos: Vec2, radius: f32) {
        let mut rock = spawn_obstacle(&mut state.rng, pos, radius, TICK_RATE);
        rock.vel = Vec2::ZERO;
        state.obstacles.push(rock);
    }

    #[test]
    fn test_spawned_shape_invariants() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..500 {
            let rock = spawn_obstacle(&mut rng, Vec2::ZERO, 40.0, TICK_RATE);
            assert_eq!(rock.offsets.len(), rock.vertex_count);
            assert!((4..=14).contains(&rock.vertex_count));
            assert!((0.0..=1.0).contains(&rock.jaggedness));
            // 4 decimal places
            let scaled = rock.jaggedness * 10_000.0;
            assert!((scaled - scaled.round()).abs() < 1e-2);
            for offset in &rock.offsets {
                assert!(*offset >= 1.0 - rock.jaggedness);
                assert!(*offset <= 1.0 + rock.jaggedness);
            }
            assert!((0.0..TAU).contains(&rock.body.heading));
        }
    }

    #[test]
    fn test_spawned_drift_range() {
        let mut rng = Pcg32::seed_from_u64(9);
        let min = OBSTACLE_MIN_SPEED as f32 / TICK_RATE;
        let max = OBSTACLE_MAX_SPEED as f32 / TICK_RATE;
        for _ in 0..200 {
            let rock = spawn_obstacle(&mut rng, Vec2::ZERO, 60.0, TICK_RATE);
            for component in [rock.vel.x, rock.vel.y] {
                assert!(component.abs() >= min - 1e-6);
                assert!(component.abs() < max);
            }
        }
    }

    #[test]
    fn test_populate_count_and_radius() {
        let mut state = empty_state();
        state.populate(12);
        assert_eq!(state.obstacles.len(), 12);
        for rock in &state.obstacles {
            assert!(rock.radius() >= 50.0 && rock.radius() < 100.0);
            assert_eq!(rock.radius().fract(), 0.0);
        }

        // Repopulating replaces rather than appends
        state.populate(3);
        assert_eq!(state.obstacles.len(), 3);
    }

    #[test]
    fn test_populate_pushes_candidates_out_of_buffer() {
        let config = SimConfig {
            initial_obstacles: 0,
            ..Default::default()
        };
        // Tiny arena: every candidate lands inside the 180px buffer
        let mut state = SimulationState::new(config, 100.0, 100.0, 5).unwrap();
        state.populate(20);
        for rock in &state.obstacles {
            // 50 (craft x) + 30 (radius) + 20 (push)
            assert!(rock.pos().x >= 100.0);
            assert!(rock.pos().y >= 100.0);
        }
    }

    #[test]
    fn test_fragment_large_splits_in_two() {
        let mut state = empty_state();
        let at = Vec2::new(200.0, 150.0);
        still_obstacle(&mut state, at, 80.0);

        let spawned = state.fragment(0);
        assert_eq!(spawned, 2);
        assert_eq!(state.score(), 80.0);
        assert_eq!(state.obstacles.len(), 2);
        for child in &state.obstacles {
            assert_eq!(child.radius(), 40.0);
            assert_eq!(child.pos(), at);
        }
        assert_eq!(
            state.events(),
            &[SimEvent::ObstacleDestroyed {
                position: at,
                radius: 80.0
            }]
        );
    }

    #[test]
    fn test_fragment_small_vanishes() {
        let mut state = empty_state();
        still_obstacle(&mut state, Vec2::new(10.0, 10.0), 10.0);
        still_obstacle(&mut state, Vec2::new(500.0, 500.0), 70.0);

        assert_eq!(state.fragment(0), 0);
        assert_eq!(state.score(), 10.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].radius(), 70.0);
    }

    #[test]
    fn test_fragment_threshold_boundary() {
        let mut state = empty_state();
        still_obstacle(&mut state, Vec2::ZERO, 15.0);
        assert_eq!(state.fragment(0), 2);
        assert!(state.obstacles.iter().all(|r| r.radius() == 7.5));

        let mut state = empty_state();
        still_obstacle(&mut state, Vec2::ZERO, 14.5);
        assert_eq!(state.fragment(0), 0);
        assert!(state.is_cleared());
    }

    #[test]
    fn test_refill_only_when_enabled() {
        let mut state = empty_state();
        assert!(!state.refill_if_cleared());

        state.config.refill_when_cleared = true;
        state.config.initial_obstacles = 4;
        assert!(state.refill_if_cleared());
        assert_eq!(state.obstacles.len(), 4);
        assert!(state.events().contains(&SimEvent::FieldCleared));

        // Field not empty any more
        assert!(!state.refill_if_cleared());
    }
}
