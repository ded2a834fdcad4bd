//! Particle redistribution toward nodal lines.
//!
//! Sand on a vibrating plate migrates away from strongly-moving regions and
//! collects where the displacement vanishes. This module reproduces that
//! behavior with a gradient descent on `|z(x, y)|`: each frame every
//! particle takes a step down the local amplitude slope, plus a small
//! seeded jitter that keeps the swarm from freezing in shallow basins.
//!
//! The random stream is a seeded [`ChaCha8Rng`], so a given seed replays
//! the same scatter and the same jitter sequence exactly.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::modal::{Mode, PlateShape};

/// Tunable parameters of the particle swarm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Number of particles
    pub count: usize,
    /// Descent gain: displacement per unit amplitude gradient per second
    pub sensitivity: f64,
    /// Jitter magnitude (distance per second at full strength)
    pub jitter: f64,
    /// Half-width of the symmetric finite-difference stencil
    pub gradient_offset: f64,
    /// Per-frame displacement cap, keeps fast particles from tunneling
    /// through thin nodal lines
    pub max_step: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 400,
            sensitivity: 1.0,
            jitter: 0.05,
            gradient_offset: 1e-3,
            max_step: 0.05,
        }
    }
}

impl ParticleConfig {
    /// Validate counts and magnitudes.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.count == 0 {
            return Err(ParameterError::ZeroParticleCount);
        }
        for &(name, value) in &[
            ("particle sensitivity", self.sensitivity),
            ("particle jitter", self.jitter),
            ("gradient offset", self.gradient_offset),
            ("particle max step", self.max_step),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::NonFinite { name, value });
            }
        }
        if self.gradient_offset <= 0.0 {
            return Err(ParameterError::NonPositiveDimension {
                name: "gradient offset",
                value: self.gradient_offset,
            });
        }
        if self.max_step <= 0.0 {
            return Err(ParameterError::NonPositiveDimension {
                name: "particle max step",
                value: self.max_step,
            });
        }
        if self.sensitivity < 0.0 || self.jitter < 0.0 {
            return Err(ParameterError::BadSolverConfig {
                reason: "particle sensitivity and jitter must be non-negative",
            });
        }
        Ok(())
    }
}

/// Amplitudes below this are treated as "already on a node": the particle
/// stops descending and only jitters.
const NODE_EPSILON: f64 = 1e-6;

/// A seeded swarm of massless test particles confined to a plate.
#[derive(Debug, Clone)]
pub struct ParticleManager {
    cfg: ParticleConfig,
    shape: PlateShape,
    positions: Vec<[f64; 2]>,
    rng: ChaCha8Rng,
    seed: u64,
}

impl ParticleManager {
    /// Scatter `cfg.count` particles uniformly over the plate.
    pub fn new(cfg: ParticleConfig, shape: PlateShape, seed: u64) -> Result<Self, ParameterError> {
        cfg.validate()?;
        shape.validate()?;
        let mut manager = Self {
            cfg,
            shape,
            positions: Vec::with_capacity(cfg.count),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        };
        manager.scatter();
        Ok(manager)
    }

    /// Current particle positions.
    pub fn positions(&self) -> &[[f64; 2]] {
        &self.positions
    }

    /// Seed the swarm was last scattered with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Plate outline the particles are confined to.
    pub fn shape(&self) -> &PlateShape {
        &self.shape
    }

    /// Re-scatter uniformly with a fresh seed, restarting the random
    /// stream so the same seed always reproduces the same trajectory.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.scatter();
    }

    /// Discard positions and re-scatter uniformly over the plate using the
    /// current random stream.
    pub fn scatter(&mut self) {
        let (width, height) = self.shape.bounds();
        self.positions.clear();
        // Rejection sampling against the outline; the stadium and circle
        // fill at least pi/4 of the bounding box, so this converges fast.
        while self.positions.len() < self.cfg.count {
            let x = self.rng.random_range(0.0..width);
            let y = self.rng.random_range(0.0..height);
            if self.shape.contains(x, y) {
                self.positions.push([x, y]);
            }
        }
        debug!(
            "scattered {} particles with seed {}",
            self.cfg.count, self.seed
        );
    }

    /// Advance every particle by one frame of duration `dt` against the
    /// given mode's displacement field.
    ///
    /// Particles descend the gradient of `|z|` (symmetric finite
    /// differences with half-width `gradient_offset`), capped at
    /// `max_step` per frame, then receive uniform jitter scaled by `dt`.
    /// A particle that steps outside the outline is reflected back in.
    pub fn advance(&mut self, dt: f64, mode: &Mode) {
        for i in 0..self.positions.len() {
            let [x, y] = self.positions[i];

            let amplitude = mode.displacement(x, y).abs();
            let mut step = [0.0, 0.0];
            if amplitude > NODE_EPSILON {
                let h = self.cfg.gradient_offset;
                let gx = (mode.displacement(x + h, y).abs()
                    - mode.displacement(x - h, y).abs())
                    / (2.0 * h);
                let gy = (mode.displacement(x, y + h).abs()
                    - mode.displacement(x, y - h).abs())
                    / (2.0 * h);
                step = [-self.cfg.sensitivity * gx * dt, -self.cfg.sensitivity * gy * dt];
                let len = (step[0] * step[0] + step[1] * step[1]).sqrt();
                if len > self.cfg.max_step {
                    let scale = self.cfg.max_step / len;
                    step[0] *= scale;
                    step[1] *= scale;
                }
            }

            let jitter = self.cfg.jitter * dt;
            if jitter > 0.0 {
                step[0] += jitter * self.rng.random_range(-1.0..=1.0);
                step[1] += jitter * self.rng.random_range(-1.0..=1.0);
            }

            let candidate = [x + step[0], y + step[1]];
            self.positions[i] = if self.shape.contains(candidate[0], candidate[1]) {
                candidate
            } else {
                self.reflect(candidate, [x, y])
            };
        }
    }

    /// Push an escaped particle back inside the outline.
    fn reflect(&self, escaped: [f64; 2], previous: [f64; 2]) -> [f64; 2] {
        let reflected = match self.shape {
            PlateShape::Rectangle { width, height } => {
                [mirror(escaped[0], width), mirror(escaped[1], height)]
            }
            PlateShape::Circle { radius } => radial_reflect(escaped, [radius, radius], radius),
            PlateShape::Stadium { length, radius } => {
                // Mirror across the flat edges first, then fold back through
                // whichever cap the particle escaped past.
                let boxed = [
                    mirror(escaped[0], length + 2.0 * radius),
                    mirror(escaped[1], 2.0 * radius),
                ];
                if self.shape.contains(boxed[0], boxed[1]) {
                    boxed
                } else {
                    let cap_x = if boxed[0] < radius { radius } else { radius + length };
                    radial_reflect(boxed, [cap_x, radius], radius)
                }
            }
        };
        if self.shape.contains(reflected[0], reflected[1]) {
            reflected
        } else {
            previous
        }
    }
}

/// Reflect a scalar into `[0, limit]`.
fn mirror(v: f64, limit: f64) -> f64 {
    if v < 0.0 {
        -v
    } else if v > limit {
        2.0 * limit - v
    } else {
        v
    }
}

/// Fold a point outside a circle back across its rim.
fn radial_reflect(p: [f64; 2], center: [f64; 2], radius: f64) -> [f64; 2] {
    let dx = p[0] - center[0];
    let dy = p[1] - center[1];
    let r = (dx * dx + dy * dy).sqrt();
    if r <= radius || r == 0.0 {
        return p;
    }
    let folded = (2.0 * radius - r).max(0.0);
    [center[0] + dx / r * folded, center[1] + dy / r * folded]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::{BoundaryMode, PlateConfig};

    fn unit_square() -> PlateShape {
        PlateShape::Rectangle {
            width: 1.0,
            height: 1.0,
        }
    }

    fn square_mode(m: u32, n: u32) -> Mode {
        let cfg = PlateConfig {
            shape: unit_square(),
            boundary: BoundaryMode::Fixed,
            wave_speed: 1.0,
            grid_resolution: 64,
        };
        Mode::new(&cfg, m, n).unwrap()
    }

    #[test]
    fn zero_count_is_rejected() {
        let cfg = ParticleConfig {
            count: 0,
            ..ParticleConfig::default()
        };
        assert!(matches!(
            ParticleManager::new(cfg, unit_square(), 1),
            Err(ParameterError::ZeroParticleCount)
        ));
    }

    #[test]
    fn scatter_fills_the_outline() {
        let shape = PlateShape::Circle { radius: 0.5 };
        let manager = ParticleManager::new(ParticleConfig::default(), shape, 7).unwrap();
        assert_eq!(manager.positions().len(), 400);
        for &[x, y] in manager.positions() {
            assert!(shape.contains(x, y));
        }
    }

    #[test]
    fn same_seed_replays_the_same_trajectory() {
        let mode = square_mode(3, 2);
        let mut a = ParticleManager::new(ParticleConfig::default(), unit_square(), 42).unwrap();
        let mut b = ParticleManager::new(ParticleConfig::default(), unit_square(), 42).unwrap();
        for _ in 0..50 {
            a.advance(1.0 / 60.0, &mode);
            b.advance(1.0 / 60.0, &mode);
        }
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn reseed_changes_then_restores_the_scatter() {
        let mut manager =
            ParticleManager::new(ParticleConfig::default(), unit_square(), 1).unwrap();
        let original = manager.positions().to_vec();
        manager.reseed(2);
        assert_ne!(manager.positions(), original.as_slice());
        manager.reseed(1);
        assert_eq!(manager.positions(), original.as_slice());
    }

    #[test]
    fn particles_stay_inside_under_heavy_jitter() {
        let cfg = ParticleConfig {
            count: 200,
            jitter: 2.0,
            ..ParticleConfig::default()
        };
        let shape = PlateShape::Stadium {
            length: 1.0,
            radius: 0.5,
        };
        let plate = PlateConfig {
            shape,
            boundary: BoundaryMode::Fixed,
            wave_speed: 1.0,
            grid_resolution: 64,
        };
        let mode = Mode::new(&plate, 3, 2).unwrap();
        let mut manager = ParticleManager::new(cfg, shape, 9).unwrap();
        for _ in 0..200 {
            manager.advance(1.0 / 60.0, &mode);
            for &[x, y] in manager.positions() {
                assert!(shape.contains(x, y), "escaped to ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn swarm_collects_on_nodal_lines() {
        // Without jitter the swarm descends |z| until every particle sits
        // near some zero of the field, so the mean sampled amplitude must
        // collapse. (A uniform scatter over mode (2, 1) averages
        // (2/pi)^2 ~ 0.405.)
        let cfg = ParticleConfig {
            count: 300,
            jitter: 0.0,
            sensitivity: 0.2,
            ..ParticleConfig::default()
        };
        let mode = square_mode(2, 1);
        let mut manager = ParticleManager::new(cfg, unit_square(), 5).unwrap();

        let mean_amplitude = |m: &ParticleManager| {
            m.positions()
                .iter()
                .map(|&[x, y]| mode.displacement(x, y).abs())
                .sum::<f64>()
                / m.positions().len() as f64
        };

        let before = mean_amplitude(&manager);
        for _ in 0..800 {
            manager.advance(1.0 / 60.0, &mode);
        }
        let after = mean_amplitude(&manager);
        assert!(
            after < before * 0.25,
            "mean amplitude {} -> {} did not collapse",
            before,
            after
        );
    }

    #[test]
    fn amplitude_below_epsilon_freezes_without_jitter() {
        let cfg = ParticleConfig {
            count: 1,
            jitter: 0.0,
            ..ParticleConfig::default()
        };
        let mode = square_mode(2, 1);
        let mut manager = ParticleManager::new(cfg, unit_square(), 3).unwrap();
        // Park the single particle exactly on the nodal line
        manager.positions[0] = [0.5, 0.5];
        manager.advance(1.0 / 60.0, &mode);
        assert_eq!(manager.positions()[0], [0.5, 0.5]);
    }
}
