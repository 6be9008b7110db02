//! Particle bursts for eat and death feedback

use rand::Rng;
use serde::Serialize;

use super::cell::GridCell;
use crate::config::{PARTICLE_COLORS, PARTICLE_DAMPING, PARTICLE_DECAY};

/// Palette entry of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleColor {
    Cyan,
    Magenta,
}

impl ParticleColor {
    pub fn css(&self) -> &'static str {
        match self {
            ParticleColor::Cyan => PARTICLE_COLORS[0],
            ParticleColor::Magenta => PARTICLE_COLORS[1],
        }
    }
}

/// A single short-lived particle in pixel space
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Remaining life, 1 at spawn
    pub life: f64,
    pub size: f64,
    pub color: ParticleColor,
}

impl Particle {
    /// Integrate one step scaled by `dt_factor`. Returns false once expired.
    pub fn tick(&mut self, dt_factor: f64) -> bool {
        self.x += self.vx * dt_factor;
        self.y += self.vy * dt_factor;
        self.life -= PARTICLE_DECAY * dt_factor;
        self.vx *= PARTICLE_DAMPING;
        self.vy *= PARTICLE_DAMPING;
        self.life > 0.0
    }
}

/// All live particles
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `count` particles at the pixel centre of `cell`
    pub fn spawn_burst<R: Rng + ?Sized>(
        &mut self,
        cell: GridCell,
        count: usize,
        cell_size: f64,
        rng: &mut R,
    ) {
        let (x, y) = cell.center_px(cell_size);
        self.particles.reserve(count);

        for _ in 0..count {
            self.particles.push(Particle {
                x,
                y,
                vx: (rng.gen::<f64>() - 0.5) * 6.0,
                vy: (rng.gen::<f64>() - 0.5) * 6.0,
                life: 1.0,
                color: if rng.gen_bool(0.5) {
                    ParticleColor::Cyan
                } else {
                    ParticleColor::Magenta
                },
                size: 2.0 + rng.gen::<f64>() * 3.0,
            });
        }
    }

    /// Move, decay and damp every particle, dropping the expired ones
    pub fn advance(&mut self, dt_factor: f64) {
        self.particles.retain_mut(|p| p.tick(dt_factor));
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_burst_spawns_at_cell_center() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut system = ParticleSystem::new();
        system.spawn_burst(GridCell::new(2, 3), 15, 18.0, &mut rng);

        assert_eq!(system.len(), 15);
        for p in system.iter() {
            assert_eq!((p.x, p.y), (45.0, 63.0));
            assert_eq!(p.life, 1.0);
            assert!((-3.0..3.0).contains(&p.vx));
            assert!((-3.0..3.0).contains(&p.vy));
            assert!((2.0..5.0).contains(&p.size));
        }
    }

    #[test]
    fn test_expires_after_34_reference_frames() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut system = ParticleSystem::new();
        system.spawn_burst(GridCell::new(0, 0), 5, 18.0, &mut rng);

        for _ in 0..33 {
            system.advance(1.0);
        }
        assert_eq!(system.len(), 5);
        assert!(system.iter().all(|p| p.life > 0.0 && p.life < 0.02));

        system.advance(1.0);
        assert!(system.is_empty());
    }

    #[test]
    fn test_zero_dt_freezes() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut system = ParticleSystem::new();
        system.spawn_burst(GridCell::new(0, 0), 3, 18.0, &mut rng);
        let before: Vec<_> = system.iter().map(|p| (p.x, p.y, p.life)).collect();

        system.advance(0.0);
        let after: Vec<_> = system.iter().map(|p| (p.x, p.y, p.life)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_motion_damped() {
        let mut p = Particle {
            x: 0.0,
            y: 0.0,
            vx: 2.0,
            vy: -1.0,
            life: 1.0,
            size: 3.0,
            color: ParticleColor::Cyan,
        };
        assert!(p.tick(1.0));
        assert_eq!((p.x, p.y), (2.0, -1.0));
        assert!((p.vx - 1.96).abs() < 1e-12);
        assert!((p.life - 0.97).abs() < 1e-12);
    }
}
