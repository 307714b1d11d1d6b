use std::collections::VecDeque;

use glam::{Vec2, Vec3};

use super::color::Rgba;
use super::constants::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Triangle,
    Square,
    Ring,
}

/// Per-effect animation state carried by a particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    None,
    /// Pulsing visibility (sphere).
    Sparkle { phase: f32 },
    /// Sideways sinusoidal drift applied during update (fountain).
    Wiggle { phase: f32, speed: f32, amp: f32 },
    /// Alpha oscillation (quantum).
    Flicker { phase: f32, speed: f32 },
    /// Pulsating glow (nova core).
    Glow { pulse: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub acc: Vec2,
    /// Elapsed age in seconds. Negative means the particle is still waiting
    /// to appear.
    pub t: f32,
    pub life: f32,
    pub size: f32,
    pub color: Rgba,
    pub shape: Shape,
    pub spin: f32,
    /// When false `pos.z`/`vel.z` are ignored and no projection is applied.
    pub depth: bool,
    pub base_alpha: f32,
    pub effect: Effect,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, life: f32, size: f32, color: Rgba, shape: Shape) -> Self {
        Self {
            pos: pos.extend(0.0),
            vel: vel.extend(0.0),
            acc: Vec2::ZERO,
            t: 0.0,
            life: life.max(0.0),
            size,
            color,
            shape,
            spin: 0.0,
            depth: false,
            base_alpha: 1.0,
            effect: Effect::None,
        }
    }

    pub fn with_depth(mut self, z: f32, vz: f32) -> Self {
        self.depth = true;
        self.pos.z = z;
        self.vel.z = vz;
        self
    }

    pub fn with_acc(mut self, acc: Vec2) -> Self {
        self.acc = acc;
        self
    }

    pub fn with_delay(mut self, delay_sec: f32) -> Self {
        self.t = -delay_sec.max(0.0);
        self
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_alpha(mut self, base_alpha: f32) -> Self {
        self.base_alpha = base_alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.t < 0.0
    }

    /// Remaining-life fraction in [0, 1].
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        if self.life <= 0.0 {
            return 0.0;
        }
        (1.0 - self.t.max(0.0) / self.life).clamp(0.0, 1.0)
    }

    /// Opacity multiplier from the effect state at the current age.
    pub fn effect_alpha(&self) -> f32 {
        match self.effect {
            Effect::Sparkle { phase } => 0.55 + 0.45 * (phase + self.t * 22.0).sin(),
            Effect::Flicker { phase, speed } => 0.5 + 0.5 * (phase + self.t * speed).sin(),
            Effect::Glow { pulse } => 0.8 + 0.2 * (pulse + self.t * 12.0).sin(),
            Effect::None | Effect::Wiggle { .. } => 1.0,
        }
    }

    /// Final opacity before projection-dependent tweaks.
    #[inline]
    pub fn alpha(&self) -> f32 {
        (self.life_fraction() * self.base_alpha * self.effect_alpha() * self.color.a)
            .clamp(0.0, 1.0)
    }

    /// Rotation in radians.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.spin * self.t.max(0.0)
    }

    /// Advance one step. Returns false once the particle should be dropped.
    fn step(&mut self, dt: f32, width: f32, height: f32) -> bool {
        if self.t < 0.0 {
            self.t += dt;
            return true;
        }
        self.vel.x += self.acc.x * dt;
        self.vel.y += self.acc.y * dt;
        self.pos.x += self.vel.x * dt;
        self.pos.y += self.vel.y * dt;
        if self.depth {
            self.vel.z *= (1.0 - DEPTH_DRAG * dt).max(0.0);
            self.pos.z += self.vel.z * dt;
        }
        if let Effect::Wiggle { phase, speed, amp } = self.effect {
            self.pos.x += (phase + self.t * speed).sin() * amp * dt;
        }
        self.t += dt;

        if self.t >= self.life {
            return false;
        }
        let m = PARTICLE_BOUNDS_MARGIN_PX;
        if self.pos.x < -m || self.pos.x > width + m || self.pos.y < -m || self.pos.y > height + m
        {
            return false;
        }
        !(self.depth && self.pos.z < NEAR_DEPTH_LIMIT)
    }
}

/// Bounded particle collection. Oldest particles are evicted first once the
/// budget is reached.
#[derive(Clone, Debug)]
pub struct ParticlePool {
    particles: VecDeque<Particle>,
    budget: usize,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(DEFAULT_PARTICLE_BUDGET)
    }
}

impl ParticlePool {
    pub fn new(budget: usize) -> Self {
        Self {
            particles: VecDeque::new(),
            budget,
        }
    }

    #[inline]
    pub fn budget(&self) -> usize {
        self.budget
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Change the budget, evicting the oldest particles if it shrank.
    pub fn set_budget(&mut self, budget: usize) {
        self.budget = budget;
        self.evict_over_budget();
    }

    pub fn spawn(&mut self, p: Particle) {
        self.particles.push_back(p);
        self.evict_over_budget();
    }

    /// Advance every particle and drop the expired or off-screen ones.
    pub fn update(&mut self, dt: f32, width: f32, height: f32) {
        self.particles.retain_mut(|p| p.step(dt, width, height));
    }

    #[inline]
    fn evict_over_budget(&mut self) {
        let excess = self.particles.len().saturating_sub(self.budget);
        if excess > 0 {
            self.particles.drain(..excess);
        }
    }
}

impl Extend<Particle> for ParticlePool {
    fn extend<T: IntoIterator<Item = Particle>>(&mut self, iter: T) {
        for p in iter {
            self.spawn(p);
        }
    }
}
