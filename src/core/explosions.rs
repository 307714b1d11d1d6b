use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec3};

use super::color::Rgba;
use super::constants::{HOLD_FACTOR_CAP, HOLD_FACTOR_MS, PUFF_COUNT, PUFF_LIFE_SEC};
use super::particles::{Effect, Particle, ParticlePool, Shape};
use super::rng::RandomStream;

/// Burst algorithm used when a note hits the floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExplosionKind {
    #[default]
    Sphere,
    Fountain,
    Shatter,
    Quantum,
    Nova,
}

impl ExplosionKind {
    pub const ALL: [ExplosionKind; 5] = [
        ExplosionKind::Sphere,
        ExplosionKind::Fountain,
        ExplosionKind::Shatter,
        ExplosionKind::Quantum,
        ExplosionKind::Nova,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExplosionKind::Sphere => "sphere",
            ExplosionKind::Fountain => "fountain",
            ExplosionKind::Shatter => "shatter",
            ExplosionKind::Quantum => "quantum",
            ExplosionKind::Nova => "nova",
        }
    }
}

impl fmt::Display for ExplosionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExplosionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ExplosionKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| anyhow::anyhow!("unknown explosion algorithm '{}'", s))
    }
}

/// Where and how hard a note landed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trigger {
    pub x: f32,
    pub y: f32,
    pub note: i32,
    pub velocity: f32,
    pub held_ms: f64,
}

impl Trigger {
    /// `1 + min(2, held_ms / 2000)`.
    #[inline]
    pub fn duration_factor(&self) -> f32 {
        duration_factor(self.held_ms)
    }

    #[inline]
    fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[inline]
pub fn duration_factor(held_ms: f64) -> f32 {
    1.0 + (held_ms.max(0.0) / HOLD_FACTOR_MS).min(HOLD_FACTOR_CAP as f64) as f32
}

#[inline]
fn count(base: f32, per_velocity: f32, velocity: f32, factor: f32) -> usize {
    ((base + per_velocity * velocity) * factor).round().max(0.0) as usize
}

/// Uniform direction on the unit sphere.
#[inline]
fn sphere_dir(rng: &mut RandomStream) -> Vec3 {
    let theta = rng.next_f32() * TAU;
    let phi = (2.0 * rng.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Synthesize one burst of `kind` into the pool.
pub fn emit(
    kind: ExplosionKind,
    trigger: &Trigger,
    color: Rgba,
    rng: &mut RandomStream,
    pool: &mut ParticlePool,
) {
    let velocity = trigger.velocity.clamp(0.0, 1.0);
    let trigger = Trigger {
        velocity,
        ..*trigger
    };
    match kind {
        ExplosionKind::Sphere => sphere(&trigger, color, rng, pool),
        ExplosionKind::Fountain => fountain(&trigger, color, rng, pool),
        ExplosionKind::Shatter => shatter(&trigger, color, rng, pool),
        ExplosionKind::Quantum => quantum(&trigger, color, rng, pool),
        ExplosionKind::Nova => nova(&trigger, color, rng, pool),
    }
}

const SPHERE_LAYER_SHAPES: [Shape; 3] = [Shape::Circle, Shape::Ring, Shape::Triangle];

fn sphere(tr: &Trigger, color: Rgba, rng: &mut RandomStream, pool: &mut ParticlePool) {
    let df = tr.duration_factor();
    let n = count(60.0, 140.0, tr.velocity, df);
    let base_speed = (160.0 + 220.0 * tr.velocity) * df.sqrt();

    for layer in 0..3 {
        let per_layer = n / 3 + usize::from(layer < n % 3);
        let layer_speed = base_speed * (1.0 - 0.25 * layer as f32);
        let delay = 0.06 * layer as f32;
        let shape = SPHERE_LAYER_SHAPES[layer];
        for _ in 0..per_layer {
            let dir = sphere_dir(rng);
            let speed = layer_speed * rng.range(0.7, 1.0);
            let v = dir * speed;
            let life = rng.range(0.9, 1.4) * (0.8 + 0.2 * df);
            let size = rng.range(1.5, 4.0);
            let mut p = Particle::new(tr.origin(), v.truncate(), life, size, color, shape)
                .with_depth(0.0, v.z)
                .with_acc(Vec2::new(0.0, 180.0))
                .with_delay(delay)
                .with_spin(rng.signed(3.0));
            if rng.chance(0.15) {
                p = p.with_effect(Effect::Sparkle {
                    phase: rng.next_f32() * TAU,
                });
            }
            pool.spawn(p);
        }
    }
}

fn fountain(tr: &Trigger, color: Rgba, rng: &mut RandomStream, pool: &mut ParticlePool) {
    let df = tr.duration_factor();
    let n = count(50.0, 110.0, tr.velocity, df);
    let streams = 5 + (3.0 * tr.velocity).round() as usize;
    let per_stream = (n / streams).max(1);
    let mid = (streams - 1) as f32 * 0.5;

    for s in 0..streams {
        let stream_angle = -PI * 0.5 + (s as f32 - mid) * 0.35;
        let turn = if s % 2 == 0 { 1.0 } else { -1.0 };
        for i in 0..per_stream {
            let progress = i as f32 / per_stream as f32;
            let angle = stream_angle + progress * 1.2 * turn;
            let wiggle = (progress * TAU * 2.0 + s as f32).sin() * 6.0;
            let speed =
                (220.0 + 260.0 * tr.velocity) * (1.0 - 0.4 * progress) * rng.range(0.9, 1.1);
            let v = Vec2::new(angle.cos() * speed, angle.sin() * speed - 120.0);
            let shape = if i % 2 == 0 { Shape::Circle } else { Shape::Square };
            let p = Particle::new(
                tr.origin() + Vec2::new(wiggle, 0.0),
                v,
                rng.range(1.1, 1.7) * (0.8 + 0.2 * df),
                if shape == Shape::Circle { 2.6 } else { 2.0 },
                color,
                shape,
            )
            .with_acc(Vec2::new(0.0, 260.0))
            .with_delay(progress * 0.25)
            .with_effect(Effect::Wiggle {
                phase: s as f32 + i as f32 * 0.4,
                speed: rng.range(8.0, 12.0),
                amp: 30.0,
            });
            pool.spawn(p);
        }
    }
}

fn shatter(tr: &Trigger, color: Rgba, rng: &mut RandomStream, pool: &mut ParticlePool) {
    let df = tr.duration_factor();
    let n = count(40.0, 100.0, tr.velocity, df);
    let shards = 6 + (6.0 * tr.velocity).round() as usize;
    let per_shard = (n / shards).max(1);

    for s in 0..shards {
        let shard_angle = s as f32 / shards as f32 * TAU + rng.signed(0.15);
        for f in 0..per_shard {
            let fi = f as f32;
            let radial = (160.0 + 240.0 * tr.velocity) * rng.range(0.5, 1.0);
            let v = Vec2::new(
                shard_angle.cos() * radial + (fi * 1.7).sin() * 40.0,
                shard_angle.sin() * radial + (fi * 2.3).cos() * 40.0 - 80.0,
            );
            let p = Particle::new(
                tr.origin(),
                v,
                rng.range(0.8, 1.3) * (0.8 + 0.2 * df),
                rng.range(2.5, 5.0),
                color,
                Shape::Triangle,
            )
            .with_acc(Vec2::new(0.0, 420.0))
            .with_alpha(rng.range(0.45, 0.95))
            .with_delay(fi * 0.015)
            .with_spin(rng.signed(7.0));
            pool.spawn(p);
        }
    }
}

fn quantum(tr: &Trigger, color: Rgba, rng: &mut RandomStream, pool: &mut ParticlePool) {
    let df = tr.duration_factor();
    let n = count(50.0, 120.0, tr.velocity, df);
    let clouds = 3 + (3.0 * tr.velocity).round() as usize;
    // Pairs keep entanglement even/odd aligned.
    let per_cloud = ((n / clouds).max(2) + 1) & !1;

    for c in 0..clouds {
        let ca = c as f32 / clouds as f32 * TAU;
        let center = tr.origin() + Vec2::new(ca.cos(), ca.sin()) * 18.0;
        let mut partner = Vec2::ZERO;
        for i in 0..per_cloud {
            let entangled = i % 2 == 1;
            let (v, tunneled) = if entangled {
                (Vec2::new(-partner.x, partner.y), false)
            } else {
                let angle = rng.next_f32() * TAU + (i as f32 * 0.5).sin() * 0.6;
                let mut r = rng.range(20.0, 60.0);
                let tunneled = rng.chance(0.12);
                if tunneled {
                    r *= 3.0;
                }
                partner = Vec2::new(angle.cos(), angle.sin()) * r * 3.0;
                (partner, tunneled)
            };
            let bias = if entangled { 60.0 } else { -60.0 };
            let p = Particle::new(
                center,
                v + Vec2::new(0.0, bias),
                rng.range(0.9, 1.6) * (0.8 + 0.2 * df),
                rng.range(1.5, 3.0),
                color,
                if tunneled { Shape::Ring } else { Shape::Circle },
            )
            .with_effect(Effect::Flicker {
                phase: rng.next_f32() * TAU,
                speed: rng.range(10.0, 20.0),
            });
            pool.spawn(p);
        }
    }
}

fn nova(tr: &Trigger, color: Rgba, rng: &mut RandomStream, pool: &mut ParticlePool) {
    let df = tr.duration_factor();
    let vel = tr.velocity;

    // Core: pulsating radial burst.
    let n_core = count(24.0, 40.0, vel, df);
    for i in 0..n_core {
        let angle = i as f32 / n_core.max(1) as f32 * TAU;
        let pulse = 1.0 + 0.25 * (i as f32 * 6.0 / n_core.max(1) as f32 * TAU).sin();
        let speed = (140.0 + 160.0 * vel) * pulse;
        let p = Particle::new(
            tr.origin(),
            Vec2::new(angle.cos(), angle.sin()) * speed,
            rng.range(0.6, 0.9) * (0.8 + 0.2 * df),
            rng.range(2.5, 5.0),
            color,
            Shape::Circle,
        )
        .with_acc(Vec2::new(0.0, 60.0))
        .with_effect(Effect::Glow {
            pulse: rng.next_f32() * TAU,
        });
        pool.spawn(p);
    }

    // Jets: two opposite spiraling streams with forward bias.
    let n_jet = count(20.0, 30.0, vel, df);
    for (j, base) in [0.0_f32, PI].into_iter().enumerate() {
        let turn = if j == 0 { 1.0 } else { -1.0 };
        for i in 0..n_jet {
            let progress = i as f32 / n_jet.max(1) as f32;
            let angle = base + (progress * 3.0 * TAU).sin() * 0.4 * turn;
            let speed = 260.0 + 200.0 * vel + progress * 120.0;
            let v = Vec2::new(angle.cos(), angle.sin()) * speed - Vec2::new(0.0, 60.0);
            let p = Particle::new(
                tr.origin(),
                v,
                rng.range(0.7, 1.1) * (0.8 + 0.2 * df),
                rng.range(1.5, 3.0),
                color,
                Shape::Circle,
            )
            .with_acc(Vec2::new(0.0, 120.0))
            .with_delay(progress * 0.2);
            pool.spawn(p);
        }
    }

    // Debris: broad spherical field.
    let n_debris = count(40.0, 80.0, vel, df);
    for _ in 0..n_debris {
        let dir = sphere_dir(rng);
        let v = dir * rng.range(80.0, 300.0);
        let size_proxy = rng.next_f32();
        let shape = if size_proxy < 0.33 {
            Shape::Circle
        } else if size_proxy < 0.66 {
            Shape::Triangle
        } else {
            Shape::Square
        };
        let p = Particle::new(
            tr.origin(),
            v.truncate(),
            rng.range(1.2, 2.0) * (0.8 + 0.2 * df),
            1.0 + size_proxy * 3.0,
            color,
            shape,
        )
        .with_depth(0.0, v.z)
        .with_acc(Vec2::new(0.0, 220.0))
        .with_spin(rng.signed(5.0));
        pool.spawn(p);
    }
}

/// Small acknowledgment burst at the floor when a key is pressed with
/// explosions turned off.
pub fn puff(x: f32, y: f32, color: Rgba, rng: &mut RandomStream, pool: &mut ParticlePool) {
    for _ in 0..PUFF_COUNT {
        let v = Vec2::new(rng.signed(60.0), -rng.range(40.0, 140.0));
        let p = Particle::new(
            Vec2::new(x, y),
            v,
            PUFF_LIFE_SEC,
            rng.range(1.5, 3.0),
            color.with_alpha(0.8),
            Shape::Circle,
        );
        pool.spawn(p);
    }
}
