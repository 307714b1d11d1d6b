use super::color::Theme;
use super::compositor::{self, DrawOptions, Surface};
use super::constants::*;
use super::explosions::{self, ExplosionKind, Trigger};
use super::falling::{FallingNote, LandingOptions, Physics};
use super::lanes::{note_in_range, KeyRect, LaneMap};
use super::particles::ParticlePool;
use super::rng::RandomStream;

/// Runtime configuration. Changes take effect on the next tick.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererConfig {
    pub budget: usize,
    pub bloom: bool,
    pub trails: bool,
    pub explosions: bool,
    pub explosion: ExplosionKind,
    pub max_frame_dt_sec: f32,
    pub landing: LandingOptions,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_PARTICLE_BUDGET,
            bloom: true,
            trails: true,
            explosions: true,
            explosion: ExplosionKind::default(),
            max_frame_dt_sec: MAX_FRAME_DT_SEC,
            landing: LandingOptions::default(),
        }
    }
}

/// Turns wall-clock timestamps into clamped per-tick deltas.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt_sec: f32,
}

impl FrameClock {
    pub fn new(max_dt_sec: f32) -> Self {
        Self {
            last_ms: None,
            max_dt_sec: max_dt_sec.max(0.0),
        }
    }

    pub fn set_max_dt(&mut self, max_dt_sec: f32) {
        self.max_dt_sec = max_dt_sec.max(0.0);
    }

    /// Seconds since the previous call, clamped to `[0, max_dt]`. The first
    /// call returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt_sec)
        } else {
            0.0
        }
    }
}

/// One owned render context: lanes, notes, particles and settings.
#[derive(Clone, Debug)]
pub struct Scene {
    lanes: LaneMap,
    key_geometry: Option<(Vec<(i32, KeyRect)>, KeyRect)>,
    notes: Vec<FallingNote>,
    particles: ParticlePool,
    config: RendererConfig,
    theme: Theme,
    bpm: f32,
    entropy: u32,
    clock: FrameClock,
    hard_clear: bool,
}

impl Scene {
    pub fn new(width: f32, height: f32, config: RendererConfig, entropy: u32) -> Self {
        Self {
            lanes: LaneMap::new(width, height),
            key_geometry: None,
            notes: Vec::new(),
            particles: ParticlePool::new(config.budget),
            clock: FrameClock::new(config.max_frame_dt_sec),
            config,
            theme: Theme::default(),
            bpm: BPM_DEFAULT,
            entropy,
            hard_clear: true,
        }
    }

    pub fn lanes(&self) -> &LaneMap {
        &self.lanes
    }

    pub fn notes(&self) -> &[FallingNote] {
        &self.notes
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn needs_hard_clear(&self) -> bool {
        self.hard_clear
    }

    /// Start a bar for `note`. Notes without a lane are ignored.
    pub fn note_on(&mut self, note: i32, velocity: f32, now_ms: f64) {
        let Some(lane) = self.lanes.lane(note) else {
            return;
        };
        let velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let color = self.theme.note_color(note, velocity, self.bpm);
        self.notes
            .push(FallingNote::new(note, velocity, lane, color, now_ms));

        if !self.config.explosions {
            let mut rng = RandomStream::for_trigger(note, velocity, self.entropy);
            explosions::puff(
                lane.x,
                self.lanes.floor_y(),
                color,
                &mut rng,
                &mut self.particles,
            );
        }
    }

    /// Release every held instance of `note`.
    pub fn note_off(&mut self, note: i32, now_ms: f64) {
        if !note_in_range(note) {
            return;
        }
        for n in self
            .notes
            .iter_mut()
            .filter(|n| n.note == note && !n.released())
        {
            n.release(now_ms);
        }
    }

    pub fn set_tempo(&mut self, bpm: f32) {
        if bpm.is_finite() {
            self.bpm = bpm.clamp(BPM_MIN, BPM_MAX);
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        log::info!(
            "[scene] theme hsl({:.0},{:.0}%,{:.0}%)",
            theme.hue,
            theme.saturation,
            theme.lightness
        );
        self.theme = theme;
        self.hard_clear = true;
    }

    pub fn set_budget(&mut self, budget: usize) {
        log::info!("[particles] budget={}", budget);
        self.config.budget = budget;
        self.particles.set_budget(budget);
    }

    pub fn set_bloom_enabled(&mut self, on: bool) {
        self.config.bloom = on;
    }

    pub fn set_trails_enabled(&mut self, on: bool) {
        self.config.trails = on;
    }

    pub fn set_explosions_enabled(&mut self, on: bool) {
        self.config.explosions = on;
    }

    pub fn set_explosion_algorithm(&mut self, kind: ExplosionKind) {
        log::info!("[scene] explosion algorithm={}", kind);
        self.config.explosion = kind;
    }

    pub fn set_grow_while_landed(&mut self, on: bool) {
        self.config.landing.grow_while_landed = on;
    }

    /// Seconds for the shimmer to fade after release; 0 stops it at release.
    pub fn set_shimmer_release_fade(&mut self, sec: f32) {
        if sec.is_finite() {
            self.config.landing.shimmer_release_fade_sec = sec.max(0.0);
        }
    }

    pub fn set_max_frame_dt(&mut self, max_dt_sec: f32) {
        if !max_dt_sec.is_finite() {
            return;
        }
        self.config.max_frame_dt_sec = max_dt_sec.max(0.0);
        self.clock.set_max_dt(max_dt_sec);
    }

    /// Install real key geometry. An empty list reverts to the provisional
    /// layout.
    pub fn set_key_geometry(&mut self, rects: Vec<(i32, KeyRect)>, view: KeyRect) {
        let (w, h) = self.lanes.size();
        self.lanes
            .layout_from_key_rects(rects.iter().map(|(n, r)| (*n, r)), view, w, h);
        self.key_geometry = if rects.is_empty() {
            None
        } else {
            Some((rects, view))
        };
        self.hard_clear = true;
    }

    /// New surface size. Known key geometry is rescaled, otherwise the lanes
    /// are re-provisioned.
    pub fn resize(&mut self, width: f32, height: f32) {
        match &self.key_geometry {
            Some((rects, view)) => {
                self.lanes
                    .layout_from_key_rects(rects.iter().map(|(n, r)| (*n, r)), *view, width, height)
            }
            None => self.lanes.layout_provisional(width, height),
        }
        self.hard_clear = true;
    }

    /// Drop every note and particle.
    pub fn clear(&mut self) {
        self.notes.clear();
        self.particles.clear();
        self.hard_clear = true;
    }

    /// Simulate one tick of `dt` seconds ending at `now_ms`.
    pub fn step(&mut self, dt: f32, now_ms: f64) {
        let physics = Physics::new(self.bpm, now_ms, self.lanes.floor_y());
        let landing = self.config.landing;

        let mut triggers: Vec<Trigger> = Vec::new();
        for n in &mut self.notes {
            if let Some(t) = n.step(dt, now_ms, &physics, &landing) {
                triggers.push(t);
            }
        }
        self.notes.retain(|n| !n.is_removed());

        if self.config.explosions {
            for t in &triggers {
                let color = self.theme.note_color(t.note, t.velocity, self.bpm);
                let mut rng = RandomStream::for_trigger(t.note, t.velocity, self.entropy);
                explosions::emit(
                    self.config.explosion,
                    t,
                    color,
                    &mut rng,
                    &mut self.particles,
                );
            }
        }

        let (w, h) = self.lanes.size();
        self.particles.update(dt, w, h);
    }

    /// Draw the current state, consuming any pending hard-clear request.
    pub fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let opts = DrawOptions {
            hard_clear: self.hard_clear,
            trails: self.config.trails,
            bloom: self.config.bloom,
        };
        compositor::draw(
            surface,
            &self.lanes,
            &self.notes,
            &self.particles,
            &self.theme,
            opts,
        );
        self.hard_clear = false;
    }

    /// One full frame: clamped delta, simulate, draw. Returns the delta used.
    pub fn frame<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) -> f32 {
        let dt = self.clock.advance(now_ms);
        self.step(dt, now_ms);
        self.draw(surface);
        dt
    }
}
