use super::color::Rgba;
use super::constants::*;
use super::explosions::{duration_factor, Trigger};
use super::lanes::Lane;

/// Lifecycle of one falling-note bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotePhase {
    Falling,
    LandedHeld,
    LandedDecaying,
    Removed,
}

/// Per-tick parameters shared by all notes, derived from the latest tempo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    pub gravity: f32,
    pub wind: f32,
    pub floor_y: f32,
}

impl Physics {
    pub fn new(bpm: f32, now_ms: f64, floor_y: f32) -> Self {
        Self {
            gravity: gravity_for_bpm(bpm),
            wind: wind_at(bpm, now_ms),
            floor_y,
        }
    }
}

#[inline]
pub fn gravity_for_bpm(bpm: f32) -> f32 {
    GRAVITY_BASE + (bpm.max(0.0) * GRAVITY_BPM_COEFF).min(GRAVITY_BPM_MAX)
}

#[inline]
pub fn wind_at(bpm: f32, now_ms: f64) -> f32 {
    (now_ms / WIND_PERIOD_MS).sin() as f32 * (bpm * WIND_BPM_COEFF)
}

/// Base bar height for a velocity: 22 px plus up to 36 px.
#[inline]
pub fn base_height(velocity: f32) -> f32 {
    NOTE_BASE_HEIGHT_PX + NOTE_VELOCITY_HEIGHT_PX * velocity.clamp(0.0, 1.0)
}

/// Knobs for the landed phases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandingOptions {
    /// Keep elongating while the note is held on the floor.
    pub grow_while_landed: bool,
    /// Seconds over which the idle shimmer fades out after release; 0 stops it
    /// on release.
    pub shimmer_release_fade_sec: f32,
}

impl Default for LandingOptions {
    fn default() -> Self {
        Self {
            grow_while_landed: true,
            shimmer_release_fade_sec: 0.15,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FallingNote {
    pub note: i32,
    pub velocity: f32,
    pub lane_x: f32,
    pub x: f32,
    pub w: f32,
    pub y: f32,
    pub vy: f32,
    /// Drawn height including shimmer.
    pub h: f32,
    /// Smoothed body height that approaches `max_h`.
    pub body_h: f32,
    pub base_h: f32,
    pub max_h: f32,
    pub color: Rgba,
    pub on_ms: f64,
    pub off_ms: Option<f64>,
    pub alpha: f32,
    pub phase: NotePhase,
}

impl FallingNote {
    /// New bar entering just above the visible area.
    pub fn new(note: i32, velocity: f32, lane: Lane, color: Rgba, now_ms: f64) -> Self {
        let velocity = velocity.clamp(0.0, 1.0);
        let h = base_height(velocity);
        Self {
            note,
            velocity,
            lane_x: lane.x,
            x: lane.x,
            w: lane.w,
            y: -h,
            vy: NOTE_LAUNCH_VY_BASE + NOTE_LAUNCH_VY_VELOCITY * velocity,
            h,
            body_h: h,
            base_h: h,
            max_h: h,
            color,
            on_ms: now_ms,
            off_ms: None,
            alpha: 1.0,
            phase: NotePhase::Falling,
        }
    }

    #[inline]
    pub fn landed(&self) -> bool {
        matches!(self.phase, NotePhase::LandedHeld | NotePhase::LandedDecaying)
    }

    #[inline]
    pub fn released(&self) -> bool {
        self.off_ms.is_some()
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.phase == NotePhase::Removed
    }

    /// Held duration in ms as of `now_ms` (frozen at release).
    #[inline]
    pub fn held_ms(&self, now_ms: f64) -> f64 {
        (self.off_ms.unwrap_or(now_ms) - self.on_ms).max(0.0)
    }

    /// Mark released. A falling note keeps falling; a held landed note starts
    /// decaying. Repeated releases keep the first timestamp.
    pub fn release(&mut self, now_ms: f64) {
        if self.off_ms.is_some() || self.is_removed() {
            return;
        }
        self.off_ms = Some(now_ms);
        if self.phase == NotePhase::LandedHeld {
            self.phase = NotePhase::LandedDecaying;
        }
    }

    /// Advance one tick. Returns the landing trigger on the tick the bar hits
    /// the floor.
    pub fn step(
        &mut self,
        dt: f32,
        now_ms: f64,
        physics: &Physics,
        opts: &LandingOptions,
    ) -> Option<Trigger> {
        match self.phase {
            NotePhase::Falling => self.step_falling(dt, now_ms, physics),
            NotePhase::LandedHeld => {
                if opts.grow_while_landed {
                    self.update_max_h(now_ms);
                }
                self.approach_max_h(dt);
                self.apply_shimmer(now_ms, 1.0);
                self.anchor(physics.floor_y);
                None
            }
            NotePhase::LandedDecaying => {
                self.alpha = (self.alpha - DECAY_ALPHA_PER_SEC * dt).max(0.0);
                self.body_h = (self.body_h - DECAY_HEIGHT_PX_PER_SEC * dt).max(0.0);
                let amp = self.release_shimmer_gain(now_ms, opts.shimmer_release_fade_sec);
                self.apply_shimmer(now_ms, amp);
                self.anchor(physics.floor_y);
                if self.alpha <= 0.0 || self.body_h < NOTE_MIN_HEIGHT_PX {
                    self.phase = NotePhase::Removed;
                }
                None
            }
            NotePhase::Removed => None,
        }
    }

    fn step_falling(&mut self, dt: f32, now_ms: f64, physics: &Physics) -> Option<Trigger> {
        self.vy += physics.gravity * dt;
        self.vy *= (1.0 - AIR_DRAG * dt * AIR_DRAG_SCALE).max(0.0);
        self.y += self.vy * dt;
        self.x += physics.wind * dt * WIND_DRIFT_SCALE;

        if !self.released() {
            self.update_max_h(now_ms);
        }
        self.approach_max_h(dt);
        self.h = self.body_h;

        if self.y + self.h >= physics.floor_y {
            self.y = physics.floor_y - self.h;
            self.vy = 0.0;
            self.phase = if self.released() {
                NotePhase::LandedDecaying
            } else {
                NotePhase::LandedHeld
            };
            return Some(Trigger {
                x: self.lane_x,
                y: physics.floor_y,
                note: self.note,
                velocity: self.velocity,
                held_ms: self.held_ms(now_ms),
            });
        }
        None
    }

    #[inline]
    fn update_max_h(&mut self, now_ms: f64) {
        self.max_h = self.base_h * duration_factor(self.held_ms(now_ms));
    }

    #[inline]
    fn approach_max_h(&mut self, dt: f32) {
        let step = NOTE_GROW_PX_PER_SEC * dt;
        if self.body_h < self.max_h {
            self.body_h = (self.body_h + step).min(self.max_h);
        }
    }

    fn release_shimmer_gain(&self, now_ms: f64, fade_sec: f32) -> f32 {
        let Some(off) = self.off_ms else {
            return 1.0;
        };
        if fade_sec <= 0.0 {
            return 0.0;
        }
        let since = ((now_ms - off) / 1000.0).max(0.0) as f32;
        (1.0 - since / fade_sec).clamp(0.0, 1.0)
    }

    #[inline]
    fn apply_shimmer(&mut self, now_ms: f64, gain: f32) {
        let phase =
            (now_ms / 1000.0) as f32 * SHIMMER_HZ * std::f32::consts::TAU + self.note as f32;
        self.h = (self.body_h * (1.0 + SHIMMER_AMPLITUDE * gain * phase.sin())).max(0.0);
    }

    #[inline]
    fn anchor(&mut self, floor_y: f32) {
        self.y = floor_y - self.h;
        self.vy = 0.0;
    }
}
