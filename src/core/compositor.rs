use glam::Vec2;
use smallvec::SmallVec;

use super::color::{Rgba, Theme};
use super::constants::*;
use super::falling::{FallingNote, NotePhase};
use super::lanes::LaneMap;
use super::particles::{Effect, Particle, ParticlePool, Shape};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    Normal,
    Additive,
}

/// Fill used by `Surface::fill_rect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Linear gradient from `top` at y to `bottom` at y + h.
    Vertical { top: Rgba, bottom: Rgba },
}

/// The 2D drawing operations the compositor needs.
///
/// Implementations must not keep transforms between calls; every call is in
/// surface pixel coordinates.
pub trait Surface {
    fn set_blend(&mut self, blend: Blend);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);
}

/// Per-frame draw options. `trails` turns on the perspective pass for depth
/// particles; the background fade is driven by `hard_clear` alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawOptions {
    pub hard_clear: bool,
    pub trails: bool,
    pub bloom: bool,
}

/// Perspective-project a depth-using particle toward the surface center.
///
/// Returns the screen position and the scale applied to its size.
#[inline]
pub fn project(p: &Particle, width: f32, height: f32) -> (Vec2, f32) {
    let pos = p.pos.truncate();
    if !p.depth {
        return (pos, 1.0);
    }
    let scale = FOCAL_LENGTH / (FOCAL_LENGTH + p.pos.z).max(1.0);
    let center = Vec2::new(width * 0.5, height * 0.5);
    (center + (pos - center) * scale, scale)
}

/// Draw one frame. Reads simulation state only.
pub fn draw<S: Surface + ?Sized>(
    surface: &mut S,
    lanes: &LaneMap,
    notes: &[FallingNote],
    particles: &ParticlePool,
    theme: &Theme,
    opts: DrawOptions,
) {
    let (width, height) = lanes.size();
    draw_background(surface, theme, width, height, opts);
    draw_guides(surface, lanes, theme, height);
    for n in notes.iter().filter(|n| !n.is_removed()) {
        draw_note(surface, n, lanes.floor_y(), opts.bloom);
    }
    for p in particles.iter().filter(|p| !p.is_pending()) {
        draw_particle(surface, p, width, height, opts);
    }
    surface.set_blend(Blend::Normal);
}

fn draw_background<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    width: f32,
    height: f32,
    opts: DrawOptions,
) {
    surface.set_blend(Blend::Normal);
    let bg = theme.background();
    let alpha = if opts.hard_clear {
        1.0
    } else {
        TRAIL_FADE_ALPHA
    };
    surface.fill_rect(0.0, 0.0, width, height, Paint::Solid(bg.with_alpha(alpha)));
}

fn draw_guides<S: Surface + ?Sized>(surface: &mut S, lanes: &LaneMap, theme: &Theme, height: f32) {
    let guide = theme.guide();
    let floor_y = lanes.floor_y();
    for (note, lane) in lanes.iter() {
        let alpha = if note % 12 == 0 {
            LANE_GUIDE_OCTAVE_ALPHA
        } else {
            LANE_GUIDE_ALPHA
        };
        surface.line(
            Vec2::new(lane.x, 0.0),
            Vec2::new(lane.x, floor_y.min(height)),
            1.0,
            guide.with_alpha(alpha),
        );
    }
    let (width, _) = lanes.size();
    surface.line(
        Vec2::new(0.0, floor_y),
        Vec2::new(width, floor_y),
        1.0,
        guide.with_alpha(FLOOR_LINE_ALPHA),
    );
}

fn draw_note<S: Surface + ?Sized>(surface: &mut S, n: &FallingNote, floor_y: f32, bloom: bool) {
    if n.h <= 0.0 || n.alpha <= 0.0 {
        return;
    }
    let left = n.x - n.w * 0.5;
    let color = n.color.fade(n.alpha);
    if bloom {
        surface.set_blend(Blend::Additive);
        surface.fill_rect(
            left - BLOOM_PAD_PX,
            n.y - BLOOM_PAD_PX,
            n.w + 2.0 * BLOOM_PAD_PX,
            n.h + 2.0 * BLOOM_PAD_PX,
            Paint::Vertical {
                top: Rgba::TRANSPARENT,
                bottom: color.fade(BLOOM_ALPHA),
            },
        );
        surface.set_blend(Blend::Normal);
    }
    surface.fill_rect(
        left,
        n.y,
        n.w,
        n.h,
        Paint::Vertical {
            top: color.with_alpha(0.0),
            bottom: color,
        },
    );
    if n.phase == NotePhase::LandedHeld {
        surface.fill_rect(
            left,
            floor_y - HELD_STRIP_HEIGHT_PX,
            n.w,
            HELD_STRIP_HEIGHT_PX,
            Paint::Solid(color.fade(0.9)),
        );
    }
}

fn draw_particle<S: Surface + ?Sized>(
    surface: &mut S,
    p: &Particle,
    width: f32,
    height: f32,
    opts: DrawOptions,
) {
    let (pos, scale) = if opts.trails {
        project(p, width, height)
    } else {
        (p.pos.truncate(), 1.0)
    };
    let alpha = p.alpha();
    if alpha <= 0.0 {
        return;
    }
    let size = (p.size * scale).max(0.1);
    let color = p.color.with_alpha(alpha);

    let glow = matches!(p.effect, Effect::Glow { .. });
    if opts.bloom || glow {
        surface.set_blend(Blend::Additive);
        surface.fill_circle(pos, size * HALO_SCALE, color.fade(HALO_ALPHA));
        surface.set_blend(Blend::Normal);
    }

    match p.shape {
        Shape::Circle => surface.fill_circle(pos, size, color),
        Shape::Ring => surface.stroke_circle(pos, size, RING_LINE_WIDTH_PX * scale, color),
        Shape::Triangle => surface.fill_polygon(&polygon(pos, size, 3, p.rotation()), color),
        Shape::Square => surface.fill_polygon(
            &polygon(pos, size, 4, p.rotation() + std::f32::consts::FRAC_PI_4),
            color,
        ),
    }
}

/// Regular polygon vertices around `center`.
pub fn polygon(center: Vec2, radius: f32, sides: usize, rotation: f32) -> SmallVec<[Vec2; 4]> {
    (0..sides)
        .map(|i| {
            let a = rotation - std::f32::consts::FRAC_PI_2
                + i as f32 / sides as f32 * std::f32::consts::TAU;
            center + Vec2::new(a.cos(), a.sin()) * radius
        })
        .collect()
}
