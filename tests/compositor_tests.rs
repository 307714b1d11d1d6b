// Host-side tests for the per-frame draw pass, using a recording surface.

#![allow(dead_code)]
mod support;

use glam::Vec2;
use support::core::color::{Rgba, Theme};
use support::core::compositor::*;
use support::core::constants::*;
use support::core::falling::{FallingNote, NotePhase};
use support::core::lanes::{Lane, LaneMap};
use support::core::particles::*;
use support::{Op, RecordingSurface};

const W: f32 = 800.0;
const H: f32 = 600.0;

fn opts(hard_clear: bool, trails: bool, bloom: bool) -> DrawOptions {
    DrawOptions {
        hard_clear,
        trails,
        bloom,
    }
}

fn bar(phase: NotePhase) -> FallingNote {
    let mut n = FallingNote::new(
        60,
        1.0,
        Lane { x: 100.0, w: 10.0 },
        Rgba::new(255, 0, 0, 1.0),
        0.0,
    );
    n.y = 300.0;
    n.phase = phase;
    n
}

fn dot(shape: Shape) -> Particle {
    Particle::new(
        Vec2::new(200.0, 100.0),
        Vec2::ZERO,
        1.0,
        3.0,
        Rgba::new(0, 255, 0, 1.0),
        shape,
    )
}

fn background_alpha(s: &RecordingSurface) -> f32 {
    match s.rects().next() {
        Some(Op::Rect {
            paint: Paint::Solid(c),
            ..
        }) => c.a,
        other => panic!("first rect is not the background: {other:?}"),
    }
}

#[test]
fn hard_clear_is_opaque_and_normal_frames_fade() {
    let lanes = LaneMap::new(W, H);
    let pool = ParticlePool::new(0);
    let theme = Theme::default();

    let mut s = RecordingSurface::default();
    draw(&mut s, &lanes, &[], &pool, &theme, opts(true, true, false));
    assert_eq!(background_alpha(&s), 1.0);

    let mut s = RecordingSurface::default();
    draw(&mut s, &lanes, &[], &pool, &theme, opts(false, true, false));
    assert!((background_alpha(&s) - TRAIL_FADE_ALPHA).abs() < 1e-6);

    let mut s = RecordingSurface::default();
    draw(&mut s, &lanes, &[], &pool, &theme, opts(false, false, false));
    assert!(
        (background_alpha(&s) - TRAIL_FADE_ALPHA).abs() < 1e-6,
        "fade does not depend on the trails flag"
    );
}

#[test]
fn trails_flag_gates_depth_projection() {
    let lanes = LaneMap::new(W, H);
    let mut pool = ParticlePool::new(4);
    pool.spawn(dot(Shape::Circle).with_depth(FOCAL_LENGTH, 0.0));
    let circle_at = |trails| {
        let mut s = RecordingSurface::default();
        draw(&mut s, &lanes, &[], &pool, &Theme::default(), opts(false, trails, false));
        s.ops
            .iter()
            .find_map(|op| match op {
                Op::Circle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .expect("particle circle")
    };

    let (flat, flat_r) = circle_at(false);
    assert_eq!(flat, Vec2::new(200.0, 100.0));
    assert!((flat_r - 3.0).abs() < 1e-5);

    let (projected, projected_r) = circle_at(true);
    assert!((projected - Vec2::new(300.0, 200.0)).length() < 1e-3);
    assert!((projected_r - 1.5).abs() < 1e-5);
}

#[test]
fn guides_cover_every_lane_plus_floor() {
    let lanes = LaneMap::new(W, H);
    let mut s = RecordingSurface::default();
    draw(
        &mut s,
        &lanes,
        &[],
        &ParticlePool::new(0),
        &Theme::default(),
        opts(true, true, false),
    );
    let lines: Vec<&Op> = s
        .ops
        .iter()
        .filter(|op| matches!(op, Op::Line { .. }))
        .collect();
    assert_eq!(lines.len(), NOTE_COUNT + 1);
    match lines.last() {
        Some(Op::Line { from, to }) => {
            assert_eq!(from.y, lanes.floor_y());
            assert_eq!(to.y, lanes.floor_y());
        }
        _ => unreachable!(),
    }
}

#[test]
fn bloom_draws_additive_copy_beneath_bar() {
    let lanes = LaneMap::new(W, H);
    let notes = [bar(NotePhase::Falling)];
    let mut s = RecordingSurface::default();
    draw(
        &mut s,
        &lanes,
        &notes,
        &ParticlePool::new(0),
        &Theme::default(),
        opts(false, true, true),
    );
    let bloom_at = s
        .ops
        .iter()
        .position(|op| *op == Op::Blend(Blend::Additive))
        .expect("bloom pass");
    match (&s.ops[bloom_at + 1], &s.ops[bloom_at + 3]) {
        (Op::Rect { w: bw, .. }, Op::Rect { w, x, paint, .. }) => {
            assert!(bw > w, "bloom is oversized");
            assert_eq!(*x, 95.0);
            assert!(matches!(paint, Paint::Vertical { top, .. } if top.a == 0.0));
        }
        other => panic!("unexpected ops {other:?}"),
    }
}

#[test]
fn held_landed_notes_get_a_highlight_strip() {
    let lanes = LaneMap::new(W, H);
    let draw_rects = |phase| {
        let mut s = RecordingSurface::default();
        draw(
            &mut s,
            &lanes,
            &[bar(phase)],
            &ParticlePool::new(0),
            &Theme::default(),
            opts(false, true, false),
        );
        s.rects().count()
    };
    assert_eq!(draw_rects(NotePhase::LandedHeld), 3);
    assert_eq!(draw_rects(NotePhase::LandedDecaying), 2);
    assert_eq!(draw_rects(NotePhase::Removed), 1);
}

#[test]
fn each_shape_maps_to_its_primitive() {
    let lanes = LaneMap::new(W, H);
    let mut pool = ParticlePool::new(8);
    for shape in [Shape::Circle, Shape::Ring, Shape::Triangle, Shape::Square] {
        pool.spawn(dot(shape));
    }
    let mut s = RecordingSurface::default();
    draw(&mut s, &lanes, &[], &pool, &Theme::default(), opts(false, true, false));
    let tail: Vec<&Op> = s
        .ops
        .iter()
        .filter(|op| matches!(op, Op::Circle { .. } | Op::Ring { .. } | Op::Polygon { .. }))
        .collect();
    assert_eq!(tail.len(), 4);
    assert!(matches!(tail[0], Op::Circle { .. }));
    assert!(matches!(tail[1], Op::Ring { .. }));
    assert!(matches!(tail[2], Op::Polygon { points } if points.len() == 3));
    assert!(matches!(tail[3], Op::Polygon { points } if points.len() == 4));
}

#[test]
fn pending_and_invisible_particles_are_skipped() {
    let lanes = LaneMap::new(W, H);
    let mut pool = ParticlePool::new(8);
    pool.spawn(dot(Shape::Circle).with_delay(0.2));
    pool.spawn(dot(Shape::Circle).with_alpha(0.0));
    let mut s = RecordingSurface::default();
    draw(&mut s, &lanes, &[], &pool, &Theme::default(), opts(false, true, true));
    assert_eq!(s.shapes(), 0);
}

#[test]
fn bloom_adds_a_halo_per_particle() {
    let lanes = LaneMap::new(W, H);
    let mut pool = ParticlePool::new(8);
    pool.spawn(dot(Shape::Triangle));
    let mut s = RecordingSurface::default();
    draw(&mut s, &lanes, &[], &pool, &Theme::default(), opts(false, true, true));
    let halo = s
        .ops
        .iter()
        .find_map(|op| match op {
            Op::Circle { radius, .. } => Some(*radius),
            _ => None,
        })
        .expect("halo circle");
    assert!((halo - 3.0 * HALO_SCALE).abs() < 1e-4);
    assert_eq!(s.ops.last(), Some(&Op::Blend(Blend::Normal)));
}

#[test]
fn depth_projects_toward_center() {
    let near = dot(Shape::Circle).with_depth(-FOCAL_LENGTH * 0.5, 0.0);
    let (pos, scale) = project(&near, W, H);
    assert!((scale - 2.0).abs() < 1e-4);
    assert!((pos.x - (400.0 + (200.0 - 400.0) * 2.0)).abs() < 1e-3);

    let far = dot(Shape::Circle).with_depth(FOCAL_LENGTH, 0.0);
    let (pos, scale) = project(&far, W, H);
    assert!((scale - 0.5).abs() < 1e-4);
    assert!((pos.y - (300.0 + (100.0 - 300.0) * 0.5)).abs() < 1e-3);

    let flat = dot(Shape::Circle);
    assert_eq!(project(&flat, W, H), (Vec2::new(200.0, 100.0), 1.0));
}

#[test]
fn polygon_rotation_moves_vertices() {
    let a = polygon(Vec2::ZERO, 5.0, 3, 0.0);
    let b = polygon(Vec2::ZERO, 5.0, 3, 0.7);
    assert_eq!(a.len(), 3);
    assert!((a[0] - Vec2::new(0.0, -5.0)).length() < 1e-4);
    assert!((a[0] - b[0]).length() > 1.0);
    for p in &b {
        assert!((p.length() - 5.0).abs() < 1e-4);
    }
}
