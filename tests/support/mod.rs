// Shared harness for host-side tests.
// The main crate is wasm-only, so the pure simulation modules are included
// directly and keep their `super::` paths.

#![allow(dead_code)]

pub mod core {
    pub mod color {
        include!("../../src/core/color.rs");
    }
    pub mod compositor {
        include!("../../src/core/compositor.rs");
    }
    pub mod constants {
        include!("../../src/core/constants.rs");
    }
    pub mod explosions {
        include!("../../src/core/explosions.rs");
    }
    pub mod falling {
        include!("../../src/core/falling.rs");
    }
    pub mod lanes {
        include!("../../src/core/lanes.rs");
    }
    pub mod particles {
        include!("../../src/core/particles.rs");
    }
    pub mod rng {
        include!("../../src/core/rng.rs");
    }
    pub mod scene {
        include!("../../src/core/scene.rs");
    }
}

use self::core::color::Rgba;
use self::core::compositor::{Blend, Paint, Surface};
use glam::Vec2;

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Blend(Blend),
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        paint: Paint,
    },
    Line {
        from: Vec2,
        to: Vec2,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Ring {
        center: Vec2,
        radius: f32,
    },
    Polygon {
        points: Vec<Vec2>,
    },
}

/// Surface that records every call instead of drawing.
#[derive(Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn rects(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter().filter(|op| matches!(op, Op::Rect { .. }))
    }

    pub fn shapes(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Circle { .. } | Op::Ring { .. } | Op::Polygon { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn set_blend(&mut self, blend: Blend) {
        self.ops.push(Op::Blend(blend));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        self.ops.push(Op::Rect { x, y, w, h, paint });
    }

    fn line(&mut self, from: Vec2, to: Vec2, _width: f32, _color: Rgba) {
        self.ops.push(Op::Line { from, to });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ops.push(Op::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, _width: f32, _color: Rgba) {
        self.ops.push(Op::Ring { center, radius });
    }

    fn fill_polygon(&mut self, points: &[Vec2], _color: Rgba) {
        self.ops.push(Op::Polygon {
            points: points.to_vec(),
        });
    }
}
