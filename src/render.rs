use crate::core::{Blend, Paint, Rgba, Surface};
use glam::Vec2;
use std::f64::consts::TAU;
use web_sys as web;

/// `Surface` backed by a Canvas 2D context.
pub struct CanvasSurface {
    ctx: web::CanvasRenderingContext2d,
    blend: Blend,
}

impl CanvasSurface {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            blend: Blend::Normal,
        }
    }

    fn fill_css(&self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
    }
}

impl Surface for CanvasSurface {
    fn set_blend(&mut self, blend: Blend) {
        if blend == self.blend {
            return;
        }
        let op = match blend {
            Blend::Normal => "source-over",
            Blend::Additive => "lighter",
        };
        _ = self.ctx.set_global_composite_operation(op);
        self.blend = blend;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        match paint {
            Paint::Solid(c) => self.fill_css(c),
            Paint::Vertical { top, bottom } => {
                let g = self
                    .ctx
                    .create_linear_gradient(x as f64, y as f64, x as f64, (y + h) as f64);
                _ = g.add_color_stop(0.0, &top.to_css());
                _ = g.add_color_stop(1.0, &bottom.to_css());
                self.ctx.set_fill_style_canvas_gradient(&g);
            }
        }
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.fill_css(color);
        self.ctx.begin_path();
        _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width.max(0.1) as f64);
        self.ctx.begin_path();
        _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.fill_css(color);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }
}
