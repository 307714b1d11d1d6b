#![cfg(target_arch = "wasm32")]
use crate::core::{ExplosionKind, KeyRect, RendererConfig, Scene, Theme};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod core;
mod dom;
mod frame;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("keyfall starting");
    Ok(())
}

fn to_js(e: anyhow::Error) -> JsValue {
    js_sys::Error::new(&format!("{:#}", e)).into()
}

/// Falling-note renderer bound to one canvas.
///
/// Every method takes effect on the next animation frame.
#[wasm_bindgen]
pub struct NoteRenderer {
    ctx: Rc<RefCell<frame::FrameContext>>,
}

impl NoteRenderer {
    fn build(canvas: web::HtmlCanvasElement) -> anyhow::Result<NoteRenderer> {
        let (w, h) = dom::sync_canvas_backing_size(&canvas);
        let surface = render::CanvasSurface::new(dom::context_2d(&canvas)?);
        let entropy = rand::random::<u32>();
        let scene = Scene::new(w as f32, h as f32, RendererConfig::default(), entropy);
        log::info!("[web] renderer {}x{} entropy={:08x}", w, h, entropy);

        let ctx = Rc::new(RefCell::new(frame::FrameContext {
            scene,
            surface,
            canvas: canvas.clone(),
            epoch: Instant::now(),
            running: false,
            generation: 0,
        }));

        let ctx_resize = ctx.clone();
        dom::on_window_resize(&canvas, move |w, h| {
            ctx_resize.borrow_mut().scene.resize(w as f32, h as f32);
        });

        frame::start_loop(ctx.clone());
        Ok(NoteRenderer { ctx })
    }
}

#[wasm_bindgen]
impl NoteRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: web::HtmlCanvasElement) -> Result<NoteRenderer, JsValue> {
        Self::build(canvas).map_err(to_js)
    }

    #[wasm_bindgen(js_name = noteOn)]
    pub fn note_on(&self, note: i32, velocity: f32) {
        let mut ctx = self.ctx.borrow_mut();
        let now = ctx.now_ms();
        ctx.scene.note_on(note, velocity, now);
    }

    #[wasm_bindgen(js_name = noteOff)]
    pub fn note_off(&self, note: i32) {
        let mut ctx = self.ctx.borrow_mut();
        let now = ctx.now_ms();
        ctx.scene.note_off(note, now);
    }

    #[wasm_bindgen(js_name = setTempo)]
    pub fn set_tempo(&self, bpm: f32) {
        self.ctx.borrow_mut().scene.set_tempo(bpm);
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, hue: f32, saturation: f32, lightness: f32) {
        self.ctx
            .borrow_mut()
            .scene
            .set_theme(Theme::new(hue, saturation, lightness));
    }

    #[wasm_bindgen(js_name = setThemeNamed)]
    pub fn set_theme_named(&self, name: &str) -> Result<(), JsValue> {
        let theme: Theme = name.parse().map_err(to_js)?;
        self.ctx.borrow_mut().scene.set_theme(theme);
        Ok(())
    }

    #[wasm_bindgen(js_name = setBudget)]
    pub fn set_budget(&self, n: u32) {
        self.ctx.borrow_mut().scene.set_budget(n as usize);
    }

    #[wasm_bindgen(js_name = setBloomEnabled)]
    pub fn set_bloom_enabled(&self, on: bool) {
        self.ctx.borrow_mut().scene.set_bloom_enabled(on);
    }

    #[wasm_bindgen(js_name = setTrailsEnabled)]
    pub fn set_trails_enabled(&self, on: bool) {
        self.ctx.borrow_mut().scene.set_trails_enabled(on);
    }

    #[wasm_bindgen(js_name = setExplosionsEnabled)]
    pub fn set_explosions_enabled(&self, on: bool) {
        self.ctx.borrow_mut().scene.set_explosions_enabled(on);
    }

    #[wasm_bindgen(js_name = setExplosionAlgorithm)]
    pub fn set_explosion_algorithm(&self, name: &str) -> Result<(), JsValue> {
        let kind: ExplosionKind = name.parse().map_err(|e: anyhow::Error| {
            log::warn!("[web] {}", e);
            to_js(e)
        })?;
        self.ctx.borrow_mut().scene.set_explosion_algorithm(kind);
        Ok(())
    }

    /// Keep elongating held notes after they land.
    #[wasm_bindgen(js_name = setGrowWhileLanded)]
    pub fn set_grow_while_landed(&self, on: bool) {
        self.ctx.borrow_mut().scene.set_grow_while_landed(on);
    }

    #[wasm_bindgen(js_name = setShimmerReleaseFade)]
    pub fn set_shimmer_release_fade(&self, seconds: f32) {
        self.ctx.borrow_mut().scene.set_shimmer_release_fade(seconds);
    }

    #[wasm_bindgen(js_name = setMaxFrameDt)]
    pub fn set_max_frame_dt(&self, seconds: f32) {
        self.ctx.borrow_mut().scene.set_max_frame_dt(seconds);
    }

    /// `rects` holds `[left, top, width, height]` per entry of `notes`, in the
    /// same coordinate space as the view rectangle.
    #[wasm_bindgen(js_name = setKeyGeometry)]
    pub fn set_key_geometry(
        &self,
        notes: &[u8],
        rects: &[f32],
        view_left: f32,
        view_top: f32,
        view_width: f32,
        view_height: f32,
    ) {
        let pairs: Vec<(i32, KeyRect)> = notes
            .iter()
            .zip(rects.chunks_exact(4))
            .map(|(n, r)| {
                (
                    *n as i32,
                    KeyRect {
                        left: r[0],
                        top: r[1],
                        width: r[2],
                        height: r[3],
                    },
                )
            })
            .collect();
        if pairs.len() != notes.len() {
            log::warn!(
                "[web] key geometry: {} notes but {} rects",
                notes.len(),
                rects.len() / 4
            );
        }
        let view = KeyRect {
            left: view_left,
            top: view_top,
            width: view_width,
            height: view_height,
        };
        self.ctx.borrow_mut().scene.set_key_geometry(pairs, view);
    }

    pub fn resize(&self, width: u32, height: u32) {
        let mut ctx = self.ctx.borrow_mut();
        ctx.canvas.set_width(width.max(1));
        ctx.canvas.set_height(height.max(1));
        ctx.scene.resize(width as f32, height as f32);
    }

    pub fn clear(&self) {
        self.ctx.borrow_mut().scene.clear();
    }

    /// Resume the frame loop after `stop`.
    pub fn run(&self) {
        if !self.ctx.borrow().running {
            frame::start_loop(self.ctx.clone());
        }
    }

    pub fn stop(&self) {
        self.ctx.borrow_mut().running = false;
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.ctx.borrow().scene.particles().len() as u32
    }

    #[wasm_bindgen(getter, js_name = activeNotes)]
    pub fn active_notes(&self) -> u32 {
        self.ctx.borrow().scene.notes().len() as u32
    }
}
