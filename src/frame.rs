use crate::core::Scene;
use crate::render::CanvasSurface;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub scene: Scene,
    pub surface: CanvasSurface,
    pub canvas: web::HtmlCanvasElement,
    pub epoch: Instant,
    pub running: bool,
    /// Bumped on every `start_loop`, so a stale callback chain stops itself.
    pub generation: u32,
}

impl FrameContext {
    /// Milliseconds since the renderer was created. All scene timestamps use
    /// this clock.
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    pub fn frame(&mut self) {
        let now = self.now_ms();
        self.scene.frame(now, &mut self.surface);
    }
}

/// Drive `frame_ctx` from `requestAnimationFrame` until `running` is cleared.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let generation = {
        let mut ctx = frame_ctx.borrow_mut();
        ctx.running = true;
        ctx.generation = ctx.generation.wrapping_add(1);
        ctx.generation
    };
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let keep_going = {
            let mut ctx = frame_ctx_tick.borrow_mut();
            let live = ctx.running && ctx.generation == generation;
            if live {
                ctx.frame();
            }
            live
        };
        if !keep_going {
            log::debug!("[frame] loop {} stopped", generation);
            // Break the self-reference so the closure and its context are freed.
            let _ = tick_clone.borrow_mut().take();
            return;
        }
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
