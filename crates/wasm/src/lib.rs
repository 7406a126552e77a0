#![deny(unsafe_code)]
//! Browser bindings for the particle field.
//!
//! [`ParticleCanvas`] owns a [`ParticleField`] inside a [`FrameLoop`] and
//! repaints a `<canvas>` on every animation frame through `putImageData`.
//! The page forwards pointer moves and title hover changes; `stop()` (or
//! freeing the object) cancels the pending frame.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use hero_field_core::{Engine, FrameLoop, FrameSubscription, PointerState};
use hero_field_engines::pixel::surface_to_rgba;
use hero_field_particles::{ParticleField, ParticleParams};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, Window};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A chain of `requestAnimationFrame` callbacks.
///
/// The callback re-requests itself each frame; cancelling revokes the
/// pending request and drops the callback, which breaks the chain.
struct AnimationFrames {
    window: Window,
    handle: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl AnimationFrames {
    fn request(window: &Window, callback: &FrameCallback, handle: &Cell<Option<i32>>) {
        let slot = callback.borrow();
        let Some(cb) = slot.as_ref() else {
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => handle.set(Some(id)),
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
    }
}

impl FrameSubscription for AnimationFrames {
    fn cancel(&mut self) {
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

struct Inner {
    frames: FrameLoop<ParticleField, AnimationFrames>,
    pointer: PointerState,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Inner {
    fn paint(&self) -> Result<(), JsValue> {
        let surface = self.frames.engine().surface();
        if surface.is_empty() {
            return Ok(());
        }
        let bytes = surface_to_rgba(surface);
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(bytes.as_slice()),
            surface.width() as u32,
            surface.height() as u32,
        )?;
        self.ctx.put_image_data(&image, 0.0, 0.0)
    }
}

/// Particle field bound to an HTML canvas.
#[wasm_bindgen]
pub struct ParticleCanvas {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl ParticleCanvas {
    /// Spawns `count` particles sized to the canvas' current pixel size.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, count: usize, seed: u32) -> Result<ParticleCanvas, JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| js_sys::Error::new("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| js_sys::Error::new("2d context has an unexpected type"))?;
        let (width, height) = (canvas.width() as usize, canvas.height() as usize);
        let field = ParticleField::new(width, height, count, u64::from(seed), ParticleParams::default())
            .map_err(|e| js_sys::Error::new(&e.to_string()))?;
        let pointer = field.pointer();
        log::info!("particle canvas {width}x{height} with {count} particles");

        Ok(ParticleCanvas {
            inner: Rc::new(RefCell::new(Inner {
                frames: FrameLoop::new(field),
                pointer,
                canvas,
                ctx,
            })),
        })
    }

    /// Starts (or restarts) the animation on the display refresh.
    pub fn start(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_sys::Error::new("no window"))?;
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        let (win, cb, h) = (window.clone(), callback.clone(), handle.clone());
        *callback.borrow_mut() = Some(Closure::new(move || {
            h.set(None);
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut inner = inner.borrow_mut();
            if !inner.frames.tick() {
                return;
            }
            if let Err(e) = inner.paint() {
                log::error!("paint failed: {e:?}");
            }
            AnimationFrames::request(&win, &cb, &h);
        }));

        AnimationFrames::request(&window, &callback, &handle);
        self.inner.borrow_mut().frames.start(AnimationFrames {
            window,
            handle,
            callback,
        });
        Ok(())
    }

    /// Cancels the pending frame. Safe to call repeatedly.
    pub fn stop(&self) {
        self.inner.borrow_mut().frames.stop();
    }

    /// Whether an animation frame is scheduled.
    pub fn is_running(&self) -> bool {
        self.inner.borrow().frames.is_running()
    }

    /// Pointer position in canvas pixels.
    pub fn set_pointer(&self, x: f64, y: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.pointer.x = x;
        inner.pointer.y = y;
        let pointer = inner.pointer;
        inner.frames.set_pointer(pointer);
    }

    /// Whether the pointer is over the hero title.
    pub fn set_hovering(&self, hovering: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.pointer.hovering = hovering;
        let pointer = inner.pointer;
        inner.frames.set_pointer(pointer);
    }

    /// Resizes the canvas backing store and the field.
    pub fn resize(&self, width: u32, height: u32) {
        let mut inner = self.inner.borrow_mut();
        inner.canvas.set_width(width);
        inner.canvas.set_height(height);
        inner.frames.resize(width as usize, height as usize);
    }

    /// Frames stepped since creation.
    pub fn frame_count(&self) -> f64 {
        self.inner.borrow().frames.frames() as f64
    }
}
