//! [`Platform`] over the browser `window`.
//!
//! Callbacks hold only a `Weak` reference to the driver slot, so a dropped
//! backdrop cannot be reached from a late event, and every callback uses
//! `try_borrow_mut` so a re-entrant event is skipped rather than panicking.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use backdrop_core::driver::{Driver, FrameRequest, Listener, ListenerKind, Platform};
use backdrop_core::geometry::Extent;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

use crate::canvas::CanvasSurface;

/// Where the mounted driver lives. Empty once unmounted.
pub type DriverSlot = Rc<RefCell<Option<Driver<WebPlatform>>>>;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub struct WebPlatform {
    window: Window,
    canvas: Option<HtmlCanvasElement>,
    slot: Weak<RefCell<Option<Driver<WebPlatform>>>>,
    on_frame: Closure<dyn FnMut()>,
    on_pointer: Option<Closure<dyn FnMut(MouseEvent)>>,
    on_resize: Option<Closure<dyn FnMut()>>,
}

/// Runs `f` on the mounted driver, if it is still there and not busy.
fn with_driver(slot: &Weak<RefCell<Option<Driver<WebPlatform>>>>, f: impl FnOnce(&mut Driver<WebPlatform>)) {
    let Some(cell) = slot.upgrade() else {
        return;
    };
    let Ok(mut guard) = cell.try_borrow_mut() else {
        return;
    };
    if let Some(driver) = guard.as_mut() {
        f(driver);
    }
}

impl WebPlatform {
    pub fn new(window: Window, canvas: Option<HtmlCanvasElement>, slot: &DriverSlot) -> Self {
        let weak = Rc::downgrade(slot);
        let frame_slot = weak.clone();
        let on_frame = Closure::wrap(Box::new(move || {
            with_driver(&frame_slot, |driver| driver.tick());
        }) as Box<dyn FnMut()>);
        Self {
            window,
            canvas,
            slot: weak,
            on_frame,
            on_pointer: None,
            on_resize: None,
        }
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    /// Detaches `callback`; the caller drops it afterwards.
    fn remove_listener(&self, event: &str, callback: &JsValue) {
        if let Err(err) = self
            .window
            .remove_event_listener_with_callback(event, callback.unchecked_ref())
        {
            tracing::debug!(?err, event, "listener removal failed");
        }
    }
}

impl Platform for WebPlatform {
    type Surface = CanvasSurface;

    fn viewport(&self) -> (f64, f64) {
        let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (read(self.window.inner_width()), read(self.window.inner_height()))
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn acquire_surface(&mut self) -> Option<CanvasSurface> {
        let canvas = self.canvas.clone()?;
        let (w, h) = self.viewport();
        let extent = Extent::new(w, h).or_else(|_| Extent::new(1.0, 1.0)).ok()?;
        CanvasSurface::new(canvas, extent, self.device_pixel_ratio())
    }

    fn listen(&mut self, listener: Listener) {
        match listener {
            Listener::PointerMove(cell) => {
                let callback = Closure::wrap(Box::new(move |event: MouseEvent| {
                    cell.move_to(event.client_x() as f64, event.client_y() as f64);
                }) as Box<dyn FnMut(MouseEvent)>);
                if self
                    .window
                    .add_event_listener_with_callback("pointermove", callback.as_ref().unchecked_ref())
                    .is_ok()
                {
                    self.on_pointer = Some(callback);
                }
            }
            Listener::Resize => {
                let slot = self.slot.clone();
                let callback = Closure::wrap(Box::new(move || {
                    with_driver(&slot, |driver| driver.resize());
                }) as Box<dyn FnMut()>);
                if self
                    .window
                    .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
                    .is_ok()
                {
                    self.on_resize = Some(callback);
                }
            }
        }
    }

    fn unlisten(&mut self, kind: ListenerKind) {
        match kind {
            ListenerKind::PointerMove => {
                if let Some(callback) = self.on_pointer.take() {
                    self.remove_listener("pointermove", callback.as_ref());
                }
            }
            ListenerKind::Resize => {
                if let Some(callback) = self.on_resize.take() {
                    self.remove_listener("resize", callback.as_ref());
                }
            }
        }
    }

    fn request_frame(&mut self) -> Option<FrameRequest> {
        match self
            .window
            .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameRequest(id as i64)),
            Err(err) => {
                tracing::warn!(?err, "requestAnimationFrame failed");
                None
            }
        }
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if let Err(err) = self.window.cancel_animation_frame(request.0 as i32) {
            tracing::debug!(?err, id = request.0, "cancelAnimationFrame failed");
        }
    }
}
