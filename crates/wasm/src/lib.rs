#![deny(unsafe_code)]
//! Browser bindings for the backdrop engine.
//!
//! ```js
//! const backdrop = Backdrop.mount("backdrop", "waves", '{"palette":"aurora"}');
//! // ...
//! backdrop.unmount();
//! ```
//!
//! The canvas is styled as a fixed, full-bleed layer behind page content
//! that never receives pointer events. A missing canvas or 2D context makes
//! the mount inert instead of throwing.

mod canvas;
mod platform;

use std::cell::RefCell;
use std::rc::Rc;

use backdrop_core::driver::{Driver, Lifecycle};
use backdrop_core::engine::Simulation;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use crate::platform::{DriverSlot, WebPlatform};

const LAYER_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("inset", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("z-index", "-1"),
    ("pointer-events", "none"),
];

/// A mounted backdrop. Accepts no commands besides `unmount`.
#[wasm_bindgen]
pub struct Backdrop {
    slot: DriverSlot,
}

#[wasm_bindgen]
impl Backdrop {
    /// Mounts `variant` on the canvas with id `canvas_id`.
    ///
    /// `params_json` holds optional tuning (`count`, `palette`, `speed`, ...).
    /// Unknown variants and malformed tuning are reported as errors; a
    /// missing canvas is not.
    pub fn mount(canvas_id: &str, variant: &str, params_json: Option<String>) -> Result<Backdrop, JsError> {
        let params: serde_json::Value = match params_json.as_deref() {
            None | Some("") => serde_json::json!({}),
            Some(raw) => serde_json::from_str(raw)?,
        };
        let seed = js_sys::Date::now() as u64;
        let sim = Simulation::from_json(variant, seed, &params)?;

        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let canvas = window
            .document()
            .and_then(|doc| doc.get_element_by_id(canvas_id))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        if let Some(canvas) = &canvas {
            let style = canvas.style();
            for (property, value) in LAYER_STYLE {
                if let Err(err) = style.set_property(property, value) {
                    tracing::debug!(?err, property, "canvas layer style rejected");
                }
            }
        } else {
            tracing::warn!(canvas_id, "canvas element not found");
        }

        let slot: DriverSlot = Rc::new(RefCell::new(None));
        let platform = WebPlatform::new(window, canvas, &slot);
        let mut driver = Driver::new(platform, Box::new(sim));
        driver.mount();
        *slot.borrow_mut() = Some(driver);
        Ok(Backdrop { slot })
    }

    /// Cancels the pending frame and removes every listener. Safe to call
    /// more than once.
    pub fn unmount(&self) {
        let driver = self.slot.borrow_mut().take();
        if let Some(mut driver) = driver {
            driver.unmount();
        }
    }

    /// `"running"`, `"static"`, `"inert"` or `"unmounted"`.
    pub fn state(&self) -> String {
        let state = self
            .slot
            .try_borrow()
            .ok()
            .and_then(|slot| slot.as_ref().map(|d| d.state()))
            .unwrap_or(Lifecycle::Unmounted);
        match state {
            Lifecycle::Running | Lifecycle::Seeding => "running",
            Lifecycle::StaticRendered => "static",
            Lifecycle::Inert => "inert",
            Lifecycle::Unmounted => "unmounted",
        }
        .to_string()
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.unmount();
    }
}
