//! A [`Platform`] with no display: fixed viewport, raster surface and a
//! manual frame scheduler.
//!
//! Nothing fires on its own. Callers drive the loop with
//! [`run_frames`], and inject pointer or resize events the way a browser
//! would deliver them: only while the matching listener is registered.

use std::collections::HashSet;

use backdrop_core::driver::{Driver, FrameRequest, Listener, ListenerKind, Platform};
use backdrop_core::geometry::Extent;
use backdrop_core::pointer::PointerHandle;

use crate::raster::Raster;

/// Counters and switches for a headless host.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    viewport: (f64, f64),
    reduced_motion: bool,
    surface_unavailable: bool,
    listeners: HashSet<ListenerKind>,
    pointer: Option<PointerHandle>,
    pending: Option<FrameRequest>,
    next_request: i64,
    requested: usize,
    cancelled: usize,
}

impl HeadlessPlatform {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: (width, height),
            ..Self::default()
        }
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Makes `acquire_surface` fail, as a browser without a 2D context would.
    pub fn without_surface(mut self) -> Self {
        self.surface_unavailable = true;
        self
    }

    /// Delivers a pointer move if a pointer listener is registered.
    pub fn move_pointer(&self, x: f64, y: f64) -> bool {
        match &self.pointer {
            Some(cell) => {
                cell.move_to(x, y);
                true
            }
            None => false,
        }
    }

    /// Changes the viewport. Returns whether a resize listener would be told.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> bool {
        self.viewport = (width, height);
        self.listeners.contains(&ListenerKind::Resize)
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.contains(&kind)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Frame requests made so far.
    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }
}

impl Platform for HeadlessPlatform {
    type Surface = Raster;

    fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn acquire_surface(&mut self) -> Option<Raster> {
        if self.surface_unavailable {
            return None;
        }
        let (w, h) = self.viewport;
        // Sized properly on the first measurable resize.
        let extent = Extent::new(w, h).or_else(|_| Extent::new(1.0, 1.0)).ok()?;
        Raster::new(extent).ok()
    }

    fn listen(&mut self, listener: Listener) {
        if let Listener::PointerMove(cell) = &listener {
            self.pointer = Some(cell.clone());
        }
        self.listeners.insert(listener.kind());
    }

    fn unlisten(&mut self, kind: ListenerKind) {
        if kind == ListenerKind::PointerMove {
            self.pointer = None;
        }
        self.listeners.remove(&kind);
    }

    fn request_frame(&mut self) -> Option<FrameRequest> {
        self.next_request += 1;
        self.requested += 1;
        let request = FrameRequest(self.next_request);
        self.pending = Some(request);
        Some(request)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

/// Fires up to `frames` scheduled frames. Returns how many actually ran.
pub fn run_frames(driver: &mut Driver<HeadlessPlatform>, frames: usize) -> usize {
    let mut ran = 0;
    while ran < frames {
        if driver.platform_mut().pending.take().is_none() {
            break;
        }
        driver.tick();
        ran += 1;
    }
    ran
}

/// Applies a viewport change and, if the resize listener is registered,
/// forwards it to the driver.
pub fn resize(driver: &mut Driver<HeadlessPlatform>, width: f64, height: f64) {
    if driver.platform_mut().set_viewport(width, height) {
        driver.resize();
    }
}
