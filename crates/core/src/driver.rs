//! Mount, frame loop and teardown for one backdrop instance.
//!
//! The host is abstracted behind [`Platform`]: viewport size, the drawing
//! surface, event listeners, the reduced-motion preference and the frame
//! scheduler. The driver never schedules itself recursively; the host calls
//! [`Driver::tick`] when a requested frame fires, so tests can single-step
//! the loop with a manual scheduler.

use crate::engine::Engine;
use crate::geometry::Extent;
use crate::pointer::PointerHandle;
use crate::surface::DrawSurface;

/// Where a driver is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    /// Mounted, entity set being built.
    Seeding,
    /// Stepping and rendering on every tick.
    Running,
    /// Reduced motion: one frame drawn, nothing scheduled.
    StaticRendered,
    /// No drawing surface was available; every call is a no-op.
    Inert,
}

/// Event sources the driver subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    Resize,
}

/// A subscription request. Pointer moves are written straight into the
/// shared cell; resizes are forwarded by the host to [`Driver::resize`].
#[derive(Debug, Clone)]
pub enum Listener {
    PointerMove(PointerHandle),
    Resize,
}

impl Listener {
    pub fn kind(&self) -> ListenerKind {
        match self {
            Listener::PointerMove(_) => ListenerKind::PointerMove,
            Listener::Resize => ListenerKind::Resize,
        }
    }
}

/// Opaque handle of a scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub i64);

/// Everything the driver needs from its host.
pub trait Platform {
    type Surface: DrawSurface;

    /// Current viewport size in CSS pixels. May be zero before layout.
    fn viewport(&self) -> (f64, f64);

    /// Read once, at mount.
    fn prefers_reduced_motion(&self) -> bool;

    /// The drawing surface, or `None` if the host cannot provide one.
    fn acquire_surface(&mut self) -> Option<Self::Surface>;

    fn listen(&mut self, listener: Listener);

    fn unlisten(&mut self, kind: ListenerKind);

    /// Asks for one callback on the next display refresh.
    fn request_frame(&mut self) -> Option<FrameRequest>;

    fn cancel_frame(&mut self, request: FrameRequest);
}

/// One mounted backdrop.
pub struct Driver<P: Platform> {
    platform: P,
    engine: Box<dyn Engine>,
    surface: Option<P::Surface>,
    pointer: PointerHandle,
    state: Lifecycle,
    pending: Option<FrameRequest>,
    frames_rendered: u64,
}

impl<P: Platform> Driver<P> {
    pub fn new(platform: P, engine: Box<dyn Engine>) -> Self {
        Self {
            platform,
            engine,
            surface: None,
            pointer: PointerHandle::new(),
            state: Lifecycle::Unmounted,
            pending: None,
            frames_rendered: 0,
        }
    }

    /// Acquires the surface, seeds, subscribes and either draws one static
    /// frame or starts the loop. Calling it again while mounted does nothing.
    pub fn mount(&mut self) {
        if self.state != Lifecycle::Unmounted {
            return;
        }
        let Some(surface) = self.platform.acquire_surface() else {
            tracing::warn!("no drawing surface available; backdrop stays inert");
            self.state = Lifecycle::Inert;
            return;
        };
        self.surface = Some(surface);
        self.state = Lifecycle::Seeding;
        self.fit_viewport();

        self.platform.listen(Listener::PointerMove(self.pointer.clone()));
        self.platform.listen(Listener::Resize);

        if self.platform.prefers_reduced_motion() {
            tracing::info!("reduced motion preferred; rendering a single static frame");
            self.draw();
            self.state = Lifecycle::StaticRendered;
        } else {
            self.state = Lifecycle::Running;
            self.schedule();
        }
        tracing::debug!(state = ?self.state, "backdrop mounted");
    }

    /// Runs one frame. Only meaningful while running and a frame is pending.
    pub fn tick(&mut self) {
        if self.state != Lifecycle::Running || self.pending.take().is_none() {
            return;
        }
        self.engine.step(self.pointer.position());
        self.draw();
        self.schedule();
    }

    /// Re-measures the viewport and reseeds. A static backdrop redraws its
    /// single frame; a running one picks up the new set on the next tick.
    pub fn resize(&mut self) {
        match self.state {
            Lifecycle::Running => self.fit_viewport(),
            Lifecycle::StaticRendered => {
                self.fit_viewport();
                self.draw();
            }
            _ => {}
        }
    }

    /// Cancels the pending frame, drops both listeners and releases the
    /// surface. Idempotent.
    pub fn unmount(&mut self) {
        if matches!(self.state, Lifecycle::Unmounted | Lifecycle::Inert) {
            return;
        }
        if let Some(request) = self.pending.take() {
            self.platform.cancel_frame(request);
        }
        self.platform.unlisten(ListenerKind::PointerMove);
        self.platform.unlisten(ListenerKind::Resize);
        self.pointer.leave();
        self.surface = None;
        self.engine.clear();
        self.state = Lifecycle::Unmounted;
        tracing::debug!(frames = self.frames_rendered, "backdrop unmounted");
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Writer side of the pointer cell; hosts without listener-side
    /// forwarding can feed it directly.
    pub fn pointer(&self) -> &PointerHandle {
        &self.pointer
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn surface(&self) -> Option<&P::Surface> {
        self.surface.as_ref()
    }

    /// Matches surface and entity set to the viewport. A zero-sized
    /// viewport leaves both untouched until a usable resize arrives.
    fn fit_viewport(&mut self) {
        let (width, height) = self.platform.viewport();
        let Ok(extent) = Extent::new(width, height) else {
            tracing::debug!(width, height, "viewport not measurable yet; seeding deferred");
            return;
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(extent);
        }
        self.engine.reseed(extent);
    }

    fn draw(&mut self) {
        if self.engine.extent().is_none() {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            self.engine.render(surface);
            self.frames_rendered += 1;
        }
    }

    fn schedule(&mut self) {
        self.pending = self.platform.request_frame();
        if self.pending.is_none() {
            tracing::warn!("frame request refused; animation stopped");
        }
    }
}

impl<P: Platform> Drop for Driver<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Simulation;
    use crate::surface::RecordingSurface;
    use serde_json::json;
    use std::collections::HashSet;

    #[derive(Default)]
    struct MockPlatform {
        viewport: (f64, f64),
        reduced_motion: bool,
        no_surface: bool,
        listeners: HashSet<ListenerKind>,
        pointer: Option<PointerHandle>,
        next_id: i64,
        requested: usize,
        cancelled: Vec<FrameRequest>,
    }

    impl MockPlatform {
        fn sized(w: f64, h: f64) -> Self {
            Self {
                viewport: (w, h),
                ..Default::default()
            }
        }
    }

    impl Platform for MockPlatform {
        type Surface = RecordingSurface;

        fn viewport(&self) -> (f64, f64) {
            self.viewport
        }

        fn prefers_reduced_motion(&self) -> bool {
            self.reduced_motion
        }

        fn acquire_surface(&mut self) -> Option<RecordingSurface> {
            if self.no_surface {
                return None;
            }
            Some(RecordingSurface::new(Extent::new(1.0, 1.0).unwrap()))
        }

        fn listen(&mut self, listener: Listener) {
            if let Listener::PointerMove(p) = &listener {
                self.pointer = Some(p.clone());
            }
            self.listeners.insert(listener.kind());
        }

        fn unlisten(&mut self, kind: ListenerKind) {
            self.listeners.remove(&kind);
            if kind == ListenerKind::PointerMove {
                self.pointer = None;
            }
        }

        fn request_frame(&mut self) -> Option<FrameRequest> {
            self.requested += 1;
            self.next_id += 1;
            Some(FrameRequest(self.next_id))
        }

        fn cancel_frame(&mut self, request: FrameRequest) {
            self.cancelled.push(request);
        }
    }

    fn driver(platform: MockPlatform) -> Driver<MockPlatform> {
        let engine = Simulation::from_json("particles", 3, &json!({})).unwrap();
        Driver::new(platform, Box::new(engine))
    }

    fn draw_count(d: &Driver<MockPlatform>) -> usize {
        d.surface().map_or(0, |s| s.frames())
    }

    #[test]
    fn running_mount_schedules_and_subscribes() {
        let mut d = driver(MockPlatform::sized(1024.0, 768.0));
        d.mount();
        assert_eq!(d.state(), Lifecycle::Running);
        assert_eq!(d.platform().requested, 1);
        assert_eq!(d.platform().listeners.len(), 2);
        assert_eq!(d.engine().entities().len(), 80);
        assert_eq!(draw_count(&d), 0);
    }

    #[test]
    fn each_tick_draws_once_and_reschedules() {
        let mut d = driver(MockPlatform::sized(1024.0, 768.0));
        d.mount();
        for _ in 0..5 {
            d.tick();
        }
        assert_eq!(draw_count(&d), 5);
        assert_eq!(d.platform().requested, 6);
        assert_eq!(d.frames_rendered(), 5);
    }

    #[test]
    fn reduced_motion_renders_exactly_one_frame() {
        let mut platform = MockPlatform::sized(1024.0, 768.0);
        platform.reduced_motion = true;
        let mut d = driver(platform);
        d.mount();
        d.tick();
        d.tick();
        assert_eq!(d.state(), Lifecycle::StaticRendered);
        assert_eq!(draw_count(&d), 1);
        assert_eq!(d.platform().requested, 0);
        assert!(d.pending().is_none());
    }

    #[test]
    fn static_backdrop_redraws_on_resize_without_scheduling() {
        let mut platform = MockPlatform::sized(1024.0, 768.0);
        platform.reduced_motion = true;
        let mut d = driver(platform);
        d.mount();
        d.platform_mut().viewport = (500.0, 900.0);
        d.resize();
        assert_eq!(draw_count(&d), 2);
        assert_eq!(d.engine().entities().len(), 40);
        assert_eq!(d.platform().requested, 0);
    }

    #[test]
    fn resize_reseeds_while_running() {
        let mut d = driver(MockPlatform::sized(1024.0, 768.0));
        d.mount();
        d.tick();
        d.platform_mut().viewport = (600.0, 800.0);
        d.resize();
        assert_eq!(d.state(), Lifecycle::Running);
        assert_eq!(d.engine().entities().len(), 40);
        assert_eq!(d.engine().extent(), Some(Extent::new(600.0, 800.0).unwrap()));
        assert_eq!(d.surface().unwrap().extent(), Extent::new(600.0, 800.0).unwrap());
    }

    #[test]
    fn missing_surface_makes_mount_inert() {
        let mut platform = MockPlatform::sized(1024.0, 768.0);
        platform.no_surface = true;
        let mut d = driver(platform);
        d.mount();
        d.tick();
        d.resize();
        d.unmount();
        assert_eq!(d.state(), Lifecycle::Inert);
        assert_eq!(d.platform().requested, 0);
        assert!(d.platform().listeners.is_empty());
        assert!(d.engine().entities().is_empty());
    }

    #[test]
    fn zero_viewport_defers_seeding_until_resize() {
        let mut d = driver(MockPlatform::sized(0.0, 0.0));
        d.mount();
        d.tick();
        assert!(d.engine().entities().is_empty());
        assert_eq!(draw_count(&d), 0);
        d.platform_mut().viewport = (1024.0, 768.0);
        d.resize();
        d.tick();
        assert_eq!(d.engine().entities().len(), 80);
        assert_eq!(draw_count(&d), 1);
    }

    #[test]
    fn unmount_cancels_and_unsubscribes() {
        let mut d = driver(MockPlatform::sized(1024.0, 768.0));
        d.mount();
        d.tick();
        let pending = d.pending().unwrap();
        d.unmount();
        assert_eq!(d.state(), Lifecycle::Unmounted);
        assert_eq!(d.platform().cancelled, vec![pending]);
        assert!(d.platform().listeners.is_empty());
        assert!(d.surface().is_none());
    }

    #[test]
    fn nothing_happens_after_unmount() {
        let mut d = driver(MockPlatform::sized(1024.0, 768.0));
        d.mount();
        d.tick();
        let pointer = d.pointer().clone();
        d.unmount();
        let requested = d.platform().requested;
        let rendered = d.frames_rendered();

        pointer.move_to(10.0, 10.0);
        d.platform_mut().viewport = (300.0, 300.0);
        d.resize();
        d.tick();
        d.tick();
        d.unmount();
        d.unmount();

        assert_eq!(d.platform().requested, requested);
        assert_eq!(d.frames_rendered(), rendered);
        assert_eq!(d.platform().cancelled.len(), 1);
        assert!(d.engine().entities().is_empty());
    }

    #[test]
    fn pointer_listener_shares_the_driver_cell() {
        let mut d = driver(MockPlatform::sized(1024.0, 768.0));
        d.mount();
        let cell = d.platform().pointer.clone().unwrap();
        assert!(cell.same_cell(d.pointer()));
        cell.move_to(5.0, 6.0);
        assert_eq!(d.pointer().position(), Some(glam::DVec2::new(5.0, 6.0)));
    }

    #[test]
    fn second_mount_is_ignored() {
        let mut d = driver(MockPlatform::sized(1024.0, 768.0));
        d.mount();
        d.mount();
        assert_eq!(d.platform().requested, 1);
    }
}
