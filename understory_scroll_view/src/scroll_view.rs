// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The declarative container and its mounted form.
//!
//! A [`ScrollView`] is a plain description: magnification, scroll indicator
//! visibility, a content builder and gesture registrations. Mounting it onto
//! a [`ScrollSurface`] yields a [`MountedScrollView`], which owns the surface,
//! the per‑container proxy delegate and the live recognizers, and receives
//! every inbound platform event.
//!
//! ## Mount sequence
//!
//! 1. The content builder runs with an unbound proxy. Setter calls made there
//!    are buffered.
//! 2. The content is measured against [`UNBOUNDED`] and becomes the surface's
//!    document size; indicator visibility is applied.
//! 3. Zoom bounds are attached, using multiplier `1.0`.
//! 4. The delegate binds the surface and flushes buffered writes.
//! 5. Gesture recognizers are synced with the registry.
//! 6. In relative mode the fit multiplier is computed for the current frame.

use alloc::rc::Rc;
use core::cell::{Cell, Ref, RefCell, RefMut};
use core::fmt;

use kurbo::{Point, Size, Vec2};
use tracing::{debug, warn};

use crate::backend::ScrollSurface;
use crate::dispatch::{ActiveRecognizers, ContentGestures, DEFAULT_SLOP};
use crate::geometry::UNBOUNDED;
use crate::gesture::{
    GesturePhase, GestureRegistry, PanGesture, PointerEvent, RecognizerState, TapGesture,
};
use crate::magnification::Magnification;
use crate::proxy::{ProxyDelegate, ScrollViewProxy, SharedBackend};
use crate::run_loop::RunLoop;
use crate::zoom::{ZoomFit, ZoomUpdate};

/// Content hosted by a scroll view.
pub trait ContentView {
    /// Size the content wants when offered `proposal`.
    ///
    /// The container proposes [`UNBOUNDED`] to obtain the natural size.
    fn size_that_fits(&self, proposal: Size) -> Size;
}

impl ContentView for Size {
    fn size_that_fits(&self, _proposal: Size) -> Size {
        *self
    }
}

type ContentBuilder<C> = Rc<dyn Fn(&ScrollViewProxy) -> C>;

/// Declarative scroll and zoom container.
pub struct ScrollView<C> {
    magnification: Magnification,
    show_scroll_indicators: bool,
    content: ContentBuilder<C>,
    gestures: GestureRegistry,
    gesture_slop: f64,
}

impl<C> Clone for ScrollView<C> {
    fn clone(&self) -> Self {
        Self {
            magnification: self.magnification,
            show_scroll_indicators: self.show_scroll_indicators,
            content: Rc::clone(&self.content),
            gestures: self.gestures.clone(),
            gesture_slop: self.gesture_slop,
        }
    }
}

impl<C> fmt::Debug for ScrollView<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollView")
            .field("magnification", &self.magnification)
            .field("show_scroll_indicators", &self.show_scroll_indicators)
            .field("gestures", &self.gestures)
            .field("gesture_slop", &self.gesture_slop)
            .finish_non_exhaustive()
    }
}

impl<C: ContentView + 'static> ScrollView<C> {
    /// Creates a container whose content is produced by `content`.
    ///
    /// The builder receives the container's proxy and runs on mount and on
    /// every [`MountedScrollView::update`].
    pub fn new(
        magnification: Magnification,
        show_scroll_indicators: bool,
        content: impl Fn(&ScrollViewProxy) -> C + 'static,
    ) -> Self {
        Self {
            magnification,
            show_scroll_indicators,
            content: Rc::new(content),
            gestures: GestureRegistry::new(),
            gesture_slop: DEFAULT_SLOP,
        }
    }

    /// Registers a tap handler requiring `count` consecutive taps.
    ///
    /// Replaces any earlier tap registration.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    #[must_use]
    pub fn on_tap(mut self, count: u32, handler: impl Fn(Point, &ScrollViewProxy) + 'static) -> Self {
        self.gestures.set_tap(Some(TapGesture::new(count, handler)));
        self
    }

    /// Registers a pan handler, replacing any earlier one.
    ///
    /// See [`crate::PanHandler`] for what the return value means per phase.
    #[must_use]
    pub fn on_pan(
        mut self,
        handler: impl Fn(GesturePhase, Point, Vec2, &ScrollViewProxy) -> bool + 'static,
    ) -> Self {
        self.gestures.set_pan(Some(PanGesture::new(handler)));
        self
    }

    /// Removes the tap registration.
    #[must_use]
    pub fn clear_tap(mut self) -> Self {
        self.gestures.set_tap(None);
        self
    }

    /// Removes the pan registration.
    #[must_use]
    pub fn clear_pan(mut self) -> Self {
        self.gestures.set_pan(None);
        self
    }

    /// Distance a press may travel and still count as a tap, in surface points.
    #[must_use]
    pub fn gesture_slop(mut self, slop: f64) -> Self {
        self.gesture_slop = slop;
        self
    }

    /// The zoom configuration.
    #[must_use]
    pub fn magnification(&self) -> Magnification {
        self.magnification
    }

    /// Whether scroll indicators are requested.
    #[must_use]
    pub fn shows_scroll_indicators(&self) -> bool {
        self.show_scroll_indicators
    }

    /// The gesture registrations.
    #[must_use]
    pub fn gestures(&self) -> &GestureRegistry {
        &self.gestures
    }

    /// Mounts the container onto `backend` with its own run loop.
    pub fn mount<B: ScrollSurface + 'static>(self, backend: B) -> MountedScrollView<C, B> {
        self.mount_on(backend, RunLoop::new())
    }

    /// Mounts the container onto `backend`, deferring notifications to `run_loop`.
    pub fn mount_on<B: ScrollSurface + 'static>(
        self,
        mut backend: B,
        run_loop: RunLoop,
    ) -> MountedScrollView<C, B> {
        let delegate = Rc::new(ProxyDelegate::new());
        let proxy = ScrollViewProxy::new(Rc::clone(&delegate));

        let content = (self.content)(&proxy);
        let content_size = content.size_that_fits(UNBOUNDED);
        backend.set_scroll_indicators_visible(self.show_scroll_indicators);
        backend.set_document_size(content_size);

        let mut zoom = ZoomFit::new(self.magnification);
        let attached = zoom.attach();
        let zoom_changed = apply_zoom(&mut backend, attached);
        delegate.set_zoom_multiplier(attached.multiplier);

        let surface = Rc::new(RefCell::new(backend));
        let shared: SharedBackend = surface.clone();
        delegate.bind(shared);

        let mut gestures = ContentGestures::with_slop(self.gesture_slop);
        gestures.sync(&self.gestures);

        debug!(
            ?content_size,
            relative = self.magnification.is_relative(),
            "mounted scroll view"
        );
        let mut mounted = MountedScrollView {
            view: self,
            content,
            content_size,
            surface,
            delegate,
            proxy,
            gestures,
            zoom,
            run_loop,
            notice: Rc::new(ZoomNotice::default()),
        };
        if zoom_changed {
            mounted.native_zoom_changed();
        }
        mounted.fit_to_bounds();
        mounted
    }
}

fn apply_zoom(surface: &mut dyn ScrollSurface, update: ZoomUpdate) -> bool {
    let limits_moved_scale = surface.set_zoom_limits(update.min, update.max);
    let scale_changed = surface.set_zoom_scale(update.scale);
    limits_moved_scale || scale_changed
}

/// Latest zoom value waiting for the next run loop turn.
#[derive(Default)]
struct ZoomNotice {
    scheduled: Cell<bool>,
    latest: Cell<f64>,
    listener: RefCell<Option<Rc<dyn Fn(f64)>>>,
}

impl ZoomNotice {
    fn deliver(&self) {
        self.scheduled.set(false);
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(self.latest.get());
        }
    }
}

/// A [`ScrollView`] mounted onto a platform surface.
///
/// Dropping it unbinds the proxy delegate, so proxies that outlive the view
/// report [`ScrollViewProxy::is_attached`] as `false`.
pub struct MountedScrollView<C, B> {
    view: ScrollView<C>,
    content: C,
    content_size: Size,
    surface: Rc<RefCell<B>>,
    delegate: Rc<ProxyDelegate>,
    proxy: ScrollViewProxy,
    gestures: ContentGestures,
    zoom: ZoomFit,
    run_loop: RunLoop,
    notice: Rc<ZoomNotice>,
}

impl<C: ContentView + 'static, B: ScrollSurface + 'static> MountedScrollView<C, B> {
    /// Replaces the description and re‑renders.
    ///
    /// The content builder runs again, the content is re‑measured, the
    /// delegate is rebound and recognizers are synced with the new
    /// registrations. A changed content size triggers a zoom recompute.
    /// Magnification is fixed at mount and is not re‑applied.
    pub fn update(&mut self, view: ScrollView<C>) {
        self.view = view;
        self.content = (self.view.content)(&self.proxy);
        let content_size = self.content.size_that_fits(UNBOUNDED);
        let resized = content_size != self.content_size;
        {
            let mut surface = self.surface.borrow_mut();
            surface.set_scroll_indicators_visible(self.view.show_scroll_indicators);
            if resized {
                surface.set_document_size(content_size);
            }
        }
        self.content_size = content_size;

        let shared: SharedBackend = self.surface.clone();
        self.delegate.bind(shared);
        self.gestures.set_slop(self.view.gesture_slop);
        self.gestures.sync(&self.view.gestures);

        if resized {
            debug!(?content_size, "content resized");
            self.fit_to_bounds();
        }
    }

    /// The surface's frame changed size (resize or rotation).
    pub fn bounds_changed(&mut self, size: Size) {
        self.surface.borrow_mut().set_viewport_size(size);
        self.fit_to_bounds();
    }

    /// Recomputes the fit multiplier for the current frame and content.
    ///
    /// Returns `false` if nothing was recomputed: absolute magnification or
    /// degenerate geometry.
    pub fn fit_to_bounds(&mut self) -> bool {
        let viewport = self.surface.borrow().viewport_size();
        let Some(update) = self.zoom.bounds_changed(viewport, self.content_size) else {
            return false;
        };
        let changed = apply_zoom(&mut *self.surface.borrow_mut(), update);
        self.delegate.set_zoom_multiplier(update.multiplier);
        self.zoom.applied();
        if changed {
            self.native_zoom_changed();
        }
        true
    }

    /// The surface's zoom scale changed.
    ///
    /// The user zoom is updated right away; the magnification listener is
    /// called on the next run loop turn, once per turn, with the latest value.
    pub fn native_zoom_changed(&mut self) {
        let native = self.surface.borrow().magnification();
        let user = self.zoom.did_zoom(native);
        self.notice.latest.set(user);
        if !self.notice.scheduled.replace(true) {
            let notice = Rc::clone(&self.notice);
            self.run_loop.defer(move || notice.deliver());
        }
    }

    /// Routes a raw pointer event, in surface coordinates, to the recognizers.
    pub fn pointer_event(&mut self, event: PointerEvent) {
        self.gestures
            .pointer_event(event, &*self.surface, &self.proxy);
    }

    /// Delivers a native pan recognizer callback.
    ///
    /// `raw_state` is the toolkit's recognizer state value; unknown values are
    /// ignored. `location` and `translation` are in content coordinates and
    /// `event` is the drag event that produced this callback, if any.
    pub fn native_pan(
        &mut self,
        raw_state: isize,
        location: Point,
        translation: Vec2,
        event: Option<PointerEvent>,
    ) -> bool {
        let state = RecognizerState::from_raw(raw_state);
        debug_assert!(state.is_some(), "unexpected pan recognizer state {raw_state}");
        let Some(state) = state else {
            warn!(raw_state, "ignoring unknown pan recognizer state");
            return false;
        };
        self.gestures.native_pan(
            state,
            location,
            translation,
            event,
            &*self.surface,
            &self.proxy,
        )
    }

    /// Delivers a native tap recognizer callback at `location`, in content coordinates.
    pub fn native_tap(&self, location: Point) -> bool {
        self.gestures.native_tap(location, &self.proxy)
    }
}

impl<C, B> MountedScrollView<C, B> {
    /// Sets the listener called with the magnification after zoom changes.
    pub fn on_magnification_change(&self, listener: impl Fn(f64) + 'static) {
        *self.notice.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// The container's proxy.
    #[must_use]
    pub fn proxy(&self) -> &ScrollViewProxy {
        &self.proxy
    }

    /// The description passed to the last mount or update.
    ///
    /// Its [`ScrollView::magnification`] is only read at mount. The
    /// configuration in effect is [`ZoomFit::magnification`] on
    /// [`MountedScrollView::zoom`].
    #[must_use]
    pub fn view(&self) -> &ScrollView<C> {
        &self.view
    }

    /// The content produced by the last render.
    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Natural size of the content from the last measurement.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// User zoom in the configuration's units.
    #[must_use]
    pub fn magnification(&self) -> f64 {
        self.zoom.user_magnification()
    }

    /// The zoom fit controller.
    #[must_use]
    pub fn zoom(&self) -> &ZoomFit {
        &self.zoom
    }

    /// The run loop notifications are deferred to.
    #[must_use]
    pub fn run_loop(&self) -> &RunLoop {
        &self.run_loop
    }

    /// Borrows the surface.
    ///
    /// # Panics
    ///
    /// Panics if the surface is mutably borrowed, which only happens while a
    /// [`MountedScrollView::surface_mut`] guard is alive.
    #[must_use]
    pub fn surface(&self) -> Ref<'_, B> {
        self.surface.borrow()
    }

    /// Mutably borrows the surface, for example to drive live magnify.
    ///
    /// Zoom changes made this way should be followed by
    /// [`MountedScrollView::native_zoom_changed`].
    ///
    /// # Panics
    ///
    /// Panics if the surface is already borrowed.
    #[must_use]
    pub fn surface_mut(&self) -> RefMut<'_, B> {
        self.surface.borrow_mut()
    }

    /// Counts the installed gesture recognizers.
    #[must_use]
    pub fn active_recognizers(&self) -> ActiveRecognizers {
        self.gestures.active_recognizers()
    }
}

impl<C, B> Drop for MountedScrollView<C, B> {
    fn drop(&mut self) {
        self.delegate.unbind();
    }
}

impl<C, B: fmt::Debug> fmt::Debug for MountedScrollView<C, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedScrollView")
            .field("view", &self.view)
            .field("content_size", &self.content_size)
            .field("surface", &self.surface)
            .field("proxy", &self.proxy)
            .field("gestures", &self.gestures)
            .field("zoom", &self.zoom)
            .field("run_loop", &self.run_loop)
            .finish_non_exhaustive()
    }
}
