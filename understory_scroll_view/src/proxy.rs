// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The viewport proxy handed to application code, and the delegate behind it.
//!
//! Each mounted scroll view owns one [`ProxyDelegate`]. The delegate holds a
//! single binding slot for the platform backend; the mount/update step fills
//! or replaces that slot in one assignment, so a read through the proxy sees
//! either the old backend or the new one, never a mixture.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::{Point, Rect, Size};
use tracing::debug;

use crate::backend::ViewportBackend;
use crate::error::{Error, Result};
use crate::geometry::EdgeInsets;

pub(crate) type SharedBackend = Rc<RefCell<dyn ViewportBackend>>;

/// Writes issued before a backend was bound.
#[derive(Debug, Default)]
struct PendingWrites {
    content_inset: Option<EdgeInsets>,
    autoscroll_enabled: Option<bool>,
    content_offset: Option<Point>,
    scroll_to: Option<(Rect, bool)>,
}

impl PendingWrites {
    fn is_empty(&self) -> bool {
        self.content_inset.is_none()
            && self.autoscroll_enabled.is_none()
            && self.content_offset.is_none()
            && self.scroll_to.is_none()
    }

    fn apply(self, backend: &mut dyn ViewportBackend) {
        if let Some(inset) = self.content_inset {
            backend.set_content_inset(inset);
        }
        if let Some(enabled) = self.autoscroll_enabled {
            backend.set_autoscroll_enabled(enabled);
        }
        if let Some(offset) = self.content_offset {
            backend.set_content_offset(offset);
        }
        if let Some((rect, animated)) = self.scroll_to {
            backend.scroll_to(rect, animated);
        }
    }
}

/// Per-container binding between the proxy and a platform backend.
pub(crate) struct ProxyDelegate {
    backend: RefCell<Option<SharedBackend>>,
    pending: RefCell<PendingWrites>,
    zoom_multiplier: Cell<f64>,
}

impl ProxyDelegate {
    pub(crate) fn new() -> Self {
        Self {
            backend: RefCell::new(None),
            pending: RefCell::new(PendingWrites::default()),
            zoom_multiplier: Cell::new(1.0),
        }
    }

    /// Binds (or rebinds) the backend, then flushes buffered writes into it.
    pub(crate) fn bind(&self, backend: SharedBackend) {
        let rebound = self.backend.replace(Some(Rc::clone(&backend))).is_some();
        let pending = core::mem::take(&mut *self.pending.borrow_mut());
        let flushed = !pending.is_empty();
        if flushed {
            pending.apply(&mut *backend.borrow_mut());
        }
        debug!(rebound, flushed, "bound scroll view proxy");
    }

    pub(crate) fn unbind(&self) {
        if self.backend.replace(None).is_some() {
            debug!("unbound scroll view proxy");
        }
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.backend.borrow().is_some()
    }

    pub(crate) fn set_zoom_multiplier(&self, multiplier: f64) {
        self.zoom_multiplier.set(multiplier);
    }

    fn zoom_multiplier(&self) -> f64 {
        let multiplier = self.zoom_multiplier.get();
        if multiplier != 0.0 { multiplier } else { 1.0 }
    }

    fn backend(&self) -> Result<SharedBackend> {
        self.backend.borrow().clone().ok_or(Error::NotAttached)
    }
}

impl fmt::Debug for ProxyDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyDelegate")
            .field("bound", &self.is_bound())
            .field("pending", &self.pending.borrow())
            .field("zoom_multiplier", &self.zoom_multiplier.get())
            .finish()
    }
}

/// Handle to a scroll view's live viewport state.
///
/// A proxy is handed to the content builder and to every gesture handler.
/// All getters read the bound backend on access; nothing is cached.
///
/// Setters and [`ScrollViewProxy::scroll_to`] may be called before the scroll
/// view is mounted: they are buffered and applied once a backend is bound.
/// Getters, on the other hand, require a bound backend.
///
/// # Panics
///
/// Every getter panics with [`Error::NotAttached`]'s message if no backend is
/// bound. Use [`ScrollViewProxy::is_attached`] or
/// [`ScrollViewProxy::try_snapshot`] where that can legitimately happen.
#[derive(Clone)]
pub struct ScrollViewProxy {
    delegate: Rc<ProxyDelegate>,
}

impl ScrollViewProxy {
    pub(crate) fn new(delegate: Rc<ProxyDelegate>) -> Self {
        Self { delegate }
    }

    /// Whether a backend is currently bound.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.delegate.is_bound()
    }

    /// Scrolls so that `rect` (in visible‑rect space) becomes visible.
    ///
    /// This is a platform difference rather than a single contract: the
    /// desktop backend only scrolls to points and centers the visible rect on
    /// the center of `rect`, while the touch backend scrolls the minimum
    /// distance needed to reveal all of `rect`.
    pub fn scroll_to(&self, rect: Rect, animated: bool) {
        self.write(
            |backend| backend.scroll_to(rect, animated),
            |pending| pending.scroll_to = Some((rect, animated)),
        );
    }

    /// Current scroll offset.
    #[must_use]
    pub fn content_offset(&self) -> Point {
        self.read(|backend| backend.content_offset())
    }

    /// Scrolls to `offset`.
    pub fn set_content_offset(&self, offset: Point) {
        self.write(
            |backend| backend.set_content_offset(offset),
            |pending| pending.content_offset = Some(offset),
        );
    }

    /// Size of the scrolled content.
    ///
    /// Read‑only: content size is derived from the hosted content's natural
    /// size, not set independently.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.read(|backend| backend.content_size())
    }

    /// Insets added around the content.
    #[must_use]
    pub fn content_inset(&self) -> EdgeInsets {
        self.read(|backend| backend.content_inset())
    }

    /// Replaces the content insets.
    pub fn set_content_inset(&self, inset: EdgeInsets) {
        self.write(
            |backend| backend.set_content_inset(inset),
            |pending| pending.content_inset = Some(inset),
        );
    }

    /// Currently visible rectangle.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        self.read(|backend| backend.visible_rect())
    }

    /// Space reserved for scroll bars.
    #[must_use]
    pub fn scroller_insets(&self) -> EdgeInsets {
        self.read(|backend| backend.scroller_insets())
    }

    /// Current zoom in the units of the scroll view's [`crate::Magnification`].
    ///
    /// For relative magnification this divides the native zoom scale by the
    /// current fit multiplier, so the value stays within the configured range
    /// however often the multiplier is recomputed.
    #[must_use]
    pub fn magnification(&self) -> f64 {
        let native = self.read(|backend| backend.magnification());
        native / self.delegate.zoom_multiplier()
    }

    /// Whether a user‑driven zoom is in progress.
    #[must_use]
    pub fn is_live_magnify(&self) -> bool {
        self.read(|backend| backend.is_live_magnify())
    }

    /// Whether dragging selected content past the visible edge scrolls.
    #[must_use]
    pub fn is_autoscroll_enabled(&self) -> bool {
        self.read(|backend| backend.is_autoscroll_enabled())
    }

    /// Enables or disables autoscroll.
    pub fn set_autoscroll_enabled(&self, enabled: bool) {
        self.write(
            |backend| backend.set_autoscroll_enabled(enabled),
            |pending| pending.autoscroll_enabled = Some(enabled),
        );
    }

    /// Reads every accessor at once, or reports that no backend is bound.
    pub fn try_snapshot(&self) -> Result<ViewportSnapshot> {
        let backend = self.delegate.backend()?;
        let backend = backend.borrow();
        Ok(ViewportSnapshot {
            content_offset: backend.content_offset(),
            content_size: backend.content_size(),
            content_inset: backend.content_inset(),
            visible_rect: backend.visible_rect(),
            scroller_insets: backend.scroller_insets(),
            magnification: backend.magnification() / self.delegate.zoom_multiplier(),
            is_live_magnify: backend.is_live_magnify(),
            is_autoscroll_enabled: backend.is_autoscroll_enabled(),
        })
    }

    fn read<R>(&self, f: impl FnOnce(&dyn ViewportBackend) -> R) -> R {
        match self.delegate.backend() {
            Ok(backend) => {
                let backend = backend.borrow();
                f(&*backend)
            }
            Err(err) => panic!("{err}"),
        }
    }

    fn write(
        &self,
        apply: impl FnOnce(&mut dyn ViewportBackend),
        buffer: impl FnOnce(&mut PendingWrites),
    ) {
        match self.delegate.backend() {
            Ok(backend) => {
                let mut backend = backend.borrow_mut();
                apply(&mut *backend);
            }
            Err(_) => buffer(&mut self.delegate.pending.borrow_mut()),
        }
    }
}

impl fmt::Debug for ScrollViewProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollViewProxy")
            .field("delegate", &self.delegate)
            .finish()
    }
}

/// Every proxy accessor, read at one point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSnapshot {
    /// Current scroll offset.
    pub content_offset: Point,
    /// Size of the scrolled content.
    pub content_size: Size,
    /// Insets added around the content.
    pub content_inset: EdgeInsets,
    /// Currently visible rectangle.
    pub visible_rect: Rect,
    /// Space reserved for scroll bars.
    pub scroller_insets: EdgeInsets,
    /// Current zoom in the scroll view's magnification units.
    pub magnification: f64,
    /// Whether a user‑driven zoom is in progress.
    pub is_live_magnify: bool,
    /// Whether autoscroll is enabled.
    pub is_autoscroll_enabled: bool,
}
