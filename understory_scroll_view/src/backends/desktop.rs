// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip‑view style scroll surface.
//!
//! The document keeps its natural size and is viewed through a clip region
//! whose bounds origin is the scroll offset, in document coordinates.
//! Magnification shrinks the clip bounds: at zoom `m` the clip shows
//! `frame / m` document units. The visible rect, the content offset and
//! `scroll_to` all work in document coordinates.

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::backend::{ScrollSurface, ViewportBackend};
use crate::geometry::{EdgeInsets, clamp_point, overshoot};
use crate::gesture::PointerEvent;
use crate::live::LiveMagnify;

/// Headless model of a desktop scroll view with magnification.
#[derive(Clone, Debug)]
pub struct DesktopBackend {
    frame: Size,
    document: Size,
    origin: Point,
    magnification: f64,
    min_magnification: f64,
    max_magnification: f64,
    content_insets: EdgeInsets,
    scroller_insets: EdgeInsets,
    has_scrollers: bool,
    live: LiveMagnify,
    autoscroll_enabled: bool,
    autoscroll_step: Option<f64>,
    document_to_frame: Affine,
    frame_to_document: Affine,
}

impl DesktopBackend {
    /// Creates a surface with the given frame size and an empty document.
    ///
    /// Magnification starts at `1.0` with limits `[0.25, 4.0]`, scrollers are
    /// shown and autoscroll is enabled.
    #[must_use]
    pub fn new(frame: Size) -> Self {
        let mut backend = Self {
            frame,
            document: Size::ZERO,
            origin: Point::ORIGIN,
            magnification: 1.0,
            min_magnification: 0.25,
            max_magnification: 4.0,
            content_insets: EdgeInsets::ZERO,
            scroller_insets: EdgeInsets::ZERO,
            has_scrollers: true,
            live: LiveMagnify::new(),
            autoscroll_enabled: true,
            autoscroll_step: None,
            document_to_frame: Affine::IDENTITY,
            frame_to_document: Affine::IDENTITY,
        };
        backend.rebuild_transforms();
        backend
    }

    /// The "will start live magnify" notification.
    pub fn will_start_live_magnify(&mut self) {
        self.live.will_start();
    }

    /// The "did end live magnify" notification.
    pub fn did_end_live_magnify(&mut self) {
        self.live.did_end();
    }

    /// Sets the space reserved for scroll bars.
    pub fn set_scroller_insets(&mut self, insets: EdgeInsets) {
        self.scroller_insets = insets;
    }

    /// Whether scroll bars are shown.
    #[must_use]
    pub fn has_scrollers(&self) -> bool {
        self.has_scrollers
    }

    /// Caps how far a single autoscroll call moves, in frame points per axis.
    ///
    /// `None` scrolls by the full distance the pointer is past the frame.
    pub fn set_autoscroll_step(&mut self, step: Option<f64>) {
        self.autoscroll_step = step.map(f64::abs);
    }

    /// Size of the clip region in document coordinates.
    fn visible_size(&self) -> Size {
        self.frame / self.magnification
    }

    fn scroll_origin_to(&mut self, origin: Point) -> bool {
        let visible = self.visible_size();
        let range = self
            .content_insets
            .scaled_down(self.magnification)
            .outset_rect(Rect::new(
                0.0,
                0.0,
                self.document.width - visible.width,
                self.document.height - visible.height,
            ));
        let clamped = clamp_point(origin, range);
        if clamped == self.origin {
            return false;
        }
        self.origin = clamped;
        self.rebuild_transforms();
        true
    }

    fn rebuild_transforms(&mut self) {
        // Document → frame: shift by the clip origin, then magnify.
        self.document_to_frame =
            Affine::scale(self.magnification) * Affine::translate(-self.origin.to_vec2());
        self.frame_to_document = self.document_to_frame.inverse();
    }
}

impl ViewportBackend for DesktopBackend {
    /// Centers the clip region on the center of `rect`.
    fn scroll_to(&mut self, rect: Rect, _animated: bool) {
        let half = self.visible_size() / 2.0;
        let center = rect.center();
        self.scroll_origin_to(Point::new(center.x - half.width, center.y - half.height));
    }

    fn content_offset(&self) -> Point {
        self.origin
    }

    fn set_content_offset(&mut self, offset: Point) {
        self.scroll_origin_to(offset);
    }

    fn content_size(&self) -> Size {
        self.document
    }

    fn content_inset(&self) -> EdgeInsets {
        self.content_insets
    }

    fn set_content_inset(&mut self, inset: EdgeInsets) {
        self.content_insets = inset;
        self.scroll_origin_to(self.origin);
    }

    fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.visible_size())
    }

    fn scroller_insets(&self) -> EdgeInsets {
        self.scroller_insets
    }

    fn magnification(&self) -> f64 {
        self.magnification
    }

    fn is_live_magnify(&self) -> bool {
        self.live.is_active()
    }

    fn is_autoscroll_enabled(&self) -> bool {
        self.autoscroll_enabled
    }

    fn set_autoscroll_enabled(&mut self, enabled: bool) {
        self.autoscroll_enabled = enabled;
    }
}

impl ScrollSurface for DesktopBackend {
    fn set_scroll_indicators_visible(&mut self, visible: bool) {
        self.has_scrollers = visible;
    }

    fn viewport_size(&self) -> Size {
        self.frame
    }

    fn set_viewport_size(&mut self, size: Size) {
        if self.frame == size {
            return;
        }
        self.frame = size;
        self.rebuild_transforms();
        self.scroll_origin_to(self.origin);
    }

    fn document_size(&self) -> Size {
        self.document
    }

    fn set_document_size(&mut self, size: Size) {
        self.document = size;
        self.scroll_origin_to(self.origin);
    }

    fn zoom_limits(&self) -> (f64, f64) {
        (self.min_magnification, self.max_magnification)
    }

    fn set_zoom_limits(&mut self, min: f64, max: f64) -> bool {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_magnification = min;
        self.max_magnification = max;
        self.set_zoom_scale(self.magnification)
    }

    /// Magnifies around the center of the clip region.
    fn set_zoom_scale(&mut self, scale: f64) -> bool {
        let clamped = scale.clamp(self.min_magnification, self.max_magnification);
        if clamped.to_bits() == self.magnification.to_bits() {
            return false;
        }
        let center = self.visible_rect().center();
        self.magnification = clamped;
        let half = self.visible_size() / 2.0;
        if !self.scroll_origin_to(Point::new(center.x - half.width, center.y - half.height)) {
            self.rebuild_transforms();
        }
        true
    }

    fn autoscroll(&mut self, event: &PointerEvent) -> bool {
        if !self.autoscroll_enabled {
            return false;
        }
        let bounds = Rect::from_origin_size(Point::ORIGIN, self.frame);
        let mut past = overshoot(event.position, bounds);
        if past == Vec2::ZERO {
            return false;
        }
        if let Some(step) = self.autoscroll_step {
            past = Vec2::new(past.x.clamp(-step, step), past.y.clamp(-step, step));
        }
        self.scroll_origin_to(self.origin + past / self.magnification)
    }

    fn document_visible_rect(&self) -> Rect {
        self.visible_rect()
    }

    fn surface_to_content(&self, point: Point) -> Point {
        self.frame_to_document * point
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size};

    use super::DesktopBackend;
    use crate::geometry::EdgeInsets;
    use crate::gesture::PointerEvent;
    use crate::{ScrollSurface, ViewportBackend};

    fn backend() -> DesktopBackend {
        let mut backend = DesktopBackend::new(Size::new(100.0, 100.0));
        backend.set_document_size(Size::new(1000.0, 1000.0));
        backend
    }

    #[test]
    fn scroll_to_centers_on_the_rect_center() {
        let mut b = backend();
        b.scroll_to(Rect::new(400.0, 400.0, 420.0, 440.0), false);
        assert_eq!(b.visible_rect(), Rect::new(360.0, 370.0, 460.0, 470.0));
    }

    #[test]
    fn scroll_to_is_clamped_to_the_document() {
        let mut b = backend();
        b.scroll_to(Rect::new(980.0, 980.0, 1000.0, 1000.0), false);
        assert_eq!(b.content_offset(), Point::new(900.0, 900.0));
        assert!(b.visible_rect().contains(Point::new(990.0, 990.0)));
    }

    #[test]
    fn insets_extend_the_scroll_range() {
        let mut b = backend();
        b.set_content_inset(EdgeInsets::new(10.0, 20.0, 0.0, 0.0));
        b.set_content_offset(Point::new(-100.0, -100.0));
        assert_eq!(b.content_offset(), Point::new(-20.0, -10.0));
    }

    #[test]
    fn magnification_shrinks_the_visible_rect_around_its_center() {
        let mut b = backend();
        b.set_content_offset(Point::new(100.0, 100.0));
        assert!(b.set_zoom_scale(2.0));
        assert_eq!(b.visible_rect(), Rect::new(125.0, 125.0, 175.0, 175.0));
        assert_eq!(b.surface_to_content(Point::new(50.0, 50.0)), Point::new(150.0, 150.0));
        assert!(!b.set_zoom_scale(2.0));
    }

    #[test]
    fn zoom_limits_are_normalized_and_clamp_the_scale() {
        let mut b = backend();
        assert!(b.set_zoom_limits(3.0, 2.0));
        assert_eq!(b.zoom_limits(), (2.0, 3.0));
        assert_eq!(b.magnification(), 2.0);
        assert!(!b.set_zoom_limits(1.0, 4.0));
    }

    #[test]
    fn autoscroll_moves_by_the_overshoot() {
        let mut b = backend();
        assert!(!b.autoscroll(&PointerEvent::drag((50.0, 50.0))));
        assert!(b.autoscroll(&PointerEvent::drag((120.0, 50.0))));
        assert_eq!(b.content_offset(), Point::new(20.0, 0.0));

        b.set_autoscroll_step(Some(5.0));
        assert!(b.autoscroll(&PointerEvent::drag((50.0, 150.0))));
        assert_eq!(b.content_offset(), Point::new(20.0, 5.0));

        // Already at the top edge: nothing to scroll.
        b.set_content_offset(Point::ORIGIN);
        assert!(!b.autoscroll(&PointerEvent::drag((50.0, -40.0))));
    }

    #[test]
    fn live_magnify_follows_notifications() {
        let mut b = backend();
        b.will_start_live_magnify();
        assert!(b.is_live_magnify());
        b.did_end_live_magnify();
        assert!(!b.is_live_magnify());
    }
}
