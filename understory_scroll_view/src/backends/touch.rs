// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zooming scroll surface in the touch style.
//!
//! The content view is scaled by the zoom scale and the scroll offset lives
//! in that scaled space: `visible_rect` is the scroll view's bounds, and
//! `content_size` is the scaled content plus the centering margins. When the
//! scaled content is smaller than the frame it is centered on that axis, and
//! location conversion into content coordinates takes the margin into
//! account.

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::backend::{ScrollSurface, ViewportBackend};
use crate::geometry::{EdgeInsets, centering_offset, clamp_point, overshoot};
use crate::gesture::PointerEvent;
use crate::live::LiveMagnify;

/// Headless model of a touch scroll view with pinch zoom.
#[derive(Clone, Debug)]
pub struct TouchBackend {
    frame: Size,
    document: Size,
    content_offset: Point,
    zoom_scale: f64,
    min_zoom_scale: f64,
    max_zoom_scale: f64,
    content_inset: EdgeInsets,
    indicators_visible: bool,
    is_zooming: bool,
    is_zoom_bouncing: bool,
    autoscroll_enabled: bool,
    autoscroll_step: Option<f64>,
}

impl TouchBackend {
    /// Creates a surface with the given frame size and an empty document.
    ///
    /// Zoom starts at `1.0` with limits `[1.0, 1.0]`, like a freshly created
    /// native scroll view.
    #[must_use]
    pub fn new(frame: Size) -> Self {
        Self {
            frame,
            document: Size::ZERO,
            content_offset: Point::ORIGIN,
            zoom_scale: 1.0,
            min_zoom_scale: 1.0,
            max_zoom_scale: 1.0,
            content_inset: EdgeInsets::ZERO,
            indicators_visible: true,
            is_zooming: false,
            is_zoom_bouncing: false,
            autoscroll_enabled: true,
            autoscroll_step: None,
        }
    }

    /// Reports whether a pinch is in progress.
    pub fn set_zooming(&mut self, zooming: bool) {
        self.is_zooming = zooming;
    }

    /// Reports whether the zoom is bouncing back into its limits.
    pub fn set_zoom_bouncing(&mut self, bouncing: bool) {
        self.is_zoom_bouncing = bouncing;
    }

    /// Whether scroll indicators are shown.
    #[must_use]
    pub fn indicators_visible(&self) -> bool {
        self.indicators_visible
    }

    /// Caps how far a single autoscroll call moves, in points per axis.
    pub fn set_autoscroll_step(&mut self, step: Option<f64>) {
        self.autoscroll_step = step.map(f64::abs);
    }

    /// Margins that center undersized content, in scaled space.
    #[must_use]
    pub fn centering(&self) -> Vec2 {
        centering_offset(self.frame, self.scaled_document())
    }

    fn scaled_document(&self) -> Size {
        self.document * self.zoom_scale
    }

    /// Content → frame: scale, shift by the centering margin, then back by the offset.
    fn content_to_frame(&self) -> Affine {
        Affine::translate(self.centering() - self.content_offset.to_vec2())
            * Affine::scale(self.zoom_scale)
    }

    fn scroll_offset_to(&mut self, offset: Point) -> bool {
        let content = self.content_size();
        let range = self.content_inset.outset_rect(Rect::new(
            0.0,
            0.0,
            content.width - self.frame.width,
            content.height - self.frame.height,
        ));
        let clamped = clamp_point(offset, range);
        if clamped == self.content_offset {
            return false;
        }
        self.content_offset = clamped;
        true
    }
}

impl ViewportBackend for TouchBackend {
    /// Scrolls the minimum distance that makes `rect` fully visible.
    ///
    /// If `rect` is larger than the frame on an axis, its leading edge wins.
    fn scroll_to(&mut self, rect: Rect, _animated: bool) {
        fn axis(min: f64, max: f64, visible_min: f64, visible_max: f64) -> f64 {
            if min < visible_min {
                min - visible_min
            } else if max > visible_max {
                (max - visible_max).min(min - visible_min)
            } else {
                0.0
            }
        }
        let visible = self.visible_rect();
        let delta = Vec2::new(
            axis(rect.x0, rect.x1, visible.x0, visible.x1),
            axis(rect.y0, rect.y1, visible.y0, visible.y1),
        );
        self.scroll_offset_to(self.content_offset + delta);
    }

    fn content_offset(&self) -> Point {
        self.content_offset
    }

    fn set_content_offset(&mut self, offset: Point) {
        self.scroll_offset_to(offset);
    }

    fn content_size(&self) -> Size {
        let margin = self.centering() * 2.0;
        let scaled = self.scaled_document();
        Size::new(scaled.width + margin.x, scaled.height + margin.y)
    }

    fn content_inset(&self) -> EdgeInsets {
        self.content_inset
    }

    fn set_content_inset(&mut self, inset: EdgeInsets) {
        self.content_inset = inset;
        self.scroll_offset_to(self.content_offset);
    }

    fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.content_offset, self.frame)
    }

    fn scroller_insets(&self) -> EdgeInsets {
        EdgeInsets::ZERO
    }

    fn magnification(&self) -> f64 {
        self.zoom_scale
    }

    fn is_live_magnify(&self) -> bool {
        LiveMagnify::from_zoom_flags(self.is_zooming, self.is_zoom_bouncing).is_active()
    }

    fn is_autoscroll_enabled(&self) -> bool {
        self.autoscroll_enabled
    }

    fn set_autoscroll_enabled(&mut self, enabled: bool) {
        self.autoscroll_enabled = enabled;
    }
}

impl ScrollSurface for TouchBackend {
    fn set_scroll_indicators_visible(&mut self, visible: bool) {
        self.indicators_visible = visible;
    }

    fn viewport_size(&self) -> Size {
        self.frame
    }

    fn set_viewport_size(&mut self, size: Size) {
        self.frame = size;
        self.scroll_offset_to(self.content_offset);
    }

    fn document_size(&self) -> Size {
        self.document
    }

    fn set_document_size(&mut self, size: Size) {
        self.document = size;
        self.scroll_offset_to(self.content_offset);
    }

    fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom_scale, self.max_zoom_scale)
    }

    fn set_zoom_limits(&mut self, min: f64, max: f64) -> bool {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_zoom_scale = min;
        self.max_zoom_scale = max;
        self.set_zoom_scale(self.zoom_scale)
    }

    /// Zooms keeping the content point under the frame center fixed.
    fn set_zoom_scale(&mut self, scale: f64) -> bool {
        let clamped = scale.clamp(self.min_zoom_scale, self.max_zoom_scale);
        if clamped.to_bits() == self.zoom_scale.to_bits() {
            return false;
        }
        let anchor = self.document_visible_rect().center();
        self.zoom_scale = clamped;
        let half = Vec2::new(self.frame.width, self.frame.height) / 2.0;
        let offset = (anchor.to_vec2() * clamped + self.centering() - half).to_point();
        self.scroll_offset_to(offset);
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
        self.scroll_offset_to(self.content_offset + past)
    }

    fn document_visible_rect(&self) -> Rect {
        self.content_to_frame()
            .inverse()
            .transform_rect_bbox(Rect::from_origin_size(Point::ORIGIN, self.frame))
    }

    /// `point` is relative to the frame, not to the scrolled bounds.
    fn surface_to_content(&self, point: Point) -> Point {
        self.content_to_frame().inverse() * point
    }
}
