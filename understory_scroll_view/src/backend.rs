// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits implemented by platform scroll surfaces.
//!
//! [`ViewportBackend`] is the accessor set the [`crate::ScrollViewProxy`]
//! forwards to. [`ScrollSurface`] extends it with the operations only the
//! mounted container drives: sizing, zoom limits, autoscroll and coordinate
//! conversion.
//!
//! Implementations own the viewport state. The container never keeps a copy
//! of it, so every read reflects what the surface currently shows.

use kurbo::{Point, Rect, Size};

use crate::geometry::EdgeInsets;
use crate::gesture::PointerEvent;

/// Viewport accessors exposed to application code through the proxy.
pub trait ViewportBackend {
    /// Scrolls so that `rect` becomes visible.
    ///
    /// How much of `rect` ends up visible is platform specific; see the
    /// backend implementations.
    fn scroll_to(&mut self, rect: Rect, animated: bool);

    /// Current scroll offset.
    fn content_offset(&self) -> Point;

    /// Scrolls to `offset`, clamped to the scrollable range.
    fn set_content_offset(&mut self, offset: Point);

    /// Size of the scrolled content as the platform reports it.
    fn content_size(&self) -> Size;

    /// Insets added around the content.
    fn content_inset(&self) -> EdgeInsets;

    /// Replaces the content insets.
    fn set_content_inset(&mut self, inset: EdgeInsets);

    /// Currently visible rectangle, in the platform's visible‑rect space.
    fn visible_rect(&self) -> Rect;

    /// Space reserved for scroll bars.
    fn scroller_insets(&self) -> EdgeInsets;

    /// Native zoom scale.
    fn magnification(&self) -> f64;

    /// Whether a user‑driven zoom is in progress.
    fn is_live_magnify(&self) -> bool;

    /// Whether dragging past the visible edge scrolls the content.
    fn is_autoscroll_enabled(&self) -> bool;

    /// Enables or disables autoscroll.
    fn set_autoscroll_enabled(&mut self, enabled: bool);
}

/// Operations the mounted container performs on a platform scroll surface.
pub trait ScrollSurface: ViewportBackend {
    /// Shows or hides scroll indicators.
    fn set_scroll_indicators_visible(&mut self, visible: bool);

    /// Size of the scroll view's frame.
    fn viewport_size(&self) -> Size;

    /// Resizes the scroll view's frame.
    fn set_viewport_size(&mut self, size: Size);

    /// Natural (unzoomed) size of the hosted content.
    fn document_size(&self) -> Size;

    /// Sets the natural size of the hosted content.
    fn set_document_size(&mut self, size: Size);

    /// Native zoom limits as `(min, max)`.
    fn zoom_limits(&self) -> (f64, f64);

    /// Replaces the native zoom limits.
    ///
    /// Returns `true` if the current zoom scale had to change to respect the
    /// new limits.
    fn set_zoom_limits(&mut self, min: f64, max: f64) -> bool;

    /// Sets the native zoom scale, clamped to the limits.
    ///
    /// Returns `true` if the scale changed, which is when the platform would
    /// post its zoom‑change notification.
    fn set_zoom_scale(&mut self, scale: f64) -> bool;

    /// Scrolls toward `event`'s position if it lies outside the frame.
    ///
    /// Returns `true` if the content moved.
    fn autoscroll(&mut self, event: &PointerEvent) -> bool;

    /// Visible rectangle in content coordinates.
    ///
    /// This is the space pan locations and translations are reported in.
    fn document_visible_rect(&self) -> Rect;

    /// Converts a point from surface (frame) coordinates into content coordinates.
    fn surface_to_content(&self, point: Point) -> Point;
}
