// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry helpers shared by the proxy, the gesture recognizers and the backends.
//!
//! Coordinates follow the flipped UI convention: `y` grows downward, so the
//! "top" edge of a rectangle is its minimum `y`.
//!
//! Point and vector arithmetic comes straight from Kurbo (`Point - Point` is a
//! [`Vec2`], `Point + Vec2` is a [`Point`]); this module only adds the pieces
//! Kurbo does not model directly.

use bitflags::bitflags;
use kurbo::{Insets, Point, Rect, Size, Vec2};

/// Proposal used to measure content without constraining it.
///
/// Content measured against this size reports its natural size.
pub const UNBOUNDED: Size = Size::new(f64::MAX, f64::MAX);

/// Insets expressed with leading/trailing edges, as the declarative layer uses them.
///
/// In left‑to‑right layouts `leading` is the left edge and `trailing` the right
/// edge. Conversions to and from [`kurbo::Insets`] use that mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    /// Inset from the top edge.
    pub top: f64,
    /// Inset from the leading edge.
    pub leading: f64,
    /// Inset from the bottom edge.
    pub bottom: f64,
    /// Inset from the trailing edge.
    pub trailing: f64,
}

impl EdgeInsets {
    /// No insets on any edge.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates insets from the four edge values.
    #[must_use]
    pub const fn new(top: f64, leading: f64, bottom: f64, trailing: f64) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }

    /// Creates insets with the same value on every edge.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Divides every edge by `factor`, converting frame points to document units.
    #[must_use]
    pub fn scaled_down(&self, factor: f64) -> Self {
        Self::new(
            self.top / factor,
            self.leading / factor,
            self.bottom / factor,
            self.trailing / factor,
        )
    }

    /// Grows `rect` by these insets.
    ///
    /// The backends use this to widen the scroll range so inset content can
    /// be scrolled fully into view.
    #[must_use]
    pub fn outset_rect(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x0 - self.leading,
            rect.y0 - self.top,
            rect.x1 + self.trailing,
            rect.y1 + self.bottom,
        )
    }
}

impl From<Insets> for EdgeInsets {
    fn from(insets: Insets) -> Self {
        Self::new(insets.y0, insets.x0, insets.y1, insets.x1)
    }
}

impl From<EdgeInsets> for Insets {
    fn from(insets: EdgeInsets) -> Self {
        Self::new(insets.leading, insets.top, insets.trailing, insets.bottom)
    }
}

/// Returns `true` if both dimensions of `size` are strictly positive.
///
/// NaN dimensions are not positive.
#[must_use]
pub fn is_positive(size: Size) -> bool {
    size.width > 0.0 && size.height > 0.0
}

/// Uniform scale that fits `content` inside `viewport`, preserving aspect ratio.
///
/// Returns `None` for degenerate input: a zero, negative or NaN dimension on
/// either side, or a ratio that does not come out finite and positive.
#[must_use]
pub fn fit_ratio(viewport: Size, content: Size) -> Option<f64> {
    if !is_positive(viewport) || !is_positive(content) {
        return None;
    }
    let ratio = (viewport.width / content.width).min(viewport.height / content.height);
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}

/// Offset that centers `content` inside `viewport` on each axis where it is smaller.
///
/// Axes where the content is at least as large as the viewport get `0.0`.
#[must_use]
pub fn centering_offset(viewport: Size, content: Size) -> Vec2 {
    Vec2::new(
        ((viewport.width - content.width) * 0.5).max(0.0),
        ((viewport.height - content.height) * 0.5).max(0.0),
    )
}

bitflags! {
    /// A set of rectangle edges.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// The minimum‑`y` edge.
        const TOP = 0b0001;
        /// The minimum‑`x` edge.
        const LEFT = 0b0010;
        /// The maximum‑`y` edge.
        const BOTTOM = 0b0100;
        /// The maximum‑`x` edge.
        const RIGHT = 0b1000;
    }
}

/// Edges of `rect` that `point` lies beyond.
///
/// Each axis is checked independently, so a point past a corner reports two edges.
#[must_use]
pub fn edges_outside(point: Point, rect: Rect) -> Edges {
    let mut edges = Edges::empty();
    if point.y < rect.min_y() {
        edges |= Edges::TOP;
    }
    if point.x < rect.min_x() {
        edges |= Edges::LEFT;
    }
    if point.y > rect.max_y() {
        edges |= Edges::BOTTOM;
    }
    if point.x > rect.max_x() {
        edges |= Edges::RIGHT;
    }
    edges
}

/// Signed distance by which `point` lies outside `rect` on each axis.
///
/// Negative components point past the top/left edges, positive ones past the
/// bottom/right edges, and an axis where the point is inside yields `0.0`.
#[must_use]
pub fn overshoot(point: Point, rect: Rect) -> Vec2 {
    fn axis(value: f64, min: f64, max: f64) -> f64 {
        if value < min {
            value - min
        } else if value > max {
            value - max
        } else {
            0.0
        }
    }
    Vec2::new(
        axis(point.x, rect.min_x(), rect.max_x()),
        axis(point.y, rect.min_y(), rect.max_y()),
    )
}

/// Clamps one axis of a scroll offset into `[min, max]`, pinning to `min`
/// when the range is empty (content smaller than the viewport).
pub(crate) fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max.max(min))
}

/// Clamps a scroll offset into `range` one axis at a time.
pub(crate) fn clamp_point(point: Point, range: Rect) -> Point {
    Point::new(
        clamp_axis(point.x, range.x0, range.x1),
        clamp_axis(point.y, range.y0, range.y1),
    )
}
