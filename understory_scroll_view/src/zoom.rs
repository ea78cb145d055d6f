// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom‑to‑fit arithmetic for relative magnification.
//!
//! In relative mode a [`Magnification`] range is expressed in units of the
//! *fit multiplier*: the native zoom scale at which the content exactly fits
//! the viewport, `min(viewport.w / content.w, viewport.h / content.h)`.
//! [`ZoomFit`] tracks that multiplier together with the user's zoom in
//! relative units and produces [`ZoomUpdate`]s for the backend whenever the
//! viewport or content size changes.
//!
//! When a recompute yields a multiplier bit‑identical to the previous one,
//! the multiplier used for the native scale is moved by [`ZOOM_NUDGE`] so the
//! backend still sees a scale change and posts its zoom notification. The
//! nudge goes up unless that would push the scale past the native maximum, in
//! which case it goes down. The native limits always use the exact multiplier.

use kurbo::Size;
use tracing::debug;

use crate::geometry::fit_ratio;
use crate::magnification::Magnification;

/// Amount an unchanged multiplier is moved by to force a native zoom change.
pub const ZOOM_NUDGE: f64 = 1e-4;

/// Lifecycle of the fit computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FitState {
    /// No bounds have been applied yet.
    #[default]
    Idle,
    /// Native bounds match the current multiplier.
    BoundsKnown,
    /// A recompute was produced and has not been applied yet.
    Recomputing,
}

/// Native zoom configuration to push to a backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomUpdate {
    /// Native minimum zoom scale.
    pub min: f64,
    /// Native maximum zoom scale.
    pub max: f64,
    /// Native zoom scale to apply.
    pub scale: f64,
    /// Multiplier the reported magnification is divided by.
    pub multiplier: f64,
    /// The fit ratio the update was computed from, before any nudge.
    pub fit: f64,
}

/// Zoom range controller for one scroll view.
#[derive(Clone, Copy, Debug)]
pub struct ZoomFit {
    magnification: Magnification,
    multiplier: f64,
    zoom: f64,
    state: FitState,
}

impl ZoomFit {
    /// Creates a controller starting at the configuration's initial zoom.
    #[must_use]
    pub fn new(magnification: Magnification) -> Self {
        Self {
            magnification,
            multiplier: 1.0,
            zoom: magnification.initial(),
            state: FitState::Idle,
        }
    }

    /// The configuration this controller was built from.
    #[must_use]
    pub fn magnification(&self) -> Magnification {
        self.magnification
    }

    /// Current multiplier, including any nudge.
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> FitState {
        self.state
    }

    /// The user's zoom in the configuration's units.
    #[must_use]
    pub fn user_magnification(&self) -> f64 {
        self.zoom
    }

    /// Native bounds and scale for the moment the view is attached.
    ///
    /// Uses the current multiplier, which is `1.0` until the first recompute,
    /// so absolute configurations pass straight through.
    pub fn attach(&mut self) -> ZoomUpdate {
        let (min, max) = self.magnification.scaled_limits(self.multiplier);
        self.state = FitState::BoundsKnown;
        ZoomUpdate {
            min,
            max,
            scale: self.zoom * self.multiplier,
            multiplier: self.multiplier,
            fit: self.multiplier,
        }
    }

    /// Recomputes the multiplier for new viewport or content sizes.
    ///
    /// Returns `None` without touching any state when the configuration is
    /// absolute, when [`ZoomFit::attach`] has not run yet, or when either size
    /// is degenerate.
    pub fn bounds_changed(&mut self, viewport: Size, content: Size) -> Option<ZoomUpdate> {
        if !self.magnification.is_relative() {
            return None;
        }
        if self.state == FitState::Idle {
            debug!("zoom fit skipped: not attached");
            return None;
        }
        let Some(fit) = fit_ratio(viewport, content) else {
            debug!(?viewport, ?content, "zoom fit skipped: degenerate geometry");
            return None;
        };

        let (min, max) = self.magnification.scaled_limits(fit);
        let multiplier = if fit.to_bits() != self.multiplier.to_bits() {
            fit
        } else if self.zoom * (fit + ZOOM_NUDGE) > max && fit > ZOOM_NUDGE {
            // Nudging up would be clamped back to the same native scale.
            fit - ZOOM_NUDGE
        } else {
            fit + ZOOM_NUDGE
        };
        self.multiplier = multiplier;
        self.state = FitState::Recomputing;
        let update = ZoomUpdate {
            min,
            max,
            scale: self.zoom * multiplier,
            multiplier,
            fit,
        };
        debug!(?update, "zoom fit recomputed");
        Some(update)
    }

    /// Marks the last update as applied to the backend.
    pub fn applied(&mut self) {
        if self.state == FitState::Recomputing {
            self.state = FitState::BoundsKnown;
        }
    }

    /// Folds a native zoom change back into the user's zoom.
    ///
    /// Returns the new user zoom, kept within the configured range. A zero
    /// multiplier is treated as `1.0`.
    pub fn did_zoom(&mut self, native: f64) -> f64 {
        let multiplier = if self.multiplier != 0.0 {
            self.multiplier
        } else {
            1.0
        };
        self.zoom = self.magnification.clamp(native / multiplier);
        self.zoom
    }
}
