// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Allowed zoom range and starting zoom for a scroll view.
///
/// A `Magnification` is fixed when the container is constructed. In
/// *absolute* mode its values are handed to the backend as native zoom
/// scales. In *relative* mode they are expressed in units of the fit ratio
/// (the scale at which the content exactly fits the viewport), so `1.0` means
/// "fit" regardless of how large the content or the viewport is. See
/// [`crate::ZoomFit`] for how relative values are turned into native ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Magnification {
    min: f64,
    max: f64,
    initial: f64,
    is_relative: bool,
}

impl Magnification {
    /// Creates a magnification configuration.
    ///
    /// Both bounds must be finite and strictly positive with `min <= max`, and
    /// `initial` must lie within the range.
    pub fn new(range: RangeInclusive<f64>, initial: f64, is_relative: bool) -> Result<Self> {
        let (min, max) = range.into_inner();
        if !(min.is_finite() && max.is_finite() && initial.is_finite()) {
            return Err(Error::NonFinite);
        }
        if min <= 0.0 || max <= 0.0 {
            return Err(Error::NonPositiveRange { min, max });
        }
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }
        if !(min..=max).contains(&initial) {
            return Err(Error::InitialOutOfRange { initial, min, max });
        }
        Ok(Self {
            min,
            max,
            initial,
            is_relative,
        })
    }

    /// Creates a configuration whose values are native zoom scales.
    pub fn absolute(range: RangeInclusive<f64>, initial: f64) -> Result<Self> {
        Self::new(range, initial, false)
    }

    /// Creates a configuration whose values are relative to the fit ratio.
    pub fn relative(range: RangeInclusive<f64>, initial: f64) -> Result<Self> {
        Self::new(range, initial, true)
    }

    /// Lower bound of the zoom range.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the zoom range.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// The zoom range as an inclusive range.
    #[must_use]
    pub fn range(&self) -> RangeInclusive<f64> {
        self.min..=self.max
    }

    /// Zoom applied when the container first appears.
    #[must_use]
    pub fn initial(&self) -> f64 {
        self.initial
    }

    /// Whether values are relative to the fit ratio rather than absolute.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        self.is_relative
    }

    /// Clamps `value` into the configured range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Native zoom limits for a given fit multiplier.
    #[must_use]
    pub fn scaled_limits(&self, multiplier: f64) -> (f64, f64) {
        (self.min * multiplier, self.max * multiplier)
    }
}

impl Default for Magnification {
    /// `1.0..=4.0`, starting at `1.0`, relative to the fit ratio.
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 4.0,
            initial: 1.0,
            is_relative: true,
        }
    }
}
