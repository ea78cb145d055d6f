// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the scroll view.

use thiserror::Error;

/// Errors reported by the scroll view.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum Error {
    /// A proxy accessor was used before any backend was bound to it.
    ///
    /// Getters on [`crate::ScrollViewProxy`] treat this as a programmer error
    /// and panic with this message; [`crate::ScrollViewProxy::try_snapshot`]
    /// returns it instead.
    #[error("scroll view proxy used before a backend was attached")]
    NotAttached,

    /// The magnification range has its bounds the wrong way around.
    #[error("magnification range {min}..={max} is inverted")]
    InvalidRange {
        /// Lower bound as given.
        min: f64,
        /// Upper bound as given.
        max: f64,
    },

    /// The magnification range includes zero or negative values.
    #[error("magnification range {min}..={max} must be strictly positive")]
    NonPositiveRange {
        /// Lower bound as given.
        min: f64,
        /// Upper bound as given.
        max: f64,
    },

    /// A magnification value was NaN or infinite.
    #[error("magnification values must be finite")]
    NonFinite,

    /// The initial magnification lies outside the configured range.
    #[error("initial magnification {initial} is outside {min}..={max}")]
    InitialOutOfRange {
        /// Initial value as given.
        initial: f64,
        /// Lower bound of the range.
        min: f64,
        /// Upper bound of the range.
        max: f64,
    },
}

/// Result type for scroll view operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;
