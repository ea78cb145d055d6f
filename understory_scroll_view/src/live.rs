// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Tracks whether a user‑driven zoom is in flight.
///
/// Desktop surfaces learn about live magnification from a pair of
/// notifications and drive this through [`LiveMagnify::will_start`] and
/// [`LiveMagnify::did_end`]. Touch surfaces only expose "zooming" and
/// "bouncing" flags and derive the same answer with
/// [`LiveMagnify::from_zoom_flags`]. Programmatic zoom changes affect neither.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiveMagnify {
    active: bool,
}

impl LiveMagnify {
    /// Not magnifying.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the state from a touch surface's zoom flags.
    #[must_use]
    pub fn from_zoom_flags(is_zooming: bool, is_zoom_bouncing: bool) -> Self {
        Self {
            active: is_zooming || is_zoom_bouncing,
        }
    }

    /// A live magnification started.
    pub fn will_start(&mut self) {
        self.active = true;
    }

    /// The live magnification ended.
    pub fn did_end(&mut self) {
        self.active = false;
    }

    /// `true` while a user‑driven zoom is in flight.
    #[must_use]
    pub fn is_active(self) -> bool {
        self.active
    }
}
