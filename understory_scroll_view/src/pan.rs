// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan recognizer with autoscroll follow.
//!
//! ## Translation correction
//!
//! While the user drags selected content past the visible edge, the surface
//! autoscrolls: the content moves under a pointer that itself stays put on
//! screen. The raw translation measured by the input system does not see
//! that movement, so the handler would observe a jump once the drag resumes
//! inside the viewport. [`PanRecognizer`] keeps a running
//! `translation_offset` equal to the total shift of the visible origin caused
//! by its own autoscroll requests and always reports
//! `raw_translation + translation_offset`.
//!
//! ## Phase handling
//!
//! - `Possible` is answered by [`PanRecognizer::should_begin`]; a `false`
//!   answer means no `Began` for the current physical gesture.
//! - `Began` and `Changed` store the handler's answer as the
//!   "content selected" flag that enables autoscroll follow.
//! - `Ended` and `Cancelled` are delivered and then the recognizer resets to
//!   `Possible` with all accumulated state cleared.

use core::cell::RefCell;

use kurbo::{Point, Vec2};
use tracing::trace;

use crate::backend::ScrollSurface;
use crate::geometry::edges_outside;
use crate::gesture::{GesturePhase, PanHandler, PointerEvent};
use crate::proxy::ScrollViewProxy;

/// State machine for one pan gesture stream.
#[derive(Clone, Debug, Default)]
pub struct PanRecognizer {
    phase: GesturePhase,
    translation_offset: Vec2,
    is_content_selected: bool,
    last_event: Option<PointerEvent>,
}

impl PanRecognizer {
    /// A recognizer in the `Possible` phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase of the gesture in flight, `Possible` when idle.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Correction added to raw translations so far.
    #[must_use]
    pub fn translation_offset(&self) -> Vec2 {
        self.translation_offset
    }

    /// Whether the handler asked for autoscroll follow.
    #[must_use]
    pub fn is_content_selected(&self) -> bool {
        self.is_content_selected
    }

    /// Most recent raw drag event, used to re-issue autoscroll.
    #[must_use]
    pub fn last_event(&self) -> Option<PointerEvent> {
        self.last_event
    }

    /// Remembers the latest raw drag event.
    pub fn record_event(&mut self, event: PointerEvent) {
        self.last_event = Some(event);
    }

    /// Asks the handler whether the gesture may begin.
    pub fn should_begin(
        &mut self,
        handler: &PanHandler,
        location: Point,
        raw_translation: Vec2,
        proxy: &ScrollViewProxy,
    ) -> bool {
        debug_assert_eq!(
            self.phase,
            GesturePhase::Possible,
            "pan recognizer asked to begin while already active"
        );
        let allowed = handler(GesturePhase::Possible, location, raw_translation, proxy);
        trace!(allowed, "pan possible");
        if !allowed {
            self.reset();
        }
        allowed
    }

    /// Delivers `phase` to the handler and updates the state machine.
    ///
    /// `location` is in content coordinates and `raw_translation` is the
    /// input system's translation in content units, both measured before any
    /// autoscroll this call performs. The handler sees both moved by the
    /// autoscroll shift, so `location` stays under the pointer. Returns the
    /// translation that was reported to the handler, or `None` if nothing was
    /// delivered.
    ///
    /// The surface is only borrowed for the autoscroll step; the handler runs
    /// with the surface released so it can use the proxy freely.
    pub fn advance(
        &mut self,
        phase: GesturePhase,
        location: Point,
        raw_translation: Vec2,
        surface: &RefCell<dyn ScrollSurface>,
        handler: &PanHandler,
        proxy: &ScrollViewProxy,
    ) -> Option<Vec2> {
        let mut location = location;
        match phase {
            GesturePhase::Possible => {
                self.reset();
                return None;
            }
            GesturePhase::Began => {
                self.translation_offset = Vec2::ZERO;
                self.is_content_selected = false;
            }
            GesturePhase::Changed => {
                if !self.phase.is_active() {
                    return None;
                }
                if self.is_content_selected {
                    location += self.follow_edges(location, surface);
                }
            }
            GesturePhase::Cancelled | GesturePhase::Ended => {
                if !self.phase.is_active() {
                    self.reset();
                    return None;
                }
            }
        }

        let translation = raw_translation + self.translation_offset;
        let selected = handler(phase, location, translation, proxy);
        trace!(?phase, ?translation, selected, "pan delivered");

        if phase.is_terminal() {
            self.reset();
        } else {
            self.phase = phase;
            self.is_content_selected = selected;
        }
        Some(translation)
    }

    /// Returns to `Possible` and clears all accumulated state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Autoscrolls if `location` is past a visible edge and returns the shift
    /// of the visible origin, in content units.
    fn follow_edges(&mut self, location: Point, surface: &RefCell<dyn ScrollSurface>) -> Vec2 {
        let Some(event) = self.last_event else {
            return Vec2::ZERO;
        };
        let mut surface = surface.borrow_mut();
        if !surface.is_autoscroll_enabled() {
            return Vec2::ZERO;
        }
        let before = surface.document_visible_rect();
        let edges = edges_outside(location, before);
        if edges.is_empty() || !surface.autoscroll(&event) {
            return Vec2::ZERO;
        }
        let shift = surface.document_visible_rect().origin() - before.origin();
        self.translation_offset += shift;
        trace!(?edges, ?shift, offset = ?self.translation_offset, "pan autoscrolled");
        shift
    }
}
