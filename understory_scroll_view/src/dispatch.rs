// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live recognizers for the registered content gestures.
//!
//! [`ContentGestures`] turns a [`GestureRegistry`] into at most one tap and
//! one pan recognizer and routes input to them. Two input paths exist:
//!
//! - Raw pointer events via [`ContentGestures::pointer_event`], for hosts
//!   that deliver mouse or touch events directly. Tap counting and the tap/pan
//!   priority are handled here.
//! - Native recognizer callbacks via [`ContentGestures::native_pan`] and
//!   [`ContentGestures::native_tap`], for hosts whose toolkit already runs
//!   its own recognizers.
//!
//! ## Tap versus pan
//!
//! A pan only starts after the tap recognizer has failed. A press fails the
//! tap once it moves further than the slop distance from where it went down;
//! only then is the pan handler asked whether it may begin. A press released
//! within the slop is a tap. The two never fire for the same press.

use core::cell::RefCell;

use kurbo::{Point, Vec2};
use tracing::{debug, trace};

use crate::backend::ScrollSurface;
use crate::gesture::{
    GesturePhase, GestureRegistry, PanGesture, PointerEvent, PointerKind, RecognizerState,
    TapGesture,
};
use crate::pan::PanRecognizer;
use crate::proxy::ScrollViewProxy;

/// Default distance a press may travel and still count as a tap.
pub const DEFAULT_SLOP: f64 = 3.0;

/// How many recognizers of each kind are installed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveRecognizers {
    /// Installed tap recognizers.
    pub taps: usize,
    /// Installed pan recognizers.
    pub pans: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TapState {
    Idle,
    Pressed,
    Failed,
}

#[derive(Debug)]
struct TapRecognizer {
    gesture: TapGesture,
    state: TapState,
}

#[derive(Clone, Copy, Debug)]
struct Press {
    origin: Point,
    pan_gated: bool,
}

/// Recognizer host for one scroll view's content gestures.
#[derive(Debug)]
pub struct ContentGestures {
    tap: Option<TapRecognizer>,
    pan: Option<(PanGesture, PanRecognizer)>,
    press: Option<Press>,
    slop: f64,
}

impl Default for ContentGestures {
    fn default() -> Self {
        Self::with_slop(DEFAULT_SLOP)
    }
}

impl ContentGestures {
    /// A host with no recognizers and the default slop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A host with no recognizers and a custom slop distance, in surface points.
    #[must_use]
    pub fn with_slop(slop: f64) -> Self {
        Self {
            tap: None,
            pan: None,
            press: None,
            slop: slop.abs(),
        }
    }

    /// Slop distance in surface points.
    #[must_use]
    pub fn slop(&self) -> f64 {
        self.slop
    }

    /// Changes the slop distance. A press already in flight uses the new value.
    pub fn set_slop(&mut self, slop: f64) {
        self.slop = slop.abs();
    }

    /// Installs, replaces or removes recognizers to match `registry`.
    ///
    /// A replaced pan handler takes over the gesture in flight; a removed pan
    /// recognizer drops it without a final callback.
    pub fn sync(&mut self, registry: &GestureRegistry) {
        match (registry.tap(), &mut self.tap) {
            (Some(gesture), Some(tap)) => tap.gesture = gesture.clone(),
            (Some(gesture), slot @ None) => {
                debug!(count = gesture.count(), "installed tap recognizer");
                *slot = Some(TapRecognizer {
                    gesture: gesture.clone(),
                    state: TapState::Idle,
                });
            }
            (None, slot @ Some(_)) => {
                debug!("removed tap recognizer");
                *slot = None;
            }
            (None, None) => {}
        }
        match (registry.pan(), &mut self.pan) {
            (Some(gesture), Some((installed, _))) => *installed = gesture.clone(),
            (Some(gesture), slot @ None) => {
                debug!("installed pan recognizer");
                *slot = Some((gesture.clone(), PanRecognizer::new()));
            }
            (None, slot @ Some(_)) => {
                debug!("removed pan recognizer");
                *slot = None;
            }
            (None, None) => {}
        }
    }

    /// Counts the installed recognizers.
    #[must_use]
    pub fn active_recognizers(&self) -> ActiveRecognizers {
        ActiveRecognizers {
            taps: usize::from(self.tap.is_some()),
            pans: usize::from(self.pan.is_some()),
        }
    }

    /// Number of consecutive taps the installed tap recognizer requires.
    #[must_use]
    pub fn tap_count(&self) -> Option<u32> {
        self.tap.as_ref().map(|tap| tap.gesture.count())
    }

    /// The pan recognizer's state machine, if one is installed.
    #[must_use]
    pub fn pan_recognizer(&self) -> Option<&PanRecognizer> {
        self.pan.as_ref().map(|(_, recognizer)| recognizer)
    }

    /// Routes a raw pointer event (in surface coordinates) to the recognizers.
    pub fn pointer_event(
        &mut self,
        event: PointerEvent,
        surface: &RefCell<dyn ScrollSurface>,
        proxy: &ScrollViewProxy,
    ) {
        match event.kind {
            PointerKind::Down => self.pointer_down(event, surface, proxy),
            PointerKind::Drag => self.pointer_drag(event, surface, proxy),
            PointerKind::Up => self.pointer_up(event, surface, proxy),
            PointerKind::Cancel => {
                if self.pan_is_active() {
                    let (location, raw) = self.measure(event.position, surface);
                    self.deliver_pan(GesturePhase::Cancelled, location, raw, surface, proxy);
                }
                self.reset();
            }
        }
    }

    /// Delivers a native pan callback.
    ///
    /// `location` and `translation` are in content coordinates, as the native
    /// recognizer reports them. Returns the handler's answer for `Possible`,
    /// and whether a callback was delivered for every other state.
    pub fn native_pan(
        &mut self,
        state: RecognizerState,
        location: Point,
        translation: Vec2,
        event: Option<PointerEvent>,
        surface: &RefCell<dyn ScrollSurface>,
        proxy: &ScrollViewProxy,
    ) -> bool {
        let Some((gesture, pan)) = &mut self.pan else {
            return false;
        };
        if let Some(event) = event {
            pan.record_event(event);
        }
        match GesturePhase::from(state) {
            GesturePhase::Possible => pan.should_begin(gesture.handler(), location, translation, proxy),
            phase => pan
                .advance(phase, location, translation, surface, gesture.handler(), proxy)
                .is_some(),
        }
    }

    /// Delivers a native tap callback. Returns `false` if no tap is registered.
    pub fn native_tap(&self, location: Point, proxy: &ScrollViewProxy) -> bool {
        let Some(tap) = &self.tap else {
            return false;
        };
        (tap.gesture.handler())(location, proxy);
        true
    }

    fn pointer_down(
        &mut self,
        event: PointerEvent,
        surface: &RefCell<dyn ScrollSurface>,
        proxy: &ScrollViewProxy,
    ) {
        if self.pan_is_active() {
            // A new press while a pan is in flight: the old stream is gone.
            let (location, raw) = self.measure(event.position, surface);
            self.deliver_pan(GesturePhase::Cancelled, location, raw, surface, proxy);
        }
        self.press = Some(Press {
            origin: event.position,
            pan_gated: false,
        });
        if let Some(tap) = &mut self.tap {
            tap.state = TapState::Pressed;
        }
    }

    fn pointer_drag(
        &mut self,
        event: PointerEvent,
        surface: &RefCell<dyn ScrollSurface>,
        proxy: &ScrollViewProxy,
    ) {
        let Some(press) = self.press else {
            return;
        };
        let beyond_slop = (event.position - press.origin).hypot() > self.slop;
        if beyond_slop
            && let Some(tap) = &mut self.tap
            && tap.state == TapState::Pressed
        {
            trace!("tap failed: moved beyond slop");
            tap.state = TapState::Failed;
        }

        let tap_failed = self
            .tap
            .as_ref()
            .is_none_or(|tap| tap.state == TapState::Failed);
        let (location, raw) = self.measure(event.position, surface);
        let Some((gesture, pan)) = &mut self.pan else {
            return;
        };
        pan.record_event(event);

        if pan.phase().is_active() {
            pan.advance(
                GesturePhase::Changed,
                location,
                raw,
                surface,
                gesture.handler(),
                proxy,
            );
            return;
        }
        if press.pan_gated || !beyond_slop || !tap_failed {
            return;
        }
        if pan.should_begin(gesture.handler(), location, raw, proxy) {
            pan.advance(
                GesturePhase::Began,
                location,
                raw,
                surface,
                gesture.handler(),
                proxy,
            );
        } else if let Some(press) = &mut self.press {
            press.pan_gated = true;
        }
    }

    fn pointer_up(
        &mut self,
        event: PointerEvent,
        surface: &RefCell<dyn ScrollSurface>,
        proxy: &ScrollViewProxy,
    ) {
        if self.pan_is_active() {
            let (location, raw) = self.measure(event.position, surface);
            self.deliver_pan(GesturePhase::Ended, location, raw, surface, proxy);
        } else if let Some(tap) = &self.tap {
            let required = tap.gesture.count();
            if tap.state == TapState::Pressed && event.click_count >= required {
                let location = surface.borrow().surface_to_content(event.position);
                trace!(?location, clicks = event.click_count, "tap recognized");
                (tap.gesture.handler())(location, proxy);
            }
        }
        self.reset();
    }

    fn pan_is_active(&self) -> bool {
        self.pan
            .as_ref()
            .is_some_and(|(_, pan)| pan.phase().is_active())
    }

    fn deliver_pan(
        &mut self,
        phase: GesturePhase,
        location: Point,
        raw: Vec2,
        surface: &RefCell<dyn ScrollSurface>,
        proxy: &ScrollViewProxy,
    ) {
        if let Some((gesture, pan)) = &mut self.pan {
            pan.advance(phase, location, raw, surface, gesture.handler(), proxy);
        }
    }

    /// Location in content coordinates and raw translation in content units.
    fn measure(&self, position: Point, surface: &RefCell<dyn ScrollSurface>) -> (Point, Vec2) {
        let surface = surface.borrow();
        let location = surface.surface_to_content(position);
        let raw = match self.press {
            Some(press) => (position - press.origin) / surface.magnification(),
            None => Vec2::ZERO,
        };
        (location, raw)
    }

    fn reset(&mut self) {
        self.press = None;
        if let Some(tap) = &mut self.tap {
            tap.state = TapState::Idle;
        }
        if let Some((_, pan)) = &mut self.pan
            && !pan.phase().is_active()
        {
            pan.reset();
        }
    }
}
