// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content gesture registration: phases, pointer input and handler records.
//!
//! A scroll view carries at most one tap and one pan registration, held in a
//! per-container [`GestureRegistry`]. Registrations are plain values; the
//! mounted container turns them into live recognizers and keeps those in sync
//! whenever the registry changes.

use alloc::rc::Rc;
use core::fmt;
use core::num::NonZeroU32;

use kurbo::{Point, Vec2};

use crate::proxy::ScrollViewProxy;

/// Point‑in‑time state of a continuous content gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// The gesture may start. Handlers answer whether it is allowed to.
    #[default]
    Possible,
    /// The gesture has been recognized.
    Began,
    /// The pointer moved while the gesture was active.
    Changed,
    /// The gesture was interrupted.
    Cancelled,
    /// The pointer was released.
    Ended,
}

impl GesturePhase {
    /// `true` for [`GesturePhase::Cancelled`] and [`GesturePhase::Ended`].
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Ended)
    }

    /// `true` for [`GesturePhase::Began`] and [`GesturePhase::Changed`].
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Began | Self::Changed)
    }
}

/// State of a native gesture recognizer.
///
/// Both supported toolkits share these raw values, see
/// [`RecognizerState::from_raw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecognizerState {
    /// Waiting for input.
    Possible,
    /// Continuous gesture started.
    Began,
    /// Continuous gesture updated.
    Changed,
    /// Gesture finished (also reported as "recognized" for discrete gestures).
    Ended,
    /// Gesture was cancelled by the system.
    Cancelled,
    /// Gesture could not be recognized.
    Failed,
}

impl RecognizerState {
    /// Decodes a raw toolkit state value.
    ///
    /// Returns `None` for values outside the known set, which callers should
    /// treat as "ignore this event".
    #[must_use]
    pub fn from_raw(raw: isize) -> Option<Self> {
        match raw {
            0 => Some(Self::Possible),
            1 => Some(Self::Began),
            2 => Some(Self::Changed),
            3 => Some(Self::Ended),
            4 => Some(Self::Cancelled),
            5 => Some(Self::Failed),
            _ => None,
        }
    }

    /// The raw toolkit value of this state.
    #[must_use]
    pub fn to_raw(self) -> isize {
        match self {
            Self::Possible => 0,
            Self::Began => 1,
            Self::Changed => 2,
            Self::Ended => 3,
            Self::Cancelled => 4,
            Self::Failed => 5,
        }
    }
}

impl From<RecognizerState> for GesturePhase {
    /// A failed recognizer is reported to handlers as cancelled.
    fn from(state: RecognizerState) -> Self {
        match state {
            RecognizerState::Possible => Self::Possible,
            RecognizerState::Began => Self::Began,
            RecognizerState::Changed => Self::Changed,
            RecognizerState::Ended => Self::Ended,
            RecognizerState::Cancelled | RecognizerState::Failed => Self::Cancelled,
        }
    }
}

/// Kind of a raw pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Button pressed or finger touched down.
    Down,
    /// Pointer moved while pressed.
    Drag,
    /// Button released or finger lifted.
    Up,
    /// The system took the pointer stream away.
    Cancel,
}

/// A raw pointer event in scroll view (surface) coordinates.
///
/// `click_count` is the platform's multi‑click counter for the press this
/// event belongs to; it is only consulted on [`PointerKind::Up`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerKind,
    /// Location relative to the scroll view's frame origin.
    pub position: Point,
    /// Number of consecutive clicks or taps, starting at `1`.
    pub click_count: u32,
}

impl PointerEvent {
    /// A press at `position`.
    #[must_use]
    pub fn down(position: impl Into<Point>, click_count: u32) -> Self {
        Self {
            kind: PointerKind::Down,
            position: position.into(),
            click_count,
        }
    }

    /// A drag to `position`.
    #[must_use]
    pub fn drag(position: impl Into<Point>) -> Self {
        Self {
            kind: PointerKind::Drag,
            position: position.into(),
            click_count: 1,
        }
    }

    /// A release at `position`.
    #[must_use]
    pub fn up(position: impl Into<Point>, click_count: u32) -> Self {
        Self {
            kind: PointerKind::Up,
            position: position.into(),
            click_count,
        }
    }

    /// A cancellation at `position`.
    #[must_use]
    pub fn cancel(position: impl Into<Point>) -> Self {
        Self {
            kind: PointerKind::Cancel,
            position: position.into(),
            click_count: 0,
        }
    }
}

/// Tap handler: receives the location in content coordinates.
pub type TapHandler = Rc<dyn Fn(Point, &ScrollViewProxy)>;

/// Pan handler: receives the phase, the location in content coordinates and
/// the translation since the gesture began.
///
/// For [`GesturePhase::Possible`] the return value decides whether the pan
/// may begin; for later phases it asks the scroll view to autoscroll while
/// the pointer is past the visible edge.
pub type PanHandler = Rc<dyn Fn(GesturePhase, Point, Vec2, &ScrollViewProxy) -> bool>;

/// A tap registration.
#[derive(Clone)]
pub struct TapGesture {
    count: NonZeroU32,
    handler: TapHandler,
}

impl TapGesture {
    /// Creates a tap registration requiring `count` consecutive taps.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    pub fn new(count: u32, handler: impl Fn(Point, &ScrollViewProxy) + 'static) -> Self {
        let Some(count) = NonZeroU32::new(count) else {
            panic!("tap gestures require a count of at least 1");
        };
        Self {
            count,
            handler: Rc::new(handler),
        }
    }

    /// Number of consecutive taps required.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count.get()
    }

    pub(crate) fn handler(&self) -> &TapHandler {
        &self.handler
    }
}

impl fmt::Debug for TapGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapGesture")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

/// A pan registration.
#[derive(Clone)]
pub struct PanGesture {
    handler: PanHandler,
}

impl PanGesture {
    /// Creates a pan registration.
    pub fn new(
        handler: impl Fn(GesturePhase, Point, Vec2, &ScrollViewProxy) -> bool + 'static,
    ) -> Self {
        Self {
            handler: Rc::new(handler),
        }
    }

    pub(crate) fn handler(&self) -> &PanHandler {
        &self.handler
    }
}

impl fmt::Debug for PanGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanGesture").finish_non_exhaustive()
    }
}

/// The gesture registrations of one scroll view.
#[derive(Clone, Debug, Default)]
pub struct GestureRegistry {
    tap: Option<TapGesture>,
    pan: Option<PanGesture>,
}

impl GestureRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tap registration, if any.
    #[must_use]
    pub fn tap(&self) -> Option<&TapGesture> {
        self.tap.as_ref()
    }

    /// The pan registration, if any.
    #[must_use]
    pub fn pan(&self) -> Option<&PanGesture> {
        self.pan.as_ref()
    }

    /// Replaces the tap registration; `None` clears it.
    pub fn set_tap(&mut self, tap: Option<TapGesture>) {
        self.tap = tap;
    }

    /// Replaces the pan registration; `None` clears it.
    pub fn set_pan(&mut self, pan: Option<PanGesture>) {
        self.pan = pan;
    }
}
