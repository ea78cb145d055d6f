// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scroll_view --heading-base-level=0

//! Understory Scroll View: a headless scroll and zoom container.
//!
//! This crate models a scrollable, zoomable viewport that hosts arbitrary
//! content and exposes its live state to application code. It focuses on:
//! - A [`ScrollViewProxy`] handle for reading and changing the viewport
//!   (offset, insets, visible rect, magnification) from content builders and
//!   gesture handlers.
//! - Tap and pan gestures on the content, with the pan translation corrected
//!   for autoscroll while selected content is dragged past the visible edge.
//! - Relative magnification, where the zoom range is expressed in multiples
//!   of the scale at which the content fits the viewport.
//!
//! It does **not** render anything or own native views. Platform surfaces are
//! modelled by the [`ScrollSurface`] trait; [`backends::DesktopBackend`] and
//! [`backends::TouchBackend`] are headless models of a desktop clip‑view
//! scroller and a touch zooming scroller. Hosts are expected to:
//! - Forward frame changes to [`MountedScrollView::bounds_changed`].
//! - Forward pointer input to [`MountedScrollView::pointer_event`], or native
//!   recognizer callbacks to [`MountedScrollView::native_pan`] and
//!   [`MountedScrollView::native_tap`].
//! - Turn the [`RunLoop`] once per UI loop iteration so deferred zoom
//!   notifications are delivered.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_scroll_view::backends::DesktopBackend;
//! use understory_scroll_view::{Magnification, PointerEvent, ScrollView};
//!
//! let view = ScrollView::new(Magnification::default(), true, |_proxy| {
//!     // Natural size of the hosted content.
//!     Size::new(400.0, 200.0)
//! })
//! .on_tap(1, |location, proxy| {
//!     // Bring the tapped area into view.
//!     proxy.scroll_to(kurbo::Rect::from_center_size(location, (10.0, 10.0)), true);
//! });
//!
//! let mut mounted = view.mount(DesktopBackend::new(Size::new(200.0, 200.0)));
//!
//! // The content fits at half scale, so the relative magnification is 1.
//! assert_eq!(mounted.proxy().magnification(), 1.0);
//!
//! mounted.pointer_event(PointerEvent::down(Point::new(20.0, 20.0), 1));
//! mounted.pointer_event(PointerEvent::up(Point::new(20.0, 20.0), 1));
//! mounted.run_loop().turn();
//! ```
//!
//! ## Design notes
//!
//! - Everything is single‑threaded; state is shared with `Rc` and `RefCell`.
//! - Each mounted view has its own proxy delegate and gesture registry.
//! - Handlers never run while the surface is borrowed, so they may use the
//!   proxy freely.
//! - Logging goes through `tracing`; the crate installs no subscriber.
//!
//! This crate is `no_std` (with `alloc`).

#![no_std]

extern crate alloc;

pub mod backends;

mod backend;
mod dispatch;
mod error;
mod geometry;
mod gesture;
mod live;
mod magnification;
mod pan;
mod proxy;
mod run_loop;
mod scroll_view;
mod zoom;

pub use backend::{ScrollSurface, ViewportBackend};
pub use dispatch::{ActiveRecognizers, ContentGestures, DEFAULT_SLOP};
pub use error::{Error, Result};
pub use geometry::{
    EdgeInsets, Edges, UNBOUNDED, centering_offset, edges_outside, fit_ratio, is_positive,
    overshoot,
};
pub use gesture::{
    GesturePhase, GestureRegistry, PanGesture, PanHandler, PointerEvent, PointerKind,
    RecognizerState, TapGesture, TapHandler,
};
pub use live::LiveMagnify;
pub use magnification::Magnification;
pub use pan::PanRecognizer;
pub use proxy::{ScrollViewProxy, ViewportSnapshot};
pub use run_loop::RunLoop;
pub use scroll_view::{ContentView, MountedScrollView, ScrollView};
pub use zoom::{FitState, ZOOM_NUDGE, ZoomFit, ZoomUpdate};
