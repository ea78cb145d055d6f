// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_scroll_view` crate.
//!
//! These mount scroll views onto the headless backends and drive them the
//! way a host would: pointer events, frame changes and run loop turns.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};
use understory_scroll_view::backends::{DesktopBackend, TouchBackend};
use understory_scroll_view::{
    ActiveRecognizers, GesturePhase, Magnification, MountedScrollView, PointerEvent, ScrollSurface,
    ScrollView, ViewportBackend, fit_ratio,
};

type PanLog = Rc<RefCell<Vec<(GesturePhase, Vec2)>>>;
type LocatedPanLog = Rc<RefCell<Vec<(GesturePhase, Point, Vec2)>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A 100x100 desktop frame over 1000x1000 content at a fixed zoom of 1.
fn desktop_pan_view(allow: bool) -> (MountedScrollView<Size, DesktopBackend>, PanLog) {
    init_tracing();
    let log: PanLog = Rc::default();
    let sink = Rc::clone(&log);
    let view = ScrollView::new(
        Magnification::absolute(1.0..=4.0, 1.0).unwrap(),
        true,
        |_| Size::new(1000.0, 1000.0),
    )
    .on_pan(move |phase, _location, translation, _proxy| {
        sink.borrow_mut().push((phase, translation));
        allow
    });
    (view.mount(DesktopBackend::new(Size::new(100.0, 100.0))), log)
}

#[test]
fn pan_translation_includes_autoscroll_shift() {
    let (mut mounted, log) = desktop_pan_view(true);

    mounted.pointer_event(PointerEvent::down((50.0, 50.0), 1));
    mounted.pointer_event(PointerEvent::drag((50.0, 90.0)));
    // Past the bottom edge by 30: the surface scrolls by 30.
    mounted.pointer_event(PointerEvent::drag((50.0, 130.0)));
    mounted.pointer_event(PointerEvent::up((50.0, 130.0), 1));

    assert_eq!(
        *log.borrow(),
        [
            (GesturePhase::Possible, Vec2::new(0.0, 40.0)),
            (GesturePhase::Began, Vec2::new(0.0, 40.0)),
            (GesturePhase::Changed, Vec2::new(0.0, 110.0)),
            (GesturePhase::Ended, Vec2::new(0.0, 110.0)),
        ]
    );
    assert_eq!(mounted.proxy().content_offset(), Point::new(0.0, 30.0));
}

/// Mounts a pan view that records locations as well as translations.
fn located_pan_view<B: ScrollSurface + 'static>(
    magnification: Magnification,
    backend: B,
) -> (MountedScrollView<Size, B>, LocatedPanLog) {
    init_tracing();
    let log: LocatedPanLog = Rc::default();
    let sink = Rc::clone(&log);
    let view = ScrollView::new(magnification, true, |_| Size::new(1000.0, 1000.0)).on_pan(
        move |phase, location, translation, _proxy| {
            sink.borrow_mut().push((phase, location, translation));
            true
        },
    );
    (view.mount(backend), log)
}

#[test]
fn pan_location_follows_the_autoscroll() {
    let (mut mounted, log) = located_pan_view(
        Magnification::absolute(1.0..=4.0, 1.0).unwrap(),
        DesktopBackend::new(Size::new(100.0, 100.0)),
    );

    mounted.pointer_event(PointerEvent::down((50.0, 50.0), 1));
    mounted.pointer_event(PointerEvent::drag((50.0, 90.0)));
    mounted.pointer_event(PointerEvent::drag((50.0, 130.0)));
    mounted.pointer_event(PointerEvent::up((50.0, 130.0), 1));

    let log = log.borrow();
    assert_eq!(
        log[2],
        (
            GesturePhase::Changed,
            Point::new(50.0, 160.0),
            Vec2::new(0.0, 110.0)
        )
    );
    let start = Point::new(50.0, 50.0);
    for &(phase, location, translation) in log.iter() {
        assert_eq!(start + translation, location, "{phase:?}");
    }
}

#[test]
fn zoomed_touch_pan_corrects_in_content_units() {
    let (mut mounted, log) = located_pan_view(
        Magnification::absolute(1.0..=4.0, 2.0).unwrap(),
        TouchBackend::new(Size::new(100.0, 100.0)),
    );
    // Zoomed around the frame center: the frame shows content (25, 25)..(75, 75).
    assert_eq!(
        mounted.surface().document_visible_rect(),
        Rect::new(25.0, 25.0, 75.0, 75.0)
    );

    mounted.pointer_event(PointerEvent::down((50.0, 50.0), 1));
    mounted.pointer_event(PointerEvent::drag((50.0, 90.0)));
    // 30 frame points past the bottom: 15 content units at zoom 2.
    mounted.pointer_event(PointerEvent::drag((50.0, 130.0)));
    mounted.pointer_event(PointerEvent::up((50.0, 130.0), 1));

    assert_eq!(mounted.proxy().content_offset(), Point::new(50.0, 80.0));
    let log = log.borrow();
    assert_eq!(
        *log,
        [
            (GesturePhase::Possible, Point::new(50.0, 70.0), Vec2::new(0.0, 20.0)),
            (GesturePhase::Began, Point::new(50.0, 70.0), Vec2::new(0.0, 20.0)),
            (GesturePhase::Changed, Point::new(50.0, 105.0), Vec2::new(0.0, 55.0)),
            (GesturePhase::Ended, Point::new(50.0, 105.0), Vec2::new(0.0, 55.0)),
        ]
    );
}

#[test]
fn cancelled_pan_starts_the_next_gesture_from_zero() {
    let (mut mounted, log) = desktop_pan_view(true);

    mounted.pointer_event(PointerEvent::down((50.0, 50.0), 1));
    mounted.pointer_event(PointerEvent::drag((50.0, 90.0)));
    mounted.pointer_event(PointerEvent::drag((50.0, 130.0)));
    mounted.pointer_event(PointerEvent::cancel((50.0, 130.0)));
    assert_eq!(
        log.borrow().last(),
        Some(&(GesturePhase::Cancelled, Vec2::new(0.0, 110.0)))
    );

    log.borrow_mut().clear();
    mounted.pointer_event(PointerEvent::down((50.0, 50.0), 1));
    mounted.pointer_event(PointerEvent::drag((50.0, 60.0)));
    assert_eq!(
        *log.borrow(),
        [
            (GesturePhase::Possible, Vec2::new(0.0, 10.0)),
            (GesturePhase::Began, Vec2::new(0.0, 10.0)),
        ]
    );
}

#[test]
fn refusing_possible_prevents_began() {
    let (mut mounted, log) = desktop_pan_view(false);

    mounted.pointer_event(PointerEvent::down((50.0, 50.0), 1));
    mounted.pointer_event(PointerEvent::drag((50.0, 90.0)));
    mounted.pointer_event(PointerEvent::drag((50.0, 130.0)));
    mounted.pointer_event(PointerEvent::up((50.0, 130.0), 1));

    assert!(
        log.borrow()
            .iter()
            .all(|(phase, _)| *phase == GesturePhase::Possible)
    );
    assert_eq!(mounted.proxy().content_offset(), Point::ORIGIN);
}

#[test]
fn relative_zoom_fits_the_content() {
    init_tracing();
    let viewport = Size::new(200.0, 100.0);
    let content = Size::new(100.0, 100.0);
    let view = ScrollView::new(Magnification::relative(1.0..=4.0, 1.0).unwrap(), true, move |_| {
        content
    });
    let mounted = view.mount(DesktopBackend::new(viewport));

    assert_eq!(fit_ratio(viewport, content), Some(1.0));
    assert_eq!(mounted.surface().zoom_limits(), (1.0, 4.0));
    assert_eq!(mounted.proxy().magnification(), 1.0);
    assert_eq!(mounted.magnification(), 1.0);
}

#[test]
fn unchanged_fit_still_notifies_the_listener() {
    init_tracing();
    let view = ScrollView::new(Magnification::default(), true, |_| Size::new(100.0, 100.0));
    let mut mounted = view.mount(DesktopBackend::new(Size::new(200.0, 50.0)));
    assert_eq!(mounted.surface().zoom_limits(), (0.5, 2.0));

    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        mounted.on_magnification_change(move |value| seen.borrow_mut().push(value));
    }
    mounted.run_loop().turn();
    assert_eq!(*seen.borrow(), [1.0]);

    // Same fit ratio of 0.5 as before.
    mounted.bounds_changed(Size::new(300.0, 50.0));
    assert_eq!(mounted.surface().zoom_limits(), (0.5, 2.0));
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(mounted.run_loop().turn(), 1);
    assert_eq!(*seen.borrow(), [1.0, 1.0]);
    assert_eq!(mounted.proxy().magnification(), 1.0);
}

#[test]
fn unchanged_fit_at_max_zoom_still_notifies_the_listener() {
    init_tracing();
    let view = ScrollView::new(Magnification::relative(1.0..=4.0, 4.0).unwrap(), true, |_| {
        Size::new(100.0, 100.0)
    });
    let mut mounted = view.mount(DesktopBackend::new(Size::new(200.0, 50.0)));
    assert_eq!(mounted.surface().zoom_limits(), (0.5, 2.0));
    assert_eq!(mounted.surface().magnification(), 2.0);

    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        mounted.on_magnification_change(move |value| seen.borrow_mut().push(value));
    }
    mounted.run_loop().turn();
    assert_eq!(*seen.borrow(), [4.0]);

    // Same fit ratio, with the native scale already at its maximum.
    mounted.bounds_changed(Size::new(300.0, 50.0));
    assert_eq!(mounted.surface().zoom_limits(), (0.5, 2.0));
    assert_eq!(mounted.run_loop().turn(), 1);
    assert_eq!(*seen.borrow(), [4.0, 4.0]);
    assert_eq!(mounted.proxy().magnification(), 4.0);
    assert_eq!(mounted.magnification(), 4.0);
}

#[test]
fn scroll_to_differs_per_platform() {
    init_tracing();
    let target = Rect::new(300.0, 400.0, 350.0, 450.0);
    let magnification = Magnification::absolute(1.0..=4.0, 1.0).unwrap();

    let desktop = ScrollView::new(magnification, true, |_| Size::new(1000.0, 1000.0))
        .mount(DesktopBackend::new(Size::new(100.0, 100.0)));
    desktop.proxy().scroll_to(target, false);
    let visible = desktop.proxy().visible_rect();
    assert!(visible.contains(target.center()));
    assert_eq!(visible.center(), target.center());

    let touch = ScrollView::new(magnification, true, |_| Size::new(1000.0, 1000.0))
        .mount(TouchBackend::new(Size::new(100.0, 100.0)));
    touch.proxy().scroll_to(target, false);
    let visible = touch.proxy().visible_rect();
    assert!(visible.contains_rect(target));
    assert_eq!(visible, Rect::new(250.0, 350.0, 350.0, 450.0));
}

#[test]
fn registering_a_tap_twice_keeps_one_recognizer() {
    init_tracing();
    let taps = Rc::new(Cell::new(0_u32));
    let counter = Rc::clone(&taps);
    let view = ScrollView::new(Magnification::default(), true, |_| Size::new(100.0, 100.0))
        .on_tap(1, |_, _| panic!("replaced handler must not run"))
        .on_tap(2, move |_, _| counter.set(counter.get() + 1));
    let mut mounted = view.clone().mount(DesktopBackend::new(Size::new(100.0, 100.0)));
    assert_eq!(
        mounted.active_recognizers(),
        ActiveRecognizers { taps: 1, pans: 0 }
    );

    mounted.pointer_event(PointerEvent::down((10.0, 10.0), 1));
    mounted.pointer_event(PointerEvent::up((10.0, 10.0), 1));
    mounted.pointer_event(PointerEvent::down((10.0, 10.0), 2));
    mounted.pointer_event(PointerEvent::up((10.0, 10.0), 2));
    assert_eq!(taps.get(), 1);

    mounted.update(view.clear_tap());
    assert_eq!(mounted.active_recognizers(), ActiveRecognizers::default());
}

#[test]
fn degenerate_content_leaves_zoom_untouched() {
    init_tracing();
    let view = ScrollView::new(Magnification::default(), true, |_| Size::ZERO);
    let mut mounted = view.mount(DesktopBackend::new(Size::new(200.0, 100.0)));
    assert_eq!(mounted.surface().zoom_limits(), (1.0, 4.0));
    assert_eq!(mounted.proxy().magnification(), 1.0);

    mounted.bounds_changed(Size::new(300.0, 300.0));
    assert_eq!(mounted.surface().zoom_limits(), (1.0, 4.0));
    assert_eq!(mounted.proxy().magnification(), 1.0);
    assert_eq!(mounted.run_loop().pending(), 0);
}

#[test]
fn content_shrinking_to_nothing_keeps_previous_bounds() {
    init_tracing();
    let view = ScrollView::new(Magnification::default(), true, |_| Size::new(100.0, 100.0));
    let mut mounted = view.mount(DesktopBackend::new(Size::new(200.0, 50.0)));
    let limits = mounted.surface().zoom_limits();
    let multiplier = mounted.zoom().multiplier();

    mounted.update(ScrollView::new(Magnification::default(), true, |_| {
        Size::new(0.0, 100.0)
    }));
    assert_eq!(mounted.surface().zoom_limits(), limits);
    assert_eq!(mounted.zoom().multiplier(), multiplier);
    assert_eq!(mounted.proxy().magnification(), 1.0);
}

#[test]
fn touch_taps_account_for_centering() {
    init_tracing();
    let location = Rc::new(Cell::new(None));
    let sink = Rc::clone(&location);
    let view = ScrollView::new(
        Magnification::absolute(1.0..=4.0, 1.0).unwrap(),
        false,
        |_| Size::new(100.0, 100.0),
    )
    .on_tap(1, move |at, _| sink.set(Some(at)));
    let mut mounted = view.mount(TouchBackend::new(Size::new(200.0, 200.0)));
    assert!(!mounted.surface().indicators_visible());

    mounted.pointer_event(PointerEvent::down((60.0, 70.0), 1));
    mounted.pointer_event(PointerEvent::up((60.0, 70.0), 1));
    assert_eq!(location.get(), Some(Point::new(10.0, 20.0)));
}

#[test]
fn touch_live_magnify_reaches_the_proxy() {
    init_tracing();
    let view = ScrollView::new(Magnification::default(), true, |_| Size::new(100.0, 100.0));
    let mounted = view.mount(TouchBackend::new(Size::new(100.0, 100.0)));
    let proxy = mounted.proxy().clone();
    assert!(!proxy.is_live_magnify());
    mounted.surface_mut().set_zoom_bouncing(true);
    assert!(proxy.is_live_magnify());
    mounted.surface_mut().set_zoom_bouncing(false);

    let snapshot = proxy.try_snapshot().unwrap();
    assert!(!snapshot.is_live_magnify);
    assert_eq!(snapshot.magnification, 1.0);
    assert!(snapshot.is_autoscroll_enabled);
}

#[test]
fn handlers_can_use_the_proxy() {
    init_tracing();
    let view = ScrollView::new(
        Magnification::absolute(1.0..=4.0, 1.0).unwrap(),
        true,
        |_| Size::new(1000.0, 1000.0),
    )
    .on_tap(1, |location, proxy| {
        proxy.set_autoscroll_enabled(false);
        proxy.set_content_offset(location);
    });
    let mut mounted = view.mount(DesktopBackend::new(Size::new(100.0, 100.0)));
    mounted.pointer_event(PointerEvent::down((40.0, 30.0), 1));
    mounted.pointer_event(PointerEvent::up((40.0, 30.0), 1));

    assert_eq!(mounted.proxy().content_offset(), Point::new(40.0, 30.0));
    assert!(!mounted.surface().is_autoscroll_enabled());
}

#[test]
fn native_recognizer_path_matches_pointer_path() {
    let (mut mounted, log) = desktop_pan_view(true);
    let drag = PointerEvent::drag((50.0, 130.0));

    assert!(mounted.native_pan(0, Point::new(50.0, 50.0), Vec2::ZERO, None));
    assert!(mounted.native_pan(1, Point::new(50.0, 90.0), Vec2::new(0.0, 40.0), None));
    assert!(mounted.native_pan(
        2,
        Point::new(50.0, 130.0),
        Vec2::new(0.0, 80.0),
        Some(drag)
    ));
    assert!(mounted.native_pan(3, Point::new(50.0, 130.0), Vec2::new(0.0, 80.0), None));

    assert_eq!(
        log.borrow()[2..],
        [
            (GesturePhase::Changed, Vec2::new(0.0, 110.0)),
            (GesturePhase::Ended, Vec2::new(0.0, 110.0)),
        ]
    );
    assert!(!mounted.native_tap(Point::ORIGIN));
}
