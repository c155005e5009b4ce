use canvas_gallery::clock::ManualClock;
use canvas_gallery::draw::model::{Point, StrokeStyle};
use canvas_gallery::draw::{PointerEvent, RasterSurface, SnapshotCapture, StrokeRenderer};
use chrono::{TimeZone, Utc};
use std::rc::Rc;

fn renderer() -> StrokeRenderer {
    StrokeRenderer::new(
        RasterSurface::new(64, 48),
        StrokeStyle {
            width: 4.0,
            ..StrokeStyle::default()
        },
    )
}

fn zigzag() -> Vec<Point> {
    vec![
        Point::new(3.0, 4.0),
        Point::new(20.0, 30.0),
        Point::new(35.5, 8.25),
        Point::new(60.0, 40.0),
        Point::new(10.0, 44.0),
    ]
}

#[test]
fn idle_noise_does_not_change_the_result() {
    let points = zigzag();

    let mut clean = renderer();
    clean.begin(points[0]);
    for p in &points[1..] {
        clean.extend(*p);
    }
    clean.end();

    let mut noisy = renderer();
    noisy.end();
    noisy.extend(Point::new(50.0, 5.0));
    noisy.begin(points[0]);
    for p in &points[1..] {
        noisy.extend(*p);
    }
    noisy.end();
    noisy.end();
    noisy.extend(Point::new(1.0, 1.0));
    noisy.end();

    assert_eq!(clean.surface(), noisy.surface());
}

#[test]
fn pointer_events_match_direct_calls() {
    let points = zigzag();

    let mut direct = renderer();
    direct.begin(points[0]);
    for p in &points[1..] {
        direct.extend(*p);
    }
    direct.end();

    let mut events = renderer();
    events.handle(PointerEvent::Down(points[0]));
    for p in &points[1..] {
        events.handle(PointerEvent::Move(*p));
    }
    events.handle(PointerEvent::Up);
    events.handle(PointerEvent::Up);

    assert_eq!(direct.surface(), events.surface());
}

#[test]
fn begin_extend_end_clear_leaves_blank_surface() {
    let mut r = renderer();
    r.begin(Point::new(0.0, 0.0));
    r.extend(Point::new(10.0, 10.0));
    r.end();
    assert!(!r.surface().is_blank());

    r.clear();
    assert!(r.surface().is_blank());
}

#[test]
fn capture_does_not_touch_the_surface() {
    let mut r = renderer();
    r.set_color("rgba(200, 40, 10, 0.6)").unwrap();
    r.begin(Point::new(5.0, 5.0));
    r.extend(Point::new(40.0, 30.0));
    r.end();
    let before = r.surface().clone();

    let clock = Rc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 4, 4, 4, 4, 4)
            .single()
            .expect("date time"),
    ));
    let mut capture = SnapshotCapture::new(clock);
    capture.capture(r.surface()).expect("capture");

    assert_eq!(r.surface(), &before);
}

#[test]
fn stroke_paints_along_its_path_only() {
    let mut r = renderer();
    r.set_color("#00ff00").unwrap();
    r.begin(Point::new(2.0, 24.0));
    r.extend(Point::new(62.0, 24.0));
    r.end();

    let green = canvas_gallery::draw::model::Color::rgba(0, 255, 0, 255);
    assert_eq!(r.surface().pixel(32, 24), Some(green));
    assert_eq!(r.surface().pixel(32, 5), Some(Default::default()));
}
