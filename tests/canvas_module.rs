use canvas_gallery::clock::{Clock, ManualClock};
use canvas_gallery::draw::controller::{MSG_REMOVED, MSG_SAVED, MSG_SAVED_NOT_STORED};
use canvas_gallery::draw::messages::{MessageKind, Notifier};
use canvas_gallery::draw::model::Point;
use canvas_gallery::draw::shapes::{Paint, Shape};
use canvas_gallery::draw::{CanvasHooks, CanvasModule, PointerEvent, RasterSurface};
use canvas_gallery::gallery::{DrawingDetail, GalleryItem, GalleryView, GALLERY_LIMIT};
use canvas_gallery::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use chrono::{TimeZone, Utc};
use std::path::Path;
use std::rc::Rc;

#[derive(Default)]
struct RecordingView {
    items: Vec<GalleryItem>,
    renders: usize,
    detail: Option<DrawingDetail>,
}

impl GalleryView for RecordingView {
    fn replace_items(&mut self, items: Vec<GalleryItem>) {
        self.items = items;
        self.renders += 1;
    }

    fn show_detail(&mut self, detail: DrawingDetail) {
        self.detail = Some(detail);
    }

    fn close_detail(&mut self) {
        self.detail = None;
    }
}

fn manual_clock() -> Rc<ManualClock> {
    Rc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 6, 7, 8, 9, 10)
            .single()
            .expect("date time"),
    ))
}

fn mount<S: KeyValueStore>(
    backend: S,
    clock: Rc<ManualClock>,
    download_dir: &Path,
) -> CanvasModule<S, RecordingView> {
    let clock: Rc<dyn Clock> = clock;
    let hooks = CanvasHooks::complete(
        RasterSurface::new(40, 30),
        "#3366ff",
        3.0,
        RecordingView::default(),
    );
    CanvasModule::mount(hooks, backend, clock.clone(), Notifier::new(clock), download_dir)
        .expect("mounted")
}

fn scribble<S: KeyValueStore>(module: &mut CanvasModule<S, RecordingView>) {
    module.pointer(PointerEvent::Down(Point::new(5.0, 5.0)));
    module.pointer(PointerEvent::Move(Point::new(30.0, 20.0)));
    module.pointer(PointerEvent::Up);
}

fn texts<S: KeyValueStore>(module: &CanvasModule<S, RecordingView>) -> Vec<String> {
    module
        .notifier()
        .messages()
        .iter()
        .map(|m| m.text.clone())
        .collect()
}

#[test]
fn missing_hook_disables_the_feature() {
    let clock: Rc<dyn Clock> = manual_clock();
    let mut hooks = CanvasHooks::complete(
        RasterSurface::new(40, 30),
        "#000000",
        3.0,
        RecordingView::default(),
    );
    hooks.save_control = false;

    let module = CanvasModule::mount(
        hooks,
        MemoryStore::new(),
        clock.clone(),
        Notifier::new(clock),
        ".",
    );
    assert!(module.is_none());
}

#[test]
fn zero_sized_surface_disables_the_feature() {
    let clock: Rc<dyn Clock> = manual_clock();
    let hooks = CanvasHooks::complete(
        RasterSurface::new(0, 0),
        "#000000",
        3.0,
        RecordingView::default(),
    );
    let module = CanvasModule::mount(
        hooks,
        MemoryStore::new(),
        clock.clone(),
        Notifier::new(clock),
        ".",
    );
    assert!(module.is_none());
}

#[test]
fn mount_renders_existing_gallery() {
    let dir = tempfile::tempdir().expect("temp dir");
    let clock = manual_clock();
    let mut first = mount(MemoryStore::new(), clock.clone(), dir.path());
    scribble(&mut first);
    first.save_drawing().expect("saved");
    let backend = first.store().backend().clone();

    let second = mount(backend, clock, dir.path());
    assert_eq!(second.projector().view().renders, 1);
    assert_eq!(second.projector().view().items.len(), 1);
}

#[test]
fn save_flow_updates_gallery_and_notifies() {
    let dir = tempfile::tempdir().expect("temp dir");
    let clock = manual_clock();
    let mut module = mount(MemoryStore::new(), clock.clone(), dir.path());

    scribble(&mut module);
    let first = module.save_drawing().expect("first save");
    clock.advance_ms(5);
    let second = module.save_drawing().expect("second save");

    let items = &module.projector().view().items;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].timestamp, second.timestamp);
    assert_eq!(items[1].timestamp, first.timestamp);
    assert_eq!(texts(&module), vec![MSG_SAVED, MSG_SAVED]);
    assert!(module.notifier().messages()[0].kind == MessageKind::Success);
}

#[test]
fn gallery_never_exceeds_limit_through_the_module() {
    let dir = tempfile::tempdir().expect("temp dir");
    let clock = manual_clock();
    let mut module = mount(MemoryStore::new(), clock.clone(), dir.path());

    for _ in 0..(GALLERY_LIMIT + 3) {
        module.save_drawing().expect("save");
        clock.advance_ms(1000);
    }

    assert_eq!(module.store().len(), GALLERY_LIMIT);
    assert_eq!(module.projector().view().items.len(), GALLERY_LIMIT);
}

#[test]
fn open_then_delete_rerenders_and_closes_detail() {
    let dir = tempfile::tempdir().expect("temp dir");
    let clock = manual_clock();
    let mut module = mount(MemoryStore::new(), clock.clone(), dir.path());
    scribble(&mut module);
    let saved = module.save_drawing().expect("save");

    assert!(module.open_drawing(&saved.timestamp));
    let detail = module.projector().view().detail.clone().expect("detail shown");
    assert_eq!(detail.timestamp, saved.timestamp);
    assert!(detail.saved_label.starts_with("Saved at: "));

    let renders_before = module.projector().view().renders;
    module.delete_drawing(&saved.timestamp);

    let view = module.projector().view();
    assert!(view.items.is_empty());
    assert!(view.detail.is_none());
    assert_eq!(view.renders, renders_before + 1);
    assert!(module.store().is_empty());
    assert_eq!(texts(&module).last().map(String::as_str), Some(MSG_REMOVED));
}

#[test]
fn opening_unknown_drawing_shows_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut module = mount(MemoryStore::new(), manual_clock(), dir.path());
    assert!(!module.open_drawing("missing"));
    assert!(module.projector().view().detail.is_none());
}

#[test]
fn download_writes_png_named_after_epoch_millis() {
    let dir = tempfile::tempdir().expect("temp dir");
    let downloads = dir.path().join("downloads");
    let clock = manual_clock();
    let mut module = mount(MemoryStore::new(), clock.clone(), &downloads);
    scribble(&mut module);
    let saved = module.save_drawing().expect("save");

    clock.advance_ms(250);
    let path = module.download_drawing(&saved.timestamp).expect("download");

    let expected = format!("drawing_{}.png", clock.now().timestamp_millis());
    assert_eq!(path, downloads.join(expected));
    let img = image::open(&path).expect("png on disk").to_rgba8();
    assert_eq!(img.dimensions(), (40, 30));
    assert_eq!(img.as_raw().as_slice(), module.renderer().surface().pixels());
}

#[test]
fn download_of_unknown_drawing_reports_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut module = mount(MemoryStore::new(), manual_clock(), dir.path());
    assert!(module.download_drawing("missing").is_none());
    assert_eq!(module.notifier().messages()[0].kind, MessageKind::Error);
}

#[test]
fn quota_failure_keeps_drawing_in_memory_and_warns() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut module = mount(MemoryStore::with_quota(32), manual_clock(), dir.path());
    scribble(&mut module);

    let saved = module.save_drawing().expect("kept in memory");

    assert_eq!(module.store().len(), 1);
    assert_eq!(module.projector().view().items[0].timestamp, saved.timestamp);
    assert!(module.store().load_all().is_empty());
    assert_eq!(texts(&module), vec![MSG_SAVED_NOT_STORED]);
    assert_eq!(module.notifier().messages()[0].kind, MessageKind::Warning);
}

#[test]
fn rejected_brush_settings_keep_previous_values() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut module = mount(MemoryStore::new(), manual_clock(), dir.path());

    assert!(!module.set_brush_color("nope"));
    assert!(!module.set_brush_width(-1.0));
    assert!(module.set_brush_width(12.0));

    let style = module.renderer().style();
    assert_eq!(style.color.to_hex(), "#3366ff");
    assert_eq!(style.width, 12.0);
}

#[test]
fn shapes_leave_the_brush_alone() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut module = mount(MemoryStore::new(), manual_clock(), dir.path());

    assert!(module.draw_shape(
        Shape::Circle {
            center: Point::new(20.0, 15.0),
            radius: 5.0,
            paint: Paint::Fill,
        },
        "red",
    ));
    assert!(!module.draw_shape(
        Shape::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(5.0, 5.0),
            width: 2.0,
        },
        "not a color",
    ));

    assert_eq!(module.renderer().style().color.to_hex(), "#3366ff");
    assert!(!module.renderer().surface().is_blank());
}

#[test]
fn text_shape_is_painted_and_bad_size_is_refused() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut module = mount(MemoryStore::new(), manual_clock(), dir.path());

    assert!(!module.draw_shape(
        Shape::Text {
            text: "Hi".into(),
            origin: Point::new(2.0, 20.0),
            size: -1.0,
        },
        "black",
    ));
    assert!(module.renderer().surface().is_blank());

    assert!(module.draw_shape(
        Shape::Text {
            text: "Hi".into(),
            origin: Point::new(2.0, 20.0),
            size: 16.0,
        },
        "black",
    ));
    assert!(!module.renderer().surface().is_blank());
}

#[test]
fn messages_fade_out_on_tick() {
    let dir = tempfile::tempdir().expect("temp dir");
    let clock = manual_clock();
    let mut module = mount(MemoryStore::new(), clock.clone(), dir.path());
    module.save_drawing().expect("save");

    clock.advance_ms(3500);
    module.tick();
    assert!(module.notifier().messages().is_empty());
}

#[test]
fn gallery_survives_restart_with_file_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("storage.json");
    let clock = manual_clock();

    let mut module = mount(JsonFileStore::open(&path, None), clock.clone(), dir.path());
    scribble(&mut module);
    let saved = module.save_drawing().expect("save");
    drop(module);

    let module = mount(JsonFileStore::open(&path, None), clock, dir.path());
    assert_eq!(module.store().len(), 1);
    assert_eq!(module.store().snapshots()[0], saved);
    assert_eq!(module.projector().view().items[0].timestamp, saved.timestamp);
}
