use canvas_gallery::clock::{Clock, SystemClock};
use canvas_gallery::draw::messages::Notifier;
use canvas_gallery::toast_log::{append_toast_log, TOAST_LOG_FILE};
use std::rc::Rc;
use tempfile::tempdir;

#[test]
fn appends_one_line_per_message() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(TOAST_LOG_FILE);

    append_toast_log(&path, "first");
    append_toast_log(&path, "second");

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" - first"));
    assert!(lines[1].ends_with(" - second"));
}

#[test]
fn unwritable_log_path_does_not_panic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join(TOAST_LOG_FILE);
    assert!(std::panic::catch_unwind(|| append_toast_log(&path, "lost")).is_ok());
    assert!(!path.exists());
}

#[test]
fn notifier_mirrors_messages_into_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(TOAST_LOG_FILE);
    let clock: Rc<dyn Clock> = Rc::new(SystemClock);
    let mut notifier = Notifier::new(clock).with_log_file(Some(path.clone()));

    notifier.success("Drawing saved!");
    notifier.warn("Drawing removed, but the change could not be stored.");

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Drawing saved!"));
    assert!(contents.contains("could not be stored"));
}
