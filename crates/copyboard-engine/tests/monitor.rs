//! Monitor behaviour against the mock clipboard.

use std::path::PathBuf;
use std::time::Duration;

use copyboard_clipboard::mock::{MockClipboard, MockClipboardHandle};
use copyboard_engine::config::MonitorConfig;
use copyboard_engine::{ClipboardMonitor, HISTORY_CAPACITY};
use copyboard_types::{ClipboardPayload, Content, DropPayload, ImageData, Item};

async fn setup() -> (ClipboardMonitor, MockClipboardHandle) {
    let clipboard = MockClipboard::new();
    let handle = clipboard.handle();
    // Pre-existing content, present before the monitor starts.
    handle.copy_text("before start");
    let monitor = ClipboardMonitor::new(Box::new(clipboard), &MonitorConfig::default()).await;
    (monitor, handle)
}

fn contents(monitor: &ClipboardMonitor) -> Vec<Content> {
    monitor.history().iter().map(|item| item.content.clone()).collect()
}

fn text(s: &str) -> Content {
    Content::Text(s.to_string())
}

fn red_pixels() -> Vec<u8> {
    [200, 10, 10, 255].repeat(4)
}

/// Write a 2x2 PNG into the temp dir and return its path.
fn png_fixture(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("copyboard-{}-{name}.png", std::process::id()));
    let image = image::RgbaImage::from_raw(2, 2, red_pixels()).unwrap();
    image.save(&path).unwrap();
    path
}

#[tokio::test(start_paused = true)]
async fn poll_captures_external_copy_and_confirms() {
    let (mut monitor, handle) = setup().await;
    assert_eq!(monitor.last_change_count(), 1);

    handle.copy_text("hello");
    assert!(monitor.poll().await);
    assert_eq!(contents(&monitor), vec![text("hello")]);
    assert_eq!(monitor.last_change_count(), 2);
    assert!(monitor.signals().paste_confirmed);

    tokio::time::sleep(Duration::from_millis(1400)).await;
    assert!(monitor.signals().paste_confirmed);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!monitor.signals().paste_confirmed);
}

#[tokio::test]
async fn content_present_before_start_is_not_captured() {
    let (mut monitor, _handle) = setup().await;
    assert!(!monitor.poll().await);
    assert!(monitor.history().is_empty());
}

#[tokio::test]
async fn unchanged_counter_is_a_noop() {
    let (mut monitor, handle) = setup().await;
    handle.copy_text("a");
    assert!(monitor.poll().await);

    // Same counter, different content: still ignored until the counter moves.
    handle.set_payload_silently(ClipboardPayload::text("b"));
    assert!(!monitor.poll().await);
    assert_eq!(contents(&monitor), vec![text("a")]);
}

#[tokio::test]
async fn poll_rejects_duplicates_without_signal() {
    let (mut monitor, handle) = setup().await;
    handle.copy_text("a");
    handle.copy_text("b");
    monitor.poll().await;
    handle.copy_text("x");
    monitor.poll().await;
    handle.copy_text("b");
    assert!(!monitor.poll().await);
    assert_eq!(contents(&monitor), vec![text("x"), text("b")]);
}

#[tokio::test]
async fn empty_clipboard_change_is_ignored() {
    let (mut monitor, handle) = setup().await;
    handle.copy(ClipboardPayload::default());
    assert!(!monitor.poll().await);
    assert!(monitor.history().is_empty());
    assert!(!monitor.signals().any());
}

#[tokio::test]
async fn poll_accepts_empty_text() {
    let (mut monitor, handle) = setup().await;
    handle.copy_text("");
    assert!(monitor.poll().await);
    assert_eq!(contents(&monitor), vec![text("")]);
}

#[tokio::test]
async fn poll_prefers_text_over_image_and_file() {
    let (mut monitor, handle) = setup().await;
    let image = ImageData::from_rgba(2, 2, &red_pixels()).unwrap();
    handle.copy(ClipboardPayload {
        text: None,
        image: Some(image.clone()),
        file: Some(PathBuf::from("/tmp/photo.png")),
    });
    monitor.poll().await;
    handle.copy(ClipboardPayload {
        text: Some("caption".into()),
        image: Some(image.clone()),
        file: None,
    });
    monitor.poll().await;

    assert_eq!(contents(&monitor), vec![text("caption"), Content::Image(image)]);
}

#[tokio::test]
async fn capacity_is_bounded_through_polling() {
    let (mut monitor, handle) = setup().await;
    for i in 0..=HISTORY_CAPACITY {
        handle.copy_text(&format!("item {i}"));
        assert!(monitor.poll().await);
    }
    let history = contents(&monitor);
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history[0], text(&format!("item {HISTORY_CAPACITY}")));
    assert!(!history.contains(&text("item 0")));
}

#[tokio::test]
async fn own_writes_are_not_recaptured() {
    let (mut monitor, handle) = setup().await;
    let item = Item::new(text("from history"));
    assert!(monitor.reuse_item(item.clone()).await);
    monitor.clear_history();

    assert!(!monitor.poll().await);
    assert!(monitor.history().is_empty());
    assert_eq!(monitor.last_change_count(), handle.change_count());
}

#[tokio::test]
async fn read_failures_leave_state_untouched() {
    let (mut monitor, handle) = setup().await;
    handle.copy_text("a");
    monitor.poll().await;
    let before = monitor.history().snapshot();

    handle.copy_text("b");
    handle.set_fail_reads(true);
    assert!(!monitor.poll().await);
    assert_eq!(monitor.history().snapshot(), before);

    handle.set_fail_reads(false);
    assert!(monitor.poll().await);
    assert_eq!(contents(&monitor), vec![text("b"), text("a")]);
}

#[tokio::test(start_paused = true)]
async fn force_paste_with_empty_text_warns() {
    let (mut monitor, handle) = setup().await;
    handle.copy_text("");
    assert!(!monitor.force_paste().await);
    assert!(monitor.history().is_empty());
    assert!(monitor.signals().clipboard_empty);
    assert!(!monitor.signals().paste_confirmed);

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert!(!monitor.signals().clipboard_empty);
}

#[tokio::test]
async fn force_paste_with_nothing_warns() {
    let (mut monitor, handle) = setup().await;
    handle.copy(ClipboardPayload::default());
    assert!(!monitor.force_paste().await);
    assert!(monitor.signals().clipboard_empty);
}

#[tokio::test]
async fn force_paste_with_unreadable_clipboard_warns() {
    let (mut monitor, handle) = setup().await;
    handle.set_fail_reads(true);
    assert!(!monitor.force_paste().await);
    assert!(monitor.signals().clipboard_empty);
    assert!(monitor.history().is_empty());
}

#[tokio::test]
async fn force_paste_falls_through_empty_text_to_file() {
    let (mut monitor, handle) = setup().await;
    handle.copy(ClipboardPayload {
        text: Some(String::new()),
        image: None,
        file: Some(PathBuf::from("/tmp/report.pdf")),
    });
    assert!(monitor.force_paste().await);
    assert_eq!(
        contents(&monitor),
        vec![Content::File(PathBuf::from("/tmp/report.pdf"))]
    );
}

#[tokio::test(start_paused = true)]
async fn force_paste_ignores_the_change_counter() {
    let (mut monitor, _handle) = setup().await;
    // Content predates the monitor, so polling would skip it.
    assert!(!monitor.poll().await);

    assert!(monitor.force_paste().await);
    assert_eq!(contents(&monitor), vec![text("before start")]);
    assert!(monitor.signals().paste_confirmed);

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert!(!monitor.force_paste().await);
    assert_eq!(monitor.history().len(), 1);
    assert!(!monitor.signals().any());
}

#[tokio::test(start_paused = true)]
async fn reuse_skips_write_when_clipboard_matches() {
    let (mut monitor, handle) = setup().await;
    handle.copy_text("same");
    let item = Item::new(text("same"));

    assert!(!monitor.reuse_item(item.clone()).await);
    assert!(handle.writes().is_empty());
    assert!(monitor.history().contains_content_equal(&item.content));
    assert!(monitor.last_written().is_none());
    assert!(!monitor.signals().copy_confirmed);
}

#[tokio::test(start_paused = true)]
async fn reuse_writes_and_confirms() {
    let (mut monitor, handle) = setup().await;
    let item = Item::new(text("again"));

    assert!(monitor.reuse_item(item.clone()).await);
    assert_eq!(handle.writes(), vec![text("again")]);
    assert_eq!(handle.payload(), ClipboardPayload::text("again"));
    assert_eq!(monitor.last_written(), Some(&item));
    assert!(monitor.signals().copy_confirmed);
    assert_eq!(contents(&monitor), vec![text("again")]);

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert!(!monitor.signals().copy_confirmed);
}

#[tokio::test]
async fn reuse_of_existing_item_keeps_history_order() {
    let (mut monitor, handle) = setup().await;
    handle.copy_text("a");
    monitor.poll().await;
    handle.copy_text("b");
    monitor.poll().await;

    let older = monitor.history().get(1).cloned().unwrap();
    assert!(monitor.reuse_item(older).await);
    assert_eq!(contents(&monitor), vec![text("b"), text("a")]);
}

#[tokio::test]
async fn failed_write_does_not_record_last_written() {
    let (mut monitor, handle) = setup().await;
    handle.set_fail_writes(true);
    let item = Item::new(text("nope"));

    assert!(!monitor.reuse_item(item.clone()).await);
    assert!(monitor.last_written().is_none());
    assert!(!monitor.signals().copy_confirmed);
    assert!(monitor.history().contains_content_equal(&item.content));
}

#[tokio::test]
async fn drop_prefers_image_and_rejects_duplicates() {
    let (mut monitor, _handle) = setup().await;
    monitor
        .ingest_external(vec![DropPayload::Text("b".into())])
        .await;
    monitor
        .ingest_external(vec![DropPayload::Text("a".into())])
        .await;
    assert_eq!(contents(&monitor), vec![text("a"), text("b")]);

    let path = png_fixture("drop");
    let inserted = monitor
        .ingest_external(vec![
            DropPayload::FileUrl(path.clone()),
            DropPayload::Text("a".into()),
        ])
        .await;
    let _ = std::fs::remove_file(&path);

    let expected = ImageData::from_rgba(2, 2, &red_pixels()).unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(
        contents(&monitor),
        vec![Content::Image(expected), text("a"), text("b")]
    );
    assert!(!monitor.signals().any());
}

#[tokio::test]
async fn dropped_image_file_is_recognised_by_contents() {
    let (mut monitor, _handle) = setup().await;
    let red = ImageData::from_rgba(2, 2, &red_pixels()).unwrap();
    let blue = ImageData::from_rgba(1, 1, &[10, 10, 200, 255]).unwrap();

    let dir = std::env::temp_dir();
    let bare = dir.join(format!("copyboard-{}-bare", std::process::id()));
    let misnamed = dir.join(format!("copyboard-{}-misnamed.jpg", std::process::id()));
    std::fs::write(&bare, red.png_bytes()).unwrap();
    std::fs::write(&misnamed, blue.png_bytes()).unwrap();

    let inserted = monitor
        .ingest_external(vec![
            DropPayload::FileUrl(bare.clone()),
            DropPayload::FileUrl(misnamed.clone()),
        ])
        .await;
    let _ = std::fs::remove_file(&bare);
    let _ = std::fs::remove_file(&misnamed);

    assert_eq!(inserted, 2);
    assert_eq!(
        contents(&monitor),
        vec![Content::Image(blue), Content::Image(red)]
    );
}

#[tokio::test]
async fn drop_of_plain_file_and_bad_bytes() {
    let (mut monitor, _handle) = setup().await;
    let path = PathBuf::from("/nonexistent/copyboard/notes.txt");
    let inserted = monitor
        .ingest_external(vec![
            DropPayload::FileUrl(path.clone()),
            DropPayload::ImageBytes(b"not an image".to_vec()),
        ])
        .await;
    assert_eq!(inserted, 1);
    assert_eq!(contents(&monitor), vec![Content::File(path)]);
}

#[tokio::test]
async fn dropped_image_bytes_match_copied_image() {
    let (mut monitor, handle) = setup().await;
    let image = ImageData::from_rgba(2, 2, &red_pixels()).unwrap();
    handle.copy(ClipboardPayload::image(image.clone()));
    assert!(monitor.poll().await);

    let inserted = monitor
        .ingest_external(vec![DropPayload::ImageBytes(image.png_bytes().to_vec())])
        .await;
    assert_eq!(inserted, 0);
    assert_eq!(monitor.history().len(), 1);
}

#[tokio::test]
async fn clear_history_empties_and_publishes() {
    let (mut monitor, handle) = setup().await;
    let mut rx = monitor.history_receiver();
    handle.copy_text("a");
    monitor.poll().await;
    assert_eq!(rx.borrow_and_update().len(), 1);

    monitor.clear_history();
    assert!(monitor.history().is_empty());
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_empty());
}
