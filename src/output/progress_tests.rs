use std::path::PathBuf;

use super::*;

fn updated(dir: &str) -> ScanEvent {
    ScanEvent::Updated {
        directory: PathBuf::from(dir),
        processing_time: 0.31,
    }
}

#[test]
fn test_progress_counts_project_events_only() {
    let progress = ScanProgress::new(10, EventFormat::Text, 0, true);
    progress.emit(updated("/a"));
    progress.emit(ScanEvent::Existing {
        directory: PathBuf::from("/b"),
        processing_time: 0.0,
    });
    progress.emit(ScanEvent::Complete {
        total_time: 1.0,
        count: 2,
    });
    assert_eq!(progress.position(), 2);
    progress.finish();
}

#[test]
fn test_visible_bar_grows_past_estimate() {
    let progress = ScanProgress::new_with_visibility(1, EventFormat::Text, 0, false, true);
    progress.emit(updated("/a"));
    progress.emit(updated("/b"));
    progress.emit(updated("/c"));
    assert_eq!(progress.progress_bar.length(), Some(3));
    progress.finish();
}

#[test]
fn test_bar_hidden_in_json_mode() {
    let progress = ScanProgress::new_with_visibility(5, EventFormat::Json, 0, false, true);
    assert!(progress.progress_bar.is_hidden());
}

#[test]
fn test_errors_and_deletions_print_without_verbose() {
    let progress = ScanProgress::new_with_visibility(0, EventFormat::Text, 0, false, false);
    let error = ScanEvent::Error {
        directory: PathBuf::from("/x"),
        error: "denied".to_string(),
    };
    assert!(progress.should_print(&error));
    assert!(progress.should_print(&ScanEvent::Deleted { file: "/f".into() }));
    assert!(!progress.should_print(&updated("/a")));

    let verbose = ScanProgress::new_with_visibility(0, EventFormat::Text, 1, false, false);
    assert!(verbose.should_print(&updated("/a")));

    let quiet = ScanProgress::new_with_visibility(0, EventFormat::Text, 2, true, false);
    assert!(!quiet.should_print(&error));
}

#[test]
fn test_format_event_lines() {
    assert_eq!(format_event(&updated("/p/app")), "Updated: /p/app (0.3s)");
    assert_eq!(
        format_event(&ScanEvent::Error {
            directory: PathBuf::from("/p/bad"),
            error: "boom".to_string(),
        }),
        "Error: /p/bad - boom"
    );
    assert_eq!(
        format_event(&ScanEvent::Complete {
            total_time: 12.34,
            count: 7,
        }),
        "Complete: 7 projects in 12.3s"
    );
    assert_eq!(
        format_event(&ScanEvent::Synced {
            file: PathBuf::from("/s.jsonl"),
        }),
        "Synced: /s.jsonl"
    );
}
