use std::io::IsTerminal;
use std::sync::atomic::{AtomicU64, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

use crate::scanner::{ProgressSink, ScanEvent};

/// How scan events reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EventFormat {
    /// Progress bar plus human-readable lines on stderr.
    #[default]
    Text,
    /// One JSON object per event on stdout.
    Json,
}

/// Progress display for scan, refresh and cleanup runs.
///
/// The bar length is an estimate (the previous snapshot's project count) and
/// grows when the scan finds more. The bar is hidden in quiet mode, in JSON
/// mode, or when stderr is not a TTY.
pub struct ScanProgress {
    progress_bar: ProgressBar,
    counter: AtomicU64,
    format: EventFormat,
    verbose: u8,
    quiet: bool,
}

impl ScanProgress {
    #[must_use]
    pub fn new(estimated_total: u64, format: EventFormat, verbose: u8, quiet: bool) -> Self {
        let is_tty = std::io::stderr().is_terminal();
        Self::new_with_visibility(estimated_total, format, verbose, quiet, is_tty)
    }

    fn new_with_visibility(
        estimated_total: u64,
        format: EventFormat,
        verbose: u8,
        quiet: bool,
        is_tty: bool,
    ) -> Self {
        let progress_bar = if quiet || !is_tty || format == EventFormat::Json {
            ProgressBar::hidden()
        } else {
            Self::create_visible_progress_bar(estimated_total)
        };

        Self {
            progress_bar,
            counter: AtomicU64::new(0),
            format,
            verbose,
            quiet,
        }
    }

    fn create_visible_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} Scanning [{bar:40.cyan/blue}] {pos}/{len} projects {msg}")
                .expect("valid template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Number of per-project events seen so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }

    fn advance(&self) {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        if self.progress_bar.length().is_some_and(|len| count > len) {
            self.progress_bar.set_length(count);
        }
        self.progress_bar.set_position(count);
    }

    fn should_print(&self, event: &ScanEvent) -> bool {
        if self.quiet {
            return false;
        }
        match event {
            ScanEvent::Error { .. } | ScanEvent::Deleted { .. } => true,
            _ => self.verbose > 0,
        }
    }

    fn print_line(&self, line: &str) {
        if self.progress_bar.is_hidden() {
            eprintln!("{line}");
        } else {
            self.progress_bar.println(line);
        }
    }
}

impl ProgressSink for ScanProgress {
    fn emit(&self, event: ScanEvent) {
        if let Some(directory) = event.directory() {
            self.advance();
            self.progress_bar.set_message(super::display_name(directory));
        }

        match self.format {
            EventFormat::Json => {
                if let Ok(line) = serde_json::to_string(&event) {
                    println!("{line}");
                }
            }
            EventFormat::Text => {
                if self.should_print(&event) {
                    self.print_line(&format_event(&event));
                }
            }
        }
    }
}

/// One human-readable line per event.
#[must_use]
pub fn format_event(event: &ScanEvent) -> String {
    match event {
        ScanEvent::Updated {
            directory,
            processing_time,
        } => format!("Updated: {} ({processing_time:.1}s)", directory.display()),
        ScanEvent::Existing {
            directory,
            processing_time,
        } => format!("Existing: {} ({processing_time:.1}s)", directory.display()),
        ScanEvent::Error { directory, error } => {
            format!("Error: {} - {error}", directory.display())
        }
        ScanEvent::Complete { total_time, count } => {
            format!("Complete: {count} projects in {total_time:.1}s")
        }
        ScanEvent::Synced { file } => format!("Synced: {}", file.display()),
        ScanEvent::Deleted { file } => format!("Deleted: {}", file.display()),
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
