use indicatif::{ProgressBar, ProgressStyle};
use kontakt_core::batch::{BatchObserver, FileOutcome};
use std::path::Path;

/// Renders one progress bar per PDF, advanced page by page.
pub struct ProgressObserver {
    quiet: bool,
    bar: Option<ProgressBar>,
    records: usize,
}

impl ProgressObserver {
    pub fn new(quiet: bool) -> Self {
        ProgressObserver {
            quiet,
            bar: None,
            records: 0,
        }
    }
}

impl BatchObserver for ProgressObserver {
    fn batch_started(&mut self, file_count: usize) {
        if !self.quiet {
            eprintln!("Found {file_count} PDF file(s)");
        }
    }

    fn file_started(&mut self, source: &Path, page_count: usize) {
        self.records = 0;
        if self.quiet {
            return;
        }
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        eprintln!("Processing: {name}");

        let bar = ProgressBar::new(page_count as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} OCR [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        self.bar = Some(bar);
    }

    fn page_finished(&mut self, _page_number: usize, records_on_page: usize) {
        self.records += records_on_page;
        if let Some(bar) = &self.bar {
            bar.set_message(format!("({} rows)", self.records));
            bar.inc(1);
        }
    }

    fn file_finished(&mut self, outcome: &FileOutcome) {
        if let Some(bar) = self.bar.take() {
            if outcome.is_failed() {
                bar.abandon_with_message("failed");
            } else {
                bar.finish();
            }
        }
    }
}
