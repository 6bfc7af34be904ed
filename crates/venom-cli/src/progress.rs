//! Terminal progress display for snapshot ingest (§10.5).
//!
//! Purely cosmetic: suppressed under `-q` or when stderr isn't a TTY.

use indicatif::{ProgressBar, ProgressStyle};

pub struct IngestProgress {
    bar: Option<ProgressBar>,
}

impl IngestProgress {
    pub fn new(total: u64, quiet: bool) -> Self {
        let bar = if quiet || total == 0 || !console_is_tty() {
            None
        } else {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("  ingest [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                    .expect("valid template")
                    .progress_chars("##-"),
            );
            Some(bar)
        };
        Self { bar }
    }

    pub fn tick(&self, file_name: &str) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
            bar.set_message(file_name.to_string());
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

fn console_is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}
