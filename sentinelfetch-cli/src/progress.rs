//! Terminal progress for archive runs.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use sentinelfetch::report::{Reporter, RunEvent, Severity, TracingReporter};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Reporter that logs every event and shows a records bar on the terminal.
///
/// Warnings and errors are also echoed above the bar.
pub struct ConsoleReporter {
    log: TracingReporter,
    bar: ProgressBar,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let bar_style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(bar_style);
        Self {
            log: TracingReporter,
            bar,
        }
    }

    fn update_terminal(&self, event: &RunEvent) {
        match event {
            RunEvent::DownloadsStarted { count } => {
                self.bar.set_length(*count as u64);
                self.bar.reset_elapsed();
            }
            RunEvent::DownloadStarted { filename } => self.bar.set_message(filename.clone()),
            RunEvent::DownloadProgress {
                filename, percent, ..
            } => {
                self.bar.set_message(format!("{} {}%", filename, percent));
            }
            RunEvent::RecordArchived { .. }
            | RunEvent::RecordSkipped { .. }
            | RunEvent::RecordFailed { .. } => self.bar.inc(1),
            RunEvent::Finished { .. } => self.bar.finish_and_clear(),
            _ => {}
        }

        match event.severity() {
            Severity::Warning => {
                self.bar
                    .println(format!("{} {}", style("warning:").yellow(), event));
            }
            Severity::Error => {
                self.bar.println(format!("{} {}", style("error:").red(), event));
            }
            Severity::Info => {}
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: RunEvent) {
        self.update_terminal(&event);
        self.log.report(event);
    }
}
