//! Spinner-backed notifier for interactive commands.

use indicatif::ProgressBar;

use super::output;
use crate::port::{Event, Notifier};

/// Shows the pending reference on the command's spinner.
pub struct ProgressNotifier {
    bar: ProgressBar,
}

impl ProgressNotifier {
    #[must_use]
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl Notifier for ProgressNotifier {
    fn notify(&self, event: Event) {
        if let Event::Submitted(e) = event {
            self.bar.set_message(format!(
                "Transaction Pending {}",
                output::muted(e.reference)
            ));
        }
    }
}
