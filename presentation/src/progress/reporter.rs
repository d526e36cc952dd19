//! Progress reporting for recommendation rounds

use crate::i18n::Messages;
use bookbot_application::ports::progress::{AttemptFailure, RoundProgressNotifier};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Localized notice for a failed attempt that will be retried.
///
/// All-duplicate attempts retry silently.
fn retry_notice(messages: &Messages, failure: AttemptFailure) -> Option<&'static str> {
    match failure {
        AttemptFailure::Llm => Some(messages.retry_llm),
        AttemptFailure::Unparseable => Some(messages.retry_parse),
        AttemptFailure::Invalid => Some(messages.retry_validate),
        AttemptFailure::Duplicates => None,
    }
}

/// Spinner on stderr while the model is working
pub struct ProgressReporter {
    messages: &'static Messages,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new(messages: &'static Messages) -> Self {
        Self {
            messages,
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl RoundProgressNotifier for ProgressReporter {
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(self.messages.searching_attempt(attempt, max_attempts));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.spinner.lock()
            && let Some(previous) = guard.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_attempt_failed(&self, _attempt: usize, failure: AttemptFailure, will_retry: bool) {
        self.clear();
        if will_retry && let Some(notice) = retry_notice(self.messages, failure) {
            eprintln!("{}", notice.yellow());
        }
    }

    fn on_round_complete(&self, _success: bool) {
        self.clear();
    }
}

/// Plain line-based progress for non-terminal stderr
pub struct SimpleProgress {
    messages: &'static Messages,
}

impl SimpleProgress {
    pub fn new(messages: &'static Messages) -> Self {
        Self { messages }
    }
}

impl RoundProgressNotifier for SimpleProgress {
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize) {
        eprintln!("{}", self.messages.searching_attempt(attempt, max_attempts));
    }

    fn on_attempt_failed(&self, _attempt: usize, failure: AttemptFailure, will_retry: bool) {
        if will_retry && let Some(notice) = retry_notice(self.messages, failure) {
            eprintln!("{notice}");
        }
    }
}
