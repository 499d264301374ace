//! User-notification capability.
//!
//! Controllers report outcomes (toasts in the original UI) and gate
//! destructive actions behind a confirmation prompt. Both go through this
//! seam so a front end can render them however it likes and tests can
//! record them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{error, info, warn};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Notification and confirmation sink.
pub trait Notifier: Send + Sync {
    /// Surface a transient message to the user.
    fn notify(&self, message: &str, level: NoticeLevel);

    /// Ask the user to confirm a destructive action.
    fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Notifier for headless use: messages go to the log, confirmations are
/// answered by the configured policy (`--yes` in the CLI).
#[derive(Debug)]
pub struct TracingNotifier {
    assume_yes: bool,
}

impl TracingNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, level: NoticeLevel) {
        match level {
            NoticeLevel::Info => info!("{}", message),
            NoticeLevel::Success => info!("{}", message),
            NoticeLevel::Error => error!("{}", message),
        }
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            info!("{}: {} (auto-confirmed)", title, message);
        } else {
            warn!("{}: {} (declined; pass --yes to confirm)", title, message);
        }
        self.assume_yes
    }
}

/// Recording notifier for tests: captures every notice and answers
/// confirmations with a preset response.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(String, NoticeLevel)>>,
    confirmations: Mutex<Vec<String>>,
    answer: AtomicBool,
}

impl RecordingNotifier {
    pub fn new(answer: bool) -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
            answer: AtomicBool::new(answer),
        }
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub fn notices(&self) -> Vec<(String, NoticeLevel)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, level: NoticeLevel) {
        self.notices
            .lock()
            .unwrap()
            .push((message.to_string(), level));
    }

    fn confirm(&self, title: &str, _message: &str) -> bool {
        self.confirmations.lock().unwrap().push(title.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}
