use log::{error, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Sink for user-facing notices raised by the store: toasts in a
/// graphical shell, stderr lines in the terminal client.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, description: &str, severity: Severity);
}

/// Default sink that routes notices into the process log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, description: &str, severity: Severity) {
        match severity {
            Severity::Info => info!("{}: {}", title, description),
            Severity::Error => error!("{}: {}", title, description),
        }
    }
}
