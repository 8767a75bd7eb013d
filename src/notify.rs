//! User-facing notifications.

/// Fire-and-forget success/error messages.
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Prints notifications to the console.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    /// Suppress success messages.
    pub quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        if !self.quiet {
            println!("✅ {}", message);
        }
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }
}

/// Records notifications for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub messages: std::cell::RefCell<Vec<(bool, String)>>,
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.messages.borrow_mut().push((true, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages.borrow_mut().push((false, message.to_string()));
    }
}
