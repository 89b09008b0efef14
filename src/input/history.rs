//! Session history buffer
//!
//! Physical lines are accumulated until a statement or command completes,
//! then handed to the line editor as a single entry, subject to the
//! configured de-duplication policy.

use crate::settings::HistControl;

#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    pending: String,
    previous: Option<String>,
    control: HistControl,
}

impl HistoryBuffer {
    pub fn new(control: HistControl) -> Self {
        Self {
            pending: String::new(),
            previous: None,
            control,
        }
    }

    /// Append a physical line to the pending entry
    pub fn append(&mut self, line: &str) {
        self.pending.push_str(line);
        if !line.ends_with('\n') {
            self.pending.push('\n');
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take the pending lines as one history entry.
    ///
    /// The pending buffer is always cleared. Returns `None` if nothing is
    /// pending or the entry is filtered out by the policy.
    pub fn take_entry(&mut self) -> Option<String> {
        let entry = self.pending.trim_end_matches('\n').to_string();
        self.pending.clear();

        if entry.is_empty() {
            return None;
        }

        let ignored_space = self.control.ignore_space() && entry.starts_with(' ');
        let ignored_dup =
            self.control.ignore_dups() && self.previous.as_deref() == Some(entry.as_str());
        if ignored_space || ignored_dup {
            return None;
        }

        self.previous = Some(entry.clone());
        Some(entry)
    }
}
