use std::collections::BTreeMap;
use std::sync::Mutex;

/// Lifecycle events forwarded from the host form runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Ready,
    Submit,
    Reset,
}

/// Submission side of the host runtime. The controller is a consumer only;
/// when no runtime is present (standalone or test mode) the integration is
/// skipped entirely.
pub trait HostRuntime: Send + Sync {
    fn send_submit(&self, payload: BTreeMap<String, String>);
}

/// Records submissions for tests.
pub struct MockHost {
    submissions: Mutex<Vec<BTreeMap<String, String>>>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn submissions(&self) -> Vec<BTreeMap<String, String>> {
        self.submissions.lock().unwrap().clone()
    }
}

impl HostRuntime for MockHost {
    fn send_submit(&self, payload: BTreeMap<String, String>) {
        self.submissions.lock().unwrap().push(payload);
    }
}
