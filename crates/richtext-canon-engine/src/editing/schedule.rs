//! Deferred-work scheduling without timers.
//!
//! All engine work runs on the caller's thread in response to input
//! events; "later" is expressed as a due time on a caller-supplied
//! millisecond clock, polled cooperatively. A [`Debounce`] is a timer
//! armed on the first request, absorbing further requests while armed and
//! firing once before rearming.

/// Delay before a burst of edits produces one `changed` notification.
pub const CHANGE_DEBOUNCE_MS: u64 = 200;

/// Delay between redirecting focus to the paste capture sink and reading
/// what landed there.
pub const PASTE_CAPTURE_DELAY_MS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Debounce {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Debounce {
    pub fn new(delay_ms: u64) -> Debounce {
        Debounce {
            delay_ms,
            deadline: None,
        }
    }

    /// Request a firing. Arms the timer on the first request; requests
    /// while armed are absorbed (leading-edge coalescing). Returns whether
    /// this request armed the timer.
    pub fn request(&mut self, now_ms: u64) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now_ms + self.delay_ms);
        true
    }

    /// Fire if due. Disarms on firing so the next request rearms.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Phase-one state of a paste: what was true when focus was redirected to
/// the capture sink. Consumed by phase two; dropped on deactivation.
#[derive(Debug, Clone)]
pub struct PasteCapture {
    pub due_ms: u64,
    /// Whether an inline annotation was active at the insertion point.
    pub annotation_active: bool,
}
