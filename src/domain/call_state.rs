//! Usage: Per-call context (correlation id + calling convention) threaded through log lines.

use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallState {
    pub correlation_id: String,
    /// Caller wants the blocking convention.
    pub call_sync: bool,
}

impl CallState {
    pub fn new(call_sync: bool) -> Self {
        Self {
            correlation_id: new_correlation_id(),
            call_sync,
        }
    }

    pub fn blocking() -> Self {
        Self::new(true)
    }

    pub fn non_blocking() -> Self {
        Self::new(false)
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }
}

fn new_correlation_id() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_ids_are_random_hex() {
        let a = CallState::blocking();
        let b = CallState::non_blocking();
        assert_eq!(a.correlation_id.len(), 32);
        assert!(a.correlation_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.correlation_id, b.correlation_id);
        assert!(a.call_sync);
        assert!(!b.call_sync);
    }
}
