//! # In-Flight Gate
//!
//! Rejects a second copy of a request while the first is pending.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login() ──► gate.enter("login") ──► Ok(ticket) ──► request ... ──┐    │
//! │  login() ──► gate.enter("login") ──► Err(Busy)                     │    │
//! │                                                                    ▼    │
//! │                                          ticket dropped, gate reopens   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ticket is an RAII guard, so the gate reopens on success, on error, and
//! when the caller's future is dropped mid-request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ClientError, ClientResult};

/// A single-slot gate for one kind of request.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the gate for `operation`.
    ///
    /// ## Errors
    /// [`ClientError::Busy`] if a request of this kind is already pending.
    pub fn enter(&self, operation: &'static str) -> ClientResult<InFlightTicket> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ClientError::Busy { operation });
        }

        Ok(InFlightTicket {
            busy: Arc::clone(&self.busy),
        })
    }

    /// Checks if a request is pending.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of a request; reopens the gate on drop.
#[derive(Debug)]
pub struct InFlightTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_entry_is_busy() {
        let gate = InFlight::new();

        let ticket = gate.enter("checkout").unwrap();
        assert!(gate.is_busy());
        assert!(matches!(
            gate.enter("checkout"),
            Err(ClientError::Busy {
                operation: "checkout"
            })
        ));

        drop(ticket);
        assert!(!gate.is_busy());
        assert!(gate.enter("checkout").is_ok());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let gate = InFlight::new();
        let other = gate.clone();

        let _ticket = gate.enter("login").unwrap();
        assert!(other.is_busy());
        assert!(other.enter("login").is_err());
    }
}
