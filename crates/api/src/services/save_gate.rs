//! Per-document save gate.
//!
//! At most one save or edit batch runs per `(owner, invitation)` at a time.
//! A second attempt while one is in flight is refused rather than queued.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

type DocumentKey = (Uuid, String);

#[derive(Debug, Default)]
pub struct SaveGate {
    in_flight: Mutex<HashSet<DocumentKey>>,
}

impl SaveGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the document, or `None` if a save is already running. The claim
    /// is released when the guard drops, whatever the outcome.
    pub fn try_acquire(self: &Arc<Self>, owner_id: Uuid, id: &str) -> Option<SaveGuard> {
        let key = (owner_id, id.to_string());
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !in_flight.insert(key.clone()) {
            return None;
        }
        Some(SaveGuard {
            gate: Arc::clone(self),
            key,
        })
    }
}

#[derive(Debug)]
pub struct SaveGuard {
    gate: Arc<SaveGate>,
    key: DocumentKey,
}

impl Drop for SaveGuard {
    fn drop(&mut self) {
        self.gate
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_save_is_refused_until_release() {
        let gate = Arc::new(SaveGate::new());
        let owner = Uuid::new_v4();

        let guard = gate.try_acquire(owner, "k3Xq9mPa2B").unwrap();
        assert!(gate.try_acquire(owner, "k3Xq9mPa2B").is_none());

        drop(guard);
        assert!(gate.try_acquire(owner, "k3Xq9mPa2B").is_some());
    }

    #[test]
    fn test_documents_are_independent() {
        let gate = Arc::new(SaveGate::new());
        let owner = Uuid::new_v4();

        let _a = gate.try_acquire(owner, "aaaaaaaaaa").unwrap();
        assert!(gate.try_acquire(owner, "bbbbbbbbbb").is_some());
        assert!(gate.try_acquire(Uuid::new_v4(), "aaaaaaaaaa").is_some());
    }

    #[tokio::test]
    async fn test_guard_released_when_task_fails() {
        let gate = Arc::new(SaveGate::new());
        let owner = Uuid::new_v4();

        let task_gate = Arc::clone(&gate);
        let result = tokio::spawn(async move {
            let _guard = task_gate.try_acquire(owner, "k3Xq9mPa2B").unwrap();
            Err::<(), &str>("storage unavailable")
        })
        .await
        .unwrap();

        assert!(result.is_err());
        assert!(gate.try_acquire(owner, "k3Xq9mPa2B").is_some());
    }
}
