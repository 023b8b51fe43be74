//! Ordered turn-taking between workers.
//!
//! A `TurnChain` hands out permission to act by sequence index: worker
//! `i` waits until the chain reaches turn `i`, does its work, then
//! advances the chain to `i + 1`. Each index is served exactly once,
//! in order, and waiters are woken directly instead of polling.
//!
//! Two independent chains drive a run: one gates page appends, one
//! gates on-screen previews. Both start at turn 1, so the first worker
//! never waits.

use thiserror::Error;
use tokio::sync::watch;

/// Error returned to waiters when a chain is poisoned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    /// A worker failed fatally before this turn arrived; the chain
    /// will never advance and waiting would deadlock.
    #[error("turn chain interrupted before turn {seq}")]
    Interrupted { seq: u64 },
}

#[derive(Debug, Clone, Copy)]
struct TurnState {
    current: u64,
    poisoned: bool,
}

/// Shared, clonable turn dispenser.
#[derive(Debug, Clone)]
pub struct TurnChain {
    tx: watch::Sender<TurnState>,
}

impl TurnChain {
    /// Creates a chain with the first turn (1) already live.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(TurnState {
            current: 1,
            poisoned: false,
        });
        Self { tx }
    }

    /// Waits until turn `seq` is live. Resolves immediately if the
    /// chain has already reached or passed `seq`.
    pub async fn wait(&self, seq: u64) -> Result<(), TurnError> {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so the channel cannot close while
        // we hold it; wait_for only fails on a dropped sender.
        let state = rx
            .wait_for(|s| s.poisoned || s.current >= seq)
            .await
            .map_err(|_| TurnError::Interrupted { seq })?;

        if state.current >= seq {
            Ok(())
        } else {
            Err(TurnError::Interrupted { seq })
        }
    }

    /// Marks turn `seq` as complete, making `seq + 1` live.
    ///
    /// Only the holder of the live turn advances the chain; a stale or
    /// repeated completion is ignored.
    pub fn complete(&self, seq: u64) {
        self.tx.send_modify(|s| {
            if s.current == seq {
                s.current = seq + 1;
            }
        });
    }

    /// Wakes every waiter with an error. Turns already granted are
    /// unaffected; turns not yet reached will never be granted.
    pub fn poison(&self) {
        self.tx.send_modify(|s| s.poisoned = true);
    }

    /// The currently live turn (next index allowed to act).
    pub fn current(&self) -> u64 {
        self.tx.borrow().current
    }
}

impl Default for TurnChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn test_first_turn_is_immediately_live() {
        let chain = TurnChain::new();
        chain.wait(1).await.unwrap();
        assert_eq!(chain.current(), 1);
    }

    #[tokio::test]
    async fn test_turns_granted_strictly_in_order() {
        let chain = TurnChain::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        // Spawn in reverse to make out-of-order grants likely if the
        // chain were broken.
        for seq in (1..=5u64).rev() {
            let chain = chain.clone();
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                chain.wait(seq).await.unwrap();
                order.lock().await.push(seq);
                chain.complete(seq);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().await, vec![1, 2, 3, 4, 5]);
        assert_eq!(chain.current(), 6);
    }

    #[tokio::test]
    async fn test_complete_is_idempotent() {
        let chain = TurnChain::new();
        chain.complete(1);
        chain.complete(1);
        // A second completion of the same turn must not skip turn 2.
        assert_eq!(chain.current(), 2);
    }

    #[tokio::test]
    async fn test_stale_completion_ignored() {
        let chain = TurnChain::new();
        chain.complete(5);
        assert_eq!(chain.current(), 1);
    }

    #[tokio::test]
    async fn test_poison_wakes_pending_waiters() {
        let chain = TurnChain::new();
        let waiter = {
            let chain = chain.clone();
            tokio::spawn(async move { chain.wait(3).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        chain.poison();

        let result = waiter.await.unwrap();
        assert_eq!(result, Err(TurnError::Interrupted { seq: 3 }));
    }

    #[tokio::test]
    async fn test_poison_does_not_revoke_live_turn() {
        let chain = TurnChain::new();
        chain.complete(1);
        chain.poison();
        // Turn 2 was already live when the chain was poisoned.
        chain.wait(2).await.unwrap();
        assert_eq!(chain.wait(3).await, Err(TurnError::Interrupted { seq: 3 }));
    }
}
