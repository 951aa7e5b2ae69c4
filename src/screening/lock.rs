// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Keyed lease locks with bounded wait and hold timeouts.
//!
//! A lease that outlives its hold timeout is treated as free, so a stalled
//! holder cannot block a key forever. Releasing checks the lease token: a
//! guard whose lease expired and was taken over never frees the new holder.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{sync::Notify, time::Instant};
use uuid::Uuid;

/// Upper bound between checks while waiting, so expiring leases are noticed.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LockError {
    #[error("lock {key} is held by another worker")]
    Unavailable { key: String },
}

#[derive(Debug, Clone, Copy)]
struct Lease {
    token: Uuid,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct LockManager {
    leases: Mutex<HashMap<String, Lease>>,
    released: Notify,
}

impl LockManager {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Acquire `key`, waiting at most `wait`. The lease lapses after `hold`.
    pub async fn acquire(
        self: &Arc<Self>,
        key: &str,
        hold: Duration,
        wait: Duration,
    ) -> Result<LockGuard, LockError> {
        let deadline = Instant::now() + wait;
        loop {
            let notified = self.released.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(token) = self.try_acquire(key, hold) {
                return Ok(LockGuard {
                    manager: Arc::clone(self),
                    key: key.to_string(),
                    token,
                });
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(LockError::Unavailable {
                    key: key.to_string(),
                });
            }
            let nap = (deadline - now).min(POLL_INTERVAL);
            tokio::select! {
                _ = &mut notified => {}
                _ = tokio::time::sleep(nap) => {}
            }
        }
    }

    /// Whether `key` is currently held by a live lease.
    pub fn is_locked(&self, key: &str) -> bool {
        let now = Instant::now();
        self.leases
            .lock()
            .map(|leases| leases.get(key).is_some_and(|l| l.expires_at > now))
            .unwrap_or(false)
    }

    fn try_acquire(&self, key: &str, hold: Duration) -> Option<Uuid> {
        let now = Instant::now();
        let mut leases = self.leases.lock().ok()?;
        match leases.get(key) {
            Some(lease) if lease.expires_at > now => None,
            _ => {
                let token = Uuid::new_v4();
                leases.insert(
                    key.to_string(),
                    Lease {
                        token,
                        expires_at: now + hold,
                    },
                );
                Some(token)
            }
        }
    }

    fn release(&self, key: &str, token: Uuid) {
        if let Ok(mut leases) = self.leases.lock() {
            if leases.get(key).is_some_and(|l| l.token == token) {
                leases.remove(key);
            }
        }
        self.released.notify_waiters();
    }
}

/// Held lease; released on drop.
#[derive(Debug)]
pub struct LockGuard {
    manager: Arc<LockManager>,
    key: String,
    token: Uuid,
}

impl LockGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.manager.release(&self.key, self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_secs(120);

    #[tokio::test]
    async fn second_acquire_fails_within_wait_budget() {
        let locks = LockManager::new();
        let guard = locks
            .acquire("k", HOLD, Duration::from_millis(10))
            .await
            .unwrap();
        assert!(locks.is_locked("k"));

        let err = locks
            .acquire("k", HOLD, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert_eq!(err, LockError::Unavailable { key: "k".to_string() });

        // Other keys are independent
        assert!(locks.acquire("other", HOLD, Duration::ZERO).await.is_ok());

        drop(guard);
        assert!(!locks.is_locked("k"));
    }

    #[tokio::test]
    async fn waiter_gets_lock_after_release() {
        let locks = LockManager::new();
        let guard = locks.acquire("k", HOLD, Duration::ZERO).await.unwrap();

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                locks
                    .acquire("k", HOLD, Duration::from_secs(5))
                    .await
                    .map(|g| g.key().to_string())
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);
        assert_eq!(waiter.await.unwrap().unwrap(), "k");
    }

    #[tokio::test]
    async fn expired_lease_is_taken_over() {
        let locks = LockManager::new();
        let stale = locks
            .acquire("k", Duration::from_millis(20), Duration::ZERO)
            .await
            .unwrap();

        let fresh = locks
            .acquire("k", HOLD, Duration::from_secs(1))
            .await
            .unwrap();

        // Dropping the stale guard must not free the new holder's lease
        drop(stale);
        assert!(locks.is_locked("k"));
        drop(fresh);
        assert!(!locks.is_locked("k"));
    }
}
