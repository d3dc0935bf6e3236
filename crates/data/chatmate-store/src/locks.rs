//! Per-record async locks

use crate::RecordKind;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

type Key = (RecordKind, String);

#[derive(Default)]
pub(crate) struct RecordLocks {
    inner: Mutex<HashMap<Key, Arc<tokio::sync::Mutex<()>>>>,
}

impl RecordLocks {
    /// Wait for exclusive access to one record.
    pub(crate) async fn acquire(&self, kind: RecordKind, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry((kind, id.to_string())).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry of a deleted record.
    pub(crate) fn forget(&self, kind: RecordKind, id: &str) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&(kind, id.to_string()));
    }

    /// Release a lock taken for a record that turned out not to exist.
    pub(crate) fn release_missing(&self, guard: OwnedMutexGuard<()>, kind: RecordKind, id: &str) {
        drop(guard);
        self.forget(kind, id);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_record_is_exclusive() {
        let locks = Arc::new(RecordLocks::default());
        let guard = locks.acquire(RecordKind::Chat, "a").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire(RecordKind::Chat, "a").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_records_do_not_block() {
        let locks = RecordLocks::default();
        let _a = locks.acquire(RecordKind::Chat, "a").await;
        let _b = locks.acquire(RecordKind::Chat, "b").await;
        let _c = locks.acquire(RecordKind::Contact, "a").await;
        assert_eq!(locks.len(), 3);
    }

    #[tokio::test]
    async fn test_forget() {
        let locks = RecordLocks::default();
        drop(locks.acquire(RecordKind::Contact, "x").await);
        locks.forget(RecordKind::Contact, "x");
        assert_eq!(locks.len(), 0);
    }
}
