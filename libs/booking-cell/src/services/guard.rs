// libs/booking-cell/src/services/guard.rs
//
// Per-professional advisory lock for the commit path. Two concurrent commits
// for the same professional serialize here, so the re-validate-and-insert
// step runs single-writer per calendar; commits for different professionals
// stay parallel.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

pub struct SlotGuard {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl SlotGuard {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry used by the HTTP handlers. Tests construct
    /// their own instances.
    pub fn global() -> Arc<SlotGuard> {
        static GLOBAL: OnceLock<Arc<SlotGuard>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(SlotGuard::new())).clone()
    }

    /// Acquire the professional's lock, waiting behind any in-flight commit.
    /// The entry map is bounded by the number of distinct professionals seen
    /// by this process.
    pub async fn acquire(&self, professional_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(professional_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }
}

impl Default for SlotGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn same_professional_serializes() {
        let guard = Arc::new(SlotGuard::new());
        let professional = Uuid::new_v4();
        let in_section = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let guard = guard.clone();
            let in_section = in_section.clone();
            handles.push(tokio::spawn(async move {
                let _held = guard.acquire(professional).await;
                let concurrent = in_section.fetch_add(1, Ordering::SeqCst);
                assert_eq!(concurrent, 0, "critical section must be exclusive");
                tokio::task::yield_now().await;
                in_section.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn different_professionals_do_not_block_each_other() {
        let guard = SlotGuard::new();
        let first = guard.acquire(Uuid::new_v4()).await;
        // Would deadlock if the registry used one global lock.
        let second = guard.acquire(Uuid::new_v4()).await;
        drop(first);
        drop(second);
    }
}
