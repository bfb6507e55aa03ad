use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// One async mutex per workbook, so edits and jobs against the same
/// workbook run one at a time while different workbooks proceed in parallel
#[derive(Default)]
pub struct WorkbookLocks {
    locks: RwLock<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl WorkbookLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the lock for a workbook
    pub async fn get_or_create(&self, workbook_id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(&workbook_id) {
                return Arc::clone(lock);
            }
        }

        let mut locks = self.locks.write().await;
        // Another task may have inserted it between the two guards
        Arc::clone(locks.entry(workbook_id).or_default())
    }

    /// Forget a deleted workbook's lock
    pub async fn remove(&self, workbook_id: Uuid) {
        self.locks.write().await.remove(&workbook_id);
    }

    pub async fn count(&self) -> usize {
        self.locks.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_workbook_shares_a_lock() {
        let locks = WorkbookLocks::new();
        let id = Uuid::new_v4();

        let a = locks.get_or_create(id).await;
        let b = locks.get_or_create(id).await;
        assert!(Arc::ptr_eq(&a, &b));

        let _other = locks.get_or_create(Uuid::new_v4()).await;
        assert_eq!(locks.count().await, 2);

        let _guard = a.lock().await;
        assert!(b.try_lock().is_err());

        locks.remove(id).await;
        assert_eq!(locks.count().await, 1);
    }
}
