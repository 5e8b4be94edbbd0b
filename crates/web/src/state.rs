use std::collections::HashMap;
use std::sync::Arc;

use jury_storage::TeamRepository;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::middleware::auth::{JuryAuthenticator, SessionStore};
use crate::mirror::{SpreadsheetMirror, StatusNotifier};

/// One async mutex per storage partition, created on first use.
#[derive(Clone, Default)]
pub struct PartitionLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl PartitionLocks {
    pub async fn acquire(&self, partition: String) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(partition).or_default())
        };
        lock.lock_owned().await
    }
}

#[derive(Clone)]
pub struct AppState {
    pub teams: Arc<dyn TeamRepository>,
    pub mirror: Arc<dyn SpreadsheetMirror>,
    pub notifier: StatusNotifier,
    pub authenticator: Arc<dyn JuryAuthenticator>,
    pub sessions: SessionStore,
    pub locks: PartitionLocks,
    pub default_jury_name: Arc<str>,
}

impl AppState {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        mirror: Arc<dyn SpreadsheetMirror>,
        notifier: StatusNotifier,
        authenticator: Arc<dyn JuryAuthenticator>,
        default_jury_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            teams,
            mirror,
            notifier,
            authenticator,
            sessions: SessionStore::new(),
            locks: PartitionLocks::default(),
            default_jury_name: default_jury_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_partition_is_exclusive() {
        let locks = PartitionLocks::default();
        let guard = locks.acquire("data/jury1.json".to_string()).await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _guard = contender.acquire("data/jury1.json".to_string()).await;
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_other_partitions_do_not_block() {
        let locks = PartitionLocks::default();
        let _guard = locks.acquire("data/jury1.json".to_string()).await;

        tokio::time::timeout(
            Duration::from_secs(1),
            locks.acquire("data/jury2.json".to_string()),
        )
        .await
        .unwrap();
    }
}
