//! Group role caching.

use arc_swap::ArcSwapOption;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::opencloud::GroupRole;

/// Load-once cache of a group's roles.
///
/// Reads never block. Population is serialized: concurrent callers that
/// find the cache empty wait for a single fetch instead of each issuing one.
/// A failed fetch stores nothing, so the next caller fetches again. Once
/// populated the list is kept for the life of the process.
#[derive(Default)]
pub struct RoleCache {
    roles: ArcSwapOption<Vec<GroupRole>>,
    fill_lock: Mutex<()>,
}

impl RoleCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached roles, if a fetch has succeeded.
    pub fn get(&self) -> Option<Arc<Vec<GroupRole>>> {
        self.roles.load_full()
    }

    pub fn is_populated(&self) -> bool {
        self.roles.load().is_some()
    }

    /// Number of cached roles (0 while empty).
    pub fn len(&self) -> usize {
        self.get().map_or(0, |roles| roles.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached roles, running `fetch` to populate the cache first
    /// if it is empty.
    pub async fn get_or_try_fill<F, Fut, E>(&self, fetch: F) -> Result<Arc<Vec<GroupRole>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<GroupRole>, E>>,
    {
        if let Some(roles) = self.get() {
            return Ok(roles);
        }

        let _guard = self.fill_lock.lock().await;

        // Another task may have filled it while we waited.
        if let Some(roles) = self.get() {
            return Ok(roles);
        }

        let roles = Arc::new(fetch().await?);
        self.roles.store(Some(roles.clone()));
        tracing::info!(roles = roles.len(), "Group role cache populated");
        Ok(roles)
    }
}
