//! In-memory `GroupsApi` stub shared by unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::opencloud::{GroupMembership, GroupRole, GroupsApi, OpenCloudError, OpenCloudResult};

pub fn role(path: &str, rank: u8, display_name: &str) -> GroupRole {
    GroupRole {
        path: path.to_string(),
        id: path.rsplit('/').next().unwrap_or_default().to_string(),
        display_name: display_name.to_string(),
        description: None,
        rank,
        member_count: None,
    }
}

/// Counts every call and can be told to fail either operation.
#[derive(Default)]
pub struct StubGroupsApi {
    roles: Mutex<Vec<GroupRole>>,
    list_delay: Mutex<Option<Duration>>,
    pub fail_list: AtomicBool,
    pub fail_update: AtomicBool,
    pub list_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub updates: Mutex<Vec<(String, String, String)>>,
}

impl StubGroupsApi {
    pub fn with_roles(roles: Vec<GroupRole>) -> Self {
        Self {
            roles: Mutex::new(roles),
            ..Self::default()
        }
    }

    /// Replace what the "upstream" reports from now on.
    pub fn set_roles(&self, roles: Vec<GroupRole>) {
        *self.roles.lock().unwrap() = roles;
    }

    /// Make every role listing hang for `delay` first.
    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GroupsApi for StubGroupsApi {
    async fn list_group_roles(&self, _group_id: &str) -> OpenCloudResult<Vec<GroupRole>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(OpenCloudError::Api {
                status: 503,
                message: "roles unavailable".into(),
            });
        }
        Ok(self.roles.lock().unwrap().clone())
    }

    async fn update_group_membership(
        &self,
        group_id: &str,
        user_id: &str,
        role: &str,
    ) -> OpenCloudResult<GroupMembership> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(OpenCloudError::Api {
                status: 403,
                message: "Insufficient permissions".into(),
            });
        }
        self.updates
            .lock()
            .unwrap()
            .push((group_id.to_string(), user_id.to_string(), role.to_string()));

        Ok(GroupMembership {
            path: format!("groups/{}/memberships/{}", group_id, user_id),
            user: format!("users/{}", user_id),
            role: role.to_string(),
        })
    }
}
