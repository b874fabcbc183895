//! Rank to role resolution and membership updates.

use std::sync::Arc;

use crate::observability::metrics;
use crate::opencloud::{GroupMembership, GroupMembershipRole, GroupRole, GroupsApi};
use crate::ranking::cache::RoleCache;
use crate::ranking::error::{RankingError, RankingResult};

/// Applies numeric ranks to members of the configured group.
#[derive(Clone)]
pub struct RankingService {
    api: Arc<dyn GroupsApi>,
    group_id: Option<String>,
    cache: Arc<RoleCache>,
}

impl RankingService {
    /// Create a service for `group_id`. An empty id is kept as "not
    /// configured" and every operation then fails with
    /// [`RankingError::Configuration`].
    pub fn new(api: Arc<dyn GroupsApi>, group_id: impl Into<String>, cache: Arc<RoleCache>) -> Self {
        let group_id = group_id.into();
        let group_id = (!group_id.trim().is_empty()).then(|| group_id.trim().to_string());
        Self {
            api,
            group_id,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<RoleCache> {
        &self.cache
    }

    fn group_id(&self) -> RankingResult<&str> {
        self.group_id.as_deref().ok_or(RankingError::Configuration)
    }

    /// The group's roles, fetched on first use and cached afterwards.
    pub async fn group_roles(&self) -> RankingResult<Arc<Vec<GroupRole>>> {
        let group_id = self.group_id()?;

        self.cache
            .get_or_try_fill(move || async move {
                match self.api.list_group_roles(group_id).await {
                    Ok(roles) => {
                        metrics::record_role_fetch("success");
                        Ok(roles)
                    }
                    Err(e) => {
                        metrics::record_role_fetch("error");
                        tracing::error!(group_id = %group_id, error = %e, "Error fetching group roles");
                        Err(RankingError::UpstreamFetch(e))
                    }
                }
            })
            .await
    }

    /// First cached role whose rank equals `rank`.
    async fn role_for_rank(&self, rank: u8) -> RankingResult<GroupRole> {
        let roles = self.group_roles().await?;

        roles
            .iter()
            .find(|role| role.rank == rank)
            .cloned()
            .ok_or_else(|| RankingError::RoleNotFound {
                rank,
                group_id: self.group_id.clone().unwrap_or_default(),
            })
    }

    /// Identifier of the first role whose rank equals `rank`.
    pub async fn resolve_role_id_for_rank(&self, rank: u8) -> RankingResult<String> {
        Ok(self.role_for_rank(rank).await?.path)
    }

    /// Give `user_id` the role that carries `rank_value`.
    ///
    /// Out-of-range ranks are rejected before any upstream call. The reported
    /// role is the cached one; the membership update is the only upstream call
    /// once the cache is warm.
    pub async fn set_rank_by_rank_value(
        &self,
        user_id: &str,
        rank_value: i64,
    ) -> RankingResult<GroupMembershipRole> {
        let rank = u8::try_from(rank_value).map_err(|_| RankingError::InvalidRankValue(rank_value))?;

        let role = self.role_for_rank(rank).await?;
        tracing::debug!(user_id = %user_id, rank, role = %role.path, "Resolved rank to role");

        self.update_group_rank(user_id, &role.path).await?;
        Ok(GroupMembershipRole::from(role))
    }

    /// Assign the role identified by `role_id` to `user_id`. Never retried.
    pub async fn update_group_rank(
        &self,
        user_id: &str,
        role_id: &str,
    ) -> RankingResult<GroupMembership> {
        let group_id = self.group_id()?;

        match self.api.update_group_membership(group_id, user_id, role_id).await {
            Ok(membership) => {
                metrics::record_rank_update("success");
                tracing::info!(
                    user_id = %user_id,
                    membership = %membership.path,
                    role = %membership.role,
                    "Updated group membership"
                );
                Ok(membership)
            }
            Err(e) => {
                metrics::record_rank_update("error");
                tracing::error!(user_id = %user_id, role = %role_id, error = %e, "Failed to update rank");
                Err(RankingError::UpstreamUpdate(e))
            }
        }
    }
}
