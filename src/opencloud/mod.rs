//! Roblox Open Cloud integration subsystem.
//!
//! # Data Flow
//! ```text
//! GatewayConfig.opencloud (API key, group id)
//!     → client.rs (authenticated reqwest client)
//!     → types.rs (wire types, OpenCloudError)
//! ```
//!
//! # Security Constraints
//! - The API key only travels in the `x-api-key` header
//! - Never log the API key

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::OpenCloudClient;
pub use types::{GroupMembership, GroupMembershipRole, GroupRole, OpenCloudError, OpenCloudResult};

/// The two group operations the gateway consumes.
#[async_trait]
pub trait GroupsApi: Send + Sync {
    /// Every role of `group_id`, across all pages.
    async fn list_group_roles(&self, group_id: &str) -> OpenCloudResult<Vec<GroupRole>>;

    /// Assign `role` (a role path) to `user_id`. Open Cloud answers with the
    /// membership, which names the role only by path.
    async fn update_group_membership(
        &self,
        group_id: &str,
        user_id: &str,
        role: &str,
    ) -> OpenCloudResult<GroupMembership>;
}
