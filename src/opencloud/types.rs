//! Open Cloud wire types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A role within a group, as listed by Open Cloud.
///
/// `path` (e.g. `groups/7/roles/99`) is the identifier membership updates
/// expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRole {
    pub path: String,
    #[serde(default)]
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rank: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u64>,
}

/// One page of `listGroupRoles`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupRolesResponse {
    #[serde(default)]
    pub group_roles: Vec<GroupRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// A group membership as returned by `updateGroupMembership`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    pub path: String,
    #[serde(default)]
    pub user: String,
    pub role: String,
}

/// The role a member holds after an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembershipRole {
    pub path: String,
    pub display_name: String,
    pub rank: u8,
}

impl From<GroupRole> for GroupMembershipRole {
    fn from(role: GroupRole) -> Self {
        Self {
            path: role.path,
            display_name: role.display_name,
            rank: role.rank,
        }
    }
}

/// Error payload Open Cloud attaches to non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Errors that can occur while talking to Open Cloud.
#[derive(Debug, Error)]
pub enum OpenCloudError {
    /// Transport failure, timeout or undecodable body.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Open Cloud answered with a non-success status.
    #[error("Open Cloud returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Base URL or resource path could not form a request URL.
    #[error("Invalid Open Cloud URL: {0}")]
    InvalidUrl(String),
}

/// Result type for Open Cloud operations.
pub type OpenCloudResult<T> = Result<T, OpenCloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_page_deserialize() {
        let page: ListGroupRolesResponse = serde_json::from_str(
            r#"{
                "groupRoles": [
                    {"path": "groups/7/roles/1", "id": "1", "displayName": "Guest", "rank": 0},
                    {"path": "groups/7/roles/50", "id": "50", "displayName": "Member", "rank": 50, "memberCount": 12}
                ],
                "nextPageToken": "abc"
            }"#,
        )
        .unwrap();

        assert_eq!(page.group_roles.len(), 2);
        assert_eq!(page.group_roles[1].display_name, "Member");
        assert_eq!(page.group_roles[1].member_count, Some(12));
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_page() {
        let page: ListGroupRolesResponse = serde_json::from_str("{}").unwrap();
        assert!(page.group_roles.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_membership_role_from_role() {
        let role = GroupRole {
            path: "groups/7/roles/50".into(),
            id: "50".into(),
            display_name: "Member".into(),
            description: None,
            rank: 50,
            member_count: None,
        };
        let membership_role = GroupMembershipRole::from(role);
        assert_eq!(membership_role.rank, 50);
        assert_eq!(membership_role.display_name, "Member");
    }

    #[test]
    fn test_error_display() {
        let err = OpenCloudError::Api {
            status: 403,
            message: "Insufficient scope".into(),
        };
        assert_eq!(err.to_string(), "Open Cloud returned 403: Insufficient scope");
    }
}
