//! Ranking error definitions.

use thiserror::Error;

use crate::opencloud::OpenCloudError;

/// Errors produced while translating a rank into a membership update.
#[derive(Debug, Error)]
pub enum RankingError {
    /// The target group was never configured.
    #[error("Ranking configuration failed: target group ID is missing")]
    Configuration,

    /// Rank outside 0..=255. Raised before any upstream call.
    #[error("Invalid rank value {0}. Must be between 0 and 255.")]
    InvalidRankValue(i64),

    /// No role of the group carries this rank.
    #[error("Rank value {rank} is invalid or not configured in group {group_id}.")]
    RoleNotFound { rank: u8, group_id: String },

    /// Listing the group's roles failed; the cache stays empty.
    #[error("Failed to initialize group roles data from Roblox Open Cloud")]
    UpstreamFetch(#[source] OpenCloudError),

    /// The membership update failed.
    #[error("Ranking operation failed: {0}")]
    UpstreamUpdate(#[source] OpenCloudError),
}

impl RankingError {
    /// Whether the caller's input, rather than the server or upstream, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RankingError::InvalidRankValue(_))
    }
}

/// Result type for ranking operations.
pub type RankingResult<T> = Result<T, RankingError>;
