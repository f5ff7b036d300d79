//! External rank resolution, used only when a member registers.

pub mod riot;

use async_trait::async_trait;

use crate::error::ApiError;

pub use riot::RiotClient;

/// What registration needs to know about an account.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAccount {
    /// Stable account id.
    pub puuid: String,
    /// Canonical handle, `gameName#tagLine`.
    pub riot_id: String,
    /// Solo-queue tier; `None` for unranked accounts.
    pub tier: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RankError {
    #[error("account {0} not found")]
    AccountNotFound(String),

    #[error("unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("invalid base url `{0}`")]
    BadBaseUrl(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl From<RankError> for ApiError {
    fn from(e: RankError) -> Self {
        match e {
            RankError::AccountNotFound(handle) => ApiError::NotFound {
                what: "riot account",
                id: handle,
            },
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

#[async_trait]
pub trait RankResolver: Send + Sync {
    async fn resolve(&self, game_name: &str, tag_line: &str)
        -> Result<ResolvedAccount, RankError>;
}
