//! Bearer-Token Provision
//!
//! The OAuth layer lives outside this workspace; components that call
//! authenticated endpoints consume it through this trait. Tokens are
//! requested per call so long-running transfers pick up refreshed
//! credentials without restarting.

use async_trait::async_trait;

use crate::error::Result;

/// Supplies the current bearer token for the publishing platform.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current access token, refreshed by the implementation as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid token can be produced (e.g. the
    /// refresh flow failed).
    async fn access_token(&self) -> Result<String>;
}

/// A fixed token, for tests and short-lived command invocations where
/// the caller has already completed the auth flow.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token() {
        let provider = StaticTokenProvider::new("abc");
        assert_eq!(provider.access_token().await.unwrap(), "abc");
    }
}
