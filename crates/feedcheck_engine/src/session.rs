use std::fmt;
use std::time::Duration;

use feedcheck_core::WaitOutcome;

use crate::ActorError;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Browsing session that performs the login action and reports page state.
#[async_trait::async_trait]
pub trait SessionActor: Send {
    async fn submit_login_form(&mut self, credentials: &Credentials) -> Result<(), ActorError>;

    async fn is_rate_limit_marker_visible(&mut self) -> Result<bool, ActorError>;

    /// Reloads the current page and waits for the network to go idle.
    async fn reload_and_settle(&mut self) -> Result<(), ActorError>;

    /// Resolves once a navigation completes. May never resolve.
    async fn wait_for_navigation(&mut self) -> Result<(), ActorError>;

    async fn wait_for_navigation_or_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<WaitOutcome, ActorError> {
        match tokio::time::timeout(timeout, self.wait_for_navigation()).await {
            Ok(result) => result.map(|()| WaitOutcome::Settled),
            Err(_) => Ok(WaitOutcome::TimedOut),
        }
    }

    /// Releases the underlying session. Called once at the end of a flow.
    async fn close(&mut self) -> Result<(), ActorError>;
}
