// token_gate.rs - keeps a valid gateway token available for payment requests

use crate::error::ApiError;
use crate::gateway::PaymentGateway;
use chrono::{DateTime, Duration, Utc};
use database::store::TokenStore;
use database::tokens::model::AuthToken;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Upstream tokens live for 60 minutes; refresh a little early.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 55;
/// A cached token must expire before the upstream one does.
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 59;

/// Checks a configured lifetime. A lifetime of zero or less would make every
/// stored token stale on arrival and defeat the single-refresh guarantee.
pub fn token_lifetime(minutes: i64) -> Result<Duration, ApiError> {
    if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&minutes) {
        return Err(ApiError::Configuration(format!(
            "Token lifetime must be between 1 and {} minutes, got {}",
            MAX_TOKEN_LIFETIME_MINUTES, minutes
        )));
    }
    Ok(Duration::minutes(minutes))
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Returns the stored token while it is fresh and fetches a new one otherwise.
///
/// Refreshes are serialized: callers that find the token stale queue on
/// `refresh`, and whoever gets the lock second re-reads the store and reuses
/// the token the first caller saved. With N concurrent callers and an
/// expired token there is exactly one upstream grant call.
pub struct TokenGate {
    store: Arc<dyn TokenStore>,
    gateway: Arc<dyn PaymentGateway>,
    lifetime: Duration,
    refresh: Mutex<()>,
    clock: Clock,
}

impl TokenGate {
    pub fn new(store: Arc<dyn TokenStore>, gateway: Arc<dyn PaymentGateway>, lifetime: Duration) -> Self {
        TokenGate {
            store,
            gateway,
            lifetime,
            refresh: Mutex::new(()),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    async fn cached(&self) -> Result<Option<AuthToken>, ApiError> {
        let now = self.now();
        let token = self.store.current_token().await?;
        Ok(token.filter(|t| t.is_valid_at(now)))
    }

    pub async fn ensure_valid_token(&self) -> Result<AuthToken, ApiError> {
        if let Some(token) = self.cached().await? {
            debug!("Using valid token from database");
            return Ok(token);
        }

        let _guard = self.refresh.lock().await;

        // Another request may have refreshed while we waited for the lock
        if let Some(token) = self.cached().await? {
            debug!("Token was refreshed by a concurrent request");
            return Ok(token);
        }

        info!("Token expired or missing. Fetching new token from bKash");
        let id_token = self.gateway.grant_token().await.map_err(|e| {
            error!("Grant token error: {}", e);
            ApiError::AuthenticationFailure
        })?;

        let issued_at = self.now();
        let token = AuthToken {
            token: id_token,
            issued_at,
            expires_at: issued_at + self.lifetime,
        };
        self.store.save_token(&token).await?;

        info!("Stored new token valid until {}", token.expires_at);
        Ok(token)
    }
}
