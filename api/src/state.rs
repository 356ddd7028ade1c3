//! Shared application state wired over the MySQL and Redis adapters

use std::sync::Arc;

use sp_core::errors::DomainResult;
use sp_core::services::cipher::ClaimCipher;
use sp_core::services::credential::{CredentialCodec, CredentialCodecConfig};
use sp_core::services::rate_limit::RateLimiter;
use sp_core::services::session::{SessionService, SessionServiceConfig};
use sp_infra::{
    DatabasePool, MySqlAccountRepository, MySqlSignAttemptRepository, MySqlVerificationRepository,
    RedisClient,
};
use sp_shared::{AppConfig, CredentialConfig};

/// The orchestrator over the production adapters
pub type AppSessionService = SessionService<
    MySqlAccountRepository,
    MySqlSignAttemptRepository,
    MySqlVerificationRepository,
    RedisClient,
>;

pub type AppRateLimiter = RateLimiter<RedisClient>;

/// Everything handlers and middleware reach for
pub struct AppState {
    pub session: Arc<AppSessionService>,
    pub limiter: Arc<AppRateLimiter>,
    pub db: DatabasePool,
    pub cache: Arc<RedisClient>,
    /// Token lifetimes, reused for cookie max-age on web transport
    pub credential: CredentialConfig,
}

impl AppState {
    /// Builds the service graph from live connections.
    ///
    /// Fails only when the claim cipher key is unusable; connection
    /// problems surface earlier, when the pool and client are created.
    pub fn assemble(config: &AppConfig, db: DatabasePool, cache: RedisClient) -> DomainResult<Self> {
        let cache = Arc::new(cache);
        let cipher = Arc::new(ClaimCipher::new(&config.credential.claim_cipher_key)?);
        let codec = Arc::new(CredentialCodec::new(
            CredentialCodecConfig::from(&config.credential),
            Arc::clone(&cipher),
        ));

        let pool = db.pool().clone();
        let session = SessionService::new(
            Arc::new(MySqlAccountRepository::new(pool.clone())),
            Arc::new(MySqlSignAttemptRepository::new(pool.clone())),
            Arc::new(MySqlVerificationRepository::new(pool)),
            Arc::clone(&cache),
            codec,
            cipher,
            SessionServiceConfig::default(),
        );

        Ok(Self {
            session: Arc::new(session),
            limiter: Arc::new(RateLimiter::new(Arc::clone(&cache))),
            db,
            cache,
            credential: config.credential.clone(),
        })
    }
}
