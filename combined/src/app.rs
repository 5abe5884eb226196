//! Wiring of stores, services and the dispatcher.

use std::sync::Arc;

use accompany_service_lib::{
    AccompanyManager, AccompanyService, AccompanyStore, ReplyManager, ReplyService, ReplyStore,
};
use auth_service_lib::{AuthService, AuthServiceConfig, Authenticator};
use common::{Cache, CacheConfig};
use mail_service_lib::{
    build_sender, DispatchConfig, DispatchLease, LocalLease, MailConfig, MailError, RedisLease,
    VerificationDispatcher,
};
use user_service_lib::{
    Database, UserManager, UserService, UserStore, VerificationManager, VerificationService,
    VerificationStore,
};

/// Every service, built over one connection pool.
pub struct Services {
    pub users: Arc<dyn UserService>,
    pub verifications: Arc<dyn VerificationService>,
    pub auth: Arc<dyn AuthService>,
    pub accompanies: Arc<dyn AccompanyService>,
    pub replies: Arc<dyn ReplyService>,
}

impl Services {
    pub fn new(db: &Database, auth_config: &AuthServiceConfig) -> Self {
        let connection = db.get_connection();

        let user_store = Arc::new(UserStore::new(connection.clone()));
        let verification_store = Arc::new(VerificationStore::new(connection.clone()));
        let accompany_store = Arc::new(AccompanyStore::new(connection.clone()));
        let reply_store = Arc::new(ReplyStore::new(connection));

        let users: Arc<dyn UserService> = Arc::new(UserManager::new(user_store.clone()));
        let verifications: Arc<dyn VerificationService> =
            Arc::new(VerificationManager::new(user_store, verification_store));
        let auth: Arc<dyn AuthService> = Arc::new(Authenticator::new(
            users.clone(),
            verifications.clone(),
            auth_config,
        ));

        Self {
            users,
            verifications,
            auth,
            accompanies: Arc::new(AccompanyManager::new(accompany_store.clone())),
            replies: Arc::new(ReplyManager::new(reply_store, accompany_store)),
        }
    }
}

/// Connect to Redis when `REDIS_URL` is set.
pub async fn connect_cache() -> Result<Option<Arc<Cache>>, Box<dyn std::error::Error>> {
    match CacheConfig::from_env() {
        Some(config) => Ok(Some(Arc::new(Cache::connect(&config.url).await?))),
        None => {
            tracing::info!("REDIS_URL not set; rate limiting disabled, dispatch lease is local");
            Ok(None)
        }
    }
}

/// Dispatcher over the configured mail sender; the lease is shared through
/// Redis, on top of the in-process one, when a cache is available.
pub fn build_dispatcher(
    verifications: Arc<dyn VerificationService>,
    cache: Option<Arc<Cache>>,
    config: &DispatchConfig,
) -> Result<Arc<VerificationDispatcher>, MailError> {
    let sender = build_sender(&MailConfig::from_env())?;
    let lease: Arc<dyn DispatchLease> = match cache {
        Some(cache) => Arc::new(RedisLease::layered(cache, config.lease_ttl)),
        None => Arc::new(LocalLease::new()),
    };

    Ok(Arc::new(VerificationDispatcher::new(
        verifications,
        sender,
        lease,
        config,
    )))
}
