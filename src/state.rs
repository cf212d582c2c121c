use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::cache::TaskCache;
use crate::config::Config;
use crate::services::{AuthService, TaskService};
use crate::store::{
    postgres, MemoryTaskStore, MemoryUserStore, PgTaskStore, PgUserStore, StoreError, TaskStore,
    UserStore,
};

/// Everything request handlers need, shared through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        cache: TaskCache,
        tokens: TokenIssuer,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            auth: AuthService::new(users, tokens.clone(), bcrypt_cost),
            tasks: TaskService::new(tasks, cache),
            tokens,
        }
    }

    /// Connects the configured store and cache.
    ///
    /// A store that cannot be reached is an error; a cache that cannot be
    /// reached is not.
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_expires_in);

        let (users, tasks): (Arc<dyn UserStore>, Arc<dyn TaskStore>) =
            if config.uses_memory_store() {
                log::warn!("Using the in-memory store; data is lost on restart");
                (
                    Arc::new(MemoryUserStore::new()),
                    Arc::new(MemoryTaskStore::new()),
                )
            } else {
                let pool =
                    postgres::connect(&config.database_url, config.database_max_connections)
                        .await?;
                log::info!("Connected to Postgres and applied migrations");
                (
                    Arc::new(PgUserStore::new(pool.clone())),
                    Arc::new(PgTaskStore::new(pool)),
                )
            };

        let cache = TaskCache::connect(config.redis_url.as_deref(), config.cache_ttl).await;

        Ok(Self::new(users, tasks, cache, tokens, config.bcrypt_cost))
    }

    /// In-memory store and cache, for local runs and tests.
    pub fn in_memory(config: &Config) -> Self {
        Self::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryTaskStore::new()),
            TaskCache::memory(config.cache_ttl),
            TokenIssuer::new(&config.jwt_secret, config.jwt_expires_in),
            config.bcrypt_cost,
        )
    }
}
