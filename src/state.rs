use std::sync::Arc;

use crate::{
    captcha::CaptchaClient,
    config::Config,
    database::{RedisStore, init_redis},
    error::AppError,
    query::ListingCache,
};

/// Everything shared across requests, built once at startup and injected
/// into the handlers. No lazy globals.
pub struct AppState {
    pub config: Config,
    pub store: RedisStore,
    pub captcha: CaptchaClient,
    pub http: reqwest::Client,
    pub listing_cache: ListingCache,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>, AppError> {
        let config = Config::load();

        let http = reqwest::Client::new();
        let connection = init_redis(&config.redis_url).await?;
        let store = RedisStore::new(connection);
        let captcha = CaptchaClient::new(http.clone(), &config);

        Ok(Arc::new(Self {
            config,
            store,
            captcha,
            http,
            listing_cache: ListingCache::default(),
        }))
    }
}
