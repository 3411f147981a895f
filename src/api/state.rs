//! Application state shared across all handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::application::Inventory;
use crate::auth::IdentityProvider;
use crate::cache::{self, CacheStore, SharedCache};
use crate::config::Config;
use crate::domain::{Category, Product};
use crate::error::Result;
use crate::repository::{
    CachedCategoryRepository, CategoryCacheValue, DocumentCategoryRepository,
    DocumentProductRepository,
};
use crate::store::Collection;

#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<Inventory>,
    /// Category cache, also swept by the cleanup task
    pub category_cache: SharedCache<CategoryCacheValue>,
    /// Present when authentication is enabled
    pub identity: Option<Arc<IdentityProvider>>,
    /// Snapshot directory; None when collections live only in memory
    pub data_dir: Option<PathBuf>,
    pub started_at: Instant,
}

impl AppState {
    /// Wires repositories, cache and identity provider over the given collections.
    pub fn new(
        products: Collection<Product>,
        categories: Collection<Category>,
        config: &Config,
    ) -> Result<Self> {
        let category_cache = cache::shared(CacheStore::new(config.category_cache_ttl));
        let data_dir = config.data_dir.clone().filter(|_| products.is_persistent());

        let products = DocumentProductRepository::new(Arc::new(products));
        let categories = CachedCategoryRepository::new(
            DocumentCategoryRepository::new(Arc::new(categories)),
            category_cache.clone(),
        );
        let inventory = Inventory::new(
            Arc::new(products),
            Arc::new(categories),
            config.low_stock_threshold,
        );

        let identity = match &config.auth_userinfo_url {
            Some(url) => {
                info!(userinfo_url = %url, "Authentication enabled");
                Some(Arc::new(IdentityProvider::new(url.clone(), config.auth_cache_ttl)?))
            }
            None => {
                info!("Authentication disabled");
                None
            }
        };

        Ok(Self {
            inventory: Arc::new(inventory),
            category_cache,
            identity,
            data_dir,
            started_at: Instant::now(),
        })
    }

    /// Opens the collections under `config.data_dir`, or in memory when unset.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let data_dir = config.data_dir.as_deref();
        let products = Collection::open(data_dir).await?;
        let categories = Collection::open(data_dir).await?;
        Self::new(products, categories, config)
    }

    /// State over empty in-memory collections.
    pub fn in_memory(config: &Config) -> Result<Self> {
        Self::new(Collection::in_memory(), Collection::in_memory(), config)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
