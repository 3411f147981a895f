//! Read-through cache in front of a category repository.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use super::CategoryRepository;
use crate::cache::SharedCache;
use crate::domain::Category;
use crate::store::Result;

/// Cache key holding the full category list.
pub const ALL_CATEGORIES_KEY: &str = "categories:all";

/// Cache key holding a single category.
pub fn category_key(id: &str) -> String {
    format!("category:{id}")
}

/// Values held by the category cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryCacheValue {
    All(Vec<Category>),
    One(Category),
}

// == Cached Category Repository ==
/// Decorates a [`CategoryRepository`] with get-or-populate caching.
///
/// Entries expire a fixed time after they are stored. Writes drop the list
/// entry and refresh the single entry; deletes drop both. Lookups that find
/// nothing are not cached.
///
/// Every write bumps a generation counter before invalidating. A read only
/// populates the cache if no write happened while it was fetching.
pub struct CachedCategoryRepository<R> {
    inner: R,
    cache: SharedCache<CategoryCacheValue>,
    generation: AtomicU64,
}

impl<R: CategoryRepository> CachedCategoryRepository<R> {
    pub fn new(inner: R, cache: SharedCache<CategoryCacheValue>) -> Self {
        Self {
            inner,
            cache,
            generation: AtomicU64::new(0),
        }
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    async fn cached(&self, key: &str) -> Option<CategoryCacheValue> {
        let value = self.cache.write().await.get(key);
        debug!(key, hit = value.is_some(), "Category cache lookup");
        value
    }

    async fn store(&self, key: String, value: CategoryCacheValue) {
        self.cache.write().await.insert(key, value);
    }

    /// Caches values read at generation `seen`, unless a write has happened since.
    async fn populate(&self, seen: u64, values: Vec<(String, CategoryCacheValue)>) {
        let mut cache = self.cache.write().await;
        if self.current_generation() != seen {
            debug!("Category cache fill skipped after concurrent write");
            return;
        }
        for (key, value) in values {
            cache.insert(key, value);
        }
    }

    async fn invalidate(&self, keys: &[&str]) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut cache = self.cache.write().await;
        for key in keys {
            cache.invalidate(key);
        }
    }
}

#[async_trait]
impl<R: CategoryRepository> CategoryRepository for CachedCategoryRepository<R> {
    async fn find_all(&self) -> Result<Vec<Category>> {
        if let Some(CategoryCacheValue::All(categories)) = self.cached(ALL_CATEGORIES_KEY).await {
            return Ok(categories);
        }

        let seen = self.current_generation();
        let categories = self.inner.find_all().await?;
        self.populate(
            seen,
            vec![(
                ALL_CATEGORIES_KEY.to_string(),
                CategoryCacheValue::All(categories.clone()),
            )],
        )
        .await;
        Ok(categories)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Category>> {
        let mut found = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        let seen = self.current_generation();

        {
            let mut cache = self.cache.write().await;
            for id in ids {
                match cache.get(&category_key(id)) {
                    Some(CategoryCacheValue::One(category)) => found.push(category),
                    _ => missing.push(id.clone()),
                }
            }
        }

        if missing.is_empty() {
            return Ok(found);
        }

        debug!(cached = found.len(), missing = missing.len(), "Category batch lookup");
        let fetched = self.inner.find_by_ids(&missing).await?;
        let entries = fetched
            .iter()
            .map(|c| (category_key(&c.id), CategoryCacheValue::One(c.clone())))
            .collect();
        self.populate(seen, entries).await;
        found.extend(fetched);
        Ok(found)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Category>> {
        let key = category_key(id);
        if let Some(CategoryCacheValue::One(category)) = self.cached(&key).await {
            return Ok(Some(category));
        }

        let seen = self.current_generation();
        let category = self.inner.find_by_id(id).await?;
        if let Some(category) = &category {
            self.populate(seen, vec![(key, CategoryCacheValue::One(category.clone()))])
                .await;
        }
        Ok(category)
    }

    async fn insert(&self, category: &Category) -> Result<()> {
        self.inner.insert(category).await?;
        self.invalidate(&[ALL_CATEGORIES_KEY]).await;
        self.store(category_key(&category.id), CategoryCacheValue::One(category.clone()))
            .await;
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<bool> {
        let updated = self.inner.update(category).await?;
        self.invalidate(&[ALL_CATEGORIES_KEY]).await;
        if updated {
            self.store(category_key(&category.id), CategoryCacheValue::One(category.clone()))
                .await;
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self.inner.delete(id).await?;
        let key = category_key(id);
        self.invalidate(&[ALL_CATEGORIES_KEY, key.as_str()]).await;
        Ok(deleted)
    }
}
