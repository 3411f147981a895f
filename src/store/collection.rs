//! Collection Module
//!
//! A typed view over one named set of JSON documents.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::filter::compare_values;
use super::{Document, Filter, Result, StoreError, ID_FIELD};

type RawDocument = Map<String, Value>;

// == Find Options ==
/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort on a single field; ties are broken by `_id` in the same direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Sorting and windowing applied to `find` results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            order,
        });
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// == Collection ==
/// Documents of type `T`, kept in memory ordered by `_id`.
///
/// When opened with a data directory, the whole collection is written to
/// `<dir>/<collection>.json` after each successful write, through a temp
/// file and rename. Writers hold the write lock while persisting, so the
/// snapshot always reflects the latest write.
#[derive(Debug)]
pub struct Collection<T> {
    documents: RwLock<BTreeMap<String, RawDocument>>,
    snapshot_path: Option<PathBuf>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Collection<T> {
    // == Constructors ==
    /// Creates an empty collection that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            snapshot_path: None,
            _marker: PhantomData,
        }
    }

    /// Opens the collection, loading its snapshot from `data_dir` if present.
    ///
    /// With `data_dir = None` this is [`Collection::in_memory`].
    pub async fn open(data_dir: Option<&Path>) -> Result<Self> {
        let Some(dir) = data_dir else {
            return Ok(Self::in_memory());
        };

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}.json", T::COLLECTION));

        let mut documents = BTreeMap::new();
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Vec<RawDocument> = serde_json::from_slice(&bytes)?;
                for doc in snapshot {
                    let id = doc
                        .get(ID_FIELD)
                        .and_then(Value::as_str)
                        .ok_or(StoreError::MissingId(T::COLLECTION))?
                        .to_string();
                    documents.insert(id, doc);
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        info!(
            collection = T::COLLECTION,
            documents = documents.len(),
            path = %path.display(),
            "Collection opened"
        );

        Ok(Self {
            documents: RwLock::new(documents),
            snapshot_path: Some(path),
            _marker: PhantomData,
        })
    }

    pub fn is_persistent(&self) -> bool {
        self.snapshot_path.is_some()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    // == Writes ==
    // A failed snapshot rolls the in-memory change back.

    /// Inserts a new document; fails with `DuplicateKey` if the id exists.
    pub async fn insert_one(&self, doc: &T) -> Result<()> {
        let raw = to_raw(doc)?;
        let mut documents = self.documents.write().await;
        if documents.contains_key(doc.id()) {
            return Err(StoreError::DuplicateKey(doc.id().to_string()));
        }
        documents.insert(doc.id().to_string(), raw);
        if let Err(e) = self.persist(&documents).await {
            documents.remove(doc.id());
            return Err(e);
        }
        Ok(())
    }

    /// Replaces the document with the same id. Returns false if it does not exist.
    pub async fn replace_one(&self, doc: &T) -> Result<bool> {
        let raw = to_raw(doc)?;
        let mut documents = self.documents.write().await;
        let previous = match documents.get_mut(doc.id()) {
            Some(slot) => std::mem::replace(slot, raw),
            None => return Ok(false),
        };
        if let Err(e) = self.persist(&documents).await {
            documents.insert(doc.id().to_string(), previous);
            return Err(e);
        }
        Ok(true)
    }

    /// Deletes the document with `id`. Returns false if it does not exist.
    pub async fn delete_one(&self, id: &str) -> Result<bool> {
        let mut documents = self.documents.write().await;
        let Some(previous) = documents.remove(id) else {
            return Ok(false);
        };
        if let Err(e) = self.persist(&documents).await {
            documents.insert(id.to_string(), previous);
            return Err(e);
        }
        Ok(true)
    }

    // == Reads ==
    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        let documents = self.documents.read().await;
        documents.get(id).map(from_raw).transpose()
    }

    /// Documents whose ids are in `ids`; unknown ids are skipped.
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<T>> {
        let documents = self.documents.read().await;
        ids.iter()
            .filter_map(|id| documents.get(id))
            .map(from_raw)
            .collect()
    }

    /// Documents matching `filter`, sorted and windowed by `options`.
    ///
    /// Without a sort, results come in `_id` order.
    pub async fn find(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<T>> {
        let documents = self.documents.read().await;
        let mut matched: Vec<&RawDocument> =
            documents.values().filter(|doc| filter.matches(doc)).collect();

        if let Some(sort) = &options.sort {
            matched.sort_by(|a, b| {
                let ordering = compare_values(a.get(&sort.field), b.get(&sort.field))
                    .then_with(|| compare_values(a.get(ID_FIELD), b.get(ID_FIELD)));
                match sort.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        matched
            .into_iter()
            .skip(options.skip)
            .take(options.limit.unwrap_or(usize::MAX))
            .map(from_raw)
            .collect()
    }

    /// Number of documents matching `filter`.
    pub async fn count(&self, filter: &Filter) -> Result<u64> {
        let documents = self.documents.read().await;
        Ok(documents.values().filter(|doc| filter.matches(doc)).count() as u64)
    }

    // == Persistence ==
    async fn persist(&self, documents: &BTreeMap<String, RawDocument>) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let snapshot: Vec<&RawDocument> = documents.values().collect();
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!(
            collection = T::COLLECTION,
            documents = documents.len(),
            "Snapshot written"
        );
        Ok(())
    }
}

fn to_raw<T: Document>(doc: &T) -> Result<RawDocument> {
    match serde_json::to_value(doc)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject(T::COLLECTION)),
    }
}

fn from_raw<T: Document>(raw: &RawDocument) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(raw.clone()))?)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        #[serde(rename = "_id")]
        id: String,
        name: String,
        rank: i64,
    }

    impl Document for Item {
        const COLLECTION: &'static str = "items";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, name: &str, rank: i64) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            rank,
        }
    }

    async fn seeded() -> Collection<Item> {
        let collection = Collection::in_memory();
        collection.insert_one(&item("a", "Alpha", 3)).await.unwrap();
        collection.insert_one(&item("b", "Beta", 1)).await.unwrap();
        collection.insert_one(&item("c", "Gamma", 2)).await.unwrap();
        collection.insert_one(&item("d", "Delta", 2)).await.unwrap();
        collection
    }

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let collection = seeded().await;
        assert_eq!(collection.len().await, 4);
        assert_eq!(
            collection.find_by_id("b").await.unwrap(),
            Some(item("b", "Beta", 1))
        );
        assert_eq!(collection.find_by_id("zzz").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_duplicate_key() {
        let collection = seeded().await;
        let result = collection.insert_one(&item("a", "Again", 0)).await;
        assert!(matches!(result, Err(StoreError::DuplicateKey(ref id)) if id == "a"));
    }

    #[tokio::test]
    async fn test_replace_and_delete() {
        let collection = seeded().await;
        assert!(collection.replace_one(&item("a", "Alpha 2", 9)).await.unwrap());
        assert!(!collection.replace_one(&item("x", "Nope", 0)).await.unwrap());
        assert_eq!(collection.find_by_id("a").await.unwrap().unwrap().rank, 9);

        assert!(collection.delete_one("a").await.unwrap());
        assert!(!collection.delete_one("a").await.unwrap());
        assert_eq!(collection.len().await, 3);
    }

    #[tokio::test]
    async fn test_find_sort_skip_limit() {
        let collection = seeded().await;
        let options = FindOptions::default()
            .sort_by("rank", SortOrder::Descending)
            .skip(1)
            .limit(2);
        let found = collection.find(&Filter::All, &options).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|i| i.id.as_str()).collect();
        // rank ties (c, d) break by _id in the same direction
        assert_eq!(ids, vec!["d", "c"]);
    }

    #[tokio::test]
    async fn test_find_with_filter_and_count() {
        let collection = seeded().await;
        let filter = Filter::contains_ignore_case("name", "TA");
        let found = collection.find(&filter, &FindOptions::default()).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);
        assert_eq!(collection.count(&filter).await.unwrap(), 2);
        assert_eq!(collection.count(&Filter::All).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_unknown() {
        let collection = seeded().await;
        let ids = vec!["c".to_string(), "nope".to_string(), "a".to_string()];
        let found = collection.find_by_ids(&ids).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_skip_past_end_is_empty() {
        let collection = seeded().await;
        let options = FindOptions::default().skip(10).limit(5);
        assert!(collection.find(&Filter::All, &options).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let collection = Collection::<Item>::open(Some(dir.path())).await.unwrap();
            assert!(collection.is_persistent());
            collection.insert_one(&item("a", "Alpha", 1)).await.unwrap();
            collection.insert_one(&item("b", "Beta", 2)).await.unwrap();
            collection.delete_one("a").await.unwrap();
        }

        let reopened = Collection::<Item>::open(Some(dir.path())).await.unwrap();
        assert_eq!(reopened.len().await, 1);
        assert_eq!(
            reopened.find_by_id("b").await.unwrap(),
            Some(item("b", "Beta", 2))
        );
        assert!(dir.path().join("items.json").exists());
        assert!(!dir.path().join("items.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_snapshot_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let collection = Collection::<Item>::open(Some(dir.path())).await.unwrap();
        collection.insert_one(&item("a", "Alpha", 1)).await.unwrap();

        // a directory where the temp file goes makes every snapshot write fail
        std::fs::create_dir(dir.path().join("items.json.tmp")).unwrap();

        assert!(collection.insert_one(&item("b", "Beta", 2)).await.is_err());
        assert_eq!(collection.find_by_id("b").await.unwrap(), None);

        assert!(collection.replace_one(&item("a", "Changed", 9)).await.is_err());
        assert_eq!(
            collection.find_by_id("a").await.unwrap(),
            Some(item("a", "Alpha", 1))
        );

        assert!(collection.delete_one("a").await.is_err());
        assert_eq!(collection.len().await, 1);

        std::fs::remove_dir(dir.path().join("items.json.tmp")).unwrap();
        let reopened = Collection::<Item>::open(Some(dir.path())).await.unwrap();
        assert_eq!(
            reopened.find_by_id("a").await.unwrap(),
            Some(item("a", "Alpha", 1))
        );
        assert_eq!(reopened.len().await, 1);
    }

    #[tokio::test]
    async fn test_open_without_dir_is_in_memory() {
        let collection = Collection::<Item>::open(None).await.unwrap();
        assert!(!collection.is_persistent());
        assert!(collection.is_empty().await);
    }
}
