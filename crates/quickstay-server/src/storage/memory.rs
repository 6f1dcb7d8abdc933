//! Process-local object store
//!
//! Keeps objects in a map and records deletions. A put can be made to fail
//! by its call index, which lets tests drive partial batch failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{public_url, ObjectStore};

pub const DEFAULT_MEMORY_BASE_URL: &str = "http://localhost/objects";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug)]
pub struct InMemoryObjectStore {
    base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
    deleted: RwLock<Vec<String>>,
    puts: AtomicUsize,
    fail_put_at: Option<usize>,
    fail_deletes: bool,
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_BASE_URL)
    }
}

impl InMemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
            deleted: RwLock::new(Vec::new()),
            puts: AtomicUsize::new(0),
            fail_put_at: None,
            fail_deletes: false,
        }
    }

    /// Make the `index`-th put (zero based) fail
    pub fn failing_put_at(mut self, index: usize) -> Self {
        self.fail_put_at = Some(index);
        self
    }

    /// Make every delete fail
    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    /// Keys passed to `delete`, in call order
    pub async fn deleted(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }

    pub fn put_attempts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_public(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        let attempt = self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_put_at == Some(attempt) {
            anyhow::bail!("Injected failure storing {}", key);
        }

        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );

        Ok(public_url(&self.base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.deleted.write().await.push(key.to_string());
        if self.fail_deletes {
            anyhow::bail!("Injected failure deleting {}", key);
        }
        self.objects.write().await.remove(key);
        Ok(())
    }
}
