use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, TodoCache, CACHE_TTL};
use crate::error::{Result, TodoError};
use crate::models::{CreateTodoRequest, Todo, UpdateTodoRequest};
use crate::store::TodoStore;

// == Todo Service ==
/// CRUD over todo records with a read-through, invalidate-after-write cache.
///
/// The cache is decided once at startup: `None` means store-only mode for the
/// life of the process. Cache failures never fail a request; reads fall back
/// to the store and failed invalidations are left to expire.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    cache: Option<Arc<dyn TodoCache>>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, cache: Option<Arc<dyn TodoCache>>) -> Self {
        Self { store, cache }
    }

    pub fn cache_available(&self) -> bool {
        self.cache.is_some()
    }

    // == List All ==
    /// All records, newest first.
    pub async fn list_all(&self) -> Result<Vec<Todo>> {
        let key = CacheKey::AllTodos;
        if let Some(todos) = self.cached(&key).await {
            return Ok(todos);
        }

        let todos = self.store.list_all().await?;
        self.populate(&key, &todos).await;
        Ok(todos)
    }

    // == Get By Id ==
    pub async fn get_by_id(&self, id: i64) -> Result<Todo> {
        let key = CacheKey::Todo(id);
        if let Some(todo) = self.cached(&key).await {
            return Ok(todo);
        }

        let todo = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(id))?;
        self.populate(&key, &todo).await;
        Ok(todo)
    }

    // == Create ==
    pub async fn create(&self, request: CreateTodoRequest) -> Result<Todo> {
        if let Some(msg) = request.validate() {
            return Err(TodoError::Validation(msg));
        }

        let todo = self.store.insert(request.into_new_todo()).await?;
        info!(id = todo.id, "created todo");

        self.invalidate(&[CacheKey::AllTodos]).await;
        Ok(todo)
    }

    // == Update ==
    /// Applies the supplied fields; `updated_at` is refreshed even when no
    /// value changes. An unknown id is `NotFound` whatever the request holds.
    pub async fn update(&self, id: i64, request: UpdateTodoRequest) -> Result<Todo> {
        self.ensure_exists(id).await?;
        if let Some(msg) = request.validate() {
            return Err(TodoError::Validation(msg));
        }

        let todo = self
            .store
            .update(id, request.into_changes())
            .await?
            .ok_or(TodoError::NotFound(id))?;
        info!(id, "updated todo");

        self.invalidate(&[CacheKey::AllTodos, CacheKey::Todo(id)]).await;
        Ok(todo)
    }

    /// `NotFound` unless the store holds a record with `id`. The cache is
    /// not consulted.
    pub async fn ensure_exists(&self, id: i64) -> Result<()> {
        match self.store.get_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(TodoError::NotFound(id)),
        }
    }

    // == Delete ==
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete_by_id(id).await? {
            return Err(TodoError::NotFound(id));
        }
        info!(id, "deleted todo");

        self.invalidate(&[CacheKey::AllTodos, CacheKey::Todo(id)]).await;
        Ok(())
    }

    // == Cache Helpers ==
    /// Reads and decodes a snapshot. Any failure is a miss.
    async fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let cache = self.cache.as_ref()?;
        let raw = match cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(%key, "cache miss");
                return None;
            }
            Err(err) => {
                warn!(%key, error = %err, "cache read failed, falling back to store");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(%key, "cache hit");
                Some(value)
            }
            Err(err) => {
                warn!(%key, error = %err, "discarding undecodable cache entry");
                None
            }
        }
    }

    async fn populate<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let Some(cache) = &self.cache else {
            return;
        };
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%key, error = %err, "could not serialize cache snapshot");
                return;
            }
        };
        if let Err(err) = cache.set(key, payload, CACHE_TTL).await {
            warn!(%key, error = %err, "cache write failed");
        }
    }

    async fn invalidate(&self, keys: &[CacheKey]) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(err) = cache.delete(keys).await {
            warn!(?keys, error = %err, "cache invalidation failed, entries expire with TTL");
        }
    }
}
