//! Cached reads and writes over a [`NutritionBackend`].
//!
//! Each read is stored under a [`QueryKey`] derived from its parameters, so identical
//! requests share one result until it goes stale. The calculation mutation seeds the
//! entry its own read would use, so reading the same request back costs no call.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Instant;

use crate::api::NutritionBackend;
use crate::error::ApiResult;
use crate::types::{ComplexFood, NutritionCalculationRequest, NutritionResponse};

pub const FOODS_STALE_TIME: Duration = Duration::from_secs(5 * 60);
pub const COMPOSITION_STALE_TIME: Duration = Duration::from_secs(10 * 60);
pub const NUTRITION_STALE_TIME: Duration = Duration::from_secs(5 * 60);
pub const HEALTH_REFETCH_INTERVAL: Duration = Duration::from_secs(30);
pub const HEALTH_RETRIES: usize = 1;
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Foods,
    FoodComposition(String),
    /// Weight is keyed by its bit pattern so equal requests hash equally.
    Nutrition {
        food_name: String,
        weight_bits: u64,
    },
    Health,
}

impl QueryKey {
    pub fn nutrition(request: &NutritionCalculationRequest) -> Self {
        QueryKey::Nutrition {
            food_name: request.food_name.clone(),
            weight_bits: request.weight_grams.to_bits(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    fetched_at: Instant,
    stale_after: Duration,
}

impl CacheEntry {
    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() < self.stale_after
    }
}

pub struct QueryClient<B> {
    backend: B,
    cache: Mutex<HashMap<QueryKey, CacheEntry>>,
}

impl<B: NutritionBackend> QueryClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn foods(&self) -> ApiResult<Vec<String>> {
        if let Some(foods) = self.cached(&QueryKey::Foods) {
            return Ok(foods);
        }
        let foods = self.backend.list_foods().await?;
        self.store(QueryKey::Foods, &foods, FOODS_STALE_TIME);
        Ok(foods)
    }

    /// Disabled for a blank name: returns `None` without a call.
    pub async fn food_composition(&self, food_name: &str) -> ApiResult<Option<ComplexFood>> {
        if food_name.trim().is_empty() {
            return Ok(None);
        }
        let key = QueryKey::FoodComposition(food_name.to_string());
        if let Some(composition) = self.cached(&key) {
            return Ok(Some(composition));
        }
        let composition = self.backend.food_composition(food_name).await?;
        self.store(key, &composition, COMPOSITION_STALE_TIME);
        Ok(Some(composition))
    }

    /// Always calls the backend, then seeds the cache for this exact request.
    pub async fn calculate_nutrition(
        &self,
        request: &NutritionCalculationRequest,
    ) -> ApiResult<NutritionResponse> {
        let response = self.backend.calculate_nutrition(request).await?;
        self.store(QueryKey::nutrition(request), &response, NUTRITION_STALE_TIME);
        Ok(response)
    }

    /// Read side of [`QueryClient::calculate_nutrition`].
    pub async fn nutrition(
        &self,
        request: &NutritionCalculationRequest,
    ) -> ApiResult<NutritionResponse> {
        let key = QueryKey::nutrition(request);
        if let Some(response) = self.cached(&key) {
            return Ok(response);
        }
        let response = self.backend.calculate_nutrition(request).await?;
        self.store(key, &response, NUTRITION_STALE_TIME);
        Ok(response)
    }

    /// Never cached. A failed check is retried [`HEALTH_RETRIES`] time(s).
    pub async fn health(&self) -> ApiResult<Value> {
        let mut attempt = 0;
        loop {
            match self.backend.health_check().await {
                Ok(status) => return Ok(status),
                Err(e) if attempt < HEALTH_RETRIES => {
                    attempt += 1;
                    tracing::debug!(error = %e, attempt, "health check failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Poll [`QueryClient::health`] every `every`, the first poll immediately.
    /// Stops after `max_ticks` polls when given.
    pub async fn watch_health<F>(&self, every: Duration, max_ticks: Option<usize>, mut on_tick: F)
    where
        F: FnMut(&ApiResult<Value>),
    {
        let mut interval = tokio::time::interval(every);
        let mut ticks = 0usize;
        loop {
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            interval.tick().await;
            let result = self.health().await;
            on_tick(&result);
            ticks += 1;
        }
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.lock().remove(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn cached<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let cache = self.lock();
        let entry = cache.get(key).filter(|entry| entry.is_fresh())?;
        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => {
                tracing::debug!(?key, "query cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(?key, error = %e, "cached value has unexpected shape");
                None
            }
        }
    }

    fn store<T: Serialize>(&self, key: QueryKey, value: &T, stale_after: Duration) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.lock().insert(
                    key,
                    CacheEntry {
                        value,
                        fetched_at: Instant::now(),
                        stale_after,
                    },
                );
            }
            Err(e) => tracing::warn!(?key, error = %e, "value not cacheable"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
