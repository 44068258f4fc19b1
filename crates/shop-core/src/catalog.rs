//! # Catalog Cache
//!
//! Time-bounded in-memory snapshot of the provider catalog.
//!
//! One `CatalogCache` is constructed per process and shared through the
//! application state. The snapshot is either empty or the complete result of
//! one successful refresh; a failed refresh leaves the previous snapshot in
//! place and returns the error (stale data is not served automatically).
//!
//! Concurrent callers that find the snapshot expired queue behind a single
//! refresh and reuse its result.

use crate::error::PaymentResult;
use crate::product::{CatalogEntry, Expandable, Price, Product};
use crate::provider::PaymentProvider;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use secrecy::SecretString;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Default time-to-live of a catalog snapshot
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(10 * 60);

/// Products requested per refresh (first page only)
pub const PRODUCT_PAGE_LIMIT: u32 = 100;

#[derive(Debug)]
struct CacheRecord {
    entries: Arc<Vec<CatalogEntry>>,
    refreshed_at: Instant,
    refreshed_at_utc: DateTime<Utc>,
}

/// Snapshot summary for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub entries: usize,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub ttl_secs: u64,
}

/// Process-wide catalog cache
#[derive(Debug)]
pub struct CatalogCache {
    ttl: Duration,
    record: RwLock<Option<CacheRecord>>,
    refresh_lock: Mutex<()>,
}

impl CatalogCache {
    /// Create an empty cache with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            record: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the catalog, refreshing it from `provider` when the snapshot is
    /// missing or older than the TTL.
    pub async fn get_catalog(
        &self,
        provider: &dyn PaymentProvider,
        key: &SecretString,
    ) -> PaymentResult<Arc<Vec<CatalogEntry>>> {
        if let Some(entries) = self.fresh_entries().await {
            debug!("Serving cached catalog ({} entries)", entries.len());
            return Ok(entries);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited
        if let Some(entries) = self.fresh_entries().await {
            debug!("Serving catalog refreshed by concurrent request");
            return Ok(entries);
        }

        let started = Instant::now();
        info!(
            "Fetching catalog from {} (limit={})",
            provider.provider_name(),
            PRODUCT_PAGE_LIMIT
        );

        let page = provider.list_products(key, PRODUCT_PAGE_LIMIT).await?;
        if page.has_more {
            warn!(
                "Catalog has more than {} products; only the first page is cached",
                PRODUCT_PAGE_LIMIT
            );
        }

        let entries = try_join_all(
            page.data
                .iter()
                .map(|product| resolve_entry(provider, key, product)),
        )
        .await?;

        let entries = Arc::new(entries);
        *self.record.write().await = Some(CacheRecord {
            entries: Arc::clone(&entries),
            refreshed_at: started,
            refreshed_at_utc: Utc::now(),
        });

        info!("Catalog refreshed: {} entries", entries.len());
        Ok(entries)
    }

    /// Summary of the current snapshot
    pub async fn status(&self) -> CacheStatus {
        let record = self.record.read().await;
        CacheStatus {
            entries: record.as_ref().map_or(0, |r| r.entries.len()),
            refreshed_at: record.as_ref().map(|r| r.refreshed_at_utc),
            ttl_secs: self.ttl.as_secs(),
        }
    }

    async fn fresh_entries(&self) -> Option<Arc<Vec<CatalogEntry>>> {
        let record = self.record.read().await;
        record
            .as_ref()
            .filter(|r| r.refreshed_at.elapsed() < self.ttl)
            .map(|r| Arc::clone(&r.entries))
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_TTL)
    }
}

/// Resolve a product's default price and project it into a catalog entry.
async fn resolve_entry(
    provider: &dyn PaymentProvider,
    key: &SecretString,
    product: &Product,
) -> PaymentResult<CatalogEntry> {
    let fetched: Option<Price> = match &product.default_price {
        Some(Expandable::Id(price_id)) => {
            Some(provider.retrieve_price(key, price_id, false).await?)
        }
        _ => None,
    };

    let price = match &product.default_price {
        Some(Expandable::Object(price)) => Some(price.as_ref()),
        _ => fetched.as_ref(),
    };

    Ok(CatalogEntry::from_parts(product, price))
}
