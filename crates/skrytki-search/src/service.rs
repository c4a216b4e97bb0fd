//! Request-level entry points used by the HTTP layer and the CLI.

use std::time::Duration;

use backon::{ConstantBuilder, Retryable};
use rusqlite::Connection;

use skrytki_core::error::is_connectivity_failure;
use skrytki_core::model::{AddressRecord, EntityId, SearchHit};
use skrytki_core::schema::Pool;

use crate::error::LookupError;
use crate::query::SearchQuery;
use crate::searcher;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Stateless lookup over a shared connection pool.
///
/// Every call runs on a pooled connection in a blocking task, under the
/// request deadline. A connectivity failure discards the connection and
/// the call is retried once on a fresh one.
#[derive(Debug, Clone)]
pub struct LookupService {
    pool: Pool,
    timeout: Duration,
    retry_delay: Duration,
}

impl LookupService {
    #[must_use]
    pub fn new(pool: Pool, timeout: Duration) -> Self {
        Self {
            pool,
            timeout,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Pause before the retry.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Search entities by registry number, name or address.
    pub async fn search(
        &self,
        text: &str,
        offices_only: bool,
        limit: usize,
    ) -> Result<Vec<SearchHit>, LookupError> {
        let query = SearchQuery::new(text, offices_only, limit)?;
        let raw = query.raw().to_string();

        let result = self
            .run("search", move |conn| searcher::search(conn, &query))
            .await?;

        log::debug!(
            "search {raw:?}: {} hits ({:?})",
            result.hits.len(),
            result.outcome
        );
        Ok(result.hits)
    }

    /// All mailbox addresses of the entity whose id is `raw_id`.
    pub async fn get_addresses(&self, raw_id: &str) -> Result<Vec<AddressRecord>, LookupError> {
        let id: EntityId = raw_id
            .parse()
            .map_err(|_| LookupError::InvalidInput(format!("not an entity id: {raw_id:?}")))?;

        self.run("get_addresses", move |conn| searcher::addresses(conn, id))
            .await
    }

    async fn run<T, F>(&self, what: &'static str, work: F) -> Result<T, LookupError>
    where
        T: Send + 'static,
        F: Fn(&Connection) -> rusqlite::Result<T> + Clone + Send + 'static,
    {
        let once = || attempt(self.pool.clone(), work.clone());
        let retried = once
            .retry(
                ConstantBuilder::default()
                    .with_delay(self.retry_delay)
                    .with_max_times(1),
            )
            .when(LookupError::is_transient)
            .notify(|err: &LookupError, after: Duration| {
                log::warn!("{what} failed ({err}); retrying on a new connection in {after:?}");
            });

        let result = match tokio::time::timeout(self.timeout, retried).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(self.timeout)),
        };
        if let Err(err) = &result {
            log::error!("{what} failed: {err}");
        }
        result
    }
}

async fn attempt<T, F>(pool: Pool, work: F) -> Result<T, LookupError>
where
    T: Send + 'static,
    F: Fn(&Connection) -> rusqlite::Result<T> + Send + 'static,
{
    let mut conn = pool.get().await.map_err(LookupError::from_storage)?;

    let joined = tokio::task::spawn_blocking(move || {
        let result = work(&*conn);
        if let Err(err) = &result {
            if is_connectivity_failure(err) {
                conn.mark_broken();
            }
        }
        result
    })
    .await;

    match joined {
        Ok(result) => result.map_err(LookupError::from),
        Err(err) => Err(LookupError::Query(skrytki_core::Error::InvalidData(format!(
            "lookup task failed: {err}"
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use tempfile::TempDir;

    fn service(size: usize, timeout: Duration) -> (TempDir, LookupService) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skrytki.db");
        test_support::file_db(&path);
        (dir, LookupService::new(Pool::new(path, size), timeout))
    }

    #[tokio::test]
    async fn test_search_returns_hits() {
        let (_dir, service) = service(2, Duration::from_secs(5));
        let hits = service.search("  000000003 ", false, 100).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].nazwa, "Urząd Miasta Żółkiewka");
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let (_dir, service) = service(1, Duration::from_secs(5));
        let err = service.search("   ", false, 100).await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_get_addresses() {
        let (_dir, service) = service(1, Duration::from_secs(5));
        let records = service.get_addresses("1").await.unwrap();
        assert_eq!(records.len(), 2);

        assert!(service.get_addresses("999").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_addresses_rejects_bad_id() {
        let (_dir, service) = service(1, Duration::from_secs(5));
        let err = service.get_addresses("abc").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_connections_are_returned() {
        let (_dir, service) = service(1, Duration::from_secs(5));
        for _ in 0..3 {
            service.search("testowo", false, 10).await.unwrap();
        }
        assert_eq!(service.pool().status().available, 1);
    }

    #[tokio::test]
    async fn test_request_times_out_when_pool_is_exhausted() {
        let (_dir, service) = service(1, Duration::from_millis(50));
        let _held = service.pool().get().await.unwrap();

        let err = service.search("testowo", false, 10).await.unwrap_err();
        assert!(matches!(err, LookupError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_unreachable_database_is_connection_error() {
        let dir = TempDir::new().unwrap();
        let pool = Pool::new(dir.path().join("missing.db"), 1);
        let service = LookupService::new(pool, Duration::from_secs(5))
            .with_retry_delay(Duration::from_millis(1));

        let err = service.search("testowo", false, 10).await.unwrap_err();
        assert!(matches!(err, LookupError::Connection(_)));
    }

    #[tokio::test]
    async fn test_retry_recovers_on_fresh_connection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late.db");
        let service = LookupService::new(Pool::new(path.clone(), 1), Duration::from_secs(5))
            .with_retry_delay(Duration::from_millis(300));

        let pending = tokio::spawn({
            let service = service.clone();
            async move { service.search("000000001", false, 10).await }
        });

        // The first attempt fails to open; the database appears before the retry.
        tokio::time::sleep(Duration::from_millis(50)).await;
        test_support::file_db(&path);

        let hits = pending.await.unwrap().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].regon, "000000001");
    }
}
