//! Remote JWKS: HTTP fetch plus a kid-indexed cache refreshed on miss.
//!
//! Concurrency:
//! - Readers clone an `Arc` snapshot of the key map; a refresh swaps the whole map.
//! - Concurrent misses may each fetch. Fetches are idempotent and the last swap wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use super::error::KeyFetchError;
use super::keys::{JwksDocument, SigningKey, SigningKeySet, index_jwks};

#[async_trait]
pub trait JwksSource: Send + Sync {
    async fn fetch(&self) -> Result<JwksDocument, KeyFetchError>;
}

#[async_trait]
impl<T: JwksSource + ?Sized> JwksSource for Arc<T> {
    async fn fetch(&self) -> Result<JwksDocument, KeyFetchError> {
        self.as_ref().fetch().await
    }
}

/// `GET <jwks_url>` with a per-request timeout and one retry on transient failure.
#[derive(Debug, Clone)]
pub struct HttpJwksSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpJwksSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, KeyFetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KeyFetchError::Client(e.to_string()))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn fetch_once(&self) -> Result<JwksDocument, KeyFetchError> {
        let res = self.client.get(self.url.clone()).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(KeyFetchError::Status(status.as_u16()));
        }

        Ok(res.json::<JwksDocument>().await?)
    }
}

#[async_trait]
impl JwksSource for HttpJwksSource {
    async fn fetch(&self) -> Result<JwksDocument, KeyFetchError> {
        match self.fetch_once().await {
            Err(err) if err.is_transient() => {
                warn!(url = %self.url, error = %err, "jwks fetch failed; retrying once");
                self.fetch_once().await
            }
            other => other,
        }
    }
}

type KeyMap = Arc<HashMap<String, SigningKey>>;

/// Process-wide signing keys backed by a [`JwksSource`].
pub struct JwksCache<S> {
    source: S,
    keys: RwLock<KeyMap>,
    last_refresh: Mutex<Option<Instant>>,
    min_refresh_interval: Duration,
}

impl<S: JwksSource> JwksCache<S> {
    pub fn new(source: S, min_refresh_interval: Duration) -> Self {
        Self {
            source,
            keys: RwLock::new(Arc::default()),
            last_refresh: Mutex::new(None),
            min_refresh_interval,
        }
    }

    fn snapshot(&self) -> KeyMap {
        // A poisoned lock still holds a complete map; swaps are a single assignment.
        match self.keys.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn recently_refreshed(&self) -> bool {
        if self.min_refresh_interval.is_zero() {
            return false;
        }
        let last = match self.last_refresh.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        };
        last.is_some_and(|at| at.elapsed() < self.min_refresh_interval)
    }

    fn replace(&self, keys: HashMap<String, SigningKey>) {
        let keys = Arc::new(keys);
        match self.keys.write() {
            Ok(mut guard) => *guard = keys,
            Err(poisoned) => *poisoned.into_inner() = keys,
        }
        match self.last_refresh.lock() {
            Ok(mut guard) => *guard = Some(Instant::now()),
            Err(poisoned) => *poisoned.into_inner() = Some(Instant::now()),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

#[async_trait]
impl<S: JwksSource> SigningKeySet for JwksCache<S> {
    fn lookup(&self, kid: &str) -> Option<SigningKey> {
        self.snapshot().get(kid).cloned()
    }

    async fn refresh(&self) -> Result<(), KeyFetchError> {
        if self.recently_refreshed() {
            debug!("jwks refreshed recently; keeping cached keys");
            return Ok(());
        }

        let doc = self.source.fetch().await?;
        let keys = index_jwks(&doc);
        info!(keys = keys.len(), "jwks refreshed");
        self.replace(keys);
        Ok(())
    }
}
