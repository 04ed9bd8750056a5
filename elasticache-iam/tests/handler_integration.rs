//! End-to-end tests for the cache-aside handler.
//!
//! Drive the public API the way a function runtime would: one long-lived
//! handler, many invocations, an in-memory cache standing in for Redis and a
//! counting signer standing in for AWS.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use elasticache_iam::clock::ManualClock;
use elasticache_iam::config::{
    ConfigSource, ENV_REDIS_AUTH, ENV_REDIS_CACHE_NAME, ENV_REDIS_HOST, ENV_REDIS_PORT,
    ENV_REDIS_SERVERLESS,
};
use elasticache_iam::handler::{Country, CountriesHandler, COUNTRIES_KEY};
use elasticache_iam::signer::{BoxFuture, ConnectRequest, RequestSigner, SigningError};
use elasticache_iam::store::{KeyValueStore, MemoryConnector, MemoryStore};
use elasticache_iam::token::{TokenRegistry, DEFAULT_VALIDITY};
use parking_lot::Mutex;

/// Signer that counts calls and remembers the URLs it was asked to sign.
#[derive(Default)]
struct CountingSigner {
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl CountingSigner {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RequestSigner for CountingSigner {
    fn presign<'a>(
        &'a self,
        request: &'a ConnectRequest,
        _expires_in: Duration,
        _region: &'a str,
    ) -> BoxFuture<'a, Result<String, SigningError>> {
        Box::pin(async move {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.urls.lock().push(request.url().to_string());
            Ok(format!("{}&X-Amz-Signature={:064x}", request.url(), n))
        })
    }
}

fn config(pairs: &[(&'static str, &'static str)]) -> ConfigSource {
    let mut all = vec![
        (ENV_REDIS_HOST, "my-cache-abc.serverless.use1.cache.amazonaws.com"),
        (ENV_REDIS_PORT, "6379"),
        (ENV_REDIS_AUTH, "iam-user"),
        (ENV_REDIS_CACHE_NAME, "my-cache"),
    ];
    all.extend_from_slice(pairs);
    ConfigSource::from_pairs(all)
}

fn expected_countries() -> Vec<Country> {
    (0..100)
        .map(|i| Country {
            name: format!("country{}", i),
            capital: format!("capital{}", i),
        })
        .collect()
}

#[tokio::test]
async fn test_first_invocation_generates_second_reads_from_store() {
    let signer = Arc::new(CountingSigner::default());
    let connector = Arc::new(MemoryConnector::new(MemoryStore::default()));
    let handler = CountriesHandler::new(signer.clone(), connector.clone());

    let first = handler.invoke(&config(&[])).await;
    assert_eq!(first.status_code, 200);
    assert_eq!(first.body.as_deref(), Some(expected_countries().as_slice()));

    let json = serde_json::to_value(&first).unwrap();
    assert_eq!(json["body"][0]["name"], "country0");
    assert_eq!(json["body"][99]["capital"], "capital99");

    // Replace the stored value with an identical-shaped but distinguishable
    // payload to prove the second response is read, not regenerated.
    let marker = vec![Country {
        name: "from-store".to_string(),
        capital: "from-store".to_string(),
    }];
    connector
        .store()
        .set(COUNTRIES_KEY, serde_json::to_string(&marker).unwrap())
        .await
        .unwrap();

    let second = handler.invoke(&config(&[])).await;
    assert_eq!(second.status_code, 200);
    assert_eq!(second.body, Some(marker));
}

#[tokio::test]
async fn test_repeat_invocation_returns_identical_records() {
    let signer = Arc::new(CountingSigner::default());
    let connector = Arc::new(MemoryConnector::new(MemoryStore::default()));
    let handler = CountriesHandler::new(signer.clone(), connector.clone());

    let first = handler.invoke(&config(&[])).await;
    let second = handler.invoke(&config(&[])).await;

    assert_eq!(first, second);
    assert_eq!(connector.attempts(), 2);
    assert_eq!(signer.calls(), 1);
}

#[tokio::test]
async fn test_each_missing_setting_yields_500_without_side_effects() {
    for missing in [
        ENV_REDIS_HOST,
        ENV_REDIS_PORT,
        ENV_REDIS_AUTH,
        ENV_REDIS_CACHE_NAME,
    ] {
        let signer = Arc::new(CountingSigner::default());
        let connector = Arc::new(MemoryConnector::new(MemoryStore::default()));
        let handler = CountriesHandler::new(signer.clone(), connector.clone());

        let pairs: Vec<(&str, &str)> = [
            (ENV_REDIS_HOST, "host"),
            (ENV_REDIS_PORT, "6379"),
            (ENV_REDIS_AUTH, "user"),
            (ENV_REDIS_CACHE_NAME, "cache"),
        ]
        .into_iter()
        .filter(|(k, _)| *k != missing)
        .collect();

        let response = handler.invoke(&ConfigSource::from_pairs(pairs)).await;
        assert_eq!(response.status_code, 500, "missing {}", missing);
        assert!(response.body.is_none());
        assert_eq!(signer.calls(), 0, "missing {}", missing);
        assert_eq!(connector.attempts(), 0, "missing {}", missing);
    }
}

#[tokio::test]
async fn test_topology_controls_resource_type() {
    let signer = Arc::new(CountingSigner::default());
    let connector = Arc::new(MemoryConnector::new(MemoryStore::default()));
    let handler = CountriesHandler::new(signer.clone(), connector);

    handler.invoke(&config(&[(ENV_REDIS_SERVERLESS, "true")])).await;
    handler.invoke(&config(&[(ENV_REDIS_SERVERLESS, "false")])).await;

    let urls = signer.urls.lock().clone();
    assert_eq!(urls.len(), 2);
    assert_eq!(
        urls[0],
        "https://my-cache/?Action=connect&User=iam-user&ResourceType=ServerlessCache"
    );
    assert_eq!(urls[1], "https://my-cache/?Action=connect&User=iam-user");
}

#[tokio::test]
async fn test_token_reissued_after_validity_window() {
    let signer = Arc::new(CountingSigner::default());
    let connector = Arc::new(MemoryConnector::new(MemoryStore::default()));
    let clock = Arc::new(ManualClock::default());
    let registry = TokenRegistry::with_clock(16, DEFAULT_VALIDITY, clock.clone());
    let handler = CountriesHandler::with_registry(signer.clone(), connector, registry);

    handler.invoke(&config(&[])).await;
    clock.advance(TimeDelta::seconds(899));
    handler.invoke(&config(&[])).await;
    assert_eq!(signer.calls(), 1);

    clock.advance(TimeDelta::seconds(2));
    handler.invoke(&config(&[])).await;
    assert_eq!(signer.calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_invocations_share_handler() {
    let signer = Arc::new(CountingSigner::default());
    let connector = Arc::new(MemoryConnector::new(MemoryStore::default()));
    let handler = Arc::new(CountriesHandler::new(signer.clone(), connector.clone()));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let handler = handler.clone();
            tokio::spawn(async move { handler.invoke(&config(&[])).await })
        })
        .collect();

    for task in tasks {
        let response = task.await.unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body.map(|b| b.len()), Some(100));
    }

    assert_eq!(signer.calls(), 1);
    assert_eq!(connector.attempts(), 8);
}
