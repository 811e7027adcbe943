use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sfmview_fetch::{
    Asset, AssetFetcher, AssetLocator, AssetVariant, FetchError, HttpClient, HttpResponse,
    MemoryClient, RequestKey, RequestTracker,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A storage that never answers.
#[derive(Default)]
struct StalledClient {
    started: AtomicUsize,
}

impl HttpClient for StalledClient {
    fn get(&self, _url: &str) -> impl Future<Output = Result<HttpResponse, FetchError>> + Send {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending()
    }
}

/// A storage answering after a delay.
struct SlowClient {
    inner: MemoryClient,
    delay: Duration,
}

impl HttpClient for SlowClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(url).await
    }
}

/// A storage without the requested assets, where a newer request begins
/// while the full variant is being downloaded.
struct SupersedingClient {
    inner: MemoryClient,
    tracker: Arc<RequestTracker>,
}

impl HttpClient for SupersedingClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        if url.ends_with(".bin") {
            self.tracker.begin(RequestKey::new(7, 1));
        }
        self.inner.get(url).await
    }
}

#[tokio::test]
async fn teardown_aborts_in_flight_fetch() {
    init_logger();

    let fetcher = AssetFetcher::new(
        StalledClient::default(),
        AssetLocator::new("mini://bucket", "full://bucket"),
    );
    let tracker = RequestTracker::new();
    let ticket = tracker.begin(RequestKey::new(42, 0));

    let fetch = fetcher.fetch(&ticket, Asset::Points3D);
    let teardown = async {
        tokio::task::yield_now().await;
        tracker.teardown();
    };
    let (result, ()) = tokio::join!(fetch, teardown);

    assert!(matches!(result, Err(FetchError::Aborted)));
    assert_eq!(fetcher.client().started.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn newer_request_wins() -> Result<(), FetchError> {
    init_logger();

    let mut storage = MemoryClient::new();
    storage.insert("mini://bucket/000/042/colmap/0/cameras.minibin", vec![0]);
    storage.insert("mini://bucket/000/042/colmap/1/cameras.minibin", vec![1]);
    let fetcher = AssetFetcher::new(
        SlowClient {
            inner: storage,
            delay: Duration::from_millis(20),
        },
        AssetLocator::new("mini://bucket", "full://bucket"),
    );
    let tracker = RequestTracker::new();

    let old = tracker.begin(RequestKey::new(42, 0));
    let old_fetch = fetcher.fetch(&old, Asset::Cameras);
    let new_fetch = async {
        tokio::task::yield_now().await;
        let new = tracker.begin(RequestKey::new(42, 1));
        fetcher.fetch(&new, Asset::Cameras).await
    };
    let (old_result, new_result) = tokio::join!(old_fetch, new_fetch);

    assert!(old_result.is_err_and(|err| err.is_aborted()));
    let fetched = new_result?;
    assert_eq!(fetched.variant, AssetVariant::Mini);
    assert_eq!(fetched.bytes, vec![1]);
    Ok(())
}

#[tokio::test]
async fn superseded_failure_is_an_abort() {
    init_logger();

    let tracker = Arc::new(RequestTracker::new());
    let fetcher = AssetFetcher::new(
        SupersedingClient {
            inner: MemoryClient::new(),
            tracker: tracker.clone(),
        },
        AssetLocator::new("mini://bucket", "full://bucket"),
    );

    let ticket = tracker.begin(RequestKey::new(7, 0));
    let result = fetcher.fetch(&ticket, Asset::Cameras).await;

    assert!(!ticket.is_current());
    assert!(matches!(result, Err(FetchError::Aborted)));
    assert_eq!(fetcher.client().inner.requests().len(), 2);
}
