#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// HTTP clients used to download assets.
pub mod client;

mod error;
pub use error::FetchError;

/// Compact then full resolution of a single asset.
pub mod fallback;

/// Cancellable asset downloads.
pub mod fetcher;

/// Remote layout of the reconstruction assets.
pub mod locator;

/// Request generations and cancellation.
pub mod tracker;

pub use client::{HttpClient, HttpResponse, MemoryClient};
pub use fallback::{AttemptOutcome, FallbackState};
pub use fetcher::{AssetFetcher, FetchedAsset};
pub use locator::{shard_scene_id, Asset, AssetLocator, AssetVariant};
pub use tracker::{RequestKey, RequestTicket, RequestTracker};
