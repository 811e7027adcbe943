use crate::client::HttpClient;
use crate::fallback::{AttemptOutcome, FallbackState};
use crate::locator::{Asset, AssetLocator, AssetVariant};
use crate::tracker::{RequestKey, RequestTicket};
use crate::FetchError;

/// A downloaded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAsset {
    /// The asset.
    pub asset: Asset,
    /// The encoding that was downloaded.
    pub variant: AssetVariant,
    /// The URL the asset was downloaded from.
    pub url: String,
    /// The raw bytes.
    pub bytes: Vec<u8>,
}

/// Downloads reconstruction assets, compact variant first.
pub struct AssetFetcher<C> {
    client: C,
    locator: AssetLocator,
}

impl<C: HttpClient> AssetFetcher<C> {
    /// Create a fetcher.
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client.
    /// * `locator` - The remote layout of the assets.
    pub fn new(client: C, locator: AssetLocator) -> Self {
        Self { client, locator }
    }

    /// The HTTP client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The remote layout of the assets.
    pub fn locator(&self) -> &AssetLocator {
        &self.locator
    }

    /// Download an asset on behalf of a request.
    ///
    /// The scene and reconstruction are the ones of the ticket. The download
    /// races the cancellation of the ticket. Outcomes of a request superseded
    /// while downloading are dropped, failures included.
    ///
    /// # Arguments
    ///
    /// * `ticket` - The request the download belongs to.
    /// * `asset` - The requested asset.
    ///
    /// # Returns
    ///
    /// The asset, or [`FetchError::Aborted`] when the ticket is no longer
    /// current.
    pub async fn fetch(
        &self,
        ticket: &RequestTicket,
        asset: Asset,
    ) -> Result<FetchedAsset, FetchError> {
        if !ticket.is_current() {
            return Err(FetchError::Aborted);
        }

        let RequestKey {
            scene_id,
            reconstruction,
        } = ticket.key();

        tokio::select! {
            biased;
            _ = ticket.cancelled() => {
                log::debug!("request {} aborted while fetching {asset}", ticket.generation());
                Err(FetchError::Aborted)
            }
            fetched = self.resolve(scene_id, reconstruction, asset) => {
                if !ticket.is_current() {
                    log::debug!("dropping stale {asset} of request {}", ticket.generation());
                    return Err(FetchError::Aborted);
                }
                fetched
            }
        }
    }

    /// Download an asset, falling back once from the compact to the full
    /// variant.
    ///
    /// # Arguments
    ///
    /// * `scene_id` - The scene id.
    /// * `reconstruction` - Index of the reconstruction within the scene.
    /// * `asset` - The requested asset.
    ///
    /// # Returns
    ///
    /// The asset, or [`FetchError::AssetUnavailable`] when both variants failed.
    pub async fn resolve(
        &self,
        scene_id: u64,
        reconstruction: u32,
        asset: Asset,
    ) -> Result<FetchedAsset, FetchError> {
        let mut state = FallbackState::TryingMini;

        while let Some(variant) = state.pending_variant() {
            let url = self.locator.url(scene_id, reconstruction, asset, variant)?;
            log::debug!("fetching {url}");

            let (outcome, body) = match self.client.get(&url).await {
                Ok(response) if response.is_success() => (AttemptOutcome::Success, response.body),
                Ok(response) => {
                    log::info!("{url} answered {}", response.status);
                    let status = Some(response.status);
                    (AttemptOutcome::Failure { status }, Vec::new())
                }
                Err(err) => {
                    log::warn!("{url} failed: {err}");
                    (AttemptOutcome::Failure { status: None }, Vec::new())
                }
            };

            state = state.advance(outcome);
            if let FallbackState::Resolved(variant) = state {
                return Ok(FetchedAsset {
                    asset,
                    variant,
                    url,
                    bytes: body,
                });
            }
        }

        Err(FetchError::AssetUnavailable {
            asset,
            last_status: state.last_status(),
        })
    }
}
