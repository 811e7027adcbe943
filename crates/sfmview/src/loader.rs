use sfmview_colmap::binary::{
    decode_cameras, decode_images, decode_points, ImageFormat, PointFormat,
};
use sfmview_colmap::color::ColorEnhancement;
use sfmview_fetch::{
    Asset, AssetFetcher, AssetVariant, FetchError, HttpClient, RequestKey, RequestTicket,
    RequestTracker,
};

use crate::scene::{PoseOptions, Reconstruction, SceneSink};
use crate::{ViewerConfig, ViewerError};

/// Result of a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The reconstruction was handed to the sink.
    Applied {
        /// Number of points inserted.
        points: usize,
        /// Number of cameras inserted.
        cameras: usize,
    },
    /// The request was cancelled or superseded, the sink was not touched.
    Aborted,
}

/// Loads reconstructions into a [`SceneSink`].
///
/// Each load supersedes the previous one: the results of an older request
/// are never applied once a newer request began.
pub struct SceneLoader<C> {
    fetcher: AssetFetcher<C>,
    tracker: RequestTracker,
    enhancement: ColorEnhancement,
    pose_options: PoseOptions,
}

impl SceneLoader<reqwest::Client> {
    /// Create a loader downloading over HTTP.
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(reqwest::Client::new(), config)
    }
}

impl<C: HttpClient> SceneLoader<C> {
    /// Create a loader.
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client used for the downloads.
    /// * `config` - The viewer settings.
    pub fn new(client: C, config: &ViewerConfig) -> Self {
        Self {
            fetcher: AssetFetcher::new(client, config.locator()),
            tracker: RequestTracker::new(),
            enhancement: config.enhancement,
            pose_options: PoseOptions::from(config),
        }
    }

    /// The asset fetcher.
    pub fn fetcher(&self) -> &AssetFetcher<C> {
        &self.fetcher
    }

    /// Begin a request, superseding the previous one.
    pub fn begin(&self, scene_id: u64, reconstruction: u32) -> RequestTicket {
        self.tracker.begin(RequestKey::new(scene_id, reconstruction))
    }

    /// Download and decode the reconstruction of a request.
    ///
    /// The three assets are downloaded concurrently. Any failure fails the
    /// whole reconstruction. A request superseded before the decoding ends
    /// yields [`FetchError::Aborted`], whatever the failure.
    ///
    /// # Arguments
    ///
    /// * `ticket` - The request.
    ///
    /// # Returns
    ///
    /// The decoded reconstruction.
    pub async fn fetch_reconstruction(
        &self,
        ticket: &RequestTicket,
    ) -> Result<Reconstruction, ViewerError> {
        let RequestKey {
            scene_id,
            reconstruction: index,
        } = ticket.key();

        let (points, images, cameras) = tokio::try_join!(
            self.fetcher.fetch(ticket, Asset::Points3D),
            self.fetcher.fetch(ticket, Asset::Images),
            self.fetcher.fetch(ticket, Asset::Cameras),
        )?;

        let point_format = match points.variant {
            AssetVariant::Mini => PointFormat::Mini,
            AssetVariant::Full => PointFormat::Full,
        };
        let image_format = match images.variant {
            AssetVariant::Mini => ImageFormat::Mini,
            AssetVariant::Full => ImageFormat::Full,
        };

        let decoded = decode_points(&points.bytes, point_format, &self.enhancement).and_then(
            |points| {
                Ok(Reconstruction {
                    points,
                    images: decode_images(&images.bytes, image_format)?,
                    cameras: decode_cameras(&cameras.bytes)?,
                })
            },
        );

        if !ticket.is_current() {
            log::debug!("request {} superseded while decoding", ticket.generation());
            return Err(FetchError::Aborted.into());
        }
        let reconstruction = decoded?;

        log::info!(
            "scene {scene_id} reconstruction {index}: {} points, {} images, {} cameras",
            reconstruction.points.len(),
            reconstruction.images.len(),
            reconstruction.cameras.len()
        );

        Ok(reconstruction)
    }

    /// Hand a reconstruction over to a sink.
    ///
    /// The sink is cleared first. Nothing happens when the request is no
    /// longer current.
    ///
    /// # Returns
    ///
    /// Whether the reconstruction was applied.
    pub fn apply<S: SceneSink + ?Sized>(
        &self,
        ticket: &RequestTicket,
        reconstruction: &Reconstruction,
        sink: &mut S,
    ) -> bool {
        if !ticket.is_current() {
            log::debug!("request {} is stale, not applied", ticket.generation());
            return false;
        }

        sink.clear();
        sink.insert_points(&reconstruction.points);

        let poses = reconstruction.poses(self.pose_options);
        for (image, pose) in reconstruction.images.iter().zip(poses.iter()) {
            sink.insert_camera(image, pose);
        }

        true
    }

    /// Load a reconstruction into a sink.
    ///
    /// # Arguments
    ///
    /// * `scene_id` - The scene id.
    /// * `reconstruction` - Index of the reconstruction within the scene.
    /// * `sink` - The receiver of the geometry.
    ///
    /// # Returns
    ///
    /// The outcome. Cancelled and superseded requests are not errors.
    pub async fn load<S: SceneSink + ?Sized>(
        &self,
        scene_id: u64,
        reconstruction: u32,
        sink: &mut S,
    ) -> Result<LoadOutcome, ViewerError> {
        let ticket = self.begin(scene_id, reconstruction);

        let loaded = match self.fetch_reconstruction(&ticket).await {
            Ok(loaded) => loaded,
            Err(err) if err.is_aborted() => {
                log::debug!("request {} aborted", ticket.generation());
                return Ok(LoadOutcome::Aborted);
            }
            Err(err) => return Err(err),
        };

        if !self.apply(&ticket, &loaded, sink) {
            return Ok(LoadOutcome::Aborted);
        }

        Ok(LoadOutcome::Applied {
            points: loaded.points.len(),
            cameras: loaded.images.len(),
        })
    }

    /// Cancel the current and all future requests.
    pub fn teardown(&self) {
        self.tracker.teardown();
    }
}
