use crate::FetchError;

/// Largest scene id that fits the sharded layout.
pub const MAX_SCENE_ID: u64 = 999_999;

/// Shard a scene id into its two path segments.
///
/// The id is zero padded to six digits and split in two three digit
/// segments, keeping the directory fan-out of the bucket bounded.
///
/// # Arguments
///
/// * `scene_id` - The scene id, at most [`MAX_SCENE_ID`].
///
/// # Returns
///
/// The sharded path, e.g. `000/042`.
///
/// Example:
///
/// ```
/// use sfmview_fetch::shard_scene_id;
///
/// assert_eq!(shard_scene_id(42).unwrap(), "000/042");
/// assert_eq!(shard_scene_id(123456).unwrap(), "123/456");
/// ```
pub fn shard_scene_id(scene_id: u64) -> Result<String, FetchError> {
    if scene_id > MAX_SCENE_ID {
        return Err(FetchError::SceneIdOutOfRange(scene_id));
    }
    let padded = format!("{scene_id:06}");
    Ok(format!("{}/{}", &padded[..3], &padded[3..]))
}

/// The assets of a reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// The point cloud.
    Points3D,
    /// The registered images.
    Images,
    /// The cameras.
    Cameras,
}

impl Asset {
    /// All the assets of a reconstruction.
    pub const ALL: [Asset; 3] = [Asset::Points3D, Asset::Images, Asset::Cameras];

    /// File name of the asset, without extension.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Asset::Points3D => "points3D",
            Asset::Images => "images",
            Asset::Cameras => "cameras",
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Encoding of a downloaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetVariant {
    /// The compact encoding, tried first.
    Mini,
    /// The full encoding.
    Full,
}

impl AssetVariant {
    /// File extension of the variant.
    pub fn extension(&self) -> &'static str {
        match self {
            AssetVariant::Mini => "minibin",
            AssetVariant::Full => "bin",
        }
    }
}

/// Builds the URLs of the reconstruction assets.
///
/// Assets live at `{base}/{shard}/colmap/{reconstruction}/{asset}.{ext}`,
/// with a different base for each variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocator {
    mini_base: String,
    full_base: String,
}

impl AssetLocator {
    /// Create a locator from the base URLs of the two variants.
    ///
    /// Trailing slashes are removed.
    pub fn new(mini_base: impl Into<String>, full_base: impl Into<String>) -> Self {
        let trim = |base: String| base.trim_end_matches('/').to_string();
        Self {
            mini_base: trim(mini_base.into()),
            full_base: trim(full_base.into()),
        }
    }

    /// Base URL of a variant.
    pub fn base(&self, variant: AssetVariant) -> &str {
        match variant {
            AssetVariant::Mini => &self.mini_base,
            AssetVariant::Full => &self.full_base,
        }
    }

    /// URL of an asset.
    ///
    /// # Arguments
    ///
    /// * `scene_id` - The scene id.
    /// * `reconstruction` - Index of the reconstruction within the scene.
    /// * `asset` - The requested asset.
    /// * `variant` - The requested encoding.
    ///
    /// # Returns
    ///
    /// The URL, or [`FetchError::SceneIdOutOfRange`].
    pub fn url(
        &self,
        scene_id: u64,
        reconstruction: u32,
        asset: Asset,
        variant: AssetVariant,
    ) -> Result<String, FetchError> {
        Ok(format!(
            "{}/{}/colmap/{}/{}.{}",
            self.base(variant),
            shard_scene_id(scene_id)?,
            reconstruction,
            asset.file_stem(),
            variant.extension()
        ))
    }
}
