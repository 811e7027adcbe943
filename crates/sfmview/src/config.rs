use std::path::Path;

use serde::{Deserialize, Serialize};
use sfmview_colmap::color::ColorEnhancement;
use sfmview_fetch::AssetLocator;
use sfmview_geometry::ParamMapping;

use crate::ViewerError;

/// Default base URL of the compact assets.
pub const DEFAULT_MINI_BASE_URL: &str = "https://megascenes.s3.us-west-2.amazonaws.com/reconstruct-mini";

/// Default base URL of the full assets.
pub const DEFAULT_FULL_BASE_URL: &str = "https://megascenes.s3.us-west-2.amazonaws.com/reconstruct";

/// Settings of the viewer core.
///
/// Every field is optional in the serialized form, missing fields take
/// their default value.
///
/// Example:
///
/// ```
/// use sfmview::ViewerConfig;
///
/// let config = ViewerConfig::from_json_str(r#"{ "brightness": 1.2 }"#).unwrap();
/// assert_eq!(config.enhancement.brightness, 1.2);
/// assert_eq!(config.enhancement.saturation, 1.5);
/// assert_eq!(config.display_scale, 0.25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base URL of the compact assets.
    pub mini_base_url: String,
    /// Base URL of the full assets.
    pub full_base_url: String,
    /// Point color enhancement, serialized as `brightness` and `saturation`.
    #[serde(flatten)]
    pub enhancement: ColorEnhancement,
    /// Scale of the camera matrices used for the frustums.
    pub display_scale: f64,
    /// Camera parameter layouts.
    pub param_mapping: ParamMapping,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mini_base_url: DEFAULT_MINI_BASE_URL.to_string(),
            full_base_url: DEFAULT_FULL_BASE_URL.to_string(),
            enhancement: ColorEnhancement::default(),
            display_scale: 0.25,
            param_mapping: ParamMapping::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ViewerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the JSON file.
    ///
    /// # Returns
    ///
    /// The configuration, or an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        log::debug!("reading viewer configuration from {}", path.display());
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// The asset layout described by the base URLs.
    pub fn locator(&self) -> AssetLocator {
        AssetLocator::new(&self.mini_base_url, &self.full_base_url)
    }
}
