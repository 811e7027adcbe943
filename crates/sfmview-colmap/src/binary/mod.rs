//! Reader and writer for the binary reconstruction sections.
//!
//! Every section starts with a little-endian `u64` record count followed by
//! the records, back to back. Two encodings exist for points and images: the
//! full one written by the reconstruction pipeline and a "mini" one which
//! drops the data a viewer does not need (point errors and tracks, image 2D
//! observations).

mod decode;
mod encode;
mod reader;

pub use decode::*;
pub use encode::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ColmapError;

/// Encoding of a points3D section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointFormat {
    /// id, position, color, error and track.
    Full,
    /// id, position and color.
    Mini,
}

/// Encoding of an images section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Pose, camera id, name and 2D observations.
    Full,
    /// Pose, camera id and name.
    Mini,
}

/// Tag selecting which section layout a buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordFormat {
    /// Full points3D section.
    Points,
    /// Mini points3D section.
    PointsMini,
    /// Full images section.
    Images,
    /// Mini images section.
    ImagesMini,
    /// Cameras section, identical in both encodings.
    Cameras,
}

impl RecordFormat {
    /// Tag of the format, e.g. `images-mini`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFormat::Points => "points",
            RecordFormat::PointsMini => "points-mini",
            RecordFormat::Images => "images",
            RecordFormat::ImagesMini => "images-mini",
            RecordFormat::Cameras => "cameras",
        }
    }
}

impl FromStr for RecordFormat {
    type Err = ColmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(RecordFormat::Points),
            "points-mini" => Ok(RecordFormat::PointsMini),
            "images" => Ok(RecordFormat::Images),
            "images-mini" => Ok(RecordFormat::ImagesMini),
            "cameras" => Ok(RecordFormat::Cameras),
            _ => Err(ColmapError::UnknownRecordFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// little endian, fixed width integers
fn wire_config() -> impl bincode::config::Config {
    bincode::config::legacy()
}

#[derive(bincode::Encode, bincode::Decode)]
struct PointHead {
    id: u64,
    x: f64,
    y: f64,
    z: f64,
    red: u8,
    green: u8,
    blue: u8,
}

#[derive(bincode::Encode, bincode::Decode)]
struct PointTail {
    error: f64,
    track_length: u64,
}

#[derive(bincode::Encode, bincode::Decode)]
struct ImageHead {
    id: u32,
    qw: f64,
    qx: f64,
    qy: f64,
    qz: f64,
    tx: f64,
    ty: f64,
    tz: f64,
    camera_id: u32,
}

#[derive(bincode::Encode, bincode::Decode)]
struct CameraEntry {
    camera_id: i32,
    model_id: i32,
    width: u64,
    height: u64,
    param0: f64,
    param1: f64,
    param2: f64,
    param3: f64,
}

// serialized sizes, used to bound allocations
const POINT_HEAD_SIZE: usize = 8 + 3 * 8 + 3;
const POINT_TAIL_SIZE: usize = 8 + 8;
const IMAGE_HEAD_SIZE: usize = 4 + 7 * 8 + 4;
const CAMERA_ENTRY_SIZE: usize = 4 + 4 + 8 + 8 + 4 * 8;

// skipped track entries
const POINT_TRACK_ENTRY_SIZE: usize = 8;
const IMAGE_TRACK_ENTRY_SIZE: usize = 24;
