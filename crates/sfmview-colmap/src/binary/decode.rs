use super::reader::ByteReader;
use super::{
    CameraEntry, ImageFormat, ImageHead, PointFormat, PointHead, PointTail, RecordFormat,
    CAMERA_ENTRY_SIZE, IMAGE_HEAD_SIZE, IMAGE_TRACK_ENTRY_SIZE, POINT_HEAD_SIZE,
    POINT_TAIL_SIZE, POINT_TRACK_ENTRY_SIZE,
};
use crate::color::ColorEnhancement;
use crate::{CameraRecord, ColmapError, ImageRecord, PointRecord};

/// Records decoded from one section.
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    /// Decoded points.
    Points(Vec<PointRecord>),
    /// Decoded images.
    Images(Vec<ImageRecord>),
    /// Decoded cameras.
    Cameras(Vec<CameraRecord>),
}

impl Records {
    /// Number of decoded records.
    pub fn len(&self) -> usize {
        match self {
            Records::Points(points) => points.len(),
            Records::Images(images) => images.len(),
            Records::Cameras(cameras) => cameras.len(),
        }
    }

    /// Check if no records were decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode a section given its format tag.
///
/// # Arguments
///
/// * `buf` - The whole section, starting with the record count.
/// * `format` - Layout of the section.
/// * `enhancement` - Color enhancement applied to points. Ignored for other sections.
///
/// # Returns
///
/// The decoded records, in file order.
pub fn decode(
    buf: &[u8],
    format: RecordFormat,
    enhancement: &ColorEnhancement,
) -> Result<Records, ColmapError> {
    let records = match format {
        RecordFormat::Points => Records::Points(decode_points(buf, PointFormat::Full, enhancement)?),
        RecordFormat::PointsMini => {
            Records::Points(decode_points(buf, PointFormat::Mini, enhancement)?)
        }
        RecordFormat::Images => Records::Images(decode_images(buf, ImageFormat::Full)?),
        RecordFormat::ImagesMini => Records::Images(decode_images(buf, ImageFormat::Mini)?),
        RecordFormat::Cameras => Records::Cameras(decode_cameras(buf)?),
    };
    log::debug!("decoded {} {} records", records.len(), format);
    Ok(records)
}

/// Decode a points3D section.
///
/// Track entries of the full format are skipped. The color of every point is
/// enhanced for display, the raw color is kept next to it.
///
/// # Arguments
///
/// * `buf` - The whole section, starting with the record count.
/// * `format` - Full or mini encoding.
/// * `enhancement` - Color enhancement applied to every point.
///
/// # Returns
///
/// One record per declared point, or an error if the buffer does not hold
/// exactly the declared number of records.
pub fn decode_points(
    buf: &[u8],
    format: PointFormat,
    enhancement: &ColorEnhancement,
) -> Result<Vec<PointRecord>, ColmapError> {
    let record_size = match format {
        PointFormat::Full => POINT_HEAD_SIZE + POINT_TAIL_SIZE,
        PointFormat::Mini => POINT_HEAD_SIZE,
    };

    decode_section(buf, record_size, |reader| {
        let head: PointHead = reader.read()?;

        let (error, track_length) = match format {
            PointFormat::Full => {
                let tail: PointTail = reader.read()?;
                // each entry is an (image id, point2d index) pair
                reader.skip(tail.track_length, POINT_TRACK_ENTRY_SIZE)?;
                (tail.error, tail.track_length)
            }
            PointFormat::Mini => (0.0, 0),
        };

        let color_raw = [head.red, head.green, head.blue];

        Ok(PointRecord {
            id: head.id,
            position: [head.x, head.y, head.z],
            color_raw,
            color: enhancement.apply(color_raw),
            error,
            track_length,
        })
    })
}

/// Decode an images section.
///
/// Both encodings produce the same records; the 2D observations of the full
/// format are skipped.
///
/// # Arguments
///
/// * `buf` - The whole section, starting with the record count.
/// * `format` - Full or mini encoding.
///
/// # Returns
///
/// One record per declared image.
pub fn decode_images(buf: &[u8], format: ImageFormat) -> Result<Vec<ImageRecord>, ColmapError> {
    // at least the NUL terminator of the name, plus the observation count
    let record_size = match format {
        ImageFormat::Full => IMAGE_HEAD_SIZE + 1 + 8,
        ImageFormat::Mini => IMAGE_HEAD_SIZE,
    };

    decode_section(buf, record_size, |reader| {
        let head: ImageHead = reader.read()?;
        let name = reader.read_cstr();

        if format == ImageFormat::Full {
            let num_points2d: u64 = reader.read()?;
            // (x, y, point3d id) triplets
            reader.skip(num_points2d, IMAGE_TRACK_ENTRY_SIZE)?;
        }

        Ok(ImageRecord {
            id: head.id,
            qvec: [head.qw, head.qx, head.qy, head.qz],
            tvec: [head.tx, head.ty, head.tz],
            camera_id: head.camera_id,
            name,
        })
    })
}

/// Decode a cameras section.
///
/// NOTE: exactly four parameters are stored per camera, whatever the model.
pub fn decode_cameras(buf: &[u8]) -> Result<Vec<CameraRecord>, ColmapError> {
    decode_section(buf, CAMERA_ENTRY_SIZE, |reader| {
        let entry: CameraEntry = reader.read()?;
        Ok(CameraRecord {
            camera_id: entry.camera_id,
            model_id: entry.model_id,
            width: entry.width,
            height: entry.height,
            params: [entry.param0, entry.param1, entry.param2, entry.param3],
        })
    })
}

/// Read the record count and decode records until it is reached.
///
/// A buffer ending between two records yields `RecordCountMismatch`, a buffer
/// ending inside a record yields `TruncatedBuffer`.
fn decode_section<T>(
    buf: &[u8],
    min_record_size: usize,
    mut decode_record: impl FnMut(&mut ByteReader) -> Result<T, ColmapError>,
) -> Result<Vec<T>, ColmapError> {
    let mut reader = ByteReader::new(buf);
    let expected: u64 = reader.read()?;

    // do not trust the declared count for the allocation
    let capacity = usize::try_from(expected)
        .unwrap_or(usize::MAX)
        .min(reader.remaining() / min_record_size.max(1));
    let mut records = Vec::with_capacity(capacity);

    while (records.len() as u64) < expected {
        if reader.is_empty() {
            return Err(ColmapError::RecordCountMismatch {
                expected,
                actual: records.len() as u64,
            });
        }
        records.push(decode_record(&mut reader)?);
    }

    if !reader.is_empty() {
        log::debug!(
            "ignoring {} trailing bytes after {} records",
            reader.remaining(),
            records.len()
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_bytes(id: u64, xyz: [f64; 3], rgb: [u8; 3]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&id.to_le_bytes());
        for v in xyz {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&rgb);
        bytes
    }

    fn image_head_bytes(id: u32, camera_id: u32, name: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&id.to_le_bytes());
        for v in [1.0f64, 0.0, 0.0, 0.0, 0.5, -0.5, 2.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&camera_id.to_le_bytes());
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(0);
        bytes
    }

    #[test]
    fn test_decode_points_full_skips_track() -> Result<(), ColmapError> {
        let mut buf = 2u64.to_le_bytes().to_vec();
        for (id, track_length) in [(7u64, 3u64), (9, 0)] {
            buf.extend(point_bytes(id, [1.0, -2.0, 3.5], [10, 20, 30]));
            buf.extend_from_slice(&0.25f64.to_le_bytes());
            buf.extend_from_slice(&track_length.to_le_bytes());
            buf.extend(std::iter::repeat(0xAB).take(track_length as usize * 8));
        }

        let points = decode_points(&buf, PointFormat::Full, &ColorEnhancement::IDENTITY)?;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].id, 7);
        assert_eq!(points[0].track_length, 3);
        assert_eq!(points[0].error, 0.25);
        assert_eq!(points[1].id, 9);
        assert_eq!(points[1].position, [1.0, -2.0, 3.5]);
        assert_eq!(points[1].color, [10, 20, 30]);
        Ok(())
    }

    #[test]
    fn test_decode_points_mini() -> Result<(), ColmapError> {
        let mut buf = 1u64.to_le_bytes().to_vec();
        buf.extend(point_bytes(3, [0.5, 0.5, 0.5], [200, 10, 10]));

        let enhancement = ColorEnhancement::default();
        let points = decode_points(&buf, PointFormat::Mini, &enhancement)?;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].color_raw, [200, 10, 10]);
        assert_eq!(points[0].color, enhancement.apply([200, 10, 10]));
        assert_eq!(points[0].error, 0.0);
        assert_eq!(points[0].track_length, 0);
        Ok(())
    }

    #[test]
    fn test_decode_points_count_mismatch() {
        let mut buf = 3u64.to_le_bytes().to_vec();
        buf.extend(point_bytes(1, [0.0; 3], [0; 3]));
        buf.extend(point_bytes(2, [0.0; 3], [0; 3]));

        let result = decode_points(&buf, PointFormat::Mini, &ColorEnhancement::IDENTITY);
        assert!(matches!(
            result,
            Err(ColmapError::RecordCountMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_decode_points_truncated_track() {
        let mut buf = 1u64.to_le_bytes().to_vec();
        buf.extend(point_bytes(1, [0.0; 3], [0; 3]));
        buf.extend_from_slice(&0.0f64.to_le_bytes());
        buf.extend_from_slice(&4u64.to_le_bytes());
        buf.extend_from_slice(&[0u8; 8 * 3]);

        let result = decode_points(&buf, PointFormat::Full, &ColorEnhancement::IDENTITY);
        assert!(matches!(
            result,
            Err(ColmapError::TruncatedBuffer { needed: 8, .. })
        ));
    }

    #[test]
    fn test_decode_empty_buffer() {
        assert!(matches!(
            decode_cameras(&[]),
            Err(ColmapError::TruncatedBuffer { offset: 0, .. })
        ));
    }

    #[test]
    fn test_decode_zero_records() -> Result<(), ColmapError> {
        let buf = 0u64.to_le_bytes();
        assert!(decode_images(&buf, ImageFormat::Full)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_decode_images_full_and_mini_agree() -> Result<(), ColmapError> {
        let mut full = 2u64.to_le_bytes().to_vec();
        let mut mini = 2u64.to_le_bytes().to_vec();
        for (id, name, num_points2d) in [(1u32, "a/b/c.jpg", 2u64), (5, "d.png", 0)] {
            let head = image_head_bytes(id, 3, name);
            full.extend_from_slice(&head);
            full.extend_from_slice(&num_points2d.to_le_bytes());
            full.extend(std::iter::repeat(1u8).take(num_points2d as usize * 24));
            mini.extend_from_slice(&head);
        }

        let from_full = decode_images(&full, ImageFormat::Full)?;
        let from_mini = decode_images(&mini, ImageFormat::Mini)?;
        assert_eq!(from_full, from_mini);
        assert_eq!(from_full[0].name, "a/b/c.jpg");
        assert_eq!(from_full[1].id, 5);
        assert_eq!(from_full[1].qvec, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(from_full[1].tvec, [0.5, -0.5, 2.0]);
        assert_eq!(from_full[1].camera_id, 3);
        Ok(())
    }

    #[test]
    fn test_decode_images_mini_unterminated_name() -> Result<(), ColmapError> {
        let mut buf = 1u64.to_le_bytes().to_vec();
        let mut head = image_head_bytes(1, 1, "last.jpg");
        head.pop();
        buf.extend(head);

        let images = decode_images(&buf, ImageFormat::Mini)?;
        assert_eq!(images[0].name, "last.jpg");
        Ok(())
    }

    #[test]
    fn test_decode_images_full_missing_track_count() {
        let mut buf = 1u64.to_le_bytes().to_vec();
        buf.extend(image_head_bytes(1, 1, "x.jpg"));

        assert!(matches!(
            decode_images(&buf, ImageFormat::Full),
            Err(ColmapError::TruncatedBuffer { .. })
        ));
    }

    #[test]
    fn test_decode_cameras() -> Result<(), ColmapError> {
        let mut buf = 1u64.to_le_bytes().to_vec();
        buf.extend_from_slice(&4i32.to_le_bytes());
        buf.extend_from_slice(&2i32.to_le_bytes());
        buf.extend_from_slice(&780u64.to_le_bytes());
        buf.extend_from_slice(&1040u64.to_le_bytes());
        for v in [1476.12, 390.0, 520.0, 0.105] {
            buf.extend_from_slice(&f64::to_le_bytes(v));
        }

        let cameras = decode_cameras(&buf)?;
        assert_eq!(
            cameras,
            vec![CameraRecord {
                camera_id: 4,
                model_id: 2,
                width: 780,
                height: 1040,
                params: [1476.12, 390.0, 520.0, 0.105],
            }]
        );
        assert_eq!(cameras[0].model()?.name, "SIMPLE_RADIAL");
        Ok(())
    }

    #[test]
    fn test_decode_cameras_truncated_mid_record() {
        let mut buf = 1u64.to_le_bytes().to_vec();
        buf.extend_from_slice(&[0u8; 30]);
        assert!(matches!(
            decode_cameras(&buf),
            Err(ColmapError::TruncatedBuffer { offset: 8, .. })
        ));
    }

    #[test]
    fn test_decode_by_tag() -> Result<(), ColmapError> {
        let buf = 0u64.to_le_bytes();
        let records = decode(&buf, "cameras".parse()?, &ColorEnhancement::IDENTITY)?;
        assert!(matches!(records, Records::Cameras(ref cameras) if cameras.is_empty()));
        Ok(())
    }
}
