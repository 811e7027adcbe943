use super::{
    wire_config, CameraEntry, ImageFormat, ImageHead, PointFormat, PointHead, PointTail,
    POINT_TRACK_ENTRY_SIZE,
};
use crate::{CameraRecord, ColmapError, ImageRecord, PointRecord};

fn write<T: bincode::Encode>(buf: &mut Vec<u8>, value: T) -> Result<(), ColmapError> {
    bincode::encode_into_std_write(value, buf, wire_config())?;
    Ok(())
}

/// Encode a points3D section.
///
/// The raw colors are written. Track contents are not kept by the decoder, so
/// the full encoding writes `track_length` zeroed entries per point.
///
/// Example:
///
/// ```
/// use sfmview_colmap::binary::{decode_points, encode_points, PointFormat};
/// use sfmview_colmap::color::ColorEnhancement;
/// use sfmview_colmap::PointRecord;
///
/// let point = PointRecord {
///     id: 1,
///     position: [0.0, 1.0, 2.0],
///     color_raw: [10, 20, 30],
///     color: [10, 20, 30],
///     error: 0.0,
///     track_length: 0,
/// };
/// let buf = encode_points(&[point.clone()], PointFormat::Mini).unwrap();
/// let decoded = decode_points(&buf, PointFormat::Mini, &ColorEnhancement::IDENTITY).unwrap();
/// assert_eq!(decoded, vec![point]);
/// ```
pub fn encode_points(points: &[PointRecord], format: PointFormat) -> Result<Vec<u8>, ColmapError> {
    let mut buf = Vec::new();
    write(&mut buf, points.len() as u64)?;

    for point in points {
        write(
            &mut buf,
            PointHead {
                id: point.id,
                x: point.position[0],
                y: point.position[1],
                z: point.position[2],
                red: point.color_raw[0],
                green: point.color_raw[1],
                blue: point.color_raw[2],
            },
        )?;

        if format == PointFormat::Full {
            write(
                &mut buf,
                PointTail {
                    error: point.error,
                    track_length: point.track_length,
                },
            )?;
            let track_bytes = usize::try_from(point.track_length)
                .ok()
                .and_then(|len| len.checked_mul(POINT_TRACK_ENTRY_SIZE))
                .ok_or(ColmapError::Serialize(bincode::error::EncodeError::Other(
                    "track length overflows the address space",
                )))?;
            buf.resize(buf.len() + track_bytes, 0);
        }
    }

    Ok(buf)
}

/// Encode an images section.
///
/// The full encoding writes an empty list of 2D observations per image.
pub fn encode_images(images: &[ImageRecord], format: ImageFormat) -> Result<Vec<u8>, ColmapError> {
    let mut buf = Vec::new();
    write(&mut buf, images.len() as u64)?;

    for image in images {
        let name = image
            .name
            .chars()
            .map(|c| u8::try_from(c).ok().filter(|&byte| byte != 0))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| ColmapError::InvalidImageName(image.name.clone()))?;

        let [qw, qx, qy, qz] = image.qvec;
        let [tx, ty, tz] = image.tvec;
        write(
            &mut buf,
            ImageHead {
                id: image.id,
                qw,
                qx,
                qy,
                qz,
                tx,
                ty,
                tz,
                camera_id: image.camera_id,
            },
        )?;
        buf.extend_from_slice(&name);
        buf.push(0);

        if format == ImageFormat::Full {
            write(&mut buf, 0u64)?;
        }
    }

    Ok(buf)
}

/// Encode a cameras section.
pub fn encode_cameras(cameras: &[CameraRecord]) -> Result<Vec<u8>, ColmapError> {
    let mut buf = Vec::new();
    write(&mut buf, cameras.len() as u64)?;

    for camera in cameras {
        let [param0, param1, param2, param3] = camera.params;
        write(
            &mut buf,
            CameraEntry {
                camera_id: camera.camera_id,
                model_id: camera.model_id,
                width: camera.width,
                height: camera.height,
                param0,
                param1,
                param2,
                param3,
            },
        )?;
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{decode_cameras, decode_images, decode_points};
    use crate::color::ColorEnhancement;

    #[test]
    fn test_encode_points_full_layout() -> Result<(), ColmapError> {
        let point = PointRecord {
            id: 11,
            position: [1.0, 2.0, 3.0],
            color_raw: [1, 2, 3],
            color: [1, 2, 3],
            error: 0.5,
            track_length: 2,
        };
        let buf = encode_points(&[point.clone()], PointFormat::Full)?;
        assert_eq!(buf.len(), 8 + 8 + 24 + 3 + 8 + 8 + 2 * 8);

        let decoded = decode_points(&buf, PointFormat::Full, &ColorEnhancement::IDENTITY)?;
        assert_eq!(decoded, vec![point]);
        Ok(())
    }

    #[test]
    fn test_full_images_shrink_to_mini() -> Result<(), ColmapError> {
        let images = vec![ImageRecord {
            id: 2,
            qvec: [0.5, 0.5, 0.5, 0.5],
            tvec: [1.0, 0.0, -1.0],
            camera_id: 1,
            name: "scene/photo.jpg".to_string(),
        }];
        let full = encode_images(&images, ImageFormat::Full)?;
        let mini = encode_images(&decode_images(&full, ImageFormat::Full)?, ImageFormat::Mini)?;
        assert_eq!(full.len(), mini.len() + 8);
        assert_eq!(decode_images(&mini, ImageFormat::Mini)?, images);
        Ok(())
    }

    #[test]
    fn test_encode_images_rejects_nul() {
        let images = vec![ImageRecord {
            id: 1,
            qvec: [1.0, 0.0, 0.0, 0.0],
            tvec: [0.0; 3],
            camera_id: 1,
            name: "bad\0name".to_string(),
        }];
        assert!(matches!(
            encode_images(&images, ImageFormat::Mini),
            Err(ColmapError::InvalidImageName(_))
        ));
    }

    #[test]
    fn test_raw_name_bytes_survive_reencoding() -> Result<(), ColmapError> {
        let image = ImageRecord {
            id: 4,
            qvec: [1.0, 0.0, 0.0, 0.0],
            tvec: [0.0; 3],
            camera_id: 1,
            name: "placeholder".to_string(),
        };
        let mut full = encode_images(std::slice::from_ref(&image), ImageFormat::Full)?;

        // swap the name for bytes that are not valid UTF-8
        let start = full.len() - 8 - image.name.len() - 1;
        full.truncate(start);
        full.extend_from_slice(&[b'c', 0xe9, 0xff, b'.', b'j', b'p', b'g', 0]);
        full.extend_from_slice(&0u64.to_le_bytes());

        let decoded = decode_images(&full, ImageFormat::Full)?;
        let mini = encode_images(&decoded, ImageFormat::Mini)?;
        assert!(mini.ends_with(&[b'c', 0xe9, 0xff, b'.', b'j', b'p', b'g', 0]));
        assert_eq!(decode_images(&mini, ImageFormat::Mini)?, decoded);
        Ok(())
    }

    #[test]
    fn test_encode_images_rejects_wide_chars() {
        let images = vec![ImageRecord {
            id: 1,
            qvec: [1.0, 0.0, 0.0, 0.0],
            tvec: [0.0; 3],
            camera_id: 1,
            name: "\u{65e5}.jpg".to_string(),
        }];
        assert!(matches!(
            encode_images(&images, ImageFormat::Mini),
            Err(ColmapError::InvalidImageName(_))
        ));
    }

    #[test]
    fn test_encode_cameras() -> Result<(), ColmapError> {
        let cameras = vec![CameraRecord {
            camera_id: -3,
            model_id: 6,
            width: 4000,
            height: 3000,
            params: [3000.0, 3001.0, 2000.0, 1500.0],
        }];
        let buf = encode_cameras(&cameras)?;
        assert_eq!(buf.len(), 8 + 56);
        assert_eq!(decode_cameras(&buf)?, cameras);
        Ok(())
    }
}
