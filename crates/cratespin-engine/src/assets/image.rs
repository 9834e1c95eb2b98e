use std::path::Path;

use anyhow::{Context, Result};

/// Size of one [`ImageData::placeholder`] checker cell, in pixels.
const PLACEHOLDER_CELL: u32 = 8;

/// Side length of the placeholder texture, in pixels.
const PLACEHOLDER_SIZE: u32 = 64;

/// Decoded pixel buffer ready for GPU upload.
///
/// Rows are tightly packed RGBA8, top to bottom. The buffer is owned only
/// until upload; callers drop it once the texture is GPU-resident.
pub struct ImageData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// Decodes the image at `path` and converts it to RGBA8.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let decoded = image::open(path)
            .with_context(|| format!("failed to decode image at {}", path.display()))?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::debug!("decoded {width}x{height} image from {}", path.display());

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Magenta/black checkerboard substituted when decoding fails.
    ///
    /// A loaded-looking frame with this pattern tells the user the asset is
    /// missing; an invalid texture handle never reaches a draw call.
    pub fn placeholder() -> Self {
        let mut data = Vec::with_capacity((PLACEHOLDER_SIZE * PLACEHOLDER_SIZE * 4) as usize);

        for y in 0..PLACEHOLDER_SIZE {
            for x in 0..PLACEHOLDER_SIZE {
                let on = (x / PLACEHOLDER_CELL + y / PLACEHOLDER_CELL) % 2 == 0;
                let texel = if on { [255, 0, 255, 255] } else { [0, 0, 0, 255] };
                data.extend_from_slice(&texel);
            }
        }

        Self {
            data,
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        assert!(ImageData::from_path("no/such/texture.bmp").is_err());
    }

    #[test]
    fn decode_round_trips_through_a_bmp_on_disk() {
        let path = std::env::temp_dir().join("cratespin_image_test.bmp");
        let pixels: [u8; 16] = [
            255, 0, 0, 255, /**/ 0, 255, 0, 255, //
            0, 0, 255, 255, /**/ 255, 255, 255, 255,
        ];
        image::save_buffer(&path, &pixels, 2, 2, image::ColorType::Rgba8)
            .expect("failed to write test bitmap");

        let decoded = ImageData::from_path(&path).expect("failed to decode test bitmap");
        let _ = std::fs::remove_file(&path);

        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.height, 2);
        assert_eq!(decoded.data.len(), 16);
        assert_eq!(&decoded.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn placeholder_is_a_valid_rgba_buffer() {
        let image = ImageData::placeholder();
        assert_eq!(
            image.data.len(),
            (image.width * image.height * 4) as usize
        );
        // Opaque everywhere; checker alternates between magenta and black.
        assert_eq!(image.data[3], 255);
        assert_eq!(&image.data[0..4], &[255, 0, 255, 255]);
    }
}
