//! Turn an arbitrary picture into the 32x32 PNG data URI stored with a pet.

use crate::errors::{AppError, AppResult};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use image::imageops::FilterType;
use std::io::Cursor;
use std::path::Path;

pub const THUMB_SIZE: u32 = 32;
const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Decode `bytes` (png, jpeg, gif or webp), squash to 32x32 and return a
/// `data:image/png;base64,...` URI.
pub fn thumbnail_from_bytes(bytes: &[u8]) -> AppResult<String> {
    let img = image::load_from_memory(bytes)?;
    let thumb = img.resize_exact(THUMB_SIZE, THUMB_SIZE, FilterType::Triangle);

    let mut png = Cursor::new(Vec::new());
    thumb.write_to(&mut png, ImageFormat::Png)?;

    Ok(format!("{DATA_URI_PREFIX}{}", STANDARD.encode(png.into_inner())))
}

pub fn thumbnail_from_file(path: &Path) -> AppResult<String> {
    let bytes = std::fs::read(path)?;
    thumbnail_from_bytes(&bytes)
}

/// Raw PNG bytes of a stored data URI.
pub fn decode_data_uri(uri: &str) -> AppResult<Vec<u8>> {
    let payload = uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| AppError::InvalidPet("thumbnail is not a PNG data URI".into()))?;

    STANDARD
        .decode(payload)
        .map_err(|e| AppError::InvalidPet(format!("thumbnail is not valid base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([200, 120, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn any_size_becomes_32_by_32() {
        for (w, h) in [(640, 480), (10, 90), (32, 32)] {
            let uri = thumbnail_from_bytes(&png_bytes(w, h)).unwrap();
            assert!(uri.starts_with("data:image/png;base64,"));

            let decoded = image::load_from_memory(&decode_data_uri(&uri).unwrap()).unwrap();
            assert_eq!(decoded.dimensions(), (THUMB_SIZE, THUMB_SIZE));
        }
    }

    #[test]
    fn garbage_input_is_an_image_error() {
        assert!(matches!(
            thumbnail_from_bytes(b"definitely not a picture"),
            Err(AppError::Image(_))
        ));
    }

    #[test]
    fn foreign_data_uri_is_rejected() {
        assert!(decode_data_uri("data:image/jpeg;base64,AAAA").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }
}
