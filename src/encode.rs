// Image encoding: PNG bytes, then standard base64, then a data URL that can
// be embedded in the request body.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Losslessly encode the image as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .context("Failed to encode screenshot as PNG")?;
    Ok(buf.into_inner())
}

/// PNG bytes as padded base64 text with no line breaks.
pub fn encode_base64(image: &RgbaImage) -> Result<String> {
    Ok(STANDARD.encode(encode_png(image)?))
}

pub fn data_url(image: &RgbaImage) -> Result<String> {
    let encoded = encode_base64(image)?;
    log::debug!(
        "Encoded {}x{} screenshot into {} base64 bytes",
        image.width(),
        image.height(),
        encoded.len()
    );
    Ok(format!("{DATA_URL_PREFIX}{encoded}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(23, 11, |x, y| {
            Rgba([(x * 11) as u8, (y * 23) as u8, (x ^ y) as u8, (200 + x) as u8])
        })
    }

    #[test]
    fn encoding_is_repeatable() {
        let img = sample();
        assert_eq!(encode_base64(&img).unwrap(), encode_base64(&img).unwrap());
    }

    #[test]
    fn decoded_png_reproduces_the_pixels() {
        let img = sample();
        let text = encode_base64(&img).unwrap();
        let png = STANDARD.decode(text.as_bytes()).unwrap();
        let back = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(back, img);
    }

    #[test]
    fn base64_is_a_single_line() {
        let img = RgbaImage::from_pixel(300, 200, Rgba([1, 2, 3, 4]));
        let text = encode_base64(&img).unwrap();
        assert!(!text.contains('\n') && !text.contains('\r'));
    }

    #[test]
    fn data_url_carries_png_mime_prefix() {
        let img = sample();
        let url = data_url(&img).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let png = STANDARD.decode(&url[DATA_URL_PREFIX.len()..]).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
