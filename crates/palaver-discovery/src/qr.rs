//! QR rendering for the gateway landing page.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use image::{DynamicImage, Luma};
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrError {
    #[error("QR code generation failed: {0}")]
    Generation(String),

    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// Render `url` as a QR PNG and return it as a `data:` URI ready to drop
/// into an `<img src>`. High error correction so scuffed phone cameras
/// still scan it across the room.
pub fn qr_png_data_uri(url: &str) -> Result<String, QrError> {
    let qr = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)
        .map_err(|e| QrError::Generation(e.to_string()))?;

    let image = qr
        .render::<Luma<u8>>()
        .min_dimensions(300, 300)
        .quiet_zone(true)
        .module_dimensions(8, 8)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;

    Ok(format!("data:image/png;base64,{}", B64.encode(png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_png_data_uri() {
        let uri = qr_png_data_uri("http://192.168.1.10:5001/chat").unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        // PNG magic bytes survive the round trip
        let b64 = uri.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = B64.decode(b64).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
