// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image preparation: decode a stored photo to learn its pixel dimensions and
// keep an encoded form that both document writers can embed.

use ::image::{DynamicImage, ImageFormat};
use sitereport_core::error::{Result, SiteReportError};
use tracing::{debug, instrument};

/// JPEG quality used when a photo has to be re-encoded.
const REENCODE_QUALITY: u8 = 85;

/// Encoded format carried into the documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// File extension rust_xlsxwriter and viewers expect for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

/// Decoded photo metadata plus an embeddable encoding.
#[derive(Debug, Clone)]
pub struct ImageMeta {
    /// PNG or JPEG bytes, ready to embed.
    pub encoded: Vec<u8>,
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
}

impl ImageMeta {
    /// Decode the embeddable bytes back into pixels.
    pub fn decode_pixels(&self) -> Result<DynamicImage> {
        let format = match self.kind {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
        };
        ::image::load_from_memory_with_format(&self.encoded, format)
            .map_err(|err| SiteReportError::Embed(format!("failed to re-read image: {}", err)))
    }
}

/// Decode `data` and produce its [`ImageMeta`].
///
/// PNG and JPEG input is kept byte-for-byte. Any other raster format the
/// `image` crate understands is re-encoded as JPEG.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_image(data: &[u8]) -> Result<ImageMeta> {
    if data.is_empty() {
        return Err(SiteReportError::Decode("image data is empty".into()));
    }

    let format = ::image::guess_format(data)
        .map_err(|err| SiteReportError::Decode(format!("unknown image format: {}", err)))?;
    let img = ::image::load_from_memory_with_format(data, format)
        .map_err(|err| SiteReportError::Decode(format!("failed to decode image: {}", err)))?;

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(SiteReportError::Decode(format!(
            "image has no pixels ({}x{})",
            width, height
        )));
    }

    let (encoded, kind) = match format {
        ImageFormat::Png => (data.to_vec(), ImageKind::Png),
        ImageFormat::Jpeg => (data.to_vec(), ImageKind::Jpeg),
        other => {
            debug!(format = ?other, "Re-encoding photo as JPEG");
            (to_jpeg_bytes(&img)?, ImageKind::Jpeg)
        }
    };

    debug!(width, height, kind = kind.extension(), "Image prepared");
    Ok(ImageMeta {
        encoded,
        kind,
        width,
        height,
    })
}

fn to_jpeg_bytes(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let rgb = img.to_rgb8();
    let encoder =
        ::image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, REENCODE_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|err| SiteReportError::Embed(format!("JPEG encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{jpeg, png, solid_image};

    #[test]
    fn png_is_kept_verbatim() {
        let bytes = png(40, 30);
        let meta = decode_image(&bytes).expect("decode");
        assert_eq!((meta.width, meta.height), (40, 30));
        assert_eq!(meta.kind, ImageKind::Png);
        assert_eq!(meta.encoded, bytes);
    }

    #[test]
    fn jpeg_is_tagged_jpeg() {
        let meta = decode_image(&jpeg(64, 48)).expect("decode");
        assert_eq!(meta.kind, ImageKind::Jpeg);
        assert_eq!((meta.width, meta.height), (64, 48));
    }

    #[test]
    fn other_formats_fall_back_to_jpeg() {
        let bmp = solid_image(20, 10, ImageFormat::Bmp);
        let meta = decode_image(&bmp).expect("decode");
        assert_eq!(meta.kind, ImageKind::Jpeg);
        assert_eq!((meta.width, meta.height), (20, 10));
        assert_eq!(::image::guess_format(&meta.encoded).ok(), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn empty_data_is_a_decode_error() {
        assert!(matches!(decode_image(&[]), Err(SiteReportError::Decode(_))));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = decode_image(b"not an image at all");
        assert!(matches!(result, Err(SiteReportError::Decode(_))));
    }

    #[test]
    fn truncated_png_is_a_decode_error() {
        let bytes = png(50, 50);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(SiteReportError::Decode(_))));
    }

    #[test]
    fn pixels_round_trip() {
        let meta = decode_image(&png(12, 7)).expect("decode");
        let pixels = meta.decode_pixels().expect("pixels");
        assert_eq!((pixels.width(), pixels.height()), (12, 7));
    }
}
