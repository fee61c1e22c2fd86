//! Page image encoding: lossy JPEG or lossless Flate-compressed RGB.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::export::error::ExportError;
use crate::export::options::{ImageFormat, ImageOptions};

/// PDF stream filter matching the encoded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    Dct,
    Flate,
}

impl ImageFilter {
    pub fn pdf_name(self) -> &'static str {
        match self {
            ImageFilter::Dct => "DCTDecode",
            ImageFilter::Flate => "FlateDecode",
        }
    }
}

/// An encoded page image ready to be embedded as an image XObject.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub filter: ImageFilter,
    pub data: Vec<u8>,
}

/// Maps a (0, 1] quality fraction onto the JPEG encoder's 1..=100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

pub fn encode_page(page: &RgbImage, options: &ImageOptions) -> Result<EncodedImage, ExportError> {
    let (filter, data) = match options.format {
        ImageFormat::Jpeg => {
            let mut buf = Vec::new();
            JpegEncoder::new_with_quality(&mut buf, jpeg_quality(options.quality))
                .encode_image(page)?;
            (ImageFilter::Dct, buf)
        }
        ImageFormat::Png => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(page.as_raw())?;
            (ImageFilter::Flate, encoder.finish()?)
        }
    };

    Ok(EncodedImage {
        width: page.width(),
        height: page.height(),
        filter,
        data,
    })
}
