use crate::error::{GenerationError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Bitmap as fetched from the endpoint. Never shown directly.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub source_url: String,
    pub bitmap: DynamicImage,
}

impl RenderedImage {
    pub fn decode(source_url: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let source_url = source_url.into();
        if bytes.is_empty() {
            return Err(GenerationError::Decode(format!(
                "empty response body from {}",
                source_url
            )));
        }
        let bitmap = image::load_from_memory(bytes)
            .map_err(|e| GenerationError::Decode(e.to_string()))?;
        Ok(Self { source_url, bitmap })
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

/// Cropped result held as a PNG data URI, ready for display or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedImage {
    pub width: u32,
    pub height: u32,
    pub data_uri: String,
}

impl CroppedImage {
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let mut buf = Cursor::new(Vec::new());
        image
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| GenerationError::Encode(e.to_string()))?;

        Ok(Self {
            width: image.width(),
            height: image.height(),
            data_uri: format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(buf.into_inner())),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.data_uri.len() <= PNG_DATA_URI_PREFIX.len()
    }

    pub fn png_bytes(&self) -> Result<Vec<u8>> {
        let payload = self
            .data_uri
            .strip_prefix(PNG_DATA_URI_PREFIX)
            .ok_or_else(|| GenerationError::Decode("not a PNG data URI".into()))?;
        STANDARD
            .decode(payload)
            .map_err(|e| GenerationError::Decode(e.to_string()))
    }
}
