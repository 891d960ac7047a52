pub mod image_client;
pub mod traits;

use crate::{error::Result, models::RenderedImage};

pub use image_client::{request_url, ImageClient};
pub use traits::ImageSource;

/// Fetch and decode one bitmap. The pipeline's only real suspension point.
pub async fn load_bitmap<S>(source: &S, url: &str) -> Result<RenderedImage>
where
    S: ImageSource + ?Sized,
{
    let bytes = source.fetch(url).await?;
    let rendered = RenderedImage::decode(url, &bytes)?;
    log::debug!(
        "Decoded {}x{} bitmap from {}",
        rendered.width(),
        rendered.height(),
        url
    );
    Ok(rendered)
}
