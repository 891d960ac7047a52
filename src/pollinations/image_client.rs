use crate::{
    config::PollinationsConfig,
    error::{GenerationError, Result},
    models::GenerationRequest,
    pollinations::ImageSource,
};
use async_trait::async_trait;
use reqwest::Client;

/// `<base>/<encoded formatted prompt>?width=<w>&height=<h>`
pub fn request_url(endpoint: &str, request: &GenerationRequest) -> String {
    let (width, height) = request.dimensions();
    format!(
        "{}/{}?width={}&height={}",
        endpoint.trim_end_matches('/'),
        request.encoded_prompt(),
        width,
        height
    )
}

#[derive(Debug, Clone)]
pub struct ImageClient {
    http: Client,
    endpoint: String,
}

impl ImageClient {
    pub fn new(config: &PollinationsConfig) -> Self {
        Self {
            http: Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn url_for(&self, request: &GenerationRequest) -> String {
        request_url(&self.endpoint, request)
    }
}

#[async_trait]
impl ImageSource for ImageClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::info!("Requesting image from {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| GenerationError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Request {
                url: url.to_string(),
                source: e,
            })?;

        log::debug!("Received {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectCategory, RenderedImage, StyleCategory};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers a single request with `status` and `body`, returning the URL to hit.
    async fn serve_once(status: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }

            let header = format!(
                "HTTP/1.1 {}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            socket.write_all(header.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/prompt/realistic%2C%20dunes?width=1024&height=1024", addr)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([200, 180, 40, 255])));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_request_url_for_fox_example() {
        let request = GenerationRequest::new(
            "A red fox in snow",
            AspectCategory::Portrait,
            StyleCategory::Fantasy,
        )
        .unwrap();

        assert_eq!(
            request_url("https://image.pollinations.ai/prompt", &request),
            "https://image.pollinations.ai/prompt/fantasy%2C%20A%20red%20fox%20in%20snow%2C%20high%20quality%2C%20detailed?width=768&height=1024"
        );
    }

    #[test]
    fn test_client_normalizes_endpoint() {
        let client = ImageClient::new(
            &PollinationsConfig::new().with_endpoint("http://localhost:9000/prompt/"),
        );
        assert_eq!(client.endpoint(), "http://localhost:9000/prompt");

        let request =
            GenerationRequest::new("city", AspectCategory::Ultrawide, StyleCategory::Cyberpunk)
                .unwrap();
        assert!(client
            .url_for(&request)
            .ends_with("/prompt/cyberpunk%2C%20city%2C%20high%20quality%2C%20detailed?width=1920&height=823"));
    }

    #[tokio::test]
    async fn test_fetch_maps_error_status() {
        let url = serve_once("503 Service Unavailable", b"busy".to_vec()).await;
        let client = ImageClient::new(&PollinationsConfig::new());

        let err = client.fetch(&url).await.unwrap_err();
        match err {
            GenerationError::Http { status, url: failed } => {
                assert_eq!(status, 503);
                assert_eq!(failed, url);
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_image_bytes() {
        let png = png_bytes(12, 8);
        let url = serve_once("200 OK", png.clone()).await;
        let client = ImageClient::new(&PollinationsConfig::new());

        let bytes = client.fetch(&url).await.unwrap();
        assert_eq!(bytes, png);

        let rendered = RenderedImage::decode(&url, &bytes).unwrap();
        assert_eq!((rendered.bitmap.width(), rendered.bitmap.height()), (12, 8));
    }
}
