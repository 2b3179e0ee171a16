//! Cover art downloader

use crate::error::{Error, Result};
use image::{ImageFormat, ImageReader};
use reqwest::Client;
use std::io::Cursor;
use std::time::Duration;
use stswatcher::CoverArt;
use tracing::debug;

/// Default timeout for image downloads
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Largest accepted image (album art is usually well under 1 MiB)
pub const DEFAULT_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "spotistats/0.1.0";

/// Format and size read from an image header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Identifies the image format and reads its dimensions without decoding
/// the pixels.
pub fn probe_image(bytes: &[u8]) -> Result<ImageInfo> {
    if bytes.is_empty() {
        return Err(Error::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format().ok_or(Error::UnsupportedFormat)?;
    let (width, height) = reader.into_dimensions()?;

    Ok(ImageInfo {
        format,
        width,
        height,
    })
}

/// Downloads album art
#[derive(Debug, Clone)]
pub struct CoverClient {
    client: Client,
    max_bytes: usize,
}

impl CoverClient {
    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Downloads `url` and checks it is an image
    pub async fn fetch(&self, url: &str) -> Result<CoverArt> {
        debug!("Fetching cover {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }

        if let Some(length) = response.content_length() {
            if length as usize > self.max_bytes {
                return Err(Error::TooLarge(length as usize));
            }
        }

        let bytes = response.bytes().await?;
        if bytes.len() > self.max_bytes {
            return Err(Error::TooLarge(bytes.len()));
        }

        let info = probe_image(&bytes)?;
        debug!(
            "Cover {}: {:?} {}x{}",
            url, info.format, info.width, info.height
        );

        Ok(CoverArt {
            url: url.to_string(),
            bytes: bytes.to_vec(),
            mime_type: Some(info.format.to_mime_type().to_string()),
            width: info.width,
            height: info.height,
        })
    }
}

/// Builder for [`CoverClient`]
pub struct ClientBuilder {
    client: Option<Client>,
    timeout: Duration,
    user_agent: String,
    max_bytes: usize,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl ClientBuilder {
    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<CoverClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(CoverClient {
            client,
            max_bytes: self.max_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_rejects_garbage() {
        assert!(matches!(probe_image(b""), Err(Error::Empty)));
        assert!(matches!(
            probe_image(b"<html>not found</html>"),
            Err(Error::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_probe_png_header() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let info = probe_image(&png).unwrap();
        assert_eq!(info.format, ImageFormat::Png);
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.format.to_mime_type(), "image/png");
    }
}
