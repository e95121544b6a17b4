//! Profile image fetch and decode.
//!
//! Only PNG and JPEG are supported, chosen by the response `Content-Type`.
//! Every failure here degrades to "no image": the caller gets `None` and the
//! render carries on without the image block.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use image::{ColorType, DynamicImage, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use reqwest::{header::CONTENT_TYPE, Client};
use thiserror::Error;
use tracing::{debug, warn};

const FETCH_TIMEOUT_SECS: u64 = 15;
/// Largest remote image body a render will read.
pub const MAX_FETCH_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image request returned status {0}")]
    Status(u16),

    #[error("image body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Raster formats the page can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Maps a `Content-Type` header value (parameters allowed) to a supported kind.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "image/png" => Some(ImageKind::Png),
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    fn format(&self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Raw response from an image fetch.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Fetches a remote image by URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageError>;
}

/// [`ImageFetcher`] over plain HTTP(S).
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: Client,
    max_bytes: usize,
}

impl HttpImageFetcher {
    pub fn new() -> Result<Self, ImageError> {
        Self::with_limit(MAX_FETCH_BYTES)
    }

    /// Fetcher that gives up on bodies larger than `max_bytes`.
    pub fn with_limit(max_bytes: usize) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, max_bytes })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageError> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let too_large = ImageError::TooLarge {
            limit: self.max_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(too_large);
        }

        // Content-Length may be absent or wrong, so the cap is enforced while reading too
        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }

        Ok(FetchedImage {
            content_type,
            bytes: body.freeze(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Decoding
// ────────────────────────────────────────────────────────────────────────────

/// How the pixel data in an [`EmbeddedImage`] is compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// Original JPEG bytes, embedded as-is.
    Dct,
    /// zlib-compressed 8-bit RGB samples.
    Flate,
}

/// An image ready to be written as a PDF image XObject.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    pub encoding: ImageEncoding,
    pub data: Vec<u8>,
    /// zlib-compressed 8-bit alpha channel, when the source has transparency.
    pub alpha: Option<Vec<u8>>,
}

impl EmbeddedImage {
    pub fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}

/// Decodes `bytes` as `kind` into something the PDF writer can embed.
///
/// 8-bit three-component JPEGs are passed through untouched; everything else
/// is re-encoded as Flate-compressed RGB with an optional soft mask.
pub fn decode_image(kind: ImageKind, bytes: &[u8]) -> Result<EmbeddedImage, ImageError> {
    let decoded = image::load_from_memory_with_format(bytes, kind.format())?;

    if kind == ImageKind::Jpeg && is_rgb_jpeg(decoded.color(), bytes) {
        return Ok(EmbeddedImage {
            width: decoded.width(),
            height: decoded.height(),
            encoding: ImageEncoding::Dct,
            data: bytes.to_vec(),
            alpha: None,
        });
    }
    Ok(flate_encode(&decoded))
}

/// The decoder reports CMYK/YCCK JPEGs as `Rgb8` after converting them, so the
/// frame header has to confirm three 8-bit components before the raw DCT data
/// can be tagged DeviceRGB.
fn is_rgb_jpeg(color: ColorType, bytes: &[u8]) -> bool {
    color == ColorType::Rgb8 && jpeg_frame_layout(bytes) == Some((8, 3))
}

/// `(precision, components)` from the first SOFn segment of a JPEG stream.
fn jpeg_frame_layout(bytes: &[u8]) -> Option<(u8, u8)> {
    if bytes.get(..2)? != [0xFF, 0xD8] {
        return None;
    }
    let mut pos = 2;
    loop {
        // fill bytes may precede a marker
        while *bytes.get(pos)? == 0xFF && *bytes.get(pos + 1)? == 0xFF {
            pos += 1;
        }
        if *bytes.get(pos)? != 0xFF {
            return None;
        }
        let marker = *bytes.get(pos + 1)?;
        match marker {
            // SOF0..SOF15, minus DHT (C4), JPG (C8) and DAC (CC)
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                return Some((*bytes.get(pos + 4)?, *bytes.get(pos + 9)?));
            }
            // start of scan without a frame header
            0xDA | 0xD9 => return None,
            // standalone markers carry no length
            0x01 | 0xD0..=0xD7 => pos += 2,
            _ => {
                let len = u16::from_be_bytes([*bytes.get(pos + 2)?, *bytes.get(pos + 3)?]);
                pos += 2 + len as usize;
            }
        }
    }
}

fn flate_encode(image: &DynamicImage) -> EmbeddedImage {
    let level = CompressionLevel::DefaultLevel as u8;

    let alpha = image.color().has_alpha().then(|| {
        let alphas: Vec<u8> = image.to_rgba8().pixels().map(|p| p.0[3]).collect();
        compress_to_vec_zlib(&alphas, level)
    });

    EmbeddedImage {
        width: image.width(),
        height: image.height(),
        encoding: ImageEncoding::Flate,
        data: compress_to_vec_zlib(image.to_rgb8().as_raw(), level),
        alpha,
    }
}

/// Fetches and decodes the profile image at `url`.
///
/// Returns `None` on any failure or unsupported content type.
pub async fn load_profile_image(fetcher: &dyn ImageFetcher, url: &str) -> Option<EmbeddedImage> {
    let fetched = match fetcher.fetch(url).await {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!(url, error = %e, "Profile image fetch failed; rendering without image");
            return None;
        }
    };

    let Some(kind) = fetched
        .content_type
        .as_deref()
        .and_then(ImageKind::from_content_type)
    else {
        debug!(
            url,
            content_type = ?fetched.content_type,
            "Unsupported profile image type; skipping"
        );
        return None;
    };

    let decoded = tokio::task::spawn_blocking(move || decode_image(kind, &fetched.bytes))
        .await
        .map_err(ImageError::from)
        .and_then(|result| result);

    match decoded {
        Ok(image) => Some(image),
        Err(e) => {
            warn!(url, error = %e, "Profile image decode failed; rendering without image");
            None
        }
    }
}
