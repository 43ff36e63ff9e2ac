//! Image sources and the single conversion funnel
//!
//! Four ways to hand the widget an image, all converted through one
//! rasterization step. A source that cannot produce pixels degrades to
//! "no image" with a log line; no error crosses the widget API.

use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;
use xxhash_rust::xxh3::xxh3_64;

use crate::texture::Raster;

/// An image to display, by provenance.
#[derive(Debug, Clone)]
pub enum Source {
    /// Image file on disk, decoded on assignment.
    Path(PathBuf),
    /// Encoded image bytes, e.g. an embedded resource.
    Bytes(Arc<[u8]>),
    /// An already-decoded image.
    Image(Arc<DynamicImage>),
    /// Raw RGBA8 pixels with explicit dimensions.
    Rgba {
        width: u32,
        height: u32,
        pixels: Arc<[u8]>,
    },
}

impl Source {
    /// Display the image file at `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Display an encoded image held in memory.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Display an already-decoded image.
    pub fn from_image(image: impl Into<Arc<DynamicImage>>) -> Self {
        Self::Image(image.into())
    }

    /// Display a raw RGBA8 pixel buffer.
    pub fn from_rgba(width: u32, height: u32, pixels: impl Into<Arc<[u8]>>) -> Self {
        Self::Rgba {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// Cheap identity used to detect wholesale replacement between frames.
    pub(crate) fn cache_key(&self) -> u64 {
        match self {
            Self::Path(path) => xxh3_64(path.to_string_lossy().as_bytes()),
            Self::Bytes(bytes) => xxh3_64(bytes),
            Self::Image(image) => ptr_key(Arc::as_ptr(image) as usize, 0, 0),
            Self::Rgba {
                width,
                height,
                pixels,
            } => ptr_key(pixels.as_ptr() as usize, *width, *height),
        }
    }

    /// Convert whatever representation was supplied into a pixel buffer.
    ///
    /// Every failure path logs and yields `None`, leaving the widget with an
    /// empty circle rather than an error.
    pub(crate) fn rasterize(&self) -> Option<Raster> {
        match self {
            Self::Path(path) => match image::open(path) {
                Ok(decoded) => Raster::from_dynamic(&decoded),
                Err(e) => {
                    tracing::warn!("Failed to decode image at {:?}: {}", path, e);
                    None
                }
            },
            Self::Bytes(bytes) => match image::load_from_memory(bytes) {
                Ok(decoded) => Raster::from_dynamic(&decoded),
                Err(e) => {
                    tracing::warn!("Failed to decode embedded image: {}", e);
                    None
                }
            },
            Self::Image(decoded) => Raster::from_dynamic(decoded),
            Self::Rgba {
                width,
                height,
                pixels,
            } => {
                let mut buffer = Vec::new();
                if buffer.try_reserve_exact(pixels.len()).is_err() {
                    tracing::error!("Out of memory copying {}x{} pixel buffer", width, height);
                    return None;
                }
                buffer.extend_from_slice(pixels);
                Raster::from_rgba(*width, *height, buffer)
            }
        }
    }
}

fn ptr_key(ptr: usize, width: u32, height: u32) -> u64 {
    let mut bytes = [0u8; 24];
    bytes[..8].copy_from_slice(&(ptr as u64).to_le_bytes());
    bytes[8..16].copy_from_slice(&u64::from(width).to_le_bytes());
    bytes[16..24].copy_from_slice(&u64::from(height).to_le_bytes());
    xxh3_64(&bytes)
}
