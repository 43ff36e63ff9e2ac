//! Source raster and the software texture sampler
//!
//! The circular clip is composited on the CPU: the source raster is scaled
//! and clamp-sampled into the square drawing region, the circle coverage is
//! multiplied into the alpha channel, and the renderer receives a finished
//! RGBA texture.

use image::{DynamicImage, GenericImageView};

/// Decoded RGBA8 pixel buffer backing the circular texture.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Wrap a raw RGBA8 buffer.
    ///
    /// Zero dimensions or a length that does not match `width * height * 4`
    /// yield `None`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            tracing::debug!("Pixel buffer has no intrinsic size, nothing to display");
            return None;
        }

        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            tracing::warn!(
                "Pixel buffer holds {} bytes but {}x{} RGBA needs {}",
                pixels.len(),
                width,
                height,
                expected
            );
            return None;
        }

        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert a decoded image into an owned RGBA8 raster.
    ///
    /// Zero intrinsic dimensions yield `None`. Allocation failure is caught
    /// here and degrades to `None` instead of aborting.
    pub fn from_dynamic(image: &DynamicImage) -> Option<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            tracing::debug!("Image has no intrinsic size, nothing to rasterize");
            return None;
        }

        let len = width as usize * height as usize * 4;
        let mut pixels = Vec::new();
        if pixels.try_reserve_exact(len).is_err() {
            tracing::error!("Out of memory rasterizing {}x{} image", width, height);
            return None;
        }

        match image {
            DynamicImage::ImageRgba8(buffer) => pixels.extend_from_slice(buffer.as_raw()),
            other => {
                for (_, _, pixel) in other.pixels() {
                    pixels.extend_from_slice(&pixel.0);
                }
            }
        }

        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y), clamp-to-edge on both axes.
    fn pixel_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let offset = (y * self.width as usize + x) * 4;
        let pixel = &self.pixels[offset..offset + 4];
        [pixel[0], pixel[1], pixel[2], pixel[3]]
    }
}

/// Texture sampler mapping a raster onto the square drawing region.
///
/// When the raster does not already match the region, one uniform factor
/// derived from the width ratio scales both axes. Taller-than-wide sources
/// therefore overflow vertically and are cropped by the circle mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureSampler {
    scale: f32,
}

impl TextureSampler {
    /// Build the sampler for a drawing region of the given side length.
    pub fn fit(region_side: f32, raster: &Raster) -> Self {
        let scale = if region_side != raster.width as f32 || region_side != raster.height as f32 {
            region_side / raster.width as f32
        } else {
            1.0
        };

        Self { scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Sample the raster at region coordinates, nearest neighbor.
    pub fn sample(&self, raster: &Raster, x: f32, y: f32) -> [u8; 4] {
        let src_x = (x / self.scale).floor() as i64;
        let src_y = (y / self.scale).floor() as i64;
        raster.pixel_clamped(src_x, src_y)
    }
}

/// Composite the raster into a `side` x `side` RGBA texture masked to a
/// circle of `radius` around the region center.
///
/// Straight (non-premultiplied) alpha, with a one-pixel feather across the
/// mask edge.
pub fn composite_circle(
    raster: &Raster,
    sampler: &TextureSampler,
    side: u32,
    radius: f32,
) -> Vec<u8> {
    let mut out = vec![0u8; side as usize * side as usize * 4];
    let center = side as f32 / 2.0;

    for y in 0..side {
        for x in 0..side {
            let fx = x as f32 + 0.5;
            let fy = y as f32 + 0.5;
            let distance = ((fx - center).powi(2) + (fy - center).powi(2)).sqrt();
            let coverage = (radius - distance + 0.5).clamp(0.0, 1.0);
            if coverage == 0.0 {
                continue;
            }

            let [r, g, b, a] = sampler.sample(raster, fx, fy);
            let offset = (y as usize * side as usize + x as usize) * 4;
            out[offset] = r;
            out[offset + 1] = g;
            out[offset + 2] = b;
            out[offset + 3] = (f32::from(a) * coverage).round() as u8;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Raster whose pixels encode their source row: red = row % 256,
    /// green = row / 256.
    fn row_coded_raster(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for _ in 0..width {
                pixels.extend_from_slice(&[(y % 256) as u8, (y / 256) as u8, 0, 255]);
            }
        }
        Raster::from_rgba(width, height, pixels).unwrap()
    }

    fn solid_raster(side: u32, rgba: [u8; 4]) -> Raster {
        let pixels = rgba.repeat(side as usize * side as usize);
        Raster::from_rgba(side, side, pixels).unwrap()
    }

    #[test]
    fn test_identity_when_raster_matches_region() {
        let raster = solid_raster(100, [10, 20, 30, 255]);
        let sampler = TextureSampler::fit(100.0, &raster);
        assert_eq!(sampler.scale(), 1.0);
    }

    #[test]
    fn test_scale_derived_from_width_only() {
        let raster = row_coded_raster(200, 400);
        let sampler = TextureSampler::fit(100.0, &raster);
        assert_eq!(sampler.scale(), 0.5);
    }

    #[test]
    fn test_fit_is_idempotent() {
        let raster = row_coded_raster(200, 400);
        let first = TextureSampler::fit(100.0, &raster);
        let second = TextureSampler::fit(100.0, &raster);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tall_source_cropped_to_top_rows() {
        // 200x400 into a side-100 region: scale 0.5, so the bottom region
        // row reads source row 199 and rows 200..400 are never reachable.
        let raster = row_coded_raster(200, 400);
        let sampler = TextureSampler::fit(100.0, &raster);

        let [r, g, _, _] = sampler.sample(&raster, 50.5, 99.5);
        assert_eq!((r, g), (199, 0));

        let [r, g, _, _] = sampler.sample(&raster, 50.5, 0.5);
        assert_eq!((r, g), (1, 0));
    }

    #[test]
    fn test_short_source_clamps_to_bottom_edge() {
        // Width matches the region, so the scale stays 1.0 and rows past the
        // source height repeat the last row.
        let raster = row_coded_raster(100, 50);
        let sampler = TextureSampler::fit(100.0, &raster);
        assert_eq!(sampler.scale(), 1.0);

        let [r, _, _, _] = sampler.sample(&raster, 10.5, 99.5);
        assert_eq!(r, 49);
    }

    #[test]
    fn test_composite_masks_corners() {
        let raster = solid_raster(8, [200, 0, 0, 255]);
        let sampler = TextureSampler::fit(8.0, &raster);
        let out = composite_circle(&raster, &sampler, 8, 4.0);

        // Corner pixel lies outside the circle.
        assert_eq!(out[3], 0);
        // A center pixel keeps the source color at full alpha.
        let center = (4 * 8 + 4) * 4;
        assert_eq!(&out[center..center + 4], &[200, 0, 0, 255]);
    }

    #[test]
    fn test_composite_respects_radius() {
        let raster = solid_raster(8, [200, 0, 0, 255]);
        let sampler = TextureSampler::fit(8.0, &raster);
        let full = composite_circle(&raster, &sampler, 8, 4.0);
        let inset = composite_circle(&raster, &sampler, 8, 2.0);

        // (4, 1) sits inside the full circle but outside the inset one.
        let offset = (8 + 4) * 4;
        assert!(full[offset + 3] > 0);
        assert_eq!(inset[offset + 3], 0);
    }

    #[test]
    fn test_from_rgba_rejects_zero_dimensions() {
        assert!(Raster::from_rgba(0, 10, vec![]).is_none());
        assert!(Raster::from_rgba(10, 0, vec![]).is_none());
    }

    #[test]
    fn test_from_rgba_rejects_length_mismatch() {
        assert!(Raster::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(Raster::from_rgba(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn test_from_dynamic_rejects_empty_image() {
        let empty = DynamicImage::ImageRgba8(image::RgbaImage::new(0, 0));
        assert!(Raster::from_dynamic(&empty).is_none());
    }

    #[test]
    fn test_from_dynamic_converts_non_rgba() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(2, 3, image::Luma([7])));
        let raster = Raster::from_dynamic(&gray).unwrap();
        assert_eq!((raster.width(), raster.height()), (2, 3));
        assert_eq!(raster.pixel_clamped(0, 0), [7, 7, 7, 255]);
    }
}
