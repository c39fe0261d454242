use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

/// Decoded background image, RGBA8, ready for upload.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    pixels: RgbaImage,
}

impl BackgroundImage {
    /// Decodes an image file (PNG or JPEG). `flip` mirrors it vertically.
    pub fn open(path: impl AsRef<Path>, flip: bool) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .with_context(|| format!("failed to decode background image {}", path.display()))?;

        let image = Self::from_rgba(decoded.to_rgba8(), flip)?;
        let (width, height) = image.pixels.dimensions();
        log::info!("background: {} ({width}x{height})", path.display());
        Ok(image)
    }

    /// Wraps already-decoded pixels. Fails on an empty image.
    pub fn from_rgba(mut pixels: RgbaImage, flip: bool) -> Result<Self> {
        anyhow::ensure!(
            pixels.width() > 0 && pixels.height() > 0,
            "background image is empty"
        );

        if flip {
            image::imageops::flip_vertical_in_place(&mut pixels);
        }

        Ok(Self { pixels })
    }

    /// Uploads the pixels into a sampled sRGB texture and returns its view.
    /// The view keeps the texture alive.
    pub fn upload(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::TextureView {
        let (width, height) = self.pixels.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ripple background"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            self.pixels.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: None,
            },
            size,
        );

        log::debug!("background uploaded ({width}x{height})");
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

/// Nearest-filtered sampler clamped to the texture edge.
pub fn create_nearest_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("ripple nearest sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn two_rows() -> RgbaImage {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img
    }

    #[test]
    fn pixels_are_kept_as_decoded() {
        let bg = BackgroundImage::from_rgba(two_rows(), false).unwrap();
        assert_eq!(bg.pixels.dimensions(), (1, 2));
        assert_eq!(bg.pixels.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn flip_swaps_rows() {
        let bg = BackgroundImage::from_rgba(two_rows(), true).unwrap();
        assert_eq!(bg.pixels.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(bg.pixels.get_pixel(0, 1), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn empty_image_is_rejected() {
        assert!(BackgroundImage::from_rgba(RgbaImage::new(0, 0), false).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = BackgroundImage::open("does/not/exist.png", false).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.png"));
    }
}
