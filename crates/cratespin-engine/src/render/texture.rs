use image::imageops::FilterType;
use image::RgbaImage;

use crate::assets::ImageData;

use super::RenderCtx;

/// GPU-resident RGBA texture with a full mip chain and linear filtering.
///
/// The view and sampler are what the quad bind group consumes; the texture
/// itself is kept so ownership of all three handles stays in one place.
pub struct QuadTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl QuadTexture {
    /// Uploads `image` as an sRGB 2D texture and fills every mip level.
    ///
    /// Mip levels are downsampled on the CPU (triangle filter), each level
    /// from the previous one, then written with `queue.write_texture`. The
    /// source pixel buffer is not retained.
    pub fn upload(ctx: &RenderCtx<'_>, image: &ImageData) -> Self {
        let mip_count = mip_level_count(image.width, image.height);

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cratespin quad texture"),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        write_level(ctx, &texture, 0, image.width, image.height, &image.data);

        let mut level_pixels: RgbaImage =
            RgbaImage::from_raw(image.width, image.height, image.data.clone())
                .expect("ImageData buffer length matches its dimensions");

        for level in 1..mip_count {
            let w = (image.width >> level).max(1);
            let h = (image.height >> level).max(1);

            level_pixels = image::imageops::resize(&level_pixels, w, h, FilterType::Triangle);
            write_level(ctx, &texture, level, w, h, level_pixels.as_raw());
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cratespin quad sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

fn write_level(
    ctx: &RenderCtx<'_>,
    texture: &wgpu::Texture,
    level: u32,
    width: u32,
    height: u32,
    pixels: &[u8],
) {
    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: level,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

/// Mip levels needed to take `width` x `height` down to 1x1.
fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_chain_reaches_one_by_one() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
    }

    #[test]
    fn mip_chain_follows_the_larger_axis() {
        assert_eq!(mip_level_count(64, 32), 7);
        assert_eq!(mip_level_count(32, 64), 7);
    }

    #[test]
    fn mip_chain_for_non_power_of_two() {
        // 100 needs 7 bits, so levels 100, 50, 25, 12, 6, 3, 1.
        assert_eq!(mip_level_count(100, 60), 7);
    }
}
