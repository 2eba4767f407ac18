use wgpu::{Device, Queue, Texture, TextureFormat, TextureView, TextureViewDescriptor};

/// Format of every layer texture: premultiplied RGBA8, no sRGB conversion
pub const LAYER_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// Single-level 2D RGBA8 texture with its default view
pub struct LayerTexture {
    pub texture: Texture,
    pub view: TextureView,
    pub size: [u32; 2],
}

impl LayerTexture {
    /// Zero extents are bumped to one texel; wgpu rejects empty textures
    pub fn new(device: &Device, label: &str, size: [u32; 2], usage: wgpu::TextureUsages) -> Self {
        let size = [size[0].max(1), size[1].max(1)];
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: LAYER_FORMAT,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor::default());

        Self {
            texture,
            view,
            size,
        }
    }

    /// Sampled texture filled from the CPU
    pub fn upload_target(device: &Device, label: &str, size: [u32; 2]) -> Self {
        Self::new(
            device,
            label,
            size,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        )
    }

    /// Render target that is later sampled by the composite pass
    pub fn render_target(device: &Device, label: &str, size: [u32; 2]) -> Self {
        Self::new(
            device,
            label,
            size,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }

    /// Upload tightly packed RGBA8 rows
    ///
    /// Data that does not cover the whole texture is ignored.
    pub fn write_rgba8(&self, queue: &Queue, rgba: &[u8]) {
        let [width, height] = self.size;
        let row_bytes = width as usize * 4;
        if rgba.len() < row_bytes * height as usize {
            log::debug!(
                "Skipping upload of {} bytes into {}x{} texture",
                rgba.len(),
                width,
                height
            );
            return;
        }

        let padded_bpr = padded_bytes_per_row(width);
        let mut padded_bytes = Vec::with_capacity(padded_bpr * height as usize);
        for row in rgba.chunks_exact(row_bytes).take(height as usize) {
            padded_bytes.extend_from_slice(row);
            padded_bytes.extend(std::iter::repeat(0u8).take(padded_bpr - row_bytes));
        }

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &padded_bytes,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_bpr as u32),
                rows_per_image: Some(height),
            },
            extent(self.size),
        );
    }
}

/// RGBA8 row size rounded up to the 256-byte copy alignment
pub fn padded_bytes_per_row(width: u32) -> usize {
    let unpadded = width as usize * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize;
    ((unpadded + align - 1) / align) * align
}

fn extent(size: [u32; 2]) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size[0],
        height: size[1],
        depth_or_array_layers: 1,
    }
}
