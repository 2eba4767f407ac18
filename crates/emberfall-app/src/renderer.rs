//! Presents the particle layer and hand overlay on the window

use anyhow::Result;
use wgpu::{CommandEncoder, TextureView};

use emberfall_core::gpu::{CompositePipeline, GpuDevice, LayerTexture, QuadVertex};
use emberfall_params::FADE_RGB;

/// Stacks premultiplied layers over the page background
pub struct Renderer {
    composite: CompositePipeline,
    vertex_buffer: wgpu::Buffer,
    particles: LayerTexture,
    particle_bind_group: wgpu::BindGroup,
}

impl Renderer {
    pub fn new(gpu: &GpuDevice, format: wgpu::TextureFormat, backing: [u32; 2]) -> Result<Self> {
        let composite = CompositePipeline::new(&gpu.device, format);
        let vertex_buffer =
            gpu.create_buffer_with_data("quad_vertex_buffer", wgpu::BufferUsages::VERTEX, &QuadVertex::QUAD);
        let particles = LayerTexture::upload_target(&gpu.device, "particle_layer", backing);
        let particle_bind_group = composite.bind_group(&gpu.device, &particles.view);

        Ok(Self {
            composite,
            vertex_buffer,
            particles,
            particle_bind_group,
        })
    }

    /// Copy the CPU particle raster into its texture, reallocating on size change
    pub fn upload_particles(&mut self, gpu: &GpuDevice, size: [u32; 2], rgba: &[u8]) {
        let size = [size[0].max(1), size[1].max(1)];
        if size != self.particles.size {
            self.particles = LayerTexture::upload_target(&gpu.device, "particle_layer", size);
            self.particle_bind_group = self.composite.bind_group(&gpu.device, &self.particles.view);
        }
        self.particles.write_rgba8(&gpu.queue, rgba);
    }

    /// Draw the page background, the particle layer, then the overlay if any
    pub fn render(
        &self,
        gpu: &GpuDevice,
        encoder: &mut CommandEncoder,
        view: &TextureView,
        overlay: Option<&TextureView>,
    ) -> Result<()> {
        let overlay_bind_group = overlay.map(|v| self.composite.bind_group(&gpu.device, v));

        let [r, g, b] = FADE_RGB.map(|c| c as f64 / 255.0);
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("present_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.composite.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

        render_pass.set_bind_group(0, &self.particle_bind_group, &[]);
        render_pass.draw(0..QuadVertex::QUAD.len() as u32, 0..1);

        if let Some(bind_group) = overlay_bind_group.as_ref() {
            render_pass.set_bind_group(0, bind_group, &[]);
            render_pass.draw(0..QuadVertex::QUAD.len() as u32, 0..1);
        }

        Ok(())
    }
}
