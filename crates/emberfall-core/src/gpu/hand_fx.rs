use std::sync::Arc;

use bytemuck::Zeroable;
use emberfall_params::{bindings, HandFxUniforms};

use crate::error::{FxError, FxResult};
use crate::fx::{FxBackend, SpriteImage};
use crate::gpu::{GpuDevice, HandFxPipeline, LayerTexture, QuadVertex, LAYER_FORMAT};

/// GPU backend for the hand overlay
///
/// Renders into its own transparent texture, sized to the backing store,
/// which the host composites over the particle layer.
pub struct GpuHandFx {
    gpu: Arc<GpuDevice>,
    pipeline: HandFxPipeline,
    quad: wgpu::Buffer,
    uniforms: wgpu::Buffer,
    overlay: LayerTexture,
    sprite: Option<LayerTexture>,
    bind_group: Option<wgpu::BindGroup>,
}

impl GpuHandFx {
    /// Compile the warp program; a rejected shader disables the overlay
    pub fn new(gpu: Arc<GpuDevice>) -> FxResult<Self> {
        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = HandFxPipeline::new(&gpu.device, LAYER_FORMAT);
        if let Some(err) = pollster::block_on(gpu.device.pop_error_scope()) {
            return Err(FxError::Program(err.to_string()));
        }
        bindings::log_binding_layouts();

        let quad = gpu.create_buffer_with_data(
            "hand_fx_quad",
            wgpu::BufferUsages::VERTEX,
            &QuadVertex::QUAD,
        );
        let uniforms = gpu.create_buffer_with_data(
            "hand_fx_uniforms",
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            &[HandFxUniforms::zeroed()],
        );
        let overlay = LayerTexture::render_target(&gpu.device, "hand_fx_overlay", [1, 1]);

        log::info!("Hand overlay program ready on {}", gpu.info());

        Ok(Self {
            gpu,
            pipeline,
            quad,
            uniforms,
            overlay,
            sprite: None,
            bind_group: None,
        })
    }

    /// View of the overlay as last rendered, premultiplied
    pub fn overlay_view(&self) -> &wgpu::TextureView {
        &self.overlay.view
    }

    fn pass(&self, load: wgpu::LoadOp<wgpu::Color>, draw: bool) {
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("hand_fx_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("hand_fx_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.overlay.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let (true, Some(bind_group)) = (draw, self.bind_group.as_ref()) {
                render_pass.set_pipeline(&self.pipeline.pipeline);
                render_pass.set_bind_group(0, bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.quad.slice(..));
                render_pass.draw(0..QuadVertex::QUAD.len() as u32, 0..1);
            }
        }

        self.gpu.submit(encoder.finish());
    }
}

impl FxBackend for GpuHandFx {
    fn resize(&mut self, backing: [u32; 2]) {
        self.overlay = LayerTexture::render_target(&self.gpu.device, "hand_fx_overlay", backing);
    }

    fn upload_sprite(&mut self, sprite: &SpriteImage) -> FxResult<()> {
        if sprite.width == 0 || sprite.height == 0 {
            return Err(FxError::Context("sprite has no pixels".into()));
        }

        let limit = self.gpu.device.limits().max_texture_dimension_2d;
        if sprite.width > limit || sprite.height > limit {
            return Err(FxError::Context(format!(
                "sprite {}x{} exceeds texture limit {}",
                sprite.width, sprite.height, limit
            )));
        }

        let texture =
            LayerTexture::upload_target(&self.gpu.device, "hand_sprite", [sprite.width, sprite.height]);
        texture.write_rgba8(&self.gpu.queue, &sprite.rgba);

        let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hand_fx_bind_group"),
            layout: &self.pipeline.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.pipeline.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniforms.as_entire_binding(),
                },
            ],
        });

        self.sprite = Some(texture);
        self.bind_group = Some(bind_group);
        Ok(())
    }

    fn clear(&mut self) {
        self.pass(wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT), false);
    }

    fn draw(&mut self, uniforms: &HandFxUniforms) {
        if self.sprite.is_none() {
            return;
        }
        self.gpu
            .queue
            .write_buffer(&self.uniforms, 0, bytemuck::bytes_of(uniforms));
        self.pass(wgpu::LoadOp::Load, true);
    }
}
