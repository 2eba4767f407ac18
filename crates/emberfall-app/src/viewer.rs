//! Interactive window host for the emberfall background

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wgpu::{Instance, Surface, SurfaceConfiguration};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use emberfall_core::gpu::{GpuDevice, GpuHandFx};
use emberfall_core::{Background, HandFxLayer, PixmapSurface, SpriteLoad};

use crate::renderer::Renderer;

/// Startup options collected from the command line
pub struct ViewerConfig {
    pub size: [f64; 2],
    pub sprite: PathBuf,
    pub seed: Option<u64>,
}

/// Swapchain plus the device it presents from
pub struct GpuContext {
    pub gpu: Arc<GpuDevice>,
    pub surface: Surface<'static>,
    pub config: SurfaceConfiguration,
}

/// Main viewer state
pub struct Viewer {
    window: Arc<Window>,
    background: Background<PixmapSurface, GpuHandFx>,
    renderer: Renderer,
    started: Instant,
    frame_count: u64,
}

impl Viewer {
    pub fn new(window: Arc<Window>, gpu: &GpuContext, config: &ViewerConfig) -> Result<Self> {
        let sprite = SpriteLoad::spawn(config.sprite.clone());
        let fx = HandFxLayer::create(GpuHandFx::new(gpu.gpu.clone()), sprite);

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let background = Background::attach(Some(PixmapSurface::new()), fx, rng)
            .context("particle surface unavailable")?;

        let renderer = Renderer::new(&gpu.gpu, gpu.config.format, [gpu.config.width, gpu.config.height])?;

        let mut viewer = Self {
            window,
            background,
            renderer,
            started: Instant::now(),
            frame_count: 0,
        };
        viewer.apply_window_metrics();
        viewer.background.start();

        Ok(viewer)
    }

    /// Forward the window's logical size and scale factor to the background
    fn apply_window_metrics(&mut self) {
        let scale_factor = self.window.scale_factor();
        let logical: LogicalSize<f64> = self.window.inner_size().to_logical(scale_factor);
        self.background
            .resize(logical.width as f32, logical.height as f32, scale_factor as f32);
    }

    /// Handle window resize or a move to a display with another pixel ratio
    pub fn resize(&mut self, gpu: &mut GpuContext, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            gpu.config.width = new_size.width;
            gpu.config.height = new_size.height;
            gpu.surface.configure(&gpu.gpu.device, &gpu.config);
        }
        self.apply_window_metrics();
    }

    /// Run one background frame and present it
    pub fn render(&mut self, gpu: &mut GpuContext) -> Result<()> {
        let timestamp_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let Some(report) = self.background.tick(timestamp_ms) else {
            return Ok(());
        };

        let surface = self.background.surface();
        self.renderer
            .upload_particles(&gpu.gpu, surface.size(), surface.data());

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.gpu.device, &gpu.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("present_encoder"),
            });

        let overlay = self
            .background
            .fx()
            .filter(|_| report.fx_rendered)
            .map(|fx| fx.backend().overlay_view());
        self.renderer.render(&gpu.gpu, &mut encoder, &view, overlay)?;

        gpu.gpu.submit(encoder.finish());
        output.present();

        self.frame_count += 1;
        if self.frame_count % 600 == 0 {
            log::debug!(
                "Frame {}: {} diamonds, {} embers, overlay {}",
                self.frame_count,
                report.diamonds,
                report.embers,
                if report.fx_active { "active" } else { "inactive" }
            );
        }

        Ok(())
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

/// Run the interactive viewer
pub async fn run_viewer(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;

    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Emberfall")
            .with_inner_size(LogicalSize::new(config.size[0], config.size[1]))
            .build(&event_loop)?,
    );

    let instance = Instance::default();
    let surface = instance.create_surface(window.clone())?;
    let gpu = Arc::new(GpuDevice::new(instance, Some(&surface)).await?);
    log::info!("{}", gpu.info());

    let surface_caps = surface.get_capabilities(&gpu.adapter);
    // Particle colours are already sRGB-encoded, like a canvas
    let surface_format = surface_caps
        .formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| surface_caps.formats.first().copied())
        .context("surface reports no formats")?;

    let size = window.inner_size();
    let surface_config = SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&gpu.device, &surface_config);

    let mut gpu = GpuContext {
        gpu,
        surface,
        config: surface_config,
    };

    let mut viewer = Viewer::new(window.clone(), &gpu, &config)?;
    window.request_redraw();

    event_loop.run(move |event, elwt| {
        if let Event::WindowEvent { event, window_id } = event {
            if window_id != viewer.window().id() {
                return;
            }
            match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: winit::keyboard::Key::Named(winit::keyboard::NamedKey::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => {
                    log::info!("Closing viewer");
                    viewer.background.stop();
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    viewer.resize(&mut gpu, physical_size);
                    viewer.window().request_redraw();
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let physical_size = viewer.window().inner_size();
                    viewer.resize(&mut gpu, physical_size);
                }
                WindowEvent::RedrawRequested => {
                    if let Err(e) = viewer.render(&mut gpu) {
                        log::error!("Render error: {}", e);
                    }
                    viewer.window().request_redraw();
                }
                _ => {}
            }
        }
    })?;

    Ok(())
}
