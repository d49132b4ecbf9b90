use std::sync::Arc;

use density_core::field::AddressMode;
use density_core::fluid::Fluid;
use density_core::DisplayMode;
use density_gpu::density_texture::create_density_sampler;
use density_gpu::{DensityTexture, DisplayPass, DisplayResources, GpuContext, GpuError};
use winit::window::Window;

use crate::config::Config;
use crate::input::{window_to_normalized, Brush, InputAction, Pointer};
use crate::timer::{FpsCounter, FrameTimer};

/// Longest simulation step taken in one frame, in seconds. Keeps the solver
/// stable after a stall (window drag, breakpoint).
const MAX_STEP: f32 = 0.1;

pub fn window_title(mode: DisplayMode) -> String {
    format!("Density Viewer [{mode}]")
}

// ---------------------------------------------------------------------------
// App — surface, simulation and display pass for one window
// ---------------------------------------------------------------------------

pub struct App {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    gpu: GpuContext,
    surface_config: wgpu::SurfaceConfiguration,

    // Display pass and the resources bound into it
    density_texture: DensityTexture,
    density_sampler: wgpu::Sampler,
    display_resources: Arc<DisplayResources>,
    display: DisplayPass,
    /// Reused staging for the per-frame density upload.
    densities: Vec<f32>,

    // Simulation and input
    fluid: Fluid,
    brush: Brush,
    pointer: Pointer,
    cursor_timer: FrameTimer,

    // Frame timing
    frame_timer: FrameTimer,
    fps: FpsCounter,
}

impl App {
    /// Initialise wgpu for a given window.  The window is wrapped in `Arc` so
    /// that the surface can safely hold a `'static` reference to it.
    pub fn new(window: Arc<Window>, config: &Config) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        // ---- Instance, surface, adapter, device -----------------------------
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(Arc::clone(&window))?;
        let gpu = pollster::block_on(GpuContext::request(instance, Some(&surface)))?;

        // ---- Surface configuration ------------------------------------------
        // Prefer a non-sRGB format: the display pass applies its own tone
        // curve and the swapchain must not add a second one.
        let surface_caps = surface.get_capabilities(&gpu.adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &surface_config);
        log::info!(
            "Surface configured: {}×{} {:?} Fifo",
            surface_config.width,
            surface_config.height,
            format
        );

        // ---- Density texture + display pass ---------------------------------
        let resolution = config.resolution;
        let density_texture = DensityTexture::new(&gpu.device, resolution, resolution);
        let density_sampler = create_density_sampler(&gpu.device, AddressMode::ClampToEdge);
        let display_resources = DisplayResources::new(&gpu.device);
        let display = DisplayPass::new(
            &gpu.device,
            &display_resources,
            format,
            config.display_mode,
            &density_texture.view,
            &density_sampler,
        );
        log::info!(
            "Display mode: {}, grid {resolution}×{resolution}",
            config.display_mode
        );

        let fluid = Fluid::new(config.diffusion, config.viscosity, resolution as usize);

        Ok(Self {
            window,
            surface,
            gpu,
            surface_config,
            density_texture,
            density_sampler,
            display_resources,
            display,
            densities: Vec::with_capacity((resolution * resolution) as usize),
            fluid,
            brush: Brush {
                radius: config.brush_radius,
                density: config.brush_density,
            },
            pointer: Pointer::default(),
            cursor_timer: FrameTimer::default(),
            frame_timer: FrameTimer::default(),
            fps: FpsCounter::default(),
        })
    }

    // -------------------------------------------------------------------------
    // Resize
    // -------------------------------------------------------------------------

    /// Reconfigure the surface. The density texture is independent of the
    /// window size, so the display pass survives a resize.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        self.surface_config.width = new_width;
        self.surface_config.height = new_height;
        self.surface.configure(&self.gpu.device, &self.surface_config);
        log::debug!("Surface resized to {}×{}", new_width, new_height);
    }

    // -------------------------------------------------------------------------
    // Input — called by main.rs window_event handler
    // -------------------------------------------------------------------------

    /// Track the cursor in physical pixels.
    pub fn on_cursor_moved(&mut self, x: f32, y: f32) {
        let position = window_to_normalized(
            x,
            y,
            self.surface_config.width as f32,
            self.surface_config.height as f32,
        );
        let dt = self.cursor_timer.tick();
        self.pointer.move_to(position, dt);
    }

    pub fn set_pointer_pressed(&mut self, pressed: bool) {
        self.pointer.pressed = pressed;
    }

    /// Apply an action to the app state.
    ///
    /// Returns `true` if the app should exit (i.e. action was `Quit`).
    pub fn handle_action(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleDisplayMode => {
                let mode = self.display.mode().toggled();
                self.display = DisplayPass::new(
                    &self.gpu.device,
                    &self.display_resources,
                    self.surface_config.format,
                    mode,
                    &self.density_texture.view,
                    &self.density_sampler,
                );
                self.window.set_title(&window_title(mode));
                log::info!("Display mode → {mode}");
            }

            InputAction::ClearField => {
                self.fluid.clear();
                log::info!("Density field cleared");
            }

            InputAction::Quit => return true,
        }
        false
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    /// Run one full frame: paint, step the fluid, upload densities, draw.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // --- Timing ----------------------------------------------------------
        let dt = self.frame_timer.tick().min(MAX_STEP);
        if let Some(fps) = self.fps.tick() {
            log::debug!(
                "FPS: {}  mode: {}  total density: {:.3}",
                fps,
                self.display.mode(),
                self.fluid.total_density(),
            );
        }

        // --- Simulation ------------------------------------------------------
        if self.pointer.pressed {
            self.brush
                .paint(&mut self.fluid, self.pointer.position, self.pointer.velocity, dt);
        }
        self.fluid.step(dt);

        // --- Upload ----------------------------------------------------------
        self.densities.clear();
        self.densities.extend(self.fluid.densities());
        self.density_texture.upload(&self.gpu.queue, &self.densities);

        // --- Draw ------------------------------------------------------------
        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        self.display.record(&mut encoder, &surface_view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_names_the_mode() {
        assert_eq!(window_title(DisplayMode::Linear), "Density Viewer [linear]");
        assert_eq!(window_title(DisplayMode::Gamma), "Density Viewer [gamma]");
    }
}
