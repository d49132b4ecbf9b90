use thiserror::Error;
use wgpu::{Adapter, Device, Instance, Queue, Surface};

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no compatible wgpu adapter")]
    NoAdapter,
    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to map readback buffer: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),
    #[error("readback callback was dropped before completing")]
    ReadbackLost,
    #[error("cannot read back a {0:?} render target")]
    UnsupportedFormat(wgpu::TextureFormat),
    #[error("adapter cannot render to any readback format")]
    NoReadbackFormat,
}

pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Create a context with no surface. Used for offscreen rendering and
    /// testing. The viewer passes its window surface to [`GpuContext::request`].
    pub async fn new_headless() -> Result<Self, GpuError> {
        Self::request(Instance::default(), None).await
    }

    /// Pick an adapter (compatible with `surface`, if given) and open a device.
    pub async fn request(
        instance: Instance,
        surface: Option<&Surface<'_>>,
    ) -> Result<Self, GpuError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        log::info!("GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("density-gpu device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}
