use thiserror::Error;

/// Failures surfaced by the renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface ran out of memory")]
    OutOfMemory,

    #[error("surface error: {0}")]
    Surface(wgpu::SurfaceError),
}
