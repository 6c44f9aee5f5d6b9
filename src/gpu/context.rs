//! GPU context initialization and management.

use std::sync::Arc;
use wgpu::{Adapter, Device, Instance, Queue};

/// Errors that can occur while acquiring a GPU device.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("GPU unavailable: no suitable adapter found")]
    DeviceUnavailable,
    #[error("Failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
}

/// Adapter selection for [`GpuContext::with_options`].
#[derive(Debug, Clone, Copy)]
pub struct ContextOptions {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
        }
    }
}

/// GPU context holding device and queue for headless compute.
pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Arc<Adapter>,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a new GPU context on any available backend.
    pub async fn new() -> Result<Self, GpuError> {
        Self::with_options(ContextOptions::default()).await
    }

    /// Create a GPU context restricted to the given backends.
    ///
    /// Fails with [`GpuError::DeviceUnavailable`] when no adapter matches;
    /// there is no retry and no software fallback.
    pub async fn with_options(options: ContextOptions) -> Result<Self, GpuError> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: options.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: options.power_preference,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .map_err(|_| GpuError::DeviceUnavailable)?;

        let info = adapter.get_info();
        log::info!("Using GPU adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("ripple-effect"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        Ok(Self {
            instance,
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// Get info about the GPU adapter.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gpu_context_creation() {
        let ctx = GpuContext::new().await;
        // May fail on CI without GPU, so just check it doesn't panic
        if let Ok(ctx) = ctx {
            let info = ctx.adapter_info();
            assert!(!info.name.is_empty());
        }
    }

    #[tokio::test]
    async fn test_no_backends_is_unavailable() {
        let options = ContextOptions {
            backends: wgpu::Backends::empty(),
            ..Default::default()
        };
        let result = GpuContext::with_options(options).await;
        assert!(matches!(result, Err(GpuError::DeviceUnavailable)));
    }
}
