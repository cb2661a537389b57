// Lifecycle coordination - creation order, teardown order, failure cleanup
//
// The setup sequence is strictly sequential:
//   instance -> [debug messenger] -> surface -> device selection -> device/queue
// and teardown is the exact reverse. `GpuContext` owns every handle it
// creates (single owner, no sharing) and fills its slots one step at a
// time, so an error mid-startup drops the partial context and releases
// whatever was already created.
//
// The backend operations sit behind a trait so tests can substitute an
// ownership-tracking double for the native Vulkan implementation.

use ash::vk;

use super::error::{BackendError, ConfigError, SetupError};
use super::probe::QueueFamilyIndices;

/// The native operations the setup sequence depends on, in creation order,
/// with their matching destroy operations.
///
/// Production uses `AshBackend`; tests use a recording double.
pub trait GpuBackend {
    type Instance;
    type Messenger;
    type Surface;
    type Gpu: Copy;
    type Device;
    type Queue;

    /// Whether the diagnostics messenger should be created at all.
    fn diagnostics_enabled(&self) -> bool;

    fn create_instance(&mut self) -> Result<Self::Instance, SetupError>;
    fn create_messenger(&mut self, instance: &Self::Instance)
        -> Result<Self::Messenger, SetupError>;
    fn create_surface(&mut self, instance: &Self::Instance) -> Result<Self::Surface, SetupError>;
    fn enumerate_gpus(&mut self, instance: &Self::Instance)
        -> Result<Vec<Self::Gpu>, SetupError>;
    fn queue_families(
        &mut self,
        instance: &Self::Instance,
        gpu: Self::Gpu,
    ) -> Vec<vk::QueueFamilyProperties>;
    fn create_device(
        &mut self,
        instance: &Self::Instance,
        gpu: Self::Gpu,
        indices: QueueFamilyIndices,
    ) -> Result<(Self::Device, Self::Queue), SetupError>;

    fn destroy_device(&mut self, device: Self::Device);
    fn destroy_surface(&mut self, surface: Self::Surface);
    fn destroy_messenger(&mut self, messenger: Self::Messenger);
    fn destroy_instance(&mut self, instance: Self::Instance);
}

/// Fully negotiated GPU context: instance, optional messenger, surface,
/// selected physical device, logical device and its graphics queue.
///
/// Slot order mirrors creation order; `Drop` walks it backwards.
pub struct GpuContext<B: GpuBackend> {
    backend: B,
    instance: Option<B::Instance>,
    messenger: Option<B::Messenger>,
    surface: Option<B::Surface>,
    gpu: Option<B::Gpu>,
    queue_families: QueueFamilyIndices,
    device: Option<B::Device>,
    queue: Option<B::Queue>,
}

impl<B: GpuBackend> std::fmt::Debug for GpuContext<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext").finish_non_exhaustive()
    }
}

impl<B: GpuBackend> GpuContext<B> {
    /// Run the whole setup sequence.
    ///
    /// Every step is blocking and must succeed before the next dependent
    /// step starts. On error the partially-built context is dropped, which
    /// releases already-created handles in reverse order.
    pub fn init(backend: B) -> Result<Self, SetupError> {
        let mut ctx = Self {
            backend,
            instance: None,
            messenger: None,
            surface: None,
            gpu: None,
            queue_families: QueueFamilyIndices::default(),
            device: None,
            queue: None,
        };

        let instance = ctx.backend.create_instance()?;
        let instance = ctx.instance.insert(instance);

        if ctx.backend.diagnostics_enabled() {
            ctx.messenger = Some(ctx.backend.create_messenger(instance)?);
        }

        ctx.surface = Some(ctx.backend.create_surface(instance)?);

        let gpus = ctx.backend.enumerate_gpus(instance)?;
        if gpus.is_empty() {
            return Err(BackendError::NoVulkanCapableDevice.into());
        }

        // First qualifying device wins; later candidates are not probed.
        let mut selected = None;
        for gpu in gpus {
            let families = ctx.backend.queue_families(instance, gpu);
            let indices = QueueFamilyIndices::scan(&families);
            if indices.is_complete() {
                selected = Some((gpu, indices));
                break;
            }
        }
        let (gpu, indices) = selected.ok_or(ConfigError::NoSuitableDevice)?;
        ctx.gpu = Some(gpu);
        ctx.queue_families = indices;

        let (device, queue) = ctx.backend.create_device(instance, gpu, indices)?;
        ctx.device = Some(device);
        ctx.queue = Some(queue);

        Ok(ctx)
    }

    pub fn device(&self) -> Option<&B::Device> {
        self.device.as_ref()
    }

    pub fn graphics_queue(&self) -> Option<&B::Queue> {
        self.queue.as_ref()
    }

    pub fn physical_device(&self) -> Option<B::Gpu> {
        self.gpu
    }

    pub fn queue_families(&self) -> QueueFamilyIndices {
        self.queue_families
    }

    pub fn diagnostics_active(&self) -> bool {
        self.messenger.is_some()
    }
}

impl<B: GpuBackend> Drop for GpuContext<B> {
    fn drop(&mut self) {
        // Exact reverse of creation. The queue is never independently
        // destroyed; it dies with its device.
        self.queue = None;
        if let Some(device) = self.device.take() {
            self.backend.destroy_device(device);
        }
        if let Some(surface) = self.surface.take() {
            self.backend.destroy_surface(surface);
        }
        if let Some(messenger) = self.messenger.take() {
            self.backend.destroy_messenger(messenger);
        }
        if let Some(instance) = self.instance.take() {
            self.backend.destroy_instance(instance);
        }
    }
}
