// Vulkan backend - Core GPU negotiation
//
// Responsibilities:
// - Instance creation with validation layers and platform extensions
// - Debug messenger creation
// - Surface creation (through the windowing collaborator, ash-window)
// - Logical device + queue creation
//
// All capability checks run before the corresponding native resource is
// created, so a misconfigured host fails without allocating anything.

use ash::vk;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};
use std::ffi::{c_char, CStr, CString};

use super::debug;
use super::error::{BackendError, ConfigError, SetupError};
use super::lifecycle::{GpuBackend, GpuContext};
use super::probe::{self, QueueFamilyIndices};
use crate::config::ValidationConfig;

/// Debug messenger plus the loader that knows how to destroy it.
/// Owned by the lifecycle coordinator; destroyed before the instance.
pub struct DebugMessenger {
    loader: ash::ext::debug_utils::Instance,
    handle: vk::DebugUtilsMessengerEXT,
}

/// Window surface plus its loader. Owned by the lifecycle coordinator;
/// destroyed after the device, before the messenger and instance.
pub struct SurfaceHandle {
    loader: ash::khr::surface::Instance,
    handle: vk::SurfaceKHR,
}

impl SurfaceHandle {
    pub fn raw(&self) -> vk::SurfaceKHR {
        self.handle
    }
}

/// Production Vulkan backend. Holds the loaded entry point, the raw
/// window/display handles and the immutable validation configuration;
/// every native create/destroy call the coordinator makes goes through
/// here.
pub struct AshBackend {
    entry: ash::Entry,
    app_name: CString,
    validation: ValidationConfig,
    display: RawDisplayHandle,
    window: RawWindowHandle,
}

impl AshBackend {
    pub fn new(
        window: &(impl HasDisplayHandle + HasWindowHandle),
        app_name: &str,
        validation: ValidationConfig,
    ) -> Result<Self, SetupError> {
        let entry = unsafe { ash::Entry::load() }
            .map_err(|e| BackendError::LibraryLoad(e.to_string()))?;
        let display = window
            .display_handle()
            .map_err(|e| BackendError::WindowHandle(e.to_string()))?
            .as_raw();
        let window = window
            .window_handle()
            .map_err(|e| BackendError::WindowHandle(e.to_string()))?
            .as_raw();

        Ok(Self {
            entry,
            app_name: CString::new(app_name).unwrap_or_default(),
            validation,
            display,
            window,
        })
    }

    fn layer_ptrs(&self) -> Vec<*const c_char> {
        if self.validation.diagnostics_enabled {
            self.validation
                .required_layers
                .iter()
                .map(|layer| layer.as_ptr())
                .collect()
        } else {
            Vec::new()
        }
    }
}

impl GpuBackend for AshBackend {
    type Instance = ash::Instance;
    type Messenger = DebugMessenger;
    type Surface = SurfaceHandle;
    type Gpu = vk::PhysicalDevice;
    type Device = ash::Device;
    type Queue = vk::Queue;

    fn diagnostics_enabled(&self) -> bool {
        self.validation.diagnostics_enabled
    }

    fn create_instance(&mut self) -> Result<ash::Instance, SetupError> {
        // Layer availability is verified before any native resource exists.
        if self.validation.diagnostics_enabled {
            let available = probe::instance_layer_names(&self.entry)?;
            let missing = probe::missing_names(
                self.validation.required_layers.iter().map(CString::as_c_str),
                &available,
            );
            if !missing.is_empty() {
                return Err(ConfigError::MissingValidationLayers { missing }.into());
            }
        }

        // Platform extensions come from the windowing collaborator; the
        // debug-utils extension joins them when diagnostics is on.
        let mut extensions: Vec<*const c_char> =
            ash_window::enumerate_required_extensions(self.display)
                .map_err(BackendError::RequiredExtensionQuery)?
                .to_vec();
        if self.validation.diagnostics_enabled {
            extensions.push(ash::ext::debug_utils::NAME.as_ptr());
        }

        let available = probe::instance_extension_names(&self.entry)?;
        let required = extensions.iter().map(|&ptr| unsafe { CStr::from_ptr(ptr) });
        let missing = probe::missing_names(required, &available);
        if !missing.is_empty() {
            return Err(ConfigError::MissingExtensions { missing }.into());
        }

        let app_info = vk::ApplicationInfo::default()
            .application_name(&self.app_name)
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(c"vulkan-bootstrap")
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_1);

        let layers = self.layer_ptrs();
        let mut messenger_info = debug::messenger_create_info();
        let mut create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&extensions)
            .enabled_layer_names(&layers);
        if self.validation.diagnostics_enabled {
            // Chained into instance creation so validation messages emitted
            // while the instance itself is being created are still captured.
            create_info = create_info.push_next(&mut messenger_info);
        }

        let instance = unsafe { self.entry.create_instance(&create_info, None) }
            .map_err(BackendError::InstanceCreation)?;
        log::info!(
            "Vulkan instance created ({} extensions, {} layers)",
            extensions.len(),
            layers.len()
        );
        Ok(instance)
    }

    fn create_messenger(
        &mut self,
        instance: &ash::Instance,
    ) -> Result<DebugMessenger, SetupError> {
        let loader = ash::ext::debug_utils::Instance::new(&self.entry, instance);
        let info = debug::messenger_create_info();
        let handle = unsafe { loader.create_debug_utils_messenger(&info, None) }
            .map_err(BackendError::DebugMessengerCreation)?;
        log::debug!("Debug messenger active");
        Ok(DebugMessenger { loader, handle })
    }

    fn create_surface(&mut self, instance: &ash::Instance) -> Result<SurfaceHandle, SetupError> {
        let handle = unsafe {
            ash_window::create_surface(&self.entry, instance, self.display, self.window, None)
        }
        .map_err(BackendError::SurfaceCreation)?;
        let loader = ash::khr::surface::Instance::new(&self.entry, instance);
        Ok(SurfaceHandle { loader, handle })
    }

    fn enumerate_gpus(
        &mut self,
        instance: &ash::Instance,
    ) -> Result<Vec<vk::PhysicalDevice>, SetupError> {
        let devices = unsafe { instance.enumerate_physical_devices() }
            .map_err(BackendError::DeviceEnumeration)?;
        log::debug!("{} physical device(s) enumerated", devices.len());
        Ok(devices)
    }

    fn queue_families(
        &mut self,
        instance: &ash::Instance,
        gpu: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        unsafe { instance.get_physical_device_queue_family_properties(gpu) }
    }

    fn create_device(
        &mut self,
        instance: &ash::Instance,
        gpu: vk::PhysicalDevice,
        indices: QueueFamilyIndices,
    ) -> Result<(ash::Device, vk::Queue), SetupError> {
        let family = indices.graphics_family.ok_or(ConfigError::NoSuitableDevice)?;

        let properties = unsafe { instance.get_physical_device_properties(gpu) };
        let device_name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) };
        log::info!(
            "Selected GPU: {} (graphics queue family {})",
            device_name.to_string_lossy(),
            family
        );

        let priorities = [1.0];
        let queue_infos = [vk::DeviceQueueCreateInfo::default()
            .queue_family_index(family)
            .queue_priorities(&priorities)];

        // No device extensions or extra features are requested yet.
        let features = vk::PhysicalDeviceFeatures::default();
        let layers = self.layer_ptrs();
        // Device layers are ignored by current drivers but still set to
        // stay compatible with older implementations.
        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_infos)
            .enabled_layer_names(&layers)
            .enabled_features(&features);

        let device = unsafe { instance.create_device(gpu, &create_info, None) }
            .map_err(BackendError::DeviceCreation)?;
        let queue = unsafe { device.get_device_queue(family, 0) };
        Ok((device, queue))
    }

    fn destroy_device(&mut self, device: ash::Device) {
        unsafe { device.destroy_device(None) };
    }

    fn destroy_surface(&mut self, surface: SurfaceHandle) {
        unsafe { surface.loader.destroy_surface(surface.handle, None) };
    }

    fn destroy_messenger(&mut self, messenger: DebugMessenger) {
        unsafe {
            messenger
                .loader
                .destroy_debug_utils_messenger(messenger.handle, None)
        };
    }

    fn destroy_instance(&mut self, instance: ash::Instance) {
        unsafe { instance.destroy_instance(None) };
        log::info!("Vulkan instance destroyed");
    }
}

/// Ready-to-use context over the production backend.
pub type VulkanContext = GpuContext<AshBackend>;

impl GpuContext<AshBackend> {
    /// Bootstrap a full Vulkan context for the given window.
    pub fn create(
        window: &(impl HasDisplayHandle + HasWindowHandle),
        app_name: &str,
        validation: ValidationConfig,
    ) -> Result<Self, SetupError> {
        let backend = AshBackend::new(window, app_name, validation)?;
        GpuContext::init(backend)
    }
}
