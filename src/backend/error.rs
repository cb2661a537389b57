// Setup error taxonomy
//
// Two classes of fatal startup failure:
// - ConfigError: the host is missing a capability we were asked to use
// - BackendError: a Vulkan call returned a non-success result
//
// Neither class is retried. Errors propagate unchanged to main(), which
// reports them and exits non-zero.

use ash::vk;
use thiserror::Error;

/// A requested capability (layer, extension, device) is unavailable on
/// this host. The message names the missing capability class.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("validation layers requested but not available: {missing:?}")]
    MissingValidationLayers { missing: Vec<String> },

    #[error("required instance extensions not available: {missing:?}")]
    MissingExtensions { missing: Vec<String> },

    #[error("no physical device with a graphics-capable queue family")]
    NoSuitableDevice,
}

/// A native Vulkan call failed during setup. The message names the
/// failing operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("loading the Vulkan library failed: {0}")]
    LibraryLoad(String),

    #[error("querying the native window handle failed: {0}")]
    WindowHandle(String),

    #[error("vkCreateInstance failed: {0}")]
    InstanceCreation(vk::Result),

    #[error("querying window-required instance extensions failed: {0}")]
    RequiredExtensionQuery(vk::Result),

    #[error("vkEnumerateInstanceExtensionProperties failed: {0}")]
    ExtensionEnumeration(vk::Result),

    #[error("vkEnumerateInstanceLayerProperties failed: {0}")]
    LayerEnumeration(vk::Result),

    #[error("vkCreateDebugUtilsMessengerEXT failed: {0}")]
    DebugMessengerCreation(vk::Result),

    #[error("window surface creation failed: {0}")]
    SurfaceCreation(vk::Result),

    #[error("vkEnumeratePhysicalDevices failed: {0}")]
    DeviceEnumeration(vk::Result),

    #[error("no Vulkan-capable device found")]
    NoVulkanCapableDevice,

    #[error("vkCreateDevice failed: {0}")]
    DeviceCreation(vk::Result),
}

/// Umbrella error for the whole setup sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_messages_name_the_missing_capability() {
        let err = ConfigError::MissingValidationLayers {
            missing: vec!["VK_LAYER_KHRONOS_validation".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("validation layers"));
        assert!(text.contains("VK_LAYER_KHRONOS_validation"));

        let err = ConfigError::MissingExtensions {
            missing: vec!["VK_KHR_surface".to_string()],
        };
        assert!(err.to_string().contains("VK_KHR_surface"));
    }

    #[test]
    fn backend_messages_name_the_failing_operation() {
        let err = BackendError::InstanceCreation(vk::Result::ERROR_INITIALIZATION_FAILED);
        assert!(err.to_string().contains("vkCreateInstance"));

        let err = BackendError::DeviceCreation(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
        assert!(err.to_string().contains("vkCreateDevice"));
    }

    #[test]
    fn setup_error_wraps_both_classes() {
        let config: SetupError = ConfigError::NoSuitableDevice.into();
        assert!(matches!(config, SetupError::Config(_)));

        let backend: SetupError = BackendError::NoVulkanCapableDevice.into();
        assert!(matches!(backend, SetupError::Backend(_)));
    }
}
