// Backend module - Vulkan setup layer
//
// Design: Thin wrapper around ash with explicit capability negotiation
// and strict create/destroy ordering

pub mod debug;
pub mod device;
pub mod error;
pub mod lifecycle;
pub mod probe;

pub use device::{AshBackend, VulkanContext};
pub use error::{BackendError, ConfigError, SetupError};
pub use lifecycle::{GpuBackend, GpuContext};
pub use probe::QueueFamilyIndices;
