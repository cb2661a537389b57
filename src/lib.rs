// Vulkan bootstrap - device-and-capability negotiation
//
// Selects a capable physical device, negotiates required platform and
// debug extensions, and creates a logical device plus graphics queue for
// later rendering work. The render loop itself lives elsewhere; this
// crate's job ends once the device and queue exist.

pub mod backend;
pub mod config;
