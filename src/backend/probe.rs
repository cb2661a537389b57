// Capability probing - read-only queries against the Vulkan loader
//
// Everything here is a pure question: which extensions/layers exist,
// which queue families a device exposes, whether a set of requirements
// is satisfied. No native resources are created.

use ash::vk;
use std::collections::HashSet;
use std::ffi::{CStr, CString};

use super::error::{BackendError, SetupError};

/// Queue family indices discovered on a physical device.
///
/// `graphics_family` is a real `Option`: "unset" must be distinguishable
/// from index 0, so no sentinel values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics_family: Option<u32>,
}

impl QueueFamilyIndices {
    /// Scan a device's queue families for one that can do graphics work.
    ///
    /// A family qualifies if it has at least one queue and its flags carry
    /// both GRAPHICS and TRANSFER. The index is reassigned on every match,
    /// so with several qualifying families the last one wins. Enumeration
    /// order is preserved: index equals position in the input slice.
    pub fn scan(families: &[vk::QueueFamilyProperties]) -> Self {
        let mut indices = Self::default();

        for (i, family) in families.iter().enumerate() {
            if family.queue_count > 0
                && family
                    .queue_flags
                    .contains(vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER)
            {
                indices.graphics_family = Some(i as u32);
            }
        }

        indices
    }

    /// True once every required family has been found.
    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some()
    }
}

/// All instance extensions the host platform exposes.
pub fn instance_extension_names(entry: &ash::Entry) -> Result<HashSet<CString>, SetupError> {
    let properties = unsafe { entry.enumerate_instance_extension_properties(None) }
        .map_err(BackendError::ExtensionEnumeration)?;

    Ok(properties
        .iter()
        .filter_map(|p| p.extension_name_as_c_str().ok().map(CStr::to_owned))
        .collect())
}

/// All instance layers the host platform exposes.
pub fn instance_layer_names(entry: &ash::Entry) -> Result<HashSet<CString>, SetupError> {
    let properties = unsafe { entry.enumerate_instance_layer_properties() }
        .map_err(BackendError::LayerEnumeration)?;

    Ok(properties
        .iter()
        .filter_map(|p| p.layer_name_as_c_str().ok().map(CStr::to_owned))
        .collect())
}

/// Names from `required` that are absent from `available`.
///
/// Case-sensitive exact matches; an empty `required` set is trivially
/// satisfied. The caller treats any non-empty result as fatal, so there
/// is no partial credit to report.
pub fn missing_names<'a>(
    required: impl IntoIterator<Item = &'a CStr>,
    available: &HashSet<CString>,
) -> Vec<String> {
    required
        .into_iter()
        .filter(|name| !available.contains(*name))
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}
