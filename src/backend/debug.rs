// Diagnostics bridge - Vulkan debug-utils messenger plumbing
//
// The validation layer talks back to us through a C callback. We forward
// each message to the `log` facade and always tell Vulkan to continue the
// triggering call. The same create-info is chained into instance creation
// (so messages emitted while the instance itself is being created are
// captured) and used again for the persistent messenger.

use ash::vk;
use std::ffi::CStr;

/// Messenger configuration shared by instance creation and messenger
/// creation: warnings and errors, across general/validation/performance
/// messages. Info and verbose are deliberately filtered out.
pub fn messenger_create_info() -> vk::DebugUtilsMessengerCreateInfoEXT<'static> {
    vk::DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(vulkan_debug_callback))
}

/// Callback invoked by the validation layer.
///
/// Must not unwind across the FFI boundary; everything in here is
/// panic-free. Returns FALSE so the triggering call is never aborted.
pub unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _p_user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() {
        return vk::FALSE;
    }

    let data = *p_callback_data;
    let message = if data.p_message.is_null() {
        std::borrow::Cow::Borrowed("<no message>")
    } else {
        CStr::from_ptr(data.p_message).to_string_lossy()
    };

    let category = message_type_name(message_type);

    match message_severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => {
            log::error!("[vulkan:{}] {}", category, message);
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => {
            log::warn!("[vulkan:{}] {}", category, message);
        }
        _ => {
            log::debug!("[vulkan:{}] {}", category, message);
        }
    }

    vk::FALSE
}

fn message_type_name(message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    match message_type {
        vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION => "validation",
        vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE => "performance",
        vk::DebugUtilsMessageTypeFlagsEXT::GENERAL => "general",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_info_enables_warning_and_error() {
        let info = messenger_create_info();
        assert!(info
            .message_severity
            .contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING));
        assert!(info
            .message_severity
            .contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR));
        // Verbose and info stay filtered.
        assert!(!info
            .message_severity
            .contains(vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE));
        assert!(!info
            .message_severity
            .contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO));
    }

    #[test]
    fn create_info_enables_all_three_categories() {
        let info = messenger_create_info();
        assert!(info.message_type.contains(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
        ));
        assert!(info.pfn_user_callback.is_some());
    }

    #[test]
    fn callback_tolerates_null_data_and_never_aborts() {
        let result = unsafe {
            vulkan_debug_callback(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
                vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
                std::ptr::null(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::FALSE);
    }

    #[test]
    fn callback_forwards_message_without_aborting() {
        let message = c"pipeline barrier misuse";
        let data = vk::DebugUtilsMessengerCallbackDataEXT::default().message(message);
        let result = unsafe {
            vulkan_debug_callback(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
                vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
                &data,
                std::ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::FALSE);
    }
}
