use crate::errors::SetupDiError;
use crate::{wide_string, win32_utils};
use windows::Win32::Foundation::{ERROR_INSUFFICIENT_BUFFER, ERROR_INVALID_DATA};
use windows_sys::core::GUID;
use windows_sys::Win32::Devices::DeviceAndDriverInstallation::SetupDiClassGuidsFromNameExW;

/// Retrieves the GUIDs of every installed device setup class matching `class_name`.
///
/// A `machine_name` of `None` queries the local machine; `Some` queries a remote one.
/// A class name with no installed class yields an empty list rather than an error.
pub fn class_guids_from_name(
    class_name: &str,
    machine_name: Option<&str>,
) -> Result<Vec<GUID>, SetupDiError> {
    let class_name_as_utf16_chars = wide_string::to_utf16_with_nul(class_name);
    //
    // NOTE: critically, the utf16 chars vector backing the machine name must remain in scope
    //       for the duration of both native calls (i.e. after we create a pointer to it);
    //       DO NOT move this variable into the "let machine_name_as_pcwstr = match" block
    let machine_name_as_utf16_chars: Vec<u16>;
    let machine_name_as_pcwstr = match machine_name {
        Some(value) => {
            machine_name_as_utf16_chars = wide_string::to_utf16_with_nul(value);
            machine_name_as_utf16_chars.as_ptr()
        }
        None => std::ptr::null(),
    };

    // get the number of guids associated with the class name; we expect a failure of
    // ERROR_INSUFFICIENT_BUFFER along with the required_size parameter holding the count
    // see: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdiclassguidsfromnameexw
    let mut required_size: u32 = 0;
    let class_guids_from_name_result = unsafe {
        SetupDiClassGuidsFromNameExW(
            class_name_as_utf16_chars.as_ptr(),
            std::ptr::null_mut(),
            0,
            &mut required_size,
            machine_name_as_pcwstr,
            std::ptr::null_mut(),
        )
    };
    if class_guids_from_name_result == 0 {
        let win32_error = win32_utils::get_last_error_as_win32_error();
        if win32_error != ERROR_INSUFFICIENT_BUFFER {
            return Err(SetupDiError::Win32Error(win32_error.0));
        }
    } else {
        // the sizing call only succeeds outright when no installed class matches the name
        if required_size > 0 {
            debug_assert!(false, "SetupDiClassGuidsFromNameExW returned success when we asked it for the required buffer size, yet reported a non-zero guid count");
            return Err(SetupDiError::Win32Error(ERROR_INVALID_DATA.0));
        }
        return Ok(Vec::new());
    }
    //
    if required_size == 0 {
        return Ok(Vec::new());
    }

    // retrieve the class guids into a buffer sized to the reported count
    let mut class_guids = Vec::<GUID>::with_capacity(required_size as usize);
    class_guids.resize(class_guids.capacity(), GUID::from_u128(0));
    //
    let class_guids_from_name_result = unsafe {
        SetupDiClassGuidsFromNameExW(
            class_name_as_utf16_chars.as_ptr(),
            class_guids.as_mut_ptr(),
            required_size,
            &mut required_size,
            machine_name_as_pcwstr,
            std::ptr::null_mut(),
        )
    };
    if class_guids_from_name_result == 0 {
        let win32_error = win32_utils::get_last_error_as_win32_error();
        return Err(SetupDiError::Win32Error(win32_error.0));
    }
    // the fill call reports the actual guid count, which can shrink between the two calls
    class_guids.truncate(required_size as usize);

    Ok(class_guids)
}

#[cfg(test)]
mod tests {
    use super::*;

    // "System" is installed on every Windows machine
    #[test]
    fn system_class_name_resolves_to_at_least_one_guid() {
        let class_guids = class_guids_from_name("System", None).unwrap();
        assert!(!class_guids.is_empty());
    }

    #[test]
    fn unknown_class_name_yields_an_empty_list() {
        let class_guids = class_guids_from_name("NoSuchDeviceSetupClass", None).unwrap();
        assert!(class_guids.is_empty());
    }
}
