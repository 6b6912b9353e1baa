use crate::device_info_set::DeviceInfoSet;
use crate::errors::SetupDiError;
use crate::{wide_string, win32_utils};
use std::marker::PhantomData;
use windows::Win32::Foundation::{ERROR_INSUFFICIENT_BUFFER, ERROR_INVALID_DATA};
use windows_sys::core::GUID;
use windows_sys::Win32::Devices::DeviceAndDriverInstallation::{
    SetupDiGetDeviceInstanceIdW, HDEVINFO, SP_DEVINFO_DATA,
};

/// A single device information element: the native SP_DEVINFO_DATA record together
/// with the handle of the device information set it was enumerated from.
///
/// The borrow of the owning [`DeviceInfoSet`] keeps an element from outliving the
/// set that scopes it.
pub struct DeviceInfoData<'set> {
    handle: HDEVINFO,
    devinfo_data: SP_DEVINFO_DATA,
    _set: PhantomData<&'set DeviceInfoSet>,
}

impl<'set> DeviceInfoData<'set> {
    /// Returns an SP_DEVINFO_DATA record with its cbSize header field initialized,
    /// ready to be filled in by a native enumeration call.
    pub(crate) fn zeroed_devinfo_data() -> SP_DEVINFO_DATA {
        let mut devinfo_data = SP_DEVINFO_DATA { cbSize: 0, ClassGuid: GUID::from_u128(0), DevInst: 0, Reserved: 0 };
        devinfo_data.cbSize = std::mem::size_of::<SP_DEVINFO_DATA>() as u32;
        devinfo_data
    }

    pub(crate) fn from_raw(handle: HDEVINFO, devinfo_data: SP_DEVINFO_DATA) -> Self {
        Self {
            handle,
            devinfo_data,
            _set: PhantomData,
        }
    }

    /// The device setup class of this element.
    pub fn class_guid(&self) -> &GUID {
        &self.devinfo_data.ClassGuid
    }

    /// The opaque devnode handle of this element.
    pub fn dev_inst(&self) -> u32 {
        self.devinfo_data.DevInst
    }

    /// The native record, for passing to setup API calls this crate does not wrap.
    pub fn as_raw(&self) -> &SP_DEVINFO_DATA {
        &self.devinfo_data
    }

    /// Retrieves the device instance id of this element (e.g. `USB\VID_046D&PID_C31C\...`).
    pub fn instance_id(&self) -> Result<String, SetupDiError> {
        // get the size of the device instance id, null-terminated, as a count of utf-16
        // characters; we expect a failure of ERROR_INSUFFICIENT_BUFFER along with the
        // required_size parameter holding the required size
        // see: https://learn.microsoft.com/en-us/windows/win32/api/setupapi/nf-setupapi-setupdigetdeviceinstanceidw
        let mut required_size: u32 = 0;
        let get_device_instance_id_result = unsafe {
            SetupDiGetDeviceInstanceIdW(self.handle, &self.devinfo_data, std::ptr::null_mut(), 0, &mut required_size)
        };
        if get_device_instance_id_result == 0 {
            let win32_error = win32_utils::get_last_error_as_win32_error();
            if win32_error != ERROR_INSUFFICIENT_BUFFER {
                return Err(SetupDiError::Win32Error(win32_error.0));
            }
        } else {
            debug_assert!(false, "SetupDiGetDeviceInstanceIdW returned success when we asked it for the required buffer size; device instance ids are null terminated and can never be zero characters in length");
            return Err(SetupDiError::Win32Error(ERROR_INVALID_DATA.0));
        }
        //
        if required_size == 0 {
            debug_assert!(false, "Device instance ID has zero characters (and is required to have at least one...the null terminator); aborting.");
            return Err(SetupDiError::Win32Error(ERROR_INVALID_DATA.0));
        }

        // retrieve the device instance id into a buffer sized to the reported count
        let mut instance_id_as_utf16_chars = Vec::<u16>::with_capacity(required_size as usize);
        instance_id_as_utf16_chars.resize(instance_id_as_utf16_chars.capacity(), 0);
        //
        let get_device_instance_id_result = unsafe {
            SetupDiGetDeviceInstanceIdW(
                self.handle,
                &self.devinfo_data,
                instance_id_as_utf16_chars.as_mut_ptr(),
                required_size,
                std::ptr::null_mut(),
            )
        };
        if get_device_instance_id_result == 0 {
            let win32_error = win32_utils::get_last_error_as_win32_error();
            return Err(SetupDiError::Win32Error(win32_error.0));
        }

        let instance_id = wide_string::string_from_utf16_nul_terminated(&instance_id_as_utf16_chars)?;
        Ok(instance_id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use windows_sys::Win32::Devices::DeviceAndDriverInstallation::SP_DEVINFO_DATA;

    // the cbSize handshake only works if the record matches the native layout:
    // 32 bytes on 64-bit Windows, 28 bytes on 32-bit Windows
    #[test]
    fn devinfo_data_record_matches_the_native_layout() {
        #[cfg(target_pointer_width = "64")]
        assert_eq!(std::mem::size_of::<SP_DEVINFO_DATA>(), 32);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(std::mem::size_of::<SP_DEVINFO_DATA>(), 28);
    }

    #[test]
    fn zeroed_record_carries_its_own_size() {
        let devinfo_data = super::DeviceInfoData::zeroed_devinfo_data();
        assert_eq!(devinfo_data.cbSize as usize, std::mem::size_of::<SP_DEVINFO_DATA>());
        assert_eq!(devinfo_data.DevInst, 0);
        assert_eq!(devinfo_data.Reserved, 0);
    }
}
